//! Schema-driven validation
//!
//! A single rule interpreter backs every validation site: the authoritative
//! check that gates persistence is the same pure function an advisory caller
//! would use, so the schema document stays the one source of truth for
//! constraints.

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

use crate::schema::{FieldDescriptor, FieldType, FormSchema};

/// Field name -> human-readable message, one entry per failing field
pub type FieldErrors = BTreeMap<String, String>;

/// A value that passed validation, coerced to its field's canonical type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(Number),
    Choice(String),
    Selections(Vec<String>),
    Date(NaiveDate),
    Toggle(bool),
}

impl FieldValue {
    /// Scalar rendering used by free-text search. Selections and toggles are
    /// not searchable, matching the list endpoint's historical behavior.
    pub fn search_text(&self) -> Option<String> {
        match self {
            Self::Text(s) | Self::Choice(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::Date(d) => Some(d.to_string()),
            Self::Selections(_) | Self::Toggle(_) => None,
        }
    }

    /// Flat rendering for CSV export; selections join with `;`.
    pub fn export_text(&self) -> String {
        match self {
            Self::Text(s) | Self::Choice(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Date(d) => d.to_string(),
            Self::Selections(items) => items.join(";"),
            Self::Toggle(b) => b.to_string(),
        }
    }
}

/// Validated submission payload, keyed by field name
pub type NormalizedData = BTreeMap<String, FieldValue>;

/// Validate a candidate value set against the schema.
///
/// Every field is checked independently and all failures are reported in one
/// pass. On success the returned map holds one coerced value per present
/// field; blank optional fields are omitted.
pub fn validate(schema: &FormSchema, candidate: &Map<String, Value>) -> Result<NormalizedData, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut normalized = NormalizedData::new();

    // Closed schema: reject keys the schema does not declare.
    for key in candidate.keys() {
        if schema.field(key).is_none() {
            errors.insert(key.clone(), "Unknown field.".into());
        }
    }

    for field in &schema.fields {
        let value = candidate.get(&field.name);

        if is_blank(field, value) {
            if field.required {
                errors.insert(field.name.clone(), format!("{} is required.", field.label));
            }
            continue;
        }
        // Absent values are always blank, so a non-blank field is present.
        let Some(value) = value else { continue };

        match check_field(field, value) {
            Ok(coerced) => {
                normalized.insert(field.name.clone(), coerced);
            }
            Err(message) => {
                errors.insert(field.name.clone(), message);
            }
        }
    }

    if errors.is_empty() {
        Ok(normalized)
    } else {
        Err(errors)
    }
}

/// Absent, null, empty/whitespace string, or empty list. A required toggle
/// must be literally `true`, so `false` counts as blank for it; an optional
/// toggle keeps an explicit `false` as a real value.
fn is_blank(field: &FieldDescriptor, value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Bool(false)) => {
            field.required && field.field_type == FieldType::BooleanToggle
        }
        _ => false,
    }
}

fn check_field(field: &FieldDescriptor, value: &Value) -> Result<FieldValue, String> {
    let c = field.constraints();
    match field.field_type {
        FieldType::ShortText | FieldType::LongText => {
            let s = value.as_str().ok_or("Must be text.")?;
            let len = s.chars().count();
            if let Some(min) = c.min_length {
                if len < min {
                    return Err(format!("Must be at least {min} characters."));
                }
            }
            if let Some(max) = c.max_length {
                if len > max {
                    return Err(format!("Must be less than {max} characters."));
                }
            }
            if let Some(pattern) = &c.regex {
                if !full_match(pattern, s) {
                    return Err("Invalid format.".into());
                }
            }
            Ok(FieldValue::Text(s.to_owned()))
        }
        FieldType::Number => {
            let n = coerce_number(value).ok_or("Must be a number.")?;
            let as_f64 = n.as_f64().unwrap_or_default();
            if let Some(min) = c.min {
                if as_f64 < min {
                    return Err(format!("Must be at least {}.", fmt_bound(min)));
                }
            }
            if let Some(max) = c.max {
                if as_f64 > max {
                    return Err(format!("Cannot be more than {}.", fmt_bound(max)));
                }
            }
            Ok(FieldValue::Number(n))
        }
        FieldType::SingleChoice => {
            let s = value.as_str().ok_or("Must be text.")?;
            Ok(FieldValue::Choice(s.to_owned()))
        }
        FieldType::MultiChoice => {
            let items = value.as_array().ok_or("Must be a list of options.")?;
            let mut selections = Vec::with_capacity(items.len());
            for item in items {
                selections.push(item.as_str().ok_or("Must be a list of options.")?.to_owned());
            }
            if let Some(min) = c.min_selected {
                if selections.len() < min {
                    return Err(format!("Select at least {min} options."));
                }
            }
            if let Some(max) = c.max_selected {
                if selections.len() > max {
                    return Err(format!("Select no more than {max} options."));
                }
            }
            Ok(FieldValue::Selections(selections))
        }
        FieldType::Date => {
            let s = value.as_str().ok_or("Must be a valid date.")?;
            let date: NaiveDate = s.parse().map_err(|_| "Must be a valid date.")?;
            if let Some(min) = c.min_date {
                // Inclusive, compared as calendar dates.
                if date < min {
                    return Err(format!("Date cannot be before {min}."));
                }
            }
            Ok(FieldValue::Date(date))
        }
        FieldType::BooleanToggle => {
            let b = value.as_bool().ok_or("Must be true or false.")?;
            Ok(FieldValue::Toggle(b))
        }
    }
}

/// Full-string regex semantics: the pattern must cover the whole input.
/// Patterns were compile-checked by `FormSchema::verify`, so a failure here
/// means the schema bypassed verification; treat the value as non-matching.
fn full_match(pattern: &str, input: &str) -> bool {
    match Regex::new(pattern) {
        Ok(re) => re
            .find(input)
            .is_some_and(|m| m.start() == 0 && m.end() == input.len()),
        Err(_) => false,
    }
}

/// Numbers arrive either as JSON numbers or as text input; coerce both,
/// preserving integer-ness so `123456` never becomes `123456.0`.
fn coerce_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                Some(Number::from(i))
            } else {
                s.parse::<f64>().ok().and_then(Number::from_f64)
            }
        }
        _ => None,
    }
}

fn fmt_bound(bound: f64) -> String {
    if bound.fract() == 0.0 && bound.abs() < i64::MAX as f64 {
        format!("{}", bound as i64)
    } else {
        bound.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> FormSchema {
        FormSchema::employee_onboarding()
    }

    fn candidate(overrides: Value) -> Map<String, Value> {
        let mut base = json!({
            "fullName": "Ada Lovelace",
            "email": "ada@matbook.com",
            "employeeId": 123456,
            "department": "engineering",
            "skills": ["sql", "ts"],
            "startDate": "2099-01-01",
            "termsAccepted": true
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), overrides.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        base.as_object().unwrap().clone()
    }

    #[test]
    fn test_valid_candidate_normalizes() {
        let data = validate(&schema(), &candidate(json!({}))).unwrap();
        assert_eq!(data["fullName"], FieldValue::Text("Ada Lovelace".into()));
        assert_eq!(data["employeeId"], FieldValue::Number(Number::from(123456)));
        assert_eq!(data["department"], FieldValue::Choice("engineering".into()));
        assert_eq!(
            data["skills"],
            FieldValue::Selections(vec!["sql".into(), "ts".into()])
        );
        assert_eq!(data["termsAccepted"], FieldValue::Toggle(true));
        // Blank optional field is omitted entirely.
        assert!(!data.contains_key("notes"));
    }

    #[test]
    fn test_number_coerced_from_text_input() {
        let data = validate(&schema(), &candidate(json!({"employeeId": "123456"}))).unwrap();
        assert_eq!(data["employeeId"], FieldValue::Number(Number::from(123456)));
        assert_eq!(serde_json::to_value(&data["employeeId"]).unwrap(), json!(123456));
    }

    #[test]
    fn test_missing_required_fields_all_reported() {
        let empty = Map::new();
        let errors = validate(&schema(), &empty).unwrap_err();
        // Seven required fields, each with its own message; single pass.
        assert_eq!(errors.len(), 7);
        assert_eq!(errors["fullName"], "Full Name is required.");
        assert_eq!(errors["termsAccepted"], "I accept the terms and conditions. is required.");
        assert!(!errors.contains_key("notes"));
    }

    #[test]
    fn test_empty_string_and_empty_list_count_as_missing() {
        let errors = validate(
            &schema(),
            &candidate(json!({"fullName": "   ", "skills": []})),
        )
        .unwrap_err();
        assert_eq!(errors["fullName"], "Full Name is required.");
        assert_eq!(errors["skills"], "Technical Skills is required.");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let errors = validate(&schema(), &candidate(json!({"favoriteColor": "teal"}))).unwrap_err();
        assert_eq!(errors["favoriteColor"], "Unknown field.");
    }

    #[test]
    fn test_length_bounds() {
        let errors = validate(&schema(), &candidate(json!({"fullName": "Al"}))).unwrap_err();
        assert_eq!(errors["fullName"], "Must be at least 3 characters.");

        let long = "x".repeat(51);
        let errors = validate(&schema(), &candidate(json!({ "fullName": long }))).unwrap_err();
        assert_eq!(errors["fullName"], "Must be less than 50 characters.");
    }

    #[test]
    fn test_regex_full_string_semantics() {
        let errors = validate(&schema(), &candidate(json!({"email": "not-an-email"}))).unwrap_err();
        assert_eq!(errors["email"], "Invalid format.");

        // A valid address embedded in trailing garbage must not pass.
        let errors =
            validate(&schema(), &candidate(json!({"email": "a@b.com and more"}))).unwrap_err();
        assert_eq!(errors["email"], "Invalid format.");
    }

    #[test]
    fn test_numeric_bounds_inclusive() {
        let errors = validate(&schema(), &candidate(json!({"employeeId": 50}))).unwrap_err();
        assert_eq!(errors["employeeId"], "Must be at least 100000.");

        let errors = validate(&schema(), &candidate(json!({"employeeId": 1_000_000}))).unwrap_err();
        assert_eq!(errors["employeeId"], "Cannot be more than 999999.");

        // Boundary values pass.
        assert!(validate(&schema(), &candidate(json!({"employeeId": 100000}))).is_ok());
        assert!(validate(&schema(), &candidate(json!({"employeeId": 999999}))).is_ok());
    }

    #[test]
    fn test_selection_cardinality() {
        let errors = validate(
            &schema(),
            &candidate(json!({"skills": ["react", "node", "sql", "ts"]})),
        )
        .unwrap_err();
        assert_eq!(errors["skills"], "Select no more than 3 options.");
    }

    #[test]
    fn test_date_minimum_is_inclusive() {
        let today = chrono::Utc::now().date_naive();
        let data = validate(
            &schema(),
            &candidate(json!({"startDate": today.to_string()})),
        )
        .unwrap();
        assert_eq!(data["startDate"], FieldValue::Date(today));

        let yesterday = today.pred_opt().unwrap();
        let errors = validate(
            &schema(),
            &candidate(json!({"startDate": yesterday.to_string()})),
        )
        .unwrap_err();
        assert_eq!(errors["startDate"], format!("Date cannot be before {today}."));
    }

    #[test]
    fn test_unparseable_date() {
        let errors =
            validate(&schema(), &candidate(json!({"startDate": "next tuesday"}))).unwrap_err();
        assert_eq!(errors["startDate"], "Must be a valid date.");
    }

    #[test]
    fn test_optional_toggle_keeps_explicit_false() {
        let schema = FormSchema {
            title: "t".into(),
            description: "d".into(),
            fields: vec![crate::schema::FieldDescriptor {
                name: "newsletter".into(),
                label: "Subscribe to the newsletter".into(),
                field_type: FieldType::BooleanToggle,
                placeholder: None,
                required: false,
                options: None,
                constraints: None,
            }],
        };

        let candidate = json!({"newsletter": false});
        let data = validate(&schema, candidate.as_object().unwrap()).unwrap();
        assert_eq!(data["newsletter"], FieldValue::Toggle(false));

        // Absent stays absent; only an explicit false is kept.
        let data = validate(&schema, &Map::new()).unwrap();
        assert!(!data.contains_key("newsletter"));
    }

    #[test]
    fn test_required_toggle_must_be_true() {
        let errors = validate(&schema(), &candidate(json!({"termsAccepted": false}))).unwrap_err();
        assert_eq!(errors["termsAccepted"], "I accept the terms and conditions. is required.");
    }

    #[test]
    fn test_type_mismatches() {
        let errors = validate(
            &schema(),
            &candidate(json!({
                "fullName": 42,
                "employeeId": "not a number",
                "skills": "react",
                "termsAccepted": "yes"
            })),
        )
        .unwrap_err();
        assert_eq!(errors["fullName"], "Must be text.");
        assert_eq!(errors["employeeId"], "Must be a number.");
        assert_eq!(errors["skills"], "Must be a list of options.");
        assert_eq!(errors["termsAccepted"], "Must be true or false.");
    }

    #[test]
    fn test_error_map_never_empty_on_failure() {
        // Either a normalized set or a non-empty error map, never neither.
        match validate(&schema(), &candidate(json!({}))) {
            Ok(data) => assert!(!data.is_empty()),
            Err(errors) => assert!(!errors.is_empty()),
        }
    }
}
