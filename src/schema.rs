//! Declarative form schema

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use utoipa::ToSchema;

/// Closed set of supported field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    ShortText,
    LongText,
    Number,
    SingleChoice,
    MultiChoice,
    Date,
    BooleanToggle,
}

impl FieldType {
    /// Choice types carry an options list; nothing else does
    pub fn is_choice(self) -> bool {
        matches!(self, Self::SingleChoice | Self::MultiChoice)
    }
}

/// One selectable option of a choice field
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

/// Optional, type-dependent validation bounds
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_selected: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_selected: Option<usize>,
}

/// One form field: type, caption, and rules
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<FieldConstraints>,
}

impl FieldDescriptor {
    pub fn constraints(&self) -> FieldConstraints {
        self.constraints.clone().unwrap_or_default()
    }
}

/// The declarative form document served to clients
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FormSchema {
    pub title: String,
    pub description: String,
    pub fields: Vec<FieldDescriptor>,
}

/// Schema integrity violation, fatal at startup
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("duplicate field name: {0}")]
    DuplicateField(String),

    #[error("field {0}: options are only valid on choice fields")]
    UnexpectedOptions(String),

    #[error("field {0}: choice fields require an options list")]
    MissingOptions(String),

    #[error("field {0}: {1} bound exceeds its maximum")]
    InvertedBound(String, &'static str),

    #[error("field {0}: invalid regex: {1}")]
    InvalidRegex(String, regex::Error),
}

impl FormSchema {
    /// Check the structural invariants: unique names, options iff choice type,
    /// min <= max on every bound pair, compilable regexes.
    pub fn verify(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }

            match (&field.options, field.field_type.is_choice()) {
                (Some(_), false) => {
                    return Err(SchemaError::UnexpectedOptions(field.name.clone()))
                }
                (None, true) => return Err(SchemaError::MissingOptions(field.name.clone())),
                _ => {}
            }

            let c = field.constraints();
            if let (Some(lo), Some(hi)) = (c.min_length, c.max_length) {
                if lo > hi {
                    return Err(SchemaError::InvertedBound(field.name.clone(), "length"));
                }
            }
            if let (Some(lo), Some(hi)) = (c.min, c.max) {
                if lo > hi {
                    return Err(SchemaError::InvertedBound(field.name.clone(), "numeric"));
                }
            }
            if let (Some(lo), Some(hi)) = (c.min_selected, c.max_selected) {
                if lo > hi {
                    return Err(SchemaError::InvertedBound(field.name.clone(), "selection"));
                }
            }
            if let Some(pattern) = &c.regex {
                if let Err(e) = regex::Regex::new(pattern) {
                    return Err(SchemaError::InvalidRegex(field.name.clone(), e));
                }
            }
        }
        Ok(())
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Built-in employee onboarding form. The start date's minimum is the
    /// calendar date the schema is constructed, so it moves with the process.
    pub fn employee_onboarding() -> Self {
        let today = chrono::Utc::now().date_naive();
        Self {
            title: "Employee Onboarding Form".into(),
            description: "Please fill out your details for the onboarding process.".into(),
            fields: vec![
                FieldDescriptor {
                    name: "fullName".into(),
                    label: "Full Name".into(),
                    field_type: FieldType::ShortText,
                    placeholder: Some("Enter your legal full name".into()),
                    required: true,
                    options: None,
                    constraints: Some(FieldConstraints {
                        min_length: Some(3),
                        max_length: Some(50),
                        ..Default::default()
                    }),
                },
                FieldDescriptor {
                    name: "email".into(),
                    label: "Work Email".into(),
                    field_type: FieldType::ShortText,
                    placeholder: Some("e.g., john.doe@matbook.com".into()),
                    required: true,
                    options: None,
                    constraints: Some(FieldConstraints {
                        regex: Some(r"^\S+@\S+\.\S+$".into()),
                        ..Default::default()
                    }),
                },
                FieldDescriptor {
                    name: "employeeId".into(),
                    label: "Employee ID".into(),
                    field_type: FieldType::Number,
                    placeholder: Some("Your 6-digit employee ID".into()),
                    required: true,
                    options: None,
                    constraints: Some(FieldConstraints {
                        min: Some(100_000.0),
                        max: Some(999_999.0),
                        ..Default::default()
                    }),
                },
                FieldDescriptor {
                    name: "department".into(),
                    label: "Department".into(),
                    field_type: FieldType::SingleChoice,
                    placeholder: Some("Select your department".into()),
                    required: true,
                    options: Some(vec![
                        FieldOption { value: "engineering".into(), label: "Engineering".into() },
                        FieldOption { value: "hr".into(), label: "Human Resources".into() },
                        FieldOption { value: "marketing".into(), label: "Marketing".into() },
                    ]),
                    constraints: None,
                },
                FieldDescriptor {
                    name: "skills".into(),
                    label: "Technical Skills".into(),
                    field_type: FieldType::MultiChoice,
                    placeholder: Some("Select relevant skills".into()),
                    required: true,
                    options: Some(vec![
                        FieldOption { value: "react".into(), label: "React".into() },
                        FieldOption { value: "node".into(), label: "Node.js".into() },
                        FieldOption { value: "sql".into(), label: "SQL".into() },
                        FieldOption { value: "ts".into(), label: "TypeScript".into() },
                    ]),
                    constraints: Some(FieldConstraints {
                        min_selected: Some(1),
                        max_selected: Some(3),
                        ..Default::default()
                    }),
                },
                FieldDescriptor {
                    name: "startDate".into(),
                    label: "Start Date".into(),
                    field_type: FieldType::Date,
                    placeholder: None,
                    required: true,
                    options: None,
                    constraints: Some(FieldConstraints {
                        min_date: Some(today),
                        ..Default::default()
                    }),
                },
                FieldDescriptor {
                    name: "notes".into(),
                    label: "Additional Notes".into(),
                    field_type: FieldType::LongText,
                    placeholder: Some("Any special requests or comments".into()),
                    required: false,
                    options: None,
                    constraints: None,
                },
                FieldDescriptor {
                    name: "termsAccepted".into(),
                    label: "I accept the terms and conditions.".into(),
                    field_type: FieldType::BooleanToggle,
                    placeholder: None,
                    required: true,
                    options: None,
                    constraints: None,
                },
            ],
        }
    }
}
