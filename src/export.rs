//! CSV export of the submission list

use crate::models::Submission;
use crate::schema::FormSchema;

pub const EXPORT_FILENAME: &str = "submissions_export.csv";

/// Render submissions as CSV: id and creation date first, then one column per
/// schema field in schema order, headed by the field's label. Data cells are
/// quoted with `""` escaping; multi-choice values join with `;`.
pub fn to_csv(schema: &FormSchema, submissions: &[Submission]) -> String {
    let mut out = String::new();

    out.push_str("Submission ID,Created Date");
    for field in &schema.fields {
        out.push(',');
        out.push_str(&quote(&field.label));
    }
    out.push('\n');

    for submission in submissions {
        out.push_str(&submission.id.to_string());
        out.push(',');
        out.push_str(&submission.created_at_text());
        for field in &schema.fields {
            out.push(',');
            let cell = submission
                .data
                .get(&field.name)
                .map(|v| v.export_text())
                .unwrap_or_default();
            out.push_str(&quote(&cell));
        }
        out.push('\n');
    }

    out
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{FieldValue, NormalizedData};

    fn submission() -> Submission {
        let mut data = NormalizedData::new();
        data.insert("fullName".into(), FieldValue::Text("Ada \"The Countess\" Lovelace".into()));
        data.insert("email".into(), FieldValue::Text("ada@matbook.com".into()));
        data.insert("employeeId".into(), FieldValue::Number(123456.into()));
        data.insert("department".into(), FieldValue::Choice("engineering".into()));
        data.insert(
            "skills".into(),
            FieldValue::Selections(vec!["sql".into(), "ts".into()]),
        );
        data.insert(
            "startDate".into(),
            FieldValue::Date("2099-01-01".parse().unwrap()),
        );
        data.insert("termsAccepted".into(), FieldValue::Toggle(true));
        Submission::new(data)
    }

    #[test]
    fn test_header_row_follows_schema_order() {
        let schema = FormSchema::employee_onboarding();
        let csv = to_csv(&schema, &[]);
        assert_eq!(
            csv.trim_end(),
            "Submission ID,Created Date,\"Full Name\",\"Work Email\",\"Employee ID\",\
             \"Department\",\"Technical Skills\",\"Start Date\",\"Additional Notes\",\
             \"I accept the terms and conditions.\""
        );
    }

    #[test]
    fn test_row_quoting_and_selection_join() {
        let schema = FormSchema::employee_onboarding();
        let submission = submission();
        let csv = to_csv(&schema, &[submission.clone()]);
        let row = csv.lines().nth(1).unwrap();

        assert!(row.starts_with(&submission.id.to_string()));
        // Embedded quotes double, selections join with a semicolon, and the
        // blank optional notes column still renders.
        assert!(row.contains("\"Ada \"\"The Countess\"\" Lovelace\""));
        assert!(row.contains("\"sql;ts\""));
        assert!(row.contains("\"2099-01-01\""));
        assert!(row.contains(",\"\","));
    }

    #[test]
    fn test_no_submissions_yields_header_only() {
        let schema = FormSchema::employee_onboarding();
        let csv = to_csv(&schema, &[]);
        assert_eq!(csv.lines().count(), 1);
    }
}
