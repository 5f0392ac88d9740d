use crate::domain::{FieldKind, FieldSpec};
use crate::error::ApiError;
use chrono::NaiveDate;
use serde_json::{Map, Value};

/// A validated value ready to bind into a SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Text(String),
    Real(f64),
    Int(i64),
    Null,
}

/// Validated `(column, value)` pairs in payload-independent (field-table)
/// order, so generated SQL is deterministic.
pub type ColumnValues = Vec<(&'static str, ColumnValue)>;

/// Full-payload validation for record creation: every required field present,
/// every present field well-formed, nothing unknown.
pub fn for_create(fields: &'static [FieldSpec], payload: &Map<String, Value>) -> Result<ColumnValues, ApiError> {
    reject_unknown(fields, payload)?;
    let mut out = Vec::with_capacity(payload.len());
    for field in fields {
        match payload.get(field.json) {
            None | Some(Value::Null) if field.required => {
                return Err(ApiError::validation(format!(
                    "missing required field `{}`",
                    field.json
                )));
            }
            None => {}
            Some(value) => out.push((field.column, coerce(field, value)?)),
        }
    }
    Ok(out)
}

/// Partial-payload validation for updates and singleton upserts: presence is
/// optional, but an empty patch is a client error and required fields cannot
/// be nulled out.
pub fn for_update(fields: &'static [FieldSpec], payload: &Map<String, Value>) -> Result<ColumnValues, ApiError> {
    reject_unknown(fields, payload)?;
    let mut out = Vec::with_capacity(payload.len());
    for field in fields {
        match payload.get(field.json) {
            None => {}
            Some(Value::Null) if field.required => {
                return Err(ApiError::validation(format!(
                    "field `{}` must not be null",
                    field.json
                )));
            }
            Some(value) => out.push((field.column, coerce(field, value)?)),
        }
    }
    if out.is_empty() {
        return Err(ApiError::validation("no updatable fields in payload"));
    }
    Ok(out)
}

fn reject_unknown(fields: &[FieldSpec], payload: &Map<String, Value>) -> Result<(), ApiError> {
    for key in payload.keys() {
        if !fields.iter().any(|f| f.json == key) {
            return Err(ApiError::validation(format!("unknown field `{}`", key)));
        }
    }
    Ok(())
}

fn coerce(field: &FieldSpec, value: &Value) -> Result<ColumnValue, ApiError> {
    if value.is_null() {
        // Boolean columns are NOT NULL in the schema; everything optional
        // elsewhere is a nullable column, so null means "clear".
        return if field.kind == FieldKind::Bool {
            Err(ApiError::validation(format!(
                "field `{}` must be a boolean",
                field.json
            )))
        } else {
            Ok(ColumnValue::Null)
        };
    }
    match field.kind {
        FieldKind::Text => {
            let Some(s) = value.as_str() else {
                return Err(ApiError::validation(format!(
                    "field `{}` must be a string",
                    field.json
                )));
            };
            let s = s.trim();
            if !field.one_of.is_empty() && !field.one_of.contains(&s) {
                return Err(ApiError::validation(format!(
                    "field `{}` must be one of: {}",
                    field.json,
                    field.one_of.join(", ")
                )));
            }
            if field.required && s.is_empty() {
                return Err(ApiError::validation(format!(
                    "field `{}` must not be empty",
                    field.json
                )));
            }
            Ok(ColumnValue::Text(s.to_string()))
        }
        FieldKind::Number => value
            .as_f64()
            .filter(|n| n.is_finite())
            .map(ColumnValue::Real)
            .ok_or_else(|| {
                ApiError::validation(format!("field `{}` must be a number", field.json))
            }),
        FieldKind::Integer => value.as_i64().map(ColumnValue::Int).ok_or_else(|| {
            ApiError::validation(format!("field `{}` must be an integer", field.json))
        }),
        FieldKind::Bool => value
            .as_bool()
            .map(|b| ColumnValue::Int(b as i64))
            .ok_or_else(|| {
                ApiError::validation(format!("field `{}` must be a boolean", field.json))
            }),
        FieldKind::Date => value
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            // Re-render so non-padded inputs land in canonical form.
            .map(|d| ColumnValue::Text(d.format("%Y-%m-%d").to_string()))
            .ok_or_else(|| {
                ApiError::validation(format!(
                    "field `{}` must be an ISO date (YYYY-MM-DD)",
                    field.json
                ))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::domain_for_route;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().expect("object literal").clone()
    }

    fn field_err(result: Result<ColumnValues, ApiError>) -> String {
        match result {
            Err(ApiError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn create_accepts_a_full_gym_session() {
        let spec = domain_for_route("gym-sessions").unwrap();
        let values = for_create(
            spec.fields,
            &obj(json!({ "type": "walk", "date": "2026-03-02", "durationMinutes": 45 })),
        )
        .expect("valid payload");
        assert!(values.contains(&("type", ColumnValue::Text("walk".into()))));
        assert!(values.contains(&("duration_minutes", ColumnValue::Int(45))));
    }

    #[test]
    fn create_rejects_enum_violations() {
        let spec = domain_for_route("gym-sessions").unwrap();
        let msg = field_err(for_create(
            spec.fields,
            &obj(json!({ "type": "swim", "date": "2026-03-02" })),
        ));
        assert!(msg.contains("gym, walk, workout"), "got: {msg}");
    }

    #[test]
    fn create_rejects_missing_required_and_unknown_fields() {
        let spec = domain_for_route("classes").unwrap();
        let msg = field_err(for_create(
            spec.fields,
            &obj(json!({ "name": "Algorithms", "credits": 3 })),
        ));
        assert!(msg.contains("`status`"), "got: {msg}");

        // Server-owned columns are unknown by construction.
        let msg = field_err(for_create(
            spec.fields,
            &obj(json!({
                "name": "Algorithms",
                "status": "remaining",
                "credits": 3,
                "studentId": "spoofed"
            })),
        ));
        assert!(msg.contains("`studentId`"), "got: {msg}");
    }

    #[test]
    fn create_rejects_malformed_dates() {
        let spec = domain_for_route("exams").unwrap();
        let msg = field_err(for_create(
            spec.fields,
            &obj(json!({ "title": "Midterm", "date": "03/02/2026" })),
        ));
        assert!(msg.contains("ISO date"), "got: {msg}");
    }

    #[test]
    fn dates_normalize_to_padded_form() {
        let spec = domain_for_route("exams").unwrap();
        let values = for_create(
            spec.fields,
            &obj(json!({ "title": "Midterm", "date": "2026-3-2" })),
        )
        .expect("parseable date");
        assert!(values.contains(&("date", ColumnValue::Text("2026-03-02".into()))));
    }

    #[test]
    fn update_allows_partial_but_not_empty_payloads() {
        let spec = domain_for_route("classes").unwrap();
        let values = for_update(spec.fields, &obj(json!({ "grade": 3.7 }))).expect("partial ok");
        assert_eq!(values, vec![("grade", ColumnValue::Real(3.7))]);

        let msg = field_err(for_update(spec.fields, &obj(json!({}))));
        assert!(msg.contains("no updatable fields"), "got: {msg}");
    }

    #[test]
    fn update_clears_optional_fields_but_protects_required_ones() {
        let spec = domain_for_route("classes").unwrap();
        let values = for_update(spec.fields, &obj(json!({ "grade": null }))).expect("nullable");
        assert_eq!(values, vec![("grade", ColumnValue::Null)]);

        let msg = field_err(for_update(spec.fields, &obj(json!({ "name": null }))));
        assert!(msg.contains("must not be null"), "got: {msg}");
    }

    #[test]
    fn booleans_and_integers_are_type_checked() {
        let spec = domain_for_route("assignments").unwrap();
        let msg = field_err(for_update(spec.fields, &obj(json!({ "completed": "yes" }))));
        assert!(msg.contains("boolean"), "got: {msg}");

        // Bool columns are NOT NULL, so null is not a way to clear them.
        let msg = field_err(for_update(spec.fields, &obj(json!({ "completed": null }))));
        assert!(msg.contains("boolean"), "got: {msg}");

        let spec = domain_for_route("hydration-entries").unwrap();
        let msg = field_err(for_update(spec.fields, &obj(json!({ "glasses": 2.5 }))));
        assert!(msg.contains("integer"), "got: {msg}");
    }
}
