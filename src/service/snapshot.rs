use crate::db::StudentStore;
use crate::db::models::StudentRow;
use crate::domain::{DOMAINS, EMERGENCY_FUND, SETTINGS};
use crate::error::ApiError;
use serde_json::{Map, Value, json};

/// Assemble the full client payload: the student, every domain collection
/// (oldest first, empty when unused), and the two singletons with defaults
/// synthesized when no row has been persisted yet. Read-only.
pub async fn student_snapshot(
    store: &StudentStore,
    student: &StudentRow,
) -> Result<Value, ApiError> {
    let mut out = Map::new();
    out.insert("student".to_string(), serde_json::to_value(student)?);
    for spec in DOMAINS {
        let records = store.list_records(spec, &student.id).await?;
        out.insert(
            spec.snapshot_key.to_string(),
            Value::Array(records.into_iter().map(Value::Object).collect()),
        );
    }
    let settings = match store.get_singleton(&SETTINGS, &student.id).await? {
        Some(row) => Value::Object(row),
        None => default_settings(&student.id),
    };
    out.insert(SETTINGS.snapshot_key.to_string(), settings);
    let fund = match store.get_singleton(&EMERGENCY_FUND, &student.id).await? {
        Some(row) => Value::Object(row),
        None => default_emergency_fund(&student.id),
    };
    out.insert(EMERGENCY_FUND.snapshot_key.to_string(), fund);
    Ok(Value::Object(out))
}

// Values match the DEFAULT clauses in db::schema.

fn default_settings(student_id: &str) -> Value {
    json!({
        "id": null,
        "studentId": student_id,
        "weeklyGymGoal": 3,
        "weeklyStudyGoal": 5,
        "sleepGoalHours": 8.0,
        "hydrationGoalGlasses": 8,
        "monthlyBudget": 1000.0,
        "totalDegreeCredits": 120.0,
        "theme": "system",
        "createdAt": null,
        "updatedAt": null,
    })
}

fn default_emergency_fund(student_id: &str) -> Value {
    json!({
        "id": null,
        "studentId": student_id,
        "goalAmount": 1000.0,
        "createdAt": null,
        "updatedAt": null,
    })
}
