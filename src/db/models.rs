use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const ROLE_STUDENT: &str = "student";
pub const ROLE_PARENT: &str = "parent";

/// The one student this deployment tracks. `slot` never leaves the schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StudentRow {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

/// A login identity bound to the student's data, as student or parent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub role: String,
    pub student_id: String,
    pub created_at: String,
}

impl UserRow {
    pub fn is_student(&self) -> bool {
        self.role == ROLE_STUDENT
    }
}

/// Durable session row; `expires_at` slides forward while the session is
/// in use. Timestamps are RFC 3339 TEXT so SQL string comparison orders them.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct SessionRow {
    pub id: String,
    pub user_id: String,
    pub created_at: String,
    pub expires_at: String,
}
