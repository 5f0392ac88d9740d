use crate::db::models::{SessionRow, StudentRow, UserRow};
use crate::db::schema::SQLITE_INIT;
use crate::domain::validate::{ColumnValue, ColumnValues};
use crate::domain::{DomainSpec, FieldKind, FieldSpec, SingletonSpec};
use crate::error::ApiError;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Number, Value};
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;
use uuid::Uuid;

pub type SqlitePool = Pool<Sqlite>;

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// Wall-clock time as fixed-width RFC 3339 TEXT. Constant width keeps
/// lexicographic order equal to chronological order, which the SQL
/// comparisons on `expires_at` and `created_at` rely on.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[derive(Clone)]
pub struct StudentStore {
    pool: SqlitePool,
}

impl StudentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, ApiError> {
        let connect_opts =
            SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        Ok(Self::new(pool))
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), ApiError> {
        // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    // ---- student ----

    pub async fn find_student(&self) -> Result<Option<StudentRow>, ApiError> {
        let row = sqlx::query_as::<_, StudentRow>(
            "SELECT id, name, created_at FROM students WHERE slot = 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Create the singleton student. Losing the `slot` UNIQUE race means
    /// someone else just created it, so fall back to the winner's row.
    pub async fn create_student(&self, name: &str) -> Result<StudentRow, ApiError> {
        let id = Uuid::new_v4().to_string();
        let now = now_rfc3339();
        let res = sqlx::query(
            "INSERT INTO students (id, slot, name, created_at, updated_at) VALUES (?, 1, ?, ?, ?)",
        )
        .bind(&id)
        .bind(name)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await;
        match res {
            Ok(_) => Ok(StudentRow {
                id,
                name: name.to_string(),
                created_at: now,
            }),
            Err(e) if is_unique_violation(&e) => self
                .find_student()
                .await?
                .ok_or_else(|| ApiError::internal("student row missing after insert conflict")),
            Err(e) => Err(e.into()),
        }
    }

    // ---- users ----

    pub async fn find_user_by_name(&self, name: &str) -> Result<Option<UserRow>, ApiError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, role, student_id, created_at FROM users WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<UserRow>, ApiError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, role, student_id, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Create a user account. On a `users.name` UNIQUE race the concurrent
    /// winner's row is returned instead.
    pub async fn create_user(
        &self,
        name: &str,
        role: &str,
        student_id: &str,
    ) -> Result<UserRow, ApiError> {
        let id = Uuid::new_v4().to_string();
        let now = now_rfc3339();
        let res = sqlx::query(
            "INSERT INTO users (id, name, role, student_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(name)
        .bind(role)
        .bind(student_id)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await;
        match res {
            Ok(_) => Ok(UserRow {
                id,
                name: name.to_string(),
                role: role.to_string(),
                student_id: student_id.to_string(),
                created_at: now,
            }),
            Err(e) if is_unique_violation(&e) => self
                .find_user_by_name(name)
                .await?
                .ok_or_else(|| ApiError::internal("user row missing after insert conflict")),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn set_user_role(&self, id: &str, role: &str) -> Result<(), ApiError> {
        sqlx::query("UPDATE users SET role = ?, updated_at = ? WHERE id = ?")
            .bind(role)
            .bind(now_rfc3339())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ---- sessions ----

    pub async fn insert_session(&self, session: &SessionRow) -> Result<(), ApiError> {
        sqlx::query("INSERT INTO sessions (id, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)")
            .bind(&session.id)
            .bind(&session.user_id)
            .bind(&session.created_at)
            .bind(&session.expires_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn get_session(&self, id: &str) -> Result<Option<SessionRow>, ApiError> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT id, user_id, created_at, expires_at FROM sessions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn touch_session(&self, id: &str, expires_at: &str) -> Result<(), ApiError> {
        sqlx::query("UPDATE sessions SET expires_at = ? WHERE id = ?")
            .bind(expires_at)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn delete_session(&self, id: &str) -> Result<(), ApiError> {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn purge_expired_sessions(&self, now: &str) -> Result<u64, ApiError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // ---- domain records ----

    /// Insert a validated record and return it as stored, server columns
    /// included.
    pub async fn insert_record(
        &self,
        spec: &DomainSpec,
        student_id: &str,
        values: &ColumnValues,
    ) -> Result<Map<String, Value>, ApiError> {
        let id = Uuid::new_v4().to_string();
        let now = now_rfc3339();
        let mut columns = vec!["id", "student_id", "created_at", "updated_at"];
        columns.extend(values.iter().map(|(column, _)| *column));
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            spec.table,
            columns.join(", "),
            placeholders
        );
        let mut query = sqlx::query(&sql).bind(&id).bind(student_id).bind(&now).bind(&now);
        for (_, value) in values {
            query = bind_column(query, value);
        }
        query.execute(&self.pool).await?;
        self.get_record(spec, student_id, &id)
            .await?
            .ok_or_else(|| ApiError::internal("record missing after insert"))
    }

    /// Apply a validated partial update. `None` means no row matched the
    /// id under this student.
    pub async fn update_record(
        &self,
        spec: &DomainSpec,
        student_id: &str,
        id: &str,
        values: &ColumnValues,
    ) -> Result<Option<Map<String, Value>>, ApiError> {
        let now = now_rfc3339();
        let assignments = values
            .iter()
            .map(|(column, _)| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET updated_at = ?, {} WHERE id = ? AND student_id = ?",
            spec.table, assignments
        );
        let mut query = sqlx::query(&sql).bind(&now);
        for (_, value) in values {
            query = bind_column(query, value);
        }
        let result = query.bind(id).bind(student_id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_record(spec, student_id, id).await
    }

    pub async fn delete_record(
        &self,
        spec: &DomainSpec,
        student_id: &str,
        id: &str,
    ) -> Result<bool, ApiError> {
        let sql = format!("DELETE FROM {} WHERE id = ? AND student_id = ?", spec.table);
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(student_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn get_record(
        &self,
        spec: &DomainSpec,
        student_id: &str,
        id: &str,
    ) -> Result<Option<Map<String, Value>>, ApiError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ? AND student_id = ?",
            select_columns(spec.fields),
            spec.table
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(student_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| Self::row_to_json(spec.fields, &r)).transpose()
    }

    /// All records of one domain, oldest first. The `id` tiebreak keeps the
    /// order stable for rows created within the same second.
    pub async fn list_records(
        &self,
        spec: &DomainSpec,
        student_id: &str,
    ) -> Result<Vec<Map<String, Value>>, ApiError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE student_id = ? ORDER BY created_at, id",
            select_columns(spec.fields),
            spec.table
        );
        let rows = sqlx::query(&sql)
            .bind(student_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|r| Self::row_to_json(spec.fields, r))
            .collect()
    }

    // ---- per-student singletons ----

    pub async fn get_singleton(
        &self,
        spec: &SingletonSpec,
        student_id: &str,
    ) -> Result<Option<Map<String, Value>>, ApiError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE student_id = ?",
            select_columns(spec.fields),
            spec.table
        );
        let row = sqlx::query(&sql)
            .bind(student_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| Self::row_to_json(spec.fields, &r)).transpose()
    }

    /// Merge a validated patch into the student's singleton row.
    /// Uses SQLite `INSERT ... ON CONFLICT(student_id) DO UPDATE`; columns
    /// outside the patch keep their schema DEFAULTs on first insert and
    /// their current values afterwards.
    pub async fn upsert_singleton(
        &self,
        spec: &SingletonSpec,
        student_id: &str,
        values: &ColumnValues,
    ) -> Result<Map<String, Value>, ApiError> {
        let id = Uuid::new_v4().to_string();
        let now = now_rfc3339();
        let mut columns = vec!["id", "student_id", "created_at", "updated_at"];
        columns.extend(values.iter().map(|(column, _)| *column));
        let placeholders = vec!["?"; columns.len()].join(", ");
        let updates = std::iter::once("updated_at=excluded.updated_at".to_string())
            .chain(values.iter().map(|(column, _)| format!("{column}=excluded.{column}")))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT(student_id) DO UPDATE SET {}",
            spec.table,
            columns.join(", "),
            placeholders,
            updates
        );
        let mut query = sqlx::query(&sql).bind(&id).bind(student_id).bind(&now).bind(&now);
        for (_, value) in values {
            query = bind_column(query, value);
        }
        query.execute(&self.pool).await?;
        self.get_singleton(spec, student_id)
            .await?
            .ok_or_else(|| ApiError::internal("singleton missing after upsert"))
    }

    fn row_to_json(fields: &[FieldSpec], row: &SqliteRow) -> Result<Map<String, Value>, ApiError> {
        let mut out = Map::new();
        out.insert("id".into(), Value::String(row.try_get("id")?));
        out.insert("studentId".into(), Value::String(row.try_get("student_id")?));
        for field in fields {
            let value = match field.kind {
                FieldKind::Text | FieldKind::Date => row
                    .try_get::<Option<String>, _>(field.column)?
                    .map(Value::String)
                    .unwrap_or(Value::Null),
                FieldKind::Number => row
                    .try_get::<Option<f64>, _>(field.column)?
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                FieldKind::Integer => row
                    .try_get::<Option<i64>, _>(field.column)?
                    .map(|n| Value::Number(n.into()))
                    .unwrap_or(Value::Null),
                FieldKind::Bool => row
                    .try_get::<Option<i64>, _>(field.column)?
                    .map(|n| Value::Bool(n != 0))
                    .unwrap_or(Value::Null),
            };
            out.insert(field.json.to_string(), value);
        }
        out.insert("createdAt".into(), Value::String(row.try_get("created_at")?));
        out.insert("updatedAt".into(), Value::String(row.try_get("updated_at")?));
        Ok(out)
    }
}

fn select_columns(fields: &[FieldSpec]) -> String {
    let mut columns = vec!["id", "student_id", "created_at", "updated_at"];
    columns.extend(fields.iter().map(|f| f.column));
    columns.join(", ")
}

fn bind_column<'q>(query: SqliteQuery<'q>, value: &'q ColumnValue) -> SqliteQuery<'q> {
    match value {
        ColumnValue::Text(s) => query.bind(s.as_str()),
        ColumnValue::Real(n) => query.bind(*n),
        ColumnValue::Int(n) => query.bind(*n),
        ColumnValue::Null => query.bind(Option::<String>::None),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
