use crate::db::StudentStore;
use crate::db::models::{ROLE_PARENT, ROLE_STUDENT, UserRow};
use crate::error::ApiError;
use tracing::info;

/// Sign a user in by display name, creating whatever is missing along the
/// way. The first student-role login provisions the tracked student; parents
/// can only join once that student exists.
pub async fn login(store: &StudentStore, name: &str, role: &str) -> Result<UserRow, ApiError> {
    let name = name.trim();
    if name.chars().count() < 2 {
        return Err(ApiError::validation("name must be at least 2 characters"));
    }
    if role != ROLE_STUDENT && role != ROLE_PARENT {
        return Err(ApiError::validation("role must be `student` or `parent`"));
    }

    let student = match store.find_student().await? {
        Some(student) => student,
        None if role == ROLE_STUDENT => {
            info!(name, "provisioning tracked student on first login");
            store.create_student(name).await?
        }
        None => {
            return Err(ApiError::validation(
                "a student must register before a parent can sign in",
            ));
        }
    };

    let user = match store.find_user_by_name(name).await? {
        Some(user) if user.role != role => {
            // Logging in under the other role rebinds the account in place.
            info!(name, from = %user.role, to = role, "switching account role");
            store.set_user_role(&user.id, role).await?;
            UserRow {
                role: role.to_string(),
                ..user
            }
        }
        Some(user) => user,
        None => store.create_user(name, role, &student.id).await?,
    };
    Ok(user)
}
