pub mod auth;
pub mod records;
pub mod student_data;
