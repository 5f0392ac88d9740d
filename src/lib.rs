pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;

pub use db::StudentStore;
pub use error::ApiError;
