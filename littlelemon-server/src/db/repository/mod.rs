//! Repository Module
//!
//! CRUD operations over the SQLite tables, as free functions taking a pool.

pub mod booking;
pub mod group;
pub mod menu;
pub mod token;
pub mod user;

use crate::utils::AppError;
use shared::FieldErrors;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// A UNIQUE constraint rejected the write
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Input field rejected by stored data (duplicate, unknown reference)
    #[error("{field}: {message}")]
    Conflict {
        field: &'static str,
        message: String,
    },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::Duplicate(db_err.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::not_found(msg),
            RepoError::Duplicate(msg) => AppError::non_field(msg),
            RepoError::Conflict { field, message } => {
                AppError::Validation(FieldErrors::single(field, message))
            }
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Filtering and windowing of a list query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Case-insensitive substring filter
    pub search: Option<String>,
    /// Page window, `None` for everything
    pub limit: Option<i64>,
    pub offset: i64,
}

impl ListQuery {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Self::default()
        }
    }

    /// LIKE pattern for the search term (`%` and `_` escaped with `\`)
    pub(crate) fn pattern(&self) -> Option<String> {
        self.search.as_deref().map(|term| {
            let escaped = term
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            format!("%{escaped}%")
        })
    }

    /// LIMIT value; SQLite treats -1 as unbounded
    pub(crate) fn limit(&self) -> i64 {
        self.limit.unwrap_or(-1)
    }
}
