use lib::services::ServiceError;
use sea_orm::DbErr;
use thiserror::Error;

pub mod categories;
pub mod exercises;
pub mod grading;
pub mod metadata;
pub mod ordering;
pub mod schedule;
pub mod submissions;

#[derive(Debug, Error)]
pub enum ExercisesError {
    #[error("database error: {0}")]
    DbErr(#[from] DbErr),
    #[error("service error: {0}")]
    ServiceError(#[from] ServiceError),
}

/// The submitted id list is not exactly the current membership of the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderMismatch;
