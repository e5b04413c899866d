//! API handlers module

pub mod chat;
pub mod graph;
pub mod health;
pub mod search;

use paperscope_common::errors::AppError;
use validator::ValidationErrors;

/// Map a failed `validate()` to a 400 naming the first offending field
pub(crate) fn validation_error(errors: ValidationErrors) -> AppError {
    let field = errors.field_errors().keys().next().map(|f| f.to_string());
    AppError::Validation {
        message: errors.to_string(),
        field,
    }
}
