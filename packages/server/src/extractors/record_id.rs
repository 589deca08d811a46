use axum::{
    extract::{FromRequestParts, RawPathParams},
    http::request::Parts,
};

use crate::error::AppError;

/// The `{id}` path segment of an admin route, if present and numeric.
///
/// Admin routes are registered both with and without `{id}`; a missing or
/// unparsable id extracts as `RecordId(None)` and each handler decides what
/// that means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub Option<i32>);

impl RecordId {
    /// The id, or `NotFound` naming `what` when there is none.
    pub fn require(self, what: &str) -> Result<i32, AppError> {
        self.0
            .ok_or_else(|| AppError::NotFound(format!("{what} not found")))
    }
}

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(params) = RawPathParams::from_request_parts(parts, state).await else {
            return Ok(RecordId(None));
        };

        let id = params
            .iter()
            .find(|(key, _)| *key == "id")
            .and_then(|(_, value)| value.trim().parse::<i32>().ok());

        Ok(RecordId(id))
    }
}
