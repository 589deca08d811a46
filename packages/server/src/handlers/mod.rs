pub mod category;
pub mod menu_item;
pub mod sub_category;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Send a rejected form back to the manager with its field errors.
pub(crate) fn redisplay<T: Serialize>(view: T) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, Json(view)).into_response()
}
