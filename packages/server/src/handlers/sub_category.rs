use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::record_id::RecordId;
use crate::models::sub_category::SubCategoryResponse;
use crate::state::AppState;

use super::category::find_category;
use super::menu_item::sub_categories_of;

#[utoipa::path(
    get,
    path = "/by-category/{id}",
    tag = "Sub Categories",
    operation_id = "listSubCategoriesByCategory",
    summary = "Sub categories of a category",
    description = "Refills the dependent sub category picker of the menu item form after a \
        category is chosen.",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Sub categories of the category", body = Vec<SubCategoryResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state))]
pub async fn list_by_category(
    State(state): State<AppState>,
    record_id: RecordId,
) -> Result<Json<Vec<SubCategoryResponse>>, AppError> {
    let category_id = record_id.require("Category")?;
    find_category(&state.db, category_id).await?;
    Ok(Json(sub_categories_of(&state.db, category_id).await?))
}
