use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::{category, menu_item, sub_category};
use crate::error::{AppError, ErrorBody};
use crate::extractors::form::AppForm;
use crate::extractors::record_id::RecordId;
use crate::models::category::*;
use crate::models::shared::EmptyView;
use crate::routes::paths;
use crate::state::AppState;

use super::redisplay;

#[utoipa::path(
    get,
    path = "/",
    tag = "Categories",
    operation_id = "listCategories",
    summary = "List all categories",
    description = "Returns every category in store order. No pagination or filtering.",
    responses(
        (status = 200, description = "List of categories", body = Vec<CategoryResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let categories = category::Entity::find().all(&state.db).await?;
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/create",
    tag = "Categories",
    operation_id = "showCreateCategoryForm",
    summary = "Empty category form",
    responses(
        (status = 200, description = "Empty form", body = CategoryFormView),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
pub async fn show_create_form() -> Json<CategoryFormView> {
    Json(CategoryFormView::empty())
}

#[utoipa::path(
    post,
    path = "/create",
    tag = "Categories",
    operation_id = "createCategory",
    summary = "Create a category",
    description = "Validates the form and inserts a category, then redirects to the list. \
        A rejected form is redisplayed with per-field messages and nothing is stored.",
    request_body(content = CategoryForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created; redirects to the category list"),
        (status = 400, description = "Unreadable form body (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 422, description = "Form rejected", body = CategoryFormView),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, form))]
pub async fn create_category(
    State(state): State<AppState>,
    AppForm(form): AppForm<CategoryForm>,
) -> Result<Response, AppError> {
    let errors = validate_category(&form);
    if !errors.is_empty() {
        return Ok(redisplay(CategoryFormView::rejected(None, form, errors)));
    }

    let new_category = category::ActiveModel {
        name: Set(form.name.trim().to_string()),
        ..Default::default()
    };
    let model = new_category.insert(&state.db).await?;
    info!(category_id = model.id, "Category created");

    Ok(Redirect::to(paths::CATEGORIES).into_response())
}

#[utoipa::path(
    get,
    path = "/edit/{id}",
    tag = "Categories",
    operation_id = "showEditCategoryForm",
    summary = "Category loaded for editing",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = CategoryResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state))]
pub async fn show_edit_form(
    State(state): State<AppState>,
    record_id: RecordId,
) -> Result<Json<CategoryResponse>, AppError> {
    show_category(&state, record_id).await
}

#[utoipa::path(
    post,
    path = "/edit/{id}",
    tag = "Categories",
    operation_id = "editCategory",
    summary = "Overwrite a category",
    description = "Validates the form and overwrites the category, then redirects to the list.",
    params(("id" = i32, Path, description = "Category ID")),
    request_body(content = CategoryForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated; redirects to the category list"),
        (status = 400, description = "Unreadable form body (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
        (status = 422, description = "Form rejected", body = CategoryFormView),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, form))]
pub async fn edit_category(
    State(state): State<AppState>,
    record_id: RecordId,
    AppForm(form): AppForm<CategoryForm>,
) -> Result<Response, AppError> {
    let id = record_id.require("Category")?;

    let errors = validate_category(&form);
    if !errors.is_empty() {
        return Ok(redisplay(CategoryFormView::rejected(Some(id), form, errors)));
    }

    let existing = find_category(&state.db, id).await?;
    let mut active: category::ActiveModel = existing.into();
    active.name = Set(form.name.trim().to_string());
    active.update(&state.db).await?;
    info!(category_id = id, "Category updated");

    Ok(Redirect::to(paths::CATEGORIES).into_response())
}

#[utoipa::path(
    get,
    path = "/delete/{id}",
    tag = "Categories",
    operation_id = "showDeleteCategory",
    summary = "Category shown for delete confirmation",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = CategoryResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state))]
pub async fn show_delete_confirm(
    State(state): State<AppState>,
    record_id: RecordId,
) -> Result<Json<CategoryResponse>, AppError> {
    show_category(&state, record_id).await
}

#[utoipa::path(
    post,
    path = "/delete/{id}",
    tag = "Categories",
    operation_id = "deleteCategory",
    summary = "Delete a category",
    description = "Deletes the category and redirects to the list. A category that no longer \
        exists renders an empty confirmation. A category still used by sub categories or \
        menu items is refused.",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category already gone", body = EmptyView),
        (status = 303, description = "Deleted; redirects to the category list"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Category still referenced (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    record_id: RecordId,
) -> Result<Response, AppError> {
    let Some(id) = record_id.0 else {
        return Ok(Json(EmptyView::default()).into_response());
    };

    let txn = state.db.begin().await?;

    if category::Entity::find_by_id(id).one(&txn).await?.is_none() {
        return Ok(Json(EmptyView::default()).into_response());
    }

    let sub_count = sub_category::Entity::find()
        .filter(sub_category::Column::CategoryId.eq(id))
        .count(&txn)
        .await?;
    let item_count = menu_item::Entity::find()
        .filter(menu_item::Column::CategoryId.eq(id))
        .count(&txn)
        .await?;
    if sub_count > 0 || item_count > 0 {
        return Err(AppError::Conflict(
            "Cannot delete a category that still has sub categories or menu items".into(),
        ));
    }

    category::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    info!(category_id = id, "Category deleted");

    Ok(Redirect::to(paths::CATEGORIES).into_response())
}

#[utoipa::path(
    get,
    path = "/details/{id}",
    tag = "Categories",
    operation_id = "showCategoryDetails",
    summary = "Read-only category details",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = CategoryResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state))]
pub async fn show_details(
    State(state): State<AppState>,
    record_id: RecordId,
) -> Result<Json<CategoryResponse>, AppError> {
    show_category(&state, record_id).await
}

#[utoipa::path(
    post,
    path = "/details/{id}",
    tag = "Categories",
    operation_id = "submitCategoryDetails",
    summary = "Leave the details page for the edit form",
    description = "Stores nothing. A valid form redirects to the edit form of the same category.",
    params(("id" = i32, Path, description = "Category ID")),
    request_body(content = CategoryForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirects to the edit form"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Missing category ID (NOT_FOUND)", body = ErrorBody),
        (status = 422, description = "Form rejected", body = CategoryFormView),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(form))]
pub async fn submit_details(
    record_id: RecordId,
    AppForm(form): AppForm<CategoryForm>,
) -> Result<Response, AppError> {
    let id = record_id.require("Category")?;

    let errors = validate_category(&form);
    if !errors.is_empty() {
        return Ok(redisplay(CategoryFormView::rejected(Some(id), form, errors)));
    }

    Ok(Redirect::to(&paths::category_edit(id)).into_response())
}

async fn show_category(
    state: &AppState,
    record_id: RecordId,
) -> Result<Json<CategoryResponse>, AppError> {
    let id = record_id.require("Category")?;
    let model = find_category(&state.db, id).await?;
    Ok(Json(model.into()))
}

pub(crate) async fn find_category<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<category::Model, AppError> {
    category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))
}
