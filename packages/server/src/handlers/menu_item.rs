use std::collections::HashMap;

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::response::{IntoResponse, Redirect, Response};
use sea_orm::*;
use spice_common::storage::StorageError;
use tracing::{info, instrument, warn};

use crate::entity::{category, menu_item, sub_category};
use crate::error::{AppError, ErrorBody};
use crate::extractors::record_id::RecordId;
use crate::models::category::CategoryResponse;
use crate::models::menu_item::*;
use crate::models::shared::{EmptyView, FieldErrors};
use crate::models::sub_category::SubCategoryResponse;
use crate::routes::paths;
use crate::state::AppState;
use crate::utils::image::{
    default_image_path, image_file_name, image_reference, reference_to_store_path, store_path,
};
use crate::utils::upload::{StagedUpload, read_form};

use super::redisplay;

/// Room for the text fields and multipart framing on top of the image itself.
const FORM_OVERHEAD: usize = 1024 * 1024;

/// Body limit for the multipart create and edit routes.
pub fn upload_body_limit(max_upload_size: u64) -> DefaultBodyLimit {
    let limit = usize::try_from(max_upload_size)
        .unwrap_or(usize::MAX)
        .saturating_add(FORM_OVERHEAD);
    DefaultBodyLimit::max(limit)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Menu Items",
    operation_id = "listMenuItems",
    summary = "List all menu items",
    description = "Returns every menu item with its category and sub category attached, \
        in store order.",
    responses(
        (status = 200, description = "List of menu items", body = Vec<MenuItemResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state))]
pub async fn list_menu_items(
    State(state): State<AppState>,
) -> Result<Json<Vec<MenuItemResponse>>, AppError> {
    let items = menu_item::Entity::find().all(&state.db).await?;
    Ok(Json(attach_relations(&state.db, items).await?))
}

#[utoipa::path(
    get,
    path = "/create",
    tag = "Menu Items",
    operation_id = "showCreateMenuItemForm",
    summary = "Empty menu item form",
    description = "An empty draft plus every category. The sub category list stays empty \
        until a category is picked.",
    responses(
        (status = 200, description = "Empty form", body = MenuItemView),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state))]
pub async fn show_create_form(
    State(state): State<AppState>,
) -> Result<Json<MenuItemView>, AppError> {
    let view = menu_item_view(&state.db, MenuItemDraft::default(), FieldErrors::new()).await?;
    Ok(Json(view))
}

#[utoipa::path(
    post,
    path = "/create",
    tag = "Menu Items",
    operation_id = "createMenuItem",
    summary = "Create a menu item",
    description = "Validates the form and inserts the menu item, then stores its image as \
        `<id><ext>` (or a copy of the placeholder as `<id>.png`) and records the image \
        reference. Redirects to the list.",
    request_body(content = MenuItemMultipart, content_type = "multipart/form-data"),
    responses(
        (status = 303, description = "Created; redirects to the menu item list"),
        (status = 400, description = "Unreadable multipart body or oversized file (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 422, description = "Form rejected", body = MenuItemView),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, multipart))]
pub async fn create_menu_item(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;
    let form = read_form(multipart, state.config.storage.max_upload_size).await?;

    let mut bound = bind_menu_item(&form);
    check_relations(&state.db, &bound.draft, &mut bound.errors).await?;
    let Some(input) = bound.input() else {
        let view = menu_item_view(&state.db, bound.draft, bound.errors).await?;
        return Ok(redisplay(view));
    };

    let new_item = menu_item::ActiveModel {
        name: Set(input.name),
        description: Set(input.description),
        spicyness: Set(input.spicyness),
        image: Set(None),
        price: Set(input.price),
        category_id: Set(input.category_id),
        sub_category_id: Set(input.sub_category_id),
        ..Default::default()
    };
    let model = new_item.insert(&state.db).await?;
    let id = model.id;

    let upload = staged_image(&form.upload, &bound.image_extension);
    let reference = store_image(&state, id, upload).await?;

    let mut active: menu_item::ActiveModel = model.into();
    active.image = Set(Some(reference.clone()));
    active.update(&state.db).await?;
    info!(menu_item_id = id, image = %reference, "Menu item created");

    Ok(Redirect::to(paths::MENU_ITEMS).into_response())
}

#[utoipa::path(
    get,
    path = "/edit/{id}",
    tag = "Menu Items",
    operation_id = "showEditMenuItemForm",
    summary = "Menu item loaded for editing",
    description = "The menu item with both relations, every category, and the sub categories \
        of the item's category.",
    params(("id" = i32, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Menu item form", body = MenuItemView),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Menu item not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state))]
pub async fn show_edit_form(
    State(state): State<AppState>,
    record_id: RecordId,
) -> Result<Json<MenuItemView>, AppError> {
    show_menu_item(&state, record_id).await
}

#[utoipa::path(
    post,
    path = "/edit/{id}",
    tag = "Menu Items",
    operation_id = "editMenuItem",
    summary = "Overwrite a menu item",
    description = "Validates the form and overwrites the menu item. A new image replaces the \
        old file; without one the current image is kept. Redirects to the list.",
    params(("id" = i32, Path, description = "Menu item ID")),
    request_body(content = MenuItemMultipart, content_type = "multipart/form-data"),
    responses(
        (status = 303, description = "Updated; redirects to the menu item list"),
        (status = 400, description = "Unreadable multipart body or oversized file (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Menu item not found (NOT_FOUND)", body = ErrorBody),
        (status = 422, description = "Form rejected", body = MenuItemView),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, multipart))]
pub async fn edit_menu_item(
    State(state): State<AppState>,
    record_id: RecordId,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let id = record_id.require("Menu item")?;
    let existing = find_menu_item(&state.db, id).await?;

    let multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;
    let form = read_form(multipart, state.config.storage.max_upload_size).await?;

    let mut bound = bind_menu_item(&form);
    bound.draft.id = Some(id);
    bound.draft.image = existing.image.clone();
    check_relations(&state.db, &bound.draft, &mut bound.errors).await?;
    let Some(input) = bound.input() else {
        let view = menu_item_view(&state.db, bound.draft, bound.errors).await?;
        return Ok(redisplay(view));
    };

    let mut active: menu_item::ActiveModel = existing.clone().into();

    if let Some(upload) = staged_image(&form.upload, &bound.image_extension) {
        if let Some(old) = existing.image.as_deref() {
            remove_image(&state, id, old).await?;
        }
        let reference = store_image(&state, id, Some(upload)).await?;
        info!(menu_item_id = id, image = %reference, "Menu item image replaced");
        active.image = Set(Some(reference));
    }

    active.name = Set(input.name);
    active.description = Set(input.description);
    active.price = Set(input.price);
    active.spicyness = Set(input.spicyness);
    active.category_id = Set(input.category_id);
    active.sub_category_id = Set(input.sub_category_id);
    active.update(&state.db).await?;
    info!(menu_item_id = id, "Menu item updated");

    Ok(Redirect::to(paths::MENU_ITEMS).into_response())
}

#[utoipa::path(
    get,
    path = "/details/{id}",
    tag = "Menu Items",
    operation_id = "showMenuItemDetails",
    summary = "Read-only menu item details",
    params(("id" = i32, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Menu item", body = MenuItemView),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Menu item not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state))]
pub async fn show_details(
    State(state): State<AppState>,
    record_id: RecordId,
) -> Result<Json<MenuItemView>, AppError> {
    show_menu_item(&state, record_id).await
}

#[utoipa::path(
    post,
    path = "/details/{id}",
    tag = "Menu Items",
    operation_id = "submitMenuItemDetails",
    summary = "Leave the details page for the edit form",
    description = "Stores nothing and redirects to the edit form of the same menu item.",
    params(("id" = i32, Path, description = "Menu item ID")),
    responses(
        (status = 303, description = "Redirects to the edit form"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Missing menu item ID (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
pub async fn submit_details(record_id: RecordId) -> Result<Redirect, AppError> {
    let id = record_id.require("Menu item")?;
    Ok(Redirect::to(&paths::menu_item_edit(id)))
}

#[utoipa::path(
    get,
    path = "/delete/{id}",
    tag = "Menu Items",
    operation_id = "showDeleteMenuItem",
    summary = "Menu item shown for delete confirmation",
    params(("id" = i32, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Menu item", body = MenuItemView),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Menu item not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state))]
pub async fn show_delete_confirm(
    State(state): State<AppState>,
    record_id: RecordId,
) -> Result<Json<MenuItemView>, AppError> {
    show_menu_item(&state, record_id).await
}

#[utoipa::path(
    post,
    path = "/delete/{id}",
    tag = "Menu Items",
    operation_id = "deleteMenuItem",
    summary = "Delete a menu item",
    description = "Removes the row and redirects to the list. The image file stays on disk. \
        A menu item that no longer exists renders an empty confirmation.",
    params(("id" = i32, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Menu item already gone", body = EmptyView),
        (status = 303, description = "Deleted; redirects to the menu item list"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state))]
pub async fn delete_menu_item(
    State(state): State<AppState>,
    record_id: RecordId,
) -> Result<Response, AppError> {
    let Some(id) = record_id.0 else {
        return Ok(Json(EmptyView::default()).into_response());
    };

    let result = menu_item::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Ok(Json(EmptyView::default()).into_response());
    }
    info!(menu_item_id = id, "Menu item deleted");

    Ok(Redirect::to(paths::MENU_ITEMS).into_response())
}

async fn show_menu_item(
    state: &AppState,
    record_id: RecordId,
) -> Result<Json<MenuItemView>, AppError> {
    let id = record_id.require("Menu item")?;
    let model = find_menu_item(&state.db, id).await?;
    let item = attach_relations(&state.db, vec![model])
        .await?
        .pop()
        .ok_or_else(|| AppError::NotFound("Menu item not found".into()))?;

    let view = menu_item_view(&state.db, item.into(), FieldErrors::new()).await?;
    Ok(Json(view))
}

async fn find_menu_item<C: ConnectionTrait>(db: &C, id: i32) -> Result<menu_item::Model, AppError> {
    menu_item::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Menu item not found".into()))
}

/// Build the form view: the draft, every category, and the sub categories of
/// the draft's category.
async fn menu_item_view<C: ConnectionTrait>(
    db: &C,
    menu_item: MenuItemDraft,
    errors: FieldErrors,
) -> Result<MenuItemView, AppError> {
    let categories = category::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(CategoryResponse::from)
        .collect();

    let sub_categories = match menu_item.category_id {
        Some(category_id) => sub_categories_of(db, category_id).await?,
        None => Vec::new(),
    };

    Ok(MenuItemView {
        menu_item,
        categories,
        sub_categories,
        errors,
    })
}

pub(crate) async fn sub_categories_of<C: ConnectionTrait>(
    db: &C,
    category_id: i32,
) -> Result<Vec<SubCategoryResponse>, AppError> {
    let rows = sub_category::Entity::find()
        .filter(sub_category::Column::CategoryId.eq(category_id))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Record field errors for a category that does not exist or a sub category
/// outside the selected category.
async fn check_relations<C: ConnectionTrait>(
    db: &C,
    draft: &MenuItemDraft,
    errors: &mut FieldErrors,
) -> Result<(), AppError> {
    if let Some(category_id) = draft.category_id
        && category::Entity::find_by_id(category_id).one(db).await?.is_none()
    {
        errors.add("category_id", "The selected Category does not exist");
    }

    if let Some(sub_category_id) = draft.sub_category_id {
        match sub_category::Entity::find_by_id(sub_category_id).one(db).await? {
            None => errors.add("sub_category_id", "The selected Sub Category does not exist"),
            Some(sub) if draft.category_id.is_some_and(|id| id != sub.category_id) => errors.add(
                "sub_category_id",
                "Sub Category does not belong to the selected Category",
            ),
            Some(_) => {}
        }
    }

    Ok(())
}

/// Attach category and sub category to each row, keeping the row order.
async fn attach_relations<C: ConnectionTrait>(
    db: &C,
    items: Vec<menu_item::Model>,
) -> Result<Vec<MenuItemResponse>, AppError> {
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let category_ids: Vec<i32> = items.iter().map(|m| m.category_id).collect();
    let sub_category_ids: Vec<i32> = items.iter().map(|m| m.sub_category_id).collect();

    let categories: HashMap<i32, CategoryResponse> = category::Entity::find()
        .filter(category::Column::Id.is_in(category_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c.into()))
        .collect();
    let sub_categories: HashMap<i32, SubCategoryResponse> = sub_category::Entity::find()
        .filter(sub_category::Column::Id.is_in(sub_category_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s.into()))
        .collect();

    Ok(items
        .into_iter()
        .map(|m| {
            let category = categories.get(&m.category_id).cloned();
            let sub_category = sub_categories.get(&m.sub_category_id).cloned();
            MenuItemResponse::new(m, category, sub_category)
        })
        .collect())
}

fn staged_image<'a>(
    upload: &'a Option<StagedUpload>,
    extension: &'a Option<String>,
) -> Option<(&'a StagedUpload, &'a str)> {
    Some((upload.as_ref()?, extension.as_deref()?))
}

/// Write the image for menu item `id` and return its reference.
///
/// An upload is stored as `<id><ext>`; without one the placeholder is copied
/// to `<id>.png`.
async fn store_image(
    state: &AppState,
    id: i32,
    upload: Option<(&StagedUpload, &str)>,
) -> Result<String, AppError> {
    let storage = &state.config.storage;

    let file_name = match upload {
        Some((staged, extension)) => {
            let file_name = image_file_name(id, extension);
            let bytes = state
                .files
                .write_stream(&store_path(storage, &file_name), staged.open().await?)
                .await?;
            info!(menu_item_id = id, bytes, "Uploaded image stored");
            file_name
        }
        None => {
            let file_name = image_file_name(id, ".png");
            state
                .files
                .copy(&default_image_path(storage), &store_path(storage, &file_name))
                .await?;
            file_name
        }
    };

    Ok(image_reference(storage, &file_name))
}

/// Delete the file behind an image reference before it is replaced.
async fn remove_image(state: &AppState, id: i32, reference: &str) -> Result<(), AppError> {
    let Some(path) = reference_to_store_path(reference) else {
        return Ok(());
    };
    match state.files.delete(&path).await {
        Ok(_) => Ok(()),
        Err(StorageError::InvalidPath { reason, .. }) => {
            warn!(menu_item_id = id, reference, reason, "Skipping unusable image reference");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
