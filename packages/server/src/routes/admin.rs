use axum::middleware;
use axum::routing::get;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::extractors::auth::require_manager;
use crate::handlers::{category, menu_item, sub_category};
use crate::state::AppState;

/// Every admin route, behind the manager gate.
///
/// Routes addressed by `{id}` are also mounted without it; the handlers treat a
/// missing id the same way as one that matches no row.
pub fn routes(state: &AppState) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/categories", category_routes())
        .nest("/menu-items", menu_item_routes(state.config.storage.max_upload_size))
        .nest("/sub-categories", sub_category_routes())
        .layer(middleware::from_fn_with_state(state.clone(), require_manager))
}

fn category_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(category::list_categories))
        .routes(routes!(category::show_create_form, category::create_category))
        .routes(routes!(category::show_edit_form, category::edit_category))
        .routes(routes!(category::show_delete_confirm, category::delete_category))
        .routes(routes!(category::show_details, category::submit_details))
        .route(
            "/edit",
            get(category::show_edit_form).post(category::edit_category),
        )
        .route(
            "/delete",
            get(category::show_delete_confirm).post(category::delete_category),
        )
        .route(
            "/details",
            get(category::show_details).post(category::submit_details),
        )
}

fn menu_item_routes(max_upload_size: u64) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(menu_item::list_menu_items))
        .routes(routes!(menu_item::show_create_form, menu_item::create_menu_item))
        .routes(routes!(menu_item::show_edit_form, menu_item::edit_menu_item))
        .routes(routes!(menu_item::show_delete_confirm, menu_item::delete_menu_item))
        .routes(routes!(menu_item::show_details, menu_item::submit_details))
        .route(
            "/edit",
            get(menu_item::show_edit_form).post(menu_item::edit_menu_item),
        )
        .route(
            "/delete",
            get(menu_item::show_delete_confirm).post(menu_item::delete_menu_item),
        )
        .route(
            "/details",
            get(menu_item::show_details).post(menu_item::submit_details),
        )
        .layer(menu_item::upload_body_limit(max_upload_size))
}

fn sub_category_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(sub_category::list_by_category))
        .route("/by-category", get(sub_category::list_by_category))
}
