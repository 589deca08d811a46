mod admin;
pub mod paths;

use utoipa_axum::router::OpenApiRouter;

use crate::state::AppState;

pub fn app_routes(state: &AppState) -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest(paths::ADMIN, admin::routes(state))
}
