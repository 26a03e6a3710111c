use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use storage::Database;

use super::handlers::{create_stage, delete_stage, get_stage, list_stages, update_stage};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/", post(create_stage))
        .route("/:id", put(update_stage))
        .route("/:id", delete(delete_stage))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_stages))
        .route("/:id", get(get_stage))
        .merge(protected)
}
