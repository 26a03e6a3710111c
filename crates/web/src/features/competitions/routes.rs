use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use storage::Database;

use super::handlers::{
    associate_sports, create_competition, delete_competition, dissociate_sport, get_competition,
    list_competition_sports, list_competitions, list_pair_stages, update_competition,
};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/", post(create_competition))
        .route("/:id", put(update_competition))
        .route("/:id", delete(delete_competition))
        .route("/:id/sports", post(associate_sports))
        .route("/:id/sports/:sport_id", delete(dissociate_sport))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_competitions))
        .route("/:id", get(get_competition))
        .route("/:id/sports", get(list_competition_sports))
        .route("/:id/sports/:sport_id/stages", get(list_pair_stages))
        .merge(protected)
}
