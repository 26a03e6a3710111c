use anyhow::Context;
use axum::http::{Method, header};
use storage::Database;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod extract;
mod features;
mod middleware;
mod routes;

use config::Config;
use features::{competitions, overview, sports, stages};
use middleware::auth::ApiKeys;

#[derive(OpenApi)]
#[openapi(
    paths(
        overview::handlers::get_overview,
        sports::handlers::list_sports,
        sports::handlers::get_sport,
        sports::handlers::create_sport,
        sports::handlers::update_sport,
        sports::handlers::delete_sport,
        sports::handlers::list_sport_competitions,
        competitions::handlers::list_competitions,
        competitions::handlers::get_competition,
        competitions::handlers::create_competition,
        competitions::handlers::update_competition,
        competitions::handlers::delete_competition,
        competitions::handlers::list_competition_sports,
        competitions::handlers::associate_sports,
        competitions::handlers::dissociate_sport,
        competitions::handlers::list_pair_stages,
        stages::handlers::list_stages,
        stages::handlers::get_stage,
        stages::handlers::create_stage,
        stages::handlers::update_stage,
        stages::handlers::delete_stage,
    ),
    components(
        schemas(
            storage::dto::common::PaginationMeta,
            storage::dto::overview::OverviewResponse,
            storage::dto::sport::CreateSportRequest,
            storage::dto::sport::UpdateSportRequest,
            storage::dto::sport::SportResponse,
            storage::dto::competition::CreateCompetitionRequest,
            storage::dto::competition::UpdateCompetitionRequest,
            storage::dto::competition::AssociateSportsRequest,
            storage::dto::competition::CompetitionResponse,
            storage::dto::stage::CreateStageRequest,
            storage::dto::stage::UpdateStageRequest,
            storage::dto::stage::StageResponse,
            storage::models::CompetitionSport,
        )
    ),
    tags(
        (name = "overview", description = "Landing page totals"),
        (name = "sports", description = "Sport endpoints"),
        (name = "competitions", description = "Competition endpoints and their sports"),
        (name = "stages", description = "Stage endpoints"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting competition API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config.database_location()
    );
    let db = Database::with_max_connections(&config.database_url, config.max_connections)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let api_keys =
        ApiKeys::from_comma_separated(&config.api_keys).with_secret_key(&config.secret_key);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600));

    let app = routes::configure(db, api_keys)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_resource() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/overview",
            "/api/sports",
            "/api/sports/{id}",
            "/api/sports/{id}/competitions",
            "/api/competitions",
            "/api/competitions/{id}",
            "/api/competitions/{id}/sports",
            "/api/competitions/{id}/sports/{sport_id}",
            "/api/competitions/{id}/sports/{sport_id}/stages",
            "/api/stages",
            "/api/stages/{id}",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
