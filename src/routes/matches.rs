use actix_web::{web, HttpResponse, Responder};
use tracing::Instrument;
use validator::Validate;
use crate::models::{ErrorResponse, HealthResponse, MatchRequest, MatchResponse};
use crate::services::{LookupError, MatchError, MatchService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matches: MatchService,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/match", web::post().to(find_matches))
        .route("/match/{client_id}", web::get().to(get_cached_matches));
}

fn error_response(err: &MatchError) -> HttpResponse {
    let (mut builder, error, status_code) = match err {
        MatchError::Validation(_) => (HttpResponse::BadRequest(), "validation_failed", 400),
        MatchError::LookupFailed(LookupError::NotFound(_)) => (HttpResponse::NotFound(), "lookup_failed", 404),
        MatchError::LookupFailed(LookupError::Failed(_)) => (HttpResponse::BadGateway(), "lookup_failed", 502),
    };

    builder.json(ErrorResponse {
        error: error.to_string(),
        message: err.to_string(),
        status_code,
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache: state.matches.cache().mode().to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Rank artists for a client
///
/// POST /api/match
///
/// Request body:
/// ```json
/// {
///   "clientId": "string",
///   "preferences": { "preferredStyles": ["string"], "budgetMax": 150 }
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<MatchRequest>,
) -> impl Responder {
    let request_id = uuid::Uuid::new_v4();
    let req = req.into_inner();

    if let Err(errors) = req.validate() {
        tracing::info!(%request_id, "Validation failed for match request: {}", errors);
        return error_response(&MatchError::Validation(errors.to_string()));
    }

    let span = tracing::info_span!("match", %request_id, client_id = %req.client_id);

    async move {
        tracing::info!("Finding matches (override: {})", req.preferences.is_some());

        match state.matches.match_client(&req.client_id, req.preferences).await {
            Ok(matches) => {
                tracing::info!("Returning {} matches", matches.len());
                HttpResponse::Ok().json(MatchResponse::ok(matches))
            }
            Err(e) => {
                tracing::error!("Match request failed: {}", e);
                error_response(&e)
            }
        }
    }
    .instrument(span)
    .await
}

/// Read back the cached ranking for a client
///
/// GET /api/match/{clientId}
async fn get_cached_matches(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let client_id = path.into_inner();
    let client_id = client_id.trim();

    match state.matches.cached_matches(client_id).await {
        Ok(Some(matches)) => HttpResponse::Ok().json(MatchResponse::ok(matches)),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse {
            error: "not_cached".to_string(),
            message: format!("No cached matches for client {}", client_id),
            status_code: 404,
        }),
        Err(e) => {
            tracing::warn!("Failed to read cached matches for {}: {}", client_id, e);
            HttpResponse::ServiceUnavailable().json(ErrorResponse {
                error: "cache_unavailable".to_string(),
                message: e.to_string(),
                status_code: 503,
            })
        }
    }
}
