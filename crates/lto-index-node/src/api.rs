//! HTTP read API.
//!
//! Resolution failures are logged with full context here and reported to
//! callers as a generic failure; nothing internal leaks into responses.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;

use lto_index_core::Transaction;
use lto_index_identity::{IdentityError, IdentityResolver};
use lto_index_trust::{AssociationIndexer, TrustNetwork};

use crate::dispatcher::TxDispatcher;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<IdentityResolver>,
    pub trust: Arc<TrustNetwork>,
    pub associations: Arc<AssociationIndexer>,
    pub dispatcher: Arc<TxDispatcher>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

// --- Handlers ---

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

async fn handle_resolve(State(state): State<AppState>, Path(did): Path<String>) -> Response {
    match state.resolver.resolve(&did).await {
        Ok(Some(document)) => (StatusCode::OK, Json(document)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("no DID document for '{did}'"),
            }),
        )
            .into_response(),
        Err(IdentityError::InvalidDid(_)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("invalid DID '{did}'"),
            }),
        )
            .into_response(),
        Err(error) => {
            tracing::error!(%did, %error, "failed to resolve DID");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "failed to get DID document".into(),
                }),
            )
                .into_response()
        }
    }
}

async fn handle_derived_identity(
    State(state): State<AppState>,
    Path((address, secret)): Path<(String, String)>,
) -> Response {
    match state.resolver.get_derived_identity(&address, &secret).await {
        Ok(Some(document)) => (StatusCode::OK, Json(document)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("no DID document for '{address}'"),
            }),
        )
            .into_response(),
        Err(error) => {
            tracing::error!(%address, %error, "failed to resolve derived identity");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "failed to get DID document".into(),
                }),
            )
                .into_response()
        }
    }
}

async fn handle_roles(State(state): State<AppState>, Path(address): Path<String>) -> Response {
    match state.trust.get_roles_for(&address).await {
        Ok(roles) => (StatusCode::OK, Json(roles)).into_response(),
        Err(error) => {
            tracing::error!(%address, %error, "failed to resolve roles");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "failed to get roles".into(),
                }),
            )
                .into_response()
        }
    }
}

async fn handle_associations(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Response {
    match state.associations.get_associations(&address).await {
        Ok(associations) => (StatusCode::OK, Json(associations)).into_response(),
        Err(error) => {
            tracing::error!(%address, %error, "failed to read associations");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "failed to get associations".into(),
                }),
            )
                .into_response()
        }
    }
}

async fn handle_index(State(state): State<AppState>, Json(tx): Json<Transaction>) -> Response {
    match state.dispatcher.index(&tx).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => {
            tracing::error!(id = %tx.id, %error, "failed to index transaction");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "failed to index transaction".into(),
                }),
            )
                .into_response()
        }
    }
}

// --- Server ---

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/identities/{did}", get(handle_resolve))
        .route(
            "/identities/{address}/derived/{secret}",
            get(handle_derived_identity),
        )
        .route("/trust/{address}", get(handle_roles))
        .route("/associations/{address}", get(handle_associations))
        .route("/index", post(handle_index))
        .with_state(state)
}

pub async fn start_api_server(listen_addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(%listen_addr, "read API started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;
    Ok(())
}
