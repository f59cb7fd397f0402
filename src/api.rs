//! HTTP API for a Proofchain node.
//!
//! Exposes the ledger operations to clients and to other nodes. Peers resolve
//! conflicts by reading each other's `GET /chain`.
//!
//! `GET /mine` mutates the ledger even though it is a GET. Every call forges a
//! new block; it is not idempotent.

use axum::{
    extract::{Request, State},
    http::{self, header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::blockchain::Block;
use crate::error::ChainError;
use crate::network::ChainResponse;
use crate::node::Node;
use crate::sync::ResolveOutcome;
use crate::transaction::{NewTransaction, Transaction};

// ============================================================================
// API Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    BlockchainError(ChainError),
    InvalidInput(String),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BlockchainError(e) => {
                let status = match e {
                    ChainError::MissingField(_) | ChainError::InvalidPeerAddress(_) => StatusCode::BAD_REQUEST,
                    ChainError::MiningCancelled => StatusCode::SERVICE_UNAVAILABLE,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.to_string())
            }
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<ChainError> for ApiError {
    fn from(err: ChainError) -> Self {
        ApiError::BlockchainError(err)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: String,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub prev_hash: String,
}

impl From<Block> for MineResponse {
    fn from(block: Block) -> Self {
        MineResponse {
            message: "New block forged".to_string(),
            index: block.index,
            transactions: block.transactions,
            proof: block.proof,
            prev_hash: block.prev_hash,
        }
    }
}

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct RegisterNodesResponse {
    pub message: String,
    pub total_nodes: Vec<String>,
}

/// `new_chain` is set when the local chain was replaced, `chain` when it was kept.
#[derive(Serialize)]
pub struct ResolveResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_chain: Option<Vec<Block>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<Vec<Block>>,
}

impl ResolveResponse {
    fn new(outcome: ResolveOutcome, chain: Vec<Block>) -> Self {
        match outcome {
            ResolveOutcome::Replaced => ResolveResponse {
                message: "Chain was replaced".to_string(),
                new_chain: Some(chain),
                chain: None,
            },
            ResolveOutcome::Kept => ResolveResponse {
                message: "Chain is verified".to_string(),
                new_chain: None,
                chain: Some(chain),
            },
        }
    }
}

#[derive(Serialize)]
struct LivenessResponse {
    message: String,
    node: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Logs method, path, status and duration of every request.
async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        "api.request"
    );

    response
}

// ============================================================================
// API Server
// ============================================================================

pub fn build_api_router(node: Arc<Node>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(vec![
            http::Method::GET,
            http::Method::POST,
            http::Method::OPTIONS,
        ])
        .allow_headers(vec![http::header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/chain", get(get_chain))
        .route("/transactions/new", post(new_transaction))
        .route("/mine", get(mine))
        .route("/nodes/register", post(register_nodes))
        .route("/nodes/resolve", get(resolve_nodes))
        .route("/test", get(liveness))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(node)
        .layer(cors)
}

/// Serve the API on `listener` until `shutdown` completes.
pub async fn run_api_server<F>(node: Arc<Node>, listener: TcpListener, shutdown: F) -> crate::error::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_api_router(node);
    tracing::info!(addr = %listener.local_addr()?, "API server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

// ============================================================================
// Route Handlers
// ============================================================================

async fn get_chain(State(node): State<Arc<Node>>) -> Json<ChainResponse> {
    let chain = node.ledger.chain();
    Json(ChainResponse {
        length: chain.len(),
        chain,
    })
}

async fn new_transaction(
    State(node): State<Arc<Node>>,
    Json(req): Json<NewTransaction>,
) -> Result<impl IntoResponse, ApiError> {
    let tx = req.into_transaction()?;
    let index = node
        .ledger
        .submit_transaction(tx.sender, tx.recipient, tx.amount);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: format!("Transaction will be added to Block {}", index),
        }),
    ))
}

async fn mine(State(node): State<Arc<Node>>) -> Result<Json<MineResponse>, ApiError> {
    let reward = Transaction::reward(node.node_id.clone(), node.config.miner.reward_amount);
    let ledger = node.ledger.clone();

    // Proof-of-work is CPU bound; keep it off the async workers.
    let block = tokio::task::spawn_blocking(move || ledger.mine(reward))
        .await
        .map_err(|e| ApiError::InternalError(format!("Mining task failed: {}", e)))??;

    Ok(Json(MineResponse::from(block)))
}

async fn register_nodes(
    State(node): State<Arc<Node>>,
    Json(req): Json<RegisterNodesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let nodes = req
        .nodes
        .ok_or_else(|| ApiError::InvalidInput("Please supply a valid list of nodes".to_string()))?;

    node.ledger.register_peers(&nodes)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterNodesResponse {
            message: "New nodes have been added".to_string(),
            total_nodes: node.ledger.peers(),
        }),
    ))
}

async fn resolve_nodes(State(node): State<Arc<Node>>) -> Json<ResolveResponse> {
    let outcome = node.ledger.resolve().await;
    Json(ResolveResponse::new(outcome, node.ledger.chain()))
}

async fn liveness(headers: HeaderMap) -> impl IntoResponse {
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    Json(LivenessResponse {
        message: "Node is online".to_string(),
        node: host,
    })
}
