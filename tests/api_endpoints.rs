//! Integration tests for the Proofchain HTTP endpoints
//!
//! These drive the router in-process and check status codes and JSON shapes
//! for every endpoint, including the client-error paths.

use axum_test::TestServer;
use proofchain::api::build_api_router;
use proofchain::blockchain::{is_valid, Block};
use proofchain::config::Config;
use proofchain::ledger::Ledger;
use proofchain::node::Node;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

fn test_node() -> Arc<Node> {
    let ledger = Ledger::with_http_client(Duration::from_millis(500)).expect("Failed to build ledger");
    Arc::new(Node::with_ledger(Config::default(), Arc::new(ledger)))
}

fn test_server(node: Arc<Node>) -> TestServer {
    TestServer::new(build_api_router(node)).expect("Failed to create test server")
}

#[tokio::test]
async fn test_chain_starts_with_genesis() {
    let server = test_server(test_node());

    let response = server.get("/chain").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["length"], 1);
    assert_eq!(json["chain"][0]["index"], 1);
    assert_eq!(json["chain"][0]["proof"], 100);
    assert_eq!(json["chain"][0]["prev_hash"], "1");
    assert!(json["chain"][0]["timestamp"].is_f64());
    assert!(json["chain"][0]["transactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_transaction() {
    let node = test_node();
    let server = test_server(node.clone());

    let response = server
        .post("/transactions/new")
        .json(&json!({ "sender": "A", "recipient": "B", "amount": 5 }))
        .await;
    assert_eq!(response.status_code(), 201);
    let json: Value = response.json();
    assert_eq!(json["message"], "Transaction will be added to Block 2");
    assert_eq!(node.ledger.pending_transactions().len(), 1);
}

#[tokio::test]
async fn test_submit_transaction_missing_field() {
    let node = test_node();
    let server = test_server(node.clone());

    let response = server
        .post("/transactions/new")
        .json(&json!({ "sender": "A", "amount": 5 }))
        .await;
    assert_eq!(response.status_code(), 400);
    let json: Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("recipient"));
    assert!(node.ledger.pending_transactions().is_empty());
}

#[tokio::test]
async fn test_mine_includes_pending_and_reward() {
    let node = test_node();
    let server = test_server(node.clone());

    server
        .post("/transactions/new")
        .json(&json!({ "sender": "A", "recipient": "B", "amount": 5 }))
        .await;

    let response = server.get("/mine").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["message"], "New block forged");
    assert_eq!(json["index"], 2);
    assert!(json["proof"].is_u64());
    assert_eq!(json["prev_hash"].as_str().unwrap().len(), 64);

    let txs = json["transactions"].as_array().unwrap();
    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0]["sender"], "A");
    assert_eq!(txs[1]["sender"], "0");
    assert_eq!(txs[1]["recipient"], node.node_id.as_str());
    assert_eq!(txs[1]["amount"], 1.0);

    assert!(node.ledger.pending_transactions().is_empty());

    let json: Value = server.get("/chain").await.json();
    assert_eq!(json["length"], 2);
    let chain: Vec<Block> = serde_json::from_value(json["chain"].clone()).unwrap();
    assert!(is_valid(&chain));
}

#[tokio::test]
async fn test_register_nodes() {
    let server = test_server(test_node());

    let response = server
        .post("/nodes/register")
        .json(&json!({ "nodes": ["http://192.168.0.5:5000", "http://192.168.0.5:5000/", "192.168.0.6:5000"] }))
        .await;
    assert_eq!(response.status_code(), 201);
    let json: Value = response.json();
    assert_eq!(json["message"], "New nodes have been added");
    assert_eq!(json["total_nodes"], json!(["192.168.0.5:5000", "192.168.0.6:5000"]));
}

#[tokio::test]
async fn test_register_nodes_missing_list() {
    let node = test_node();
    let server = test_server(node.clone());

    let response = server.post("/nodes/register").json(&json!({})).await;
    assert_eq!(response.status_code(), 400);
    let json: Value = response.json();
    assert!(json["error"].is_string());

    let response = server
        .post("/nodes/register")
        .json(&json!({ "nodes": ["http://ok:1", "http://"] }))
        .await;
    assert_eq!(response.status_code(), 400);
    assert!(node.ledger.peers().is_empty());
}

#[tokio::test]
async fn test_resolve_without_peers_keeps_chain() {
    let server = test_server(test_node());

    let response = server.get("/nodes/resolve").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["message"], "Chain is verified");
    assert_eq!(json["chain"].as_array().unwrap().len(), 1);
    assert!(json.get("new_chain").is_none());
}

#[tokio::test]
async fn test_resolve_skips_unreachable_peer() {
    let node = test_node();
    // Nothing listens on port 1 of the loopback interface.
    node.ledger.register_peer("http://127.0.0.1:1").unwrap();
    let server = test_server(node);

    let response = server.get("/nodes/resolve").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["message"], "Chain is verified");
}

#[tokio::test]
async fn test_liveness() {
    let server = test_server(test_node());

    let response = server.get("/test").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["message"], "Node is online");
    assert!(json["node"].is_string());
}
