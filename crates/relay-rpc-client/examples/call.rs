//! # JSON-RPC Call Demo
//!
//! Sends a call, a notification and a batch to a JSON-RPC 2.0 endpoint and
//! reports what came back.
//!
//! ## Usage
//! ```bash
//! RUST_LOG=debug cargo run --example call -- --url http://127.0.0.1:8080/rpc --method start
//! ```
//!
//! ## Equivalent Curl Command
//! ```bash
//! curl -X POST http://127.0.0.1:8080/rpc \
//!   -H "Content-Type: application/json; charset=UTF-8" \
//!   -d '{"jsonrpc":"2.0","method":"start","id":"<uuid>","params":{"apiKey":"demo"}}'
//! ```

use anyhow::Result;
use clap::Parser;
use relay_rpc_client::{Batch, ClientConfig, JsonRpcClient, Request, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Target JSON-RPC endpoint
    #[arg(short, long)]
    url: String,

    /// Method to call
    #[arg(short, long, default_value = "ping")]
    method: String,

    /// Parameters as key=value pairs
    #[arg(short, long = "param")]
    params: Vec<String>,

    /// Request timeout in seconds
    #[arg(short, long, default_value = "30")]
    timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = ClientConfig::default().with_request_timeout(Duration::from_secs(args.timeout));
    config.logging.log_requests = true;
    config.logging.log_responses = true;

    let client = JsonRpcClient::builder()
        .endpoint(args.url.as_str())
        .config(config)
        .build()?;

    let params = args
        .params
        .iter()
        .filter_map(|pair| pair.split_once('='));

    let call = Request::builder()
        .method(args.method.as_str())
        .params(params.clone())
        .build();
    info!("Calling {} on {}", call.method(), client.endpoint());
    report(client.send::<Value>(&call).await?);

    let notification = Request::notification_builder()
        .method(args.method.as_str())
        .params(params)
        .build();
    match client.send::<Value>(&notification).await? {
        None => info!("Notification accepted"),
        Some(response) => report(Some(response)),
    }

    let batch = Batch::combine(vec![call.clone(), Request::builder().method("ping").build(), notification]);
    let responses = client.send_batch::<Value>(&batch).await?;
    info!("Batch of {} produced {} responses", batch.len(), responses.len());
    for response in responses {
        report(Some(response));
    }

    let stats = client.statistics();
    info!(
        "Requests sent: {}, average response time: {:.1} ms",
        stats.requests_sent, stats.avg_response_time_ms
    );

    Ok(())
}

fn report(response: Option<Response<Value>>) {
    let Some(response) = response else {
        return;
    };

    let id = response.id.clone();
    match response.into_result() {
        Ok(result) => info!(id = ?id, "Result: {}", result),
        Err(e) => warn!(id = ?id, "Error: {}", e),
    }
}
