//! Minimal example: export the account's workout history as JSON.
//!
//! Expects SETGRAPH_EMAIL and SETGRAPH_PASSWORD in the environment
//! (SETGRAPH_BASE_URL optional).

use std::sync::Arc;

use setgraph_client::config::Config;
use setgraph_client::http_client::ReqwestSetgraphClient;
use setgraph_client::{Credentials, ExportService, serialize};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    let credentials = Credentials {
        username_or_email: config.email.clone().ok_or("SETGRAPH_EMAIL missing")?,
        password: config.password.clone().ok_or("SETGRAPH_PASSWORD missing")?,
    };

    let client = ReqwestSetgraphClient::from_config(&config);
    let service = ExportService::new(Arc::new(client));
    let data = service.run(&credentials).await?;

    println!("{}", serialize::to_json(&data)?);
    Ok(())
}
