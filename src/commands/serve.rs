//! Serve command - run the HTTP API

use std::sync::Arc;

use log::warn;

use civicverify::api::AppState;
use civicverify::config::Config;
use civicverify::server::tiny_http;

use super::runtime;

/// Start the HTTP server and block until it stops
pub fn serve(host: &str, port: Option<u16>, config: Config) -> anyhow::Result<()> {
    let port = port.unwrap_or(config.service.port);
    if config.service.api_key.is_none() {
        warn!("No service.api_key configured; /api routes are unauthenticated");
    }

    let runtime = runtime()?;
    let state = Arc::new(AppState::open(config)?);

    println!("Starting civicverify API...");
    println!("Listening on http://{host}:{port}");
    println!();
    println!("Press Ctrl+C to stop");

    tiny_http::serve(state, runtime.handle(), &format!("{host}:{port}"))
}
