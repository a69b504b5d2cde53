//! Command implementations

mod categories;
mod config;
mod cross_check;
#[cfg(feature = "server")]
mod serve;
mod stats;
mod status;
mod timeline;
mod verify;

use std::io::Read as _;
use std::path::Path;

use anyhow::Context as _;

pub use categories::categories;
pub use config::show_config;
pub use cross_check::cross_check;
#[cfg(feature = "server")]
pub use serve::serve;
pub use stats::stats;
pub use status::status;
pub use timeline::timeline;
pub use verify::verify;

/// Read a request body from a file, or stdin for `-`
fn read_request(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut body = String::new();
        std::io::stdin().read_to_string(&mut body).context("Failed to read request from stdin")?;
        return Ok(body);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read request {}", path.display()))
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}
