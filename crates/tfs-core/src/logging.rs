use crate::{errors::Error, Result};

/// Initialize tracing for the server.
///
/// Logs go to stderr: stdout is reserved for MCP protocol frames.
pub fn init(service_name: &str) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    // Default: info for our crates, warn for everything else.
    // Can be overridden with `RUST_LOG`.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(service_name)));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .try_init()
        .map_err(|e| Error::Config(format!("failed to init logging: {e}")))
}

/// `service_name` is the binary name; tracing targets use underscores.
fn default_directives(service_name: &str) -> String {
    format!(
        "warn,tfs_core=info,tfs_telegram=info,{}=info",
        service_name.replace('-', "_")
    )
}
