use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use todo_web::ServerConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Session-backed todo list service
#[derive(Debug, Parser)]
#[command(name = "todo-web", version)]
struct Cli {
    /// Address to bind (overrides TODO_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides TODO_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Keep sessions as JSON files in this directory (overrides TODO_SESSION_DIR)
    #[arg(long)]
    session_dir: Option<PathBuf>,

    /// Most sessions kept in memory (overrides TODO_SESSION_CAPACITY)
    #[arg(long)]
    session_capacity: Option<usize>,
}

impl Cli {
    fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(dir) = self.session_dir {
            config.session_dir = Some(dir);
        }
        if let Some(capacity) = self.session_capacity.filter(|n| *n > 0) {
            config.session_capacity = capacity;
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_line_number(true)
                .with_file(false),
        )
        .init();

    let config = Cli::parse().apply(ServerConfig::from_env());
    tracing::info!(?config, "Starting standalone todo service...");

    todo_web::server::run(config)
        .await
        .map_err(|e| anyhow!("Failed to run web service: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_env_config() {
        let cli = Cli::parse_from(["todo-web", "--port", "9000", "--session-dir", "/tmp/s"]);
        let config = cli.apply(ServerConfig::default());

        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.session_dir, Some(PathBuf::from("/tmp/s")));
    }

    #[test]
    fn test_cli_session_capacity() {
        let cli = Cli::parse_from(["todo-web", "--session-capacity", "50"]);
        assert_eq!(cli.apply(ServerConfig::default()).session_capacity, 50);

        let cli = Cli::parse_from(["todo-web", "--session-capacity", "0"]);
        let default = ServerConfig::default().session_capacity;
        assert_eq!(cli.apply(ServerConfig::default()).session_capacity, default);
    }
}
