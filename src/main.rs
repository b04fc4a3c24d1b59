use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use pr_reviewer::connector::api::{Container, ContainerConfig, Router};
use pr_reviewer::connector::http::{self, ServerConfig};
use pr_reviewer::{Commands, OutputFormat};

#[derive(Parser)]
#[command(name = "pr-reviewer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(
        short,
        long,
        global = true,
        env = "PR_REVIEWER_DATA_DIR",
        default_value = "~/.pr-reviewer"
    )]
    data_dir: String,

    /// Keep state in memory only; everything is lost on exit
    #[arg(long, global = true)]
    memory_storage: bool,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let container = Container::new(ContainerConfig {
        data_dir: expand_tilde(&cli.data_dir),
        memory_storage: cli.memory_storage,
    })?;

    if let Commands::Serve {
        addr,
        request_timeout_secs,
    } = cli.command
    {
        let addr: SocketAddr = addr
            .parse()
            .with_context(|| format!("Invalid listen address '{}'", addr))?;
        if container.memory_storage() {
            info!("Serving with in-memory storage");
        } else {
            info!("Serving with data dir {}", container.data_dir());
        }
        return http::serve(
            Arc::new(container),
            ServerConfig {
                addr,
                request_timeout: Duration::from_secs(request_timeout_secs),
            },
        )
        .await;
    }

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let router = Router::new(&container, format);
    let output = router.route(cli.command).await?;
    println!("{}", output);

    Ok(())
}

fn expand_tilde(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            if path == "~" {
                return home.to_string_lossy().to_string();
            }
            return path.replacen("~", &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}
