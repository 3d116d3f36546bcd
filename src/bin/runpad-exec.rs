use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use clap::Parser;
use tokio::sync::RwLock;

#[path = "runpad_exec/cors.rs"]
mod cors;
#[path = "runpad_exec/handlers.rs"]
mod handlers;
#[path = "runpad_exec/http_error.rs"]
mod http_error;
#[path = "runpad_exec/jobs.rs"]
mod jobs;

use self::jobs::Job;

#[derive(Parser)]
#[command(name = "runpad-exec")]
#[command(about = "Local command executor for runpad", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8090")]
    addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    /// Max commands running at once (0 = unlimited)
    #[arg(short = 'c', long, default_value_t = 0)]
    concurrent: usize,

    /// Additional allowed commands (repeatable)
    #[arg(long = "allow", value_name = "COMMAND")]
    allow: Vec<String>,
}

/// Commands runnable without an explicit `--allow` flag.
const DEFAULT_ALLOW: &[&str] = &["echo", "cowsay"];

#[derive(Clone)]
struct AppState {
    allow: Arc<HashSet<String>>,
    max_concurrent: usize,
    jobs: Arc<RwLock<HashMap<String, Job>>>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    let mut allow: HashSet<String> = DEFAULT_ALLOW.iter().map(|s| s.to_string()).collect();
    allow.extend(args.allow.iter().cloned());

    let state = AppState {
        allow: Arc::new(allow),
        max_concurrent: args.concurrent,
        jobs: Arc::new(RwLock::new(HashMap::new())),
    };

    let app = Router::new()
        .route(
            "/",
            post(handlers::run_command).options(handlers::preflight),
        )
        .route("/status", get(handlers::status).options(handlers::preflight))
        .layer(middleware::from_fn(cors::allow_all))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;
    let local_addr = listener.local_addr().context("read listener local addr")?;
    eprintln!("runpad-exec listening on {}", local_addr);

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
