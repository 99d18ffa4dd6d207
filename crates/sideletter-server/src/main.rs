//! Side Letter Server CLI
//!
//! Starts the HTTP API for the Side Letter research partner.

use sideletter_server::{config::ServiceConfig, start_server, ServerError};
use std::env;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // A missing .env file is normal in production
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        ServiceConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        ServiceConfig::default()
    };

    start_server(config.with_env_overrides()?).await
}

fn print_help() {
    println!("Side Letter Server - Research Partner API");
    println!();
    println!("USAGE:");
    println!("    sideletter-server [--config <path-to-config.toml>]");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    RAGIE_API_KEY      Retrieval API key");
    println!("    OPENAI_API_KEY     Generation API key");
    println!("    PORT               Overrides bind_port");
    println!("    RUST_LOG           Log filter (default: info)");
    println!();
    println!("CONFIGURATION:");
    println!("    Every setting is optional. The TOML config file may contain:");
    println!("    - bind_address, bind_port (default 0.0.0.0:5000)");
    println!("    - system_prompt_path (default system_prompt.md)");
    println!("    - log_capacity (default 1000)");
    println!("    - [pipeline] top_k, rerank, backend_timeout_ms");
    println!("    - [retrieval] base_url, timeout_secs");
    println!("    - [generation] base_url, model, temperature, max_tokens, timeout_secs");
    println!();
}
