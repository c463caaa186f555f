//! Ward Command Line Interface
//!
//! Usage:
//!   ward start             - Start the policy API server
//!   ward compile           - Compile a policy document and print it

use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use ward_api::{run_server, ApiConfig};
use ward_core::{compile, CompileOptions};
use ward_store::MemoryPolicyStore;

#[derive(Parser)]
#[command(name = "ward")]
#[command(about = "Guardian wallet policy server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Ward API server
    Start {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "0.0.0.0")]
        host: String,
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
        /// Partner id stamped on compiled documents
        #[arg(long, default_value = ward_core::DEFAULT_PARTNER_ID)]
        partner_id: String,
        /// Disable permissive CORS
        #[arg(long)]
        no_cors: bool,
    },

    /// Compile a policy document from flags and print the JSON
    Compile {
        /// Policy display name
        #[arg(long, default_value = "Allowance")]
        name: String,
        /// USD spend cap
        #[arg(long)]
        usd_limit: Option<f64>,
        /// Restrict all activity to Base
        #[arg(long)]
        restrict_to_base: bool,
        /// Recipient allowlist entries (repeatable)
        #[arg(long = "allow")]
        allowed_addresses: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            host,
            port,
            partner_id,
            no_cors,
        } => {
            let config = ApiConfig {
                host,
                port,
                enable_cors: !no_cors,
                partner_id,
            };
            let store = Arc::new(MemoryPolicyStore::new());
            run_server(&config, store).await?;
        }
        Commands::Compile {
            name,
            usd_limit,
            restrict_to_base,
            allowed_addresses,
        } => {
            let options = CompileOptions {
                name,
                usd_limit,
                allowed_addresses: (!allowed_addresses.is_empty()).then_some(allowed_addresses),
                restrict_to_base,
                ..Default::default()
            };
            let document = compile(&options)?;
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }

    Ok(())
}
