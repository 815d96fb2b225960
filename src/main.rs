//! GitHub Runner Token Tool
//!
//! Generates a token to perform a self-hosted runner operation, using a
//! GitHub App to authenticate.
//!
//! ## Usage
//! ```bash
//! # Token for registering a new runner
//! gh-runner-token get-token registration ./key.pem 123456 my-org
//!
//! # Token for removing an existing runner
//! gh-runner-token get-token removal ./key.pem 123456 my-org
//! ```

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use gh_runner_token::{auth, ExchangeError, GitHubClient, TokenType, GITHUB_API};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "gh-runner-token")]
#[command(about = "Generate GitHub Actions self-hosted runner tokens using a GitHub App")]
#[command(version)]
struct Cli {
    /// GitHub API base URL (set for GitHub Enterprise Server hosts)
    #[arg(long, env = "GITHUB_API_URL", default_value = GITHUB_API, global = true)]
    api_url: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a token to perform a self-hosted runner operation
    GetToken {
        /// Type of token to generate
        #[arg(value_enum)]
        token_type: TokenType,

        /// Path to the file containing your GitHub App's private key
        private_key_path: PathBuf,

        /// ID of the GitHub App to be used to generate tokens
        app_id: String,

        /// Name of the GitHub organization to generate tokens for
        org_name: String,
    },
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::GetToken {
            token_type,
            private_key_path,
            app_id,
            org_name,
        } => {
            let private_key = fs::read(&private_key_path).with_context(|| {
                format!("Failed to read private key: {}", private_key_path.display())
            })?;

            debug!("Signing app JWT for App {}", app_id);
            let app_jwt = auth::generate_app_jwt(&app_id, &private_key)?;

            let client = GitHubClient::new(&cli.api_url)?;
            let token = client.runner_token(&app_jwt, &org_name, token_type).await?;

            // The token is the only thing written to stdout.
            println!("{}", token);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries nothing but the token.
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    if let Err(err) = run(cli).await {
        match err.downcast_ref::<ExchangeError>() {
            Some(e) if e.is_org_not_found() => {
                eprintln!(
                    "{}",
                    style("No installation matching that organization ID could be found.").red()
                );
            }
            _ => eprintln!("{} {:#}", style("Error:").red().bold(), err),
        }
        process::exit(1);
    }
}
