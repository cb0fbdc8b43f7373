// Copyright 2026 Variant Split Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use variant_split::cli;
use variant_split::config::{self, ConfigOverrides};
use variant_split::logging;

#[derive(Parser)]
#[command(
    name = "variant-split",
    about = "Variant Split — sticky A/B content splitting at the edge",
    version,
    after_help = "Run 'variant-split <command> --help' for details on each command.\nRun 'variant-split' with no command to start the server with defaults."
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines (also VARIANT_SPLIT_LOG_JSON=1)
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the A/B edge handler over HTTP
    Serve {
        /// Listen address (host:port)
        #[arg(long)]
        bind: Option<String>,
        /// Variants API endpoint
        #[arg(long)]
        variants_url: Option<String>,
        /// Content table JSON file (defaults to the built-in table)
        #[arg(long)]
        content: Option<PathBuf>,
        /// Upstream request timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Rewrite a local HTML file with a variant's copy and print it
    Rewrite {
        /// Variant URL (key in the content table)
        variant: String,
        /// HTML file to rewrite
        html: PathBuf,
        /// Content table JSON file (defaults to the built-in table)
        #[arg(long)]
        content: Option<PathBuf>,
    },
    /// List the variants in the content table
    Variants {
        /// Content table JSON file (defaults to the built-in table)
        #[arg(long)]
        content: Option<PathBuf>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_json = cli.log_json || config::env_flag(config::ENV_LOG_JSON);
    logging::init(&cli.log_level, log_json);

    let result = match cli.command {
        None => cli::serve::run(ConfigOverrides::default()).await,
        Some(Commands::Serve {
            bind,
            variants_url,
            content,
            timeout_ms,
        }) => {
            cli::serve::run(ConfigOverrides {
                bind,
                variants_url,
                content,
                timeout_ms,
            })
            .await
        }
        Some(Commands::Rewrite {
            variant,
            html,
            content,
        }) => cli::rewrite_cmd::run(&variant, &html, content),
        Some(Commands::Variants { content, json }) => cli::variants_cmd::run(content, json),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "variant-split", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = &result {
        eprintln!("  Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
