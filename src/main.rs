use std::io::{self, IsTerminal, Read};

use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "jp-content-analyzer",
    version,
    about = "Translate Japanese text or articles and extract JLPT-tiered vocabulary"
)]
struct Cli {
    /// Japanese text or a URL to analyze (falls back to stdin)
    input: Option<String>,

    /// API key (overrides OPENAI_API_KEY)
    #[arg(short = 'k', long = "key")]
    key: Option<String>,

    /// Chat-completion model name
    #[arg(short = 'm', long = "model")]
    model: Option<String>,

    /// Read extra settings from a local TOML file
    #[arg(short = 'r', long = "read-settings")]
    read_settings: Option<String>,

    /// Directory to write per-tier vocabulary CSV files into
    #[arg(long = "out-dir")]
    out_dir: Option<String>,

    /// Run the JSON API server on this address (e.g. 127.0.0.1:8787)
    #[arg(long = "serve")]
    serve: Option<String>,

    /// Serve the browser client page on this address (e.g. 127.0.0.1:8788)
    #[arg(long = "client")]
    client: Option<String>,

    /// API base URL the client page talks to
    #[arg(long = "api-base", default_value = "http://127.0.0.1:8787")]
    api_base: String,

    /// Enable verbose logging
    #[arg(long = "verbose")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    jp_content_analyzer::logging::init(cli.verbose)?;

    if let Some(addr) = cli.serve {
        let settings_path = cli.read_settings.as_deref().map(std::path::Path::new);
        let settings = jp_content_analyzer::settings::load_settings(settings_path)?;
        return jp_content_analyzer::server::run_server(settings, addr).await;
    }
    if let Some(addr) = cli.client {
        return jp_content_analyzer::server::run_client(addr, cli.api_base).await;
    }

    let input = match cli.input {
        Some(value) => Some(value),
        None => {
            if io::stdin().is_terminal() {
                None
            } else {
                let mut buffer = String::new();
                io::stdin().read_to_string(&mut buffer)?;
                Some(buffer.trim_end_matches('\n').to_string())
            }
        }
    };

    let output = jp_content_analyzer::run(
        jp_content_analyzer::Config {
            key: cli.key,
            model: cli.model,
            settings_path: cli.read_settings,
            out_dir: cli.out_dir,
            verbose: cli.verbose,
        },
        input,
    )
    .await?;

    println!("{}", output);
    Ok(())
}
