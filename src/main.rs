// safemind - rule-based mental health support assistant
// Main entry point

use anyhow::Result;
use clap::Parser;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use safemind::cli::Repl;
use safemind::config::{load_config, load_from_path, Config};
use safemind::engine::{ChatPayload, ConversationHistory, EngineProfile, SupportEngine};
use safemind::report::{synthesize, ReportRenderer, TextRenderer};
use safemind::server::SupportServer;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "safemind")]
#[command(about = "Rule-based mental health support assistant", version)]
struct Args {
    /// Run mode
    #[command(subcommand)]
    command: Option<Command>,

    /// Engine profile: support or trauma (overrides config)
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Path to config file (default: ~/.safemind/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
enum Command {
    /// Run HTTP server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Process a single message and print the JSON response
    Query {
        /// Message text
        message: String,
    },
    /// Render a risk report from a saved conversation history
    Report {
        /// Path to a history JSON file
        history: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let config = resolve_config(&args)?;

    match args.command {
        Some(Command::Serve { bind }) => {
            let mut config = config;
            if let Some(bind) = bind {
                config.server.bind_address = bind;
            }
            run_server(config).await
        }
        Some(Command::Query { message }) => run_query(&config, &message),
        Some(Command::Report { history }) => run_report(&config, &history),
        None => {
            // Piped input runs as a single query.
            if !io::stdin().is_terminal() {
                let mut input = String::new();
                io::stdin().read_to_string(&mut input)?;

                if input.trim().is_empty() {
                    return Ok(());
                }
                return run_query(&config, input.trim());
            }

            Repl::new(build_engine(&config)?).run()
        }
    }
}

fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => load_from_path(path)?,
        None => load_config()?,
    };

    if let Some(profile) = &args.profile {
        config.profile = match profile.as_str() {
            "support" => EngineProfile::Support,
            "trauma" => EngineProfile::Trauma,
            other => anyhow::bail!("Unknown profile: {other} (expected support or trauma)"),
        };
    }

    Ok(config)
}

fn build_engine(config: &Config) -> Result<SupportEngine> {
    Ok(SupportEngine::new(config.engine_config()?))
}

async fn run_server(config: Config) -> Result<()> {
    let server = SupportServer::new(&config)?;
    server.serve().await
}

fn run_query(config: &Config, message: &str) -> Result<()> {
    let mut engine = build_engine(config)?;
    let response = engine.get_response(message);
    let payload = ChatPayload::from(&response);
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn run_report(config: &Config, history_path: &PathBuf) -> Result<()> {
    let history = ConversationHistory::load(history_path)?;
    let factors = safemind::screening::FactorState::new();

    let Some(report) = synthesize(config.profile, &history, &factors) else {
        anyhow::bail!("No conversation data available");
    };

    let document = TextRenderer::new().render(&report);
    println!("{document}");

    std::fs::create_dir_all(&config.report_dir)?;
    let filename = format!("report-{}.txt", chrono::Utc::now().format("%Y%m%d-%H%M%S"));
    let path = config.report_dir.join(filename);
    std::fs::write(&path, &document)?;
    eprintln!("Report saved to {}", path.display());

    Ok(())
}

fn init_tracing() {
    // Default: WARN on stderr so replies stay readable; RUST_LOG overrides.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
