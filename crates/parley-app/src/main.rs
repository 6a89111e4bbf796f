mod cli;
mod repl;

use std::process::ExitCode;

use parley_ai::{ChatSession, RemoteBackend, RemoteConfig};
use parley_config::BackendKind;
use tracing_subscriber::EnvFilter;

/// `KEY=VALUE` pairs of a `.env` file, skipping blanks and comments.
fn dotenv_pairs(contents: &str) -> impl Iterator<Item = (&str, &str)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim().trim_matches('"')))
}

/// Fill unset variables (typically `OPENAI_API_KEY`) from `./.env`.
fn load_dotenv() {
    let Ok(contents) = std::fs::read_to_string(".env") else {
        return;
    };
    for (key, value) in dotenv_pairs(&contents) {
        if std::env::var_os(key).is_none() {
            std::env::set_var(key, value);
        }
    }
}

fn init_logging(directive: Option<&str>) {
    let directive = directive.unwrap_or("parley=info");
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| "parley=info".parse().unwrap()),
            ),
        )
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();

    let args = cli::parse();
    init_logging(args.log_level.as_deref());

    tracing::info!("Parley v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    let config = match parley_config::load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Config load failed: {e}");
            eprintln!("parley: {e}");
            return ExitCode::FAILURE;
        }
    };

    if config.backend.kind == BackendKind::Local {
        tracing::error!("Local backend selected but this binary embeds no inference engine");
        eprintln!("parley: the local backend is only available through the library API");
        return ExitCode::FAILURE;
    }

    let backend = match RemoteConfig::from_env(&config.backend).and_then(RemoteBackend::new) {
        Ok(backend) => backend,
        Err(e) => {
            tracing::error!("Backend setup failed: {e}");
            eprintln!("parley: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(model = backend.model(), "Remote backend ready");

    let mut session = ChatSession::new(config, Box::new(backend));
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();

    if let Err(e) = repl::run(&mut session, stdin, &mut stdout).await {
        tracing::error!("I/O error: {e}");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
