use super::args::{Cli, Commands};
use super::handlers;
use crate::presentation::ConsoleRenderer;
use crate::types::LogLevel;
use anyhow::{Context, Result};
use casetree_engine::{DisplayState, ExplorerConfig, LoadStatus};
use casetree_types::{FetchError, FetchResult};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// The payload itself reported a failed fetch.
#[derive(Debug)]
pub struct FetchFailed(pub FetchError);

impl fmt::Display for FetchFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display_message())
    }
}

impl std::error::Error for FetchFailed {}

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.log_level);

    let config = match &cli.config {
        Some(path) => ExplorerConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ExplorerConfig::default(),
    };
    let renderer = ConsoleRenderer::new(cli.format);

    match cli.command {
        Commands::Show {
            payload,
            columns,
            collapsed,
        } => {
            let config = match columns {
                Some(columns) => ExplorerConfig {
                    default_columns: columns,
                    ..config
                },
                None => config,
            };
            let state = load_state(&config, &payload)?;
            handlers::show::handle(state, collapsed, &renderer)
        }

        Commands::Catalog => handlers::catalog::handle(&renderer),

        Commands::Configure {
            payload,
            add,
            remove,
            rename,
            set_field,
            preserve_expansion,
        } => {
            let state = load_state(&config, &payload)?;
            let request = handlers::configure::ConfigureRequest {
                add,
                remove,
                rename,
                set_field,
                preserve_expansion,
            };
            handlers::configure::handle(state, request, &renderer)
        }
    }
}

fn init_logging(level: LogLevel) {
    // A second init (e.g. in tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Read a payload, feed it to a fresh display state, and surface a fetch
/// error as [`FetchFailed`].
fn load_state(config: &ExplorerConfig, payload: &Path) -> Result<DisplayState> {
    let input = read_payload(payload)?;
    let result = FetchResult::from_json_str(&input)
        .with_context(|| format!("Invalid payload in {}", payload.display()))?;

    let mut state = DisplayState::from_config(config);
    state.receive(result);

    if let LoadStatus::Failed { .. } = state.status()
        && let Some(error) = state.error()
    {
        return Err(FetchFailed(error.clone()).into());
    }

    Ok(state)
}

fn read_payload(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read payload from stdin")?;
        return Ok(input);
    }

    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read payload {}", path.display()))
}
