//! Subcommand handlers.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context as _};
use serde::Serialize;
use tracing::{info, warn};

use expander_cdp::{select_page, CdpClient, CdpPage, PageSelection};
use expander_config::{Config, ConfigLoader, ConfigValidator};
use expander_core::{EngineError, ExpansionEngine, ExpansionResult, ProgressSink};

use crate::cli::{Cli, Commands, TargetArgs};

/// Exit status for an interrupted process.
const INTERRUPTED: i32 = 130;

pub(crate) async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    match cli.command {
        Commands::Expand(args) => expand(&config, &args).await,
        Commands::Quick(args) => quick(&config, &args).await,
        Commands::Pages => pages(&config).await,
    }
}

/// Load, override and validate the configuration.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let path = ConfigLoader::expand_path(&path.to_string_lossy());
            ConfigLoader::load(Path::new(&path))?
        }
        None => ConfigLoader::load_or_default(&Config::default_path())?,
    };

    if let Some(endpoint) = &cli.endpoint {
        config.browser.endpoint = endpoint.clone();
    }

    for warning in ConfigValidator::validate(&config).into_result()? {
        warn!(path = %warning.path, "{}", warning.message);
    }
    Ok(config)
}

/// Connect and attach to the tab to expand.
///
/// `Ok(None)` when no tab qualifies. The client must outlive the page.
async fn attach(
    config: &Config,
    target: Option<&str>,
) -> anyhow::Result<Option<(CdpClient, CdpPage)>> {
    let client = CdpClient::connect(&config.browser.endpoint).await?;
    let pages = client.list_pages().await?;

    let info = match select_page(&pages, &config.browser.url_filter, target) {
        PageSelection::Found(info) => info,
        PageSelection::FilterMismatch(info) => bail!(
            "Not a Reddit page: {} does not contain \"{}\"",
            info.url,
            config.browser.url_filter
        ),
        PageSelection::NoMatch => {
            info!("No matching page");
            return Ok(None);
        }
    };

    info!(target = %info.id, url = %info.url, "Attaching to page");
    let session = client
        .attach_page(&info.id)
        .await
        .with_context(|| format!("attaching to {}", info.url))?;
    Ok(Some((client, CdpPage::new(session))))
}

fn engine(config: &Config, page: CdpPage) -> anyhow::Result<ExpansionEngine<CdpPage>> {
    Ok(ExpansionEngine::new(
        Arc::new(page),
        config.engine.clone(),
        &config.scanner,
    )?)
}

async fn expand(config: &Config, args: &TargetArgs) -> anyhow::Result<()> {
    let Some((_client, page)) = attach(config, args.target.as_deref()).await? else {
        return Ok(());
    };
    let engine = engine(config, page)?;

    let progress: ProgressSink = Arc::new(|message: &str| eprintln!("{}", message));
    let run = engine.start(Some(progress));
    tokio::pin!(run);

    let outcome = tokio::select! {
        outcome = &mut run => outcome,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received, stopping");
            engine.stop();
            tokio::select! {
                outcome = &mut run => outcome,
                _ = tokio::signal::ctrl_c() => {
                    warn!("Second interrupt, exiting");
                    std::process::exit(INTERRUPTED);
                }
            }
        }
    };

    match outcome {
        Ok(result) => print_run(&result, args.json),
        Err(e) => print_error(&e, args.json),
    }
}

async fn quick(config: &Config, args: &TargetArgs) -> anyhow::Result<()> {
    let Some((_client, page)) = attach(config, args.target.as_deref()).await? else {
        return Ok(());
    };
    let engine = engine(config, page)?;

    match engine.quick_expand().await {
        Ok(result) => {
            if args.json {
                print_json(&result)
            } else {
                println!("Done! Expanded {} items", result.expanded_count);
                Ok(())
            }
        }
        Err(e) => print_error(&e, args.json),
    }
}

async fn pages(config: &Config) -> anyhow::Result<()> {
    let client = CdpClient::connect(&config.browser.endpoint).await?;
    let pages = client.list_pages().await?;
    let filter = &config.browser.url_filter;

    for page in pages.iter().filter(|p| p.is_page()) {
        let marker = if page.url.contains(filter.as_str()) { "*" } else { " " };
        println!("{} {}  {}", marker, page.id, page.url);
    }
    Ok(())
}

fn print_run(result: &ExpansionResult, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(result);
    }
    println!("{}", run_summary(result));
    Ok(())
}

fn run_summary(result: &ExpansionResult) -> String {
    if result.aborted {
        format!("Stopped. Expanded {} items", result.expanded_count)
    } else {
        format!("Done! Expanded {} items", result.expanded_count)
    }
}

/// Report an engine error. `AlreadyRunning` is an outcome, not a failure.
fn print_error(error: &EngineError, json: bool) -> anyhow::Result<()> {
    match error {
        EngineError::AlreadyRunning if json => {
            print_json(&serde_json::json!({ "error": error.to_string() }))
        }
        EngineError::AlreadyRunning => {
            println!("{}", error);
            Ok(())
        }
        EngineError::Page(e) => bail!("{}", e),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
