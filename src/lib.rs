pub mod cli;
pub mod config;
pub mod display;
pub mod filter;
pub mod url_state;

use anyhow::{Context, bail};
use std::io::Read;
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub use cli::{ColorMode, Commands, OutputFormat, cli_parse};
pub use config::{CodecConfig, load_config};
pub use filter::{
    DomainTables, FilterCodecError, FilterDescriptor, deserialize, effective_selections, escape,
    serialize, unescape,
};
pub use url_state::{AddressBar, HistoryMode, UrlFilterCodec, UrlState};

/// Install the stderr log subscriber. `RUST_LOG` wins over the CLI flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Read a descriptor list from a JSON/JSON5 file, or stdin when no path is given
fn read_descriptors(path: Option<&Path>) -> anyhow::Result<Vec<FilterDescriptor>> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read descriptor file '{}'", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read descriptors from stdin")?;
            buf
        }
    };

    json5::from_str(&raw).map_err(|e| anyhow::anyhow!("Invalid descriptor list: {e}"))
}

fn write_output_file(path: &Path, content: &str) -> anyhow::Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write output file '{}'", path.display()))
}

fn emit(output: Option<&Path>, text: &str) -> anyhow::Result<()> {
    print!("{text}");
    if let Some(path) = output {
        write_output_file(path, text)?;
    }
    Ok(())
}

pub fn run() -> anyhow::Result<()> {
    let cli = cli_parse();
    init_tracing(cli.verbose, cli.quiet);
    cli.color.apply();

    let config = load_config(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(config_path) = &cli.config {
        tracing::info!(path = %config_path.display(), "loaded config");
    }
    let output = cli.output.as_deref();

    match &cli.command {
        Commands::Encode { input, url } => {
            let descriptors = read_descriptors(input.as_deref())?;
            let encoded = match url {
                Some(href) => {
                    let mut bar = AddressBar::new(href.clone());
                    UrlFilterCodec::from_config(&config).write(&mut bar, Some(&descriptors))?;
                    bar.href().to_string()
                }
                None => serialize(&descriptors, &config.domain)?,
            };

            let text = match cli.format {
                OutputFormat::Text => format!("{encoded}\n"),
                OutputFormat::Json => {
                    let key = if url.is_some() { "url" } else { "filter" };
                    let mut body = serde_json::Map::new();
                    body.insert(key.to_string(), serde_json::Value::String(encoded));
                    format!("{}\n", serde_json::to_string_pretty(&body)?)
                }
            };
            emit(output, &text)?;
        }
        Commands::Decode { filter, url } => {
            let descriptors = match (filter, url) {
                (Some(filter), _) => deserialize(filter, &config.domain)?,
                (None, Some(href)) => {
                    let codec = UrlFilterCodec::from_config(&config);
                    codec
                        .read(&AddressBar::new(href.clone()))
                        .unwrap_or_else(|| {
                            tracing::info!(param = codec.param_name(), "no filter stored in url");
                            Vec::new()
                        })
                }
                (None, None) => bail!("Either a filter string or --url is required"),
            };

            let text = match cli.format {
                OutputFormat::Text => display::format_descriptors_text(&descriptors),
                OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&descriptors)?),
            };
            emit(output, &text)?;
        }
        Commands::Check { input } => {
            let descriptors = read_descriptors(input.as_deref())?;
            let encoded = serialize(&descriptors, &config.domain)?;
            let decoded = deserialize(&encoded, &config.domain)?;
            let before = effective_selections(&descriptors, &config.domain)?;
            let after = effective_selections(&decoded, &config.domain)?;
            let preserved = before == after;

            let text = match cli.format {
                OutputFormat::Text if preserved => format!("Round trip OK: {encoded}\n"),
                OutputFormat::Text => format!(
                    "Round trip changed the filter: {encoded}\n{}",
                    display::selection_diff(&before, &after)
                ),
                OutputFormat::Json => format!(
                    "{}\n",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "filter": encoded,
                        "preserved": preserved,
                        "before": before,
                        "after": after,
                    }))?
                ),
            };
            emit(output, &text)?;

            if !preserved {
                bail!("Round trip did not preserve the effective filter");
            }
        }
    }

    Ok(())
}
