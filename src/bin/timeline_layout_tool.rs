use std::fs;
use std::path::{Path, PathBuf};

use timeline_rs::api::{TimelineEngine, TimelineEngineConfig};
use timeline_rs::core::Dataset;
use tracing::warn;

const USAGE: &str = "usage: timeline_layout_tool --dataset <path> --width <px> [--config <path>] [--zoom <factor>] [--scroll <px>] [--output <path>]";

#[derive(Debug)]
struct CliArgs {
    dataset: PathBuf,
    config: Option<PathBuf>,
    width: f64,
    zoom: Option<f64>,
    scroll: Option<f64>,
    output: Option<PathBuf>,
}

fn main() {
    let _ = timeline_rs::telemetry::init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => TimelineEngineConfig::from_json_str(&read(path)?)
            .map_err(|err| format!("invalid config `{}`: {err}", path.display()))?,
        None => TimelineEngineConfig::default(),
    };
    let mut engine = TimelineEngine::new(config, args.width).map_err(|err| err.to_string())?;

    // An unreadable dataset renders as "no data"; a malformed one is an error.
    match read(&args.dataset) {
        Ok(raw) => {
            let dataset = Dataset::from_json_str(&raw)
                .map_err(|err| format!("invalid dataset `{}`: {err}", args.dataset.display()))?;
            engine.set_dataset(dataset).map_err(|err| err.to_string())?;
        }
        Err(err) => warn!(error = %err, "dataset unavailable; emitting empty layout"),
    }

    if let Some(zoom) = args.zoom {
        engine.set_zoom(zoom).map_err(|err| err.to_string())?;
    }
    if let Some(scroll) = args.scroll {
        engine
            .set_scroll_offset(scroll)
            .map_err(|err| err.to_string())?;
    }

    let json = engine
        .layout()
        .and_then(|layout| layout.to_json_contract_v1_pretty())
        .map_err(|err| err.to_string())?;
    match &args.output {
        Some(path) => fs::write(path, format!("{json}\n"))
            .map_err(|err| format!("failed to write `{}`: {err}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|err| format!("failed to read `{}`: {err}", path.display()))
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);

    let mut dataset = None::<PathBuf>;
    let mut config = None::<PathBuf>;
    let mut width = None::<f64>;
    let mut zoom = None::<f64>;
    let mut scroll = None::<f64>;
    let mut output = None::<PathBuf>;

    while let Some(flag) = args.next() {
        let mut value = || {
            args.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        };
        match flag.as_str() {
            "--dataset" => dataset = Some(PathBuf::from(value()?)),
            "--config" => config = Some(PathBuf::from(value()?)),
            "--output" => output = Some(PathBuf::from(value()?)),
            "--width" => width = Some(parse_number("--width", &value()?)?),
            "--zoom" => zoom = Some(parse_number("--zoom", &value()?)?),
            "--scroll" => scroll = Some(parse_number("--scroll", &value()?)?),
            "--help" | "-h" => return Err(USAGE.to_owned()),
            _ => return Err(format!("unknown argument `{flag}`\n{USAGE}")),
        }
    }

    Ok(CliArgs {
        dataset: dataset.ok_or_else(|| format!("missing --dataset\n{USAGE}"))?,
        config,
        width: width.ok_or_else(|| format!("missing --width\n{USAGE}"))?,
        zoom,
        scroll,
        output,
    })
}

fn parse_number(flag: &str, raw: &str) -> Result<f64, String> {
    raw.parse::<f64>()
        .map_err(|err| format!("invalid value `{raw}` for {flag}: {err}"))
}
