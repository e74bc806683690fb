use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use serde_json::json;
use surftemp_core::frame::{daily_averages_to_dataframe, matches_to_dataframe};
use surftemp_core::{CorrelationRun, EngineError, MatchPolicy};
use surftemp_parser::{
    parse_satellite_table, Platform, Product, SatelliteRecord, SatelliteSource, TimeOfDay,
};
use tracing::{info, warn};

use super::{export_frame, read_ground, resolve_config};
use crate::report;

#[derive(Args, Debug)]
pub struct CorrelateArgs {
    /// Satellite export (CSV)
    #[arg(long)]
    pub satellite: PathBuf,
    /// Ground logger export (CSV)
    #[arg(long)]
    pub ground: PathBuf,
    /// modis or landsat
    #[arg(long, default_value = "modis")]
    pub platform: String,
    /// aqua or terra (MODIS only)
    #[arg(long)]
    pub product: Option<String>,
    /// day or night (MODIS only)
    #[arg(long)]
    pub time_of_day: Option<String>,
    /// Engine configuration file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Drop every filter stage, including stages from a configuration file
    #[arg(long)]
    pub unfiltered: bool,
    /// Overrides match_policy (window or nearest)
    #[arg(long)]
    pub policy: Option<String>,
    /// Overrides time_interval_minutes
    #[arg(long)]
    pub interval: Option<i64>,
    /// Write matched pairs to a .csv or .parquet file
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Write daily ground means to a .csv or .parquet file
    #[arg(long)]
    pub daily_output: Option<PathBuf>,
    /// Print the run summary and metrics as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

impl CorrelateArgs {
    fn source(&self) -> Result<SatelliteSource> {
        let platform = Platform::try_from(self.platform.as_str()).map_err(|e| anyhow!(e))?;
        let product = self
            .product
            .as_deref()
            .map(Product::try_from)
            .transpose()
            .map_err(|e| anyhow!(e))?;
        let time_of_day = self
            .time_of_day
            .as_deref()
            .map(TimeOfDay::try_from)
            .transpose()
            .map_err(|e| anyhow!(e))?;
        SatelliteSource::new(platform, product, time_of_day).map_err(|e| anyhow!(e))
    }
}

pub fn handle_correlate(args: CorrelateArgs) -> Result<()> {
    let source = args.source()?;

    let mut config = resolve_config(args.config.as_deref(), args.unfiltered)?;
    if let Some(policy) = args.policy.as_deref() {
        config.match_policy = policy.parse::<MatchPolicy>()?;
    }
    if let Some(minutes) = args.interval {
        config.time_interval_minutes = Some(minutes);
    }
    let run = CorrelationRun::new(config)?;

    let satellite = read_satellite(&args, source)?;
    let ground = read_ground(&args.ground)?;

    let output = run.execute(&satellite, &ground);

    if let Some(path) = args.output.as_deref() {
        let mut df = matches_to_dataframe(&output.matches)?;
        export_frame(&mut df, path)?;
    }
    if let Some(path) = args.daily_output.as_deref() {
        let mut df = daily_averages_to_dataframe(&output.daily_averages)?;
        export_frame(&mut df, path)?;
    }

    let metrics = output.error_metrics();
    let regression = output.regression();

    if args.json {
        let body = json!({
            "source": source.to_string(),
            "summary": output.summary,
            "metrics": metrics.as_ref().ok(),
            "regression": regression,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!("{}", report::matches_table(&output.matches));
        println!("{}", report::summary_table(&output.summary));
        if let Ok(metrics) = &metrics {
            println!("{}", report::metrics_table(metrics, regression.as_ref()));
        }
    }

    match metrics {
        Ok(metrics) => {
            info!(rmse = metrics.rmse, mbe = metrics.mbe, pairs = metrics.count, "correlation complete");
            Ok(())
        }
        Err(EngineError::EmptyMatchSet) => {
            warn!(%source, "no matched pairs");
            Err(anyhow!(
                "no matched pairs for {source}; RMSE and MBE are undefined"
            ))
        }
        Err(err) => Err(err.into()),
    }
}

fn read_satellite(args: &CorrelateArgs, source: SatelliteSource) -> Result<Vec<SatelliteRecord>> {
    let content = fs::read_to_string(&args.satellite)
        .with_context(|| format!("failed to read satellite export {}", args.satellite.display()))?;
    let parsed = parse_satellite_table(&content, source)
        .with_context(|| format!("failed to parse satellite export {}", args.satellite.display()))?;

    for row in &parsed.skipped_rows {
        warn!(line = row.line_index, reason = %row.reason, "skipped satellite row");
    }
    info!(
        parser = parsed.parser,
        rows = parsed.records.len(),
        skipped = parsed.skipped_rows.len(),
        %source,
        "parsed satellite export"
    );
    Ok(parsed.records)
}
