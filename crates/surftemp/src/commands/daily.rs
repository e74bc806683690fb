use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use surftemp_core::frame::daily_averages_to_dataframe;
use surftemp_core::quality_filters::run_series_filters;
use surftemp_core::{daily_averages, DailySource};

use super::{export_frame, read_ground, resolve_config};
use crate::report;

#[derive(Args, Debug)]
pub struct DailyArgs {
    /// Ground logger export (CSV)
    #[arg(long)]
    pub ground: PathBuf,
    /// Engine configuration file (TOML); decides rounding, daily source and pre-match filters
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Write the daily means to a .csv or .parquet file
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub fn handle_daily(args: DailyArgs) -> Result<()> {
    let config = resolve_config(args.config.as_deref(), false)?;
    config.validate()?;

    let records = read_ground(&args.ground)?;
    let normalized = config.normalizer().normalize_ground(&records);

    let daily = match config.daily_source {
        DailySource::Raw => daily_averages(&normalized.series),
        DailySource::Filtered => {
            let (filtered, _) = run_series_filters(&config.pre_match_filters, normalized.series);
            daily_averages(&filtered)
        }
    };

    if let Some(path) = args.output.as_deref() {
        let mut df = daily_averages_to_dataframe(&daily)?;
        export_frame(&mut df, path)?;
    }

    println!("{}", report::daily_table(&daily));
    Ok(())
}
