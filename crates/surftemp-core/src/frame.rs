use std::io::Write;

use chrono::{DateTime, NaiveDateTime};
use polars::io::parquet::write::{ParquetCompression, ParquetWriter, StatisticsOptions};
use polars::prelude::{
    Column, CsvWriter, DataFrame, DataType, NamedFrom, SerWriter, Series, TimeUnit,
};

use crate::daily::DailyAverages;
use crate::error::Result;
use crate::types::MatchSet;

/// Output encodings for the tabular hand-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    Csv,
    Parquet,
}

impl FrameFormat {
    /// Picks the format from a file extension; `None` for anything unrecognised.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(FrameFormat::Csv),
            "parquet" | "pq" => Some(FrameFormat::Parquet),
            _ => None,
        }
    }
}

/// One row per matched pair, in match order.
pub fn matches_to_dataframe(matches: &MatchSet) -> Result<DataFrame> {
    let rows = matches.len();
    let mut satellite_time = Vec::with_capacity(rows);
    let mut satellite_value = Vec::with_capacity(rows);
    let mut ground_time = Vec::with_capacity(rows);
    let mut ground_value = Vec::with_capacity(rows);
    let mut difference = Vec::with_capacity(rows);
    let mut offset_seconds = Vec::with_capacity(rows);
    let mut source = Vec::with_capacity(rows);

    for pair in matches {
        satellite_time.push(micros(pair.satellite().timestamp()));
        satellite_value.push(pair.satellite().value());
        ground_time.push(micros(pair.ground().timestamp()));
        ground_value.push(pair.ground().value());
        difference.push(pair.difference());
        offset_seconds.push(pair.offset_seconds());
        source.push(pair.satellite().source().to_string());
    }

    let columns: Vec<Column> = vec![
        datetime_series("satellite_time", satellite_time)?.into(),
        Series::new("satellite_value".into(), satellite_value).into(),
        datetime_series("ground_time", ground_time)?.into(),
        Series::new("ground_value".into(), ground_value).into(),
        Series::new("difference".into(), difference).into(),
        Series::new("offset_seconds".into(), offset_seconds).into(),
        Series::new("source".into(), source).into(),
    ];

    Ok(DataFrame::new(columns)?)
}

pub fn daily_averages_to_dataframe(daily: &DailyAverages) -> Result<DataFrame> {
    let epoch = DateTime::UNIX_EPOCH.date_naive();
    let days: Vec<i32> = daily
        .keys()
        .map(|date| (*date - epoch).num_days() as i32)
        .collect();
    let means: Vec<f64> = daily.values().copied().collect();

    let date = Series::new("date".into(), days).cast(&DataType::Date)?;
    let columns: Vec<Column> = vec![
        date.into(),
        Series::new("mean_value".into(), means).into(),
    ];

    Ok(DataFrame::new(columns)?)
}

pub fn write_frame<W: Write>(df: &mut DataFrame, format: FrameFormat, writer: W) -> Result<()> {
    match format {
        FrameFormat::Csv => {
            CsvWriter::new(writer).include_header(true).finish(df)?;
        }
        FrameFormat::Parquet => {
            ParquetWriter::new(writer)
                .with_compression(ParquetCompression::Zstd(None))
                .with_statistics(StatisticsOptions::default())
                .finish(df)?;
        }
    }
    Ok(())
}

fn micros(ts: NaiveDateTime) -> i64 {
    ts.and_utc().timestamp_micros()
}

fn datetime_series(name: &str, values: Vec<i64>) -> Result<Series> {
    Ok(Series::new(name.into(), values).cast(&DataType::Datetime(TimeUnit::Microseconds, None))?)
}
