use crate::errors::ParserError;
use crate::model::{
    ParsedTable, Platform, SatelliteRecord, SatelliteSource, SkipReason, SkippedRow,
};
use crate::registry::TableParser;

use super::{field, line_index, parse_cell, read_table, Cell};

/// MODIS LST sample table (MYD11A1 / MOD11A1) with day and night bands side by side.
///
/// Only the band pair matching the configured day/night qualifier is read.
/// Rows whose temperature or view time is empty (cloud-masked pixels) are skipped.
#[derive(Debug, Clone)]
pub struct ModisTableParser {
    source: SatelliteSource,
}

impl ModisTableParser {
    const NAME: &'static str = "MODIS_LST";

    pub fn new(source: SatelliteSource) -> Result<Self, ParserError> {
        if source.platform != Platform::Modis || source.view_time_column().is_none() {
            return Err(ParserError::UnsupportedSelection {
                parser: Self::NAME,
                selection: source,
            });
        }
        Ok(Self { source })
    }
}

impl TableParser for ModisTableParser {
    type Record = SatelliteRecord;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(&self, content: &str) -> Result<ParsedTable<SatelliteRecord>, ParserError> {
        let value_column = self.source.value_column();
        let view_time_column = self
            .source
            .view_time_column()
            .ok_or(ParserError::UnsupportedSelection {
                parser: Self::NAME,
                selection: self.source,
            })?;

        let (header, rows) = read_table(Self::NAME, content)?;
        let date_idx = header.require(Self::NAME, &["date"])?;
        let value_idx = header.require(Self::NAME, &[value_column])?;
        let time_idx = header.require(Self::NAME, &[view_time_column])?;

        let mut records = Vec::with_capacity(rows.len());
        let mut skipped_rows = Vec::new();

        for (idx, row) in rows.iter().enumerate() {
            let line = line_index(idx);
            let date = field(row, date_idx);
            let reading = if date.is_empty() {
                Err(SkipReason::MissingField("date"))
            } else {
                match (
                    parse_cell(field(row, value_idx), value_column),
                    parse_cell(field(row, time_idx), view_time_column),
                ) {
                    (Cell::Invalid(reason), _) | (_, Cell::Invalid(reason)) => Err(reason),
                    (Cell::Empty, _) => Err(SkipReason::MaskedTemperature),
                    (_, Cell::Empty) => Err(SkipReason::MissingField("view time")),
                    (Cell::Number(value), Cell::Number(view_time)) => Ok((value, view_time)),
                }
            };

            match reading {
                Ok((value, view_time)) => records.push(SatelliteRecord {
                    date: date.to_string(),
                    view_time_hours: Some(view_time),
                    value,
                    source: self.source,
                }),
                Err(reason) => skipped_rows.push(SkippedRow {
                    line_index: line,
                    reason,
                }),
            }
        }

        Ok(ParsedTable {
            parser: Self::NAME,
            records,
            skipped_rows,
        })
    }
}
