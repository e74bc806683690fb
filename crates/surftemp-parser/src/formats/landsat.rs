use crate::errors::ParserError;
use crate::model::{ParsedTable, SatelliteRecord, SatelliteSource, SkipReason, SkippedRow};
use crate::registry::TableParser;

use super::{field, line_index, parse_cell, read_table, Cell};

/// Landsat 8 Collection 2 L2 sample table. Carries a date but no overpass time.
pub struct LandsatTableParser;

impl Default for LandsatTableParser {
    fn default() -> Self {
        Self
    }
}

impl LandsatTableParser {
    const NAME: &'static str = "LANDSAT_ST";
}

impl TableParser for LandsatTableParser {
    type Record = SatelliteRecord;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(&self, content: &str) -> Result<ParsedTable<SatelliteRecord>, ParserError> {
        let source = SatelliteSource::landsat();
        let value_column = source.value_column();

        let (header, rows) = read_table(Self::NAME, content)?;
        let date_idx = header.require(Self::NAME, &["date"])?;
        let value_idx = header.require(Self::NAME, &[value_column])?;

        let mut records = Vec::with_capacity(rows.len());
        let mut skipped_rows = Vec::new();

        for (idx, row) in rows.iter().enumerate() {
            let line = line_index(idx);
            let date = field(row, date_idx);
            let reason = match parse_cell(field(row, value_idx), value_column) {
                Cell::Number(value) if !date.is_empty() => {
                    records.push(SatelliteRecord {
                        date: date.to_string(),
                        view_time_hours: None,
                        value,
                        source,
                    });
                    continue;
                }
                Cell::Number(_) => SkipReason::MissingField("date"),
                Cell::Empty => SkipReason::MaskedTemperature,
                Cell::Invalid(reason) => reason,
            };
            skipped_rows.push(SkippedRow {
                line_index: line,
                reason,
            });
        }

        Ok(ParsedTable {
            parser: Self::NAME,
            records,
            skipped_rows,
        })
    }
}
