use crate::errors::ParserError;
use crate::model::{GroundRecord, ParsedTable, SkipReason, SkippedRow};
use crate::registry::TableParser;

use super::{field, line_index, parse_cell, read_table, Cell};

const DATE_ALIASES: &[&str] = &["date", "day"];
const TIME_ALIASES: &[&str] = &["time", "clock"];
const INSTANT_ALIASES: &[&str] = &["datetime", "timestamp", "instant", "date_time"];
const VALUE_ALIASES: &[&str] = &["value", "temperature", "temp", "temp_c", "t"];

/// Logger export with separate `date` and `time` columns, as written by the
/// field spreadsheet template.
pub struct SplitColumnsParser;

impl Default for SplitColumnsParser {
    fn default() -> Self {
        Self
    }
}

impl SplitColumnsParser {
    const NAME: &'static str = "GROUND_SPLIT_COLUMNS";
}

impl TableParser for SplitColumnsParser {
    type Record = GroundRecord;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(&self, content: &str) -> Result<ParsedTable<GroundRecord>, ParserError> {
        let (header, rows) = read_table(Self::NAME, content)?;
        let date_idx = header.require(Self::NAME, DATE_ALIASES)?;
        let time_idx = header.require(Self::NAME, TIME_ALIASES)?;
        let value_idx = header.require(Self::NAME, VALUE_ALIASES)?;

        let mut records = Vec::with_capacity(rows.len());
        let mut skipped_rows = Vec::new();

        for (idx, row) in rows.iter().enumerate() {
            let line = line_index(idx);
            let date = field(row, date_idx);
            let time = field(row, time_idx);
            if date.is_empty() || time.is_empty() {
                skipped_rows.push(SkippedRow {
                    line_index: line,
                    reason: SkipReason::MissingField("date or time"),
                });
                continue;
            }

            match parse_cell(field(row, value_idx), "value") {
                Cell::Number(value) => records.push(GroundRecord::new(format!("{date} {time}"), value)),
                Cell::Empty => skipped_rows.push(SkippedRow {
                    line_index: line,
                    reason: SkipReason::MissingField("value"),
                }),
                Cell::Invalid(reason) => skipped_rows.push(SkippedRow {
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

/// Logger export with a single combined date-time column.
pub struct CombinedInstantParser;

impl Default for CombinedInstantParser {
    fn default() -> Self {
        Self
    }
}

impl CombinedInstantParser {
    const NAME: &'static str = "GROUND_COMBINED_INSTANT";
}

impl TableParser for CombinedInstantParser {
    type Record = GroundRecord;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(&self, content: &str) -> Result<ParsedTable<GroundRecord>, ParserError> {
        let (header, rows) = read_table(Self::NAME, content)?;
        let instant_idx = header.require(Self::NAME, INSTANT_ALIASES)?;
        let value_idx = header.require(Self::NAME, VALUE_ALIASES)?;

        let mut records = Vec::with_capacity(rows.len());
        let mut skipped_rows = Vec::new();

        for (idx, row) in rows.iter().enumerate() {
            let line = line_index(idx);
            let instant = field(row, instant_idx);
            if instant.is_empty() {
                skipped_rows.push(SkippedRow {
                    line_index: line,
                    reason: SkipReason::MissingField("timestamp"),
                });
                continue;
            }

            match parse_cell(field(row, value_idx), "value") {
                Cell::Number(value) => records.push(GroundRecord::new(instant, value)),
                Cell::Empty => skipped_rows.push(SkippedRow {
                    line_index: line,
                    reason: SkipReason::MissingField("value"),
                }),
                Cell::Invalid(reason) => skipped_rows.push(SkippedRow {
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
