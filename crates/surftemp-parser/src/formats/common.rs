use csv::{ReaderBuilder, StringRecord, Trim};

use crate::errors::ParserError;
use crate::model::SkipReason;

/// Lower-cased, trimmed header names with a lookup by alias.
#[derive(Debug, Clone)]
pub(crate) struct HeaderIndex {
    names: Vec<String>,
}

impl HeaderIndex {
    pub fn from_record(header: &StringRecord) -> Self {
        let names = header
            .iter()
            .map(|name| name.trim_start_matches('\u{feff}').trim().to_ascii_lowercase())
            .collect();
        Self { names }
    }

    pub fn find(&self, aliases: &[&str]) -> Option<usize> {
        aliases.iter().find_map(|alias| {
            let alias = alias.to_ascii_lowercase();
            self.names.iter().position(|name| *name == alias)
        })
    }

    pub fn require(&self, parser: &'static str, aliases: &[&str]) -> Result<usize, ParserError> {
        self.find(aliases).ok_or_else(|| ParserError::MissingColumn {
            parser,
            expected: aliases.join("/"),
        })
    }
}

/// Reads a headed CSV table fully into memory.
pub(crate) fn read_table(
    parser: &'static str,
    content: &str,
) -> Result<(HeaderIndex, Vec<StringRecord>), ParserError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let header = reader
        .headers()
        .map_err(|source| ParserError::Csv { parser, source })?
        .clone();

    if header.is_empty() {
        return Err(ParserError::MissingHeader { parser });
    }

    let rows = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| ParserError::Csv { parser, source })?;

    if rows.is_empty() {
        return Err(ParserError::EmptyTable { parser });
    }

    Ok((HeaderIndex::from_record(&header), rows))
}

/// Header occupies line 1, so data row `idx` sits on line `idx + 2`.
pub(crate) fn line_index(row_idx: usize) -> usize {
    row_idx + 2
}

pub(crate) fn field(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or_default().trim()
}

/// A numeric cell as read from one data row.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Number(f64),
    /// Blank or an explicit no-data token.
    Empty,
    Invalid(SkipReason),
}

pub(crate) fn parse_cell(value: &str, column: &str) -> Cell {
    let trimmed = value.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("none")
    {
        return Cell::Empty;
    }

    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => Cell::Number(number),
        _ => Cell::Invalid(SkipReason::NotANumber {
            column: column.to_string(),
            value: trimmed.to_string(),
        }),
    }
}
