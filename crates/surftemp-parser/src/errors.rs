use std::fmt;

use thiserror::Error;

use crate::model::SatelliteSource;

/// A layout the registry tried and why its header did not fit.
/// `reason` is the rendered mismatch error and already names the parser.
#[derive(Debug, Clone)]
pub struct LayoutRejection {
    pub parser: &'static str,
    pub reason: String,
}

impl fmt::Display for LayoutRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

fn list_rejections(rejections: &[LayoutRejection]) -> String {
    rejections
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("{parser}: no column named {expected}")]
    MissingColumn {
        parser: &'static str,
        expected: String,
    },

    #[error("{parser}: file has no header row")]
    MissingHeader { parser: &'static str },

    #[error("{parser}: unreadable CSV: {source}")]
    Csv {
        parser: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{parser}: no data rows below the header")]
    EmptyTable { parser: &'static str },

    #[error("{parser} cannot read {selection} exports")]
    UnsupportedSelection {
        parser: &'static str,
        selection: SatelliteSource,
    },

    #[error("no known layout matched: {}", list_rejections(.rejections))]
    NoMatchingLayout { rejections: Vec<LayoutRejection> },
}

impl ParserError {
    /// The header does not fit this layout; another layout may still read the file.
    pub fn is_layout_mismatch(&self) -> bool {
        matches!(
            self,
            ParserError::MissingColumn { .. } | ParserError::MissingHeader { .. }
        )
    }
}
