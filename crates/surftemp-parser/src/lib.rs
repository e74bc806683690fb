pub mod errors;
pub mod formats;
pub mod model;
mod registry;

pub use errors::{LayoutRejection, ParserError};
pub use model::{
    GroundRecord, ParsedTable, Platform, Product, SatelliteRecord, SatelliteSource, SkipReason,
    SkippedRow, TimeOfDay,
};
pub use registry::{parse_ground_table, parse_satellite_table, parse_with_parsers, TableParser};

#[cfg(test)]
mod tests;
