use crate::errors::{LayoutRejection, ParserError};
use crate::formats::{
    CombinedInstantParser, LandsatTableParser, ModisTableParser, SplitColumnsParser,
};
use crate::model::{GroundRecord, ParsedTable, Platform, SatelliteRecord, SatelliteSource};

pub trait TableParser {
    type Record;

    fn name(&self) -> &'static str;
    fn parse(&self, content: &str) -> Result<ParsedTable<Self::Record>, ParserError>;
}

/// Parses a ground logger export, accepting either the split or the combined layout.
pub fn parse_ground_table(content: &str) -> Result<ParsedTable<GroundRecord>, ParserError> {
    let split = SplitColumnsParser;
    let combined = CombinedInstantParser;
    let parsers: [&dyn TableParser<Record = GroundRecord>; 2] = [&split, &combined];
    parse_with_parsers(content, &parsers)
}

/// Parses a satellite export, reading the columns that belong to `source`.
pub fn parse_satellite_table(
    content: &str,
    source: SatelliteSource,
) -> Result<ParsedTable<SatelliteRecord>, ParserError> {
    match source.platform {
        Platform::Modis => {
            let modis = ModisTableParser::new(source)?;
            let parsers: [&dyn TableParser<Record = SatelliteRecord>; 1] = [&modis];
            parse_with_parsers(content, &parsers)
        }
        Platform::Landsat => {
            let landsat = LandsatTableParser;
            let parsers: [&dyn TableParser<Record = SatelliteRecord>; 1] = [&landsat];
            parse_with_parsers(content, &parsers)
        }
    }
}

/// First layout whose header fits wins. Row-level problems never fall through;
/// they end up in `skipped_rows` of the accepted table.
pub fn parse_with_parsers<R>(
    content: &str,
    parsers: &[&dyn TableParser<Record = R>],
) -> Result<ParsedTable<R>, ParserError> {
    let mut rejections = Vec::with_capacity(parsers.len());

    for parser in parsers {
        match parser.parse(content) {
            Ok(parsed) => return Ok(parsed),
            Err(err) if err.is_layout_mismatch() => rejections.push(LayoutRejection {
                parser: parser.name(),
                reason: err.to_string(),
            }),
            Err(err) => return Err(err),
        }
    }

    Err(ParserError::NoMatchingLayout { rejections })
}
