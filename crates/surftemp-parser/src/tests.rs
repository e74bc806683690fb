use std::fs;
use std::path::PathBuf;

use crate::errors::ParserError;
use crate::formats::{CombinedInstantParser, SplitColumnsParser};
use crate::model::{Platform, Product, SatelliteSource, SkipReason, TimeOfDay};
use crate::registry::TableParser;
use crate::{parse_ground_table, parse_satellite_table};

fn fixture(path: &str) -> String {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let full_path = base.join("tests/data").join(path);
    fs::read_to_string(&full_path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {}", full_path.display(), err))
}

#[test]
fn parses_split_ground_layout() {
    let content = fixture("ground_split.csv");
    let parsed = parse_ground_table(&content).expect("split ground parse failed");

    assert_eq!(parsed.parser, "GROUND_SPLIT_COLUMNS");
    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed.records[0].instant, "2020-01-01 08:58:00");
    assert!((parsed.records[0].value - 21.0).abs() < 1e-9);
    assert_eq!(parsed.records[2].instant, "2020-01-02 09:00:00");

    assert_eq!(parsed.skipped_rows.len(), 1);
    assert_eq!(parsed.skipped_rows[0].line_index, 4);
    assert_eq!(parsed.skipped_rows[0].reason, SkipReason::MissingField("value"));
    assert_eq!(parsed.skipped_rows[0].reason.to_string(), "missing value");
}

#[test]
fn registry_falls_through_to_combined_layout() {
    let content = fixture("ground_combined.csv");
    let parsed = parse_ground_table(&content).expect("combined ground parse failed");

    assert_eq!(parsed.parser, "GROUND_COMBINED_INSTANT");
    let values: Vec<f64> = parsed.records.iter().map(|r| r.value).collect();
    assert_eq!(values, vec![20.0, 21.0, 100.0, 22.0]);
    assert_eq!(parsed.records[3].instant, "2020-01-01 09:15:00");
    assert!(parsed.skipped_rows.is_empty());
}

#[test]
fn split_parser_rejects_combined_layout() {
    let content = fixture("ground_combined.csv");
    let err = SplitColumnsParser
        .parse(&content)
        .expect_err("split parser should not accept combined layout");
    match err {
        ParserError::MissingColumn { parser, expected } => {
            assert_eq!(parser, "GROUND_SPLIT_COLUMNS");
            assert_eq!(expected, "date/day");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_ground_layout_lists_every_attempt() {
    let content = "when,reading\n2020-01-01,3.0\n";
    let err = parse_ground_table(content).expect_err("layout should not be recognized");

    match err {
        ParserError::NoMatchingLayout { rejections } => {
            assert_eq!(rejections.len(), 2);
            assert_eq!(rejections[0].parser, "GROUND_SPLIT_COLUMNS");
            assert_eq!(rejections[1].parser, "GROUND_COMBINED_INSTANT");
            assert!(rejections[1].reason.contains("datetime/timestamp"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn non_numeric_value_skips_only_that_row() {
    let content = "datetime,value\n\
        2020-01-01 00:00:00,20.5\n\
        2020-01-01 00:05:00,warm\n\
        2020-01-01 00:10:00,21.0\n";
    let parsed = CombinedInstantParser
        .parse(content)
        .expect("a bad cell must not fail the table");

    let values: Vec<f64> = parsed.records.iter().map(|r| r.value).collect();
    assert_eq!(values, vec![20.5, 21.0]);
    assert_eq!(parsed.skipped_rows.len(), 1);
    assert_eq!(parsed.skipped_rows[0].line_index, 3);
    assert_eq!(
        parsed.skipped_rows[0].reason,
        SkipReason::NotANumber {
            column: "value".to_string(),
            value: "warm".to_string(),
        }
    );
}

#[test]
fn split_layout_skips_unparsable_and_infinite_values() {
    let content = "date,time,value\n\
        2020-01-01,09:00:00,abc\n\
        2020-01-01,09:05:00,inf\n\
        2020-01-01,09:10:00,19.5\n";
    let parsed = parse_ground_table(content).expect("split parse");

    assert_eq!(parsed.parser, "GROUND_SPLIT_COLUMNS");
    assert_eq!(parsed.len(), 1);
    let lines: Vec<usize> = parsed.skipped_rows.iter().map(|row| row.line_index).collect();
    assert_eq!(lines, vec![2, 3]);
    assert!(parsed
        .skipped_rows
        .iter()
        .all(|row| matches!(row.reason, SkipReason::NotANumber { .. })));
}

#[test]
fn modis_bad_cells_are_skipped_with_column_name() {
    let content = "LST_Day_1km,Day_view_time,date\n\
        21.0,9.5,2020-01-01\n\
        n/a,10.0,2020-01-02\n\
        22.0,noon,2020-01-03\n\
        23.0,,2020-01-04\n";
    let source = SatelliteSource::modis(Product::Terra, TimeOfDay::Day);
    let parsed = parse_satellite_table(content, source).expect("modis parse");

    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed.records[0].view_time_hours, Some(9.5));

    let reasons: Vec<String> = parsed.skipped_rows.iter().map(|row| row.reason.to_string()).collect();
    assert_eq!(
        reasons,
        vec![
            "column 'LST_Day_1km' holds non-numeric value 'n/a'".to_string(),
            "column 'Day_view_time' holds non-numeric value 'noon'".to_string(),
            "missing view time".to_string(),
        ]
    );
}

#[test]
fn landsat_bad_temperature_is_skipped() {
    let content = "date,ST_B10\n2020-01-01,22.4\n2020-01-17,--\n";
    let parsed =
        parse_satellite_table(content, SatelliteSource::landsat()).expect("landsat parse");

    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed.skipped_rows[0].line_index, 3);
    assert!(matches!(
        &parsed.skipped_rows[0].reason,
        SkipReason::NotANumber { column, .. } if column == "ST_B10"
    ));
}

#[test]
fn header_only_file_is_an_empty_table() {
    let err = parse_ground_table("date,time,value\n").expect_err("no rows");
    assert!(matches!(err, ParserError::EmptyTable { .. }));
}

#[test]
fn modis_day_selection_reads_day_bands() {
    let content = fixture("modis_aqua.csv");
    let source = SatelliteSource::modis(Product::Aqua, TimeOfDay::Day);
    let parsed = parse_satellite_table(&content, source).expect("modis day parse failed");

    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed.records[0].date, "2020-01-01");
    assert_eq!(parsed.records[0].view_time_hours, Some(9.0));
    assert!((parsed.records[0].value - 21.5).abs() < 1e-9);
    assert_eq!(parsed.records[1].view_time_hours, Some(13.25));
    assert_eq!(parsed.records[1].source, source);

    assert_eq!(parsed.skipped_rows.len(), 1);
    assert_eq!(parsed.skipped_rows[0].reason, SkipReason::MaskedTemperature);
}

#[test]
fn modis_night_selection_reads_night_bands() {
    let content = fixture("modis_aqua.csv");
    let source = SatelliteSource::modis(Product::Aqua, TimeOfDay::Night);
    let parsed = parse_satellite_table(&content, source).expect("modis night parse failed");

    let values: Vec<f64> = parsed.records.iter().map(|r| r.value).collect();
    assert_eq!(values, vec![12.1, 11.8]);
    assert_eq!(parsed.records[1].view_time_hours, Some(22.0));
    assert_eq!(parsed.skipped_rows[0].line_index, 4);
}

#[test]
fn landsat_rows_have_no_view_time() {
    let content = fixture("landsat.csv");
    let parsed =
        parse_satellite_table(&content, SatelliteSource::landsat()).expect("landsat parse failed");

    assert_eq!(parsed.len(), 2);
    assert!(parsed.records.iter().all(|r| r.view_time_hours.is_none()));
    assert_eq!(parsed.records[1].date, "2020-02-02");
    assert_eq!(parsed.skipped_rows.len(), 1);
}

#[test]
fn landsat_export_is_not_a_modis_table() {
    let content = fixture("landsat.csv");
    let source = SatelliteSource::modis(Product::Terra, TimeOfDay::Day);
    let err = parse_satellite_table(&content, source).expect_err("columns are missing");
    assert!(matches!(err, ParserError::NoMatchingLayout { .. }));
}

#[test]
fn satellite_source_validates_qualifiers() {
    assert!(SatelliteSource::new(Platform::Modis, Some(Product::Aqua), None).is_err());
    assert!(SatelliteSource::new(Platform::Modis, None, Some(TimeOfDay::Day)).is_err());
    assert!(SatelliteSource::new(Platform::Landsat, Some(Product::Terra), None).is_err());

    let landsat = SatelliteSource::new(Platform::Landsat, None, None).expect("landsat");
    assert_eq!(landsat.value_column(), "ST_B10");
    assert_eq!(landsat.view_time_column(), None);

    let night = SatelliteSource::new(Platform::Modis, Some(Product::Terra), Some(TimeOfDay::Night))
        .expect("modis night");
    assert_eq!(night.value_column(), "LST_Night_1km");
    assert_eq!(night.view_time_column(), Some("Night_view_time"));
    assert_eq!(night.to_string(), "MODIS Terra Night");
}

#[test]
fn qualifier_names_parse_case_insensitively() {
    assert_eq!(Platform::try_from("MODIS"), Ok(Platform::Modis));
    assert_eq!(Product::try_from(" Aqua "), Ok(Product::Aqua));
    assert_eq!(TimeOfDay::try_from("Night"), Ok(TimeOfDay::Night));
    assert!(Platform::try_from("sentinel").is_err());
}

#[test]
fn modis_parser_refuses_landsat_selection() {
    let err = crate::formats::ModisTableParser::new(SatelliteSource::landsat())
        .expect_err("landsat has no MODIS bands");
    match err {
        ParserError::UnsupportedSelection { parser, selection } => {
            assert_eq!(parser, "MODIS_LST");
            assert_eq!(selection, SatelliteSource::landsat());
        }
        other => panic!("unexpected error: {other}"),
    }
}
