use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use surftemp_core::{DailyAverages, ErrorMetrics, MatchSet, RegressionSummary, RunSummary};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn matches_table(matches: &MatchSet) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Satellite time",
        "Satellite",
        "Ground time",
        "Ground",
        "Difference",
        "Source",
    ]);
    for pair in matches {
        table.add_row(vec![
            pair.satellite().timestamp().format(TIME_FORMAT).to_string(),
            format!("{:.2}", pair.satellite().value()),
            pair.ground().timestamp().format(TIME_FORMAT).to_string(),
            format!("{:.2}", pair.ground().value()),
            format!("{:+.2}", pair.difference()),
            pair.satellite().source().to_string(),
        ]);
    }
    table
}

pub fn summary_table(summary: &RunSummary) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Step", "In", "Kept"]);
    table.add_row(vec![
        "satellite rows".to_string(),
        summary.satellite_records.to_string(),
        (summary.satellite_records - summary.satellite_skipped).to_string(),
    ]);
    table.add_row(vec![
        "ground rows".to_string(),
        summary.ground_records.to_string(),
        (summary.ground_records - summary.ground_skipped).to_string(),
    ]);
    for stage in &summary.pre_match_stages {
        table.add_row(vec![
            stage.stage.to_string(),
            stage.input.to_string(),
            stage.kept.to_string(),
        ]);
    }
    table.add_row(vec![
        format!("{} matching", summary.match_policy),
        summary.ground_after_filters.to_string(),
        summary.candidate_pairs.to_string(),
    ]);
    for stage in &summary.post_match_stages {
        table.add_row(vec![
            stage.stage.to_string(),
            stage.input.to_string(),
            stage.kept.to_string(),
        ]);
    }
    table
}

pub fn metrics_table(metrics: &ErrorMetrics, regression: Option<&RegressionSummary>) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["pairs".to_string(), metrics.count.to_string()]);
    table.add_row(vec!["RMSE".to_string(), format!("{:.3}", metrics.rmse)]);
    table.add_row(vec!["MBE".to_string(), format!("{:+.3}", metrics.mbe)]);
    if let Some(fit) = regression {
        table.add_row(vec!["slope".to_string(), format!("{:.3}", fit.slope)]);
        table.add_row(vec!["intercept".to_string(), format!("{:.3}", fit.intercept)]);
        table.add_row(vec!["R²".to_string(), format!("{:.3}", fit.r_squared)]);
    }
    table
}

pub fn daily_table(daily: &DailyAverages) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Date", "Mean"]);
    for (date, mean) in daily {
        table.add_row(vec![date.to_string(), format!("{mean:.2}")]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    #[test]
    fn daily_table_lists_dates_in_order() {
        let mut daily = BTreeMap::new();
        daily.insert(NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(), 19.5);
        daily.insert(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), 21.25);

        let rendered = daily_table(&daily).to_string();
        let first = rendered.find("2020-01-01").unwrap();
        let second = rendered.find("2020-01-02").unwrap();
        assert!(first < second);
        assert!(rendered.contains("21.25"));
    }

    #[test]
    fn metrics_table_includes_regression_when_present() {
        let metrics = ErrorMetrics {
            count: 3,
            rmse: 1.5,
            mbe: -0.25,
        };
        let without = metrics_table(&metrics, None).to_string();
        assert!(without.contains("RMSE"));
        assert!(!without.contains("slope"));

        let fit = RegressionSummary {
            count: 3,
            slope: 0.9,
            intercept: 1.2,
            r_squared: 0.8,
        };
        let with = metrics_table(&metrics, Some(&fit)).to_string();
        assert!(with.contains("slope"));
        assert!(with.contains("-0.250"));
    }
}
