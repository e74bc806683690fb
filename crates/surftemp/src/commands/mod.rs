pub mod correlate;
pub mod daily;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use surftemp_core::frame::{write_frame, FrameFormat};
use surftemp_core::EngineConfig;
use surftemp_parser::{parse_ground_table, GroundRecord};
use tracing::{info, warn};

pub const CONFIG_ENV: &str = "SURFTEMP_CONFIG";

/// `--config`, then `SURFTEMP_CONFIG`, then the built-in defaults.
pub fn resolve_config(explicit: Option<&Path>, unfiltered: bool) -> Result<EngineConfig> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
    load_config(path.as_deref(), unfiltered)
}

/// `unfiltered` empties both stage lists, whether or not a file was given.
fn load_config(path: Option<&Path>, unfiltered: bool) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => EngineConfig::default(),
    };

    if unfiltered {
        if !config.pre_match_filters.is_empty() || !config.post_match_filters.is_empty() {
            info!("--unfiltered drops the configured filter stages");
        }
        config.pre_match_filters.clear();
        config.post_match_filters.clear();
    }
    Ok(config)
}

pub fn read_ground(path: &Path) -> Result<Vec<GroundRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read ground export {}", path.display()))?;
    let parsed = parse_ground_table(&content)
        .with_context(|| format!("failed to parse ground export {}", path.display()))?;

    for row in &parsed.skipped_rows {
        warn!(line = row.line_index, reason = %row.reason, "skipped ground row");
    }
    info!(
        parser = parsed.parser,
        rows = parsed.records.len(),
        skipped = parsed.skipped_rows.len(),
        "parsed ground export"
    );
    Ok(parsed.records)
}

pub fn export_frame(df: &mut polars::prelude::DataFrame, path: &Path) -> Result<()> {
    let format = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(FrameFormat::from_extension)
        .ok_or_else(|| anyhow!("{} must end in .csv or .parquet", path.display()))?;

    let file = fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_frame(df, format, file)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), rows = df.height(), "wrote export");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use surftemp_core::MatchPolicy;

    fn write_temp_config(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("surftemp-{}-{name}.toml", std::process::id()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn unfiltered_without_file_matches_unfiltered_defaults() {
        let config = load_config(None, true).unwrap();
        assert_eq!(config, EngineConfig::unfiltered());
        assert_eq!(load_config(None, false).unwrap(), EngineConfig::default());
    }

    #[test]
    fn unfiltered_clears_stages_from_file() {
        let path = write_temp_config(
            "stages",
            r#"
            match_policy = "nearest"

            [[pre_match_filters]]
            kind = "three_sigma"

            [[post_match_filters]]
            kind = "pairwise_difference"
            "#,
        );

        let kept = load_config(Some(&path), false).unwrap();
        assert_eq!(kept.pre_match_filters.len(), 1);
        assert_eq!(kept.post_match_filters.len(), 1);

        let cleared = load_config(Some(&path), true).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(cleared.match_policy, MatchPolicy::Nearest);
        assert!(cleared.pre_match_filters.is_empty());
        assert!(cleared.post_match_filters.is_empty());
    }
}
