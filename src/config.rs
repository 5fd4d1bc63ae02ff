// src/config.rs
//! Configuration: the YAML config file plus command-line input.

use crate::error::AppError;
use crate::types::ShortcodeTarget;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CACHE_FILE: &str = ".notion2md-cache.json";

/// The `notion` section: which database to read and how status is tracked.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotionSection {
    pub database_id: String,
    /// Select property used both for query filtering and status updates.
    pub filter_prop: String,
    pub filter_value: Vec<String>,
    /// Value the status property is flipped to after generation. Empty
    /// disables status updates.
    pub published_value: String,
}

/// The `markdown` section: where and how articles are written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkdownSection {
    /// hugo, hexo, or vuepress; empty disables extended syntax.
    pub shortcode_syntax: String,
    pub page_name_prefix: String,
    pub post_save_path: String,
    pub image_save_path: String,
    pub image_public_link: String,
    pub group_by_month: bool,
    /// Optional Handlebars template applied to the rendered body.
    pub template: Option<PathBuf>,
}

impl MarkdownSection {
    /// The validated shortcode target. [`SyncConfig::load`] rejects unknown
    /// names, so an unparseable value here degrades to no target.
    pub fn shortcode_target(&self) -> ShortcodeTarget {
        ShortcodeTarget::parse(&self.shortcode_syntax).unwrap_or(ShortcodeTarget::None)
    }
}

/// The full sync configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncConfig {
    pub notion: NotionSection,
    pub markdown: MarkdownSection,
    /// Render pages concurrently.
    pub parallelize: bool,
    /// Number of concurrent page pipelines; 0 forces serial mode.
    pub parallelism: usize,
    pub cache_file: String,
    /// Skip pages unchanged since the cached run.
    pub incremental: bool,
}

impl SyncConfig {
    /// Loads and validates the YAML config file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)?;
        let config: SyncConfig =
            serde_yaml::from_str(&content).map_err(|source| AppError::InvalidConfig {
                path: path.display().to_string(),
                source,
            })?;

        if config.notion.database_id.is_empty() {
            return Err(AppError::MissingConfiguration(
                "notion.databaseId is required".to_string(),
            ));
        }
        // Reject unknown shortcode names up front instead of rendering
        // nothing for extended blocks later.
        ShortcodeTarget::parse(&config.markdown.shortcode_syntax)?;

        Ok(config)
    }

    /// The cache file path, defaulting next to the working directory.
    pub fn cache_file(&self) -> &str {
        if self.cache_file.is_empty() {
            DEFAULT_CACHE_FILE
        } else {
            &self.cache_file
        }
    }
}

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about = "A markdown generator for Notion databases", long_about = None)]
pub struct CommandLineInput {
    /// Keyword filters; a page is processed only if its title contains
    /// every keyword (case-insensitive)
    pub keywords: Vec<String>,

    /// Config file path
    #[arg(long, default_value = "notion2md.yaml")]
    pub config: PathBuf,

    /// Enable parallel processing of pages
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    pub parallelize: bool,

    /// Number of concurrent page pipelines (0 forces serial mode)
    #[arg(short = 'j', long, default_value_t = 5)]
    pub parallelism: usize,

    /// Process only pages modified since this date (YYYYMMDD or
    /// YYYYMMDD-HH.MM.SS)
    #[arg(long)]
    pub since: Option<String>,

    /// List matching pages without writing files, cache, or statuses
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Parses the `--since` flag's compact timestamp formats. `None` means the
/// value did not parse and the flag should be ignored.
pub fn parse_since(raw: &str) -> Option<DateTime<Utc>> {
    const LAYOUT_LONG: &str = "%Y%m%d-%H.%M.%S";
    const LAYOUT_SHORT: &str = "%Y%m%d";

    NaiveDateTime::parse_from_str(raw, LAYOUT_LONG)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, LAYOUT_SHORT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn yaml_config_binds_camel_case_keys() {
        let yaml = r#"
notion:
  databaseId: 216cd41285338087a989cf37889137c3
  filterProp: Status
  filterValue:
    - Finished
    - Published
  publishedValue: Published
markdown:
  shortcodeSyntax: vuepress
  postSavePath: posts/notion
  imageSavePath: static/images/notion
  imagePublicLink: /images/notion
  groupByMonth: true
parallelize: true
parallelism: 4
cacheFile: .cache/state.json
incremental: true
"#;
        let config: SyncConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.notion.filter_prop, "Status");
        assert_eq!(config.notion.filter_value.len(), 2);
        assert_eq!(
            config.markdown.shortcode_target(),
            crate::types::ShortcodeTarget::Vuepress
        );
        assert!(config.markdown.group_by_month);
        assert_eq!(config.parallelism, 4);
        assert_eq!(config.cache_file(), ".cache/state.json");
        assert!(config.incremental);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: SyncConfig = serde_yaml::from_str("notion:\n  databaseId: abc\n").unwrap();
        assert!(!config.parallelize);
        assert_eq!(config.parallelism, 0);
        assert!(!config.incremental);
        assert_eq!(config.cache_file(), DEFAULT_CACHE_FILE);
        assert_eq!(
            config.markdown.shortcode_target(),
            crate::types::ShortcodeTarget::None
        );
    }

    #[test]
    fn load_rejects_unknown_shortcode_syntax() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notion2md.yaml");
        std::fs::write(
            &path,
            "notion:\n  databaseId: abc\nmarkdown:\n  shortcodeSyntax: jekyll\n",
        )
        .unwrap();
        assert!(SyncConfig::load(&path).is_err());
    }

    #[test]
    fn load_requires_a_database_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notion2md.yaml");
        std::fs::write(&path, "parallelize: true\n").unwrap();
        assert!(matches!(
            SyncConfig::load(&path),
            Err(AppError::MissingConfiguration(_))
        ));
    }

    #[test]
    fn since_parses_both_layouts_and_rejects_garbage() {
        assert_eq!(
            parse_since("20240305").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_since("20240305-13.45.10").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 5, 13, 45, 10).unwrap()
        );
        assert!(parse_since("yesterday").is_none());
    }
}
