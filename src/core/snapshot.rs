use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Category, Finding, SeverityLevel};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeverityBucket {
    pub count: u64,
    #[serde(default)]
    pub threshold: Option<u64>,
    #[serde(default)]
    pub findings: Vec<Finding>,
}

impl SeverityBucket {
    pub fn new(count: u64, threshold: Option<u64>, findings: Vec<Finding>) -> Self {
        Self {
            count,
            threshold,
            findings,
        }
    }
}

/// Report artifact locations. Opaque to this crate; passed through to the view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_pdf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_viewer: Option<String>,
}

impl ReportLinks {
    pub fn is_empty(&self) -> bool {
        self.pdf.is_none()
            && self.html.is_none()
            && self.full_html.is_none()
            && self.full_pdf.is_none()
            && self.code_viewer.is_none()
    }

    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("pdf", &self.pdf),
            ("html", &self.html),
            ("full_html", &self.full_html),
            ("full_pdf", &self.full_pdf),
            ("code_viewer", &self.code_viewer),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.as_deref().map(|v| (k, v)))
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanInfo {
    pub start_date: String,
    pub end_date: String,
    pub files_scanned: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines_of_code: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryStats {
    pub vulnerable: u64,
    pub ok: u64,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySection {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub thresholds_enabled: bool,
    #[serde(default)]
    pub buckets: BTreeMap<SeverityLevel, SeverityBucket>,
    #[serde(default)]
    pub links: ReportLinks,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_info: Option<ScanInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub libraries: Option<LibraryStats>,
}

impl Default for CategorySection {
    fn default() -> Self {
        Self {
            enabled: true,
            thresholds_enabled: false,
            buckets: BTreeMap::new(),
            links: ReportLinks::default(),
            scan_info: None,
            libraries: None,
        }
    }
}

impl CategorySection {
    pub fn bucket(&self, level: SeverityLevel) -> Option<&SeverityBucket> {
        self.buckets.get(&level)
    }
}

/// Caller-supplied scan results for one render. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportSnapshot {
    #[serde(default)]
    pub categories: BTreeMap<Category, CategorySection>,
}

impl ReportSnapshot {
    pub fn section(&self, category: Category) -> Option<&CategorySection> {
        self.categories.get(&category)
    }

    pub fn with_section(mut self, category: Category, section: CategorySection) -> Self {
        self.categories.insert(category, section);
        self
    }

    /// Checks that every bucket's `count` matches the number of findings supplied for it.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        for (category, section) in &self.categories {
            for (level, bucket) in &section.buckets {
                let findings = bucket.findings.len() as u64;
                if bucket.count != findings {
                    return Err(SnapshotError::CountMismatch {
                        category: *category,
                        level: *level,
                        count: bucket.count,
                        findings,
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot: {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot (JSON): {}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse snapshot (TOML): {}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{category}/{level}: count={count} but {findings} findings were supplied")]
    CountMismatch {
        category: Category,
        level: SeverityLevel,
        count: u64,
        findings: u64,
    },
}

/// Reads a snapshot from disk. `.toml` files are parsed as TOML, anything else as JSON.
pub fn load(path: &Path) -> Result<ReportSnapshot, SnapshotError> {
    let s = std::fs::read_to_string(path).map_err(|source| SnapshotError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

    let snapshot = if is_toml {
        parse_toml(&s).map_err(|source| SnapshotError::Toml {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        parse_json(&s).map_err(|source| SnapshotError::Json {
            path: path.to_path_buf(),
            source,
        })?
    };

    snapshot.validate()?;
    Ok(snapshot)
}

pub fn parse_json(s: &str) -> Result<ReportSnapshot, serde_json::Error> {
    serde_json::from_str(s)
}

pub fn parse_toml(s: &str) -> Result<ReportSnapshot, toml::de::Error> {
    toml::from_str(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_json_defaults_enabled_and_thresholds() {
        let snapshot = parse_json(
            r#"{"categories":{"static_analysis":{"buckets":{"high":{"count":0}}}}}"#,
        )
        .expect("parse");
        let section = snapshot.section(Category::StaticAnalysis).expect("section");
        assert!(section.enabled);
        assert!(!section.thresholds_enabled);
        let bucket = section.bucket(SeverityLevel::High).expect("bucket");
        assert_eq!(bucket.threshold, None);
        assert!(bucket.findings.is_empty());
        assert!(section.bucket(SeverityLevel::Low).is_none());
    }

    #[test]
    fn parse_toml_reads_nested_buckets() {
        let snapshot = parse_toml(
            r#"
[categories.open_source_component]
thresholds_enabled = true

[categories.open_source_component.buckets.medium]
count = 1
threshold = 0

[[categories.open_source_component.buckets.medium.findings]]
name = "CVE-2016-0001"
publish_date = "28/06/2016"
library_name = "commons-io"
"#,
        )
        .expect("parse");
        let section = snapshot
            .section(Category::OpenSourceComponent)
            .expect("section");
        let bucket = section.bucket(SeverityLevel::Medium).expect("bucket");
        assert_eq!(bucket.threshold, Some(0));
        assert_eq!(bucket.findings[0].library_name.as_deref(), Some("commons-io"));
    }

    #[test]
    fn validate_rejects_count_that_disagrees_with_findings() {
        let mut section = CategorySection::default();
        section.buckets.insert(
            SeverityLevel::Low,
            SeverityBucket::new(2, None, vec![Finding::static_analysis("XSS", 1)]),
        );
        let snapshot = ReportSnapshot::default().with_section(Category::StaticAnalysis, section);

        let err = snapshot.validate().expect_err("mismatch");
        assert!(matches!(
            err,
            SnapshotError::CountMismatch {
                count: 2,
                findings: 1,
                ..
            }
        ));
    }

    #[test]
    fn links_entries_skip_missing() {
        let links = ReportLinks {
            html: Some("reports/scan.html".to_string()),
            ..ReportLinks::default()
        };
        assert_eq!(links.entries(), vec![("html", "reports/scan.html")]);
        assert!(!links.is_empty());
        assert!(ReportLinks::default().is_empty());
    }
}
