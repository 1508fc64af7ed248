use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::Category;
use crate::model::ReportView;

#[derive(Debug, Serialize)]
struct RenderLog {
    schema_version: &'static str,
    tool_version: String,
    command: &'static str,
    started_at: String,
    finished_at: String,
    input: String,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    categories: Vec<RenderLogCategory>,
}

#[derive(Debug, Serialize)]
struct RenderLogCategory {
    category: Category,
    visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    total: Option<u64>,
    threshold_exceeded: bool,
}

/// What a render run ended with.
#[derive(Debug)]
pub enum RenderOutcome<'a> {
    Rendered(&'a ReportView),
    Failed(&'a anyhow::Error),
}

pub fn logs_dir(home_dir: &Path) -> PathBuf {
    crate::config::config_dir(home_dir).join("logs")
}

pub fn write_render_log(
    home_dir: &Path,
    command: &'static str,
    started_at: OffsetDateTime,
    finished_at: OffsetDateTime,
    input: &Path,
    outcome: RenderOutcome<'_>,
) -> Result<PathBuf> {
    let dir = logs_dir(home_dir);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory: {}", dir.display()))?;

    let pid = std::process::id();
    let ts = finished_at.unix_timestamp_nanos();
    let file_name = format!("render-{pid}-{ts}.json");
    let path = dir.join(file_name);

    let (status, error, categories) = match outcome {
        RenderOutcome::Rendered(view) => {
            let status = if view.any_threshold_exceeded() {
                "threshold_exceeded"
            } else {
                "ok"
            };
            let categories = view
                .categories
                .iter()
                .map(|c| RenderLogCategory {
                    category: c.category,
                    visible: c.visible,
                    total: c.section.as_ref().map(|s| s.total),
                    threshold_exceeded: c
                        .section
                        .as_ref()
                        .is_some_and(|s| s.thresholds.overall_exceeded()),
                })
                .collect();
            (status.to_string(), None, categories)
        }
        RenderOutcome::Failed(err) => ("error".to_string(), Some(format!("{err:#}")), vec![]),
    };

    let log = RenderLog {
        schema_version: "1.0",
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        command,
        started_at: started_at
            .format(&Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string()),
        finished_at: finished_at
            .format(&Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string()),
        input: mask_home(input, home_dir),
        status,
        error,
        categories,
    };

    let buf = serde_json::to_vec_pretty(&log).context("failed to serialize log (JSON)")?;
    std::fs::write(&path, buf)
        .with_context(|| format!("failed to write log: {}", path.display()))?;
    Ok(path)
}

fn mask_home(path: &Path, home_dir: &Path) -> String {
    if let Ok(rest) = path.strip_prefix(home_dir) {
        if rest.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~/{}", rest.display());
    }
    path.display().to_string()
}
