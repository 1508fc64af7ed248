use serde::Serialize;

use crate::core::{Category, LibraryStats, ReportLinks, ScanInfo};
use crate::model::{FindingTable, PerLevel};

/// Everything a presentation layer needs for one render, derived from a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub categories: Vec<CategoryView>,
}

impl ReportView {
    pub fn category(&self, category: Category) -> Option<&CategoryView> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn any_threshold_exceeded(&self) -> bool {
        self.categories
            .iter()
            .filter_map(|c| c.section.as_ref())
            .any(|s| s.thresholds.overall_exceeded())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryView {
    pub category: Category,
    pub visible: bool,
    /// Absent when the category is disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<SectionView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub counts: PerLevel<u64>,
    pub total: u64,
    pub bars: Bars,
    pub thresholds: ThresholdView,
    pub tables: Vec<FindingTable>,
    #[serde(skip_serializing_if = "ReportLinks::is_empty")]
    pub links: ReportLinks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_info: Option<ScanInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub libraries: Option<LibraryStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Bars {
    /// Every count is zero; there is nothing to proportion.
    Empty,
    Proportions {
        percent: PerLevel<f64>,
        rounded: PerLevel<u32>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelThreshold {
    pub threshold: Option<u64>,
    pub exceeded: bool,
    /// Height of the threshold line as a percent of the bar. Only set for exceeded levels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ThresholdView {
    NotEvaluated,
    Evaluated {
        overall_exceeded: bool,
        levels: PerLevel<LevelThreshold>,
    },
}

impl ThresholdView {
    pub fn overall_exceeded(&self) -> bool {
        match self {
            ThresholdView::NotEvaluated => false,
            ThresholdView::Evaluated {
                overall_exceeded, ..
            } => *overall_exceeded,
        }
    }
}
