//! Derived report views: bar geometry, threshold status and finding tables.
//!
//! Every operation reads the snapshot and nothing else. Callers decide what to do with
//! the all-zero and disabled cases; the model only reports them.

mod error;
mod levels;
mod table;
mod view;

use serde::Serialize;

use crate::core::{Category, CategorySection, ReportSnapshot, SeverityBucket, SeverityLevel};

pub use error::{ModelError, Result};
pub use levels::PerLevel;
pub use table::{Column, FindingTable, columns};
pub use view::{Bars, CategoryView, LevelThreshold, ReportView, SectionView, ThresholdView};

/// `true` iff a threshold is configured and the count is strictly above it.
pub fn exceeds_threshold(count: u64, threshold: Option<u64>) -> bool {
    threshold.is_some_and(|t| count > t)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ThresholdStatus {
    /// Thresholds are switched off for the category. Not the same as compliant.
    NotEvaluated,
    Evaluated {
        overall_exceeded: bool,
        per_level: PerLevel<bool>,
    },
}

impl ThresholdStatus {
    pub fn overall_exceeded(&self) -> bool {
        match self {
            ThresholdStatus::NotEvaluated => false,
            ThresholdStatus::Evaluated {
                overall_exceeded, ..
            } => *overall_exceeded,
        }
    }

    pub fn level_exceeded(&self, level: SeverityLevel) -> Option<bool> {
        match self {
            ThresholdStatus::NotEvaluated => None,
            ThresholdStatus::Evaluated { per_level, .. } => Some(*per_level.get(level)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReportModel<'a> {
    snapshot: &'a ReportSnapshot,
}

impl<'a> ReportModel<'a> {
    pub fn new(snapshot: &'a ReportSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &'a ReportSnapshot {
        self.snapshot
    }

    /// Exposes the category's enablement flag. A category missing from the snapshot is not visible.
    pub fn is_category_visible(&self, category: Category) -> bool {
        self.snapshot
            .section(category)
            .is_some_and(|section| section.enabled)
    }

    /// Share of each level in the category total, in percent. Unrounded.
    pub fn bar_proportions(&self, category: Category) -> Result<PerLevel<f64>> {
        let counts = self.counts(category)?;
        let total = counts.high + counts.medium + counts.low;
        if total == 0 {
            return Err(ModelError::DivisionByZero {
                category,
                level: None,
                what: "bar proportion",
            });
        }
        Ok(counts.map(|_, &count| count as f64 * 100.0 / total as f64))
    }

    /// Whole-number percentages that always sum to exactly 100.
    ///
    /// Each share is floored, then the leftover points go one at a time to the levels
    /// with the largest discarded fraction (ties: larger count, then higher severity).
    pub fn integer_proportions(&self, category: Category) -> Result<PerLevel<u32>> {
        let counts = self.counts(category)?;
        let total = counts.high + counts.medium + counts.low;
        if total == 0 {
            return Err(ModelError::DivisionByZero {
                category,
                level: None,
                what: "bar proportion",
            });
        }

        let mut rounded = counts.map(|_, &count| (count * 100 / total) as u32);
        let assigned: u32 = rounded.high + rounded.medium + rounded.low;

        let mut order: Vec<SeverityLevel> = SeverityLevel::ALL.to_vec();
        order.sort_by_key(|&level| {
            let count = *counts.get(level);
            (
                std::cmp::Reverse(count * 100 % total),
                std::cmp::Reverse(count),
                level,
            )
        });
        for level in order.into_iter().cycle().take((100 - assigned) as usize) {
            *rounded.get_mut(level) += 1;
        }

        Ok(rounded)
    }

    pub fn threshold_status(&self, category: Category) -> Result<ThresholdStatus> {
        let section = self.section(category)?;
        if !section.thresholds_enabled {
            return Ok(ThresholdStatus::NotEvaluated);
        }

        let per_level = PerLevel::try_from_fn(|level| -> Result<bool> {
            let bucket = bucket_of(section, category, level)?;
            Ok(exceeds_threshold(bucket.count, bucket.threshold))
        })?;
        let overall_exceeded = per_level.high || per_level.medium || per_level.low;

        Ok(ThresholdStatus::Evaluated {
            overall_exceeded,
            per_level,
        })
    }

    /// Height of the threshold line as a percent of the level's bar.
    ///
    /// `None` when the level has no threshold. Values above 100 mean the threshold sits
    /// above the bar, which only happens for compliant levels.
    pub fn threshold_marker_position(
        &self,
        category: Category,
        level: SeverityLevel,
    ) -> Result<Option<f64>> {
        let bucket = self.bucket(category, level)?;
        let Some(threshold) = bucket.threshold else {
            return Ok(None);
        };
        if bucket.count == 0 {
            return Err(ModelError::DivisionByZero {
                category,
                level: Some(level),
                what: "threshold marker",
            });
        }
        Ok(Some(threshold as f64 * 100.0 / bucket.count as f64))
    }

    pub fn finding_table(&self, category: Category, level: SeverityLevel) -> Result<FindingTable> {
        let bucket = self.bucket(category, level)?;
        table::build(category, level, &bucket.findings)
    }

    /// `true` when any visible category has a threshold exceeded.
    pub fn any_threshold_exceeded(&self) -> Result<bool> {
        for &category in self.snapshot.categories.keys() {
            if !self.is_category_visible(category) {
                continue;
            }
            if self.threshold_status(category)?.overall_exceeded() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Runs every operation for every category in the snapshot, skipping disabled ones.
    pub fn build_view(&self) -> Result<ReportView> {
        let categories = self
            .snapshot
            .categories
            .keys()
            .map(|&category| self.category_view(category))
            .collect::<Result<Vec<_>>>()?;
        Ok(ReportView { categories })
    }

    fn category_view(&self, category: Category) -> Result<CategoryView> {
        if !self.is_category_visible(category) {
            return Ok(CategoryView {
                category,
                visible: false,
                section: None,
            });
        }

        let section = self.section(category)?;
        let counts = self.counts(category)?;
        let total = counts.high + counts.medium + counts.low;

        let bars = if total == 0 {
            Bars::Empty
        } else {
            Bars::Proportions {
                percent: self.bar_proportions(category)?,
                rounded: self.integer_proportions(category)?,
            }
        };

        let thresholds = match self.threshold_status(category)? {
            ThresholdStatus::NotEvaluated => ThresholdView::NotEvaluated,
            ThresholdStatus::Evaluated {
                overall_exceeded,
                per_level,
            } => {
                let levels = PerLevel::try_from_fn(|level| -> Result<LevelThreshold> {
                    let exceeded = *per_level.get(level);
                    // exceeded implies count > threshold >= 0, so the marker is defined
                    let marker_pct = if exceeded {
                        self.threshold_marker_position(category, level)?
                    } else {
                        None
                    };
                    Ok(LevelThreshold {
                        threshold: bucket_of(section, category, level)?.threshold,
                        exceeded,
                        marker_pct,
                    })
                })?;
                ThresholdView::Evaluated {
                    overall_exceeded,
                    levels,
                }
            }
        };

        let tables = SeverityLevel::ALL
            .into_iter()
            .map(|level| self.finding_table(category, level))
            .collect::<Result<Vec<_>>>()?;

        Ok(CategoryView {
            category,
            visible: true,
            section: Some(SectionView {
                counts,
                total,
                bars,
                thresholds,
                tables,
                links: section.links.clone(),
                scan_info: section.scan_info.clone(),
                libraries: section.libraries,
            }),
        })
    }

    fn section(&self, category: Category) -> Result<&'a CategorySection> {
        self.snapshot
            .section(category)
            .ok_or(ModelError::InvalidBucket {
                category,
                level: None,
            })
    }

    fn bucket(&self, category: Category, level: SeverityLevel) -> Result<&'a SeverityBucket> {
        bucket_of(self.section(category)?, category, level)
    }

    fn counts(&self, category: Category) -> Result<PerLevel<u64>> {
        PerLevel::try_from_fn(|level| -> Result<u64> { Ok(self.bucket(category, level)?.count) })
    }
}

fn bucket_of(
    section: &CategorySection,
    category: Category,
    level: SeverityLevel,
) -> Result<&SeverityBucket> {
    section.bucket(level).ok_or(ModelError::InvalidBucket {
        category,
        level: Some(level),
    })
}
