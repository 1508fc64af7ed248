use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Finding domain. Each category has its own buckets, thresholds and table schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    StaticAnalysis,
    OpenSourceComponent,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::StaticAnalysis, Category::OpenSourceComponent];

    pub const fn as_str(self) -> &'static str {
        match self {
            Category::StaticAnalysis => "static_analysis",
            Category::OpenSourceComponent => "open_source_component",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Category::StaticAnalysis => "Static Analysis",
            Category::OpenSourceComponent => "Open Source Components",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "static_analysis" | "sast" => Ok(Category::StaticAnalysis),
            "open_source_component" | "osa" => Ok(Category::OpenSourceComponent),
            _ => Err(format!(
                "invalid category: {s} (expected static_analysis|sast|open_source_component|osa)"
            )),
        }
    }
}
