use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Finding urgency. Declaration order is display order: `High` sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    High,
    Medium,
    Low,
}

impl SeverityLevel {
    pub const ALL: [SeverityLevel; 3] = [SeverityLevel::High, SeverityLevel::Medium, SeverityLevel::Low];

    pub const fn as_str(self) -> &'static str {
        match self {
            SeverityLevel::High => "high",
            SeverityLevel::Medium => "medium",
            SeverityLevel::Low => "low",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            SeverityLevel::High => "High",
            SeverityLevel::Medium => "Medium",
            SeverityLevel::Low => "Low",
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeverityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(SeverityLevel::High),
            "medium" | "med" => Ok(SeverityLevel::Medium),
            "low" => Ok(SeverityLevel::Low),
            _ => Err(format!("invalid severity: {s} (expected high|medium|low)")),
        }
    }
}
