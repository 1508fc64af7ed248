use serde::Serialize;

use crate::core::{Category, Finding, SeverityLevel};
use crate::model::{ModelError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Name,
    Count,
    PublishDate,
    LibraryName,
}

impl Column {
    pub const fn label(self) -> &'static str {
        match self {
            Column::Name => "Vulnerability Type",
            Column::Count => "##",
            Column::PublishDate => "Publish Date",
            Column::LibraryName => "Library",
        }
    }

    pub const fn field(self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Count => "count",
            Column::PublishDate => "publish_date",
            Column::LibraryName => "library_name",
        }
    }

    fn cell(self, finding: &Finding) -> Option<String> {
        match self {
            Column::Name => Some(finding.name.clone()),
            Column::Count => finding.count.map(|c| c.to_string()),
            Column::PublishDate => finding.publish_date.clone(),
            Column::LibraryName => finding.library_name.clone(),
        }
    }
}

const STATIC_ANALYSIS_COLUMNS: &[Column] = &[Column::Name, Column::Count];
const OPEN_SOURCE_COLUMNS: &[Column] = &[Column::Name, Column::PublishDate, Column::LibraryName];

pub const fn columns(category: Category) -> &'static [Column] {
    match category {
        Category::StaticAnalysis => STATIC_ANALYSIS_COLUMNS,
        Category::OpenSourceComponent => OPEN_SOURCE_COLUMNS,
    }
}

/// Header plus one row per finding, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindingTable {
    pub category: Category,
    pub level: SeverityLevel,
    pub columns: Vec<Column>,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl FindingTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub(crate) fn build(
    category: Category,
    level: SeverityLevel,
    findings: &[Finding],
) -> Result<FindingTable> {
    let columns = columns(category);

    let mut rows = Vec::with_capacity(findings.len());
    for (index, finding) in findings.iter().enumerate() {
        let mut row = Vec::with_capacity(columns.len());
        for column in columns {
            let cell = column.cell(finding).ok_or(ModelError::SchemaMismatch {
                category,
                level,
                index,
                field: column.field(),
            })?;
            row.push(cell);
        }
        rows.push(row);
    }

    Ok(FindingTable {
        category,
        level,
        columns: columns.to_vec(),
        header: columns.iter().map(|c| c.label().to_string()).collect(),
        rows,
    })
}
