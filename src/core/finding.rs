use serde::{Deserialize, Serialize};

/// One reported issue as supplied by the host.
///
/// The shape is deliberately loose: which attributes are required depends on the
/// category the finding is filed under, and that is checked when a table is built.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Finding {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_name: Option<String>,
}

impl Finding {
    pub fn static_analysis(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count: Some(count),
            ..Self::default()
        }
    }

    pub fn open_source(
        name: impl Into<String>,
        publish_date: impl Into<String>,
        library_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            publish_date: Some(publish_date.into()),
            library_name: Some(library_name.into()),
            ..Self::default()
        }
    }
}
