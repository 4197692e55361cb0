//! External file reference types.

use serde::Deserialize;

/// Points at one file in a SharePoint document library.
///
/// Every field is optional at the deserialization layer so that a missing
/// field fails only its own unit instead of the whole request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalFileReference {
    /// SharePoint site ID.
    pub site_id: Option<String>,
    /// Document library (drive) ID.
    pub drive_id: Option<String>,
    /// Drive item ID.
    pub item_id: Option<String>,
    /// File name to store the content under.
    pub file_name: Option<String>,
}

/// Reference with every field present and non-blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidReference<'a> {
    /// SharePoint site ID.
    pub site_id: &'a str,
    /// Document library (drive) ID.
    pub drive_id: &'a str,
    /// Drive item ID.
    pub item_id: &'a str,
    /// File name.
    pub file_name: &'a str,
}

impl ExternalFileReference {
    /// Create a fully populated reference.
    #[must_use]
    pub fn new(
        site_id: impl Into<String>,
        drive_id: impl Into<String>,
        item_id: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            site_id: Some(site_id.into()),
            drive_id: Some(drive_id.into()),
            item_id: Some(item_id.into()),
            file_name: Some(file_name.into()),
        }
    }

    /// Wire names of fields that are missing or blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("siteId", self.site_id.as_deref()),
            ("driveId", self.drive_id.as_deref()),
            ("itemId", self.item_id.as_deref()),
            ("fileName", self.file_name.as_deref()),
        ]
        .into_iter()
        .filter(|(_, value)| present(*value).is_none())
        .map(|(name, _)| name)
        .collect()
    }

    /// Borrow the fields if all are present.
    #[must_use]
    pub fn validate(&self) -> Option<ValidReference<'_>> {
        Some(ValidReference {
            site_id: present(self.site_id.as_deref())?,
            drive_id: present(self.drive_id.as_deref())?,
            item_id: present(self.item_id.as_deref())?,
            file_name: present(self.file_name.as_deref())?,
        })
    }

    /// Best available label for results: file name, then item ID.
    #[must_use]
    pub fn label(&self) -> String {
        present(self.file_name.as_deref())
            .or_else(|| present(self.item_id.as_deref()))
            .unwrap_or("unknown")
            .to_string()
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
