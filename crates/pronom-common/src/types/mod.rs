//! Common types used across PRONOM tools

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// CDN location of published signature files
pub const DEFAULT_CDN_BASE: &str = "https://cdn.nationalarchives.gov.uk/documents/";

/// Highest x-fmt PUID; the x-fmt namespace is closed to new records
pub const EXTENDED_IDENTIFIER_CONSTANT: &str = "x-fmt/455";

/// Lifecycle status of a registry record, derived from its description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionStatus {
    /// Fully researched record
    #[default]
    Complete,
    /// Stub record awaiting research
    Outline,
    /// Record superseded or withdrawn
    Deprecated,
}

impl DescriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DescriptionStatus::Complete => "complete",
            DescriptionStatus::Outline => "outline",
            DescriptionStatus::Deprecated => "deprecated",
        }
    }
}

impl std::fmt::Display for DescriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DescriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "complete" => Ok(DescriptionStatus::Complete),
            "outline" => Ok(DescriptionStatus::Outline),
            "deprecated" => Ok(DescriptionStatus::Deprecated),
            _ => Err(format!("Invalid description status: {}", s)),
        }
    }
}

// ============================================================================
// Record Types
// ============================================================================

/// Summary of one PRONOM record.
///
/// Produced by the record parser from a single exported XML document. The
/// container flag is only ever set to `Some(true)`; records without a
/// container signature omit the field when serialized.
///
/// # Examples
///
/// ```rust
/// use pronom_common::types::{DescriptionStatus, RecordSummary};
///
/// let record = RecordSummary {
///     name: "Broadcast WAVE 0 Generic".to_string(),
///     description: DescriptionStatus::Complete,
///     signature: true,
///     identifier: "fmt/1".to_string(),
///     container_signature: None,
/// };
///
/// let json = serde_json::to_value(&record).unwrap();
/// assert!(json.get("container_signature").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    /// Format name, with the format version appended when present
    pub name: String,

    /// Lifecycle status of the record
    pub description: DescriptionStatus,

    /// Whether the record carries a byte-sequence signature
    pub signature: bool,

    /// PUID, e.g. `fmt/1` or `x-fmt/455`
    pub identifier: String,

    /// Present (and true) when a container signature maps to this PUID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_signature: Option<bool>,
}

impl RecordSummary {
    /// Flag the record as covered by a container signature
    pub fn mark_container_signature(&mut self) {
        self.container_signature = Some(true);
    }

    pub fn has_container_signature(&self) -> bool {
        self.container_signature == Some(true)
    }

    pub fn is_deprecated(&self) -> bool {
        self.description == DescriptionStatus::Deprecated
    }

    /// Neither complete nor deprecated
    pub fn is_incomplete(&self) -> bool {
        self.description == DescriptionStatus::Outline
    }

    /// A record can be identified by either a standard or a container signature
    pub fn has_identification(&self) -> bool {
        self.signature || self.has_container_signature()
    }
}

// ============================================================================
// Release Types
// ============================================================================

/// Description of one PRONOM release.
///
/// The signature file URLs are never supplied by callers: they start empty
/// and are filled in by [`ReleaseSummary::derive_signature_file_url`] and
/// [`ReleaseSummary::derive_container_signature_url`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseSummary {
    date: NaiveDate,
    latest_identifier: String,
    version: String,
    release_notes_url: String,
    #[serde(default)]
    signature_file_url: String,
    #[serde(default)]
    container_signature_url: String,
    #[serde(default = "default_extended_identifier")]
    extended_identifier_constant: String,
}

fn default_extended_identifier() -> String {
    EXTENDED_IDENTIFIER_CONSTANT.to_string()
}

impl ReleaseSummary {
    pub fn new(
        date: NaiveDate,
        latest_identifier: impl Into<String>,
        version: impl Into<String>,
        release_notes_url: impl Into<String>,
    ) -> Self {
        Self {
            date,
            latest_identifier: latest_identifier.into(),
            version: version.into(),
            release_notes_url: release_notes_url.into(),
            signature_file_url: String::new(),
            container_signature_url: String::new(),
            extended_identifier_constant: default_extended_identifier(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn latest_identifier(&self) -> &str {
        &self.latest_identifier
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn release_notes_url(&self) -> &str {
        &self.release_notes_url
    }

    pub fn signature_file_url(&self) -> &str {
        &self.signature_file_url
    }

    pub fn container_signature_url(&self) -> &str {
        &self.container_signature_url
    }

    pub fn extended_identifier_constant(&self) -> &str {
        &self.extended_identifier_constant
    }

    /// Numeric part of the latest `fmt/<n>` identifier
    pub fn latest_fmt_number(&self) -> Option<u32> {
        self.latest_identifier
            .to_lowercase()
            .strip_prefix("fmt/")
            .and_then(|n| n.parse().ok())
    }

    /// Build the standard signature file URL from the release version.
    ///
    /// `V116` becomes `<cdn_base>DROID_SignatureFile_V116.xml`.
    pub fn derive_signature_file_url(&mut self, cdn_base: &str) -> &str {
        let version = self.version.to_lowercase();
        let number = version.trim_start_matches('v');
        self.signature_file_url = format!("{}DROID_SignatureFile_V{}.xml", cdn_base, number);
        &self.signature_file_url
    }

    /// Build the container signature file URL from the date the container
    /// feed was last modified.
    pub fn derive_container_signature_url(
        &mut self,
        cdn_base: &str,
        container_date: NaiveDate,
    ) -> &str {
        self.container_signature_url = format!(
            "{}container-signature-{}.xml",
            cdn_base,
            container_date.format("%Y%m%d")
        );
        &self.container_signature_url
    }

    /// File name component of the standard signature file URL
    pub fn signature_file_name(&self) -> Option<&str> {
        file_name_of(&self.signature_file_url)
    }

    /// File name component of the container signature file URL
    pub fn container_signature_file_name(&self) -> Option<&str> {
        file_name_of(&self.container_signature_url)
    }
}

fn file_name_of(url: &str) -> Option<&str> {
    url.rsplit('/').next().filter(|name| !name.is_empty())
}

/// A release together with the summaries of all its records.
///
/// This is the document stored by the stats server, one row per release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSummary {
    #[serde(flatten)]
    pub release: ReleaseSummary,

    pub records: Vec<RecordSummary>,
}

impl AggregateSummary {
    pub fn new(release: ReleaseSummary, records: Vec<RecordSummary>) -> Self {
        Self { release, records }
    }

    pub fn version(&self) -> &str {
        self.release.version()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn release() -> ReleaseSummary {
        ReleaseSummary::new(
            NaiveDate::from_ymd_opt(2023, 11, 23).unwrap(),
            "fmt/1924",
            "V116",
            "https://www.nationalarchives.gov.uk/aboutapps/pronom/release-notes.xml",
        )
    }

    fn record(description: DescriptionStatus, signature: bool) -> RecordSummary {
        RecordSummary {
            name: "Test".to_string(),
            description,
            signature,
            identifier: "fmt/1".to_string(),
            container_signature: None,
        }
    }

    #[test]
    fn test_description_status_round_trip() {
        for status in [
            DescriptionStatus::Complete,
            DescriptionStatus::Outline,
            DescriptionStatus::Deprecated,
        ] {
            assert_eq!(status.as_str().parse::<DescriptionStatus>().unwrap(), status);
        }
        assert!("incomplete".parse::<DescriptionStatus>().is_err());
    }

    #[test]
    fn test_derived_urls_start_empty() {
        let release = release();
        assert_eq!(release.signature_file_url(), "");
        assert_eq!(release.container_signature_url(), "");
        assert_eq!(release.extended_identifier_constant(), "x-fmt/455");
    }

    #[test]
    fn test_signature_file_url() {
        let mut release = release();
        assert_eq!(
            release.derive_signature_file_url(DEFAULT_CDN_BASE),
            "https://cdn.nationalarchives.gov.uk/documents/DROID_SignatureFile_V116.xml"
        );
        assert_eq!(release.signature_file_name(), Some("DROID_SignatureFile_V116.xml"));
    }

    #[test]
    fn test_container_signature_url() {
        let mut release = release();
        let date = NaiveDate::from_ymd_opt(2023, 11, 27).unwrap();
        assert_eq!(
            release.derive_container_signature_url(DEFAULT_CDN_BASE, date),
            "https://cdn.nationalarchives.gov.uk/documents/container-signature-20231127.xml"
        );
        assert_eq!(
            release.container_signature_file_name(),
            Some("container-signature-20231127.xml")
        );
    }

    #[test]
    fn test_latest_fmt_number() {
        assert_eq!(release().latest_fmt_number(), Some(1924));
        let other = ReleaseSummary::new(NaiveDate::MIN, "x-fmt/1", "V1", "");
        assert_eq!(other.latest_fmt_number(), None);
    }

    #[test]
    fn test_container_flag_is_omitted_unless_set() {
        let mut record = record(DescriptionStatus::Complete, false);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("container_signature").is_none());

        record.mark_container_signature();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["container_signature"], true);
        assert!(record.has_identification());
    }

    #[test]
    fn test_record_predicates() {
        assert!(record(DescriptionStatus::Deprecated, true).is_deprecated());
        assert!(record(DescriptionStatus::Outline, false).is_incomplete());
        assert!(!record(DescriptionStatus::Complete, false).is_incomplete());
        assert!(!record(DescriptionStatus::Complete, false).has_identification());
    }

    #[test]
    fn test_aggregate_flattens_release_fields() {
        let aggregate = AggregateSummary::new(release(), vec![record(DescriptionStatus::Complete, true)]);
        let json = serde_json::to_value(&aggregate).unwrap();

        assert_eq!(json["date"], "2023-11-23");
        assert_eq!(json["latest_identifier"], "fmt/1924");
        assert_eq!(json["version"], "V116");
        assert_eq!(json["records"][0]["description"], "complete");

        let back: AggregateSummary = serde_json::from_value(json).unwrap();
        assert_eq!(back, aggregate);
    }
}
