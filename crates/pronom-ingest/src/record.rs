//! Registry record parser
//!
//! Turns one exported PRONOM report document into a [`RecordSummary`].

use crate::xml::{parse_document, Element};
use pronom_common::{DescriptionStatus, PronomError, RecordSummary, Result};
use std::collections::HashMap;
use std::path::Path;

const FILE_FORMAT: &str = "report_format_detail/FileFormat";
const BYTE_SEQUENCE_VALUE: &str = "InternalSignature/ByteSequence/ByteSequenceValue";

/// Description phrases marking a stub record
pub const OUTLINE_MARKERS: &[&str] = &["this is an outline record"];

/// Description phrases marking a withdrawn record
pub const DEPRECATED_MARKERS: &[&str] = &[
    "format deprecated",
    "puid deprecated",
    "puid is now deprecated",
    "deprecated in favour",
    "this format has been deprecated",
    "this puid has been deprecated",
];

/// Classify a record by scanning its description for marker phrases.
///
/// Matching is case-insensitive. Outline markers are checked first, so a
/// description carrying both kinds of phrase is an outline.
pub fn classify_description(description: &str) -> DescriptionStatus {
    let description = description.to_lowercase();

    if OUTLINE_MARKERS.iter().any(|m| description.contains(m)) {
        DescriptionStatus::Outline
    } else if DEPRECATED_MARKERS.iter().any(|m| description.contains(m)) {
        DescriptionStatus::Deprecated
    } else {
        DescriptionStatus::Complete
    }
}

/// Display name: the trimmed format name, followed by the trimmed version
/// when there is one.
pub fn compose_name(name: &str, version: &str) -> String {
    let name = name.trim();
    let version = version.trim();
    if version.is_empty() {
        name.to_string()
    } else {
        format!("{} {}", name, version)
    }
}

fn required<'a>(format: &'a Element, field: &str, origin: &str) -> Result<&'a Element> {
    format
        .child(field)
        .ok_or_else(|| PronomError::missing_field(origin, field))
}

/// Text of a required child, which must not be blank
fn required_text<'a>(format: &'a Element, field: &str, origin: &str) -> Result<&'a str> {
    Some(required(format, field, origin)?.text())
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| PronomError::missing_field(origin, field))
}

/// Identifier type to identifier value; the first entry of each type wins
fn identifier_map(format: &Element) -> HashMap<String, String> {
    let mut identifiers = HashMap::new();

    for entry in format.children_named("FileFormatIdentifier") {
        if let (Some(kind), Some(value)) = (entry.child("IdentifierType"), entry.child("Identifier"))
        {
            identifiers
                .entry(kind.text().trim().to_string())
                .or_insert_with(|| value.text().trim().to_string());
        }
    }

    identifiers
}

/// Summarize a record document already held in memory.
///
/// `origin` names the document in error messages.
pub fn parse_record_str(origin: &str, xml: &str) -> Result<RecordSummary> {
    let root = parse_document(xml).map_err(|message| PronomError::parse(origin, message))?;

    let format = root
        .find(FILE_FORMAT)
        .ok_or_else(|| PronomError::missing_field(origin, FILE_FORMAT))?;

    let name = required_text(format, "FormatName", origin)?;
    let description = required_text(format, "FormatDescription", origin)?;
    let version = required(format, "FormatVersion", origin)?.text();

    let identifier = identifier_map(format)
        .remove("PUID")
        .filter(|puid| !puid.is_empty())
        .ok_or_else(|| PronomError::missing_field(origin, "PUID identifier"))?;

    Ok(RecordSummary {
        name: compose_name(name, version),
        description: classify_description(description),
        signature: format.find(BYTE_SEQUENCE_VALUE).is_some(),
        identifier,
        container_signature: None,
    })
}

/// Summarize the record document at `path`
pub fn parse_record(path: &Path) -> Result<RecordSummary> {
    let origin = path.display().to_string();
    let bytes = std::fs::read(path)?;
    let xml = String::from_utf8(bytes)
        .map_err(|e| PronomError::parse(&origin, format!("invalid utf-8: {}", e)))?;
    parse_record_str(&origin, &xml)
}
