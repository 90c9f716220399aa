//! Release-notes feed parsing
//!
//! The newest release is always the first `release_note` in the feed. From
//! it we take the release date, the last PUID added, and the signature file
//! version.

use crate::xml::{parse_document, Element};
use chrono::{NaiveDate, NaiveDateTime};
use pronom_common::{PronomError, ReleaseSummary, Result};
use regex::Regex;

/// `Last-Modified` header format used by the registry
pub const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Release outline listing the records added in a release
pub const NEW_RECORDS_OUTLINE: &str = "New Records";

const RELEASE_DATE_FORMAT: &str = "%d %B %Y";
const SIGNATURE_FILE_PREFIX: &str = "DROID_SignatureFile_";
const SIGNATURE_FILE_SUFFIX: &str = ".xml";

/// Parse a release date such as `22nd August 2023`
pub fn parse_release_date(text: &str) -> Result<NaiveDate> {
    let ordinal = Regex::new(r"(\d)(st|nd|rd|th)")
        .map_err(|e| PronomError::Internal(format!("ordinal pattern: {}", e)))?;
    let cleaned = ordinal.replace_all(text.trim(), "$1");

    NaiveDate::parse_from_str(&cleaned, RELEASE_DATE_FORMAT)
        .map_err(|e| PronomError::parse("release_date", format!("'{}': {}", text.trim(), e)))
}

/// Parse an HTTP `Last-Modified` value such as `Tue, 22 Aug 2023 13:42:05 GMT`
pub fn parse_http_date(text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), HTTP_DATE_FORMAT)
        .map_err(|e| PronomError::parse("Last-Modified", format!("'{}': {}", text.trim(), e)))
}

/// `DROID_SignatureFile_V114.xml` -> `V114`
pub fn signature_version(file_name: &str) -> String {
    file_name
        .trim()
        .replace(SIGNATURE_FILE_PREFIX, "")
        .replace(SIGNATURE_FILE_SUFFIX, "")
}

/// The outline named "New Records", or the first outline when none is
fn new_records_outline(note: &Element) -> Option<&Element> {
    note.children_named("release_outline")
        .find(|outline| outline.attribute("name") == Some(NEW_RECORDS_OUTLINE))
        .or_else(|| note.child("release_outline"))
}

fn newest_identifier(outline: &Element, origin: &str) -> Result<String> {
    let puid = outline
        .children_named("format")
        .last()
        .and_then(|format| format.child("puid"))
        .map(|puid| puid.text().trim())
        .filter(|puid| !puid.is_empty())
        .ok_or_else(|| PronomError::missing_field(origin, "release_outline/format/puid"))?;

    Ok(format!("fmt/{}", puid))
}

/// Build a release summary from the feed document.
///
/// Derived file URLs are left empty; the monitor fills them in.
pub fn parse_release_xml(xml: &str, release_notes_url: &str) -> Result<ReleaseSummary> {
    let origin = release_notes_url;
    let root =
        parse_document(xml.trim()).map_err(|message| PronomError::parse(origin, message))?;

    let note = root
        .child("release_note")
        .ok_or_else(|| PronomError::missing_field(origin, "release_note"))?;

    let date = note
        .child("release_date")
        .ok_or_else(|| PronomError::missing_field(origin, "release_date"))?;
    let signature_file = note
        .child("signature_filename")
        .ok_or_else(|| PronomError::missing_field(origin, "signature_filename"))?;
    let outline = new_records_outline(note)
        .ok_or_else(|| PronomError::missing_field(origin, "release_outline"))?;

    Ok(ReleaseSummary::new(
        parse_release_date(date.text())?,
        newest_identifier(outline, origin)?,
        signature_version(signature_file.text()),
        release_notes_url,
    ))
}
