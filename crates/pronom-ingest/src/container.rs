//! Container-signature indexer

use crate::xml::parse_document;
use pronom_common::{PronomError, Result};
use std::path::Path;

/// PUIDs mapped by a container-signature document, in document order.
///
/// Duplicates are kept: several container signatures may map to one PUID.
pub fn parse_container_str(origin: &str, xml: &str) -> Result<Vec<String>> {
    let root = parse_document(xml).map_err(|message| PronomError::parse(origin, message))?;

    let mappings = root
        .child("FileFormatMappings")
        .ok_or_else(|| PronomError::missing_field(origin, "FileFormatMappings"))?;

    mappings
        .children()
        .iter()
        .map(|mapping| {
            mapping
                .attribute("Puid")
                .map(|puid| puid.trim().to_string())
                .ok_or_else(|| PronomError::missing_field(origin, "Puid"))
        })
        .collect()
}

pub fn parse_container(path: &Path) -> Result<Vec<String>> {
    let origin = path.display().to_string();
    let bytes = std::fs::read(path)?;
    let xml = String::from_utf8(bytes)
        .map_err(|e| PronomError::parse(&origin, format!("invalid utf-8: {}", e)))?;
    parse_container_str(&origin, &xml)
}
