//! htmx fragments

use pronom_common::RecordSummary;

use super::queries::SignatureFiles;
use crate::features::shared::{escape_html, PRONOM_URL};

/// Link to the registry page of a PUID
pub fn identifier_link(identifier: &str) -> String {
    let identifier = escape_html(identifier);
    format!("<a href='{}{}'>{}</a>", PRONOM_URL, identifier, identifier)
}

/// `name (link)<br>` per record
pub fn record_list<'a>(records: impl IntoIterator<Item = &'a RecordSummary>) -> String {
    records
        .into_iter()
        .map(|r| format!("{} ({})<br>", escape_html(&r.name), identifier_link(&r.identifier)))
        .collect()
}

pub fn signature_files(files: &SignatureFiles) -> String {
    let link = |url: &Option<String>| {
        let url = escape_html(url.as_deref().unwrap_or_default());
        format!("<a href='{}'>{}</a>", url, url)
    };
    format!(
        "<br><ul><li>Standard signature file: {}</li><li>Container signature file: {}</li></ul>",
        link(&files.standard),
        link(&files.container)
    )
}
