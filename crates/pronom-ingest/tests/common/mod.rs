//! Shared helpers for ingest integration tests

#![allow(dead_code)]

use pronom_ingest::config::IngestConfig;
use std::path::{Path, PathBuf};

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

pub fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture(name)).expect("fixture should exist")
}

/// Config pointing every remote URL at a mock server, with no delays
pub fn mock_config(server_uri: &str, work_dir: &Path) -> IngestConfig {
    IngestConfig {
        release_notes_url: format!("{}/aboutapps/pronom/release-notes.xml", server_uri),
        container_url: format!("{}/pronom/container-signature.xml", server_uri),
        cdn_base: format!("{}/documents/", server_uri),
        registry_url: format!("{}/PRONOM/", server_uri),
        export_dir: work_dir.join("pronom-export"),
        download_dir: work_dir.to_path_buf(),
        http_timeout_secs: 5,
        request_delay_ms: 0,
        max_retries: 3,
        backoff_min_secs: 0,
        backoff_max_secs: 0,
        concurrency: 8,
        server_addr: Some(server_uri.to_string()),
        server_auth: Some("correct horse".to_string()),
    }
}

/// A registry report document
pub fn record_xml(name: &str, version: &str, description: &str, puid: &str, signature: bool) -> String {
    let signature = if signature {
        "<InternalSignature><ByteSequence><ByteSequenceValue>CAFEBABE</ByteSequenceValue></ByteSequence></InternalSignature>"
    } else {
        ""
    };
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<PRONOM-Report xmlns="http://pronom.nationalarchives.gov.uk">
  <report_format_detail>
    <FileFormat>
      <FormatName>{name}</FormatName>
      <FormatVersion>{version}</FormatVersion>
      <FormatDescription>{description}</FormatDescription>
      <FileFormatIdentifier>
        <Identifier>{puid}</Identifier>
        <IdentifierType>PUID</IdentifierType>
      </FileFormatIdentifier>
      {signature}
    </FileFormat>
  </report_format_detail>
</PRONOM-Report>
"#
    )
}

/// Write a record into `<dir>/<namespace>/<namespace><id>.xml`
pub fn write_record(dir: &Path, puid: &str, xml: &str) {
    let (namespace, id) = puid.split_once('/').expect("puid has a namespace");
    let target = dir.join(namespace);
    std::fs::create_dir_all(&target).expect("create namespace dir");
    std::fs::write(target.join(format!("{}{}.xml", namespace, id)), xml).expect("write record");
}
