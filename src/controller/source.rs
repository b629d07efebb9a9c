//! Document source classification
//!
//! A source URI can point at the network, a bundled asset, an inline
//! base64 payload, or a plain file. The download/copy I/O that turns the
//! first three into a local file is the resolver collaborator's job;
//! this module is the pure decision logic in front of it: what kind of
//! source is this, what cache file does it map to, and what local path
//! does a file URI denote.

use std::path::PathBuf;

/// Where a document source's bytes come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// `http://` or `https://`, must be downloaded
    Network,
    /// `bundle-assets://`, copied out of the application bundle
    BundleAsset,
    /// `data:application/pdf;base64,...`, decoded inline
    Base64,
    /// Anything else, treated as a local file path
    File,
}

/// Classify a source URI by its scheme.
#[must_use]
pub fn classify(uri: &str) -> SourceKind {
    if uri.starts_with("http://") || uri.starts_with("https://") {
        SourceKind::Network
    } else if uri.starts_with("bundle-assets://") {
        SourceKind::BundleAsset
    } else if starts_with_ignore_case(uri, "data:application/pdf;base64") {
        SourceKind::Base64
    } else {
        SourceKind::File
    }
}

/// Stable cache file name for a source: an explicit override, or a hash
/// of the URI so the same source always maps to the same file.
#[must_use]
pub fn cache_file_name(uri: &str, explicit: Option<&str>) -> String {
    match explicit {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("{:x}.pdf", md5::compute(uri)),
    }
}

/// Local filesystem path for a file source: strips a `file://` prefix
/// and percent-decodes the remainder.
#[must_use]
pub fn local_path(uri: &str) -> PathBuf {
    let trimmed = uri
        .strip_prefix("file://")
        .or_else(|| uri.strip_prefix("FILE://"))
        .unwrap_or(uri);
    PathBuf::from(percent_decode(trimmed))
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let pair = (
                (bytes[i + 1] as char).to_digit(16),
                (bytes[i + 2] as char).to_digit(16),
            );
            if let (Some(hi), Some(lo)) = pair {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
