//! Table-of-contents payload carried by load-complete messages
//!
//! The native bridge ships the outline as a JSON array; engines that
//! cannot produce one send arbitrary text instead, so parsing falls back
//! to the raw string rather than failing the whole message.

use serde::Deserialize;

/// One outline entry. `pageIdx` is the field name the native side uses.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TocEntry {
    #[serde(default)]
    pub title: String,

    #[serde(default, alias = "pageIdx")]
    pub page: Option<u32>,

    #[serde(default)]
    pub children: Vec<TocEntry>,
}

/// The outline as delivered: parsed entries, the unparseable raw text,
/// or nothing at all.
#[derive(Clone, Debug, PartialEq)]
pub enum TocPayload {
    Entries(Vec<TocEntry>),
    Raw(String),
    Empty,
}

impl TocPayload {
    /// Parse the outline field of a load-complete message.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::Empty;
        }
        match serde_json::from_str::<Vec<TocEntry>>(raw) {
            Ok(entries) => Self::Entries(entries),
            Err(err) => {
                log::debug!("toc payload is not JSON ({err}), keeping raw text");
                Self::Raw(raw.to_string())
            }
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[TocEntry] {
        match self {
            Self::Entries(entries) => entries,
            _ => &[],
        }
    }
}
