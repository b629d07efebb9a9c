//! Native bridge event messages
//!
//! The per-platform renderers report everything through one pipe-delimited
//! string channel: `"loadComplete|<pages>|<w>|<h>|<tocJson>"`,
//! `"pageChanged|<page>|<total>"`, and so on. This module is the single
//! translation point from that wire format into typed events; nothing
//! else in the crate touches the raw strings.
//!
//! The table-of-contents field may itself contain `|`, so for
//! `loadComplete` every field after the fourth is re-joined before JSON
//! parsing.

use crate::error::ViewerError;

use super::toc::TocPayload;

/// A typed event from the native rendering layer.
#[derive(Clone, Debug, PartialEq)]
pub enum BridgeEvent {
    LoadComplete {
        page_count: u32,
        width: f32,
        height: f32,
        toc: TocPayload,
    },
    PageChanged {
        page: u32,
        total: u32,
    },
    Error(String),
    PageSingleTap {
        page: u32,
        x: f32,
        y: f32,
    },
    ScaleChanged(f32),
    LinkPressed(String),
}

/// Parse one bridge message.
///
/// Errors are recoverable by design: the caller logs and drops the
/// message, it never tears down the view.
pub fn parse_message(raw: &str) -> Result<BridgeEvent, ViewerError> {
    let fields: Vec<&str> = raw.split('|').collect();
    let kind = *fields
        .first()
        .ok_or_else(|| ViewerError::message_parse("empty message"))?;

    match kind {
        "loadComplete" => {
            let page_count = parse_field::<u32>(&fields, 1, raw)?;
            let width = parse_field::<f32>(&fields, 2, raw)?;
            let height = parse_field::<f32>(&fields, 3, raw)?;
            // Everything after the page box is the outline, '|' included.
            let toc = if fields.len() > 4 {
                TocPayload::parse(&fields[4..].join("|"))
            } else {
                TocPayload::Empty
            };
            Ok(BridgeEvent::LoadComplete {
                page_count,
                width,
                height,
                toc,
            })
        }

        "pageChanged" => Ok(BridgeEvent::PageChanged {
            page: parse_field(&fields, 1, raw)?,
            total: parse_field(&fields, 2, raw)?,
        }),

        "error" => Ok(BridgeEvent::Error(
            text_field(&fields, 1, raw)?.to_string(),
        )),

        "pageSingleTap" => Ok(BridgeEvent::PageSingleTap {
            page: parse_field(&fields, 1, raw)?,
            x: parse_field(&fields, 2, raw)?,
            y: parse_field(&fields, 3, raw)?,
        }),

        "scaleChanged" => Ok(BridgeEvent::ScaleChanged(parse_field(&fields, 1, raw)?)),

        "linkPressed" => Ok(BridgeEvent::LinkPressed(
            text_field(&fields, 1, raw)?.to_string(),
        )),

        other => Err(ViewerError::message_parse(format!(
            "unknown message kind {other:?}"
        ))),
    }
}

fn text_field<'a>(fields: &[&'a str], index: usize, raw: &str) -> Result<&'a str, ViewerError> {
    fields.get(index).copied().ok_or_else(|| {
        ViewerError::message_parse(format!("field {index} missing in {raw:?}"))
    })
}

fn parse_field<T: std::str::FromStr>(
    fields: &[&str],
    index: usize,
    raw: &str,
) -> Result<T, ViewerError> {
    text_field(fields, index, raw)?.parse().map_err(|_| {
        ViewerError::message_parse(format!("field {index} not numeric in {raw:?}"))
    })
}
