//! Directory document model
//!
//! Interprets a fully-read reply as an ordered list of typed records. A
//! well-formed line is `<type><display>\t<selector>\t<host>\t<port>`; any
//! further fields (gopher+ markers) are ignored. A line that does not have
//! four fields is kept as a synthetic error record pointing back at the
//! listing it came from, never at the partial destination it carried.

use serde::Serialize;
use thiserror::Error;

use crate::config::defaults::DEFAULT_SELECTOR;
use crate::item_type::ItemType;
use crate::locator::NavigationContext;

const TERMINATOR_LINE: &str = ".";

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryRecord {
    pub item_type: ItemType,
    pub display: String,
    /// Opaque token sent back verbatim on follow-up requests
    pub selector: String,
    pub host: String,
    pub port: String,
}

impl DirectoryRecord {
    /// An inert error record located at the context's host and port
    pub fn error(message: impl Into<String>, context: &NavigationContext) -> Self {
        Self {
            item_type: ItemType::Error,
            display: message.into(),
            selector: DEFAULT_SELECTOR.to_string(),
            host: context.host.clone(),
            port: context.port.clone(),
        }
    }

    /// Where following this record leads
    pub fn target(&self) -> NavigationContext {
        NavigationContext::new(
            self.item_type,
            self.host.clone(),
            self.port.clone(),
            self.selector.clone(),
        )
    }
}

/// A listing line that failed structural parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed Line (Type 3 Error): {line}")]
pub struct MalformedLine {
    pub line: String,
}

impl MalformedLine {
    fn new(line: &str) -> Self {
        Self {
            line: line.trim().to_string(),
        }
    }

    /// Recover locally: the calling context supplies host and port
    pub fn into_record(self, context: &NavigationContext) -> DirectoryRecord {
        DirectoryRecord::error(self.to_string(), context)
    }
}

/// Parse one non-blank listing line
pub fn parse_line(line: &str) -> Result<DirectoryRecord, MalformedLine> {
    let mut fields = line.split('\t');

    let (Some(head), Some(selector), Some(host), Some(port)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(MalformedLine::new(line));
    };

    let mut head_chars = head.chars();
    let Some(tag) = head_chars.next() else {
        return Err(MalformedLine::new(line));
    };

    Ok(DirectoryRecord {
        item_type: ItemType::from_char(tag),
        display: head_chars.as_str().trim_end().to_string(),
        selector: selector.to_string(),
        host: host.to_string(),
        port: port.trim_end().to_string(),
    })
}

/// Parse a whole reply in one pass, preserving line order
///
/// Blank lines are skipped and the bare `.` line ends the listing. Records
/// whose display text is empty after trimming are dropped.
pub fn parse(raw: &str, context: &NavigationContext) -> Vec<DirectoryRecord> {
    let mut records = Vec::new();

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == TERMINATOR_LINE {
            break;
        }

        let record = parse_line(line).unwrap_or_else(|malformed| malformed.into_record(context));

        if record.display.trim().is_empty() {
            continue;
        }
        records.push(record);
    }

    records
}
