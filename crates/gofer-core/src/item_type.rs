//! Gopher item types
//!
//! The single-character tag at the start of every directory line. The set is
//! closed for the types the gateway understands; anything else is carried as
//! [`ItemType::Unknown`], which is an ordinary, expected value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a resource of a given type travels to the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pipeline {
    /// Decoded as text (and, for directories, rendered as HTML)
    Transparent,
    /// Passed through as raw bytes
    Opaque,
}

/// A record's declared item type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "char", from = "char")]
pub enum ItemType {
    /// `0` plain text file
    Text,
    /// `1` directory listing
    Directory,
    /// `2` CSO/ph phone-book server
    CsoPhonebook,
    /// `3` error
    Error,
    /// `4` BinHex-encoded Macintosh file
    BinHex,
    /// `5` DOS binary archive
    DosBinary,
    /// `6` uuencoded file
    UuEncoded,
    /// `7` index-search server
    Search,
    /// `9` binary file
    Binary,
    /// `g` GIF image
    Gif,
    /// `I` generic image
    Image,
    /// `i` informational line
    Info,
    /// Any tag the gateway does not know
    Unknown(char),
}

impl ItemType {
    pub fn from_char(tag: char) -> Self {
        match tag {
            '0' => Self::Text,
            '1' => Self::Directory,
            '2' => Self::CsoPhonebook,
            '3' => Self::Error,
            '4' => Self::BinHex,
            '5' => Self::DosBinary,
            '6' => Self::UuEncoded,
            '7' => Self::Search,
            '9' => Self::Binary,
            'g' => Self::Gif,
            'I' => Self::Image,
            'i' => Self::Info,
            other => Self::Unknown(other),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Text => '0',
            Self::Directory => '1',
            Self::CsoPhonebook => '2',
            Self::Error => '3',
            Self::BinHex => '4',
            Self::DosBinary => '5',
            Self::UuEncoded => '6',
            Self::Search => '7',
            Self::Binary => '9',
            Self::Gif => 'g',
            Self::Image => 'I',
            Self::Info => 'i',
            Self::Unknown(tag) => tag,
        }
    }

    /// Type hint from a query parameter; the first character wins
    pub fn from_hint(hint: &str) -> Option<Self> {
        hint.chars().next().map(Self::from_char)
    }

    pub fn pipeline(self) -> Pipeline {
        match self {
            Self::Text | Self::Directory => Pipeline::Transparent,
            _ => Pipeline::Opaque,
        }
    }

    pub fn is_transparent(self) -> bool {
        self.pipeline() == Pipeline::Transparent
    }

    /// Five-column badge shown before a record
    pub fn badge(self) -> String {
        let fixed = match self {
            Self::Text => "[TXT]",
            Self::Directory => "[ 1 ]",
            Self::CsoPhonebook => "[PhC]",
            Self::Error => "[ERR]",
            Self::BinHex => "[HQX]",
            Self::DosBinary => "[DOS]",
            Self::UuEncoded => "[UUE]",
            Self::Search => "[ 7 ]",
            Self::Binary => "[BIN]",
            Self::Gif => "[GIF]",
            Self::Image => "[IMG]",
            Self::Info => "[ i ]",
            Self::Unknown(tag) => return format!("[!{tag}!]"),
        };
        fixed.to_string()
    }
}

impl From<char> for ItemType {
    fn from(tag: char) -> Self {
        Self::from_char(tag)
    }
}

impl From<ItemType> for char {
    fn from(item_type: ItemType) -> char {
        item_type.as_char()
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_mapping_is_stable() {
        for tag in ['0', '1', '2', '3', '4', '5', '6', '7', '9', 'g', 'I', 'i', 'h', 'p', '+'] {
            assert_eq!(ItemType::from_char(tag).as_char(), tag);
        }
        assert_eq!(ItemType::from_char('h'), ItemType::Unknown('h'));
    }

    #[test]
    fn test_pipelines() {
        assert!(ItemType::Text.is_transparent());
        assert!(ItemType::Directory.is_transparent());
        assert_eq!(ItemType::Gif.pipeline(), Pipeline::Opaque);
        assert_eq!(ItemType::Info.pipeline(), Pipeline::Opaque);
        assert_eq!(ItemType::Unknown('h').pipeline(), Pipeline::Opaque);
    }

    #[test]
    fn test_badges() {
        assert_eq!(ItemType::Text.badge(), "[TXT]");
        assert_eq!(ItemType::Error.badge(), "[ERR]");
        assert_eq!(ItemType::Unknown('h').badge(), "[!h!]");
    }

    #[test]
    fn test_from_hint() {
        assert_eq!(ItemType::from_hint("1"), Some(ItemType::Directory));
        assert_eq!(ItemType::from_hint("0extra"), Some(ItemType::Text));
        assert_eq!(ItemType::from_hint(""), None);
    }

    #[test]
    fn test_serializes_as_char() {
        let json = serde_json::to_string(&ItemType::Gif).unwrap();
        assert_eq!(json, "\"g\"");
        let parsed: ItemType = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(parsed, ItemType::Search);
    }
}
