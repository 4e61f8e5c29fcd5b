//! Best-effort content-type guessing for opaque payloads
//!
//! Opaque items are handed to the browser as-is. The declared item type is
//! only a hint, so the guess comes from the payload's leading bytes.

const SNIFF_LEN: usize = 512;

pub const OCTET_STREAM: &str = "application/octet-stream";
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const TEXT_HTML: &str = "text/html; charset=utf-8";

const SIGNATURES: &[(&[u8], &str)] = &[
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"\x89PNG\r\n\x1a\n", "image/png"),
    (b"\xff\xd8\xff", "image/jpeg"),
    (b"BM", "image/bmp"),
    (b"%PDF-", "application/pdf"),
    (b"%!PS-Adobe-", "application/postscript"),
    (b"PK\x03\x04", "application/zip"),
    (b"\x1f\x8b\x08", "application/x-gzip"),
    (b"OggS\x00", "application/ogg"),
    (b"ID3", "audio/mpeg"),
    (b"\xef\xbb\xbf", TEXT_PLAIN),
    (b"\xfe\xff", "text/plain; charset=utf-16be"),
    (b"\xff\xfe", "text/plain; charset=utf-16le"),
];

const HTML_PREFIXES: &[&[u8]] = &[b"<!doctype html", b"<html", b"<head", b"<body"];

/// Guess a content type from the first bytes of `data`
pub fn guess_content_type(data: &[u8]) -> &'static str {
    let head = &data[..data.len().min(SNIFF_LEN)];

    if head.len() >= 12 && &head[..4] == b"RIFF" && &head[8..12] == b"WEBP" {
        return "image/webp";
    }

    for (magic, content_type) in SIGNATURES {
        if head.starts_with(magic) {
            return content_type;
        }
    }

    let leading = trim_ascii_start(head);
    if HTML_PREFIXES
        .iter()
        .any(|prefix| starts_with_ignore_case(leading, prefix))
    {
        return TEXT_HTML;
    }

    if head.iter().any(|&b| is_binary_byte(b)) {
        OCTET_STREAM
    } else {
        TEXT_PLAIN
    }
}

fn trim_ascii_start(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    &data[start..]
}

fn starts_with_ignore_case(data: &[u8], prefix: &[u8]) -> bool {
    data.len() >= prefix.len() && data[..prefix.len()].eq_ignore_ascii_case(prefix)
}

// Control bytes that never appear in text (tab, newlines, form feed and ESC are allowed)
fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0b | 0x0e..=0x1a | 0x1c..=0x1f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_images() {
        assert_eq!(guess_content_type(b"GIF89a\x01\x00"), "image/gif");
        assert_eq!(guess_content_type(b"\x89PNG\r\n\x1a\n\0\0"), "image/png");
        assert_eq!(guess_content_type(b"\xff\xd8\xff\xe0"), "image/jpeg");
        assert_eq!(guess_content_type(b"RIFF\0\0\0\0WEBPVP8 "), "image/webp");
    }

    #[test]
    fn test_archives_and_documents() {
        assert_eq!(guess_content_type(b"PK\x03\x04rest"), "application/zip");
        assert_eq!(guess_content_type(b"%PDF-1.4"), "application/pdf");
        assert_eq!(guess_content_type(b"\x1f\x8b\x08\x00"), "application/x-gzip");
    }

    #[test]
    fn test_text_and_html() {
        assert_eq!(guess_content_type(b"  <!DOCTYPE HTML><p>"), TEXT_HTML);
        assert_eq!(guess_content_type(b"plain words\r\n\tindented\n"), TEXT_PLAIN);
        assert_eq!(guess_content_type(b""), TEXT_PLAIN);
    }

    #[test]
    fn test_binary_fallback() {
        assert_eq!(guess_content_type(b"\x00\x01\x02\x03"), OCTET_STREAM);
    }
}
