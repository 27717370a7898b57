//! Optional line breaking of XML parts for line-oriented diffs
//!
//! Office XML is usually written as one enormous line. With line breaks
//! enabled, the stored form puts every tag boundary on its own line and the
//! compressed form joins them back.

use crate::core::archive::TranscodeMode;

const JOINED: &[u8] = b"><";
const BROKEN: &[u8] = b">\r\n <";

/// Whether an entry name gets the rewrite (`*.xml`, any case).
pub fn is_xml_part(name: &[u8]) -> bool {
    name.len() >= 4 && name[name.len() - 4..].eq_ignore_ascii_case(b".xml")
}

/// Rewrite `content` for the given direction.
pub fn rewrite(content: Vec<u8>, mode: TranscodeMode) -> Vec<u8> {
    match mode {
        TranscodeMode::ToStored => replace_all(&content, JOINED, BROKEN).unwrap_or(content),
        TranscodeMode::ToCompressed => replace_all(&content, BROKEN, JOINED).unwrap_or(content),
    }
}

/// `None` when `from` does not occur, so the caller can keep its buffer.
fn replace_all(haystack: &[u8], from: &[u8], to: &[u8]) -> Option<Vec<u8>> {
    let mut out: Option<Vec<u8>> = None;
    let mut last = 0;
    let mut i = 0;

    while i + from.len() <= haystack.len() {
        if &haystack[i..i + from.len()] == from {
            let buf = out.get_or_insert_with(|| Vec::with_capacity(haystack.len() + haystack.len() / 8));
            buf.extend_from_slice(&haystack[last..i]);
            buf.extend_from_slice(to);
            i += from.len();
            last = i;
        } else {
            i += 1;
        }
    }

    out.map(|mut buf| {
        buf.extend_from_slice(&haystack[last..]);
        buf
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_xml_part() {
        assert!(is_xml_part(b"word/document.xml"));
        assert!(is_xml_part(b"[Content_Types].XML"));
        assert!(!is_xml_part(b"docProps/thumbnail.jpeg"));
        assert!(!is_xml_part(b"xml"));
        assert!(!is_xml_part(b"word/_rels/document.xml.rels"));
    }

    #[test]
    fn test_split_and_join() {
        let joined = b"<a><b>text</b><c/></a>".to_vec();
        let broken = rewrite(joined.clone(), TranscodeMode::ToStored);
        assert_eq!(broken, b"<a>\r\n <b>text</b>\r\n <c/>\r\n </a>".to_vec());
        assert_eq!(rewrite(broken, TranscodeMode::ToCompressed), joined);
    }

    #[test]
    fn test_no_match_returns_input() {
        let content = b"plain text without tags".to_vec();
        assert_eq!(rewrite(content.clone(), TranscodeMode::ToStored), content);
        assert_eq!(rewrite(content.clone(), TranscodeMode::ToCompressed), content);
    }
}
