//! Text decoding helpers for source documents.

use std::borrow::Cow;

/// Decode source bytes to a string.
///
/// 1. UTF-8 (a BOM is stripped)
/// 2. The encoding named in the XML declaration, if any
/// 3. Windows-1252, which accepts every byte sequence
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = xml_declared_encoding(bytes)
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Read the `encoding="..."` pseudo-attribute of an XML declaration.
///
/// Only the first 100 bytes are inspected.
pub fn xml_declared_encoding(bytes: &[u8]) -> Option<&str> {
    let prefix = &bytes[..bytes.len().min(100)];

    let xml_start = prefix.windows(5).position(|w| w == b"<?xml")?;
    let after_xml = &prefix[xml_start..];

    let enc_pos = after_xml
        .windows(9)
        .position(|w| w.eq_ignore_ascii_case(b"encoding="))?;
    let after_enc = &after_xml[enc_pos + 9..];

    let (&quote, rest) = after_enc.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }

    let value_end = rest.iter().position(|&b| b == quote)?;
    std::str::from_utf8(&rest[..value_end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8_with_bom() {
        let bytes = b"\xEF\xBB\xBF<book>\xC3\x9Cbersicht</book>";
        assert_eq!(decode_text(bytes), "<book>Übersicht</book>");
    }

    #[test]
    fn test_decode_declared_latin1() {
        let bytes = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><t>\xDCbersicht</t>";
        let text = decode_text(bytes);
        assert!(text.ends_with("<t>Übersicht</t>"));
    }

    #[test]
    fn test_decode_falls_back_to_cp1252() {
        let bytes = b"<t>Gr\xFC\xDFe</t>";
        assert_eq!(decode_text(bytes), "<t>Grüße</t>");
    }

    #[test]
    fn test_xml_declared_encoding() {
        assert_eq!(
            xml_declared_encoding(b"<?xml version='1.0' encoding='windows-1252'?>"),
            Some("windows-1252")
        );
        assert_eq!(xml_declared_encoding(b"<?xml version=\"1.0\"?>"), None);
        assert_eq!(xml_declared_encoding(b"<book/>"), None);
    }
}
