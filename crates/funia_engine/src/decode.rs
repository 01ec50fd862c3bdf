use std::borrow::Cow;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

/// Decode a result page body to text.
///
/// Order: BOM, then `charset=` from the Content-Type header, then detection.
/// Malformed sequences are replaced rather than rejected; a damaged label
/// should not hide the links around it.
pub(crate) fn decode_page<'a>(bytes: &'a [u8], content_type: Option<&str>) -> Cow<'a, str> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return encoding.decode_without_bom_handling(&bytes[bom_len..]).0;
    }

    if let Some(encoding) = content_type
        .and_then(charset_label)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return encoding.decode_without_bom_handling(bytes).0;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    if encoding == UTF_8 {
        return String::from_utf8_lossy(bytes);
    }
    encoding.decode_without_bom_handling(bytes).0
}

fn charset_label(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (name, value) = part.trim().split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim_matches([' ', '"', '\''].as_ref()).to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_charset_is_honoured() {
        let bytes = [b'c', b'a', b'f', 0xE9];
        let text = decode_page(&bytes, Some("text/html; Charset=\"ISO-8859-1\""));
        assert_eq!(text, "café");
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("<ul class=\"images\"></ul>".as_bytes());
        assert_eq!(decode_page(&bytes, None), "<ul class=\"images\"></ul>");
    }

    #[test]
    fn plain_utf8_without_hints() {
        let html = "<a href=\"/x\">Größe</a>";
        assert_eq!(decode_page(html.as_bytes(), Some("text/html")), html);
    }
}
