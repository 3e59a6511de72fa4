//! Character-set detection for report files.
//!
//! Resolution order: byte-order mark, then the UTF-16 `<?` signature, then
//! the `encoding` pseudo-attribute of the XML declaration, then UTF-8.
use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

use crate::error::{FlattenError, Result};

/// The declaration is always near the start; stop looking after this many bytes.
const DECLARATION_SCAN_LIMIT: usize = 1024;

/// Decode a raw report into text.
///
/// An `encoding` label that no decoder understands is a parse error rather
/// than a guess, since a wrong guess silently empties the output.
pub fn decode_document(bytes: &[u8]) -> Result<Cow<'_, str>> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        warn_on_malformed(encoding, had_errors);
        return Ok(text);
    }

    let encoding = match bytes {
        [0x3C, 0x00, 0x3F, 0x00, ..] => UTF_16LE,
        [0x00, 0x3C, 0x00, 0x3F, ..] => UTF_16BE,
        _ => match declared_encoding(bytes) {
            Some(label) => {
                let encoding = Encoding::for_label(label.as_bytes()).ok_or_else(|| {
                    FlattenError::Parse {
                        position: 0,
                        message: format!("Unsupported document encoding {:?}", label),
                    }
                })?;
                // A declaration readable as ASCII cannot belong to a UTF-16 body.
                if encoding == UTF_16LE || encoding == UTF_16BE {
                    UTF_8
                } else {
                    encoding
                }
            }
            None => UTF_8,
        },
    };

    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    warn_on_malformed(encoding, had_errors);
    Ok(text)
}

fn warn_on_malformed(encoding: &'static Encoding, had_errors: bool) {
    if had_errors {
        log::warn!(
            "Replaced byte sequences that are not valid {}",
            encoding.name()
        );
    }
}

/// The `encoding="..."` value of a leading `<?xml ...?>` declaration.
fn declared_encoding(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(DECLARATION_SCAN_LIMIT)];
    let head = String::from_utf8_lossy(head);
    let declaration = head.strip_prefix("<?xml")?;
    let declaration = &declaration[..declaration.find("?>")?];

    let after_key = &declaration[declaration.find("encoding")? + "encoding".len()..];
    let after_eq = after_key.trim_start().strip_prefix('=')?.trim_start();
    let quote = after_eq.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &after_eq[1..];
    let label = &value[..value.find(quote)?];
    Some(label.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_declared_label() {
        let xml = br#"<?xml version="1.0" encoding='ISO-8859-1' ?><r/>"#;
        assert_eq!(declared_encoding(xml).as_deref(), Some("ISO-8859-1"));
    }

    #[test]
    fn no_declaration_means_no_label() {
        assert_eq!(declared_encoding(b"<r encoding=\"latin1\"/>"), None);
        assert_eq!(declared_encoding(b"<?xml version=\"1.0\"?><r/>"), None);
    }

    #[test]
    fn utf16_label_on_ascii_bytes_falls_back_to_utf8() {
        let xml = "<?xml version=\"1.0\" encoding=\"UTF-16\"?><r>é</r>";
        assert_eq!(decode_document(xml.as_bytes()).unwrap(), xml);
    }

    #[test]
    fn utf16be_without_bom_is_sniffed() {
        let xml = "<?xml version=\"1.0\"?><r>ü</r>";
        let bytes: Vec<u8> = xml.encode_utf16().flat_map(u16::to_be_bytes).collect();
        assert_eq!(decode_document(&bytes).unwrap(), xml);
    }
}
