//! Text decoding for supplier exports.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

use crate::error::{ParseError, Result};

/// Decoded text plus the encoding that produced it.
#[derive(Debug)]
pub struct Decoded<'a> {
    pub text: Cow<'a, str>,
    pub encoding: &'static Encoding,
}

/// Decode raw bytes.
///
/// An explicit WHATWG label wins. Without one a byte-order mark selects
/// UTF-8 / UTF-16LE / UTF-16BE; otherwise the bytes are tried as UTF-8 and
/// fall back to Windows-1252, which is what spreadsheet tools emit for
/// "CSV" on most desktop installs.
pub fn decode<'a>(bytes: &'a [u8], hint: Option<&str>) -> Result<Decoded<'a>> {
    if let Some(label) = hint {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| ParseError::UnknownEncoding(label.to_string()))?;
        let (text, _) = encoding.decode_with_bom_removal(bytes);
        return Ok(Decoded { text, encoding });
    }

    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return Ok(Decoded { text, encoding });
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(Decoded {
            text: Cow::Borrowed(text),
            encoding: UTF_8,
        }),
        Err(_) => {
            tracing::debug!("input is not valid UTF-8, decoding as windows-1252");
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
            Ok(Decoded {
                text,
                encoding: WINDOWS_1252,
            })
        }
    }
}
