//! NUL-terminated string helpers.
//!
//! Strings are read up to the first zero byte, searching at most
//! `StringsConfig::max_scan_bytes` bytes, and written with a trailing zero.

use crate::config::{StringEncoding, StringsConfig};
use crate::error::{MemViewError, Result};
use crate::memory::BufferAccess;
use tracing::trace;

/// Number of bytes before the terminator of the string at `address`.
pub fn string_length(
    memory: &dyn BufferAccess,
    address: u32,
    cfg: &StringsConfig,
) -> Result<usize> {
    match memory.find_nul(address, cfg.max_scan_bytes)? {
        Some(len) => Ok(len),
        None => Err(MemViewError::UnterminatedString {
            address,
            scanned: cfg
                .max_scan_bytes
                .min(memory.byte_length().saturating_sub(address as usize)),
        }),
    }
}

/// Decode the string stored at `address`.
pub fn read_string(memory: &dyn BufferAccess, address: u32, cfg: &StringsConfig) -> Result<String> {
    let len = string_length(memory, address, cfg)?;
    let mut raw = vec![0u8; len];
    memory.read_bytes(address, &mut raw)?;
    trace!(address, len, encoding = ?cfg.encoding, "Read string");
    Ok(decode(&raw, cfg.encoding))
}

/// Encode `text` at `address` followed by a zero byte.
///
/// Returns the number of bytes written, terminator included.
pub fn write_string(
    memory: &dyn BufferAccess,
    address: u32,
    text: &str,
    cfg: &StringsConfig,
) -> Result<usize> {
    let mut raw = encode(text, cfg.encoding)?;
    raw.push(0);
    memory.write_bytes(address, &raw)?;
    trace!(address, len = raw.len(), encoding = ?cfg.encoding, "Wrote string");
    Ok(raw.len())
}

fn decode(raw: &[u8], encoding: StringEncoding) -> String {
    match encoding {
        StringEncoding::Utf8 => {
            let (text, _) = encoding_rs::UTF_8.decode_with_bom_removal(raw);
            text.into_owned()
        }
        StringEncoding::Ascii => raw.iter().map(|&b| b as char).collect(),
    }
}

fn encode(text: &str, encoding: StringEncoding) -> Result<Vec<u8>> {
    match encoding {
        StringEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
        StringEncoding::Ascii => text
            .chars()
            .map(|c| u8::try_from(u32::from(c)).ok())
            .collect::<Option<Vec<u8>>>()
            .ok_or_else(|| MemViewError::UnencodableText {
                encoding: "ascii".to_string(),
                text: text.to_string(),
            }),
    }
}
