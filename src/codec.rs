//! Standard base64 encoding (RFC 4648 §4, padded)
//!
//! The plugin sandbox has no encoding primitive, so the encoder is written out here
//! instead of pulled from a crate.

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const PAD: char = '=';

/// Encode bytes as padded standard base64
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);

    for group in bytes.chunks(3) {
        let b0 = group[0];
        let b1 = group.get(1).copied().unwrap_or(0);
        let b2 = group.get(2).copied().unwrap_or(0);
        let triple = (u32::from(b0) << 16) | (u32::from(b1) << 8) | u32::from(b2);

        out.push(sextet(triple >> 18));
        out.push(sextet(triple >> 12));
        if group.len() > 1 {
            out.push(sextet(triple >> 6));
        } else {
            out.push(PAD);
        }
        if group.len() > 2 {
            out.push(sextet(triple));
        } else {
            out.push(PAD);
        }
    }

    out
}

fn sextet(value: u32) -> char {
    ALPHABET[(value & 0x3f) as usize] as char
}
