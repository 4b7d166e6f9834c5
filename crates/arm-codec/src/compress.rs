//! Bijective item compression against a restricted alphabet.
//!
//! A normalized item over an alphabet `A` is read as a number in base
//! `b = |A| + 1`: the alphabet is prepended with a sentinel so that real
//! characters occupy 1-based positions, which keeps leading occurrences of
//! the alphabet's first character from collapsing into nothing. The number is
//! then written out big-endian in base 256. The mapping is a bijection, so
//! compressed items can stand in for their originals everywhere in the trie.

use arm_common::{Error, Result};
use num::bigint::BigUint;
use num::{Integer, ToPrimitive, Zero};
use std::collections::HashMap;

/// Sentinel occupying position 0 of the extended alphabet.
const SENTINEL: char = '\u{ff}';

/// Compresses and decompresses item strings against one fixed alphabet.
///
/// With no alphabet configured the codec is the identity function on bytes.
#[derive(Debug, Clone)]
pub struct ItemCodec {
    alphabet: Option<Alphabet>,
}

#[derive(Debug, Clone)]
struct Alphabet {
    /// Characters of `A` in configured order; positions in `A'` are 1-based.
    chars: Vec<char>,
    positions: HashMap<char, u64>,
    display: String,
    base: u64,
}

impl ItemCodec {
    /// Build a codec for the given alphabet, or the identity codec for `None`.
    pub fn new(alphabet: Option<&str>) -> Self {
        let alphabet = alphabet.map(|alphabet| {
            let chars: Vec<char> = alphabet.chars().collect();
            let positions = chars
                .iter()
                .enumerate()
                .map(|(index, ch)| (*ch, index as u64 + 1))
                .collect();
            Alphabet {
                base: chars.len() as u64 + 1,
                positions,
                display: alphabet.to_string(),
                chars,
            }
        });
        ItemCodec { alphabet }
    }

    /// Whether this codec actually re-encodes items.
    pub fn is_identity(&self) -> bool {
        self.alphabet.is_none()
    }

    /// Compress one normalized item to its byte form.
    ///
    /// Fails with [`Error::InvalidItemChar`] when the item contains a
    /// character outside the alphabet.
    pub fn compress(&self, item: &str) -> Result<Vec<u8>> {
        let Some(alphabet) = &self.alphabet else {
            return Ok(item.as_bytes().to_vec());
        };
        let mut number = BigUint::zero();
        for ch in item.chars() {
            let position = alphabet.positions.get(&ch).copied().ok_or_else(|| {
                Error::InvalidItemChar {
                    ch,
                    alphabet: alphabet.display.clone(),
                }
            })?;
            number = number * alphabet.base + position;
        }
        if number.is_zero() {
            // Only the empty item maps to zero; it round-trips as no bytes.
            return Ok(Vec::new());
        }
        Ok(number.to_bytes_be())
    }

    /// Decompress a byte form back to the original normalized item.
    ///
    /// A zero base-`b` digit cannot be produced by [`Self::compress`], so it
    /// is rejected as corrupt input.
    pub fn decompress(&self, bytes: &[u8]) -> Result<String> {
        let Some(alphabet) = &self.alphabet else {
            return String::from_utf8(bytes.to_vec()).map_err(|_| Error::InvalidItemChar {
                ch: char::REPLACEMENT_CHARACTER,
                alphabet: String::new(),
            });
        };
        if bytes.is_empty() {
            return Ok(String::new());
        }
        let base = BigUint::from(alphabet.base);
        let mut number = BigUint::from_bytes_be(bytes);
        let mut chars = Vec::new();
        while !number.is_zero() {
            let (quotient, remainder) = number.div_rem(&base);
            let digit = remainder.to_u64().unwrap_or(0);
            if digit == 0 {
                return Err(Error::InvalidItemChar {
                    ch: SENTINEL,
                    alphabet: alphabet.display.clone(),
                });
            }
            chars.push(alphabet.chars[digit as usize - 1]);
            number = quotient;
        }
        Ok(chars.into_iter().rev().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE36: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

    #[test]
    fn roundtrip_with_custom_alphabet() {
        let codec = ItemCodec::new(Some(BASE36));
        let compressed = codec.compress("A123456789").unwrap();
        assert!(compressed.len() <= "A123456789".len());
        assert_eq!(codec.decompress(&compressed).unwrap(), "A123456789");
    }

    #[test]
    fn roundtrip_starting_with_first_alphabet_char() {
        let codec = ItemCodec::new(Some(BASE36));
        let compressed = codec.compress("0A").unwrap();
        assert!(!compressed.is_empty());
        assert_eq!(codec.decompress(&compressed).unwrap(), "0A");
    }

    #[test]
    fn out_of_alphabet_char_is_rejected() {
        let codec = ItemCodec::new(Some(BASE36));
        let err = codec.compress("Hello world!").unwrap_err();
        match err {
            arm_common::Error::InvalidItemChar { ch, alphabet } => {
                assert_eq!(ch, 'e');
                assert_eq!(alphabet, BASE36);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn identity_codec_passes_bytes_through() {
        let codec = ItemCodec::new(None);
        let compressed = codec.compress("Hello world!").unwrap();
        assert_eq!(compressed, b"Hello world!");
        assert_eq!(codec.decompress(&compressed).unwrap(), "Hello world!");
    }

    #[test]
    fn empty_item_roundtrips_as_no_bytes() {
        let codec = ItemCodec::new(Some(BASE36));
        assert!(codec.compress("").unwrap().is_empty());
        assert_eq!(codec.decompress(&[]).unwrap(), "");
    }

    #[test]
    fn leading_char_distinctions_survive() {
        // "0A" and "A" must not collide even though '0' is position zero in
        // the raw alphabet.
        let codec = ItemCodec::new(Some(BASE36));
        let a = codec.compress("0A").unwrap();
        let b = codec.compress("A").unwrap();
        assert_ne!(a, b);
    }
}
