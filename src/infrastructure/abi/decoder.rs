//! ABI decoding of call results
//!
//! Every read is bounds-checked against the input buffer. Any fault aborts
//! the whole decode; no partial value is returned.
//!
//! Decoded size is metered against the input length. Array heads, dynamic
//! tuple heads and string bodies each occupy their own bytes in a
//! well-formed encoding, so their total never exceeds the input. Offsets
//! that alias the same tail region exhaust the budget instead of expanding
//! without bound.

use alloy::primitives::{Address, U256};

use crate::domain::abi::{AbiType, AbiValue, WORD};
use crate::error::CodecError;

/// Decode one value whose encoding starts at `offset`.
///
/// For a static type `offset` is its head slot; for a dynamic type it is the
/// start of its out-of-line data. Offsets found inside a tuple are resolved
/// relative to that tuple's start; offsets inside an array body are relative
/// to the first word after the element count.
pub fn decode(ty: &AbiType, data: &[u8], offset: usize) -> Result<AbiValue, CodecError> {
    Decoder::new(data).value(ty, offset)
}

/// Decode a parameter list (function return values or arguments after the
/// selector) laid out as one tuple at position 0
pub fn decode_params(types: &[AbiType], data: &[u8]) -> Result<Vec<AbiValue>, CodecError> {
    Decoder::new(data).sequence(types.iter(), 0)
}

struct Decoder<'a> {
    data: &'a [u8],
    /// Bytes of decoded content still allowed
    remaining: usize,
}

impl<'a> Decoder<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            remaining: data.len(),
        }
    }

    fn value(&mut self, ty: &AbiType, offset: usize) -> Result<AbiValue, CodecError> {
        match ty {
            AbiType::Address => {
                let word = self.read_slice(offset, WORD)?;
                if word[..WORD - 20].iter().any(|b| *b != 0) {
                    return Err(CodecError::DirtyPadding {
                        position: offset,
                        kind: "address",
                    });
                }
                Ok(AbiValue::Address(Address::from_slice(&word[WORD - 20..])))
            }

            AbiType::Bool => match self.read_word(offset)? {
                w if w.is_zero() => Ok(AbiValue::Bool(false)),
                w if w == U256::from(1u8) => Ok(AbiValue::Bool(true)),
                _ => Err(CodecError::InvalidBool { position: offset }),
            },

            AbiType::Uint(bits) => {
                let value = self.read_word(offset)?;
                if value.bit_len() > *bits {
                    return Err(CodecError::DirtyPadding {
                        position: offset,
                        kind: "uint",
                    });
                }
                Ok(AbiValue::Uint(value))
            }

            AbiType::String => {
                let len = self.read_usize(offset)?;
                let start = offset + WORD;
                let padded = len
                    .div_ceil(WORD)
                    .checked_mul(WORD)
                    .ok_or(CodecError::WordOverflow { position: offset })?;
                // Require the padding too, so a truncated tail never decodes
                let body = self.read_slice(start, padded)?;
                self.charge(offset, len)?;
                let text = String::from_utf8(body[..len].to_vec())
                    .map_err(|_| CodecError::InvalidUtf8 { position: start })?;
                Ok(AbiValue::String(text))
            }

            AbiType::Array(element) => {
                let count = self.read_usize(offset)?;
                let body = offset + WORD;
                // Reject impossible counts before allocating anything
                let heads = count
                    .checked_mul(element.head_size())
                    .ok_or(CodecError::WordOverflow { position: offset })?;
                self.read_slice(body, heads)?;
                self.charge(offset, heads)?;

                self.sequence(std::iter::repeat(element.as_ref()).take(count), body)
                    .map(AbiValue::Array)
            }

            AbiType::Tuple(members) => {
                if ty.is_dynamic() {
                    // Static tuples are metered by the head that inlines them
                    let head: usize = members.iter().map(|m| m.ty.head_size()).sum();
                    self.read_slice(offset, head)?;
                    self.charge(offset, head)?;
                }
                let values = self.sequence(members.iter().map(|m| &m.ty), offset)?;
                Ok(AbiValue::Tuple(
                    members
                        .iter()
                        .zip(values)
                        .map(|(member, value)| (member.name.to_string(), value))
                        .collect(),
                ))
            }
        }
    }

    /// Walk a head region starting at `base`, following offset words for
    /// dynamic members
    fn sequence<'t>(
        &mut self,
        types: impl Iterator<Item = &'t AbiType>,
        base: usize,
    ) -> Result<Vec<AbiValue>, CodecError> {
        let mut cursor = base;
        let mut values = Vec::new();

        for ty in types {
            let value = if ty.is_dynamic() {
                let relative = self.read_usize(cursor)?;
                let target = base
                    .checked_add(relative)
                    .ok_or(CodecError::WordOverflow { position: cursor })?;
                self.value(ty, target)?
            } else {
                self.value(ty, cursor)?
            };
            values.push(value);
            cursor += ty.head_size();
        }

        Ok(values)
    }

    fn charge(&mut self, position: usize, len: usize) -> Result<(), CodecError> {
        self.remaining = self
            .remaining
            .checked_sub(len)
            .ok_or(CodecError::ExpansionLimit {
                position,
                limit: self.data.len(),
            })?;
        Ok(())
    }

    fn read_slice(&self, position: usize, len: usize) -> Result<&'a [u8], CodecError> {
        let data = self.data;
        position
            .checked_add(len)
            .filter(|end| *end <= data.len())
            .map(|end| &data[position..end])
            .ok_or(CodecError::OutOfBounds {
                position,
                len,
                available: data.len(),
            })
    }

    fn read_word(&self, position: usize) -> Result<U256, CodecError> {
        self.read_slice(position, WORD).map(U256::from_be_slice)
    }

    fn read_usize(&self, position: usize) -> Result<usize, CodecError> {
        let word = self.read_word(position)?;
        usize::try_from(word).map_err(|_| CodecError::WordOverflow { position })
    }
}
