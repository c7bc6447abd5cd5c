//! ABI encoding of call arguments and tuple values

use alloy::primitives::{Address, Bytes, Selector, U256};

use crate::domain::abi::{AbiType, AbiValue, WORD};
use crate::error::{CodecError, QueryError};

/// Encode a single value per its type descriptor.
///
/// Tuple members are matched by position; member names on the value side are
/// not checked against the descriptor.
pub fn encode(ty: &AbiType, value: &AbiValue) -> Result<Vec<u8>, CodecError> {
    match (ty, value) {
        (AbiType::Address, AbiValue::Address(address)) => {
            let mut word = [0u8; WORD];
            word[WORD - 20..].copy_from_slice(address.as_slice());
            Ok(word.to_vec())
        }

        (AbiType::Bool, AbiValue::Bool(flag)) => Ok(uint_word(U256::from(u8::from(*flag))).to_vec()),

        (AbiType::Uint(bits), AbiValue::Uint(number)) => {
            if number.bit_len() > *bits {
                return Err(CodecError::IntegerOverflow { bits: *bits });
            }
            Ok(uint_word(*number).to_vec())
        }

        (AbiType::String, AbiValue::String(text)) => {
            let bytes = text.as_bytes();
            let mut out = Vec::with_capacity(WORD + padded_len(bytes.len()));
            out.extend_from_slice(&usize_word(bytes.len()));
            out.extend_from_slice(bytes);
            out.resize(WORD + padded_len(bytes.len()), 0);
            Ok(out)
        }

        (AbiType::Array(element), AbiValue::Array(items)) => {
            let pairs: Vec<(&AbiType, &AbiValue)> =
                items.iter().map(|item| (element.as_ref(), item)).collect();
            let mut out = usize_word(items.len()).to_vec();
            out.extend(encode_sequence(&pairs)?);
            Ok(out)
        }

        (AbiType::Tuple(members), AbiValue::Tuple(values)) if members.len() == values.len() => {
            let pairs: Vec<(&AbiType, &AbiValue)> = members
                .iter()
                .zip(values.iter())
                .map(|(member, (_, value))| (&member.ty, value))
                .collect();
            encode_sequence(&pairs)
        }

        _ => Err(CodecError::TypeMismatch {
            expected: ty.canonical(),
        }),
    }
}

/// Encode a parameter list (function arguments or return values) as one tuple
pub fn encode_params(types: &[AbiType], values: &[AbiValue]) -> Result<Vec<u8>, CodecError> {
    if types.len() != values.len() {
        return Err(CodecError::TypeMismatch {
            expected: format!("({})", crate::domain::abi::canonical_list(types)),
        });
    }
    let pairs: Vec<(&AbiType, &AbiValue)> = types.iter().zip(values.iter()).collect();
    encode_sequence(&pairs)
}

/// Head/tail layout shared by tuples and array bodies.
///
/// Offsets written into the head are relative to the start of this sequence.
fn encode_sequence(pairs: &[(&AbiType, &AbiValue)]) -> Result<Vec<u8>, CodecError> {
    let head_len: usize = pairs.iter().map(|(ty, _)| ty.head_size()).sum();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for (ty, value) in pairs {
        if ty.is_dynamic() {
            head.extend_from_slice(&usize_word(head_len + tail.len()));
            tail.extend(encode(ty, value)?);
        } else {
            head.extend(encode(ty, value)?);
        }
    }

    head.extend(tail);
    Ok(head)
}

/// Build call data: `selector || encoded arguments`
pub fn encode_call(selector: Selector, args: &[(AbiType, AbiValue)]) -> Result<Bytes, CodecError> {
    let (types, values): (Vec<AbiType>, Vec<AbiValue>) = args.iter().cloned().unzip();
    let mut calldata = selector.to_vec();
    if !args.is_empty() {
        calldata.extend(encode_params(&types, &values)?);
    }
    Ok(Bytes::from(calldata))
}

/// Wrap raw address bytes as an `address` argument; must be exactly 20 bytes
pub fn address_argument(raw: &[u8]) -> Result<(AbiType, AbiValue), QueryError> {
    if raw.len() != 20 {
        return Err(QueryError::InvalidArgument(format!(
            "address must be 20 bytes, got {}",
            raw.len()
        )));
    }
    Ok((AbiType::Address, AbiValue::Address(Address::from_slice(raw))))
}

/// Parse a hex address string (`0x` prefix optional, case-insensitive, no
/// checksum validation)
pub fn parse_address(input: &str) -> Result<Address, QueryError> {
    let trimmed = input.trim();
    let payload = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if payload.len() != 40 || !payload.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(QueryError::InvalidArgument(format!(
            "invalid address '{}': expected 40 hex characters, got {}",
            trimmed,
            payload.len()
        )));
    }

    let bytes = hex::decode(payload)
        .map_err(|e| QueryError::InvalidArgument(format!("invalid hex in '{}': {}", trimmed, e)))?;
    Ok(Address::from_slice(&bytes))
}

fn uint_word(value: U256) -> [u8; WORD] {
    value.to_be_bytes::<WORD>()
}

fn usize_word(value: usize) -> [u8; WORD] {
    uint_word(U256::from(value))
}

/// Length rounded up to a whole number of words
pub(crate) fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD) * WORD
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::abi::Param;
    use crate::domain::abi::selector;

    fn word_hex(encoded: &[u8], index: usize) -> String {
        hex::encode(&encoded[index * WORD..(index + 1) * WORD])
    }

    #[test]
    fn test_encode_address_left_padded() {
        let address = parse_address("0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb0").unwrap();
        let encoded = encode(&AbiType::Address, &AbiValue::Address(address)).unwrap();
        assert_eq!(
            hex::encode(encoded),
            "000000000000000000000000742d35cc6634c0532925a3b844bc9e7595f0beb0"
        );
    }

    #[test]
    fn test_encode_get_agreement_call() {
        let address = parse_address("0x742d35cc6634c0532925a3b844bc9e7595f0beb0").unwrap();
        let arg = address_argument(address.as_slice()).unwrap();
        let calldata = encode_call(selector("getAgreement(address)"), &[arg]).unwrap();

        assert_eq!(calldata.len(), 4 + WORD);
        assert_eq!(
            hex::encode(&calldata),
            "295c1fed000000000000000000000000742d35cc6634c0532925a3b844bc9e7595f0beb0"
        );
    }

    #[test]
    fn test_encode_no_args() {
        let calldata = encode_call(selector("getDetails()"), &[]).unwrap();
        assert_eq!(hex::encode(&calldata), "fbbf93a0");
    }

    #[test]
    fn test_address_argument_length() {
        assert!(address_argument(&[0u8; 20]).is_ok());
        assert!(matches!(
            address_argument(&[0u8; 21]),
            Err(QueryError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parse_address_rejects_41_hex_chars() {
        let result = parse_address("0x1eaCD100B0546E433fbf4d773109cAD482c346860");
        assert!(matches!(result, Err(QueryError::InvalidArgument(_))));
        assert!(parse_address("0xzz2d35cc6634c0532925a3b844bc9e7595f0beb0").is_err());
        assert!(parse_address("742d35cc6634c0532925a3b844bc9e7595f0beb0").is_ok());
    }

    #[test]
    fn test_encode_string_padding() {
        let encoded = encode(&AbiType::String, &AbiValue::string("hello")).unwrap();
        assert_eq!(encoded.len(), 2 * WORD);
        assert_eq!(word_hex(&encoded, 0), format!("{:064x}", 5));
        assert_eq!(&encoded[WORD..WORD + 5], b"hello");
        assert!(encoded[WORD + 5..].iter().all(|b| *b == 0));

        let empty = encode(&AbiType::String, &AbiValue::string("")).unwrap();
        assert_eq!(empty, vec![0u8; WORD]);
    }

    #[test]
    fn test_encode_tuple_offsets() {
        // (uint256,string): head = value word + offset word, tail = string
        let ty = AbiType::tuple(vec![
            Param::new("n", AbiType::Uint(256)),
            Param::new("s", AbiType::String),
        ]);
        let value = AbiValue::tuple([("n", AbiValue::uint(7)), ("s", AbiValue::string("ab"))]);
        let encoded = encode(&ty, &value).unwrap();

        assert_eq!(encoded.len(), 4 * WORD);
        assert_eq!(word_hex(&encoded, 0), format!("{:064x}", 7));
        assert_eq!(word_hex(&encoded, 1), format!("{:064x}", 0x40));
        assert_eq!(word_hex(&encoded, 2), format!("{:064x}", 2));
    }

    #[test]
    fn test_encode_array_of_strings() {
        let ty = AbiType::array(AbiType::String);
        let value = AbiValue::Array(vec![AbiValue::string("a"), AbiValue::string("b")]);
        let encoded = encode(&ty, &value).unwrap();

        // count, two offsets relative to the data region, two (len, data) pairs
        assert_eq!(encoded.len(), 7 * WORD);
        assert_eq!(word_hex(&encoded, 0), format!("{:064x}", 2));
        assert_eq!(word_hex(&encoded, 1), format!("{:064x}", 0x40));
        assert_eq!(word_hex(&encoded, 2), format!("{:064x}", 0x80));
    }

    #[test]
    fn test_encode_type_mismatch() {
        let err = encode(&AbiType::Address, &AbiValue::Bool(true)).unwrap_err();
        assert_eq!(
            err,
            CodecError::TypeMismatch {
                expected: "address".into()
            }
        );
    }

    #[test]
    fn test_encode_uint_overflow() {
        let err = encode(&AbiType::Uint(8), &AbiValue::uint(256)).unwrap_err();
        assert_eq!(err, CodecError::IntegerOverflow { bits: 8 });
        assert!(encode(&AbiType::Uint(8), &AbiValue::uint(255)).is_ok());
    }
}
