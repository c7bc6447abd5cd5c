//! Decoded ABI values

use alloy::primitives::{Address, U256};

/// A value shaped like an [`AbiType`](super::AbiType)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    Address(Address),
    Bool(bool),
    Uint(U256),
    String(String),
    Array(Vec<AbiValue>),
    /// Members in declaration order, keyed by member name
    Tuple(Vec<(String, AbiValue)>),
}

impl AbiValue {
    /// Build a tuple from `(name, value)` pairs
    pub fn tuple<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = (S, AbiValue)>,
        S: Into<String>,
    {
        AbiValue::Tuple(members.into_iter().map(|(n, v)| (n.into(), v)).collect())
    }

    pub fn string(value: impl Into<String>) -> Self {
        AbiValue::String(value.into())
    }

    pub fn uint(value: u64) -> Self {
        AbiValue::Uint(U256::from(value))
    }

    /// Look up a tuple member by name
    pub fn field(&self, name: &str) -> Option<&AbiValue> {
        match self {
            AbiValue::Tuple(members) => members.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            AbiValue::Address(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AbiValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<U256> {
        match self {
            AbiValue::Uint(u) => Some(*u),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AbiValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[AbiValue]> {
        match self {
            AbiValue::Array(items) => Some(items),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lookup() {
        let value = AbiValue::tuple([
            ("name", AbiValue::string("alice")),
            ("contact", AbiValue::string("alice@example.com")),
        ]);
        assert_eq!(value.field("contact").and_then(AbiValue::as_str), Some("alice@example.com"));
        assert!(value.field("missing").is_none());
        assert!(AbiValue::Bool(true).field("name").is_none());
    }
}
