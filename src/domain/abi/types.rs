//! ABI type descriptors
//!
//! A closed tree of the ABI types the agreement schema uses. The codec
//! recurses over it by pattern matching.

use std::fmt;

/// Size of one ABI word in bytes
pub const WORD: usize = 32;

/// A named member of a tuple type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Member name as declared in the Solidity struct
    pub name: &'static str,
    /// Member type
    pub ty: AbiType,
}

impl Param {
    pub fn new(name: &'static str, ty: AbiType) -> Self {
        Self { name, ty }
    }
}

/// ABI type descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiType {
    Address,
    Bool,
    /// `uintN`, N in bits (8..=256, multiple of 8)
    Uint(usize),
    String,
    /// Ordered list of named members
    Tuple(Vec<Param>),
    /// Variable-length array `T[]`
    Array(Box<AbiType>),
}

impl AbiType {
    pub fn tuple(members: Vec<Param>) -> Self {
        AbiType::Tuple(members)
    }

    pub fn array(element: AbiType) -> Self {
        AbiType::Array(Box::new(element))
    }

    /// Whether the type is encoded out-of-line behind an offset word
    pub fn is_dynamic(&self) -> bool {
        match self {
            AbiType::Address | AbiType::Bool | AbiType::Uint(_) => false,
            AbiType::String | AbiType::Array(_) => true,
            AbiType::Tuple(members) => members.iter().any(|m| m.ty.is_dynamic()),
        }
    }

    /// Number of bytes the type occupies in its enclosing head region.
    ///
    /// Dynamic types take a single offset word; static tuples are inlined.
    pub fn head_size(&self) -> usize {
        match self {
            AbiType::Tuple(members) if !self.is_dynamic() => {
                members.iter().map(|m| m.ty.head_size()).sum()
            }
            _ => WORD,
        }
    }

    /// Canonical type string as used in function signatures,
    /// e.g. `(string,(string,uint8)[],string)`
    pub fn canonical(&self) -> String {
        match self {
            AbiType::Address => "address".to_string(),
            AbiType::Bool => "bool".to_string(),
            AbiType::Uint(bits) => format!("uint{}", bits),
            AbiType::String => "string".to_string(),
            AbiType::Tuple(members) => format!("({})", canonical_list(members.iter().map(|m| &m.ty))),
            AbiType::Array(element) => format!("{}[]", element.canonical()),
        }
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

/// Comma-joined canonical strings, no spaces
pub fn canonical_list<'a>(types: impl IntoIterator<Item = &'a AbiType>) -> String {
    types
        .into_iter()
        .map(AbiType::canonical)
        .collect::<Vec<_>>()
        .join(",")
}
