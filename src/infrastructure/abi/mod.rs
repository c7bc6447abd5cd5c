//! ABI codec - argument encoding, tuple encode/decode

mod decoder;
mod encoder;

pub use decoder::{decode, decode_params};
pub use encoder::{address_argument, encode, encode_call, encode_params, parse_address};
