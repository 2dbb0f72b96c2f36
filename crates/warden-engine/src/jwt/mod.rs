//! Signed access tokens: claims, key management, encoding, decoding.

pub mod claims;
pub mod decoder;
pub mod encoder;
pub mod keys;

pub use claims::Claims;
pub use decoder::JwtDecoder;
pub use encoder::JwtEncoder;
pub use keys::{JwtKeys, KeySource};
