//! Token codec: signing, verification, and expiry decoding for the two
//! token classes.

mod codec;
mod config;


pub use codec::TokenCodec;
pub use config::TokenConfig;
