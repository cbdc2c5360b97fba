//! Wire-level types shared between server and client.

pub mod response;
