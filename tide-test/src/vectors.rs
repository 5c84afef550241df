//! Fixed test vectors shared between the Tide crates.
//!
//! Vectors are stored as raw bytes, so this crate doesn't depend on `tide_chain`.

#![allow(missing_docs)]

use hex::FromHex;
use lazy_static::lazy_static;

lazy_static! {
    /// Sender public keys used by fee and block tests.
    pub static ref ALICE_PUBLIC_KEY: [u8; 32] = <[u8; 32]>::from_hex(
        "d7a5c9b6c86c03f7b1d1cf4cf1e2e0a1e3f54f0e6c0f8a4bd0b8c2fd3a2b1c01"
    )
    .expect("valid hex");

    pub static ref BOB_PUBLIC_KEY: [u8; 32] = <[u8; 32]>::from_hex(
        "3b6a27bcceb6a42d62a3a8d02a6f0d73653215771de243a63ac048a18b59da29"
    )
    .expect("valid hex");

    pub static ref CAROL_PUBLIC_KEY: [u8; 32] = <[u8; 32]>::from_hex(
        "9f4d5e5d2c2b8f1a0e7c6b5a4938271605f4e3d2c1b0a9f8e7d6c5b4a3928170"
    )
    .expect("valid hex");

    /// An issued asset id used as a sponsored fee asset.
    pub static ref SPONSORED_ASSET_ID: [u8; 32] = <[u8; 32]>::from_hex(
        "5a1f00000000000000000000000000000000000000000000000000000000beef"
    )
    .expect("valid hex");

    /// Encoding of the V1 expression `true`.
    pub static ref EXPR_TRUE: Vec<u8> = Vec::from_hex("06").expect("valid hex");

    /// Encoding of the V1 expression `height >= 100`.
    ///
    /// `CALL`, native `>=` (id 103), two arguments, `REF "height"`, `LONG 100`.
    pub static ref EXPR_HEIGHT_AT_LEAST_100: Vec<u8> = Vec::from_hex(concat!(
        "09",
        "00", "0067",
        "00000002",
        "05", "00000006", "686569676874",
        "00", "0000000000000064",
    ))
    .expect("valid hex");

    /// Encoding of `let x = 1; if (x == 1) then true else false`.
    pub static ref EXPR_LET_IF: Vec<u8> = Vec::from_hex(concat!(
        "04", "00000001", "78",
        "00", "0000000000000001",
        "03",
        "09", "00", "0000", "00000002",
        "05", "00000001", "78",
        "00", "0000000000000001",
        "06",
        "07",
    ))
    .expect("valid hex");
}
