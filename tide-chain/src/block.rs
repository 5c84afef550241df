//! Blocks and block-related structures (heights).

mod height;

pub use height::Height;
