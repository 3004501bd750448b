//! RESP2 wire protocol: value types, parser, command encoder, and the
//! reply renderer used by the CLI driver.

pub mod parser;
pub mod render;
pub mod types;
pub mod writer;

pub use render::render;
pub use types::RespValue;
