//! Document import: format detection, decoding, and handoff to the parser.

pub mod decode;
pub mod handlers;
