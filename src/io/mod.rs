//! Instance file input.

mod ttp_format;

pub use ttp_format::{load_ttp, parse_ttp, read_ttp, ParseError};
