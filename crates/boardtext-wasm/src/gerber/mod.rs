//! Gerber-subset scanning and coordinate decoding.

pub mod decoder;
pub mod parser;
pub mod scanner;
pub mod types;

pub use decoder::*;
pub use parser::*;
pub use scanner::*;
pub use types::*;
