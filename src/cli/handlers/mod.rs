// src/cli/handlers/mod.rs

// One module per CLI command. Every handler parses its own arguments.

pub mod commons;
pub mod compress;
pub mod extract;
pub mod inspect;
pub mod integrate;
pub mod make_xml;
