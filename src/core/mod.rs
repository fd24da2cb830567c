// src/core/mod.rs

pub mod integration;
pub mod paths;
pub mod registry;
pub mod script_loader;
pub mod settings;
pub mod xml;
pub mod xml_generator;
