//! # System Interaction Layer
//!
//! Boundary between the descriptor logic and the filesystem formats it has to deal with.
//!
//! ## Modules
//!
//! - **`archive`**: Packs directories into gzipped tarballs and unpacks them again, so a
//!   directory can travel through Galaxy as a single dataset. Backs the `compress` and
//!   `extract` commands that generated templates call around directory options.

pub mod archive;
