//! Flows module - Operations combining scanning, reading and writing
//!
//! Provides:
//! - collate: Bundle source folders into per-folder text files

pub mod collate;
