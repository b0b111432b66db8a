//! Backends module - Filesystem access used by the collation flow
//!
//! Provides:
//! - scan: Recursive folder enumeration with extension and blacklist filtering

pub mod scan;
