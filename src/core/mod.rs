//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Run configuration and its defaults
//! - Error type shared by every stage
//! - Result model (TaskOutcome, TaskReport, RunSummary)
//! - Path filtering and normalization
//! - Strict UTF-8 file reading
//! - Summary rendering
//! - Token counting and hashing for output statistics

pub mod config;
pub mod error;
pub mod file_reader;
pub mod model;
pub mod paths;
pub mod render;
pub mod tokenizer;
pub mod util;
