//! Tool detection
//!
//! This module provides preflight checks for the package manager and
//! compiler front end named by a profile's setup commands.

pub mod check;

pub use check::{check_program, check_tools, required_programs, ToolInfo};
