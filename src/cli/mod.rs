//! CLI module for climateframe
//!
//! Handles command-line argument parsing and verbosity control.

pub mod args;

pub use args::{Args, Commands, Verbosity};
