//! CLI module for bistro - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for the chat REPL, the
//! web front end, one-shot questions, and local category lookups.

pub mod commands;

pub use commands::Cli;
