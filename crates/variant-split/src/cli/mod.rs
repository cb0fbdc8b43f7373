//! CLI subcommand implementations for the `variant-split` binary.

pub mod rewrite_cmd;
pub mod serve;
pub mod variants_cmd;
