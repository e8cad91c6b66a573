//! CLI commands

pub mod generate;
pub mod list;
pub mod load;
pub mod new;
