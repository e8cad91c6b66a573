//! Helper functions shared by the generator and the commands

mod date;
mod html;
mod slug;

pub use date::*;
pub use html::*;
pub use slug::*;
