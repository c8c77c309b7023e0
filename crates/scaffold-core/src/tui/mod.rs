//! Interactive `create` flow built on cliclack
//!
//! Only compiled with the `tui` feature.

mod prompts;

pub use prompts::{run, CreateArgs};
