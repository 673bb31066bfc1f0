//! CLI subcommand implementations. One module per command; `main` parses
//! arguments and routes here.

pub mod ask;
pub mod convert;
pub mod dispatch;
pub mod execute;
pub mod install;
pub mod organize;
pub mod rename;
pub mod summarize;
