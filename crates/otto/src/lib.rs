//! Otto - a native file utility agent.
//!
//! Converts files between formats through whichever capable tool the host
//! actually has, organizes and renames files with LLM-planned actions, and
//! runs generated snippets behind a safety filter.

pub mod agents;
pub mod commands;
pub mod convert;
pub mod install;
pub mod util;
