//! Otto Common - shared building blocks for the otto CLI
//!
//! Holds everything both the command layer and the conversion engine need:
//! startup configuration, the file category tables, the command safety
//! filter, the shell/script executor, and the LLM client.

pub mod categories;
pub mod config;
pub mod exec;
pub mod llm;
pub mod safety;

pub use categories::FileCategory;
pub use config::OttoConfig;
pub use exec::{ExecResult, ExecStatus};
pub use llm::LlmClient;
pub use safety::{check_command, Verdict};
