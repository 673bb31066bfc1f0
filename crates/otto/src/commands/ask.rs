//! `otto ask <query> [paths...]`
//!
//! One round trip: ask the model for a runnable snippet, then execute it
//! through the safety-gated executor. Replies without a code block are
//! printed as-is.

use anyhow::Result;
use otto_common::exec::{run_python_script, run_shell, ExecStatus};
use otto_common::llm::{extract_code_block, CodeLang};
use otto_common::{LlmClient, OttoConfig};
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub async fn run(query: &str, paths: &[PathBuf], config: &OttoConfig) -> Result<()> {
    let context = if paths.is_empty() {
        String::new()
    } else {
        let names: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        format!("\nFiles: {:?}", names)
    };
    let prompt = format!(
        "Write code for: {}{}\nOutput ONLY a ```python or ```bash block.",
        query, context
    );

    let client = LlmClient::new(config);
    let reply = client.complete(&prompt).await;

    match extract_code_block(&reply) {
        Some((CodeLang::Python, code)) => {
            report(run_python_script(&code, config).await);
        }
        Some((CodeLang::Bash, code)) => {
            eprintln!("{} {}", "$".blue().bold(), code);
            report(run_shell(&code, config).await);
        }
        None => println!("{}", reply.yellow()),
    }
    Ok(())
}

/// Print an execution result the way the interactive commands do.
pub fn report(result: otto_common::ExecResult) {
    match result.status {
        ExecStatus::Succeeded => {
            if !result.stdout.is_empty() {
                println!("{}", result.stdout.trim_end());
            }
            println!("{}", "Done.".green());
        }
        ExecStatus::Blocked => {
            println!("{} Dangerous command detected.", "Blocked:".red().bold());
        }
        ExecStatus::Failed => {
            println!("{}", result.stderr.trim_end().red());
        }
        ExecStatus::TimedOut => {
            println!("{}", "Timed out (5 min limit).".red().bold());
        }
    }
}
