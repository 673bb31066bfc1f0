//! `otto install <tool>`

use anyhow::Result;
use otto_common::OttoConfig;
use owo_colors::OwoColorize;

pub async fn run(tool: &str, config: &OttoConfig) -> Result<()> {
    eprintln!("{} {}...", "Downloading".blue().bold(), tool);
    crate::install::install_tool(tool, config).await?;
    println!("{} Successfully installed {}!", "Done.".green().bold(), tool);
    Ok(())
}
