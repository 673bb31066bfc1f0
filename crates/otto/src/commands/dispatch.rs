//! `otto dispatch <agent> <query> [paths...]`
//!
//! Emits exactly one line of compact JSON on stdout — the plan, or a
//! fallback with `action = "none"` when the model's reply was not a plan.
//! Everything else (logs, progress) goes to stderr so the machine-readable
//! line stays clean.

use crate::agents::plan::ParsedReply;
use crate::agents::{agent_prompt, build_context, vision_images, AgentKind};
use anyhow::{bail, Result};
use otto_common::llm::MAX_VISION_IMAGES;
use otto_common::{LlmClient, OttoConfig};
use std::path::PathBuf;
use tracing::debug;

pub async fn run(
    agent_name: &str,
    query: &str,
    paths: &[PathBuf],
    config: &OttoConfig,
) -> Result<()> {
    // Validation happens before any LLM traffic.
    let Some(agent) = AgentKind::from_name(agent_name) else {
        let valid: Vec<&str> = AgentKind::ALL.iter().map(|a| a.name()).collect();
        bail!(
            "Unknown agent '{}'. Valid agents: {}",
            agent_name,
            valid.join(", ")
        );
    };

    let prompt = format!(
        "{}\n\n{}",
        agent_prompt(agent),
        build_context(query, paths)
    );
    let images = vision_images(paths, MAX_VISION_IMAGES);
    debug!(
        "Dispatching agent '{}' with {} image(s)",
        agent.name(),
        images.len()
    );

    let client = LlmClient::new(config);
    let reply = client.complete_with_images(&prompt, &images).await;

    // A failed LLM call is carried in the reply text and lands in the
    // fallback path: the output contract holds either way.
    println!("{}", ParsedReply::from_reply(&reply).into_output_json());
    Ok(())
}
