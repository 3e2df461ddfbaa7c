//! Circular prompts: ask a language model for txt2img prompts whose subject
//! reads as a circle.
//!
//! Each round sends the rule list (with the running blocklist spliced in)
//! followed by two worked examples, parses the `{"thing", "prompt"}` reply,
//! and blocks that thing for later rounds so every prompt is about
//! something new. The output file is rewritten after every success so an
//! interrupted run keeps what it has.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::llm::retry::{chat_with_retry, RetryPolicy};
use crate::llm::types::{ChatOptions, LlmChat, LlmError, Message};

pub const DEFAULT_NUM_PROMPTS: u32 = 3;
pub const DEFAULT_OUTPUT_FILE: &str = "circular_things.json";
pub const INITIAL_BLOCKLIST: [&str; 3] = ["clock", "watch", "person"];

const BLOCKLIST_PLACEHOLDER: &str = "{blocklist}";

const BASE_PROMPT_TEMPLATE: &str = r#"
Generate a high-quality image generation prompt for Stable Diffusion, with at least 20 words, formatted as a JSON object.

Rules:

1.  **Clarity and Simplicity:** Use clear, concise, and non-abstract English words. Sentences should be short and easily understood.
2. **Focus on Circular Appearance:** The prompt must describe a single, specific object.  The final depiction of the object in the image *must* appear as a near-perfect circle or a perfect circle. This circular appearance can result from the object's inherent shape, the chosen viewpoint, or a combination of both. The object itself does not need to be inherently round.
3.  **Detailed Description:**  Provide a detailed description of the object, including its texture, material, color, and any relevant details that contribute to its visual appearance.
4. **Viewpoint/Angle:** Specify the viewing angle (e.g., bird's-eye view, close-up, from below) if it is crucial to achieving the circular appearance. If a specific angle is required to perceive the object as circular, it *must* be included.
5.  **No Imperative Forms:** Avoid using commands or imperative verbs (e.g., "Create," "Generate," "Make").  Describe the scene as it *is*.
6.  **Singular Noun:** The object name must be a singular noun.
7.  **Lighting and Atmosphere:** Describe the lighting conditions (e.g., soft, bright, dim, natural light, studio lighting) and the overall atmosphere or mood (e.g., serene, dramatic, mysterious).
8.  **Photorealistic Style:** The generated image should be a photorealistic photograph.
9.  **Output Format:** The output must be a JSON object with "thing" and "prompt" keys.
10. **Circular Composition:** The object should be composed in such a way that its circularity is the dominant visual feature. The prompt should emphasize aspects of the scene that contribute to this circular composition.
11. **Prohibited Items:** Do not generate a prompt for the following items nor similar items: {blocklist}
12. **Positive and Appealing Imagery:** The subject matter and its depiction must be generally perceived as positive, appealing, and suitable for a broad audience.  Avoid anything that could be considered disturbing, frightening, disgusting, gruesome, or otherwise offensive.  Specifically, do not include insects, spiders, webs, decay, bodily fluids, weapons, violence, or anything associated with harm or distress.
"#;

const EXAMPLES: [(&str, &str); 2] = [
    (
        "marble",
        "A highly detailed, photorealistic image of a single, perfectly round, polished onyx marble. The marble rests on a smooth, dark wooden surface, illuminated by soft, diffused natural light. The lighting creates a gentle, subtle highlight on the top curve of the sphere, emphasizing its smoothness and perfect circular form. The onyx has subtle, swirling white veins, captured in sharp detail. The background is slightly blurred, emphasizing the crisp focus on the marble. The overall atmosphere is serene and minimalistic. Shot from a slightly elevated angle, the viewer looks down upon the marble, showcasing its three-dimensional roundness.",
    ),
    (
        "ferris wheel",
        "A photorealistic, wide-angle shot of a large, illuminated ferris wheel at night. The circular structure is brightly lit with colorful lights, showcasing its intricate design and towering height. The shot is taken from a low angle, emphasizing the scale and grandeur of the wheel against a dark, starry sky. The long exposure captures the motion blur of the lights as the wheel slowly rotates. The overall atmosphere is vibrant and festive.",
    ),
];

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("prompt JSON encode failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
}

/// One generated prompt and the object it depicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircularPrompt {
    pub thing: String,
    pub prompt: String,
}

// =============================================================================
// MESSAGES
// =============================================================================

/// The rule list with `blocklist` joined by commas.
#[must_use]
pub fn render_base_prompt(blocklist: &[String]) -> String {
    BASE_PROMPT_TEMPLATE.replace(BLOCKLIST_PLACEHOLDER, &blocklist.join(","))
}

/// Rule message followed by one `Example: {json}` message per worked example.
///
/// # Errors
///
/// Returns [`PromptError::Encode`] if an example fails to serialize.
pub fn build_messages(blocklist: &[String]) -> Result<Vec<Message>, PromptError> {
    let mut messages = vec![Message::user(render_base_prompt(blocklist))];
    for (thing, prompt) in EXAMPLES {
        let example = CircularPrompt { thing: thing.to_string(), prompt: prompt.to_string() };
        messages.push(Message::user(format!("Example: {}", serde_json::to_string(&example)?)));
    }
    Ok(messages)
}

fn parse_prompt(content: &str) -> Result<CircularPrompt, serde_json::Error> {
    serde_json::from_str(content.trim())
}

// =============================================================================
// GENERATOR
// =============================================================================

/// Runs prompt rounds against one model, accumulating results and the blocklist.
pub struct PromptGenerator<'a> {
    llm: &'a dyn LlmChat,
    policy: RetryPolicy,
    options: ChatOptions,
    blocklist: Vec<String>,
    outputs: Vec<CircularPrompt>,
}

impl<'a> PromptGenerator<'a> {
    #[must_use]
    pub fn new(llm: &'a dyn LlmChat, policy: RetryPolicy, options: ChatOptions) -> Self {
        Self {
            llm,
            policy,
            options,
            blocklist: INITIAL_BLOCKLIST.iter().map(ToString::to_string).collect(),
            outputs: Vec::new(),
        }
    }

    #[must_use]
    pub fn blocklist(&self) -> &[String] {
        &self.blocklist
    }

    #[must_use]
    pub fn outputs(&self) -> &[CircularPrompt] {
        &self.outputs
    }

    /// One round. `Ok(None)` when the reply had no usable prompt.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Llm`] once retries are exhausted or on a
    /// non-retryable failure.
    pub async fn next_prompt(&mut self) -> Result<Option<CircularPrompt>, PromptError> {
        let messages = build_messages(&self.blocklist)?;
        let response = chat_with_retry(self.llm, &self.policy, &self.options, &messages).await?;
        tracing::debug!(
            model = %response.model,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "prompt round"
        );

        let Some(content) = response.content else {
            tracing::error!("failed to get content; skipping");
            return Ok(None);
        };
        let prompt = match parse_prompt(&content) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::error!(error = %e, %content, "reply is not a prompt object; skipping");
                return Ok(None);
            }
        };

        tracing::info!(thing = %prompt.thing, prompt = %prompt.prompt, "prompt generated");
        self.blocklist.push(prompt.thing.clone());
        self.outputs.push(prompt.clone());
        Ok(Some(prompt))
    }

    /// Run `num_prompts` rounds, rewriting `output_path` after each success.
    ///
    /// # Errors
    ///
    /// Returns the first LLM or write failure; results written so far stay on disk.
    pub async fn run(&mut self, num_prompts: u32, output_path: &Path) -> Result<&[CircularPrompt], PromptError> {
        for round in 0..num_prompts {
            tracing::debug!(round, blocklist = ?self.blocklist, "requesting prompt");
            if self.next_prompt().await?.is_some() {
                write_prompts(output_path, &self.outputs).await?;
            }
        }
        Ok(&self.outputs)
    }
}

/// Overwrite `path` with `prompts` as a compact JSON array.
///
/// # Errors
///
/// Returns [`PromptError::Write`] if the file cannot be written.
pub async fn write_prompts(path: &Path, prompts: &[CircularPrompt]) -> Result<(), PromptError> {
    let json = serde_json::to_string(prompts)?;
    tokio::fs::write(path, json)
        .await
        .map_err(|source| PromptError::Write { path: path.to_path_buf(), source })
}

#[cfg(test)]
#[path = "prompts_test.rs"]
mod tests;
