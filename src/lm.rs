//! Model clients.
//!
//! Every workflow talks to a model through [`ModelClient`]: a prompt goes in,
//! generated text comes out. Two backends exist:
//!
//! - [`GeminiClient`] calls the Generative Language API `generateContent`
//!   endpoint over HTTPS.
//! - [`CommandClient`] runs a user-configured command with the prompt on
//!   stdin and takes stdout as the response. Any local model wrapper or
//!   script works (`llm`, `ollama run`, a test fixture).
//!
//! The backend is chosen from [`Settings`]: a configured LM command wins,
//! otherwise Gemini is used.

use crate::config::Settings;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::json;
use std::io::Write;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Text generation backend.
pub trait ModelClient {
    /// Send `prompt` and return the generated text.
    fn generate_content(&self, prompt: &str) -> Result<String>;

    /// Short backend label for logs (`gemini:<model>`, `command:<program>`).
    fn describe(&self) -> String;
}

/// Build the client selected by `settings`.
pub fn client_from_settings(settings: &Settings) -> Result<Box<dyn ModelClient>> {
    if let Some(command) = settings.lm_command.as_deref() {
        let client = CommandClient::parse(command)?;
        tracing::debug!(backend = %client.describe(), "using LM command");
        return Ok(Box::new(client));
    }
    let client = GeminiClient::new(
        &settings.api_base,
        &settings.model,
        settings.api_key.clone(),
        settings.timeout,
    );
    Ok(Box::new(client))
}

/// Client for the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    agent: ureq::Agent,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(api_base: &str, model: &str, api_key: Option<String>, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            endpoint: generate_endpoint(api_base, model),
            model: model.to_string(),
            api_key,
        }
    }
}

fn generate_endpoint(api_base: &str, model: &str) -> String {
    format!(
        "{}/v1beta/models/{}:generateContent",
        api_base.trim_end_matches('/'),
        model
    )
}

impl ModelClient for GeminiClient {
    fn generate_content(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            anyhow!("GEMINI_API_KEY is not set; export it or configure an LM command with --lm")
        })?;

        let body = json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}]
        });

        let start = Instant::now();
        let mut response = self
            .agent
            .post(self.endpoint.as_str())
            .header("x-goog-api-key", api_key)
            .send_json(&body)
            .with_context(|| format!("request {}", self.endpoint))?;
        let status = response.status();

        if !status.is_success() {
            let detail = response.body_mut().read_to_string().unwrap_or_default();
            return Err(anyhow!(
                "Gemini API returned {}: {}",
                status,
                crate::util::truncate_string(detail.trim(), 500)
            ));
        }

        let parsed: GenerateResponse = response
            .body_mut()
            .read_json()
            .context("decode Gemini response")?;
        let text = parsed.into_text()?;

        tracing::info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            prompt_bytes = prompt.len(),
            response_bytes = text.len(),
            model = %self.model,
            "gemini call complete"
        );
        Ok(text)
    }

    fn describe(&self) -> String {
        format!("gemini:{}", self.model)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn into_text(self) -> Result<String> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason);
            return Err(match reason {
                Some(reason) => anyhow!("Gemini blocked the prompt: {reason}"),
                None => anyhow!("Gemini response has no candidates"),
            });
        };

        let text: String = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        match candidate.finish_reason.as_deref() {
            Some(reason) if text.is_empty() && reason != "STOP" => {
                Err(anyhow!("Gemini stopped without output: {reason}"))
            }
            _ => Ok(text),
        }
    }
}

/// Client that pipes prompts through a local command.
#[derive(Debug, Clone)]
pub struct CommandClient {
    argv: Vec<String>,
}

impl CommandClient {
    /// Split a shell-style command line (`"ollama run llama3"`).
    pub fn parse(command: &str) -> Result<Self> {
        let argv =
            shell_words::split(command).with_context(|| format!("parse LM command: {command}"))?;
        if argv.is_empty() {
            return Err(anyhow!("LM command is empty"));
        }
        Ok(Self { argv })
    }
}

impl ModelClient for CommandClient {
    fn generate_content(&self, prompt: &str) -> Result<String> {
        let (program, args) = self
            .argv
            .split_first()
            .ok_or_else(|| anyhow!("LM command is empty"))?;

        let start = Instant::now();
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawn LM command: {program}"))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(prompt.as_bytes())
                .context("write prompt to LM stdin")?;
        }

        let output = child.wait_with_output().context("wait for LM command")?;

        tracing::info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            prompt_bytes = prompt.len(),
            response_bytes = output.stdout.len(),
            "lm invoke complete"
        );

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "LM command failed with status {}: {}",
                output.status,
                stderr.trim()
            ));
        }

        String::from_utf8(output.stdout).context("decode LM stdout as UTF-8")
    }

    fn describe(&self) -> String {
        format!("command:{}", self.argv[0])
    }
}
