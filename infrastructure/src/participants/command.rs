//! Participant gateway backed by external commands.
//!
//! Every call spawns the participant's configured command, writes the prompt
//! to its stdin and treats stdout as the answer. Token usage is estimated at
//! four characters per token and priced through the [`PricingTable`].

use super::pricing::PricingTable;
use crate::config::{FileParticipantsConfig, MODEL_PLACEHOLDER};
use async_trait::async_trait;
use debate_application::{GatewayError, Generation, ParticipantGateway};
use debate_domain::{Participant, extract_confidence};
use std::collections::BTreeMap;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

const STDERR_EXCERPT: usize = 300;

/// How to invoke one participant
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantCommand {
    pub program: String,
    pub args: Vec<String>,
    pub model: String,
}

impl ParticipantCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>, model: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args,
            model: model.into(),
        }
    }

    fn resolved_args(&self, model: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(MODEL_PLACEHOLDER, model))
            .collect()
    }
}

pub struct CommandParticipantGateway {
    commands: BTreeMap<Participant, ParticipantCommand>,
    pricing: PricingTable,
}

impl CommandParticipantGateway {
    pub fn new(commands: BTreeMap<Participant, ParticipantCommand>, pricing: PricingTable) -> Self {
        Self { commands, pricing }
    }

    pub fn from_config(config: &FileParticipantsConfig, pricing: PricingTable) -> Self {
        let commands = Participant::ALL
            .into_iter()
            .map(|participant| {
                let entry = config.get(participant);
                let command = ParticipantCommand::new(
                    entry.command.clone(),
                    entry.args.clone(),
                    config.model_for(participant),
                );
                (participant, command)
            })
            .collect();
        Self::new(commands, pricing)
    }

    pub fn command(&self, participant: Participant) -> Option<&ParticipantCommand> {
        self.commands.get(&participant)
    }
}

fn estimate_tokens(text: &str) -> u64 {
    (text.chars().count() as u64).div_ceil(4)
}

fn excerpt(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.trim().chars().take(STDERR_EXCERPT).collect()
}

fn is_rate_limited(stderr: &str) -> bool {
    let lower = stderr.to_lowercase();
    lower.contains("rate limit") || lower.contains("429") || lower.contains("too many requests")
}

#[async_trait]
impl ParticipantGateway for CommandParticipantGateway {
    async fn generate(
        &self,
        participant: Participant,
        prompt: &str,
        model_override: Option<&str>,
    ) -> Result<Generation, GatewayError> {
        let command = self.commands.get(&participant).ok_or_else(|| {
            GatewayError::ModelNotAvailable(format!("no command configured for {participant}"))
        })?;
        let model = model_override.unwrap_or(&command.model);

        debug!(
            "Spawning {} for {} (model {})",
            command.program, participant, model
        );

        let mut child = Command::new(&command.program)
            .args(command.resolved_args(model))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => GatewayError::ModelNotAvailable(format!(
                    "command '{}' not found",
                    command.program
                )),
                _ => GatewayError::ConnectionError(e.to_string()),
            })?;

        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(prompt.as_bytes()).await?;
                stdin.shutdown().await?;
            }
            Ok::<(), std::io::Error>(())
        };

        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output.map_err(|e| GatewayError::ConnectionError(e.to_string()))?;
        if let Err(e) = fed {
            debug!("{} did not consume the full prompt: {}", participant, e);
        }

        if !output.status.success() {
            let stderr = excerpt(&output.stderr);
            warn!(
                "{} command exited with {}: {}",
                participant, output.status, stderr
            );
            let message = format!("{} exited with {}: {}", command.program, output.status, stderr);
            return Err(if is_rate_limited(&stderr) {
                GatewayError::RateLimited(message)
            } else {
                GatewayError::RequestFailed(message)
            });
        }

        let content = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if content.is_empty() {
            return Err(GatewayError::InvalidResponse(format!(
                "{} produced no output",
                command.program
            )));
        }

        let input_tokens = estimate_tokens(prompt);
        let output_tokens = estimate_tokens(&content);
        let cost = self.pricing.cost(model, input_tokens, output_tokens);

        Ok(Generation {
            confidence: extract_confidence(&content),
            content,
            model: model.to_string(),
            tokens_used: input_tokens + output_tokens,
            cost,
        })
    }
}
