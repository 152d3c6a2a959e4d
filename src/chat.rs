//! Single-turn legal assistant.

use crate::lm::ModelClient;
use crate::lm_log::{LmInvocationKind, LmLog};
use crate::prompts;
use crate::workflow::StepRunner;
use anyhow::{anyhow, Result};

/// Reply shown when the model call fails.
pub const APOLOGY_REPLY: &str = "I apologize, but I encountered an error. Please try again.";

/// Answer one user message.
///
/// Only a blank message is an error. A failed model call is logged and
/// answered with [`APOLOGY_REPLY`].
pub fn ask(client: &dyn ModelClient, log: Option<&LmLog>, message: &str) -> Result<String> {
    let message = message.trim();
    if message.is_empty() {
        return Err(anyhow!("message is empty"));
    }

    let prompt = prompts::chat_prompt(message);
    match StepRunner::new(client, log).text(LmInvocationKind::Chat, &prompt) {
        Ok((reply, _)) => Ok(reply.trim().to_string()),
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "chat call failed");
            Ok(APOLOGY_REPLY.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lm::testing::ScriptedClient;

    #[test]
    fn test_ask_returns_model_reply() {
        let client = ScriptedClient::replying(&["  File within 30 days.\n"]);
        let reply = ask(&client, None, "How long do I have to appeal?").unwrap();
        assert_eq!(reply, "File within 30 days.");
        let prompt = &client.prompts()[0];
        assert!(prompt.contains("legal assistant AI"));
        assert!(prompt.contains("User query: How long do I have to appeal?"));
    }

    #[test]
    fn test_ask_apologizes_on_failure() {
        let client = ScriptedClient::new([Err("503".to_string())]);
        let reply = ask(&client, None, "Can I break my lease?").unwrap();
        assert_eq!(reply, APOLOGY_REPLY);
    }

    #[test]
    fn test_ask_rejects_blank_message() {
        let client = ScriptedClient::replying(&["unused"]);
        assert!(ask(&client, None, "   ").is_err());
        assert_eq!(client.calls(), 0);
    }
}
