use tracing::debug;

use crate::engine::llm_client::{LlmClient, LlmError};

/// What kind of simulated event is being scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEventKind {
    Action,
    Chat,
}

const ACTION_POIGNANCY_PROMPT: &str = "\
On a scale of 1 to 10, where 1 is purely mundane (e.g., brushing teeth, \
making the bed) and 10 is extremely poignant (e.g., a break up, college \
acceptance), rate the likely poignancy of the following event for {agent}.

Event: {description}

Respond with the rating only.";

const CHAT_POIGNANCY_PROMPT: &str = "\
On a scale of 1 to 10, where 1 is purely mundane (e.g., routine morning \
greetings) and 10 is extremely poignant (e.g., a conversation about a break \
up, a fight), rate the likely poignancy of the following conversation for \
{agent}.

Conversation: {description}

Respond with the rating only.";

/// An LLM-derived importance rating for a simulated event. Idle events are
/// short-circuited to the floor score without a model call.
pub fn poignancy_score(
    llm: &dyn LlmClient,
    agent: &str,
    kind: SimEventKind,
    description: &str,
) -> Result<u8, LlmError> {
    if description.contains("is idle") {
        return Ok(1);
    }

    let template = match kind {
        SimEventKind::Action => ACTION_POIGNANCY_PROMPT,
        SimEventKind::Chat => CHAT_POIGNANCY_PROMPT,
    };
    let prompt = template
        .replace("{agent}", agent)
        .replace("{description}", description);

    let reply = llm.complete(&prompt)?;
    debug!(%reply, "poignancy reply from llm");
    parse_score(&reply)
}

/// Pull the first integer out of a free-text reply and clamp it to 1..=10.
fn parse_score(reply: &str) -> Result<u8, LlmError> {
    reply
        .split(|c: char| !c.is_ascii_digit())
        .find(|token| !token.is_empty())
        .and_then(|token| token.parse::<u8>().ok())
        .map(|score| score.clamp(1, 10))
        .ok_or_else(|| LlmError::MalformedScore(reply.to_string()))
}
