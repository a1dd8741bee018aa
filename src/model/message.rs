use serde::{Deserialize, Serialize};

/// Which action produced a message. The moderator's own actions plus the two
/// outside sources: the user kicking the game off, and player speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    UserRequirement,
    InstructSpeak,
    ParseSpeak,
    AnnounceGameResult,
    PlayerSpeech,
}

/// One turn on the message log. Append-only: never mutated after creation.
/// Delivery and routing by `sent_to`/`restricted_to` belong to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub content: String,
    pub role: String,
    pub sent_from: String,
    pub sent_to: String,
    pub restricted_to: String,
    pub cause_by: ActionKind,
}

impl Message {
    /// The opening user message that starts a game.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            role: "User".to_string(),
            sent_from: "User".to_string(),
            sent_to: String::new(),
            restricted_to: String::new(),
            cause_by: ActionKind::UserRequirement,
        }
    }

    /// A free-text utterance from one of the role-playing agents.
    pub fn player_speech(
        sender: impl Into<String>,
        content: impl Into<String>,
        sent_to: impl Into<String>,
    ) -> Self {
        let sender = sender.into();
        Self {
            content: content.into(),
            role: sender.clone(),
            sent_from: sender,
            sent_to: sent_to.into(),
            restricted_to: String::new(),
            cause_by: ActionKind::PlayerSpeech,
        }
    }
}
