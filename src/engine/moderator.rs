use tracing::info;

use crate::engine::instructions::{InstructionTable, RenderParams};
use crate::engine::llm_client::{LlmClient, LlmError};
use crate::engine::resolution;
use crate::engine::speech_parser;
use crate::model::config::GameConfig;
use crate::model::game_state::GameState;
use crate::model::message::{ActionKind, Message};

/// What the moderator will do this turn. Decided once per turn from the game
/// state and the most recent message, then acted on; never re-derived midway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeratorTodo {
    Instruct,
    Parse,
    Announce,
}

/// The orchestrating role. Owns the game state and produces exactly one
/// outgoing message per turn; the surrounding engine owns the message log.
pub struct Moderator {
    name: String,
    profile: String,
    table: InstructionTable,
    pub state: GameState,
}

impl Moderator {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            name: config.moderator_name.clone(),
            profile: config.moderator_profile.clone(),
            table: InstructionTable::default(),
            state: GameState::new(&config.players, &config.werewolves),
        }
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// A finished game always announces. Otherwise: a user message or one of
    /// the moderator's own means the next instruction is due; anything else
    /// is player speech waiting to be parsed.
    pub fn think(&self, log: &[Message]) -> ModeratorTodo {
        if self.state.is_game_over {
            return ModeratorTodo::Announce;
        }

        match log.last() {
            Some(m) if m.role == "User" || m.role == self.profile => ModeratorTodo::Instruct,
            Some(_) => ModeratorTodo::Parse,
            None => ModeratorTodo::Instruct,
        }
    }

    /// Run one turn against the accumulated log.
    pub fn act(&mut self, log: &[Message], llm: &dyn LlmClient) -> Result<Message, LlmError> {
        let todo = self.think(log);
        info!(?todo, step = self.state.step_idx, "moderator turn");

        match todo {
            ModeratorTodo::Instruct => Ok(self.instruct_speak()),
            ModeratorTodo::Parse => self.parse_speak(log, llm),
            ModeratorTodo::Announce => Ok(self.announce_game_result()),
        }
    }

    fn instruct_speak(&mut self) -> Message {
        let last_dead = self
            .state
            .dead_players
            .last()
            .map(String::as_str)
            .unwrap_or("");
        let voted_out = self.state.voted_out.as_deref().unwrap_or("");

        let rendered = self.table.render(
            self.state.step_idx,
            &RenderParams {
                living_players: &self.state.living_players,
                werewolf_players: &self.state.werewolf_players,
                killed_player: last_dead,
                voted_out_player: voted_out,
            },
        );
        self.state.step_idx += 1;

        Message {
            content: rendered.content,
            role: self.profile.clone(),
            sent_from: self.name.clone(),
            sent_to: rendered.send_to,
            restricted_to: rendered.restricted_to,
            cause_by: ActionKind::InstructSpeak,
        }
    }

    fn parse_speak(
        &mut self,
        log: &[Message],
        llm: &dyn LlmClient,
    ) -> Result<Message, LlmError> {
        let outcome = speech_parser::parse(&mut self.state, log, llm)?;
        let templates = outcome.templates;
        info!(
            night = %resolution::summarize_night(&outcome.night_events),
            "night outcome"
        );

        let (content, send_to) = match outcome.vote_target {
            None => (templates.next_phase.to_string(), self.profile.clone()),
            Some(target) => {
                self.state.voted_out = Some(target.clone());
                info!(
                    day = %resolution::summarize_day(&self.state.votes),
                    "day outcome"
                );
                if let Some((winner, loser)) = self.state.check_win() {
                    self.state.is_game_over = true;
                    self.state.winner = Some(winner.to_string());
                    info!(winner, tally = ?self.state.votes, "win condition reached");
                    (
                        templates
                            .game_over
                            .replace("{winner}", winner)
                            .replace("{loser}", loser),
                        "all".to_string(),
                    )
                } else {
                    let casualty = self
                        .state
                        .dead_players
                        .last()
                        .cloned()
                        .unwrap_or(target);
                    (
                        templates.night_casualty.replace("{player}", &casualty),
                        String::new(),
                    )
                }
            }
        };

        Ok(Message {
            content,
            role: self.profile.clone(),
            sent_from: self.name.clone(),
            sent_to: send_to,
            restricted_to: String::new(),
            cause_by: ActionKind::ParseSpeak,
        })
    }

    fn announce_game_result(&self) -> Message {
        let winner = self
            .state
            .winner
            .clone()
            .unwrap_or_else(|| "nobody".to_string());

        Message {
            content: format!("Game over! The winner is {}", winner),
            role: self.profile.clone(),
            sent_from: self.name.clone(),
            sent_to: "all".to_string(),
            restricted_to: String::new(),
            cause_by: ActionKind::AnnounceGameResult,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::llm_client::LlmError;

    struct StubLlm {
        reply: &'static str,
    }

    impl LlmClient for StubLlm {
        fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            Ok(self.reply.to_string())
        }

        fn embed(&self, _text: &str) -> Result<Vec<f32>, LlmError> {
            Ok(Vec::new())
        }
    }

    fn moderator() -> Moderator {
        Moderator::new(&GameConfig::default())
    }

    #[test]
    fn user_or_own_message_means_instruct() {
        let m = moderator();
        assert_eq!(m.think(&[Message::user("start")]), ModeratorTodo::Instruct);

        let own = Message {
            content: "Guard, please open your eyes!".to_string(),
            role: "Moderator".to_string(),
            sent_from: "Moderator".to_string(),
            sent_to: "Moderator".to_string(),
            restricted_to: String::new(),
            cause_by: ActionKind::InstructSpeak,
        };
        assert_eq!(m.think(&[own]), ModeratorTodo::Instruct);
    }

    #[test]
    fn player_message_means_parse() {
        let m = moderator();
        let speech = Message::player_speech("Player3", "I protect Player4", "Player4");
        assert_eq!(m.think(&[speech]), ModeratorTodo::Parse);
    }

    #[test]
    fn finished_game_always_announces() {
        let mut m = moderator();
        m.state.is_game_over = true;
        let speech = Message::player_speech("Player3", "anything", "all");
        assert_eq!(m.think(&[speech]), ModeratorTodo::Announce);
        assert_eq!(m.think(&[]), ModeratorTodo::Announce);
    }

    #[test]
    fn instruct_steps_through_the_table_and_wraps() {
        let mut m = moderator();
        let first = m.instruct_speak();
        assert_eq!(m.state.step_idx, 1);
        assert!(first.content.contains("close your eyes"));

        m.state.step_idx = 19;
        let wrapped = m.instruct_speak();
        assert_eq!(wrapped.content, first.content);
        assert_eq!(m.state.step_idx, 20);
    }

    #[test]
    fn instruction_goes_out_under_the_moderator_profile() {
        let mut m = moderator();
        m.state.step_idx = 2;
        let msg = m.instruct_speak();
        assert_eq!(msg.role, "Moderator");
        assert_eq!(msg.sent_to, "Guard");
        assert_eq!(msg.restricted_to, "Guard");
        assert_eq!(msg.cause_by, ActionKind::InstructSpeak);
    }

    #[test]
    fn parse_without_a_vote_asks_itself_to_move_on() {
        let mut m = moderator();
        let log = vec![Message::player_speech("Guard", "I protect Player4", "Player4")];
        let msg = m.act(&log, &StubLlm { reply: "" }).unwrap();
        assert_eq!(msg.content, "Now it's time to vote");
        assert_eq!(msg.sent_to, "Moderator");
    }

    #[test]
    fn vote_that_ends_the_game_announces_the_winner() {
        let mut m = moderator();
        // One werewolf already dead; the vote takes out the second.
        m.state.dead_players.push("Player1".to_string());
        let log = vec![Message::player_speech(
            "Player3",
            "Player2 must be the other werewolf.",
            "all",
        )];
        let msg = m
            .act(
                &log,
                &StubLlm {
                    reply: "Vote for Player2",
                },
            )
            .unwrap();

        assert!(m.state.is_game_over);
        assert_eq!(m.state.winner.as_deref(), Some("good guys"));
        assert!(msg.content.contains("The good guys have won!"));
        assert_eq!(msg.sent_to, "all");

        let after = m.act(&[], &StubLlm { reply: "" }).unwrap();
        assert_eq!(after.content, "Game over! The winner is good guys");
        assert_eq!(after.cause_by, ActionKind::AnnounceGameResult);
    }

    #[test]
    fn vote_mid_game_reveals_the_casualty() {
        let mut m = moderator();
        let log = vec![Message::player_speech(
            "Player3",
            "I suspect Player5, vote them out.",
            "all",
        )];
        let msg = m
            .act(
                &log,
                &StubLlm {
                    reply: "Vote for Player5",
                },
            )
            .unwrap();

        assert!(!m.state.is_game_over);
        assert!(msg.content.contains("they targeted Player5"));
        assert_eq!(m.state.voted_out.as_deref(), Some("Player5"));

        // The tally feeds the day resolver.
        assert_eq!(m.state.votes.get("Player5"), Some(&1));
        assert_eq!(
            resolution::summarize_day(&m.state.votes),
            "Player5 was voted out and eliminated."
        );
    }
}
