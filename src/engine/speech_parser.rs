use tracing::debug;

use crate::engine::llm_client::{LlmClient, LlmError};
use crate::model::game_state::{GameState, PlayerStatus};
use crate::model::message::{ActionKind, Message};
use crate::model::night_events::NightEvents;

const VOTE_PROMPT: &str = "\
Welcome to the daytime discussion phase in the Werewolf game.

During the day, players discuss and share information about who they suspect \
might be a werewolf. Players can also cast their votes to eliminate a player \
they believe is a werewolf.

Here are the conversations from the daytime:

{vote_message}

Now it's time to cast your votes.

You can vote for a player by typing their name.
Example: \"Vote for Player2\"

Here are the voting options:
";

/// The three fixed templates the moderator chooses from after a parse.
pub struct ParseTemplates {
    pub next_phase: &'static str,
    pub game_over: &'static str,
    pub night_casualty: &'static str,
}

pub const PARSE_TEMPLATES: ParseTemplates = ParseTemplates {
    next_phase: "Now it's time to vote",
    game_over: "The {winner} have won! They successfully eliminated all the {loser}. \
The game has ended. Thank you for playing Werewolf!",
    night_casualty: "The night has ended, and it's time to reveal the casualties. \
During the night, the Werewolves made their move. Unfortunately, they targeted \
{player}, who is now dead.",
};

pub struct ParseOutcome {
    /// Living player the daytime transcript voted out, if any.
    pub vote_target: Option<String>,
    /// What each night role did, for the night resolver.
    pub night_events: NightEvents,
    pub templates: &'static ParseTemplates,
}

/// Last utterance per sender within a phase. Earlier messages from the same
/// sender are superseded, never accumulated.
struct SpeechRecord {
    content: String,
    target: String,
}

fn upsert(bucket: &mut Vec<(String, SpeechRecord)>, sender: &str, record: SpeechRecord) {
    if let Some(slot) = bucket.iter_mut().find(|(s, _)| s == sender) {
        slot.1 = record;
    } else {
        bucket.push((sender.to_string(), record));
    }
}

/// Scan the accumulated message log, resolve the night's kill/save outcome on
/// the game state, then ask the LLM to pick a vote target out of the daytime
/// transcript.
///
/// The werewolf kill target and the save/guard target are bound as two
/// independent values and compared explicitly. A kill target that nobody
/// saved or guarded joins the dead.
pub fn parse(
    state: &mut GameState,
    log: &[Message],
    llm: &dyn LlmClient,
) -> Result<ParseOutcome, LlmError> {
    let mut daytime: Vec<(String, SpeechRecord)> = Vec::new();
    let mut night: Vec<(String, SpeechRecord)> = Vec::new();

    for m in log {
        if m.cause_by != ActionKind::PlayerSpeech {
            continue;
        }
        let record = SpeechRecord {
            content: m.content.clone(),
            target: m.sent_to.clone(),
        };
        if m.sent_to == "all" {
            upsert(&mut daytime, &m.sent_from, record);
        } else {
            upsert(&mut night, &m.sent_from, record);
        }
    }

    let kill_target = last_night_target(&night, "kill");

    let save_target = night
        .iter()
        .filter(|(_, r)| r.content.contains("save") || r.content.contains("guard"))
        .map(|(_, r)| r.target.clone())
        .last();

    let night_events = NightEvents {
        killed_by_werewolves: kill_target.clone(),
        protected_by_guard: last_night_target(&night, "guard"),
        saved_by_witch: last_night_target(&night, "save"),
        poisoned_by_witch: last_night_target(&night, "poison"),
    };

    if let Some(killed) = kill_target {
        state.set_status(&killed, PlayerStatus::Killed);
        if save_target.as_deref() == Some(killed.as_str()) {
            state.set_status(&killed, PlayerStatus::Alive);
        } else {
            debug!(player = %killed, "night claimed a casualty");
            state.dead_players.push(killed);
        }
    }

    let transcript: String = daytime
        .iter()
        .map(|(_, r)| format!("\n{}", r.content))
        .collect();

    let vote_target = if transcript.is_empty() {
        None
    } else {
        let prompt = VOTE_PROMPT.replace("{vote_message}", &transcript);
        let reply = llm.complete(&prompt)?;
        debug!(%reply, "vote reply from llm");
        resolve_vote(&reply, &state.living_players)
    };

    if let Some(target) = &vote_target {
        *state.votes.entry(target.clone()).or_insert(0) += 1;
        state.set_status(target, PlayerStatus::Dead);
        state.dead_players.push(target.clone());
    }

    state.refresh_living();

    Ok(ParseOutcome {
        vote_target,
        night_events,
        templates: &PARSE_TEMPLATES,
    })
}

fn last_night_target(night: &[(String, SpeechRecord)], keyword: &str) -> Option<String> {
    night
        .iter()
        .filter(|(_, r)| r.content.contains(keyword) && !r.target.is_empty())
        .map(|(_, r)| r.target.clone())
        .last()
}

/// The LLM answers in free text, so the reply is validated against the living
/// roster: the earliest living player named in it wins, anything else is no
/// vote.
fn resolve_vote(reply: &str, living_players: &[String]) -> Option<String> {
    living_players
        .iter()
        .filter_map(|p| reply.find(p.as_str()).map(|pos| (pos, p)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, p)| p.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::message::ActionKind;

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

    fn state() -> GameState {
        let players: Vec<String> = (1..=5).map(|i| format!("Player{}", i)).collect();
        let wolves = vec!["Player1".to_string(), "Player2".to_string()];
        GameState::new(&players, &wolves)
    }

    fn night_msg(from: &str, content: &str, target: &str) -> Message {
        Message::player_speech(from, content, target)
    }

    fn day_msg(from: &str, content: &str) -> Message {
        Message::player_speech(from, content, "all")
    }

    #[test]
    fn unguarded_kill_joins_the_dead() {
        let mut state = state();
        let log = vec![night_msg("Player1", "I kill Player4", "Player4")];
        let outcome = parse(&mut state, &log, &StubLlm { reply: "" }).unwrap();

        assert_eq!(state.dead_players, ["Player4"]);
        assert_eq!(state.status_of("Player4"), PlayerStatus::Killed);
        assert!(!state.living_players.contains(&"Player4".to_string()));
        assert!(outcome.vote_target.is_none());
    }

    #[test]
    fn guarded_kill_target_survives() {
        let mut state = state();
        let log = vec![
            night_msg("Player1", "I kill Player4", "Player4"),
            night_msg("Guard", "I guard Player4", "Player4"),
        ];
        parse(&mut state, &log, &StubLlm { reply: "" }).unwrap();

        assert!(state.dead_players.is_empty());
        assert_eq!(state.status_of("Player4"), PlayerStatus::Alive);
        assert!(state.living_players.contains(&"Player4".to_string()));
    }

    #[test]
    fn save_on_a_different_player_does_not_help() {
        let mut state = state();
        let log = vec![
            night_msg("Player1", "I kill Player4", "Player4"),
            night_msg("Witch", "I save Player5", "Player5"),
        ];
        parse(&mut state, &log, &StubLlm { reply: "" }).unwrap();

        assert_eq!(state.dead_players, ["Player4"]);
    }

    #[test]
    fn last_message_per_sender_wins() {
        let mut state = state();
        let log = vec![
            night_msg("Player1", "I kill Player3", "Player3"),
            night_msg("Player1", "I kill Player5", "Player5"),
        ];
        parse(&mut state, &log, &StubLlm { reply: "" }).unwrap();

        assert_eq!(state.dead_players, ["Player5"]);
        assert_eq!(state.status_of("Player3"), PlayerStatus::Alive);
    }

    #[test]
    fn daytime_vote_is_resolved_against_living_players() {
        let mut state = state();
        let log = vec![
            day_msg("Player3", "Player1 has been acting suspicious all game."),
            day_msg("Player4", "Agreed, I think Player1 is a werewolf."),
        ];
        let outcome = parse(
            &mut state,
            &log,
            &StubLlm {
                reply: "Vote for Player1",
            },
        )
        .unwrap();

        assert_eq!(outcome.vote_target.as_deref(), Some("Player1"));
        assert_eq!(state.dead_players, ["Player1"]);
        assert!(!state.living_players.contains(&"Player1".to_string()));
    }

    #[test]
    fn night_events_capture_each_role_action() {
        let mut state = state();
        let log = vec![
            night_msg("Player1", "I kill Player4", "Player4"),
            night_msg("Guard", "I guard Player5", "Player5"),
            night_msg("Witch", "I poison Player3", "Player3"),
        ];
        let outcome = parse(&mut state, &log, &StubLlm { reply: "" }).unwrap();

        let events = &outcome.night_events;
        assert_eq!(events.killed_by_werewolves.as_deref(), Some("Player4"));
        assert_eq!(events.protected_by_guard.as_deref(), Some("Player5"));
        assert_eq!(events.poisoned_by_witch.as_deref(), Some("Player3"));
        assert_eq!(events.saved_by_witch, None);
    }

    #[test]
    fn earliest_named_player_in_the_reply_wins_the_vote() {
        let mut state = state();
        let log = vec![day_msg("Player4", "Time to decide.")];
        let outcome = parse(
            &mut state,
            &log,
            &StubLlm {
                reply: "I vote for Player3, although Player2 was also suspicious.",
            },
        )
        .unwrap();

        assert_eq!(outcome.vote_target.as_deref(), Some("Player3"));
    }

    #[test]
    fn vote_naming_nobody_alive_is_discarded() {
        let mut state = state();
        let log = vec![day_msg("Player3", "I have no idea who to vote for.")];
        let outcome = parse(
            &mut state,
            &log,
            &StubLlm {
                reply: "Vote for Player9",
            },
        )
        .unwrap();

        assert!(outcome.vote_target.is_none());
        assert!(state.dead_players.is_empty());
    }

    #[test]
    fn moderator_instructions_are_not_parsed_as_speech() {
        let mut state = state();
        let log = vec![Message {
            content: "Werewolves, choose one to kill".to_string(),
            role: "Moderator".to_string(),
            sent_from: "Moderator".to_string(),
            sent_to: "Werewolf".to_string(),
            restricted_to: "Werewolf".to_string(),
            cause_by: ActionKind::InstructSpeak,
        }];
        parse(&mut state, &log, &StubLlm { reply: "" }).unwrap();

        assert!(state.dead_players.is_empty());
    }
}
