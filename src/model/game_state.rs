use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Every status a player can be in. Anything other than `Alive`, `Protected`
/// or `Saved` counts as a terminal status for liveness purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Alive,
    Dead,
    Protected,
    Poisoned,
    Saved,
    Killed,
}

impl PlayerStatus {
    pub fn is_living(self) -> bool {
        matches!(self, Self::Alive | Self::Protected | Self::Saved)
    }
}

/// Game state owned exclusively by the moderator and mutated only between its
/// own turns. Destroyed when the game session ends.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Monotonic step counter; instruction lookup wraps via modulo.
    pub step_idx: usize,
    /// Living players in roster order. Shrinks as players die.
    pub living_players: Vec<String>,
    pub werewolf_players: Vec<String>,
    pub good_guys: Vec<String>,
    /// Append-only within a night.
    pub dead_players: Vec<String>,
    pub votes: HashMap<String, u32>,
    pub statuses: HashMap<String, PlayerStatus>,
    pub voted_out: Option<String>,
    pub is_game_over: bool,
    pub winner: Option<String>,
}

impl GameState {
    pub fn new(players: &[String], werewolves: &[String]) -> Self {
        let good_guys = players
            .iter()
            .filter(|p| !werewolves.contains(p))
            .cloned()
            .collect();
        let statuses = players
            .iter()
            .map(|p| (p.clone(), PlayerStatus::Alive))
            .collect();

        Self {
            step_idx: 0,
            living_players: players.to_vec(),
            werewolf_players: werewolves.to_vec(),
            good_guys,
            dead_players: Vec::new(),
            votes: HashMap::new(),
            statuses,
            voted_out: None,
            is_game_over: false,
            winner: None,
        }
    }

    pub fn set_status(&mut self, player: &str, status: PlayerStatus) {
        self.statuses.insert(player.to_string(), status);
    }

    pub fn status_of(&self, player: &str) -> PlayerStatus {
        self.statuses
            .get(player)
            .copied()
            .unwrap_or(PlayerStatus::Alive)
    }

    /// Drop players with a terminal status from the living roster. Roster
    /// order is preserved.
    pub fn refresh_living(&mut self) {
        let statuses = &self.statuses;
        self.living_players.retain(|p| {
            statuses
                .get(p)
                .map(|s| s.is_living())
                .unwrap_or(true)
        });
    }

    /// The game ends exactly when the dead cover all werewolves or all good
    /// guys. Returns `(winner, loser)` labels for the announcement.
    pub fn check_win(&self) -> Option<(&'static str, &'static str)> {
        let all_dead =
            |group: &[String]| group.iter().all(|p| self.dead_players.contains(p));

        if all_dead(&self.werewolf_players) {
            Some(("good guys", "werewolves"))
        } else if all_dead(&self.good_guys) {
            Some(("werewolves", "good guys"))
        } else {
            None
        }
    }
}
