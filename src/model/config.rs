use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1234/v1".to_string(),
            model: "local-model".to_string(),
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub moderator_name: String,
    pub moderator_profile: String,
    pub players: Vec<String>,
    pub werewolves: Vec<String>,
    pub llm: LlmSettings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            moderator_name: "Moderator".to_string(),
            moderator_profile: "Moderator".to_string(),
            players: vec![
                "Player1".to_string(),
                "Player2".to_string(),
                "Player3".to_string(),
                "Player4".to_string(),
                "Player5".to_string(),
            ],
            werewolves: vec!["Player1".to_string(), "Player2".to_string()],
            llm: LlmSettings::default(),
        }
    }
}

fn config_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("werewolf_game");
    fs::create_dir_all(&path).ok();
    path.push("game_config.json");
    path
}

pub fn load_config() -> GameConfig {
    let path = config_path();
    fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

pub fn save_config(config: &GameConfig) {
    let path = config_path();
    if let Ok(json) = serde_json::to_string_pretty(config) {
        let _ = fs::write(path, json);
    }
}
