mod engine;
mod model;
mod sim;

use std::sync::mpsc;
use std::thread;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::engine::engine::Engine;
use crate::engine::llm_client::ChatApi;
use crate::engine::moderator::Moderator;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::message::Message;

/// Demonstration harness, not a stable CLI: runs one scripted game against
/// whatever OpenAI-compatible endpoint the config points at.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = model::config::load_config();
    let moderator = Moderator::new(&config);
    let llm = ChatApi::new(&config.llm);

    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let engine_handle = thread::spawn(move || {
        Engine::new(cmd_rx, resp_tx, moderator, llm).run();
    });

    // Scripted player turns, consumed whenever an instruction goes out to a
    // role instead of back to the moderator. A real deployment would route
    // messages through the agent framework instead.
    let mut script = vec![
        Message::player_speech("Guard", "I protect Player3", "Player3"),
        Message::player_speech("Werewolf", "We kill Player3", "Player3"),
        Message::player_speech("Witch", "Pass", ""),
        Message::player_speech("Witch", "Pass", ""),
        Message::player_speech("Seer", "I verify Player1", "Player1"),
        Message::player_speech(
            "Player3",
            "Player1 kept contradicting themselves, I think they are a werewolf.",
            "all",
        ),
        Message::player_speech("Player4", "I vote to kill Player1", "all"),
    ]
    .into_iter();

    cmd_tx.send(EngineCommand::Deliver(Message::user(
        "Start the werewolf game.",
    )))?;

    let mut turns = 0;
    while let Ok(resp) = resp_rx.recv() {
        match resp {
            EngineResponse::ModeratorSaid(msg) => {
                print_turn(&msg);
                turns += 1;
                if turns >= 60 {
                    break;
                }

                if msg.sent_to == config.moderator_profile {
                    // Self-addressed: the moderator keeps talking.
                    cmd_tx.send(EngineCommand::Deliver(msg))?;
                } else if let Some(reply) = script.next() {
                    print_turn(&reply);
                    cmd_tx.send(EngineCommand::Deliver(reply))?;
                } else {
                    break;
                }
            }

            EngineResponse::GameOver { winner } => {
                println!("=== The game has ended. Winner: {} ===", winner);
                break;
            }

            EngineResponse::Failed(e) => {
                eprintln!("engine error: {}", e);
                break;
            }
        }
    }

    cmd_tx.send(EngineCommand::Shutdown).ok();
    drop(cmd_tx);
    let _ = engine_handle.join();
    Ok(())
}

fn print_turn(msg: &Message) {
    let target = if msg.sent_to.is_empty() {
        "all"
    } else {
        msg.sent_to.as_str()
    };
    println!("[{} -> {}] {}", msg.sent_from, target, msg.content);
}
