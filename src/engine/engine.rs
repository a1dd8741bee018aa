use std::sync::mpsc::{Receiver, Sender};

use tracing::{debug, warn};

use crate::engine::llm_client::LlmClient;
use crate::engine::moderator::Moderator;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::message::Message;

/// Channel-driven loop standing in for the external agent framework: it owns
/// the ordered message history and gives the moderator one turn per delivered
/// message. Single-threaded; every mutation happens between turns.
pub struct Engine<L: LlmClient> {
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineResponse>,
    history: Vec<Message>,
    moderator: Moderator,
    llm: L,
}

impl<L: LlmClient> Engine<L> {
    pub fn new(
        rx: Receiver<EngineCommand>,
        tx: Sender<EngineResponse>,
        moderator: Moderator,
        llm: L,
    ) -> Self {
        Self {
            rx,
            tx,
            history: Vec::new(),
            moderator,
            llm,
        }
    }

    pub fn run(&mut self) {
        while let Ok(cmd) = self.rx.recv() {
            match cmd {
                EngineCommand::Deliver(msg) => {
                    debug!(from = %msg.sent_from, to = %msg.sent_to, "delivering message");
                    self.history.push(msg);
                    self.take_turn();
                }

                EngineCommand::Shutdown => break,
            }
        }
    }

    fn take_turn(&mut self) {
        match self.moderator.act(&self.history, &self.llm) {
            Ok(reply) => {
                self.history.push(reply.clone());
                let game_just_ended = self.moderator.state.is_game_over;
                let _ = self.tx.send(EngineResponse::ModeratorSaid(reply));

                if game_just_ended {
                    // One more turn for the terminal announcement.
                    if let Ok(announcement) = self.moderator.act(&self.history, &self.llm) {
                        self.history.push(announcement.clone());
                        let _ = self.tx.send(EngineResponse::ModeratorSaid(announcement));
                    }
                    let winner = self
                        .moderator
                        .state
                        .winner
                        .clone()
                        .unwrap_or_else(|| "nobody".to_string());
                    let _ = self.tx.send(EngineResponse::GameOver { winner });
                }
            }

            Err(e) => {
                warn!(error = %e, "moderator turn failed");
                let _ = self.tx.send(EngineResponse::Failed(e.to_string()));
            }
        }
    }
}
