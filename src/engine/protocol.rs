use crate::model::message::Message;

/// Commands crossing into the engine thread. `Deliver` is the message-bus
/// boundary: one incoming turn, routed here by the caller.
pub enum EngineCommand {
    Deliver(Message),
    Shutdown,
}

pub enum EngineResponse {
    ModeratorSaid(Message),
    GameOver { winner: String },
    Failed(String),
}
