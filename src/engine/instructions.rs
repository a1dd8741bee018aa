/// One entry in the phase table: the templated instruction plus its routing.
pub struct StepInstruction {
    pub content: &'static str,
    pub send_to: &'static str,
    pub restricted_to: &'static str,
}

const UNKNOWN_STEP: StepInstruction = StepInstruction {
    content: "Unknown instruction.",
    send_to: "",
    restricted_to: "",
};

/// Runtime values substituted into the step templates. Only placeholders that
/// actually appear in a template are filled in.
pub struct RenderParams<'a> {
    pub living_players: &'a [String],
    pub werewolf_players: &'a [String],
    pub killed_player: &'a str,
    pub voted_out_player: &'a str,
}

pub struct RenderedInstruction {
    pub content: String,
    pub send_to: String,
    pub restricted_to: String,
}

/// The fixed, ordered night/day phase table. Immutable after construction;
/// lookups wrap via modulo so the same round repeats until the game ends.
pub struct InstructionTable {
    steps: &'static [StepInstruction],
}

impl Default for InstructionTable {
    fn default() -> Self {
        Self { steps: STEP_INSTRUCTIONS }
    }
}

impl InstructionTable {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Pure table lookup plus conditional template substitution. Placeholders
    /// absent from the template are left untouched; an out-of-range index
    /// (unreachable past the modulo) soft-fails to a sentinel instruction.
    pub fn render(&self, step_idx: usize, params: &RenderParams) -> RenderedInstruction {
        let idx = step_idx % self.steps.len().max(1);
        let step = self.steps.get(idx).unwrap_or(&UNKNOWN_STEP);

        let mut content = step.content.to_string();
        if content.contains("{living_players}") {
            content = content.replace("{living_players}", &params.living_players.join(","));
        }
        if content.contains("{werewolf_players}") {
            content =
                content.replace("{werewolf_players}", &params.werewolf_players.join(","));
        }
        if content.contains("{killed_player}") {
            content = content.replace("{killed_player}", params.killed_player);
        }
        if content.contains("{voted_out_player}") {
            content = content.replace("{voted_out_player}", params.voted_out_player);
        }

        RenderedInstruction {
            content,
            send_to: step.send_to.to_string(),
            restricted_to: step.restricted_to.to_string(),
        }
    }
}

/// Every step the moderator walks through in one night/day round.
static STEP_INSTRUCTIONS: &[StepInstruction] = &[
    // Night falls.
    StepInstruction {
        content: "It's dark, everyone close your eyes. I will talk with you/your team secretly at night.",
        send_to: "Moderator",
        restricted_to: "",
    },
    StepInstruction {
        content: "Guard, please open your eyes!",
        send_to: "Moderator",
        restricted_to: "",
    },
    StepInstruction {
        content: "Guard, now tell me who you protect tonight? You only choose one from the following living options please: {living_players}. Or you can pass. For example: I protect ...",
        send_to: "Guard",
        restricted_to: "Guard",
    },
    StepInstruction {
        content: "Guard, close your eyes",
        send_to: "Moderator",
        restricted_to: "",
    },
    StepInstruction {
        content: "Werewolves, please open your eyes!",
        send_to: "Moderator",
        restricted_to: "",
    },
    StepInstruction {
        content: "Werewolves, I secretly tell you that {werewolf_players} are all of the werewolves! Keep in mind you are teammates. The rest players are not werewolves. Choose one from the following living options please: {living_players}. For example: I kill ...",
        send_to: "Werewolf",
        restricted_to: "Werewolf",
    },
    StepInstruction {
        content: "Werewolves, close your eyes",
        send_to: "Moderator",
        restricted_to: "",
    },
    StepInstruction {
        content: "Witch, please open your eyes!",
        send_to: "Moderator",
        restricted_to: "",
    },
    StepInstruction {
        content: "Witch, tonight {killed_player} has been killed by the werewolves. You have a bottle of antidote, would you like to save him/her? If not, simply Pass.",
        send_to: "Witch",
        restricted_to: "Witch",
    },
    StepInstruction {
        content: "Witch, you also have a bottle of poison, would you like to use it to kill one of the living players? Choose one from the following living options: {living_players}. If not, simply Pass.",
        send_to: "Witch",
        restricted_to: "Witch",
    },
    StepInstruction {
        content: "Witch, close your eyes",
        send_to: "Moderator",
        restricted_to: "",
    },
    StepInstruction {
        content: "Seer, please open your eyes!",
        send_to: "Moderator",
        restricted_to: "",
    },
    StepInstruction {
        content: "Seer, you can check one player's identity. Who are you going to verify its identity tonight? Choose only one from the following living options: {living_players}.",
        send_to: "Seer",
        restricted_to: "Seer",
    },
    StepInstruction {
        content: "Seer, close your eyes",
        send_to: "Moderator",
        restricted_to: "",
    },
    // Daybreak.
    StepInstruction {
        content: "It's daytime. Everyone woke up except those who had been killed.",
        send_to: "Moderator",
        restricted_to: "",
    },
    StepInstruction {
        content: "{killed_player} was killed last night. Or, it was a peaceful night and no one died!",
        send_to: "Moderator",
        restricted_to: "",
    },
    StepInstruction {
        content: "Now freely talk about roles of other players with each other based on your observation and reflection with few sentences. Decide whether to reveal your identity based on your reflection.",
        send_to: "",
        restricted_to: "",
    },
    StepInstruction {
        content: "Now vote and tell me who you think is the werewolf. Don't mention your role. You only choose one from the following living options please: {living_players}. Or you can pass. For example: I vote to kill ...",
        send_to: "",
        restricted_to: "",
    },
    StepInstruction {
        content: "{voted_out_player} was eliminated.",
        send_to: "Moderator",
        restricted_to: "",
    },
];
