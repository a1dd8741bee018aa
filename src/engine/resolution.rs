use std::collections::HashMap;

use rand::Rng;

use crate::model::night_events::NightEvents;

/// Consider all events at night and conclude which player dies, if any.
///
/// Priority order: a guarded kill target survives; a player both guarded and
/// given the antidote dies anyway; then witch save, witch poison, werewolf
/// kill. A night with no matching events is reported as peaceful.
pub fn summarize_night(events: &NightEvents) -> String {
    if let (Some(killed), Some(protected)) =
        (&events.killed_by_werewolves, &events.protected_by_guard)
    {
        if killed == protected {
            return "It was a peaceful night. No one was killed.".to_string();
        }
    }

    if let (Some(protected), Some(saved)) =
        (&events.protected_by_guard, &events.saved_by_witch)
    {
        if protected == saved {
            return format!("{} was killed by the werewolves.", protected);
        }
    }

    if let Some(saved) = &events.saved_by_witch {
        return format!("{} was saved by the witch.", saved);
    }

    if let Some(poisoned) = &events.poisoned_by_witch {
        return format!("{} was poisoned by the witch.", poisoned);
    }

    if let Some(killed) = &events.killed_by_werewolves {
        return format!("{} was killed by the werewolves.", killed);
    }

    "It was a peaceful night. No one was killed.".to_string()
}

/// Consider all votes at day and conclude which player is eliminated. A tie
/// among the max-vote holders is broken uniformly at random.
pub fn summarize_day(votes: &HashMap<String, u32>) -> String {
    if votes.is_empty() {
        return "No votes were cast. No one was killed.".to_string();
    }

    let max_votes = votes.values().copied().max().unwrap_or(0);
    let mut tied: Vec<&String> = votes
        .iter()
        .filter(|(_, count)| **count == max_votes)
        .map(|(player, _)| player)
        .collect();
    tied.sort();

    if tied.len() == 1 {
        format!("{} was voted out and eliminated.", tied[0])
    } else {
        let pick = tied[rand::thread_rng().gen_range(0..tied.len())];
        format!(
            "There was a tie in the votes. {} was randomly chosen and eliminated.",
            pick
        )
    }
}
