/// Events gathered over one night. Constructed fresh per night and discarded
/// after resolution.
#[derive(Debug, Clone, Default)]
pub struct NightEvents {
    pub killed_by_werewolves: Option<String>,
    pub protected_by_guard: Option<String>,
    pub saved_by_witch: Option<String>,
    pub poisoned_by_witch: Option<String>,
}
