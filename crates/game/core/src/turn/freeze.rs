/// Exit-tile freeze bookkeeping carried across turns.
///
/// Actors are frozen while the player stands on the exit tile, and for one
/// grace turn after the player steps off it. The "show frozen" indicator only
/// follows the tile itself, so it clears on the grace turn while the logical
/// freeze is still in force.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FreezeState {
    was_on_exit: bool,
    grace_turn: bool,
    show_frozen: bool,
}

/// Freeze decision for a single turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FreezeStatus {
    /// Actors skip their move this turn.
    pub frozen: bool,
    /// Renderers should draw actors as frozen.
    pub show_frozen: bool,
    /// Frozen only because the player left the exit tile last turn.
    pub grace: bool,
}

impl FreezeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances one turn given whether the player is on the exit tile now.
    pub fn advance(&mut self, player_on_exit: bool) -> FreezeStatus {
        // The grace flag lives for exactly the turn the player left the exit.
        self.grace_turn = self.was_on_exit && !player_on_exit;
        self.show_frozen = player_on_exit;
        self.was_on_exit = player_on_exit;

        self.status()
    }

    pub fn status(&self) -> FreezeStatus {
        FreezeStatus {
            frozen: self.was_on_exit || self.grace_turn,
            show_frozen: self.show_frozen,
            grace: self.grace_turn,
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.status().frozen
    }

    pub fn show_frozen(&self) -> bool {
        self.show_frozen
    }

    pub fn was_on_exit(&self) -> bool {
        self.was_on_exit
    }

    /// Forgets all freeze history, e.g. when a new zone is entered.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
