/// Top-level game flow. Only `Playing` runs the simulation; every other state
/// shows a message and waits for the advance action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum GameState {
    #[default]
    Menu,
    Tutorial1,
    Tutorial2,
    Tutorial3Pending,
    Win,
    Lose,
    Playing,
}

/// Result of pressing advance in a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    /// Switch to a display state without touching the session.
    Show(GameState),
    /// Reset the session with this many monsters and start playing.
    Reset { monster_count: u32 },
    Ignore,
}

impl GameState {
    pub(crate) fn is_playing(self) -> bool {
        self == GameState::Playing
    }

    pub(crate) fn on_advance(self, monster_count: u32, new_monster_spawning: u32) -> Transition {
        match self {
            GameState::Menu => Transition::Show(GameState::Tutorial1),
            GameState::Tutorial1 => Transition::Show(GameState::Tutorial2),
            GameState::Tutorial2 => Transition::Reset { monster_count: 1 },
            GameState::Tutorial3Pending => Transition::Reset {
                monster_count: monster_count.saturating_mul(new_monster_spawning),
            },
            GameState::Win if monster_count == 1 => Transition::Show(GameState::Tutorial3Pending),
            GameState::Win => Transition::Reset {
                monster_count: monster_count.saturating_add(new_monster_spawning),
            },
            GameState::Lose => Transition::Show(GameState::Menu),
            GameState::Playing => Transition::Ignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_walks_through_tutorials_into_first_round() {
        assert_eq!(GameState::Menu.on_advance(1, 5), Transition::Show(GameState::Tutorial1));
        assert_eq!(GameState::Tutorial1.on_advance(1, 5), Transition::Show(GameState::Tutorial2));
        assert_eq!(
            GameState::Tutorial2.on_advance(7, 5),
            Transition::Reset { monster_count: 1 }
        );
    }

    #[test]
    fn first_win_detours_through_third_tutorial() {
        assert_eq!(
            GameState::Win.on_advance(1, 5),
            Transition::Show(GameState::Tutorial3Pending)
        );
        assert_eq!(
            GameState::Tutorial3Pending.on_advance(1, 5),
            Transition::Reset { monster_count: 5 }
        );
    }

    #[test]
    fn later_wins_add_the_spawning_increment() {
        assert_eq!(
            GameState::Win.on_advance(3, 5),
            Transition::Reset { monster_count: 8 }
        );
    }

    #[test]
    fn lose_returns_to_menu() {
        assert_eq!(GameState::Lose.on_advance(12, 5), Transition::Show(GameState::Menu));
    }

    #[test]
    fn advance_is_ignored_while_playing() {
        assert_eq!(GameState::Playing.on_advance(3, 5), Transition::Ignore);
    }

    #[test]
    fn monster_count_growth_saturates() {
        assert_eq!(
            GameState::Win.on_advance(u32::MAX - 1, 5),
            Transition::Reset {
                monster_count: u32::MAX
            }
        );
        assert_eq!(
            GameState::Tutorial3Pending.on_advance(u32::MAX / 2, 5),
            Transition::Reset {
                monster_count: u32::MAX
            }
        );
    }
}
