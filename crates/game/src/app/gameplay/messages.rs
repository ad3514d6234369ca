use super::state::GameState;

/// Display text for the states that show a message instead of the world.
pub(crate) trait MessageProvider {
    fn message(&self, state: GameState) -> Option<&str>;
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DefaultMessages;

impl MessageProvider for DefaultMessages {
    fn message(&self, state: GameState) -> Option<&str> {
        let text = match state {
            GameState::Menu => "Torchlight. Press Space, Enter or click to begin.",
            GameState::Tutorial1 => {
                "Move with WASD, the arrow keys or by dragging. \
                 Your torch only lights a small circle."
            }
            GameState::Tutorial2 => {
                "One monster carries the key and runs from your light. \
                 The others hunt you. Catch the key."
            }
            GameState::Tutorial3Pending => {
                "Well done. From now on every win brings more monsters."
            }
            GameState::Win => "You found the key!",
            GameState::Lose => "A monster caught you.",
            GameState::Playing => return None,
        };
        Some(text)
    }
}
