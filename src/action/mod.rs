mod play;

use serde::{Deserialize, Serialize};
use strum::Display;

pub use crate::action::play::PlayAction;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display, Deserialize, Default)]
pub enum ActionState {
    #[default]
    Start,
    Repeat,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Deserialize)]
pub enum Command {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    ClearScreen,
    Error(String),
    ToggleShowHelp,
    // Scene commands
    Play(PlayAction),
}

impl Command {
    /// Name shown in the help overlay.
    pub fn label(&self) -> String {
        match self {
            Command::Play(action) => action.to_string(),
            command => command.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub command: Command,
    pub state: ActionState,
}

macro_rules! act {
    ($command:expr) => {
        $crate::action::Action { command: $command, state: $crate::action::ActionState::default() }
    };
    ($command:expr, $state:expr) => {
        $crate::action::Action { command: $command, state: $state }
    };
}

pub(crate) use act;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_act_defaults_to_start() {
        let action = act!(Command::Play(PlayAction::Flap));
        assert_eq!(action.state, ActionState::Start);
        assert_eq!(act!(Command::Quit, ActionState::End).state, ActionState::End);
    }

    #[test]
    fn test_label() {
        assert_eq!(Command::Play(PlayAction::Flap).label(), "Flap");
        assert_eq!(Command::ToggleShowHelp.label(), "ToggleShowHelp");
    }
}
