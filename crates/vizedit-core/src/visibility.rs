//! The panel's visibility state machine.
//!
//! Two states, no terminal state. `show` and `hide` are idempotent and
//! `toggle` dispatches to whichever of them changes the state.

use serde::{Deserialize, Serialize};

use crate::dom::Display;

/// Whether the panel is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    /// Panels start closed until explicitly shown.
    #[default]
    Hidden,
}

/// An input to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    Show,
    Hide,
    Toggle,
}

impl Visibility {
    /// The state after applying `transition`.
    pub fn apply(self, transition: Transition) -> Self {
        match (transition, self) {
            (Transition::Show, _) => Self::Visible,
            (Transition::Hide, _) => Self::Hidden,
            (Transition::Toggle, Self::Visible) => Self::Hidden,
            (Transition::Toggle, Self::Hidden) => Self::Visible,
        }
    }

    /// Folds a sequence of transitions starting from `self`.
    pub fn fold(self, transitions: impl IntoIterator<Item = Transition>) -> Self {
        transitions.into_iter().fold(self, Self::apply)
    }

    /// Resolves `Toggle` to the concrete transition it performs from `self`.
    pub fn resolve(self, transition: Transition) -> Transition {
        match transition {
            Transition::Toggle => match self {
                Self::Visible => Transition::Hide,
                Self::Hidden => Transition::Show,
            },
            other => other,
        }
    }

    pub fn is_visible(self) -> bool {
        self == Self::Visible
    }

    /// The CSS display mode that renders this state.
    pub fn display(self) -> Display {
        match self {
            Self::Visible => Display::Block,
            Self::Hidden => Display::None,
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Visible => f.write_str("visible"),
            Self::Hidden => f.write_str("hidden"),
        }
    }
}

impl std::str::FromStr for Transition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "show" => Ok(Self::Show),
            "hide" => Ok(Self::Hide),
            "toggle" => Ok(Self::Toggle),
            other => Err(format!("unknown transition: {other}")),
        }
    }
}
