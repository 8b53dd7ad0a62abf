//! Habit icon key mapping.
//!
//! Unknown or missing keys resolve to [`HabitIcon::Activity`].

use serde::{Deserialize, Serialize};

/// Icon key stored for habits created without an explicit icon.
pub const DEFAULT_ICON_KEY: &str = "Activity";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HabitIcon {
    Brain,
    Dumbbell,
    Coffee,
    Book,
    #[default]
    Activity,
    Check,
}

impl HabitIcon {
    pub const ALL: [HabitIcon; 6] = [
        HabitIcon::Brain,
        HabitIcon::Dumbbell,
        HabitIcon::Coffee,
        HabitIcon::Book,
        HabitIcon::Activity,
        HabitIcon::Check,
    ];

    /// Resolves a stored key; matching is case-insensitive.
    pub fn from_key(key: Option<&str>) -> Self {
        let Some(key) = key.map(str::trim) else {
            return Self::default();
        };
        Self::ALL
            .into_iter()
            .find(|icon| icon.key().eq_ignore_ascii_case(key))
            .unwrap_or_default()
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Brain => "Brain",
            Self::Dumbbell => "Dumbbell",
            Self::Coffee => "Coffee",
            Self::Book => "Book",
            Self::Activity => DEFAULT_ICON_KEY,
            Self::Check => "Check",
        }
    }

    /// Terminal-renderable glyph.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Brain => "🧠",
            Self::Dumbbell => "🏋",
            Self::Coffee => "☕",
            Self::Book => "📖",
            Self::Activity => "📈",
            Self::Check => "✔",
        }
    }
}
