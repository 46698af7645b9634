//! Tag records and the fixed color palette.

use super::UserId;
use crate::reorder::Ordered;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type TagId = Uuid;

/// Palette a tag badge can be drawn with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagColor {
    #[default]
    Blue,
    Purple,
    Red,
    Green,
    Yellow,
    Pink,
    Indigo,
    Gray,
}

impl TagColor {
    /// Palette order shown by color pickers.
    pub const ALL: [TagColor; 8] = [
        Self::Blue,
        Self::Purple,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Pink,
        Self::Indigo,
        Self::Gray,
    ];

    /// Storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Pink => "pink",
            Self::Indigo => "indigo",
            Self::Gray => "gray",
        }
    }

    /// Human label for pickers.
    pub fn label(self) -> &'static str {
        match self {
            Self::Blue => "Blue",
            Self::Purple => "Purple",
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Yellow => "Yellow",
            Self::Pink => "Pink",
            Self::Indigo => "Indigo",
            Self::Gray => "Gray",
        }
    }

    /// Parses the storage representation.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|color| color.as_str() == value)
    }
}

/// User-defined label used to filter tasks and to key notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub user_id: UserId,
    pub name: String,
    pub color: TagColor,
    /// Display position within the owner's tag bar.
    pub ordinal: i64,
}

impl Tag {
    pub fn new(user_id: UserId, name: impl Into<String>, color: TagColor, ordinal: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            color,
            ordinal,
        }
    }
}

impl Ordered for Tag {
    type Id = TagId;

    fn id(&self) -> TagId {
        self.id
    }

    fn ordinal(&self) -> i64 {
        self.ordinal
    }

    fn set_ordinal(&mut self, ordinal: i64) {
        self.ordinal = ordinal;
    }
}

#[cfg(test)]
mod tests {
    use super::TagColor;

    #[test]
    fn every_palette_color_parses_back() {
        for color in TagColor::ALL {
            assert_eq!(TagColor::parse(color.as_str()), Some(color));
        }
        assert_eq!(TagColor::parse("magenta"), None);
    }
}
