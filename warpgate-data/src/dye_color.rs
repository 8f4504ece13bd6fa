use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The sixteen colors a marker block can carry.
#[repr(u8)]
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DyeColor {
    White = 0,
    Orange,
    Magenta,
    LightBlue,
    Yellow,
    Lime,
    Pink,
    Gray,
    LightGray,
    Cyan,
    Purple,
    Blue,
    Brown,
    Green,
    Red,
    Black,
}

#[derive(Debug)]
pub struct ParseDyeColorError;

impl DyeColor {
    pub fn all() -> [DyeColor; 16] {
        [
            Self::White,
            Self::Orange,
            Self::Magenta,
            Self::LightBlue,
            Self::Yellow,
            Self::Lime,
            Self::Pink,
            Self::Gray,
            Self::LightGray,
            Self::Cyan,
            Self::Purple,
            Self::Blue,
            Self::Brown,
            Self::Green,
            Self::Red,
            Self::Black,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Orange => "orange",
            Self::Magenta => "magenta",
            Self::LightBlue => "light_blue",
            Self::Yellow => "yellow",
            Self::Lime => "lime",
            Self::Pink => "pink",
            Self::Gray => "gray",
            Self::LightGray => "light_gray",
            Self::Cyan => "cyan",
            Self::Purple => "purple",
            Self::Blue => "blue",
            Self::Brown => "brown",
            Self::Green => "green",
            Self::Red => "red",
            Self::Black => "black",
        }
    }
}

impl FromStr for DyeColor {
    type Err = ParseDyeColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|color| color.as_str() == s)
            .ok_or(ParseDyeColorError)
    }
}

impl fmt::Display for DyeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
