use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};

static TRAILING_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)$").expect("trailing digit pattern"));

/// Integer that the legacy API may encode either as a JSON number or as a
/// numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LenientInt {
    Number(u64),
    Text(String),
}

impl LenientInt {
    pub fn to_u64(&self) -> Result<u64, String> {
        match self {
            LenientInt::Number(value) => Ok(*value),
            LenientInt::Text(value) => value
                .trim()
                .parse()
                .map_err(|_| format!("not an unsigned integer: {value:?}")),
        }
    }
}

impl fmt::Display for LenientInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LenientInt::Number(value) => write!(f, "{value}"),
            LenientInt::Text(value) => f.write_str(value),
        }
    }
}

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(try_from = "LenientInt", into = "u64")]
        pub struct $name(u64);

        impl $name {
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> u64 {
                self.0
            }

            /// Key used for the keyed collections of the exported dataset.
            pub fn key(self) -> String {
                self.0.to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for u64 {
            fn from(value: $name) -> u64 {
                value.0
            }
        }

        impl TryFrom<LenientInt> for $name {
            type Error = String;

            fn try_from(value: LenientInt) -> Result<Self, Self::Error> {
                value.to_u64().map(Self)
            }
        }
    };
}

id_type!(BeatmapId);
id_type!(UserId);
id_type!(MatchId);

impl MatchId {
    /// Extracts the trailing run of digits of a match reference such as
    /// `https://osu.ppy.sh/community/matches/111534249`.
    ///
    /// Returns `None` when the line does not end in digits, when the digits
    /// overflow, or when they spell zero.
    pub fn from_link(link: &str) -> Option<Self> {
        let captures = TRAILING_DIGITS.captures(link.trim())?;
        let value: u64 = captures.get(1)?.as_str().parse().ok()?;
        (value != 0).then_some(Self(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RetentionMode {
    /// Keep only the highest score per player and beatmap.
    #[default]
    Best,
    /// Keep every qualifying score per player and beatmap.
    History,
}

impl fmt::Display for RetentionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetentionMode::Best => write!(f, "best"),
            RetentionMode::History => write!(f, "history"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSlot {
    pub slot: String,
    pub beatmap_id: BeatmapId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Beatmap {
    pub beatmap_id: BeatmapId,
    pub slot: String,
    pub artist: String,
    pub title: String,
    pub difficulty: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerIdentity {
    pub user_id: UserId,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub match_id: MatchId,
    pub game_id: usize,
    pub beatmap_id: BeatmapId,
    pub score: u64,
    pub accuracy: f64,
    pub mods: u32,
}

/// Sort key for pool slot labels: mod group first, then the numeric suffix.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SlotOrder {
    group: u8,
    index: Option<u32>,
    label: String,
}

pub fn slot_order(label: &str) -> SlotOrder {
    let group = match label.get(..2) {
        Some("NM") => 1,
        Some("HD") => 2,
        Some("HR") => 3,
        Some("DT") => 4,
        Some("FM") => 5,
        Some("TB") => 6,
        _ => 99,
    };
    let index = TRAILING_DIGITS
        .captures(label)
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse().ok());
    SlotOrder {
        group,
        index,
        label: label.to_string(),
    }
}

pub fn compare_slots(a: &str, b: &str) -> Ordering {
    slot_order(a).cmp(&slot_order(b))
}
