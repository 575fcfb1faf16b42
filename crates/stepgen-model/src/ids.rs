//! Newtype identifiers for protocol entities.
//!
//! All ids are opaque strings assigned by the protocol author. They are
//! `Ord` so every map keyed by an id is a `BTreeMap` and iteration order is
//! deterministic.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Identifier of a pipette instance mounted on the robot.
    PipetteId
);
string_id!(
    /// Identifier of a labware instance on the deck.
    LabwareId
);
string_id!(
    /// Identifier of a hardware module instance.
    ModuleId
);
string_id!(
    /// Identifier of a user-authored protocol step.
    StepId
);
string_id!(
    /// Identifier of a liquid (ingredient) placed into wells.
    LiquidId
);
string_id!(
    /// A deck slot name ("1".."12").
    DeckSlot
);

/// A well coordinate within a labware, e.g. `"A1"` or `"H12"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WellName(String);

impl WellName {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The row letter (`'A'` for "A1"), if the name is well-formed.
    pub fn row(&self) -> Option<char> {
        self.0.chars().next().filter(char::is_ascii_uppercase)
    }

    /// The 1-based column number (`1` for "A1"), if the name is well-formed.
    pub fn column(&self) -> Option<u32> {
        let digits: String = self.0.chars().skip(1).collect();
        digits.parse().ok()
    }

    pub fn from_row_column(row: char, column: u32) -> Self {
        Self(format!("{row}{column}"))
    }
}

impl fmt::Display for WellName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WellName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for WellName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl DeckSlot {
    /// Numeric sort key so slot "2" orders before slot "10".
    pub fn sort_key(&self) -> (u32, &str) {
        match self.0.parse::<u32>() {
            Ok(n) => (n, ""),
            Err(_) => (u32::MAX, self.0.as_str()),
        }
    }
}
