use serde::{Deserialize, Serialize};

/// Biological sex. Immutable once a `Person` is created.
///
/// Carries the display attributes the narrative surface needs (`noun`,
/// `adjective`, `possessive`) rather than deriving them ad hoc at every
/// call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn noun(self) -> &'static str {
        match self {
            Sex::Male => "man",
            Sex::Female => "woman",
        }
    }

    pub fn adjective(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    pub fn possessive(self) -> &'static str {
        match self {
            Sex::Male => "his",
            Sex::Female => "her",
        }
    }

    pub fn opposite(self) -> Sex {
        match self {
            Sex::Male => Sex::Female,
            Sex::Female => Sex::Male,
        }
    }
}

/// Whether a Person is currently alive or dead.
///
/// A dead Person is retained (see `Community::dead`) but is never a member
/// of a House's occupants or a Community's living set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeStatus {
    Alive,
    Dead,
}

impl LifeStatus {
    pub fn adjective(self) -> &'static str {
        match self {
            LifeStatus::Alive => "living",
            LifeStatus::Dead => "dead",
        }
    }
}

/// A Person's position relative to marriage.
///
/// `Ineligible` persons have not yet been rolled for eligibility (too
/// young, typically); `Unmarried` persons are eligible but unwed;
/// `Married`/`Widowed` are self-explanatory. See `MarriageRule` for the
/// state machine that drives these transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarriageStatus {
    Ineligible,
    Unmarried,
    Married,
    Widowed,
}

impl MarriageStatus {
    pub fn adjective(self) -> &'static str {
        match self {
            MarriageStatus::Ineligible => "unmarried",
            MarriageStatus::Unmarried => "unmarried",
            MarriageStatus::Married => "married",
            MarriageStatus::Widowed => "widowed",
        }
    }
}
