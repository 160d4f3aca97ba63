//! Append-only per-entity event log and the narrative string surface
//! built on top of it, grounded on `narrative.py` in the original
//! implementation (`Diary`, `Event` subclasses, `biography`/`census`).

use super::house::HouseId;
use super::person::PersonId;

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Born,
    Birth { child: PersonId },
    Marriage { spouse: PersonId },
    Death,
    LeaveHouse,
    EnterHouse,
    Move { from: Option<HouseId> },
    ChangeOwner { previous_owner: Option<PersonId> },
}

/// One logged occurrence. Carries everything needed to reconstruct a
/// sentence without looking anything else up: the year, the house the
/// focal person was in at that moment, the focal person, and the kind's
/// own detail.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub year: u32,
    pub house: Option<HouseId>,
    pub person: PersonId,
    pub kind: EventKind,
}

impl Event {
    /// `"Year <Y>: <...>"`. Detail wording follows the original's per-kind
    /// `summary()` overrides; person/child names are filled in by the
    /// caller since `Event` itself holds only ids, not display strings.
    pub fn summary(&self, person_name: &str, other_name: Option<&str>) -> String {
        let detail = match &self.kind {
            EventKind::Born => format!("{person_name} was born."),
            EventKind::Birth { .. } => format!(
                "{person_name} gave birth to {}.",
                other_name.unwrap_or("a child")
            ),
            EventKind::Marriage { .. } => format!(
                "{person_name} married {}.",
                other_name.unwrap_or("someone")
            ),
            EventKind::Death => format!("{person_name} died."),
            EventKind::LeaveHouse => format!("{person_name} left their house."),
            EventKind::EnterHouse => format!("{person_name} moved into a house."),
            EventKind::Move { .. } => format!("{person_name} moved to a new house."),
            EventKind::ChangeOwner { .. } => {
                format!("{person_name} became the owner of their house.")
            }
        };
        format!("Year {}: {}", self.year, detail)
    }
}

/// Append-only ordered sequence of `Event`s. Owned by a `Person`; also
/// indexed by the `World` library so cross-entity narrative queries don't
/// require walking every community.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diary {
    events: Vec<Event>,
}

impl Diary {
    pub fn new() -> Self {
        Diary { events: Vec::new() }
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}
