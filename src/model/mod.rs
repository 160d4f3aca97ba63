pub mod age_table;
pub mod community;
pub mod diary;
pub mod error;
pub mod house;
pub mod identity;
pub mod kinship;
pub mod person;
pub mod residency;
pub mod world;

pub use age_table::AgeTable;
pub use community::Community;
pub use diary::{Diary, Event, EventKind};
pub use error::{BoundaryError, ConstructionError};
pub use house::{House, HouseId};
pub use identity::{LifeStatus, MarriageStatus, Sex};
pub use person::{Person, PersonId};
pub use residency::Classification;
pub use world::{EntityKind, World, YearStats};
