pub mod bootstrap;
pub mod id;
pub mod model;
pub mod names;
pub mod narrative;
pub mod rules;

pub mod testutil;

pub use bootstrap::{build_world, CommunityConfig, WorldConfig};
pub use id::IdGenerator;
pub use model::{
    AgeTable, BoundaryError, Classification, Community, ConstructionError, Diary, Event,
    EntityKind, EventKind, House, HouseId, LifeStatus, MarriageStatus, Person, PersonId, Sex,
    World, YearStats,
};
pub use names::NamePool;
pub use narrative::census;
pub use rules::{BirthRule, InheritanceRule, MarriageRule, MobilityRule, RulePack};
