//! World/Community construction with initial population seeding: a
//! plain-data config struct an external CLI/config-file loader
//! populates and hands to a single entry point, no parsing logic in
//! the core itself.

use std::rc::Rc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::model::age_table::AgeTable;
use crate::model::community::Community;
use crate::model::house::CommunityId;
use crate::model::identity::Sex;
use crate::model::world::World;
use crate::names::NamePool;
use crate::rules::RulePack;

/// Configuration for a single Community's initial population.
pub struct CommunityConfig {
    pub name: String,
    pub pop: u32,
    pub area: u32,
    pub start_age: u32,
    pub mortality: AgeTable,
    pub rules: Rc<RulePack>,
    pub house_capacity: u32,
    pub house_rooms: u32,
}

/// Top-level configuration: an RNG seed plus one or more Communities.
pub struct WorldConfig {
    pub seed: u64,
    pub communities: Vec<CommunityConfig>,
}

/// Builds a `World` with one `Community` per entry in `config.communities`,
/// each seeded with `pop` Persons (random sex, age `start_age`) and `area`
/// empty Houses.
pub fn build_world(config: WorldConfig) -> World {
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let mut built = Vec::new();
    let mut next_id: CommunityId = 1;
    for community_config in config.communities {
        built.push(seed_community(next_id, community_config, &mut rng));
        next_id += 1;
    }
    // `rng` now sits exactly where seeding left it, so `World` continues
    // the same draw sequence into `advance()` rather than replaying it.
    let mut world = World::new(Box::new(rng));
    for community in built {
        world.add_community(|_id: CommunityId| community);
    }
    world
}

fn seed_community(id: CommunityId, config: CommunityConfig, rng: &mut SmallRng) -> Community {
    let names = Rc::new(NamePool::default_pool());
    let mut community = Community::new(id, config.name, config.mortality, config.rules.clone(), names);

    for _ in 0..config.area {
        let address = community.names.generate_address(rng);
        community.add_house(address, config.house_capacity, config.house_rooms);
    }

    for _ in 0..config.pop {
        let sex = if rng.random_bool(0.5) { Sex::Male } else { Sex::Female };
        let name = community.names.generate(sex, rng);
        community.add_person(sex, name, config.start_age, 0, config.rules.clone());
    }

    community
}
