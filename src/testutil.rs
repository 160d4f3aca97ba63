//! Test-only scenario builder and assertion helpers: compose a
//! `Community` with specific people and houses wired up in one fluent
//! call instead of repeating low-level arena plumbing in every test.

use std::rc::Rc;

use crate::model::age_table::AgeTable;
use crate::model::community::Community;
use crate::model::house::{CommunityId, HouseId};
use crate::model::identity::{MarriageStatus, Sex};
use crate::model::person::PersonId;
use crate::model::world::World;
use crate::names::NamePool;
use crate::rules::birth::{infanticide_never, maternal_death_never, BirthRule};
use crate::rules::inheritance::{no_owner, InheritanceRule};
use crate::rules::marriage::{eligible_opposite_sex, neolocality, pick_uniform, MarriageRule};
use crate::rules::mobility::{
    check_never, destination_random_empty_unowned, who_leaves_nobody, MobilityRule,
};
use crate::rules::RulePack;

/// A `RulePack` that never fires on its own: eligible-but-inert marriage,
/// propertyless inheritance, a mobility rule that never triggers, and a
/// birth rule with all-zero tables. Scenario tests drive events directly
/// (`Community::wed`, `Community::die`, …) rather than relying on rule
/// rolls, so the pack just has to be well-formed.
pub fn default_rule_pack() -> Rc<RulePack> {
    RulePack::new(
        MarriageRule {
            eligibility_table: AgeTable::null(),
            get_eligible: eligible_opposite_sex(),
            pick_spouse: pick_uniform(),
            locality: neolocality(),
            remarriage_table: AgeTable::null(),
        },
        InheritanceRule::Simple {
            has_property: Rc::new(|_c, _p| false),
            rule: Rc::new(|_c, _p, _r| false),
            failure: no_owner(),
        },
        MobilityRule {
            check: check_never(),
            who_leaves: who_leaves_nobody(),
            destination: destination_random_empty_unowned(),
        },
        BirthRule::new(
            AgeTable::null(),
            AgeTable::null(),
            0.5,
            maternal_death_never(),
            infanticide_never(),
        )
        .unwrap(),
    )
}

struct PendingPerson {
    id: PersonId,
    sex: Sex,
    age: u32,
    status: MarriageStatus,
    parents: Vec<PersonId>,
}

struct PendingHouse {
    id: HouseId,
    occupants: Vec<PersonId>,
    owner: Option<PersonId>,
}

/// Builds up a `Community` (or a single-community `World`) declaratively.
/// Every `.person()`/`.house()` call claims the next id from a single
/// counter shared between both, in call order starting at 1 — the same
/// numbering `IdGenerator` produces — so `.id()` returns a value usable
/// immediately, before `build()` ever runs.
pub struct Scenario {
    next_id: u64,
    people: Vec<PendingPerson>,
    houses: Vec<PendingHouse>,
    marriages: Vec<(PersonId, PersonId)>,
    extra_parents: Vec<(PersonId, PersonId)>,
    mortality: AgeTable,
    rules: Rc<RulePack>,
}

pub struct PersonBuilder<'s> {
    scenario: &'s mut Scenario,
    index: usize,
}

impl<'s> PersonBuilder<'s> {
    pub fn age(self, age: u32) -> Self {
        self.scenario.people[self.index].age = age;
        self
    }

    pub fn status(self, status: MarriageStatus) -> Self {
        self.scenario.people[self.index].status = status;
        self
    }

    pub fn parents(self, parents: &[PersonId]) -> Self {
        self.scenario.people[self.index].parents = parents.to_vec();
        self
    }

    pub fn id(self) -> PersonId {
        self.scenario.people[self.index].id
    }
}

pub struct HouseBuilder<'s> {
    scenario: &'s mut Scenario,
    index: usize,
}

impl<'s> HouseBuilder<'s> {
    pub fn occupants(self, occupants: &[PersonId]) -> Self {
        self.scenario.houses[self.index].occupants = occupants.to_vec();
        self
    }

    pub fn owner(self, owner: PersonId) -> Self {
        self.scenario.houses[self.index].owner = Some(owner);
        self
    }

    pub fn id(self) -> HouseId {
        self.scenario.houses[self.index].id
    }
}

impl Scenario {
    pub fn new() -> Self {
        Scenario {
            next_id: 1,
            people: Vec::new(),
            houses: Vec::new(),
            marriages: Vec::new(),
            extra_parents: Vec::new(),
            mortality: AgeTable::null(),
            rules: default_rule_pack(),
        }
    }

    fn claim_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn person(&mut self, sex: Sex) -> PersonBuilder<'_> {
        let id = self.claim_id();
        self.people.push(PendingPerson {
            id,
            sex,
            age: 0,
            status: MarriageStatus::Unmarried,
            parents: Vec::new(),
        });
        let index = self.people.len() - 1;
        PersonBuilder { scenario: self, index }
    }

    pub fn house(&mut self) -> HouseBuilder<'_> {
        let id = self.claim_id();
        self.houses.push(PendingHouse {
            id,
            occupants: Vec::new(),
            owner: None,
        });
        let index = self.houses.len() - 1;
        HouseBuilder { scenario: self, index }
    }

    pub fn marry(&mut self, a: PersonId, b: PersonId) {
        self.marriages.push((a, b));
    }

    pub fn set_parent(&mut self, child: PersonId, parent: PersonId) {
        self.extra_parents.push((child, parent));
    }

    /// Assembles a standalone `Community` (id 1) with every declared
    /// person, house, marriage, and parent link wired up. People and
    /// houses are created in claim order so the resulting `Community`
    /// ids (from its own internal `IdGenerator`) match the ids already
    /// handed out by `.id()`.
    pub fn build(self) -> Community {
        let names = Rc::new(NamePool::default_pool());
        let mut community = Community::new(1, "Test".to_string(), self.mortality, self.rules, names);

        enum Item<'a> {
            Person(&'a PendingPerson),
            House(&'a PendingHouse),
        }
        let mut items: Vec<Item> = Vec::new();
        items.extend(self.people.iter().map(Item::Person));
        items.extend(self.houses.iter().map(Item::House));
        items.sort_by_key(|item| match item {
            Item::Person(p) => p.id,
            Item::House(h) => h.id,
        });

        for item in items {
            match item {
                Item::Person(pending) => {
                    let id = community.add_person(
                        pending.sex,
                        "Test".to_string(),
                        pending.age,
                        0,
                        community.default_rules.clone(),
                    );
                    debug_assert_eq!(id, pending.id, "Scenario id bookkeeping drifted from Community's IdGenerator");
                    community.person_mut(id).unwrap().marriage_status = pending.status;
                    for &parent in &pending.parents {
                        community.set_parent(id, parent);
                    }
                }
                Item::House(pending) => {
                    let house_id = community.add_house("Test Address".to_string(), 10, 4);
                    debug_assert_eq!(house_id, pending.id, "Scenario id bookkeeping drifted from Community's IdGenerator");
                    if let Some(owner) = pending.owner {
                        community.house_mut(house_id).unwrap().add_share(owner, 1);
                    }
                    for &occupant in &pending.occupants {
                        community.move_person(occupant, house_id);
                    }
                }
            }
        }

        for (child, parent) in &self.extra_parents {
            community.set_parent(*child, *parent);
        }
        for (a, b) in &self.marriages {
            community.wed(*a, *b);
        }
        community
    }

    /// Assembles a single-community `World` wrapping `build()`'s
    /// `Community`, seeded with a fixed RNG for determinism.
    pub fn build_world(self) -> World {
        use rand::rngs::SmallRng;
        use rand::SeedableRng;
        let community = self.build();
        let mut world = World::new(Box::new(SmallRng::seed_from_u64(1)));
        world.add_community(|_id: CommunityId| community);
        world
    }
}

// -- assertion helpers -----------------------------------------------------

pub fn assert_alive(community: &Community, p: PersonId) {
    assert!(
        community.person(p).is_some_and(|x| x.is_alive()),
        "expected person {p} to be alive"
    );
}

pub fn assert_dead(community: &Community, p: PersonId) {
    assert!(
        community.person(p).is_some_and(|x| !x.is_alive()),
        "expected person {p} to be dead"
    );
}

pub fn assert_married_to(community: &Community, a: PersonId, b: PersonId) {
    assert_eq!(community.person(a).and_then(|x| x.spouse), Some(b));
    assert_eq!(community.person(b).and_then(|x| x.spouse), Some(a));
}

pub fn assert_owns(community: &Community, p: PersonId, house: HouseId) {
    assert!(
        community.house(house).is_some_and(|h| h.share_of(p) > 0),
        "expected {p} to own house {house}"
    );
}

pub fn assert_classify(
    community: &Community,
    house: HouseId,
    expected: crate::model::residency::Classification,
) {
    let actual = crate::model::residency::classify(community, house);
    assert_eq!(actual, expected, "house {house} classification mismatch");
}
