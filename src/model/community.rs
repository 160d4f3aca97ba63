use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use rand::Rng;
use rand::RngCore;
use tracing::trace;

use crate::id::IdGenerator;
use crate::names::NamePool;
use crate::rules::RulePack;

use super::age_table::AgeTable;
use super::diary::{Event, EventKind};
use super::house::{CommunityId, House, HouseId};
use super::identity::{LifeStatus, MarriageStatus, Sex};
use super::person::{Person, PersonId};

/// Named coresidential group within a `World`.
///
/// Persons and Houses live in flat `BTreeMap`s keyed by ids handed out by
/// this Community's own monotonic `IdGenerator`: since an id is never
/// reused for the life of the Community, a weak reference (spouse,
/// parent, house, owner) always resolves to the same entity it always
/// did, now in whatever state it's in, rather than dangling or aliasing a
/// new entity. This is the "stable indexed arena" the cross-entity
/// invariants depend on — dead Persons simply stay in `persons` with
/// `life_status = Dead` instead of moving to a separate, differently-typed
/// store.
pub struct Community {
    id: CommunityId,
    pub name: String,
    pub mortality: AgeTable,
    pub default_rules: Rc<RulePack>,
    pub names: Rc<NamePool>,
    id_gen: IdGenerator,
    persons: BTreeMap<PersonId, Person>,
    living: BTreeSet<PersonId>,
    dead: Vec<PersonId>,
    houses: BTreeMap<HouseId, House>,
    house_order: Vec<HouseId>,
    current_year: u32,
}

impl Community {
    pub fn new(
        id: CommunityId,
        name: String,
        mortality: AgeTable,
        default_rules: Rc<RulePack>,
        names: Rc<NamePool>,
    ) -> Self {
        Community {
            id,
            name,
            mortality,
            default_rules,
            names,
            id_gen: IdGenerator::new(),
            persons: BTreeMap::new(),
            living: BTreeSet::new(),
            dead: Vec::new(),
            houses: BTreeMap::new(),
            house_order: Vec::new(),
            current_year: 0,
        }
    }

    pub fn id(&self) -> CommunityId {
        self.id
    }

    pub(crate) fn set_year(&mut self, year: u32) {
        self.current_year = year;
    }

    pub fn current_year(&self) -> u32 {
        self.current_year
    }

    // -- arena access -----------------------------------------------------

    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.persons.get(&id)
    }

    pub fn person_mut(&mut self, id: PersonId) -> Option<&mut Person> {
        self.persons.get_mut(&id)
    }

    pub fn house(&self, id: HouseId) -> Option<&House> {
        self.houses.get(&id)
    }

    pub fn house_mut(&mut self, id: HouseId) -> Option<&mut House> {
        self.houses.get_mut(&id)
    }

    pub fn living_ids(&self) -> Vec<PersonId> {
        self.living.iter().copied().collect()
    }

    pub fn dead_ids(&self) -> &[PersonId] {
        &self.dead
    }

    pub fn house_ids(&self) -> &[HouseId] {
        &self.house_order
    }

    pub fn population(&self) -> usize {
        self.living.len()
    }

    /// Occupied houses, for the per-year statistics surface.
    pub fn occupied_houses(&self) -> usize {
        self.houses.values().filter(|h| !h.is_empty()).count()
    }

    // -- construction -------------------------------------------------------

    pub fn add_person(
        &mut self,
        sex: Sex,
        name: String,
        age: u32,
        birth_year: u32,
        rules: Rc<RulePack>,
    ) -> PersonId {
        let id = self.id_gen.next_id();
        let person = Person::new(id, self.id, sex, name, age, birth_year, rules);
        self.persons.insert(id, person);
        self.living.insert(id);
        id
    }

    pub fn add_house(&mut self, address: String, max_people: u32, rooms: u32) -> HouseId {
        let id = self.id_gen.next_id();
        self.houses
            .insert(id, House::new(id, self.id, address, max_people, rooms));
        self.house_order.push(id);
        id
    }

    // -- house occupancy / ownership -----------------------------------------

    /// Moves `p` into `house_id`. Logs `EnterHouse` if `p` had no prior
    /// house, otherwise a single `Move` event (not separate leave/enter
    /// events — those are reserved for bare add/remove).
    pub fn move_person(&mut self, p: PersonId, house_id: HouseId) {
        let from = self.person(p).and_then(|x| x.house);
        if let Some(old) = from {
            if old == house_id {
                return;
            }
            if let Some(h) = self.houses.get_mut(&old) {
                h.remove_occupant(p);
            }
        }
        if let Some(h) = self.houses.get_mut(&house_id) {
            h.add_occupant(p);
        }
        if let Some(person) = self.persons.get_mut(&p) {
            person.house = Some(house_id);
        }
        let year = self.current_year;
        let kind = if from.is_some() {
            EventKind::Move { from }
        } else {
            EventKind::EnterHouse
        };
        self.push_event(p, Some(house_id), kind, year);
    }

    pub fn remove_from_house(&mut self, p: PersonId) {
        let Some(house_id) = self.person(p).and_then(|x| x.house) else {
            return;
        };
        if let Some(h) = self.houses.get_mut(&house_id) {
            h.remove_occupant(p);
        }
        if let Some(person) = self.persons.get_mut(&p) {
            person.house = None;
        }
        let year = self.current_year;
        self.push_event(p, Some(house_id), EventKind::LeaveHouse, year);
    }

    pub fn change_owner(&mut self, house_id: HouseId, from: PersonId, to: PersonId) -> bool {
        let Some(house) = self.houses.get_mut(&house_id) else {
            return false;
        };
        if !house.change_owner(from, to) {
            return false;
        }
        let year = self.current_year;
        self.push_event(
            to,
            Some(house_id),
            EventKind::ChangeOwner {
                previous_owner: Some(from),
            },
            year,
        );
        true
    }

    /// Transfers all of `from`'s ownership share in `house_id` to `to`,
    /// used by inheritance (as opposed to `change_owner`'s single-share
    /// transfer, which models a living gift/sale).
    pub fn transfer_ownership(&mut self, house_id: HouseId, from: PersonId, to: PersonId) {
        let Some(house) = self.houses.get_mut(&house_id) else {
            return;
        };
        let share = house.share_of(from);
        if share == 0 {
            return;
        }
        house.remove_share(from);
        house.add_share(to, share);
        let year = self.current_year;
        self.push_event(
            to,
            Some(house_id),
            EventKind::ChangeOwner {
                previous_owner: Some(from),
            },
            year,
        );
    }

    pub fn owns_any_house(&self, p: PersonId) -> bool {
        self.houses.values().any(|h| h.share_of(p) > 0)
    }

    pub fn houses_owned_by(&self, p: PersonId) -> Vec<HouseId> {
        self.houses
            .values()
            .filter(|h| h.share_of(p) > 0)
            .map(|h| h.id())
            .collect()
    }

    pub fn random_empty_unowned_house(&self, rng: &mut dyn RngCore) -> Option<HouseId> {
        let candidates: Vec<HouseId> = self
            .house_order
            .iter()
            .copied()
            .filter(|&id| {
                self.houses
                    .get(&id)
                    .is_some_and(|h| h.is_empty() && h.is_unowned())
            })
            .collect();
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[rng.random_range(0..candidates.len())])
    }

    /// Relocates `heir`'s own household group into `dest_house`: the base
    /// set is `heir`'s nuclear family (`kinship::family` — self, spouse,
    /// children) restricted to those actually coresident in the origin
    /// house, not the origin house's full occupant list. A married son
    /// encountered in that set brings his own coresident nuclear family
    /// along too, recursing the same way.
    pub fn relocate_coresidential_group(&mut self, heir: PersonId, dest_house: HouseId) {
        let Some(origin) = self.person(heir).and_then(|p| p.house) else {
            self.move_person(heir, dest_house);
            return;
        };
        let occupants: Vec<PersonId> = self
            .house(origin)
            .map(|h| h.occupants().to_vec())
            .unwrap_or_default();

        let mut to_move: Vec<PersonId> = Vec::new();
        let mut queue = vec![heir];
        while let Some(p) = queue.pop() {
            if to_move.contains(&p) {
                continue;
            }
            to_move.push(p);
            let is_married_son = p != heir
                && self.person(p).is_some_and(|x| {
                    x.sex == Sex::Male && x.marriage_status == MarriageStatus::Married
                });
            if p == heir || is_married_son {
                for member in super::kinship::family(self, p) {
                    if member != p && occupants.contains(&member) && !to_move.contains(&member) {
                        queue.push(member);
                    }
                }
            }
        }

        for p in to_move {
            self.move_person(p, dest_house);
        }
    }

    // -- marriage / birth / death ---------------------------------------------

    pub fn wed(&mut self, a: PersonId, b: PersonId) {
        if let Some(p) = self.person_mut(a) {
            p.spouse = Some(b);
            p.marriage_status = MarriageStatus::Married;
        }
        if let Some(p) = self.person_mut(b) {
            p.spouse = Some(a);
            p.marriage_status = MarriageStatus::Married;
        }
        let year = self.current_year;
        let house_a = self.person(a).and_then(|p| p.house);
        let house_b = self.person(b).and_then(|p| p.house);
        self.push_event(a, house_a, EventKind::Marriage { spouse: b }, year);
        self.push_event(b, house_b, EventKind::Marriage { spouse: a }, year);
        trace!(a, b, "married");
    }

    /// Creates a new age-0 Person in the mother's house, inheriting her
    /// rule pack, linked to both parents bidirectionally. The father is
    /// the mother's spouse if she has one living, matching the
    /// mother-always-married-when-giving-birth shape the birth rule
    /// enforces upstream.
    pub fn give_birth(&mut self, mother: PersonId, child_sex: Sex, rng: &mut dyn RngCore) -> PersonId {
        let (rules, house, father) = {
            let m = self.person(mother).expect("mother must exist");
            let father = m.spouse.filter(|&s| self.person(s).is_some_and(|p| p.is_alive()));
            (m.rules.clone(), m.house, father)
        };
        let name = self.names.generate(child_sex, rng);
        let year = self.current_year;
        let child_id = self.add_person(child_sex, name, 0, year, rules);

        if let Some(p) = self.person_mut(child_id) {
            p.parents.push(mother);
            if let Some(father_id) = father {
                p.parents.push(father_id);
            }
        }
        if let Some(m) = self.person_mut(mother) {
            m.children.push(child_id);
        }
        if let Some(father_id) = father {
            if let Some(f) = self.person_mut(father_id) {
                f.children.push(child_id);
            }
        }
        if let Some(house_id) = house {
            self.move_person(child_id, house_id);
        }
        self.push_event(child_id, house, EventKind::Born, year);
        self.push_event(mother, house, EventKind::Birth { child: child_id }, year);
        trace!(mother, child = child_id, "birth");
        child_id
    }

    /// Samples the community mortality table at `(p.sex, p.age)`; on
    /// survival, ages `p` by one year; on death, runs the full death
    /// sequence (widow spouse, inheritance, vacate house, move to dead
    /// set, diary event). Returns whether `p` died this call.
    pub fn die(&mut self, p: PersonId, rng: &mut dyn RngCore) -> bool {
        let Some(person) = self.person(p) else {
            return false;
        };
        if !person.is_alive() {
            return false;
        }
        let rate = self.mortality.rate(person.sex, person.age).unwrap_or(0.0);
        if rng.random::<f64>() >= rate {
            if let Some(p_mut) = self.person_mut(p) {
                p_mut.age += 1;
            }
            return false;
        }
        self.kill(p, rng);
        true
    }

    /// Runs the unconditional death sequence on `p` (widow spouse, run
    /// inheritance, vacate house, move to dead set, diary event),
    /// regardless of mortality-table sampling. Used both by `die` on a
    /// failed survival roll and directly by `BirthRule` for maternal
    /// death/infanticide, which are their own rolls.
    pub fn kill(&mut self, p: PersonId, rng: &mut dyn RngCore) {
        let Some(person) = self.person(p) else {
            return;
        };
        if !person.is_alive() {
            return;
        }
        let spouse = person.spouse;
        if let Some(p_mut) = self.person_mut(p) {
            p_mut.life_status = LifeStatus::Dead;
        }
        if let Some(s) = spouse {
            if let Some(spouse_person) = self.person_mut(s) {
                if spouse_person.is_alive() {
                    spouse_person.marriage_status = MarriageStatus::Widowed;
                }
            }
        }
        let rules = self.person(p).unwrap().rules.clone();
        rules.inheritance.invoke(self, p, rng);
        self.remove_from_house(p);
        self.living.remove(&p);
        self.dead.push(p);
        let year = self.current_year;
        self.push_event(p, None, EventKind::Death, year);
        trace!(p, "died");
    }

    fn push_event(&mut self, person: PersonId, house: Option<HouseId>, kind: EventKind, year: u32) {
        if let Some(p) = self.person_mut(person) {
            p.diary.push(Event {
                year,
                house,
                person,
                kind,
            });
        }
    }
}

impl Community {
    /// Adds a Person under this Community's default rule pack with a
    /// placeholder name, skipping the explicit-name/rules form of
    /// `add_person`. Convenient for scenario construction where naming
    /// doesn't matter and no RNG is at hand.
    pub fn add_person_with_defaults(&mut self, sex: Sex, age: u32) -> PersonId {
        let rules = self.default_rules.clone();
        let name = format!("{sex:?}-{age}");
        self.add_person(sex, name, age, 0, rules)
    }

    /// Links `child` to `parent` bidirectionally without going through
    /// `give_birth` — used when a scenario needs a kinship edge without a
    /// birth event (e.g. seeding a pre-existing family).
    pub fn set_parent(&mut self, child: PersonId, parent: PersonId) {
        if let Some(c) = self.person_mut(child) {
            if !c.parents.contains(&parent) {
                c.parents.push(parent);
            }
        }
        if let Some(pp) = self.person_mut(parent) {
            if !pp.children.contains(&child) {
                pp.children.push(child);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::Scenario;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn die_ages_survivor_by_one() {
        let mut s = Scenario::new();
        let p = s.person(Sex::Male).age(30).id();
        let mut community = s.build();
        community.mortality = AgeTable::null();
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(!community.die(p, &mut rng));
        assert_eq!(community.person(p).unwrap().age, 31);
    }

    #[test]
    fn kill_widows_the_surviving_spouse() {
        let mut s = Scenario::new();
        let a = s.person(Sex::Male).age(40).id();
        let b = s.person(Sex::Female).age(38).id();
        s.marry(a, b);
        let mut community = s.build();
        let mut rng = SmallRng::seed_from_u64(1);
        community.kill(a, &mut rng);
        assert_eq!(community.person(b).unwrap().marriage_status, MarriageStatus::Widowed);
        assert!(!community.living_ids().contains(&a));
        assert!(community.dead_ids().contains(&a));
    }

    #[test]
    fn give_birth_links_parent_and_child() {
        let mut s = Scenario::new();
        let mother = s.person(Sex::Female).age(25).id();
        let mut community = s.build();
        let mut rng = SmallRng::seed_from_u64(1);
        let child = community.give_birth(mother, Sex::Female, &mut rng);
        assert_eq!(community.person(child).unwrap().parents, vec![mother]);
        assert!(community.person(mother).unwrap().children.contains(&child));
        assert_eq!(community.person(child).unwrap().age, 0);
    }

    #[test]
    fn give_birth_links_living_spouse_as_father() {
        let mut s = Scenario::new();
        let mother = s.person(Sex::Female).age(25).status(MarriageStatus::Married).id();
        let father = s.person(Sex::Male).age(27).status(MarriageStatus::Married).id();
        s.marry(mother, father);
        let mut community = s.build();
        let mut rng = SmallRng::seed_from_u64(1);
        let child = community.give_birth(mother, Sex::Male, &mut rng);
        assert!(community.person(child).unwrap().parents.contains(&father));
        assert!(community.person(father).unwrap().children.contains(&child));
    }

    #[test]
    fn give_birth_omits_father_when_spouse_is_dead() {
        let mut s = Scenario::new();
        let mother = s.person(Sex::Female).age(25).status(MarriageStatus::Married).id();
        let father = s.person(Sex::Male).age(27).status(MarriageStatus::Married).id();
        s.marry(mother, father);
        let mut community = s.build();
        let mut rng = SmallRng::seed_from_u64(1);
        community.kill(father, &mut rng);
        let child = community.give_birth(mother, Sex::Male, &mut rng);
        assert_eq!(community.person(child).unwrap().parents, vec![mother]);
    }

    #[test]
    fn relocate_coresidential_group_leaves_unrelated_occupants_behind() {
        let mut s = Scenario::new();
        let heir = s.person(Sex::Male).age(40).status(MarriageStatus::Unmarried).id();
        let sibling = s.person(Sex::Male).age(38).status(MarriageStatus::Unmarried).id();
        let parent = s.person(Sex::Female).age(65).status(MarriageStatus::Widowed).id();
        let origin = s.house().occupants(&[heir, sibling, parent]).owner(heir).id();
        let dest = s.house().id();
        let mut community = s.build();

        community.relocate_coresidential_group(heir, dest);

        assert_eq!(community.person(heir).unwrap().house, Some(dest));
        assert_eq!(community.person(sibling).unwrap().house, Some(origin));
        assert_eq!(community.person(parent).unwrap().house, Some(origin));
    }

    #[test]
    fn relocate_coresidential_group_brings_married_sons_family_along() {
        let mut s = Scenario::new();
        let heir = s.person(Sex::Male).age(60).status(MarriageStatus::Widowed).id();
        let son = s.person(Sex::Male).age(30).status(MarriageStatus::Married).parents(&[heir]).id();
        let daughter_in_law = s.person(Sex::Female).age(28).status(MarriageStatus::Married).id();
        let grandchild = s.person(Sex::Male).age(2).parents(&[son, daughter_in_law]).id();
        s.marry(son, daughter_in_law);
        s.house()
            .occupants(&[heir, son, daughter_in_law, grandchild])
            .owner(heir);
        let dest = s.house().id();
        let mut community = s.build();

        community.relocate_coresidential_group(heir, dest);

        for p in [heir, son, daughter_in_law, grandchild] {
            assert_eq!(community.person(p).unwrap().house, Some(dest));
        }
    }
}
