use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::RngCore;
use tracing::{debug, info};

use super::community::Community;
use super::house::CommunityId;
use super::person::PersonId;

/// Kind tag for the `World`'s diary library. Currently only `Person`
/// carries its own diary (see `Community`/`Person`); kept as an enum
/// rather than a bare constant so a future entity kind with its own
/// diary slots in without changing the library's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntityKind {
    Person,
}

/// Top-level container. Owns a set of Communities, the current year, and
/// the shared RNG threaded through every stochastic call site.
pub struct World {
    pub year: u32,
    communities: BTreeMap<CommunityId, Community>,
    community_order: Vec<CommunityId>,
    next_community_id: CommunityId,
    rng: Box<dyn RngCore>,
}

/// Per-year, per-community statistics produced by `advance()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct YearStats {
    pub population: usize,
    pub births_this_year: u32,
    pub deaths_this_year: u32,
    pub marriages_this_year: u32,
    pub moves_this_year: u32,
    pub occupied_houses: usize,
}

impl World {
    pub fn new(rng: Box<dyn RngCore>) -> Self {
        World {
            year: 0,
            communities: BTreeMap::new(),
            community_order: Vec::new(),
            next_community_id: 1,
            rng,
        }
    }

    pub fn rng(&mut self) -> &mut dyn RngCore {
        &mut *self.rng
    }

    pub fn add_community(&mut self, build: impl FnOnce(CommunityId) -> Community) -> CommunityId {
        let id = self.next_community_id;
        self.next_community_id += 1;
        let mut community = build(id);
        community.set_year(self.year);
        self.communities.insert(id, community);
        self.community_order.push(id);
        id
    }

    pub fn community(&self, id: CommunityId) -> Option<&Community> {
        self.communities.get(&id)
    }

    pub fn community_mut(&mut self, id: CommunityId) -> Option<&mut Community> {
        self.communities.get_mut(&id)
    }

    pub fn communities(&self) -> impl Iterator<Item = &Community> {
        self.community_order.iter().filter_map(|id| self.communities.get(id))
    }

    /// A computed, always-consistent view of `(CommunityId, PersonId)`
    /// pairs for every Person ever created, in creation order within each
    /// community. Rebuilt on demand rather than incrementally maintained,
    /// since the underlying per-community arenas are already ordered
    /// maps — this can never drift from the Communities it was derived
    /// from.
    pub fn library(&self) -> BTreeMap<EntityKind, Vec<(CommunityId, PersonId)>> {
        let mut entries = Vec::new();
        for &cid in &self.community_order {
            if let Some(community) = self.communities.get(&cid) {
                for &pid in community.living_ids().iter().chain(community.dead_ids().iter()) {
                    entries.push((cid, pid));
                }
            }
        }
        entries.sort_by_key(|&(cid, pid)| (cid, pid));
        let mut map = BTreeMap::new();
        map.insert(EntityKind::Person, entries);
        map
    }

    /// Runs one year: death, mobility, marriage, birth — each over a
    /// stable snapshot taken before the phase — then increments `year`
    /// and refreshes each community's cached statistics.
    pub fn advance(&mut self) -> BTreeMap<CommunityId, YearStats> {
        debug!(year = self.year, "advance: death phase");
        let deaths = self.run_phase(|community, rng, p| community.die(p, rng));

        debug!(year = self.year, "advance: mobility phase");
        let moves = self.run_phase(|community, rng, p| {
            let rules = match community.person(p) {
                Some(person) => person.rules.clone(),
                None => return false,
            };
            rules.mobility.invoke(community, p, rng)
        });

        debug!(year = self.year, "advance: marriage phase");
        let marriages = self.run_phase(|community, rng, p| {
            let rules = match community.person(p) {
                Some(person) => person.rules.clone(),
                None => return false,
            };
            rules.marriage.invoke(community, p, rng)
        });

        debug!(year = self.year, "advance: birth phase");
        let births = self.run_phase(|community, rng, p| {
            let rules = match community.person(p) {
                Some(person) => person.rules.clone(),
                None => return false,
            };
            rules.birth.invoke(community, p, rng)
        });

        self.year += 1;
        let mut stats = BTreeMap::new();
        for &cid in &self.community_order {
            if let Some(community) = self.communities.get_mut(&cid) {
                community.set_year(self.year);
                stats.insert(
                    cid,
                    YearStats {
                        population: community.population(),
                        births_this_year: *births.get(&cid).unwrap_or(&0),
                        deaths_this_year: *deaths.get(&cid).unwrap_or(&0),
                        marriages_this_year: *marriages.get(&cid).unwrap_or(&0),
                        moves_this_year: *moves.get(&cid).unwrap_or(&0),
                        occupied_houses: community.occupied_houses(),
                    },
                );
            }
        }
        info!(year = self.year, "advance complete");
        stats
    }

    /// Runs `handler` once per living person in each community, in a
    /// per-community shuffled order snapshotted before the phase starts
    /// (so a person born or moved mid-phase is not itself visited this
    /// phase). Returns, per community, how many calls to `handler`
    /// returned `true` — the phase's event count for the year's stats.
    fn run_phase(
        &mut self,
        mut handler: impl FnMut(&mut Community, &mut dyn RngCore, PersonId) -> bool,
    ) -> BTreeMap<CommunityId, u32> {
        let order: Vec<CommunityId> = self.community_order.clone();
        let mut counts = BTreeMap::new();
        for cid in order {
            let mut snapshot = match self.communities.get(&cid) {
                Some(community) => community.living_ids(),
                None => continue,
            };
            snapshot.shuffle(&mut self.rng);
            let Some(community) = self.communities.get_mut(&cid) else {
                continue;
            };
            let mut count = 0u32;
            for p in snapshot {
                if community.person(p).is_some_and(|x| x.is_alive())
                    && handler(community, &mut *self.rng, p)
                {
                    count += 1;
                }
            }
            counts.insert(cid, count);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::identity::Sex;
    use crate::testutil::Scenario;

    #[test]
    fn advance_increments_year_exactly_once() {
        let mut s = Scenario::new();
        s.person(Sex::Male).age(20).id();
        let mut world = s.build_world();
        assert_eq!(world.year, 0);
        world.advance();
        assert_eq!(world.year, 1);
        world.advance();
        assert_eq!(world.year, 2);
    }

    #[test]
    fn library_contains_every_person_once() {
        let mut s = Scenario::new();
        s.person(Sex::Male).age(20).id();
        s.person(Sex::Female).age(18).id();
        let world = s.build_world();
        let lib = world.library();
        let persons = lib.get(&EntityKind::Person).unwrap();
        assert_eq!(persons.len(), 2);
    }
}
