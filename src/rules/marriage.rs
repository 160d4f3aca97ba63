use std::rc::Rc;

use rand::Rng;
use rand::RngCore;

use crate::model::age_table::AgeTable;
use crate::model::community::Community;
use crate::model::identity::{MarriageStatus, Sex};
use crate::model::kinship;
use crate::model::person::PersonId;

pub type EligibilityFn = Rc<dyn Fn(&Community, PersonId) -> Vec<PersonId>>;
pub type PickSpouseFn = Rc<dyn Fn(&mut dyn RngCore, &[PersonId]) -> Option<PersonId>>;
/// `(husband, wife)`; returns whether relocation succeeded (category-4
/// "did it happen" outcome — `false` never blocks the marriage itself).
pub type LocalityFn = Rc<dyn Fn(&mut Community, PersonId, PersonId, &mut dyn RngCore) -> bool>;

pub struct MarriageRule {
    pub eligibility_table: AgeTable,
    pub get_eligible: EligibilityFn,
    pub pick_spouse: PickSpouseFn,
    pub locality: LocalityFn,
    pub remarriage_table: AgeTable,
}

impl MarriageRule {
    /// Runs the eligibility/remarriage/match state machine for `p`.
    /// Returns whether `p` got married this call (a no-op for `married`
    /// persons, or when no mutual candidate exists, returns `false`).
    pub fn invoke(&self, community: &mut Community, p: PersonId, rng: &mut dyn RngCore) -> bool {
        let Some(person) = community.person(p) else {
            return false;
        };
        let sex = person.sex;
        let age = person.age;
        match person.marriage_status {
            MarriageStatus::Ineligible => {
                let rate = self.eligibility_table.rate(sex, age).unwrap_or(0.0);
                if rng.random::<f64>() < rate {
                    community.person_mut(p).unwrap().marriage_status = MarriageStatus::Unmarried;
                }
                false
            }
            MarriageStatus::Widowed => {
                let rate = self.remarriage_table.rate(sex, age).unwrap_or(0.0);
                if rng.random::<f64>() < rate {
                    community.person_mut(p).unwrap().marriage_status = MarriageStatus::Unmarried;
                }
                false
            }
            MarriageStatus::Unmarried => {
                let candidates = (self.get_eligible)(community, p);
                let mutual: Vec<PersonId> = candidates
                    .into_iter()
                    .filter(|&c| (self.get_eligible)(community, c).contains(&p))
                    .collect();
                if mutual.is_empty() {
                    return false;
                }
                let Some(chosen) = (self.pick_spouse)(rng, &mutual) else {
                    return false;
                };
                community.wed(p, chosen);
                let (husband, wife) = if sex == Sex::Male { (p, chosen) } else { (chosen, p) };
                (self.locality)(community, husband, wife, rng);
                true
            }
            MarriageStatus::Married => false,
        }
    }
}

/// All opposite-sex unmarried persons in the same community.
pub fn eligible_opposite_sex() -> EligibilityFn {
    Rc::new(|community: &Community, p: PersonId| {
        let Some(person) = community.person(p) else {
            return Vec::new();
        };
        let target_sex = person.sex.opposite();
        community
            .living_ids()
            .into_iter()
            .filter(|&c| c != p)
            .filter(|&c| {
                community.person(c).is_some_and(|other| {
                    other.sex == target_sex && other.marriage_status == MarriageStatus::Unmarried
                })
            })
            .collect()
    })
}

/// Same as [`eligible_opposite_sex`] but excludes siblings.
pub fn eligible_opposite_sex_excluding_siblings() -> EligibilityFn {
    Rc::new(|community: &Community, p: PersonId| {
        let base = eligible_opposite_sex()(community, p);
        let sibs = kinship::siblings(community, p);
        base.into_iter().filter(|c| !sibs.contains(c)).collect()
    })
}

pub fn pick_uniform() -> PickSpouseFn {
    Rc::new(|rng: &mut dyn RngCore, candidates: &[PersonId]| {
        if candidates.is_empty() {
            None
        } else {
            let idx = rng.random_range(0..candidates.len());
            Some(candidates[idx])
        }
    })
}

/// If the husband's house has room, the wife moves in; otherwise falls
/// back to neolocality with the husband as titular owner.
pub fn patrilocality() -> LocalityFn {
    Rc::new(|community: &mut Community, husband: PersonId, wife: PersonId, rng: &mut dyn RngCore| {
        let husband_house = community.person(husband).and_then(|p| p.house);
        if let Some(house_id) = husband_house {
            if !community.house(house_id).is_some_and(|h| h.is_full()) {
                community.move_person(wife, house_id);
                return true;
            }
        }
        neolocality_primary(Sex::Male)(community, husband, wife, rng)
    })
}

/// Symmetric in the wife.
pub fn matrilocality() -> LocalityFn {
    Rc::new(|community: &mut Community, husband: PersonId, wife: PersonId, rng: &mut dyn RngCore| {
        let wife_house = community.person(wife).and_then(|p| p.house);
        if let Some(house_id) = wife_house {
            if !community.house(house_id).is_some_and(|h| h.is_full()) {
                community.move_person(husband, house_id);
                return true;
            }
        }
        neolocality_primary(Sex::Female)(community, husband, wife, rng)
    })
}

/// Picks a random empty, unowned house in the primary spouse's community
/// and moves both in, the primary-sex spouse becoming sole share-holder.
/// Returns `false` (no relocation; marriage stands) if none exists.
pub fn neolocality_primary(primary: Sex) -> LocalityFn {
    Rc::new(move |community: &mut Community, husband: PersonId, wife: PersonId, rng: &mut dyn RngCore| {
        let Some(house_id) = community.random_empty_unowned_house(rng) else {
            return false;
        };
        community.move_person(husband, house_id);
        community.move_person(wife, house_id);
        let owner = if primary == Sex::Male { husband } else { wife };
        community.house_mut(house_id).unwrap().add_share(owner, 1);
        true
    })
}

pub fn neolocality() -> LocalityFn {
    neolocality_primary(Sex::Male)
}

pub fn never_remarry_table() -> AgeTable {
    AgeTable::null()
}
