use std::rc::Rc;

use rand::RngCore;

use crate::model::community::Community;
use crate::model::identity::Sex;
use crate::model::kinship;
use crate::model::person::PersonId;

/// Heirs grouped by a primary axis (e.g. sibling branch), ranked within
/// each group. A flat single-inheritance ranking is the degenerate case
/// of one singleton group per candidate, in rank order.
pub type HeirGroups = Vec<Vec<PersonId>>;

pub fn flatten(groups: &HeirGroups) -> Vec<PersonId> {
    groups.iter().flatten().copied().collect()
}

fn as_singleton_groups(flat: Vec<PersonId>) -> HeirGroups {
    flat.into_iter().map(|p| vec![p]).collect()
}

pub type HasPropertyFn = Rc<dyn Fn(&Community, PersonId) -> bool>;
pub type FindHeirsFn = Rc<dyn Fn(&Community, PersonId) -> HeirGroups>;
pub type LimitHeirsFn = Rc<dyn Fn(&Community, HeirGroups) -> HeirGroups>;
pub type DistributeFn = Rc<dyn Fn(&mut Community, PersonId, HeirGroups, &mut dyn RngCore) -> bool>;
pub type SimpleRuleFn = Rc<dyn Fn(&mut Community, PersonId, &mut dyn RngCore) -> bool>;
pub type FailureFn = Rc<dyn Fn(&mut Community, PersonId) -> bool>;

pub enum InheritanceRule {
    Simple {
        has_property: HasPropertyFn,
        rule: SimpleRuleFn,
        failure: FailureFn,
    },
    Complex {
        has_property: HasPropertyFn,
        find_heirs: FindHeirsFn,
        limit_heirs: LimitHeirsFn,
        distribute_property: DistributeFn,
        failure: FailureFn,
    },
}

impl InheritanceRule {
    /// Runs on death of `p`. Returns whether property changed hands
    /// (`false` covers both "no property" and "ran, fell through to
    /// failure").
    pub fn invoke(&self, community: &mut Community, p: PersonId, rng: &mut dyn RngCore) -> bool {
        match self {
            InheritanceRule::Simple {
                has_property,
                rule,
                failure,
            } => {
                if !has_property(community, p) {
                    return false;
                }
                if rule(community, p, rng) {
                    true
                } else {
                    failure(community, p)
                }
            }
            InheritanceRule::Complex {
                has_property,
                find_heirs,
                limit_heirs,
                distribute_property,
                failure,
            } => {
                if !has_property(community, p) {
                    return false;
                }
                let heirs = find_heirs(community, p);
                let heirs = limit_heirs(community, heirs);
                if flatten(&heirs).is_empty() {
                    return failure(community, p);
                }
                distribute_property(community, p, heirs, rng)
            }
        }
    }
}

fn age_descending(community: &Community, mut people: Vec<PersonId>) -> Vec<PersonId> {
    people.sort_by(|&a, &b| {
        let age_a = community.person(a).map(|p| p.age).unwrap_or(0);
        let age_b = community.person(b).map(|p| p.age).unwrap_or(0);
        age_b.cmp(&age_a)
    });
    people
}

/// Children of `p`, age-descending, optionally filtered to a sex.
pub fn children_of(sex: Option<Sex>) -> FindHeirsFn {
    Rc::new(move |community: &Community, p: PersonId| {
        let kids = kinship::children(community, p);
        let filtered: Vec<_> = kids
            .into_iter()
            .filter(|&c| sex.is_none_or(|s| community.person(c).is_some_and(|k| k.sex == s)))
            .collect();
        as_singleton_groups(age_descending(community, filtered))
    })
}

pub fn sons() -> FindHeirsFn {
    children_of(Some(Sex::Male))
}

pub fn daughters() -> FindHeirsFn {
    children_of(Some(Sex::Female))
}

/// Siblings' children, grouped by sibling (siblings ordered by age),
/// ranked by age within each group, optionally sex-filtered.
pub fn siblings_children(sex: Option<Sex>) -> FindHeirsFn {
    Rc::new(move |community: &Community, p: PersonId| {
        let sibs = age_descending(community, kinship::siblings(community, p));
        sibs.into_iter()
            .map(|sib| {
                let kids = kinship::children(community, sib);
                let filtered: Vec<_> = kids
                    .into_iter()
                    .filter(|&c| sex.is_none_or(|s| community.person(c).is_some_and(|k| k.sex == s)))
                    .collect();
                age_descending(community, filtered)
            })
            .collect()
    })
}

/// Brothers' sons specifically: the second-oldest son of each brother in
/// brother-age order. The eldest son is reserved for his own father's
/// estate; a brother with fewer than two surviving sons contributes none.
/// Mirrors `inherit_brothers_sons` in the original (`select[1]` after
/// sorting by age descending).
pub fn brothers_second_sons() -> FindHeirsFn {
    Rc::new(|community: &Community, p: PersonId| {
        let brothers = age_descending(
            community,
            kinship::siblings(community, p)
                .into_iter()
                .filter(|&s| community.person(s).is_some_and(|x| x.sex == Sex::Male))
                .collect(),
        );
        brothers
            .into_iter()
            .filter_map(|brother| {
                let sons = age_descending(
                    community,
                    kinship::children(community, brother)
                        .into_iter()
                        .filter(|&c| community.person(c).is_some_and(|x| x.sex == Sex::Male))
                        .collect(),
                );
                sons.get(1).map(|&second_oldest| vec![second_oldest])
            })
            .collect()
    })
}

pub fn find_heirs_multiple(finders: Vec<FindHeirsFn>) -> FindHeirsFn {
    Rc::new(move |community: &Community, p: PersonId| {
        finders.iter().flat_map(|f| f(community, p)).collect()
    })
}

pub fn limit_none() -> LimitHeirsFn {
    Rc::new(|_community: &Community, heirs: HeirGroups| heirs)
}

pub fn limit_exclude_current_owners() -> LimitHeirsFn {
    Rc::new(|community: &Community, heirs: HeirGroups| {
        heirs
            .into_iter()
            .map(|group| {
                group
                    .into_iter()
                    .filter(|&h| !community.owns_any_house(h))
                    .collect()
            })
            .collect()
    })
}

pub fn limit_exclude_below_majority(majority: u32) -> LimitHeirsFn {
    Rc::new(move |community: &Community, heirs: HeirGroups| {
        heirs
            .into_iter()
            .map(|group| {
                group
                    .into_iter()
                    .filter(|&h| community.person(h).is_some_and(|p| p.age >= majority))
                    .collect()
            })
            .collect()
    })
}

pub fn chain_limiters(limiters: Vec<LimitHeirsFn>) -> LimitHeirsFn {
    Rc::new(move |community: &Community, heirs: HeirGroups| {
        limiters
            .iter()
            .fold(heirs, |acc, limiter| limiter(community, acc))
    })
}

/// Picks the first element of the flattened heir ranking; for every house
/// `p` owned, transfers full ownership share to the heir and relocates
/// the heir's co-residential household into that house.
pub fn first_heir_and_move_household() -> DistributeFn {
    Rc::new(|community: &mut Community, p: PersonId, heirs: HeirGroups, _rng: &mut dyn RngCore| {
        let flat = flatten(&heirs);
        let Some(&heir) = flat.first() else {
            return false;
        };
        let houses = community.houses_owned_by(p);
        for house_id in houses {
            community.transfer_ownership(house_id, p, heir);
            community.relocate_coresidential_group(heir, house_id);
        }
        true
    })
}

/// Removes `p`'s share from each owned house, leaving it unowned.
pub fn no_owner() -> FailureFn {
    Rc::new(|community: &mut Community, p: PersonId| {
        let houses = community.houses_owned_by(p);
        for house_id in houses {
            community.house_mut(house_id).unwrap().remove_share(p);
        }
        !houses_is_empty(&houses)
    })
}

fn houses_is_empty(houses: &[crate::model::house::HouseId]) -> bool {
    houses.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::identity::MarriageStatus;
    use crate::testutil::Scenario;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn second_oldest_son_per_brother() {
        let mut s = Scenario::new();
        let owner = s.person(Sex::Male).age(60).id();
        let brother = s
            .person(Sex::Male)
            .age(58)
            .parents(&[])
            .id();
        // link owner and brother as siblings via a shared parent
        let shared_parent = s.person(Sex::Female).age(85).id();
        s.set_parent(owner, shared_parent);
        s.set_parent(brother, shared_parent);
        let eldest_son = s.person(Sex::Male).age(30).parents(&[brother]).id();
        let second_son = s.person(Sex::Male).age(28).parents(&[brother]).id();
        let only_son_brother2 = {
            let brother2 = s.person(Sex::Male).age(50).id();
            s.set_parent(brother2, shared_parent);
            s.person(Sex::Male).age(20).parents(&[brother2]).id()
        };
        let community = s.build();

        let groups = brothers_second_sons()(&community, owner);
        let flat = flatten(&groups);
        assert!(flat.contains(&second_son));
        assert!(!flat.contains(&eldest_son));
        assert!(!flat.contains(&only_son_brother2));
    }

    #[test]
    fn simple_form_falls_back_to_failure_when_rule_fails() {
        let mut s = Scenario::new();
        let owner = s.person(Sex::Male).age(70).status(MarriageStatus::Married).id();
        let house = s.house().owner(owner).occupants(&[owner]).id();
        let mut community = s.build();
        let rule = InheritanceRule::Simple {
            has_property: Rc::new(|c: &Community, p: PersonId| c.owns_any_house(p)),
            rule: Rc::new(|_c: &mut Community, _p: PersonId, _r: &mut dyn RngCore| false),
            failure: no_owner(),
        };
        let mut rng = SmallRng::seed_from_u64(1);
        let changed = rule.invoke(&mut community, owner, &mut rng);
        assert!(changed);
        assert!(community.house(house).unwrap().owners().next().is_none());
    }

    #[test]
    fn no_property_is_a_no_op() {
        let mut s = Scenario::new();
        let p = s.person(Sex::Male).age(70).id();
        let mut community = s.build();
        let rule = InheritanceRule::Simple {
            has_property: Rc::new(|c: &Community, p: PersonId| c.owns_any_house(p)),
            rule: Rc::new(|_c: &mut Community, _p: PersonId, _r: &mut dyn RngCore| true),
            failure: no_owner(),
        };
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(!rule.invoke(&mut community, p, &mut rng));
    }
}
