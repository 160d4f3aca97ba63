//! Laslett-style household classification, grounded on the structure of
//! `residency.py` in the original implementation: count co-resident
//! married couples, then check for a prior generation co-resident with
//! the sole couple to distinguish nuclear from extended.

use super::community::Community;
use super::house::HouseId;
use super::identity::MarriageStatus;
use super::kinship;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Empty,
    Solitary,
    NoFamily,
    Nuclear,
    Extended,
    Multiple,
}

impl Classification {
    pub fn label(self) -> &'static str {
        match self {
            Classification::Empty => "empty",
            Classification::Solitary => "solitary",
            Classification::NoFamily => "no-family",
            Classification::Nuclear => "nuclear",
            Classification::Extended => "extended",
            Classification::Multiple => "multiple",
        }
    }
}

/// Classifies a house from its current occupants and the kinship graph
/// reachable from them. A pure function of `community` state: it performs
/// no mutation and has no memory across calls.
pub fn classify(community: &Community, house_id: HouseId) -> Classification {
    let Some(house) = community.house(house_id) else {
        return Classification::Empty;
    };
    let occupants = house.occupants();
    if occupants.is_empty() {
        return Classification::Empty;
    }
    if occupants.len() == 1 {
        return Classification::Solitary;
    }

    let occupant_set: Vec<_> = occupants.to_vec();
    let mut couples = Vec::new();
    for &p in &occupant_set {
        let Some(person) = community.person(p) else {
            continue;
        };
        if person.marriage_status != MarriageStatus::Married {
            continue;
        }
        let Some(spouse) = person.spouse else { continue };
        if spouse <= p {
            // canonicalize so each couple is counted once, husband/wife order irrelevant
            continue;
        }
        if occupant_set.contains(&spouse) {
            couples.push((p, spouse));
        }
    }

    match couples.len() {
        0 => Classification::NoFamily,
        1 => {
            let (a, b) = couples[0];
            let has_coresident_parent = [a, b].iter().any(|&member| {
                kinship::parents(community, member)
                    .iter()
                    .any(|parent| occupant_set.contains(parent))
            });
            if has_coresident_parent {
                Classification::Extended
            } else {
                Classification::Nuclear
            }
        }
        _ => Classification::Multiple,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::identity::Sex;
    use crate::testutil::Scenario;

    #[test]
    fn classification_progresses_nuclear_extended_multiple() {
        let mut s = Scenario::new();
        let a = s.person(Sex::Male).age(30).id();
        let b = s.person(Sex::Female).age(28).id();
        let c = s.person(Sex::Male).age(2).parents(&[a, b]).id();
        s.marry(a, b);
        let house = s.house().occupants(&[a, b, c]).id();
        let mut community = s.build();
        assert_eq!(classify(&community, house), Classification::Nuclear);

        let p = community.add_person_with_defaults(Sex::Male, 55);
        community.move_person(p, house);
        community.set_parent(a, p);
        assert_eq!(classify(&community, house), Classification::Extended);

        let d = community.add_person_with_defaults(Sex::Male, 26);
        let e = community.add_person_with_defaults(Sex::Female, 24);
        community.wed(d, e);
        community.move_person(d, house);
        community.move_person(e, house);
        assert_eq!(classify(&community, house), Classification::Multiple);
    }

    #[test]
    fn empty_and_solitary() {
        let mut s = Scenario::new();
        let empty_house = s.house().id();
        let a = s.person(Sex::Male).age(40).id();
        let solitary_house = s.house().occupants(&[a]).id();
        let community = s.build();
        assert_eq!(classify(&community, empty_house), Classification::Empty);
        assert_eq!(classify(&community, solitary_house), Classification::Solitary);
    }

    #[test]
    fn unmarried_cohabitants_are_no_family() {
        let mut s = Scenario::new();
        let a = s.person(Sex::Male).age(40).id();
        let b = s.person(Sex::Male).age(38).id();
        let house = s.house().occupants(&[a, b]).id();
        let community = s.build();
        assert_eq!(classify(&community, house), Classification::NoFamily);
    }
}
