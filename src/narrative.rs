//! Human-readable summaries over Persons and Houses. Grounded on the
//! original implementation's `narrative.biography`/`narrative.census`
//! (`original_source/code/households/narrative.py`); `Person::biography`
//! already covers the per-person summary, this module adds the
//! matching per-house summary.

use crate::model::community::Community;
use crate::model::house::HouseId;
use crate::model::residency::classify;

/// `"a <classification> household with <N> person(s) residing"` plus
/// either `" with no owner"` or `" owned by <Name> (<shares> shares), …"`
/// (owners listed in Person-id order for determinism). Returns `None` if
/// `house_id` doesn't exist in `community`.
pub fn census(community: &Community, house_id: HouseId) -> Option<String> {
    let house = community.house(house_id)?;
    let classification = classify(community, house_id);
    let n = house.occupants().len();
    let mut text = if n == 1 {
        format!("a {} household with 1 person residing", classification.label())
    } else {
        format!("a {} household with {n} people residing", classification.label())
    };

    let mut owners: Vec<(u64, u32)> = house.shares().collect();
    owners.sort_by_key(|&(p, _)| p);
    if owners.is_empty() {
        text.push_str(" with no owner");
    } else {
        let parts: Vec<String> = owners
            .into_iter()
            .map(|(p, shares)| {
                let name = community
                    .person(p)
                    .map(|x| x.name.as_str())
                    .unwrap_or("unknown");
                format!("{name} ({shares} shares)")
            })
            .collect();
        text.push_str(" owned by ");
        text.push_str(&parts.join(", "));
    }
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::identity::Sex;
    use crate::testutil::Scenario;

    #[test]
    fn unowned_house_reports_no_owner() {
        let mut s = Scenario::new();
        let a = s.person(Sex::Male).age(40).id();
        let house = s.house().occupants(&[a]).id();
        let community = s.build();
        assert_eq!(
            census(&community, house).unwrap(),
            "a solitary household with 1 person residing with no owner"
        );
    }

    #[test]
    fn owned_house_names_the_owner_and_share_count() {
        let mut s = Scenario::new();
        let a = s.person(Sex::Male).age(40).id();
        let b = s.person(Sex::Male).age(38).id();
        let house = s.house().owner(a).occupants(&[a, b]).id();
        let community = s.build();
        let text = census(&community, house).unwrap();
        assert!(text.starts_with("a no-family household with 2 people residing owned by"));
        assert!(text.contains("(1 shares)"));
    }

    #[test]
    fn missing_house_is_none() {
        let s = Scenario::new();
        let community = s.build();
        assert!(census(&community, 9999).is_none());
    }
}
