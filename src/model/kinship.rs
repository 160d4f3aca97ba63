//! Pure queries over the entity graph. None of these mutate state; each
//! returns an owned copy so callers may reorder or filter without
//! affecting anyone else's view.

use super::community::Community;
use super::person::PersonId;

/// `p.spouse`, or `None` if unmarried/widowed/ineligible.
pub fn spouse(community: &Community, p: PersonId) -> Option<PersonId> {
    community.person(p)?.spouse
}

/// A copy of `p.parents` (0, 1, or 2 elements).
pub fn parents(community: &Community, p: PersonId) -> Vec<PersonId> {
    community
        .person(p)
        .map(|person| person.parents.clone())
        .unwrap_or_default()
}

/// A copy of `p.children`, oldest first.
pub fn children(community: &Community, p: PersonId) -> Vec<PersonId> {
    community
        .person(p)
        .map(|person| person.children.clone())
        .unwrap_or_default()
}

/// Children of either of `p`'s parents, excluding `p` itself, order
/// preserved and deduplicated (a full sibling appears once even though
/// both shared parents list them).
pub fn siblings(community: &Community, p: PersonId) -> Vec<PersonId> {
    let mut seen = Vec::new();
    for parent in parents(community, p) {
        for child in children(community, parent) {
            if child != p && !seen.contains(&child) {
                seen.push(child);
            }
        }
    }
    seen
}

/// `[p] ++ spouse(p) ++ children(p)`.
pub fn family(community: &Community, p: PersonId) -> Vec<PersonId> {
    let mut result = vec![p];
    if let Some(s) = spouse(community, p) {
        result.push(s);
    }
    result.extend(children(community, p));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::identity::Sex;
    use crate::testutil::Scenario;

    #[test]
    fn siblings_excludes_self_and_dedups() {
        let mut s = Scenario::new();
        let mother = s.person(Sex::Female).age(40).id();
        let father = s.person(Sex::Male).age(42).id();
        let a = s.person(Sex::Male).age(10).parents(&[mother, father]).id();
        let b = s.person(Sex::Female).age(8).parents(&[mother, father]).id();
        let c = s.person(Sex::Male).age(6).parents(&[mother, father]).id();
        let community = s.build();

        let sibs = siblings(&community, a);
        assert_eq!(sibs.len(), 2);
        assert!(sibs.contains(&b));
        assert!(sibs.contains(&c));
        assert!(!sibs.contains(&a));
    }

    #[test]
    fn family_includes_spouse_and_children() {
        let mut s = Scenario::new();
        let husband = s.person(Sex::Male).age(30).id();
        let wife = s.person(Sex::Female).age(28).id();
        let child = s.person(Sex::Male).age(2).parents(&[husband, wife]).id();
        s.marry(husband, wife);
        let community = s.build();

        let fam = family(&community, husband);
        assert_eq!(fam.len(), 3);
        assert_eq!(fam[0], husband);
        assert!(fam.contains(&wife));
        assert!(fam.contains(&child));
    }

    #[test]
    fn unknown_person_yields_empty_results() {
        let s = Scenario::new();
        let community = s.build();
        assert_eq!(parents(&community, 9999), Vec::new());
        assert_eq!(children(&community, 9999), Vec::new());
        assert_eq!(spouse(&community, 9999), None);
    }
}
