use std::rc::Rc;

use super::diary::Diary;
use super::house::{CommunityId, HouseId};
use super::identity::{LifeStatus, MarriageStatus, Sex};
use crate::rules::RulePack;

pub type PersonId = u64;

/// An agent. `community`, `spouse`, `parents`, `children`, and `house`
/// are all non-owning indices into the owning `Community`'s arenas — see
/// the module-level docs on `Community` for why a stale index can never
/// resolve to the wrong entity. `community` is set once at birth/arrival
/// and never changes.
pub struct Person {
    id: PersonId,
    pub community: CommunityId,
    pub sex: Sex,
    pub name: String,
    pub age: u32,
    pub life_status: LifeStatus,
    pub marriage_status: MarriageStatus,
    pub spouse: Option<PersonId>,
    pub parents: Vec<PersonId>,
    pub children: Vec<PersonId>,
    pub house: Option<HouseId>,
    pub birth_year: u32,
    pub rules: Rc<RulePack>,
    pub diary: Diary,
}

impl Person {
    pub fn new(
        id: PersonId,
        community: CommunityId,
        sex: Sex,
        name: String,
        age: u32,
        birth_year: u32,
        rules: Rc<RulePack>,
    ) -> Self {
        Person {
            id,
            community,
            sex,
            name,
            age,
            life_status: LifeStatus::Alive,
            marriage_status: MarriageStatus::Ineligible,
            spouse: None,
            parents: Vec::new(),
            children: Vec::new(),
            house: None,
            birth_year,
            rules,
            diary: Diary::new(),
        }
    }

    pub fn id(&self) -> PersonId {
        self.id
    }

    pub fn is_alive(&self) -> bool {
        self.life_status == LifeStatus::Alive
    }

    /// `"<status>"` or `"<status> with <N> child(ren)"`.
    pub fn marital_summary(&self) -> String {
        let status = self.marriage_status.adjective();
        match self.children.len() {
            0 => status.to_string(),
            1 => format!("{status} with 1 child"),
            n => format!("{status} with {n} children"),
        }
    }

    /// `"<Name> is a <alive|dead> <sex-noun>, <N> years old, <marital summary>"`
    pub fn biography(&self) -> String {
        format!(
            "{} is a {} {}, {} years old, {}",
            self.name,
            self.life_status.adjective(),
            self.sex.noun(),
            self.age,
            self.marital_summary()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::default_rule_pack;

    fn person() -> Person {
        Person::new(1, 1, Sex::Female, "Edith".to_string(), 34, 0, default_rule_pack())
    }

    #[test]
    fn biography_format_no_children() {
        let p = person();
        assert_eq!(
            p.biography(),
            "Edith is a living woman, 34 years old, unmarried"
        );
    }

    #[test]
    fn biography_format_with_children() {
        let mut p = person();
        p.marriage_status = MarriageStatus::Married;
        p.children = vec![2, 3];
        assert_eq!(
            p.biography(),
            "Edith is a living woman, 34 years old, married with 2 children"
        );
    }

    #[test]
    fn biography_singular_child() {
        let mut p = person();
        p.marriage_status = MarriageStatus::Married;
        p.children = vec![2];
        assert!(p.biography().ends_with("married with 1 child"));
    }
}
