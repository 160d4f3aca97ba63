use std::rc::Rc;

use rand::Rng;
use rand::RngCore;

use crate::model::age_table::AgeTable;
use crate::model::community::Community;
use crate::model::error::ConstructionError;
use crate::model::identity::{MarriageStatus, Sex};
use crate::model::person::PersonId;

pub type MaternalDeathFn = Rc<dyn Fn(&mut dyn RngCore, &Community, PersonId) -> bool>;
pub type InfanticideFn = Rc<dyn Fn(&mut dyn RngCore, &Community, PersonId, PersonId) -> bool>;

pub struct BirthRule {
    pub married_table: AgeTable,
    pub unmarried_table: AgeTable,
    pub female_sex_ratio: f64,
    pub maternal_death: MaternalDeathFn,
    pub infanticide: InfanticideFn,
}

impl BirthRule {
    pub fn new(
        married_table: AgeTable,
        unmarried_table: AgeTable,
        female_sex_ratio: f64,
        maternal_death: MaternalDeathFn,
        infanticide: InfanticideFn,
    ) -> Result<Self, ConstructionError> {
        if !(0.0..=1.0).contains(&female_sex_ratio) {
            return Err(ConstructionError::SexRatioOutOfRange {
                value: female_sex_ratio,
            });
        }
        if !married_table.is_all_zero_for(Sex::Male) || !unmarried_table.is_all_zero_for(Sex::Male) {
            return Err(ConstructionError::MaleFertilityNonZero);
        }
        Ok(BirthRule {
            married_table,
            unmarried_table,
            female_sex_ratio,
            maternal_death,
            infanticide,
        })
    }

    /// Returns whether a live birth occurred this call (`false` for a
    /// missed roll, a male focal person, or an infanticide — the child
    /// still briefly exists in that last case, but the birth is reported
    /// as not-survived).
    pub fn invoke(&self, community: &mut Community, mother: PersonId, rng: &mut dyn RngCore) -> bool {
        let Some(person) = community.person(mother) else {
            return false;
        };
        if person.sex != Sex::Female {
            return false;
        }
        let spouse_alive = person
            .spouse
            .and_then(|s| community.person(s))
            .is_some_and(|s| s.life_status == crate::model::identity::LifeStatus::Alive);
        let table = if person.marriage_status == MarriageStatus::Married && spouse_alive {
            &self.married_table
        } else {
            &self.unmarried_table
        };
        let rate = table.rate(person.sex, person.age).unwrap_or(0.0);
        if rng.random::<f64>() >= rate {
            return false;
        }

        let child_sex = if rng.random::<f64>() < self.female_sex_ratio {
            Sex::Female
        } else {
            Sex::Male
        };
        let child = community.give_birth(mother, child_sex, rng);

        let mother_dies = (self.maternal_death)(rng, community, mother);
        if mother_dies {
            community.kill(mother, rng);
        }
        let child_dies = (self.infanticide)(rng, community, mother, child);
        if child_dies {
            community.kill(child, rng);
            return false;
        }
        true
    }
}

pub fn maternal_death_never() -> MaternalDeathFn {
    Rc::new(|_rng: &mut dyn RngCore, _community: &Community, _mother: PersonId| false)
}

pub fn infanticide_never() -> InfanticideFn {
    Rc::new(|_rng: &mut dyn RngCore, _community: &Community, _mother: PersonId, _child: PersonId| false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::Scenario;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn male_focal_person_never_gives_birth() {
        let mut s = Scenario::new();
        let p = s.person(Sex::Male).age(25).status(MarriageStatus::Married).id();
        let mut community = s.build();
        let rule = BirthRule::new(
            AgeTable::new(vec![0, 100], vec![0.0], vec![1.0]).unwrap(),
            AgeTable::new(vec![0, 100], vec![0.0], vec![1.0]).unwrap(),
            0.5,
            maternal_death_never(),
            infanticide_never(),
        )
        .unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(!rule.invoke(&mut community, p, &mut rng));
    }

    #[test]
    fn rejects_nonzero_male_fertility() {
        let err = BirthRule::new(
            AgeTable::new(vec![0, 100], vec![0.1], vec![1.0]).unwrap(),
            AgeTable::new(vec![0, 100], vec![0.0], vec![1.0]).unwrap(),
            0.5,
            maternal_death_never(),
            infanticide_never(),
        )
        .unwrap_err();
        assert_eq!(err, ConstructionError::MaleFertilityNonZero);
    }

    #[test]
    fn rejects_sex_ratio_out_of_range() {
        let err = BirthRule::new(
            AgeTable::new(vec![0, 100], vec![0.0], vec![1.0]).unwrap(),
            AgeTable::new(vec![0, 100], vec![0.0], vec![1.0]).unwrap(),
            1.2,
            maternal_death_never(),
            infanticide_never(),
        )
        .unwrap_err();
        assert_eq!(err, ConstructionError::SexRatioOutOfRange { value: 1.2 });
    }

    #[test]
    fn certain_birth_produces_a_living_child() {
        let mut s = Scenario::new();
        let mother = s.person(Sex::Female).age(25).status(MarriageStatus::Married).id();
        let mut community = s.build();
        let rule = BirthRule::new(
            AgeTable::new(vec![0, 100], vec![0.0], vec![1.0]).unwrap(),
            AgeTable::new(vec![0, 100], vec![0.0], vec![1.0]).unwrap(),
            1.0,
            maternal_death_never(),
            infanticide_never(),
        )
        .unwrap();
        let mut rng = SmallRng::seed_from_u64(3);
        let before = community.living_ids().len();
        let happened = rule.invoke(&mut community, mother, &mut rng);
        assert!(happened);
        assert_eq!(community.living_ids().len(), before + 1);
    }
}
