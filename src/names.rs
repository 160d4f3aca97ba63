//! Name and address pools for display. Behavior never depends on a name;
//! these exist purely for the narrative surface (`biography`, `census`,
//! diary summaries).
//!
//! Grounded on two sources: the original implementation's `male_names`/
//! `female_names`/`address_names` lists (`narrative.py`), carried as the
//! defaults, and a retry-then-epithet-fallback idiom for what happens
//! when a short list runs out of fresh names on a long run.

use rand::Rng;
use rand::RngCore;

use crate::model::identity::Sex;

const DEFAULT_MALE_NAMES: &[&str] = &[
    "Alaric", "Bertram", "Cedric", "Dunstan", "Edmund", "Fenwick", "Godwin", "Hereward", "Ivor",
    "Leofric",
];

const DEFAULT_FEMALE_NAMES: &[&str] = &[
    "Aldith", "Bertha", "Cwen", "Dunne", "Edith", "Frideswide", "Godiva", "Hilda", "Isolde",
    "Leofe",
];

const DEFAULT_ADDRESSES: &[&str] = &[
    "Mill Lane", "Church Row", "High Street", "Fold Yard", "Back Lane", "Bridge End",
    "Marsh Gate", "Long Furlong", "Spring Close", "Glebe Field",
];

const EPITHETS: &[&str] = &[
    "the Elder", "the Younger", "the Tall", "the Fair", "of the Mill", "of the Brook", "the Red",
    "the Quiet",
];

const UNIQUENESS_RETRIES: usize = 5;

/// Static lists of display names/addresses supplied at bootstrap. Never
/// mutated after construction; list exhaustion falls back to an
/// epithet-suffixed name instead of panicking or looping forever.
pub struct NamePool {
    male_names: Vec<String>,
    female_names: Vec<String>,
    addresses: Vec<String>,
}

impl NamePool {
    pub fn new(male_names: Vec<String>, female_names: Vec<String>, addresses: Vec<String>) -> Self {
        NamePool {
            male_names,
            female_names,
            addresses,
        }
    }

    pub fn default_pool() -> Self {
        NamePool {
            male_names: DEFAULT_MALE_NAMES.iter().map(|s| s.to_string()).collect(),
            female_names: DEFAULT_FEMALE_NAMES.iter().map(|s| s.to_string()).collect(),
            addresses: DEFAULT_ADDRESSES.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn pool_for(&self, sex: Sex) -> &[String] {
        match sex {
            Sex::Male => &self.male_names,
            Sex::Female => &self.female_names,
        }
    }

    /// Picks a random name for `sex`. Retries a handful of times hoping
    /// for uniqueness against `taken`, then falls back to an
    /// epithet-suffixed variant so a long run never stalls waiting on a
    /// ten-entry list.
    pub fn generate_unique(&self, sex: Sex, rng: &mut dyn RngCore, taken: &[String]) -> String {
        let pool = self.pool_for(sex);
        for _ in 0..UNIQUENESS_RETRIES {
            let candidate = pool[rng.random_range(0..pool.len())].clone();
            if !taken.contains(&candidate) {
                return candidate;
            }
        }
        let base = &pool[rng.random_range(0..pool.len())];
        let epithet = EPITHETS[rng.random_range(0..EPITHETS.len())];
        format!("{base} {epithet}")
    }

    pub fn generate(&self, sex: Sex, rng: &mut dyn RngCore) -> String {
        self.generate_unique(sex, rng, &[])
    }

    pub fn generate_address(&self, rng: &mut dyn RngCore) -> String {
        let idx = rng.random_range(0..self.addresses.len());
        self.addresses[idx].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn generate_stays_within_pool_absent_collisions() {
        let pool = NamePool::default_pool();
        let mut rng = SmallRng::seed_from_u64(1);
        let name = pool.generate(Sex::Male, &mut rng);
        assert!(DEFAULT_MALE_NAMES.contains(&name.as_str()));
    }

    #[test]
    fn exhausted_pool_falls_back_to_epithet() {
        let pool = NamePool::default_pool();
        let mut rng = SmallRng::seed_from_u64(1);
        let taken: Vec<String> = DEFAULT_MALE_NAMES.iter().map(|s| s.to_string()).collect();
        let name = pool.generate_unique(Sex::Male, &mut rng, &taken);
        assert!(name.contains(' '), "expected an epithet-suffixed name, got {name}");
    }

    #[test]
    fn address_pool_nonempty() {
        let pool = NamePool::default_pool();
        let mut rng = SmallRng::seed_from_u64(2);
        let addr = pool.generate_address(&mut rng);
        assert!(!addr.is_empty());
    }
}
