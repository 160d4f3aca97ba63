use super::error::{BoundaryError, ConstructionError};
use super::identity::Sex;

/// Piecewise-constant per-sex annual rate schedule over age intervals.
///
/// `ages` holds strictly increasing lower bounds plus a final sentinel, so
/// interval `i` covers `ages[i] <= age < ages[i + 1]`. Rather than the
/// parallel `sex1`/`rates1`/`sex2`/`rates2` fields of the original, rates
/// are kept as a direct sex-indexed pair — one array per sex — so lookup is
/// a single dispatch plus a bounded search, and a table that is all-zero
/// for one sex (e.g. male fertility) costs nothing extra to represent.
#[derive(Debug, Clone, PartialEq)]
pub struct AgeTable {
    ages: Vec<u32>,
    male_rates: Vec<f64>,
    female_rates: Vec<f64>,
}

impl AgeTable {
    /// Builds a table from parallel sequences. `ages` must be strictly
    /// increasing with at least two entries (one interval); `male_rates`
    /// and `female_rates` must each have `ages.len() - 1` entries, all in
    /// `[0, 1]`.
    pub fn new(
        ages: Vec<u32>,
        male_rates: Vec<f64>,
        female_rates: Vec<f64>,
    ) -> Result<Self, ConstructionError> {
        for (i, pair) in ages.windows(2).enumerate() {
            if pair[0] >= pair[1] {
                return Err(ConstructionError::AgesNotIncreasing { index: i + 1 });
            }
        }
        let expected = ages.len().saturating_sub(1);
        if male_rates.len() != expected {
            return Err(ConstructionError::RateLengthMismatch {
                expected,
                got: male_rates.len(),
            });
        }
        if female_rates.len() != expected {
            return Err(ConstructionError::RateLengthMismatch {
                expected,
                got: female_rates.len(),
            });
        }
        for &r in male_rates.iter().chain(female_rates.iter()) {
            if !(0.0..=1.0).contains(&r) {
                return Err(ConstructionError::RateOutOfUnitRange { value: r });
            }
        }
        Ok(AgeTable {
            ages,
            male_rates,
            female_rates,
        })
    }

    /// A table that returns 0 for any input, regardless of span. Used as
    /// the default when a Community has no schedule for some process.
    pub fn null() -> Self {
        AgeTable {
            ages: vec![0, u32::MAX],
            male_rates: vec![0.0],
            female_rates: vec![0.0],
        }
    }

    fn rates_for(&self, sex: Sex) -> &[f64] {
        match sex {
            Sex::Male => &self.male_rates,
            Sex::Female => &self.female_rates,
        }
    }

    /// Returns the rate for the interval containing `age`, or `BoundaryError`
    /// if `age` falls outside the table's defined span.
    pub fn rate(&self, sex: Sex, age: u32) -> Result<f64, BoundaryError> {
        if age < self.ages[0] || age >= *self.ages.last().unwrap() {
            return Err(BoundaryError { age });
        }
        // Bounded binary search over interval lower bounds: find the last
        // index i such that ages[i] <= age.
        let idx = match self.ages.binary_search(&age) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        Ok(self.rates_for(sex)[idx])
    }

    pub fn is_all_zero_for(&self, sex: Sex) -> bool {
        self.rates_for(sex).iter().all(|&r| r == 0.0)
    }
}
