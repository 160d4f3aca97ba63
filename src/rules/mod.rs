//! Behavior rules as composable data records, per the design note that
//! each of MarriageRule / InheritanceRule / MobilityRule / BirthRule is a
//! plain struct holding function-valued fields rather than a class
//! hierarchy. A `RulePack` bundles one of each; Persons hold an `Rc` to a
//! pack so children can cheaply inherit their mother's rules (a clone of
//! the `Rc`, not of the closures).

pub mod birth;
pub mod inheritance;
pub mod marriage;
pub mod mobility;

use std::rc::Rc;

pub use birth::BirthRule;
pub use inheritance::InheritanceRule;
pub use marriage::MarriageRule;
pub use mobility::MobilityRule;

#[derive(Clone)]
pub struct RulePack {
    pub marriage: Rc<MarriageRule>,
    pub inheritance: Rc<InheritanceRule>,
    pub mobility: Rc<MobilityRule>,
    pub birth: Rc<BirthRule>,
}

impl RulePack {
    pub fn new(
        marriage: MarriageRule,
        inheritance: InheritanceRule,
        mobility: MobilityRule,
        birth: BirthRule,
    ) -> Rc<Self> {
        Rc::new(RulePack {
            marriage: Rc::new(marriage),
            inheritance: Rc::new(inheritance),
            mobility: Rc::new(mobility),
            birth: Rc::new(birth),
        })
    }
}
