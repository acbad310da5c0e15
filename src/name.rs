//! Names of the calculus and generation of fresh ones.
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt::Display};

///An opaque symbol of the calculus. Two names denote the same channel iff their labels are equal.
///
///Names are never mutated: identifying two names is done by rewriting every occurrence with a
///[`crate::Substitution`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Name(String);

///An ordered set of names. Ordered so that anything derived from iterating it (fresh names,
///printing) is deterministic.
pub type NameSet = BTreeSet<Name>;

impl Name {
    ///Create a name from its label.
    pub fn new(label: impl Into<String>) -> Self {
        Name(label.into())
    }

    ///The label of the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Name(value)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

///Returns the first of `hint0`, `hint1`, `hint2`, ... that is not in `working_set`, where trailing
///digits are first stripped from `hint`.
///
///```
///# use solo_calculus::{Name, NameSet, fresh};
///let working_set: NameSet = ["u", "u0", "x"].into_iter().map(Name::from).collect();
///assert_eq!(fresh(&working_set, "u"), Name::from("u1"));
///assert_eq!(fresh(&working_set, "x12"), Name::from("x0"));
///```
#[must_use]
pub fn fresh(working_set: &NameSet, hint: &str) -> Name {
    let stem = hint.trim_end_matches(|c: char| c.is_ascii_digit());
    (0..)
        .map(|i| Name(format!("{stem}{i}")))
        .find(|name| !working_set.contains(name))
        .expect("there are infinitely many candidate names")
}

///Like [`fresh`] but also records the new name in the working set, so repeated calls never hand
///out the same name twice.
pub(crate) fn mint(working_set: &mut NameSet, hint: &str) -> Name {
    let name = fresh(working_set, hint);
    working_set.insert(name.clone());
    name
}
