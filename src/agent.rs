//! The term algebra of the solo calculus.
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::{CanonicalAgent, Name, NameSet};

#[cfg(feature = "sampling")]
mod random;

///Distinguishes input solos from output solos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Parity {
    ///`u x y`
    Input,
    ///`^u x y`
    Output,
}

impl Parity {
    ///The parity a solo must have to communicate with a solo of this parity.
    #[must_use]
    pub fn inverse(self) -> Parity {
        match self {
            Parity::Input => Parity::Output,
            Parity::Output => Parity::Input,
        }
    }
}

///An atomic input or output action on `subject` carrying `objects`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Solo {
    pub subject: Name,
    pub objects: Vec<Name>,
    pub parity: Parity,
}

impl Solo {
    pub fn new<N: Into<Name>>(
        subject: impl Into<Name>,
        objects: impl IntoIterator<Item = N>,
        parity: Parity,
    ) -> Self {
        Solo {
            subject: subject.into(),
            objects: objects.into_iter().map(Into::into).collect(),
            parity,
        }
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.objects.len()
    }

    ///The subject together with every object.
    pub fn iter_names(&self) -> impl Iterator<Item = &Name> {
        std::iter::once(&self.subject).chain(self.objects.iter())
    }

    #[must_use]
    pub fn names(&self) -> NameSet {
        self.iter_names().cloned().collect()
    }

    ///Apply `f` to the subject and every object, keeping the parity.
    #[must_use]
    pub fn rename(&self, f: impl Fn(&Name) -> Name) -> Solo {
        Solo {
            subject: f(&self.subject),
            objects: self.objects.iter().map(&f).collect(),
            parity: self.parity,
        }
    }

    ///Whether `self` and `other` could communicate: same subject, same arity, opposite parity.
    #[must_use]
    pub fn complements(&self, other: &Solo) -> bool {
        self.subject == other.subject
            && self.arity() == other.arity()
            && self.parity == other.parity.inverse()
    }
}

///A term of the calculus.
///
///Terms are immutable values; every operation of the engine returns a new term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Agent {
    ///An input or output action.
    Solo(Solo),
    ///The empty process, `0`.
    Inaction,
    ///Parallel composition. Order is irrelevant but multiplicity is not: `(P | P)` is not `P`.
    Composition(Vec<Agent>),
    ///`(x y)P`: binds `scope` over `child`.
    Scope { child: Box<Agent>, scope: NameSet },
    ///`!P`: unboundedly many copies of `child` in parallel.
    Replication(Box<Agent>),
}

impl From<Solo> for Agent {
    fn from(value: Solo) -> Self {
        Agent::Solo(value)
    }
}

impl Agent {
    ///`subject objects...`
    pub fn input<N: Into<Name>>(
        subject: impl Into<Name>,
        objects: impl IntoIterator<Item = N>,
    ) -> Agent {
        Agent::Solo(Solo::new(subject, objects, Parity::Input))
    }

    ///`^subject objects...`
    pub fn output<N: Into<Name>>(
        subject: impl Into<Name>,
        objects: impl IntoIterator<Item = N>,
    ) -> Agent {
        Agent::Solo(Solo::new(subject, objects, Parity::Output))
    }

    #[must_use]
    pub fn inaction() -> Agent {
        Agent::Inaction
    }

    pub fn composition(children: impl IntoIterator<Item = Agent>) -> Agent {
        Agent::Composition(children.into_iter().collect())
    }

    pub fn scope<N: Into<Name>>(scope: impl IntoIterator<Item = N>, child: Agent) -> Agent {
        Agent::Scope {
            child: Box::new(child),
            scope: scope.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn replication(child: Agent) -> Agent {
        Agent::Replication(Box::new(child))
    }

    ///Every name occurring in the term, bound or free.
    #[must_use]
    pub fn names(&self) -> NameSet {
        let mut names = NameSet::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names(&self, names: &mut NameSet) {
        match self {
            Agent::Solo(solo) => names.extend(solo.iter_names().cloned()),
            Agent::Inaction => (),
            Agent::Composition(children) => {
                children.iter().for_each(|x| x.collect_names(names));
            }
            Agent::Scope { child, scope } => {
                names.extend(scope.iter().cloned());
                child.collect_names(names);
            }
            Agent::Replication(child) => child.collect_names(names),
        }
    }

    ///Every name bound by some scope of the term.
    #[must_use]
    pub fn bound_names(&self) -> NameSet {
        match self {
            Agent::Solo(_) | Agent::Inaction => NameSet::new(),
            Agent::Composition(children) => {
                children.iter().flat_map(Agent::bound_names).collect()
            }
            Agent::Scope { child, scope } => {
                let mut names = child.bound_names();
                names.extend(scope.iter().cloned());
                names
            }
            Agent::Replication(child) => child.bound_names(),
        }
    }

    ///The names occurring outside of any binder for them.
    ///
    ///This is `names − bound_names` whenever no name of the term is used both bound and free
    ///(which holds for every flattened term). Otherwise a binder only hides the occurrences
    ///beneath it.
    #[must_use]
    pub fn free_names(&self) -> NameSet {
        self.free_names_under(&NameSet::new())
    }

    ///The free names of the term when it sits under binders for `ambient`.
    #[must_use]
    pub fn free_names_under(&self, ambient: &NameSet) -> NameSet {
        match self {
            Agent::Solo(solo) => solo
                .iter_names()
                .filter(|x| !ambient.contains(*x))
                .cloned()
                .collect(),
            Agent::Inaction => NameSet::new(),
            Agent::Composition(children) => children
                .iter()
                .flat_map(|x| x.free_names_under(ambient))
                .collect(),
            Agent::Scope { child, scope } => {
                let ambient: NameSet = ambient.union(scope).cloned().collect();
                child.free_names_under(&ambient)
            }
            Agent::Replication(child) => child.free_names_under(ambient),
        }
    }

    ///Structural normal form: nested compositions merged, every scope outside of a replicator
    ///extruded to the top (binders alpha-renamed where they would capture), inaction removed,
    ///unused binders dropped, `!!P` as `!P` and `!0` as `0`.
    ///
    ///The flattening theorem is a reduction step and is not applied here.
    #[must_use]
    pub fn flatten(&self) -> Agent {
        CanonicalAgent::new(self).into_agent()
    }

    #[must_use]
    pub fn is_inaction(&self) -> bool {
        matches!(self, Agent::Inaction)
    }

    ///The number of nodes in the term.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Agent::Solo(_) | Agent::Inaction => 1,
            Agent::Composition(children) => 1 + children.iter().map(Agent::size).sum::<usize>(),
            Agent::Scope { child, .. } | Agent::Replication(child) => 1 + child.size(),
        }
    }
}

impl Display for Solo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.parity == Parity::Output {
            write!(f, "^")?;
        }
        write!(f, "{}", self.subject)?;
        for object in &self.objects {
            write!(f, " {object}")?;
        }
        Ok(())
    }
}

impl Display for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Agent::Solo(solo) => write!(f, "{solo}"),
            Agent::Inaction => write!(f, "0"),
            Agent::Composition(children) if children.is_empty() => write!(f, "0"),
            Agent::Composition(children) => {
                let children = children
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" | ");
                write!(f, "({children})")
            }
            Agent::Scope { child, scope } if scope.is_empty() => write!(f, "{child}"),
            Agent::Scope { child, scope } => {
                let scope = scope
                    .iter()
                    .map(Name::as_str)
                    .collect::<Vec<_>>()
                    .join(" ");
                match child.as_ref() {
                    Agent::Solo(solo) => write!(f, "({scope})({solo})"),
                    child => write!(f, "({scope}){child}"),
                }
            }
            Agent::Replication(child) => match child.as_ref() {
                Agent::Solo(solo) => write!(f, "!({solo})"),
                child => write!(f, "!{child}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(s: &str) -> NameSet {
        s.split_whitespace().map(Name::from).collect()
    }

    #[test]
    fn names_of_terms() -> anyhow::Result<()> {
        let agent: Agent = "(x y)(u x | ^u y | p x y)".parse()?;
        assert_eq!(agent.names(), set("x y u p"));
        assert_eq!(agent.bound_names(), set("x y"));
        assert_eq!(agent.free_names(), set("u p"));

        let agent: Agent = "!(y)(p x | !(q y))".parse()?;
        assert_eq!(agent.names(), set("y p x q"));
        assert_eq!(agent.bound_names(), set("y"));
        assert_eq!(agent.free_names(), set("p x q"));

        assert!(Agent::inaction().names().is_empty());
        Ok(())
    }

    #[test]
    fn free_names_respect_binder_position() -> anyhow::Result<()> {
        let agent: Agent = "((x)(p x) | q x)".parse()?;
        assert_eq!(agent.free_names(), set("p q x"));
        assert_eq!(agent.bound_names(), set("x"));

        let inner: Agent = "(p x | q y)".parse()?;
        assert_eq!(inner.free_names_under(&set("x")), set("p q y"));
        Ok(())
    }

    #[test]
    fn solo_complements() {
        let i = Solo::new("u", ["x"], Parity::Input);
        let o = Solo::new("u", ["y"], Parity::Output);
        assert!(i.complements(&o));
        assert!(o.complements(&i));
        assert!(!i.complements(&i));
        assert!(!i.complements(&Solo::new("v", ["y"], Parity::Output)));
        assert!(!i.complements(&Solo::new("u", ["y", "z"], Parity::Output)));
        assert_eq!(i.arity(), 1);
    }

    #[test]
    fn printing() -> anyhow::Result<()> {
        for s in [
            "u x y",
            "^u x",
            "0",
            "(u x | ^u y | p x y)",
            "(x y)(u x | ^u y)",
            "(x)(p x)",
            "!(p x)",
            "!(x)(p x | q)",
            "(u0)(!(y)(p x | u0 q y) | !(w0 w1)(^u0 w0 w1 | w0 w1))",
        ] {
            let agent: Agent = s.parse()?;
            assert_eq!(agent.to_string(), s);
        }
        Ok(())
    }

    #[test]
    fn constructors_match_parser() -> anyhow::Result<()> {
        let built = Agent::scope(
            ["x"],
            Agent::composition([
                Agent::input("u", ["x"]),
                Agent::output("u", ["y"]),
                Agent::replication(Agent::input("p", ["x", "y"])),
            ]),
        );
        let parsed: Agent = "(x)(u x | ^u y | !(p x y))".parse()?;
        assert_eq!(built, parsed);
        assert_eq!(built.size(), 6);
        Ok(())
    }
}
