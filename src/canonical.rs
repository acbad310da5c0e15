//! The flattened `(scope, solos, replicators)` shape of a term and equivalence up to renaming of
//! bound names.
use std::{collections::BTreeMap, fmt::Display};

use crate::{
    Agent, Name, NameSet, Solo, Substitution,
    name::mint,
    utils::{Multiset, Permutations},
};

///A term as one scope over a multiset of solos in parallel with a multiset of replicated terms,
///whose bodies are themselves canonical.
///
///Every binder of a canonical agent, at any depth, is distinct from every other binder and from
///every free name, and every bound name is used.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanonicalAgent {
    pub scope: NameSet,
    pub solos: Multiset<Solo>,
    pub replicators: Vec<CanonicalAgent>,
}

impl CanonicalAgent {
    #[must_use]
    pub fn new(agent: &Agent) -> Self {
        let mut working = agent.names();
        CanonicalAgent::build(agent, &mut working)
    }

    ///Canonicalises `agent`, drawing any names needed to resolve binder collisions from
    ///`working` (which must contain every name of `agent`) and recording them there.
    pub(crate) fn build(agent: &Agent, working: &mut NameSet) -> Self {
        let mut claimed = agent.free_names();
        let mut canonical = CanonicalAgent::default();
        canonical.absorb(agent, &mut claimed, working);
        canonical.prune();
        canonical
    }

    fn absorb(&mut self, agent: &Agent, claimed: &mut NameSet, working: &mut NameSet) {
        match agent {
            Agent::Solo(solo) => self.solos.insert(solo.clone()),
            Agent::Inaction => (),
            Agent::Composition(children) => {
                for child in children {
                    self.absorb(child, claimed, working);
                }
            }
            Agent::Scope { child, scope } => {
                let collisions: Vec<&Name> = scope.intersection(claimed).collect();
                if collisions.is_empty() {
                    claimed.extend(scope.iter().cloned());
                    self.scope.extend(scope.iter().cloned());
                    self.absorb(child, claimed, working);
                } else {
                    let alpha = Substitution::alpha(
                        collisions
                            .into_iter()
                            .map(|x| (x.clone(), mint(working, x.as_str())))
                            .collect::<Vec<_>>(),
                    );
                    self.absorb(&alpha.apply(agent), claimed, working);
                }
            }
            Agent::Replication(child) => {
                let mut body = CanonicalAgent::default();
                body.absorb(child, claimed, working);
                body.prune();

                if body.solos.is_empty() && body.replicators.is_empty() {
                    // !0 is 0
                } else if body.scope.is_empty() && body.solos.is_empty() {
                    // !!P is !P
                    if let [inner] = body.replicators.as_slice() {
                        self.replicators.push(inner.clone());
                    } else {
                        self.replicators.push(body);
                    }
                } else {
                    self.replicators.push(body);
                }
            }
        }
    }

    fn prune(&mut self) {
        let used = self.used_names();
        self.scope.retain(|x| used.contains(x));
    }

    fn used_names(&self) -> NameSet {
        let mut used: NameSet = self.solos.distinct().flat_map(Solo::iter_names).cloned().collect();
        for replicator in &self.replicators {
            used.extend(replicator.free_names());
        }
        used
    }

    #[must_use]
    pub fn free_names(&self) -> NameSet {
        let mut used = self.used_names();
        used.retain(|x| !self.scope.contains(x));
        used
    }

    ///Every name occurring anywhere in the canonical agent.
    #[must_use]
    pub fn names(&self) -> NameSet {
        let mut names = self.scope.clone();
        names.extend(self.solos.distinct().flat_map(Solo::iter_names).cloned());
        for replicator in &self.replicators {
            names.extend(replicator.names());
        }
        names
    }

    #[must_use]
    pub fn is_inaction(&self) -> bool {
        self.solos.is_empty() && self.replicators.is_empty()
    }

    ///Rebuilds the term with as little structure as possible: no scope without binders, no
    ///composition of a single child and `0` for nothing at all.
    #[must_use]
    pub fn into_agent(&self) -> Agent {
        let mut children: Vec<Agent> = self.solos.iter().cloned().map(Agent::Solo).collect();
        children.extend(
            self.replicators
                .iter()
                .map(|x| Agent::replication(x.into_agent())),
        );

        let body = match children.len() {
            0 => Agent::Inaction,
            1 => children.pop().unwrap_or(Agent::Inaction),
            _ => Agent::Composition(children),
        };
        if self.scope.is_empty() {
            body
        } else {
            Agent::Scope {
                child: Box::new(body),
                scope: self.scope.clone(),
            }
        }
    }

    fn matches(&self, other: &CanonicalAgent, env: &BTreeMap<Name, Name>) -> bool {
        if self.scope.len() != other.scope.len()
            || self.solos.len() != other.solos.len()
            || self.replicators.len() != other.replicators.len()
        {
            return false;
        }

        let theirs: Vec<&Name> = other.scope.iter().collect();
        for permutation in Permutations::new(theirs.len()) {
            let mut env = env.clone();
            env.extend(
                self.scope
                    .iter()
                    .zip(permutation)
                    .map(|(x, i)| (x.clone(), theirs[i].clone())),
            );
            let renamed = self
                .solos
                .map(|s| s.rename(|x| env.get(x).cloned().unwrap_or_else(|| x.clone())));
            if renamed == other.solos && self.replicators_match(other, &env) {
                return true;
            }
        }
        false
    }

    fn replicators_match(&self, other: &CanonicalAgent, env: &BTreeMap<Name, Name>) -> bool {
        let compatible: Vec<Vec<bool>> = self
            .replicators
            .iter()
            .map(|a| {
                other
                    .replicators
                    .iter()
                    .map(|b| a.matches(b, env))
                    .collect()
            })
            .collect();

        Permutations::new(other.replicators.len()).any(|permutation| {
            permutation
                .into_iter()
                .enumerate()
                .all(|(i, j)| compatible[i][j])
        })
    }
}

impl Display for CanonicalAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.into_agent())
    }
}

///Whether two terms are equal up to structural congruence and renaming of bound names.
///
///Both terms are canonicalised, then every bijection between the binders of each level and every
///pairing of replicators is tried. This is exponential in the number of binders and replicators
///per level and only meant for small terms.
#[must_use]
pub fn alpha_eq(a: &Agent, b: &Agent) -> bool {
    if a.free_names() != b.free_names() {
        return false;
    }
    let a = CanonicalAgent::new(a);
    let b = CanonicalAgent::new(b);
    a.matches(&b, &BTreeMap::new())
}
