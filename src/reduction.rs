//! One-step rewriting of terms.
//!
//! A step first canonicalises the term, which performs scope extrusion, associativity and the
//! identity laws. It then applies the first rule that fires, in this order:
//! 1. the flattening theorem, to a replicator whose body holds another replicator;
//! 2. direct fusion of two solos at the top level;
//! 3. fusion of a top-level solo with a solo of a copy of a replicator's body;
//! 4. fusion between copies of replicator bodies: one copy each of two replicators, or two solos
//!    of one copy when the fusion needs a binder from outside the replicator;
//! 5. direct fusion inside a replicator's body, which rewrites every copy at once.
//!
//! Within a rule, candidates are tried in the order of the canonical form. This order is one
//! choice among many: the calculus is not confluent, and the engine makes no promise about which
//! redex fires beyond the result being a valid reduct. Compare results with [`crate::alpha_eq`].
use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::{
    Agent, CanonicalAgent, Name, NameSet, Parity, SigmaBuilder, Solo, Substitution,
    name::mint, sigma::Fusion, utils::Multiset,
};

impl Agent {
    ///Performs a single reduction step and returns the flattened result.
    ///
    ///If no rule applies, the flattened term itself is returned, so a term is a fixpoint when it
    ///is [`crate::alpha_eq`] to its reduct.
    #[must_use]
    pub fn reduce(&self) -> Agent {
        let mut working = self.names();
        let canonical = CanonicalAgent::build(self, &mut working);
        match step(&canonical, &working) {
            Some(reduct) => reduct,
            None => {
                trace!(agent = %canonical, "no redex");
                canonical.into_agent()
            }
        }
    }

    ///Whether [`Agent::reduce`] would rewrite anything.
    #[must_use]
    pub fn is_reducible(&self) -> bool {
        let mut working = self.names();
        let canonical = CanonicalAgent::build(self, &mut working);
        step(&canonical, &working).is_some()
    }
}

fn step(agent: &CanonicalAgent, working: &NameSet) -> Option<Agent> {
    let (rule, reduct) = flatten_nested_replication(agent, working)
        .map(|x| ("flattening", x))
        .or_else(|| direct(agent, working).map(|x| ("direct", x)))
        .or_else(|| outer_inner(agent, working).map(|x| ("outer-inner", x)))
        .or_else(|| inner_inner(agent, working).map(|x| ("inner-inner", x)))
        .or_else(|| within_replicator(agent, working).map(|x| ("within-replicator", x)))?;
    let reduct = reduct.flatten();
    debug!(rule, agent = %agent, reduct = %reduct, "reduced");
    Some(reduct)
}

///`(scope)(solos | !replicators)`
fn rebuild(
    scope: NameSet,
    solos: impl IntoIterator<Item = Solo>,
    replicators: Vec<Agent>,
) -> Agent {
    let mut children: Vec<Agent> = solos.into_iter().map(Agent::Solo).collect();
    children.extend(replicators.into_iter().map(Agent::replication));
    Agent::Scope {
        child: Box::new(Agent::Composition(children)),
        scope,
    }
}

fn replicators_of(agent: &CanonicalAgent) -> Vec<Agent> {
    agent.replicators.iter().map(CanonicalAgent::into_agent).collect()
}

fn without(solos: &Multiset<Solo>, removed: &[&Solo]) -> Multiset<Solo> {
    let mut solos = solos.clone();
    for solo in removed {
        solos.remove(solo);
    }
    solos
}

///Every pair of an input and an output solo that may communicate.
fn communicating<'a>(
    a: &'a Multiset<Solo>,
    b: &'a Multiset<Solo>,
) -> impl Iterator<Item = (&'a Solo, &'a Solo)> {
    a.distinct()
        .flat_map(move |x| b.distinct().map(move |y| (x, y)))
        .filter(|(x, y)| x.complements(y))
}

///Tries to fuse `a` with `b`. Names are minted from a copy of `working`, which replaces it only
///if the fusion exists.
fn fuse(a: &Solo, b: &Solo, bound: &NameSet, working: &mut NameSet) -> Option<Fusion> {
    let mut trial = working.clone();
    let fusion = SigmaBuilder::build(a, b, bound, &mut trial)?;
    *working = trial;
    Some(fusion)
}

///Applies the fusion to `(bound ∪ fresh)(solos | !replicators)`.
fn fire(
    fusion: Fusion,
    mut bound: NameSet,
    solos: impl IntoIterator<Item = Solo>,
    replicators: Vec<Agent>,
) -> Agent {
    bound.extend(fusion.fresh);
    fusion.sigma.apply(&rebuild(bound, solos, replicators))
}

///A copy of a replicator body with its binders renamed apart from `working`.
fn copy_out(body: &CanonicalAgent, working: &mut NameSet) -> (NameSet, Multiset<Solo>) {
    let renaming: BTreeMap<Name, Name> = body
        .scope
        .iter()
        .map(|x| (x.clone(), mint(working, x.as_str())))
        .collect();
    let solos = body
        .solos
        .map(|s| s.rename(|x| renaming.get(x).cloned().unwrap_or_else(|| x.clone())));
    (renaming.into_values().collect(), solos)
}

///`!(x)(P | !Q)` becomes `(u)(!(x)(P | u z) | !(w)(^u w | Q{w/z}))`, where `z` are the free
///names of `Q` and `u` and `w` are fresh.
fn flatten_nested_replication(agent: &CanonicalAgent, working: &NameSet) -> Option<Agent> {
    let (i, outer) = agent
        .replicators
        .iter()
        .enumerate()
        .find(|(_, x)| !x.replicators.is_empty())?;
    let (inner, rest) = outer.replicators.split_first()?;

    let mut working = working.clone();
    let z: Vec<Name> = inner.free_names().into_iter().collect();
    let u = mint(&mut working, "u");
    let w: Vec<Name> = z.iter().map(|_| mint(&mut working, "w")).collect();

    let caller = rebuild(
        outer.scope.clone(),
        outer
            .solos
            .iter()
            .cloned()
            .chain(std::iter::once(Solo::new(u.clone(), z.clone(), Parity::Input))),
        rest.iter().map(CanonicalAgent::into_agent).collect(),
    );
    let alpha = Substitution::alpha(z.iter().cloned().zip(w.iter().cloned()));
    let callee = alpha.apply(&Agent::scope(
        z.iter().cloned(),
        Agent::composition([
            Agent::Solo(Solo::new(u.clone(), z.clone(), Parity::Output)),
            inner.into_agent(),
        ]),
    ));

    let mut replicators = replicators_of(agent);
    replicators[i] = caller;
    replicators.push(callee);

    let mut scope = agent.scope.clone();
    scope.insert(u);
    Some(rebuild(scope, agent.solos.iter().cloned(), replicators))
}

fn direct(agent: &CanonicalAgent, working: &NameSet) -> Option<Agent> {
    let mut working = working.clone();
    let pairs =
        communicating(&agent.solos, &agent.solos).filter(|(a, _)| a.parity == Parity::Input);
    for (a, b) in pairs {
        if let Some(fusion) = fuse(a, b, &agent.scope, &mut working) {
            let rest = without(&agent.solos, &[a, b]);
            return Some(fire(
                fusion,
                agent.scope.clone(),
                rest.iter().cloned(),
                replicators_of(agent),
            ));
        }
        trace!(%a, %b, "not a redex");
    }
    None
}

fn outer_inner(agent: &CanonicalAgent, working: &NameSet) -> Option<Agent> {
    for replicator in &agent.replicators {
        let mut working = working.clone();
        let (copied, copy) = copy_out(replicator, &mut working);
        let bound: NameSet = agent.scope.union(&copied).cloned().collect();

        for (a, b) in communicating(&agent.solos, &copy) {
            if let Some(fusion) = fuse(a, b, &bound, &mut working) {
                let rest = without(&agent.solos, &[a])
                    .iter()
                    .chain(without(&copy, &[b]).iter())
                    .cloned()
                    .collect::<Vec<_>>();
                return Some(fire(fusion, bound, rest, replicators_of(agent)));
            }
            trace!(%a, %b, "not a redex");
        }
    }
    None
}

fn inner_inner(agent: &CanonicalAgent, working: &NameSet) -> Option<Agent> {
    let n = agent.replicators.len();
    for i in 0..n {
        for j in i..n {
            let mut working = working.clone();
            let (own, first) = copy_out(&agent.replicators[i], &mut working);
            let mut bound: NameSet = agent.scope.union(&own).cloned().collect();
            let second = if i == j {
                None
            } else {
                let (copied, second) = copy_out(&agent.replicators[j], &mut working);
                bound.extend(copied);
                Some(second)
            };

            let partner = second.as_ref().unwrap_or(&first);
            for (a, b) in communicating(&first, partner) {
                if second.is_none() {
                    // a redex local to one body is reduced in place by `within_replicator`
                    if a.parity != Parity::Input
                        || SigmaBuilder::build(a, b, &own, &mut working.clone()).is_some()
                    {
                        continue;
                    }
                }
                if let Some(fusion) = fuse(a, b, &bound, &mut working) {
                    let rest: Vec<Solo> = match &second {
                        None => without(&first, &[a, b]).iter().cloned().collect(),
                        Some(second) => without(&first, &[a])
                            .iter()
                            .chain(without(second, &[b]).iter())
                            .cloned()
                            .collect(),
                    };
                    let solos = agent.solos.iter().cloned().chain(rest);
                    return Some(fire(fusion, bound, solos, replicators_of(agent)));
                }
                trace!(%a, %b, "not a redex");
            }
        }
    }
    None
}

fn within_replicator(agent: &CanonicalAgent, working: &NameSet) -> Option<Agent> {
    let mut working = working.clone();
    for (i, body) in agent.replicators.iter().enumerate() {
        let pairs =
            communicating(&body.solos, &body.solos).filter(|(a, _)| a.parity == Parity::Input);
        for (a, b) in pairs {
            if let Some(fusion) = fuse(a, b, &body.scope, &mut working) {
                let rest = without(&body.solos, &[a, b]);
                let reduced = fire(
                    fusion,
                    body.scope.clone(),
                    rest.iter().cloned(),
                    replicators_of(body),
                );
                let mut replicators = replicators_of(agent);
                replicators[i] = reduced;
                return Some(rebuild(
                    agent.scope.clone(),
                    agent.solos.iter().cloned(),
                    replicators,
                ));
            }
            trace!(%a, %b, "not a redex");
        }
    }
    None
}
