use tracing::trace;

use crate::{Name, NameSet, PartitionGraph, Solo, Substitution, name::mint};

///A fusion ready to be applied: the substitution plus the names it minted, which have to be
///bound where the result is rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fusion {
    pub sigma: Substitution,
    pub fresh: NameSet,
}

///Builds the fusion a communication between two solos causes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SigmaBuilder;

impl SigmaBuilder {
    ///Pairs the objects of `a` and `b` position by position and identifies each connected group
    ///of paired names with a single representative:
    ///- the group's only name outside of `bound`, if there is exactly one;
    ///- a fresh name minted from `working` if every name of the group is bound.
    ///
    ///Returns [`None`] when the solos cannot communicate (different subjects, different arities
    ///or equal parities) or when a group holds two names outside of `bound`, since free names
    ///can never be identified.
    pub fn build(a: &Solo, b: &Solo, bound: &NameSet, working: &mut NameSet) -> Option<Fusion> {
        if !a.complements(b) {
            return None;
        }

        let mut graph = PartitionGraph::new();
        for (x, y) in a.objects.iter().zip(b.objects.iter()) {
            graph.insert_edge(x, y);
        }

        let mut map: Vec<(Name, Name)> = vec![];
        let mut fresh = NameSet::new();
        for partition in graph.partitions() {
            let mut free = partition.iter().filter(|x| !bound.contains(*x));
            let representative = match (free.next(), free.next()) {
                (Some(_), Some(_)) => {
                    trace!(%a, %b, ?partition, "fusion would identify free names");
                    return None;
                }
                (Some(r), None) => r.clone(),
                (None, _) => {
                    let r = mint(working, "u");
                    fresh.insert(r.clone());
                    r
                }
            };
            map.extend(
                partition
                    .into_iter()
                    .filter(|x| *x != representative)
                    .map(|x| (x, representative.clone())),
            );
        }

        trace!(%a, %b, ?map, ?fresh, "built fusion");
        Some(Fusion {
            sigma: Substitution::sigma(map),
            fresh,
        })
    }
}
