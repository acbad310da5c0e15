//! Name-for-name rewriting of terms.
use ahash::HashMap;

use crate::{Agent, Name, NameSet, Solo};

///A map from names to names applied over a whole term.
///
///An *alpha* substitution renames binders along with their occurrences. A *sigma* substitution
///fuses names: the binders of its domain disappear and every occurrence becomes the
///representative.
///
///Only occurrences held by exactly one active binder are rewritten, so a substitution never
///reaches through an inner rebinding of the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    map: HashMap<Name, Name>,
    fuse: bool,
}

impl Substitution {
    pub fn alpha(map: impl IntoIterator<Item = (Name, Name)>) -> Self {
        Substitution {
            map: map.into_iter().collect(),
            fuse: false,
        }
    }

    ///# Panics
    ///Panics if a name is both a key and a value of the map: fusing into a name that is itself
    ///fused away is a defect of the caller.
    pub fn sigma(map: impl IntoIterator<Item = (Name, Name)>) -> Self {
        let map: HashMap<Name, Name> = map.into_iter().collect();
        assert!(
            map.values().all(|x| !map.contains_key(x)),
            "the range of a sigma substitution must not meet its domain"
        );
        Substitution { map, fuse: true }
    }

    #[must_use]
    pub fn is_fusion(&self) -> bool {
        self.fuse
    }

    #[must_use]
    pub fn get(&self, name: &Name) -> Option<&Name> {
        self.map.get(name)
    }

    #[must_use]
    pub fn domain(&self) -> NameSet {
        self.map.keys().cloned().collect()
    }

    #[must_use]
    pub fn range(&self) -> NameSet {
        self.map.values().cloned().collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[must_use]
    pub fn apply(&self, agent: &Agent) -> Agent {
        let mut in_scope = HashMap::default();
        self.apply_under(agent, &mut in_scope)
    }

    fn lookup(&self, name: &Name, in_scope: &HashMap<Name, usize>) -> Name {
        match (self.map.get(name), in_scope.get(name)) {
            (Some(image), Some(1)) => image.clone(),
            _ => name.clone(),
        }
    }

    fn apply_under(&self, agent: &Agent, in_scope: &mut HashMap<Name, usize>) -> Agent {
        match agent {
            Agent::Solo(solo) => Agent::Solo(self.apply_solo(solo, in_scope)),
            Agent::Inaction => Agent::Inaction,
            Agent::Composition(children) => Agent::Composition(
                children
                    .iter()
                    .map(|x| self.apply_under(x, in_scope))
                    .collect(),
            ),
            Agent::Scope { child, scope } => {
                for name in scope {
                    *in_scope.entry(name.clone()).or_insert(0) += 1;
                }

                let new_scope = scope
                    .iter()
                    .filter_map(|name| match (self.fuse, in_scope.get(name)) {
                        (true, Some(1)) if self.map.contains_key(name) => None,
                        (true, _) => Some(name.clone()),
                        (false, _) => Some(self.lookup(name, in_scope)),
                    })
                    .collect();
                let child = self.apply_under(child, in_scope);

                for name in scope {
                    if let Some(n) = in_scope.get_mut(name) {
                        *n -= 1;
                    }
                }
                Agent::Scope {
                    child: Box::new(child),
                    scope: new_scope,
                }
            }
            Agent::Replication(child) => {
                Agent::Replication(Box::new(self.apply_under(child, in_scope)))
            }
        }
    }

    fn apply_solo(&self, solo: &Solo, in_scope: &HashMap<Name, usize>) -> Solo {
        solo.rename(|x| self.lookup(x, in_scope))
    }
}
