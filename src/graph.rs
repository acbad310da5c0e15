use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::{Name, NameSet};

///An undirected graph over names, used to group the names a fusion has to identify.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionGraph(BTreeMap<Name, NameSet>);

struct SpanIterator<'a> {
    graph: &'a PartitionGraph,
    queue: VecDeque<&'a Name>,
    visited: BTreeSet<&'a Name>,
}

impl<'a> Iterator for SpanIterator<'a> {
    type Item = &'a Name;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        for neighbour in self.graph.0.get(node).into_iter().flatten() {
            if self.visited.insert(neighbour) {
                self.queue.push_back(neighbour);
            }
        }
        Some(node)
    }
}

impl PartitionGraph {
    #[must_use]
    pub fn new() -> Self {
        PartitionGraph::default()
    }

    ///Adds `a` and `b` if absent and links them. `a == b` only adds the node.
    pub fn insert_edge(&mut self, a: &Name, b: &Name) {
        let neighbours = self.0.entry(a.clone()).or_default();
        if a != b {
            neighbours.insert(b.clone());
        }
        let neighbours = self.0.entry(b.clone()).or_default();
        if a != b {
            neighbours.insert(a.clone());
        }
    }

    #[must_use]
    pub fn contains(&self, name: &Name) -> bool {
        self.0.contains_key(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn span_from<'a>(&'a self, node: &'a Name) -> SpanIterator<'a> {
        SpanIterator {
            graph: self,
            queue: VecDeque::from([node]),
            visited: BTreeSet::from([node]),
        }
    }

    ///The connected components of the graph. Found by a breadth first span from the smallest
    ///unvisited node, repeated until every node is covered.
    #[must_use]
    pub fn partitions(&self) -> BTreeSet<NameSet> {
        let mut unvisited: BTreeSet<&Name> = self.0.keys().collect();
        let mut partitions = BTreeSet::new();
        while let Some(node) = unvisited.pop_first() {
            let span: NameSet = self.span_from(node).cloned().collect();
            unvisited.retain(|x| !span.contains(*x));
            partitions.insert(span);
        }
        partitions
    }
}
