use std::collections::BTreeMap;

///A collection where order is irrelevant but multiplicity is not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Multiset<T: Ord>(BTreeMap<T, usize>);

impl<T: Ord> Default for Multiset<T> {
    fn default() -> Self {
        Multiset(BTreeMap::new())
    }
}

impl<T: Ord> Multiset<T> {
    #[must_use]
    pub fn new() -> Self {
        Multiset::default()
    }

    pub fn insert(&mut self, item: T) {
        *self.0.entry(item).or_insert(0) += 1;
    }

    ///Removes one copy of `item`, returning whether there was one.
    pub fn remove(&mut self, item: &T) -> bool {
        match self.0.get_mut(item) {
            Some(1) => {
                self.0.remove(item);
                true
            }
            Some(n) => {
                *n -= 1;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.0.contains_key(item)
    }

    #[must_use]
    pub fn count(&self, item: &T) -> usize {
        self.0.get(item).copied().unwrap_or(0)
    }

    ///Total number of elements, counting multiplicity.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.values().sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    ///Every element, each repeated as often as it occurs, in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.0
            .iter()
            .flat_map(|(item, n)| std::iter::repeat_n(item, *n))
    }

    ///Distinct elements only.
    pub fn distinct(&self) -> impl Iterator<Item = &T> {
        self.0.keys()
    }

    #[must_use]
    pub fn map<U: Ord>(&self, f: impl Fn(&T) -> U) -> Multiset<U> {
        let mut out = Multiset::new();
        for (item, n) in &self.0 {
            *out.0.entry(f(item)).or_insert(0) += n;
        }
        out
    }
}

impl<T: Ord> FromIterator<T> for Multiset<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut out = Multiset::new();
        for item in iter {
            out.insert(item);
        }
        out
    }
}

impl<T: Ord> Extend<T> for Multiset<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

///Every ordering of `0..n` in lexicographic order. `n == 0` yields the empty ordering once.
#[derive(Debug, Clone)]
pub(crate) struct Permutations {
    indices: Vec<usize>,
    done: bool,
}

impl Permutations {
    pub(crate) fn new(n: usize) -> Self {
        Permutations {
            indices: (0..n).collect(),
            done: false,
        }
    }
}

impl Iterator for Permutations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let out = self.indices.clone();

        // find the rightmost ascent, swap it with the next larger suffix element, then reverse the suffix
        match (1..self.indices.len())
            .rev()
            .find(|&i| self.indices[i - 1] < self.indices[i])
        {
            None => self.done = true,
            Some(i) => {
                let pivot = i - 1;
                let swap = (i..self.indices.len())
                    .rev()
                    .find(|&j| self.indices[j] > self.indices[pivot])
                    .unwrap_or(i);
                self.indices.swap(pivot, swap);
                self.indices[i..].reverse();
            }
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiset_keeps_multiplicity() {
        let mut a: Multiset<&str> = ["p", "p", "q"].into_iter().collect();
        let b: Multiset<&str> = ["p", "q"].into_iter().collect();
        assert_ne!(a, b);
        assert_eq!(a.len(), 3);
        assert_eq!(a.count(&"p"), 2);
        assert!(a.remove(&"p"));
        assert_eq!(a, b);
        assert!(a.remove(&"q"));
        assert!(!a.remove(&"q"));
        assert!(!a.contains(&"q"));
        assert_eq!(a.iter().copied().collect::<Vec<_>>(), vec!["p"]);
    }

    #[test]
    fn multiset_map_merges() {
        let a: Multiset<u32> = [1, 2, 3].into_iter().collect();
        let b = a.map(|x| x % 2);
        assert_eq!(b.count(&1), 2);
        assert_eq!(b.count(&0), 1);
        assert_eq!(b.distinct().count(), 2);
    }

    #[test]
    fn permutations() {
        let p: Vec<_> = Permutations::new(3).collect();
        assert_eq!(
            p,
            vec![
                vec![0, 1, 2],
                vec![0, 2, 1],
                vec![1, 0, 2],
                vec![1, 2, 0],
                vec![2, 0, 1],
                vec![2, 1, 0]
            ]
        );
        assert_eq!(Permutations::new(0).collect::<Vec<_>>(), vec![Vec::<usize>::new()]);
        assert_eq!(Permutations::new(4).count(), 24);
    }
}
