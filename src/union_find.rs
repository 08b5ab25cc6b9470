//! Disjoint-set forest over flat cell indices.
//!
//! Each set is a tree identified by its root, the element with
//! `parent[root] == root`. `find` applies path halving (every visited node is
//! redirected to its grandparent) and `union` hangs the smaller tree under the
//! larger, which together give O(α(n)) amortized cost per operation.
//!
//! ```text
//! Before union(A, B):     After (|B| >= |A|):
//!   A    B                    B
//!  / \   |                  / | \
//! 1   2  3                 A  3  ...
//!                         / \
//!                        1   2
//! ```

#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    /// `n` singleton sets `{0}, {1}, ..., {n-1}`.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Root of the set containing `i`.
    pub fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            let grandparent = self.parent[self.parent[i]];
            self.parent[i] = grandparent;
            i = grandparent;
        }
        i
    }

    /// Merge the sets containing `u` and `v`.
    ///
    /// Returns `false` if they were already the same set.
    pub fn union(&mut self, u: usize, v: usize) -> bool {
        let ru = self.find(u);
        let rv = self.find(v);
        if ru == rv {
            return false;
        }
        let (small, large) = if self.size[ru] < self.size[rv] {
            (ru, rv)
        } else {
            (rv, ru)
        };
        self.parent[small] = large;
        self.size[large] += self.size[small];
        true
    }

    /// Whether `u` and `v` are in the same set.
    pub fn connected(&mut self, u: usize, v: usize) -> bool {
        self.find(u) == self.find(v)
    }

    /// Number of elements in the set containing `i`.
    pub fn set_size(&mut self, i: usize) -> usize {
        let r = self.find(i);
        self.size[r]
    }
}
