/// Disjoint sets over flat block indices, union by size with path halving.
pub struct UnionFind {
    parent: Vec<u32>,
    size: Vec<u32>,
}

impl UnionFind {
    /// Create `n` singleton sets.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n as u32).collect(),
            size: vec![1; n],
        }
    }

    /// Representative of the set containing `id`.
    pub fn find(&mut self, mut id: u32) -> u32 {
        while self.parent[id as usize] != id {
            let grandparent = self.parent[self.parent[id as usize] as usize];
            self.parent[id as usize] = grandparent;
            id = grandparent;
        }
        id
    }

    /// Join the sets containing `a` and `b` and return the new representative.
    ///
    /// The larger set's root wins; on a tie the root of `a` wins.
    pub fn union(&mut self, a: u32, b: u32) -> u32 {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return ra;
        }
        let (root, child) = if self.size[ra as usize] >= self.size[rb as usize] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[child as usize] = root;
        self.size[root as usize] += self.size[child as usize];
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_as_singletons() {
        let mut uf = UnionFind::new(4);
        for i in 0..4 {
            assert_eq!(uf.find(i), i);
        }
    }

    #[test]
    fn union_joins_sets() {
        let mut uf = UnionFind::new(6);
        uf.union(0, 1);
        uf.union(1, 2);
        assert_eq!(uf.find(0), uf.find(2));
        assert_ne!(uf.find(0), uf.find(3));
        assert_eq!(uf.find(5), 5);
    }

    #[test]
    fn larger_set_root_survives() {
        let mut uf = UnionFind::new(8);
        uf.union(4, 5);
        uf.union(4, 6);
        let big = uf.find(4);
        assert_eq!(uf.union(0, 6), big);
        assert_eq!(uf.find(0), big);
    }

    #[test]
    fn tie_keeps_first_root() {
        let mut uf = UnionFind::new(2);
        assert_eq!(uf.union(1, 0), 1);
    }

    #[test]
    fn repeated_union_is_idempotent() {
        let mut uf = UnionFind::new(3);
        let r = uf.union(0, 1);
        assert_eq!(uf.union(1, 0), r);
        assert_eq!(uf.find(0), r);
        assert_eq!(uf.find(2), 2);
    }

    #[test]
    fn long_chain_resolves_to_one_root() {
        let mut uf = UnionFind::new(64);
        for i in 1..64 {
            uf.union(i - 1, i);
        }
        let r = uf.find(0);
        assert!((0..64).all(|i| uf.find(i) == r));
        // A singleton joined to the chain never becomes its root.
        let mut uf2 = UnionFind::new(65);
        for i in 1..64 {
            uf2.union(i - 1, i);
        }
        let chain = uf2.find(0);
        assert_eq!(uf2.union(64, 0), chain);
    }
}
