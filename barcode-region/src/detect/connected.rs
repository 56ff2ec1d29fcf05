use super::mask::CandidateMask;
use super::unionfind::UnionFind;

const UNSET: u32 = u32::MAX;

/// An 8-connected group of candidate blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Row-major index of the first block reached by the scan.
    pub first_block: u32,
    /// Inclusive block bounding box.
    pub bx0: u32,
    pub by0: u32,
    pub bx1: u32,
    pub by1: u32,
}

/// Label the candidate blocks with 8-connectivity.
///
/// Components come back in the order their first block appears in a
/// row-major scan of the mask.
pub fn connected_components(mask: &CandidateMask) -> Vec<Component> {
    let w = mask.cols;
    let h = mask.rows;
    let mut uf = UnionFind::new((w * h) as usize);

    for y in 0..h {
        for x in 0..w {
            if !mask.get(x, y) {
                continue;
            }
            let id = y * w + x;

            if x > 0 && mask.get(x - 1, y) {
                uf.union(id, id - 1);
            }
            if y > 0 {
                if mask.get(x, y - 1) {
                    uf.union(id, id - w);
                }
                // Skewed bars may only touch at a corner.
                if x > 0 && mask.get(x - 1, y - 1) {
                    uf.union(id, id - w - 1);
                }
                if x + 1 < w && mask.get(x + 1, y - 1) {
                    uf.union(id, id - w + 1);
                }
            }
        }
    }

    let mut slot = vec![UNSET; (w * h) as usize];
    let mut components: Vec<Component> = Vec::new();

    for y in 0..h {
        for x in 0..w {
            if !mask.get(x, y) {
                continue;
            }
            let id = y * w + x;
            let root = uf.find(id) as usize;
            if slot[root] == UNSET {
                slot[root] = components.len() as u32;
                components.push(Component {
                    first_block: id,
                    bx0: x,
                    by0: y,
                    bx1: x,
                    by1: y,
                });
            }
            let c = &mut components[slot[root] as usize];
            c.bx0 = c.bx0.min(x);
            c.bx1 = c.bx1.max(x);
            c.by1 = c.by1.max(y);
        }
    }

    components
}
