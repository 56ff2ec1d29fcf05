use super::connected::Component;
use super::mask::CandidateMask;
use crate::config::ClusterParams;
use crate::region::Region;

/// A pixel-space box with the scan key of the earliest component inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub region: Region,
    pub key: u32,
}

/// Convert a component's block box to pixels, clipped to the image.
pub fn component_region(c: &Component, block_size: u32, width: u32, height: u32) -> Region {
    Region {
        x_start: c.bx0 * block_size,
        x_end: (c.bx1 + 1).saturating_mul(block_size).min(width),
        y_start: c.by0 * block_size,
        y_end: (c.by1 + 1).saturating_mul(block_size).min(height),
    }
}

/// Union every pair of boxes that come within `margin` of each other until
/// no pair is left to merge. The result is pairwise disjoint.
pub fn merge_candidates(mut boxes: Vec<Candidate>, margin: u32) -> Vec<Candidate> {
    let mut changed = true;
    while changed {
        changed = false;
        let mut i = 0;
        while i < boxes.len() {
            let mut j = i + 1;
            while j < boxes.len() {
                if boxes[i].region.near(&boxes[j].region, margin) {
                    let absorbed = boxes.swap_remove(j);
                    boxes[i].region = boxes[i].region.union(&absorbed.region);
                    boxes[i].key = boxes[i].key.min(absorbed.key);
                    changed = true;
                    // Don't increment j, check the swapped-in element
                } else {
                    j += 1;
                }
            }
            i += 1;
        }
    }
    boxes
}

/// Size, aspect, density, and run-length checks for one merged box.
pub fn passes_filters(region: &Region, mask: &CandidateMask, params: &ClusterParams) -> bool {
    if region.width() < params.min_width || region.height() < params.min_height {
        return false;
    }
    let aspect = region.aspect();
    if aspect < params.min_aspect || aspect > params.max_aspect {
        return false;
    }

    let bs = params.block_size;
    let bx0 = region.x_start / bs;
    let by0 = region.y_start / bs;
    let bx1 = (region.x_end - 1) / bs;
    let by1 = (region.y_end - 1) / bs;
    let total = (bx1 - bx0 + 1) as f32 * (by1 - by0 + 1) as f32;
    let density = mask.count_in(bx0, by0, bx1, by1) as f32 / total;
    if density < params.min_density {
        return false;
    }

    mask.longest_run_in(bx0, by0, bx1, by1) >= params.min_run_blocks
}

/// Turn labeled components into the final, disjoint, ordered region list.
pub fn cluster_regions(
    mask: &CandidateMask,
    components: &[Component],
    width: u32,
    height: u32,
    params: &ClusterParams,
) -> Vec<Region> {
    let boxes: Vec<Candidate> = components
        .iter()
        .map(|c| Candidate {
            region: component_region(c, params.block_size, width, height),
            key: c.first_block,
        })
        .collect();

    let mut merged = merge_candidates(boxes, params.merge_margin);
    merged.retain(|c| passes_filters(&c.region, mask, params));
    merged.sort_by_key(|c| c.key);
    merged.into_iter().map(|c| c.region).collect()
}
