//! Dependency leveling for per-frame operation ordering.
//!
//! `level(n) = 0` for nodes without dependencies, else
//! `1 + max(level(dep))`. Nodes are emitted grouped by increasing level,
//! ties broken by declaration order, which guarantees every dependency is
//! processed before its dependents in the acyclic case.

use log::warn;

const UNVISITED: i32 = -1;
const IN_PROGRESS: i32 = -2;

/// Linearizes a dependency graph into a processing order.
///
/// Cycles are tolerated: revisiting a node that is still being leveled logs
/// a warning and contributes level 0, which breaks the cycle with a
/// deterministic (if unspecified) order instead of failing the load.
pub(crate) fn level_order(deps: &[Vec<usize>]) -> Vec<usize> {
    let mut levels = vec![UNVISITED; deps.len()];
    for index in 0..deps.len() {
        level_of(deps, index, &mut levels);
    }

    let max_level = levels.iter().copied().max().unwrap_or(0).max(0) as usize;
    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); max_level + 1];
    for (index, &level) in levels.iter().enumerate() {
        buckets[level as usize].push(index);
    }
    buckets.into_iter().flatten().collect()
}

fn level_of(deps: &[Vec<usize>], index: usize, levels: &mut [i32]) -> i32 {
    match levels[index] {
        IN_PROGRESS => {
            warn!("recursive dependency in parenting/constraints, results can be unpredictable");
            return 0;
        }
        UNVISITED => {}
        level => return level,
    }
    // trap the index for the recursive calls
    levels[index] = IN_PROGRESS;

    let mut level = 0;
    for &dep in &deps[index] {
        level = level.max(level_of(deps, dep, levels) + 1);
    }
    levels[index] = level;
    level
}

#[cfg(test)]
mod tests {
    use super::level_order;

    #[test]
    fn chain_orders_parents_first() {
        // 2 -> 1 -> 0, declared out of order
        let deps = vec![vec![1], vec![2], vec![]];
        assert_eq!(level_order(&deps), vec![2, 1, 0]);
    }

    #[test]
    fn ties_keep_declaration_order() {
        let deps = vec![vec![], vec![0], vec![], vec![0]];
        assert_eq!(level_order(&deps), vec![0, 2, 1, 3]);
    }

    #[test]
    fn cycle_does_not_hang_or_panic() {
        let deps = vec![vec![1], vec![0]];
        let order = level_order(&deps);
        assert_eq!(order.len(), 2);
    }

    #[test]
    fn empty_graph() {
        assert!(level_order(&[]).is_empty());
    }
}
