//! Leaf-path analysis (SPEC_FULL.md §4.4): for every value rule, precompute
//! which of its direct value-reference targets lie on some route to a leaf
//! alternative, so the generator can force termination once `LEAF_TRIGGER`
//! is exceeded without needing to re-walk the whole rule graph each time.

use crate::symtab::{RuleArena, ValueId};
use std::collections::{HashMap, HashSet, VecDeque};

/// Populate `path_idents` and `leaf_path` on every value rule in `arena`.
///
/// Built by a reverse traversal: `reverse_xref[target]` lists every rule
/// that references `target`, then for each rule `L` with at least one leaf
/// alternative we walk backward through `reverse_xref`, marking the
/// immediate next hop on the route to `L` on every rule we pass through. The
/// next hop is recorded on *every* predecessor edge visited, even if that
/// predecessor was already recorded via another edge — a rule can have more
/// than one alternative that leads toward the same leaf. A per-walk visited
/// set (reset for each leaf `L`) only gates which rules get re-enqueued for
/// further backward expansion, the cycle protection SPEC_FULL.md calls for;
/// it must not gate which edges get recorded.
pub fn analyze_leaf_paths(arena: &mut RuleArena) {
    let mut reverse_xref: HashMap<ValueId, Vec<ValueId>> = HashMap::new();
    for (id, rule) in arena.values.iter_enumerated() {
        for target in rule.value_xref.values() {
            reverse_xref.entry(*target).or_default().push(id);
        }
    }

    let leaf_ids: Vec<ValueId> =
        arena.values.iter_enumerated().filter(|(_, r)| !r.rule.leaf.is_empty()).map(|(id, _)| id).collect();

    for leaf_id in leaf_ids {
        let mut visited: HashSet<ValueId> = HashSet::new();
        visited.insert(leaf_id);
        let mut queue: VecDeque<(ValueId, u32)> = VecDeque::new();
        queue.push_back((leaf_id, 0));
        while let Some((current, depth)) = queue.pop_front() {
            let Some(preds) = reverse_xref.get(&current) else { continue };
            for &pred in preds {
                let rule = &mut arena.values[pred];
                rule.path_idents.insert(current);
                rule.leaf_path.push((leaf_id, current, depth + 1));
                if visited.insert(pred) {
                    queue.push_back((pred, depth + 1));
                }
            }
        }
    }
}
