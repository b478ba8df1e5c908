//! Batch partitioning.
//!
//! Signal components are levelled with Kahn's algorithm over their
//! writer -> reader edges; all C components form one batch and all Q
//! components another. Components of one batch touch disjoint slots, so a
//! batch can run in any order or in parallel.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use tlm_core::CompId;
use tlm_graph::{GraphError, Role};

/// Contiguous slice of the scheduled component order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Batch {
    pub role: Role,
    pub range: Range<usize>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schedule {
    /// Components in execution order.
    pub order: Vec<CompId>,
    pub batches: Vec<Batch>,
}

impl Schedule {
    /// Order components by role and signal dependencies.
    ///
    /// `components` lists every component with its role and name; `edges`
    /// are writer -> reader pairs between signal components.
    pub fn build(
        components: &[(CompId, Role, &str)],
        edges: &[(CompId, CompId)],
    ) -> Result<Self, GraphError> {
        let mut schedule = Schedule::default();

        for level in signal_levels(components, edges)? {
            schedule.push_batch(Role::Signal, level);
        }
        for role in [Role::C, Role::Q] {
            let mut batch: Vec<CompId> = components
                .iter()
                .filter(|(_, r, _)| *r == role)
                .map(|(id, ..)| *id)
                .collect();
            batch.sort();
            schedule.push_batch(role, batch);
        }
        Ok(schedule)
    }

    fn push_batch(&mut self, role: Role, ids: Vec<CompId>) {
        if ids.is_empty() {
            return;
        }
        let start = self.order.len();
        self.order.extend(ids);
        self.batches.push(Batch {
            role,
            range: start..self.order.len(),
        });
    }
}

/// Kahn levels of the signal components, each sorted by id.
fn signal_levels(
    components: &[(CompId, Role, &str)],
    edges: &[(CompId, CompId)],
) -> Result<Vec<Vec<CompId>>, GraphError> {
    let mut in_degree: BTreeMap<CompId, usize> = components
        .iter()
        .filter(|(_, r, _)| *r == Role::Signal)
        .map(|(id, ..)| (*id, 0))
        .collect();
    let mut successors: BTreeMap<CompId, Vec<CompId>> = BTreeMap::new();
    for (from, to) in edges {
        if from == to || !in_degree.contains_key(from) {
            continue;
        }
        if let Some(d) = in_degree.get_mut(to) {
            *d += 1;
            successors.entry(*from).or_default().push(*to);
        }
    }

    let mut levels = Vec::new();
    let mut ready: BTreeSet<CompId> = in_degree
        .iter()
        .filter(|(_, d)| **d == 0)
        .map(|(id, _)| *id)
        .collect();
    let mut placed = 0;
    while !ready.is_empty() {
        let level: Vec<CompId> = ready.iter().copied().collect();
        ready.clear();
        for id in &level {
            for next in successors.get(id).into_iter().flatten() {
                if let Some(d) = in_degree.get_mut(next) {
                    *d -= 1;
                    if *d == 0 {
                        ready.insert(*next);
                    }
                }
            }
        }
        placed += level.len();
        levels.push(level);
    }

    if placed < in_degree.len() {
        let placed_ids: BTreeSet<CompId> = levels.iter().flatten().copied().collect();
        let stuck = components
            .iter()
            .filter(|(id, r, _)| *r == Role::Signal && !placed_ids.contains(id))
            .map(|(_, _, name)| name.to_string())
            .collect();
        return Err(GraphError::AlgebraicLoop { components: stuck });
    }
    Ok(levels)
}
