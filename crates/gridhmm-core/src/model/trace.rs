use std::{slice::Iter, vec::IntoIter};

use serde::Serialize;

use crate::model::belief::BeliefState;

/// Every belief snapshot of one filtering run, indexed by step.
/// Index 0 is the belief before any action; index `t` is the belief after `t` steps.
/// Snapshots are never rewritten, so stepping backwards is a lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BeliefTrace {
    snapshots: Vec<BeliefState>,
}

impl BeliefTrace {
    /// Create a trace that starts from `initial`.
    pub fn new(initial: BeliefState) -> Self {
        BeliefTrace {
            snapshots: vec![initial],
        }
    }

    pub(crate) fn push(&mut self, belief: BeliefState) -> usize {
        let step = self.snapshots.len();
        self.snapshots.push(belief);
        step
    }

    /// Belief after `step` updates.
    pub fn get(&self, step: usize) -> Option<&BeliefState> {
        self.snapshots.get(step)
    }

    /// The most recent snapshot.
    pub fn last(&self) -> Option<&BeliefState> {
        self.snapshots.last()
    }

    /// Number of snapshots, the prior included.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Number of filter updates recorded.
    pub fn steps(&self) -> usize {
        self.snapshots.len().saturating_sub(1)
    }

    pub fn iter(&self) -> Iter<'_, BeliefState> {
        self.snapshots.iter()
    }

    /// Serialize every snapshot as JSON for external viewers.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// - `for belief in trace` (moves snapshots out)
impl IntoIterator for BeliefTrace {
    type Item = BeliefState;
    type IntoIter = IntoIter<BeliefState>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.into_iter()
    }
}

/// - `for belief in &trace` (borrows snapshots)
impl<'a> IntoIterator for &'a BeliefTrace {
    type Item = &'a BeliefState;
    type IntoIter = Iter<'a, BeliefState>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.iter()
    }
}
