use gridhmm_core::{BeliefTrace, Position, Scenario};
use serde::Serialize;

use crate::error::SimError;

/// How the filter's belief compared to the true position at one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepEstimate {
    pub step: usize,
    pub estimate: Position,
    pub estimate_probability: f64,
    pub truth: Position,
    pub truth_probability: f64,
    pub hit: bool,
}

/// Per-step comparison of a belief trace against a scenario's ground truth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingReport {
    pub steps: Vec<StepEstimate>,
}

impl TrackingReport {
    /// Pair every snapshot with the ground-truth position of the same step.
    /// Step 0 is the prior, so it is skipped.
    pub fn new(trace: &BeliefTrace, scenario: &Scenario) -> Result<Self, SimError> {
        let positions = scenario.positions();
        if trace.len() != positions.len() {
            return Err(SimError::TraceLength {
                snapshots: trace.len(),
                positions: positions.len(),
            });
        }

        let mut steps = Vec::with_capacity(trace.steps());
        for (step, (belief, truth)) in trace.iter().zip(positions).enumerate().skip(1) {
            let Some((estimate, estimate_probability)) = belief.most_likely() else {
                continue;
            };
            let truth_probability = belief.probability_at(*truth)?;
            steps.push(StepEstimate {
                step,
                estimate,
                estimate_probability,
                truth: *truth,
                truth_probability,
                hit: estimate == *truth,
            });
        }

        Ok(Self { steps })
    }

    /// Fraction of steps where the most likely cell was the true one.
    pub fn hit_rate(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        let hits = self.steps.iter().filter(|s| s.hit).count();
        hits as f64 / self.steps.len() as f64
    }

    /// Mean probability the filter assigned to the true cell.
    pub fn mean_truth_probability(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.steps.iter().map(|s| s.truth_probability).sum();
        sum / self.steps.len() as f64
    }
}
