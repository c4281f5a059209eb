// ABOUTME: Thread-safe accumulation of per-case outcomes into suite statistics.
// ABOUTME: Totals are declared up front so unfinished cases count as failures.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::catalog::FixtureCase;
use super::report::{AggregateReport, ProjectRecord};
use crate::pipeline::ExecutionOutcome;
use crate::types::EcosystemId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcosystemTally {
    pub passed: usize,
    pub total: usize,
}

impl EcosystemTally {
    pub fn is_green(&self) -> bool {
        self.passed == self.total
    }

    pub fn failed(&self) -> usize {
        self.total - self.passed
    }
}

#[derive(Default)]
struct Tallies {
    per_ecosystem: BTreeMap<EcosystemId, EcosystemTally>,
    per_project: BTreeMap<String, ProjectRecord>,
}

/// Collects outcomes from concurrently running cases.
pub struct Aggregator {
    inner: Mutex<Tallies>,
}

impl Aggregator {
    /// Declare every case that will run; each ecosystem's total is fixed here.
    pub fn new<'a>(cases: impl IntoIterator<Item = &'a FixtureCase>) -> Self {
        let mut tallies = Tallies::default();
        for case in cases {
            tallies
                .per_ecosystem
                .entry(case.ecosystem.clone())
                .or_default()
                .total += 1;
        }
        Self {
            inner: Mutex::new(tallies),
        }
    }

    /// Record the outcome of a declared case. Re-recording a case replaces
    /// its previous outcome.
    pub fn record(&self, case: &FixtureCase, outcome: ExecutionOutcome) {
        let mut tallies = self.inner.lock();
        if !tallies.per_ecosystem.contains_key(&case.ecosystem) {
            tracing::warn!(case = %case.id, "Ignoring outcome of undeclared ecosystem");
            return;
        }

        let succeeded = outcome.succeeded;
        let previous = tallies.per_project.insert(
            case.id.clone(),
            ProjectRecord {
                ecosystem: case.ecosystem.clone(),
                outcome,
            },
        );

        if let Some(previous) = previous
            && previous.outcome.succeeded
            && let Some(tally) = tallies.per_ecosystem.get_mut(&previous.ecosystem)
        {
            tally.passed = tally.passed.saturating_sub(1);
        }
        if succeeded && let Some(tally) = tallies.per_ecosystem.get_mut(&case.ecosystem) {
            tally.passed = (tally.passed + 1).min(tally.total);
        }
    }

    pub fn tally(&self, ecosystem: &EcosystemId) -> Option<EcosystemTally> {
        self.inner.lock().per_ecosystem.get(ecosystem).copied()
    }

    pub fn recorded(&self) -> usize {
        self.inner.lock().per_project.len()
    }

    /// Report of everything recorded so far.
    pub fn snapshot(&self) -> AggregateReport {
        let tallies = self.inner.lock();
        AggregateReport::new(tallies.per_ecosystem.clone(), tallies.per_project.clone())
    }

    pub fn finish(self) -> AggregateReport {
        let tallies = self.inner.into_inner();
        AggregateReport::new(tallies.per_ecosystem, tallies.per_project)
    }
}
