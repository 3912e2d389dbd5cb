use crate::error::StoreError;
use crate::lifecycle;
use crate::logging::OpTimer;
use crate::store::DocumentStore;
use chrono::{DateTime, Duration, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Deactivate,
    Reap,
    Generate,
    ExpireCommunity,
}

impl Stage {
    /// Stages in the order a refresh runs them.
    pub const ORDER: [Stage; 4] = [
        Stage::Deactivate,
        Stage::Reap,
        Stage::Generate,
        Stage::ExpireCommunity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Deactivate => "deactivate",
            Stage::Reap => "reap",
            Stage::Generate => "generate",
            Stage::ExpireCommunity => "expire_community",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug)]
pub struct StageOutcome {
    pub stage: Stage,
    /// Documents written or deleted on success.
    pub result: Result<usize, StoreError>,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<StageOutcome>,
}

impl RunReport {
    pub fn failures(&self) -> impl Iterator<Item = &StageOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }

    #[cfg(test)]
    pub fn count(&self, stage: Stage) -> Option<usize> {
        self.outcomes
            .iter()
            .find(|o| o.stage == stage)
            .and_then(|o| o.result.as_ref().ok().copied())
    }
}

/// Runs the daily refresh: deactivate, reap, generate, expire. A failing
/// stage is logged and recorded, and the next stage runs anyway.
pub struct Refresher<'a> {
    store: &'a dyn DocumentStore,
    join_window: Duration,
}

impl<'a> Refresher<'a> {
    pub fn new(store: &'a dyn DocumentStore, join_window: Duration) -> Self {
        Self { store, join_window }
    }

    pub fn run(&self, now: DateTime<Utc>) -> RunReport {
        let mut report = RunReport::default();
        for stage in Stage::ORDER {
            let timer = OpTimer::new(stage.name());
            let result = self.run_stage(stage, now);
            timer.finish_with_result(result.as_ref());
            report.outcomes.push(StageOutcome { stage, result });
        }
        report
    }

    fn run_stage(&self, stage: Stage, now: DateTime<Utc>) -> Result<usize, StoreError> {
        match stage {
            Stage::Deactivate => lifecycle::deactivate_active(self.store),
            Stage::Reap => lifecycle::reap_inactive(self.store),
            Stage::Generate => lifecycle::generate_daily(self.store, now, self.join_window),
            Stage::ExpireCommunity => lifecycle::expire_community(self.store, now),
        }
    }
}
