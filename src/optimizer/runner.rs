use crate::config::Config;
use crate::optimizer::{mutation, StepState};
use crate::registry::Registry;
use crate::scorer::Scorer;
use std::time::{Duration, Instant};
use tracing::debug;

pub struct SearchOptions {
    pub max_steps: Option<u64>,
    pub max_time: Option<Duration>,
    pub seed: Option<u64>,
    pub max_perturbation: f32,
}

impl From<&Config> for SearchOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            max_steps: cfg.search.max_steps,
            max_time: None, // Set manually if needed
            seed: None,     // Set manually if needed
            max_perturbation: cfg.search.max_perturbation,
        }
    }
}

/// A trait for receiving committed steps during the search.
/// Boolean return value indicates if the search should continue (true) or abort (false).
pub trait ProgressSink {
    fn on_commit(&mut self, step: u64, mean: f32) -> bool;
}

impl<F: FnMut(u64, f32) -> bool> ProgressSink for F {
    fn on_commit(&mut self, step: u64, mean: f32) -> bool {
        self(step, mean)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchSummary {
    pub steps: u64,
    pub committed: u64,
    pub rolled_back: u64,
    pub mean_score: f32,
}

/// Plateau-tolerant hill climb over the registry.
///
/// Each step proposes one reversible edit (effect perturbations on even
/// steps, membership toggles on odd steps), recomputes the global mean and
/// keeps the edit unless the mean dropped below the last accepted one, in
/// which case the edit is undone. Equal means commit, so the search can walk
/// plateaus. The accepted mean starts at 0 and never decreases.
pub struct SearchLoop {
    pub registry: Registry,
    pub scorer: Scorer,
    options: SearchOptions,
    state: StepState,
    last_accepted_mean: f32,
    steps_taken: u64,
    rng: fastrand::Rng,
}

impl SearchLoop {
    pub fn new(registry: Registry, scorer: Scorer, options: SearchOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self {
            registry,
            scorer,
            options,
            state: StepState::Idle,
            last_accepted_mean: 0.0,
            steps_taken: 0,
            rng,
        }
    }

    pub fn state(&self) -> StepState {
        self.state
    }

    pub fn last_accepted_mean(&self) -> f32 {
        self.last_accepted_mean
    }

    /// Runs one mutate/evaluate/accept-or-rollback cycle and reports how it
    /// ended. Alternates the two edit kinds, starting with an effect
    /// perturbation.
    pub fn step(&mut self) -> StepState {
        self.state = StepState::Proposing;
        let change = if self.steps_taken % 2 == 0 {
            mutation::permute_descriptors(
                &mut self.rng,
                &mut self.registry,
                &mut self.scorer,
                self.options.max_perturbation,
            )
        } else {
            mutation::permute_counties(&mut self.rng, &mut self.registry, &mut self.scorer)
        };
        self.steps_taken += 1;

        self.state = StepState::Evaluating;
        let mean = self.scorer.mean_score();
        if mean < self.last_accepted_mean {
            change.undo(&mut self.registry, &mut self.scorer);
            self.state = StepState::RolledBack;
        } else {
            self.last_accepted_mean = mean;
            self.state = StepState::Committed;
        }
        self.state
    }

    /// Drives steps until a stop condition: the step budget, the time budget,
    /// or the sink returning false. Every committed step is reported to the
    /// sink; rolled back steps are not. Returns with the loop back in `Idle`.
    pub fn run<S: ProgressSink>(&mut self, sink: &mut S) -> SearchSummary {
        self.scorer.rescore_all(&self.registry);

        let start = Instant::now();
        let mut steps = 0u64;
        let mut committed = 0u64;
        let mut rolled_back = 0u64;

        loop {
            if let Some(limit) = self.options.max_steps {
                if steps >= limit {
                    break;
                }
            }
            if let Some(limit) = self.options.max_time {
                if start.elapsed() >= limit {
                    break;
                }
            }

            let outcome = self.step();
            steps += 1;
            match outcome {
                StepState::Committed => {
                    committed += 1;
                    if !sink.on_commit(steps, self.last_accepted_mean) {
                        debug!("search aborted by sink at step {}", steps);
                        break;
                    }
                }
                StepState::RolledBack => rolled_back += 1,
                _ => {}
            }
        }

        self.state = StepState::Idle;
        SearchSummary {
            steps,
            committed,
            rolled_back,
            mean_score: self.scorer.mean_score(),
        }
    }
}
