use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::RandomizerConfig;
use super::validation::jitter_in_range;
use crate::error::{GradeError, Result};
use crate::grading::{Component, Score, StudentRecord};
use crate::transmutation::TransmutationTable;

/// How a successful `randomize` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The record now transmutes to the target. `iterations` is 0 when it
    /// already did and nothing was touched.
    Converged { iterations: u64 },
    /// The record was above the average ceiling and left alone.
    Skipped { transmuted: u32 },
}

/// What happens to one score position on each draw.
#[derive(Debug, Clone, Copy)]
enum Slot {
    Fixed(Score),
    Free(u32),
}

/// Rejection-sampling search for scores that reproduce a transmuted grade.
pub struct Randomizer<'t> {
    table: &'t TransmutationTable,
    config: RandomizerConfig,
    rng: StdRng,
}

impl<'t> Randomizer<'t> {
    pub fn new(table: &'t TransmutationTable, config: RandomizerConfig) -> Self {
        Self {
            table,
            config,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Redraw `record`'s free scores until it transmutes to `target`.
    ///
    /// `reference` supplies, per component and position, the maximum score a
    /// draw may take. On any error the record's scores are exactly what they
    /// were before the call.
    pub fn randomize(
        &mut self,
        record: &mut StudentRecord,
        target: u32,
        reference: &[Component],
    ) -> Result<Outcome> {
        let jitter = self.config.jitter_factor();
        if !jitter_in_range(jitter) {
            return Err(GradeError::InvalidThreshold(jitter));
        }

        let plans = self.plan(record, reference)?;

        let current = record.transmuted_average(self.table)?;
        if current > self.config.average_ceiling() {
            tracing::debug!(
                student = record.name().unwrap_or("(unnamed)"),
                current,
                ceiling = self.config.average_ceiling(),
                "skipping student above average ceiling"
            );
            return Ok(Outcome::Skipped { transmuted: current });
        }
        if current == target {
            return Ok(Outcome::Converged { iterations: 0 });
        }

        let snapshot = record.snapshot();
        let result = self.search(record, target, &plans, jitter);
        if result.is_err() {
            record.restore(snapshot);
        }

        match &result {
            Ok(Outcome::Converged { iterations }) => tracing::debug!(
                student = record.name().unwrap_or("(unnamed)"),
                target,
                iterations,
                "randomizer converged"
            ),
            Err(e) => tracing::warn!(
                student = record.name().unwrap_or("(unnamed)"),
                target,
                error = %e,
                "randomizer rolled back"
            ),
            Ok(Outcome::Skipped { .. }) => {}
        }

        result
    }

    /// Run `randomize` once per `(record, target)` pair, in order. A failure
    /// for one record does not stop the others.
    pub fn randomize_all<'r, I>(&mut self, jobs: I, reference: &[Component]) -> Vec<Result<Outcome>>
    where
        I: IntoIterator<Item = (&'r mut StudentRecord, u32)>,
    {
        jobs.into_iter()
            .map(|(record, target)| self.randomize(record, target, reference))
            .collect()
    }

    /// Decide which positions are fixed and which are drawn, and check that
    /// the reference fits the record.
    fn plan(&self, record: &StudentRecord, reference: &[Component]) -> Result<Vec<Vec<Slot>>> {
        let components = record.components();
        if components.len() != reference.len() {
            return Err(GradeError::ReferenceMismatch(format!(
                "record has {} components, reference has {}",
                components.len(),
                reference.len()
            )));
        }

        let overwrite_all = self.config.overwrite_all();
        let mut plans = Vec::with_capacity(components.len());

        for (i, (component, head)) in components.iter().zip(reference).enumerate() {
            if head.sum_scores() > u64::from(component.highest_total_score()) {
                return Err(GradeError::ReferenceMismatch(format!(
                    "component {}: reference maximum {} exceeds highest total score {}",
                    i,
                    head.sum_scores(),
                    component.highest_total_score()
                )));
            }

            let plan = if overwrite_all {
                head.scores()
                    .iter()
                    .map(|ceiling| match ceiling {
                        Score::Present(max) => Slot::Free(*max),
                        Score::Missing => Slot::Fixed(Score::Missing),
                    })
                    .collect()
            } else {
                if component.scores().len() != head.scores().len() {
                    return Err(GradeError::ReferenceMismatch(format!(
                        "component {}: {} scores, reference has {}",
                        i,
                        component.scores().len(),
                        head.scores().len()
                    )));
                }
                component
                    .scores()
                    .iter()
                    .zip(head.scores())
                    .map(|(existing, ceiling)| match (existing, ceiling) {
                        (Score::Missing, Score::Present(max)) => Slot::Free(*max),
                        (existing, _) => Slot::Fixed(*existing),
                    })
                    .collect()
            };
            plans.push(plan);
        }

        Ok(plans)
    }

    fn search(
        &mut self,
        record: &mut StudentRecord,
        target: u32,
        plans: &[Vec<Slot>],
        jitter: f64,
    ) -> Result<Outcome> {
        let max_iterations = self.config.max_iterations();

        'draw: for iteration in 1..=max_iterations {
            for (component, plan) in record.components_mut().iter_mut().zip(plans) {
                let scores: Vec<Score> = plan
                    .iter()
                    .map(|slot| match slot {
                        Slot::Fixed(score) => *score,
                        Slot::Free(max) => Score::Present(draw(&mut self.rng, *max, jitter)),
                    })
                    .collect();

                // Over the component's ceiling: reject the whole draw.
                if !component.accepts(&scores) {
                    continue 'draw;
                }
                component.replace_scores(scores);
            }

            if record.transmuted_average(self.table)? == target {
                return Ok(Outcome::Converged { iterations: iteration });
            }
        }

        Err(GradeError::MaxIterationsExceeded(max_iterations))
    }
}

/// Uniform integer in `[round(jitter * max) - max, max]`.
fn draw<R: Rng>(rng: &mut R, max: u32, jitter: f64) -> u32 {
    let max_f = f64::from(max);
    let low = ((jitter * max_f).round() - max_f).clamp(0.0, max_f) as u32;
    rng.random_range(low..=max)
}
