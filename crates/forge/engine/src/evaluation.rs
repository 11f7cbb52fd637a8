//! Fitness evaluation: prompt -> generated artifact -> harness run -> score.

use crate::candidate::Candidate;
use futures::future::join_all;
use promptforge_diagnostics::{ScoreReport, Scorer};
use promptforge_oracle::{extract_code_block, GenerationOracle, TestHarness};
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of assessing a single prompt.
#[derive(Debug)]
struct Assessment {
    artifact: Option<String>,
    report: Option<ScoreReport>,
    oracle_failures: usize,
}

/// Drives candidates through the generation oracle, the harness and the scorer.
pub struct Evaluator {
    oracle: Arc<dyn GenerationOracle>,
    harness: Arc<dyn TestHarness>,
    scorer: Scorer,
    extract_code: bool,
    concurrency: usize,
}

impl Evaluator {
    pub fn new(
        oracle: Arc<dyn GenerationOracle>,
        harness: Arc<dyn TestHarness>,
        scorer: Scorer,
    ) -> Self {
        Self {
            oracle,
            harness,
            scorer,
            extract_code: true,
            concurrency: 1,
        }
    }

    pub fn with_code_extraction(mut self, enabled: bool) -> Self {
        self.extract_code = enabled;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    async fn assess(&self, prompt: &str) -> Assessment {
        let reply = match self.oracle.complete(prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(model = self.oracle.model_id(), error = %e, "code generation failed");
                return Assessment {
                    artifact: None,
                    report: None,
                    oracle_failures: 1,
                };
            }
        };

        let artifact = if self.extract_code {
            extract_code_block(&reply)
        } else {
            reply
        };
        if artifact.trim().is_empty() {
            warn!("code generation returned an empty artifact");
            return Assessment {
                artifact: None,
                report: None,
                oracle_failures: 1,
            };
        }

        let outcome = self.harness.run(&artifact).await;
        let oracle_failures = usize::from(outcome.is_err());
        let report = self
            .scorer
            .score_outcome(outcome.as_ref().map(|output| output.stream()).as_deref());

        Assessment {
            artifact: Some(artifact),
            report: Some(report),
            oracle_failures,
        }
    }

    /// Evaluate one candidate, unless it already carries an evaluation.
    pub async fn evaluate(&self, candidate: &mut Candidate) -> usize {
        self.evaluate_batch(std::slice::from_mut(candidate)).await
    }

    /// Evaluate every unevaluated candidate; at most `concurrency` at a time.
    ///
    /// Returns the number of oracle failures, which only ever degrade fitness.
    pub async fn evaluate_batch(&self, candidates: &mut [Candidate]) -> usize {
        let mut pending: Vec<&mut Candidate> =
            candidates.iter_mut().filter(|c| !c.is_evaluated()).collect();
        let mut failures = 0;

        for chunk in pending.chunks_mut(self.concurrency) {
            let prompts: Vec<String> = chunk.iter().map(|c| c.prompt.clone()).collect();
            let assessments = join_all(prompts.iter().map(|p| self.assess(p))).await;

            for (candidate, assessment) in chunk.iter_mut().zip(assessments) {
                failures += assessment.oracle_failures;
                candidate.apply_evaluation(assessment.artifact, assessment.report);
                debug!(candidate = %candidate.id, fitness = candidate.fitness, "evaluated");
            }
        }

        failures
    }
}
