//! Crossover and mutation, delegated to the generation oracle as opaque text
//! transforms. Offspring are always created unevaluated.

use crate::candidate::{Candidate, CandidateId, Origin};
use crate::config::VariationMode;
use crate::prompts::{parse_delimited, PromptTemplates, BEGIN_DELIMITER, END_DELIMITER};
use futures::future::join_all;
use promptforge_oracle::{GenerationOracle, OracleError};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Offspring of one variation step.
#[derive(Debug, Default)]
pub struct VariationOutcome {
    pub offspring: Vec<Candidate>,
    /// Oracle calls that failed or returned nothing usable.
    pub oracle_failures: usize,
}

impl VariationOutcome {
    /// No offspring at all: the caller keeps its population.
    pub fn failed(&self) -> bool {
        self.offspring.is_empty()
    }
}

/// Every unordered pair of distinct pool positions, in lexicographic order.
pub fn pairs(pool_len: usize) -> Vec<(usize, usize)> {
    (0..pool_len)
        .flat_map(|i| (i + 1..pool_len).map(move |j| (i, j)))
        .collect()
}

/// Pool members with repeats dropped, first occurrence kept.
///
/// Stochastic universal sampling may select one candidate more than once;
/// pairs are formed over distinct candidates only.
pub fn distinct_members(pool: &[Candidate]) -> Vec<&Candidate> {
    let mut seen: HashSet<CandidateId> = HashSet::with_capacity(pool.len());
    pool.iter().filter(|c| seen.insert(c.id)).collect()
}

pub struct Variation {
    oracle: Arc<dyn GenerationOracle>,
    templates: PromptTemplates,
    mutation_rate: f64,
    concurrency: usize,
}

impl Variation {
    pub fn new(
        oracle: Arc<dyn GenerationOracle>,
        templates: PromptTemplates,
        mutation_rate: f64,
    ) -> Self {
        Self {
            oracle,
            templates,
            mutation_rate,
            concurrency: 1,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub async fn vary(
        &self,
        mode: VariationMode,
        pool: &[Candidate],
        generation: u32,
    ) -> VariationOutcome {
        match mode {
            VariationMode::Pairwise => self.pairwise(pool, generation).await,
            VariationMode::Batched => self.batched(pool, generation).await,
        }
    }

    /// Mutate one prompt with the mutation instruction.
    pub async fn mutate(&self, prompt: &str) -> Result<String, OracleError> {
        let reply = self
            .oracle
            .complete(&self.templates.mutation(prompt, self.mutation_rate))
            .await?;
        non_empty(reply)
    }

    async fn crossover(&self, parent1: &str, parent2: &str) -> Result<String, OracleError> {
        let reply = self
            .oracle
            .complete(&self.templates.crossover(parent1, parent2))
            .await?;
        non_empty(reply)
    }

    /// Crossover then mutation for one pair; returns the child prompt and the
    /// number of failed oracle calls.
    async fn child(&self, parent1: &Candidate, parent2: &Candidate) -> (Option<String>, usize) {
        let crossed = match self.crossover(&parent1.prompt, &parent2.prompt).await {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!(
                    parent1 = %parent1.id,
                    parent2 = %parent2.id,
                    error = %e,
                    "crossover failed, dropping child"
                );
                return (None, 1);
            }
        };
        match self.mutate(&crossed).await {
            Ok(mutated) => (Some(mutated), 0),
            Err(e) => {
                warn!(error = %e, "mutation failed, keeping crossover prompt");
                (Some(crossed), 1)
            }
        }
    }

    /// One offspring per unordered pair of distinct pool members: C(n, 2)
    /// pairs for n distinct candidates.
    pub async fn pairwise(&self, pool: &[Candidate], generation: u32) -> VariationOutcome {
        let pool = distinct_members(pool);
        let pairs = pairs(pool.len());
        let mut outcome = VariationOutcome::default();

        for chunk in pairs.chunks(self.concurrency) {
            let results =
                join_all(chunk.iter().map(|&(i, j)| self.child(pool[i], pool[j]))).await;
            for (&(i, j), (prompt, failures)) in chunk.iter().zip(results) {
                outcome.oracle_failures += failures;
                if let Some(prompt) = prompt {
                    outcome.offspring.push(Candidate::new(
                        prompt,
                        Origin::Crossover {
                            parents: [pool[i].id, pool[j].id],
                        },
                        generation,
                    ));
                }
            }
        }

        debug!(
            generation,
            pairs = pairs.len(),
            offspring = outcome.offspring.len(),
            "pairwise variation finished"
        );
        outcome
    }

    /// All pairs in one request; the reply is split on the delimiter pair.
    ///
    /// Zero segments, or more segments than pairs, count as a failed step.
    pub async fn batched(&self, pool: &[Candidate], generation: u32) -> VariationOutcome {
        let pool = distinct_members(pool);
        let pairs = pairs(pool.len());
        let listing: Vec<(&str, &str)> = pairs
            .iter()
            .map(|&(i, j)| (pool[i].prompt.as_str(), pool[j].prompt.as_str()))
            .collect();
        let request = self.templates.batched(&listing, self.mutation_rate);

        let reply = match self.oracle.complete(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(generation, error = %e, "batched variation request failed");
                return VariationOutcome {
                    offspring: Vec::new(),
                    oracle_failures: 1,
                };
            }
        };

        let segments = parse_delimited(&reply, BEGIN_DELIMITER, END_DELIMITER);
        if segments.is_empty() || segments.len() > pairs.len() {
            warn!(
                generation,
                segments = segments.len(),
                expected = pairs.len(),
                "batched variation reply unusable"
            );
            return VariationOutcome {
                offspring: Vec::new(),
                oracle_failures: 1,
            };
        }

        VariationOutcome {
            offspring: segments
                .into_iter()
                .map(|prompt| Candidate::new(prompt, Origin::Batched, generation))
                .collect(),
            oracle_failures: 0,
        }
    }
}

fn non_empty(reply: String) -> Result<String, OracleError> {
    let trimmed = reply.trim();
    if trimmed.is_empty() {
        return Err(OracleError::InvalidResponse("empty completion".into()));
    }
    Ok(trimmed.to_string())
}
