use promptforge_diagnostics::ScoreReport;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;

/// Identity of a candidate. Mating pools are unique by identity, not by prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateId(pub Uuid);

impl CandidateId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CandidateId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a candidate came to exist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Origin {
    Seed,
    /// Mutated copy of a seed, used to fill the initial population.
    SeedMutation { parent: CandidateId },
    /// Pairwise crossover (optionally followed by mutation).
    Crossover { parents: [CandidateId; 2] },
    /// One segment of a batched variation reply.
    Batched,
}

/// A prompt, the artifact generated from it, and its fitness (lower is better).
#[derive(Clone, Debug, Serialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub prompt: String,
    /// Generated source; `None` until evaluated or when generation failed.
    pub artifact: Option<String>,
    /// `+inf` until evaluated.
    pub fitness: f64,
    pub report: Option<ScoreReport>,
    pub origin: Origin,
    /// Generation that produced the candidate (0 for the initial population).
    pub generation: u32,
    evaluated: bool,
}

impl Candidate {
    pub fn new(prompt: impl Into<String>, origin: Origin, generation: u32) -> Self {
        Self {
            id: CandidateId::new(),
            prompt: prompt.into(),
            artifact: None,
            fitness: f64::INFINITY,
            report: None,
            origin,
            generation,
            evaluated: false,
        }
    }

    pub fn seed(prompt: impl Into<String>) -> Self {
        Self::new(prompt, Origin::Seed, 0)
    }

    /// Test and replay helper: a candidate with a known fitness.
    pub fn with_fitness(mut self, fitness: f64) -> Self {
        self.fitness = fitness;
        self.evaluated = true;
        self
    }

    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    /// Record the outcome of the one evaluation this candidate gets.
    ///
    /// No artifact, or a report without any parseable output, is worst-case.
    pub fn apply_evaluation(&mut self, artifact: Option<String>, report: Option<ScoreReport>) {
        self.fitness = match (&artifact, &report) {
            (Some(_), Some(report)) if report.signal => report.score,
            _ => f64::INFINITY,
        };
        self.artifact = artifact;
        self.report = report;
        self.evaluated = true;
    }

    /// Clear the evaluation so the candidate can be explicitly re-evaluated.
    pub fn reset_evaluation(&mut self) {
        self.artifact = None;
        self.report = None;
        self.fitness = f64::INFINITY;
        self.evaluated = false;
    }

    /// Total order on fitness, lower first.
    pub fn cmp_fitness(&self, other: &Self) -> Ordering {
        self.fitness.total_cmp(&other.fitness)
    }
}
