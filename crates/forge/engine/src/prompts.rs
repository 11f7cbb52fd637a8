use serde::{Deserialize, Serialize};

/// Marks the start of one candidate prompt in a batched variation reply.
pub const BEGIN_DELIMITER: &str = "<<<PROMPT>>>";
/// Marks the end of one candidate prompt in a batched variation reply.
pub const END_DELIMITER: &str = "<<<END PROMPT>>>";

/// Instruction templates sent to the generation oracle.
///
/// Placeholders: `{parent1}`, `{parent2}` (crossover); `{prompt}`, `{rate}`
/// (mutation); `{pairs}`, `{rate}`, `{begin}`, `{end}` (batched).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplates {
    #[serde(default = "default_crossover")]
    pub crossover: String,

    #[serde(default = "default_mutation")]
    pub mutation: String,

    #[serde(default = "default_batched")]
    pub batched: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            crossover: default_crossover(),
            mutation: default_mutation(),
            batched: default_batched(),
        }
    }
}

impl PromptTemplates {
    pub fn crossover(&self, parent1: &str, parent2: &str) -> String {
        self.crossover
            .replace("{parent1}", parent1)
            .replace("{parent2}", parent2)
    }

    pub fn mutation(&self, prompt: &str, rate: f64) -> String {
        self.mutation
            .replace("{rate}", &rate.to_string())
            .replace("{prompt}", prompt)
    }

    /// One request covering every pair of the mating pool.
    pub fn batched(&self, pairs: &[(&str, &str)], rate: f64) -> String {
        let mut listing = String::new();
        for (i, (p1, p2)) in pairs.iter().enumerate() {
            listing.push_str(&format!(
                "Pair {}:\nParent 1: {}\nParent 2: {}\n\n",
                i + 1,
                p1,
                p2
            ));
        }
        self.batched
            .replace("{begin}", BEGIN_DELIMITER)
            .replace("{end}", END_DELIMITER)
            .replace("{rate}", &rate.to_string())
            .replace("{pairs}", listing.trim_end())
    }
}

/// Texts enclosed by `begin`/`end`, trimmed, empty ones dropped.
///
/// A trailing segment without its end delimiter is discarded.
pub fn parse_delimited(reply: &str, begin: &str, end: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut rest = reply;
    while let Some(start) = rest.find(begin) {
        let after = &rest[start + begin.len()..];
        let Some(stop) = after.find(end) else {
            break;
        };
        let segment = after[..stop].trim();
        if !segment.is_empty() {
            segments.push(segment.to_string());
        }
        rest = &after[stop + end.len()..];
    }
    segments
}

// Default value helpers
fn default_crossover() -> String {
    "Combine the two prompts below into one improved prompt that makes a code model \
     write Rust code that compiles and passes its tests. Reply with the new prompt only.\n\n\
     Parent 1: {parent1}\nParent 2: {parent2}"
        .to_string()
}

fn default_mutation() -> String {
    "Rewrite the prompt below, changing roughly the given fraction of it while keeping \
     its intent. Reply with the new prompt only.\n\n\
     Prompt: {prompt}\nMutation Rate: {rate}"
        .to_string()
}

fn default_batched() -> String {
    "For every pair below, combine the two parent prompts into one child prompt, then \
     rewrite the child changing roughly the given fraction of it (Mutation Rate: {rate}). \
     Each child prompt must make a code model write Rust code that compiles and passes \
     its tests. Wrap every child in {begin} and {end} and output nothing else.\n\n{pairs}"
        .to_string()
}
