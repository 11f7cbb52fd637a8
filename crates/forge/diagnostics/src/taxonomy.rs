use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Closed set of rustc diagnostics the fitness pipeline knows how to weigh.
///
/// Every variant except [`DiagnosticKind::Unclassified`] carries a stable
/// rustc error code and a default severity weight. Codes are unique, so
/// classification is a single exact-match lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    TypeMismatch,
    MovedValue,
    MultipleMutableBorrow,
    TraitNotImplemented,
    UnresolvedValue,
    UndeclaredType,
    MethodNotFound,
    BinaryOperator,
    ConflictingBorrow,
    UndeclaredLifetime,
    NoSuchField,
    PatternMatching,
    ConstStatic,
    Visibility,
    GenericConstraint,
    /// Any coded diagnostic outside the taxonomy.
    Unclassified,
}

impl DiagnosticKind {
    /// All classified kinds, in taxonomy order.
    pub const CLASSIFIED: [DiagnosticKind; 15] = [
        Self::TypeMismatch,
        Self::MovedValue,
        Self::MultipleMutableBorrow,
        Self::TraitNotImplemented,
        Self::UnresolvedValue,
        Self::UndeclaredType,
        Self::MethodNotFound,
        Self::BinaryOperator,
        Self::ConflictingBorrow,
        Self::UndeclaredLifetime,
        Self::NoSuchField,
        Self::PatternMatching,
        Self::ConstStatic,
        Self::Visibility,
        Self::GenericConstraint,
    ];

    /// Stable rustc code, `None` for the fallback kind.
    pub fn code(&self) -> Option<&'static str> {
        let code = match self {
            Self::TypeMismatch => "E0308",
            Self::MovedValue => "E0382",
            Self::MultipleMutableBorrow => "E0499",
            Self::TraitNotImplemented => "E0277",
            Self::UnresolvedValue => "E0425",
            Self::UndeclaredType => "E0433",
            Self::MethodNotFound => "E0599",
            Self::BinaryOperator => "E0369",
            Self::ConflictingBorrow => "E0502",
            Self::UndeclaredLifetime => "E0261",
            Self::NoSuchField => "E0609",
            Self::PatternMatching => "E0504",
            Self::ConstStatic => "E0507",
            Self::Visibility => "E0508",
            Self::GenericConstraint => "E0510",
            Self::Unclassified => return None,
        };
        Some(code)
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TypeMismatch => "Type Mismatch Error",
            Self::MovedValue => "Ownership Error",
            Self::MultipleMutableBorrow => "Borrow Checker Error",
            Self::TraitNotImplemented => "Trait Implementation Error",
            Self::UnresolvedValue => "Undefined Value Error",
            Self::UndeclaredType => "Undeclared Type Error",
            Self::MethodNotFound => "Method Not Found Error",
            Self::BinaryOperator => "Operator Type Error",
            Self::ConflictingBorrow => "Mutable Borrow Error",
            Self::UndeclaredLifetime => "Undeclared Lifetime Error",
            Self::NoSuchField => "Deref Field Error",
            Self::PatternMatching => "Pattern Matching Error",
            Self::ConstStatic => "Const Static Error",
            Self::Visibility => "Visibility Error",
            Self::GenericConstraint => "Generic Constraint Error",
            Self::Unclassified => "Compiler Error",
        }
    }

    /// Built-in severity weight. Higher means more severe.
    pub fn default_weight(&self) -> u32 {
        match self {
            Self::MovedValue | Self::UndeclaredType => 10,
            Self::MultipleMutableBorrow => 9,
            Self::TypeMismatch | Self::ConflictingBorrow => 8,
            Self::TraitNotImplemented | Self::MethodNotFound | Self::GenericConstraint => 7,
            Self::UnresolvedValue
            | Self::UndeclaredLifetime
            | Self::PatternMatching
            | Self::ConstStatic => 6,
            Self::BinaryOperator | Self::NoSuchField => 5,
            Self::Visibility => 4,
            Self::Unclassified => 0,
        }
    }

    /// Exact-match lookup; unknown codes fall back to [`DiagnosticKind::Unclassified`].
    pub fn from_code(code: &str) -> Self {
        Self::CLASSIFIED
            .iter()
            .copied()
            .find(|kind| kind.code() == Some(code))
            .unwrap_or(Self::Unclassified)
    }

    pub fn is_classified(&self) -> bool {
        !matches!(self, Self::Unclassified)
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code() {
            Some(code) => write!(f, "{} ({})", self.name(), code),
            None => write!(f, "{}", self.name()),
        }
    }
}

/// Weighting policy applied on top of the closed [`DiagnosticKind`] set.
///
/// Per-code overrides replace the built-in weight of a classified kind; the
/// fallback weight applies to every unclassified code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    /// Weight assigned to codes outside the taxonomy.
    #[serde(default)]
    pub fallback_weight: u32,
    /// Weight overrides keyed by rustc code (e.g. `"E0308"`), matched
    /// case-insensitively.
    #[serde(default)]
    pub weights: BTreeMap<String, u32>,
}

impl Taxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback_weight(mut self, weight: u32) -> Self {
        self.fallback_weight = weight;
        self
    }

    pub fn with_weight(mut self, code: impl Into<String>, weight: u32) -> Self {
        self.weights.insert(code.into(), weight);
        self
    }

    pub fn classify(&self, code: &str) -> DiagnosticKind {
        DiagnosticKind::from_code(code)
    }

    /// Effective weight of a kind under this policy.
    pub fn weight(&self, kind: DiagnosticKind) -> u32 {
        match kind.code() {
            Some(code) => self
                .weights
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(code))
                .map(|(_, weight)| *weight)
                .unwrap_or_else(|| kind.default_weight()),
            None => self.fallback_weight,
        }
    }
}
