//! # questgen — Rule-Based Question Generation
//!
//! Converts a declarative passage into question/answer pairs, driven
//! entirely by pre-computed linguistic annotations (dependency parse,
//! semantic role labels, named entities, coreference clusters) rather
//! than a trained generative model.
//!
//! ## Design Principles
//!
//! 1. **Deconstruct, then construct**: a rule engine extracts
//!    (subject, predicate, object, extra, answer, kind) tuples, and a
//!    separate renderer turns each tuple into a well-formed question
//! 2. **Annotations come from outside**: the [`annotate`] adapter accepts
//!    collaborator output as plain data; the core never does inference
//! 3. **Token identity, not text equality**: every rule works on arena
//!    indices into one shared token arena
//! 4. **Deterministic**: identical annotations produce identical output
//!    (for any selection method other than `Random`)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use questgen::{Generator, GenerateOptions, SelectionMethod};
//!
//! # fn example(raw: questgen::RawAnnotations) -> questgen::Result<()> {
//! let generator = Generator::with_options(GenerateOptions {
//!     limit: 20,
//!     selection_method: Some(SelectionMethod::Shortest),
//!     ..Default::default()
//! });
//!
//! for pair in generator.generate(&raw)? {
//!     println!("{} -> {}", pair.question, pair.answer);
//! }
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod annotate;
pub mod construct;
pub mod deconstruct;
pub mod doc;
pub mod spans;

// ============================================================================
// Re-exports
// ============================================================================

pub use annotate::{Annotated, RawAnnotations, RawEntity, RawSrlFrame, RawToken};
pub use construct::QaPair;
pub use deconstruct::{Deconstruction, QuestionKind};
pub use doc::{Doc, Entity, EntityLabel, Role, SrlFrame, Token, TokenId};

use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// Options
// ============================================================================

/// Post-construction ordering/filtering strategy. The base order (no
/// method, or `Shortest`) is ascending rendered-question length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMethod {
    Random,
    OnlyType,
    Longest,
    Shortest,
    Alphabetical,
    ReverseAlphabetical,
    AnswerLength,
    ReverseAnswerLength,
}

/// Construction parameters. The defaults mean: no cross-sentence
/// enrichment, no limit, base ordering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Include up to this many prior co-referenced clauses per result.
    #[serde(default)]
    pub enhance_level: usize,
    /// Maximum number of pairs returned; 0 means unlimited.
    #[serde(default)]
    pub limit: usize,
    #[serde(default)]
    pub selection_method: Option<SelectionMethod>,
    /// Type-tag prefix, required when `selection_method` is `OnlyType`.
    #[serde(default)]
    pub type_name: Option<String>,
}

impl GenerateOptions {
    /// Reject malformed configurations before any rule runs.
    fn validate(&self) -> Result<()> {
        if self.selection_method == Some(SelectionMethod::OnlyType) && self.type_name.is_none() {
            return Err(Error::Config(
                "selection_method=only_type requires type_name".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Generator
// ============================================================================

/// The primary entry point. Stateless apart from its options; one
/// `Generator` may serve any number of independent `generate` calls.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    opts: GenerateOptions,
}

impl Generator {
    pub fn new() -> Self {
        Generator::default()
    }

    pub fn with_options(opts: GenerateOptions) -> Self {
        Generator { opts }
    }

    /// Generate question/answer pairs from one annotation bundle.
    ///
    /// Unusable annotations (empty, out-of-range heads, inverted spans)
    /// yield an empty list: "no extractable structure" is a normal outcome
    /// for arbitrary text, not an error. Configuration problems fail fast
    /// with [`Error::Config`].
    pub fn generate(&self, raw: &RawAnnotations) -> Result<Vec<QaPair>> {
        self.opts.validate()?;
        let Some(ann) = annotate::build(raw) else {
            debug!("annotations unusable, returning empty set");
            return Ok(Vec::new());
        };
        let results = deconstruct::deconstruct(&ann);
        Ok(construct::run(&ann, &results, &self.opts))
    }
}

/// One-shot convenience over [`Generator`] with default options.
pub fn generate(raw: &RawAnnotations) -> Result<Vec<QaPair>> {
    Generator::new().generate(raw)
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
