//! # skillmatch
//!
//! Skill-profile similarity matcher with a persisted normalization model.
//!
//! Candidates are scored on four skill dimensions. Three academic dimensions
//! (systems/infrastructure, theory/statistics/ML, product) are jointly
//! standardized over the stored population; the fourth, an externally
//! computed GitHub similarity in 0-1, is compared raw. Queries may supply
//! any subset of dimensions and optional per-dimension weights; the engine
//! ranks the whole population by weighted distance in standardized space.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! skillmatch add-candidate matcher.json student_001 \
//!     '{"systems_infrastructure": 12.0, "theory_statistics_ml": 8.0, "product": 5.0}'
//! skillmatch find-similar matcher.json \
//!     '{"skills": {"systems_infrastructure": 11.0}, "top_k": 3}'
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use skillmatch::prelude::*;
//!
//! let service = MatchService::new("matcher.json");
//! service.add_candidate(
//!     "student_001",
//!     &SkillProfile::new().with(Dimension::SystemsInfrastructure, 12.0),
//! );
//!
//! let query = SkillProfile::new().with(Dimension::SystemsInfrastructure, 11.0);
//! let response = service.find_similar(&QueryRequest::new(query));
//! for m in response.matches {
//!     println!("{} {:.3}", m.candidate_id, m.similarity);
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - `skillmatch-core` - Skill dimensions, scaler, distance functions, errors
//! - `skillmatch-engine` - Candidate store and similarity query engine
//! - `skillmatch-storage` - Persisted model format and atomic save/load

pub mod service;

// Re-export core types
pub use skillmatch_core::{distance, Dimension, Error, Result, Scaler, SkillProfile, Weights};

// Re-export engine
pub use skillmatch_engine::{
    Candidate, ComparisonScope, MatchResult, MatcherStore, Metric, QueryOptions, UpsertAction,
};

// Re-export storage
pub use skillmatch_storage::{ModelFile, PersistedModel, MODEL_VERSION};

pub use service::{GithubScore, MatchService, QueryRequest, QueryResponse, UpsertResponse};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Candidate, ComparisonScope, Dimension, Error, GithubScore, MatchResult, MatchService,
        MatcherStore, Metric, ModelFile, QueryOptions, QueryRequest, QueryResponse, Result,
        SkillProfile, UpsertAction, UpsertResponse, Weights,
    };
}
