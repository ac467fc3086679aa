//! # skillmatch Engine
//!
//! Candidate store and similarity query engine.
//!
//! The engine holds the full candidate population in memory, keeps a fitted
//! [`Scaler`](skillmatch_core::Scaler) over the academic dimensions, and
//! answers weighted similarity queries with a linear scan — populations are
//! small enough that no index is warranted.
//!
//! ## Example
//!
//! ```rust
//! use skillmatch_core::{Dimension, SkillProfile};
//! use skillmatch_engine::{MatcherStore, QueryOptions};
//!
//! let mut store = MatcherStore::new();
//! store.add("student_001", SkillProfile::new().with(Dimension::Product, 12.0));
//! store.add("student_002", SkillProfile::new().with(Dimension::Product, 3.0));
//!
//! let query = SkillProfile::new().with(Dimension::Product, 11.0);
//! let matches = store.find_similar(&query, &QueryOptions::default()).unwrap();
//! assert_eq!(matches[0].candidate_id, "student_001");
//! ```

pub mod query;
pub mod store;

pub use query::{ComparisonScope, MatchResult, Metric, QueryOptions};
pub use store::{Candidate, MatcherStore, UpsertAction, MIN_FIT_SIZE};
