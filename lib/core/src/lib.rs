//! # skillmatch Core
//!
//! Core library for the skillmatch similarity matcher.
//!
//! This crate provides the fundamental data structures and numeric routines:
//!
//! - [`Dimension`] - The fixed set of skill dimensions a candidate is scored on
//! - [`SkillProfile`] - A candidate's (possibly partial) scores per dimension
//! - [`Weights`] - Per-dimension query weights
//! - [`Scaler`] - Per-dimension standardization (mean/stddev) over the academic dimensions
//! - [`distance`] - Euclidean and cosine distance between weighted skill vectors
//!
//! ## Example
//!
//! ```rust
//! use skillmatch_core::{Dimension, Scaler, SkillProfile};
//!
//! let a = SkillProfile::new()
//!     .with(Dimension::SystemsInfrastructure, 12.0)
//!     .with(Dimension::Product, 8.0);
//! let b = SkillProfile::new()
//!     .with(Dimension::SystemsInfrastructure, 4.0)
//!     .with(Dimension::TheoryStatisticsMl, 6.0);
//!
//! let scaler = Scaler::fit(&[a.academic_vector(), b.academic_vector()]).unwrap();
//! let standardized = scaler.transform_row(a.academic_vector());
//! assert_eq!(standardized.len(), 3);
//! ```

pub mod distance;
pub mod error;
pub mod scaler;
pub mod skills;

pub use error::{Error, Result};
pub use scaler::{Scaler, ACADEMIC_DIM_COUNT};
pub use skills::{Dimension, SkillProfile, Weights};
