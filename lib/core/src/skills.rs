//! Skill dimensions, candidate profiles, and query weights
//!
//! The matcher scores candidates on a fixed set of four dimensions. The three
//! academic dimensions carry open-ended scores and are jointly standardized
//! before comparison; the GitHub similarity dimension is already bounded to
//! 0-1 by the upstream analysis and is always used raw.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A skill dimension a candidate can be scored on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    SystemsInfrastructure,
    TheoryStatisticsMl,
    Product,
    GithubSimilarity,
}

impl Dimension {
    /// All dimensions, academic first, in canonical comparison order
    pub const ALL: [Dimension; 4] = [
        Dimension::SystemsInfrastructure,
        Dimension::TheoryStatisticsMl,
        Dimension::Product,
        Dimension::GithubSimilarity,
    ];

    /// The jointly-standardized academic dimensions
    pub const ACADEMIC: [Dimension; 3] = [
        Dimension::SystemsInfrastructure,
        Dimension::TheoryStatisticsMl,
        Dimension::Product,
    ];

    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Dimension::SystemsInfrastructure => "systems_infrastructure",
            Dimension::TheoryStatisticsMl => "theory_statistics_ml",
            Dimension::Product => "product",
            Dimension::GithubSimilarity => "github_similarity",
        }
    }

    #[inline]
    #[must_use]
    pub fn is_academic(&self) -> bool {
        !matches!(self, Dimension::GithubSimilarity)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A candidate's skill scores, one optional value per dimension
///
/// A missing dimension is distinct from an explicit zero in the stored model,
/// but both read as `0.0` whenever a value is needed for computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub systems_infrastructure: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theory_statistics_ml: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_similarity: Option<f64>,
}

impl SkillProfile {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, convenient for literals and tests
    #[must_use]
    pub fn with(mut self, dim: Dimension, value: f64) -> Self {
        self.set(dim, value);
        self
    }

    /// Read a dimension's value, defaulting to `0.0` when absent
    #[inline]
    #[must_use]
    pub fn get(&self, dim: Dimension) -> f64 {
        match dim {
            Dimension::SystemsInfrastructure => self.systems_infrastructure,
            Dimension::TheoryStatisticsMl => self.theory_statistics_ml,
            Dimension::Product => self.product,
            Dimension::GithubSimilarity => self.github_similarity,
        }
        .unwrap_or(0.0)
    }

    #[inline]
    pub fn set(&mut self, dim: Dimension, value: f64) {
        let slot = match dim {
            Dimension::SystemsInfrastructure => &mut self.systems_infrastructure,
            Dimension::TheoryStatisticsMl => &mut self.theory_statistics_ml,
            Dimension::Product => &mut self.product,
            Dimension::GithubSimilarity => &mut self.github_similarity,
        };
        *slot = Some(value);
    }

    /// The three academic values in canonical order, missing values as `0.0`
    #[inline]
    #[must_use]
    pub fn academic_vector(&self) -> [f64; 3] {
        [
            self.get(Dimension::SystemsInfrastructure),
            self.get(Dimension::TheoryStatisticsMl),
            self.get(Dimension::Product),
        ]
    }

    /// Whether any academic dimension is strictly positive
    #[inline]
    #[must_use]
    pub fn has_academic(&self) -> bool {
        Dimension::ACADEMIC.iter().any(|&d| self.get(d) > 0.0)
    }

    /// Whether the GitHub similarity dimension is strictly positive
    #[inline]
    #[must_use]
    pub fn has_auxiliary(&self) -> bool {
        self.get(Dimension::GithubSimilarity) > 0.0
    }
}

/// Per-dimension query weights, defaulting to `1.0` everywhere
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    #[serde(default = "default_weight")]
    pub systems_infrastructure: f64,
    #[serde(default = "default_weight")]
    pub theory_statistics_ml: f64,
    #[serde(default = "default_weight")]
    pub product: f64,
    #[serde(default = "default_weight")]
    pub github_similarity: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            systems_infrastructure: 1.0,
            theory_statistics_ml: 1.0,
            product: 1.0,
            github_similarity: 1.0,
        }
    }
}

impl Weights {
    #[inline]
    #[must_use]
    pub fn get(&self, dim: Dimension) -> f64 {
        match dim {
            Dimension::SystemsInfrastructure => self.systems_infrastructure,
            Dimension::TheoryStatisticsMl => self.theory_statistics_ml,
            Dimension::Product => self.product,
            Dimension::GithubSimilarity => self.github_similarity,
        }
    }

    /// Rescale so the four weights sum to `4.0` (average weight `1.0`)
    ///
    /// A non-positive raw sum has no meaningful scaling and is rejected.
    pub fn normalized(&self) -> Result<Weights> {
        let total: f64 = Dimension::ALL.iter().map(|&d| self.get(d)).sum();
        if total <= 0.0 {
            return Err(Error::InvalidWeights);
        }
        Ok(Weights {
            systems_infrastructure: self.systems_infrastructure / total * 4.0,
            theory_statistics_ml: self.theory_statistics_ml / total * 4.0,
            product: self.product / total * 4.0,
            github_similarity: self.github_similarity / total * 4.0,
        })
    }
}
