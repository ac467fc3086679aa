//! Candidate population and fit lifecycle
//!
//! The store is an explicit two-state machine: any mutation leaves it
//! `Stale`, a successful [`MatcherStore::fit`] makes it `Fitted`. Query
//! operations require a fitted scaler and refit on demand.

use serde::{Deserialize, Serialize};
use skillmatch_core::{Dimension, Error, Result, Scaler, SkillProfile};
use std::collections::HashMap;
use std::fmt;

/// Minimum population size for fitting the scaler
pub const MIN_FIT_SIZE: usize = 2;

/// A stored candidate: stable external id plus skill scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub skills: SkillProfile,
}

/// Which action an upsert took
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertAction {
    Added,
    Updated,
}

impl UpsertAction {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            UpsertAction::Added => "added",
            UpsertAction::Updated => "updated",
        }
    }
}

impl fmt::Display for UpsertAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FitState {
    Fitted,
    Stale,
}

/// In-memory candidate population with a fitted standardization model
#[derive(Debug, Clone)]
pub struct MatcherStore {
    candidates: Vec<Candidate>,
    scaler: Option<Scaler>,
    state: FitState,
}

impl Default for MatcherStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MatcherStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
            scaler: None,
            state: FitState::Stale,
        }
    }

    /// Rebuild a store from persisted parts
    ///
    /// A present scaler marks the store fitted; callers are responsible for
    /// passing a scaler consistent with the candidate list.
    #[must_use]
    pub fn from_parts(candidates: Vec<Candidate>, scaler: Option<Scaler>) -> Self {
        let state = if scaler.is_some() {
            FitState::Fitted
        } else {
            FitState::Stale
        };
        Self {
            candidates,
            scaler,
            state,
        }
    }

    /// Append a candidate without checking for duplicate ids
    ///
    /// Callers needing insert-or-update semantics must use [`Self::upsert`].
    pub fn add(&mut self, id: impl Into<String>, skills: SkillProfile) {
        self.candidates.push(Candidate {
            id: id.into(),
            skills,
        });
        self.state = FitState::Stale;
    }

    /// Insert a new candidate or replace an existing candidate's skills
    pub fn upsert(&mut self, id: &str, skills: SkillProfile) -> UpsertAction {
        self.state = FitState::Stale;
        match self.candidates.iter_mut().find(|c| c.id == id) {
            Some(existing) => {
                existing.skills = skills;
                UpsertAction::Updated
            }
            None => {
                self.candidates.push(Candidate {
                    id: id.to_string(),
                    skills,
                });
                UpsertAction::Added
            }
        }
    }

    /// Merge externally-computed GitHub similarity scores into the population
    ///
    /// Every candidate is updated: ids missing from the batch are reset to
    /// `0.0` so stale scores from a previous batch cannot linger.
    pub fn apply_github_scores(&mut self, scores: &HashMap<String, f64>) {
        for candidate in &mut self.candidates {
            let value = scores.get(&candidate.id).copied().unwrap_or(0.0);
            candidate.skills.set(Dimension::GithubSimilarity, value);
        }
        self.state = FitState::Stale;
    }

    /// Fit the scaler over the current population's academic dimensions
    pub fn fit(&mut self) -> Result<()> {
        if self.candidates.len() < MIN_FIT_SIZE {
            return Err(Error::InsufficientData {
                have: self.candidates.len(),
                need: MIN_FIT_SIZE,
            });
        }
        let matrix: Vec<[f64; 3]> = self
            .candidates
            .iter()
            .map(|c| c.skills.academic_vector())
            .collect();
        self.scaler = Some(Scaler::fit(&matrix)?);
        self.state = FitState::Fitted;
        Ok(())
    }

    /// Fit if stale; cheap no-op on an already-fitted store
    pub fn ensure_fitted(&mut self) -> Result<()> {
        if self.state == FitState::Fitted {
            return Ok(());
        }
        self.fit()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.state == FitState::Fitted
    }

    #[inline]
    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    #[inline]
    #[must_use]
    pub fn scaler(&self) -> Option<&Scaler> {
        self.scaler.as_ref()
    }
}
