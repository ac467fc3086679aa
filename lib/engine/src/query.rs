//! Similarity queries over the candidate population
//!
//! A query carries a possibly-partial [`SkillProfile`] plus optional
//! per-dimension weights. Which dimensions participate in the comparison is
//! a single global decision derived from the query alone (its
//! [`ComparisonScope`]); academic values are standardized through the fitted
//! scaler, the GitHub similarity score is compared raw.

use crate::store::MatcherStore;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use skillmatch_core::{distance, Dimension, Error, Result, SkillProfile, Weights};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Distance metric used to compare weighted skill vectors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Euclidean,
    Cosine,
}

impl Metric {
    /// Compute `(distance, similarity)` between two weighted vectors
    fn score(&self, a: &[f64], b: &[f64]) -> (f64, f64) {
        match self {
            Metric::Euclidean => {
                let d = distance::euclidean(a, b);
                (d, distance::euclidean_similarity(d))
            }
            Metric::Cosine => {
                let d = distance::cosine_distance(a, b);
                (d, distance::cosine_similarity(d))
            }
        }
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "euclidean" => Ok(Metric::Euclidean),
            "cosine" => Ok(Metric::Cosine),
            other => Err(Error::UnknownMetric(other.to_string())),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Euclidean => f.write_str("euclidean"),
            Metric::Cosine => f.write_str("cosine"),
        }
    }
}

/// Which dimensions a query is eligible to compare on
///
/// Decided once per query from which categories carry strictly positive
/// values, never per candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonScope {
    All,
    AcademicOnly,
    AuxiliaryOnly,
    None,
}

impl ComparisonScope {
    #[must_use]
    pub fn from_query(query: &SkillProfile) -> Self {
        match (query.has_academic(), query.has_auxiliary()) {
            (true, true) => ComparisonScope::All,
            (true, false) => ComparisonScope::AcademicOnly,
            (false, true) => ComparisonScope::AuxiliaryOnly,
            (false, false) => ComparisonScope::None,
        }
    }

    /// The comparison dimensions, academic first
    #[must_use]
    pub fn dims(&self) -> &'static [Dimension] {
        match self {
            ComparisonScope::All => &Dimension::ALL,
            ComparisonScope::AcademicOnly => &Dimension::ACADEMIC,
            ComparisonScope::AuxiliaryOnly => &[Dimension::GithubSimilarity],
            ComparisonScope::None => &[],
        }
    }

    #[inline]
    #[must_use]
    pub fn includes_academic(&self) -> bool {
        matches!(self, ComparisonScope::All | ComparisonScope::AcademicOnly)
    }

    #[inline]
    #[must_use]
    pub fn includes_auxiliary(&self) -> bool {
        matches!(self, ComparisonScope::All | ComparisonScope::AuxiliaryOnly)
    }
}

/// Options controlling a similarity query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    /// Number of matches to return; `0` yields an empty result
    pub top_k: usize,
    pub metric: Metric,
    pub weights: Weights,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            metric: Metric::Euclidean,
            weights: Weights::default(),
        }
    }
}

/// One ranked candidate with its score breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub candidate_id: String,
    pub distance: f64,
    pub similarity: f64,
    pub similarity_percentage: f64,
    /// Full raw copy of the candidate's stored skills
    pub skills: SkillProfile,
    /// Query minus candidate, raw values, comparison dimensions only
    pub skill_differences: BTreeMap<Dimension, f64>,
    pub available_dimensions: Vec<Dimension>,
    pub dimensions_used_count: usize,
    /// Candidate value times its normalized weight, comparison dimensions only
    pub weighted_skills: BTreeMap<Dimension, f64>,
    /// Normalized weights for the comparison dimensions
    pub weights_applied: BTreeMap<Dimension, f64>,
}

impl MatcherStore {
    /// Rank the population against a query profile
    ///
    /// Returns at most `top_k` results, sorted by similarity descending with
    /// ties broken by candidate id ascending. Refits the scaler first when
    /// the store is stale; fewer than two candidates is an error.
    pub fn find_similar(
        &mut self,
        query: &SkillProfile,
        opts: &QueryOptions,
    ) -> Result<Vec<MatchResult>> {
        let weights = opts.weights.normalized()?;
        let scope = ComparisonScope::from_query(query);
        self.ensure_fitted()?;

        let scaler = self.scaler().cloned();
        let query_scaled = match (&scaler, scope.includes_academic()) {
            (Some(s), true) => Some(s.transform_row(query.academic_vector())),
            _ => None,
        };

        let dims = scope.dims();
        let mut results: Vec<MatchResult> = Vec::with_capacity(self.len());

        for candidate in self.candidates() {
            if dims.is_empty() {
                // Nothing to compare on: sentinel values, excluded from
                // meaningful ranking but still reported.
                results.push(MatchResult {
                    candidate_id: candidate.id.clone(),
                    distance: f64::INFINITY,
                    similarity: 0.0,
                    similarity_percentage: 0.0,
                    skills: candidate.skills.clone(),
                    skill_differences: BTreeMap::new(),
                    available_dimensions: Vec::new(),
                    dimensions_used_count: 0,
                    weighted_skills: BTreeMap::new(),
                    weights_applied: BTreeMap::new(),
                });
                continue;
            }

            // Standardized academic values first, raw GitHub similarity after
            let mut query_values = Vec::with_capacity(dims.len());
            let mut candidate_values = Vec::with_capacity(dims.len());
            if let (Some(scaler), Some(query_scaled)) = (&scaler, &query_scaled) {
                let candidate_scaled =
                    scaler.transform_row(candidate.skills.academic_vector());
                query_values.extend_from_slice(query_scaled);
                candidate_values.extend_from_slice(&candidate_scaled);
            }
            if scope.includes_auxiliary() {
                query_values.push(query.get(Dimension::GithubSimilarity));
                candidate_values.push(candidate.skills.get(Dimension::GithubSimilarity));
            }

            // Renormalize the active weights so they average 1.0 over the
            // comparison set; all-zero restricted weights fall back to 1.0.
            let restricted: Vec<f64> = dims.iter().map(|&d| weights.get(d)).collect();
            let restricted_sum: f64 = restricted.iter().sum();
            let active: Vec<f64> = if restricted_sum > 0.0 {
                restricted
                    .iter()
                    .map(|w| w / restricted_sum * dims.len() as f64)
                    .collect()
            } else {
                vec![1.0; dims.len()]
            };

            let query_weighted: Vec<f64> = query_values
                .iter()
                .zip(&active)
                .map(|(v, w)| v * w)
                .collect();
            let candidate_weighted: Vec<f64> = candidate_values
                .iter()
                .zip(&active)
                .map(|(v, w)| v * w)
                .collect();

            let (dist, similarity) = opts.metric.score(&query_weighted, &candidate_weighted);

            results.push(MatchResult {
                candidate_id: candidate.id.clone(),
                distance: dist,
                similarity,
                similarity_percentage: similarity * 100.0,
                skills: candidate.skills.clone(),
                skill_differences: dims
                    .iter()
                    .map(|&d| (d, query.get(d) - candidate.skills.get(d)))
                    .collect(),
                available_dimensions: dims.to_vec(),
                dimensions_used_count: dims.len(),
                weighted_skills: dims
                    .iter()
                    .map(|&d| (d, candidate.skills.get(d) * weights.get(d)))
                    .collect(),
                weights_applied: dims.iter().map(|&d| (d, weights.get(d))).collect(),
            });
        }

        results.sort_by(|a, b| {
            OrderedFloat(b.similarity)
                .cmp(&OrderedFloat(a.similarity))
                .then_with(|| a.candidate_id.cmp(&b.candidate_id))
        });
        results.truncate(opts.top_k);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(sys: f64, theory: f64, product: f64) -> SkillProfile {
        SkillProfile::new()
            .with(Dimension::SystemsInfrastructure, sys)
            .with(Dimension::TheoryStatisticsMl, theory)
            .with(Dimension::Product, product)
    }

    fn two_candidate_store() -> MatcherStore {
        let mut store = MatcherStore::new();
        store.add(
            "A",
            profile(10.0, 10.0, 10.0).with(Dimension::GithubSimilarity, 0.0),
        );
        store.add(
            "B",
            profile(0.0, 0.0, 0.0).with(Dimension::GithubSimilarity, 0.0),
        );
        store
    }

    #[test]
    fn test_exact_academic_match_ranks_first_with_similarity_one() {
        let mut store = two_candidate_store();
        let query = profile(10.0, 10.0, 10.0);
        let opts = QueryOptions {
            top_k: 2,
            ..QueryOptions::default()
        };
        let matches = store.find_similar(&query, &opts).unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].candidate_id, "A");
        assert!((matches[0].similarity - 1.0).abs() < 1e-12);
        assert_eq!(matches[0].distance, 0.0);
        assert_eq!(matches[1].candidate_id, "B");
        assert!(matches[1].similarity < 1.0);
    }

    #[test]
    fn test_comparison_scope_from_query() {
        let both = profile(1.0, 0.0, 0.0).with(Dimension::GithubSimilarity, 0.5);
        assert_eq!(ComparisonScope::from_query(&both), ComparisonScope::All);

        let academic = profile(0.0, 2.0, 0.0);
        assert_eq!(
            ComparisonScope::from_query(&academic),
            ComparisonScope::AcademicOnly
        );

        let github = SkillProfile::new().with(Dimension::GithubSimilarity, 0.8);
        assert_eq!(
            ComparisonScope::from_query(&github),
            ComparisonScope::AuxiliaryOnly
        );

        assert_eq!(
            ComparisonScope::from_query(&SkillProfile::new()),
            ComparisonScope::None
        );
    }

    #[test]
    fn test_auxiliary_only_query_uses_single_dimension() {
        let mut store = MatcherStore::new();
        store.add(
            "A",
            profile(5.0, 5.0, 5.0).with(Dimension::GithubSimilarity, 0.8),
        );
        store.add(
            "B",
            profile(1.0, 1.0, 1.0).with(Dimension::GithubSimilarity, 0.1),
        );

        let query = SkillProfile::new().with(Dimension::GithubSimilarity, 0.8);
        let matches = store
            .find_similar(&query, &QueryOptions::default())
            .unwrap();

        assert_eq!(matches[0].candidate_id, "A");
        assert_eq!(
            matches[0].available_dimensions,
            vec![Dimension::GithubSimilarity]
        );
        assert_eq!(matches[0].dimensions_used_count, 1);
        assert_eq!(matches[0].skill_differences.len(), 1);
        assert!(matches[0]
            .skill_differences
            .contains_key(&Dimension::GithubSimilarity));
    }

    #[test]
    fn test_all_zero_query_yields_sentinel_results() {
        let mut store = two_candidate_store();
        let matches = store
            .find_similar(&SkillProfile::new(), &QueryOptions::default())
            .unwrap();

        assert_eq!(matches.len(), 2);
        for m in &matches {
            assert_eq!(m.similarity, 0.0);
            assert!(m.distance.is_infinite());
            assert!(m.available_dimensions.is_empty());
            assert!(m.skill_differences.is_empty());
        }
        // Equal similarity falls back to id order
        assert_eq!(matches[0].candidate_id, "A");
        assert_eq!(matches[1].candidate_id, "B");
    }

    #[test]
    fn test_ranking_sorted_and_bounded_by_top_k() {
        let mut store = MatcherStore::new();
        for i in 0..6 {
            store.add(
                format!("C{}", i),
                profile(i as f64, 2.0 * i as f64, 3.0 * i as f64),
            );
        }
        let query = profile(2.0, 4.0, 6.0);
        let opts = QueryOptions {
            top_k: 4,
            ..QueryOptions::default()
        };
        let matches = store.find_similar(&query, &opts).unwrap();

        assert_eq!(matches.len(), 4);
        for pair in matches.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
        assert_eq!(matches[0].candidate_id, "C2");
    }

    #[test]
    fn test_top_k_zero_and_oversized() {
        let mut store = two_candidate_store();
        let query = profile(1.0, 1.0, 1.0);

        let none = store
            .find_similar(
                &query,
                &QueryOptions {
                    top_k: 0,
                    ..QueryOptions::default()
                },
            )
            .unwrap();
        assert!(none.is_empty());

        let all = store
            .find_similar(
                &query,
                &QueryOptions {
                    top_k: 100,
                    ..QueryOptions::default()
                },
            )
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_zero_restricted_weights_fall_back_to_one() {
        let mut store = two_candidate_store();
        // All weight on GitHub, but the query only has academic data, so the
        // restricted weights are all zero and each active dimension gets 1.0.
        let opts = QueryOptions {
            top_k: 2,
            weights: Weights {
                systems_infrastructure: 0.0,
                theory_statistics_ml: 0.0,
                product: 0.0,
                github_similarity: 4.0,
            },
            ..QueryOptions::default()
        };
        let matches = store.find_similar(&profile(10.0, 10.0, 10.0), &opts).unwrap();

        assert_eq!(matches[0].candidate_id, "A");
        assert!((matches[0].similarity - 1.0).abs() < 1e-12);
        // weights_applied still reports the normalized (zero) academic weights
        assert_eq!(
            matches[0].weights_applied[&Dimension::SystemsInfrastructure],
            0.0
        );
    }

    #[test]
    fn test_weight_skew_changes_ranking() {
        let mut store = MatcherStore::new();
        store.add("sys", profile(10.0, 0.0, 0.0));
        store.add("ml", profile(0.0, 10.0, 0.0));
        store.add("anchor", profile(5.0, 5.0, 0.0));

        let query = profile(8.0, 8.0, 0.0);
        let sys_heavy = QueryOptions {
            top_k: 3,
            weights: Weights {
                systems_infrastructure: 10.0,
                theory_statistics_ml: 0.1,
                product: 0.1,
                github_similarity: 0.1,
            },
            ..QueryOptions::default()
        };
        let matches = store.find_similar(&query, &sys_heavy).unwrap();
        let sys_rank = matches
            .iter()
            .position(|m| m.candidate_id == "sys")
            .unwrap();
        let ml_rank = matches.iter().position(|m| m.candidate_id == "ml").unwrap();
        assert!(sys_rank < ml_rank);
    }

    #[test]
    fn test_cosine_metric() {
        let mut store = MatcherStore::new();
        store.add("A", profile(10.0, 10.0, 10.0));
        store.add("B", profile(0.0, 0.0, 0.0));
        let opts = QueryOptions {
            top_k: 2,
            metric: Metric::Cosine,
            ..QueryOptions::default()
        };
        let matches = store.find_similar(&profile(10.0, 10.0, 10.0), &opts).unwrap();

        assert_eq!(matches[0].candidate_id, "A");
        assert!((matches[0].similarity - 1.0).abs() < 1e-12);
        // B standardizes to the exact opposite vector
        assert!((matches[1].similarity - (-1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_query_on_undersized_store_fails() {
        let mut store = MatcherStore::new();
        store.add("only", profile(1.0, 1.0, 1.0));
        let err = store
            .find_similar(&profile(1.0, 1.0, 1.0), &QueryOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientData { have: 1, need: 2 }));
    }

    #[test]
    fn test_invalid_weights_rejected_before_fit() {
        let mut store = MatcherStore::new();
        let opts = QueryOptions {
            weights: Weights {
                systems_infrastructure: 0.0,
                theory_statistics_ml: 0.0,
                product: 0.0,
                github_similarity: 0.0,
            },
            ..QueryOptions::default()
        };
        let err = store
            .find_similar(&profile(1.0, 1.0, 1.0), &opts)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidWeights));
    }

    #[test]
    fn test_metric_parsing() {
        assert_eq!("euclidean".parse::<Metric>().unwrap(), Metric::Euclidean);
        assert_eq!("cosine".parse::<Metric>().unwrap(), Metric::Cosine);
        assert!(matches!(
            "manhattan".parse::<Metric>(),
            Err(Error::UnknownMetric(_))
        ));
    }

    #[test]
    fn test_match_result_serializes_dimension_keys() {
        let mut store = two_candidate_store();
        let matches = store
            .find_similar(&profile(10.0, 10.0, 10.0), &QueryOptions::default())
            .unwrap();
        let json = serde_json::to_value(&matches[0]).unwrap();
        assert!(json["skill_differences"]
            .as_object()
            .unwrap()
            .contains_key("systems_infrastructure"));
        assert_eq!(json["similarity_percentage"], serde_json::json!(100.0));
    }
}
