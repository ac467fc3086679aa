//! Query facade over the persisted matcher model
//!
//! One [`MatchService`] owns one model file. Every operation loads the whole
//! model, works on it in memory, and (for mutating paths) writes it back.
//! All engine and storage errors are converted into uniform
//! `{success: false, error, ...}` envelopes; raw errors never escape.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use skillmatch_core::{Result, SkillProfile, Weights};
use skillmatch_engine::{MatchResult, Metric, QueryOptions, UpsertAction, MIN_FIT_SIZE};
use skillmatch_storage::ModelFile;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

fn default_top_k() -> usize {
    5
}

/// An externally-computed GitHub similarity score for one candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubScore {
    pub id: String,
    pub similarity: f64,
}

/// A similarity query as supplied by the caller
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub skills: SkillProfile,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Metric name; anything but "euclidean"/"cosine" fails fast
    #[serde(default)]
    pub metric: Option<String>,
    #[serde(default)]
    pub weights: Option<Weights>,
    /// Batch of auxiliary scores merged into the population for this query
    #[serde(default)]
    pub github_similarities: Option<Vec<GithubScore>>,
    /// When set, the querying entity is upserted into the model afterwards
    #[serde(default)]
    pub candidate_id: Option<String>,
}

impl QueryRequest {
    #[must_use]
    pub fn new(skills: SkillProfile) -> Self {
        Self {
            skills,
            top_k: default_top_k(),
            metric: None,
            weights: None,
            github_similarities: None,
            candidate_id: None,
        }
    }
}

/// Uniform envelope for similarity queries
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub matches: Vec<MatchResult>,
    pub database_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_skills: Option<SkillProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights_used: Option<Weights>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_added: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_action: Option<UpsertAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_candidate_id: Option<String>,
}

impl QueryResponse {
    fn failure(error: &skillmatch_core::Error) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            matches: Vec::new(),
            database_size: 0,
            query_skills: None,
            weights_used: None,
            message: None,
            candidate_added: None,
            candidate_action: None,
            processed_candidate_id: None,
        }
    }
}

/// Uniform envelope for candidate upserts
#[derive(Debug, Clone, Serialize)]
pub struct UpsertResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<UpsertAction>,
    pub database_size: usize,
}

impl UpsertResponse {
    fn failure(error: &skillmatch_core::Error) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            message: None,
            action: None,
            database_size: 0,
        }
    }
}

/// Facade orchestrating model load, query, and persistence
///
/// The write lock serializes load-mutate-save cycles within the process, so
/// concurrent upserts through one service cannot drop each other's writes.
/// Writers in other processes still race at whole-file granularity.
pub struct MatchService {
    file: ModelFile,
    write_lock: Mutex<()>,
}

impl MatchService {
    #[must_use]
    pub fn new<P: AsRef<Path>>(model_path: P) -> Self {
        Self {
            file: ModelFile::new(model_path),
            write_lock: Mutex::new(()),
        }
    }

    #[inline]
    #[must_use]
    pub fn model_file(&self) -> &ModelFile {
        &self.file
    }

    /// Run a similarity query, optionally upserting the querying entity
    pub fn find_similar(&self, request: &QueryRequest) -> QueryResponse {
        let mut response = match self.try_find_similar(request) {
            Ok(response) => response,
            Err(e) => return QueryResponse::failure(&e),
        };

        // The querying entity is persisted through the regular upsert path,
        // even when the query itself short-circuited on a small population.
        if let Some(candidate_id) = &request.candidate_id {
            let upsert = self.add_candidate(candidate_id, &request.skills);
            response.candidate_added = Some(upsert.success);
            response.candidate_action = upsert.action;
            if upsert.success {
                response.database_size = upsert.database_size;
                response.processed_candidate_id = Some(candidate_id.clone());
            }
        }
        response
    }

    fn try_find_similar(&self, request: &QueryRequest) -> Result<QueryResponse> {
        let _guard = self.write_lock.lock();
        let mut store = self.file.load_or_create()?;

        if store.len() < MIN_FIT_SIZE {
            debug!(size = store.len(), "population too small for matching");
            return Ok(QueryResponse {
                success: true,
                error: None,
                matches: Vec::new(),
                database_size: store.len(),
                query_skills: Some(request.skills.clone()),
                weights_used: request.weights,
                message: Some(
                    "Not enough candidates in database for similarity matching".to_string(),
                ),
                candidate_added: None,
                candidate_action: None,
                processed_candidate_id: None,
            });
        }

        // Auxiliary scores only shape this query; they are not persisted.
        if let Some(scores) = &request.github_similarities {
            if !scores.is_empty() {
                let lookup: HashMap<String, f64> = scores
                    .iter()
                    .map(|s| (s.id.clone(), s.similarity))
                    .collect();
                store.apply_github_scores(&lookup);
                store.fit()?;
                debug!(batch = scores.len(), "merged GitHub similarity batch");
            }
        }

        let opts = QueryOptions {
            top_k: request.top_k,
            metric: match &request.metric {
                Some(name) => name.parse()?,
                None => Metric::Euclidean,
            },
            weights: request.weights.unwrap_or_default(),
        };
        let matches = store.find_similar(&request.skills, &opts)?;
        info!(
            matches = matches.len(),
            population = store.len(),
            metric = %opts.metric,
            "similarity query complete"
        );

        Ok(QueryResponse {
            success: true,
            error: None,
            matches,
            database_size: store.len(),
            query_skills: Some(request.skills.clone()),
            weights_used: request.weights,
            message: None,
            candidate_added: None,
            candidate_action: None,
            processed_candidate_id: None,
        })
    }

    /// Insert or update one candidate and persist the model
    pub fn add_candidate(&self, id: &str, skills: &SkillProfile) -> UpsertResponse {
        match self.try_add_candidate(id, skills) {
            Ok(response) => response,
            Err(e) => UpsertResponse::failure(&e),
        }
    }

    fn try_add_candidate(&self, id: &str, skills: &SkillProfile) -> Result<UpsertResponse> {
        let _guard = self.write_lock.lock();
        let mut store = self.file.load_or_create()?;
        let action = store.upsert(id, skills.clone());
        if store.len() >= MIN_FIT_SIZE {
            store.fit()?;
        }
        self.file.save(&mut store)?;
        info!(candidate = id, action = %action, size = store.len(), "candidate upserted");

        let verb = match action {
            UpsertAction::Added => "Added",
            UpsertAction::Updated => "Updated",
        };
        Ok(UpsertResponse {
            success: true,
            error: None,
            message: Some(format!("{} candidate {} in model", verb, id)),
            action: Some(action),
            database_size: store.len(),
        })
    }
}
