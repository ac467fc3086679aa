use clap::{Parser, Subcommand};
use skillmatch::{MatchService, QueryRequest, SkillProfile};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Skill-profile similarity matcher over a persisted model
#[derive(Parser, Debug)]
#[command(name = "skillmatch")]
#[command(about = "Rank candidates by skill-profile similarity", long_about = None)]
struct Args {
    /// Log level (logs go to stderr; results go to stdout as JSON)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank stored candidates against a query profile
    FindSimilar {
        /// Path to the persisted model file
        model_path: PathBuf,
        /// Query JSON: either {"skills": {...}, "top_k"?, "weights"?,
        /// "metric"?, "github_similarities"?} or a bare skills object
        query_json: String,
        /// Also upsert the querying entity under this id
        candidate_id: Option<String>,
    },
    /// Insert or update one candidate and persist the model
    AddCandidate {
        /// Path to the persisted model file
        model_path: PathBuf,
        /// Unique candidate identifier
        candidate_id: String,
        /// Skills JSON, e.g. {"systems_infrastructure": 12.0}
        skills_json: String,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::FindSimilar {
            model_path,
            query_json,
            candidate_id,
        } => {
            let Some(mut request) = parse_query(&query_json) else {
                print_error("Invalid JSON for skills");
                return Ok(());
            };
            if candidate_id.is_some() {
                request.candidate_id = candidate_id;
            }
            let service = MatchService::new(model_path);
            let response = service.find_similar(&request);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::AddCandidate {
            model_path,
            candidate_id,
            skills_json,
        } => {
            let Ok(skills) = serde_json::from_str::<SkillProfile>(&skills_json) else {
                print_error("Invalid JSON for skills");
                return Ok(());
            };
            let service = MatchService::new(model_path);
            let response = service.add_candidate(&candidate_id, &skills);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

/// Parse the query payload, accepting both the wrapped request form and a
/// bare skills object (the legacy caller format).
fn parse_query(raw: &str) -> Option<QueryRequest> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    if value.get("skills").is_some() {
        serde_json::from_value(value).ok()
    } else {
        let skills: SkillProfile = serde_json::from_value(value).ok()?;
        Some(QueryRequest::new(skills))
    }
}

fn print_error(message: &str) {
    println!(
        "{}",
        serde_json::json!({
            "success": false,
            "error": message,
            "matches": [],
        })
    );
}
