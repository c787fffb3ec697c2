use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use guest_feedback_rust::aggregation::AggregationEngine;
use guest_feedback_rust::config::AppConfig;
use guest_feedback_rust::db::Database;
use guest_feedback_rust::inference::HttpInferenceClient;
use guest_feedback_rust::keywords::KeywordSource;
use guest_feedback_rust::logging::init_logging;
use guest_feedback_rust::models::NewFeedback;
use guest_feedback_rust::repository::FeedbackStore;
use guest_feedback_rust::service::FeedbackService;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a piece of guest feedback
    Submit {
        /// Name of the guest
        #[arg(long)]
        guest_name: String,

        /// Outlet the feedback is about
        #[arg(long)]
        outlet: String,

        /// Star rating (1-5)
        #[arg(long)]
        rating: Option<i32>,

        /// Free-text comment
        #[arg(long)]
        comment: String,

        /// Guest contact phone number
        #[arg(long)]
        phone: String,

        /// Guest contact email address
        #[arg(long)]
        email: String,

        /// Guest postal address
        #[arg(long)]
        address: Option<String>,
    },
    /// Rating distribution over stored feedback
    Summary {
        /// Restrict to one outlet
        #[arg(short, long)]
        outlet: Option<String>,
    },
    /// Month-bucketed sentiment trend over stored feedback
    Trend,
    /// List stored feedback, newest first
    Comments {
        /// Restrict to one outlet
        #[arg(short, long)]
        outlet: Option<String>,

        /// Maximum number of records to list
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Delete one stored feedback record
    DeleteComment {
        /// Record id
        id: i64,
    },
    /// Add a keyword to the corpus
    AddKeyword {
        /// The keyword text
        keyword: String,

        /// Keyword polarity (positive or negative)
        #[arg(short, long, default_value = "positive")]
        polarity: String,

        /// Benchmark the keyword is tagged to
        #[arg(short, long)]
        benchmark: Option<String>,

        /// Sub-benchmark the keyword is tagged to
        #[arg(short, long)]
        sub_benchmark: Option<String>,
    },
    /// Remove a keyword from the corpus
    RemoveKeyword {
        /// Keyword id
        id: i64,
    },
    /// List the keyword corpus, newest first
    ListKeywords,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    let _guard = init_logging(
        Some(&config.log_level()),
        config.logging.file_path.as_deref().map(std::path::Path::new),
    )?;

    info!("Starting guest-feedback-rust application");

    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize database with configuration
    let database = Arc::new(Database::from_config(&config.database)?);

    match cli.command {
        Commands::Submit {
            guest_name,
            outlet,
            rating,
            comment,
            phone,
            email,
            address,
        } => {
            let submission = NewFeedback {
                guest_name,
                outlet_id: outlet,
                rating,
                comment_text: comment,
                phone,
                email,
                address,
            };
            submit_feedback(&config, Arc::clone(&database), submission).await?;
        }
        Commands::Summary { outlet } => {
            let engine = AggregationEngine::new(Arc::clone(&database) as Arc<dyn FeedbackStore>);
            let summary = engine.rating_summary(outlet.as_deref()).await?;
            print_json(&summary)?;
        }
        Commands::Trend => {
            let engine = AggregationEngine::new(Arc::clone(&database) as Arc<dyn FeedbackStore>);
            let trend = engine.sentiment_trend().await?;
            print_json(&trend)?;
        }
        Commands::Comments { outlet, limit } => {
            use guest_feedback_rust::repository::FeedbackStore;
            let records = database.fetch_recent(outlet.as_deref(), limit).await?;
            info!("Found {} feedback records", records.len());
            print_json(&records)?;
        }
        Commands::DeleteComment { id } => {
            use guest_feedback_rust::repository::FeedbackStore;
            let deleted = database.delete_feedback(id).await?;
            if deleted {
                info!(id, "Feedback record deleted");
            } else {
                info!(id, "No feedback record with that id");
            }
        }
        Commands::AddKeyword {
            keyword,
            polarity,
            benchmark,
            sub_benchmark,
        } => {
            let record = database.add_keyword(
                &keyword,
                &polarity,
                benchmark.as_deref(),
                sub_benchmark.as_deref(),
            )?;
            print_json(&record)?;
        }
        Commands::RemoveKeyword { id } => {
            let removed = database.remove_keyword(id)?;
            if removed {
                info!(id, "Keyword removed");
            } else {
                info!(id, "No keyword with that id");
            }
        }
        Commands::ListKeywords => {
            let records = database.list_keywords()?;
            info!("Corpus holds {} keywords", records.len());
            print_json(&records)?;
        }
    }

    Ok(())
}

/// Submit one piece of feedback through the full pipeline
async fn submit_feedback(
    config: &AppConfig,
    database: Arc<Database>,
    submission: NewFeedback,
) -> Result<()> {
    let inference = Arc::new(HttpInferenceClient::new(&config.inference)?);
    let service = FeedbackService::new(
        Arc::clone(&database) as Arc<dyn KeywordSource>,
        inference,
        database as Arc<dyn FeedbackStore>,
    );

    let record = service.submit(submission).await?;
    info!(
        id = record.id,
        sentiment = record.sentiment.map_or("unknown", |s| s.as_str()),
        "Feedback stored"
    );
    print_json(&record)?;
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
