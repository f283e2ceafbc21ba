use std::path::PathBuf;

use clap::Parser;
use kotoba_core::store::EntryStore;
use kotoba_ingest::{parse_json, parse_xml};

/// Loads a JMdict dictionary file into the search database.
#[derive(Parser, Debug)]
struct Args {
    /// Path to the JMdict file (XML by default, or its preprocessed JSON form).
    #[arg(long)]
    input: PathBuf,

    /// Parse `--input` as the preprocessed JSON form instead of XML.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let text = match std::fs::read_to_string(&args.input) {
        Ok(text) => text,
        Err(err) => {
            tracing::error!(path = %args.input.display(), error = %err, "could not read input file");
            std::process::exit(1);
        }
    };

    let words = match (if args.json { parse_json(&text) } else { parse_xml(&text) }) {
        Ok(words) => words,
        Err(err) => {
            tracing::error!(error = %err, "failed to parse input file");
            std::process::exit(1);
        }
    };

    if words.is_empty() {
        tracing::error!("input file produced zero successfully-ingested entries");
        std::process::exit(1);
    }

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::error!("DATABASE_URL is not set");
            std::process::exit(1);
        }
    };

    let pool = match sqlx::PgPool::connect(&database_url).await {
        Ok(pool) => pool,
        Err(err) => {
            tracing::error!(error = %err, "failed to connect to database");
            std::process::exit(1);
        }
    };
    let store = EntryStore::new(pool);

    let mut ingested = 0usize;
    let mut failed = 0usize;
    for word in &words {
        match store.upsert_word(word).await {
            Ok(()) => ingested += 1,
            Err(err) => {
                tracing::warn!(word_id = word.id, error = %err, "failed to upsert word");
                failed += 1;
            }
        }
    }

    tracing::info!(ingested, failed, total = words.len(), "ingestion complete");

    if ingested == 0 {
        std::process::exit(1);
    }
}
