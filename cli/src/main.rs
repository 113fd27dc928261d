use anyhow::{Context, Result};
use clap::Parser;
use core::{
    remove_duplicates, DocumentStatus, ExecutionPolicy, SearchServer, StopWords,
    DEFAULT_RESULT_LIMIT,
};
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use std::fs::File;
use std::io::{BufRead, BufReader};

#[derive(Parser)]
#[command(name = "search-cli")]
#[command(about = "Query an in-memory TF-IDF index built from JSONL documents", long_about = None)]
struct Args {
    /// JSONL file with one document per line: {"id", "text", "status", "ratings"}
    #[arg(long)]
    docs: String,
    /// Space-separated stop words excluded from indexing and queries
    #[arg(long, default_value = "")]
    stop_words: String,
    /// Maximum number of results per query
    #[arg(long, default_value_t = DEFAULT_RESULT_LIMIT)]
    limit: usize,
    /// Fan retrieval out over the rayon thread pool
    #[arg(long, default_value_t = false)]
    parallel: bool,
    /// Drop documents whose word sets duplicate an earlier document
    #[arg(long, default_value_t = false)]
    dedup: bool,
    /// Queries to answer, e.g. "white cat -dog"
    #[arg(required = true)]
    queries: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: i32,
    text: String,
    #[serde(default = "default_status")]
    status: DocumentStatus,
    #[serde(default)]
    ratings: Vec<i32>,
}

fn default_status() -> DocumentStatus {
    DocumentStatus::Actual
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let stop_words = StopWords::from_text(&args.stop_words)?;
    let mut server = SearchServer::new(stop_words);

    let file = File::open(&args.docs).with_context(|| format!("opening {}", args.docs))?;
    for (line_number, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let doc: InputDoc = serde_json::from_str(&line)
            .with_context(|| format!("parsing {}:{}", args.docs, line_number + 1))?;
        server
            .add_document(doc.id, &doc.text, doc.status, &doc.ratings)
            .with_context(|| format!("indexing document {}", doc.id))?;
    }
    tracing::info!(documents = server.document_count(), "index built");

    if args.dedup {
        let removed = remove_duplicates(&mut server);
        tracing::info!(removed = removed.len(), "duplicates dropped");
    }

    let policy = if args.parallel {
        ExecutionPolicy::Parallel
    } else {
        ExecutionPolicy::Sequential
    };
    for query in &args.queries {
        let found = server
            .find_top_documents_by(policy, query, args.limit, |_, status, _| {
                status == DocumentStatus::Actual
            })
            .with_context(|| format!("query {query:?}"))?;
        println!("{query}:");
        if found.is_empty() {
            println!("  no matching documents");
            continue;
        }
        for doc in found {
            println!(
                "  id={} relevance={:.6} rating={}",
                doc.id, doc.relevance, doc.rating
            );
        }
    }
    Ok(())
}
