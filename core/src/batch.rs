use rayon::prelude::*;

use crate::document::Document;
use crate::error::Result;
use crate::server::SearchServer;

/// Answer a batch of queries in parallel, one result list per query, in
/// input order. The first query error fails the whole batch.
pub fn process_queries(server: &SearchServer, queries: &[String]) -> Result<Vec<Vec<Document>>> {
    queries
        .par_iter()
        .map(|raw_query| server.find_top_documents(raw_query))
        .collect()
}

/// [`process_queries`] flattened into a single result list.
pub fn process_queries_joined(server: &SearchServer, queries: &[String]) -> Result<Vec<Document>> {
    Ok(process_queries(server, queries)?.into_iter().flatten().collect())
}
