use std::collections::VecDeque;

use crate::document::{Document, DocumentStatus};
use crate::error::Result;
use crate::server::SearchServer;

const MINUTES_IN_DAY: u64 = 1440;

/// Sliding-window statistics over search requests.
///
/// Each `add_find_request*` call counts as one minute of wall time; entries
/// older than a day fall out of the window. The queue only reads from the
/// server, so it borrows it for its own lifetime.
pub struct RequestQueue<'a> {
    server: &'a SearchServer,
    requests: VecDeque<QueryResult>,
    current_time: u64,
    no_result_requests: usize,
}

struct QueryResult {
    result_count: usize,
    timestamp: u64,
}

impl<'a> RequestQueue<'a> {
    pub fn new(server: &'a SearchServer) -> Self {
        Self {
            server,
            requests: VecDeque::new(),
            current_time: 0,
            no_result_requests: 0,
        }
    }

    /// Run [`SearchServer::find_top_documents`] and record the outcome.
    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        let result = self.server.find_top_documents(raw_query)?;
        self.record(result.len());
        Ok(result)
    }

    /// Status-filtered variant of [`Self::add_find_request`].
    pub fn add_find_request_with_status(
        &mut self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        let result = self.server.find_top_documents_with_status(raw_query, status)?;
        self.record(result.len());
        Ok(result)
    }

    /// How many requests in the last day returned no documents.
    pub fn no_result_requests(&self) -> usize {
        self.no_result_requests
    }

    fn record(&mut self, result_count: usize) {
        self.current_time += 1;
        while let Some(oldest) = self.requests.front() {
            if self.current_time - oldest.timestamp < MINUTES_IN_DAY {
                break;
            }
            if oldest.result_count == 0 {
                self.no_result_requests -= 1;
            }
            self.requests.pop_front();
        }
        if result_count == 0 {
            self.no_result_requests += 1;
        }
        self.requests.push_back(QueryResult {
            result_count,
            timestamp: self.current_time,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stop_words::StopWords;

    #[test]
    fn expired_empty_requests_leave_the_window() {
        let mut server = SearchServer::new(StopWords::from_text("and in at").unwrap());
        server
            .add_document(1, "curly cat curly tail", DocumentStatus::Actual, &[7, 2, 7])
            .unwrap();

        let mut queue = RequestQueue::new(&server);
        for _ in 0..1439 {
            queue.add_find_request("empty request").unwrap();
        }
        assert_eq!(queue.no_result_requests(), 1439);

        // Minute 1440: still inside the first day's window.
        queue.add_find_request("curly dog").unwrap();
        assert_eq!(queue.no_result_requests(), 1439);

        // Minute 1441: the first empty request expires.
        queue.add_find_request("big collar").unwrap();
        assert_eq!(queue.no_result_requests(), 1439);

        // A request with results pushes another empty one out.
        queue.add_find_request("curly cat").unwrap();
        assert_eq!(queue.no_result_requests(), 1438);
    }
}
