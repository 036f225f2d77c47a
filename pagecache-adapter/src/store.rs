use alloc::collections::VecDeque;
use alloc::vec::Vec;

use pagecache::{FetchRequest, RecordProvider, Response};

/// Request counters kept by a [`MemoryStore`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoreStats {
    /// Requests received from a cache.
    pub requested: u64,
    /// Requests answered with records.
    pub served: u64,
    /// Requests answered with a malformed response.
    pub failed: u64,
}

/// An in-memory [`RecordProvider`] that answers requests on demand.
///
/// Requests are queued as they arrive and only answered when the driver calls
/// [`MemoryStore::next_response`], which slices the records as they are *at that moment*. This
/// lets callers mutate the store between a request and its answer, the way a real database
/// changes underneath an in-flight query.
#[derive(Clone, Debug)]
pub struct MemoryStore<T> {
    records: Vec<T>,
    requests: VecDeque<FetchRequest>,
    fail_next: usize,
    stats: StoreStats,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> MemoryStore<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records,
            requests: VecDeque::new(),
            fail_next: 0,
            stats: StoreStats::default(),
        }
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Direct access to the backing records. Caches see changes on their next rebuild.
    pub fn records_mut(&mut self) -> &mut Vec<T> {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: T) {
        self.records.push(record);
    }

    /// Inserts `record` at `index`, clamped to the current length.
    pub fn insert(&mut self, index: usize, record: T) {
        let index = index.min(self.records.len());
        self.records.insert(index, record);
    }

    pub fn remove(&mut self, index: usize) -> Option<T> {
        (index < self.records.len()).then(|| self.records.remove(index))
    }

    /// Requests received but not answered yet, oldest first.
    pub fn pending_requests(&self) -> impl Iterator<Item = &FetchRequest> {
        self.requests.iter()
    }

    pub fn has_pending(&self) -> bool {
        !self.requests.is_empty()
    }

    /// Answers the next `n` requests with malformed responses.
    pub fn fail_next(&mut self, n: usize) {
        self.fail_next = n;
    }

    pub fn stats(&self) -> StoreStats {
        self.stats
    }

    /// Drops every unanswered request.
    pub fn discard_pending(&mut self) {
        self.requests.clear();
    }
}

impl<T: Clone> MemoryStore<T> {
    /// Answers the oldest pending request.
    pub fn next_response(&mut self) -> Option<Response<T>> {
        let request = self.requests.pop_front()?;
        if self.fail_next > 0 {
            self.fail_next -= 1;
            self.stats.failed += 1;
            return Some(Response::malformed(request.ticket));
        }

        let len = self.records.len();
        let end = request.end().min(len);
        let start = request.offset.min(end);
        self.stats.served += 1;
        Some(Response::new(
            request.ticket,
            self.records[start..end].to_vec(),
            len,
        ))
    }
}

impl<T> FromIterator<T> for MemoryStore<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T> RecordProvider<T> for MemoryStore<T> {
    fn records_count(&self) -> usize {
        self.records.len()
    }

    fn request_records(&mut self, request: FetchRequest) {
        self.stats.requested += 1;
        self.requests.push_back(request);
    }
}
