use crate::options::SlidingCacheOptions;
use crate::{CacheWindow, FetchRequest, RecordKey, RecordProvider, Response, Step, Ticket};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FetchKind {
    Replace,
    Append,
    Prepend,
}

#[derive(Clone, Copy, Debug)]
struct PendingFetch {
    ticket: Ticket,
    offset: usize,
    limit: usize,
    kind: FetchKind,
}

/// What a [`FixedSlidingCache::refresh`] decided to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshAction {
    /// The key sits comfortably inside the window; nothing was fetched.
    Settled,
    /// The key is not in the window; a whole new window was requested.
    Reload(Ticket),
    /// The key is near the tail; records after the window were requested.
    SlideBack(Ticket),
    /// The key is near the head; records before the window were requested.
    SlideFront(Ticket),
    /// A fetch is outstanding; the refresh runs again once it resolves.
    Deferred,
}

impl RefreshAction {
    pub fn ticket(&self) -> Option<Ticket> {
        match self {
            Self::Reload(t) | Self::SlideBack(t) | Self::SlideFront(t) => Some(*t),
            Self::Settled | Self::Deferred => None,
        }
    }
}

/// A capacity-bounded window kept around a "current" record.
///
/// Neighbor lookups are answered from the window alone. `refresh` keeps the window positioned:
/// it slides by `edge_threshold` records when the current record drifts near an edge and
/// reloads the whole window when the record is not cached at all. The threshold gives the
/// window hysteresis, so stepping back and forth near an edge does not refetch every time.
///
/// At most one fetch is outstanding. A `refresh` issued meanwhile is deferred (the latest key
/// wins) and re-evaluated after the outstanding response is handled.
pub struct FixedSlidingCache<T, K, P> {
    options: SlidingCacheOptions<T, K>,
    capacity: usize,
    edge_threshold: usize,
    provider: P,
    window: CacheWindow<T>,
    last_ticket: Ticket,
    pending: Option<PendingFetch>,
    deferred: Option<K>,
}

impl<T, K, P> FixedSlidingCache<T, K, P>
where
    K: RecordKey,
    P: RecordProvider<T>,
{
    pub fn new(options: SlidingCacheOptions<T, K>, provider: P) -> Self {
        let (capacity, edge_threshold) = options.normalized();
        pdebug!(capacity, edge_threshold, "FixedSlidingCache::new");
        Self {
            options,
            capacity,
            edge_threshold,
            provider,
            window: CacheWindow::new(),
            last_ticket: Ticket::default(),
            pending: None,
            deferred: None,
        }
    }

    pub fn options(&self) -> &SlidingCacheOptions<T, K> {
        &self.options
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn edge_threshold(&self) -> usize {
        self.edge_threshold
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn window(&self) -> &CacheWindow<T> {
        &self.window
    }

    pub fn is_fetching(&self) -> bool {
        self.pending.is_some()
    }

    /// Ticket of the outstanding fetch, if any.
    pub fn pending_ticket(&self) -> Option<Ticket> {
        self.pending.map(|p| p.ticket)
    }

    /// Requests the first `capacity` records, replacing the whole window once they arrive.
    ///
    /// Supersedes any outstanding fetch.
    pub fn initialize(&mut self) -> Ticket {
        self.deferred = None;
        self.fetch(FetchKind::Replace, 0, self.capacity)
    }

    /// Drops the window. An outstanding fetch is forgotten and its response ignored.
    pub fn clear(&mut self) {
        self.window.clear();
        self.pending = None;
        self.deferred = None;
    }

    /// Window-relative index of the record with `key`.
    pub fn index_of(&self, key: &K) -> Option<usize> {
        let get_key = &self.options.get_key;
        self.window.position(|record| get_key(record) == *key)
    }

    pub fn lookup(&self, key: &K) -> Option<&T> {
        self.index_of(key).and_then(|i| self.window.get(i))
    }

    /// Key of the record adjacent to `key`, answered from the window only.
    ///
    /// Returns `None` when `key` is not cached or its neighbor lies outside the window; call
    /// [`Self::refresh`] first when membership is uncertain.
    pub fn neighbor(&self, key: &K, step: Step) -> Option<K> {
        let index = self.index_of(key)?;
        let neighbor = match step {
            Step::Next => index.checked_add(1)?,
            Step::Previous => index.checked_sub(1)?,
        };
        self.window
            .get(neighbor)
            .map(|record| (self.options.get_key)(record))
    }

    /// Repositions the window around `key`.
    pub fn refresh(&mut self, key: K) -> RefreshAction {
        if self.pending.is_some() {
            ptrace!("FixedSlidingCache::refresh deferred");
            self.deferred = Some(key);
            return RefreshAction::Deferred;
        }

        let Some(index) = self.index_of(&key) else {
            let offset = self.reload_offset();
            pdebug!(offset, "FixedSlidingCache: key not cached, reloading");
            return RefreshAction::Reload(self.fetch(FetchKind::Replace, offset, self.capacity));
        };

        let len = self.window.len();
        if index + self.edge_threshold >= len && self.window.end() < self.window.total_count() {
            let offset = self.window.end();
            let ticket = self.fetch(FetchKind::Append, offset, self.edge_threshold);
            return RefreshAction::SlideBack(ticket);
        }

        if index < self.edge_threshold && self.window.offset() > 0 {
            let start = self.window.offset().saturating_sub(self.edge_threshold);
            let limit = self.window.offset() - start;
            let ticket = self.fetch(FetchKind::Prepend, start, limit);
            return RefreshAction::SlideFront(ticket);
        }

        RefreshAction::Settled
    }

    /// Applies a provider response. Returns `true` when the window was updated.
    ///
    /// Responses for anything but the outstanding fetch are ignored, as are malformed ones and
    /// ones carrying more records than were requested; in every case the current window is kept.
    pub fn on_response(&mut self, response: Response<T>) -> bool {
        let Some(pending) = self.pending else {
            pdebug!(ticket = response.ticket.0, "FixedSlidingCache: no fetch outstanding");
            return false;
        };
        if response.ticket != pending.ticket {
            pdebug!(
                ticket = response.ticket.0,
                expected = pending.ticket.0,
                "FixedSlidingCache: dropping stale response"
            );
            return false;
        }
        self.pending = None;

        let applied = match response.page {
            None => {
                pwarn!(ticket = pending.ticket.0, "FixedSlidingCache: malformed response");
                false
            }
            Some(page) if page.records.len() > pending.limit => {
                pwarn!(
                    ticket = pending.ticket.0,
                    len = page.records.len(),
                    limit = pending.limit,
                    "FixedSlidingCache: response larger than requested"
                );
                false
            }
            Some(page) => {
                match pending.kind {
                    FetchKind::Replace => {
                        self.window
                            .replace(pending.offset, page.records, page.total_count);
                    }
                    FetchKind::Append => {
                        self.window
                            .push_back_evicting(page.records, self.capacity, page.total_count);
                    }
                    FetchKind::Prepend => {
                        // A short page still has to end where the window starts.
                        let offset = self.window.offset().saturating_sub(page.records.len());
                        self.window.push_front_evicting(
                            offset,
                            page.records,
                            self.capacity,
                            page.total_count,
                        );
                    }
                }
                ptrace!(
                    offset = self.window.offset(),
                    len = self.window.len(),
                    total = self.window.total_count(),
                    "FixedSlidingCache: window updated"
                );
                true
            }
        };

        if let Some(key) = self.deferred.take() {
            self.refresh(key);
        }
        applied
    }

    fn reload_offset(&self) -> usize {
        reload_offset(
            self.window.offset(),
            self.window.total_count(),
            self.capacity,
            self.edge_threshold,
        )
    }

    fn fetch(&mut self, kind: FetchKind, offset: usize, limit: usize) -> Ticket {
        let ticket = self.last_ticket.next();
        self.last_ticket = ticket;
        self.pending = Some(PendingFetch {
            ticket,
            offset,
            limit,
            kind,
        });
        ptrace!(ticket = ticket.0, offset, limit, ?kind, "FixedSlidingCache::fetch");
        self.provider.request_records(FetchRequest {
            ticket,
            offset,
            limit,
        });
        ticket
    }
}

impl<T, K, P: core::fmt::Debug> core::fmt::Debug for FixedSlidingCache<T, K, P>
where
    T: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FixedSlidingCache")
            .field("capacity", &self.capacity)
            .field("edge_threshold", &self.edge_threshold)
            .field("window", &self.window)
            .field("pending", &self.pending)
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

/// Start of a full reload, derived from where the previous window sat.
///
/// Requires `edge_threshold < capacity`.
pub(crate) fn reload_offset(
    offset: usize,
    total: usize,
    capacity: usize,
    edge_threshold: usize,
) -> usize {
    if total < capacity || offset < edge_threshold {
        0
    } else if offset > total - (capacity - edge_threshold) {
        total - capacity
    } else {
        offset - edge_threshold
    }
}
