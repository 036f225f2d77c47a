use crate::options::ListEngineOptions;
use crate::{
    Boundaries, CacheWindow, Direction, FetchRequest, FetchType, ListObserver, Orientation, Phase,
    RebuildError, RebuildOutcome, RebuildQueue, RebuildRequest, RebuildType, RecordProvider,
    Response, ScrollSetup, ScrollUpdate, Ticket, ViewportState,
};

/// How many times one rebuild is re-sent because the provider reported a different total.
const MAX_COUNT_RETRIES: u8 = 3;

#[derive(Clone, Copy, Debug)]
struct PendingFetch {
    ticket: Ticket,
    offset: usize,
}

/// A viewport-driven window manager for scrollable lists.
///
/// The engine never holds UI objects. It decides which records the list should show, asks its
/// [`RecordProvider`] for them, and once the consumer hands back the provider's [`Response`]
/// it lays out a page (the run of records that fits `viewport_size`), restores focus, and
/// reports scroll metadata to its [`ListObserver`].
///
/// Only one fetch is outstanding at a time. Rebuilds requested meanwhile wait in a
/// [`RebuildQueue`] and are replayed oldest-first after the page is rendered; a forced rebuild
/// supersedes the outstanding fetch, whose response is then dropped by ticket.
///
/// Pages are kept in ascending index order regardless of the scroll direction, so
/// `focus_index` is always relative to the page's first (top) record.
pub struct PagedListEngine<T, P, O = ()> {
    options: ListEngineOptions<T>,
    provider: P,
    observer: O,
    window: CacheWindow<T>,

    start_index: usize,
    current_page_size: usize,
    elements_count: usize,
    direction: Direction,
    /// Start index and direction of the page on screen.
    rendered: (usize, Direction),

    focus: Option<usize>,
    stored_focus: Option<usize>,
    focus_on_last_item: bool,

    queue: RebuildQueue,
    last_rebuild: RebuildRequest,
    last_ticket: Ticket,
    pending: Option<PendingFetch>,
    count_retries: u8,

    emptiness: Option<bool>,
    elements_above: Option<usize>,

    full_render_requested: bool,
    complete_data_requested: bool,
    pages_count: Option<usize>,
}

impl<T, P> PagedListEngine<T, P, ()>
where
    P: RecordProvider<T>,
{
    pub fn new(options: ListEngineOptions<T>, provider: P) -> Self {
        Self::with_observer(options, provider, ())
    }
}

impl<T, P, O> PagedListEngine<T, P, O>
where
    P: RecordProvider<T>,
    O: ListObserver,
{
    pub fn with_observer(options: ListEngineOptions<T>, provider: P, observer: O) -> Self {
        pdebug!(
            viewport_size = options.viewport_size,
            minimal_item_space = options.minimal_item_space,
            "PagedListEngine::new"
        );
        Self {
            options,
            provider,
            observer,
            window: CacheWindow::new(),
            start_index: 0,
            current_page_size: 0,
            elements_count: 0,
            direction: Direction::Bottom,
            rendered: (0, Direction::Bottom),
            focus: None,
            stored_focus: None,
            focus_on_last_item: false,
            queue: RebuildQueue::new(),
            last_rebuild: RebuildRequest::default(),
            last_ticket: Ticket::default(),
            pending: None,
            count_retries: 0,
            emptiness: None,
            elements_above: None,
            full_render_requested: false,
            complete_data_requested: false,
            pages_count: None,
        }
    }

    pub fn options(&self) -> &ListEngineOptions<T> {
        &self.options
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// The most recently fetched slice the current page is laid out from.
    pub fn window(&self) -> &CacheWindow<T> {
        &self.window
    }

    pub fn queue(&self) -> &RebuildQueue {
        &self.queue
    }

    pub fn last_rebuild(&self) -> RebuildRequest {
        self.last_rebuild
    }

    pub fn phase(&self) -> Phase {
        if self.pending.is_some() {
            Phase::FetchPending
        } else {
            Phase::Idle
        }
    }

    pub fn pending_ticket(&self) -> Option<Ticket> {
        self.pending.map(|p| p.ticket)
    }

    pub fn elements_count(&self) -> usize {
        self.elements_count
    }

    pub fn is_empty(&self) -> bool {
        self.elements_count == 0
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    pub fn current_page_size(&self) -> usize {
        self.current_page_size
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of pages found by the last full-list render.
    pub fn pages_count(&self) -> Option<usize> {
        self.pages_count
    }

    pub fn viewport_state(&self) -> ViewportState {
        ViewportState {
            start_index: self.start_index,
            current_page_size: self.current_page_size,
            direction: self.direction,
            boundary: self.options.boundaries,
            stored_focus_index: self.stored_focus,
        }
    }

    /// Records on the current page, top to bottom.
    pub fn page(&self) -> impl Iterator<Item = &T> + '_ {
        let start = self.start_index;
        (start..start + self.current_page_size).filter_map(move |i| self.window.get_global(i))
    }

    /// Page-relative index of the focused record.
    pub fn focus_index(&self) -> Option<usize> {
        self.focus
    }

    pub fn focused(&self) -> Option<&T> {
        self.focus
            .and_then(|i| self.window.get_global(self.start_index + i))
    }

    /// Moves focus within the current page. Returns `false` when `index` is not on the page.
    pub fn set_focus_index(&mut self, index: usize) -> bool {
        if index >= self.current_page_size {
            return false;
        }
        self.focus = Some(index);
        true
    }

    /// Number of records that fit in the viewport at their minimal size.
    pub fn max_items_on_page(&self) -> usize {
        self.options.max_items_on_page()
    }

    pub fn set_boundaries(&mut self, boundaries: Boundaries) {
        self.options.boundaries = boundaries;
    }

    /// Takes effect on the next rebuild.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.options.orientation = orientation;
    }

    pub fn set_fetch_type(&mut self, fetch_type: FetchType) {
        self.options.fetch_type = fetch_type;
    }

    /// Updates the viewport size, rebuilding in place when a page is displayed.
    pub fn set_viewport_size(&mut self, viewport_size: u32) {
        if self.options.viewport_size == viewport_size {
            return;
        }
        self.options.viewport_size = viewport_size;
        if self.current_page_size > 0 {
            self.rebuild_list(RebuildType::InPlace, 0, false);
        }
    }

    /// Paginates through the whole sequence once, before serving the next rebuild, to compute
    /// an exact page count.
    ///
    /// This fetches every record and costs O(n); use it only for short lists whose items vary
    /// in size.
    pub fn request_full_list_render(&mut self) {
        self.full_render_requested = true;
    }

    /// Requests a rebuild of the displayed page.
    ///
    /// While a fetch is outstanding the request is queued, unless `force` is set, in which case
    /// it supersedes the outstanding fetch. An `OnOffset` request past the last element is
    /// rejected without touching any state.
    pub fn rebuild_list(
        &mut self,
        rebuild_type: RebuildType,
        offset: usize,
        force: bool,
    ) -> RebuildOutcome {
        if self.pending.is_some() && !force {
            self.queue.push(rebuild_type, offset);
            return RebuildOutcome::Queued;
        }

        let count = self.provider.records_count();
        if rebuild_type == RebuildType::OnOffset && offset >= count {
            pwarn!(
                offset,
                elements_count = count,
                "PagedListEngine: rebuild offset out of range"
            );
            return RebuildOutcome::Rejected(RebuildError::OffsetOutOfRange {
                offset,
                elements_count: count,
            });
        }

        pdebug!(?rebuild_type, offset, force, count, "PagedListEngine::rebuild_list");
        // A superseded complete-data fetch restarts once this rebuild lands.
        self.complete_data_requested = false;
        self.set_elements_count(count);
        self.setup(rebuild_type, offset);

        // The last page may have been emptied by a deletion: show the one before it.
        if self.start_index != 0 && self.start_index == self.elements_count {
            if let Some(ticket) = self.previous_page_fetch() {
                return RebuildOutcome::Issued(ticket);
            }
        }

        let limit = self.calculate_limit(Direction::Bottom);
        RebuildOutcome::Issued(self.fetch(self.start_index, limit))
    }

    /// Re-issues the last executed rebuild, superseding any outstanding fetch.
    pub fn resend_last_rebuild(&mut self) -> RebuildOutcome {
        let last = self.last_rebuild;
        self.rebuild_list(last.rebuild_type, last.offset, true)
    }

    /// Requests the page after the current one.
    ///
    /// Returns `false` without fetching when a fetch is outstanding or when the end of a
    /// `Fixed` list is reached; a `Continuous` list wraps to the first page.
    pub fn request_next_page(&mut self) -> bool {
        if self.pending.is_some() {
            return false;
        }

        let end = self.start_index + self.current_page_size;
        if end >= self.elements_count {
            match self.options.boundaries {
                Boundaries::Fixed => return false,
                Boundaries::Continuous => self.start_index = 0,
            }
        } else {
            self.start_index = end;
        }

        self.direction = Direction::Bottom;
        self.stored_focus = None;
        let limit = self.calculate_limit(Direction::Bottom);
        self.fetch(self.start_index, limit);
        true
    }

    /// Requests the page before the current one.
    ///
    /// Returns `false` without fetching when a fetch is outstanding or when the head of a
    /// `Fixed` list is reached; a `Continuous` list wraps to its last page.
    pub fn request_previous_page(&mut self) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.previous_page_fetch().is_some()
    }

    /// Delivers a provider response. Returns `true` when the response was consumed.
    ///
    /// Responses that do not carry the outstanding ticket are dropped. A malformed response
    /// keeps the current page and its start index, then serves the rebuild queue. When the
    /// provider reports a total different from the engine's element count, the count is
    /// refreshed and the last rebuild is retried (up to three times) instead of laying out a
    /// stale page.
    pub fn on_response(&mut self, response: Response<T>) -> bool {
        let Some(pending) = self.pending else {
            pdebug!(ticket = response.ticket.0, "PagedListEngine: no fetch outstanding");
            return false;
        };
        if response.ticket != pending.ticket {
            pdebug!(
                ticket = response.ticket.0,
                expected = pending.ticket.0,
                "PagedListEngine: dropping stale response"
            );
            return false;
        }
        self.pending = None;

        let Some(page) = response.page else {
            pwarn!(ticket = pending.ticket.0, "PagedListEngine: malformed response");
            (self.start_index, self.direction) = self.rendered;
            self.complete_data_requested = false;
            self.replay_queued();
            return false;
        };

        if self.complete_data_requested {
            self.window
                .replace(pending.offset, page.records, page.total_count);
            self.finish_full_list_render();
            return true;
        }

        if page.total_count != self.elements_count {
            if self.count_retries < MAX_COUNT_RETRIES {
                pdebug!(
                    total = page.total_count,
                    elements_count = self.elements_count,
                    "PagedListEngine: total changed, retrying rebuild"
                );
                self.count_retries += 1;
                self.set_elements_count(page.total_count);
                if !self.resend_last_rebuild().is_issued() {
                    // The retried offset no longer exists.
                    self.rebuild_list(RebuildType::Full, 0, true);
                }
                return false;
            }
            self.set_elements_count(page.total_count);
        }
        self.count_retries = 0;

        if self.full_render_requested && self.elements_count != 0 {
            self.complete_data_requested = true;
            self.fetch(0, self.elements_count);
            return true;
        }

        self.window
            .replace(pending.offset, page.records, page.total_count);
        self.refresh();
        true
    }

    /// Stores the focused position and drops the page.
    pub fn on_close(&mut self) {
        if self.current_page_size > 0 {
            self.stored_focus = self.focus;
        }
        self.clear();
    }

    /// Drops the page and window and moves back to the first (or last) element.
    pub fn reset(&mut self) {
        self.clear();
        self.reset_start_index();
        self.direction = Direction::Bottom;
    }

    /// Drops the displayed page and the fetched window. Queued rebuilds and the outstanding
    /// fetch are kept.
    pub fn clear(&mut self) {
        self.window.clear();
        self.current_page_size = 0;
        self.focus = None;
    }

    fn set_elements_count(&mut self, count: usize) {
        self.elements_count = count;

        let empty = count == 0;
        if self.emptiness == Some(empty) {
            return;
        }
        self.emptiness = Some(empty);
        if empty {
            self.observer.on_empty_list();
        } else {
            self.observer.on_not_empty_list();
        }
    }

    fn reset_start_index(&mut self) {
        self.start_index = match self.options.orientation {
            Orientation::TopBottom => 0,
            Orientation::BottomTop => self.elements_count,
        };
    }

    fn setup(&mut self, rebuild_type: RebuildType, offset: usize) {
        match rebuild_type {
            RebuildType::Full => {
                self.reset_start_index();
                self.stored_focus = None;
            }
            RebuildType::OnOffset => {
                self.start_index = offset;
                self.stored_focus = None;
            }
            RebuildType::InPlace => {
                if self.current_page_size > 0 {
                    self.stored_focus = self.focus;
                }
            }
            RebuildType::OnPageElement => {
                let max = self.max_items_on_page().max(1);
                self.start_index = (offset / max) * max;
                self.stored_focus = Some(offset % max);
            }
        }

        self.start_index = self.start_index.min(self.elements_count);
        self.last_rebuild = RebuildRequest::new(rebuild_type, offset);
        self.direction = Direction::Bottom;
    }

    fn previous_page_fetch(&mut self) -> Option<Ticket> {
        let (offset, limit) = if self.start_index == 0 {
            if self.options.boundaries == Boundaries::Fixed {
                return None;
            }
            self.start_index = self.elements_count;
            match self.options.fetch_type {
                FetchType::Fixed => {
                    let limit = self.calculate_limit(Direction::Top);
                    (self.elements_count - limit, limit)
                }
                FetchType::BestFit => {
                    let max = self.max_items_on_page().max(1);
                    let tail = match self.elements_count % max {
                        0 => max.min(self.elements_count),
                        rem => rem,
                    };
                    (self.elements_count - tail, tail)
                }
            }
        } else {
            let limit = self.calculate_limit(Direction::Top);
            (self.start_index - limit, limit)
        };

        self.direction = Direction::Top;
        self.stored_focus = None;
        Some(self.fetch(offset, limit))
    }

    /// Records to request so the next scroll step is already staged: twice the current page,
    /// or a full viewport at minimal item size if that is larger, never crossing either end.
    fn calculate_limit(&self, direction: Direction) -> usize {
        let min_limit = (2 * self.current_page_size).max(self.max_items_on_page());
        match direction {
            Direction::Bottom => {
                if min_limit + self.start_index <= self.elements_count {
                    min_limit
                } else {
                    self.elements_count.saturating_sub(self.start_index)
                }
            }
            Direction::Top => min_limit.min(self.start_index),
        }
    }

    fn fetch(&mut self, offset: usize, limit: usize) -> Ticket {
        let ticket = self.last_ticket.next();
        self.last_ticket = ticket;
        self.pending = Some(PendingFetch { ticket, offset });
        ptrace!(ticket = ticket.0, offset, limit, "PagedListEngine::fetch");
        self.provider.request_records(FetchRequest {
            ticket,
            offset,
            limit,
        });
        ticket
    }

    /// Number of window records, starting at `start`, that fit in the viewport.
    fn fit_forward(&self, start: usize) -> (usize, u32) {
        let viewport = self.options.viewport_size;
        let mut used = 0u32;
        let mut n = 0usize;
        while let Some(record) = self.window.get_global(start + n) {
            let next = used.saturating_add(self.options.size_of(record));
            if next > viewport {
                break;
            }
            used = next;
            n += 1;
        }
        (n, used)
    }

    /// Number of window records, ending just before `end`, that fit in the viewport.
    fn fit_backward(&self, end: usize) -> (usize, u32) {
        let viewport = self.options.viewport_size;
        let mut used = 0u32;
        let mut n = 0usize;
        while n < end {
            let Some(record) = self.window.get_global(end - n - 1) else {
                break;
            };
            let next = used.saturating_add(self.options.size_of(record));
            if next > viewport {
                break;
            }
            used = next;
            n += 1;
        }
        (n, used)
    }

    fn add_items_on_page(&mut self) -> u32 {
        match self.direction {
            Direction::Bottom => {
                let (n, used) = self.fit_forward(self.start_index);
                self.current_page_size = n;
                used
            }
            Direction::Top => {
                let (n, used) = self.fit_backward(self.start_index);
                self.current_page_size = n;
                self.start_index -= n;
                used
            }
        }
    }

    fn set_focus(&mut self) {
        let len = self.current_page_size;
        if len == 0 {
            self.focus = None;
            self.focus_on_last_item = false;
            return;
        }

        let last = len - 1;
        let mut focus = match self.stored_focus {
            Some(index) if index < len => index,
            Some(_) => last,
            None => match self.direction {
                Direction::Bottom => 0,
                Direction::Top => last,
            },
        };
        if self.focus_on_last_item {
            focus = last;
            self.focus_on_last_item = false;
        }
        self.focus = Some(focus);
    }

    fn scroll_update(&self) -> ScrollUpdate {
        ScrollUpdate {
            start_index: self.start_index,
            page_size: self.current_page_size,
            elements_count: self.elements_count,
            element_minimal_space: self.options.minimal_item_space,
            max_items_on_page: self.max_items_on_page(),
            direction: self.direction,
            boundaries: self.options.boundaries,
        }
    }

    fn refresh(&mut self) {
        let used = self.add_items_on_page();
        self.rendered = (self.start_index, self.direction);
        self.set_focus();
        ptrace!(
            start_index = self.start_index,
            page_size = self.current_page_size,
            elements_count = self.elements_count,
            "PagedListEngine::refresh"
        );

        let update = self.scroll_update();
        self.observer.on_scroll_update(update);
        if self.elements_above != Some(self.start_index) {
            self.elements_above = Some(self.start_index);
            self.observer
                .on_elements_above_current_page_changed(self.start_index);
        }

        if !self.replay_queued() {
            self.fill_first_page(used);
        }
    }

    /// Starts the oldest queued rebuild that is still valid, if any.
    fn replay_queued(&mut self) -> bool {
        while let Some(next) = self.queue.pop() {
            if self.rebuild_list(next.rebuild_type, next.offset, false).is_issued() {
                return true;
            }
        }
        false
    }

    /// Refills a first (or, for `BottomTop`, last) page that was reached by scrolling and came
    /// out only partially filled.
    fn fill_first_page(&mut self, used: u32) {
        let space_left = self.options.viewport_size.saturating_sub(used);
        if space_left <= self.options.minimal_item_space
            || self.current_page_size >= self.elements_count
        {
            return;
        }

        let at_edge = match self.options.orientation {
            Orientation::TopBottom => self.direction == Direction::Top && self.start_index == 0,
            Orientation::BottomTop => {
                self.direction == Direction::Bottom
                    && self.start_index + self.current_page_size == self.elements_count
            }
        };
        if at_edge {
            self.focus_on_last_item = true;
            self.rebuild_list(RebuildType::Full, 0, false);
        }
    }

    fn finish_full_list_render(&mut self) {
        let mut page = 0usize;
        let mut page_start = 0usize;
        loop {
            let (n, _) = self.fit_forward(page_start);
            if n == 0 || page_start + n >= self.elements_count {
                break;
            }
            page += 1;
            page_start += n;
        }

        self.window.clear();
        self.complete_data_requested = false;
        self.full_render_requested = false;
        self.pages_count = Some(page + 1);
        pdebug!(pages = page + 1, "PagedListEngine: full list rendered");

        if self.last_rebuild.rebuild_type == RebuildType::Full {
            let current_page = match self.options.orientation {
                Orientation::TopBottom => 0,
                Orientation::BottomTop => page,
            };
            self.observer.on_scroll_setup(ScrollSetup {
                stored_start_index: self.start_index,
                current_page,
                pages_count: page + 1,
            });
        }

        self.resend_last_rebuild();
    }
}

impl<T, P, O> core::fmt::Debug for PagedListEngine<T, P, O>
where
    T: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PagedListEngine")
            .field("options", &self.options)
            .field("start_index", &self.start_index)
            .field("current_page_size", &self.current_page_size)
            .field("elements_count", &self.elements_count)
            .field("direction", &self.direction)
            .field("focus", &self.focus)
            .field("stored_focus", &self.stored_focus)
            .field("queue", &self.queue)
            .field("pending", &self.pending)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}
