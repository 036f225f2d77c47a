use alloc::vec::Vec;

use pagecache::{ListEngineOptions, ListObserver, PagedListEngine, RebuildOutcome, RebuildType};

use crate::MemoryStore;

/// Delivers every pending store response to `engine` until it is idle.
///
/// Returns the number of responses delivered.
pub fn pump_list<T, O>(engine: &mut PagedListEngine<T, MemoryStore<T>, O>) -> usize
where
    T: Clone,
    O: ListObserver,
{
    let mut delivered = 0;
    while let Some(response) = engine.provider_mut().next_response() {
        engine.on_response(response);
        delivered += 1;
    }
    delivered
}

/// A synchronous driver around a [`PagedListEngine`] backed by a [`MemoryStore`].
///
/// Every operation issues its request and then pumps the store, so callers observe the settled
/// page right away. Store mutations go through the controller so the displayed page is rebuilt
/// in place afterwards.
#[derive(Debug)]
pub struct ListController<T, O = ()> {
    engine: PagedListEngine<T, MemoryStore<T>, O>,
}

impl<T: Clone> ListController<T, ()> {
    pub fn new(options: ListEngineOptions<T>, store: MemoryStore<T>) -> Self {
        Self::from_engine(PagedListEngine::new(options, store))
    }
}

impl<T: Clone, O: ListObserver> ListController<T, O> {
    pub fn with_observer(options: ListEngineOptions<T>, store: MemoryStore<T>, observer: O) -> Self {
        Self::from_engine(PagedListEngine::with_observer(options, store, observer))
    }

    pub fn from_engine(engine: PagedListEngine<T, MemoryStore<T>, O>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &PagedListEngine<T, MemoryStore<T>, O> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut PagedListEngine<T, MemoryStore<T>, O> {
        &mut self.engine
    }

    pub fn into_engine(self) -> PagedListEngine<T, MemoryStore<T>, O> {
        self.engine
    }

    pub fn store(&self) -> &MemoryStore<T> {
        self.engine.provider()
    }

    pub fn observer(&self) -> &O {
        self.engine.observer()
    }

    /// Records on the settled page, top to bottom.
    pub fn page(&self) -> Vec<T> {
        self.engine.page().cloned().collect()
    }

    pub fn focused(&self) -> Option<&T> {
        self.engine.focused()
    }

    pub fn pump(&mut self) -> usize {
        pump_list(&mut self.engine)
    }

    pub fn rebuild(&mut self, rebuild_type: RebuildType, offset: usize) -> RebuildOutcome {
        let outcome = self.engine.rebuild_list(rebuild_type, offset, false);
        self.pump();
        outcome
    }

    pub fn next_page(&mut self) -> bool {
        let moved = self.engine.request_next_page();
        self.pump();
        moved
    }

    pub fn previous_page(&mut self) -> bool {
        let moved = self.engine.request_previous_page();
        self.pump();
        moved
    }

    pub fn on_viewport_size(&mut self, viewport_size: u32) {
        self.engine.set_viewport_size(viewport_size);
        self.pump();
    }

    /// Applies `f` to the backing records, then rebuilds the displayed page in place.
    ///
    /// An empty list has no page to preserve and is rebuilt from scratch instead.
    pub fn mutate<R>(&mut self, f: impl FnOnce(&mut MemoryStore<T>) -> R) -> R {
        let result = f(self.engine.provider_mut());
        let rebuild_type = if self.engine.current_page_size() > 0 {
            RebuildType::InPlace
        } else {
            RebuildType::Full
        };
        pdebug!(
            ?rebuild_type,
            records = self.engine.provider().len(),
            "ListController: store mutated"
        );
        self.rebuild(rebuild_type, 0);
        result
    }

    pub fn insert(&mut self, index: usize, record: T) {
        self.mutate(|store| store.insert(index, record));
    }

    pub fn remove(&mut self, index: usize) -> Option<T> {
        self.mutate(|store| store.remove(index))
    }
}
