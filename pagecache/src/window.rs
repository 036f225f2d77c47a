use alloc::collections::VecDeque;
use alloc::vec::Vec;

/// The materialized slice of a backing sequence.
///
/// `offset` is the global index of the first item and `total_count` is the provider's
/// best-known size of the whole sequence. Every mutation keeps
/// `offset + len() <= total_count`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheWindow<T> {
    items: VecDeque<T>,
    offset: usize,
    total_count: usize,
}

impl<T> Default for CacheWindow<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CacheWindow<T> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
            offset: 0,
            total_count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// One past the global index of the last item.
    pub fn end(&self) -> usize {
        self.offset + self.items.len()
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Item at a window-relative index.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Item at a global sequence index, if it is currently materialized.
    pub fn get_global(&self, index: usize) -> Option<&T> {
        index
            .checked_sub(self.offset)
            .and_then(|local| self.items.get(local))
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    /// Window-relative index of the first item matching `pred`.
    pub fn position(&self, mut pred: impl FnMut(&T) -> bool) -> Option<usize> {
        self.items.iter().position(|item| pred(item))
    }

    /// Replaces the whole window with a freshly fetched slice.
    pub fn replace(&mut self, offset: usize, records: Vec<T>, total_count: usize) {
        self.items.clear();
        self.items.extend(records);
        self.offset = offset;
        self.set_total_count(total_count);
    }

    /// Appends `records` at the tail, then evicts from the head until at most `capacity` items
    /// remain. Returns the number of evicted items.
    pub fn push_back_evicting(
        &mut self,
        records: Vec<T>,
        capacity: usize,
        total_count: usize,
    ) -> usize {
        self.items.extend(records);
        let mut evicted = 0;
        while self.items.len() > capacity {
            self.items.pop_front();
            evicted += 1;
        }
        self.offset += evicted;
        self.set_total_count(total_count);
        evicted
    }

    /// Prepends `records` (which start at global index `offset`), then evicts from the tail until
    /// at most `capacity` items remain. Returns the number of evicted items.
    ///
    /// `records` must end exactly where the current window starts.
    pub fn push_front_evicting(
        &mut self,
        offset: usize,
        records: Vec<T>,
        capacity: usize,
        total_count: usize,
    ) -> usize {
        debug_assert!(
            self.items.is_empty() || offset + records.len() == self.offset,
            "prepended slice must be contiguous with the window head"
        );
        for record in records.into_iter().rev() {
            self.items.push_front(record);
        }
        let mut evicted = 0;
        while self.items.len() > capacity {
            self.items.pop_back();
            evicted += 1;
        }
        self.offset = offset;
        self.set_total_count(total_count);
        evicted
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.offset = 0;
        self.total_count = 0;
    }

    fn set_total_count(&mut self, total_count: usize) {
        let end = self.end();
        if total_count < end {
            pwarn!(
                total_count,
                end,
                "CacheWindow: provider total is smaller than the delivered slice"
            );
        }
        self.total_count = total_count.max(end);
    }
}
