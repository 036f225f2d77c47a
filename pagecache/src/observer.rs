use alloc::vec::Vec;

use crate::{Boundaries, Direction};

/// Scroll metadata published after every rendered page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollUpdate {
    pub start_index: usize,
    pub page_size: usize,
    pub elements_count: usize,
    pub element_minimal_space: u32,
    /// Number of elements that fit in the viewport at their minimal size.
    pub max_items_on_page: usize,
    pub direction: Direction,
    pub boundaries: Boundaries,
}

impl ScrollUpdate {
    /// Whether a "more data above" indicator should be shown.
    pub fn more_above(&self) -> bool {
        match self.boundaries {
            Boundaries::Continuous => self.max_items_on_page < self.elements_count,
            Boundaries::Fixed => self.start_index > 0,
        }
    }

    /// Whether a "more data below" indicator should be shown.
    pub fn more_below(&self) -> bool {
        match self.boundaries {
            Boundaries::Continuous => self.max_items_on_page < self.elements_count,
            Boundaries::Fixed => {
                self.max_items_on_page.saturating_add(self.start_index) < self.elements_count
            }
        }
    }
}

/// Page geometry computed by a full-list render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollSetup {
    pub stored_start_index: usize,
    pub current_page: usize,
    pub pages_count: usize,
}

/// Hooks a [`crate::PagedListEngine`] calls on its consumer.
///
/// Every hook has a no-op default; `()` observes nothing.
pub trait ListObserver {
    fn on_scroll_update(&mut self, _update: ScrollUpdate) {}

    fn on_scroll_setup(&mut self, _setup: ScrollSetup) {}

    /// The list became empty. Fired once per transition.
    fn on_empty_list(&mut self) {}

    /// The list stopped being empty. Fired once per transition.
    fn on_not_empty_list(&mut self) {}

    fn on_elements_above_current_page_changed(&mut self, _count: usize) {}
}

impl ListObserver for () {}

/// The observer hooks as a tagged union.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ListEvent {
    ScrollUpdate(ScrollUpdate),
    ScrollSetup(ScrollSetup),
    EmptyList,
    NotEmptyList,
    ElementsAboveCurrentPageChanged(usize),
}

/// Records every event in order.
impl ListObserver for Vec<ListEvent> {
    fn on_scroll_update(&mut self, update: ScrollUpdate) {
        self.push(ListEvent::ScrollUpdate(update));
    }

    fn on_scroll_setup(&mut self, setup: ScrollSetup) {
        self.push(ListEvent::ScrollSetup(setup));
    }

    fn on_empty_list(&mut self) {
        self.push(ListEvent::EmptyList);
    }

    fn on_not_empty_list(&mut self) {
        self.push(ListEvent::NotEmptyList);
    }

    fn on_elements_above_current_page_changed(&mut self, count: usize) {
        self.push(ListEvent::ElementsAboveCurrentPageChanged(count));
    }
}

impl<O: ListObserver + ?Sized> ListObserver for &mut O {
    fn on_scroll_update(&mut self, update: ScrollUpdate) {
        (**self).on_scroll_update(update);
    }

    fn on_scroll_setup(&mut self, setup: ScrollSetup) {
        (**self).on_scroll_setup(setup);
    }

    fn on_empty_list(&mut self) {
        (**self).on_empty_list();
    }

    fn on_not_empty_list(&mut self) {
        (**self).on_not_empty_list();
    }

    fn on_elements_above_current_page_changed(&mut self, count: usize) {
        (**self).on_elements_above_current_page_changed(count);
    }
}
