use alloc::collections::VecDeque;

use crate::{RebuildRequest, RebuildType};

/// Rebuild intents accumulated while a fetch is outstanding, served oldest-first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RebuildQueue {
    pending: VecDeque<RebuildRequest>,
}

impl RebuildQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rebuild_type: RebuildType, offset: usize) {
        ptrace!(?rebuild_type, offset, queued = self.pending.len(), "RebuildQueue::push");
        self.pending.push_back(RebuildRequest::new(rebuild_type, offset));
    }

    /// Removes and returns the oldest queued request.
    pub fn pop(&mut self) -> Option<RebuildRequest> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
