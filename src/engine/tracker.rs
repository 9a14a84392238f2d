use std::collections::HashMap;

use crate::engine::error::ProtocolError;
use crate::engine::types::{Cycle, OpId, OpKind};

/// Issue-time metadata for one in-flight operation. Owned by the tracker from
/// registration until its completion is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingOp {
    pub id: OpId,
    pub addr: u64,
    pub bytes: u32,
    pub kind: OpKind,
    pub issued_at: Cycle,
}

/// Bounded map of in-flight operations.
///
/// Issuance and budget computation are not concurrent, so exceeding the
/// capacity means the caller broke its own budget math; that surfaces as a
/// `ProtocolError` rather than backpressure. Completion order is arbitrary.
#[derive(Debug)]
pub struct CompletionTracker {
    capacity: usize,
    pending: HashMap<OpId, PendingOp>,
}

impl CompletionTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            pending: HashMap::with_capacity(capacity),
        }
    }

    pub fn register(&mut self, op: PendingOp) -> Result<(), ProtocolError> {
        if self.pending.len() >= self.capacity {
            return Err(ProtocolError::OutstandingOverflow {
                capacity: self.capacity,
            });
        }
        self.pending.insert(op.id, op);
        Ok(())
    }

    pub fn complete(&mut self, id: OpId) -> Result<PendingOp, ProtocolError> {
        self.pending
            .remove(&id)
            .ok_or(ProtocolError::UnknownCompletion { id })
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(id: OpId) -> PendingOp {
        PendingOp {
            id,
            addr: id * 64,
            bytes: 64,
            kind: OpKind::Read,
            issued_at: 0,
        }
    }

    #[test]
    fn register_then_complete() {
        let mut tracker = CompletionTracker::new(4);
        tracker.register(op(1)).unwrap();
        assert_eq!(tracker.len(), 1);
        let done = tracker.complete(1).unwrap();
        assert_eq!(done.addr, 64);
        assert!(tracker.is_empty());
    }

    #[test]
    fn unknown_completion_is_protocol_error() {
        let mut tracker = CompletionTracker::new(4);
        assert_eq!(
            tracker.complete(42),
            Err(ProtocolError::UnknownCompletion { id: 42 })
        );
    }

    #[test]
    fn double_completion_is_protocol_error() {
        let mut tracker = CompletionTracker::new(4);
        tracker.register(op(3)).unwrap();
        tracker.complete(3).unwrap();
        assert_eq!(
            tracker.complete(3),
            Err(ProtocolError::UnknownCompletion { id: 3 })
        );
    }

    #[test]
    fn register_past_capacity_is_protocol_error() {
        let mut tracker = CompletionTracker::new(2);
        tracker.register(op(1)).unwrap();
        tracker.register(op(2)).unwrap();
        assert_eq!(
            tracker.register(op(3)),
            Err(ProtocolError::OutstandingOverflow { capacity: 2 })
        );
    }

    #[test]
    fn out_of_order_completion() {
        let mut tracker = CompletionTracker::new(8);
        for id in 0..8 {
            tracker.register(op(id)).unwrap();
        }
        for id in [5, 0, 7, 2, 1, 6, 3, 4] {
            assert_eq!(tracker.complete(id).unwrap().id, id);
        }
        assert!(tracker.is_empty());
    }

    #[test]
    fn freed_slot_is_reusable() {
        let mut tracker = CompletionTracker::new(1);
        for round in 0..100u64 {
            tracker.register(op(round)).unwrap();
            tracker.complete(round).unwrap();
        }
    }
}
