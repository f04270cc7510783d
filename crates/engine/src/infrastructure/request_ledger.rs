//! # Request Ledger
//!
//! Remembers the responses of recently completed authority requests so a
//! redelivered request is answered from the ledger instead of applying its
//! mutation a second time.
//!
//! Memory is bounded by `capacity`: once full, the oldest entry is evicted.
//! A request redelivered after its entry was evicted is applied again.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use veilkeep_domain::RequestId;
use veilkeep_shared::ResponseResult;

#[derive(Debug, Clone)]
struct LedgerEntry {
    response: ResponseResult,
    recorded_at: DateTime<Utc>,
}

/// Bounded record of completed request ids and their responses.
#[derive(Debug)]
pub struct RequestLedger {
    capacity: usize,
    order: VecDeque<RequestId>,
    entries: HashMap<RequestId, LedgerEntry>,
}

impl RequestLedger {
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Recorded response for `request_id`, if it already completed.
    pub fn lookup(&self, request_id: &RequestId) -> Option<&ResponseResult> {
        self.entries.get(request_id).map(|entry| &entry.response)
    }

    pub fn recorded_at(&self, request_id: &RequestId) -> Option<DateTime<Utc>> {
        self.entries.get(request_id).map(|entry| entry.recorded_at)
    }

    /// Record a completed request. Recording the same id twice keeps the
    /// first response.
    pub fn record(&mut self, request_id: RequestId, response: ResponseResult) {
        if self.entries.contains_key(&request_id) {
            return;
        }

        while self.order.len() >= self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.entries.remove(&evicted);
            }
        }

        self.order.push_back(request_id);
        self.entries.insert(
            request_id,
            LedgerEntry {
                response,
                recorded_at: Utc::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for RequestLedger {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
