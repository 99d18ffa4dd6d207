//! Bounded, thread-safe interaction history
//!
//! Records live in a ring (`VecDeque`) in insertion order behind a single
//! `parking_lot::Mutex`. Every operation, reads included, runs as one critical
//! section, so no caller can observe an eviction without the matching size
//! change. Newest-first views are produced by reversing at read time.
//!
//! Retained ids are always contiguous (ids are handed out sequentially and only
//! the oldest record is ever removed), which makes lookup by id an index
//! computation.

use crate::error::LogError;
use crate::export::{render, Export, ExportFormat};
use chrono::Utc;
use parking_lot::Mutex;
use sideletter_domain::{InteractionId, InteractionRecord, NewInteraction};
use std::collections::VecDeque;
use tracing::debug;

/// Default number of retained records
pub const DEFAULT_CAPACITY: usize = 1000;

/// Default page size for [`InteractionLog::list`]
pub const DEFAULT_PAGE_LIMIT: usize = 50;

/// Largest page [`InteractionLog::list`] will return
pub const MAX_PAGE_LIMIT: usize = 200;

/// Largest number of records a single export will contain
pub const MAX_EXPORT_LIMIT: usize = 1000;

/// One page of the newest-first view
#[derive(Debug, Clone, PartialEq)]
pub struct LogPage {
    /// Records, most recent first
    pub records: Vec<InteractionRecord>,
    /// Number of records retained at the instant of the call
    pub total: usize,
    /// Effective page size after clamping
    pub limit: usize,
    /// Offset into the newest-first view
    pub offset: usize,
}

struct LogState {
    records: VecDeque<InteractionRecord>,
    next_id: InteractionId,
}

/// Fixed-capacity interaction log
///
/// # Examples
///
/// ```
/// use sideletter_domain::NewInteraction;
/// use sideletter_log::InteractionLog;
///
/// let log = InteractionLog::new(2).unwrap();
/// for question in ["a", "b", "c"] {
///     log.append(NewInteraction {
///         question: question.to_string(),
///         answer: "answer".to_string(),
///         sources: Vec::new(),
///     });
/// }
///
/// assert_eq!(log.len(), 2);
/// assert!(log.get(1).is_err());
/// assert_eq!(log.get(3).unwrap().question, "c");
/// ```
pub struct InteractionLog {
    capacity: usize,
    state: Mutex<LogState>,
}

impl InteractionLog {
    /// Create an empty log holding at most `capacity` records
    pub fn new(capacity: usize) -> Result<Self, LogError> {
        if capacity == 0 {
            return Err(LogError::ZeroCapacity);
        }
        Ok(Self::bounded(capacity))
    }

    fn bounded(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(LogState {
                records: VecDeque::with_capacity(capacity),
                next_id: 1,
            }),
        }
    }

    /// Maximum number of retained records
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of records currently retained
    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    /// Whether no records are retained
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record a completed interaction and return its id
    ///
    /// The id and timestamp are assigned in the same critical section. Evicts
    /// the oldest record when the log is full.
    pub fn append(&self, interaction: NewInteraction) -> InteractionId {
        let mut state = self.state.lock();

        let id = state.next_id;
        state.next_id += 1;

        if state.records.len() == self.capacity {
            if let Some(evicted) = state.records.pop_front() {
                debug!("Evicted interaction #{}", evicted.id);
            }
        }
        state
            .records
            .push_back(InteractionRecord::new(id, Utc::now(), interaction));

        id
    }

    /// Page through the log, most recent first
    ///
    /// `limit` is clamped to [`MAX_PAGE_LIMIT`]; an offset past the end yields
    /// an empty page.
    pub fn list(&self, limit: usize, offset: usize) -> LogPage {
        let limit = limit.min(MAX_PAGE_LIMIT);
        let state = self.state.lock();

        let records = state
            .records
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        LogPage {
            records,
            total: state.records.len(),
            limit,
            offset,
        }
    }

    /// Look up a retained record by id
    pub fn get(&self, id: InteractionId) -> Result<InteractionRecord, LogError> {
        let state = self.state.lock();

        let oldest = state
            .records
            .front()
            .map(|record| record.id)
            .ok_or(LogError::NotFound(id))?;

        id.checked_sub(oldest)
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| state.records.get(index))
            .cloned()
            .ok_or(LogError::NotFound(id))
    }

    /// Consistent newest-first copy of up to `limit` records
    ///
    /// `limit` is clamped to [`MAX_EXPORT_LIMIT`].
    pub fn snapshot(&self, limit: usize) -> Vec<InteractionRecord> {
        let limit = limit.min(MAX_EXPORT_LIMIT);
        let state = self.state.lock();
        state.records.iter().rev().take(limit).cloned().collect()
    }

    /// Serialize a newest-first snapshot of the log
    ///
    /// The lock is held only while copying; rendering happens afterwards.
    pub fn export(&self, format: ExportFormat, limit: usize) -> Result<Export, LogError> {
        let records = self.snapshot(limit);
        render(format, &records, Utc::now())
    }
}

impl Default for InteractionLog {
    fn default() -> Self {
        Self::bounded(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interaction(question: &str) -> NewInteraction {
        NewInteraction {
            question: question.to_string(),
            answer: format!("answer to {}", question),
            sources: Vec::new(),
        }
    }

    fn filled(capacity: usize, count: usize) -> InteractionLog {
        let log = InteractionLog::new(capacity).unwrap();
        for i in 0..count {
            log.append(interaction(&format!("q{}", i + 1)));
        }
        log
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(InteractionLog::new(0), Err(LogError::ZeroCapacity)));
    }

    #[test]
    fn test_default_capacity() {
        let log = InteractionLog::default();
        assert_eq!(log.capacity(), DEFAULT_CAPACITY);
        assert!(log.is_empty());
    }

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let log = InteractionLog::new(10).unwrap();
        assert_eq!(log.append(interaction("a")), 1);
        assert_eq!(log.append(interaction("b")), 2);
        assert_eq!(log.append(interaction("c")), 3);
    }

    #[test]
    fn test_eviction_keeps_newest_and_never_reuses_ids() {
        let log = filled(3, 5);

        assert_eq!(log.len(), 3);
        assert!(matches!(log.get(1), Err(LogError::NotFound(1))));
        assert!(matches!(log.get(2), Err(LogError::NotFound(2))));
        assert_eq!(log.get(3).unwrap().question, "q3");
        assert_eq!(log.get(5).unwrap().question, "q5");

        assert_eq!(log.append(interaction("q6")), 6);
    }

    #[test]
    fn test_get_unknown_ids() {
        let log = filled(5, 2);
        assert!(matches!(log.get(0), Err(LogError::NotFound(0))));
        assert!(matches!(log.get(3), Err(LogError::NotFound(3))));
        assert!(matches!(log.get(u64::MAX), Err(LogError::NotFound(_))));

        let empty = InteractionLog::new(5).unwrap();
        assert!(matches!(empty.get(1), Err(LogError::NotFound(1))));
    }

    #[test]
    fn test_list_newest_first() {
        let log = filled(10, 4);
        let page = log.list(DEFAULT_PAGE_LIMIT, 0);

        let ids: Vec<_> = page.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);
        assert_eq!(page.total, 4);
    }

    #[test]
    fn test_list_pagination() {
        let log = filled(10, 7);
        let page = log.list(3, 2);

        let ids: Vec<_> = page.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![5, 4, 3]);
        assert_eq!(page.total, 7);
        assert_eq!(page.limit, 3);
        assert_eq!(page.offset, 2);
    }

    #[test]
    fn test_list_offset_out_of_range() {
        let log = filled(10, 3);
        let page = log.list(50, 10);
        assert!(page.records.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn test_list_limit_clamped() {
        let log = filled(500, 250);
        let page = log.list(1000, 0);
        assert_eq!(page.limit, MAX_PAGE_LIMIT);
        assert_eq!(page.records.len(), MAX_PAGE_LIMIT);
        assert_eq!(page.records[0].id, 250);
    }

    #[test]
    fn test_list_after_append_shows_newest_first() {
        let log = filled(10, 3);
        let id = log.append(interaction("latest"));
        let page = log.list(50, 0);
        assert_eq!(page.records[0].id, id);
        assert_eq!(page.records[0].question, "latest");
    }

    #[test]
    fn test_snapshot_limit() {
        let log = filled(10, 6);
        let ids: Vec<_> = log.snapshot(2).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![6, 5]);
        assert_eq!(log.snapshot(MAX_EXPORT_LIMIT + 1).len(), 6);
    }

    #[test]
    fn test_export_does_not_mutate() {
        let log = filled(10, 3);
        let before = log.list(50, 0);

        let export = log.export(ExportFormat::Csv, 1000).unwrap();
        assert_eq!(export.record_count, 3);

        assert_eq!(log.list(50, 0), before);
    }
}
