//! Integration tests for sideletter-log
//!
//! These tests exercise the log from many threads and check the export
//! against concurrent reads.

use proptest::prelude::*;
use sideletter_domain::{InteractionRecord, NewInteraction};
use sideletter_log::{ExportFormat, InteractionLog, LogError};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

fn interaction(question: &str) -> NewInteraction {
    NewInteraction {
        question: question.to_string(),
        answer: format!("answer to {}", question),
        sources: Vec::new(),
    }
}

#[test]
fn test_concurrent_appends_get_distinct_contiguous_ids() {
    let log = Arc::new(InteractionLog::new(10_000).unwrap());
    let threads = 8;
    let per_thread = 250;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let log = Arc::clone(&log);
            thread::spawn(move || {
                (0..per_thread)
                    .map(|i| log.append(interaction(&format!("t{}-{}", t, i))))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids: Vec<u64> = handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect();
    ids.sort_unstable();

    let expected: Vec<u64> = (1..=(threads * per_thread) as u64).collect();
    assert_eq!(ids, expected);
    assert_eq!(log.len(), threads * per_thread);
}

#[test]
fn test_concurrent_appends_past_capacity_keep_bound() {
    let capacity = 50;
    let log = Arc::new(InteractionLog::new(capacity).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let log = Arc::clone(&log);
            thread::spawn(move || {
                for i in 0..100 {
                    log.append(interaction(&format!("t{}-{}", t, i)));
                    let page = log.list(200, 0);
                    assert!(page.total <= capacity);
                    assert_eq!(page.records.len(), page.total);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let page = log.list(200, 0);
    let ids: Vec<_> = page.records.iter().map(|r| r.id).collect();
    let expected: Vec<u64> = (351..=400).rev().collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_readers_always_see_strictly_decreasing_ids() {
    let log = Arc::new(InteractionLog::new(20).unwrap());

    let writer = {
        let log = Arc::clone(&log);
        thread::spawn(move || {
            for i in 0..500 {
                log.append(interaction(&format!("q{}", i)));
            }
        })
    };

    let reader = {
        let log = Arc::clone(&log);
        thread::spawn(move || {
            for _ in 0..500 {
                let page = log.list(50, 0);
                for pair in page.records.windows(2) {
                    assert_eq!(pair[0].id, pair[1].id + 1);
                }
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();
}

#[test]
fn test_json_export_matches_list() {
    let log = InteractionLog::new(100).unwrap();
    for i in 0..12 {
        log.append(interaction(&format!("q{}", i)));
    }

    let listed = log.list(200, 0).records;
    let export = log.export(ExportFormat::Json, 1000).unwrap();

    let value: serde_json::Value = serde_json::from_slice(&export.body).unwrap();
    assert_eq!(value["total_interactions"], 12);

    let exported: Vec<InteractionRecord> =
        serde_json::from_value(value["logs"].clone()).unwrap();

    assert_eq!(exported.len(), listed.len());
    for (exported, listed) in exported.iter().zip(&listed) {
        assert_eq!(exported.id, listed.id);
        assert_eq!(exported.timestamp_string(), listed.timestamp_string());
        assert_eq!(exported.answer, listed.answer);
    }
}

#[test]
fn test_timestamps_follow_id_order_under_contention() {
    let log = Arc::new(InteractionLog::new(10_000).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let log = Arc::clone(&log);
            thread::spawn(move || {
                for i in 0..200 {
                    log.append(interaction(&format!("t{}-{}", t, i)));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let records = log.snapshot(1000);
    assert_eq!(records.len(), 1000);
    for pair in records.windows(2) {
        // Newest first: the higher id must not be stamped earlier
        assert_eq!(pair[0].id, pair[1].id + 1);
        assert!(pair[0].timestamp >= pair[1].timestamp);
    }
}

/// Ids in a newest-first view must form one unbroken descending run
fn assert_contiguous_descending(ids: &[u64], capacity: usize) {
    assert!(ids.len() <= capacity);
    for pair in ids.windows(2) {
        assert_eq!(pair[0], pair[1] + 1, "gap or reorder in {:?}", ids);
    }
}

#[test]
fn test_export_and_list_consistent_while_appending() {
    let capacity = 50;
    let log = Arc::new(InteractionLog::new(capacity).unwrap());

    let writer = {
        let log = Arc::clone(&log);
        thread::spawn(move || {
            for i in 0..2_000 {
                log.append(interaction(&format!("q{}", i)));
            }
        })
    };

    let mut reads = 0;
    while !writer.is_finished() || reads < 50 {
        let export = log.export(ExportFormat::Json, 1000).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&export.body).unwrap();
        let exported: Vec<InteractionRecord> =
            serde_json::from_value(value["logs"].clone()).unwrap();
        assert_eq!(value["total_interactions"], exported.len());

        let exported_ids: Vec<_> = exported.iter().map(|r| r.id).collect();
        assert_contiguous_descending(&exported_ids, capacity);
        if let Some(newest) = exported_ids.first() {
            // A full snapshot spans exactly the retained window
            if *newest as usize >= capacity {
                assert_eq!(exported_ids.len(), capacity);
            }
        }

        let page = log.list(200, 0);
        let listed_ids: Vec<_> = page.records.iter().map(|r| r.id).collect();
        assert_contiguous_descending(&listed_ids, capacity);
        assert_eq!(page.total, listed_ids.len());

        reads += 1;
    }

    writer.join().unwrap();

    let export = log.export(ExportFormat::Json, 1000).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&export.body).unwrap();
    let exported: Vec<InteractionRecord> =
        serde_json::from_value(value["logs"].clone()).unwrap();
    let listed = log.list(200, 0).records;
    assert_eq!(exported, listed);
    assert_eq!(exported.first().map(|r| r.id), Some(2_000));
    assert_eq!(exported.last().map(|r| r.id), Some(1_951));
}

#[test]
fn test_export_limit_truncates_newest_first() {
    let log = InteractionLog::new(100).unwrap();
    for i in 0..10 {
        log.append(interaction(&format!("q{}", i)));
    }

    let export = log.export(ExportFormat::Json, 3).unwrap();
    assert_eq!(export.record_count, 3);

    let value: serde_json::Value = serde_json::from_slice(&export.body).unwrap();
    let ids: Vec<_> = value["logs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![10, 9, 8]);
}

proptest! {
    #[test]
    fn prop_eviction_retains_last_capacity_ids(capacity in 1usize..40, appended in 0usize..120) {
        let log = InteractionLog::new(capacity).unwrap();
        for i in 0..appended {
            log.append(interaction(&format!("q{}", i)));
        }

        let retained = appended.min(capacity);
        prop_assert_eq!(log.len(), retained);

        let first_retained = (appended - retained + 1) as u64;
        for id in 1..first_retained {
            prop_assert_eq!(log.get(id), Err(LogError::NotFound(id)));
        }
        for id in first_retained..=(appended as u64) {
            prop_assert_eq!(log.get(id).map(|r| r.id), Ok(id));
        }
    }

    #[test]
    fn prop_pages_are_strictly_decreasing(
        count in 0usize..60,
        limit in 0usize..250,
        offset in 0usize..70,
    ) {
        let log = InteractionLog::new(100).unwrap();
        for i in 0..count {
            log.append(interaction(&format!("q{}", i)));
        }

        let page = log.list(limit, offset);
        prop_assert_eq!(page.total, count);
        prop_assert!(page.records.len() <= limit.min(200));

        let ids: HashSet<_> = page.records.iter().map(|r| r.id).collect();
        prop_assert_eq!(ids.len(), page.records.len());
        for pair in page.records.windows(2) {
            prop_assert!(pair[0].id > pair[1].id);
        }
        if offset >= count {
            prop_assert!(page.records.is_empty());
        } else {
            prop_assert_eq!(page.records[0].id, (count - offset) as u64);
        }
    }
}
