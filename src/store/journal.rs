//! Write-ahead journal
//!
//! Every single-document mutation is appended here (with fsync) before it
//! is applied in memory, so a restart can replay the tail of mutations on
//! top of the last snapshot. Bulk loads write a fresh snapshot and
//! truncate the journal instead.
//!
//! Entries carry the generation of the snapshot they were appended on top
//! of. Replay drops entries from any other generation, so a journal that
//! survives a crash between a bulk load's snapshot rename and its journal
//! truncation cannot resurrect pre-load documents.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::SearchResult;
use crate::types::DocId;

/// One journaled mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum JournalOp<D> {
    Insert { id: DocId, doc: D },
    Update { id: DocId, doc: D },
    Delete { id: DocId },
}

/// Wire form of a journal line: the operation plus a timestamp and the
/// snapshot generation it applies on top of
#[derive(Debug, Deserialize)]
struct JournalEntry<D> {
    #[allow(dead_code)]
    ts: DateTime<Utc>,
    #[serde(default)]
    gen: u64,
    #[serde(flatten)]
    op: JournalOp<D>,
}

/// Borrowed form used when appending
#[derive(Serialize)]
struct JournalEntryRef<'a, D> {
    ts: DateTime<Utc>,
    gen: u64,
    #[serde(flatten)]
    op: &'a JournalOp<D>,
}

/// Append-only journal file for one collection
#[derive(Debug)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append one operation, fsynced for durability
    pub fn append<D: Serialize>(&self, op: &JournalOp<D>, generation: u64) -> SearchResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let entry = JournalEntryRef { ts: Utc::now(), gen: generation, op };
        let line = serde_json::to_string(&entry)?;
        writeln!(file, "{}", line)?;
        file.sync_all()?;
        Ok(())
    }

    /// Read back the journaled operations for the given snapshot
    /// generation, in append order.
    ///
    /// Unparseable lines are logged and skipped so one corrupt tail entry
    /// does not take the whole collection down. Entries from another
    /// generation are stale (their snapshot has been superseded) and are
    /// dropped.
    pub fn replay<D: DeserializeOwned>(&self, generation: u64) -> SearchResult<Vec<JournalOp<D>>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut ops = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<JournalEntry<D>>(&line) {
                Ok(entry) if entry.gen == generation => ops.push(entry.op),
                Ok(entry) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        line = line_num + 1,
                        entry_gen = entry.gen,
                        snapshot_gen = generation,
                        "dropping journal entry from a superseded generation"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        line = line_num + 1,
                        error = %e,
                        "skipping unparseable journal entry"
                    );
                }
            }
        }

        Ok(ops)
    }

    /// Drop the journal after a snapshot has been written
    pub fn truncate(&self) -> SearchResult<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KnowledgeEntry;
    use tempfile::TempDir;

    fn entry(question: &str) -> KnowledgeEntry {
        KnowledgeEntry {
            question: question.to_string(),
            answer: "a".to_string(),
            category: String::new(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn append_then_replay_round_trips_ops() {
        let dir = TempDir::new().unwrap();
        let journal = Journal::new(dir.path().join("knowledge.journal.jsonl"));

        journal
            .append(&JournalOp::Insert { id: 1, doc: entry("q1") }, 0)
            .unwrap();
        journal.append::<KnowledgeEntry>(&JournalOp::Delete { id: 1 }, 0).unwrap();

        let ops: Vec<JournalOp<KnowledgeEntry>> = journal.replay(0).unwrap();
        assert_eq!(ops.len(), 2);
        assert!(matches!(&ops[0], JournalOp::Insert { id: 1, .. }));
        assert!(matches!(&ops[1], JournalOp::Delete { id: 1 }));
    }

    #[test]
    fn replay_skips_corrupt_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("journal.jsonl");
        let journal = Journal::new(path.clone());

        journal
            .append(&JournalOp::Insert { id: 1, doc: entry("q1") }, 0)
            .unwrap();
        std::fs::write(
            &path,
            format!("{}not json\n", std::fs::read_to_string(&path).unwrap()),
        )
        .unwrap();

        let ops: Vec<JournalOp<KnowledgeEntry>> = journal.replay(0).unwrap();
        assert_eq!(ops.len(), 1);
    }

    #[test]
    fn replay_drops_entries_from_other_generations() {
        let dir = TempDir::new().unwrap();
        let journal = Journal::new(dir.path().join("journal.jsonl"));

        journal
            .append(&JournalOp::Insert { id: 1, doc: entry("old") }, 0)
            .unwrap();
        journal
            .append(&JournalOp::Insert { id: 2, doc: entry("current") }, 1)
            .unwrap();

        let ops: Vec<JournalOp<KnowledgeEntry>> = journal.replay(1).unwrap();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], JournalOp::Insert { id: 2, .. }));
    }

    #[test]
    fn truncate_removes_file() {
        let dir = TempDir::new().unwrap();
        let journal = Journal::new(dir.path().join("journal.jsonl"));
        journal
            .append(&JournalOp::Insert { id: 1, doc: entry("q1") }, 0)
            .unwrap();

        journal.truncate().unwrap();
        let ops: Vec<JournalOp<KnowledgeEntry>> = journal.replay(0).unwrap();
        assert!(ops.is_empty());
    }

    #[test]
    fn missing_journal_replays_empty() {
        let dir = TempDir::new().unwrap();
        let journal = Journal::new(dir.path().join("absent.jsonl"));
        let ops: Vec<JournalOp<KnowledgeEntry>> = journal.replay(0).unwrap();
        assert!(ops.is_empty());
    }
}
