//! Crash-safety and reopen tests: journal replay, snapshot recovery,
//! and index rebuild consistency

use std::fs;
use std::io::Write;

use tempfile::TempDir;

use uikit_mcp::registry::Registry;
use uikit_mcp::store::Collection;
use uikit_mcp::types::KnowledgeEntry;

fn entry(question: &str, answer: &str) -> KnowledgeEntry {
    KnowledgeEntry {
        question: question.to_string(),
        answer: answer.to_string(),
        category: String::new(),
        tags: vec![],
    }
}

#[test]
fn test_journaled_mutations_survive_reopen() {
    let dir = TempDir::new().unwrap();

    let id = {
        let collection: Collection<KnowledgeEntry> = Collection::open(dir.path()).unwrap();
        let keep = collection
            .insert(entry("How to theme a navbar?", "Override the header tokens."))
            .unwrap();
        let drop_me = collection
            .insert(entry("Scrapped question?", "Scrapped answer."))
            .unwrap();
        collection.delete(drop_me).unwrap();
        keep
    };

    // Nothing was snapshotted; reopen must replay the journal
    let reopened: Collection<KnowledgeEntry> = Collection::open(dir.path()).unwrap();
    assert_eq!(reopened.len(), 1);
    assert!(reopened.get(id).is_some());

    let response = reopened.search("navbar", None).unwrap();
    assert_eq!(response.total, 1);
    let gone = reopened.search("scrapped", None).unwrap();
    assert_eq!(gone.total, 0);
}

#[test]
fn test_bulk_load_snapshot_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let seeds = dir.path().join("seeds");
    fs::create_dir_all(&seeds).unwrap();
    let mut f = fs::File::create(seeds.join("knowledge.jsonl")).unwrap();
    writeln!(f, r#"{{"question":"What is a slot?","answer":"A named insertion point."}}"#).unwrap();
    writeln!(f, r#"{{"question":"What is a token?","answer":"A shared design value."}}"#).unwrap();

    {
        let registry = Registry::open(dir.path()).unwrap();
        registry.sync_seed_data(false).unwrap();
    }

    let registry = Registry::open(dir.path()).unwrap();
    assert_eq!(registry.knowledge.len(), 2);
    let response = registry.search_knowledge("token", None).unwrap();
    assert_eq!(response.total, 1);
}

#[test]
fn test_reopen_ids_continue_after_replay() {
    let dir = TempDir::new().unwrap();

    let first = {
        let collection: Collection<KnowledgeEntry> = Collection::open(dir.path()).unwrap();
        collection.insert(entry("First?", "Yes.")).unwrap()
    };

    let reopened: Collection<KnowledgeEntry> = Collection::open(dir.path()).unwrap();
    let second = reopened.insert(entry("Second?", "Also yes.")).unwrap();
    assert!(second > first);
}

#[test]
fn test_corrupt_journal_line_is_skipped() {
    let dir = TempDir::new().unwrap();

    {
        let collection: Collection<KnowledgeEntry> = Collection::open(dir.path()).unwrap();
        collection.insert(entry("Survivor?", "Still here.")).unwrap();
    }

    // Simulate a torn write at the end of the journal
    let journal = dir.path().join("knowledge.journal.jsonl");
    let mut f = fs::OpenOptions::new().append(true).open(&journal).unwrap();
    write!(f, "{{\"op\":\"insert\",\"id\":9").unwrap();

    let reopened: Collection<KnowledgeEntry> = Collection::open(dir.path()).unwrap();
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.search("survivor", None).unwrap().total, 1);
}

#[test]
fn test_maintained_index_matches_full_rebuild_after_reopen() {
    let dir = TempDir::new().unwrap();

    {
        let collection: Collection<KnowledgeEntry> = Collection::open(dir.path()).unwrap();
        for i in 0..5 {
            collection
                .insert(entry(&format!("Question {i}?"), "A body of answer text."))
                .unwrap();
        }
        collection.delete(2).unwrap();
    }

    let reopened: Collection<KnowledgeEntry> = Collection::open(dir.path()).unwrap();
    let rebuilt = reopened.rebuilt_index();
    reopened.with_index(|live| {
        assert_eq!(live.doc_count(), rebuilt.doc_count());
        for term in rebuilt.terms() {
            let mut a = live.postings(term).unwrap_or(&[]).to_vec();
            let mut b = rebuilt.postings(term).unwrap_or(&[]).to_vec();
            a.sort_by_key(|p| (p.doc_id, p.field));
            b.sort_by_key(|p| (p.doc_id, p.field));
            assert_eq!(a, b, "postings diverge for term {term}");
        }
    });
}
