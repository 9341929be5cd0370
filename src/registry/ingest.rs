//! Seed-file ingestion
//!
//! Seed data arrives as line-delimited JSON, one record per line. A line
//! that fails to parse or validate is logged and dropped; the rest of the
//! file still loads. Whole-batch atomicity is the bulk loader's job.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::SearchResult;
use crate::types::Document;

/// Read and validate one collection's seed file.
///
/// Returns the parsed records in file order, minus any that were
/// malformed. A missing file is not an error; it reads as empty.
pub fn read_seed_file<D: Document>(path: &Path) -> SearchResult<Vec<D>> {
    if !path.exists() {
        tracing::debug!(
            collection = D::COLLECTION,
            path = %path.display(),
            "seed file not present"
        );
        return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(path)?);
    let mut docs = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let doc: D = match serde_json::from_str(&line) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(
                    collection = D::COLLECTION,
                    line = line_num + 1,
                    error = %e,
                    "dropping unparseable seed record"
                );
                continue;
            }
        };

        if let Err(e) = doc.validate() {
            tracing::warn!(
                collection = D::COLLECTION,
                line = line_num + 1,
                error = %e,
                "dropping invalid seed record"
            );
            continue;
        }

        docs.push(doc);
    }

    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KnowledgeEntry;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn reads_valid_lines_and_drops_bad_ones() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("knowledge.jsonl");
        let mut f = File::create(&path).unwrap();
        writeln!(f, r#"{{"question":"What is a token?","answer":"A design value."}}"#).unwrap();
        writeln!(f, "not json at all").unwrap();
        writeln!(f, r#"{{"question":"","answer":"missing question"}}"#).unwrap();
        writeln!(f).unwrap();
        writeln!(f, r#"{{"question":"Second?","answer":"Yes.","tags":["a"]}}"#).unwrap();

        let docs: Vec<KnowledgeEntry> = read_seed_file(&path).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].question, "What is a token?");
        assert_eq!(docs[1].tags, vec!["a"]);
    }

    #[test]
    fn missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let docs: Vec<KnowledgeEntry> =
            read_seed_file(&dir.path().join("absent.jsonl")).unwrap();
        assert!(docs.is_empty());
    }
}
