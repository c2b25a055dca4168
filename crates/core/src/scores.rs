//! High-score table
//!
//! Text form is one `name:score` record per line, highest first. Parsing is
//! lenient: malformed lines are skipped rather than failing the whole table.

use std::fmt::Write as _;

use tracing::trace;

use crate::types::{ScoreRecord, SCORE_TABLE_SIZE};

/// Sorted (descending, stable) table of at most `SCORE_TABLE_SIZE` records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreTable {
    entries: Vec<ScoreRecord>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default table used when no score file exists yet
    pub fn seeded() -> Self {
        let entries = (0..SCORE_TABLE_SIZE as u32)
            .map(|i| ScoreRecord::new("TetrECS", 10_000 - i * 1_000))
            .collect();
        Self { entries }
    }

    pub fn from_records(records: Vec<ScoreRecord>) -> Self {
        let mut entries = records;
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(SCORE_TABLE_SIZE);
        Self { entries }
    }

    pub fn parse(text: &str) -> Self {
        Self::from_records(text.lines().filter_map(parse_record).collect())
    }

    pub fn entries(&self) -> &[ScoreRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best score in the table, 0 when empty
    pub fn high_score(&self) -> u32 {
        self.entries.first().map_or(0, |e| e.score)
    }

    /// Whether `score` would earn a place in the table
    pub fn beats(&self, score: u32) -> bool {
        score > 0
            && (self.entries.len() < SCORE_TABLE_SIZE
                || self.entries.iter().any(|e| score > e.score))
    }

    /// Insert a record below any equal scores, then truncate.
    ///
    /// Returns the rank it landed at, or `None` if it fell off the end.
    pub fn insert(&mut self, name: impl Into<String>, score: u32) -> Option<usize> {
        let rank = self
            .entries
            .iter()
            .position(|e| e.score < score)
            .unwrap_or(self.entries.len());
        if rank >= SCORE_TABLE_SIZE {
            return None;
        }
        self.entries.insert(rank, ScoreRecord::new(name, score));
        self.entries.truncate(SCORE_TABLE_SIZE);
        Some(rank)
    }

    pub fn to_file_string(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let _ = writeln!(out, "{entry}");
        }
        out
    }
}

/// Parse one `name:score` record; the name may itself contain colons
pub fn parse_record(line: &str) -> Option<ScoreRecord> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let record = line.rsplit_once(':').and_then(|(name, score)| {
        let name = name.trim();
        let score = score.trim().parse::<u32>().ok()?;
        (!name.is_empty()).then(|| ScoreRecord::new(name, score))
    });
    if record.is_none() {
        trace!(line, "malformed score record skipped");
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_junk_and_sorts() {
        let table = ScoreTable::parse("amy:300\n\ngarbage\nbob:x\nce:d:500\ndan:300\n");
        let names: Vec<_> = table.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["ce:d", "amy", "dan"]);
        assert_eq!(table.high_score(), 500);
    }

    #[test]
    fn test_seeded_table() {
        let table = ScoreTable::seeded();
        assert_eq!(table.len(), SCORE_TABLE_SIZE);
        assert_eq!(table.high_score(), 10_000);
        assert_eq!(table.entries().last().map(|e| e.score), Some(1_000));
    }

    #[test]
    fn test_insert_and_truncate() {
        let mut table = ScoreTable::seeded();
        assert!(!table.beats(1_000));
        assert!(table.beats(1_001));
        assert_eq!(table.insert("me", 5_000), Some(6));
        assert_eq!(table.len(), SCORE_TABLE_SIZE);
        assert_eq!(table.entries()[5].score, 5_000);
        assert_eq!(table.entries()[6].name, "me");
        assert_eq!(table.entries().last().map(|e| e.score), Some(2_000));
        assert_eq!(table.insert("late", 10), None);
    }

    #[test]
    fn test_file_string_round_trip() {
        let mut table = ScoreTable::new();
        assert!(table.beats(1));
        assert!(!table.beats(0));
        table.insert("a", 20);
        table.insert("b", 30);
        assert_eq!(table.to_file_string(), "b:30\na:20\n");
        assert_eq!(ScoreTable::parse(&table.to_file_string()), table);
    }
}
