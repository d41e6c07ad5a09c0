use std::io::{BufRead, Write};

use cube_core::{parse_notation, pattern::PatternKind};
use log::info;
use serde::{Deserialize, Serialize};

use super::{AlgorithmDatabase, AlgorithmEntry, Provenance};
use crate::RecordError;

/// The persisted form of an entry, stored one JSON object per line
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub name: String,
    pub kind: PatternKind,
    pub algorithm: String,
    /// The canonical pattern the producer expects the algorithm to solve, checked on load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default)]
    pub provenance: Provenance,
}

impl From<&AlgorithmEntry> for EntryRecord {
    fn from(entry: &AlgorithmEntry) -> Self {
        EntryRecord {
            name: entry.name.to_string(),
            kind: entry.kind(),
            algorithm: entry.algorithm.to_string(),
            pattern: Some(entry.pattern.to_string()),
            provenance: entry.provenance.clone(),
        }
    }
}

impl AlgorithmDatabase {
    /// Register every record in a JSON lines stream. Blank lines are skipped.
    ///
    /// Records before a failing line stay registered.
    ///
    /// # Errors
    ///
    /// Returns the first line that cannot be read, parsed, verified against its claimed pattern, or registered.
    pub fn load_records(&mut self, reader: impl BufRead) -> Result<usize, RecordError> {
        let mut loaded = 0;

        for (i, line) in reader.lines().enumerate() {
            let line_number = i + 1;
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let record: EntryRecord = serde_json::from_str(&line).map_err(|source| {
                RecordError::Json {
                    line: line_number,
                    source,
                }
            })?;

            let algorithm =
                parse_notation(&record.algorithm).map_err(|source| RecordError::Notation {
                    line: line_number,
                    source,
                })?;

            let entry =
                AlgorithmEntry::derive(record.kind, &record.name, algorithm, record.provenance);

            if let Some(claimed) = record.pattern
                && claimed != entry.pattern.to_string()
            {
                return Err(RecordError::PatternMismatch {
                    line: line_number,
                    claimed,
                    derived: entry.pattern.to_string(),
                });
            }

            self.register(entry)
                .map_err(|source| RecordError::Collision {
                    line: line_number,
                    source,
                })?;
            loaded += 1;
        }

        info!("Loaded {loaded} algorithm records");

        Ok(loaded)
    }

    /// Write every entry as one JSON object per line.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn write_records(&self, mut writer: impl Write) -> Result<(), RecordError> {
        for (i, entry) in self.entries.values().enumerate() {
            let json = serde_json::to_string(&EntryRecord::from(entry))
                .map_err(|source| RecordError::Json { line: i + 1, source })?;
            writeln!(writer, "{json}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn records_round_trip() {
        let database = AlgorithmDatabase::builtin();

        let mut buffer = Vec::new();
        database.write_records(&mut buffer).unwrap();

        let mut loaded = AlgorithmDatabase::empty();
        assert_eq!(loaded.load_records(buffer.as_slice()).unwrap(), database.len());
        assert_eq!(loaded.len(), database.len());

        for kind in [PatternKind::Orientation, PatternKind::Permutation] {
            for (a, b) in database.entries(kind).zip(loaded.entries(kind)) {
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn minimal_record_is_accepted() {
        let text = r#"
{"name": "sune", "kind": "Orientation", "algorithm": "R U R' U R U2 R'"}

{"name": "tool", "kind": "Permutation", "algorithm": "M2 U M2 U2 M2 U M2", "provenance": {"mined": {"source": "search"}}}
"#;
        let mut database = AlgorithmDatabase::empty();
        assert_eq!(database.load_records(text.as_bytes()).unwrap(), 2);

        let h_perm = database.entries(PatternKind::Permutation).next().unwrap();
        assert_eq!(
            h_perm.provenance(),
            &Provenance::Mined {
                source: "search".to_owned()
            }
        );
    }

    #[test]
    fn bad_records_name_their_line() {
        let mut database = AlgorithmDatabase::empty();

        let err = database
            .load_records("\n{\"name\": 3}".as_bytes())
            .unwrap_err();
        assert!(matches!(err, RecordError::Json { line: 2, .. }));

        let err = database
            .load_records(
                r#"{"name": "x", "kind": "Orientation", "algorithm": "R Q"}"#.as_bytes(),
            )
            .unwrap_err();
        assert!(matches!(err, RecordError::Notation { line: 1, .. }));

        let err = database
            .load_records(
                r#"{"name": "x", "kind": "Orientation", "algorithm": "R U R' U R U2 R'", "pattern": "111111111000000000000"}"#
                    .as_bytes(),
            )
            .unwrap_err();
        assert!(matches!(err, RecordError::PatternMismatch { line: 1, .. }));

        let err = database
            .load_records(
                "{\"name\": \"a\", \"kind\": \"Orientation\", \"algorithm\": \"D\"}\n{\"name\": \"b\", \"kind\": \"Orientation\", \"algorithm\": \"D2\"}"
                    .as_bytes(),
            )
            .unwrap_err();
        assert!(matches!(err, RecordError::Collision { line: 2, .. }));
    }
}
