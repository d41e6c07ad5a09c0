//! Last-layer algorithms keyed by canonical pattern.

use std::{collections::BTreeMap, fmt, sync::LazyLock};

use cube_core::{
    Algorithm, CubeState, parse_notation,
    pattern::{Pattern, PatternKind, extract},
};
use internment::ArcIntern;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    PatternCollisionError,
    stages::{finishing_auf, first_two_layers_solved, last_layer_oriented},
};

mod builtin;
mod records;

pub use records::EntryRecord;

/// Where an entry came from
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Shipped with the solver
    BuiltIn,
    /// Produced by an external tool, named by the record
    Mined { source: String },
    /// Registered at runtime
    #[default]
    Registered,
}

/// An algorithm together with the canonical pattern of the case it solves.
///
/// The only way to make one is `derive`, which reads the pattern off the state the algorithm solves. An entry therefore cannot claim a case its algorithm does not handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlgorithmEntry {
    name: ArcIntern<str>,
    algorithm: Algorithm,
    pattern: Pattern,
    /// U turns from the setup state's pattern to the canonical one
    rotation_offset: u8,
    provenance: Provenance,
}

impl AlgorithmEntry {
    /// Build an entry from the state that `algorithm` solves, which is a solved cube with the inverse applied.
    #[must_use]
    pub fn derive(
        kind: PatternKind,
        name: &str,
        algorithm: Algorithm,
        provenance: Provenance,
    ) -> AlgorithmEntry {
        let setup = CubeState::solved().with_algorithm(&algorithm.inverse());
        let canonical = extract(&setup, kind).canonicalize();

        AlgorithmEntry {
            name: ArcIntern::from(name),
            algorithm,
            pattern: canonical.canonical,
            rotation_offset: canonical.rotation_offset,
            provenance,
        }
    }

    #[must_use]
    pub fn name(&self) -> &ArcIntern<str> {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> PatternKind {
        self.pattern.kind()
    }

    #[must_use]
    pub fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    /// The canonical pattern of the case this entry solves
    #[must_use]
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    #[must_use]
    pub fn rotation_offset(&self) -> u8 {
        self.rotation_offset
    }

    #[must_use]
    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// The case this entry was derived from
    #[must_use]
    pub fn setup_state(&self) -> CubeState {
        CubeState::solved().with_algorithm(&self.algorithm.inverse())
    }

    /// The stored algorithm preceded by `offset` clockwise U turns
    #[must_use]
    pub fn adapted(&self, offset: u8) -> Algorithm {
        Algorithm::u_turns(offset).compose(&self.algorithm)
    }

    /// Whether the adapted algorithm finishes this entry's stage from `state`
    fn completes_from(&self, state: &CubeState, offset: u8) -> bool {
        let after = state.with_algorithm(&self.adapted(offset));

        match self.kind() {
            PatternKind::Orientation => last_layer_oriented(&after),
            PatternKind::Permutation => {
                first_two_layers_solved(&after) && finishing_auf(&after).is_some()
            }
        }
    }
}

impl fmt::Display for AlgorithmEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.algorithm)
    }
}

/// A database hit: the entry and the U turns that align the physical state with it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlgorithmMatch<'a> {
    pub entry: &'a AlgorithmEntry,
    pub rotation_offset: u8,
}

impl AlgorithmMatch<'_> {
    /// The moves to apply to the observed state
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.entry.adapted(self.rotation_offset)
    }
}

/// What `register` did with an entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
    Added,
    /// An equivalent entry for the same case was replaced
    Replaced,
}

/// Canonical patterns mapped to the algorithms that solve them.
///
/// The database is only written through `register`, which rejects entries that would silently shadow a different solution for the same case.
#[derive(Clone, Debug, Default)]
pub struct AlgorithmDatabase {
    entries: BTreeMap<Pattern, AlgorithmEntry>,
}

static BUILTIN: LazyLock<AlgorithmDatabase> = LazyLock::new(AlgorithmDatabase::with_builtin);

impl AlgorithmDatabase {
    /// A database with no entries
    #[must_use]
    pub fn empty() -> AlgorithmDatabase {
        AlgorithmDatabase::default()
    }

    /// The shared database of built in algorithms, initialised on first use
    #[must_use]
    pub fn builtin() -> &'static AlgorithmDatabase {
        &BUILTIN
    }

    /// A fresh database holding the built in OLL and PLL algorithms
    #[must_use]
    pub fn with_builtin() -> AlgorithmDatabase {
        let mut database = AlgorithmDatabase::empty();

        let tables = [
            (PatternKind::Orientation, &builtin::OLL[..]),
            (PatternKind::Permutation, &builtin::PLL[..]),
        ];

        for (kind, table) in tables {
            for &(name, notation) in table {
                let algorithm = match parse_notation(notation) {
                    Ok(algorithm) => algorithm,
                    Err(e) => {
                        warn!("Skipping built in `{name}`: {e}");
                        continue;
                    }
                };

                let entry = AlgorithmEntry::derive(kind, name, algorithm, Provenance::BuiltIn);
                if let Err(e) = database.register(entry) {
                    warn!("Skipping built in `{name}`: {e}");
                }
            }
        }

        debug!("Loaded {} built in algorithms", database.len());

        database
    }

    /// Add an entry.
    ///
    /// If an entry already has the same canonical pattern, the two must be interchangeable: each one's algorithm has to finish the stage from the other's setup state. Interchangeable entries are replaced, with a warning.
    ///
    /// # Errors
    ///
    /// Returns `PatternCollisionError` if an entry with the same pattern solves the case differently. The database is left unchanged.
    pub fn register(&mut self, entry: AlgorithmEntry) -> Result<Registration, PatternCollisionError> {
        let Some(existing) = self.entries.get(&entry.pattern) else {
            debug!("Registered {entry} for {}", entry.pattern);
            self.entries.insert(entry.pattern, entry);
            return Ok(Registration::Added);
        };

        // Each setup state's pattern is `rotation_offset` turns from canonical
        let to_existing = (4 + existing.rotation_offset - entry.rotation_offset) % 4;
        let to_new = (4 + entry.rotation_offset - existing.rotation_offset) % 4;

        let interchangeable = entry.completes_from(&existing.setup_state(), to_existing)
            && existing.completes_from(&entry.setup_state(), to_new);

        if !interchangeable {
            return Err(PatternCollisionError {
                pattern: entry.pattern,
                existing: existing.to_string(),
                new: entry.to_string(),
            });
        }

        warn!(
            "Overwriting `{}` with `{}` for the pattern {}",
            existing.name, entry.name, entry.pattern
        );
        self.entries.insert(entry.pattern, entry);

        Ok(Registration::Replaced)
    }

    /// Look up an observed pattern.
    ///
    /// The returned offset is the number of clockwise U turns to perform before the stored algorithm.
    #[must_use]
    pub fn match_pattern(&self, observed: &Pattern) -> Option<AlgorithmMatch<'_>> {
        let canonical = observed.canonicalize();
        let entry = self.entries.get(&canonical.canonical)?;

        Some(AlgorithmMatch {
            entry,
            rotation_offset: (4 + canonical.rotation_offset - entry.rotation_offset) % 4,
        })
    }

    /// Look up the last layer case of a state
    #[must_use]
    pub fn match_state(&self, state: &CubeState, kind: PatternKind) -> Option<AlgorithmMatch<'_>> {
        self.match_pattern(&extract(state, kind))
    }

    /// Every entry of one kind, in pattern order
    pub fn entries(&self, kind: PatternKind) -> impl Iterator<Item = &AlgorithmEntry> {
        self.entries
            .values()
            .filter(move |entry| entry.kind() == kind)
    }

    #[must_use]
    pub fn get(&self, pattern: &Pattern) -> Option<&AlgorithmEntry> {
        self.entries.get(pattern)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
