//! kr-save: snapshots of a running simulation
//!
//! A snapshot holds every creature, dead or alive, together with the tuning
//! and the message log. Levels and controllers are supplied by the embedding
//! program and are not part of it.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use kr_core::creature::Creature;
use kr_core::world::{MessageLog, Tuning, World};

/// Current snapshot format version
pub const SAVE_VERSION: u32 = 1;

/// Save/restore errors
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Save file not found")]
    NotFound,

    #[error("Incompatible save version: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },

    #[error("Invalid save file header")]
    InvalidHeader,

    #[error("Header promises {expected} creatures, file holds {found}")]
    CreatureCount { expected: usize, found: usize },
}

/// Snapshot header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveHeader {
    pub magic: String,
    pub version: u32,
    pub seed: u64,
    pub real_time: f64,
    pub creatures: usize,
    pub living: usize,
    /// Seconds since the epoch at save time
    pub timestamp: u64,
}

impl SaveHeader {
    const MAGIC: &'static str = "KRCS";

    pub fn new(world: &World, seed: u64) -> Self {
        Self {
            magic: Self::MAGIC.to_string(),
            version: SAVE_VERSION,
            seed,
            real_time: world.real_time(),
            creatures: world.ids().len(),
            living: world.living().len(),
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    pub fn validate(&self) -> Result<(), SaveError> {
        if self.magic != Self::MAGIC {
            return Err(SaveError::InvalidHeader);
        }
        if self.version != SAVE_VERSION {
            return Err(SaveError::IncompatibleVersion {
                expected: SAVE_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    header: SaveHeader,
    tuning: &'a Tuning,
    creatures: Vec<&'a Creature>,
    messages: &'a MessageLog,
}

/// A loaded snapshot
#[derive(Debug, Deserialize)]
pub struct Snapshot {
    pub header: SaveHeader,
    pub tuning: Tuning,
    pub creatures: Vec<Creature>,
    pub messages: MessageLog,
}

impl Snapshot {
    /// Creatures that were alive when the snapshot was taken
    pub fn living(&self) -> impl Iterator<Item = &Creature> {
        self.creatures.iter().filter(|c| !c.is_dead())
    }

    pub fn creature(&self, name: &str) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.name == name)
    }

    fn check(self) -> Result<Self, SaveError> {
        self.header.validate()?;
        if self.header.creatures != self.creatures.len() {
            return Err(SaveError::CreatureCount {
                expected: self.header.creatures,
                found: self.creatures.len(),
            });
        }
        Ok(self)
    }
}

fn snapshot_ref(world: &World, seed: u64) -> SnapshotRef<'_> {
    SnapshotRef {
        header: SaveHeader::new(world, seed),
        tuning: world.tuning(),
        creatures: world.ids().into_iter().filter_map(|id| world.creature(id)).collect(),
        messages: world.messages(),
    }
}

/// Serialize a world to a JSON string
pub fn to_json(world: &World, seed: u64) -> Result<String, SaveError> {
    Ok(serde_json::to_string_pretty(&snapshot_ref(world, seed))?)
}

/// Parse and validate a snapshot from a JSON string
pub fn from_json(json: &str) -> Result<Snapshot, SaveError> {
    let snapshot: Snapshot = serde_json::from_str(json)?;
    snapshot.check()
}

/// Write a snapshot of the world to a file
pub fn save_world(world: &World, seed: u64, path: impl AsRef<Path>) -> Result<(), SaveError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &snapshot_ref(world, seed))?;
    info!(path = %path.display(), "snapshot saved");
    Ok(())
}

/// Load a snapshot from a file
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Snapshot, SaveError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|_| SaveError::NotFound)?;
    let reader = BufReader::new(file);
    let snapshot: Snapshot = serde_json::from_reader(reader)?;
    debug!(path = %path.display(), creatures = snapshot.creatures.len(), "snapshot loaded");
    snapshot.check()
}

/// Load only the header of a snapshot
pub fn load_header(path: impl AsRef<Path>) -> Result<SaveHeader, SaveError> {
    Ok(load_snapshot(path)?.header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kr_core::creature::CreatureTemplate;
    use kr_core::geom::Vec2;
    use kr_core::world::{GridLevel, NoOpController};

    fn world() -> World {
        let mut w = World::new(Box::new(GridLevel::new(6, 6)), 42);
        let tribe = w.add_tribe("guards");
        w.spawn(
            CreatureTemplate::humanoid("sentry", 12, 12, 100),
            tribe,
            Vec2::new(1, 1),
            Box::new(NoOpController),
        );
        w
    }

    #[test]
    fn test_header_validation() {
        let header = SaveHeader::new(&world(), 42);
        assert!(header.validate().is_ok());
        assert_eq!(header.creatures, 1);

        let mut bad_header = header.clone();
        bad_header.magic = "XXXX".to_string();
        assert!(matches!(bad_header.validate(), Err(SaveError::InvalidHeader)));

        let mut old_header = header;
        old_header.version = 999;
        assert!(matches!(
            old_header.validate(),
            Err(SaveError::IncompatibleVersion { .. })
        ));
    }

    #[test]
    fn test_load_nonexistent() {
        let result = load_snapshot("/nonexistent/path/save.json");
        assert!(matches!(result, Err(SaveError::NotFound)));
    }

    #[test]
    fn test_creature_count_checked() {
        let json = to_json(&world(), 42).unwrap();
        let tampered = json.replace("\"creatures\": 1", "\"creatures\": 3");
        assert!(matches!(
            from_json(&tampered),
            Err(SaveError::CreatureCount { expected: 3, found: 1 })
        ));
    }
}
