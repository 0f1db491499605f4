//! Save files: world parameters and player edits as two TOML documents.
#![forbid(unsafe_code)]

use std::fs;
use std::io;
use std::path::Path;

use blockworld_edit::ChangeEntry;
use blockworld_runtime::WorldSnapshot;
use blockworld_world::WorldParams;
use serde::{Deserialize, Serialize};

pub const PARAMS_FILE: &str = "params.toml";
pub const CHANGES_FILE: &str = "changes.toml";
const CHANGES_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("save file io: {0}")]
    Io(#[from] io::Error),
    #[error("decoding save file: {0}")]
    De(#[from] toml::de::Error),
    #[error("encoding save file: {0}")]
    Ser(#[from] toml::ser::Error),
    #[error("unsupported changes file version {0}")]
    Version(u32),
}

#[derive(Serialize, Deserialize)]
struct ChangesFile {
    version: u32,
    #[serde(default)]
    changes: Vec<ChangeEntry>,
}

pub fn params_to_string(params: &WorldParams) -> Result<String, PersistError> {
    Ok(toml::to_string_pretty(params)?)
}

/// Parses a params blob; out-of-range values are clamped.
pub fn params_from_str(s: &str) -> Result<WorldParams, PersistError> {
    let params: WorldParams = toml::from_str(s)?;
    Ok(params.sanitized())
}

pub fn changes_to_string(changes: &[ChangeEntry]) -> Result<String, PersistError> {
    let file = ChangesFile {
        version: CHANGES_VERSION,
        changes: changes.to_vec(),
    };
    Ok(toml::to_string(&file)?)
}

pub fn changes_from_str(s: &str) -> Result<Vec<ChangeEntry>, PersistError> {
    let file: ChangesFile = toml::from_str(s)?;
    if file.version != CHANGES_VERSION {
        return Err(PersistError::Version(file.version));
    }
    Ok(file.changes)
}

/// Writes both blobs into `dir`, creating it if needed.
pub fn save_world(dir: &Path, snapshot: &WorldSnapshot) -> Result<(), PersistError> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(PARAMS_FILE), params_to_string(&snapshot.params)?)?;
    fs::write(dir.join(CHANGES_FILE), changes_to_string(&snapshot.changes)?)?;
    log::info!(
        target: "persist",
        "saved world to {} ({} edits)",
        dir.display(),
        snapshot.changes.len()
    );
    Ok(())
}

/// Reads a save directory. A missing changes file means no edits.
pub fn load_world(dir: &Path) -> Result<WorldSnapshot, PersistError> {
    let params = params_from_str(&fs::read_to_string(dir.join(PARAMS_FILE))?)?;
    let changes = match fs::read_to_string(dir.join(CHANGES_FILE)) {
        Ok(s) => changes_from_str(&s)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!(target: "persist", "{} has no {}; loading without edits", dir.display(), CHANGES_FILE);
            Vec::new()
        }
        Err(e) => return Err(e.into()),
    };
    log::info!(
        target: "persist",
        "loaded world from {} (seed {}, {} edits)",
        dir.display(),
        params.seed,
        changes.len()
    );
    Ok(WorldSnapshot { params, changes })
}
