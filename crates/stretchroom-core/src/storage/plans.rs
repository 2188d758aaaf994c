//! Plan storage: one TOML file per exercise plan.
//!
//! Plans live at `<data_dir>/plans/<exercise_id>.toml`. The engine never
//! writes here; only the editing surface does.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::data_dir;
use crate::error::{CoreError, Result, StorageError};
use crate::plan::ExerciseConfig;

#[derive(Debug, Clone)]
pub struct PlanStore {
    dir: PathBuf,
}

impl PlanStore {
    /// Open the store under the default data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open() -> Result<Self> {
        Self::with_dir(data_dir()?.join("plans"))
    }

    /// Open a store rooted at `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        let valid = !id.trim().is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidId(id.to_string()).into());
        }
        Ok(self.dir.join(format!("{id}.toml")))
    }

    /// All stored plans, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read. Unparsable plan files
    /// are skipped with a warning.
    pub fn list(&self) -> Result<Vec<ExerciseConfig>> {
        let mut plans = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.extension().is_some_and(|ext| ext == "toml") {
                continue;
            }
            match load_file(&path) {
                Ok(plan) => plans.push(plan),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable plan"),
            }
        }
        plans.sort_by(|a, b| {
            a.exercise_name
                .to_lowercase()
                .cmp(&b.exercise_name.to_lowercase())
                .then_with(|| a.exercise_id.cmp(&b.exercise_id))
        });
        Ok(plans)
    }

    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if no plan has this id.
    pub fn load(&self, id: &str) -> Result<ExerciseConfig> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Err(StorageError::NotFound(id.to_string()).into());
        }
        load_file(&path)
    }

    /// Write `plan`, replacing any plan with the same id.
    ///
    /// # Errors
    ///
    /// Returns an error for an id that is not file-name safe or if the file
    /// cannot be written.
    pub fn save(&self, plan: &ExerciseConfig) -> Result<PathBuf> {
        let path = self.path_for(&plan.exercise_id)?;
        let content = toml::to_string_pretty(plan)?;
        std::fs::write(&path, content)?;
        debug!(id = %plan.exercise_id, path = %path.display(), "plan saved");
        Ok(path)
    }

    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if no plan has this id.
    pub fn delete(&self, id: &str) -> Result<()> {
        let path = self.path_for(id)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(id.to_string()).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Case-insensitive lookup by plan name.
    ///
    /// # Errors
    ///
    /// Returns an error if listing the store fails.
    pub fn find_by_name(&self, name: &str) -> Result<Option<ExerciseConfig>> {
        let wanted = name.trim().to_lowercase();
        Ok(self
            .list()?
            .into_iter()
            .find(|p| p.exercise_name.trim().to_lowercase() == wanted))
    }

    /// Look a plan up by id, then by name.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] when neither matches.
    pub fn find(&self, reference: &str) -> Result<ExerciseConfig> {
        match self.load(reference) {
            Ok(plan) => return Ok(plan),
            Err(CoreError::Storage(StorageError::NotFound(_) | StorageError::InvalidId(_))) => {}
            Err(e) => return Err(e),
        }
        self.find_by_name(reference)?
            .ok_or_else(|| StorageError::NotFound(reference.to_string()).into())
    }
}

/// Read a plan from a `.toml` or `.json` file.
///
/// # Errors
///
/// Returns [`StorageError::Corrupt`] if the file does not parse.
pub fn load_file(path: &Path) -> Result<ExerciseConfig> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path.extension().is_some_and(|ext| ext == "json");
    let parsed = if is_json {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    } else {
        toml::from_str(&content).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| {
        StorageError::Corrupt {
            path: path.to_path_buf(),
            message,
        }
        .into()
    })
}
