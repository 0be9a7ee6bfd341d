//! Local file-based experiment tracking
//!
//! Layout under the store root:
//!
//! ```text
//! <root>/<experiment_id>/meta.json
//! <root>/<experiment_id>/<run_id>/meta.json
//! <root>/<experiment_id>/<run_id>/params.json
//! <root>/<experiment_id>/<run_id>/metrics.json
//! <root>/<experiment_id>/<run_id>/artifacts/
//! ```
//!
//! Experiment ids are sequential integers assigned in creation order.

mod run;

pub use run::*;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Default store directory, relative to the working directory
pub const DEFAULT_TRACKING_DIR: &str = "mlruns";

const META_FILE: &str = "meta.json";

/// Experiment metadata stored in `<root>/<experiment_id>/meta.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub experiment_id: String,
    pub name: String,
    pub created_at: String,
}

/// Handle to a tracking directory
#[derive(Debug, Clone)]
pub struct TrackingStore {
    root: PathBuf,
}

impl TrackingStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create tracking directory: {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All experiments, ordered by id.
    pub fn list_experiments(&self) -> Result<Vec<Experiment>> {
        let entries = std::fs::read_dir(&self.root)
            .with_context(|| format!("Failed to list tracking directory: {}", self.root.display()))?;

        let mut experiments = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let meta = path.join(META_FILE);
            if path.is_dir() && meta.is_file() {
                experiments.push(read_json::<Experiment>(&meta)?);
            }
        }

        experiments.sort_by_key(|e| e.experiment_id.parse::<u64>().unwrap_or(u64::MAX));
        Ok(experiments)
    }

    pub fn get_experiment_by_name(&self, name: &str) -> Result<Option<Experiment>> {
        Ok(self.list_experiments()?.into_iter().find(|e| e.name == name))
    }

    /// Return the experiment called `name`, creating it if it does not exist.
    pub fn create_experiment(&self, name: &str) -> Result<Experiment> {
        let existing = self.list_experiments()?;
        if let Some(experiment) = existing.iter().find(|e| e.name == name) {
            return Ok(experiment.clone());
        }

        let next_id = existing
            .iter()
            .filter_map(|e| e.experiment_id.parse::<u64>().ok())
            .max()
            .map_or(0, |id| id + 1);

        let experiment = Experiment {
            experiment_id: next_id.to_string(),
            name: name.to_string(),
            created_at: Utc::now().to_rfc3339(),
        };

        let dir = self.experiment_dir(&experiment.experiment_id);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create experiment directory: {}", dir.display()))?;
        write_json(&dir.join(META_FILE), &experiment)?;

        Ok(experiment)
    }

    /// Start a new run under `experiment`.
    pub fn start_run(&self, experiment: &Experiment, run_name: Option<&str>) -> Result<Run> {
        Run::start(&self.experiment_dir(&experiment.experiment_id), experiment, run_name)
    }

    /// Runs recorded under an experiment, ordered by start time.
    pub fn list_runs(&self, experiment: &Experiment) -> Result<Vec<RunInfo>> {
        let dir = self.experiment_dir(&experiment.experiment_id);
        let entries = std::fs::read_dir(&dir)
            .with_context(|| format!("Failed to list experiment directory: {}", dir.display()))?;

        let mut runs = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let meta = path.join(META_FILE);
            if path.is_dir() && meta.is_file() {
                runs.push(read_json::<RunInfo>(&meta)?);
            }
        }

        runs.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        Ok(runs)
    }

    fn experiment_dir(&self, experiment_id: &str) -> PathBuf {
        self.root.join(experiment_id)
    }
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

pub(crate) fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}
