//! A single tracked run: parameters, metrics and artifacts

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{write_json, Experiment, META_FILE};

const PARAMS_FILE: &str = "params.json";
const METRICS_FILE: &str = "metrics.json";
const ARTIFACTS_DIR: &str = "artifacts";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Running,
    Finished,
}

/// Run metadata stored in `<run_dir>/meta.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunInfo {
    pub run_id: String,
    pub experiment_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub run_name: Option<String>,
    pub status: RunStatus,
    pub start_time: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end_time: Option<String>,
}

/// One logged value of a metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub value: f64,
    pub step: u64,
    pub timestamp: String,
}

/// An active run. Every `log_*` call is written through to disk.
#[derive(Debug)]
pub struct Run {
    dir: PathBuf,
    info: RunInfo,
    params: BTreeMap<String, String>,
    metrics: BTreeMap<String, Vec<MetricPoint>>,
}

impl Run {
    pub(crate) fn start(experiment_dir: &Path, experiment: &Experiment, run_name: Option<&str>) -> Result<Self> {
        let (run_id, dir) = fresh_run_dir(experiment_dir)?;

        let run = Self {
            dir,
            info: RunInfo {
                run_id,
                experiment_id: experiment.experiment_id.clone(),
                run_name: run_name.map(|s| s.to_string()),
                status: RunStatus::Running,
                start_time: Utc::now().to_rfc3339(),
                end_time: None,
            },
            params: BTreeMap::new(),
            metrics: BTreeMap::new(),
        };

        write_json(&run.dir.join(META_FILE), &run.info)?;
        write_json(&run.dir.join(PARAMS_FILE), &run.params)?;
        write_json(&run.dir.join(METRICS_FILE), &run.metrics)?;
        Ok(run)
    }

    pub fn info(&self) -> &RunInfo {
        &self.info
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn artifacts_dir(&self) -> PathBuf {
        self.dir.join(ARTIFACTS_DIR)
    }

    /// Record a parameter. Logging the same key again overwrites it.
    pub fn log_param(&mut self, key: &str, value: impl ToString) -> Result<()> {
        self.params.insert(key.to_string(), value.to_string());
        write_json(&self.dir.join(PARAMS_FILE), &self.params)
    }

    /// Append a metric value; the step is the number of earlier values for the key.
    pub fn log_metric(&mut self, key: &str, value: f64) -> Result<()> {
        let history = self.metrics.entry(key.to_string()).or_default();
        history.push(MetricPoint {
            value,
            step: history.len() as u64,
            timestamp: Utc::now().to_rfc3339(),
        });
        write_json(&self.dir.join(METRICS_FILE), &self.metrics)
    }

    /// Copy every regular file directly inside `source` into the run's
    /// artifact directory. Returns the number of files copied.
    pub fn log_artifacts(&self, source: &Path) -> Result<usize> {
        let target = self.artifacts_dir();
        std::fs::create_dir_all(&target)
            .with_context(|| format!("Failed to create artifact directory: {}", target.display()))?;

        let entries = std::fs::read_dir(source)
            .with_context(|| format!("Failed to read artifact source: {}", source.display()))?;

        let mut copied = 0;
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name() {
                std::fs::copy(&path, target.join(name))
                    .with_context(|| format!("Failed to copy artifact: {}", path.display()))?;
                copied += 1;
            }
        }
        Ok(copied)
    }

    /// Copy one file into the run's artifact directory.
    pub fn log_artifact(&self, file: &Path) -> Result<PathBuf> {
        let target = self.artifacts_dir();
        std::fs::create_dir_all(&target)
            .with_context(|| format!("Failed to create artifact directory: {}", target.display()))?;

        let name = file
            .file_name()
            .with_context(|| format!("Artifact path has no file name: {}", file.display()))?;
        let dest = target.join(name);
        std::fs::copy(file, &dest)
            .with_context(|| format!("Failed to copy artifact: {}", file.display()))?;
        Ok(dest)
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Most recent value of a metric.
    pub fn latest_metric(&self, key: &str) -> Option<f64> {
        self.metrics.get(key)?.last().map(|p| p.value)
    }

    /// Mark the run finished and return its final metadata.
    pub fn end(mut self) -> Result<RunInfo> {
        self.info.status = RunStatus::Finished;
        self.info.end_time = Some(Utc::now().to_rfc3339());
        write_json(&self.dir.join(META_FILE), &self.info)?;
        Ok(self.info)
    }
}

fn fresh_run_dir(experiment_dir: &Path) -> Result<(String, PathBuf)> {
    let stamp = Utc::now().format("%Y%m%d%H%M%S%3f").to_string();

    for attempt in 0u32.. {
        let run_id = format!("{}{:04}", stamp, attempt);
        let dir = experiment_dir.join(&run_id);
        if dir.exists() {
            continue;
        }
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create run directory: {}", dir.display()))?;
        return Ok((run_id, dir));
    }
    anyhow::bail!("No free run id under {}", experiment_dir.display())
}

#[cfg(test)]
mod tests {
    use super::super::{read_json, TrackingStore};
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_params_are_written_through() {
        let dir = TempDir::new().unwrap();
        let store = TrackingStore::open(dir.path()).unwrap();
        let experiment = store.create_experiment("demo").unwrap();
        let mut run = store.start_run(&experiment, Some("first")).unwrap();

        run.log_param("parameter1", 3).unwrap();
        run.log_param("parameter1", 4).unwrap();

        let params: BTreeMap<String, String> = read_json(&run.dir().join("params.json")).unwrap();
        assert_eq!(params["parameter1"], "4");
    }

    #[test]
    fn test_metric_history_steps() {
        let dir = TempDir::new().unwrap();
        let store = TrackingStore::open(dir.path()).unwrap();
        let experiment = store.create_experiment("demo").unwrap();
        let mut run = store.start_run(&experiment, None).unwrap();

        run.log_metric("loss", 1.0).unwrap();
        run.log_metric("loss", 0.5).unwrap();

        let metrics: BTreeMap<String, Vec<MetricPoint>> =
            read_json(&run.dir().join("metrics.json")).unwrap();
        assert_eq!(metrics["loss"].len(), 2);
        assert_eq!(metrics["loss"][1].step, 1);
        assert_eq!(run.latest_metric("loss"), Some(0.5));
    }

    #[test]
    fn test_end_marks_finished() {
        let dir = TempDir::new().unwrap();
        let store = TrackingStore::open(dir.path()).unwrap();
        let experiment = store.create_experiment("demo").unwrap();
        let run = store.start_run(&experiment, None).unwrap();
        let run_dir = run.dir().to_path_buf();

        let info = run.end().unwrap();
        assert_eq!(info.status, RunStatus::Finished);
        assert!(info.end_time.is_some());

        let stored: RunInfo = read_json(&run_dir.join("meta.json")).unwrap();
        assert_eq!(stored, info);
    }

    #[test]
    fn test_log_artifacts_skips_directories() {
        let dir = TempDir::new().unwrap();
        let source = TempDir::new().unwrap();
        std::fs::write(source.path().join("a.txt"), "a").unwrap();
        std::fs::write(source.path().join("b.txt"), "b").unwrap();
        std::fs::create_dir(source.path().join("nested")).unwrap();

        let store = TrackingStore::open(dir.path()).unwrap();
        let experiment = store.create_experiment("demo").unwrap();
        let run = store.start_run(&experiment, None).unwrap();

        assert_eq!(run.log_artifacts(source.path()).unwrap(), 2);
        assert!(run.artifacts_dir().join("a.txt").is_file());
        assert!(!run.artifacts_dir().join("nested").exists());
    }

    #[test]
    fn test_consecutive_runs_get_distinct_ids() {
        let dir = TempDir::new().unwrap();
        let store = TrackingStore::open(dir.path()).unwrap();
        let experiment = store.create_experiment("demo").unwrap();

        let a = store.start_run(&experiment, None).unwrap();
        let b = store.start_run(&experiment, None).unwrap();
        assert_ne!(a.info().run_id, b.info().run_id);
        assert_eq!(store.list_runs(&experiment).unwrap().len(), 2);
    }
}
