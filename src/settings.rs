use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::WardenError;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    pub snapshot: SnapshotSource,
    pub evaluator: Evaluator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotSource {
    /// A `.kdl`/`.json` file, or a directory of them. Default: policies
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Evaluator {
    #[serde(default)]
    pub mode: EvaluationMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// Walk the graph on every query.
    OnDemand,
    /// Precompute every principal's grants once, then answer by lookup.
    #[default]
    Indexed,
}

impl Default for SnapshotSource {
    fn default() -> Self {
        Self {
            path: PathBuf::from("policies"),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> Result<Self, WardenError> {
        let mut builder = config::Config::builder()
            .set_default(
                "snapshot.path",
                SnapshotSource::default().path.to_string_lossy().to_string(),
            )?
            .set_default("evaluator.mode", "indexed")?;

        // Optional file
        if Path::new(path).exists() {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment overrides: WARDEN__EVALUATOR__MODE=on_demand, etc.
        builder = builder.add_source(config::Environment::with_prefix("WARDEN").separator("__"));

        let cfg = builder.build()?;
        let mut s: Settings = cfg.try_deserialize()?;

        if s.snapshot.path.is_relative() {
            s.snapshot.path = std::env::current_dir()?.join(&s.snapshot.path);
        }

        Ok(s)
    }
}
