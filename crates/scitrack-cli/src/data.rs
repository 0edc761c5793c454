//! Loading reference tables, settings and save documents from disk.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use scitrack_logic::reference::ReferenceTables;
use scitrack_logic::settings::Settings;
use serde_json::Value;

// ── Stock reference tables ──────────────────────────────────────────────
const EXPERIMENTS_JSON: &str = include_str!("../../../data/experiments.json");
const BODIES_JSON: &str = include_str!("../../../data/celestial_bodies.json");

const EXPERIMENTS_FILE: &str = "experiments.json";
const BODIES_FILE: &str = "celestial_bodies.json";

/// Raw JSON text of both reference tables.
pub struct Sources {
    pub origin: String,
    pub experiments: String,
    pub bodies: String,
}

pub fn load_sources(data_dir: Option<&Path>) -> Result<Sources> {
    let Some(dir) = data_dir else {
        return Ok(Sources {
            origin: "built-in".into(),
            experiments: EXPERIMENTS_JSON.into(),
            bodies: BODIES_JSON.into(),
        });
    };
    let read = |name: &str| {
        let path = dir.join(name);
        fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
    };
    Ok(Sources {
        origin: dir.display().to_string(),
        experiments: read(EXPERIMENTS_FILE)?,
        bodies: read(BODIES_FILE)?,
    })
}

pub fn load_tables(data_dir: Option<&Path>) -> Result<ReferenceTables> {
    let sources = load_sources(data_dir)?;
    let tables = ReferenceTables::from_json(&sources.experiments, &sources.bodies)
        .with_context(|| format!("loading reference tables ({})", sources.origin))?;
    log::info!("Using {} reference tables", sources.origin);
    Ok(tables)
}

pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("reading settings {}", path.display()))?;
    Settings::from_json(&text).with_context(|| format!("parsing settings {}", path.display()))
}

pub fn load_save(path: &Path) -> Result<Value> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading save {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing save {}", path.display()))
}
