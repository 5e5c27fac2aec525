use crate::Synthesis::material::MaterialRecord;
use crate::Synthesis::valence::OxidationStateTable;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File '{0}' does not exist")]
    NotFound(String),
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Precursors and targets mined from one synthesis paragraph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeBatch {
    #[serde(default)]
    pub precursors: Vec<MaterialRecord>,
    #[serde(default)]
    pub targets: Vec<MaterialRecord>,
}

pub struct LoadData {
    pub file_name: String,
}

impl LoadData {
    pub fn new(file_name: String) -> Self {
        LoadData { file_name }
    }
    pub fn load_batch(&self) -> Result<RecipeBatch, LoadError> {
        load_recipe_batch(&self.file_name)
    }
    pub fn load_oxidation_table(&self) -> Result<OxidationStateTable, LoadError> {
        load_oxidation_table(&self.file_name)
    }
}

fn read_existing(file_name: &str) -> Result<String, LoadError> {
    let path = Path::new(file_name);
    if !path.exists() {
        error!("File '{}' does not exist", file_name);
        return Err(LoadError::NotFound(file_name.to_string()));
    }
    Ok(fs::read_to_string(path)?)
}

/// Reads a batch `{ "precursors": [...], "targets": [...] }`; missing lists are empty.
pub fn load_recipe_batch(file_name: &str) -> Result<RecipeBatch, LoadError> {
    let content = read_existing(file_name)?;
    let batch: RecipeBatch = serde_json::from_str(&content).map_err(|e| {
        error!("Invalid recipe batch in '{}': {}", file_name, e);
        LoadError::from(e)
    })?;
    info!(
        "Loaded {} precursors and {} targets from '{}'",
        batch.precursors.len(),
        batch.targets.len(),
        file_name
    );
    Ok(batch)
}

/// Reads precomputed oxidation states `{ "formula": [ {"El": state, ...}, ... ] }`
pub fn load_oxidation_table(file_name: &str) -> Result<OxidationStateTable, LoadError> {
    let content = read_existing(file_name)?;
    let table: OxidationStateTable = serde_json::from_str(&content)?;
    info!("Loaded oxidation states of {} formulas from '{}'", table.len(), file_name);
    Ok(table)
}
