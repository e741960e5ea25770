use crate::{
    domain::board::{BoardState, Column, ColumnId},
    error::{BoardError, Result},
};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::Path};
use tokio::fs;

/// A column the board starts with when nothing has been persisted yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSeed {
    pub id: String,
    pub title: String,
}

impl ColumnSeed {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Board configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub name: String,
    /// Name of the durable blob the board is mirrored to
    pub blob_name: String,
    pub default_columns: Vec<ColumnSeed>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            name: "Todo Board".to_string(),
            blob_name: "todo-board".to_string(),
            default_columns: vec![ColumnSeed::new("column-1", "To Do")],
        }
    }
}

impl BoardConfig {
    /// Parses a JSON config; missing fields fall back to the defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: BoardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a JSON config file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(BoardError::ConfigError(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path).await?;
        Self::from_json_str(&contents)
    }

    /// Rejects configs the store could not honor
    pub fn validate(&self) -> Result<()> {
        if self.blob_name.trim().is_empty() {
            return Err(BoardError::ConfigError("blob_name must not be empty".to_string()));
        }

        let mut seen = HashSet::new();
        for seed in &self.default_columns {
            if seed.id.trim().is_empty() {
                return Err(BoardError::ConfigError(
                    "default column ids must not be empty".to_string(),
                ));
            }
            if !seen.insert(seed.id.as_str()) {
                return Err(BoardError::ConfigError(format!(
                    "duplicate default column id: {}",
                    seed.id
                )));
            }
        }
        Ok(())
    }

    /// Fresh board holding the default columns
    pub fn initial_state(&self) -> BoardState {
        let columns = self
            .default_columns
            .iter()
            .map(|seed| Column::new(ColumnId::new(seed.id.as_str()), seed.title.clone()))
            .collect();
        BoardState::new(columns)
    }
}
