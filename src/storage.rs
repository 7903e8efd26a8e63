use crate::errors::AppError;
use crate::models::EngineData;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/goals.json"))
}

/// A missing file means first run; a corrupt one is discarded rather than
/// failing startup. Either way the engine starts from an empty state.
pub async fn load_data(path: &Path) -> EngineData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse goal data file: {err}");
                EngineData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => EngineData::default(),
        Err(err) => {
            error!("failed to read goal data file: {err}");
            EngineData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &EngineData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}
