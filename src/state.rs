use crate::engine::GoalEngine;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub engine: Arc<Mutex<GoalEngine>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, engine: GoalEngine) -> Self {
        Self {
            data_path,
            engine: Arc::new(Mutex::new(engine)),
        }
    }
}
