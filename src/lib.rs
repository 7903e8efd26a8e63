pub mod app;
pub mod dates;
pub mod engine;
pub mod errors;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;

pub use app::router;
pub use engine::GoalEngine;
pub use state::AppState;
pub use storage::{load_data, resolve_data_path};
