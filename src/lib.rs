pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod id;
pub mod models;
pub mod portal;
pub mod session;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::ComplaintStore;
