pub mod api;
pub mod app;
pub mod components;
pub mod config;
pub mod fragments;
pub mod locator;
pub mod state;
pub mod types;
pub mod utils;

pub use config::AppConfig;
pub use state::ViewState;
pub use types::{MarkerPosition, Position, Slot, Tag, Vehicle};
