//! girya - kettlebell circuit generator and workout tracker
//!
//! гиря (girya) - the Russian kettlebell

pub mod bot;
pub mod config;
pub mod db;
pub mod exercises;
pub mod goals;
pub mod planner;
pub mod service;
pub mod session;
pub mod tui;
pub mod workout;

pub use config::Config;
pub use service::WorkoutService;
