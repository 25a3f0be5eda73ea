pub mod config;
pub mod error;
pub mod grid;
pub mod population;
pub mod scheduler;
pub mod seed;
pub mod sheep;
pub mod state;
pub mod view;
pub mod walk;
pub mod wolf;
