pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod fonts;
pub mod job_controller;
pub mod render;
pub mod services;
pub mod session;
pub mod state;
