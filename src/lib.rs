//! Library exports for the myazo screenshot uploader.
//!
//! A run goes config → capture → (metadata strip) → upload → dispatch. Each
//! stage is exposed on its own so the binary, tests, and other front ends can
//! drive them with injected dependencies.

pub mod app;
pub mod capture;
pub mod clipboard;
pub mod config;
pub mod dispatch;
pub mod upload;

pub use app::{App, AppError};
pub use config::Settings;
