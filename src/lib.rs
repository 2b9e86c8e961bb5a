//! Virtual try-on on top of a generative image API.
//!
//! A [`TryOnClient`] wraps the four image operations (model image, garment
//! try-on, pose variation, body adjustment) around any [`ContentGenerator`];
//! [`GeminiClient`] is the HTTP one. A [`TryOnSession`] keeps the per-screen
//! state of one user on top of it.

pub mod config;
pub mod data_url;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod session;

pub use config::{Config, GeminiConfig};
pub use data_url::DataUrl;
pub use error::{Result, TryOnError};
pub use gemini::{
    extract_image, BodyAdjustment, ContentGenerator, GeminiClient, ImageInput, TryOnClient,
};
pub use models::*;
pub use session::{Outcome, ScreenKind, ScreenStatus, TryOnSession, Wardrobe};
