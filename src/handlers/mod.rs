//! Request handlers, one per route.
//!
//! ```text
//! /HttpTrigger     greeting.rs  (identity)
//! /abn_insights    insights.rs  (identity)
//! /abn_page        pages.rs
//! /audio_recorder  pages.rs     (identity)
//! /upload_audio    upload.rs
//! /health          health.rs
//! ```
//!
//! Handlers share no mutable state and never call each other.

pub mod greeting;
pub mod health;
pub mod insights;
pub mod pages;
pub mod upload;

pub use greeting::greet;
pub use health::health;
pub use insights::account_insights;
pub use pages::{audio_recorder, insights_page, Pages};
pub use upload::upload_audio;
