//! # Fomo Core Library
//!
//! Task board engine: tasks grouped into ordered groups, a deterministic
//! ordering engine, and frequency-based recurring tasks that materialize
//! their next occurrence when completed.
//!
//! ## Core Modules
//!
//! - [`db`]: Database connection and migration management
//! - [`models`]: Core data structures and transfer objects
//! - [`ordering`]: Sort criteria and the comparator chains behind them
//! - [`recurrence`]: Next-occurrence calculation
//! - [`board`]: Board columns, inbox, spotlight and statistics
//! - [`repository`]: Data access layer with Repository pattern
//! - [`validation`]: Input checks shared by every entry point
//! - [`timezone`]: Timezone utilities
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use fomo_core::{
//!     db, models::{NewTaskData, RepeatFrequency, ToggleResult},
//!     repository::{GroupRepository, SqliteRepository, TaskRepository},
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = db::establish_connection("fomo.db").await?;
//!     let repo = SqliteRepository::with_defaults(pool);
//!     repo.ensure_default_groups().await?;
//!
//!     let task = repo.add_task(NewTaskData {
//!         title: "Water plants".to_string(),
//!         repeat_frequency: Some(RepeatFrequency::Weekly),
//!         ..Default::default()
//!     }).await?;
//!
//!     if let ToggleResult::Completed { next: Some(next), .. } = repo.toggle_completion(task.id).await? {
//!         println!("Next occurrence due {:?}", next.due_at);
//!     }
//!     Ok(())
//! }
//! ```

pub mod board;
pub mod db;
pub mod error;
pub mod models;
pub mod ordering;
pub mod recurrence;
pub mod repository;
pub mod timezone;
pub mod validation;
