//! # Routinely Core Library
//!
//! This library provides the core logic for Routinely, a personal habit
//! tracker: morning, afternoon and evening routines that are checked off
//! daily, build streaks, may carry a journal entry (gratitude, planning,
//! affirmations), or run a guided meditation countdown.
//!
//! ## Architecture
//!
//! - **Meditation Timer**: a single-slot countdown state machine. The caller
//!   invokes `tick()` once per second; the tick that reaches zero reports the
//!   completion exactly once
//! - **Completion Policy**: decides whether a routine may be toggled and how
//!   completions, undos and journal saves affect streaks
//! - **Store**: the canonical routine list behind the [`RoutineStore`] trait,
//!   in memory or in SQLite
//! - **Tracker / Driver**: one tracker per surface ties the store, timer and
//!   editing state together; the driver schedules the 1 Hz ticks on tokio
//!
//! ## Key Components
//!
//! - [`MeditationTimer`]: countdown state machine
//! - [`CompletionPolicy`]: toggle gating and streak accounting
//! - [`RoutineTracker`]: per-surface facade
//! - [`TimerDriver`]: cancellable real-time tick schedule
//! - [`Database`]: routine persistence
//! - [`Config`]: application configuration management

pub mod driver;
pub mod error;
pub mod events;
pub mod policy;
pub mod routine;
pub mod stats;
pub mod storage;
pub mod store;
pub mod timer;
pub mod tracker;

pub use driver::{SharedTracker, TimerDriver};
pub use error::{ConfigError, CoreError, DatabaseError, StoreError, ValidationError};
pub use events::Event;
pub use policy::CompletionPolicy;
pub use routine::{
    Category, CustomRoutine, Frequency, JournalKind, NewRoutine, ProgressionStep, Routine,
    RoutineId, RoutineKind, RoutineTemplate, RoutineUpdate,
};
pub use stats::{group_by_category, CategorySummary, DaySummary};
pub use storage::{Config, Database};
pub use store::{MemoryStore, RoutineStore};
pub use timer::{format_time, MeditationTimer, TickHandle, TimerSlot};
pub use tracker::RoutineTracker;
