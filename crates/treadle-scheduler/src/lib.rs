// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Dynamic cron-driven job scheduler for Treadle.
//!
//! A [`SchedulerSupervisor`] owns a sequence of scheduling generations, each
//! bound to one immutable [`JobSettings`] snapshot and one cancellation
//! scope. Publishing a new snapshot into the [`SettingsStore`] cancels the
//! active generation, awaits it, and starts a fresh one against the new
//! snapshot — the schedule and execution policy change at runtime without a
//! process restart. Handlers are resolved per firing through a
//! [`HandlerRegistry`] and invoked with a per-firing
//! [`JobExecutionContext`].

pub mod context;
pub mod error;
mod generation;
pub mod handler;
pub mod registry;
pub mod schedule;
pub mod settings;
pub mod signal;
pub mod supervisor;

pub use context::JobExecutionContext;
pub use error::{JobError, Result, SchedulerError};
pub use handler::JobHandler;
pub use registry::HandlerRegistry;
pub use settings::{JobSettings, SettingsStore, MIN_POLL_INTERVAL_SECS};
pub use signal::{ChangeListener, ChangeSignal};
pub use supervisor::SchedulerSupervisor;
