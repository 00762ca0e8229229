#![deny(missing_docs)]
//! Shared logging utilities for the campaign workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Records emitted while
//! a task is registered for the current thread are prefixed with its id, so a
//! polling session can be followed through the log.

use std::cell::RefCell;

thread_local! {
    /// Task id of the campaign currently being tracked on this thread.
    static ACTIVE_TASK: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Registers the task id that subsequent records on this thread refer to.
pub fn set_active_task(task_id: impl Into<String>) {
    let task_id = task_id.into();
    ACTIVE_TASK.with(|slot| *slot.borrow_mut() = Some(task_id));
}

/// Forgets the task id registered for this thread.
pub fn clear_active_task() {
    ACTIVE_TASK.with(|slot| *slot.borrow_mut() = None);
}

/// Returns the task id registered for this thread, if any.
pub fn active_task() -> Option<String> {
    ACTIVE_TASK.with(|slot| slot.borrow().clone())
}

/// Record prefix derived from the active task. Used by the macros.
#[doc(hidden)]
pub fn __record_prefix() -> String {
    match active_task() {
        Some(task_id) => format!("[task {task_id}] "),
        None => String::new(),
    }
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!("{}{}", $crate::__record_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!("{}{}", $crate::__record_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!("{}{}", $crate::__record_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!("{}{}", $crate::__record_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!("{}{}", $crate::__record_prefix(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
