//! Engine warnings with colored terminal output.
//!
//! Provides deduplication so a builder that repeats the same mistake across
//! hundreds of nodes reports it once. Used by the tree and serializer to flag
//! input that is accepted but silently adjusted.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

fn key(component: &str, message: &str) -> String {
    format!("[{component}] {message}")
}

/// Warn about lossy input (prints once per unique message)
///
/// # Example
/// ```
/// use pocdom_common::warning::warn_once;
///
/// warn_once("Generate", "self-closing <br> has children; children were skipped");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key(component, message));

    if should_print {
        eprintln!("{}", format!("[pocdom {component}] ⚠ {message}").yellow());
    }
}

/// Whether `warn_once` has already reported this message.
#[must_use]
pub fn has_warned(component: &str, message: &str) -> bool {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key(component, message)))
}

/// Clear all recorded warnings (call before building a new document)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
