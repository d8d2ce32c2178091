//! Warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the HTML, CSS and editor components to report markup they had to
//! drop or could not interpret.

use std::collections::HashSet;
use std::sync::Mutex;

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a recoverable problem (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("Sanitizer", "dropped unparseable data-gradient payload");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .map(|mut guard| guard.get_or_insert_with(HashSet::new).insert(key))
        // A poisoned set only loses deduplication; still report.
        .unwrap_or(true);

    if should_print {
        eprintln!("{}", format!("[tinct {component}] ⚠ {message}").yellow());
    }
}

/// Returns true if the given warning has already been reported.
#[must_use]
pub fn was_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .ok()
        .and_then(|guard| guard.as_ref().map(|set| set.contains(&key)))
        .unwrap_or(false)
}

/// Clear all recorded warnings (call when loading a new document)
pub fn clear_warnings() {
    if let Ok(mut guard) = WARNED.lock()
        && let Some(set) = guard.as_mut()
    {
        set.clear();
    }
}
