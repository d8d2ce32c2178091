//! Selection snapshots.
//!
//! Focus-stealing UI (a color picker, a gradient popover) clears the live
//! selection before the user's choice arrives. The editor keeps a copy of
//! the last selection and the last caret so the style can still be applied
//! where the user meant it. Snapshots expire after a configurable age.
//!
//! Every function taking a clock has an `_at` twin with an explicit `now`,
//! which is what the tests drive.

use std::time::{Duration, Instant};

use tinct_dom::{BoundaryPoint, DomTree, NodeId, Range};
use tracing::debug;

/// Whether a snapshot was taken from a text selection or a bare caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    /// A non-collapsed range.
    Selection,
    /// A collapsed range.
    Caret,
}

/// A copy of the live selection at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSnapshot {
    /// The captured range. Static; check it with [`is_range_valid`] first.
    pub range: Range,
    /// When the snapshot was taken.
    pub captured_at: Instant,
    /// Selection or caret.
    pub kind: SnapshotKind,
    /// The selected text, for selection snapshots.
    pub text: Option<String>,
}

impl SelectionSnapshot {
    /// How old the snapshot is at `now`.
    #[must_use]
    pub fn age_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.captured_at)
    }

    /// Returns true if the snapshot is older than `max_age` at `now`.
    #[must_use]
    pub fn is_stale_at(&self, now: Instant, max_age: Duration) -> bool {
        self.age_at(now) > max_age
    }
}

/// Returns true if both boundary points are attached to the document.
///
/// Never panics, even for ranges into subtrees that have since been
/// detached or ids that were never allocated.
#[must_use]
pub fn is_range_valid(tree: &DomTree, range: &Range) -> bool {
    range.is_valid(tree)
}

/// Returns true if `range` is valid and both of its ends, and hence its
/// common ancestor, lie inside `host` (the host itself included).
#[must_use]
pub fn is_range_in_host(tree: &DomTree, range: &Range, host: NodeId) -> bool {
    is_range_valid(tree, range)
        && tree.contains(host, range.start_container())
        && tree.contains(host, range.end_container())
        && range
            .common_ancestor_container(tree)
            .is_some_and(|common| tree.contains(host, common))
}

/// The range covering characters `start..end` of `host`'s text, counted in
/// Unicode scalar values across all its text nodes.
///
/// Boundaries that fall between two text nodes are placed at the start of
/// the following node for `start` and the end of the preceding node for
/// `end`, so selecting exactly a span's text lands inside that span.
/// Returns None if the offsets are out of order or past the end.
#[must_use]
pub fn text_range(tree: &DomTree, host: NodeId, start: usize, end: usize) -> Option<Range> {
    if start > end {
        return None;
    }
    let mut texts = Vec::new();
    let mut offset = 0;
    for node in tree.descendants(host) {
        if let Some(data) = tree.as_text(node) {
            let len = data.chars().count();
            texts.push((node, offset, len));
            offset += len;
        }
    }
    let total = offset;
    if end > total {
        return None;
    }

    let start_point = texts
        .iter()
        .find(|&&(_, at, len)| start < at + len)
        .map(|&(node, at, _)| (node, start - at))
        .or_else(|| texts.last().map(|&(node, _, len)| (node, len)))
        .unwrap_or((host, 0));
    if start == end {
        return Some(Range::collapsed_at(start_point.0, start_point.1));
    }
    let end_point = texts
        .iter()
        .find(|&&(_, at, len)| end <= at + len && end > at)
        .map(|&(node, at, _)| (node, end - at))?;
    Some(Range::new(
        BoundaryPoint::new(start_point.0, start_point.1),
        BoundaryPoint::new(end_point.0, end_point.1),
    ))
}

/// Snapshot the live selection if it lies inside `host`.
#[must_use]
pub fn capture_selection(tree: &DomTree, host: NodeId) -> Option<SelectionSnapshot> {
    capture_selection_at(tree, host, Instant::now())
}

/// [`capture_selection`] with an explicit capture time.
#[must_use]
pub fn capture_selection_at(tree: &DomTree, host: NodeId, now: Instant) -> Option<SelectionSnapshot> {
    let range = tree.selection()?;
    if !is_range_in_host(tree, &range, host) {
        return None;
    }
    let (kind, text) = if range.collapsed() {
        (SnapshotKind::Caret, None)
    } else {
        (SnapshotKind::Selection, Some(range.text(tree)))
    };
    Some(SelectionSnapshot {
        range,
        captured_at: now,
        kind,
        text,
    })
}

/// Make `snapshot` the live selection again.
///
/// Returns false, leaving the live selection alone, if there is no
/// snapshot, it is older than `max_age`, or its range no longer lies inside
/// `host`.
pub fn restore_selection(
    tree: &mut DomTree,
    snapshot: Option<&SelectionSnapshot>,
    host: NodeId,
    max_age: Duration,
) -> bool {
    restore_selection_at(tree, snapshot, host, max_age, Instant::now())
}

/// [`restore_selection`] with an explicit clock reading.
pub fn restore_selection_at(
    tree: &mut DomTree,
    snapshot: Option<&SelectionSnapshot>,
    host: NodeId,
    max_age: Duration,
    now: Instant,
) -> bool {
    let Some(snapshot) = snapshot else {
        debug!("no selection snapshot to restore");
        return false;
    };
    if snapshot.is_stale_at(now, max_age) {
        debug!(age = ?snapshot.age_at(now), ?max_age, "selection snapshot is stale");
        return false;
    }
    if !is_range_in_host(tree, &snapshot.range, host) {
        debug!(range = ?snapshot.range, "selection snapshot no longer inside host");
        return false;
    }
    tree.remove_all_ranges();
    tree.set_selection(snapshot.range);
    true
}

/// The range a style should be applied to.
///
/// In order of preference: the live selection if it lies inside `host`,
/// the last selection snapshot, the last caret snapshot. Snapshots that are
/// stale or no longer inside `host` are skipped.
#[must_use]
pub fn get_best_selection_range(
    tree: &DomTree,
    host: NodeId,
    last_selection: Option<&SelectionSnapshot>,
    last_caret: Option<&SelectionSnapshot>,
    max_age: Duration,
) -> Option<Range> {
    get_best_selection_range_at(tree, host, last_selection, last_caret, max_age, Instant::now())
}

/// [`get_best_selection_range`] with an explicit clock reading.
#[must_use]
pub fn get_best_selection_range_at(
    tree: &DomTree,
    host: NodeId,
    last_selection: Option<&SelectionSnapshot>,
    last_caret: Option<&SelectionSnapshot>,
    max_age: Duration,
    now: Instant,
) -> Option<Range> {
    if let Some(live) = tree.selection()
        && is_range_in_host(tree, &live, host)
    {
        return Some(live);
    }
    let usable = |snapshot: &&SelectionSnapshot| {
        !snapshot.is_stale_at(now, max_age) && is_range_in_host(tree, &snapshot.range, host)
    };
    last_selection
        .filter(usable)
        .or_else(|| last_caret.filter(usable))
        .map(|snapshot| snapshot.range)
}
