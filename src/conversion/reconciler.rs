/*!
 * Overlap reconciliation.
 *
 * Auto-generated captions arrive as a stream of revisions whose display
 * windows often run into each other. The sweep here resolves every overlap
 * with a last-writer-priority rule:
 *
 * - if the next cue starts after the current one starts, the current cue is
 *   cut off where the next begins;
 * - if the next cue starts at or before the current one, the current cue is
 *   dropped and the next one replaces it.
 *
 * Text of overlapping cues is never concatenated. The size of the overlap
 * plays no role.
 */

use log::debug;

use crate::conversion::cue::Cue;
use crate::conversion::diagnostics::Diagnostics;

/// Options for the reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// When set, consecutive cues repeating the same caption are merged if
    /// the gap between them is at most this many milliseconds.
    pub merge_repeats_within_ms: Option<u64>,
}

/// Sort cues by start time and remove all overlaps.
///
/// The returned sequence is sorted by `start_ms` and no cue ends after the
/// next one starts.
pub fn reconcile(mut cues: Vec<Cue>, options: &ReconcileOptions, diagnostics: &mut Diagnostics) -> Vec<Cue> {
    // Stable: cues sharing a start time keep their input order.
    cues.sort_by_key(Cue::start_ms);

    let mut reconciled = Vec::with_capacity(cues.len());
    let mut cues = cues.into_iter();
    let Some(mut current) = cues.next() else {
        return reconciled;
    };

    for next in cues {
        if next.start_ms() >= current.end_ms() {
            reconciled.push(current);
        } else if let Some(truncated) = current.truncated_to(next.start_ms()) {
            debug!(
                "Truncating cue at {}ms from {}ms to {}ms",
                current.start_ms(), current.end_ms(), next.start_ms()
            );
            diagnostics.truncated_cues += 1;
            reconciled.push(truncated);
        } else {
            debug!("Discarding cue at {}ms in favour of a later revision", current.start_ms());
            diagnostics.discarded_cues += 1;
        }
        current = next;
    }
    reconciled.push(current);

    let mut reconciled = match options.merge_repeats_within_ms {
        Some(tolerance_ms) => merge_repeats(reconciled, tolerance_ms, diagnostics),
        None => reconciled,
    };

    reconciled.retain(|cue| cue.end_ms() > cue.start_ms());
    reconciled
}

/// Coalesce neighbouring cues that show the same caption.
///
/// Expects a sorted, overlap-free sequence and keeps it that way: the merged
/// cue spans from the first start to the second end.
pub fn merge_repeats(cues: Vec<Cue>, tolerance_ms: u64, diagnostics: &mut Diagnostics) -> Vec<Cue> {
    let mut merged: Vec<Cue> = Vec::with_capacity(cues.len());

    for cue in cues {
        if let Some(last) = merged.last_mut() {
            let within_gap = cue.start_ms() <= last.end_ms().saturating_add(tolerance_ms);
            if within_gap && same_caption(last.text(), cue.text()) {
                *last = last.extended_to(cue.end_ms());
                diagnostics.merged_repeats += 1;
                continue;
            }
        }
        merged.push(cue);
    }

    merged
}

fn same_caption(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
