//! Slot allocation policies built on gap finding.

use chrono::Duration;

use super::block::{Block, BlockKind};
use crate::timeline::{GapFinder, TimeGap, TimeInterval};

/// Pick the longest free gap of at least `min` inside `bound`.
///
/// On an exact tie the earliest gap wins. A gap longer than `max` is cut
/// to `max`, keeping its start. Returns `None` when no gap qualifies.
pub fn best_single_slot(
    bound: &TimeInterval,
    busy: &[TimeInterval],
    min: Duration,
    max: Duration,
    kind: BlockKind,
) -> Option<Block> {
    let gaps = GapFinder::new().with_min_duration(min).find_gaps(bound, busy);

    // Gaps arrive in ascending start order; only a strictly longer gap
    // replaces the current pick.
    let mut best: Option<&TimeGap> = None;
    for gap in &gaps {
        match best {
            Some(current) if gap.duration() <= current.duration() => {}
            _ => best = Some(gap),
        }
    }

    let gap = best?;
    tracing::debug!(
        "best {} slot: {} - {} ({} min of {} candidates)",
        kind,
        gap.start_time,
        gap.end_time,
        gap.duration_minutes(),
        gaps.len()
    );
    Some(Block::new(kind, gap.interval().truncate(max)))
}

/// One block per free gap of at least `min` inside `bound`, untruncated and
/// in ascending start order.
pub fn all_qualifying_slots(
    bound: &TimeInterval,
    busy: &[TimeInterval],
    min: Duration,
    kind: BlockKind,
) -> Vec<Block> {
    GapFinder::new()
        .with_min_duration(min)
        .find_gaps(bound, busy)
        .iter()
        .map(|gap| Block::new(kind, gap.interval()))
        .collect()
}
