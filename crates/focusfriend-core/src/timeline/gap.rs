//! Free-time detection within a bound.
//!
//! Gaps are found in two phases: busy intervals are clipped to the bound and
//! merged into maximal busy blocks, then the complement of those blocks
//! within the bound is emitted. The result does not depend on the order in
//! which busy intervals are supplied.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::interval::TimeInterval;

/// A detected stretch of free time inside a bound.
///
/// Always has a strictly positive duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeGap {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl TimeGap {
    /// Create a new time gap; zero or negative lengths yield `None`.
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Option<Self> {
        if end_time <= start_time {
            return None;
        }
        Some(Self {
            start_time,
            end_time,
        })
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Check if this gap can fit something of the given length
    pub fn can_fit(&self, duration: Duration) -> bool {
        self.duration() >= duration
    }

    pub fn interval(&self) -> TimeInterval {
        TimeInterval::starting_at(self.start_time, self.duration())
    }
}

/// Finder for free gaps inside a bound.
#[derive(Debug, Clone)]
pub struct GapFinder {
    /// Gaps shorter than this are dropped from the output.
    min_duration: Duration,
}

impl GapFinder {
    /// Create a finder that reports every positive-length gap.
    pub fn new() -> Self {
        Self {
            min_duration: Duration::zero(),
        }
    }

    /// Only report gaps at least `duration` long.
    pub fn with_min_duration(mut self, duration: Duration) -> Self {
        self.min_duration = duration;
        self
    }

    /// Find gaps within `bound` around `busy`.
    ///
    /// `busy` may be unsorted, overlapping, touching, or extend outside the
    /// bound. The returned gaps are sorted ascending, pairwise disjoint and
    /// contained in `bound`.
    pub fn find_gaps(&self, bound: &TimeInterval, busy: &[TimeInterval]) -> Vec<TimeGap> {
        let merged = merge_busy(bound, busy);

        let mut gaps = Vec::with_capacity(merged.len() + 1);
        let mut cursor = bound.start();

        for block in &merged {
            if let Some(gap) = TimeGap::new(cursor, block.start()) {
                gaps.push(gap);
            }
            cursor = cursor.max(block.end());
        }

        // Gap after last busy block
        if let Some(gap) = TimeGap::new(cursor, bound.end()) {
            gaps.push(gap);
        }

        gaps.retain(|gap| gap.can_fit(self.min_duration));
        gaps
    }
}

impl Default for GapFinder {
    fn default() -> Self {
        Self::new()
    }
}

/// Clip `busy` to `bound` and merge overlapping or touching intervals into
/// maximal busy blocks, sorted by start.
///
/// Intervals that do not overlap the bound, and zero-length intervals, occupy
/// no time inside it and are dropped.
pub fn merge_busy(bound: &TimeInterval, busy: &[TimeInterval]) -> Vec<TimeInterval> {
    let mut clipped: Vec<TimeInterval> = busy
        .iter()
        .filter(|interval| !interval.is_empty())
        .filter_map(|interval| interval.clip_to(bound))
        .collect();

    clipped.sort_by(|a, b| a.start().cmp(&b.start()).then(a.end().cmp(&b.end())));

    let mut merged: Vec<TimeInterval> = Vec::with_capacity(clipped.len());
    for interval in clipped {
        match merged.last_mut() {
            Some(last) if interval.start() <= last.end() => {
                if interval.end() > last.end() {
                    *last = TimeInterval::starting_at(last.start(), interval.end() - last.start());
                }
            }
            _ => merged.push(interval),
        }
    }
    merged
}

/// Convenience function to find all gaps with default settings
pub fn find_gaps(bound: &TimeInterval, busy: &[TimeInterval]) -> Vec<TimeGap> {
    GapFinder::new().find_gaps(bound, busy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, h, m, 0).unwrap()
    }

    fn iv(a: (u32, u32), b: (u32, u32)) -> TimeInterval {
        TimeInterval::new(at(a.0, a.1), at(b.0, b.1)).unwrap()
    }

    fn spans(gaps: &[TimeGap]) -> Vec<TimeInterval> {
        gaps.iter().map(TimeGap::interval).collect()
    }

    #[test]
    fn test_time_gap_creation() {
        assert!(TimeGap::new(at(9, 0), at(9, 30)).is_some());
        assert_eq!(TimeGap::new(at(9, 0), at(9, 30)).unwrap().duration_minutes(), 30);
        assert!(TimeGap::new(at(9, 0), at(9, 0)).is_none());
        assert!(TimeGap::new(at(9, 30), at(9, 0)).is_none());
    }

    #[test]
    fn empty_busy_yields_whole_bound() {
        let bound = iv((9, 0), (17, 0));
        assert_eq!(spans(&find_gaps(&bound, &[])), vec![bound]);
    }

    #[test]
    fn zero_length_bound_yields_nothing() {
        let bound = TimeInterval::instant(at(9, 0));
        assert!(find_gaps(&bound, &[]).is_empty());
    }

    #[test]
    fn overlapping_busy_intervals_merge() {
        let bound = iv((9, 0), (17, 0));
        let busy = vec![iv((10, 0), (11, 0)), iv((10, 30), (12, 0))];
        assert_eq!(
            spans(&find_gaps(&bound, &busy)),
            vec![iv((9, 0), (10, 0)), iv((12, 0), (17, 0))]
        );
    }

    #[test]
    fn touching_busy_intervals_leave_no_gap_between() {
        let bound = iv((9, 0), (17, 0));
        let busy = vec![iv((11, 0), (12, 0)), iv((10, 0), (11, 0))];
        assert_eq!(
            spans(&find_gaps(&bound, &busy)),
            vec![iv((9, 0), (10, 0)), iv((12, 0), (17, 0))]
        );
    }

    #[test]
    fn busy_outside_bound_is_clipped_or_ignored() {
        let bound = iv((9, 0), (17, 0));
        let busy = vec![
            iv((7, 0), (9, 0)),
            iv((8, 0), (9, 30)),
            iv((16, 30), (19, 0)),
            iv((17, 0), (18, 0)),
        ];
        assert_eq!(spans(&find_gaps(&bound, &busy)), vec![iv((9, 30), (16, 30))]);
    }

    #[test]
    fn busy_covering_bound_yields_nothing() {
        let bound = iv((9, 0), (17, 0));
        assert!(find_gaps(&bound, &[iv((8, 0), (18, 0))]).is_empty());
    }

    #[test]
    fn nested_busy_interval_is_absorbed() {
        let bound = iv((9, 0), (17, 0));
        let busy = vec![iv((10, 0), (14, 0)), iv((11, 0), (12, 0))];
        assert_eq!(
            spans(&find_gaps(&bound, &busy)),
            vec![iv((9, 0), (10, 0)), iv((14, 0), (17, 0))]
        );
    }

    #[test]
    fn zero_length_busy_does_not_split_a_gap() {
        let bound = iv((9, 0), (17, 0));
        let busy = vec![TimeInterval::instant(at(12, 0))];
        assert_eq!(spans(&find_gaps(&bound, &busy)), vec![bound]);
    }

    #[test]
    fn min_duration_filters_short_gaps() {
        let bound = iv((9, 0), (17, 0));
        let busy = vec![iv((9, 15), (12, 0))];
        let gaps = GapFinder::new()
            .with_min_duration(Duration::minutes(30))
            .find_gaps(&bound, &busy);
        assert_eq!(spans(&gaps), vec![iv((12, 0), (17, 0))]);
    }

    #[test]
    fn merge_busy_sorts_and_merges() {
        let bound = iv((9, 0), (17, 0));
        let busy = vec![iv((14, 0), (15, 0)), iv((9, 30), (10, 0)), iv((14, 30), (16, 0))];
        assert_eq!(
            merge_busy(&bound, &busy),
            vec![iv((9, 30), (10, 0)), iv((14, 0), (16, 0))]
        );
    }

    fn interval_strategy() -> impl Strategy<Value = TimeInterval> {
        // Minutes relative to 06:00, reaching a little past the bound on both sides.
        (0i64..900, 0i64..240).prop_map(|(offset, len)| {
            let start = at(6, 0) + Duration::minutes(offset);
            TimeInterval::starting_at(start, Duration::minutes(len))
        })
    }

    proptest! {
        #[test]
        fn gaps_are_sorted_disjoint_and_bounded(busy in prop::collection::vec(interval_strategy(), 0..12)) {
            let bound = iv((9, 0), (17, 0));
            let gaps = find_gaps(&bound, &busy);

            for gap in &gaps {
                prop_assert!(gap.duration() > Duration::zero());
                prop_assert!(bound.contains(&gap.interval()));
                for b in &busy {
                    prop_assert!(!gap.interval().overlaps(b));
                }
            }
            for pair in gaps.windows(2) {
                prop_assert!(pair[0].end_time < pair[1].start_time);
            }
        }

        #[test]
        fn gaps_ignore_input_order(mut busy in prop::collection::vec(interval_strategy(), 0..12)) {
            let bound = iv((9, 0), (17, 0));
            let forward = find_gaps(&bound, &busy);
            busy.reverse();
            prop_assert_eq!(forward, find_gaps(&bound, &busy));
        }
    }
}
