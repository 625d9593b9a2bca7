use std::collections::VecDeque;

use super::sample::Sample;

const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Fixed-capacity FIFO of the most recent samples of one sensor.
///
/// Arrival order is kept as-is: no sorting, no dedup by timestamp.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl SampleWindow {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends at the tail, evicting from the head once over capacity.
    pub fn push(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn oldest(&self) -> Option<&Sample> {
        self.samples.front()
    }

    #[must_use]
    pub fn newest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Present values in arrival order; absent readings are skipped.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().filter_map(|s| s.value)
    }

    /// Minutes between the oldest and newest sample held, absent slots included.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn span_minutes(&self) -> Option<f64> {
        let (oldest, newest) = (self.oldest()?, self.newest()?);
        let span = newest.timestamp - oldest.timestamp;
        Some(span.num_milliseconds() as f64 / MILLIS_PER_MINUTE)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use proptest::prelude::*;

    fn base() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 9, 21)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("valid date")
    }

    fn sample(offset_secs: i64, value: Option<f64>) -> Sample {
        Sample::new(base() + Duration::seconds(offset_secs), value)
    }

    #[test]
    fn new_window_is_empty() {
        let window = SampleWindow::new(3);
        assert!(window.is_empty());
        assert!(!window.is_full());
        assert!(window.oldest().is_none());
        assert!(window.newest().is_none());
        assert!(window.span_minutes().is_none());
    }

    #[test]
    fn fills_up_to_capacity() {
        let mut window = SampleWindow::new(3);
        window.push(sample(0, Some(1.0)));
        window.push(sample(30, Some(2.0)));
        assert!(!window.is_full());
        window.push(sample(60, Some(3.0)));
        assert!(window.is_full());
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut window = SampleWindow::new(3);
        for (i, v) in [1.0, 2.0, 3.0, 4.0].into_iter().enumerate() {
            window.push(sample(i as i64 * 30, Some(v)));
        }
        assert_eq!(window.len(), 3);
        assert_eq!(window.oldest().and_then(|s| s.value), Some(2.0));
        assert_eq!(window.newest().and_then(|s| s.value), Some(4.0));
    }

    #[test]
    fn absent_values_take_a_slot_but_are_not_values() {
        let mut window = SampleWindow::new(4);
        window.push(sample(0, Some(200.0)));
        window.push(sample(30, None));
        window.push(sample(60, Some(180.0)));
        window.push(sample(90, None));
        assert!(window.is_full());
        assert_eq!(window.values().collect::<Vec<_>>(), vec![200.0, 180.0]);
    }

    #[test]
    fn span_covers_absent_edges() {
        let mut window = SampleWindow::new(3);
        window.push(sample(0, None));
        window.push(sample(60, Some(5.0)));
        window.push(sample(150, None));
        let span = window.span_minutes().expect("non-empty");
        assert!((span - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn duplicate_timestamps_are_kept() {
        let mut window = SampleWindow::new(3);
        window.push(sample(0, Some(1.0)));
        window.push(sample(0, Some(1.0)));
        assert_eq!(window.len(), 2);
    }

    proptest! {
        #[test]
        fn length_never_exceeds_capacity(
            capacity in 1usize..32,
            values in proptest::collection::vec(proptest::option::of(-500.0f64..500.0), 0..100),
        ) {
            let mut window = SampleWindow::new(capacity);
            for (i, v) in values.iter().enumerate() {
                window.push(sample(i as i64, *v));
                prop_assert!(window.len() <= capacity);
            }
            prop_assert_eq!(window.len(), values.len().min(capacity));
        }

        #[test]
        fn window_holds_the_most_recent_samples_in_order(
            capacity in 1usize..16,
            count in 0usize..64,
        ) {
            let mut window = SampleWindow::new(capacity);
            for i in 0..count {
                window.push(sample(i as i64, Some(i as f64)));
            }
            let expected: Vec<f64> = (count.saturating_sub(capacity)..count)
                .map(|i| i as f64)
                .collect();
            prop_assert_eq!(window.values().collect::<Vec<_>>(), expected);
        }
    }
}
