//! Metric counter animation
//!
//! Counts a displayed number up from 0 to a target. The value is a function
//! of elapsed time, not of frames rendered, so the animation takes the same
//! time at any frame rate.

use tracing::trace;

use crate::config::CounterConfig;
use crate::error::UiResult;
use crate::host::Host;
use crate::transition::Easing;

/// Time-based interpolation from 0 to `target`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CounterAnimation {
    pub target: u64,
    /// Start time (ms, host clock)
    pub start_time: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl CounterAnimation {
    pub fn new(target: u64, start_time: f64, duration_ms: u32, easing: Easing) -> Self {
        Self {
            target,
            start_time,
            duration_ms: f64::from(duration_ms),
            easing,
        }
    }

    /// Get progress (0.0 to 1.0)
    pub fn progress(&self, now: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now - self.start_time) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }

    /// Displayed value at `now`. Exactly `target` once progress reaches 1.
    pub fn value_at(&self, now: f64) -> u64 {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.target;
        }
        let value = (self.target as f64 * self.easing.apply(t)).floor() as u64;
        value.min(self.target)
    }
}

/// Format with `,` thousands separators: `2847` -> `2,847`.
pub fn format_grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Animate `node`'s text from 0 to `target`, one update per animation frame.
///
/// Returns the number of frames rendered. No frame is requested after the
/// one that renders `target`.
pub async fn animate_counter<H: Host>(
    host: &H,
    node: &H::Node,
    target: u64,
    config: &CounterConfig,
) -> UiResult<u32> {
    let animation = CounterAnimation::new(target, host.now(), config.duration_ms, config.easing);
    let mut frames = 0;
    loop {
        let now = host.next_frame().await;
        frames += 1;
        host.set_text(node, &format_grouped(animation.value_at(now)))?;
        if animation.is_complete(now) {
            trace!(value = target, frames, "counter finished");
            return Ok(frames);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{HostEvent, MemoryHost};
    use futures::executor::block_on;

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(0), "0");
        assert_eq!(format_grouped(47), "47");
        assert_eq!(format_grouped(999), "999");
        assert_eq!(format_grouped(1000), "1,000");
        assert_eq!(format_grouped(2847), "2,847");
        assert_eq!(format_grouped(1234567), "1,234,567");
    }

    #[test]
    fn test_value_endpoints() {
        let anim = CounterAnimation::new(2847, 100.0, 2000, Easing::Linear);
        assert_eq!(anim.value_at(100.0), 0);
        assert_eq!(anim.value_at(50.0), 0);
        assert_eq!(anim.value_at(1100.0), 1423);
        assert_eq!(anim.value_at(2100.0), 2847);
        assert_eq!(anim.value_at(9000.0), 2847);
        assert!(!anim.is_complete(2099.0));
        assert!(anim.is_complete(2100.0));
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let anim = CounterAnimation::new(12, 0.0, 0, Easing::Linear);
        assert_eq!(anim.value_at(0.0), 12);
        assert!(anim.is_complete(0.0));
    }

    #[test]
    fn test_animate_counter_lands_on_target() {
        let host = MemoryHost::new();
        let node = host.create_element(&host.body_ref(), "span", Some("total-donors"), &[]);
        let config = CounterConfig::default();

        let frames = block_on(animate_counter(&host, &node, 2847, &config)).unwrap();

        assert_eq!(host.text(&node), "2,847");
        // 2000ms at 16ms per frame
        assert_eq!(frames, 125);
        let requested = host
            .journal()
            .iter()
            .filter(|e| matches!(e, HostEvent::Frame(_)))
            .count();
        assert_eq!(requested, 125);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Displayed value never decreases and never overshoots
        #[test]
        fn counter_monotonic_and_bounded(
            target in 0u64..10_000_000,
            duration in 1u32..10_000,
            t1 in -1000.0f64..20_000.0,
            t2 in -1000.0f64..20_000.0,
            easing in prop_oneof![
                Just(Easing::Linear),
                Just(Easing::EaseOutCubic),
                Just(Easing::EaseInOut),
            ],
        ) {
            let anim = CounterAnimation::new(target, 0.0, duration, easing);
            let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            prop_assert!(anim.value_at(lo) <= anim.value_at(hi));
            prop_assert!(anim.value_at(hi) <= target);
            prop_assert_eq!(anim.value_at(f64::from(duration)), target);
        }
    }
}
