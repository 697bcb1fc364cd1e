//! Easing functions for animations

use serde::{Deserialize, Serialize};

/// Easing curve applied to an animation's elapsed-time fraction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant speed
    #[default]
    Linear,
    /// Fast start, smooth deceleration
    EaseOutCubic,
    /// Smooth start and end
    EaseInOut,
}

impl Easing {
    /// Map a progress fraction in [0, 1] onto the curve.
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Easing::Linear => linear(t),
            Easing::EaseOutCubic => ease_out_cubic(t),
            Easing::EaseInOut => ease_in_out(t),
        }
    }
}

/// Ease-in-out cubic function
#[inline]
pub fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Ease-out cubic function
#[inline]
pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// Linear interpolation (no easing)
#[inline]
pub fn linear(t: f64) -> f64 {
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_in_out() {
        assert!((ease_in_out(0.0) - 0.0).abs() < 0.001);
        assert!((ease_in_out(1.0) - 1.0).abs() < 0.001);
        assert!((ease_in_out(0.5) - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_ease_out_cubic() {
        assert!((ease_out_cubic(0.0) - 0.0).abs() < 0.001);
        assert!((ease_out_cubic(1.0) - 1.0).abs() < 0.001);
        // Front-loaded
        assert!(ease_out_cubic(0.5) > 0.5);
    }

    #[test]
    fn test_apply_dispatches() {
        assert_eq!(Easing::Linear.apply(0.25), 0.25);
        assert_eq!(Easing::EaseOutCubic.apply(0.25), ease_out_cubic(0.25));
        assert_eq!(Easing::EaseInOut.apply(0.25), ease_in_out(0.25));
    }

    #[test]
    fn test_serde_names() {
        let easing: Easing = serde_json::from_str("\"ease_in_out\"").unwrap();
        assert_eq!(easing, Easing::EaseInOut);
        assert_eq!(serde_json::to_string(&Easing::Linear).unwrap(), "\"linear\"");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const ALL: [Easing; 3] = [Easing::Linear, Easing::EaseOutCubic, Easing::EaseInOut];

    proptest! {
        /// Every curve maps [0,1] into [0,1]
        #[test]
        fn easing_bounded_output(t in 0.0f64..=1.0) {
            for easing in ALL {
                let result = easing.apply(t);
                prop_assert!(result >= 0.0, "{:?}({}) = {} < 0", easing, t, result);
                prop_assert!(result <= 1.0, "{:?}({}) = {} > 1", easing, t, result);
            }
        }

        /// Every curve is monotonically non-decreasing
        #[test]
        fn easing_monotonic(t1 in 0.0f64..=1.0, t2 in 0.0f64..=1.0) {
            let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            for easing in ALL {
                prop_assert!(
                    easing.apply(lo) <= easing.apply(hi) + 1e-9,
                    "{:?} not monotonic: f({}) > f({})",
                    easing, lo, hi
                );
            }
        }
    }
}
