use std::f64::consts::{FRAC_PI_2, TAU};
use std::time::Duration;

use rand::Rng;

use crate::config::SpinSettings;

/// Angle of the pointer, which sits at twelve o'clock.
pub const POINTER_ANGLE: f64 = -FRAC_PI_2;

/// Cubic ease-out, `(p - 1)^3 + 1`. Starts fast and reaches zero velocity at `p = 1`.
pub fn ease_out_cubic(p: f64) -> f64 {
    let t = p.clamp(0.0, 1.0) - 1.0;
    t * t * t + 1.0
}

/// Reduces an angle into `[0, 2π)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let reduced = angle.rem_euclid(TAU);
    if reduced >= TAU {
        0.0
    } else {
        reduced
    }
}

pub fn slice_width(slice_count: usize) -> f64 {
    TAU / slice_count.max(1) as f64
}

/// Index of the slice currently under the pointer for a wheel drawn at `angle`.
pub fn slice_under_pointer(angle: f64, slice_count: usize) -> Option<usize> {
    if slice_count == 0 {
        return None;
    }
    let width = slice_width(slice_count);
    let from_origin = normalize_angle(POINTER_ANGLE - angle);
    Some(((from_origin / width) as usize).min(slice_count - 1))
}

/// A fully decided spin: where it starts, where it stops and how long it takes.
///
/// All randomness is consumed in [`SpinPlan::new`]; stepping the plan is a pure
/// function of elapsed time.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinPlan {
    index: usize,
    prize: String,
    start_angle: f64,
    target_angle: f64,
    resting_angle: f64,
    offset: f64,
    duration: Duration,
}

impl SpinPlan {
    pub fn new<R: Rng + ?Sized>(
        index: usize,
        prize: impl Into<String>,
        current_angle: f64,
        slice_count: usize,
        settings: &SpinSettings,
        rng: &mut R,
    ) -> Self {
        let width = slice_width(slice_count);
        let (lo, hi) = settings.offset_range;
        let (lo, hi) = (lo.clamp(0.0, 1.0), hi.clamp(0.0, 1.0));
        let fraction = rng.random_range(lo.min(hi)..=hi.max(lo));
        let offset = fraction * width;

        // Slice `index` starts at `index * width + angle`; the pointer has to land
        // `offset` past that start.
        let resting_angle = normalize_angle(POINTER_ANGLE - index as f64 * width - offset);
        let catch_up = (current_angle - resting_angle).rem_euclid(TAU);
        let target_angle = current_angle - catch_up - TAU * settings.extra_rotations as f64;

        Self {
            index,
            prize: prize.into(),
            start_angle: current_angle,
            target_angle,
            resting_angle,
            offset,
            duration: settings.duration,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn prize(&self) -> &str {
        &self.prize
    }

    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    pub fn target_angle(&self) -> f64 {
        self.target_angle
    }

    /// Distance from the start of the winning slice to the pointer when the wheel stops.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn is_complete(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }

    /// Wheel angle after `elapsed` of animation. Once complete the angle is snapped to
    /// the target reduced into `[0, 2π)` so repeated spins never accumulate drift.
    pub fn angle_at(&self, elapsed: Duration) -> f64 {
        if self.is_complete(elapsed) {
            return self.final_angle();
        }
        let eased = ease_out_cubic(self.progress(elapsed));
        self.start_angle + (self.target_angle - self.start_angle) * eased
    }

    pub fn final_angle(&self) -> f64 {
        self.resting_angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn offset_under_pointer(angle: f64, index: usize, slice_count: usize) -> f64 {
        (POINTER_ANGLE - angle - index as f64 * slice_width(slice_count)).rem_euclid(TAU)
    }

    #[test]
    fn ease_out_hits_both_ends() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(2.0), 1.0);
        assert!(ease_out_cubic(0.5) > 0.5);
    }

    #[test]
    fn lands_inside_the_winning_slice() {
        let settings = SpinSettings::default();
        let mut rng = StdRng::seed_from_u64(5);
        for slice_count in [1usize, 2, 3, 7, 25] {
            for index in 0..slice_count {
                let start = rng.random_range(-20.0..20.0);
                let plan = SpinPlan::new(index, "Gold", start, slice_count, &settings, &mut rng);
                let width = slice_width(slice_count);
                let landed = offset_under_pointer(plan.final_angle(), index, slice_count);
                assert!(landed >= 0.2 * width - 1e-9, "{landed} < 0.2 * {width}");
                assert!(landed <= 0.8 * width + 1e-9, "{landed} > 0.8 * {width}");
                assert!((plan.offset() - landed).abs() < 1e-9);
                assert_eq!(plan.duration(), settings.duration);
                assert_eq!(slice_under_pointer(plan.final_angle(), slice_count), Some(index));
            }
        }
    }

    #[test]
    fn always_spins_backwards_by_at_least_the_extra_turns() {
        let settings = SpinSettings::default();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let start = rng.random_range(0.0..TAU);
            let plan = SpinPlan::new(2, "Gold", start, 5, &settings, &mut rng);
            let travel = plan.start_angle() - plan.target_angle();
            assert!(travel >= 4.0 * TAU - 1e-9);
            assert!(travel <= 5.0 * TAU + 1e-9);
        }
    }

    #[test]
    fn stepping_is_deterministic_and_snaps_at_the_end() {
        let settings = SpinSettings::default();
        let mut rng = StdRng::seed_from_u64(1);
        let plan = SpinPlan::new(0, "Gold", 1.0, 4, &settings, &mut rng);

        assert_eq!(plan.angle_at(Duration::ZERO), 1.0);
        let mid = Duration::from_millis(2500);
        assert_eq!(plan.angle_at(mid), plan.angle_at(mid));
        assert!(plan.angle_at(mid) < 1.0);
        assert!(plan.angle_at(mid) > plan.target_angle());

        let done = plan.angle_at(Duration::from_millis(5000));
        assert!((0.0..TAU).contains(&done));
        assert_eq!(done, plan.final_angle());
        let turns = (plan.target_angle() - done) / TAU;
        assert!((turns - turns.round()).abs() < 1e-9);
        assert_eq!(plan.progress(Duration::from_secs(60)), 1.0);
    }

    #[test]
    fn angle_decreases_monotonically() {
        let settings = SpinSettings::default();
        let mut rng = StdRng::seed_from_u64(2);
        let plan = SpinPlan::new(3, "Gold", 0.4, 6, &settings, &mut rng);
        let mut last = plan.angle_at(Duration::ZERO);
        for ms in (16..5000).step_by(16) {
            let angle = plan.angle_at(Duration::from_millis(ms));
            assert!(angle <= last);
            last = angle;
        }
    }

    #[test]
    fn pointer_slice_for_known_angles() {
        assert_eq!(slice_under_pointer(0.0, 0), None);
        // At angle -π/2 slice 0 starts exactly under the pointer.
        assert_eq!(slice_under_pointer(-FRAC_PI_2 - 0.01, 4), Some(0));
        assert_eq!(slice_under_pointer(-FRAC_PI_2 + 0.01, 4), Some(3));
    }
}
