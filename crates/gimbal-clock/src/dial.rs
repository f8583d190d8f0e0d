//! Wall-clock time to hand and tick placement.

use std::f32::consts::TAU;

use chrono::Timelike;
use glam::{Mat4, Vec3};

use crate::rings::RingRotation;

/// Number of tick marks around the dial.
pub const TICK_COUNT: usize = 12;

/// `(length, depth)` offset of a tick mark from the ring center.
pub const TICK_OFFSET: (f32, f32) = (1.75, 0.15);

/// Local time of day, sampled once per frame.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct WallTime {
    /// `0..24`
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl WallTime {
    pub const fn new(hour: u32, minute: u32, second: u32) -> Self {
        Self { hour, minute, second }
    }

    /// Current local time from the system clock.
    pub fn now() -> Self {
        Self::from_timelike(&chrono::Local::now())
    }

    pub fn from_timelike<T: Timelike>(t: &T) -> Self {
        Self {
            hour: t.hour(),
            minute: t.minute(),
            second: t.second(),
        }
    }
}

/// `value / period · 2π`.
#[inline]
pub fn dial_angle(value: u32, period: u32) -> f32 {
    value as f32 / period as f32 * TAU
}

/// Angle of tick `index`; tick 0 sits at twelve o'clock.
#[inline]
pub fn tick_angle(index: usize) -> f32 {
    index as f32 / TICK_COUNT as f32 * TAU
}

/// The three clock hands.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Hand {
    Hour,
    Minute,
    Second,
}

impl Hand {
    pub const ALL: [Hand; 3] = [Hand::Hour, Hand::Minute, Hand::Second];

    /// Clockwise angle from twelve o'clock.
    ///
    /// The hour hand uses the whole hour only, so it jumps once per hour.
    /// Afternoon hours give angles past 2π, which are the same rotations.
    pub fn angle(self, time: WallTime) -> f32 {
        match self {
            Hand::Hour => dial_angle(time.hour, 12),
            Hand::Minute => dial_angle(time.minute, 60),
            Hand::Second => dial_angle(time.second, 60),
        }
    }

    /// `(length, depth)` offset of the hand's center from the ring center.
    pub fn offset(self) -> (f32, f32) {
        match self {
            Hand::Hour => (1.0, -0.1),
            Hand::Minute => (0.8, 0.0),
            Hand::Second => (0.75, 0.1),
        }
    }
}

/// Places a hand or tick: `R_ring · Rz(-angle) · T(0, length, depth)`.
///
/// Negating the angle turns clockwise when seen from +Z.
pub fn indicator_transform(ring: RingRotation, angle: f32, (length, depth): (f32, f32)) -> Mat4 {
    ring.matrix()
        * Mat4::from_rotation_z(-angle)
        * Mat4::from_translation(Vec3::new(0.0, length, depth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat3, Vec4};
    use std::f32::consts::PI;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn midnight_is_all_zero() {
        let t = WallTime::new(0, 0, 0);
        for hand in Hand::ALL {
            assert_eq!(hand.angle(t), 0.0);
        }
    }

    #[test]
    fn six_oclock_points_down() {
        let t = WallTime::new(6, 0, 0);
        assert!(approx(Hand::Hour.angle(t), PI));
        assert_eq!(Hand::Minute.angle(t), 0.0);
        assert_eq!(Hand::Second.angle(t), 0.0);
    }

    #[test]
    fn half_past_puts_minute_hand_at_pi() {
        assert!(approx(Hand::Minute.angle(WallTime::new(0, 30, 0)), PI));
    }

    #[test]
    fn hour_hand_ignores_minutes() {
        let a = Hand::Hour.angle(WallTime::new(3, 0, 0));
        let b = Hand::Hour.angle(WallTime::new(3, 59, 59));
        assert_eq!(a, b);
    }

    #[test]
    fn afternoon_hour_is_equivalent_rotation() {
        let morning = indicator_transform(RingRotation::default(), Hand::Hour.angle(WallTime::new(3, 0, 0)), Hand::Hour.offset());
        let afternoon = indicator_transform(RingRotation::default(), Hand::Hour.angle(WallTime::new(15, 0, 0)), Hand::Hour.offset());
        assert!(morning.abs_diff_eq(afternoon, 1e-5));
    }

    #[test]
    fn ticks_are_evenly_spaced_from_zero() {
        assert_eq!(tick_angle(0), 0.0);
        for i in 1..TICK_COUNT {
            assert!(approx(tick_angle(i) - tick_angle(i - 1), TAU / 12.0));
        }
    }

    #[test]
    fn three_oclock_hand_points_right() {
        let m = indicator_transform(RingRotation::default(), dial_angle(3, 12), (1.0, 0.0));
        let p = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(approx(p.x, 1.0) && approx(p.y, 0.0));
    }

    #[test]
    fn transforms_are_rigid() {
        let ring = RingRotation::new(0.3, -0.45);
        let t = WallTime::new(10, 42, 17);

        let mut mats: Vec<Mat4> = Hand::ALL
            .iter()
            .map(|h| indicator_transform(ring, h.angle(t), h.offset()))
            .collect();
        mats.extend((0..TICK_COUNT).map(|i| indicator_transform(ring, tick_angle(i), TICK_OFFSET)));

        for m in mats {
            let r = Mat3::from_mat4(m);
            assert!(approx(r.determinant(), 1.0));
            assert!((r.transpose() * r).abs_diff_eq(Mat3::IDENTITY, 1e-5));
        }
    }

    #[test]
    fn from_timelike_reads_fields() {
        let t = chrono::NaiveTime::from_hms_opt(18, 7, 42).unwrap();
        assert_eq!(WallTime::from_timelike(&t), WallTime::new(18, 7, 42));
    }
}
