//! Channel fusion into a unit gaze vector
//!
//! Accumulates the latest reading per channel and fuses all three into one
//! 3D direction as soon as every slot is populated. Readings arrive
//! independently and in any order; a slot overwrites on re-receipt
//! (last-write-wins, no averaging), and there is no age limit on how long a
//! pending reading may wait for its peers.
//!
//! The eye angles are mapped from the normalized [-1, 1] channel range onto
//! a ±45° cone, averaged across both eyes horizontally:
//!
//! ```text
//! angle_h = -(right_x + left_x) * (π/4) / 2
//! angle_v = y * (π/4)
//! gaze    = ( sin(angle_h)·cos(angle_v), sin(angle_v), -cos(angle_h)·cos(angle_v) )
//! ```
//!
//! The result has unit norm by construction.

use std::f32::consts::FRAC_PI_4;

use crate::channel::{Channel, ChannelValue};

/// A unit-length 3D gaze direction, -Z forward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazeVector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl GazeVector {
    /// Build the gaze direction from horizontal/vertical eye angles (radians).
    ///
    /// The only constructor; keeping it that way is what guarantees the
    /// unit-norm invariant.
    fn from_angles(horizontal: f32, vertical: f32) -> Self {
        Self {
            x: horizontal.sin() * vertical.cos(),
            y: vertical.sin(),
            z: -horizontal.cos() * vertical.cos(),
        }
    }

    /// Euclidean norm; 1.0 within floating-point tolerance
    pub fn norm(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Latest pending reading per channel since the last fuse
#[derive(Debug, Default)]
struct PendingChannels {
    eyes_y: Option<f32>,
    left_x: Option<f32>,
    right_x: Option<f32>,
}

impl PendingChannels {
    fn store(&mut self, reading: ChannelValue) {
        match reading.channel {
            Channel::EyesY => self.eyes_y = Some(reading.value),
            Channel::LeftEyeX => self.left_x = Some(reading.value),
            Channel::RightEyeX => self.right_x = Some(reading.value),
        }
    }

    fn complete(&self) -> Option<(f32, f32, f32)> {
        match (self.eyes_y, self.left_x, self.right_x) {
            (Some(y), Some(left_x), Some(right_x)) => Some((y, left_x, right_x)),
            _ => None,
        }
    }
}

/// Fuses per-channel readings into gaze vectors.
///
/// Owned by the listener task; not shared. One fused vector is produced per
/// completed channel set, then the slots reset according to the configured
/// policy.
#[derive(Debug)]
pub struct FusionEngine {
    pending: PendingChannels,
    latch_eyes_y: bool,
}

impl FusionEngine {
    /// Create an engine with empty slots.
    ///
    /// With `latch_eyes_y` set, the vertical channel survives each fuse, so
    /// a fresh horizontal pair alone produces the next vector. The default
    /// (false) clears all three slots after every fuse.
    pub fn new(latch_eyes_y: bool) -> Self {
        Self {
            pending: PendingChannels::default(),
            latch_eyes_y,
        }
    }

    /// Store one reading; returns the fused vector when it completes the set.
    pub fn ingest(&mut self, reading: ChannelValue) -> Option<GazeVector> {
        self.pending.store(reading);

        let (y, left_x, right_x) = self.pending.complete()?;

        let angle_horizontal = -(right_x * FRAC_PI_4 + left_x * FRAC_PI_4) / 2.0;
        let angle_vertical = y * FRAC_PI_4;
        let gaze = GazeVector::from_angles(angle_horizontal, angle_vertical);

        self.pending.left_x = None;
        self.pending.right_x = None;
        if !self.latch_eyes_y {
            self.pending.eyes_y = None;
        }

        Some(gaze)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-6;

    fn reading(channel: Channel, value: f32) -> ChannelValue {
        ChannelValue { channel, value }
    }

    /// Feed a full channel set and return the fused vector.
    fn fuse(engine: &mut FusionEngine, y: f32, left_x: f32, right_x: f32) -> Option<GazeVector> {
        assert!(engine.ingest(reading(Channel::EyesY, y)).is_none());
        assert!(engine.ingest(reading(Channel::LeftEyeX, left_x)).is_none());
        engine.ingest(reading(Channel::RightEyeX, right_x))
    }

    #[test]
    fn test_fused_vector_has_unit_norm() {
        let mut engine = FusionEngine::new(false);
        for y in [-1.0f32, -0.5, 0.0, 0.5, 1.0] {
            for left_x in [-1.0f32, 0.0, 0.7, 1.0] {
                for right_x in [-1.0f32, -0.3, 0.0, 1.0] {
                    let gaze = fuse(&mut engine, y, left_x, right_x).unwrap();
                    assert!(
                        (gaze.norm() - 1.0).abs() < TOLERANCE,
                        "norm {} for inputs ({}, {}, {})",
                        gaze.norm(),
                        y,
                        left_x,
                        right_x
                    );
                }
            }
        }
    }

    #[test]
    fn test_centered_gaze_points_forward() {
        let mut engine = FusionEngine::new(false);
        let gaze = fuse(&mut engine, 0.0, 0.0, 0.0).unwrap();
        assert!((gaze.x - 0.0).abs() < TOLERANCE);
        assert!((gaze.y - 0.0).abs() < TOLERANCE);
        assert!((gaze.z - -1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_no_fuse_until_all_three_present() {
        let mut engine = FusionEngine::new(false);
        assert!(engine.ingest(reading(Channel::LeftEyeX, 0.1)).is_none());
        assert!(engine.ingest(reading(Channel::RightEyeX, 0.1)).is_none());
        assert!(engine.ingest(reading(Channel::EyesY, 0.1)).is_some());
    }

    #[test]
    fn test_repeat_channel_does_not_fuse_prematurely() {
        let mut engine = FusionEngine::new(false);
        assert!(engine.ingest(reading(Channel::LeftEyeX, 0.1)).is_none());
        assert!(engine.ingest(reading(Channel::LeftEyeX, 0.2)).is_none());
        assert!(engine.ingest(reading(Channel::LeftEyeX, 0.3)).is_none());
        assert!(engine.ingest(reading(Channel::RightEyeX, 0.1)).is_none());
        assert!(engine.ingest(reading(Channel::EyesY, 0.1)).is_some());
    }

    #[test]
    fn test_repeat_channel_is_last_write_wins() {
        let mut engine = FusionEngine::new(false);
        engine.ingest(reading(Channel::EyesY, 0.0));
        engine.ingest(reading(Channel::LeftEyeX, 1.0));
        // Overwrites the pending 1.0; the fuse must use 0.0 for both eyes
        engine.ingest(reading(Channel::LeftEyeX, 0.0));
        let gaze = engine.ingest(reading(Channel::RightEyeX, 0.0)).unwrap();
        assert!((gaze.z - -1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_default_policy_clears_all_slots_after_fuse() {
        let mut engine = FusionEngine::new(false);
        assert!(fuse(&mut engine, 0.5, 0.2, 0.3).is_some());

        // A fresh horizontal pair alone must not re-fuse
        assert!(engine.ingest(reading(Channel::LeftEyeX, 0.2)).is_none());
        assert!(engine.ingest(reading(Channel::RightEyeX, 0.3)).is_none());
        // The vertical reading completes the next set
        assert!(engine.ingest(reading(Channel::EyesY, 0.5)).is_some());
    }

    #[test]
    fn test_latched_vertical_refuses_on_horizontal_pair() {
        let mut engine = FusionEngine::new(true);
        assert!(fuse(&mut engine, 1.0, 0.0, 0.0).is_some());

        // Vertical slot survived the fuse; a horizontal pair completes the set
        assert!(engine.ingest(reading(Channel::LeftEyeX, 0.0)).is_none());
        let gaze = engine.ingest(reading(Channel::RightEyeX, 0.0)).unwrap();

        // The retained y=1.0 still tilts the vector upward
        let expected_y = FRAC_PI_4.sin();
        assert!((gaze.y - expected_y).abs() < TOLERANCE);
    }

    #[test]
    fn test_reception_order_does_not_matter() {
        let mut forward = FusionEngine::new(false);
        let a = fuse(&mut forward, 0.4, -0.2, 0.6).unwrap();

        let mut reversed = FusionEngine::new(false);
        assert!(reversed.ingest(reading(Channel::RightEyeX, 0.6)).is_none());
        assert!(reversed.ingest(reading(Channel::LeftEyeX, -0.2)).is_none());
        let b = reversed.ingest(reading(Channel::EyesY, 0.4)).unwrap();

        assert_eq!(a, b);
    }
}
