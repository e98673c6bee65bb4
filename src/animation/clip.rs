//! Keyframed animation clips.
//!
//! A clip stores one [`NodeChannel`] per animated node. Each channel keeps
//! independent, time-ordered key lists for translation, rotation and scale,
//! all timed in ticks.

use std::collections::HashMap;

use crate::math::interpolate::clamp;
use crate::math::mat4::Mat4;
use crate::math::quat::Quat;
use crate::math::vec3::Vec3;

/// Tick rate assumed for clips that do not declare one.
pub const DEFAULT_TICKS_PER_SECOND: f32 = 25.0;

/// A value at a point in time (in ticks).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe<T> {
    pub time: f32,
    pub value: T,
}

impl<T> Keyframe<T> {
    pub fn new(time: f32, value: T) -> Self {
        Self { time, value }
    }
}

/// Blending between two neighbouring keys.
pub trait Interpolate: Copy {
    fn interpolate(start: Self, end: Self, factor: f32) -> Self;
}

impl Interpolate for Vec3 {
    #[inline]
    fn interpolate(start: Self, end: Self, factor: f32) -> Self {
        start + (end - start) * factor
    }
}

impl Interpolate for Quat {
    /// Slerp followed by a renormalize to cancel accumulated drift.
    #[inline]
    fn interpolate(start: Self, end: Self, factor: f32) -> Self {
        start.slerp(end, factor).normalize()
    }
}

/// Samples a key list at `ticks`.
///
/// - no keys: `None`
/// - one key: that key, unchanged
/// - otherwise the first pair `(i, i + 1)` with `ticks < keys[i + 1].time`
///   is blended. A time at or past the last key returns the last key, and a
///   time before the first key clamps the factor to 0.
///
/// The search is linear; channels are short and sampled once per bone per
/// frame.
pub fn sample<T: Interpolate>(keys: &[Keyframe<T>], ticks: f32) -> Option<T> {
    match keys {
        [] => None,
        [only] => Some(only.value),
        _ => {
            let Some(lower) = keys.windows(2).position(|pair| ticks < pair[1].time) else {
                return keys.last().map(|key| key.value);
            };
            let (start, end) = (&keys[lower], &keys[lower + 1]);
            let span = end.time - start.time;
            let factor = if span > 0.0 {
                clamp((ticks - start.time) / span, 0.0, 1.0)
            } else {
                0.0
            };
            debug_assert!((0.0..=1.0).contains(&factor));
            Some(T::interpolate(start.value, end.value, factor))
        }
    }
}

/// Keyframes driving one scene node.
#[derive(Debug, Clone, Default)]
pub struct NodeChannel {
    pub node_name: String,
    pub positions: Vec<Keyframe<Vec3>>,
    pub rotations: Vec<Keyframe<Quat>>,
    pub scales: Vec<Keyframe<Vec3>>,
}

impl NodeChannel {
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            ..Self::default()
        }
    }

    pub fn position_at(&self, ticks: f32) -> Vec3 {
        sample(&self.positions, ticks).unwrap_or(Vec3::ZERO)
    }

    pub fn rotation_at(&self, ticks: f32) -> Quat {
        sample(&self.rotations, ticks).unwrap_or(Quat::IDENTITY)
    }

    pub fn scale_at(&self, ticks: f32) -> Vec3 {
        sample(&self.scales, ticks).unwrap_or(Vec3::ONE)
    }

    /// Local transform `T * R * S` at `ticks`. Empty key lists contribute
    /// the identity for their component.
    pub fn local_transform(&self, ticks: f32) -> Mat4 {
        let t = self.position_at(ticks);
        let s = self.scale_at(ticks);
        Mat4::translation(t.x, t.y, t.z) * self.rotation_at(ticks).to_mat4() * Mat4::scaling(s.x, s.y, s.z)
    }
}

/// A single looping animation.
#[derive(Debug, Clone)]
pub struct Animation {
    pub name: String,
    ticks_per_second: f32,
    duration: f32,
    channels: Vec<NodeChannel>,
    by_node: HashMap<String, usize>,
}

impl Animation {
    /// `ticks_per_second <= 0` falls back to [`DEFAULT_TICKS_PER_SECOND`].
    pub fn new(name: impl Into<String>, ticks_per_second: f32, duration: f32) -> Self {
        let ticks_per_second = if ticks_per_second > 0.0 {
            ticks_per_second
        } else {
            DEFAULT_TICKS_PER_SECOND
        };
        Self {
            name: name.into(),
            ticks_per_second,
            duration,
            channels: Vec::new(),
            by_node: HashMap::new(),
        }
    }

    /// Adds a channel. A later channel for the same node replaces the
    /// earlier one in lookups.
    pub fn add_channel(&mut self, channel: NodeChannel) {
        self.by_node
            .insert(channel.node_name.clone(), self.channels.len());
        self.channels.push(channel);
    }

    pub fn channel(&self, node_name: &str) -> Option<&NodeChannel> {
        self.by_node.get(node_name).map(|&i| &self.channels[i])
    }

    pub fn channels(&self) -> &[NodeChannel] {
        &self.channels
    }

    pub fn ticks_per_second(&self) -> f32 {
        self.ticks_per_second
    }

    /// Length of one loop, in ticks.
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Maps playback time to a tick inside `[0, duration)`.
    ///
    /// The clip loops forever; negative time runs the loop backwards. A clip
    /// without a positive duration stays on tick 0.
    pub fn ticks_at(&self, seconds: f32) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (seconds * self.ticks_per_second).rem_euclid(self.duration)
    }
}
