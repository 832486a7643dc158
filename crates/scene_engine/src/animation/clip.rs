//! Keyframe animation data
//!
//! An [`Animation`] is a named set of [`AnimChannel`]s. Each channel targets
//! one node by name and carries independent position, rotation and scale key
//! sequences. Key times are expressed in ticks; the animation's tick rate
//! converts them to seconds.

use crate::foundation::math::{Quat, Vec3};
use super::interpolation::Interpolate;

/// A single timestamped value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe<T> {
    /// Time in ticks
    pub time: f64,
    /// Value at that time
    pub value: T,
}

impl<T> Keyframe<T> {
    /// Create a keyframe
    pub fn new(time: f64, value: T) -> Self {
        Self { time, value }
    }
}

/// Whether a key sequence is ordered by non-decreasing time
pub fn is_sorted_by_time<T>(keys: &[Keyframe<T>]) -> bool {
    keys.windows(2).all(|pair| pair[0].time <= pair[1].time)
}

/// Sample a key sequence at `time` (ticks), holding the first/last value outside the range
///
/// Returns `None` for an empty sequence. The sequence must be sorted.
pub fn sample_keys<T: Interpolate>(keys: &[Keyframe<T>], time: f64) -> Option<T> {
    let first = keys.first()?;
    let last = keys.last()?;
    if time <= first.time {
        return Some(first.value);
    }
    if time >= last.time {
        return Some(last.value);
    }

    // First key strictly after `time`; guaranteed in 1..len by the checks above
    let next = keys.partition_point(|key| key.time <= time);
    let a = &keys[next - 1];
    let b = &keys[next];
    let span = b.time - a.time;
    if span <= 0.0 {
        return Some(b.value);
    }
    let t = ((time - a.time) / span) as f32;
    Some(a.value.interpolate(&b.value, t))
}

/// Position, rotation and scale keys targeting one node by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimChannel {
    /// Name of the node (and instanced component) this channel drives
    pub name: String,
    /// Position keys
    pub position_keys: Vec<Keyframe<Vec3>>,
    /// Rotation keys
    pub rotation_keys: Vec<Keyframe<Quat>>,
    /// Scale keys
    pub scale_keys: Vec<Keyframe<Vec3>>,
}

impl AnimChannel {
    /// Create an empty channel targeting `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder pattern: append a position key
    pub fn with_position_key(mut self, time: f64, value: Vec3) -> Self {
        self.position_keys.push(Keyframe::new(time, value));
        self
    }

    /// Builder pattern: append a rotation key
    pub fn with_rotation_key(mut self, time: f64, value: Quat) -> Self {
        self.rotation_keys.push(Keyframe::new(time, value));
        self
    }

    /// Builder pattern: append a scale key
    pub fn with_scale_key(mut self, time: f64, value: Vec3) -> Self {
        self.scale_keys.push(Keyframe::new(time, value));
        self
    }

    /// Whether every key sequence is ordered by time
    pub fn is_well_formed(&self) -> bool {
        is_sorted_by_time(&self.position_keys)
            && is_sorted_by_time(&self.rotation_keys)
            && is_sorted_by_time(&self.scale_keys)
    }

    /// Whether the channel has no keys at all
    pub fn is_empty(&self) -> bool {
        self.position_keys.is_empty() && self.rotation_keys.is_empty() && self.scale_keys.is_empty()
    }

    /// Sampled position at `time` ticks
    pub fn sample_position(&self, time: f64) -> Option<Vec3> {
        sample_keys(&self.position_keys, time)
    }

    /// Sampled rotation at `time` ticks
    pub fn sample_rotation(&self, time: f64) -> Option<Quat> {
        sample_keys(&self.rotation_keys, time)
    }

    /// Sampled scale at `time` ticks
    pub fn sample_scale(&self, time: f64) -> Option<Vec3> {
        sample_keys(&self.scale_keys, time)
    }
}

/// A named keyframe animation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Animation {
    /// Animation name
    pub name: String,
    /// Length in ticks
    pub duration: f64,
    /// Tick rate; zero means "unspecified" and is replaced by a configured default
    pub ticks_per_second: f64,
    /// Channels, one per animated node
    pub channels: Vec<AnimChannel>,
}

impl Animation {
    /// Create an animation without channels
    pub fn new(name: impl Into<String>, duration: f64, ticks_per_second: f64) -> Self {
        Self {
            name: name.into(),
            duration,
            ticks_per_second,
            channels: Vec::new(),
        }
    }

    /// Builder pattern: append a channel
    pub fn with_channel(mut self, channel: AnimChannel) -> Self {
        self.channels.push(channel);
        self
    }

    /// Tick rate, substituting `fallback` when the animation does not specify one
    pub fn effective_ticks_per_second(&self, fallback: f64) -> f64 {
        if self.ticks_per_second > 0.0 {
            self.ticks_per_second
        } else {
            fallback
        }
    }

    /// Duration in seconds
    pub fn duration_seconds(&self, fallback_ticks_per_second: f64) -> f64 {
        self.duration / self.effective_ticks_per_second(fallback_ticks_per_second)
    }

    /// First channel targeting `name`
    pub fn find_channel(&self, name: &str) -> Option<&AnimChannel> {
        self.channels.iter().find(|channel| channel.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::PI;
    use approx::assert_relative_eq;

    #[test]
    fn test_sample_between_keys() {
        let channel = AnimChannel::new("Arm")
            .with_position_key(0.0, Vec3::zeros())
            .with_position_key(1.0, Vec3::new(2.0, 0.0, 0.0))
            .with_position_key(3.0, Vec3::new(2.0, 4.0, 0.0));

        assert_relative_eq!(channel.sample_position(0.5).unwrap(), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(channel.sample_position(2.0).unwrap(), Vec3::new(2.0, 2.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(channel.sample_position(-1.0).unwrap(), Vec3::zeros(), epsilon = 1e-6);
        assert_relative_eq!(channel.sample_position(10.0).unwrap(), Vec3::new(2.0, 4.0, 0.0), epsilon = 1e-6);
        assert!(channel.sample_scale(0.5).is_none());
    }

    #[test]
    fn test_sample_rotation() {
        let channel = AnimChannel::new("Arm")
            .with_rotation_key(0.0, Quat::identity())
            .with_rotation_key(2.0, Quat::from_axis_angle(&Vec3::y_axis(), PI / 2.0));

        let halfway = channel.sample_rotation(1.0).unwrap();
        assert_relative_eq!(halfway.angle(), PI / 4.0, epsilon = 1e-5);
    }

    #[test]
    fn test_well_formedness() {
        let unordered = AnimChannel::new("Leg")
            .with_scale_key(1.0, Vec3::new(1.0, 1.0, 1.0))
            .with_scale_key(0.5, Vec3::new(2.0, 2.0, 2.0));
        assert!(!unordered.is_well_formed());

        let repeated = AnimChannel::new("Leg")
            .with_position_key(1.0, Vec3::zeros())
            .with_position_key(1.0, Vec3::new(1.0, 0.0, 0.0));
        assert!(repeated.is_well_formed());
    }

    #[test]
    fn test_tick_rate_fallback() {
        let animation = Animation::new("walk", 50.0, 0.0);
        assert_relative_eq!(animation.duration_seconds(25.0), 2.0);

        let animation = Animation::new("run", 30.0, 30.0);
        assert_relative_eq!(animation.duration_seconds(25.0), 1.0);
    }
}
