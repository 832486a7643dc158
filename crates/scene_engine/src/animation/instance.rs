//! Playback of an animation bound to an instanced subtree

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::foundation::collections::TransformId;
use crate::scene::TransformArena;
use super::clip::Animation;
use super::interpolation::{FieldValue, TransformField};

/// Playback state of an [`AnimationInstance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Not playing; time is at the start
    #[default]
    Stopped,
    /// Time advances every update
    Playing,
    /// Time is frozen where it was paused
    Paused,
}

/// What playback does when time passes the end of the animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoopMode {
    /// Wrap time back to the start
    #[default]
    Loop,
    /// Hold the final pose
    Clamp,
}

/// Channel index paired with the transform it drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelBinding {
    /// Index into [`Animation::channels`]
    pub channel: usize,
    /// Transform of the component whose name matched the channel
    pub transform: TransformId,
}

/// One animation bound by name to an instanced component subtree
#[derive(Debug, Clone)]
pub struct AnimationInstance {
    animation: Arc<Animation>,
    bindings: Vec<ChannelBinding>,
    ticks_per_second: f64,
    time: f64,
    speed: f64,
    state: PlaybackState,
    loop_mode: LoopMode,
}

impl AnimationInstance {
    /// Create an unbound, stopped instance
    ///
    /// `fallback_ticks_per_second` is used when the animation has no tick rate.
    pub fn new(animation: Arc<Animation>, loop_mode: LoopMode, fallback_ticks_per_second: f64) -> Self {
        let ticks_per_second = animation.effective_ticks_per_second(fallback_ticks_per_second);
        Self {
            animation,
            bindings: Vec::new(),
            ticks_per_second,
            time: 0.0,
            speed: 1.0,
            state: PlaybackState::Stopped,
            loop_mode,
        }
    }

    /// Builder pattern: attach bindings resolved against a scene
    pub fn with_bindings(mut self, bindings: Vec<ChannelBinding>) -> Self {
        self.bindings = bindings;
        self
    }

    /// The animation being played
    pub fn animation(&self) -> &Arc<Animation> {
        &self.animation
    }

    /// Animation name
    pub fn name(&self) -> &str {
        &self.animation.name
    }

    /// Resolved channel bindings
    pub fn bindings(&self) -> &[ChannelBinding] {
        &self.bindings
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether the instance is currently playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Loop behaviour at the end of the animation
    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    /// Change loop behaviour
    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        self.loop_mode = mode;
    }

    /// Playback rate multiplier (1.0 = authored speed)
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.max(0.0);
    }

    /// Current time in ticks
    pub fn time_ticks(&self) -> f64 {
        self.time
    }

    /// Current time in seconds
    pub fn time_seconds(&self) -> f64 {
        self.time / self.ticks_per_second
    }

    /// Jump to a time in seconds, wrapped or clamped by the loop mode
    pub fn seek(&mut self, seconds: f64) {
        self.time = self.resolve_time(seconds.max(0.0) * self.ticks_per_second);
    }

    /// Whether a clamped instance has reached the end
    pub fn is_finished(&self) -> bool {
        self.loop_mode == LoopMode::Clamp && self.time >= self.animation.duration
    }

    /// Start playing from the beginning, or resume when paused
    pub fn play(&mut self) {
        match self.state {
            PlaybackState::Stopped => {
                self.time = 0.0;
                self.state = PlaybackState::Playing;
            }
            PlaybackState::Paused => self.state = PlaybackState::Playing,
            PlaybackState::Playing => {}
        }
    }

    /// Freeze playback; only valid while playing
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        } else {
            log::debug!("Ignoring pause of animation '{}' in state {:?}", self.name(), self.state);
        }
    }

    /// Stop playback and rewind
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.time = 0.0;
    }

    fn resolve_time(&self, ticks: f64) -> f64 {
        let duration = self.animation.duration;
        if ticks <= duration {
            return ticks;
        }
        match self.loop_mode {
            LoopMode::Loop if duration > 0.0 => ticks % duration,
            LoopMode::Loop => 0.0,
            LoopMode::Clamp => duration,
        }
    }

    /// Advance time by `dt` seconds and pose the bound transforms
    ///
    /// Does nothing unless the instance is playing.
    pub fn update(&mut self, dt: f32, transforms: &mut TransformArena) {
        if self.state != PlaybackState::Playing {
            return;
        }
        let advanced = self.time + f64::from(dt) * self.ticks_per_second * self.speed;
        self.time = self.resolve_time(advanced);
        self.apply(transforms);
    }

    /// Write the pose at the current time into the bound transforms
    pub fn apply(&self, transforms: &mut TransformArena) {
        for binding in &self.bindings {
            let Some(channel) = self.animation.channels.get(binding.channel) else {
                continue;
            };
            let Some(transform) = transforms.get_mut(binding.transform) else {
                log::trace!("Skipping stale binding for channel '{}'", channel.name);
                continue;
            };
            if let Some(position) = channel.sample_position(self.time) {
                transform.apply_field(TransformField::Position, FieldValue::Vector(position));
            }
            if let Some(rotation) = channel.sample_rotation(self.time) {
                transform.apply_field(TransformField::Rotation, FieldValue::Rotation(rotation));
            }
            if let Some(scale) = channel.sample_scale(self.time) {
                transform.apply_field(TransformField::Scale, FieldValue::Vector(scale));
            }
        }
    }
}

/// Collection of animation instances driven by an animation manager component
#[derive(Debug, Clone, Default)]
pub struct AnimationManager {
    instances: Vec<AnimationInstance>,
}

impl AnimationManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an instance, returning its index
    pub fn add_instance(&mut self, instance: AnimationInstance) -> usize {
        self.instances.push(instance);
        self.instances.len() - 1
    }

    /// Number of instances
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Instance by index
    pub fn instance(&self, index: usize) -> Option<&AnimationInstance> {
        self.instances.get(index)
    }

    /// Mutable instance by index
    pub fn instance_mut(&mut self, index: usize) -> Option<&mut AnimationInstance> {
        self.instances.get_mut(index)
    }

    /// First instance playing an animation called `name`
    pub fn find_instance_mut(&mut self, name: &str) -> Option<&mut AnimationInstance> {
        self.instances.iter_mut().find(|instance| instance.name() == name)
    }

    /// All instances
    pub fn instances(&self) -> &[AnimationInstance] {
        &self.instances
    }

    /// Update every instance in insertion order; later instances overwrite earlier ones
    pub fn update(&mut self, dt: f32, transforms: &mut TransformArena) {
        for instance in &mut self.instances {
            instance.update(dt, transforms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimChannel;
    use crate::foundation::math::{LocalTransform, Vec3};
    use crate::scene::Transform;
    use approx::assert_relative_eq;

    fn slide(duration: f64) -> Arc<Animation> {
        Arc::new(
            Animation::new("slide", duration, 1.0).with_channel(
                AnimChannel::new("Arm")
                    .with_position_key(0.0, Vec3::zeros())
                    .with_position_key(duration, Vec3::new(duration as f32, 0.0, 0.0)),
            ),
        )
    }

    fn bound(loop_mode: LoopMode) -> (AnimationInstance, TransformArena, TransformId) {
        let mut transforms = TransformArena::new();
        let id = transforms.insert(Transform::new(LocalTransform::identity()));
        let instance = AnimationInstance::new(slide(2.0), loop_mode, 25.0)
            .with_bindings(vec![ChannelBinding { channel: 0, transform: id }]);
        (instance, transforms, id)
    }

    #[test]
    fn test_state_machine() {
        let (mut instance, mut transforms, id) = bound(LoopMode::Loop);
        assert_eq!(instance.state(), PlaybackState::Stopped);

        instance.update(1.0, &mut transforms);
        assert_relative_eq!(transforms.get(id).unwrap().position(), Vec3::zeros());

        instance.play();
        instance.update(0.5, &mut transforms);
        assert_relative_eq!(transforms.get(id).unwrap().position().x, 0.5, epsilon = 1e-5);

        instance.pause();
        assert_eq!(instance.state(), PlaybackState::Paused);
        instance.update(1.0, &mut transforms);
        assert_relative_eq!(instance.time_seconds(), 0.5, epsilon = 1e-9);

        instance.play();
        assert_eq!(instance.state(), PlaybackState::Playing);
        instance.update(0.5, &mut transforms);
        assert_relative_eq!(transforms.get(id).unwrap().position().x, 1.0, epsilon = 1e-5);

        instance.stop();
        assert_eq!(instance.state(), PlaybackState::Stopped);
        assert_relative_eq!(instance.time_seconds(), 0.0);
    }

    #[test]
    fn test_pause_from_stopped_is_ignored() {
        let (mut instance, _, _) = bound(LoopMode::Loop);
        instance.pause();
        assert_eq!(instance.state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_loop_wraps_time() {
        let (mut instance, mut transforms, id) = bound(LoopMode::Loop);
        instance.play();
        instance.update(2.5, &mut transforms);

        assert_relative_eq!(instance.time_seconds(), 0.5, epsilon = 1e-6);
        assert_relative_eq!(transforms.get(id).unwrap().position().x, 0.5, epsilon = 1e-5);
        assert!(!instance.is_finished());
    }

    #[test]
    fn test_clamp_holds_last_pose() {
        let (mut instance, mut transforms, id) = bound(LoopMode::Clamp);
        instance.play();
        instance.update(5.0, &mut transforms);

        assert_relative_eq!(instance.time_seconds(), 2.0, epsilon = 1e-6);
        assert_relative_eq!(transforms.get(id).unwrap().position().x, 2.0, epsilon = 1e-5);
        assert!(instance.is_finished());
        assert!(instance.is_playing());
    }

    #[test]
    fn test_tick_rate_scales_time() {
        let animation = Arc::new(Animation::new("fast", 50.0, 0.0));
        let mut instance = AnimationInstance::new(animation, LoopMode::Clamp, 25.0);
        let mut transforms = TransformArena::new();
        instance.play();
        instance.update(1.0, &mut transforms);

        assert_relative_eq!(instance.time_ticks(), 25.0, epsilon = 1e-6);
        assert_relative_eq!(instance.time_seconds(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_manager_lookup() {
        let mut manager = AnimationManager::new();
        manager.add_instance(AnimationInstance::new(slide(1.0), LoopMode::Loop, 25.0));
        assert_eq!(manager.instance_count(), 1);
        assert!(manager.find_instance_mut("slide").is_some());
        assert!(manager.find_instance_mut("jump").is_none());
    }
}
