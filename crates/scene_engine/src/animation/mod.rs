//! Keyframe animation and transform interpolation
//!
//! - [`interpolation`]: time-bounded blends attached to transform fields
//! - [`clip`]: animations, channels and keyframes as loaded from assets
//! - [`instance`]: playback of an animation bound to an instanced subtree

pub mod interpolation;
pub mod clip;
pub mod instance;

pub use interpolation::{FieldValue, Interpolate, Interpolator, InterpolatorStep, TransformField};
pub use clip::{AnimChannel, Animation, Keyframe};
pub use instance::{AnimationInstance, AnimationManager, ChannelBinding, LoopMode, PlaybackState};
