//! Physics integration
//!
//! The simulation itself lives behind [`PhysicsBackend`]; this module only
//! describes collision bodies and tracks which components registered them.

pub mod collision;

pub use collision::{CollisionObject, CollisionRegistry, CollisionShape, PhysicsBackend, ShapeKind};
