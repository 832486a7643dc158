//! Scene mutation errors

use thiserror::Error;

use crate::foundation::collections::{ComponentId, TransformId};

/// Errors returned by structural scene mutations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Component handle no longer refers to a live component
    #[error("Component {0:?} does not exist")]
    StaleComponent(ComponentId),

    /// Transform handle no longer refers to a live transform
    #[error("Transform {0:?} does not exist")]
    StaleTransform(TransformId),

    /// The requested parent link would make a transform its own ancestor
    #[error("Parenting transform {child:?} under {parent:?} would create a cycle")]
    TransformCycle {
        /// Transform being re-parented
        child: TransformId,
        /// Requested parent
        parent: TransformId,
    },

    /// The requested attachment would make a component its own ancestor
    #[error("Attaching component {child:?} under {parent:?} would create a cycle")]
    ComponentCycle {
        /// Component being attached
        child: ComponentId,
        /// Requested parent
        parent: ComponentId,
    },

    /// Component must be detached before it can be attached elsewhere
    #[error("Component {0:?} already has a parent")]
    AlreadyAttached(ComponentId),

    /// The scene root cannot be detached or destroyed
    #[error("The scene root cannot be detached or destroyed")]
    RootRemoval,

    /// Operation needs a component of a different kind
    #[error("Component '{name}' is not {expected}")]
    KindMismatch {
        /// Name of the offending component
        name: String,
        /// Kind the operation expected
        expected: &'static str,
    },
}
