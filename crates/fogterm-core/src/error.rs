//! Error types for fogterm-core.

use crate::control::ControlId;
use crate::event::Key;
use thiserror::Error;

/// Precondition violations on the control tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    /// A geometry value was negative or does not fit in a cell coordinate.
    #[error("{field} must be between 0 and {max}, got {value}")]
    InvalidGeometry {
        /// Property name (`top`, `left`, `width`, `height`)
        field: &'static str,
        /// Rejected value
        value: i32,
        /// Largest accepted value
        max: u16,
    },

    /// The widget fixes this dimension itself.
    #[error("{field} of control {id} is fixed by its widget")]
    FixedDimension {
        /// Control that rejected the change
        id: ControlId,
        /// `width` or `height`
        field: &'static str,
    },

    /// The id does not refer to a live control.
    #[error("unknown control {0}")]
    UnknownControl(ControlId),

    /// A container operation was requested on a leaf.
    #[error("control {0} is not a container")]
    NotAContainer(ControlId),

    /// A widget operation was requested on a container.
    #[error("control {0} is not a leaf widget")]
    NotAWidget(ControlId),

    /// The control already belongs to a container.
    #[error("control {child} is already attached to container {container}")]
    AlreadyAttached {
        /// Control being added
        child: ControlId,
        /// Container currently holding it
        container: ControlId,
    },

    /// Destroying a control that is still part of a tree.
    #[error("control {0} is still attached to a container")]
    StillAttached(ControlId),

    /// Adding a container into itself or into one of its descendants.
    #[error("adding control {child} to {container} would create a cycle")]
    WouldCreateCycle {
        /// Control being added
        child: ControlId,
        /// Target container
        container: ControlId,
    },

    /// Positional access past the end of a container.
    #[error("index {index} out of bounds for container with {len} children")]
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Number of children
        len: usize,
    },

    /// A sibling already uses this name.
    #[error("a control named {name:?} already exists in container {container}")]
    DuplicateName {
        /// Conflicting name
        name: String,
        /// Container holding both controls
        container: ControlId,
    },

    /// `update_widget`/`widget` asked for the wrong concrete type.
    #[error("control {id} holds a {actual}, not the requested widget type")]
    WidgetTypeMismatch {
        /// Control queried
        id: ControlId,
        /// Widget type actually stored
        actual: &'static str,
    },

    /// Text that must stay on one line contained a line break.
    #[error("text can't contain line feeds or carriage returns")]
    MultilineText,

    /// A bounded value was outside its range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        /// Property name
        field: &'static str,
        /// Rejected value
        value: i64,
        /// Inclusive lower bound
        min: i64,
        /// Inclusive upper bound
        max: i64,
    },
}

/// Failures of the layout/paint protocol.
#[derive(Debug, Error)]
pub enum DrawError {
    /// `draw` was called before `compute_boundary`.
    #[error("compute_boundary has to run before control {0} can be drawn")]
    BoundaryNotComputed(ControlId),

    /// The id does not refer to a live control.
    #[error("unknown control {0}")]
    UnknownControl(ControlId),

    /// Writing to the surface failed.
    #[error("surface error: {0}")]
    Surface(#[from] std::io::Error),
}

/// Precondition violations of the focus manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FocusError {
    /// The root may not itself sit inside a container.
    #[error("root control {0} has a container")]
    RootHasContainer(ControlId),

    /// The root must be a container.
    #[error("root control {0} is not a container")]
    RootNotContainer(ControlId),

    /// The start control was never added to a container.
    #[error("start control {0} is not attached to a container")]
    StartDetached(ControlId),

    /// The start control does not accept key input.
    #[error("start control {0} is not an input handler")]
    NotInputHandler(ControlId),

    /// The start control is attached, but not below the root.
    #[error("start control {0} is not reachable from the root")]
    StartNotInTree(ControlId),

    /// The key is not in the manager's declared key set.
    #[error("key {0} is not handled by the focus manager")]
    UnhandledKey(Key),

    /// The id does not refer to a live control.
    #[error("unknown control {0}")]
    UnknownControl(ControlId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_geometry_message() {
        let err = ControlError::InvalidGeometry {
            field: "width",
            value: -1,
            max: u16::MAX,
        };
        let msg = err.to_string();
        assert!(msg.contains("width"));
        assert!(msg.contains("-1"));
    }

    #[test]
    fn test_draw_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let err: DrawError = io_err.into();
        assert!(matches!(err, DrawError::Surface(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_focus_error_unhandled_key() {
        let err = FocusError::UnhandledKey(Key::Enter);
        assert_eq!(err.to_string(), "key Enter is not handled by the focus manager");
    }
}
