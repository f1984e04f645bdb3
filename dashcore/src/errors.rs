//! Error types for dashcore.
//!
//! The error design follows the layering of the crate:
//!
//! - **CommandError**: why a handler refused or could not process a command
//! - **StoreError**: a mutation could not be applied to the state
//! - **DispatchError**: the async dispatcher could not deliver a command
//! - **ConfigError**: configuration could not be parsed or validated
//!
//! Command and store errors never reach callers of
//! [`DashboardRuntime::execute`](crate::runtime::DashboardRuntime::execute).
//! They are converted into `CommandRejected` / `CommandFailed` events at the
//! runtime boundary. Only dispatcher transport failures are returned as
//! `Err`.

use crate::event::ActionFailedErrorReason;
use crate::model::WidgetKind;
use crate::types::ObjRef;
use thiserror::Error;

/// Errors produced while validating or handling a command.
///
/// # Rejected vs failed
///
/// - **EntityNotFound**, **InvalidEntityKind**: the command references
///   something that is not there (or not what it claims). Reported as
///   `CommandRejected`.
/// - **InvalidArgument**, **NothingToUndo**: the command is well-formed but
///   cannot be applied. Reported as `CommandFailed` with `USER_ERROR`.
/// - **Store**: the store refused a mutation. Reported as `CommandFailed`
///   with `INTERNAL_ERROR`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The referenced entity does not exist in the current state.
    #[error("Entity not found: {entity_ref}")]
    EntityNotFound {
        /// Reference that did not resolve
        entity_ref: ObjRef,
    },

    /// The referenced widget exists but is of another kind.
    #[error("Widget {widget_ref} is a {actual} widget, expected a {expected} widget")]
    InvalidEntityKind {
        /// The widget reference
        widget_ref: ObjRef,
        /// Kind the command requires
        expected: WidgetKind,
        /// Kind found in the state
        actual: WidgetKind,
    },

    /// A command argument is invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Undo was requested with an empty history.
    #[error("There are no changes to undo")]
    NothingToUndo,

    /// The store could not apply a mutation.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl CommandError {
    /// Machine readable kind, carried by `CommandFailed` events.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::EntityNotFound { .. } => "ENTITY_NOT_FOUND",
            Self::InvalidEntityKind { .. } => "INVALID_ENTITY_KIND",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::NothingToUndo => "NOTHING_TO_UNDO",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// Whether the error is reported as `CommandRejected`.
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::EntityNotFound { .. } | Self::InvalidEntityKind { .. }
        )
    }

    /// Failure classification used when the error is reported as `CommandFailed`.
    pub const fn failure_reason(&self) -> ActionFailedErrorReason {
        match self {
            Self::Store(_) => ActionFailedErrorReason::InternalError,
            Self::EntityNotFound { .. }
            | Self::InvalidEntityKind { .. }
            | Self::InvalidArgument(_)
            | Self::NothingToUndo => ActionFailedErrorReason::UserError,
        }
    }
}

/// Errors raised by [`DashboardStore`](crate::store::DashboardStore) while
/// applying mutations.
///
/// Any of these aborts the whole batch; the state is left as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A mutation targets a widget that is not on the dashboard.
    #[error("Widget not found: {0}")]
    WidgetNotFound(ObjRef),

    /// A mutation targets a widget of the wrong kind.
    #[error("Widget {widget_ref} is a {actual} widget, expected a {expected} widget")]
    UnexpectedWidgetKind {
        /// The widget reference
        widget_ref: ObjRef,
        /// Kind the mutation requires
        expected: WidgetKind,
        /// Kind found in the state
        actual: WidgetKind,
    },

    /// An undo mutation was applied with an empty history.
    #[error("Undo history is empty")]
    EmptyHistory,
}

/// Errors returned by the async [`Dispatcher`](crate::dispatcher::Dispatcher).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The worker has stopped and no longer accepts commands.
    #[error("Dispatcher is closed")]
    Closed,

    /// The worker dropped the reply before answering.
    #[error("Dispatcher dropped the reply for a command")]
    Dropped,

    /// The worker task ended abnormally.
    #[error("Dispatcher worker failed: {0}")]
    WorkerFailed(String),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document is malformed or out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Type alias for command handling results.
pub type CommandResult<T> = Result<T, CommandError>;

/// Type alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ObjectType;

    fn widget_ref() -> ObjRef {
        ObjRef::try_identifier("w1", ObjectType::Widget).unwrap()
    }

    #[test]
    fn reference_errors_are_rejections() {
        assert!(CommandError::EntityNotFound {
            entity_ref: widget_ref()
        }
        .is_rejection());
        assert!(CommandError::InvalidEntityKind {
            widget_ref: widget_ref(),
            expected: WidgetKind::Insight,
            actual: WidgetKind::Kpi,
        }
        .is_rejection());
        assert!(!CommandError::NothingToUndo.is_rejection());
        assert!(!CommandError::InvalidArgument("x".into()).is_rejection());
    }

    #[test]
    fn store_errors_are_internal_failures() {
        let error = CommandError::from(StoreError::EmptyHistory);

        assert_eq!(error.failure_reason(), ActionFailedErrorReason::InternalError);
        assert_eq!(error.kind(), "STORE_ERROR");
        assert!(!error.is_rejection());
    }

    #[test]
    fn invalid_entity_kind_message_names_both_kinds() {
        let error = CommandError::InvalidEntityKind {
            widget_ref: widget_ref(),
            expected: WidgetKind::Insight,
            actual: WidgetKind::Kpi,
        };

        assert_eq!(
            error.to_string(),
            "Widget w1 is a kpi widget, expected a insight widget"
        );
    }
}
