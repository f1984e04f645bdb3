//! `dashcore` - Typed command/event model for dashboard state
//!
//! Commands express intent, validators check them against a state snapshot,
//! handlers turn them into reversible state mutations plus events, and
//! listeners pick the events they care about with predicates. The
//! [`DashboardRuntime`] drives all of this synchronously; the
//! [`Dispatcher`] puts it behind an async queue.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod command;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod errors;
pub mod event;
pub mod handlers;
pub mod model;
pub mod mutation;
pub mod predicate;
pub mod runtime;
pub mod store;
pub mod types;
pub mod validation;

pub use command::{CommandPayload, CommandType, DashboardCommand};
pub use config::DashboardConfig;
pub use context::DashboardContext;
pub use dispatcher::{Dispatcher, EventStream};
pub use errors::{CommandError, DispatchError, StoreError};
pub use event::{DashboardEvent, DashboardEventType, EventPayload, EventPayloadKind};
pub use model::{DashboardState, Widget, WidgetKind};
pub use predicate::{new_dashboard_event_predicate, new_refined_event_predicate, EventPredicate};
pub use runtime::DashboardRuntime;
pub use types::{CorrelationId, ObjRef};
