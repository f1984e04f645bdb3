//! Async boundary around [`DashboardRuntime`].
//!
//! The [`Dispatcher`] owns a runtime on a dedicated tokio task. Commands are
//! queued on a bounded channel and processed one at a time in arrival order,
//! which keeps the single-writer guarantee of the runtime. Events fan out to
//! subscribers through a broadcast channel; each subscriber gets a
//! [`Stream`](futures::Stream) filtered by its own predicate.
//!
//! Only transport problems (a stopped worker, a dropped reply) are reported
//! as [`DispatchError`]. Command failures arrive as events like everywhere
//! else.
//!
//! # Example
//!
//! ```rust
//! use dashcore::command;
//! use dashcore::config::DashboardConfig;
//! use dashcore::context::DashboardContext;
//! use dashcore::dispatcher::Dispatcher;
//! use dashcore::event::DashboardEventType;
//! use dashcore::model::DashboardState;
//! use dashcore::types::Identifier;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = DashboardContext::new(Identifier::try_new("workspace")?);
//! let dispatcher = Dispatcher::spawn(&DashboardConfig::default(), ctx, DashboardState::new("Sales"));
//!
//! let outcome = dispatcher
//!     .dispatch_and_wait(command::rename_dashboard("Revenue", None))
//!     .await?;
//! assert_eq!(outcome.event_type(), DashboardEventType::DashboardRenamed);
//!
//! let state = dispatcher.shutdown().await?;
//! assert_eq!(state.title(), "Revenue");
//! # Ok(())
//! # }
//! ```

use crate::command::DashboardCommand;
use crate::config::DashboardConfig;
use crate::context::DashboardContext;
use crate::errors::DispatchError;
use crate::event::DashboardEvent;
use crate::model::DashboardState;
use crate::predicate::EventPredicate;
use crate::runtime::DashboardRuntime;
use crate::types::CorrelationId;
use futures::stream::{self, BoxStream, StreamExt};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Stream of events matching a subscriber's predicate.
pub type EventStream = BoxStream<'static, DashboardEvent>;

struct Request {
    cmd: DashboardCommand,
    reply: Option<oneshot::Sender<DashboardEvent>>,
}

/// Runs a [`DashboardRuntime`] on a background task.
#[derive(Debug)]
pub struct Dispatcher {
    commands: mpsc::Sender<Request>,
    events: broadcast::Sender<DashboardEvent>,
    snapshot: Arc<RwLock<DashboardState>>,
    worker: JoinHandle<DashboardState>,
}

impl Dispatcher {
    /// Starts the worker task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: &DashboardConfig, ctx: DashboardContext, state: DashboardState) -> Self {
        let (commands, receiver) = mpsc::channel(config.command_queue_capacity.into_inner());
        let (events, _) = broadcast::channel(config.event_channel_capacity.into_inner());
        let snapshot = Arc::new(RwLock::new(state.clone()));

        let mut runtime = DashboardRuntime::new(ctx, state, config);
        let sender = events.clone();
        let _ = runtime.subscribe(EventPredicate::any(), move |event| {
            // No receivers is fine; events are dropped until someone subscribes
            let _ = sender.send(event.clone());
        });

        let worker = tokio::spawn(run_worker(runtime, receiver, Arc::clone(&snapshot)));

        Self {
            commands,
            events,
            snapshot,
            worker,
        }
    }

    /// Queues a command without waiting for its outcome.
    ///
    /// Waits only when the queue is full.
    pub async fn dispatch(&self, cmd: DashboardCommand) -> Result<(), DispatchError> {
        self.commands
            .send(Request { cmd, reply: None })
            .await
            .map_err(|_| DispatchError::Closed)
    }

    /// Queues a command and resolves with its outcome event.
    ///
    /// A command without a correlation ID is given a fresh one, so its
    /// events can be told apart on subscriber streams.
    pub async fn dispatch_and_wait(
        &self,
        cmd: DashboardCommand,
    ) -> Result<DashboardEvent, DispatchError> {
        let cmd = match cmd.correlation_id {
            Some(_) => cmd,
            None => cmd.with_correlation_id(CorrelationId::generate()),
        };

        let (reply, outcome) = oneshot::channel();
        self.commands
            .send(Request {
                cmd,
                reply: Some(reply),
            })
            .await
            .map_err(|_| DispatchError::Closed)?;

        outcome.await.map_err(|_| DispatchError::Dropped)
    }

    /// Subscribes to events matching `predicate`.
    ///
    /// Only events published after the call are seen. A subscriber that
    /// falls more than the channel capacity behind skips the missed events.
    /// The stream ends once the dispatcher shuts down.
    pub fn subscribe(&self, predicate: EventPredicate) -> EventStream {
        let receiver = self.events.subscribe();
        stream::unfold(
            (receiver, predicate),
            |(mut receiver, predicate)| async move {
                loop {
                    match receiver.recv().await {
                        Ok(event) if predicate.matches(&event) => {
                            return Some((event, (receiver, predicate)));
                        }
                        Ok(_) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "Event subscriber lagged behind");
                        }
                        Err(RecvError::Closed) => return None,
                    }
                }
            },
        )
        .boxed()
    }

    /// The latest committed state.
    pub fn state(&self) -> DashboardState {
        self.snapshot.read().clone()
    }

    /// Stops accepting commands, drains the queue and returns the final state.
    pub async fn shutdown(self) -> Result<DashboardState, DispatchError> {
        let Self {
            commands,
            events,
            worker,
            ..
        } = self;
        drop(commands);
        drop(events);

        worker
            .await
            .map_err(|error| DispatchError::WorkerFailed(error.to_string()))
    }
}

#[tracing::instrument(name = "dispatcher_worker", skip_all, fields(workspace = %runtime.context().workspace))]
async fn run_worker(
    mut runtime: DashboardRuntime,
    mut commands: mpsc::Receiver<Request>,
    snapshot: Arc<RwLock<DashboardState>>,
) -> DashboardState {
    info!("Dispatcher worker started");

    while let Some(Request { cmd, reply }) = commands.recv().await {
        let outcome = runtime.execute(cmd);
        *snapshot.write() = runtime.state().clone();
        if let Some(reply) = reply {
            // The caller may have stopped waiting
            let _ = reply.send(outcome);
        }
    }

    info!("Dispatcher worker stopped");
    runtime.into_state()
}
