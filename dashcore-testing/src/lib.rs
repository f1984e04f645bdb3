//! Test support for `dashcore`.
//!
//! - [`builders`]: terse construction of dashboard states and widgets
//! - [`generators`]: `proptest` strategies for references, blacklists and events
//! - [`event_collector`]: a listener that records delivered events
//! - [`assertions`]: helpers for checking event sequences and streams
//! - [`logging`]: opt-in tracing output for debugging tests

#![forbid(unsafe_code, unreachable_pub, unconditional_recursion)]
#![deny(
    bad_style,
    clippy::allow_attributes,
    rust_2018_idioms,
    unused_imports,
    unused_must_use,
    unused_mut,
    unused_qualifications,
    unused_results,
    unused_variables
)]

pub mod assertions;
pub mod builders;
pub mod event_collector;
pub mod generators;
pub mod logging;

pub use assertions::*;
pub use builders::*;
pub use event_collector::EventCollector;
