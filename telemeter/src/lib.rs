//! A minimal instrumentation facade.
//!
//! `telemeter` lets application code emit timing, counter, gauge, and
//! distribution-sample events without depending on any concrete metrics
//! backend. Backends are attached at startup as [`Driver`]s and can differ
//! per deployment: a statsd-style daemon client, an APM agent, or none at
//! all.
//!
//! # Overview
//!
//! The crate exposes two concepts: the [`Dispatcher`], which application code
//! emits through, and the [`Driver`] contract, which any backend adapter
//! implements to receive those emissions.
//!
//! Four kinds of event are supported:
//!
//! - **Timed spans** ([`Dispatcher::instrument`]) measure the duration of a
//!   closure and report it under a name. With several drivers registered, the
//!   spans nest in registration order around the instrumented closure, and
//!   the closure's return value always comes back to the caller untouched.
//! - **Counters** ([`Dispatcher::increment_counter`],
//!   [`Dispatcher::increment_counter_by`]) are cumulative values incremented
//!   by a delta, 1 by default.
//! - **Gauges** ([`Dispatcher::set_gauge`]) are absolute point-in-time
//!   values.
//! - **Distribution values** ([`Dispatcher::add_distribution_value`]) are
//!   individual samples contributing to a statistical distribution tracked by
//!   the backend.
//!
//! Every emission is forwarded synchronously, on the calling thread, to each
//! registered driver. The dispatcher itself stores nothing, buffers nothing,
//! and -- when no driver is registered -- degrades to invoking the
//! instrumented code directly with zero overhead.
//!
//! Metric names are path-like strings; whether segments are separated by dots
//! or slashes is the caller's convention, not enforced here. Emissions may
//! optionally carry [`Tag`]s, key/value annotations backends use for
//! dimensional breakdown.
//!
//! # Usage
//!
//! Construct a [`Dispatcher`], register drivers on it during startup, and
//! pass it to the code that emits:
//!
//! ```
//! use telemeter::Dispatcher;
//!
//! let dispatcher = Dispatcher::new();
//! // dispatcher.register(Arc::new(SomeDriver::new(...)));
//!
//! let parsed = dispatcher.instrument("document.parse", (), || {
//!     // ... expensive work ...
//!     42
//! });
//! assert_eq!(parsed, 42);
//!
//! dispatcher.increment_counter_by("documents.processed", 1, &[("kind", "pdf")]);
//! ```
//!
//! Alternatively a process-wide instance is available through [`global()`]
//! for applications that prefer not to thread a dispatcher through every call
//! site.

mod dispatcher;
mod driver;
mod tag;

pub use self::dispatcher::{global, Dispatcher};
pub use self::driver::Driver;
pub use self::tag::{IntoTags, SharedString, Tag};
