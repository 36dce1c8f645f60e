//! A [`telemeter`] driver forwarding instrumentation events to a statsd-style
//! client.
//!
//! The crate supplies the one piece the core facade deliberately leaves out:
//! a concrete backend. [`StatsdDriver`] adapts any client implementing the
//! [`StatsdClient`] contract -- four fallible primitives for timings,
//! counter increments, samples, and gauges -- to the
//! [`Driver`](telemeter::Driver) capability contract, so it can be registered
//! on a [`Dispatcher`](telemeter::Dispatcher).
//!
//! Timed spans are measured with a monotonic clock and reported in whole,
//! truncated milliseconds. Tags are rendered into the statsd `"key:value"`
//! line format before they cross the client boundary. Send failures are
//! logged and dropped: instrumentation stays best-effort and never alters
//! the control flow of the code being measured.
//!
//! ```no_run
//! use std::sync::Arc;
//! use telemeter::Dispatcher;
//! use telemeter_statsd::StatsdDriverBuilder;
//! # struct UdpStatsd;
//! # impl telemeter_statsd::StatsdClient for UdpStatsd {
//! #     type Error = std::io::Error;
//! #     fn timing(&self, _: &str, _: u64, _: &[String]) -> std::io::Result<()> { Ok(()) }
//! #     fn increment(&self, _: &str, _: u64, _: &[String]) -> std::io::Result<()> { Ok(()) }
//! #     fn count(&self, _: &str, _: f64, _: &[String]) -> std::io::Result<()> { Ok(()) }
//! #     fn gauge(&self, _: &str, _: f64, _: &[String]) -> std::io::Result<()> { Ok(()) }
//! # }
//! # fn connect() -> UdpStatsd { UdpStatsd }
//!
//! let driver = StatsdDriverBuilder::default()
//!     .with_prefix("svc")?
//!     .with_constant_tags(&[("app", "demo")])
//!     .build(connect());
//!
//! let dispatcher = Dispatcher::new();
//! dispatcher.register(Arc::new(driver));
//! # Ok::<(), telemeter_statsd::BuildError>(())
//! ```

mod builder;
mod client;
mod driver;

pub use self::builder::{BuildError, StatsdDriverBuilder};
pub use self::client::StatsdClient;
pub use self::driver::StatsdDriver;
