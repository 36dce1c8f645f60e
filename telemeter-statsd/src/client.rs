use std::error::Error;

/// A generic statsd-style client.
///
/// This is the boundary between [`StatsdDriver`](crate::StatsdDriver) and
/// whatever transport actually carries the metrics: a UDP socket, a Unix
/// datagram socket, an in-memory recorder in tests. The four primitives map
/// onto the common statsd wire operations, with tags already rendered in the
/// `"key:value"` line format.
///
/// Sends are fallible. The driver treats instrumentation as best-effort and
/// logs send failures rather than surfacing them, so an implementation should
/// report errors honestly instead of panicking.
pub trait StatsdClient {
    /// Error raised when a send fails.
    type Error: Error;

    /// Reports a timing of `millis` whole milliseconds under `name`.
    fn timing(&self, name: &str, millis: u64, tags: &[String]) -> Result<(), Self::Error>;

    /// Increments the counter under `name` by `by`.
    fn increment(&self, name: &str, by: u64, tags: &[String]) -> Result<(), Self::Error>;

    /// Reports a single sample `value` under `name`.
    fn count(&self, name: &str, value: f64, tags: &[String]) -> Result<(), Self::Error>;

    /// Sets the gauge under `name` to the absolute `value`.
    fn gauge(&self, name: &str, value: f64, tags: &[String]) -> Result<(), Self::Error>;
}
