use std::sync::Arc;

use arc_swap::ArcSwap;
use once_cell::sync::Lazy;

use crate::{Driver, IntoTags, SharedString};

static GLOBAL_DISPATCHER: Lazy<Dispatcher> = Lazy::new(Dispatcher::new);

/// Returns the process-wide dispatcher.
///
/// The instance is created empty on first access and lives for the remainder
/// of the process. Applications register their drivers on it during startup
/// and emit through it from anywhere; with no drivers registered, every
/// operation is a no-op.
///
/// Tests should prefer constructing their own [`Dispatcher`] over mutating
/// the shared instance.
pub fn global() -> &'static Dispatcher {
    &GLOBAL_DISPATCHER
}

type DriverSet = Vec<Arc<dyn Driver>>;

/// Forwards instrumentation events to a set of registered [`Driver`]s.
///
/// The dispatcher is the single entry point application code emits through:
/// it holds the registered drivers and fans every timing, counter, gauge, and
/// distribution-sample event out to each of them, synchronously, on the
/// calling thread. It performs no buffering, batching, sampling, or
/// aggregation of its own.
///
/// Drivers are held as an ordered set: a handle registered twice is kept
/// once, and registration order determines how timed spans nest (see
/// [`instrument`](Dispatcher::instrument)). The registry is stored in a
/// read-mostly concurrent structure, so dispatch never contends with other
/// emitters and registration changes are safe at any time, including from
/// inside a driver callback.
///
/// Instrumentation through a dispatcher is strictly best-effort and
/// transparent: it never changes the control-flow outcome of instrumented
/// code, except by propagating a panic the code or a driver itself raises.
pub struct Dispatcher {
    drivers: ArcSwap<DriverSet>,
}

impl Dispatcher {
    /// Creates a dispatcher with no registered drivers.
    pub fn new() -> Self {
        Dispatcher { drivers: ArcSwap::from_pointee(Vec::new()) }
    }

    /// Registers `driver`, making it a recipient of all subsequent events.
    ///
    /// Registration is idempotent: adding a handle that is already present
    /// (by identity) is a no-op, so the registry keeps set semantics no
    /// matter how many times setup code runs.
    pub fn register(&self, driver: Arc<dyn Driver>) {
        self.drivers.rcu(|current| {
            let mut drivers = (**current).clone();
            if !drivers.iter().any(|existing| same_handle(existing, &driver)) {
                drivers.push(Arc::clone(&driver));
            }
            drivers
        });
    }

    /// Removes `driver` from the registry. Removing an absent handle is a
    /// no-op.
    pub fn unregister(&self, driver: &Arc<dyn Driver>) {
        self.drivers.rcu(|current| {
            current.iter().filter(|existing| !same_handle(existing, driver)).cloned().collect::<Vec<_>>()
        });
    }

    /// Removes every registered driver.
    ///
    /// Intended for tests and teardown code; steady-state applications have
    /// no reason to call this.
    pub fn clear(&self) {
        self.drivers.store(Arc::new(Vec::new()));
    }

    /// Number of currently registered drivers.
    pub fn driver_count(&self) -> usize {
        self.drivers.load().len()
    }

    /// Runs `body` as a timed span named `name`, returning its result.
    ///
    /// With no drivers registered, `body` is invoked directly: no timing, no
    /// name or tag conversion, no allocation beyond what `body` itself needs.
    ///
    /// With drivers `[d1, d2, ..., dn]` in registration order, the span is
    /// composed as
    ///
    /// ```text
    /// d1.instrument(name, tags,
    ///     d2.instrument(name, tags,
    ///         ... dn.instrument(name, tags, body)))
    /// ```
    ///
    /// so the first-registered driver's span is outermost and observes the
    /// full duration, including the overhead of every inner driver. Each
    /// driver's wrapper runs exactly once per call.
    ///
    /// `body`'s result is captured out-of-band from the driver chain and
    /// returned to the caller untouched, whatever bookkeeping the wrappers
    /// perform. A panic raised by `body` or by any driver propagates to the
    /// caller unmodified; the dispatcher neither catches nor translates it.
    ///
    /// The composition state is entirely stack-local, so nested spans on one
    /// thread and concurrent spans across threads never interfere.
    ///
    /// # Panics
    ///
    /// Panics if a registered driver violates the [`Driver`] contract by
    /// never invoking the span body handed to it.
    pub fn instrument<T>(
        &self,
        name: impl Into<SharedString>,
        tags: impl IntoTags,
        body: impl FnOnce() -> T,
    ) -> T {
        let drivers = self.drivers.load_full();
        if drivers.is_empty() {
            // Building the wrapper chain costs allocations; skip it entirely
            // when nobody is listening.
            return body();
        }

        let name = name.into();
        let tags = tags.into_tags();

        let mut body = Some(body);
        let mut captured = None;
        {
            let captured = &mut captured;
            let body = &mut body;
            let name = name.as_ref();
            let tags = tags.as_slice();

            // Fold the drivers into a chain of thunks, innermost first: the
            // last-registered driver wraps `body` directly, and each earlier
            // driver wraps the chain built so far.
            let mut chain: Box<dyn FnMut() + '_> = Box::new(move || {
                if let Some(body) = body.take() {
                    *captured = Some(body());
                }
            });
            for driver in drivers.iter().rev() {
                let mut inner = chain;
                chain = Box::new(move || driver.instrument(name, tags, &mut *inner));
            }
            chain();
        }

        match captured {
            Some(value) => value,
            None => panic!("registered driver never invoked the instrumented body"),
        }
    }

    /// Increments the counter at `path` by the default of 1.
    pub fn increment_counter(&self, path: impl Into<SharedString>, tags: impl IntoTags) {
        self.increment_counter_by(path, 1, tags);
    }

    /// Increments the counter at `path` by `by`.
    ///
    /// Forwarded to every registered driver. No ordering across drivers is
    /// guaranteed, and there is no isolation between them: a panicking driver
    /// aborts delivery to the drivers after it.
    pub fn increment_counter_by(&self, path: impl Into<SharedString>, by: u64, tags: impl IntoTags) {
        let drivers = self.drivers.load();
        if drivers.is_empty() {
            return;
        }

        let path = path.into();
        let tags = tags.into_tags();
        for driver in drivers.iter() {
            driver.increment_counter(path.as_ref(), by, &tags);
        }
    }

    /// Sets the gauge under `name` to an absolute `value` on every registered
    /// driver.
    pub fn set_gauge(&self, name: impl Into<SharedString>, value: f64, tags: impl IntoTags) {
        let drivers = self.drivers.load();
        if drivers.is_empty() {
            return;
        }

        let name = name.into();
        let tags = tags.into_tags();
        for driver in drivers.iter() {
            driver.set_gauge(name.as_ref(), value, &tags);
        }
    }

    /// Adds a single sample to the distribution at `path` on every registered
    /// driver.
    pub fn add_distribution_value(
        &self,
        path: impl Into<SharedString>,
        value: f64,
        tags: impl IntoTags,
    ) {
        let drivers = self.drivers.load();
        if drivers.is_empty() {
            return;
        }

        let path = path.into();
        let tags = tags.into_tags();
        for driver in drivers.iter() {
            driver.add_distribution_value(path.as_ref(), value, &tags);
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").field("drivers", &self.driver_count()).finish()
    }
}

/// Handle identity, ignoring vtables: two handles are the same driver when
/// they point at the same allocation.
fn same_handle(a: &Arc<dyn Driver>, b: &Arc<dyn Driver>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}
