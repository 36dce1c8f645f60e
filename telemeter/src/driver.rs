use crate::Tag;

/// A backend driver receiving instrumentation events.
///
/// This is the capability contract between the [`Dispatcher`](crate::Dispatcher)
/// and any concrete backend: a statsd-style client, an APM agent, a test stub.
/// Drivers are registered with a dispatcher and receive every event the
/// application emits through it.
///
/// All four operations must be reentrant- and thread-safe: multiple timed
/// spans may be open simultaneously across threads, and a single thread may
/// open nested spans. No operation may assume exclusive access to shared
/// mutable state without its own internal synchronization.
pub trait Driver: Send + Sync {
    /// Executes `body` as a timed span, reporting its elapsed duration under
    /// `name` with `tags`.
    ///
    /// `body` must be invoked exactly once. The dispatcher never consumes a
    /// value produced by a driver's span: the instrumented closure's result
    /// travels back to the caller out-of-band, so a driver is free to do any
    /// bookkeeping it likes around the invocation.
    fn instrument(&self, name: &str, tags: &[Tag], body: &mut dyn FnMut());

    /// Records a single sample contributing to the distribution at `path`.
    fn add_distribution_value(&self, path: &str, value: f64, tags: &[Tag]);

    /// Increments the counter at `path` by `by`.
    fn increment_counter(&self, path: &str, by: u64, tags: &[Tag]);

    /// Sets the gauge under `name` to an absolute `value`.
    fn set_gauge(&self, name: &str, value: f64, tags: &[Tag]);
}

// Blanket implementations.
macro_rules! impl_driver {
    ($inner_ty:ident, $ptr_ty:ty) => {
        impl<$inner_ty> $crate::Driver for $ptr_ty
        where
            $inner_ty: $crate::Driver + ?Sized,
        {
            fn instrument(&self, name: &str, tags: &[$crate::Tag], body: &mut dyn FnMut()) {
                std::ops::Deref::deref(self).instrument(name, tags, body)
            }

            fn add_distribution_value(&self, path: &str, value: f64, tags: &[$crate::Tag]) {
                std::ops::Deref::deref(self).add_distribution_value(path, value, tags)
            }

            fn increment_counter(&self, path: &str, by: u64, tags: &[$crate::Tag]) {
                std::ops::Deref::deref(self).increment_counter(path, by, tags)
            }

            fn set_gauge(&self, name: &str, value: f64, tags: &[$crate::Tag]) {
                std::ops::Deref::deref(self).set_gauge(name, value, tags)
            }
        }
    };
}

impl_driver!(T, &T);
impl_driver!(T, std::boxed::Box<T>);
impl_driver!(T, std::sync::Arc<T>);

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::Driver;
    use crate::Tag;

    struct InertDriver;

    impl Driver for InertDriver {
        fn instrument(&self, _: &str, _: &[Tag], body: &mut dyn FnMut()) {
            body()
        }
        fn add_distribution_value(&self, _: &str, _: f64, _: &[Tag]) {}
        fn increment_counter(&self, _: &str, _: u64, _: &[Tag]) {}
        fn set_gauge(&self, _: &str, _: f64, _: &[Tag]) {}
    }

    #[test]
    fn blanket_implementations() {
        fn is_driver<T: Driver>(_driver: T) {}

        let local = InertDriver;

        is_driver(InertDriver);
        is_driver(Arc::new(InertDriver));
        is_driver(Box::new(InertDriver));
        is_driver(&local);
    }
}
