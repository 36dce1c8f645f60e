use std::borrow::Cow;

use quanta::Clock;
use tracing::error;

use telemeter::{Driver, Tag};

use crate::{StatsdClient, StatsdDriverBuilder};

/// A [`Driver`] forwarding instrumentation events to a statsd-style client.
///
/// Timed spans are measured against a monotonic clock and reported via the
/// client's `timing` primitive in whole milliseconds, truncated. Counters,
/// gauges, and distribution values map onto `increment`, `gauge`, and
/// `count` respectively. Tags are rendered into the statsd `"key:value"`
/// line format, constant tags first.
///
/// Forwarding is best-effort: a send failure is logged and dropped, never
/// surfaced to the instrumented code.
pub struct StatsdDriver<C> {
    client: C,
    clock: Clock,
    prefix: Option<String>,
    constant_tags: Vec<Tag>,
}

impl<C> StatsdDriver<C>
where
    C: StatsdClient,
{
    /// Creates a driver around `client` with no prefix and no constant tags.
    ///
    /// Use [`StatsdDriverBuilder`] to configure a prefix or constant tags.
    pub fn new(client: C) -> Self {
        StatsdDriverBuilder::default().build(client)
    }

    pub(crate) fn from_parts(
        client: C,
        clock: Clock,
        prefix: Option<String>,
        constant_tags: Vec<Tag>,
    ) -> Self {
        StatsdDriver { client, clock, prefix, constant_tags }
    }

    fn full_name<'a>(&self, name: &'a str) -> Cow<'a, str> {
        match self.prefix.as_deref() {
            Some(prefix) => Cow::Owned(format!("{prefix}.{name}")),
            None => Cow::Borrowed(name),
        }
    }

    fn render_tags(&self, tags: &[Tag]) -> Vec<String> {
        self.constant_tags
            .iter()
            .chain(tags)
            .map(|tag| format!("{}:{}", tag.key(), tag.value()))
            .collect()
    }
}

impl<C> Driver for StatsdDriver<C>
where
    C: StatsdClient + Send + Sync,
{
    fn instrument(&self, name: &str, tags: &[Tag], body: &mut dyn FnMut()) {
        let start = self.clock.now();
        body();
        let elapsed = self.clock.now() - start;

        // Whole milliseconds, truncated.
        let millis = elapsed.as_millis() as u64;
        let name = self.full_name(name);
        if let Err(e) = self.client.timing(&name, millis, &self.render_tags(tags)) {
            error!(metric_name = %name, error = %e, "Failed to forward timing.");
        }
    }

    fn add_distribution_value(&self, path: &str, value: f64, tags: &[Tag]) {
        let path = self.full_name(path);
        if let Err(e) = self.client.count(&path, value, &self.render_tags(tags)) {
            error!(metric_name = %path, error = %e, "Failed to forward distribution value.");
        }
    }

    fn increment_counter(&self, path: &str, by: u64, tags: &[Tag]) {
        let path = self.full_name(path);
        if let Err(e) = self.client.increment(&path, by, &self.render_tags(tags)) {
            error!(metric_name = %path, error = %e, "Failed to forward counter increment.");
        }
    }

    fn set_gauge(&self, name: &str, value: f64, tags: &[Tag]) {
        let name = self.full_name(name);
        if let Err(e) = self.client.gauge(&name, value, &self.render_tags(tags)) {
            error!(metric_name = %name, error = %e, "Failed to forward gauge.");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use quanta::Clock;
    use thiserror::Error;

    use telemeter::{Driver, Tag};

    use crate::{StatsdClient, StatsdDriver, StatsdDriverBuilder};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Timing(String, u64, Vec<String>),
        Increment(String, u64, Vec<String>),
        Count(String, f64, Vec<String>),
        Gauge(String, f64, Vec<String>),
    }

    #[derive(Default, Clone)]
    struct RecordingClient {
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl RecordingClient {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn push(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl StatsdClient for RecordingClient {
        type Error = Infallible;

        fn timing(&self, name: &str, millis: u64, tags: &[String]) -> Result<(), Infallible> {
            self.push(Call::Timing(name.to_string(), millis, tags.to_vec()));
            Ok(())
        }

        fn increment(&self, name: &str, by: u64, tags: &[String]) -> Result<(), Infallible> {
            self.push(Call::Increment(name.to_string(), by, tags.to_vec()));
            Ok(())
        }

        fn count(&self, name: &str, value: f64, tags: &[String]) -> Result<(), Infallible> {
            self.push(Call::Count(name.to_string(), value, tags.to_vec()));
            Ok(())
        }

        fn gauge(&self, name: &str, value: f64, tags: &[String]) -> Result<(), Infallible> {
            self.push(Call::Gauge(name.to_string(), value, tags.to_vec()));
            Ok(())
        }
    }

    #[derive(Debug, Error)]
    #[error("socket unavailable")]
    struct SendError;

    struct FailingClient;

    impl StatsdClient for FailingClient {
        type Error = SendError;

        fn timing(&self, _: &str, _: u64, _: &[String]) -> Result<(), SendError> {
            Err(SendError)
        }

        fn increment(&self, _: &str, _: u64, _: &[String]) -> Result<(), SendError> {
            Err(SendError)
        }

        fn count(&self, _: &str, _: f64, _: &[String]) -> Result<(), SendError> {
            Err(SendError)
        }

        fn gauge(&self, _: &str, _: f64, _: &[String]) -> Result<(), SendError> {
            Err(SendError)
        }
    }

    #[test]
    fn timing_truncates_to_whole_milliseconds() {
        let (clock, mock) = Clock::mock();
        let client = RecordingClient::default();
        let driver =
            StatsdDriverBuilder::default().build_with_clock(client.clone(), clock);

        driver.instrument("fetch", &[], &mut || {
            mock.increment(Duration::from_micros(1900));
        });

        assert_eq!(
            client.calls(),
            vec![Call::Timing("fetch".to_string(), 1, vec![])]
        );
    }

    #[test]
    fn primitives_map_onto_client_calls() {
        let client = RecordingClient::default();
        let driver = StatsdDriver::new(client.clone());

        driver.increment_counter("jobs.done", 3, &[]);
        driver.add_distribution_value("payload.size", 512.0, &[]);
        driver.set_gauge("queue.depth", 7.0, &[]);

        assert_eq!(
            client.calls(),
            vec![
                Call::Increment("jobs.done".to_string(), 3, vec![]),
                Call::Count("payload.size".to_string(), 512.0, vec![]),
                Call::Gauge("queue.depth".to_string(), 7.0, vec![]),
            ]
        );
    }

    #[test]
    fn tags_render_in_line_format_with_constant_tags_first() {
        let client = RecordingClient::default();
        let driver = StatsdDriverBuilder::default()
            .with_constant_tags(&[("app", "demo")])
            .build(client.clone());

        driver.set_gauge("queue.depth", 7.0, &[Tag::new("region", "eu")]);

        assert_eq!(
            client.calls(),
            vec![Call::Gauge(
                "queue.depth".to_string(),
                7.0,
                vec!["app:demo".to_string(), "region:eu".to_string()],
            )]
        );
    }

    #[test]
    fn prefix_applies_to_every_metric_name() {
        let client = RecordingClient::default();
        let driver = StatsdDriverBuilder::default()
            .with_prefix("svc")
            .expect("valid prefix")
            .build(client.clone());

        driver.increment_counter("worker.jobs", 1, &[]);
        driver.instrument("worker.poll", &[], &mut || {});

        let calls = client.calls();
        assert_eq!(calls[0], Call::Increment("svc.worker.jobs".to_string(), 1, vec![]));
        assert!(matches!(&calls[1], Call::Timing(name, _, _) if name == "svc.worker.poll"));
    }

    #[test]
    fn send_failures_never_reach_the_instrumented_code() {
        let driver = StatsdDriver::new(FailingClient);

        let mut ran = false;
        driver.instrument("doomed", &[], &mut || ran = true);
        assert!(ran);

        driver.increment_counter("doomed", 1, &[]);
        driver.add_distribution_value("doomed", 1.0, &[]);
        driver.set_gauge("doomed", 1.0, &[]);
    }
}
