//! Pull-based stream of generation batches.
//!
//! [`EventStream`] is a thin driver over a [`GraphSimulator`]: every call to
//! [`Iterator::next`] runs exactly one generation with the fixed count the
//! stream was built with. There are no timers; the caller decides when the
//! next batch happens (for example one pull per line of input).
//!
//! The stream is unbounded for a valid count. For an invalid count the first
//! pull yields the [`SimulationError`] and the stream ends. A stream cannot
//! be restarted: build a fresh simulator to start over.

use core::iter::FusedIterator;

use bacefook_types::ConnectionEvent;
use chrono::Utc;

use crate::clock::batch_timestamp;
use crate::count::UserCount;
use crate::error::SimulationError;
use crate::random::{RandomSource, ThreadRandom};
use crate::simulator::GraphSimulator;

/// An endless sequence of batches produced by one simulator.
#[derive(Debug)]
pub struct EventStream<R = ThreadRandom> {
    /// The exclusively owned simulator.
    simulator: GraphSimulator<R>,
    /// Batch size, or the error to surface on the first pull.
    count: Result<UserCount, SimulationError>,
    /// Set once the stream has ended.
    finished: bool,
}

impl EventStream {
    /// Stream batches of `count` new users from a fresh simulator backed by
    /// the thread-local generator.
    pub fn new_default<C>(count: C) -> Self
    where
        C: TryInto<UserCount>,
        SimulationError: From<C::Error>,
    {
        GraphSimulator::new().into_stream(count)
    }
}

impl<R: RandomSource> EventStream<R> {
    /// Wrap `simulator`. Validation errors in `count` are reported on the
    /// first pull.
    pub(crate) const fn new(
        simulator: GraphSimulator<R>,
        count: Result<UserCount, SimulationError>,
    ) -> Self {
        Self {
            simulator,
            count,
            finished: false,
        }
    }

    /// The simulator driving this stream.
    pub const fn simulator(&self) -> &GraphSimulator<R> {
        &self.simulator
    }
}

impl<R: RandomSource> Iterator for EventStream<R> {
    type Item = Result<Vec<ConnectionEvent>, SimulationError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match &self.count {
            Ok(count) => {
                let created_at = batch_timestamp(Utc::now());
                Some(Ok(self.simulator.run_batch(*count, &created_at)))
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err.clone()))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match (&self.count, self.finished) {
            (_, true) => (0, Some(0)),
            (Ok(_), false) => (usize::MAX, None),
            (Err(_), false) => (1, Some(1)),
        }
    }
}

impl<R: RandomSource> FusedIterator for EventStream<R> {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bacefook_types::EventKind;

    use super::*;
    use crate::random::RngSource;

    fn register_count(batch: &[ConnectionEvent]) -> usize {
        batch
            .iter()
            .filter(|e| e.kind() == EventKind::Register)
            .count()
    }

    #[test]
    fn yields_one_batch_per_pull() {
        let mut stream = GraphSimulator::with_random(RngSource::seeded(1)).into_stream(5);

        let first = stream.next().unwrap().unwrap();
        let second = stream.next().unwrap().unwrap();

        assert_eq!(register_count(&first), 5);
        assert_eq!(register_count(&second), 5);
        assert_eq!(stream.simulator().graph().user_count(), 10);
        assert_ne!(first, second);
    }

    #[test]
    fn stream_is_unbounded() {
        let stream = GraphSimulator::with_random(RngSource::seeded(2)).into_stream(3_u32);
        assert_eq!(stream.size_hint(), (usize::MAX, None));
        let batches: Vec<_> = stream.take(25).collect();
        assert_eq!(batches.len(), 25);
        assert!(batches.iter().all(Result::is_ok));
    }

    #[test]
    fn second_batch_numbering_continues() {
        let mut stream = GraphSimulator::with_random(RngSource::seeded(3)).into_stream(2);
        stream.next();
        let batch = stream.next().unwrap().unwrap();
        let names: Vec<String> = batch
            .iter()
            .filter_map(|e| match e {
                ConnectionEvent::Register(r) => Some(r.name.to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(names, ["user00003", "user00004"]);
    }

    #[test]
    fn invalid_count_fails_on_first_pull_then_ends() {
        for bad in [0.0, -5.0, f64::INFINITY, f64::NAN] {
            let mut stream = GraphSimulator::with_random(RngSource::seeded(4)).into_stream(bad);
            let err = stream.next().unwrap().unwrap_err();
            assert!(err.to_string().contains("positive integer"));
            assert!(stream.next().is_none());
            assert!(stream.next().is_none());
            assert_eq!(stream.simulator().graph().user_count(), 0);
        }
    }

    #[test]
    fn default_stream_uses_thread_rng() {
        let mut stream = EventStream::new_default(4);
        let batch = stream.next().unwrap().unwrap();
        assert_eq!(register_count(&batch), 4);
    }
}
