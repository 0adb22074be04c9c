//! Batch driver.
//!
//! Owns one [`GraphSimulator`] and a [`BatchWriter`] and decides when a
//! generation runs: either once per line of trigger input (interactive mode)
//! or a fixed number of times back to back.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use bacefook_core::{GraphSimulator, RandomSource, UserCount};
use tracing::{debug, info};

use crate::error::GeneratorError;
use crate::writer::BatchWriter;

/// Shown before waiting for the next trigger line.
pub const PROMPT: &str = "Press Enter to generate the next events...";

/// Runs generations and persists each batch.
#[derive(Debug)]
pub struct Driver<R> {
    /// The simulation advanced by every batch.
    simulator: GraphSimulator<R>,
    /// Destination of each batch file.
    writer: BatchWriter,
    /// Smallest interactive follow-up batch.
    follow_up_min: usize,
    /// Largest interactive follow-up batch.
    follow_up_max: usize,
}

impl<R: RandomSource> Driver<R> {
    /// Create a driver. Interactive follow-up batches draw their size
    /// uniformly from `follow_up_min..=follow_up_max`.
    pub const fn new(
        simulator: GraphSimulator<R>,
        writer: BatchWriter,
        follow_up_min: usize,
        follow_up_max: usize,
    ) -> Self {
        Self {
            simulator,
            writer,
            follow_up_min,
            follow_up_max,
        }
    }

    /// The simulator being driven.
    pub const fn simulator(&self) -> &GraphSimulator<R> {
        &self.simulator
    }

    /// Run one generation of `count` new users and write it to disk.
    pub fn run_batch(&mut self, count: UserCount) -> Result<PathBuf, GeneratorError> {
        let events = self.simulator.generate_batch(count)?;
        let path = self.writer.write(&events)?;
        let stats = self.simulator.stats();
        info!(
            new_users = count.get(),
            events = events.len(),
            users = stats.users,
            friendships = stats.friendships,
            max_degree = stats.max_degree,
            "Batch generated"
        );
        Ok(path)
    }

    /// Size of the next interactive follow-up batch.
    fn next_follow_up(&mut self) -> Result<UserCount, GeneratorError> {
        let size = self
            .simulator
            .random_mut()
            .int_in_range(self.follow_up_min, self.follow_up_max);
        Ok(UserCount::try_from(size)?)
    }

    /// Bootstrap with `initial` users, then run one follow-up batch per line
    /// read from `input` until it reaches end of file.
    ///
    /// [`PROMPT`] is written to `prompt` before every wait. Returns the paths
    /// of all files written, bootstrap first.
    pub fn run_interactive<I, W>(
        &mut self,
        initial: UserCount,
        mut input: I,
        mut prompt: W,
    ) -> Result<Vec<PathBuf>, GeneratorError>
    where
        I: BufRead,
        W: Write,
    {
        let mut written = vec![self.run_batch(initial)?];
        let mut line = String::new();
        loop {
            writeln!(prompt, "{PROMPT}")
                .and_then(|()| prompt.flush())
                .map_err(|source| GeneratorError::Terminal { source })?;

            line.clear();
            let read = input
                .read_line(&mut line)
                .map_err(|source| GeneratorError::Terminal { source })?;
            if read == 0 {
                debug!("Trigger input closed");
                break;
            }

            let count = self.next_follow_up()?;
            written.push(self.run_batch(count)?);
        }
        Ok(written)
    }

    /// Run `batches` generations of `count` new users each without waiting
    /// for input. Stops at the first failing batch.
    pub fn run_fixed(
        self,
        count: UserCount,
        batches: usize,
    ) -> Result<Vec<PathBuf>, GeneratorError> {
        let Self { simulator, writer, .. } = self;
        let mut written = Vec::new();
        let mut stream = simulator.into_stream(count);
        while written.len() < batches {
            let Some(batch) = stream.next() else {
                break;
            };
            let events = batch?;
            let path = writer.write(&events)?;
            let stats = stream.simulator().stats();
            info!(
                new_users = count.get(),
                events = events.len(),
                users = stats.users,
                friendships = stats.friendships,
                max_degree = stats.max_degree,
                "Batch generated"
            );
            written.push(path);
        }
        info!(batches = written.len(), "Fixed run complete");
        Ok(written)
    }
}
