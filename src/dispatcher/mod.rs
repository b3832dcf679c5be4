// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Batch log messages and route them to sinks from a background thread.
//!
//! Producers format messages on their own thread and push them onto a shared queue. A worker
//! thread wakes up every flush interval, swaps the queue out and hands every message to every sink
//! in registration order, then flushes the sinks.
//!
//! # Example
//!
//! ```
//! use ringlog::Dispatcher;
//! use ringlog::LogLevel;
//! use ringlog::sink::ConsoleSink;
//!
//! let dispatcher = Dispatcher::builder().build();
//! dispatcher.add_sink(ConsoleSink::stdout(LogLevel::Info));
//! dispatcher.initialize();
//!
//! let logger = dispatcher.logger();
//! ringlog::info!(logger, "Hello {}!", "world");
//! ringlog::debug!(logger, "This is filtered out before {} is formatted.", "anything");
//!
//! // stop the worker and write out what is still queued
//! dispatcher.shutdown();
//! ```

use std::fmt;
use std::mem;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Duration;

use crate::Error;
use crate::LogLevel;
use crate::LogMessage;
use crate::level::AtomicLevel;
use crate::logger::Logger;
use crate::sink::Sink;
use crate::trap::Trap;

pub use self::builder::DispatcherBuilder;

mod builder;
mod worker;

use self::worker::Worker;
use self::worker::WorkerHandle;

/// State shared between the dispatcher, its producer handles and its worker.
#[derive(Debug)]
pub(crate) struct Shared {
    gate: AtomicLevel,
    queue: Mutex<Vec<LogMessage>>,
    sinks: Mutex<Vec<Box<dyn Sink>>>,
    flush_interval: Mutex<Duration>,
    trap: Box<dyn Trap>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl Shared {
    fn new(flush_interval: Duration, trap: Box<dyn Trap>) -> Self {
        Self {
            gate: AtomicLevel::new(LogLevel::Off),
            queue: Mutex::new(vec![]),
            sinks: Mutex::new(vec![]),
            flush_interval: Mutex::new(flush_interval),
            trap,
        }
    }

    pub(crate) fn enabled(&self, level: LogLevel) -> bool {
        self.gate.enabled(level)
    }

    pub(crate) fn enqueue(&self, message: LogMessage) {
        lock(&self.queue).push(message);
    }

    fn queue_len(&self) -> usize {
        lock(&self.queue).len()
    }

    fn flush_interval(&self) -> Duration {
        *lock(&self.flush_interval)
    }

    fn add_sink(&self, sink: Box<dyn Sink>) {
        let mut sinks = lock(&self.sinks);
        sinks.push(sink);

        let min_level = sinks
            .iter()
            .map(|sink| sink.level())
            .min()
            .unwrap_or(LogLevel::Off);
        self.gate.store(min_level);
    }

    /// Run one drain cycle.
    ///
    /// The sink list stays locked for the whole cycle, so cycles never overlap. The queue is only
    /// locked to swap it out; messages enqueued meanwhile wait for the next cycle.
    pub(crate) fn dispatch(&self) {
        let mut sinks = lock(&self.sinks);
        let messages = mem::take(&mut *lock(&self.queue));

        for message in &messages {
            for sink in sinks.iter_mut() {
                if let Err(err) = sink.record(message) {
                    let err = Error::new("failed to record log message").with_source(err);
                    self.trap.trap(&err);
                }
            }
        }

        for sink in sinks.iter_mut() {
            if let Err(err) = sink.flush() {
                let err = Error::new("failed to flush sink").with_source(err);
                self.trap.trap(&err);
            }
        }
    }
}

/// An explicit logging context: a message queue, a set of sinks and the worker draining one into
/// the other.
///
/// Dropping the dispatcher stops the worker after a last drain cycle.
#[derive(Debug)]
pub struct Dispatcher {
    shared: Arc<Shared>,
    thread_name: String,
    worker: Mutex<Option<WorkerHandle>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Dispatcher::builder().build()
    }
}

impl Dispatcher {
    /// Create a new dispatcher builder.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    fn new(thread_name: String, flush_interval: Duration, trap: Box<dyn Trap>) -> Self {
        Self {
            shared: Arc::new(Shared::new(flush_interval, trap)),
            thread_name,
            worker: Mutex::new(None),
        }
    }

    /// Start the background worker.
    ///
    /// Calling this while a worker is running does nothing. If the thread cannot be spawned, the
    /// error goes to the trap and messages stay queued until [`flush`](Dispatcher::flush) is
    /// called or a later `initialize` succeeds.
    pub fn initialize(&self) {
        let mut worker = lock(&self.worker);
        if worker.is_some() {
            return;
        }

        match Worker::spawn(self.shared.clone(), self.thread_name.clone()) {
            Ok(handle) => *worker = Some(handle),
            Err(err) => self.shared.trap.trap(&err),
        }
    }

    /// Whether a background worker is running.
    pub fn is_initialized(&self) -> bool {
        lock(&self.worker).is_some()
    }

    /// Register a sink. The dispatcher takes ownership of it.
    ///
    /// Messages below the lowest level among all registered sinks are discarded by the producer
    /// before being queued.
    pub fn add_sink(&self, sink: impl Into<Box<dyn Sink>>) {
        self.shared.add_sink(sink.into());
    }

    /// Change how often the worker drains the queue. Applies from the next tick.
    pub fn set_flush_interval(&self, interval: Duration) {
        *lock(&self.shared.flush_interval) = interval;
    }

    /// Return a producer handle sharing this dispatcher's queue and sinks.
    pub fn logger(&self) -> Logger {
        Logger::new(self.shared.clone())
    }

    /// Whether a message at `level` would be queued.
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.shared.enabled(level)
    }

    /// The number of messages waiting for the next drain cycle.
    pub fn queue_len(&self) -> usize {
        self.shared.queue_len()
    }

    /// Format and queue a message.
    ///
    /// The arguments are formatted on the calling thread, but only when the level passes the
    /// gate. Use the [`log!`](crate::log) family of macros to skip evaluating the arguments too.
    pub fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if self.shared.enabled(level) {
            self.shared.enqueue(LogMessage::new(level, args.to_string()));
        }
    }

    /// Queue a message at [`LogLevel::Debug`].
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Debug, args);
    }

    /// Queue a message at [`LogLevel::Trace`].
    pub fn trace(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Trace, args);
    }

    /// Queue a message at [`LogLevel::Info`].
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Info, args);
    }

    /// Queue a message at [`LogLevel::Warning`].
    pub fn warning(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Warning, args);
    }

    /// Queue a message at [`LogLevel::Error`].
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Error, args);
    }

    /// Queue a message at [`LogLevel::Critical`].
    pub fn critical(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Critical, args);
    }

    /// Run one drain cycle on the calling thread.
    ///
    /// This waits for a cycle already running on the worker to finish first.
    pub fn flush(&self) {
        self.shared.dispatch();
    }

    /// Stop the background worker, then drain what is still queued.
    ///
    /// The dispatcher stays usable: messages keep queuing and [`initialize`](Self::initialize)
    /// starts a fresh worker.
    pub fn shutdown(&self) {
        let worker = lock(&self.worker).take();
        if let Some(worker) = worker {
            if let Err(err) = worker.stop() {
                self.shared.trap.trap(&err);
            }
        }
        self.shared.dispatch();
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}
