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

use std::time::Duration;

use crate::dispatcher::Dispatcher;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(500);
const DEFAULT_THREAD_NAME: &str = "ringlog-dispatcher";

/// A builder for configuring a [`Dispatcher`].
#[derive(Debug)]
pub struct DispatcherBuilder {
    flush_interval: Duration,
    thread_name: String,
    trap: Box<dyn Trap>,
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self {
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
            trap: Box::new(DefaultTrap::default()),
        }
    }
}

impl DispatcherBuilder {
    /// Set how often the worker drains the queue.
    ///
    /// Default to 500 milliseconds.
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    /// Set the name of the worker thread.
    ///
    /// Default to `ringlog-dispatcher`.
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Set the trap for errors returned by sinks.
    ///
    /// Default to [`DefaultTrap`].
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Build the dispatcher. No thread is started until [`Dispatcher::initialize`] is called.
    pub fn build(self) -> Dispatcher {
        let Self {
            flush_interval,
            thread_name,
            trap,
        } = self;
        Dispatcher::new(thread_name, flush_interval, trap)
    }
}
