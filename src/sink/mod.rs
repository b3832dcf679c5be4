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

//! Destinations for dispatched log messages.

use std::fmt;

use crate::Error;
use crate::LogLevel;
use crate::LogMessage;

mod console;
pub mod file;

pub use self::console::ConsoleSink;
pub use self::file::FileSink;
pub use self::file::FileSinkBuilder;
pub use self::file::FileSinkMetrics;

/// A destination that receives dispatched log messages.
///
/// Once registered with a [`Dispatcher`](crate::Dispatcher), a sink is owned by it and is only
/// ever touched by one dispatch cycle at a time, hence the `&mut self` receivers.
pub trait Sink: fmt::Debug + Send + 'static {
    /// The minimum level this sink accepts.
    fn level(&self) -> LogLevel;

    /// Change the minimum level this sink accepts.
    fn set_level(&mut self, level: LogLevel);

    /// Take a message. Implementations must not retain the reference beyond this call.
    fn record(&mut self, message: &LogMessage) -> Result<(), Error>;

    /// Flush any buffered messages.
    ///
    /// Default to a no-op.
    fn flush(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

impl<T: Sink> From<T> for Box<dyn Sink> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}
