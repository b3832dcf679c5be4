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

//! Ringlog is an in-process logging pipeline: producers queue leveled messages, a background
//! dispatcher routes them to sinks, and a file sink persists them into a bounded ring of numbered
//! files that survives a temporarily unavailable filesystem.
//!
//! # Overview
//!
//! A [`Dispatcher`] owns a message queue and a list of [`Sink`]s. Messages below the level of
//! every registered sink are rejected before they are formatted. A worker thread drains the queue
//! every flush interval. The [`FileSink`](sink::FileSink) buffers lines in memory and writes them
//! out on flush, rotating through `app.1.log`, `app.2.log`, ... and deleting files that fall out
//! of the retention window.
//!
//! # Examples
//!
//! ```
//! use std::num::NonZeroUsize;
//!
//! use ringlog::Dispatcher;
//! use ringlog::LogLevel;
//! use ringlog::sink::ConsoleSink;
//! use ringlog::sink::FileSink;
//!
//! # let dir = tempfile::tempdir().unwrap();
//! # let pattern = format!("{}/app.{{}}.log", dir.path().display());
//! let dispatcher = Dispatcher::builder().build();
//! dispatcher.add_sink(ConsoleSink::stderr(LogLevel::Error));
//! dispatcher.add_sink(
//!     FileSink::builder(pattern)
//!         .level(LogLevel::Debug)
//!         .max_log_files(NonZeroUsize::new(3).unwrap())
//!         .build()
//!         .unwrap(),
//! );
//! dispatcher.initialize();
//!
//! let logger = dispatcher.logger();
//! ringlog::info!(logger, "Hello {}!", "file");
//! ringlog::error!(logger, "Hello file and stderr!");
//! ```
//!
//! Forward the `log` crate into a dispatcher:
//!
//! ```
//! use ringlog::Dispatcher;
//! use ringlog::LogLevel;
//! use ringlog::sink::ConsoleSink;
//!
//! let dispatcher = Dispatcher::default();
//! dispatcher.add_sink(ConsoleSink::stdout(LogLevel::Info));
//! ringlog::bridge::setup_log_crate(dispatcher.logger());
//!
//! log::info!("This goes through the dispatcher.");
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod bridge;
pub mod config;
pub mod layout;
pub mod sink;
pub mod trap;

mod dispatcher;
mod error;
mod level;
mod logger;
mod record;

pub use self::dispatcher::Dispatcher;
pub use self::dispatcher::DispatcherBuilder;
pub use self::error::Error;
pub use self::level::LogLevel;
pub use self::logger::Logger;
pub use self::record::LogMessage;
pub use self::sink::Sink;
pub use self::trap::Trap;
