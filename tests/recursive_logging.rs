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

use std::fs;
use std::num::NonZeroUsize;

use ringlog::Dispatcher;
use ringlog::LogLevel;
use ringlog::sink::FileSink;
use ringlog::trap::NoopTrap;
use tempfile::TempDir;

// ensure logging from inside the formatting of another message neither deadlocks nor reorders
#[test]
fn test_meta_logging_in_format_works() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let rolling = FileSink::builder(format!("{}/example.{{}}.log", temp_dir.path().display()))
        .level(LogLevel::Debug)
        .rollover_size(NonZeroUsize::new(1024 * 1024).unwrap())
        .max_log_files(NonZeroUsize::new(10).unwrap())
        .trap(NoopTrap::default())
        .build()
        .unwrap();

    let dispatcher = Dispatcher::default();
    dispatcher.add_sink(rolling);
    ringlog::bridge::setup_log_crate(dispatcher.logger());

    struct Thing<'a>(&'a str);

    impl std::fmt::Display for Thing<'_> {
        fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            log::debug!("formatting wrapping ({})", self.0);
            f.write_str(self.0)
        }
    }

    log::info!("I'm logging {}!", Thing("aha"));
    log::trace!("trace is below debug, so this is kept too");
    dispatcher.flush();

    let content = fs::read_to_string(temp_dir.path().join("example.1.log")).unwrap();
    let lines = content.lines().skip(1).collect::<Vec<_>>();
    assert_eq!(lines.len(), 3, "{content}");
    assert!(lines[0].ends_with("[DEBUG ] formatting wrapping (aha)"));
    assert!(lines[1].ends_with("[INFO  ] I'm logging aha!"));
    assert!(lines[2].ends_with("[TRACE ] trace is below debug, so this is kept too"));
}
