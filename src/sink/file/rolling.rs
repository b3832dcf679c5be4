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

use std::collections::VecDeque;
use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use std::time::Instant;

use crate::Error;
use crate::sink::file::FileSinkMetrics;
use crate::sink::file::clock::Clock;
use crate::sink::file::ring::IndexRing;
use crate::trap::Trap;

/// Written whenever a file is opened again after the store had no open file.
pub(crate) const NEW_RECORD_MARKER: &str =
    "=========================== START A NEW RECORD ==========================\n";

/// A file name template with exactly one `{}` (or `{:0N}`) placeholder for the slot index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FileNamePattern {
    prefix: String,
    suffix: String,
    width: usize,
}

impl FileNamePattern {
    pub(crate) fn parse(pattern: &str) -> Result<Self, Error> {
        let malformed = |reason: &str| {
            Error::new(format!("malformed file name pattern: {reason}"))
                .with_context("pattern", pattern)
        };

        let open = pattern
            .find('{')
            .ok_or_else(|| malformed("missing '{}' placeholder"))?;
        let close = pattern[open..]
            .find('}')
            .map(|pos| open + pos)
            .ok_or_else(|| malformed("unclosed placeholder"))?;

        let (prefix, suffix) = (&pattern[..open], &pattern[close + 1..]);
        if prefix.contains('}') || suffix.contains(['{', '}']) {
            return Err(malformed("more than one placeholder"));
        }

        let width = match &pattern[open + 1..close] {
            "" => 0,
            format => format
                .strip_prefix(":0")
                .filter(|digits| !digits.is_empty())
                .and_then(|digits| digits.parse::<usize>().ok())
                .ok_or_else(|| malformed("placeholder must be '{}' or '{:0N}'"))?,
        };

        Ok(FileNamePattern {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            width,
        })
    }

    pub(crate) fn path(&self, index: usize) -> PathBuf {
        let width = self.width;
        PathBuf::from(format!("{}{index:0width$}{}", self.prefix, self.suffix))
    }
}

/// Lines assigned to one file slot.
#[derive(Debug, Default)]
struct Slot {
    lines: VecDeque<String>,
    // every byte assigned to the slot's file, whether already written or not, including the
    // restart marker while no file is open
    size: usize,
    // bytes still in `lines`
    pending: usize,
    // the next line did not fit; the file rotates once this slot is written
    sealed: bool,
}

impl Slot {
    // the slot that reopens a file, which will start with the restart marker
    fn reopening(pending: usize) -> Self {
        Slot {
            size: pending + NEW_RECORD_MARKER.len(),
            ..Slot::default()
        }
    }

    fn push(&mut self, line: String) {
        self.size += line.len();
        self.pending += line.len();
        self.lines.push_back(line);
    }

    fn pop_front(&mut self) -> Option<String> {
        let line = self.lines.pop_front()?;
        self.pending -= line.len();
        Some(line)
    }
}

#[derive(Debug)]
pub(crate) struct StoreConfig {
    pub(crate) pattern: FileNamePattern,
    pub(crate) ring: IndexRing,
    pub(crate) max_file_size: usize,
    pub(crate) max_files: usize,
    pub(crate) retry_period: Duration,
    pub(crate) max_buffered_bytes: usize,
}

/// A bounded ring of numbered files with a write-behind buffer in front of it.
///
/// Lines are buffered per slot by [`record`](RotationStore::record) without touching the
/// filesystem; [`flush`](RotationStore::flush) writes them out in slot order, rotating to the
/// next index whenever a sealed slot has been written. The front of `slots` always targets
/// `current_index`, and slot `i` targets `current_index + i` on the ring, so relocating
/// `current_index` re-targets every buffered slot at once.
#[derive(Debug)]
pub(crate) struct RotationStore {
    config: StoreConfig,
    current_index: usize,
    slots: VecDeque<Slot>,
    buffered_bytes: usize,
    file: Option<File>,
    last_open_attempt: Option<Instant>,
    metrics: FileSinkMetrics,
    clock: Clock,
    trap: Box<dyn Trap>,
}

impl RotationStore {
    pub(crate) fn new(
        config: StoreConfig,
        metrics: FileSinkMetrics,
        clock: Clock,
        trap: Box<dyn Trap>,
    ) -> Self {
        Self {
            config,
            current_index: IndexRing::FIRST,
            slots: VecDeque::from([Slot::reopening(0)]),
            buffered_bytes: 0,
            file: None,
            last_open_attempt: None,
            metrics,
            clock,
            trap,
        }
    }

    /// Buffer one formatted line. Never touches the filesystem.
    pub(crate) fn record(&mut self, line: String) {
        let max_file_size = self.config.max_file_size;
        let len = line.len();

        // SAFETY: slots always holds the pending slot
        let pending = self.slots.back_mut().unwrap();
        if pending.size > 0 && pending.size + len > max_file_size {
            pending.sealed = true;
            self.slots.push_back(Slot::default());
        }

        // SAFETY: slots always holds the pending slot
        self.slots.back_mut().unwrap().push(line);
        self.buffered_bytes += len;
        self.evict_over_budget();
        self.metrics.set_buffered_bytes(self.buffered_bytes);
    }

    /// Write buffered slots out, rotating files as slots fill up.
    ///
    /// If no file is open, this only tries to open one once the retry period has passed since
    /// the last attempt. Filesystem errors are handed to the trap and never returned.
    pub(crate) fn flush(&mut self) {
        self.flush_inner(false);
    }

    /// Flush ignoring the retry period, then close the file.
    pub(crate) fn close(&mut self) {
        self.flush_inner(true);
        if let Some(mut file) = self.file.take() {
            if let Err(err) = file.flush() {
                let err = Error::new("failed to flush log file on close").with_source(err);
                self.trap.trap(&err);
            }
        }
    }

    fn flush_inner(&mut self, force: bool) {
        if self.file.is_none() {
            if self.buffered_bytes == 0 {
                return;
            }

            let now = self.clock.now();
            let retry_due = self
                .last_open_attempt
                .is_none_or(|last| now.saturating_duration_since(last) >= self.config.retry_period);
            if !force && !retry_due {
                return;
            }

            self.last_open_attempt = Some(now);
            if let Err(err) = self.reopen() {
                self.lose_file();
                self.trap.trap(&err);
                self.metrics.set_buffered_bytes(self.buffered_bytes);
                return;
            }
        }

        if let Err(err) = self.drain() {
            self.lose_file();
            self.last_open_attempt = Some(self.clock.now());
            self.trap.trap(&err);
        }
        self.metrics.set_buffered_bytes(self.buffered_bytes);
    }

    fn drain(&mut self) -> Result<(), Error> {
        loop {
            let Some(file) = self.file.as_mut() else {
                return Ok(());
            };

            // SAFETY: slots always holds the pending slot
            let slot = self.slots.front_mut().unwrap();
            while let Some(line) = slot.lines.front() {
                file.write_all(line.as_bytes()).map_err(|err| {
                    Error::new("failed to write log file")
                        .with_context(
                            "path",
                            self.config.pattern.path(self.current_index).display(),
                        )
                        .with_source(err)
                })?;
                self.buffered_bytes -= line.len();
                slot.pop_front();
            }

            if !slot.sealed {
                return Ok(());
            }

            self.slots.pop_front();
            if self.slots.is_empty() {
                self.slots.push_back(Slot::default());
            }
            self.rotate()?;
        }
    }

    /// Close the current file, advance to the next index, evict the file that falls out of
    /// the retention window and open a fresh file at the new index.
    fn rotate(&mut self) -> Result<(), Error> {
        if let Some(mut file) = self.file.take() {
            if let Err(err) = file.flush() {
                let err = Error::new("failed to flush previous log file").with_source(err);
                self.trap.trap(&err);
            }
        }

        self.current_index = self.config.ring.next(self.current_index);
        let evicted = self
            .config
            .ring
            .back(self.current_index, self.config.max_files);
        if let Err(err) = self.remove_file(evicted) {
            self.trap.trap(&err);
        }

        self.file = Some(self.create_fresh(self.current_index)?);
        Ok(())
    }

    /// Locate the file to resume, point the buffered slots at it and mark the restart.
    fn reopen(&mut self) -> Result<(), Error> {
        let (index, file, existing) = self.open_relevant_log_file()?;
        self.current_index = index;
        self.file = Some(file);

        if existing > 0 {
            // SAFETY: slots always holds the pending slot
            let front = self.slots.front_mut().unwrap();
            if existing + front.size > self.config.max_file_size {
                self.rotate()?;
            } else {
                front.size += existing;
            }
        }

        if let Some(file) = self.file.as_mut() {
            file.write_all(NEW_RECORD_MARKER.as_bytes()).map_err(|err| {
                Error::new("failed to write log file")
                    .with_context(
                        "path",
                        self.config.pattern.path(self.current_index).display(),
                    )
                    .with_source(err)
            })?;
        }
        Ok(())
    }

    /// Find the most recently written file that still has room, without listing the directory.
    ///
    /// The scan walks down from the last index of the ring. If the last index is taken, the
    /// ring has wrapped at least once, so the scan starts from the midpoint instead. An existing
    /// file with room is resumed; a full one means the next index is opened fresh. If nothing is
    /// found, the first index is opened fresh.
    ///
    /// Returns the index, the open file and the bytes it already holds.
    fn open_relevant_log_file(&self) -> Result<(usize, File, usize), Error> {
        let ring = self.config.ring;
        let mut index = ring.last();
        if self.existing_len(index).is_some() {
            index = ring.midpoint();
        }

        while index >= IndexRing::FIRST {
            if let Some(len) = self.existing_len(index) {
                if len < self.config.max_file_size {
                    let file = self.open_append(index)?;
                    return Ok((index, file, len));
                }

                let next = ring.next(index);
                let file = self.create_fresh(next)?;
                return Ok((next, file, 0));
            }
            index -= 1;
        }

        let file = self.create_fresh(IndexRing::FIRST)?;
        Ok((IndexRing::FIRST, file, 0))
    }

    fn existing_len(&self, index: usize) -> Option<usize> {
        let metadata = fs::metadata(self.config.pattern.path(index)).ok()?;
        metadata
            .is_file()
            .then(|| usize::try_from(metadata.len()).unwrap_or(usize::MAX))
    }

    fn open_append(&self, index: usize) -> Result<File, Error> {
        let path = self.config.pattern.path(index);
        OpenOptions::new()
            .append(true)
            .open(&path)
            .map_err(|err| {
                Error::new("failed to open log file")
                    .with_context("path", path.display())
                    .with_source(err)
            })
    }

    fn create_fresh(&self, index: usize) -> Result<File, Error> {
        let path = self.config.pattern.path(index);
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|err| {
                Error::new("failed to create log directory")
                    .with_context("path", dir.display())
                    .with_source(err)
            })?;
        }

        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|err| {
                Error::new("failed to create log file")
                    .with_context("path", path.display())
                    .with_source(err)
            })
    }

    fn remove_file(&self, index: usize) -> Result<(), Error> {
        let path = self.config.pattern.path(index);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Error::new("failed to remove old log file")
                .with_context("path", path.display())
                .with_source(err)),
        }
    }

    /// Forget the open file. The front slot only keeps the bytes it has not written plus the
    /// marker the next reopen writes, since discovery accounts for what is already on disk.
    fn lose_file(&mut self) {
        self.file = None;
        if let Some(front) = self.slots.front_mut() {
            front.size = Slot::reopening(front.pending).size;
        }
    }

    /// Drop the oldest buffered lines until the buffer fits its byte budget.
    ///
    /// A slot left with nothing assigned is removed, unless it is the pending one, so that no
    /// empty file is rotated in for it.
    fn evict_over_budget(&mut self) {
        let mut position = 0;
        while self.buffered_bytes > self.config.max_buffered_bytes && position < self.slots.len() {
            let slot = &mut self.slots[position];
            let Some(line) = slot.pop_front() else {
                position += 1;
                continue;
            };
            slot.size -= line.len();
            self.buffered_bytes -= line.len();
            self.metrics.add_dropped_messages(1);

            if slot.lines.is_empty() && slot.size == 0 && position + 1 < self.slots.len() {
                self.slots.remove(position);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn current_index(&self) -> usize {
        self.current_index
    }

    #[cfg(test)]
    pub(crate) fn pending_index(&self) -> usize {
        self.config
            .ring
            .forward(self.current_index, self.slots.len() - 1)
    }

    #[cfg(test)]
    pub(crate) fn is_open(&self) -> bool {
        self.file.is_some()
    }

    #[cfg(test)]
    pub(crate) fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::Mutex;

    use rand::Rng;
    use rand::distr::Alphanumeric;
    use tempfile::TempDir;

    use super::*;
    use crate::sink::file::clock::ManualClock;

    #[derive(Debug, Clone, Default)]
    struct RecordingTrap {
        errors: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingTrap {
        fn len(&self) -> usize {
            self.errors.lock().unwrap().len()
        }
    }

    impl Trap for RecordingTrap {
        fn trap(&self, err: &Error) {
            self.errors.lock().unwrap().push(err.to_string());
        }
    }

    struct Fixture {
        pattern: String,
        max_file_size: usize,
        max_files: usize,
        max_file_index: usize,
        max_buffered_bytes: usize,
        trap: RecordingTrap,
    }

    impl Fixture {
        fn new(dir: &Path) -> Self {
            Self {
                pattern: format!("{}/f{{}}.log", dir.display()),
                max_file_size: 100,
                max_files: 2,
                max_file_index: 9999,
                max_buffered_bytes: usize::MAX,
                trap: RecordingTrap::default(),
            }
        }

        fn store(&self) -> RotationStore {
            let config = StoreConfig {
                pattern: FileNamePattern::parse(&self.pattern).unwrap(),
                ring: IndexRing::new(self.max_file_index),
                max_file_size: self.max_file_size,
                max_files: self.max_files,
                retry_period: Duration::from_secs(30),
                max_buffered_bytes: self.max_buffered_bytes,
            };
            let clock = Clock::ManualClock(ManualClock::new(Instant::now()));
            RotationStore::new(
                config,
                FileSinkMetrics::default(),
                clock,
                Box::new(self.trap.clone()),
            )
        }
    }

    // one formatted line of exactly `len` bytes, newline included
    fn line(len: usize) -> String {
        let mut line = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(len - 1)
            .map(char::from)
            .collect::<String>();
        line.push('\n');
        line
    }

    fn read(dir: &Path, index: usize) -> String {
        fs::read_to_string(dir.join(format!("f{index}.log"))).unwrap()
    }

    fn log_files(dir: &Path) -> Vec<String> {
        let mut files = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect::<Vec<_>>();
        files.sort();
        files
    }

    #[test]
    fn test_parse_file_name_pattern() {
        let pattern = FileNamePattern::parse("logs/app.{}.log").unwrap();
        assert_eq!(pattern.path(7), PathBuf::from("logs/app.7.log"));
        assert_eq!(pattern.path(9999), PathBuf::from("logs/app.9999.log"));

        let pattern = FileNamePattern::parse("app-{:04}").unwrap();
        assert_eq!(pattern.path(7), PathBuf::from("app-0007"));
        assert_eq!(pattern.path(12345), PathBuf::from("app-12345"));

        for malformed in ["app.log", "app.{.log", "app.}{.log", "{}{}", "{:4}", "{:0}", "{:0x}"] {
            assert!(
                FileNamePattern::parse(malformed).is_err(),
                "{malformed} should be rejected"
            );
        }
    }

    #[test]
    fn test_lines_below_bound_stay_in_first_file() {
        let dir = TempDir::new().unwrap();
        let mut fixture = Fixture::new(dir.path());
        fixture.max_file_size = 200;
        let mut store = fixture.store();

        let lines = (0..3).map(|_| line(30)).collect::<Vec<_>>();
        for line in &lines {
            store.record(line.clone());
        }
        store.flush();

        assert_eq!(read(dir.path(), 1), format!("{NEW_RECORD_MARKER}{}", lines.concat()));
        assert_eq!(log_files(dir.path()), vec!["f1.log"]);
        assert_eq!(store.current_index(), 1);
    }

    #[test]
    fn test_five_lines_rotate_twice() {
        let dir = TempDir::new().unwrap();
        let mut store = Fixture::new(dir.path()).store();

        let lines = (0..5).map(|_| line(30)).collect::<Vec<_>>();
        for line in &lines {
            store.record(line.clone());
        }
        assert_eq!(store.pending_index(), 3);
        store.flush();

        // the marker alone fills f1, which falls out of the window once f3 opens
        assert_eq!(store.current_index(), 3);
        assert_eq!(log_files(dir.path()), vec!["f2.log", "f3.log"]);
        assert_eq!(read(dir.path(), 2), lines[..3].concat());
        assert_eq!(read(dir.path(), 3), lines[3..].concat());
    }

    #[test]
    fn test_rotation_boundary_keeps_lines_whole() {
        let dir = TempDir::new().unwrap();
        let mut fixture = Fixture::new(dir.path());
        fixture.max_files = 5;
        let mut store = fixture.store();

        let lines = (0..3).map(|_| line(40)).collect::<Vec<_>>();
        for line in &lines {
            store.record(line.clone());
            store.flush();
        }

        assert_eq!(store.current_index(), 3);
        assert_eq!(read(dir.path(), 1), NEW_RECORD_MARKER);
        assert_eq!(read(dir.path(), 2), lines[..2].concat());
        assert_eq!(read(dir.path(), 3), lines[2]);
        for index in 1..=3 {
            assert!(read(dir.path(), index).len() <= 100 + 40);
        }
    }

    #[test]
    fn test_oversized_line_gets_its_own_file() {
        let dir = TempDir::new().unwrap();
        let mut fixture = Fixture::new(dir.path());
        fixture.max_files = 5;
        let mut store = fixture.store();

        let (small, big) = (line(10), line(250));
        store.record(small.clone());
        store.record(big.clone());
        store.record(small.clone());
        store.flush();

        assert_eq!(read(dir.path(), 1), format!("{NEW_RECORD_MARKER}{small}"));
        assert_eq!(read(dir.path(), 2), big);
        assert_eq!(read(dir.path(), 3), small);
    }

    #[test]
    fn test_retention_after_many_rotations() {
        let dir = TempDir::new().unwrap();
        let mut fixture = Fixture::new(dir.path());
        fixture.max_files = 3;
        fixture.max_file_index = 10;
        let mut store = fixture.store();

        // the marker fills f1 and every line fills a file of its own, so 26 lines rotate 26
        // times and wrap the ring twice
        for _ in 0..26 {
            store.record(line(100));
            store.flush();
        }

        assert_eq!(store.current_index(), 7);
        assert_eq!(log_files(dir.path()), vec!["f5.log", "f6.log", "f7.log"]);
        assert_eq!(fixture.trap.len(), 0);
    }

    #[test]
    fn test_resume_existing_file_with_room() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("f1.log"), line(200)).unwrap();
        fs::write(dir.path().join("f2.log"), line(200)).unwrap();
        let old = line(20);
        fs::write(dir.path().join("f3.log"), &old).unwrap();

        let mut fixture = Fixture::new(dir.path());
        fixture.max_file_size = 200;
        fixture.max_files = 5;
        let mut store = fixture.store();
        let (first, second) = (line(40), line(40));
        store.record(first.clone());
        store.record(second.clone());
        store.flush();

        // 20 existing bytes, the marker and 80 buffered bytes make 174
        assert_eq!(store.current_index(), 3);
        assert_eq!(read(dir.path(), 3), format!("{old}{NEW_RECORD_MARKER}{first}{second}"));

        let third = line(30);
        store.record(third.clone());
        store.flush();
        assert_eq!(store.current_index(), 4);
        assert_eq!(read(dir.path(), 4), third);
    }

    #[test]
    fn test_full_file_continues_at_next_index() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("f4.log"), line(200)).unwrap();
        fs::write(dir.path().join("f6.log"), line(220)).unwrap();

        let mut fixture = Fixture::new(dir.path());
        fixture.max_file_size = 200;
        fixture.max_files = 5;
        let mut store = fixture.store();
        let text = line(30);
        store.record(text.clone());
        store.flush();

        assert_eq!(store.current_index(), 7);
        assert_eq!(read(dir.path(), 7), format!("{NEW_RECORD_MARKER}{text}"));
    }

    #[test]
    fn test_discovery_restarts_at_midpoint_after_wrap() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("f10.log"), line(200)).unwrap();
        fs::write(dir.path().join("f7.log"), line(10)).unwrap();
        let old = line(10);
        fs::write(dir.path().join("f4.log"), &old).unwrap();

        let mut fixture = Fixture::new(dir.path());
        fixture.max_file_size = 200;
        fixture.max_file_index = 10;
        let mut store = fixture.store();
        let text = line(30);
        store.record(text.clone());
        store.flush();

        assert_eq!(store.current_index(), 4);
        assert_eq!(read(dir.path(), 4), format!("{old}{NEW_RECORD_MARKER}{text}"));
    }

    #[test]
    fn test_discovery_wraps_after_full_last_index() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("f5.log"), line(200)).unwrap();

        let mut fixture = Fixture::new(dir.path());
        fixture.max_file_size = 200;
        fixture.max_file_index = 5;
        let mut store = fixture.store();
        store.record(line(30));
        store.flush();

        // f5 is taken, so the scan restarts at 3 and finds nothing below it
        assert_eq!(store.current_index(), 1);

        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("f3.log"), line(200)).unwrap();
        fs::write(dir.path().join("f5.log"), line(200)).unwrap();
        let mut fixture = Fixture::new(dir.path());
        fixture.max_file_size = 200;
        fixture.max_file_index = 5;
        let mut store = fixture.store();
        store.record(line(30));
        store.flush();
        assert_eq!(store.current_index(), 4);
    }

    #[test]
    fn test_existing_file_too_full_for_buffer_rotates_first() {
        let dir = TempDir::new().unwrap();
        let old = line(150);
        fs::write(dir.path().join("f1.log"), &old).unwrap();

        let mut fixture = Fixture::new(dir.path());
        fixture.max_file_size = 200;
        let mut store = fixture.store();
        let text = line(40);
        store.record(text.clone());
        store.flush();

        assert_eq!(store.current_index(), 2);
        assert_eq!(read(dir.path(), 1), old);
        assert_eq!(read(dir.path(), 2), format!("{NEW_RECORD_MARKER}{text}"));
    }

    #[test]
    fn test_buffered_slots_follow_discovered_index() {
        let dir = TempDir::new().unwrap();
        let old = line(5);
        fs::write(dir.path().join("f7.log"), &old).unwrap();

        let mut fixture = Fixture::new(dir.path());
        fixture.max_file_size = 200;
        fixture.max_files = 4;
        let mut store = fixture.store();
        let lines = (0..4).map(|_| line(60)).collect::<Vec<_>>();
        for line in &lines {
            store.record(line.clone());
        }
        assert_eq!(store.pending_index(), 2);
        store.flush();

        assert_eq!(store.current_index(), 8);
        assert_eq!(
            read(dir.path(), 7),
            format!("{old}{NEW_RECORD_MARKER}{}", lines[..2].concat())
        );
        assert_eq!(read(dir.path(), 8), lines[2..].concat());
    }

    #[test]
    fn test_recover_after_retry_period() {
        let dir = TempDir::new().unwrap();
        let blocked = dir.path().join("blocked");
        fs::write(&blocked, "not a directory").unwrap();

        let mut fixture = Fixture::new(&blocked);
        fixture.max_file_size = 170;
        fixture.max_file_index = 20;
        let mut store = fixture.store();

        let lines = (0..4).map(|_| line(30)).collect::<Vec<_>>();
        store.record(lines[0].clone());
        store.flush();
        assert!(!store.is_open());
        assert_eq!(fixture.trap.len(), 1);

        store.record(lines[1].clone());
        store.clock_mut().advance(Duration::from_secs(10));
        store.flush();
        assert_eq!(fixture.trap.len(), 1, "no attempt inside the retry period");

        fs::remove_file(&blocked).unwrap();
        store.record(lines[2].clone());
        store.clock_mut().advance(Duration::from_secs(10));
        store.flush();
        assert!(!store.is_open());

        store.record(lines[3].clone());
        store.clock_mut().advance(Duration::from_secs(20));
        store.flush();
        assert!(store.is_open());
        assert_eq!(fixture.trap.len(), 1);

        assert_eq!(
            read(&blocked, 1),
            format!("{NEW_RECORD_MARKER}{}{}{}", lines[0], lines[1], lines[2])
        );
        assert_eq!(read(&blocked, 2), lines[3]);
    }

    #[test]
    fn test_eviction_drops_oldest_lines() {
        let dir = TempDir::new().unwrap();
        let mut fixture = Fixture::new(dir.path());
        fixture.max_file_size = 50;
        fixture.max_files = 5;
        fixture.max_buffered_bytes = 100;
        let mut store = fixture.store();
        let metrics = store.metrics.clone();

        let lines = (0..4).map(|_| line(40)).collect::<Vec<_>>();
        for line in &lines {
            store.record(line.clone());
        }
        assert_eq!(metrics.dropped_messages(), 2);
        assert_eq!(metrics.buffered_bytes(), 80);

        store.flush();
        assert_eq!(metrics.buffered_bytes(), 0);
        assert_eq!(read(dir.path(), 1), NEW_RECORD_MARKER);
        assert_eq!(read(dir.path(), 2), lines[2]);
        assert_eq!(read(dir.path(), 3), lines[3]);
        assert_eq!(log_files(dir.path()), vec!["f1.log", "f2.log", "f3.log"]);
    }

    #[test]
    fn test_close_without_records_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let mut store = Fixture::new(dir.path()).store();
        store.flush();
        store.close();
        assert!(log_files(dir.path()).is_empty());
    }
}
