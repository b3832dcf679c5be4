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

use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::Receiver;
use crossbeam_channel::RecvTimeoutError;
use crossbeam_channel::Sender;

use crate::Error;
use crate::dispatcher::Shared;

pub(crate) struct Worker {
    shared: Arc<Shared>,
    shutdown: Receiver<()>,
}

impl Worker {
    /// Spawn a worker thread, returning the handle that stops it.
    pub(crate) fn spawn(shared: Arc<Shared>, name: String) -> Result<WorkerHandle, Error> {
        let (sender, receiver) = crossbeam_channel::bounded(1);
        let worker = Worker {
            shared,
            shutdown: receiver,
        };

        let handle = std::thread::Builder::new()
            .name(name.clone())
            .spawn(move || worker.run())
            .map_err(|err| {
                Error::new("failed to spawn dispatcher thread")
                    .with_context("name", name)
                    .with_source(err)
            })?;

        Ok(WorkerHandle {
            shutdown: sender,
            handle,
        })
    }

    fn run(self) {
        loop {
            let interval = self.shared.flush_interval();
            match self.shutdown.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => self.shared.dispatch(),
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    self.shared.dispatch();
                    break;
                }
            }
        }
    }
}

/// Stops the worker when told to, or when dropped.
#[derive(Debug)]
pub(crate) struct WorkerHandle {
    shutdown: Sender<()>,
    handle: JoinHandle<()>,
}

impl WorkerHandle {
    /// Signal the worker, then wait for its last cycle to finish.
    pub(crate) fn stop(self) -> Result<(), Error> {
        let WorkerHandle { shutdown, handle } = self;

        // the worker may already be gone; disconnection stops it all the same
        let _ = shutdown.send(());
        drop(shutdown);

        handle
            .join()
            .map_err(|_| Error::new("dispatcher thread panicked"))
    }
}
