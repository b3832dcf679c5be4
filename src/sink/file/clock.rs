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

use std::time::Instant;

#[derive(Debug)]
pub(crate) enum Clock {
    DefaultClock,
    #[cfg(test)]
    ManualClock(ManualClock),
}

impl Clock {
    pub(crate) fn now(&self) -> Instant {
        match self {
            Clock::DefaultClock => Instant::now(),
            #[cfg(test)]
            Clock::ManualClock(clock) => clock.now(),
        }
    }

    #[cfg(test)]
    pub(crate) fn advance(&mut self, by: std::time::Duration) {
        if let Clock::ManualClock(clock) = self {
            clock.advance(by);
        }
    }
}

/// The time only moves when told to.
#[derive(Debug)]
#[cfg(test)]
pub(crate) struct ManualClock {
    now: Instant,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new(now: Instant) -> ManualClock {
        ManualClock { now }
    }

    fn now(&self) -> Instant {
        self.now
    }

    fn advance(&mut self, by: std::time::Duration) {
        self.now += by;
    }
}
