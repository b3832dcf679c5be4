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

/// The circular space of file indices `[1, last]`.
///
/// Every index handed to or returned from this type is within the space; stepping past `last`
/// wraps to `1` and stepping below `1` wraps to `last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IndexRing {
    last: usize,
}

impl IndexRing {
    pub(crate) const FIRST: usize = 1;

    /// `last` must be at least 2.
    pub(crate) const fn new(last: usize) -> Self {
        IndexRing { last }
    }

    pub(crate) fn last(&self) -> usize {
        self.last
    }

    /// Where file discovery restarts once the last index is known to be taken. This is also the
    /// largest retention window the space supports.
    pub(crate) fn midpoint(&self) -> usize {
        self.last.div_ceil(2)
    }

    pub(crate) fn next(&self, index: usize) -> usize {
        self.forward(index, 1)
    }

    pub(crate) fn forward(&self, index: usize, n: usize) -> usize {
        (index - Self::FIRST + n % self.last) % self.last + Self::FIRST
    }

    pub(crate) fn back(&self, index: usize, n: usize) -> usize {
        (index - Self::FIRST + self.last - n % self.last) % self.last + Self::FIRST
    }
}
