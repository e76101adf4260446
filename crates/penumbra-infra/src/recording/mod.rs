// Copyright 2025 eraflo
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


//! A headless command backend that records the command stream instead of
//! executing it. Used by the sandbox to print a frame, and by tests to
//! assert on command order and resource lifetimes.

mod command;
mod encoder;

pub use self::command::{GlobalValue, RecordedCommand};
pub use self::encoder::RecordingEncoder;
