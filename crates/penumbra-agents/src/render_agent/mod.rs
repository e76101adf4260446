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

//! Acts as the **[A]gent** for the rendering subsystem.
//!
//! For every camera the agent culls, packs the visible lights, renders the
//! shadow atlas when some light casts shadows, then issues the forward
//! passes and submits. It decides *what* runs and in which order; the
//! lanes decide *how*.
//!
//! A camera that cannot be culled is skipped without issuing any command.
//! Every other failure degrades the camera instead of aborting it.

mod agent;
mod frame;
mod pipeline;

pub use agent::*;
pub use frame::*;
pub use pipeline::*;
