// Copyright 2026 Dmitry Tantsur <dtantsur@protonmail.com>
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

//! Compute API support.
//!
//! Only the read-only calls needed for an inventory snapshot are provided:
//! servers of all projects, flavors and hypervisors. All calls use the
//! minimum microversion, so that numeric hypervisor IDs and flavor
//! references in servers are returned.

mod api;
mod protocol;

pub use self::api::{get_flavor, list_flavors, list_hypervisors, list_servers};
pub use self::protocol::{AddressType, Flavor, Hypervisor, PowerState, Server, ServerAddress};
pub use crate::common::protocol::Ref;
