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

//! JSON structures and protocol bits for the Compute API.

#![allow(missing_docs)]

use std::collections::HashMap;
use std::fmt;

use crate::common::protocol::{deser_id, empty_as_default, Ref};
use crate::common::ResourceId;

/// Type of a server address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum AddressType {
    #[serde(rename = "fixed")]
    Fixed,
    #[serde(rename = "floating")]
    Floating,
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AddressType::Fixed => "fixed",
            AddressType::Floating => "floating",
        })
    }
}

/// Power state of a server as reported by the hypervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "u8")]
pub enum PowerState {
    NoState,
    Running,
    Paused,
    Shutdown,
    Crashed,
    Suspended,
    Other(u8),
}

impl From<u8> for PowerState {
    fn from(value: u8) -> PowerState {
        match value {
            0 => PowerState::NoState,
            1 => PowerState::Running,
            3 => PowerState::Paused,
            4 => PowerState::Shutdown,
            6 => PowerState::Crashed,
            7 => PowerState::Suspended,
            other => PowerState::Other(other),
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerState::NoState => f.write_str("NOSTATE"),
            PowerState::Running => f.write_str("RUNNING"),
            PowerState::Paused => f.write_str("PAUSED"),
            PowerState::Shutdown => f.write_str("SHUTDOWN"),
            PowerState::Crashed => f.write_str("CRASHED"),
            PowerState::Suspended => f.write_str("SUSPENDED"),
            PowerState::Other(value) => write!(f, "{}", value),
        }
    }
}

/// Address of a server.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerAddress {
    /// IP (v4 of v6) address.
    pub addr: String,
    /// Address type (if known).
    #[serde(rename = "OS-EXT-IPS:type", default)]
    pub addr_type: Option<AddressType>,
}

/// A server with its details.
#[derive(Clone, Debug, Deserialize)]
pub struct Server {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "OS-EXT-STS:power_state", default)]
    pub power_state: Option<PowerState>,
    #[serde(rename = "OS-EXT-STS:vm_state", default)]
    pub vm_state: Option<String>,
    #[serde(rename = "tenant_id", default)]
    pub project_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(rename = "OS-EXT-AZ:availability_zone", default)]
    pub availability_zone: Option<String>,
    #[serde(
        rename = "OS-EXT-SRV-ATTR:hypervisor_hostname",
        default,
        deserialize_with = "empty_as_default"
    )]
    pub hypervisor_hostname: Option<String>,
    #[serde(default, deserialize_with = "empty_as_default")]
    pub flavor: Option<Ref>,
    #[serde(default, deserialize_with = "empty_as_default")]
    pub image: Option<Ref>,
    /// Networks and their addresses.
    #[serde(default)]
    pub addresses: HashMap<String, Vec<ServerAddress>>,
    #[serde(rename = "os-extended-volumes:volumes_attached", default)]
    pub volumes_attached: Vec<Ref>,
    /// Creation time as returned by the server, parsed later.
    #[serde(rename = "created", default, deserialize_with = "empty_as_default")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ServersRoot {
    pub servers: Vec<Server>,
}

/// A flavor.
#[derive(Clone, Debug, Deserialize)]
pub struct Flavor {
    pub id: String,
    pub name: String,
    pub vcpus: u32,
    /// RAM size in MiB.
    pub ram: u64,
    /// Root disk size in GiB.
    #[serde(default)]
    pub disk: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FlavorsRoot {
    pub flavors: Vec<Flavor>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FlavorRoot {
    pub flavor: Flavor,
}

/// A hypervisor with its resource usage.
#[derive(Clone, Debug, Deserialize)]
pub struct Hypervisor {
    #[serde(deserialize_with = "deser_id")]
    pub id: String,
    #[serde(rename = "hypervisor_hostname")]
    pub hostname: String,
    #[serde(default)]
    pub hypervisor_type: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "empty_as_default")]
    pub vcpus: u64,
    #[serde(default, deserialize_with = "empty_as_default")]
    pub vcpus_used: u64,
    #[serde(default, deserialize_with = "empty_as_default")]
    pub memory_mb: u64,
    #[serde(default, deserialize_with = "empty_as_default")]
    pub memory_mb_used: u64,
    #[serde(default, deserialize_with = "empty_as_default")]
    pub local_gb: u64,
    #[serde(default, deserialize_with = "empty_as_default")]
    pub local_gb_used: u64,
    #[serde(default, deserialize_with = "empty_as_default")]
    pub running_vms: u64,
    #[serde(default, deserialize_with = "empty_as_default")]
    pub host_ip: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct HypervisorsRoot {
    pub hypervisors: Vec<Hypervisor>,
}

impl ResourceId for Server {
    fn resource_id(&self) -> &str {
        &self.id
    }
}

impl ResourceId for Flavor {
    fn resource_id(&self) -> &str {
        &self.id
    }
}
