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

//! JSON structures and protocol bits for the Block Storage API.

#![allow(missing_docs)]

use crate::common::protocol::empty_as_default;
use crate::common::ResourceId;

/// A volume.
#[derive(Clone, Debug, Deserialize)]
pub struct Volume {
    pub id: String,
    #[serde(default, deserialize_with = "empty_as_default")]
    pub name: Option<String>,
    /// Size in GiB.
    pub size: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct VolumesRoot {
    pub volumes: Vec<Volume>,
}

impl ResourceId for Volume {
    fn resource_id(&self) -> &str {
        &self.id
    }
}
