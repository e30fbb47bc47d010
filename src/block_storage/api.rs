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

//! Foundation bits exposing the Block Storage API.

use osauth::services::BLOCK_STORAGE;
use osauth::Session;

use super::protocol::*;
use crate::common::{fetch_all, with_marker};
use crate::Result;

/// List volumes of all projects.
///
/// Requires the admin role, otherwise only volumes of the current project
/// are returned.
pub async fn list_volumes(session: &Session) -> Result<Vec<Volume>> {
    trace!("Listing volumes in all projects");
    let volumes = fetch_all(|marker| async move {
        let query = with_marker(vec![("all_tenants", String::from("true"))], marker);
        let root: VolumesRoot = session
            .get(BLOCK_STORAGE, &["volumes", "detail"])
            .query(&query)
            .fetch()
            .await?;
        Ok::<_, crate::Error>(root.volumes)
    })
    .await?;
    debug!("Received {} volumes", volumes.len());
    Ok(volumes)
}
