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

//! Foundation bits exposing the Compute API.

use osauth::services::COMPUTE;
use osauth::Session;

use super::protocol::*;
use crate::common::{fetch_all, with_marker};
use crate::Result;

/// List servers of all projects with details.
///
/// Requires the admin role, otherwise only servers of the current project
/// are returned.
pub async fn list_servers(session: &Session) -> Result<Vec<Server>> {
    trace!("Listing servers in all projects");
    let servers = fetch_all(|marker| async move {
        let query = with_marker(vec![("all_tenants", String::from("true"))], marker);
        let root: ServersRoot = session
            .get(COMPUTE, &["servers", "detail"])
            .query(&query)
            .fetch()
            .await?;
        Ok::<_, crate::Error>(root.servers)
    })
    .await?;
    debug!("Received {} servers", servers.len());
    Ok(servers)
}

/// List both public and private flavors.
pub async fn list_flavors(session: &Session) -> Result<Vec<Flavor>> {
    trace!("Listing flavors");
    let flavors = fetch_all(|marker| async move {
        let query = with_marker(vec![("is_public", String::from("None"))], marker);
        let root: FlavorsRoot = session
            .get(COMPUTE, &["flavors", "detail"])
            .query(&query)
            .fetch()
            .await?;
        Ok::<_, crate::Error>(root.flavors)
    })
    .await?;
    debug!("Received {} flavors", flavors.len());
    Ok(flavors)
}

/// Get a flavor by its ID.
pub async fn get_flavor<S: AsRef<str>>(session: &Session, id: S) -> Result<Flavor> {
    trace!("Fetching flavor {}", id.as_ref());
    let root: FlavorRoot = session
        .get(COMPUTE, &["flavors", id.as_ref()])
        .fetch()
        .await?;
    trace!("Received {:?}", root.flavor);
    Ok(root.flavor)
}

/// List hypervisors with their resource usage.
pub async fn list_hypervisors(session: &Session) -> Result<Vec<Hypervisor>> {
    trace!("Listing hypervisors");
    let root: HypervisorsRoot = session
        .get(COMPUTE, &["os-hypervisors", "detail"])
        .fetch()
        .await?;
    debug!("Received {} hypervisors", root.hypervisors.len());
    Ok(root.hypervisors)
}
