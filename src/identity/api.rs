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

//! Foundation bits exposing the Identity API.

use osauth::services::{GenericService, VersionSelector};
use osauth::Session;

use super::protocol::*;
use crate::Result;

const IDENTITY: GenericService = GenericService::new("identity", VersionSelector::Major(3));

/// List all projects.
///
/// The Identity API does not paginate projects, but it may truncate the
/// list if the server has a limit configured.
pub async fn list_projects(session: &Session) -> Result<Vec<Project>> {
    trace!("Listing projects");
    let root: ProjectsRoot = session.get(IDENTITY, &["projects"]).fetch().await?;
    if root.truncated {
        warn!("The list of projects is truncated by the server");
    }
    debug!("Received {} projects", root.projects.len());
    Ok(root.projects)
}
