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

//! Cloud API.

use async_trait::async_trait;
use osauth::common::IdOrName;
use osauth::identity::Password;
use osauth::{InterfaceType, Session};

use crate::auth::ConnectionProfile;
use crate::block_storage::{self, Volume};
use crate::compute::{self, Flavor, Hypervisor, Server};
use crate::identity::{self, Project};
use crate::image::{self, Image};
use crate::{ApiError, AuthError, Result};

/// Read-only view of a cloud needed for an inventory snapshot.
///
/// Every call is a single attempt, failures are not retried.
#[async_trait]
pub trait CloudService: Send + Sync {
    /// List hypervisors with their resource usage.
    async fn list_hypervisors(&self) -> Result<Vec<Hypervisor>>;

    /// List instances of all projects.
    async fn list_instances(&self) -> Result<Vec<Server>>;

    /// List public and private flavors.
    async fn list_flavors(&self) -> Result<Vec<Flavor>>;

    /// Get one flavor by its ID.
    async fn get_flavor(&self, id: &str) -> Result<Flavor>;

    /// List images.
    async fn list_images(&self) -> Result<Vec<Image>>;

    /// List projects.
    async fn list_projects(&self) -> Result<Vec<Project>>;

    /// List volumes of all projects.
    async fn list_volumes(&self) -> Result<Vec<Volume>>;
}

/// OpenStack cloud connection.
#[derive(Debug, Clone)]
pub struct Cloud {
    session: Session,
}

fn interface_type(value: &str) -> std::result::Result<InterfaceType, AuthError> {
    match value {
        "public" | "publicURL" => Ok(InterfaceType::Public),
        "internal" | "internalURL" => Ok(InterfaceType::Internal),
        "admin" | "adminURL" => Ok(InterfaceType::Admin),
        other => Err(AuthError::InvalidField {
            field: "interface",
            reason: format!("{} is not one of public, internal or admin", other),
        }),
    }
}

impl Cloud {
    /// Authenticate using a connection profile.
    ///
    /// Uses password authentication against Identity API v3 with the project
    /// scope, endpoint interface and region from the profile.
    pub async fn connect(profile: &ConnectionProfile) -> Result<Cloud> {
        profile.validate()?;
        let interface = interface_type(&profile.interface)?;

        let auth = Password::new(
            &profile.auth_url,
            profile.username.clone(),
            profile.password.clone(),
            profile.user_domain_name.clone(),
        )
        .map_err(ApiError::from)?
        .with_project_scope(
            IdOrName::from_name(profile.project_name.clone()),
            IdOrName::from_name(profile.project_domain_name.clone()),
        );

        debug!(
            "Authenticating at {} as {} in project {}",
            profile.auth_url, profile.username, profile.project_name
        );
        let mut session = Session::new(auth)
            .await
            .map_err(ApiError::from)?
            .with_endpoint_interface(interface);
        if let Some(ref region) = profile.region_name {
            session = session.with_region(region.clone());
        }

        info!(
            "Connected to OpenStack at {} (project {}, user {})",
            profile.auth_url, profile.project_name, profile.username
        );
        Ok(Cloud { session })
    }

    /// Create a cloud object from an existing session.
    pub fn from_session(session: Session) -> Cloud {
        Cloud { session }
    }

    /// Underlying session.
    #[inline]
    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl From<Session> for Cloud {
    fn from(value: Session) -> Cloud {
        Cloud::from_session(value)
    }
}

#[async_trait]
impl CloudService for Cloud {
    async fn list_hypervisors(&self) -> Result<Vec<Hypervisor>> {
        compute::list_hypervisors(&self.session).await
    }

    async fn list_instances(&self) -> Result<Vec<Server>> {
        compute::list_servers(&self.session).await
    }

    async fn list_flavors(&self) -> Result<Vec<Flavor>> {
        compute::list_flavors(&self.session).await
    }

    async fn get_flavor(&self, id: &str) -> Result<Flavor> {
        compute::get_flavor(&self.session, id).await
    }

    async fn list_images(&self) -> Result<Vec<Image>> {
        image::list_images(&self.session).await
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        identity::list_projects(&self.session).await
    }

    async fn list_volumes(&self) -> Result<Vec<Volume>> {
        block_storage::list_volumes(&self.session).await
    }
}

#[cfg(test)]
mod test {
    use osauth::InterfaceType;

    use super::interface_type;
    use crate::AuthError;

    #[test]
    fn test_interface_type() {
        assert_eq!(interface_type("public").unwrap(), InterfaceType::Public);
        assert_eq!(interface_type("internalURL").unwrap(), InterfaceType::Internal);
        assert_eq!(interface_type("admin").unwrap(), InterfaceType::Admin);
        assert!(matches!(
            interface_type("private"),
            Err(AuthError::InvalidField {
                field: "interface",
                ..
            })
        ));
    }
}
