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

//! Connection profile and its partially filled form.

use std::fmt;

use reqwest::Url;

use crate::AuthError;

/// Default user and project domain name.
pub const DEFAULT_DOMAIN: &str = "default";

/// Default endpoint interface.
pub const DEFAULT_INTERFACE: &str = "public";

const VALID_INTERFACES: &[&str] = &[
    "public",
    "internal",
    "admin",
    "publicURL",
    "internalURL",
    "adminURL",
];

/// Everything needed to authenticate against a cloud.
///
/// Only construct it through [PartialProfile::into_profile] or validate it
/// with [validate](#method.validate) before use.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionProfile {
    /// Identity service endpoint.
    pub auth_url: String,
    /// User name.
    pub username: String,
    /// User password.
    pub password: String,
    /// Name of the project to scope to.
    pub project_name: String,
    /// Domain of the user.
    pub user_domain_name: String,
    /// Domain of the project.
    pub project_domain_name: String,
    /// Region, if the cloud has several.
    pub region_name: Option<String>,
    /// Endpoint interface: `public`, `internal` or `admin`.
    pub interface: String,
}

/// A connection profile with any subset of fields known.
///
/// Every credential source produces one of these. Empty strings are treated
/// as absent values.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PartialProfile {
    /// Identity service endpoint.
    pub auth_url: Option<String>,
    /// User name.
    pub username: Option<String>,
    /// User password.
    pub password: Option<String>,
    /// Name of the project to scope to.
    pub project_name: Option<String>,
    /// Domain of the user.
    pub user_domain_name: Option<String>,
    /// Domain of the project.
    pub project_domain_name: Option<String>,
    /// Region name.
    pub region_name: Option<String>,
    /// Endpoint interface.
    pub interface: Option<String>,
}

/// Credentials passed on the command line.
pub type CliOverrides = PartialProfile;

fn required(value: &str, name: &'static str) -> Result<(), AuthError> {
    if value.is_empty() {
        Err(AuthError::MissingRequiredField(name))
    } else {
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl ConnectionProfile {
    /// Check that the profile can be used for authentication.
    ///
    /// Required fields are checked in the order `auth_url`, `username`,
    /// `password`, `project_name`; the first missing one is reported.
    pub fn validate(&self) -> Result<(), AuthError> {
        required(&self.auth_url, "auth_url")?;
        required(&self.username, "username")?;
        required(&self.password, "password")?;
        required(&self.project_name, "project_name")?;

        if let Err(e) = Url::parse(&self.auth_url) {
            return Err(AuthError::InvalidField {
                field: "auth_url",
                reason: e.to_string(),
            });
        }

        if !VALID_INTERFACES.contains(&self.interface.as_str()) {
            return Err(AuthError::InvalidField {
                field: "interface",
                reason: format!(
                    "{} is not one of public, internal or admin",
                    self.interface
                ),
            });
        }

        Ok(())
    }
}

impl PartialProfile {
    /// Whether any of the required credentials is present.
    pub fn has_credentials(&self) -> bool {
        [
            &self.auth_url,
            &self.username,
            &self.password,
            &self.project_name,
        ]
        .iter()
        .any(|v| v.as_deref().is_some_and(|s| !s.is_empty()))
    }

    /// Set a field by its name.
    ///
    /// Returns `false` if the name is not a known field.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let field = match name {
            "auth_url" => &mut self.auth_url,
            "username" => &mut self.username,
            "password" => &mut self.password,
            "project_name" => &mut self.project_name,
            "user_domain_name" => &mut self.user_domain_name,
            "project_domain_name" => &mut self.project_domain_name,
            "region_name" => &mut self.region_name,
            "interface" => &mut self.interface,
            _ => return false,
        };
        *field = Some(value);
        true
    }

    /// Apply defaults and validate.
    pub fn into_profile(self) -> Result<ConnectionProfile, AuthError> {
        let profile = ConnectionProfile {
            auth_url: non_empty(self.auth_url)
                .ok_or(AuthError::MissingRequiredField("auth_url"))?,
            username: non_empty(self.username)
                .ok_or(AuthError::MissingRequiredField("username"))?,
            password: non_empty(self.password)
                .ok_or(AuthError::MissingRequiredField("password"))?,
            project_name: non_empty(self.project_name)
                .ok_or(AuthError::MissingRequiredField("project_name"))?,
            user_domain_name: non_empty(self.user_domain_name)
                .unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
            project_domain_name: non_empty(self.project_domain_name)
                .unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
            region_name: non_empty(self.region_name),
            interface: non_empty(self.interface).unwrap_or_else(|| DEFAULT_INTERFACE.to_string()),
        };
        profile.validate()?;
        Ok(profile)
    }
}

fn redacted(value: bool) -> &'static str {
    if value {
        "<redacted>"
    } else {
        "<none>"
    }
}

impl fmt::Debug for ConnectionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionProfile")
            .field("auth_url", &self.auth_url)
            .field("username", &self.username)
            .field("password", &redacted(!self.password.is_empty()))
            .field("project_name", &self.project_name)
            .field("user_domain_name", &self.user_domain_name)
            .field("project_domain_name", &self.project_domain_name)
            .field("region_name", &self.region_name)
            .field("interface", &self.interface)
            .finish()
    }
}

impl fmt::Debug for PartialProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialProfile")
            .field("auth_url", &self.auth_url)
            .field("username", &self.username)
            .field("password", &redacted(self.password.is_some()))
            .field("project_name", &self.project_name)
            .field("user_domain_name", &self.user_domain_name)
            .field("project_domain_name", &self.project_domain_name)
            .field("region_name", &self.region_name)
            .field("interface", &self.interface)
            .finish()
    }
}
