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

//! Support for the INI configuration file.
//!
//! The file contains a single `[openstack]` section:
//!
//! ```ini
//! [openstack]
//! auth_url = https://keystone.example.com:5000/v3
//! username = myuser
//! password = mypass
//! project_name = myproject
//! user_domain_name = default
//! project_domain_name = default
//! region_name = RegionOne
//! interface = public
//! ```

use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};

use super::PartialProfile;
use crate::AuthError;

/// Name of the section holding credentials.
pub const CONFIG_SECTION: &str = "openstack";

/// Default locations of the configuration file, in the order of preference.
///
/// These are `~/.config/openstack/clouds.ini`, `~/.openstack/config` and
/// `./openstack.conf`.
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut result = Vec::with_capacity(3);
    if let Some(home) = dirs_next::home_dir() {
        result.push(home.join(".config").join("openstack").join("clouds.ini"));
        result.push(home.join(".openstack").join("config"));
    } else {
        warn!("Cannot find home directory");
    }
    result.push(PathBuf::from("./openstack.conf"));
    result
}

/// Find the first existing file among the candidates.
pub fn find_config(candidates: &[PathBuf]) -> Option<&Path> {
    let found = candidates.iter().find(|p| p.is_file()).map(PathBuf::as_path);
    match found {
        Some(path) => debug!("Found configuration file {}", path.display()),
        None => debug!("No configuration file in {:?}", candidates),
    }
    found
}

/// Load credentials from an INI configuration file.
///
/// The file must exist and contain the `[openstack]` section. Values are
/// taken verbatim: quotes and backslashes are not interpreted. Keys are
/// case-insensitive, unknown keys are ignored. Missing keys are not an error
/// at this stage.
pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<PartialProfile, AuthError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(AuthError::ConfigNotFound(vec![path.to_path_buf()]));
    }

    let options = ParseOption {
        enabled_quote: false,
        enabled_escape: false,
    };
    let ini = Ini::load_from_file_opt(path, options).map_err(|e| AuthError::InvalidConfigFormat {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let section = ini
        .section(Some(CONFIG_SECTION))
        .ok_or_else(|| AuthError::InvalidConfigFormat {
            path: path.to_path_buf(),
            reason: format!("missing [{}] section", CONFIG_SECTION),
        })?;

    let mut result = PartialProfile::default();
    for (key, value) in section.iter() {
        if !result.set_field(&key.to_lowercase(), value.to_string()) {
            debug!("Ignoring unknown key {} in {}", key, path.display());
        }
    }
    trace!("Loaded configuration from {}", path.display());
    Ok(result)
}
