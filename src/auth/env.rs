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

//! Credentials from `OS_*` environment variables.

use std::collections::HashMap;
use std::env;

use super::PartialProfile;

/// Environment variables and the profile fields they populate.
pub const ENV_VARS: &[(&str, &str)] = &[
    ("OS_AUTH_URL", "auth_url"),
    ("OS_USERNAME", "username"),
    ("OS_PASSWORD", "password"),
    ("OS_PROJECT_NAME", "project_name"),
    ("OS_USER_DOMAIN_NAME", "user_domain_name"),
    ("OS_PROJECT_DOMAIN_NAME", "project_domain_name"),
    ("OS_REGION_NAME", "region_name"),
    ("OS_INTERFACE", "interface"),
];

/// Build a partial profile from a mapping of environment variables.
///
/// Values are taken verbatim; empty values are ignored.
pub fn profile_from_env(vars: &HashMap<String, String>) -> PartialProfile {
    let mut result = PartialProfile::default();
    for (var, field) in ENV_VARS {
        if let Some(value) = vars.get(*var).filter(|v| !v.is_empty()) {
            trace!("Using {} from the environment", var);
            let _ = result.set_field(field, value.clone());
        }
    }
    result
}

/// Collect `OS_*` variables of the current process.
///
/// Variables with non-Unicode names or values are skipped.
pub fn process_env() -> HashMap<String, String> {
    env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .filter(|(k, _)| k.starts_with("OS_"))
        .collect()
}
