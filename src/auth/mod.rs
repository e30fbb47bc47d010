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

//! Credential resolution.
//!
//! Accessing an OpenStack cloud requires a [ConnectionProfile]: the Identity
//! endpoint, user credentials, project scope, endpoint interface and region.
//! This module decides where the profile comes from:
//!
//! * `OS_*` environment variables,
//! * an INI configuration file with an `[openstack]` section,
//! * command line arguments,
//! * interactive prompts on the terminal.
//!
//! The usual workflow is as follows:
//!
//! 1. Create a [Resolver], either from the current process (environment and
//!    default configuration paths) or from explicit inputs.
//! 2. Call [resolve](Resolver::resolve) with the requested [AuthMethod].
//! 3. Pass the resulting profile to [Cloud::connect](../cloud/struct.Cloud.html#method.connect).
//!
//! # Examples
//!
//! Resolving credentials from explicit environment values:
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use os_inventory::auth::{AuthMethod, CliOverrides, Resolver, TerminalPrompter};
//!
//! let env: HashMap<String, String> = [
//!     ("OS_AUTH_URL", "https://keystone.example.com:5000/v3"),
//!     ("OS_USERNAME", "admin"),
//!     ("OS_PASSWORD", "pa$$w0rd"),
//!     ("OS_PROJECT_NAME", "admin"),
//! ]
//! .into_iter()
//! .map(|(k, v)| (k.to_string(), v.to_string()))
//! .collect();
//!
//! let mut resolver = Resolver::new(env, Vec::new(), Box::new(TerminalPrompter::new()));
//! let profile = resolver
//!     .resolve(AuthMethod::Env, &CliOverrides::default(), None)
//!     .expect("Invalid credentials");
//! assert_eq!(profile.interface, "public");
//! ```

mod config;
mod env;
mod interactive;
mod profile;
mod resolver;

pub use self::config::{default_config_paths, find_config, load_config_file, CONFIG_SECTION};
pub use self::env::{profile_from_env, process_env, ENV_VARS};
pub use self::interactive::{prompt_profile, Prompter, TerminalPrompter};
pub use self::profile::{
    CliOverrides, ConnectionProfile, PartialProfile, DEFAULT_DOMAIN, DEFAULT_INTERFACE,
};
pub use self::resolver::{AuthMethod, AuthSource, Resolver};
