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

//! Selection of the credential source.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use super::{
    default_config_paths, find_config, load_config_file, process_env, profile_from_env,
    prompt_profile, CliOverrides, ConnectionProfile, PartialProfile, Prompter,
};
use crate::AuthError;

/// Requested authentication method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum AuthMethod {
    /// Try environment, then configuration files, then interactive prompts.
    #[default]
    Auto,
    /// Environment variables only.
    Env,
    /// Configuration file only.
    Config,
    /// Command line arguments only.
    Args,
    /// Interactive prompts only.
    Interactive,
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AuthMethod::Auto => "auto",
            AuthMethod::Env => "env",
            AuthMethod::Config => "config",
            AuthMethod::Args => "args",
            AuthMethod::Interactive => "interactive",
        })
    }
}

/// A single candidate source of credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSource {
    /// Values taken from `OS_*` variables.
    Environment(PartialProfile),
    /// An INI configuration file.
    ConfigFile(PathBuf),
    /// Values passed on the command line.
    CommandLineArgs(PartialProfile),
    /// Interactive prompts.
    Interactive,
}

impl fmt::Display for AuthSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthSource::Environment(..) => f.write_str("environment variables"),
            AuthSource::ConfigFile(path) => write!(f, "configuration file {}", path.display()),
            AuthSource::CommandLineArgs(..) => f.write_str("command line arguments"),
            AuthSource::Interactive => f.write_str("interactive input"),
        }
    }
}

/// Credential resolver.
///
/// All inputs are injected, so that resolution is a pure function of them
/// (plus reading configuration files and interactive input).
pub struct Resolver {
    env: HashMap<String, String>,
    config_paths: Vec<PathBuf>,
    prompter: Box<dyn Prompter>,
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.env.keys().collect::<Vec<_>>();
        names.sort();
        f.debug_struct("Resolver")
            .field("env", &names)
            .field("config_paths", &self.config_paths)
            .finish_non_exhaustive()
    }
}

impl Resolver {
    /// Create a resolver from explicit inputs.
    pub fn new(
        env: HashMap<String, String>,
        config_paths: Vec<PathBuf>,
        prompter: Box<dyn Prompter>,
    ) -> Resolver {
        Resolver {
            env,
            config_paths,
            prompter,
        }
    }

    /// Create a resolver using the process environment and default paths.
    pub fn from_process(prompter: Box<dyn Prompter>) -> Resolver {
        Resolver::new(process_env(), default_config_paths(), prompter)
    }

    /// Resolve a connection profile.
    ///
    /// An explicitly requested method either succeeds or fails, there is no
    /// fallback. The automatic method short-circuits to command line
    /// arguments if any credentials were given, or to the configuration file
    /// if its path was given. Otherwise sources are tried in the order of
    /// [automatic_sources](#method.automatic_sources) and the error of the
    /// last one is returned if none succeeds.
    pub fn resolve(
        &mut self,
        method: AuthMethod,
        cli: &CliOverrides,
        config_path: Option<&Path>,
    ) -> Result<ConnectionProfile, AuthError> {
        debug!("Resolving credentials using method {}", method);
        match method {
            AuthMethod::Env => self.load(&AuthSource::Environment(profile_from_env(&self.env))),
            AuthMethod::Config => self.load_config(config_path),
            AuthMethod::Args => self.load(&AuthSource::CommandLineArgs(cli.clone())),
            AuthMethod::Interactive => self.load(&AuthSource::Interactive),
            AuthMethod::Auto if cli.has_credentials() => {
                self.load(&AuthSource::CommandLineArgs(cli.clone()))
            }
            AuthMethod::Auto if config_path.is_some() => self.load_config(config_path),
            AuthMethod::Auto => self.resolve_automatically(),
        }
    }

    /// Sources probed by the automatic method, in order.
    ///
    /// Configuration files that do not exist are not included.
    pub fn automatic_sources(&self) -> Vec<AuthSource> {
        let mut result = vec![AuthSource::Environment(profile_from_env(&self.env))];
        result.extend(
            self.config_paths
                .iter()
                .filter(|p| p.is_file())
                .cloned()
                .map(AuthSource::ConfigFile),
        );
        result.push(AuthSource::Interactive);
        result
    }

    /// Build a profile from one source.
    pub fn load(&mut self, source: &AuthSource) -> Result<ConnectionProfile, AuthError> {
        let fields = match source {
            AuthSource::Environment(fields) | AuthSource::CommandLineArgs(fields) => fields.clone(),
            AuthSource::ConfigFile(path) => load_config_file(path)?,
            AuthSource::Interactive => prompt_profile(self.prompter.as_mut())?,
        };
        let profile = fields.into_profile()?;
        info!(
            "Using credentials from {} (user {}, project {})",
            source, profile.username, profile.project_name
        );
        Ok(profile)
    }

    fn load_config(&mut self, config_path: Option<&Path>) -> Result<ConnectionProfile, AuthError> {
        let path = match config_path {
            Some(path) => path.to_path_buf(),
            None => find_config(&self.config_paths)
                .map(Path::to_path_buf)
                .ok_or_else(|| AuthError::ConfigNotFound(self.config_paths.clone()))?,
        };
        self.load(&AuthSource::ConfigFile(path))
    }

    fn resolve_automatically(&mut self) -> Result<ConnectionProfile, AuthError> {
        let mut last_error = None;
        for source in self.automatic_sources() {
            match self.load(&source) {
                Ok(profile) => return Ok(profile),
                Err(err) => {
                    match source {
                        AuthSource::ConfigFile(..) => warn!("Skipping {}: {}", source, err),
                        _ => debug!("Cannot use {}: {}", source, err),
                    }
                    last_error = Some(err);
                }
            }
        }
        // Interactive input always comes last, so an error is always recorded.
        Err(last_error.unwrap_or(AuthError::InteractiveInputAborted))
    }
}
