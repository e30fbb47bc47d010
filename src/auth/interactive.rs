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

//! Interactive credential prompts.

use dialoguer::{Input, Password};

use super::{PartialProfile, DEFAULT_DOMAIN, DEFAULT_INTERFACE};
use crate::AuthError;

/// Source of interactive answers.
pub trait Prompter {
    /// Ask for a visible value.
    ///
    /// An empty answer means that the default (if any) should be used.
    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<String, AuthError>;

    /// Ask for a value without echoing it.
    fn password(&mut self, prompt: &str) -> Result<String, AuthError>;
}

/// Prompter reading from the controlling terminal.
///
/// Any terminal failure, including end of input or a missing terminal,
/// results in [AuthError::InteractiveInputAborted].
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    /// Create a new terminal prompter.
    pub fn new() -> TerminalPrompter {
        TerminalPrompter
    }
}

fn aborted(err: dialoguer::Error) -> AuthError {
    debug!("Interactive input failed: {}", err);
    AuthError::InteractiveInputAborted
}

impl Prompter for TerminalPrompter {
    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<String, AuthError> {
        let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
        if let Some(value) = default {
            input = input.default(value.to_string());
        }
        input.interact_text().map_err(aborted)
    }

    fn password(&mut self, prompt: &str) -> Result<String, AuthError> {
        Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(aborted)
    }
}

fn answer(value: String) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Ask for every profile field.
///
/// Required fields are asked first. Blank optional fields stay unset so that
/// defaults apply on validation. The password is taken as typed.
pub fn prompt_profile(prompter: &mut dyn Prompter) -> Result<PartialProfile, AuthError> {
    eprintln!("\nInteractive authentication setup:");
    eprintln!("Enter your OpenStack credentials (required fields marked with *):");

    let auth_url = answer(prompter.input("* Auth URL", None)?);
    let username = answer(prompter.input("* Username", None)?);
    let password = Some(prompter.password("* Password")?).filter(|p| !p.is_empty());
    let project_name = answer(prompter.input("* Project Name", None)?);
    let user_domain_name = answer(prompter.input("User Domain Name", Some(DEFAULT_DOMAIN))?);
    let project_domain_name =
        answer(prompter.input("Project Domain Name", Some(DEFAULT_DOMAIN))?);
    let region_name = answer(prompter.input("Region Name (optional)", None)?);
    let interface = answer(prompter.input("Interface", Some(DEFAULT_INTERFACE))?);

    Ok(PartialProfile {
        auth_url,
        username,
        password,
        project_name,
        user_domain_name,
        project_domain_name,
        region_name,
        interface,
    })
}
