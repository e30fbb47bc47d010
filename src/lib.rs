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

//! OpenStack inventory and capacity snapshots.
//!
//! This crate authenticates against an OpenStack cloud, fetches instances and
//! hypervisors, derives capacity metrics (utilization percentages and
//! overcommit ratios) and writes everything to CSV files.
//!
//! # Features
//!
//! * [Credential resolution](auth/index.html) from environment variables,
//!   INI configuration files, command line arguments or interactive prompts.
//! * A small [cloud client](cloud/index.html) over Compute, Image, Identity
//!   and Block Storage APIs.
//! * Pure [metrics](metrics/index.html) derivation.
//! * Stable [CSV export](export/index.html).
//!
//! # Example
//!
//! ```rust,no_run
//! use os_inventory::auth::{AuthMethod, CliOverrides, Resolver, TerminalPrompter};
//! use os_inventory::cloud::Cloud;
//! use os_inventory::inventory::{self, ExportOptions};
//!
//! # async fn example() -> os_inventory::Result<()> {
//! let mut resolver = Resolver::from_process(Box::new(TerminalPrompter::new()));
//! let profile = resolver.resolve(AuthMethod::Auto, &CliOverrides::default(), None)?;
//! let cloud = Cloud::connect(&profile).await?;
//! let summary = inventory::export(&cloud, &ExportOptions::default()).await?;
//! println!("Exported {} instances", summary.instances.unwrap_or(0));
//! # Ok(()) }
//! ```

#![crate_name = "os_inventory"]
#![crate_type = "lib"]
#![deny(
    missing_debug_implementations,
    missing_docs,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    trivial_casts,
    trivial_numeric_casts,
    unconditional_recursion,
    unsafe_code,
    unused_allocation,
    unused_comparisons,
    unused_import_braces,
    unused_parens,
    while_true
)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod auth;
pub mod block_storage;
pub mod cloud;
mod common;
pub mod compute;
mod error;
pub mod export;
pub mod identity;
pub mod image;
pub mod inventory;
pub mod metrics;

pub use crate::error::{ApiError, AuthError, Error, Result};
