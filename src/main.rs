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

//! Command line front-end.

#[macro_use]
extern crate log;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, CommandFactory, Parser};
use os_inventory::auth::{AuthMethod, CliOverrides, Resolver, TerminalPrompter};
use os_inventory::cloud::Cloud;
use os_inventory::inventory::{
    self, ExportOptions, DEFAULT_HYPERVISORS_FILE, DEFAULT_INSTANCES_FILE,
};

const AFTER_HELP: &str = "\
Authentication methods:
  auto        : Try environment variables, then config files, then interactive (default)
  env         : Use OS_* environment variables only
  config      : Use a configuration file
  args        : Use command line arguments
  interactive : Prompt for credentials interactively

Configuration file format:
  [openstack]
  auth_url = https://keystone.example.com:5000/v3
  username = myuser
  password = mypass
  project_name = myproject
  user_domain_name = default
  project_domain_name = default
  region_name = RegionOne
  interface = public";

/// Retrieve OpenStack instance and hypervisor information and export it to
/// CSV files.
#[derive(Debug, Parser)]
#[command(name = "os-inventory", version, about, after_help = AFTER_HELP)]
struct Cli {
    /// Authentication method to use.
    #[arg(long, value_enum, default_value_t = AuthMethod::Auto)]
    auth_method: AuthMethod,

    /// Path to the configuration file.
    #[arg(long, value_name = "PATH")]
    config_file: Option<PathBuf>,

    /// Identity service URL.
    #[arg(long, help_heading = "Authentication")]
    auth_url: Option<String>,

    /// User name.
    #[arg(long, help_heading = "Authentication")]
    username: Option<String>,

    /// Password.
    #[arg(long, help_heading = "Authentication")]
    password: Option<String>,

    /// Project name.
    #[arg(long, help_heading = "Authentication")]
    project_name: Option<String>,

    /// User domain name [default: default].
    #[arg(long, help_heading = "Authentication")]
    user_domain_name: Option<String>,

    /// Project domain name [default: default].
    #[arg(long, help_heading = "Authentication")]
    project_domain_name: Option<String>,

    /// Region name.
    #[arg(long, help_heading = "Authentication")]
    region_name: Option<String>,

    /// Endpoint interface [default: public].
    #[arg(
        long,
        help_heading = "Authentication",
        value_parser = ["public", "internal", "admin"]
    )]
    interface: Option<String>,

    /// Output file for instance data.
    #[arg(long, default_value = DEFAULT_INSTANCES_FILE, help_heading = "Output")]
    instances_file: PathBuf,

    /// Output file for hypervisor data.
    #[arg(long, default_value = DEFAULT_HYPERVISORS_FILE, help_heading = "Output")]
    hypervisors_file: PathBuf,

    /// Skip instance data export.
    #[arg(long, help_heading = "Output")]
    no_export_instances: bool,

    /// Skip hypervisor data export.
    #[arg(long, help_heading = "Output")]
    no_export_hypervisors: bool,

    /// Export only instance data.
    #[arg(long, help_heading = "Output", conflicts_with_all = ["hypervisors_only", "no_export_instances"])]
    instances_only: bool,

    /// Export only hypervisor data.
    #[arg(long, help_heading = "Output", conflicts_with = "no_export_hypervisors")]
    hypervisors_only: bool,

    /// Increase logging verbosity (can be repeated).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            auth_url: self.auth_url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            project_name: self.project_name.clone(),
            user_domain_name: self.user_domain_name.clone(),
            project_domain_name: self.project_domain_name.clone(),
            region_name: self.region_name.clone(),
            interface: self.interface.clone(),
        }
    }

    fn export_options(&self) -> ExportOptions {
        ExportOptions {
            instances_file: self.instances_file.clone(),
            hypervisors_file: self.hypervisors_file.clone(),
            export_instances: !self.no_export_instances && !self.hypervisors_only,
            export_hypervisors: !self.no_export_hypervisors && !self.instances_only,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli, options: &ExportOptions) -> os_inventory::Result<()> {
    let mut resolver = Resolver::from_process(Box::new(TerminalPrompter::new()));
    let profile = resolver.resolve(
        cli.auth_method,
        &cli.overrides(),
        cli.config_file.as_deref(),
    )?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let cloud = Cloud::connect(&profile).await?;
        let summary = inventory::export(&cloud, options).await?;
        if let Some(count) = summary.instances {
            println!(
                "Exported {} instances to {}",
                count,
                options.instances_file.display()
            );
        }
        if let Some(count) = summary.hypervisors {
            println!(
                "Exported {} hypervisors to {}",
                count,
                options.hypervisors_file.display()
            );
        }
        Ok::<_, os_inventory::Error>(())
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = cli.export_options();
    if !options.export_instances && !options.export_hypervisors {
        Cli::command()
            .error(
                clap::error::ErrorKind::ArgumentConflict,
                "at least one of instance or hypervisor export must be enabled",
            )
            .exit();
    }

    match run(&cli, &options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod test {
    use clap::{CommandFactory, Parser};

    use super::Cli;
    use os_inventory::auth::AuthMethod;

    #[test]
    fn test_command() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["os-inventory"]).unwrap();
        assert_eq!(cli.auth_method, AuthMethod::Auto);
        assert!(!cli.overrides().has_credentials());
        let options = cli.export_options();
        assert!(options.export_instances);
        assert!(options.export_hypervisors);
        assert_eq!(
            options.instances_file.to_str(),
            Some("openstack_instances.csv")
        );
    }

    #[test]
    fn test_args() {
        let cli = Cli::try_parse_from([
            "os-inventory",
            "--auth-method",
            "args",
            "--auth-url",
            "https://keystone.example.com:5000/v3",
            "--username",
            "myuser",
            "--password",
            "mypass",
            "--project-name",
            "myproject",
            "--interface",
            "internal",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.auth_method, AuthMethod::Args);
        assert_eq!(cli.verbose, 2);
        let overrides = cli.overrides();
        assert_eq!(overrides.username.as_deref(), Some("myuser"));
        assert_eq!(overrides.interface.as_deref(), Some("internal"));
        assert!(overrides.user_domain_name.is_none());
    }

    #[test]
    fn test_invalid_interface() {
        assert!(Cli::try_parse_from(["os-inventory", "--interface", "private"]).is_err());
    }

    #[test]
    fn test_only_flags() {
        let cli = Cli::try_parse_from(["os-inventory", "--instances-only"]).unwrap();
        let options = cli.export_options();
        assert!(options.export_instances);
        assert!(!options.export_hypervisors);

        let cli = Cli::try_parse_from(["os-inventory", "--hypervisors-only"]).unwrap();
        let options = cli.export_options();
        assert!(!options.export_instances);
        assert!(options.export_hypervisors);

        assert!(
            Cli::try_parse_from(["os-inventory", "--instances-only", "--hypervisors-only"])
                .is_err()
        );
    }

    #[test]
    fn test_both_disabled() {
        let cli = Cli::try_parse_from([
            "os-inventory",
            "--no-export-instances",
            "--no-export-hypervisors",
        ])
        .unwrap();
        let options = cli.export_options();
        assert!(!options.export_instances && !options.export_hypervisors);
    }
}
