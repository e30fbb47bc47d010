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

//! Inventory snapshot: fetching, enrichment and export.
//!
//! Instances are enriched with their flavor, image and project names,
//! attached volume details and uptime.
//! Hypervisors get the resources allocated by instances placed on them and
//! the derived [metrics](../metrics/index.html).

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};

use crate::cloud::CloudService;
use crate::block_storage::Volume;
use crate::compute::{AddressType, Flavor, Server};
use crate::export;
use crate::metrics::{self, HypervisorMetrics, HypervisorRecord};
use crate::Result;

/// Default name of the instances CSV file.
pub const DEFAULT_INSTANCES_FILE: &str = "openstack_instances.csv";

/// Default name of the hypervisors CSV file.
pub const DEFAULT_HYPERVISORS_FILE: &str = "openstack_hypervisors.csv";

/// Flavor resources of an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlavorInfo {
    /// Flavor ID.
    pub id: String,
    /// Flavor name.
    pub name: String,
    /// Number of vCPUs.
    pub vcpus: u32,
    /// RAM in MiB.
    pub ram: u64,
    /// Root disk in GiB.
    pub disk: u64,
}

impl From<Flavor> for FlavorInfo {
    fn from(value: Flavor) -> FlavorInfo {
        FlavorInfo {
            id: value.id,
            name: value.name,
            vcpus: value.vcpus,
            ram: value.ram,
            disk: value.disk,
        }
    }
}

/// An IP address of an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressInfo {
    /// IP address.
    pub addr: String,
    /// Fixed or floating, if known.
    pub addr_type: Option<AddressType>,
}

/// A volume attached to an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeInfo {
    /// Volume ID.
    pub id: String,
    /// Volume name, if known.
    pub name: Option<String>,
    /// Size in GiB, if the volume could be found.
    pub size: Option<u64>,
}

impl From<Volume> for VolumeInfo {
    fn from(value: Volume) -> VolumeInfo {
        VolumeInfo {
            id: value.id,
            name: value.name,
            size: Some(value.size),
        }
    }
}

/// Resources referenced by instances, keyed by their IDs.
#[derive(Debug, Clone, Default)]
pub struct RelatedResources {
    /// Flavors.
    pub flavors: HashMap<String, FlavorInfo>,
    /// Image names.
    pub images: HashMap<String, String>,
    /// Project names.
    pub projects: HashMap<String, String>,
    /// Volumes.
    pub volumes: HashMap<String, VolumeInfo>,
}

/// An instance with everything exported about it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceRecord {
    /// Instance ID.
    pub id: String,
    /// Instance name.
    pub name: String,
    /// Status, e.g. `ACTIVE`.
    pub status: String,
    /// Power state name.
    pub power_state: Option<String>,
    /// VM state.
    pub vm_state: Option<String>,
    /// Owning project.
    pub project_id: String,
    /// Name of the owning project, if known.
    pub project_name: Option<String>,
    /// Owning user.
    pub user_id: String,
    /// Availability zone.
    pub availability_zone: Option<String>,
    /// Hypervisor the instance is placed on.
    pub hypervisor_hostname: Option<String>,
    /// Flavor ID from the instance.
    pub flavor_id: Option<String>,
    /// Flavor details, if the flavor could be found.
    pub flavor: Option<FlavorInfo>,
    /// Image ID, absent for instances booted from volume.
    pub image_id: Option<String>,
    /// Image name, if the image could be found.
    pub image_name: Option<String>,
    /// Addresses by network name.
    pub networks: BTreeMap<String, Vec<AddressInfo>>,
    /// Attached volumes.
    pub volumes: Vec<VolumeInfo>,
    /// Creation time as reported by the cloud.
    pub created_at: Option<String>,
    /// Time since creation, if known.
    pub uptime: Option<Duration>,
    /// Instance metadata.
    pub metadata: BTreeMap<String, String>,
}

impl InstanceRecord {
    /// Build a record from a server.
    ///
    /// Flavors, images, projects and volumes are looked up by their IDs;
    /// missing ones are left empty.
    pub fn from_server(
        server: Server,
        related: &RelatedResources,
        now: DateTime<Utc>,
    ) -> InstanceRecord {
        let flavor_id = server.flavor.map(|f| f.id);
        let flavor = flavor_id
            .as_ref()
            .and_then(|id| related.flavors.get(id))
            .cloned();
        let image_id = server.image.map(|i| i.id);
        let image_name = image_id
            .as_ref()
            .and_then(|id| related.images.get(id))
            .cloned();
        let project_name = related.projects.get(&server.project_id).cloned();
        let volumes = server
            .volumes_attached
            .into_iter()
            .map(|v| {
                related.volumes.get(&v.id).cloned().unwrap_or(VolumeInfo {
                    id: v.id,
                    name: None,
                    size: None,
                })
            })
            .collect();
        let uptime = metrics::derive_instance_uptime(server.created_at.as_deref(), now);
        let networks = server
            .addresses
            .into_iter()
            .map(|(net, addrs)| {
                let addrs = addrs
                    .into_iter()
                    .map(|a| AddressInfo {
                        addr: a.addr,
                        addr_type: a.addr_type,
                    })
                    .collect();
                (net, addrs)
            })
            .collect();

        InstanceRecord {
            id: server.id,
            name: server.name,
            status: server.status,
            power_state: server.power_state.map(|p| p.to_string()),
            vm_state: server.vm_state,
            project_id: server.project_id,
            project_name,
            user_id: server.user_id,
            availability_zone: server.availability_zone,
            hypervisor_hostname: server.hypervisor_hostname,
            flavor_id,
            flavor,
            image_id,
            image_name,
            networks,
            volumes,
            created_at: server.created_at,
            uptime,
            metadata: server.metadata.into_iter().collect(),
        }
    }

    /// The first floating IP address, if any.
    pub fn public_ip(&self) -> Option<&str> {
        self.networks
            .values()
            .flatten()
            .find(|a| a.addr_type == Some(AddressType::Floating))
            .map(|a| a.addr.as_str())
    }
}

/// What to export and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Path to the instances CSV file.
    pub instances_file: PathBuf,
    /// Path to the hypervisors CSV file.
    pub hypervisors_file: PathBuf,
    /// Whether to export instances.
    pub export_instances: bool,
    /// Whether to export hypervisors.
    pub export_hypervisors: bool,
}

impl Default for ExportOptions {
    fn default() -> ExportOptions {
        ExportOptions {
            instances_file: PathBuf::from(DEFAULT_INSTANCES_FILE),
            hypervisors_file: PathBuf::from(DEFAULT_HYPERVISORS_FILE),
            export_instances: true,
            export_hypervisors: true,
        }
    }
}

/// Result of an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Number of exported instances, `None` if not exported.
    pub instances: Option<usize>,
    /// Number of exported hypervisors, `None` if not exported.
    pub hypervisors: Option<usize>,
}

/// Collect flavors of the given servers.
///
/// Starts with the flavor list and fetches flavors missing from it one by
/// one. Flavors that cannot be fetched are skipped with a warning.
pub async fn collect_flavors<C>(cloud: &C, servers: &[Server]) -> Result<HashMap<String, FlavorInfo>>
where
    C: CloudService + ?Sized,
{
    let mut result: HashMap<String, FlavorInfo> = cloud
        .list_flavors()
        .await?
        .into_iter()
        .map(|f| (f.id.clone(), FlavorInfo::from(f)))
        .collect();

    let mut missing = servers
        .iter()
        .filter_map(|s| s.flavor.as_ref())
        .map(|f| f.id.as_str())
        .filter(|id| !result.contains_key(*id))
        .collect::<Vec<_>>();
    missing.sort_unstable();
    missing.dedup();

    for id in missing {
        match cloud.get_flavor(id).await {
            Ok(flavor) => {
                let _ = result.insert(id.to_string(), flavor.into());
            }
            Err(err) => warn!("Cannot get flavor {}: {}", id, err),
        }
    }

    Ok(result)
}

/// Collect image names by their IDs.
pub async fn collect_images<C>(cloud: &C) -> Result<HashMap<String, String>>
where
    C: CloudService + ?Sized,
{
    Ok(cloud
        .list_images()
        .await?
        .into_iter()
        .filter_map(|i| i.name.map(|name| (i.id, name)))
        .collect())
}

/// Collect project names by their IDs.
///
/// Project names only decorate instances, so a failure is logged and an
/// empty mapping is returned.
pub async fn collect_projects<C>(cloud: &C) -> HashMap<String, String>
where
    C: CloudService + ?Sized,
{
    match cloud.list_projects().await {
        Ok(projects) => projects.into_iter().map(|p| (p.id, p.name)).collect(),
        Err(err) => {
            warn!("Cannot list projects, project names will not be exported: {}", err);
            HashMap::new()
        }
    }
}

/// Collect volumes by their IDs.
///
/// A failure is logged and an empty mapping is returned, in which case only
/// IDs of attached volumes are exported.
pub async fn collect_volumes<C>(cloud: &C) -> HashMap<String, VolumeInfo>
where
    C: CloudService + ?Sized,
{
    match cloud.list_volumes().await {
        Ok(volumes) => volumes
            .into_iter()
            .map(|v| (v.id.clone(), VolumeInfo::from(v)))
            .collect(),
        Err(err) => {
            warn!("Cannot list volumes, volume details will not be exported: {}", err);
            HashMap::new()
        }
    }
}

/// Fetch instances with their flavors.
///
/// With `with_details`, image names, project names and volumes are also
/// collected. They are not needed for hypervisor allocation.
pub async fn fetch_instances<C>(
    cloud: &C,
    with_details: bool,
    now: DateTime<Utc>,
) -> Result<Vec<InstanceRecord>>
where
    C: CloudService + ?Sized,
{
    let servers = cloud.list_instances().await?;
    let mut related = RelatedResources {
        flavors: collect_flavors(cloud, &servers).await?,
        ..RelatedResources::default()
    };
    if with_details {
        related.images = collect_images(cloud).await?;
        related.projects = collect_projects(cloud).await;
        if servers.iter().any(|s| !s.volumes_attached.is_empty()) {
            related.volumes = collect_volumes(cloud).await;
        }
    }

    Ok(servers
        .into_iter()
        .map(|s| {
            trace!("Processing instance {} ({})", s.name, s.id);
            InstanceRecord::from_server(s, &related, now)
        })
        .collect())
}

/// Fetch hypervisors and derive their metrics.
///
/// Allocated resources are computed from the given instances.
pub async fn fetch_hypervisors<C>(
    cloud: &C,
    instances: &[InstanceRecord],
) -> Result<Vec<HypervisorMetrics>>
where
    C: CloudService + ?Sized,
{
    let mut records = cloud
        .list_hypervisors()
        .await?
        .into_iter()
        .map(HypervisorRecord::from)
        .collect::<Vec<_>>();
    metrics::allocate(&mut records, instances);
    Ok(records
        .iter()
        .map(metrics::derive_hypervisor_metrics)
        .collect())
}

/// Take an inventory snapshot and write it to CSV files.
///
/// Instances are fetched even if only hypervisors are exported, since
/// allocated resources are computed from them. Files are only written once
/// everything has been fetched, so a failed API call leaves no partial
/// snapshot behind.
pub async fn export<C>(cloud: &C, options: &ExportOptions) -> Result<ExportSummary>
where
    C: CloudService + ?Sized,
{
    let mut summary = ExportSummary::default();
    if !options.export_instances && !options.export_hypervisors {
        warn!("Both instance and hypervisor export are disabled, nothing to do");
        return Ok(summary);
    }

    info!("Retrieving instance details");
    let instances = fetch_instances(cloud, options.export_instances, Utc::now()).await?;
    let hypervisors = if options.export_hypervisors {
        info!("Retrieving hypervisor details");
        Some(fetch_hypervisors(cloud, &instances).await?)
    } else {
        None
    };

    if options.export_instances {
        export::write_instances(&options.instances_file, &instances)?;
        info!(
            "Exported {} instances to {}",
            instances.len(),
            options.instances_file.display()
        );
        summary.instances = Some(instances.len());
    } else {
        debug!("Instance export is disabled");
    }

    if let Some(hypervisors) = hypervisors {
        export::write_hypervisors(&options.hypervisors_file, &hypervisors)?;
        info!(
            "Exported {} hypervisors to {}",
            hypervisors.len(),
            options.hypervisors_file.display()
        );
        summary.hypervisors = Some(hypervisors.len());
    } else {
        debug!("Hypervisor export is disabled");
    }

    Ok(summary)
}
