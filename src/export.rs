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

//! CSV serialization.
//!
//! Both files always start with a header row, even when there are no data
//! rows. The order of columns is fixed by [INSTANCE_HEADERS] and
//! [HYPERVISOR_HEADERS].

use std::io;
use std::path::Path;

use serde::Serialize;

use crate::inventory::{InstanceRecord, VolumeInfo};
use crate::metrics::{format_uptime, HypervisorMetrics};
use crate::{Error, Result};

/// Placeholder for values that are not known.
pub const NOT_AVAILABLE: &str = "N/A";

/// Columns of the instances file.
pub const INSTANCE_HEADERS: &[&str] = &[
    "ID",
    "Name",
    "Status",
    "Power State",
    "VM State",
    "Project ID",
    "Project Name",
    "User ID",
    "Availability Zone",
    "Hypervisor Hostname",
    "Flavor ID",
    "Flavor Name",
    "VCPUs",
    "RAM (MB)",
    "Disk (GB)",
    "Image ID",
    "Image Name",
    "Public IP",
    "Network IPs",
    "Attached Volumes",
    "Created At",
    "Uptime",
    "Metadata",
];

/// Columns of the hypervisors file.
pub const HYPERVISOR_HEADERS: &[&str] = &[
    "ID",
    "Hostname",
    "Hypervisor Type",
    "State",
    "Status",
    "Physical CPUs",
    "Physical CPUs Used",
    "Physical CPU Usage (%)",
    "Allocated VCPUs",
    "Allocated CPU (%)",
    "CPU Overcommit Ratio",
    "Physical RAM Total (MB)",
    "Physical RAM Used (MB)",
    "Physical RAM Usage (%)",
    "Allocated RAM (MB)",
    "Allocated RAM (%)",
    "Memory Overcommit Ratio",
    "Disk Total (GB)",
    "Disk Used (GB)",
    "Disk Usage (%)",
    "Running VMs",
    "Active Instances",
    "Host IP",
    "CPU Overcommitted",
    "Memory Overcommitted",
];

#[derive(Debug, Serialize)]
struct InstanceRow<'a> {
    id: &'a str,
    name: &'a str,
    status: &'a str,
    power_state: &'a str,
    vm_state: &'a str,
    project_id: &'a str,
    project_name: &'a str,
    user_id: &'a str,
    availability_zone: &'a str,
    hypervisor_hostname: &'a str,
    flavor_id: &'a str,
    flavor_name: &'a str,
    vcpus: String,
    ram: String,
    disk: String,
    image_id: &'a str,
    image_name: &'a str,
    public_ip: &'a str,
    network_ips: String,
    attached_volumes: String,
    created_at: &'a str,
    uptime: String,
    metadata: String,
}

#[derive(Debug, Serialize)]
struct HypervisorRow<'a> {
    id: &'a str,
    hostname: &'a str,
    hypervisor_type: &'a str,
    state: &'a str,
    status: &'a str,
    vcpus_total: u64,
    vcpus_used: u64,
    cpu_usage_percent: f64,
    vcpus_allocated: u64,
    cpu_allocation_percent: f64,
    cpu_overcommit_ratio: f64,
    memory_mb_total: u64,
    memory_mb_used: u64,
    memory_usage_percent: f64,
    memory_mb_allocated: u64,
    memory_allocation_percent: f64,
    memory_overcommit_ratio: f64,
    local_gb_total: u64,
    local_gb_used: u64,
    disk_usage_percent: f64,
    running_vms: u64,
    active_instances: u64,
    host_ip: &'a str,
    cpu_overcommitted: &'static str,
    memory_overcommitted: &'static str,
}

#[inline]
fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}

#[inline]
fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn network_ips(record: &InstanceRecord) -> String {
    record
        .networks
        .iter()
        .flat_map(|(net, addrs)| {
            addrs.iter().map(move |a| match a.addr_type {
                Some(kind) => format!("{}:{} ({})", net, a.addr, kind),
                None => format!("{}:{}", net, a.addr),
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn volume(info: &VolumeInfo) -> String {
    match info.size {
        Some(size) => format!(
            "ID:{}, Name:{}, Size:{}GB",
            info.id,
            or_na(info.name.as_deref()),
            size
        ),
        None => format!("ID:{}", info.id),
    }
}

impl<'a> From<&'a InstanceRecord> for InstanceRow<'a> {
    fn from(record: &'a InstanceRecord) -> InstanceRow<'a> {
        let flavor = record.flavor.as_ref();
        let flavor_value = |f: fn(&crate::inventory::FlavorInfo) -> String| {
            flavor.map(f).unwrap_or_else(|| NOT_AVAILABLE.to_string())
        };
        // Serializing a map of strings cannot fail.
        let metadata = serde_json::to_string(&record.metadata).unwrap_or_default();

        InstanceRow {
            id: &record.id,
            name: &record.name,
            status: &record.status,
            power_state: or_na(record.power_state.as_deref()),
            vm_state: or_na(record.vm_state.as_deref()),
            project_id: &record.project_id,
            project_name: or_na(record.project_name.as_deref()),
            user_id: &record.user_id,
            availability_zone: or_na(record.availability_zone.as_deref()),
            hypervisor_hostname: or_na(record.hypervisor_hostname.as_deref()),
            flavor_id: or_na(record.flavor_id.as_deref()),
            flavor_name: or_na(flavor.map(|f| f.name.as_str())),
            vcpus: flavor_value(|f| f.vcpus.to_string()),
            ram: flavor_value(|f| f.ram.to_string()),
            disk: flavor_value(|f| f.disk.to_string()),
            image_id: or_na(record.image_id.as_deref()),
            image_name: or_na(record.image_name.as_deref()),
            public_ip: or_na(record.public_ip()),
            network_ips: network_ips(record),
            attached_volumes: record
                .volumes
                .iter()
                .map(volume)
                .collect::<Vec<_>>()
                .join("; "),
            created_at: or_na(record.created_at.as_deref()),
            uptime: format_uptime(record.uptime),
            metadata,
        }
    }
}

impl<'a> From<&'a HypervisorMetrics> for HypervisorRow<'a> {
    fn from(metrics: &'a HypervisorMetrics) -> HypervisorRow<'a> {
        let record = &metrics.record;
        HypervisorRow {
            id: &record.id,
            hostname: &record.hostname,
            hypervisor_type: &record.hypervisor_type,
            state: &record.state,
            status: &record.status,
            vcpus_total: record.vcpus_total,
            vcpus_used: record.vcpus_used,
            cpu_usage_percent: metrics.cpu_usage_percent,
            vcpus_allocated: record.vcpus_allocated.unwrap_or(record.vcpus_used),
            cpu_allocation_percent: metrics.cpu_allocation_percent,
            cpu_overcommit_ratio: metrics.cpu_overcommit_ratio,
            memory_mb_total: record.memory_mb_total,
            memory_mb_used: record.memory_mb_used,
            memory_usage_percent: metrics.memory_usage_percent,
            memory_mb_allocated: record.memory_mb_allocated.unwrap_or(record.memory_mb_used),
            memory_allocation_percent: metrics.memory_allocation_percent,
            memory_overcommit_ratio: metrics.memory_overcommit_ratio,
            local_gb_total: record.local_gb_total,
            local_gb_used: record.local_gb_used,
            disk_usage_percent: metrics.disk_usage_percent,
            running_vms: record.running_vms,
            active_instances: record.active_instances.unwrap_or(0),
            host_ip: or_na(record.host_ip.as_deref()),
            cpu_overcommitted: yes_no(metrics.cpu_overcommitted),
            memory_overcommitted: yes_no(metrics.memory_overcommitted),
        }
    }
}

fn write_rows<W, R, I>(writer: W, headers: &[&str], rows: I) -> ::std::result::Result<(), csv::Error>
where
    W: io::Write,
    R: Serialize,
    I: IntoIterator<Item = R>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(headers)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write instances to any writer.
pub fn write_instances_to<W: io::Write>(
    writer: W,
    records: &[InstanceRecord],
) -> ::std::result::Result<(), csv::Error> {
    write_rows(writer, INSTANCE_HEADERS, records.iter().map(InstanceRow::from))
}

/// Write hypervisors to any writer.
pub fn write_hypervisors_to<W: io::Write>(
    writer: W,
    metrics: &[HypervisorMetrics],
) -> ::std::result::Result<(), csv::Error> {
    write_rows(
        writer,
        HYPERVISOR_HEADERS,
        metrics.iter().map(HypervisorRow::from),
    )
}

fn create(path: &Path) -> Result<std::fs::File> {
    std::fs::File::create(path).map_err(|e| Error::Csv {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

/// Write instances to a CSV file, replacing it.
pub fn write_instances<P: AsRef<Path>>(path: P, records: &[InstanceRecord]) -> Result<()> {
    let path = path.as_ref();
    debug!("Writing {} instances to {}", records.len(), path.display());
    write_instances_to(create(path)?, records).map_err(|source| Error::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Write hypervisors to a CSV file, replacing it.
pub fn write_hypervisors<P: AsRef<Path>>(path: P, metrics: &[HypervisorMetrics]) -> Result<()> {
    let path = path.as_ref();
    debug!("Writing {} hypervisors to {}", metrics.len(), path.display());
    write_hypervisors_to(create(path)?, metrics).map_err(|source| Error::Csv {
        path: path.to_path_buf(),
        source,
    })
}
