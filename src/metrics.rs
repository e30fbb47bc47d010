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

//! Capacity metrics and instance uptime.
//!
//! Everything here is pure and total: a hypervisor reporting zero capacity
//! for a resource gets `0.0` for every percentage and ratio of that resource
//! and is never considered overcommitted.
//!
//! ```rust
//! use os_inventory::metrics::{derive_hypervisor_metrics, HypervisorRecord};
//!
//! let record = HypervisorRecord {
//!     vcpus_total: 16,
//!     vcpus_used: 20,
//!     memory_mb_total: 65536,
//!     memory_mb_used: 32768,
//!     ..HypervisorRecord::default()
//! };
//! let metrics = derive_hypervisor_metrics(&record);
//! assert_eq!(metrics.cpu_overcommit_ratio, 1.25);
//! assert!(metrics.cpu_overcommitted);
//! assert_eq!(metrics.memory_overcommit_ratio, 0.5);
//! assert!(!metrics.memory_overcommitted);
//! ```

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use crate::compute::Hypervisor;
use crate::inventory::InstanceRecord;

/// Marker exported instead of an uptime that cannot be computed.
pub const UPTIME_UNAVAILABLE: &str = "unavailable";

/// Instance statuses that hold resources on their hypervisor.
pub const ALLOCATING_STATUSES: &[&str] = &["ACTIVE", "PAUSED", "SUSPENDED"];

/// Raw hypervisor data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HypervisorRecord {
    /// Hypervisor ID.
    pub id: String,
    /// Host name as known to the compute service.
    pub hostname: String,
    /// Hypervisor type, e.g. `QEMU`.
    pub hypervisor_type: String,
    /// State: `up` or `down`.
    pub state: String,
    /// Status: `enabled` or `disabled`.
    pub status: String,
    /// Physical CPUs.
    pub vcpus_total: u64,
    /// CPUs in use.
    pub vcpus_used: u64,
    /// Physical RAM in MiB.
    pub memory_mb_total: u64,
    /// RAM in use in MiB.
    pub memory_mb_used: u64,
    /// Local disk in GiB.
    pub local_gb_total: u64,
    /// Local disk in use in GiB.
    pub local_gb_used: u64,
    /// Number of VMs running according to the hypervisor.
    pub running_vms: u64,
    /// Management IP address.
    pub host_ip: Option<String>,
    /// vCPUs of the flavors of instances placed here, see [allocate].
    pub vcpus_allocated: Option<u64>,
    /// RAM of the flavors of instances placed here, see [allocate].
    pub memory_mb_allocated: Option<u64>,
    /// Instances holding resources here, see [allocate].
    pub active_instances: Option<u64>,
}

/// Hypervisor data with derived metrics.
///
/// Percentages and ratios are rounded to 2 decimal places.
#[derive(Debug, Clone, PartialEq)]
pub struct HypervisorMetrics {
    /// Raw data.
    pub record: HypervisorRecord,
    /// `vcpus_used / vcpus_total` in percent.
    pub cpu_usage_percent: f64,
    /// `vcpus_allocated / vcpus_total` in percent.
    pub cpu_allocation_percent: f64,
    /// `vcpus_used / vcpus_total`.
    pub cpu_overcommit_ratio: f64,
    /// Whether the unrounded CPU ratio exceeds 1.0.
    pub cpu_overcommitted: bool,
    /// `memory_mb_used / memory_mb_total` in percent.
    pub memory_usage_percent: f64,
    /// `memory_mb_allocated / memory_mb_total` in percent.
    pub memory_allocation_percent: f64,
    /// `memory_mb_used / memory_mb_total`.
    pub memory_overcommit_ratio: f64,
    /// Whether the unrounded memory ratio exceeds 1.0.
    pub memory_overcommitted: bool,
    /// `local_gb_used / local_gb_total` in percent.
    pub disk_usage_percent: f64,
}

impl From<Hypervisor> for HypervisorRecord {
    fn from(value: Hypervisor) -> HypervisorRecord {
        HypervisorRecord {
            id: value.id,
            hostname: value.hostname,
            hypervisor_type: value.hypervisor_type,
            state: value.state,
            status: value.status,
            vcpus_total: value.vcpus,
            vcpus_used: value.vcpus_used,
            memory_mb_total: value.memory_mb,
            memory_mb_used: value.memory_mb_used,
            local_gb_total: value.local_gb,
            local_gb_used: value.local_gb_used,
            running_vms: value.running_vms,
            host_ip: value.host_ip,
            vcpus_allocated: None,
            memory_mb_allocated: None,
            active_instances: None,
        }
    }
}

#[inline]
fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

#[inline]
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Derive capacity metrics of a hypervisor.
///
/// Allocation percentages fall back to the used amounts when the allocation
/// fields are not filled.
pub fn derive_hypervisor_metrics(raw: &HypervisorRecord) -> HypervisorMetrics {
    let cpu_ratio = ratio(raw.vcpus_used, raw.vcpus_total);
    let cpu_allocated = raw.vcpus_allocated.unwrap_or(raw.vcpus_used);
    let memory_ratio = ratio(raw.memory_mb_used, raw.memory_mb_total);
    let memory_allocated = raw.memory_mb_allocated.unwrap_or(raw.memory_mb_used);

    HypervisorMetrics {
        record: raw.clone(),
        cpu_usage_percent: round2(cpu_ratio * 100.0),
        cpu_allocation_percent: round2(ratio(cpu_allocated, raw.vcpus_total) * 100.0),
        cpu_overcommit_ratio: round2(cpu_ratio),
        cpu_overcommitted: cpu_ratio > 1.0,
        memory_usage_percent: round2(memory_ratio * 100.0),
        memory_allocation_percent: round2(ratio(memory_allocated, raw.memory_mb_total) * 100.0),
        memory_overcommit_ratio: round2(memory_ratio),
        memory_overcommitted: memory_ratio > 1.0,
        disk_usage_percent: round2(ratio(raw.local_gb_used, raw.local_gb_total) * 100.0),
    }
}

/// Fill allocation fields of hypervisors from instances placed on them.
///
/// Only instances in one of [ALLOCATING_STATUSES] are counted. Instances
/// without a known flavor are counted as active but add no resources.
pub fn allocate(hypervisors: &mut [HypervisorRecord], instances: &[InstanceRecord]) {
    for hv in hypervisors.iter_mut() {
        let mut vcpus = 0;
        let mut memory = 0;
        let mut count = 0;
        for inst in instances.iter().filter(|inst| {
            inst.hypervisor_hostname.as_deref() == Some(hv.hostname.as_str())
                && ALLOCATING_STATUSES.contains(&inst.status.as_str())
        }) {
            count += 1;
            if let Some(ref flavor) = inst.flavor {
                vcpus += u64::from(flavor.vcpus);
                memory += flavor.ram;
            } else {
                warn!(
                    "Flavor of instance {} on {} is unknown, its resources are not counted",
                    inst.id, hv.hostname
                );
            }
        }
        trace!(
            "Hypervisor {} has {} active instances with {} vCPUs and {} MiB allocated",
            hv.hostname,
            count,
            vcpus,
            memory
        );
        hv.vcpus_allocated = Some(vcpus);
        hv.memory_mb_allocated = Some(memory);
        hv.active_instances = Some(count);
    }
}

/// Parse a creation timestamp.
///
/// Accepts RFC 3339 and a naive ISO 8601 date and time (assumed UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.and_utc())
}

/// Elapsed time since creation.
///
/// `None` if the creation time is absent, unparseable or in the future.
pub fn derive_instance_uptime(created_at: Option<&str>, now: DateTime<Utc>) -> Option<Duration> {
    let created = match created_at.and_then(parse_timestamp) {
        Some(created) => created,
        None => {
            if let Some(value) = created_at {
                debug!("Cannot parse creation time {:?}", value);
            }
            return None;
        }
    };
    let elapsed = now.signed_duration_since(created);
    if elapsed < Duration::zero() {
        debug!("Creation time {} is in the future", created);
        None
    } else {
        Some(elapsed)
    }
}

/// Format an uptime as `H:MM:SS` or `N day(s), H:MM:SS`.
///
/// `None` is formatted as [UPTIME_UNAVAILABLE].
pub fn format_uptime(uptime: Option<Duration>) -> String {
    let total = match uptime {
        Some(value) if value >= Duration::zero() => value.num_seconds(),
        _ => return UPTIME_UNAVAILABLE.to_string(),
    };
    let days = total / 86400;
    let hours = total % 86400 / 3600;
    let minutes = total % 3600 / 60;
    let seconds = total % 60;
    match days {
        0 => format!("{}:{:02}:{:02}", hours, minutes, seconds),
        1 => format!("1 day, {}:{:02}:{:02}", hours, minutes, seconds),
        _ => format!("{} days, {}:{:02}:{:02}", days, hours, minutes, seconds),
    }
}

#[cfg(test)]
mod test {
    use chrono::{Duration, TimeZone, Utc};

    use super::{
        allocate, derive_hypervisor_metrics, derive_instance_uptime, format_uptime,
        HypervisorRecord,
    };
    use crate::inventory::{FlavorInfo, InstanceRecord};

    fn record(vcpus_total: u64, vcpus_used: u64) -> HypervisorRecord {
        HypervisorRecord {
            hostname: "compute-1".into(),
            vcpus_total,
            vcpus_used,
            ..HypervisorRecord::default()
        }
    }

    #[test]
    fn test_zero_capacity() {
        let metrics = derive_hypervisor_metrics(&HypervisorRecord {
            vcpus_used: 4,
            memory_mb_used: 1024,
            local_gb_used: 10,
            ..HypervisorRecord::default()
        });
        assert_eq!(metrics.cpu_usage_percent, 0.0);
        assert_eq!(metrics.cpu_allocation_percent, 0.0);
        assert_eq!(metrics.cpu_overcommit_ratio, 0.0);
        assert!(!metrics.cpu_overcommitted);
        assert_eq!(metrics.memory_usage_percent, 0.0);
        assert_eq!(metrics.memory_overcommit_ratio, 0.0);
        assert!(!metrics.memory_overcommitted);
        assert_eq!(metrics.disk_usage_percent, 0.0);
    }

    #[test]
    fn test_overcommit_boundary() {
        for total in [1, 2, 7, 16, 64, 1000] {
            assert!(!derive_hypervisor_metrics(&record(total, total)).cpu_overcommitted);
            assert!(derive_hypervisor_metrics(&record(total, total + 1)).cpu_overcommitted);
        }
    }

    #[test]
    fn test_flag_uses_unrounded_ratio() {
        // 1001/1000 rounds to 1.0 but is still overcommitted.
        let metrics = derive_hypervisor_metrics(&record(1000, 1001));
        assert_eq!(metrics.cpu_overcommit_ratio, 1.0);
        assert!(metrics.cpu_overcommitted);
    }

    #[test]
    fn test_example() {
        let metrics = derive_hypervisor_metrics(&HypervisorRecord {
            vcpus_total: 16,
            vcpus_used: 20,
            memory_mb_total: 65536,
            memory_mb_used: 32768,
            local_gb_total: 3,
            local_gb_used: 1,
            ..HypervisorRecord::default()
        });
        assert_eq!(metrics.cpu_overcommit_ratio, 1.25);
        assert!(metrics.cpu_overcommitted);
        assert_eq!(metrics.cpu_usage_percent, 125.0);
        assert_eq!(metrics.cpu_allocation_percent, 125.0);
        assert_eq!(metrics.memory_overcommit_ratio, 0.5);
        assert!(!metrics.memory_overcommitted);
        assert_eq!(metrics.memory_usage_percent, 50.0);
        assert_eq!(metrics.disk_usage_percent, 33.33);
    }

    #[test]
    fn test_allocation_percent() {
        let metrics = derive_hypervisor_metrics(&HypervisorRecord {
            vcpus_total: 8,
            vcpus_used: 2,
            vcpus_allocated: Some(12),
            memory_mb_total: 4096,
            memory_mb_used: 1024,
            memory_mb_allocated: Some(2048),
            ..HypervisorRecord::default()
        });
        assert_eq!(metrics.cpu_usage_percent, 25.0);
        assert_eq!(metrics.cpu_allocation_percent, 150.0);
        assert!(!metrics.cpu_overcommitted);
        assert_eq!(metrics.memory_allocation_percent, 50.0);
    }

    fn instance(id: &str, host: Option<&str>, status: &str, vcpus: u32, ram: u64) -> InstanceRecord {
        InstanceRecord {
            id: id.into(),
            status: status.into(),
            hypervisor_hostname: host.map(From::from),
            flavor: Some(FlavorInfo {
                id: "f1".into(),
                name: "m1.test".into(),
                vcpus,
                ram,
                disk: 10,
            }),
            ..InstanceRecord::default()
        }
    }

    #[test]
    fn test_allocate() {
        let mut hypervisors = vec![record(16, 0), {
            let mut other = record(8, 0);
            other.hostname = "compute-2".into();
            other
        }];
        let mut unknown_flavor = instance("5", Some("compute-1"), "ACTIVE", 0, 0);
        unknown_flavor.flavor = None;
        let instances = vec![
            instance("1", Some("compute-1"), "ACTIVE", 4, 8192),
            instance("2", Some("compute-1"), "PAUSED", 2, 2048),
            instance("3", Some("compute-1"), "SHUTOFF", 8, 16384),
            instance("4", None, "ACTIVE", 8, 16384),
            unknown_flavor,
            instance("6", Some("compute-2"), "SUSPENDED", 1, 512),
        ];
        allocate(&mut hypervisors, &instances);
        assert_eq!(hypervisors[0].vcpus_allocated, Some(6));
        assert_eq!(hypervisors[0].memory_mb_allocated, Some(10240));
        assert_eq!(hypervisors[0].active_instances, Some(3));
        assert_eq!(hypervisors[1].vcpus_allocated, Some(1));
        assert_eq!(hypervisors[1].memory_mb_allocated, Some(512));
        assert_eq!(hypervisors[1].active_instances, Some(1));
    }

    #[test]
    fn test_uptime() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 12, 30, 15).unwrap();
        assert_eq!(
            derive_instance_uptime(Some("2024-03-05T10:00:00Z"), now),
            Some(Duration::seconds(2 * 3600 + 30 * 60 + 15))
        );
        assert_eq!(
            derive_instance_uptime(Some("2024-03-05T12:30:15+02:00"), now),
            Some(Duration::hours(2))
        );
        assert_eq!(
            derive_instance_uptime(Some("2024-03-04T12:30:15.000000"), now),
            Some(Duration::days(1))
        );
        assert_eq!(derive_instance_uptime(None, now), None);
        assert_eq!(derive_instance_uptime(Some("yesterday"), now), None);
        assert_eq!(derive_instance_uptime(Some("2024-03-06T00:00:00Z"), now), None);
        assert_eq!(
            derive_instance_uptime(Some("2024-03-05T12:30:15Z"), now),
            Some(Duration::zero())
        );
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(None), "unavailable");
        assert_eq!(format_uptime(Some(Duration::zero())), "0:00:00");
        assert_eq!(format_uptime(Some(Duration::seconds(3725))), "1:02:05");
        assert_eq!(
            format_uptime(Some(Duration::days(1) + Duration::seconds(59))),
            "1 day, 0:00:59"
        );
        assert_eq!(
            format_uptime(Some(Duration::days(12) + Duration::hours(23))),
            "12 days, 23:00:00"
        );
    }
}
