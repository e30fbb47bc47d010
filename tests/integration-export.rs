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

use std::fs;
use std::sync::{Mutex, Once};

use async_trait::async_trait;
use os_inventory::block_storage::Volume;
use os_inventory::cloud::CloudService;
use os_inventory::compute::{Flavor, Hypervisor, Server};
use os_inventory::export::{HYPERVISOR_HEADERS, INSTANCE_HEADERS};
use os_inventory::identity::Project;
use os_inventory::image::Image;
use os_inventory::inventory::{self, ExportOptions};
use os_inventory::{ApiError, Error, Result};
use serde_json::json;
use tempfile::TempDir;

static INIT: Once = Once::new();

fn set_up() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

#[derive(Debug, Default)]
struct FakeCloud {
    servers: Vec<Server>,
    flavors: Vec<Flavor>,
    extra_flavors: Vec<Flavor>,
    images: Vec<Image>,
    hypervisors: Vec<Hypervisor>,
    projects: Vec<Project>,
    volumes: Vec<Volume>,
    fail_hypervisors: bool,
    fail_volumes: bool,
    flavor_requests: Mutex<Vec<String>>,
    image_requests: Mutex<usize>,
    project_requests: Mutex<usize>,
    volume_requests: Mutex<usize>,
}

#[async_trait]
impl CloudService for FakeCloud {
    async fn list_hypervisors(&self) -> Result<Vec<Hypervisor>> {
        if self.fail_hypervisors {
            Err(ApiError::Unauthorized("Policy does not allow listing hypervisors".into()).into())
        } else {
            Ok(self.hypervisors.clone())
        }
    }

    async fn list_instances(&self) -> Result<Vec<Server>> {
        Ok(self.servers.clone())
    }

    async fn list_flavors(&self) -> Result<Vec<Flavor>> {
        Ok(self.flavors.clone())
    }

    async fn get_flavor(&self, id: &str) -> Result<Flavor> {
        self.flavor_requests.lock().unwrap().push(id.to_string());
        self.extra_flavors
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Flavor {} not found", id)).into())
    }

    async fn list_images(&self) -> Result<Vec<Image>> {
        *self.image_requests.lock().unwrap() += 1;
        Ok(self.images.clone())
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        *self.project_requests.lock().unwrap() += 1;
        Ok(self.projects.clone())
    }

    async fn list_volumes(&self) -> Result<Vec<Volume>> {
        *self.volume_requests.lock().unwrap() += 1;
        if self.fail_volumes {
            Err(ApiError::ConnectionFailed("No block-storage endpoint".into()).into())
        } else {
            Ok(self.volumes.clone())
        }
    }
}

fn fake_cloud() -> FakeCloud {
    let servers = serde_json::from_value(json!([
        {
            "id": "00000000-0000-0000-0000-000000000001",
            "name": "web-1",
            "status": "ACTIVE",
            "tenant_id": "project-a",
            "user_id": "user-a",
            "OS-EXT-STS:power_state": 1,
            "OS-EXT-STS:vm_state": "active",
            "OS-EXT-AZ:availability_zone": "nova",
            "OS-EXT-SRV-ATTR:hypervisor_hostname": "compute-1",
            "flavor": {"id": "small"},
            "image": {"id": "cirros"},
            "created": "2024-01-01T00:00:00Z",
            "addresses": {
                "private": [
                    {"addr": "10.0.0.5", "OS-EXT-IPS:type": "fixed"},
                    {"addr": "172.24.4.10", "OS-EXT-IPS:type": "floating"}
                ]
            },
            "os-extended-volumes:volumes_attached": [{"id": "vol-1"}],
            "metadata": {"role": "web"}
        },
        {
            "id": "00000000-0000-0000-0000-000000000002",
            "name": "db-1",
            "status": "PAUSED",
            "tenant_id": "project-a",
            "user_id": "user-a",
            "OS-EXT-SRV-ATTR:hypervisor_hostname": "compute-1",
            "flavor": {"id": "private-large"},
            "image": ""
        },
        {
            "id": "00000000-0000-0000-0000-000000000003",
            "name": "orphan",
            "status": "ACTIVE",
            "tenant_id": "project-b",
            "user_id": "user-b",
            "OS-EXT-SRV-ATTR:hypervisor_hostname": "compute-2",
            "flavor": {"id": "deleted"}
        },
        {
            "id": "00000000-0000-0000-0000-000000000004",
            "name": "stopped",
            "status": "SHUTOFF",
            "tenant_id": "project-b",
            "user_id": "user-b",
            "OS-EXT-SRV-ATTR:hypervisor_hostname": "compute-2",
            "flavor": {"id": "small"}
        }
    ]))
    .unwrap();
    let flavors = serde_json::from_value(json!([
        {"id": "small", "name": "m1.small", "vcpus": 2, "ram": 2048, "disk": 20}
    ]))
    .unwrap();
    let extra_flavors = serde_json::from_value(json!([
        {"id": "private-large", "name": "x1.large", "vcpus": 16, "ram": 32768, "disk": 100}
    ]))
    .unwrap();
    let images = serde_json::from_value(json!([
        {"id": "cirros", "name": "cirros-0.6.2", "status": "active"}
    ]))
    .unwrap();
    let hypervisors = serde_json::from_value(json!([
        {
            "id": 1,
            "hypervisor_hostname": "compute-1",
            "hypervisor_type": "QEMU",
            "state": "up",
            "status": "enabled",
            "vcpus": 16,
            "vcpus_used": 20,
            "memory_mb": 65536,
            "memory_mb_used": 32768,
            "local_gb": 400,
            "local_gb_used": 100,
            "running_vms": 2,
            "host_ip": "192.168.1.11"
        },
        {
            "id": 2,
            "hypervisor_hostname": "compute-2",
            "hypervisor_type": "QEMU",
            "state": "down",
            "status": "disabled",
            "vcpus": 0,
            "vcpus_used": 0,
            "memory_mb": 0,
            "memory_mb_used": 0,
            "local_gb": 0,
            "local_gb_used": 0,
            "running_vms": 0,
            "host_ip": null
        }
    ]))
    .unwrap();
    let projects = serde_json::from_value(json!([
        {"id": "project-a", "name": "alpha", "domain_id": "default"}
    ]))
    .unwrap();
    let volumes = serde_json::from_value(json!([
        {"id": "vol-1", "name": "web-data", "size": 20, "status": "in-use"},
        {"id": "vol-2", "name": "", "size": 1, "status": "available"}
    ]))
    .unwrap();

    FakeCloud {
        servers,
        flavors,
        extra_flavors,
        images,
        hypervisors,
        projects,
        volumes,
        ..FakeCloud::default()
    }
}

fn options(dir: &TempDir) -> ExportOptions {
    ExportOptions {
        instances_file: dir.path().join("instances.csv"),
        hypervisors_file: dir.path().join("hypervisors.csv"),
        ..ExportOptions::default()
    }
}

fn read_csv(path: &std::path::Path) -> (Vec<String>, Vec<csv::StringRecord>) {
    let mut reader = csv::Reader::from_path(path).expect("Cannot open CSV file");
    let headers = reader
        .headers()
        .expect("No headers")
        .iter()
        .map(String::from)
        .collect();
    let rows = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()
        .expect("Invalid CSV file");
    (headers, rows)
}

#[tokio::test]
async fn test_export_everything() {
    set_up();
    let cloud = fake_cloud();
    let dir = TempDir::new().unwrap();
    let options = options(&dir);

    let summary = inventory::export(&cloud, &options)
        .await
        .expect("Export failed");
    assert_eq!(summary.instances, Some(4));
    assert_eq!(summary.hypervisors, Some(2));

    // Flavors missing from the list are fetched once each.
    let mut requested = cloud.flavor_requests.lock().unwrap().clone();
    requested.sort();
    assert_eq!(requested, vec!["deleted", "private-large"]);

    let (headers, rows) = read_csv(&options.instances_file);
    assert_eq!(headers, INSTANCE_HEADERS);
    assert_eq!(rows.len(), 4);

    let web = &rows[0];
    assert_eq!(&web[1], "web-1");
    assert_eq!(&web[3], "RUNNING");
    assert_eq!(&web[5], "project-a");
    assert_eq!(&web[6], "alpha");
    assert_eq!(&web[11], "m1.small");
    assert_eq!(&web[16], "cirros-0.6.2");
    assert_eq!(&web[17], "172.24.4.10");
    assert_eq!(&web[19], "ID:vol-1, Name:web-data, Size:20GB");
    assert_ne!(&web[21], "unavailable");

    let db = &rows[1];
    assert_eq!(&db[11], "x1.large");
    assert_eq!(&db[12], "16");
    assert_eq!(&db[15], "N/A");
    assert_eq!(&db[19], "");
    assert_eq!(&db[21], "unavailable");

    let orphan = &rows[2];
    assert_eq!(&orphan[6], "N/A");
    assert_eq!(&orphan[10], "deleted");
    assert_eq!(&orphan[11], "N/A");
    assert_eq!(&orphan[12], "N/A");

    assert_eq!(*cloud.project_requests.lock().unwrap(), 1);
    assert_eq!(*cloud.volume_requests.lock().unwrap(), 1);

    let (headers, rows) = read_csv(&options.hypervisors_file);
    assert_eq!(headers, HYPERVISOR_HEADERS);
    assert_eq!(rows.len(), 2);

    let first = &rows[0];
    assert_eq!(&first[1], "compute-1");
    assert_eq!(&first[8], "18");
    assert_eq!(&first[10], "1.25");
    assert_eq!(&first[14], "34816");
    assert_eq!(&first[16], "0.5");
    assert_eq!(&first[19], "25.0");
    assert_eq!(&first[21], "2");
    assert_eq!(&first[23], "Yes");
    assert_eq!(&first[24], "No");

    let second = &rows[1];
    assert_eq!(&second[7], "0.0");
    assert_eq!(&second[10], "0.0");
    // One active instance with an unknown flavor, the stopped one is ignored.
    assert_eq!(&second[21], "1");
    assert_eq!(&second[22], "N/A");
    assert_eq!(&second[23], "No");
}

#[tokio::test]
async fn test_export_hypervisors_only() {
    set_up();
    let cloud = fake_cloud();
    let dir = TempDir::new().unwrap();
    let options = ExportOptions {
        export_instances: false,
        ..options(&dir)
    };

    let summary = inventory::export(&cloud, &options)
        .await
        .expect("Export failed");
    assert_eq!(summary.instances, None);
    assert_eq!(summary.hypervisors, Some(2));
    assert!(!options.instances_file.exists());
    assert_eq!(*cloud.image_requests.lock().unwrap(), 0);
    assert_eq!(*cloud.project_requests.lock().unwrap(), 0);
    assert_eq!(*cloud.volume_requests.lock().unwrap(), 0);

    let (_, rows) = read_csv(&options.hypervisors_file);
    assert_eq!(&rows[0][8], "18");
}

#[tokio::test]
async fn test_export_empty_cloud() {
    set_up();
    let cloud = FakeCloud::default();
    let dir = TempDir::new().unwrap();
    let options = options(&dir);

    let summary = inventory::export(&cloud, &options)
        .await
        .expect("Export failed");
    assert_eq!(summary.instances, Some(0));
    // No volumes are attached, so they are not listed.
    assert_eq!(*cloud.volume_requests.lock().unwrap(), 0);
    assert_eq!(summary.hypervisors, Some(0));

    let contents = fs::read_to_string(&options.instances_file).unwrap();
    assert_eq!(contents, format!("{}\n", INSTANCE_HEADERS.join(",")));
    let contents = fs::read_to_string(&options.hypervisors_file).unwrap();
    assert_eq!(contents, format!("{}\n", HYPERVISOR_HEADERS.join(",")));
}

#[tokio::test]
async fn test_export_api_failure() {
    set_up();
    let cloud = FakeCloud {
        fail_hypervisors: true,
        ..fake_cloud()
    };
    let dir = TempDir::new().unwrap();
    let options = options(&dir);

    match inventory::export(&cloud, &options).await {
        Err(Error::Api(ApiError::Unauthorized(..))) => (),
        other => panic!("Unexpected result {:?}", other),
    }
    // Neither file is written when any data cannot be fetched.
    assert!(!options.instances_file.exists());
    assert!(!options.hypervisors_file.exists());
}

#[tokio::test]
async fn test_export_without_volume_details() {
    set_up();
    let cloud = FakeCloud {
        fail_volumes: true,
        ..fake_cloud()
    };
    let dir = TempDir::new().unwrap();
    let options = ExportOptions {
        export_hypervisors: false,
        ..options(&dir)
    };

    let summary = inventory::export(&cloud, &options)
        .await
        .expect("Export failed");
    assert_eq!(summary.instances, Some(4));

    let (_, rows) = read_csv(&options.instances_file);
    assert_eq!(&rows[0][6], "alpha");
    assert_eq!(&rows[0][19], "ID:vol-1");
}

#[tokio::test]
async fn test_export_nothing() {
    set_up();
    let cloud = fake_cloud();
    let dir = TempDir::new().unwrap();
    let options = ExportOptions {
        export_instances: false,
        export_hypervisors: false,
        ..options(&dir)
    };

    let summary = inventory::export(&cloud, &options)
        .await
        .expect("Export failed");
    assert_eq!(summary.instances, None);
    assert_eq!(summary.hypervisors, None);
    assert!(!options.instances_file.exists());
}
