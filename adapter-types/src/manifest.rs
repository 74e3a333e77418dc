// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BOSH deployment manifest model
//!
//! This is the subset of the BOSH manifest schema the adapter produces: one
//! deployment with a flat release list, a single aliased stemcell, instance
//! groups whose jobs carry at most a `consumes` block, an optional update
//! policy, and a typed top-level property block.  Field names match the wire
//! format, so these types serialize directly to the YAML the orchestrator
//! expects.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A complete deployment manifest, ready for YAML serialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Manifest {
    pub name: String,
    pub releases: Vec<Release>,
    pub stemcells: Vec<Stemcell>,
    pub instance_groups: Vec<InstanceGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<UpdatePolicy>,
    pub properties: ManifestProperties,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Release {
    pub name: String,
    pub version: String,
}

/// A stemcell binding.  The `alias` is the name instance groups use to refer
/// to it; the OS and version come from the service deployment descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Stemcell {
    pub alias: String,
    pub os: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InstanceGroup {
    pub name: String,
    pub instances: usize,
    pub jobs: Vec<Job>,
    pub vm_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_disk_type: Option<String>,
    pub stemcell: String,
    pub networks: Vec<Network>,
    pub azs: Vec<String>,
}

/// A job bound to the release that provides it.  The only per-job
/// configuration the adapter emits is a `consumes` block; all service
/// properties are attached at the manifest level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Job {
    pub name: String,
    pub release: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub consumes: BTreeMap<String, ConsumedLink>,
}

impl Job {
    /// Redirects one of this job's consumed links to a provider job in a
    /// separately deployed manifest.
    pub fn consume_from_deployment(
        &mut self,
        link: &str,
        provider: &str,
        deployment: &str,
    ) {
        self.consumes.insert(
            link.to_string(),
            ConsumedLink {
                from: provider.to_string(),
                deployment: Some(deployment.to_string()),
            },
        );
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConsumedLink {
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Network {
    pub name: String,
}

/// Rollout policy, passed through from the plan without interpretation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UpdatePolicy {
    pub canaries: usize,
    pub canary_watch_time: String,
    pub update_watch_time: String,
    pub max_in_flight: MaxInFlight,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<bool>,
}

/// The orchestrator accepts `max_in_flight` either as an instance count or
/// as a percentage string like `"30%"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum MaxInFlight {
    Instances(usize),
    Percentage(String),
}

/// Top-level manifest properties.
///
/// `parameters` is optional at the type level only because manifests written
/// before parameter storage existed do not carry it; the composer reports
/// that case as a distinct error rather than a decode failure.  Manifests
/// produced by this adapter always populate it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ManifestProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<crate::service::StorageParameters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcf_tile_version: Option<String>,
    pub domain: String,
    pub route_registrar: RouteRegistrar,
    pub credential: Credential,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RouteRegistrar {
    pub routes: Vec<Route>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Route {
    pub name: String,
    pub port: u16,
    pub registration_interval: String,
    pub uris: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Credential {
    pub accesskey: String,
    pub secretkey: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub googlecredentials: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_yaml_round_trips() {
        let manifest = Manifest {
            name: "service-instance_abc".to_string(),
            releases: vec![Release {
                name: "minio".to_string(),
                version: "9".to_string(),
            }],
            stemcells: vec![Stemcell {
                alias: "os-stemcell".to_string(),
                os: "ubuntu-xenial".to_string(),
                version: "170.19".to_string(),
            }],
            instance_groups: vec![InstanceGroup {
                name: "minio-ig".to_string(),
                instances: 1,
                jobs: vec![Job {
                    name: "minio-server".to_string(),
                    release: "minio".to_string(),
                    consumes: BTreeMap::new(),
                }],
                vm_type: "medium".to_string(),
                persistent_disk_type: Some("10GB".to_string()),
                stemcell: "os-stemcell".to_string(),
                networks: vec![Network { name: "default".to_string() }],
                azs: vec!["z1".to_string()],
            }],
            update: Some(UpdatePolicy {
                canaries: 1,
                canary_watch_time: "30000-240000".to_string(),
                update_watch_time: "30000-240000".to_string(),
                max_in_flight: MaxInFlight::Instances(4),
                serial: None,
            }),
            properties: ManifestProperties {
                parameters: None,
                pcf_tile_version: None,
                domain: "abc.example.com".to_string(),
                route_registrar: RouteRegistrar {
                    routes: vec![Route {
                        name: "route".to_string(),
                        port: 9000,
                        registration_interval: "20s".to_string(),
                        uris: vec!["abc.example.com".to_string()],
                    }],
                },
                credential: Credential {
                    accesskey: "AKIA".to_string(),
                    secretkey: "secret".to_string(),
                    googlecredentials: None,
                },
            },
        };

        let yaml = serde_yaml::to_string(&manifest).unwrap();
        let parsed: Manifest = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(manifest, parsed);

        // Empty optional blocks stay off the wire entirely.
        assert!(!yaml.contains("consumes"));
        assert!(!yaml.contains("serial"));
        assert!(!yaml.contains("parameters"));
    }

    #[test]
    fn max_in_flight_accepts_count_or_percentage() {
        let counted: UpdatePolicy = serde_yaml::from_str(
            "canaries: 1\n\
             canary_watch_time: 30000-240000\n\
             update_watch_time: 30000-240000\n\
             max_in_flight: 4\n",
        )
        .unwrap();
        assert_eq!(counted.max_in_flight, MaxInFlight::Instances(4));

        let percentage: UpdatePolicy = serde_yaml::from_str(
            "canaries: 1\n\
             canary_watch_time: 30000-240000\n\
             update_watch_time: 30000-240000\n\
             max_in_flight: \"30%\"\n\
             serial: true\n",
        )
        .unwrap();
        assert_eq!(
            percentage.max_in_flight,
            MaxInFlight::Percentage("30%".to_string())
        );
        assert_eq!(percentage.serial, Some(true));
    }

    #[test]
    fn consumed_links_serialize_under_the_job() {
        let mut job = Job {
            name: "route_registrar".to_string(),
            release: "routing".to_string(),
            consumes: BTreeMap::new(),
        };
        job.consume_from_deployment("nats", "nats", "cf-deployment");

        let yaml = serde_yaml::to_string(&job).unwrap();
        let parsed: Job = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(
            parsed.consumes.get("nats"),
            Some(&ConsumedLink {
                from: "nats".to_string(),
                deployment: Some("cf-deployment".to_string()),
            })
        );
    }
}
