// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broker-supplied inputs to manifest generation
//!
//! The broker hands the adapter three JSON documents per invocation: the
//! service deployment descriptor, the selected plan, and the caller's request
//! parameters.  On updates it also replays the previously generated manifest.
//! These types decode those documents once, at the boundary; nothing
//! downstream re-interprets loosely-typed values.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The deployment the broker is asking the adapter to describe: its name and
/// the releases and stemcells the director has available for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ServiceDeployment {
    pub deployment_name: String,
    pub releases: Vec<ServiceRelease>,
    pub stemcells: Vec<ServiceStemcell>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ServiceRelease {
    pub name: String,
    pub version: String,
    /// Job names this release provides.  Used to bind each required job to
    /// the one release that carries it.
    #[serde(default)]
    pub jobs: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ServiceStemcell {
    #[serde(rename = "stemcell_os")]
    pub os: String,
    #[serde(rename = "stemcell_version")]
    pub version: String,
}

/// The service tier selected at provisioning time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Plan {
    pub instance_groups: Vec<InstanceGroupTemplate>,
    pub properties: PlanProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<crate::manifest::UpdatePolicy>,
}

/// VM and network placement for one instance group, before jobs and the
/// resolved instance count are bound to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InstanceGroupTemplate {
    pub name: String,
    pub instances: usize,
    pub vm_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_disk_type: Option<String>,
    pub networks: Vec<String>,
    #[serde(default)]
    pub azs: Vec<String>,
}

/// Plan-level properties configured by the operator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlanProperties {
    /// Instance count for fresh deployments, as configured in the tile.
    /// A numeric string on the wire.
    pub instances: String,
    /// Domain suffix under which the deployment is routable.
    pub domain: String,
    /// Name of the deployment whose `nats` job the route registrar consumes.
    pub deployment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcf_tile_version: Option<String>,
}

/// The caller's request body.  Only the nested `parameters` mapping is
/// meaningful to the adapter; sibling keys the broker adds are ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RequestParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<StorageParameters>,
}

/// Caller-supplied service configuration.
///
/// Every field is optional at decode time; which ones are required depends on
/// the operation (`accesskey`/`secretkey` always, `googlecredentials` only
/// for the GCS gateway) and is enforced by the composer, not here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StorageParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accesskey: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secretkey: Option<String>,
    /// Backend selector; settable only at instance creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub googlecredentials: Option<String>,
}
