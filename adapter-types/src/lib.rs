// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared data model for the on-demand-broker service adapter
//!
//! Two halves live here: the BOSH deployment manifest the adapter emits
//! ([`manifest`]) and the broker-supplied inputs it consumes ([`service`]).
//! Both are plain serde types; all decision logic lives in the
//! `manifest-composer` crate.

pub mod manifest;
pub mod service;

pub use manifest::{
    ConsumedLink, Credential, InstanceGroup, Job, Manifest,
    ManifestProperties, MaxInFlight, Network, Release, Route, RouteRegistrar,
    Stemcell, UpdatePolicy,
};
pub use service::{
    InstanceGroupTemplate, Plan, PlanProperties, RequestParameters,
    ServiceDeployment, ServiceRelease, ServiceStemcell, StorageParameters,
};
