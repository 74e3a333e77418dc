// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Manifest composition for the on-demand storage service
//!
//! Given the broker's inputs (service deployment descriptor, plan, request
//! parameters, and on updates the previously generated manifest), this crate
//! deterministically assembles the deployment manifest: which storage backend
//! to run, how many instances, which jobs bind to which releases, and the
//! routing and credential properties the deployment needs.
//!
//! The pipeline is a single synchronous pass:
//!
//! 1. parameter resolution ([`params`]): effective parameters, instance
//!    count, and fresh-vs-update;
//! 2. deployment-type resolution ([`backend`]): backend variant and its
//!    validation against instance count and credentials;
//! 3. topology assembly ([`topology`]): instance groups, job/release
//!    binding, stemcell, cross-deployment routing link;
//! 4. property composition ([`properties`]): domain, route registration,
//!    credential block;
//! 5. finalization ([`generate_manifest`]): the assembled [`Manifest`].
//!
//! Every failure aborts the pass; there is no partial manifest.

use adapter_types::{
    Manifest, ManifestProperties, Plan, Release, RequestParameters,
    ServiceDeployment,
};
use slog::{debug, Logger};
use std::collections::BTreeMap;
use thiserror::Error;

mod backend;
pub mod defaults;
mod params;
mod properties;
mod topology;

pub use backend::DeploymentType;
pub use topology::TopologyError;

/// Describes errors which may occur while composing a manifest.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error(
        "service parameters with \"accesskey\" and \"secretkey\" must be \
         provided when creating an instance"
    )]
    ParametersMissing,

    #[error(
        "previous manifest carries no stored service parameters; updating \
         this deployment is not supported"
    )]
    StoredParametersMissing,

    #[error("previous manifest defines no instance groups")]
    PreviousInstanceGroupsMissing,

    #[error(
        "plan property \"instances\" ({value:?}) is not a valid instance \
         count"
    )]
    InstanceCountInvalid { value: String },

    #[error(
        "service parameters cannot be changed after an instance is created; \
         reconfigure through the operator workflow instead"
    )]
    ParametersImmutable,

    #[error("{value:?} deployment type is not supported")]
    UnsupportedDeploymentType { value: String },

    #[error(
        "deployment type \"{deployment_type}\" requires exactly one \
         instance, but the deployment has {instance_count}"
    )]
    MultiNodeGateway {
        deployment_type: DeploymentType,
        instance_count: usize,
    },

    #[error(
        "\"googlecredentials\" must be provided for GCS gateway deployments"
    )]
    GoogleCredentialsMissing,

    #[error("required service parameter {field:?} was not provided")]
    CredentialMissing { field: &'static str },

    #[error("{operation} is not supported")]
    OperationUnsupported { operation: &'static str },

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// Failure taxonomy, one kind per class of abort.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InputMissing,
    InputMalformed,
    ValidationRejected,
    UnsupportedOperation,
    Propagated,
}

impl ComposeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ComposeError::ParametersMissing
            | ComposeError::StoredParametersMissing
            | ComposeError::CredentialMissing { .. } => ErrorKind::InputMissing,
            ComposeError::PreviousInstanceGroupsMissing
            | ComposeError::InstanceCountInvalid { .. } => {
                ErrorKind::InputMalformed
            }
            ComposeError::ParametersImmutable
            | ComposeError::UnsupportedDeploymentType { .. }
            | ComposeError::MultiNodeGateway { .. }
            | ComposeError::GoogleCredentialsMissing => {
                ErrorKind::ValidationRejected
            }
            ComposeError::OperationUnsupported { .. } => {
                ErrorKind::UnsupportedOperation
            }
            ComposeError::Topology(_) => ErrorKind::Propagated,
        }
    }
}

/// Composes the deployment manifest for one provisioning or update request.
///
/// This is a pure function of its inputs: composing twice with identical
/// inputs (including an identical previous manifest) yields an identical
/// manifest, so the broker may safely retry an ambiguous call.
pub fn generate_manifest(
    log: &Logger,
    service_deployment: &ServiceDeployment,
    plan: &Plan,
    request: &RequestParameters,
    previous_manifest: Option<&Manifest>,
) -> Result<Manifest, ComposeError> {
    // The broker replays an empty manifest when none has been generated yet;
    // treat it the same as an absent one.
    let previous = previous_manifest.filter(|manifest| !manifest.name.is_empty());

    let resolved = params::resolve(plan, request, previous)?;
    let deployment_type =
        backend::resolve(&resolved.parameters, resolved.instance_count)?;
    debug!(
        log, "resolved deployment configuration";
        "deployment" => &service_deployment.deployment_name,
        "deployment_type" => %deployment_type,
        "instances" => resolved.instance_count,
        "fresh" => resolved.fresh,
    );

    let jobs_by_group = BTreeMap::from([(
        defaults::SERVER_INSTANCE_GROUP.to_string(),
        backend::instance_group_jobs(deployment_type),
    )]);
    let stemcell = topology::stemcell(service_deployment)?;
    let mut instance_groups = topology::instance_groups(
        plan,
        &service_deployment.releases,
        resolved.instance_count,
        &jobs_by_group,
    )?;
    topology::link_route_registrar(
        &mut instance_groups,
        &plan.properties.deployment,
    );

    let domain = properties::external_domain(
        &service_deployment.deployment_name,
        &plan.properties.domain,
        resolved.parameters.subdomain.as_deref(),
    );
    let credential = properties::credential(&resolved.parameters)?;
    let route_registrar = properties::route_registrar(&domain);

    Ok(Manifest {
        name: service_deployment.deployment_name.clone(),
        releases: service_deployment
            .releases
            .iter()
            .map(|release| Release {
                name: release.name.clone(),
                version: release.version.clone(),
            })
            .collect(),
        stemcells: vec![stemcell],
        instance_groups,
        update: plan.update.clone(),
        properties: ManifestProperties {
            parameters: Some(resolved.parameters),
            pcf_tile_version: plan.properties.pcf_tile_version.clone(),
            domain: domain.clone(),
            route_registrar,
            credential,
        },
    })
}

/// Derives the dashboard URL from an already-composed manifest.
pub fn dashboard_url(manifest: &Manifest) -> String {
    format!("https://{}", manifest.properties.domain)
}
