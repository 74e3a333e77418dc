// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Storage backend variant selection and validation.

use crate::defaults::{
    AZURE_GATEWAY_JOB, GCS_GATEWAY_JOB, PROCESS_SUPERVISOR_JOB,
    ROUTE_REGISTRAR_JOB, SERVER_JOB,
};
use crate::ComposeError;
use adapter_types::StorageParameters;
use std::fmt;

/// The storage backend a deployment runs.
///
/// `Fs` and `Erasure` run local storage; `Azure` and `Gcs` proxy to an
/// external cloud provider and are restricted to single-instance
/// deployments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeploymentType {
    Fs,
    Erasure,
    Azure,
    Gcs,
}

impl DeploymentType {
    fn from_selector(value: &str) -> Result<Self, ComposeError> {
        match value {
            "fs" => Ok(DeploymentType::Fs),
            "erasure" => Ok(DeploymentType::Erasure),
            "azure" => Ok(DeploymentType::Azure),
            "gcs" => Ok(DeploymentType::Gcs),
            other => Err(ComposeError::UnsupportedDeploymentType {
                value: other.to_string(),
            }),
        }
    }

    /// The server job this variant deploys.
    pub fn server_job(&self) -> &'static str {
        match self {
            DeploymentType::Fs | DeploymentType::Erasure => SERVER_JOB,
            DeploymentType::Azure => AZURE_GATEWAY_JOB,
            DeploymentType::Gcs => GCS_GATEWAY_JOB,
        }
    }

    fn single_node_only(&self) -> bool {
        matches!(self, DeploymentType::Azure | DeploymentType::Gcs)
    }
}

impl fmt::Display for DeploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeploymentType::Fs => "fs",
            DeploymentType::Erasure => "erasure",
            DeploymentType::Azure => "azure",
            DeploymentType::Gcs => "gcs",
        };
        write!(f, "{}", name)
    }
}

/// Resolves which backend variant to deploy.
///
/// Single-instance deployments default to `fs`, anything larger to
/// `erasure`.  An explicit `gateway` parameter overrides the default and is
/// then validated: the cloud gateways only ever run single-instance, and the
/// GCS gateway cannot start without credentials for the backing bucket.
pub(crate) fn resolve(
    parameters: &StorageParameters,
    instance_count: usize,
) -> Result<DeploymentType, ComposeError> {
    let mut deployment_type = if instance_count == 1 {
        DeploymentType::Fs
    } else {
        DeploymentType::Erasure
    };
    if let Some(selector) = &parameters.gateway {
        deployment_type = DeploymentType::from_selector(selector)?;
    }

    if deployment_type.single_node_only() && instance_count != 1 {
        return Err(ComposeError::MultiNodeGateway {
            deployment_type,
            instance_count,
        });
    }
    if deployment_type == DeploymentType::Gcs
        && parameters
            .googlecredentials
            .as_deref()
            .map_or(true, str::is_empty)
    {
        return Err(ComposeError::GoogleCredentialsMissing);
    }
    Ok(deployment_type)
}

/// The full job list for the (single) server instance group: the resolved
/// server job plus the fixed sidecars.
pub(crate) fn instance_group_jobs(
    deployment_type: DeploymentType,
) -> Vec<String> {
    vec![
        deployment_type.server_job().to_string(),
        ROUTE_REGISTRAR_JOB.to_string(),
        PROCESS_SUPERVISOR_JOB.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parameters(
        gateway: Option<&str>,
        googlecredentials: Option<&str>,
    ) -> StorageParameters {
        StorageParameters {
            accesskey: Some("AKIA".to_string()),
            secretkey: Some("secret".to_string()),
            gateway: gateway.map(str::to_string),
            subdomain: None,
            googlecredentials: googlecredentials.map(str::to_string),
        }
    }

    #[test]
    fn defaults_follow_instance_count() {
        let none = parameters(None, None);
        assert_eq!(resolve(&none, 1).unwrap(), DeploymentType::Fs);
        assert_eq!(resolve(&none, 2).unwrap(), DeploymentType::Erasure);
        assert_eq!(resolve(&none, 8).unwrap(), DeploymentType::Erasure);
    }

    #[test]
    fn explicit_selector_overrides_the_default() {
        assert_eq!(
            resolve(&parameters(Some("erasure"), None), 1).unwrap(),
            DeploymentType::Erasure
        );
        assert_eq!(
            resolve(&parameters(Some("azure"), None), 1).unwrap(),
            DeploymentType::Azure
        );
    }

    #[test]
    fn unknown_selector_is_rejected_by_name() {
        let error =
            resolve(&parameters(Some("s3"), None), 1).unwrap_err();
        assert_eq!(error.to_string(), "\"s3\" deployment type is not supported");
        assert_eq!(error.kind(), crate::ErrorKind::ValidationRejected);
    }

    #[test]
    fn cloud_gateways_are_single_node_only() {
        let error =
            resolve(&parameters(Some("azure"), None), 3).unwrap_err();
        assert_eq!(
            error.to_string(),
            "deployment type \"azure\" requires exactly one instance, but \
             the deployment has 3"
        );

        let error = resolve(&parameters(Some("gcs"), Some("{}")), 2)
            .unwrap_err();
        assert!(matches!(
            error,
            ComposeError::MultiNodeGateway {
                deployment_type: DeploymentType::Gcs,
                instance_count: 2,
            }
        ));
    }

    #[test]
    fn gcs_requires_credentials() {
        let error = resolve(&parameters(Some("gcs"), None), 1).unwrap_err();
        assert_eq!(
            error.to_string(),
            "\"googlecredentials\" must be provided for GCS gateway \
             deployments"
        );

        // An empty blob is as good as no blob.
        let error =
            resolve(&parameters(Some("gcs"), Some("")), 1).unwrap_err();
        assert!(matches!(error, ComposeError::GoogleCredentialsMissing));

        assert_eq!(
            resolve(&parameters(Some("gcs"), Some("{\"type\": \"blob\"}")), 1)
                .unwrap(),
            DeploymentType::Gcs
        );
    }

    #[test]
    fn server_jobs_match_the_variant() {
        assert_eq!(DeploymentType::Fs.server_job(), "minio-server");
        assert_eq!(DeploymentType::Erasure.server_job(), "minio-server");
        assert_eq!(DeploymentType::Azure.server_job(), "minio-azure");
        assert_eq!(DeploymentType::Gcs.server_job(), "minio-gcs");
    }

    #[test]
    fn sidecars_ride_along_with_every_variant() {
        let jobs = instance_group_jobs(DeploymentType::Erasure);
        assert_eq!(jobs, vec!["minio-server", "route_registrar", "bpm"]);
    }
}
