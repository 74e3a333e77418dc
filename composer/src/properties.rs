// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Composition of the externally visible manifest properties: the routable
//! domain, the route-registrar entry, and the credential block.

use crate::defaults::{
    INSTANCE_NAME_PREFIX, ROUTE_NAME, ROUTE_REGISTRATION_INTERVAL,
    SERVER_PORT, STORAGE_SUBDOMAIN_LABEL,
};
use crate::ComposeError;
use adapter_types::{Credential, Route, RouteRegistrar, StorageParameters};

/// The domain the deployment registers with the router.
///
/// By default this is the deployment's instance GUID (the broker's
/// `service-instance_` prefix stripped) under the plan's domain suffix.  A
/// caller-chosen subdomain nests under the fixed storage label instead.
pub(crate) fn external_domain(
    deployment_name: &str,
    domain_suffix: &str,
    subdomain: Option<&str>,
) -> String {
    match subdomain {
        Some(subdomain) => format!(
            "{}.{}.{}",
            subdomain, STORAGE_SUBDOMAIN_LABEL, domain_suffix
        ),
        None => {
            let instance = deployment_name
                .strip_prefix(INSTANCE_NAME_PREFIX)
                .unwrap_or(deployment_name);
            format!("{}.{}", instance, domain_suffix)
        }
    }
}

/// The single route record advertised to the routing layer.
pub(crate) fn route_registrar(domain: &str) -> RouteRegistrar {
    RouteRegistrar {
        routes: vec![Route {
            name: ROUTE_NAME.to_string(),
            port: SERVER_PORT,
            registration_interval: ROUTE_REGISTRATION_INTERVAL.to_string(),
            uris: vec![domain.to_string()],
        }],
    }
}

/// The credential block attached to the manifest.  Both keys are mandatory;
/// the cloud-credential blob rides along when present.
pub(crate) fn credential(
    parameters: &StorageParameters,
) -> Result<Credential, ComposeError> {
    let accesskey = parameters
        .accesskey
        .clone()
        .ok_or(ComposeError::CredentialMissing { field: "accesskey" })?;
    let secretkey = parameters
        .secretkey
        .clone()
        .ok_or(ComposeError::CredentialMissing { field: "secretkey" })?;
    Ok(Credential {
        accesskey,
        secretkey,
        googlecredentials: parameters.googlecredentials.clone(),
    })
}
