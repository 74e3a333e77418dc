// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parameter resolution: fresh create vs. update of an existing deployment.

use crate::ComposeError;
use adapter_types::{Manifest, Plan, RequestParameters, StorageParameters};

/// The effective configuration the rest of the pipeline works from.
#[derive(Debug)]
pub(crate) struct ResolvedParameters {
    pub parameters: StorageParameters,
    pub instance_count: usize,
    pub fresh: bool,
}

/// Decides the effective parameters and instance count for this invocation.
///
/// With no previous manifest this is a fresh create: the caller must supply
/// parameters, and the instance count comes from the plan.  With a previous
/// manifest it is an update: the stored parameters and the deployed instance
/// count are carried forward unchanged, and any attempt to supply new
/// parameters is rejected outright; reconfiguration goes through the
/// operator workflow, never a broker update.
pub(crate) fn resolve(
    plan: &Plan,
    request: &RequestParameters,
    previous: Option<&Manifest>,
) -> Result<ResolvedParameters, ComposeError> {
    match previous {
        None => {
            let parameters = request
                .parameters
                .clone()
                .ok_or(ComposeError::ParametersMissing)?;
            let instance_count =
                parse_instance_count(&plan.properties.instances)?;
            Ok(ResolvedParameters { parameters, instance_count, fresh: true })
        }
        Some(previous) => {
            if request.parameters.is_some() {
                return Err(ComposeError::ParametersImmutable);
            }
            let parameters = previous
                .properties
                .parameters
                .clone()
                .ok_or(ComposeError::StoredParametersMissing)?;
            // The instance count is immutable once deployed; it always comes
            // from the previous manifest, never the plan.
            let instance_count = previous
                .instance_groups
                .first()
                .map(|group| group.instances)
                .ok_or(ComposeError::PreviousInstanceGroupsMissing)?;
            Ok(ResolvedParameters { parameters, instance_count, fresh: false })
        }
    }
}

fn parse_instance_count(value: &str) -> Result<usize, ComposeError> {
    match value.parse::<usize>() {
        Ok(count) if count >= 1 => Ok(count),
        _ => Err(ComposeError::InstanceCountInvalid {
            value: value.to_string(),
        }),
    }
}
