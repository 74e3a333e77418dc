// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structural assembly of instance groups, job/release bindings, and the
//! stemcell entry.
//!
//! This stage is a pure merge: it attaches no properties and makes no policy
//! decisions beyond binding each required job to the one release that
//! provides it.

use crate::defaults::{NATS_LINK, ROUTE_REGISTRAR_JOB, STEMCELL_ALIAS};
use adapter_types::{
    InstanceGroup, Job, Network, Plan, ServiceDeployment, ServiceRelease,
    Stemcell,
};
use std::collections::BTreeMap;
use thiserror::Error;

/// Describes errors which may occur while assembling the deployment
/// topology.  These are surfaced to the caller verbatim.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("plan defines no instance groups")]
    NoInstanceGroups,

    #[error("service deployment reports no stemcells")]
    NoStemcells,

    #[error("no jobs are mapped to instance group {group:?}")]
    NoJobsForGroup { group: String },

    #[error("job {job:?} is not provided by any release")]
    JobNotProvided { job: String },

    #[error(
        "job {job:?} is provided by {count} releases; expected exactly one"
    )]
    JobProvidedByMultipleReleases { job: String, count: usize },
}

/// The single stemcell entry for the manifest, under the fixed alias.
pub(crate) fn stemcell(
    deployment: &ServiceDeployment,
) -> Result<Stemcell, TopologyError> {
    let reported =
        deployment.stemcells.first().ok_or(TopologyError::NoStemcells)?;
    Ok(Stemcell {
        alias: STEMCELL_ALIAS.to_string(),
        os: reported.os.clone(),
        version: reported.version.clone(),
    })
}

/// Binds job lists to the plan's instance-group templates.
///
/// The resolved instance count lands on the first template; this service
/// deploys exactly one logical instance group, so "first" is also "only" in
/// any well-formed plan.
pub(crate) fn instance_groups(
    plan: &Plan,
    releases: &[ServiceRelease],
    instance_count: usize,
    jobs_by_group: &BTreeMap<String, Vec<String>>,
) -> Result<Vec<InstanceGroup>, TopologyError> {
    if plan.instance_groups.is_empty() {
        return Err(TopologyError::NoInstanceGroups);
    }

    let mut groups = Vec::with_capacity(plan.instance_groups.len());
    for (index, template) in plan.instance_groups.iter().enumerate() {
        let required = jobs_by_group.get(&template.name).ok_or_else(|| {
            TopologyError::NoJobsForGroup { group: template.name.clone() }
        })?;
        let jobs = required
            .iter()
            .map(|job| bind_job(releases, job))
            .collect::<Result<Vec<_>, _>>()?;
        let instances =
            if index == 0 { instance_count } else { template.instances };
        groups.push(InstanceGroup {
            name: template.name.clone(),
            instances,
            jobs,
            vm_type: template.vm_type.clone(),
            persistent_disk_type: template.persistent_disk_type.clone(),
            stemcell: STEMCELL_ALIAS.to_string(),
            networks: template
                .networks
                .iter()
                .map(|name| Network { name: name.clone() })
                .collect(),
            azs: template.azs.clone(),
        });
    }
    Ok(groups)
}

fn bind_job(
    releases: &[ServiceRelease],
    job: &str,
) -> Result<Job, TopologyError> {
    let providers: Vec<_> = releases
        .iter()
        .filter(|release| release.jobs.iter().any(|provided| provided == job))
        .collect();
    match providers.as_slice() {
        [] => Err(TopologyError::JobNotProvided { job: job.to_string() }),
        [release] => Ok(Job {
            name: job.to_string(),
            release: release.name.clone(),
            consumes: BTreeMap::new(),
        }),
        _ => Err(TopologyError::JobProvidedByMultipleReleases {
            job: job.to_string(),
            count: providers.len(),
        }),
    }
}

/// Points the route registrar's `nats` link at the messaging job in the
/// routing peer deployment.  Applied on every build.
pub(crate) fn link_route_registrar(
    groups: &mut [InstanceGroup],
    peer_deployment: &str,
) {
    for group in groups {
        for job in &mut group.jobs {
            if job.name == ROUTE_REGISTRAR_JOB {
                job.consume_from_deployment(
                    NATS_LINK,
                    NATS_LINK,
                    peer_deployment,
                );
            }
        }
    }
}
