// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixed deployment policy values.
//!
//! Everything the composer stamps into a manifest that is not computed from
//! its inputs lives here, so a policy change is a one-line diff.

/// The broker names service deployments `service-instance_<guid>`.  The
/// prefix is stripped when deriving the externally routable domain.
pub const INSTANCE_NAME_PREFIX: &str = "service-instance_";

/// Logical stemcell name instance groups refer to.
pub const STEMCELL_ALIAS: &str = "os-stemcell";

/// The single logical instance group every plan is expected to define.
pub const SERVER_INSTANCE_GROUP: &str = "minio-ig";

pub const SERVER_JOB: &str = "minio-server";
pub const AZURE_GATEWAY_JOB: &str = "minio-azure";
pub const GCS_GATEWAY_JOB: &str = "minio-gcs";
pub const ROUTE_REGISTRAR_JOB: &str = "route_registrar";
pub const PROCESS_SUPERVISOR_JOB: &str = "bpm";

/// Link name (and provider job name) the route registrar consumes from the
/// routing peer deployment.
pub const NATS_LINK: &str = "nats";

/// Port the storage server listens on; advertised to the router.
pub const SERVER_PORT: u16 = 9000;

pub const ROUTE_NAME: &str = "route";
pub const ROUTE_REGISTRATION_INTERVAL: &str = "20s";

/// Label inserted between a caller-chosen subdomain and the domain suffix.
pub const STORAGE_SUBDOMAIN_LABEL: &str = "storage";
