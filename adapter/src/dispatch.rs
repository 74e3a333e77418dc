// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

use adapter_types::{Manifest, Plan, RequestParameters, ServiceDeployment};
use manifest_composer::ComposeError;
use serde::Serialize;
use slog::{debug, o, Drain, Logger};

/// Exit status the broker interprets as "operation not implemented" rather
/// than a failed invocation.
pub const NOT_IMPLEMENTED_EXIT_STATUS: i32 = 10;

/// Service adapter app.
#[derive(Debug, Parser)]
#[command(name = "service-adapter")]
pub struct AdapterApp {
    /// Minimum level for log messages written to stderr.
    #[clap(long, default_value = "info", value_parser = parse_log_level)]
    log_level: slog::Level,

    /// Duplicate the log to this file.
    #[clap(long)]
    log_file: Option<Utf8PathBuf>,

    #[clap(subcommand)]
    subcommand: AdapterCommand,
}

impl AdapterApp {
    /// Executes the app.
    pub fn exec(self, log: &Logger) -> Result<()> {
        match self.subcommand {
            AdapterCommand::GenerateManifest(args) => args.exec(log),
            AdapterCommand::DashboardUrl(args) => args.exec(log),
            AdapterCommand::CreateBinding(_) => {
                Err(unsupported("create-binding"))
            }
            AdapterCommand::DeleteBinding(_) => {
                Err(unsupported("delete-binding"))
            }
            AdapterCommand::GeneratePlanSchemas(_) => {
                Err(unsupported("generate-plan-schemas"))
            }
        }
    }

    /// Builds the logger: stderr always, duplicated to `--log-file` when
    /// one was given.
    pub fn setup_log(&self) -> Result<Logger> {
        let stderr_decorator = slog_term::TermDecorator::new().stderr().build();
        let stderr_drain =
            slog_term::FullFormat::new(stderr_decorator).build().fuse();

        let drain = match &self.log_file {
            Some(path) => {
                let file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path.as_std_path())
                    .with_context(|| format!("opening log file {path}"))?;
                let file_decorator = slog_term::PlainDecorator::new(file);
                let file_drain =
                    slog_term::FullFormat::new(file_decorator).build().fuse();
                let both = slog::Duplicate::new(stderr_drain, file_drain)
                    .filter_level(self.log_level)
                    .fuse();
                slog_async::Async::new(both).build().fuse()
            }
            None => {
                let filtered =
                    stderr_drain.filter_level(self.log_level).fuse();
                slog_async::Async::new(filtered).build().fuse()
            }
        };
        Ok(Logger::root(drain, o!()))
    }

    /// Maps a failed invocation to the process exit status the broker
    /// expects.
    pub fn exit_status(error: &anyhow::Error) -> i32 {
        match error.downcast_ref::<ComposeError>() {
            Some(ComposeError::OperationUnsupported { .. }) => {
                NOT_IMPLEMENTED_EXIT_STATUS
            }
            _ => 1,
        }
    }
}

fn unsupported(operation: &'static str) -> anyhow::Error {
    anyhow::Error::new(ComposeError::OperationUnsupported { operation })
}

fn parse_log_level(value: &str) -> Result<slog::Level, String> {
    value.parse().map_err(|()| format!("invalid log level {value:?}"))
}

#[derive(Debug, Subcommand)]
enum AdapterCommand {
    /// Compose the deployment manifest for a provisioning or update request.
    GenerateManifest(GenerateManifestArgs),
    /// Derive the dashboard URL from a previously generated manifest.
    DashboardUrl(DashboardUrlArgs),
    /// Not supported by this service; fails with the not-implemented status.
    CreateBinding(IgnoredArgs),
    /// Not supported by this service; fails with the not-implemented status.
    DeleteBinding(IgnoredArgs),
    /// Not supported by this service; fails with the not-implemented status.
    GeneratePlanSchemas(IgnoredArgs),
}

#[derive(Debug, Args)]
struct GenerateManifestArgs {
    /// Service deployment descriptor (JSON).
    service_deployment: String,
    /// Plan definition (JSON).
    plan: String,
    /// Request parameters (JSON).
    request_params: String,
    /// Previously generated manifest (YAML); empty on fresh creates.
    #[clap(default_value = "")]
    previous_manifest: String,
    /// Previous plan definition (JSON); part of the invocation contract but
    /// not consulted.
    #[clap(default_value = "")]
    previous_plan: String,
}

impl GenerateManifestArgs {
    fn exec(self, log: &Logger) -> Result<()> {
        let manifest = self.compose(log)?;
        let yaml = serde_yaml::to_string(&manifest)
            .context("encoding manifest as YAML")?;
        print!("{}", yaml);
        Ok(())
    }

    fn compose(&self, log: &Logger) -> Result<Manifest> {
        let service_deployment: ServiceDeployment =
            serde_json::from_str(&self.service_deployment)
                .context("decoding service deployment")?;
        let plan: Plan =
            serde_json::from_str(&self.plan).context("decoding plan")?;
        let request: RequestParameters =
            serde_json::from_str(&self.request_params)
                .context("decoding request parameters")?;
        let previous = decode_previous_manifest(&self.previous_manifest)?;
        if !self.previous_plan.trim().is_empty() {
            debug!(log, "previous plan supplied; not consulted");
        }

        let manifest = manifest_composer::generate_manifest(
            log,
            &service_deployment,
            &plan,
            &request,
            previous.as_ref(),
        )?;
        debug!(
            log, "composed manifest";
            "deployment" => &manifest.name,
            "domain" => &manifest.properties.domain,
        );
        Ok(manifest)
    }
}

/// The broker replays the previous manifest as YAML; an empty or null
/// document means no deployment exists yet.
fn decode_previous_manifest(raw: &str) -> Result<Option<Manifest>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" || trimmed == "{}" {
        return Ok(None);
    }
    let manifest: Manifest = serde_yaml::from_str(trimmed)
        .context("decoding previous manifest")?;
    Ok(Some(manifest))
}

#[derive(Debug, Args)]
struct DashboardUrlArgs {
    /// Service instance GUID.
    instance_id: String,
    /// Plan definition (JSON); part of the invocation contract but not
    /// consulted.
    #[allow(dead_code)]
    plan: String,
    /// Generated manifest (YAML).
    manifest: String,
}

#[derive(Debug, Serialize)]
struct DashboardUrl {
    dashboard_url: String,
}

impl DashboardUrlArgs {
    fn exec(self, log: &Logger) -> Result<()> {
        let manifest: Manifest = serde_yaml::from_str(&self.manifest)
            .context("decoding manifest")?;
        debug!(
            log, "deriving dashboard url";
            "instance_id" => &self.instance_id,
        );
        let url = DashboardUrl {
            dashboard_url: manifest_composer::dashboard_url(&manifest),
        };
        println!(
            "{}",
            serde_json::to_string(&url).context("encoding dashboard url")?
        );
        Ok(())
    }
}

/// Arguments accepted for invocation-contract compatibility; never
/// inspected.
#[derive(Debug, Args)]
struct IgnoredArgs {
    #[clap(trailing_var_arg = true, allow_hyphen_values = true)]
    #[allow(dead_code)]
    args: Vec<String>,
}
