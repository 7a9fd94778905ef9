// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job submission: the argument bundle, typed overrides, and the job spec
//! sent to the remote job service.
//!
//! Spec types serialize in the remote API's field naming so a `JobSpec`
//! can be handed to the service as-is, and overrides read the same JSON
//! shape users already write for extra job arguments.

use crate::id::JobName;
use crate::naming::{basename, JobNaming};
use crate::params::Parameters;
use crate::record::{ENV_INPUT, ENV_NOTEBOOK_NAME, ENV_OUTPUT, ENV_PARAMS, ENV_REGION, ENV_RULE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const DEFAULT_IMAGE: &str = "notebook-runner";
pub const DEFAULT_INSTANCE_TYPE: &str = "ml.m5.large";
pub const INPUT_DIR: &str = "/opt/ml/processing/input/";
pub const OUTPUT_DIR: &str = "/opt/ml/processing/output/";
const VOLUME_SIZE_GB: u32 = 40;
const MAX_RUNTIME_SECS: u64 = 7200;
const CONTAINER_ENTRYPOINT: &str = "run_notebook";

/// Errors in caller-supplied submission or schedule arguments.
///
/// Raised before any remote call is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("must specify one of a schedule expression or an event pattern")]
    MissingTrigger,

    #[error("specify only one of a schedule expression or an event pattern")]
    ConflictingTrigger,

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("{0}")]
    InvalidParameter(String),

    #[error("invalid extra job arguments: {0}")]
    InvalidOverrides(String),
}

/// Argument bundle for one submission.
///
/// This is what the submission function receives on invoke and what a
/// schedule rule delivers as its target input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    #[serde(default)]
    pub image: String,
    pub input_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_prefix: Option<String>,
    #[serde(default)]
    pub notebook: String,
    #[serde(default)]
    pub parameters: Parameters,
    #[serde(default)]
    pub role: String,
    #[serde(default = "default_instance_type")]
    pub instance_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_name: Option<String>,
    #[serde(default)]
    pub extra_args: SubmissionOverrides,
}

fn default_instance_type() -> String {
    DEFAULT_INSTANCE_TYPE.to_string()
}

// ── Overrides ───────────────────────────────────────────────────────────────

/// Typed extra arguments merged into the generated job spec.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubmissionOverrides {
    /// Appended after the notebook input.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub processing_inputs: Vec<ProcessingInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_output_config: Option<OutputOverrides>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_resources: Option<ResourceOverrides>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopping_condition: Option<StoppingCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_config: Option<NetworkConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiment_config: Option<ExperimentConfig>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
}

impl SubmissionOverrides {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::InvalidOverrides(e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutputOverrides {
    /// Appended after the result output.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<ProcessingOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kms_key_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceOverrides {
    #[serde(default)]
    pub cluster_config: ClusterOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClusterOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    #[serde(default, rename = "VolumeSizeInGB", skip_serializing_if = "Option::is_none")]
    pub volume_size_in_gb: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_kms_key_id: Option<String>,
}

/// A pure transformation of submission overrides.
pub type Override = Arc<dyn Fn(SubmissionOverrides) -> SubmissionOverrides + Send + Sync>;

/// Apply overrides left to right, starting from `base`.
pub fn apply_overrides(base: SubmissionOverrides, overrides: &[Override]) -> SubmissionOverrides {
    overrides.iter().fold(base, |acc, f| f(acc))
}

/// Cap the job's runtime.
pub fn time_limit(seconds: u64) -> Override {
    Arc::new(move |mut extra| {
        extra.stopping_condition = Some(StoppingCondition {
            max_runtime_in_seconds: seconds,
        });
        extra
    })
}

/// Add one environment variable to the job.
pub fn env_var(key: impl Into<String>, value: impl Into<String>) -> Override {
    let (key, value) = (key.into(), value.into());
    Arc::new(move |mut extra| {
        extra.environment.insert(key.clone(), value.clone());
        extra
    })
}

/// Run the job inside a VPC.
pub fn in_vpc(vpc: VpcConfig) -> Override {
    Arc::new(move |mut extra| {
        let network = extra.network_config.get_or_insert_with(NetworkConfig::default);
        network.vpc_config = Some(vpc.clone());
        extra
    })
}

// ── Job spec ────────────────────────────────────────────────────────────────

/// Complete processing job request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobSpec {
    pub processing_job_name: JobName,
    pub processing_inputs: Vec<ProcessingInput>,
    pub processing_output_config: ProcessingOutputConfig,
    pub processing_resources: ProcessingResources,
    pub stopping_condition: StoppingCondition,
    pub app_specification: AppSpecification,
    pub role_arn: String,
    pub environment: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_config: Option<NetworkConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiment_config: Option<ExperimentConfig>,
}

/// Fully qualified targets for a job spec.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTargets {
    pub image: String,
    pub role: String,
    pub output_prefix: String,
    /// Forwarded to the container as `AWS_DEFAULT_REGION` when set.
    pub region: Option<String>,
}

impl JobSpec {
    /// Build the job spec for a submission.
    ///
    /// Overrides merge over the defaults; the run metadata variables are
    /// written last so overrides cannot clobber them.
    pub fn assemble(
        request: &SubmissionRequest,
        targets: &ResolvedTargets,
        naming: &JobNaming,
    ) -> Self {
        let local_input = format!("{INPUT_DIR}{}", basename(&request.input_path));
        let local_output = format!("{OUTPUT_DIR}{}", naming.result_file);

        let mut spec = JobSpec {
            processing_job_name: naming.job_name.clone(),
            processing_inputs: vec![ProcessingInput {
                input_name: "notebook".to_string(),
                s3_input: S3Input::prefix(&request.input_path, INPUT_DIR),
            }],
            processing_output_config: ProcessingOutputConfig {
                outputs: vec![ProcessingOutput {
                    output_name: "result".to_string(),
                    s3_output: S3Output::end_of_job(&targets.output_prefix, OUTPUT_DIR),
                }],
                kms_key_id: None,
            },
            processing_resources: ProcessingResources {
                cluster_config: ClusterConfig {
                    instance_count: 1,
                    instance_type: request.instance_type.clone(),
                    volume_size_in_gb: VOLUME_SIZE_GB,
                    volume_kms_key_id: None,
                },
            },
            stopping_condition: StoppingCondition {
                max_runtime_in_seconds: MAX_RUNTIME_SECS,
            },
            app_specification: AppSpecification {
                image_uri: targets.image.clone(),
                container_arguments: vec![CONTAINER_ENTRYPOINT.to_string()],
            },
            role_arn: targets.role.clone(),
            environment: BTreeMap::new(),
            network_config: None,
            tags: None,
            experiment_config: None,
        }
        .merge(request.extra_args.clone());

        let params = serde_json::to_string(&request.parameters).unwrap_or_else(|_| "{}".to_string());
        let env = &mut spec.environment;
        env.insert(ENV_INPUT.to_string(), local_input);
        env.insert(ENV_OUTPUT.to_string(), local_output);
        if let Some(region) = &targets.region {
            env.insert(ENV_REGION.to_string(), region.clone());
        }
        env.insert(ENV_PARAMS.to_string(), params);
        env.insert(ENV_NOTEBOOK_NAME.to_string(), naming.notebook.clone());
        if let Some(rule) = &request.rule_name {
            env.insert(ENV_RULE.to_string(), rule.clone());
        }
        spec
    }

    /// Merge overrides into this spec.
    ///
    /// Inputs and outputs are appended, cluster fields and environment
    /// entries replace per key, and the remaining sections replace whole.
    pub fn merge(mut self, extra: SubmissionOverrides) -> Self {
        self.processing_inputs.extend(extra.processing_inputs);
        if let Some(output) = extra.processing_output_config {
            self.processing_output_config.outputs.extend(output.outputs);
            if output.kms_key_id.is_some() {
                self.processing_output_config.kms_key_id = output.kms_key_id;
            }
        }
        if let Some(resources) = extra.processing_resources {
            let cluster = &mut self.processing_resources.cluster_config;
            let overrides = resources.cluster_config;
            if let Some(count) = overrides.instance_count {
                cluster.instance_count = count;
            }
            if let Some(instance_type) = overrides.instance_type {
                cluster.instance_type = instance_type;
            }
            if let Some(size) = overrides.volume_size_in_gb {
                cluster.volume_size_in_gb = size;
            }
            if overrides.volume_kms_key_id.is_some() {
                cluster.volume_kms_key_id = overrides.volume_kms_key_id;
            }
        }
        if let Some(stopping) = extra.stopping_condition {
            self.stopping_condition = stopping;
        }
        if extra.network_config.is_some() {
            self.network_config = extra.network_config;
        }
        if extra.tags.is_some() {
            self.tags = extra.tags;
        }
        if extra.experiment_config.is_some() {
            self.experiment_config = extra.experiment_config;
        }
        self.environment.extend(extra.environment);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessingInput {
    pub input_name: String,
    pub s3_input: S3Input,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct S3Input {
    pub s3_uri: String,
    pub local_path: String,
    pub s3_data_type: String,
    pub s3_input_mode: String,
    pub s3_data_distribution_type: String,
}

impl S3Input {
    pub fn prefix(uri: &str, local_path: &str) -> Self {
        Self {
            s3_uri: uri.to_string(),
            local_path: local_path.to_string(),
            s3_data_type: "S3Prefix".to_string(),
            s3_input_mode: "File".to_string(),
            s3_data_distribution_type: "FullyReplicated".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessingOutputConfig {
    pub outputs: Vec<ProcessingOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kms_key_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessingOutput {
    pub output_name: String,
    pub s3_output: S3Output,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct S3Output {
    pub s3_uri: String,
    pub local_path: String,
    pub s3_upload_mode: String,
}

impl S3Output {
    pub fn end_of_job(uri: &str, local_path: &str) -> Self {
        Self {
            s3_uri: uri.to_string(),
            local_path: local_path.to_string(),
            s3_upload_mode: "EndOfJob".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessingResources {
    pub cluster_config: ClusterConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClusterConfig {
    pub instance_count: u32,
    pub instance_type: String,
    #[serde(rename = "VolumeSizeInGB")]
    pub volume_size_in_gb: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_kms_key_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StoppingCondition {
    pub max_runtime_in_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppSpecification {
    pub image_uri: String,
    pub container_arguments: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_inter_container_traffic_encryption: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_network_isolation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_config: Option<VpcConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VpcConfig {
    pub security_group_ids: Vec<String>,
    pub subnets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExperimentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiment_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_component_display_name: Option<String>,
}

#[cfg(test)]
#[path = "submission_tests.rs"]
mod tests;
