// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Starting runs through the submission function.

use crate::error::EngineError;
use crate::runner::Runner;
use nbrun_adapters::{EventService, FunctionService, IdentityService, JobService, ObjectStore};
use nbrun_core::naming::basename;
use nbrun_core::{apply_overrides, JobName, Override, Parameters, SubmissionOverrides, SubmissionRequest};
use serde_json::Value;

/// A notebook run as the caller describes it, before any defaults are
/// resolved against the account.
#[derive(Clone, Default)]
pub struct InvokeRequest {
    /// Local path of the notebook, or its name when `input_path` is set.
    pub notebook: String,
    /// Image name or reference; the configured image when unset.
    pub image: Option<String>,
    /// `s3://` location of an already uploaded notebook.
    pub input_path: Option<String>,
    pub output_prefix: Option<String>,
    pub parameters: Parameters,
    pub role: Option<String>,
    pub instance_type: Option<String>,
    /// Base job overrides, before `overrides` are folded over them.
    pub extra_args: SubmissionOverrides,
    pub overrides: Vec<Override>,
}

impl std::fmt::Debug for InvokeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvokeRequest")
            .field("notebook", &self.notebook)
            .field("image", &self.image)
            .field("input_path", &self.input_path)
            .field("output_prefix", &self.output_prefix)
            .field("role", &self.role)
            .field("instance_type", &self.instance_type)
            .field("overrides", &self.overrides.len())
            .finish_non_exhaustive()
    }
}

impl InvokeRequest {
    pub fn new(notebook: impl Into<String>) -> Self {
        Self {
            notebook: notebook.into(),
            ..Self::default()
        }
    }
}

impl<J, E, F, S, I> Runner<J, E, F, S, I>
where
    J: JobService,
    E: EventService,
    F: FunctionService,
    S: ObjectStore,
    I: IdentityService,
{
    /// Resolve a request into the bundle the submission function takes.
    ///
    /// Uploads the local notebook when no input location is given.
    pub async fn prepare(
        &self,
        request: InvokeRequest,
        rule_name: Option<String>,
    ) -> Result<SubmissionRequest, EngineError> {
        let image = request.image.as_deref().unwrap_or(&self.config.image);
        let image = self.session.resolve_image(image).await?;
        let role = request.role.as_deref().or(self.config.role.as_deref());
        let role = self.session.resolve_role(role).await?;

        let input_path = match request.input_path {
            Some(path) => path,
            None => {
                let bytes = tokio::fs::read(&request.notebook).await?;
                self.upload_notebook(bytes).await?
            }
        };
        let output_prefix = match request.output_prefix {
            Some(prefix) => prefix,
            None => format!("s3://{}/papermill_output", self.session.default_bucket().await?),
        };

        Ok(SubmissionRequest {
            image,
            input_path,
            output_prefix: Some(output_prefix),
            notebook: basename(&request.notebook).to_string(),
            parameters: request.parameters,
            role,
            instance_type: request
                .instance_type
                .unwrap_or_else(|| self.config.instance_type.clone()),
            rule_name,
            extra_args: apply_overrides(request.extra_args, &request.overrides),
        })
    }

    /// Start a run through the submission function; returns the job name.
    pub async fn invoke(&self, request: InvokeRequest) -> Result<JobName, EngineError> {
        let bundle = self.prepare(request, None).await?;
        self.invoke_bundle(&bundle).await
    }

    pub async fn invoke_bundle(&self, bundle: &SubmissionRequest) -> Result<JobName, EngineError> {
        let payload = serde_json::to_value(bundle)?;
        let reply = self
            .functions
            .invoke(&self.config.function_name, &payload)
            .await?;
        let job = job_from_reply(&reply)?;
        tracing::info!(%job, notebook = %bundle.notebook, "run started");
        Ok(job)
    }
}

fn job_from_reply(reply: &Value) -> Result<JobName, EngineError> {
    if let Some(message) = reply.get("errorMessage") {
        let message = message.as_str().map_or_else(|| message.to_string(), str::to_string);
        return Err(EngineError::Invoke(message));
    }
    reply
        .get("job_name")
        .and_then(Value::as_str)
        .map(JobName::new)
        .ok_or_else(|| EngineError::Invoke(format!("reply has no job name: {reply}")))
}

#[cfg(test)]
#[path = "invoke_tests.rs"]
mod tests;
