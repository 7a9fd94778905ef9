// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Direct submission of a bundle to the job service.
//!
//! This is the work the submission function does on the remote side;
//! running it locally skips the function entirely.

use crate::error::EngineError;
use crate::runner::Runner;
use chrono::Utc;
use nbrun_adapters::{EventService, FunctionService, IdentityService, JobService, ObjectStore};
use nbrun_core::abbrev::{qualify_image, qualify_role};
use nbrun_core::naming::dirname;
use nbrun_core::submission::{DEFAULT_IMAGE, DEFAULT_INSTANCE_TYPE};
use nbrun_core::{JobName, JobNaming, JobSpec, ResolvedTargets, SubmissionRequest};

impl<J, E, F, S, I> Runner<J, E, F, S, I>
where
    J: JobService,
    E: EventService,
    F: FunctionService,
    S: ObjectStore,
    I: IdentityService,
{
    /// Build the job spec for a bundle and create the job.
    ///
    /// Empty image and role fall back to `notebook-runner` and
    /// `BasicExecuteNotebookRole-<region>`; a missing output prefix is the
    /// directory of the input; a missing notebook name is the input path.
    pub async fn execute(&self, mut bundle: SubmissionRequest) -> Result<JobName, EngineError> {
        if bundle.instance_type.is_empty() {
            bundle.instance_type = DEFAULT_INSTANCE_TYPE.to_string();
        }
        let account = self.session.account().await?.to_string();
        let region = self.session.region().await?.to_string();

        let image = match bundle.image.as_str() {
            "" => DEFAULT_IMAGE,
            image => image,
        };
        let role = match bundle.role.as_str() {
            "" => format!("BasicExecuteNotebookRole-{region}"),
            role => role.to_string(),
        };
        let output_prefix = bundle
            .output_prefix
            .clone()
            .unwrap_or_else(|| dirname(&bundle.input_path).to_string());
        let notebook = match bundle.notebook.as_str() {
            "" => bundle.input_path.as_str(),
            notebook => notebook,
        };

        let targets = ResolvedTargets {
            image: qualify_image(image, &account, &region),
            role: qualify_role(&role, &account),
            output_prefix,
            region: Some(region),
        };
        let naming = JobNaming::new(notebook, Utc::now());
        let spec = JobSpec::assemble(&bundle, &targets, &naming);

        let job = self.fetcher.jobs().submit(&spec).await?;
        tracing::info!(%job, notebook = %naming.notebook, "job submitted");
        Ok(job)
    }
}

#[cfg(test)]
#[path = "submit_tests.rs"]
mod tests;
