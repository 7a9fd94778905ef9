// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifiers for remote jobs and schedule rules

use crate::naming::JOB_PREFIX;
use crate::rule::RULE_PREFIX;

/// Define a newtype name wrapper around `String`.
///
/// Generates `new()`, `as_str()`, `Display`, `From<String>`, `From<&str>`,
/// `AsRef<str>`, `PartialEq<str>`, `PartialEq<&str>`, and `Borrow<str>`.
#[macro_export]
macro_rules! define_name {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(name: impl Into<String>) -> Self {
                Self(name.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_name! {
    /// Name of a remote processing job.
    ///
    /// The remote service treats the name as the job's identity; it is
    /// stable for the lifetime of the job.
    pub struct JobName;
}

impl JobName {
    /// Whether this job was created by this tool (carries the job prefix).
    pub fn is_notebook_job(&self) -> bool {
        self.0.starts_with(JOB_PREFIX)
    }
}

define_name! {
    /// User-facing name of a schedule rule, without the remote prefix.
    pub struct RuleName;
}

impl RuleName {
    /// The rule name as stored remotely (`RunNotebook-<name>`).
    pub fn prefixed(&self) -> String {
        format!("{}{}", RULE_PREFIX, self.0)
    }

    /// Strip the remote prefix from a stored rule name.
    ///
    /// Returns `None` for rules this tool did not create.
    pub fn from_prefixed(remote: &str) -> Option<Self> {
        remote.strip_prefix(RULE_PREFIX).map(Self::new)
    }

    /// Statement id used when granting the event service permission to
    /// call the submission function for this rule.
    pub fn statement_id(&self) -> String {
        format!("EB-{}", self.0)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
