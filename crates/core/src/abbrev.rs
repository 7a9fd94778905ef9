// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Image and role name shortening and qualification.
//!
//! Descriptions show images and roles in their short, in-account form. The
//! transforms are pure: input that does not match the in-account shape is
//! returned unchanged.

use regex::Regex;
use std::sync::LazyLock;

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static ABBREV_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<account>\d+).dkr.ecr.(?P<region>[^.]+).amazonaws.com/(?P<image>[^:/]+)(?P<tag>:[^:]+)?$",
    )
    .expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static ABBREV_ROLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^arn:aws:iam::(?P<account>\d+):role/(?P<name>[^/]+)$")
        .expect("constant regex pattern is valid")
});

/// If the image lives in an account registry, return `name[:tag]`.
///
/// A `:latest` tag is dropped since it is the implied default.
pub fn abbreviate_image(image: &str) -> String {
    let Some(caps) = ABBREV_IMAGE.captures(image) else {
        return image.to_string();
    };
    let name = caps.name("image").map_or("", |m| m.as_str());
    let tag = match caps.name("tag").map(|m| m.as_str()) {
        None | Some(":latest") => "",
        Some(tag) => tag,
    };
    format!("{name}{tag}")
}

/// If the role is a plain account role ARN, return just the role name.
pub fn abbreviate_role(role: &str) -> String {
    match ABBREV_ROLE.captures(role).and_then(|c| c.name("name")) {
        Some(name) => name.as_str().to_string(),
        None => role.to_string(),
    }
}

/// Expand a bare image name into a registry reference in the given account.
///
/// References that already contain a `/` keep their registry; a missing tag
/// becomes `:latest`.
pub fn qualify_image(image: &str, account: &str, region: &str) -> String {
    let mut image = if image.contains('/') {
        image.to_string()
    } else {
        format!("{account}.dkr.ecr.{region}.amazonaws.com/{image}")
    };
    let last = image.rsplit('/').next().unwrap_or_default();
    if !last.contains(':') {
        image.push_str(":latest");
    }
    image
}

/// Expand a bare role name into a role ARN in the given account.
pub fn qualify_role(role: &str, account: &str) -> String {
    if role.contains('/') {
        role.to_string()
    } else {
        format!("arn:aws:iam::{account}:role/{role}")
    }
}

#[cfg(test)]
#[path = "abbrev_tests.rs"]
mod tests;
