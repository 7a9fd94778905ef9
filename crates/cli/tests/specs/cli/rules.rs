// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schedule rules against a scripted `aws`.

use crate::prelude::*;

#[test]
fn list_rules_with_none_defined() {
    let sandbox = Sandbox::new(r#"echo '{"Rules": []}'"#);
    sandbox
        .cli()
        .args(&["list-rules"])
        .passes()
        .stdout_eq("No schedules found\n");
    assert!(sandbox.aws_calls()[0].contains("--name-prefix RunNotebook-"));
}

#[test]
fn unschedule_removes_permission_targets_and_rule() {
    let sandbox = Sandbox::new("");
    sandbox
        .cli()
        .args(&["unschedule", "nightly"])
        .passes()
        .stdout_eq("Removed schedule nightly\n");

    let calls = sandbox.aws_calls();
    assert_eq!(calls.len(), 3, "{calls:?}");
    assert!(calls[0].starts_with("lambda remove-permission"));
    assert!(calls[1].starts_with("events remove-targets --rule RunNotebook-nightly"));
    assert!(calls[2].starts_with("events delete-rule --name RunNotebook-nightly"));
}
