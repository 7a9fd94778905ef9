// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn target(id: &str) -> RuleTarget {
    RuleTarget {
        id: id.to_string(),
        arn: "arn:aws:lambda:us-west-2:123456789012:function:RunNotebook".to_string(),
        input: Some("{}".to_string()),
    }
}

#[tokio::test]
async fn put_rule_stores_trigger() {
    let events = FakeEventService::new();
    let arn = events
        .put_rule("RunNotebook-a", &Trigger::Schedule("rate(1 day)".into()), "desc")
        .await
        .unwrap();
    assert!(arn.ends_with(":rule/RunNotebook-a"));
    let rule = events.describe_rule("RunNotebook-a").await.unwrap();
    assert_eq!(rule.schedule_expression.as_deref(), Some("rate(1 day)"));
    assert_eq!(rule.event_pattern, None);
}

#[tokio::test]
async fn delete_requires_targets_removed_first() {
    let events = FakeEventService::new();
    events
        .put_rule("RunNotebook-a", &Trigger::Schedule("rate(1 day)".into()), "")
        .await
        .unwrap();
    events.put_targets("RunNotebook-a", &[target("Default")]).await.unwrap();

    assert!(events.delete_rule("RunNotebook-a").await.is_err());
    events.remove_targets("RunNotebook-a", &["Default"]).await.unwrap();
    events.delete_rule("RunNotebook-a").await.unwrap();
    assert!(events.get_rule("RunNotebook-a").is_none());
}

#[tokio::test]
async fn list_rules_filters_by_prefix_and_pages() {
    let events = FakeEventService::new();
    for name in ["RunNotebook-a", "RunNotebook-b", "RunNotebook-c", "Other"] {
        events
            .put_rule(name, &Trigger::Schedule("rate(1 day)".into()), "")
            .await
            .unwrap();
    }
    events.set_page_size(2);

    let first = events.list_rules("RunNotebook-", None).await.unwrap();
    assert_eq!(first.rules.len(), 2);
    let second = events
        .list_rules("RunNotebook-", first.next_token.as_deref())
        .await
        .unwrap();
    assert_eq!(second.rules.len(), 1);
    assert_eq!(second.next_token, None);
}

#[tokio::test]
async fn missing_rule_is_not_found() {
    let events = FakeEventService::new();
    assert!(events.describe_rule("RunNotebook-x").await.unwrap_err().is_not_found());
    assert!(events.list_targets("RunNotebook-x").await.unwrap_err().is_not_found());
}
