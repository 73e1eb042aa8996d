//! Tests for scenario loading and validation.

use shoprag_error::{ScenarioErrorKind, ShopragError, ShopragErrorKind};
use shoprag_scenario::{
    BranchNode, Node, Script, ScriptValidator, TextNode, ToolRegistry, ValidationIssueKind,
};

const SCENARIO: &str = r#"{
    "name": "Приветствие",
    "code": [
        {"id": "tool1", "type": "tool", "tool": "get_user_data"},
        {"id": "text1", "type": "text", "text": "Здравствуйте, {=@get_user_data.name=}!"},
        {"id": "if1", "type": "if", "condition": "Пользователь недоволен",
         "children": [{"id": "text2", "type": "text", "text": "Приносим извинения."}],
         "else_children": [{"id": "text3", "type": "text", "text": "Рады помочь."}]},
        {"id": "end1", "type": "end"}
    ]
}"#;

fn scenario_kind(err: &ShopragError) -> &ScenarioErrorKind {
    match err.kind() {
        ShopragErrorKind::Scenario(e) => &e.kind,
        other => panic!("Expected scenario error, got {:?}", other),
    }
}

#[test]
fn test_parses_all_node_kinds() {
    let script: Script = SCENARIO.parse().expect("Valid scenario");

    let kinds: Vec<&str> = script.nodes().iter().map(Node::kind).collect();
    assert_eq!(kinds, vec!["tool", "text", "if", "end"]);

    let Node::If(branch) = &script.nodes()[2] else {
        panic!("Expected if node");
    };
    assert_eq!(branch.condition, "Пользователь недоволен");
    assert_eq!(
        branch.branch(true),
        &[BranchNode::Text(TextNode::new("text2", "Приносим извинения."))]
    );
    assert_eq!(branch.branch(false)[0].id(), "text3");
}

#[test]
fn test_missing_fields_default_to_empty() {
    let script: Script = r#"{"code": [
        {"type": "text"},
        {"id": "if1", "type": "if"}
    ]}"#
    .parse()
    .expect("Valid scenario");

    assert_eq!(script.nodes()[0], Node::Text(TextNode::new("", "")));
    let Node::If(branch) = &script.nodes()[1] else {
        panic!("Expected if node");
    };
    assert!(branch.condition.is_empty());
    assert!(branch.children.is_empty());
    assert!(branch.else_children.is_empty());
}

#[test]
fn test_document_without_code_is_empty_script() {
    let script: Script = r#"{"name": "empty"}"#.parse().expect("Valid scenario");
    assert!(script.is_empty());
}

#[test]
fn test_unknown_node_type_is_parse_error() {
    let err = r#"{"code": [{"id": "x", "type": "goto"}]}"#
        .parse::<Script>()
        .expect_err("Unknown type rejected");
    assert!(matches!(scenario_kind(&err), ScenarioErrorKind::Parse(_)));
}

#[test]
fn test_malformed_json_is_parse_error() {
    let err = "{not json".parse::<Script>().expect_err("Malformed rejected");
    assert!(matches!(scenario_kind(&err), ScenarioErrorKind::Parse(_)));
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = tempfile::tempdir().expect("Temp dir");
    let path = dir.path().join("missing.json");

    let err = Script::from_file(&path).expect_err("Missing file rejected");
    match scenario_kind(&err) {
        ScenarioErrorKind::NotFound(p) => assert!(p.ends_with("missing.json")),
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_loads_from_file() {
    let dir = tempfile::tempdir().expect("Temp dir");
    let path = dir.path().join("Scenario.json");
    std::fs::write(&path, SCENARIO).expect("Write scenario");

    let script = Script::from_file(&path).expect("Scenario loads");
    assert_eq!(script.len(), 4);
    assert_eq!(script.nodes()[3].id(), "end1");
}

#[test]
fn test_valid_scenario_has_no_issues() {
    let script: Script = SCENARIO.parse().expect("Valid scenario");
    let tools = ToolRegistry::with_defaults();

    let issues = ScriptValidator::new(&tools).validate(&script);
    assert!(issues.is_empty(), "Unexpected issues: {:?}", issues);
}

#[test]
fn test_validator_reports_problems() {
    let script: Script = r#"{"code": [
        {"id": "a", "type": "text", "text": "раз"},
        {"id": "a", "type": "tool", "tool": "get_order"},
        {"id": "if1", "type": "if", "condition": "  ",
         "children": [{"id": "deep", "type": "if", "condition": "x"}]},
        {"id": "end1", "type": "end"},
        {"id": "late", "type": "text", "text": "никогда"}
    ]}"#
    .parse()
    .expect("Valid scenario");
    let tools = ToolRegistry::with_defaults();

    let issues = ScriptValidator::new(&tools).validate(&script);
    let found: Vec<(ValidationIssueKind, &str)> = issues
        .iter()
        .map(|i| (i.kind, i.node_id.as_str()))
        .collect();

    assert_eq!(
        found,
        vec![
            (ValidationIssueKind::DuplicateId, "a"),
            (ValidationIssueKind::UnknownTool, "a"),
            (ValidationIssueKind::EmptyCondition, "if1"),
            (ValidationIssueKind::UnsupportedBranchChild, "deep"),
            (ValidationIssueKind::Unreachable, "late"),
        ]
    );
    assert!(issues[1].message.contains("get_order"));
    assert!(issues[1].message.contains("get_user_data"));
}

#[test]
fn test_strict_validation_turns_issues_into_error() {
    let tools = ToolRegistry::with_defaults();
    let validator = ScriptValidator::new(&tools);

    let clean: Script = SCENARIO.parse().expect("Valid scenario");
    validator.ensure_valid(&clean).expect("No issues");

    let broken: Script = r#"{"code": [
        {"id": "call", "type": "tool", "tool": "get_order"},
        {"id": "stop", "type": "end"},
        {"id": "late", "type": "text", "text": "никогда"}
    ]}"#
    .parse()
    .expect("Valid scenario");

    let err = validator
        .ensure_valid(&broken)
        .expect_err("Issues are fatal in strict mode");
    match scenario_kind(&err) {
        ScenarioErrorKind::Validation(message) => {
            assert!(message.starts_with("2 issue(s)"));
            assert!(message.contains("get_order"));
            assert!(message.contains("late"));
        }
        other => panic!("Expected validation error, got {:?}", other),
    }
}
