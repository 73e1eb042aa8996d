//! Tests for scenario execution.

mod test_utils;

use async_trait::async_trait;
use shoprag_error::{BackendError, ScenarioErrorKind, ShopragErrorKind, ShopragResult};
use shoprag_scenario::{
    BranchNode, ConditionEvaluator, EndNode, IfNode, Node, ScenarioInterpreter, ScenarioRunner,
    Script, TextNode, Tool, ToolNode, ToolOutput, ToolRegistry,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use test_utils::{MockBehavior, MockClassifier};

fn interpreter(classifier: MockClassifier) -> ScenarioInterpreter<Arc<MockClassifier>> {
    ScenarioInterpreter::new(
        ToolRegistry::with_defaults(),
        ConditionEvaluator::new(Arc::new(classifier)),
    )
}

fn text(id: &str, text: &str) -> Node {
    TextNode::new(id, text).into()
}

fn branch_text(id: &str, text: &str) -> BranchNode {
    TextNode::new(id, text).into()
}

fn angry_script() -> Script {
    Script::new(vec![
        text("t1", "Здравствуйте"),
        IfNode::new(
            "if1",
            "user is angry",
            vec![branch_text("t2", "Извините")],
            vec![branch_text("t3", "Хорошо")],
        )
        .into(),
        EndNode::new("end").into(),
    ])
}

#[tokio::test]
async fn test_text_only_script_concatenates_in_order() {
    let script = Script::new(vec![
        text("a", "Первая строка"),
        text("b", "Вторая строка"),
        text("c", "Третья строка"),
    ]);

    let outcome = interpreter(MockClassifier::fixed("нет"))
        .run(&script, "привет")
        .await
        .expect("Run succeeds");

    assert_eq!(outcome.context(), "Первая строка\nВторая строка\nТретья строка");
    assert_eq!(outcome.last_step(), "c");
}

#[tokio::test]
async fn test_empty_script_produces_empty_outcome() {
    let outcome = interpreter(MockClassifier::fixed("да"))
        .run(&Script::default(), "привет")
        .await
        .expect("Run succeeds");

    assert_eq!(outcome.context(), "");
    assert_eq!(outcome.last_step(), "");
}

#[tokio::test]
async fn test_end_stops_the_run() {
    let script = Script::new(vec![
        text("a", "до"),
        EndNode::new("stop").into(),
        text("b", "после"),
        EndNode::new("stop2").into(),
    ]);

    let outcome = interpreter(MockClassifier::fixed("да"))
        .run(&script, "привет")
        .await
        .expect("Run succeeds");

    assert_eq!(outcome.context(), "до");
    assert_eq!(outcome.last_step(), "stop");
}

#[tokio::test]
async fn test_unknown_tool_stores_nothing_and_emits_nothing() {
    let script = Script::new(vec![
        ToolNode::new("call", "no_such_tool").into(),
        text("show", "{=@no_such_tool.x=}"),
    ]);

    let outcome = interpreter(MockClassifier::fixed("да"))
        .run(&script, "привет")
        .await
        .expect("Run succeeds");

    assert_eq!(outcome.context(), "{=@no_such_tool.x=}");
    assert_eq!(outcome.last_step(), "show");
}

#[tokio::test]
async fn test_tool_node_records_last_step_without_text() {
    let script = Script::new(vec![ToolNode::new("call", "get_user_data").into()]);

    let outcome = interpreter(MockClassifier::fixed("да"))
        .run(&script, "привет")
        .await
        .expect("Run succeeds");

    assert_eq!(outcome.context(), "");
    assert_eq!(outcome.last_step(), "call");
}

#[tokio::test]
async fn test_tool_output_is_substituted_into_later_text() {
    let script = Script::new(vec![
        text("before", "Имя: {=@get_user_data.name=}"),
        ToolNode::new("call", "get_user_data").into(),
        text(
            "after",
            "Имя: {=@get_user_data.name=}, возраст: {=@get_user_data.age=}",
        ),
        text("unknown", "{=@unknownTool.x=}"),
    ]);

    let outcome = interpreter(MockClassifier::fixed("да"))
        .run(&script, "привет")
        .await
        .expect("Run succeeds");

    assert_eq!(
        outcome.context(),
        "Имя: {=@get_user_data.name=}\nИмя: Антон, возраст: 25\n{=@unknownTool.x=}"
    );
}

#[tokio::test]
async fn test_angry_user_takes_then_branch_and_end_wins_last_step() {
    let outcome = interpreter(MockClassifier::fixed("да"))
        .run(&angry_script(), "Вы опять всё перепутали!")
        .await
        .expect("Run succeeds");

    assert_eq!(outcome.context(), "Здравствуйте\nИзвините");
    assert_eq!(outcome.last_step(), "end");
}

#[tokio::test]
async fn test_calm_user_takes_else_branch() {
    let outcome = interpreter(MockClassifier::fixed("нет"))
        .run(&angry_script(), "Подскажите статус заказа")
        .await
        .expect("Run succeeds");

    assert_eq!(outcome.context(), "Здравствуйте\nХорошо");
    assert_eq!(outcome.last_step(), "end");
}

#[tokio::test]
async fn test_branch_child_sets_last_step_without_end() {
    let script = Script::new(vec![
        IfNode::new(
            "if1",
            "user is angry",
            vec![branch_text("sorry", "Извините")],
            vec![],
        )
        .into(),
    ]);

    let outcome = interpreter(MockClassifier::fixed("да"))
        .run(&script, "!!!")
        .await
        .expect("Run succeeds");

    assert_eq!(outcome.last_step(), "sorry");
}

#[tokio::test]
async fn test_empty_branch_leaves_if_as_last_step() {
    let script = Script::new(vec![
        IfNode::new("if1", "user is angry", vec![branch_text("sorry", "Извините")], vec![]).into(),
    ]);

    let outcome = interpreter(MockClassifier::fixed("нет"))
        .run(&script, "спасибо")
        .await
        .expect("Run succeeds");

    assert_eq!(outcome.context(), "");
    assert_eq!(outcome.last_step(), "if1");
}

#[tokio::test]
async fn test_non_text_branch_children_are_skipped() {
    let script: Script = r#"{"code": [
        {"id": "if1", "type": "if", "condition": "user is angry",
         "children": [
            {"id": "nested", "type": "if", "condition": "x",
             "children": [{"id": "deep", "type": "text", "text": "глубоко"}]},
            {"id": "tool", "type": "tool", "tool": "get_user_data"},
            {"id": "ok", "type": "text", "text": "Извините, {=@get_user_data.name=}"},
            {"id": "stop", "type": "end"}
         ]},
        {"id": "after", "type": "text", "text": "Продолжаем"}
    ]}"#
    .parse()
    .expect("Valid scenario");

    let classifier = Arc::new(MockClassifier::fixed("да"));
    let interpreter = ScenarioInterpreter::new(
        ToolRegistry::with_defaults(),
        ConditionEvaluator::new(Arc::clone(&classifier)),
    );
    let outcome = interpreter.run(&script, "!!!").await.expect("Run succeeds");

    assert_eq!(
        outcome.context(),
        "Извините, {=@get_user_data.name=}\nПродолжаем"
    );
    assert_eq!(outcome.last_step(), "after");
    assert_eq!(classifier.call_count(), 1);
}

#[tokio::test]
async fn test_condition_failure_falls_back_to_else() {
    let outcome = interpreter(MockClassifier::new(MockBehavior::Fail))
        .run(&angry_script(), "Вы опять всё перепутали!")
        .await
        .expect("Classifier errors do not fail the run");

    assert_eq!(outcome.context(), "Здравствуйте\nХорошо");
    assert_eq!(outcome.last_step(), "end");
}

#[tokio::test]
async fn test_condition_request_carries_condition_and_message() {
    let classifier = Arc::new(MockClassifier::fixed("нет"));
    let interpreter = ScenarioInterpreter::new(
        ToolRegistry::new(),
        ConditionEvaluator::new(Arc::clone(&classifier)),
    );

    interpreter
        .run(&angry_script(), "Где мой заказ?")
        .await
        .expect("Run succeeds");

    let calls = classifier.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].temperature, Some(0.0));
    let user = calls[0].messages.last().expect("Has user message").content();
    assert!(user.contains("user is angry"));
    assert!(user.contains("Где мой заказ?"));
}

struct FailingTool;

#[async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        "crm_lookup"
    }

    async fn invoke(&self) -> ShopragResult<ToolOutput> {
        Err(BackendError::new("CRM is down").into())
    }
}

#[tokio::test]
async fn test_tool_failure_aborts_run() {
    let mut tools = ToolRegistry::with_defaults();
    tools.register(Arc::new(FailingTool));
    let interpreter = ScenarioInterpreter::new(
        tools,
        ConditionEvaluator::new(Arc::new(MockClassifier::fixed("да"))),
    );
    let script = Script::new(vec![
        text("a", "начало"),
        ToolNode::new("crm", "crm_lookup").into(),
        text("b", "конец"),
    ]);

    let err = interpreter
        .run(&script, "привет")
        .await
        .expect_err("Tool failure propagates");

    match err.kind() {
        ShopragErrorKind::Scenario(e) => {
            assert!(matches!(
                &e.kind,
                ScenarioErrorKind::ToolFailed { tool, .. } if tool == "crm_lookup"
            ));
        }
        other => panic!("Expected scenario error, got {:?}", other),
    }
}

struct CountingTool {
    calls: AtomicUsize,
}

#[async_trait]
impl Tool for CountingTool {
    fn name(&self) -> &str {
        "counter"
    }

    async fn invoke(&self) -> ShopragResult<ToolOutput> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(ToolOutput::from([("n".to_string(), n.to_string())]))
    }
}

#[tokio::test]
async fn test_reinvoking_a_tool_overwrites_its_result() {
    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(CountingTool {
        calls: AtomicUsize::new(0),
    }));
    let interpreter = ScenarioInterpreter::new(
        tools,
        ConditionEvaluator::new(Arc::new(MockClassifier::fixed("да"))),
    );
    let script = Script::new(vec![
        ToolNode::new("c1", "counter").into(),
        text("a", "{=@counter.n=}"),
        ToolNode::new("c2", "counter").into(),
        text("b", "{=@counter.n=}"),
    ]);

    let outcome = interpreter.run(&script, "привет").await.expect("Run succeeds");

    assert_eq!(outcome.context(), "1\n2");
}

#[tokio::test]
async fn test_concurrent_runs_do_not_share_state() {
    let script = Arc::new(Script::new(vec![
        IfNode::new(
            "if1",
            "user is angry",
            vec![branch_text("sorry", "Извините")],
            vec![branch_text("fine", "Хорошо")],
        )
        .into(),
        ToolNode::new("call", "get_user_data").into(),
        text("name", "{=@get_user_data.name=}"),
    ]));

    let runner = Arc::new(ScenarioRunner::new(
        Arc::clone(&script),
        interpreter(MockClassifier::new(MockBehavior::YesWhenMessageContains(
            "!!!".to_string(),
        ))),
    ));

    let runs = (0..16).map(|i| {
        let runner = Arc::clone(&runner);
        async move {
            let message = if i % 2 == 0 { "Ужас!!!" } else { "Спасибо" };
            (i, runner.run(message).await.expect("Run succeeds"))
        }
    });
    let outcomes = futures::future::join_all(runs).await;

    for (i, outcome) in outcomes {
        let expected = if i % 2 == 0 {
            "Извините\nАнтон"
        } else {
            "Хорошо\nАнтон"
        };
        assert_eq!(outcome.context(), expected, "run {}", i);
        assert_eq!(outcome.last_step(), "name");
    }
}

#[tokio::test]
async fn test_runner_loads_script_from_file() {
    let dir = tempfile::tempdir().expect("Temp dir");
    let path = dir.path().join("Scenario.json");
    std::fs::write(
        &path,
        r#"{"code": [{"id": "hello", "type": "text", "text": "Здравствуйте"}]}"#,
    )
    .expect("Write scenario");

    let runner = ScenarioRunner::from_file(&path, interpreter(MockClassifier::fixed("да")))
        .expect("Scenario loads");
    let outcome = runner.run("привет").await.expect("Run succeeds");

    assert_eq!(runner.script().len(), 1);
    assert_eq!(outcome.context(), "Здравствуйте");
    assert_eq!(outcome.last_step(), "hello");
}
