//! Agent integration tests.


use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use self::helpers::{
    EventLog, builder, calc_tool, call, counting_tool, failing_tool, text_turn, tool_turn,
};
use super::{
    Agent, CallPreparation, HasToolCall, MAX_STEPS_REASON, PrepareStep, RunContext, RunOptions,
    SAFETY_MAX_STEPS, TextContains, step_count_is,
};
use crate::Error;
use crate::backend::testing::ScriptedBackend;
use crate::backend::{BackendResponse, StreamChunk};
use crate::config::EngineSettings;
use crate::hooks::LegacyHooks;
use crate::skills::{Skill, SkillRegistry, SkillTool};
use crate::subagents::{Subagent, SubagentRegistry, SubagentTool};
use crate::tools::{DeferredTool, FunctionTool};
use crate::types::{FinishReason, Role, ToolCall, Usage};

#[tokio::test]
async fn test_single_step_stop() {
    let backend = Arc::new(ScriptedBackend::new().respond(text_turn("hello")));
    let agent = builder(&backend)
        .stop_when(step_count_is(1))
        .build()
        .unwrap();

    let result = agent.execute("hi").await.unwrap();

    assert_eq!(result.step_count(), 1);
    assert_eq!(result.finish_reason, FinishReason::Stop);
    assert_eq!(result.stop_reason, "stop");
    assert_eq!(result.text(), "hello");
    assert!(result.warnings.is_empty());
    assert!(result.finished_at >= result.started_at);
    assert_eq!(backend.request_count(), 1);
}

#[tokio::test]
async fn test_tool_call_then_answer() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .respond(tool_turn(vec![call("c1", "calc")]))
            .respond(text_turn("done")),
    );
    let agent = builder(&backend).tool(calc_tool()).max_steps(5).build().unwrap();

    let result = agent.execute("what is 6 * 7?").await.unwrap();

    assert_eq!(result.step_count(), 2);
    assert_eq!(result.tool_results.len(), 1);
    assert_eq!(result.tool_results[0].value(), Some(&json!("42")));
    assert_eq!(result.text(), "done");
    assert_eq!(result.finish_reason, FinishReason::Stop);
    assert_eq!(result.usage, Usage::new(20, 10));
    assert_eq!(result.metrics.tool_calls, 1);
    assert_eq!(result.metrics.backend_calls, 2);

    // user, assistant tool request, tool results
    let second = &backend.requests()[1];
    assert_eq!(second.messages.len(), 3);
    assert_eq!(second.messages[2].role, Role::Tool);
    assert_eq!(second.usage, Usage::new(10, 5));
    assert_eq!(second.step, 2);
    assert_eq!(result.messages.len(), 4);
}

#[tokio::test]
async fn test_unknown_tool_is_recorded_and_run_continues() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .respond(tool_turn(vec![call("c1", "missing")]))
            .respond(text_turn("recovered")),
    );
    let agent = builder(&backend).max_steps(3).build().unwrap();

    let result = agent.execute("go").await.unwrap();

    assert_eq!(result.step_count(), 2);
    assert_eq!(
        result.tool_results[0].error_message().as_deref(),
        Some("tool not found: missing")
    );
    assert_eq!(result.text(), "recovered");
    assert_eq!(result.metrics.errors, 1);
}

#[tokio::test]
async fn test_step_budget_exhaustion() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .respond(tool_turn(vec![call("c1", "calc")]))
            .respond(tool_turn(vec![call("c2", "calc")]))
            .respond(tool_turn(vec![call("c3", "calc")])),
    );
    let agent = builder(&backend).tool(calc_tool()).max_steps(2).build().unwrap();

    let result = agent.execute("loop").await.unwrap();

    assert_eq!(result.step_count(), 2);
    assert_eq!(result.finish_reason, FinishReason::Length);
    assert_eq!(result.stop_reason, MAX_STEPS_REASON);
    assert!(result.warnings.iter().any(|w| w.contains("maximum steps")));
    assert_eq!(result.tool_results.len(), 2);
    assert_eq!(backend.request_count(), 2);
}

#[tokio::test]
async fn test_explicit_condition_with_budget_uses_budget_as_ceiling() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .respond(tool_turn(vec![call("c1", "calc")]))
            .respond(tool_turn(vec![call("c2", "calc")]))
            .respond(tool_turn(vec![call("c3", "calc")])),
    );
    let agent = builder(&backend)
        .tool(calc_tool())
        .stop_when(Arc::new(TextContains("never".into())))
        .max_steps(2)
        .build()
        .unwrap();

    assert_eq!(agent.max_steps(), 2);
    let result = agent.execute("loop").await.unwrap();

    assert_eq!(result.step_count(), 2);
    assert_eq!(result.finish_reason, FinishReason::Length);
    assert_eq!(result.stop_reason, MAX_STEPS_REASON);
    assert!(result.warnings.iter().any(|w| w.contains("maximum steps")));
}

#[tokio::test]
async fn test_stop_condition_reason_is_recorded() {
    let submit = FunctionTool::new("submit", "Submit", json!({}), |_, _| async {
        Ok(json!("ok"))
    });
    let backend = Arc::new(
        ScriptedBackend::new()
            .respond(tool_turn(vec![call("c1", "submit")]))
            .respond(text_turn("unreachable")),
    );
    let agent = builder(&backend)
        .tool(submit)
        .stop_when(Arc::new(HasToolCall("submit".into())))
        .build()
        .unwrap();

    let result = agent.execute("finish").await.unwrap();

    assert_eq!(result.step_count(), 1);
    assert_eq!(result.stop_reason, "tool_called:submit");
    assert_eq!(result.finish_reason, FinishReason::ToolCalls);
    assert_eq!(result.tool_results.len(), 1);
    assert!(result.warnings.is_empty());
}

#[tokio::test]
async fn test_default_is_single_step() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .respond(tool_turn(vec![call("c1", "calc")]))
            .respond(text_turn("unreachable")),
    );
    let agent = builder(&backend).tool(calc_tool()).build().unwrap();

    assert_eq!(agent.max_steps(), 1);
    let result = agent.execute("once").await.unwrap();

    assert_eq!(result.step_count(), 1);
    assert_eq!(result.finish_reason, FinishReason::Length);
    assert_eq!(backend.request_count(), 1);
}

#[tokio::test]
async fn test_non_continuable_finish_ends_run_without_dispatch() {
    let backend = Arc::new(ScriptedBackend::new().respond(
        tool_turn(vec![call("c1", "calc")]).with_finish_reason(FinishReason::Length),
    ));
    let (tool, count) = counting_tool("calc");
    let agent = builder(&backend).tool(tool).max_steps(5).build().unwrap();

    let result = agent.execute("truncated").await.unwrap();

    assert_eq!(result.step_count(), 1);
    assert_eq!(result.stop_reason, "length");
    assert!(result.tool_results.is_empty());
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_tool_results_follow_call_order() {
    let slow = FunctionTool::new("slow", "Slow", json!({}), |_, _| async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(json!("slow"))
    });
    let backend = Arc::new(
        ScriptedBackend::new()
            .respond(tool_turn(vec![
                call("c1", "slow"),
                call("c2", "calc"),
                call("c3", "missing"),
            ]))
            .respond(text_turn("done")),
    );
    let agent = builder(&backend)
        .tool(slow)
        .tool(calc_tool())
        .max_steps(2)
        .build()
        .unwrap();

    let result = agent.execute("go").await.unwrap();

    let ids: Vec<_> = result.steps[0]
        .tool_results
        .iter()
        .map(|r| r.tool_call_id.as_str())
        .collect();
    assert_eq!(ids, vec!["c1", "c2", "c3"]);
    assert!(result.steps[0].tool_results[2].is_error());
}

#[tokio::test]
async fn test_tool_failure_does_not_abort_run() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .respond(tool_turn(vec![call("c1", "flaky")]))
            .respond(text_turn("handled")),
    );
    let agent = builder(&backend)
        .tool(failing_tool("flaky"))
        .max_steps(3)
        .build()
        .unwrap();

    let result = agent.execute("try").await.unwrap();

    assert_eq!(
        result.tool_results[0].error_message().as_deref(),
        Some("execution failed: boom")
    );
    assert_eq!(result.text(), "handled");
    assert_eq!(result.metrics.tool_stats["flaky"].errors, 1);
}

#[tokio::test]
async fn test_callbacks_engine_before_invocation() {
    let log = EventLog::default();
    let backend = Arc::new(
        ScriptedBackend::new()
            .respond(tool_turn(vec![call("c1", "calc")]))
            .respond(text_turn("done")),
    );
    let agent = builder(&backend)
        .tool(calc_tool())
        .max_steps(3)
        .callbacks(log.callbacks("engine:"))
        .build()
        .unwrap();

    agent
        .execute_with("go", RunOptions::new().with_callbacks(log.callbacks("call:")))
        .await
        .unwrap();

    let expected: Vec<String> = [
        "run_start",
        "step_start:1",
        "tool_start:calc",
        "tool_finish:calc",
        "step_finish:1",
        "step_start:2",
        "step_finish:2",
        "run_finish",
    ]
    .iter()
    .flat_map(|e| [format!("engine:{e}"), format!("call:{e}")])
    .collect();
    assert_eq!(log.entries(), expected);
}

#[tokio::test]
async fn test_legacy_hooks_fire_alongside_callbacks() {
    let log = EventLog::default();
    let (a, b, c, d, e) = (log.clone(), log.clone(), log.clone(), log.clone(), log.clone());
    let hooks = LegacyHooks::new()
        .on_llm_start(move |ev| a.push(format!("llm_start:{}", ev.step)))
        .on_tool_start(move |call| b.push(format!("tool_start:{}", call.name)))
        .on_tool_end(move |result| c.push(format!("tool_end:{}", result.tool_name)))
        .on_agent_action(move |action| d.push(format!("agent_action:{}", action.tool_call.name)))
        .on_agent_finish(move |finish| e.push(format!("agent_finish:{}", finish.output)));

    let backend = Arc::new(
        ScriptedBackend::new()
            .respond(tool_turn(vec![call("c1", "calc")]))
            .respond(text_turn("done")),
    );
    let agent = builder(&backend)
        .tool(calc_tool())
        .max_steps(3)
        .legacy_hooks(hooks)
        .build()
        .unwrap();

    agent.execute("go").await.unwrap();

    assert_eq!(
        log.entries(),
        vec![
            "llm_start:1",
            "tool_start:calc",
            "tool_end:calc",
            "agent_action:calc",
            "llm_start:2",
            "agent_finish:done",
        ]
    );
}

#[tokio::test]
async fn test_deferred_tool_gets_placeholder() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .respond(tool_turn(vec![call("c1", "web_search")]))
            .respond(text_turn("found it")),
    );
    let agent = builder(&backend)
        .tool(DeferredTool::new("web_search", "Search the web", json!({})))
        .max_steps(3)
        .build()
        .unwrap();

    let result = agent.execute("search").await.unwrap();

    assert!(result.tool_results[0].deferred);
    assert!(!result.tool_results[0].is_error());
    assert_eq!(result.metrics.deferred_tool_calls, 1);

    let requests = backend.requests();
    assert!(requests[0].tools[0].deferred);
    // No tool-result message for the placeholder.
    assert_eq!(requests[1].messages.len(), 2);
}

#[tokio::test]
async fn test_rejected_call_is_not_executed() {
    let (tool, count) = counting_tool("shell");
    let backend = Arc::new(
        ScriptedBackend::new()
            .respond(tool_turn(vec![call("c1", "shell"), call("c2", "calc")]))
            .respond(text_turn("ok")),
    );
    let agent = builder(&backend)
        .tool(tool)
        .tool(calc_tool())
        .require_approval(|call: &ToolCall| call.name != "shell")
        .max_steps(3)
        .build()
        .unwrap();

    let result = agent.execute("go").await.unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 0);
    assert_eq!(
        result.tool_results[0].error_message().as_deref(),
        Some("tool call rejected: shell")
    );
    assert_eq!(result.tool_results[1].value(), Some(&json!("42")));
}

#[test]
fn test_build_requires_backend() {
    let err = Agent::builder().build().unwrap_err();
    assert!(err.is_configuration_error());
}

#[test]
fn test_build_rejects_approval_without_approver() {
    let backend = Arc::new(ScriptedBackend::new());
    let err = builder(&backend)
        .approval(crate::tools::ApprovalPolicy::required_without_approver())
        .build()
        .unwrap_err();
    assert!(err.is_configuration_error());
}

#[test]
fn test_build_rejects_duplicate_skill() {
    let backend = Arc::new(ScriptedBackend::new());
    let skill = Skill::new("echo", |s: String| async move { Ok(s) });
    let err = builder(&backend)
        .skill(skill.clone())
        .skill(skill)
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::Registry(_)));
}

struct CountingPrepare {
    seen: Mutex<Vec<Option<serde_json::Value>>>,
}

#[async_trait]
impl PrepareStep for CountingPrepare {
    async fn prepare(&self, mut call: CallPreparation) -> crate::Result<CallPreparation> {
        self.seen.lock().unwrap().push(call.custom.clone());
        call.system_prompt = Some(format!("step {}", call.step));
        call.custom = Some(json!(call.step));
        Ok(call)
    }
}

#[tokio::test]
async fn test_prepare_step_rewrites_call_and_carries_custom() {
    let prepare = Arc::new(CountingPrepare {
        seen: Mutex::new(Vec::new()),
    });

    struct Shared(Arc<CountingPrepare>);

    #[async_trait]
    impl PrepareStep for Shared {
        async fn prepare(&self, call: CallPreparation) -> crate::Result<CallPreparation> {
            self.0.prepare(call).await
        }
    }

    let backend = Arc::new(
        ScriptedBackend::new()
            .respond(tool_turn(vec![call("c1", "calc")]))
            .respond(text_turn("done")),
    );
    let agent = builder(&backend)
        .system_prompt("original")
        .tool(calc_tool())
        .max_steps(3)
        .prepare_step(Shared(Arc::clone(&prepare)))
        .build()
        .unwrap();

    agent.execute("go").await.unwrap();

    assert_eq!(*prepare.seen.lock().unwrap(), vec![None, Some(json!(1))]);
    let requests = backend.requests();
    assert_eq!(requests[0].system_prompt.as_deref(), Some("step 1"));
    assert_eq!(requests[1].system_prompt.as_deref(), Some("step 2"));
    assert_eq!(agent.config().system_prompt.as_deref(), Some("original"));
}

#[tokio::test(start_paused = true)]
async fn test_run_timeout() {
    let log = EventLog::default();
    let backend = Arc::new(
        ScriptedBackend::new().respond_after(Duration::from_secs(10), text_turn("late")),
    );
    let agent = builder(&backend)
        .run_timeout(Duration::from_secs(1))
        .callbacks(log.callbacks(""))
        .build()
        .unwrap();

    let err = agent.execute("slow").await.unwrap_err();

    assert!(matches!(err, Error::Timeout(_)));
    assert_eq!(err.step(), None);
    assert!(log.entries().contains(&"run_error:None".to_string()));
    assert!(!log.entries().contains(&"run_finish".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_step_timeout_reports_step() {
    let backend = Arc::new(
        ScriptedBackend::new().respond_after(Duration::from_secs(5), text_turn("late")),
    );
    let agent = builder(&backend)
        .step_timeout(Duration::from_secs(1))
        .build()
        .unwrap();

    let err = agent.execute("slow").await.unwrap_err();

    assert_eq!(err.step(), Some(1));
    assert!(matches!(err.root(), Error::Timeout(_)));
    assert!(err.is_resource_limit());
}

#[tokio::test]
async fn test_backend_error_is_step_scoped() {
    let log = EventLog::default();
    let backend = Arc::new(
        ScriptedBackend::new()
            .respond(tool_turn(vec![call("c1", "calc")]))
            .fail("overloaded"),
    );
    let agent = builder(&backend)
        .tool(calc_tool())
        .max_steps(3)
        .callbacks(log.callbacks(""))
        .build()
        .unwrap();

    let err = agent.execute("go").await.unwrap_err();

    assert_eq!(err.step(), Some(2));
    assert!(matches!(err.root(), Error::Backend { .. }));
    assert_eq!(log.entries().last().map(String::as_str), Some("run_error:Some(2)"));
}

#[tokio::test(start_paused = true)]
async fn test_cancellation() {
    let backend = Arc::new(
        ScriptedBackend::new().respond_after(Duration::from_secs(10), text_turn("late")),
    );
    let agent = builder(&backend).build().unwrap();

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        trigger.cancel();
    });

    let err = agent
        .execute_with("wait", RunOptions::new().with_cancellation(token))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Cancelled));
}

#[tokio::test]
async fn test_run_id_generated_per_run() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .respond(text_turn("one"))
            .respond(text_turn("two")),
    );
    let agent = builder(&backend).build().unwrap();

    let first = agent.execute("a").await.unwrap();
    let second = agent.execute("b").await.unwrap();

    assert!(!first.run_id().is_empty());
    assert_ne!(first.run_id(), second.run_id());
    assert_eq!(backend.requests()[0].run.run_id(), first.run_id());
}

#[tokio::test]
async fn test_caller_supplied_run_context_reaches_tools() {
    let seen = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&seen);
    let recorder = FunctionTool::new("recorder", "Record run", json!({}), move |_, ctx| {
        *sink.lock().unwrap() = Some((ctx.run().run_id().to_string(), ctx.run().tags().to_vec()));
        async { Ok(json!("seen")) }
    });
    let backend = Arc::new(
        ScriptedBackend::new()
            .respond(tool_turn(vec![call("c1", "recorder")]))
            .respond(text_turn("done")),
    );
    let agent = builder(&backend).tool(recorder).max_steps(2).build().unwrap();

    let context = RunContext::new().with_run_id("run-7").with_tag("eval");
    let result = agent
        .execute_with("go", RunOptions::new().with_context(context))
        .await
        .unwrap();

    assert_eq!(result.run_id(), "run-7");
    assert_eq!(
        *seen.lock().unwrap(),
        Some(("run-7".to_string(), vec!["eval".to_string()]))
    );
}

#[tokio::test]
async fn test_streaming_emits_chunks_in_order() {
    let log = EventLog::default();
    let backend = Arc::new(ScriptedBackend::new().stream_chunks(vec![
        (Duration::ZERO, StreamChunk::Text("Hel".into())),
        (Duration::ZERO, StreamChunk::Text("lo".into())),
        (
            Duration::ZERO,
            StreamChunk::Finish {
                finish_reason: FinishReason::Stop,
                usage: Usage::new(3, 2),
            },
        ),
    ]));
    let agent = builder(&backend)
        .streaming(true)
        .callbacks(log.callbacks(""))
        .build()
        .unwrap();

    let result = agent.execute("greet").await.unwrap();

    assert_eq!(result.text(), "Hello");
    assert_eq!(result.usage, Usage::new(3, 2));
    let chunks: Vec<_> = log
        .entries()
        .into_iter()
        .filter(|e| e.starts_with("chunk:"))
        .collect();
    assert_eq!(chunks, vec!["chunk:Hel", "chunk:lo"]);
}

#[tokio::test(start_paused = true)]
async fn test_chunk_timeout() {
    let backend = Arc::new(ScriptedBackend::new().stream_chunks(vec![
        (Duration::ZERO, StreamChunk::Text("a".into())),
        (Duration::from_secs(5), StreamChunk::Text("b".into())),
    ]));
    let agent = builder(&backend)
        .streaming(true)
        .chunk_timeout(Duration::from_secs(1))
        .build()
        .unwrap();

    let err = agent.execute("stall").await.unwrap_err();

    assert_eq!(err.step(), Some(1));
    assert!(matches!(err.root(), Error::Timeout(_)));
}

#[tokio::test]
async fn test_concurrent_runs_share_agent() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .respond(text_turn("a"))
            .respond(text_turn("b")),
    );
    let agent = Arc::new(builder(&backend).build().unwrap());

    let (first, second) = tokio::join!(agent.execute("one"), agent.execute("two"));
    let (first, second) = (first.unwrap(), second.unwrap());

    assert_ne!(first.run_id(), second.run_id());
    assert_eq!(backend.request_count(), 2);
}

fn child_agent(answer: &str) -> (Arc<ScriptedBackend>, Agent) {
    let backend = Arc::new(ScriptedBackend::new().respond(text_turn(answer)));
    let agent = builder(&backend)
        .system_prompt("You research things.")
        .build()
        .unwrap();
    (backend, agent)
}

#[tokio::test]
async fn test_subagent_delegation() {
    let (child_backend, child) = child_agent("child answer");
    let parent_backend = Arc::new(ScriptedBackend::new());
    let parent = builder(&parent_backend)
        .subagent("researcher", child)
        .build()
        .unwrap();

    let delegation = parent
        .subagents()
        .delegate("researcher", "find it")
        .await
        .unwrap();

    assert!(delegation.is_success());
    assert_eq!(delegation.text(), Some("child answer"));
    assert_eq!(delegation.messages.len(), 1);
    assert_eq!(
        child_backend.requests()[0].system_prompt.as_deref(),
        Some("You research things.")
    );

    let missing = parent.subagents().delegate("nobody", "hi").await.unwrap_err();
    assert!(matches!(missing, Error::Registry(_)));
}

#[tokio::test]
async fn test_subagent_tool_runs_child_with_parent_link() {
    let (child_backend, child) = child_agent("child answer");
    let mut registry = SubagentRegistry::new();
    registry
        .register(Subagent::new("researcher", child).with_description("Digs up facts"))
        .unwrap();

    let parent_backend = Arc::new(
        ScriptedBackend::new()
            .respond(tool_turn(vec![ToolCall::new(
                "c1",
                "delegate",
                json!({"agent": "researcher", "prompt": "dig"}),
            )]))
            .respond(text_turn("summarized")),
    );
    let parent = builder(&parent_backend)
        .tool(SubagentTool::new(registry).with_parent_link(true))
        .max_steps(3)
        .build()
        .unwrap();

    let result = parent.execute("research").await.unwrap();

    assert_eq!(result.tool_results[0].value(), Some(&json!("child answer")));
    assert_eq!(result.text(), "summarized");

    let child_run = &child_backend.requests()[0].run;
    assert_eq!(child_run.parent_run_id(), Some(result.run_id()));
    assert_ne!(child_run.run_id(), result.run_id());
}

#[tokio::test]
async fn test_subagent_tool_does_not_forward_run_by_default() {
    let (child_backend, child) = child_agent("child answer");
    let mut registry = SubagentRegistry::new();
    registry.register(Subagent::new("researcher", child)).unwrap();

    let parent_backend = Arc::new(
        ScriptedBackend::new()
            .respond(tool_turn(vec![ToolCall::new(
                "c1",
                "delegate",
                json!({"agent": "researcher", "prompt": "dig"}),
            )]))
            .respond(text_turn("summarized")),
    );
    let parent = builder(&parent_backend)
        .tool(SubagentTool::new(registry))
        .max_steps(3)
        .build()
        .unwrap();

    let context = RunContext::new().with_run_id("parent-run").with_tag("batch");
    let result = parent
        .execute_with("research", RunOptions::new().with_context(context))
        .await
        .unwrap();

    assert_eq!(result.tool_results[0].value(), Some(&json!("child answer")));
    let child_run = &child_backend.requests()[0].run;
    assert_eq!(child_run.parent_run_id(), None);
    assert!(child_run.tags().is_empty());
    assert!(!child_run.run_id().is_empty());
    assert_ne!(child_run.run_id(), "parent-run");
}

#[tokio::test]
async fn test_skill_tool_in_run() {
    let mut skills = SkillRegistry::new();
    skills
        .register(Skill::new("upper", |s: String| async move { Ok(s.to_uppercase()) }))
        .unwrap();

    let backend = Arc::new(
        ScriptedBackend::new()
            .respond(tool_turn(vec![
                ToolCall::new("c1", "skill", json!({"skill": "upper", "input": "hi"})),
                ToolCall::new("c2", "skill", json!({"skill": "absent", "input": "x"})),
            ]))
            .respond(text_turn("done")),
    );
    let agent = builder(&backend)
        .tool(SkillTool::new(skills))
        .max_steps(2)
        .build()
        .unwrap();

    let result = agent.execute("shout").await.unwrap();

    assert_eq!(result.tool_results[0].value(), Some(&json!("HI")));
    assert!(result.tool_results[1].is_error());
}

#[tokio::test]
async fn test_catalog_edits_between_runs() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .respond(tool_turn(vec![call("c1", "calc")]))
            .respond(text_turn("done")),
    );
    let mut agent = builder(&backend).tool(failing_tool("calc")).max_steps(2).build().unwrap();

    assert!(agent.add_tool(calc_tool()).is_some());
    assert_eq!(agent.tools().len(), 1);

    let result = agent.execute("go").await.unwrap();
    assert_eq!(result.tool_results[0].value(), Some(&json!("42")));

    assert!(agent.remove_tool("calc").is_some());
    assert!(agent.tools().is_empty());
}

#[test]
fn test_settings_apply_to_builder() {
    let settings = EngineSettings::from_json_str(
        r#"{"system_prompt": "Be brief.", "max_steps": 4, "streaming": true, "max_tokens": 256}"#,
    )
    .unwrap();
    let backend = Arc::new(ScriptedBackend::new());

    let agent = settings.apply(builder(&backend)).build().unwrap();

    assert_eq!(agent.config().system_prompt.as_deref(), Some("Be brief."));
    assert!(agent.config().execution.streaming);
    assert_eq!(agent.config().sampling.max_tokens, Some(256));
    assert_eq!(agent.stop_conditions().len(), 1);
    assert_eq!(agent.max_steps(), SAFETY_MAX_STEPS);
}

#[tokio::test]
async fn test_response_warnings_are_collected() {
    let backend = Arc::new(
        ScriptedBackend::new().respond(
            BackendResponse::text("ok").with_warning("temperature ignored"),
        ),
    );
    let agent = builder(&backend).build().unwrap();

    let result = agent.execute("go").await.unwrap();

    assert_eq!(result.warnings, vec!["temperature ignored".to_string()]);
    assert_eq!(result.steps[0].warnings.len(), 1);
}
