//! Stop conditions for the agent loop.
//!
//! Conditions are pure predicates over the accumulated run state. They are
//! evaluated after every continuable step, in registration order, and the first
//! one that returns a reason ends the run. The reason is recorded verbatim on
//! the [`AgentResult`](super::AgentResult).
//!
//! # Built-in Conditions
//!
//! - [`StepCountIs`]: stop once N steps have completed
//! - [`HasToolCall`]: stop when the last step called a specific tool
//! - [`TokenBudget`]: stop when cumulative token usage reaches a limit
//! - [`TextContains`]: stop when the last step's text contains a pattern
//! - [`FnCondition`]: wrap a closure

use std::sync::Arc;

use super::events::StepResult;
use crate::types::{Message, Usage};

/// Raw loop ceiling used once termination is delegated to the condition set.
pub const SAFETY_MAX_STEPS: usize = 1000;

pub const MAX_STEPS_REASON: &str = "max_steps_reached";

/// Snapshot of loop state provided to stop checks.
pub struct StopState<'a> {
    /// Steps completed so far, in execution order.
    pub steps: &'a [StepResult],
    /// Transcript after the last step's tool results were appended.
    pub messages: &'a [Message],
    /// Usage accumulated across all backend calls.
    pub usage: &'a Usage,
}

impl StopState<'_> {
    pub fn last_step(&self) -> Option<&StepResult> {
        self.steps.last()
    }
}

pub trait StopCondition: Send + Sync {
    /// Returns the stop reason when the condition is satisfied.
    fn check(&self, state: &StopState<'_>) -> Option<String>;

    /// Whether hitting this condition means the step budget ran out.
    fn is_step_budget(&self) -> bool {
        false
    }
}

/// The first satisfied condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopHit {
    pub reason: String,
    pub step_budget: bool,
}

/// Ordered set of stop conditions composed by logical OR.
#[derive(Clone, Default)]
pub struct StopConditions {
    conditions: Vec<Arc<dyn StopCondition>>,
}

impl StopConditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, condition: Arc<dyn StopCondition>) {
        self.conditions.push(condition);
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluate conditions in declaration order and return the first match.
    pub fn evaluate(&self, state: &StopState<'_>) -> Option<StopHit> {
        self.conditions.iter().find_map(|condition| {
            condition
                .check(state)
                .filter(|reason| !reason.is_empty())
                .map(|reason| StopHit {
                    reason,
                    step_budget: condition.is_step_budget(),
                })
        })
    }

    /// Resolve the condition set and raw iteration ceiling from the configured
    /// conditions and optional step budget.
    pub(crate) fn normalize(self, max_steps: Option<usize>) -> (Self, usize) {
        let budget = max_steps.filter(|n| *n > 0);
        match (self.is_empty(), budget) {
            (true, None) => (Self::from(vec![step_count_is(1)]), 1),
            (true, Some(n)) => (Self::from(vec![step_count_is(n)]), SAFETY_MAX_STEPS),
            (false, Some(n)) => (self, n),
            (false, None) => (self, SAFETY_MAX_STEPS),
        }
    }
}

impl From<Vec<Arc<dyn StopCondition>>> for StopConditions {
    fn from(conditions: Vec<Arc<dyn StopCondition>>) -> Self {
        Self { conditions }
    }
}

impl std::fmt::Debug for StopConditions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopConditions")
            .field("count", &self.conditions.len())
            .finish()
    }
}

pub fn step_count_is(n: usize) -> Arc<dyn StopCondition> {
    Arc::new(StepCountIs(n))
}

/// Stop once N steps have completed.
#[derive(Debug, Clone, Copy)]
pub struct StepCountIs(pub usize);

impl StopCondition for StepCountIs {
    fn check(&self, state: &StopState<'_>) -> Option<String> {
        (state.steps.len() >= self.0).then(|| MAX_STEPS_REASON.to_string())
    }

    fn is_step_budget(&self) -> bool {
        true
    }
}

/// Stop when the most recent step requested the named tool.
#[derive(Debug, Clone)]
pub struct HasToolCall(pub String);

impl StopCondition for HasToolCall {
    fn check(&self, state: &StopState<'_>) -> Option<String> {
        let step = state.last_step()?;
        step.tool_calls
            .iter()
            .any(|call| call.name == self.0)
            .then(|| format!("tool_called:{}", self.0))
    }
}

/// Stop when cumulative token usage reaches a budget. 0 = unlimited.
#[derive(Debug, Clone, Copy)]
pub struct TokenBudget(pub u64);

impl StopCondition for TokenBudget {
    fn check(&self, state: &StopState<'_>) -> Option<String> {
        (self.0 > 0 && state.usage.total() >= self.0).then(|| "token_budget_exceeded".to_string())
    }
}

/// Stop when the most recent step's text contains a pattern.
#[derive(Debug, Clone)]
pub struct TextContains(pub String);

impl StopCondition for TextContains {
    fn check(&self, state: &StopState<'_>) -> Option<String> {
        let step = state.last_step()?;
        step.text
            .contains(self.0.as_str())
            .then(|| "text_matched".to_string())
    }
}

type ConditionFn = dyn Fn(&StopState<'_>) -> bool + Send + Sync;

/// Closure-backed condition reporting a fixed reason.
pub struct FnCondition {
    reason: String,
    predicate: Box<ConditionFn>,
}

impl FnCondition {
    pub fn new(
        reason: impl Into<String>,
        predicate: impl Fn(&StopState<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            reason: reason.into(),
            predicate: Box::new(predicate),
        }
    }
}

impl StopCondition for FnCondition {
    fn check(&self, state: &StopState<'_>) -> Option<String> {
        (self.predicate)(state).then(|| self.reason.clone())
    }
}
