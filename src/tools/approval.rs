//! Approval gating for tool calls.

use std::sync::Arc;

use async_trait::async_trait;

use crate::agent::RunContext;
use crate::types::{ToolCall, ToolError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalDecision {
    Approve,
    Reject { reason: Option<String> },
}

impl ApprovalDecision {
    pub fn reject(reason: impl Into<String>) -> Self {
        Self::Reject {
            reason: Some(reason.into()),
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approve)
    }
}

#[async_trait]
pub trait ToolApprover: Send + Sync {
    async fn approve(&self, call: &ToolCall, run: &RunContext) -> ApprovalDecision;
}

/// Approver backed by a synchronous predicate.
pub struct FnApprover<F>(pub F);

#[async_trait]
impl<F> ToolApprover for FnApprover<F>
where
    F: Fn(&ToolCall) -> bool + Send + Sync,
{
    async fn approve(&self, call: &ToolCall, _run: &RunContext) -> ApprovalDecision {
        if (self.0)(call) {
            ApprovalDecision::Approve
        } else {
            ApprovalDecision::Reject { reason: None }
        }
    }
}

/// Global approval policy applied to every tool call.
#[derive(Clone, Default)]
pub struct ApprovalPolicy {
    required: bool,
    approver: Option<Arc<dyn ToolApprover>>,
}

impl ApprovalPolicy {
    /// No approval needed.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn require(approver: Arc<dyn ToolApprover>) -> Self {
        Self {
            required: true,
            approver: Some(approver),
        }
    }

    pub fn require_fn(predicate: impl Fn(&ToolCall) -> bool + Send + Sync + 'static) -> Self {
        Self::require(Arc::new(FnApprover(predicate)))
    }

    /// Mark approval as required without an approver; rejected at build time.
    pub fn required_without_approver() -> Self {
        Self {
            required: true,
            approver: None,
        }
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub(crate) fn is_consistent(&self) -> bool {
        !self.required || self.approver.is_some()
    }

    /// Consult the approver; `Err` carries the rejection recorded for this call.
    pub async fn check(&self, call: &ToolCall, run: &RunContext) -> Result<(), ToolError> {
        if !self.required {
            return Ok(());
        }
        let Some(approver) = &self.approver else {
            return Err(ToolError::rejected(&call.name, Some("no approver".into())));
        };
        match approver.approve(call, run).await {
            ApprovalDecision::Approve => Ok(()),
            ApprovalDecision::Reject { reason } => Err(ToolError::rejected(&call.name, reason)),
        }
    }
}

impl std::fmt::Debug for ApprovalPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApprovalPolicy")
            .field("required", &self.required)
            .field("has_approver", &self.approver.is_some())
            .finish()
    }
}
