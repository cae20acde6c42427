//! Run identity carried explicitly through every call boundary.

use serde::{Deserialize, Serialize};

/// Correlation identifiers for one execution call.
///
/// Purely observational: the loop never branches on these values. A fresh
/// context is generated per top-level execution unless the caller supplies one,
/// and it is not forwarded into subagent delegations automatically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    run_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent_run_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
}

impl RunContext {
    pub fn new() -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            parent_run_id: None,
            tags: Vec::new(),
        }
    }

    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = run_id.into();
        self
    }

    pub fn with_parent_run_id(mut self, parent: impl Into<String>) -> Self {
        self.parent_run_id = Some(parent.into());
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Context for a nested run: new run id, this run as parent, same tags.
    pub fn child(&self) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            parent_run_id: Some(self.run_id.clone()),
            tags: self.tags.clone(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn set_run_id(&mut self, run_id: impl Into<String>) {
        self.run_id = run_id.into();
    }

    pub fn parent_run_id(&self) -> Option<&str> {
        self.parent_run_id.as_deref()
    }

    pub fn set_parent_run_id(&mut self, parent: Option<String>) {
        self.parent_run_id = parent;
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.tags = tags;
    }

    /// Fill in a run id if the caller left it empty.
    pub(crate) fn ensure_run_id(mut self) -> Self {
        if self.run_id.is_empty() {
            self.run_id = uuid::Uuid::new_v4().to_string();
        }
        self
    }
}
