//! Transient drag-and-drop state.

use super::model::RuleId;

/// A keyword being dragged from one bucket, with the bucket currently hovered.
///
/// Owned by the [`RuleEditor`](super::RuleEditor) and discarded on drop or
/// cancel. Never persisted with the rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    source: RuleId,
    token: String,
    pending_target: Option<RuleId>,
}

impl DragSession {
    pub(crate) fn new(source: RuleId, token: impl Into<String>) -> Self {
        Self {
            source,
            token: token.into(),
            pending_target: None,
        }
    }

    /// Bucket the keyword was picked up from.
    #[must_use]
    pub const fn source(&self) -> &RuleId {
        &self.source
    }

    /// The keyword being dragged.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Bucket currently highlighted as the drop target.
    #[must_use]
    pub const fn pending_target(&self) -> Option<&RuleId> {
        self.pending_target.as_ref()
    }

    /// Hovering the source bucket never highlights it.
    pub(crate) fn hover(&mut self, target: RuleId) {
        self.pending_target = (target != self.source).then_some(target);
    }

    pub(crate) fn leave(&mut self) {
        self.pending_target = None;
    }
}
