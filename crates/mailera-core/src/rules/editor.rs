//! In-progress rule editing session.

use tracing::debug;

use super::drag::DragSession;
use super::model::{RuleId, RuleSet};

/// Edit session over a private working copy of a [`RuleSet`].
///
/// Nothing done here is visible outside the editor until [`commit`](Self::commit).
/// Every operation mutates the single working copy in place, so a drop always
/// observes the result of the drop before it.
#[derive(Debug, Clone)]
pub struct RuleEditor {
    original: RuleSet,
    working: RuleSet,
    drag: Option<DragSession>,
}

impl RuleEditor {
    /// Starts an edit session.
    #[must_use]
    pub fn new(rules: RuleSet) -> Self {
        Self {
            working: rules.clone(),
            original: rules,
            drag: None,
        }
    }

    /// Current in-session rules, for rendering.
    #[must_use]
    pub const fn rules(&self) -> &RuleSet {
        &self.working
    }

    /// Returns true if the working copy differs from the rules the session began with.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.working != self.original
    }

    /// Removes a keyword from a rule. No-op if absent.
    pub fn remove_keyword(&mut self, rule_id: &str, token: &str) -> bool {
        let changed = self.working.remove_keyword(rule_id, token);
        debug!(rule_id, token, changed, "remove keyword");
        changed
    }

    /// Adds a keyword to a rule. Blank or duplicate input is ignored.
    pub fn add_keyword(&mut self, rule_id: &str, token: &str) -> bool {
        let changed = self.working.add_keyword(rule_id, token);
        debug!(rule_id, token, changed, "add keyword");
        changed
    }

    /// Moves a keyword between rules. See [`RuleSet::move_keyword`].
    pub fn move_keyword(&mut self, source: &str, target: &str, token: &str) -> bool {
        let changed = self.working.move_keyword(source, target, token);
        debug!(source, target, token, changed, "move keyword");
        changed
    }

    /// Picks up `token` from `source`.
    ///
    /// Replaces any drag already in progress. Does nothing if the source
    /// does not hold the token.
    pub fn begin_drag(&mut self, source: &str, token: &str) -> bool {
        let holds = self
            .working
            .get(source)
            .is_some_and(|rule| rule.contains(token));
        if !holds {
            debug!(source, token, "drag ignored, keyword not in bucket");
            return false;
        }
        self.drag = Some(DragSession::new(RuleId::new(source), token));
        true
    }

    /// The drag in progress, if any.
    #[must_use]
    pub const fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Marks `target` as the pending drop target.
    pub fn hover(&mut self, target: &str) {
        if self.working.get(target).is_none() {
            return;
        }
        if let Some(drag) = self.drag.as_mut() {
            drag.hover(RuleId::new(target));
        }
    }

    /// Pointer left the hovered bucket without dropping.
    pub fn leave(&mut self) {
        if let Some(drag) = self.drag.as_mut() {
            drag.leave();
        }
    }

    /// Drops the dragged keyword on `target`, ending the drag.
    ///
    /// Returns true if the rules changed.
    pub fn drop_on(&mut self, target: &str) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        self.move_keyword(drag.source().as_str(), target, drag.token())
    }

    /// Abandons the drag without touching the rules.
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Ends the session, returning the edited rules.
    #[must_use]
    pub fn commit(self) -> RuleSet {
        self.working
    }

    /// Ends the session, returning the rules it began with.
    #[must_use]
    pub fn discard(self) -> RuleSet {
        self.original
    }
}
