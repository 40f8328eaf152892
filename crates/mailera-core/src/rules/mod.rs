//! Priority rules - ordered keyword buckets.
//!
//! A [`RuleSet`] is an ordered list of [`PriorityRule`] buckets, first bucket
//! being the highest priority. Each bucket holds keyword tokens used to sort
//! incoming mail.
//!
//! Editing is forgiving: every operation that cannot apply (empty token,
//! duplicate, unknown bucket, moving onto the same bucket) is a silent no-op.
//! Callers get a `bool` telling them whether anything changed, never an error.
//!
//! # Example
//!
//! ```ignore
//! use mailera_core::rules::{RuleEditor, RuleSet};
//!
//! let mut editor = RuleEditor::new(RuleSet::seed());
//! editor.add_keyword("critical", "Visa");
//!
//! // Drag "Seminar" from Major onto Critical
//! editor.begin_drag("major", "Seminar");
//! editor.hover("critical");
//! editor.drop_on("critical");
//!
//! let rules = editor.commit();
//! ```

mod drag;
mod editor;
mod model;

pub use drag::DragSession;
pub use editor::RuleEditor;
pub use model::{PriorityRule, RuleId, RuleSet};
