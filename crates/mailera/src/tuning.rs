//! Line-based rule editor session.
//!
//! Each input line is one gesture on a [`RuleEditor`]. Keywords are the rest
//! of the line, so they may contain spaces.

use std::io::{self, BufRead, Write};

use mailera_core::{RuleEditor, RuleSet};

use crate::render;

const HELP: &str = "\
show                      list buckets
add <rule> <keyword>      add a keyword
rm <rule> <keyword>       remove a keyword
mv <from> <to> <keyword>  move a keyword
drag <rule> <keyword>     pick up a keyword
hover <rule>              hover the dragged keyword over a bucket
leave                     stop hovering
drop <rule>               drop the dragged keyword
cancel                    abandon the drag
save                      keep changes and continue
back                      discard changes";

/// One editor gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    /// Redraw the buckets.
    Show,
    /// Add `keyword` to `rule`.
    Add {
        /// Target bucket.
        rule: String,
        /// Keyword text.
        keyword: String,
    },
    /// Remove `keyword` from `rule`.
    Remove {
        /// Bucket holding the keyword.
        rule: String,
        /// Keyword text.
        keyword: String,
    },
    /// Move `keyword` between buckets in one step.
    Move {
        /// Bucket holding the keyword.
        from: String,
        /// Destination bucket.
        to: String,
        /// Keyword text.
        keyword: String,
    },
    /// Start dragging.
    Drag {
        /// Bucket holding the keyword.
        rule: String,
        /// Keyword text.
        keyword: String,
    },
    /// Hover over a bucket.
    Hover(String),
    /// Leave the hovered bucket.
    Leave,
    /// Drop on a bucket.
    Drop(String),
    /// Abandon the drag.
    Cancel,
    /// Commit.
    Save,
    /// Discard.
    Back,
    /// Print usage.
    Help,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The user saved; carries the edited rules.
    Saved(RuleSet),
    /// The user backed out; nothing changes.
    Back,
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Gesture>, &'static str> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = split_word(line);

    let gesture = match verb {
        "show" | "ls" => Gesture::Show,
        "add" => {
            let (rule, keyword) = rule_and_keyword(rest, "usage: add <rule> <keyword>")?;
            Gesture::Add { rule, keyword }
        }
        "rm" => {
            let (rule, keyword) = rule_and_keyword(rest, "usage: rm <rule> <keyword>")?;
            Gesture::Remove { rule, keyword }
        }
        "mv" => {
            let (from, rest) = split_word(rest);
            let (to, keyword) =
                rule_and_keyword(rest, "usage: mv <from> <to> <keyword>")?;
            if from.is_empty() {
                return Err("usage: mv <from> <to> <keyword>");
            }
            Gesture::Move {
                from: from.to_string(),
                to,
                keyword,
            }
        }
        "drag" => {
            let (rule, keyword) = rule_and_keyword(rest, "usage: drag <rule> <keyword>")?;
            Gesture::Drag { rule, keyword }
        }
        "hover" => Gesture::Hover(single_word(rest, "usage: hover <rule>")?),
        "leave" => Gesture::Leave,
        "drop" => Gesture::Drop(single_word(rest, "usage: drop <rule>")?),
        "cancel" => Gesture::Cancel,
        "save" => Gesture::Save,
        "back" => Gesture::Back,
        "help" | "?" => Gesture::Help,
        _ => return Err("unknown command, try `help`"),
    };
    Ok(Some(gesture))
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

fn rule_and_keyword(rest: &str, usage: &'static str) -> Result<(String, String), &'static str> {
    let (rule, keyword) = split_word(rest);
    if rule.is_empty() || keyword.is_empty() {
        return Err(usage);
    }
    Ok((rule.to_string(), keyword.to_string()))
}

fn single_word(rest: &str, usage: &'static str) -> Result<String, &'static str> {
    let (word, extra) = split_word(rest);
    if word.is_empty() || !extra.is_empty() {
        return Err(usage);
    }
    Ok(word.to_string())
}

/// Runs an editing session over `rules`, reading gestures from `input`.
///
/// End of input is treated as `back`.
pub fn run_session<R: BufRead, W: Write>(
    rules: RuleSet,
    input: R,
    mut out: W,
) -> io::Result<Outcome> {
    let mut editor = RuleEditor::new(rules);
    render::rules(&mut out, editor.rules(), editor.drag())?;
    prompt(&mut out)?;

    for line in input.lines() {
        let gesture = match parse(&line?) {
            Ok(Some(gesture)) => gesture,
            Ok(None) => {
                prompt(&mut out)?;
                continue;
            }
            Err(usage) => {
                writeln!(out, "{usage}")?;
                prompt(&mut out)?;
                continue;
            }
        };

        let changed = match gesture {
            Gesture::Save => return Ok(Outcome::Saved(editor.commit())),
            Gesture::Back => return Ok(Outcome::Back),
            Gesture::Help => {
                writeln!(out, "{HELP}")?;
                false
            }
            Gesture::Show => true,
            Gesture::Add { rule, keyword } => {
                report(&mut out, editor.add_keyword(&rule, &keyword), "nothing added")?
            }
            Gesture::Remove { rule, keyword } => report(
                &mut out,
                editor.remove_keyword(&rule, &keyword),
                "nothing removed",
            )?,
            Gesture::Move { from, to, keyword } => report(
                &mut out,
                editor.move_keyword(&from, &to, &keyword),
                "nothing moved",
            )?,
            Gesture::Drag { rule, keyword } => report(
                &mut out,
                editor.begin_drag(&rule, &keyword),
                "keyword is not in that bucket",
            )?,
            Gesture::Hover(rule) => {
                editor.hover(&rule);
                true
            }
            Gesture::Leave => {
                editor.leave();
                true
            }
            Gesture::Drop(rule) => {
                report(&mut out, editor.drop_on(&rule), "nothing moved")?
            }
            Gesture::Cancel => {
                editor.cancel_drag();
                true
            }
        };

        if changed {
            render::rules(&mut out, editor.rules(), editor.drag())?;
        }
        prompt(&mut out)?;
    }

    Ok(Outcome::Back)
}

fn report(out: &mut impl Write, applied: bool, otherwise: &str) -> io::Result<bool> {
    if !applied {
        writeln!(out, "{otherwise}")?;
    }
    Ok(applied)
}

fn prompt(out: &mut impl Write) -> io::Result<()> {
    write!(out, "tune> ")?;
    out.flush()
}
