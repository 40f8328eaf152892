//! Plain-text screens.

use std::io::{self, Write};

use chrono::NaiveDate;
use mailera_core::{AppState, DragSession, Persona, RuleSet, Step};
use mailera_oauth::CallbackStatus;

/// Writes the screen for the current step.
pub fn screen(out: &mut impl Write, state: &AppState) -> io::Result<()> {
    match state.step {
        Step::Welcome => welcome(out),
        Step::Identity => personas(out, state.profile.identity),
        Step::Tuning | Step::EditRules => {
            writeln!(out, "Fine-tune Priority")?;
            writeln!(out)?;
            rules(out, &state.profile.rules, None)?;
            writeln!(out)?;
            writeln!(out, "Run `mailera tune` to edit, or `mailera back`.")
        }
        Step::Connect => connect(out, state.last_error.as_deref()),
        Step::Callback => callback(out, &CallbackStatus::Loading),
        Step::Dashboard => dashboard(out, state, chrono::Local::now().date_naive(), &[]),
        Step::Settings => settings(out, state),
    }
}

fn welcome(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Mailera")?;
    writeln!(out, "Intelligent Email Classification Assistant")?;
    writeln!(out)?;
    writeln!(out, "Run `mailera start` to begin setup.")
}

/// Persona picker; `current` is marked.
pub fn personas(out: &mut impl Write, current: Option<Persona>) -> io::Result<()> {
    writeln!(out, "Choose Your Persona")?;
    writeln!(out)?;
    for persona in Persona::ALL {
        let marker = if current == Some(persona) { '*' } else { ' ' };
        let tag = persona.as_str().to_lowercase().replace('_', "-");
        writeln!(out, " {marker} {tag:<14} {}", persona.display_name())?;
    }
    writeln!(out)?;
    writeln!(out, "Run `mailera persona <tag>` to continue.")
}

/// The rule buckets in priority order.
///
/// While a drag is in progress the dragged keyword is wrapped in `<>` and
/// the hovered bucket is flagged as the drop target.
pub fn rules(out: &mut impl Write, rules: &RuleSet, drag: Option<&DragSession>) -> io::Result<()> {
    for (rank, rule) in rules.iter().enumerate() {
        let target = drag
            .and_then(DragSession::pending_target)
            .is_some_and(|t| *t == rule.id);
        let marker = if target { ">>" } else { "  " };
        writeln!(out, "{marker} {}. {} [{}]", rank + 1, rule.name, rule.id)?;

        if rule.keywords().is_empty() {
            writeln!(out, "       (Drop items here)")?;
            continue;
        }
        let line = rule
            .keywords()
            .iter()
            .map(|kw| {
                let dragged = drag.is_some_and(|d| *d.source() == rule.id && d.token() == kw.as_str());
                if dragged {
                    format!("<{kw}>")
                } else {
                    kw.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "       {line}")?;
    }
    Ok(())
}

fn connect(out: &mut impl Write, last_error: Option<&str>) -> io::Result<()> {
    writeln!(out, "Connect & Secure")?;
    writeln!(out, "Link your university Outlook account.")?;
    writeln!(out)?;
    if let Some(reason) = last_error {
        writeln!(out, "Last attempt failed: {reason}")?;
        writeln!(out)?;
    }
    writeln!(out, "Run `mailera connect` to authorize.")?;
    writeln!(
        out,
        "We promise: Data stays local-first. No training on personal content."
    )
}

/// Callback progress or result.
pub fn callback(out: &mut impl Write, status: &CallbackStatus) -> io::Result<()> {
    writeln!(out, "{}", status.title())?;
    writeln!(out, "{}", status.message())?;
    if let CallbackStatus::Success { email, name } = status {
        writeln!(out, "{name} <{email}>")?;
    }
    Ok(())
}

/// Daily briefing: one section per rule, `subjects` sorted into them.
///
/// Subjects no rule matches are left out. No mailbox is fetched yet, so the
/// shell passes an empty list.
pub fn dashboard(
    out: &mut impl Write,
    state: &AppState,
    today: NaiveDate,
    subjects: &[&str],
) -> io::Result<()> {
    writeln!(out, "Daily Briefing")?;
    writeln!(out, "{}", today.format("%A, %B %-d"))?;
    if let Some(email) = &state.profile.email {
        writeln!(out, "{email}")?;
    }

    let rules = &state.profile.rules;
    for rule in rules {
        writeln!(out)?;
        writeln!(out, "{}", rule.name)?;
        let mut any = false;
        for subject in subjects
            .iter()
            .filter(|s| rules.classify(s).is_some_and(|r| r.id == rule.id))
        {
            writeln!(out, "  - {subject}")?;
            any = true;
        }
        if !any {
            writeln!(out, "  No messages")?;
        }
    }
    writeln!(out)?;
    writeln!(out, "Run `mailera settings` for settings.")
}

fn settings(out: &mut impl Write, state: &AppState) -> io::Result<()> {
    let persona = state
        .profile
        .identity
        .map_or("None", |p| p.display_name());

    writeln!(out, "Settings")?;
    writeln!(out)?;
    writeln!(out, "Language         {}", state.language.as_str())?;
    writeln!(out, "Current Persona  {persona}")?;
    writeln!(
        out,
        "Rules            {} buckets, {} keywords",
        state.profile.rules.len(),
        state.profile.rules.total_keywords()
    )?;
    if let Some(email) = &state.profile.email {
        writeln!(out, "Connected as     {email}")?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "Commands: language <code>, edit-rules, change-persona, logout, back"
    )
}
