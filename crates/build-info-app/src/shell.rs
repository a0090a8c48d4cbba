//! Line-oriented shell standing in for the popup window.
//!
//! Each input line is one user interaction. Status timers advance before
//! every command using the supplied clock.

use std::io::{self, BufRead, Write};

use build_info_core::{FieldKind, FieldName};
use build_info_ui::{FormEvents, FormView, StatusKind, SubmitOutcome};
use thiserror::Error;

use crate::FormController;

/// Command summary printed by `help`.
pub const HELP_TEXT: &str = "\
commands:
  show                  list every field and section state
  fields                list field keys
  set <field> <value>   set a field (\\n in value inserts a newline)
  clone on|off          toggle the clone-build checkbox
  shell [type]          select a design shell type (empty clears it)
  preview               print the announcement without downloading
  submit                render and download the announcement
  clear                 reset the form and delete the saved draft
  help                  show this text
  quit                  close the form";

/// One parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Blank line.
    Empty,
    /// Print the form.
    Show,
    /// Print field keys.
    Fields,
    /// Change one field.
    Set {
        /// Target field.
        field: FieldName,
        /// New value with escapes resolved.
        value: String,
    },
    /// Flip the clone-build checkbox.
    Clone(bool),
    /// Select a design-shell type.
    DesignShell(String),
    /// Render without downloading.
    Preview,
    /// Submit the form.
    Submit,
    /// Clear the form.
    Clear,
    /// Print help.
    Help,
    /// Leave the shell.
    Quit,
}

/// Shell parse error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShellError {
    /// First word is not a command.
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),
    /// Field key is not part of the form.
    #[error("unknown field '{0}' (try 'fields')")]
    UnknownField(String),
    /// Command arguments are malformed.
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// Parses one input line.
///
/// Only the whitespace before the command word and around separators is
/// dropped; a `set` value keeps trailing spaces the way a text input would.
///
/// # Errors
/// Returns [`ShellError`] for unknown commands, unknown fields, or malformed
/// arguments.
pub fn parse_command(line: &str) -> Result<ShellCommand, ShellError> {
    let line = line.trim_start();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim_start()),
        None => (line, ""),
    };

    match command {
        "" => Ok(ShellCommand::Empty),
        "show" => Ok(ShellCommand::Show),
        "fields" => Ok(ShellCommand::Fields),
        "preview" => Ok(ShellCommand::Preview),
        "submit" => Ok(ShellCommand::Submit),
        "clear" => Ok(ShellCommand::Clear),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        "set" => {
            let (key, value) = match rest.split_once(char::is_whitespace) {
                Some((key, value)) => (key, value.trim_start()),
                None => (rest, ""),
            };
            if key.is_empty() {
                return Err(ShellError::Usage("set <field> <value>"));
            }
            let field =
                FieldName::from_key(key).ok_or_else(|| ShellError::UnknownField(key.to_string()))?;
            Ok(ShellCommand::Set {
                field,
                value: unescape_value(value),
            })
        }
        "clone" => match rest.trim_end() {
            "on" | "yes" | "true" => Ok(ShellCommand::Clone(true)),
            "off" | "no" | "false" => Ok(ShellCommand::Clone(false)),
            _ => Err(ShellError::Usage("clone on|off")),
        },
        "shell" => Ok(ShellCommand::DesignShell(unescape_value(rest.trim_end()))),
        other => Err(ShellError::UnknownCommand(other.to_string())),
    }
}

/// Resolves `\n` and `\\` escapes.
pub fn unescape_value(raw: &str) -> String {
    let mut value = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            value.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('\\') => value.push('\\'),
            Some(other) => {
                value.push('\\');
                value.push(other);
            }
            None => value.push('\\'),
        }
    }
    value
}

/// Runs the shell until `quit` or end of input.
///
/// # Errors
/// Returns IO errors from reading `input` or writing `output`.
pub fn run<R: BufRead, W: Write>(
    controller: &mut FormController,
    input: R,
    output: &mut W,
    mut clock: impl FnMut() -> u64,
) -> io::Result<()> {
    writeln!(output, "Build Information Generator (type 'help' for commands)")?;
    render_form(controller.view(), output)?;

    let mut lines = input.lines();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = line?;
        let now_ms = clock();
        controller.tick(now_ms);

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(error) => {
                writeln!(output, "{error}")?;
                continue;
            }
        };

        if !dispatch(controller, command, output, now_ms)? {
            break;
        }
        render_status(controller.view(), output)?;
    }

    Ok(())
}

fn dispatch<W: Write>(
    controller: &mut FormController,
    command: ShellCommand,
    output: &mut W,
    now_ms: u64,
) -> io::Result<bool> {
    match command {
        ShellCommand::Empty => {}
        ShellCommand::Show => render_form(controller.view(), output)?,
        ShellCommand::Fields => {
            for field in FieldName::ALL {
                writeln!(output, "  {:<16} {}", field.key(), field.label())?;
            }
        }
        ShellCommand::Set { field, value } => controller.on_field_change(field, &value, now_ms),
        ShellCommand::Clone(is_clone) => controller.on_toggle_clone(is_clone, now_ms),
        ShellCommand::DesignShell(value) => controller.on_toggle_design_shell(&value, now_ms),
        ShellCommand::Preview => {
            writeln!(output, "--- {} ---", controller.pending_filename())?;
            writeln!(output, "{}", controller.preview())?;
            writeln!(output, "---")?;
        }
        ShellCommand::Submit => match controller.on_submit(now_ms) {
            SubmitOutcome::Downloaded { filename } => writeln!(output, "saved {filename}")?,
            SubmitOutcome::Blocked { field } => writeln!(
                output,
                "Please fill out {} [{}] before submitting.",
                field.label(),
                field.key()
            )?,
            SubmitOutcome::Failed => {}
        },
        ShellCommand::Clear => controller.on_clear(now_ms),
        ShellCommand::Help => writeln!(output, "{HELP_TEXT}")?,
        ShellCommand::Quit => return Ok(false),
    }
    Ok(true)
}

/// Prints every visible field and section.
pub fn render_form<W: Write>(view: &FormView, output: &mut W) -> io::Result<()> {
    for field in FieldName::ALL {
        let indent = match field {
            FieldName::DesignShellLink if !view.design_shell_options_visible() => continue,
            FieldName::PreviousLink if !view.clone_options_visible() => continue,
            FieldName::DesignShellLink | FieldName::PreviousLink => "    ",
            _ => "  ",
        };
        let required = if field == FieldName::PreviousLink && view.previous_link_required() {
            " *"
        } else {
            ""
        };

        let value = view.value(field);
        let shown = match field.kind() {
            FieldKind::Checkbox => {
                let mark = if value.is_empty() { "[ ]" } else { "[x]" };
                mark.to_string()
            }
            FieldKind::TextArea => value.replace('\n', &format!("\n{indent}  ")),
            FieldKind::Text | FieldKind::Select => value,
        };
        writeln!(
            output,
            "{indent}{} [{}]{required}: {shown}",
            field.label(),
            field.key()
        )?;
    }
    Ok(())
}

fn render_status<W: Write>(view: &FormView, output: &mut W) -> io::Result<()> {
    if let Some(status) = view.visible_status() {
        let tag = match status.kind {
            StatusKind::Success => "ok",
            StatusKind::Error => "error",
        };
        writeln!(output, "[{tag}] {}", status.text)?;
    }
    Ok(())
}
