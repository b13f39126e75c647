use std::io::{self, Write as _};
use std::process::Command;

use anyhow::{bail, Context, Result};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::prelude::*;

/// Split `$EDITOR` into a program and its leading arguments (e.g. `code --wait`).
fn editor_command(editor: &str) -> Result<(String, Vec<String>)> {
    let mut words = shlex::split(editor)
        .filter(|w| !w.is_empty())
        .with_context(|| format!("cannot parse $EDITOR '{editor}'"))?
        .into_iter();
    let program = words.next().context("$EDITOR is empty")?;
    Ok((program, words.collect()))
}

/// Suspends the TUI, opens `$EDITOR` on a temp file holding `initial_content`,
/// and returns the edited text once the editor exits.
pub fn open_editor(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    initial_content: &str,
) -> Result<String> {
    let editor = std::env::var("EDITOR").context("$EDITOR is not set")?;
    let (program, args) = editor_command(&editor)?;

    let mut tmp = tempfile::Builder::new()
        .prefix("taskboard-")
        .suffix(".md")
        .tempfile()
        .context("failed to create temp file")?;
    tmp.write_all(initial_content.as_bytes())
        .context("failed to write to temp file")?;
    tmp.flush()?;

    let path = tmp.path().to_path_buf();

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    let status_result = Command::new(&program)
        .args(&args)
        .arg(&path)
        .status()
        .with_context(|| format!("failed to run editor '{editor}'"));

    // Restore even if the editor failed to launch
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal::enable_raw_mode()?;
    terminal.clear()?;

    let status = status_result?;
    if !status.success() {
        bail!("editor exited with status {status}");
    }

    std::fs::read_to_string(&path).context("failed to read temp file after editor closed")
}
