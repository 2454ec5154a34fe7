//! Miscellaneous commands

use crate::editor::{EditorState, PromptAction};
use crate::error::Result;

use super::CommandStatus;

pub fn redraw(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.display.force_redraw();
    Ok(CommandStatus::Success)
}

pub fn abort(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.window.clear_mark();
    editor.input.reset();
    Ok(CommandStatus::Abort)
}

pub fn toggle_line_numbers(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.display.toggle_line_numbers();
    Ok(CommandStatus::Success)
}

pub fn search_forward(editor: &mut EditorState) -> Result<CommandStatus> {
    let default = if editor.last_search.is_empty() {
        None
    } else {
        Some(editor.last_search.clone())
    };
    editor.start_prompt("Search: ", PromptAction::SearchForward, default);
    Ok(CommandStatus::Success)
}

/// Turn highlighting off and on for every buffer using this registry
pub fn toggle_syntax(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.syntaxes.toggle();
    editor.assign_syntax();
    editor.display.force_redraw();
    let state = if editor.syntaxes.enabled { "on" } else { "off" };
    editor.display.set_message(format!("Syntax highlighting {}", state));
    Ok(CommandStatus::Success)
}

/// Recompile the syntax definitions and reinstall the buffer's graph
/// with a fresh cache
pub fn reload_syntax(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.syntaxes.reload();
    editor.assign_syntax();
    editor.display.force_redraw();
    editor.display.set_message("Syntax definitions reloaded");
    Ok(CommandStatus::Success)
}
