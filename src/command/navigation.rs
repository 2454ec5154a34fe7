//! Cursor movement commands

use crate::editor::{EditorState, PromptAction};
use crate::error::Result;

use super::CommandStatus;

pub fn forward_char(editor: &mut EditorState) -> Result<CommandStatus> {
    if editor.move_cursor_right() {
        editor.update_goal_col();
        Ok(CommandStatus::Success)
    } else {
        Ok(CommandStatus::Failure)
    }
}

pub fn backward_char(editor: &mut EditorState) -> Result<CommandStatus> {
    if editor.move_cursor_left() {
        editor.update_goal_col();
        Ok(CommandStatus::Success)
    } else {
        Ok(CommandStatus::Failure)
    }
}

pub fn next_line(editor: &mut EditorState) -> Result<CommandStatus> {
    if editor.move_cursor_vertical(true) {
        Ok(CommandStatus::Success)
    } else {
        Ok(CommandStatus::Failure)
    }
}

pub fn previous_line(editor: &mut EditorState) -> Result<CommandStatus> {
    if editor.move_cursor_vertical(false) {
        Ok(CommandStatus::Success)
    } else {
        Ok(CommandStatus::Failure)
    }
}

pub fn beginning_of_line(editor: &mut EditorState) -> Result<CommandStatus> {
    let line = editor.window.cursor_line();
    editor.window.set_cursor(line, 0);
    editor.update_goal_col();
    Ok(CommandStatus::Success)
}

pub fn end_of_line(editor: &mut EditorState) -> Result<CommandStatus> {
    let line = editor.window.cursor_line();
    let eol = editor.buffer.line(line).map(|l| l.len()).unwrap_or(0);
    editor.window.set_cursor(line, eol);
    editor.update_goal_col();
    Ok(CommandStatus::Success)
}

pub fn page_down(editor: &mut EditorState) -> Result<CommandStatus> {
    let page = editor.window.height().max(1) as usize;
    let line = editor.window.cursor_line();
    let target = (line + page).min(editor.buffer.line_count() - 1);
    if target == line {
        return Ok(CommandStatus::Failure);
    }
    move_to_line(editor, target);
    Ok(CommandStatus::Success)
}

pub fn page_up(editor: &mut EditorState) -> Result<CommandStatus> {
    let page = editor.window.height().max(1) as usize;
    let line = editor.window.cursor_line();
    if line == 0 {
        return Ok(CommandStatus::Failure);
    }
    let target = line.saturating_sub(page);
    move_to_line(editor, target);
    Ok(CommandStatus::Success)
}

pub fn buffer_start(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.window.set_cursor(0, 0);
    editor.update_goal_col();
    Ok(CommandStatus::Success)
}

pub fn buffer_end(editor: &mut EditorState) -> Result<CommandStatus> {
    let last = editor.buffer.line_count() - 1;
    let eol = editor.buffer.line(last).map(|l| l.len()).unwrap_or(0);
    editor.window.set_cursor(last, eol);
    editor.update_goal_col();
    Ok(CommandStatus::Success)
}

pub fn goto_line(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.start_prompt("Goto line: ", PromptAction::GotoLine, None);
    Ok(CommandStatus::Success)
}

/// Move to a line, keeping the goal column
fn move_to_line(editor: &mut EditorState, target: usize) {
    let goal = editor.window.goal_col();
    let col = editor
        .buffer
        .line(target)
        .map(|l| l.col_to_byte(goal))
        .unwrap_or(0);
    editor.window.set_cursor(target, col);
}
