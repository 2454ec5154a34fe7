//! Text editing commands

use crate::editor::EditorState;
use crate::error::Result;

use super::CommandStatus;

pub fn newline(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.insert_newline();
    editor.last_was_kill = false;
    Ok(CommandStatus::Success)
}

pub fn insert_tab(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.insert_char('\t');
    editor.last_was_kill = false;
    Ok(CommandStatus::Success)
}

pub fn delete_forward(editor: &mut EditorState) -> Result<CommandStatus> {
    let line = editor.window.cursor_line();
    let col = editor.window.cursor_col();
    editor.last_was_kill = false;

    if editor.buffer.delete_char(line, col).is_some() {
        return Ok(CommandStatus::Success);
    }
    // at end of line: delete the newline by joining with the next line
    if editor.buffer.join_line(line) {
        Ok(CommandStatus::Success)
    } else {
        Ok(CommandStatus::Failure)
    }
}

pub fn delete_backward(editor: &mut EditorState) -> Result<CommandStatus> {
    let line = editor.window.cursor_line();
    let col = editor.window.cursor_col();
    editor.last_was_kill = false;

    if let Some((_, new_col)) = editor.buffer.delete_backward(line, col) {
        editor.window.set_cursor(line, new_col);
        editor.update_goal_col();
        return Ok(CommandStatus::Success);
    }
    // at start of line: join with the previous line
    if let Some(join_pos) = editor.buffer.join_with_previous(line) {
        editor.window.set_cursor(line - 1, join_pos);
        editor.update_goal_col();
        Ok(CommandStatus::Success)
    } else {
        Ok(CommandStatus::Failure)
    }
}

pub fn kill_line(editor: &mut EditorState) -> Result<CommandStatus> {
    let line = editor.window.cursor_line();
    let col = editor.window.cursor_col();

    match editor.buffer.kill_to_eol(line, col) {
        Some(killed) => {
            if editor.last_was_kill {
                editor.kill_buffer.push_str(&killed);
            } else {
                editor.kill_buffer = killed;
            }
            editor.last_was_kill = true;
            Ok(CommandStatus::Success)
        }
        None => Ok(CommandStatus::Failure),
    }
}

pub fn yank(editor: &mut EditorState) -> Result<CommandStatus> {
    if editor.kill_buffer.is_empty() {
        return Ok(CommandStatus::Failure);
    }
    let line = editor.window.cursor_line();
    let col = editor.window.cursor_col();
    let text = editor.kill_buffer.clone();
    let (new_line, new_col) = editor.buffer.insert_text(line, col, &text);
    editor.window.set_cursor(new_line, new_col);
    editor.update_goal_col();
    editor.last_was_kill = false;
    Ok(CommandStatus::Success)
}

pub fn set_mark(editor: &mut EditorState) -> Result<CommandStatus> {
    let line = editor.window.cursor_line();
    let col = editor.window.cursor_col();
    editor.window.set_mark(line, col);
    editor.display.set_message("Mark set");
    Ok(CommandStatus::Success)
}

pub fn kill_region(editor: &mut EditorState) -> Result<CommandStatus> {
    let Some((mark_line, mark_col)) = editor.window.mark() else {
        editor.display.set_message("No mark set");
        return Ok(CommandStatus::Failure);
    };
    let cursor_line = editor.window.cursor_line();
    let cursor_col = editor.window.cursor_col();

    let (start, end) = if (mark_line, mark_col) <= (cursor_line, cursor_col) {
        ((mark_line, mark_col), (cursor_line, cursor_col))
    } else {
        ((cursor_line, cursor_col), (mark_line, mark_col))
    };

    let killed = editor.buffer.delete_region(start.0, start.1, end.0, end.1);
    editor.kill_buffer = killed;
    editor.last_was_kill = false;
    editor.window.clear_mark();
    editor.window.set_cursor(start.0, start.1);
    editor.update_goal_col();
    Ok(CommandStatus::Success)
}
