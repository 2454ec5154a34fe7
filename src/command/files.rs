//! File commands

use crate::editor::{EditorState, PromptAction};
use crate::error::Result;

use super::CommandStatus;

pub fn save_buffer(editor: &mut EditorState) -> Result<CommandStatus> {
    if editor.buffer.filename().is_none() {
        return save_buffer_as(editor);
    }
    match editor.buffer.save() {
        Ok(()) => {
            editor.display.set_message("Wrote file");
            Ok(CommandStatus::Success)
        }
        Err(e) => {
            editor.display.set_message(format!("Save failed: {}", e));
            Ok(CommandStatus::Failure)
        }
    }
}

pub fn save_buffer_as(editor: &mut EditorState) -> Result<CommandStatus> {
    let default = editor
        .buffer
        .filename()
        .map(|p| p.to_string_lossy().into_owned());
    editor.start_prompt("Write file: ", PromptAction::SaveAs, default);
    Ok(CommandStatus::Success)
}

pub fn quit(editor: &mut EditorState) -> Result<CommandStatus> {
    if editor.buffer.is_modified() {
        editor.start_prompt(
            "Modified buffer exists; quit anyway? (y/n) ",
            PromptAction::QuitConfirm,
            None,
        );
    } else {
        editor.running = false;
    }
    Ok(CommandStatus::Success)
}
