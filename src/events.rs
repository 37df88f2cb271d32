use crate::keyboard::{dom_code, dom_key, BACKSPACE_KEY};
use crate::surface::{Surface, SyntheticEvent};

fn key_labels(text: &str) -> (String, String) {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => (dom_key(c), dom_code(c)),
        _ => (text.to_string(), "Unidentified".to_string()),
    }
}

/// Emit the full keystroke sequence for a chunk of text: key-down,
/// key-press, content mutation, insertion input event, key-up. Single
/// characters get real key/code labels; word batches carry the chunk as
/// the key, matching what frameworks observe from batched insertion.
pub fn emit_text(surface: &mut dyn Surface, text: &str) {
    let (key, code) = key_labels(text);
    surface.dispatch(SyntheticEvent::KeyDown {
        key: key.clone(),
        code: code.clone(),
    });
    surface.dispatch(SyntheticEvent::KeyPress { key: key.clone() });

    if surface.kind().has_value_property() {
        let mut value = surface.text().to_string();
        value.push_str(text);
        surface.set_text(&value);
    } else {
        surface.insert_at_cursor(text);
    }

    surface.dispatch(SyntheticEvent::InsertText {
        data: text.to_string(),
    });
    surface.dispatch(SyntheticEvent::KeyUp { key, code });
}

pub fn emit_char(surface: &mut dyn Surface, c: char) {
    emit_text(surface, &c.to_string());
}

/// Backspace: key-down, remove the last character, deletion input event,
/// key-up. No-op on empty content.
pub fn emit_backspace(surface: &mut dyn Surface) {
    if surface.text().is_empty() {
        return;
    }
    surface.dispatch(SyntheticEvent::KeyDown {
        key: BACKSPACE_KEY.to_string(),
        code: BACKSPACE_KEY.to_string(),
    });
    surface.delete_backward();
    surface.dispatch(SyntheticEvent::DeleteBackward);
    surface.dispatch(SyntheticEvent::KeyUp {
        key: BACKSPACE_KEY.to_string(),
        code: BACKSPACE_KEY.to_string(),
    });
}

/// One change event after all content is written. Editable regions do not
/// receive change events.
pub fn emit_completion(surface: &mut dyn Surface) {
    if surface.kind().has_value_property() {
        surface.dispatch(SyntheticEvent::Change);
    }
}

/// Clear existing content before a session starts, announcing the clearing
/// to the host's input handlers.
pub fn clear_content(surface: &mut dyn Surface) {
    surface.set_text("");
    surface.dispatch(SyntheticEvent::ContentCleared);
}
