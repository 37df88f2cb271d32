use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    Input,
    TextArea,
    Editable,
}

impl SurfaceKind {
    /// Inputs and text areas expose a value string; editable regions hold
    /// content at a cursor and never receive a change event.
    pub fn has_value_property(self) -> bool {
        !matches!(self, SurfaceKind::Editable)
    }
}

/// The keystroke event vocabulary a host page observes. Mirrors the DOM
/// sequence (keydown, keypress, input, keyup, change) without depending on
/// concrete event constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntheticEvent {
    KeyDown { key: String, code: String },
    KeyPress { key: String },
    InsertText { data: String },
    DeleteBackward,
    ContentCleared,
    KeyUp { key: String, code: String },
    Change,
}

/// One typable element. The engine depends only on this capability
/// interface; the in-memory implementation lives in [`crate::page`] and a
/// browser binding would supply its own.
///
/// `dispatch` is infallible by contract: a host cancelling or ignoring an
/// event is not an error, the typing sequence proceeds either way.
pub trait Surface {
    fn kind(&self) -> SurfaceKind;
    fn is_attached(&self) -> bool;
    fn is_read_only(&self) -> bool;
    fn is_disabled(&self) -> bool;
    fn text(&self) -> &str;
    fn set_text(&mut self, text: &str);
    fn insert_at_cursor(&mut self, text: &str);
    fn delete_backward(&mut self);
    fn dispatch(&mut self, event: SyntheticEvent);
    fn focus(&mut self);
}
