use serde::{Deserialize, Serialize};

use crate::model::FieldTask;
use crate::surface::{Surface, SurfaceKind, SyntheticEvent};

/// Opaque handle to one field of a page. Only valid for the page that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(pub usize);

/// The page-level capabilities the sequencer needs: element resolution,
/// visibility, scroll/focus, and removal of scan-time markers. A browser
/// binding implements this against the live document; [`MemoryPage`] is the
/// in-memory implementation used by tests and the CLI.
pub trait Page {
    fn query_selector(&mut self, selector: &str) -> Option<FieldId>;
    fn query_marker(&mut self, marker: &str) -> Option<FieldId>;
    fn element_by_id(&mut self, id: &str) -> Option<FieldId>;
    /// The focused field if any, else the first typable candidate.
    fn active_field(&mut self) -> Option<FieldId>;
    fn is_visible(&self, field: FieldId) -> bool;
    fn scroll_into_view(&mut self, field: FieldId);
    fn surface_mut(&mut self, field: FieldId) -> &mut dyn Surface;
    /// Remove any scan-time markers/highlights. Runs unconditionally at
    /// the end of every sequence.
    fn clear_markers(&mut self);
}

/// Resolution strategies, in order: stored selector, scan-time marker,
/// and an id lookup when the selector looks like an id reference.
pub fn resolve_field(page: &mut dyn Page, task: &FieldTask) -> Option<FieldId> {
    if let Some(field) = page.query_selector(&task.selector) {
        return Some(field);
    }
    if let Some(marker) = &task.marker {
        if let Some(field) = page.query_marker(marker) {
            return Some(field);
        }
    }
    if let Some(id) = task.selector.strip_prefix('#') {
        if let Some(field) = page.element_by_id(id) {
            return Some(field);
        }
    }
    None
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryField {
    pub id: String,
    #[serde(default)]
    pub selector: String,
    #[serde(default)]
    pub marker: Option<String>,
    pub kind: SurfaceKind,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub value: String,
    #[serde(default = "default_true")]
    pub attached: bool,
    #[serde(skip)]
    pub focused: bool,
    #[serde(skip)]
    pub scrolled_into_view: bool,
    #[serde(skip)]
    cursor: usize,
    /// Every synthetic event dispatched at this field, in order.
    #[serde(skip)]
    pub events: Vec<SyntheticEvent>,
}

impl MemoryField {
    pub fn new(id: &str, kind: SurfaceKind) -> Self {
        Self {
            id: id.to_string(),
            selector: format!("#{id}"),
            marker: None,
            kind,
            visible: true,
            read_only: false,
            disabled: false,
            value: String::new(),
            attached: true,
            focused: false,
            scrolled_into_view: false,
            cursor: 0,
            events: Vec::new(),
        }
    }

    fn cursor_byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(idx, _)| idx)
            .unwrap_or(self.value.len())
    }
}

impl Surface for MemoryField {
    fn kind(&self) -> SurfaceKind {
        self.kind
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn text(&self) -> &str {
        &self.value
    }

    fn set_text(&mut self, text: &str) {
        self.value = text.to_string();
        self.cursor = self.value.chars().count();
    }

    fn insert_at_cursor(&mut self, text: &str) {
        let at = self.cursor_byte_index();
        self.value.insert_str(at, text);
        self.cursor += text.chars().count();
    }

    fn delete_backward(&mut self) {
        if self.kind.has_value_property() {
            self.value.pop();
            self.cursor = self.value.chars().count();
            return;
        }
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.cursor_byte_index();
        self.value.remove(at);
    }

    fn dispatch(&mut self, event: SyntheticEvent) {
        self.events.push(event);
    }

    fn focus(&mut self) {
        self.focused = true;
    }
}

/// In-memory page: the test double for a live document, and the backing
/// store for CLI page files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryPage {
    pub fields: Vec<MemoryField>,
}

impl MemoryPage {
    pub fn new(fields: Vec<MemoryField>) -> Self {
        Self { fields }
    }

    pub fn field(&self, field: FieldId) -> &MemoryField {
        &self.fields[field.0]
    }

    pub fn field_mut(&mut self, field: FieldId) -> &mut MemoryField {
        &mut self.fields[field.0]
    }

    /// Simulate the element being removed from the document.
    pub fn detach(&mut self, field: FieldId) {
        self.fields[field.0].attached = false;
    }

    fn position(&self, pred: impl Fn(&MemoryField) -> bool) -> Option<FieldId> {
        self.fields
            .iter()
            .position(|f| f.attached && pred(f))
            .map(FieldId)
    }
}

impl Page for MemoryPage {
    fn query_selector(&mut self, selector: &str) -> Option<FieldId> {
        if selector.is_empty() {
            return None;
        }
        self.position(|f| f.selector == selector)
    }

    fn query_marker(&mut self, marker: &str) -> Option<FieldId> {
        self.position(|f| f.marker.as_deref() == Some(marker))
    }

    fn element_by_id(&mut self, id: &str) -> Option<FieldId> {
        self.position(|f| f.id == id)
    }

    fn active_field(&mut self) -> Option<FieldId> {
        self.position(|f| f.focused)
            .or_else(|| self.position(|f| f.visible && !f.read_only && !f.disabled))
    }

    fn is_visible(&self, field: FieldId) -> bool {
        let f = &self.fields[field.0];
        f.attached && f.visible
    }

    fn scroll_into_view(&mut self, field: FieldId) {
        self.fields[field.0].scrolled_into_view = true;
    }

    fn surface_mut(&mut self, field: FieldId) -> &mut dyn Surface {
        &mut self.fields[field.0]
    }

    fn clear_markers(&mut self) {
        for f in &mut self.fields {
            f.marker = None;
        }
    }
}
