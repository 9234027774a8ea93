use std::ops::Range;

/// Editable document handle passed to a paste task.
///
/// The only mutation the pipeline needs is replacing the current selection.
/// Implementations must leave the selection collapsed to the end of the
/// inserted text, which is what keeps consecutive insertions in order.
pub trait Editor: Send {
    /// Replace the current selection (or insert at the cursor) with `text`.
    fn replace_selection(&mut self, text: &str);
}

/// In-memory text document with a single selection.
///
/// Offsets are byte offsets into the text and always fall on character
/// boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    selection: Range<usize>,
}

impl TextBuffer {
    /// Create a buffer holding `text` with the cursor at the end.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.len();
        Self {
            text,
            selection: end..end,
        }
    }

    /// Select `range`. Returns `false` and leaves the selection unchanged if
    /// the range is out of bounds or splits a character.
    pub fn select(&mut self, range: Range<usize>) -> bool {
        let valid = range.start <= range.end
            && self.text.is_char_boundary(range.start)
            && self.text.is_char_boundary(range.end);
        if valid {
            self.selection = range;
        }
        valid
    }

    /// Collapse the selection to `offset`.
    pub fn set_cursor(&mut self, offset: usize) -> bool {
        self.select(offset..offset)
    }

    /// Full document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Current selection.
    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Selected text; empty when the selection is collapsed.
    pub fn selected_text(&self) -> &str {
        &self.text[self.selection.clone()]
    }
}

impl Editor for TextBuffer {
    fn replace_selection(&mut self, text: &str) {
        self.text.replace_range(self.selection.clone(), text);
        let end = self.selection.start + text.len();
        self.selection = end..end;
    }
}

impl<E: Editor + ?Sized> Editor for &mut E {
    fn replace_selection(&mut self, text: &str) {
        (**self).replace_selection(text);
    }
}
