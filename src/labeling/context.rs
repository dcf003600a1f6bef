/// Default number of chars shown on each side of a boundary
pub const DEFAULT_CONTEXT_CHARS: usize = 200;

const RULE_WIDTH: usize = 80;
const SPLIT_WIDTH: usize = 40;

/// Text surrounding a boundary candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryContext {
    pub before: String,
    pub after: String,
}

impl BoundaryContext {
    /// Cut up to `context_chars` chars on either side of `char_index`
    ///
    /// Offsets past the end of the text are clamped.
    pub fn around(text: &str, char_index: usize, context_chars: usize) -> Self {
        let total = text.chars().count();
        let boundary = char_index.min(total);
        let start = boundary.saturating_sub(context_chars);
        let end = boundary.saturating_add(context_chars).min(total);

        let before = slice_chars(text, start, boundary);
        let after = slice_chars(text, boundary, end);

        Self {
            before: before.to_string(),
            after: after.to_string(),
        }
    }

    /// Render the before/after split shown to the labeler and stored with the label
    pub fn render(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let split = "-".repeat(SPLIT_WIDTH);
        format!(
            "\n{rule}\nBEFORE: ...{}\n{split} BOUNDARY {split}\nAFTER: {}...\n{rule}\n",
            self.before, self.after
        )
    }
}

/// Slice by char positions rather than byte positions
fn slice_chars(text: &str, start: usize, end: usize) -> &str {
    let byte_at = |pos: usize| {
        text.char_indices()
            .nth(pos)
            .map(|(i, _)| i)
            .unwrap_or(text.len())
    };
    &text[byte_at(start)..byte_at(end)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_window_is_clamped() {
        let ctx = BoundaryContext::around("Opening remarks. Item 1 is roads.", 17, 200);
        assert_eq!(ctx.before, "Opening remarks. ");
        assert_eq!(ctx.after, "Item 1 is roads.");
    }

    #[test]
    fn test_context_window_size() {
        let text = "a".repeat(50) + &"b".repeat(50);
        let ctx = BoundaryContext::around(&text, 50, 10);
        assert_eq!(ctx.before, "a".repeat(10));
        assert_eq!(ctx.after, "b".repeat(10));
    }

    #[test]
    fn test_context_handles_multibyte_text() {
        let ctx = BoundaryContext::around("Café vote. Item 2.", 11, 6);
        assert_eq!(ctx.before, "vote. ");
        assert_eq!(ctx.after, "Item 2");
    }

    #[test]
    fn test_offset_past_end() {
        let ctx = BoundaryContext::around("short", 99, 3);
        assert_eq!(ctx.before, "ort");
        assert_eq!(ctx.after, "");
    }

    #[test]
    fn test_render_layout() {
        let ctx = BoundaryContext {
            before: "end of one. ".to_string(),
            after: "Item 2.".to_string(),
        };
        let rendered = ctx.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "=".repeat(80));
        assert_eq!(lines[2], "BEFORE: ...end of one. ");
        assert!(lines[3].contains(" BOUNDARY "));
        assert_eq!(lines[4], "AFTER: Item 2....");
        assert_eq!(lines[5], "=".repeat(80));
    }
}
