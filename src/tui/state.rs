//! Pure state transformations for the TUI
//!
//! No I/O here. The shell in `app.rs` feeds terminal events through these and
//! draws the result.

// =============================================================================
// Navigation - Pure index calculations
// =============================================================================

/// Calculate new selected index after moving up
pub fn move_selection_up(current: usize) -> usize {
    current.saturating_sub(1)
}

/// Calculate new selected index after moving down
pub fn move_selection_down(current: usize, max: usize) -> usize {
    if max == 0 {
        0
    } else {
        (current + 1).min(max - 1)
    }
}

/// Calculate new selected index after page down
pub fn page_down(current: usize, page_size: usize, max: usize) -> usize {
    if max == 0 {
        0
    } else {
        (current + page_size).min(max - 1)
    }
}

/// Calculate new selected index after page up
pub fn page_up(current: usize, page_size: usize) -> usize {
    current.saturating_sub(page_size)
}

/// Calculate scroll offset to keep selection visible
pub fn calculate_scroll_offset(
    selected: usize,
    current_offset: usize,
    visible_items: usize,
) -> usize {
    if visible_items == 0 {
        return 0;
    }
    if selected < current_offset {
        selected
    } else if selected >= current_offset + visible_items {
        selected.saturating_sub(visible_items - 1)
    } else {
        current_offset
    }
}

/// Clamp selection index to valid range
pub fn clamp_selection(selected: usize, max: usize) -> usize {
    if max == 0 {
        0
    } else {
        selected.min(max - 1)
    }
}

// =============================================================================
// Text input
// =============================================================================

pub fn push_char(input: &str, c: char) -> String {
    let mut out = String::with_capacity(input.len() + c.len_utf8());
    out.push_str(input);
    out.push(c);
    out
}

/// Drop the last character (not byte)
pub fn pop_char(input: &str) -> String {
    let mut out = input.to_string();
    out.pop();
    out
}

/// Shorten `text` to `width` columns, marking the cut with `…`
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}

// =============================================================================
// Scrolling
// =============================================================================

/// Scroll a text pane by `delta`, staying within its content
pub fn scroll_text(current: u16, delta: i32, content_lines: usize, visible: usize) -> u16 {
    let max = content_lines.saturating_sub(visible).min(u16::MAX as usize) as i32;
    (current as i32 + delta).clamp(0, max) as u16
}
