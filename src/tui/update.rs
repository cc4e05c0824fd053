//! TEA Update Functions
//!
//! ```text
//! update : Msg -> Model -> (Model, Cmd)
//! ```
//!
//! Both screens get a pure update. Anything touching the resolver or the
//! terminal comes back as a `Cmd` for the shell in `app.rs` to carry out.

use super::msg::Msg;
use super::state;

/// Commands that need to be executed by the runtime (imperative shell)
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// No command
    None,
    /// Leave without a result
    Quit,
    /// The picker settled on this index
    Select(usize),
    /// Offer this input to the resolver
    Submit(String),
}

impl Cmd {
    /// Check if this is a quit command
    pub fn is_quit(&self) -> bool {
        matches!(self, Cmd::Quit)
    }
}

/// State of the match picker
#[derive(Debug, Clone, PartialEq)]
pub struct PickerModel {
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub item_count: usize,
    pub visible_items: usize,
}

impl PickerModel {
    pub fn new(item_count: usize) -> Self {
        Self {
            selected_index: 0,
            scroll_offset: 0,
            item_count,
            visible_items: 20,
        }
    }
}

/// Process a picker message
pub fn update_picker(msg: Msg, model: PickerModel) -> (PickerModel, Cmd) {
    let select = |selected: usize, model: PickerModel| {
        let scroll_offset =
            state::calculate_scroll_offset(selected, model.scroll_offset, model.visible_items);
        (
            PickerModel {
                selected_index: selected,
                scroll_offset,
                ..model
            },
            Cmd::None,
        )
    };

    match msg {
        Msg::Cancel => (model, Cmd::Quit),

        Msg::Confirm => {
            if model.item_count == 0 {
                (model, Cmd::Quit)
            } else {
                let index = state::clamp_selection(model.selected_index, model.item_count);
                (model, Cmd::Select(index))
            }
        }

        // === Navigation ===
        Msg::MoveUp => select(state::move_selection_up(model.selected_index), model),
        Msg::MoveDown => select(
            state::move_selection_down(model.selected_index, model.item_count),
            model,
        ),
        Msg::PageUp => select(
            state::page_up(model.selected_index, model.visible_items),
            model,
        ),
        Msg::PageDown => select(
            state::page_down(model.selected_index, model.visible_items, model.item_count),
            model,
        ),
        Msg::JumpToTop => select(0, model),
        Msg::JumpToBottom => select(model.item_count.saturating_sub(1), model),

        Msg::Resize(_, height) => {
            // header, borders and footer take four rows
            let visible_items = (height as usize).saturating_sub(4).max(1);
            let scroll_offset = state::calculate_scroll_offset(
                model.selected_index,
                model.scroll_offset,
                visible_items,
            );
            (
                PickerModel {
                    visible_items,
                    scroll_offset,
                    ..model
                },
                Cmd::None,
            )
        }

        Msg::Input(_)
        | Msg::Backspace
        | Msg::ScrollUp
        | Msg::ScrollDown
        | Msg::Noop => (model, Cmd::None),
    }
}

/// State of the placeholder prompt
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptModel {
    pub input: String,
    pub doc_scroll: u16,
    pub doc_lines: usize,
    pub doc_visible: usize,
}

impl PromptModel {
    pub fn new(doc_lines: usize) -> Self {
        Self {
            doc_lines,
            ..Self::default()
        }
    }

    /// Fresh input after an accepted value
    pub fn cleared(self) -> Self {
        Self {
            input: String::new(),
            ..self
        }
    }
}

/// Process a prompt message
///
/// `Confirm` does not clear the input: the shell clears it only when the
/// resolver accepts the value.
pub fn update_prompt(msg: Msg, model: PromptModel) -> (PromptModel, Cmd) {
    match msg {
        Msg::Cancel => (model, Cmd::Quit),
        Msg::Confirm => {
            let input = model.input.clone();
            (model, Cmd::Submit(input))
        }

        Msg::Input(c) => (
            PromptModel {
                input: state::push_char(&model.input, c),
                ..model
            },
            Cmd::None,
        ),
        Msg::Backspace => (
            PromptModel {
                input: state::pop_char(&model.input),
                ..model
            },
            Cmd::None,
        ),

        Msg::ScrollUp | Msg::ScrollDown => {
            let delta = if msg == Msg::ScrollUp { -1 } else { 1 };
            let doc_scroll =
                state::scroll_text(model.doc_scroll, delta, model.doc_lines, model.doc_visible);
            (PromptModel { doc_scroll, ..model }, Cmd::None)
        }

        Msg::Resize(_, height) => {
            // prompt block, hint and footer take six rows
            let doc_visible = (height as usize).saturating_sub(6);
            let doc_scroll = state::scroll_text(model.doc_scroll, 0, model.doc_lines, doc_visible);
            (
                PromptModel {
                    doc_visible,
                    doc_scroll,
                    ..model
                },
                Cmd::None,
            )
        }

        Msg::MoveUp
        | Msg::MoveDown
        | Msg::PageUp
        | Msg::PageDown
        | Msg::JumpToTop
        | Msg::JumpToBottom
        | Msg::Noop => (model, Cmd::None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picker(count: usize, visible: usize) -> PickerModel {
        PickerModel {
            visible_items: visible,
            ..PickerModel::new(count)
        }
    }

    #[test]
    fn test_picker_moves_and_scrolls() {
        let (model, cmd) = update_picker(Msg::MoveDown, picker(5, 2));
        assert_eq!(cmd, Cmd::None);
        assert_eq!(model.selected_index, 1);
        assert_eq!(model.scroll_offset, 0);

        let (model, _) = update_picker(Msg::MoveDown, model);
        assert_eq!(model.selected_index, 2);
        assert_eq!(model.scroll_offset, 1);

        let (model, _) = update_picker(Msg::JumpToBottom, model);
        assert_eq!(model.selected_index, 4);
        assert_eq!(model.scroll_offset, 3);

        let (model, _) = update_picker(Msg::MoveDown, model);
        assert_eq!(model.selected_index, 4);

        let (model, _) = update_picker(Msg::JumpToTop, model);
        assert_eq!(model.selected_index, 0);
        assert_eq!(model.scroll_offset, 0);

        let (model, _) = update_picker(Msg::MoveUp, model);
        assert_eq!(model.selected_index, 0);
    }

    #[test]
    fn test_picker_paging() {
        let (model, _) = update_picker(Msg::PageDown, picker(50, 10));
        assert_eq!(model.selected_index, 10);
        let (model, _) = update_picker(Msg::PageUp, model);
        assert_eq!(model.selected_index, 0);
    }

    #[test]
    fn test_picker_confirm_selects_highlighted() {
        let (model, _) = update_picker(Msg::MoveDown, picker(3, 10));
        let (_, cmd) = update_picker(Msg::Confirm, model);
        assert_eq!(cmd, Cmd::Select(1));
    }

    #[test]
    fn test_picker_cancel_and_empty_confirm_quit() {
        let (_, cmd) = update_picker(Msg::Cancel, picker(3, 10));
        assert!(cmd.is_quit());
        let (_, cmd) = update_picker(Msg::Confirm, picker(0, 10));
        assert!(cmd.is_quit());
    }

    #[test]
    fn test_picker_resize_keeps_selection_visible() {
        let mut model = picker(30, 20);
        model.selected_index = 15;
        let (model, _) = update_picker(Msg::Resize(80, 10), model);
        assert_eq!(model.visible_items, 6);
        assert_eq!(model.scroll_offset, 10);
    }

    #[test]
    fn test_prompt_typing() {
        let model = PromptModel::new(0);
        let (model, _) = update_prompt(Msg::Input('a'), model);
        let (model, _) = update_prompt(Msg::Input('b'), model);
        assert_eq!(model.input, "ab");
        let (model, cmd) = update_prompt(Msg::Backspace, model);
        assert_eq!(model.input, "a");
        assert_eq!(cmd, Cmd::None);
    }

    #[test]
    fn test_prompt_confirm_keeps_input() {
        let model = PromptModel {
            input: "AB1".to_string(),
            ..PromptModel::default()
        };
        let (model, cmd) = update_prompt(Msg::Confirm, model);
        assert_eq!(cmd, Cmd::Submit("AB1".to_string()));
        assert_eq!(model.input, "AB1");
        assert_eq!(model.cleared().input, "");
    }

    #[test]
    fn test_prompt_cancel() {
        let (_, cmd) = update_prompt(Msg::Cancel, PromptModel::default());
        assert!(cmd.is_quit());
    }

    #[test]
    fn test_prompt_scrolls_document() {
        let model = PromptModel {
            doc_lines: 30,
            doc_visible: 10,
            ..PromptModel::default()
        };
        let (model, _) = update_prompt(Msg::ScrollDown, model);
        assert_eq!(model.doc_scroll, 1);
        let (model, _) = update_prompt(Msg::ScrollUp, model);
        let (model, _) = update_prompt(Msg::ScrollUp, model);
        assert_eq!(model.doc_scroll, 0);
    }

    #[test]
    fn test_prompt_ignores_picker_navigation() {
        let model = PromptModel {
            input: "x".to_string(),
            ..PromptModel::default()
        };
        let (after, cmd) = update_prompt(Msg::JumpToBottom, model.clone());
        assert_eq!(after, model);
        assert_eq!(cmd, Cmd::None);
    }
}
