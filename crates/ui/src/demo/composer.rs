use gpui::*;
use gpui_component::{
    ActiveTheme, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    input::{Input, InputEvent, InputState},
    label::Label,
    v_flex,
};

use crate::demo::events::Submit;

/// Single-line demo input row.
///
/// Busy mirrors the panel's in-flight attempt: while set, the input and the
/// send button are disabled, so re-submission is impossible by construction.
pub struct Composer {
    input_state: Entity<InputState>,
    is_busy: bool,
}

impl EventEmitter<Submit> for Composer {}

impl Composer {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let input_state = cx.new(|cx| {
            InputState::new(window, cx)
                .placeholder("Type a message...")
                .clean_on_escape()
        });

        cx.subscribe_in(
            &input_state,
            window,
            |this, _, event: &InputEvent, window, cx| {
                if let InputEvent::PressEnter { .. } = event {
                    this.handle_submit(window, cx);
                }
            },
        )
        .detach();

        Self {
            input_state,
            is_busy: false,
        }
    }

    pub fn set_busy(&mut self, busy: bool, cx: &mut Context<Self>) {
        self.is_busy = busy;
        cx.notify();
    }

    pub fn clear(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.input_state.update(cx, |state, cx| {
            state.set_value("", window, cx);
        });
    }

    fn handle_submit(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if self.is_busy {
            return;
        }

        let text = self.input_state.read(cx).value().to_string();
        if text.trim().is_empty() {
            return;
        }

        cx.emit(Submit::new(text));
        self.clear(window, cx);
    }
}

impl Render for Composer {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let is_busy = self.is_busy;
        let action = if is_busy {
            h_flex()
                .gap_2()
                .items_center()
                .px_2()
                .child(div().size(px(8.)).rounded_full().bg(theme.primary))
                .child(
                    Label::new("Sending")
                        .text_xs()
                        .text_color(theme.muted_foreground),
                )
                .into_any_element()
        } else {
            Button::new("demo-send")
                .small()
                .primary()
                .icon(IconName::ArrowUp)
                .child("Send")
                .on_click(cx.listener(|this, _, window, cx| {
                    this.handle_submit(window, cx);
                }))
                .into_any_element()
        };

        v_flex()
            .bg(theme.background)
            .gap_2()
            .p_3()
            .border_t_1()
            .border_color(theme.border)
            .child(
                div()
                    .w_full()
                    .flex()
                    .gap_2()
                    .items_center()
                    .child(
                        div()
                            .flex_1()
                            .px_3()
                            .py_2()
                            .rounded_lg()
                            .border_1()
                            .border_color(theme.border)
                            .bg(theme.background)
                            .child(Input::new(&self.input_state).w_full().disabled(is_busy)),
                    )
                    .child(action),
            )
            .child(
                div().w_full().flex().justify_center().child(
                    Label::new("Calls the injected send_message capability")
                        .text_xs()
                        .text_color(theme.muted_foreground),
                ),
            )
    }
}
