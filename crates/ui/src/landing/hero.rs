use gpui::*;
use gpui_component::{
    Theme,
    button::{Button, ButtonVariants},
    h_flex, v_flex,
};

const HEADLINE_TOP: &str = "Data driven solutions for";
const HEADLINE_ACCENT: &str = "modern business";
const SUBCOPY: &str = "Enhance your customer relationships with our cutting-edge CRM \
integration. Test your chat widgets, analyze data, and grow your revenue in one unified \
platform.";

pub fn render(theme: &Theme) -> AnyElement {
    v_flex()
        .w_full()
        .gap_5()
        .py_16()
        .child(
            v_flex()
                .gap_1()
                .child(
                    div()
                        .text_size(px(36.))
                        .text_color(theme.foreground)
                        .child(HEADLINE_TOP),
                )
                .child(
                    div()
                        .text_size(px(36.))
                        .text_color(theme.primary)
                        .child(HEADLINE_ACCENT),
                ),
        )
        .child(
            div()
                .max_w(px(620.))
                .text_base()
                .text_color(theme.muted_foreground)
                .child(SUBCOPY),
        )
        .child(
            h_flex()
                .gap_3()
                .child(Button::new("hero-start-demo").primary().child("Start Demo"))
                .child(Button::new("hero-live-preview").ghost().child("Live Preview")),
        )
        .child(
            h_flex()
                .gap_4()
                .items_center()
                .child(trial_note(theme, "Free 14-day trial"))
                .child(trial_note(theme, "No credit card required")),
        )
        .into_any_element()
}

fn trial_note(theme: &Theme, text: &'static str) -> AnyElement {
    h_flex()
        .gap_2()
        .items_center()
        .child(div().size(px(8.)).rounded_full().bg(rgb(0x22c55e)))
        .child(
            div()
                .text_sm()
                .text_color(theme.muted_foreground)
                .child(text),
        )
        .into_any_element()
}
