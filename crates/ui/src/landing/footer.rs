use gpui::*;
use gpui_component::{h_flex, v_flex};

const FOOTER_BG: u32 = 0x0f172a;
const FOOTER_TEXT: u32 = 0xe2e8f0;
const FOOTER_MUTED: u32 = 0x64748b;

pub fn render() -> AnyElement {
    h_flex()
        .w_full()
        .px_8()
        .py_6()
        .items_center()
        .justify_between()
        .bg(rgb(FOOTER_BG))
        .child(
            v_flex()
                .gap_1()
                .child(div().text_base().text_color(rgb(FOOTER_TEXT)).child("Parlor"))
                .child(
                    div()
                        .text_xs()
                        .text_color(rgb(FOOTER_MUTED))
                        .child("Customer conversations, inside your CRM."),
                ),
        )
        .child(
            div()
                .text_xs()
                .text_color(rgb(FOOTER_MUTED))
                .child("Parlor Systems. All rights reserved."),
        )
        .into_any_element()
}
