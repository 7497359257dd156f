use gpui::*;
use gpui_component::{Theme, h_flex, v_flex};

const FEATURES: [(&str, &str); 6] = [
    (
        "Real-time Chat",
        "Connect with visitors instantly using the widget demoed above.",
    ),
    (
        "Customer Profiles",
        "See who you are talking to with detailed user enrichment data.",
    ),
    (
        "Analytics Dashboard",
        "Track response times, resolution rates, and customer satisfaction scores.",
    ),
    (
        "Enterprise Security",
        "Bank-grade encryption ensures your customer conversations remain private.",
    ),
    (
        "Instant Deployment",
        "Integrating the widget takes less than two minutes.",
    ),
    (
        "Global CDN",
        "The widget loads fast anywhere in the world, ensuring no lag for users.",
    ),
];

pub fn render(theme: &Theme) -> AnyElement {
    let mut grid = v_flex().w_full().gap_8();

    for pair in FEATURES.chunks(2) {
        let mut row = h_flex().w_full().gap_8();
        for (name, description) in pair {
            row = row.child(feature_card(theme, name, description));
        }
        grid = grid.child(row);
    }

    v_flex()
        .w_full()
        .gap_10()
        .py_16()
        .child(
            v_flex()
                .w_full()
                .items_center()
                .gap_2()
                .child(
                    div()
                        .text_sm()
                        .text_color(theme.primary)
                        .child("FEATURES"),
                )
                .child(
                    div()
                        .text_size(px(28.))
                        .text_color(theme.foreground)
                        .child("Everything you need to support"),
                )
                .child(
                    div()
                        .max_w(px(620.))
                        .text_base()
                        .text_color(theme.muted_foreground)
                        .child("Test the CRM widget on this page. Interact with the demo above to simulate a real user session."),
                ),
        )
        .child(grid)
        .into_any_element()
}

fn feature_card(theme: &Theme, name: &'static str, description: &'static str) -> AnyElement {
    let initial = name.chars().next().unwrap_or('?').to_string();

    h_flex()
        .flex_1()
        .min_w_0()
        .gap_4()
        .items_start()
        .child(
            div()
                .size(px(48.))
                .flex_shrink_0()
                .rounded_lg()
                .bg(theme.primary)
                .flex()
                .items_center()
                .justify_center()
                .text_lg()
                .text_color(theme.background)
                .child(initial),
        )
        .child(
            v_flex()
                .min_w_0()
                .gap_1()
                .child(div().text_base().text_color(theme.foreground).child(name))
                .child(
                    div()
                        .text_sm()
                        .text_color(theme.muted_foreground)
                        .child(description),
                ),
        )
        .into_any_element()
}
