use std::path::PathBuf;
use std::sync::Arc;

use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::{
    ActiveTheme, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    label::Label,
    v_flex,
};

use parlor_gateway::{GatewayConfig, MessageGateway, create_gateway};

use crate::demo::{DemoPanel, RandomIdentifiers};
use crate::landing;
use crate::settings::ShowcaseSettings;

/// Returns the default themes directory path.
/// This is a pure function to allow deterministic testing of path resolution.
pub fn default_themes_path() -> PathBuf {
    PathBuf::from("./themes")
}

/// Maximum width of the centered landing content column.
const CONTENT_MAX_WIDTH: f32 = 1120.0;
#[cfg(target_os = "macos")]
const WINDOW_TOOLBAR_LEFT_SAFE_PADDING: f32 = 78.0;
#[cfg(not(target_os = "macos"))]
const WINDOW_TOOLBAR_LEFT_SAFE_PADDING: f32 = 16.0;
#[cfg(target_os = "windows")]
const WINDOW_TOOLBAR_RIGHT_SAFE_PADDING: f32 = 120.0;
#[cfg(not(target_os = "windows"))]
const WINDOW_TOOLBAR_RIGHT_SAFE_PADDING: f32 = 16.0;

/// Computes the top toolbar height using a Zed-style responsive formula.
///
/// This keeps the title area consistent across macOS and Linux while still
/// respecting user font scaling via rem size.
fn window_toolbar_height(window: &Window) -> Pixels {
    (1.75 * window.rem_size()).max(px(34.0))
}

gpui::actions!(shell, [Quit]);

/// Main showcase shell: landing page plus the embedded demo panel.
///
/// The shell resolves configuration once, constructs the REST gateway, and
/// injects it into the panel; a gateway that cannot be built leaves the panel
/// without a send capability, which the panel surfaces as a failure on first
/// use rather than a crash.
pub struct ShowcaseShell {
    demo_panel: Entity<DemoPanel>,
    endpoint: String,
    title_bar_should_move: bool,
}

impl ShowcaseShell {
    pub fn new(settings: ShowcaseSettings, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let base_url = settings.resolved_base_url();
        let endpoint = settings.messages_endpoint();

        let (gateway, gateway_error): (Option<Arc<dyn MessageGateway>>, Option<String>) =
            match create_gateway(GatewayConfig::new(base_url.clone())) {
                Ok(gateway) => {
                    tracing::info!(base_url = %base_url, "initialized message gateway");
                    (Some(gateway), None)
                }
                Err(error) => {
                    tracing::error!("failed to construct message gateway: {error}");
                    (None, Some(error.to_string()))
                }
            };

        let panel_endpoint = endpoint.clone();
        let demo_panel = cx.new(|cx| {
            DemoPanel::new(
                gateway,
                gateway_error,
                panel_endpoint,
                Box::new(RandomIdentifiers),
                window,
                cx,
            )
        });

        Self {
            demo_panel,
            endpoint,
            title_bar_should_move: false,
        }
    }
}

impl Render for ShowcaseShell {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let toolbar_height = window_toolbar_height(window);

        div()
            .size_full()
            .relative()
            .bg(theme.background)
            .child(
                div()
                    .id("showcase-page")
                    .size_full()
                    .pt(toolbar_height)
                    .overflow_y_scroll()
                    .child(
                        v_flex()
                            .w_full()
                            .child(render_section(landing::hero::render(theme)))
                            .child(self.render_demo_section(cx))
                            .child(render_section(landing::features::render(theme)))
                            .child(landing::footer::render()),
                    ),
            )
            .child(
                div()
                    .absolute()
                    .top_0()
                    .left_0()
                    .right_0()
                    .child(self.render_top_bar(window, toolbar_height, cx)),
            )
    }
}

impl ShowcaseShell {
    fn render_demo_section(&self, cx: &Context<Self>) -> AnyElement {
        let theme = cx.theme();

        let heading = v_flex()
            .w_full()
            .items_center()
            .gap_2()
            .child(
                div()
                    .text_size(px(28.))
                    .text_color(theme.foreground)
                    .child("Custom CRM Integration"),
            )
            .child(
                div()
                    .text_sm()
                    .text_color(theme.muted_foreground)
                    .child(
                        "Send a message through the injected send_message capability and \
                         watch the simulated network activity.",
                    ),
            );

        let section = v_flex()
            .w_full()
            .gap_8()
            .py_12()
            .child(heading)
            .child(self.demo_panel.clone());

        v_flex()
            .w_full()
            .items_center()
            .bg(theme.muted)
            .child(
                div()
                    .w_full()
                    .max_w(px(CONTENT_MAX_WIDTH))
                    .px_8()
                    .child(section),
            )
            .into_any_element()
    }

    fn render_top_bar(
        &self,
        window: &Window,
        toolbar_height: Pixels,
        cx: &Context<Self>,
    ) -> impl IntoElement {
        let theme = cx.theme();

        h_flex()
            .id("showcase-top-bar")
            .window_control_area(WindowControlArea::Drag)
            .on_mouse_down_out(cx.listener(|this, _, _window, _cx| {
                this.title_bar_should_move = false;
            }))
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, _, _window, _cx| {
                    this.title_bar_should_move = false;
                }),
            )
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, _, _window, _cx| {
                    this.title_bar_should_move = true;
                }),
            )
            .on_mouse_move(cx.listener(|this, _, window, _cx| {
                if this.title_bar_should_move {
                    this.title_bar_should_move = false;
                    window.start_window_move();
                }
            }))
            .w_full()
            .h(toolbar_height)
            .flex_shrink_0()
            .pl(px(WINDOW_TOOLBAR_LEFT_SAFE_PADDING))
            .pr(px(WINDOW_TOOLBAR_RIGHT_SAFE_PADDING))
            .items_center()
            .justify_between()
            .bg(theme.background)
            .border_b_1()
            .border_color(theme.border)
            .child(
                h_flex()
                    .gap_3()
                    .items_center()
                    .child(
                        div()
                            .size(px(24.))
                            .rounded_md()
                            .bg(theme.primary)
                            .flex()
                            .items_center()
                            .justify_center()
                            .text_sm()
                            .text_color(theme.background)
                            .child("P"),
                    )
                    .child(Label::new("Parlor").text_sm().text_color(theme.foreground))
                    .child(nav_label(theme.muted_foreground, "Product"))
                    .child(nav_label(theme.muted_foreground, "Solutions"))
                    .child(nav_label(theme.muted_foreground, "Pricing")),
            )
            .child(
                h_flex()
                    .gap_2()
                    .items_center()
                    .child(
                        div()
                            .id("showcase-endpoint-chip")
                            .px_2()
                            .py_1()
                            .rounded_full()
                            .bg(theme.muted)
                            .border_1()
                            .border_color(theme.border)
                            .text_xs()
                            .text_color(theme.muted_foreground)
                            .child(self.endpoint.clone()),
                    )
                    .child(
                        Button::new("top-bar-get-started")
                            .small()
                            .primary()
                            .child("Get Started"),
                    )
                    .child(self.render_linux_window_controls(window, cx)),
            )
            .when(
                cfg!(target_os = "linux") && window.window_controls().window_menu,
                |title_bar| {
                    title_bar.on_mouse_down(MouseButton::Right, |event, window, _| {
                        window.show_window_menu(event.position);
                    })
                },
            )
    }

    fn render_linux_window_controls(&self, window: &Window, cx: &Context<Self>) -> AnyElement {
        #[cfg(target_os = "linux")]
        {
            let maximize_icon = if window.is_maximized() {
                IconName::WindowRestore
            } else {
                IconName::WindowMaximize
            };

            h_flex()
                .id("showcase-window-controls")
                .items_center()
                // Keep clicks on window controls out of title bar drag gestures.
                .on_mouse_down(MouseButton::Left, |_, _, cx| cx.stop_propagation())
                .on_mouse_down(MouseButton::Right, |_, _, cx| cx.stop_propagation())
                .gap_2()
                .ml_2()
                .child(
                    Button::new("showcase-window-minimize")
                        .ghost()
                        .small()
                        .icon(IconName::WindowMinimize)
                        .on_click(cx.listener(|_, _, window, _| {
                            window.minimize_window();
                        })),
                )
                .child(
                    Button::new("showcase-window-maximize")
                        .ghost()
                        .small()
                        .icon(maximize_icon)
                        .on_click(cx.listener(|_, _, window, _| {
                            window.zoom_window();
                        })),
                )
                .child(
                    Button::new("showcase-window-close")
                        .ghost()
                        .small()
                        .icon(IconName::WindowClose)
                        .on_click(cx.listener(|_, _, window, _| {
                            window.remove_window();
                        })),
                )
                .into_any_element()
        }

        #[cfg(not(target_os = "linux"))]
        {
            let _ = (window, cx);
            div().into_any_element()
        }
    }
}

fn render_section(content: AnyElement) -> AnyElement {
    v_flex()
        .w_full()
        .items_center()
        .child(
            div()
                .w_full()
                .max_w(px(CONTENT_MAX_WIDTH))
                .px_8()
                .child(content),
        )
        .into_any_element()
}

fn nav_label(color: Hsla, text: &'static str) -> AnyElement {
    div()
        .text_sm()
        .text_color(color)
        .child(text)
        .into_any_element()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn themes_path_is_relative_to_the_working_directory() {
        assert_eq!(default_themes_path(), PathBuf::from("./themes"));
    }
}
