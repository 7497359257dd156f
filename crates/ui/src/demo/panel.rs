use std::sync::Arc;

use chrono::Local;
use gpui::*;
use gpui_component::{ActiveTheme, Icon, IconName, h_flex, label::Label, v_flex};
use gpui_tokio_bridge::Tokio;

use parlor_gateway::{AttemptOutcome, MessageGateway, SendRequest};

use crate::demo::composer::Composer;
use crate::demo::events::Submit;
use crate::demo::identity::IdentifierSource;
use crate::demo::model::{
    AttemptTicket, DemoSession, MISSING_CAPABILITY_ERROR, NO_OUTCOME_ERROR, SubmitRejection,
};
use crate::demo::network_log::NetworkLogList;
use crate::demo::transcript::TranscriptList;

const PANEL_HEIGHT: Pixels = px(600.);

// Fixed terminal palette for the network console card.
const CONSOLE_BG: u32 = 0x0f172a;
const CONSOLE_HEADER_BG: u32 = 0x1e293b;
const CONSOLE_BORDER: u32 = 0x334155;
const CONSOLE_TEXT: u32 = 0xe2e8f0;
const CONSOLE_MUTED: u32 = 0x64748b;
const WARNING_TEXT: u32 = 0xeab308;
const NOTE_TEXT: u32 = 0xfef08a;
const NOTE_BG: u32 = 0x422006;
const CONNECTED_DOT: u32 = 0x4ade80;

/// Two-pane live demo: support chat on the left, simulated network activity
/// on the right. Both panes reconcile from one [`DemoSession`].
///
/// The send capability and identifier source are injected at construction;
/// the panel never reaches into ambient globals.
pub struct DemoPanel {
    composer: Entity<Composer>,
    transcript: Entity<TranscriptList>,
    network_log: Entity<NetworkLogList>,
    session: DemoSession,
    identifiers: Box<dyn IdentifierSource>,
    gateway: Option<Arc<dyn MessageGateway>>,
    gateway_error: Option<String>,
    endpoint: String,
    current_attempt: Option<AttemptTicket>,
    worker_task: Option<Task<Result<(), gpui_tokio_bridge::JoinError>>>,
    outcome_task: Option<Task<()>>,
}

impl DemoPanel {
    pub fn new(
        gateway: Option<Arc<dyn MessageGateway>>,
        gateway_error: Option<String>,
        endpoint: String,
        mut identifiers: Box<dyn IdentifierSource>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let composer = cx.new(|cx| Composer::new(window, cx));
        let transcript = cx.new(TranscriptList::new);
        let network_log = cx.new(NetworkLogList::new);
        let session = DemoSession::new(identifiers.as_mut());

        cx.subscribe(&composer, |this, _, event: &Submit, cx| {
            this.handle_submit(event.clone(), cx);
        })
        .detach();

        let mut this = Self {
            composer,
            transcript,
            network_log,
            session,
            identifiers,
            gateway,
            gateway_error,
            endpoint,
            current_attempt: None,
            worker_task: None,
            outcome_task: None,
        };

        this.sync_views(cx);
        this
    }

    pub fn customer_id(&self) -> &str {
        self.session.customer_id()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn handle_submit(&mut self, event: Submit, cx: &mut Context<Self>) {
        if self.current_attempt.is_some() {
            // The composer is disabled while busy; ignore stray submits.
            return;
        }

        let ticket = match self.session.begin_attempt(
            &event.text,
            &self.endpoint,
            Local::now(),
            self.identifiers.as_mut(),
        ) {
            Ok(ticket) => ticket,
            Err(SubmitRejection::EmptyInput | SubmitRejection::AttemptInFlight) => return,
        };

        self.current_attempt = Some(ticket);
        self.composer.update(cx, |composer, cx| {
            composer.set_busy(true, cx);
        });
        self.sync_views(cx);

        let Some(gateway) = self.gateway.clone() else {
            let error_text = self
                .gateway_error
                .clone()
                .unwrap_or_else(|| MISSING_CAPABILITY_ERROR.to_string());
            self.finish_attempt(ticket, Err(error_text), cx);
            return;
        };

        let request = SendRequest::new(event.text.clone(), self.session.customer_id());
        match gateway.send_message(request) {
            Ok(handle) => {
                self.worker_task = Some(Tokio::spawn(cx, handle.worker));
                self.spawn_outcome_reader(ticket, handle.outcome, cx);
            }
            Err(error) => {
                self.finish_attempt(ticket, Err(error.to_string()), cx);
            }
        }
    }

    fn spawn_outcome_reader(
        &mut self,
        ticket: AttemptTicket,
        outcome: AttemptOutcome,
        cx: &mut Context<Self>,
    ) {
        self.outcome_task = Some(cx.spawn(async move |this, cx| {
            let outcome = outcome.recv().await;

            let _ = this.update(cx, |this, cx| {
                let settled = match outcome {
                    Some(Ok(payload)) => Ok(payload),
                    Some(Err(error)) => Err(error.to_string()),
                    // Worker dropped without settling; surface it as a failure.
                    None => Err(NO_OUTCOME_ERROR.to_string()),
                };
                this.finish_attempt(ticket, settled, cx);
            });
        }));
    }

    fn finish_attempt(
        &mut self,
        ticket: AttemptTicket,
        outcome: Result<serde_json::Value, String>,
        cx: &mut Context<Self>,
    ) {
        if self.current_attempt != Some(ticket) {
            // Stale outcomes must not settle a newer attempt.
            return;
        }

        match outcome {
            Ok(payload) => {
                self.session.settle_delivered(
                    ticket,
                    &self.endpoint,
                    payload,
                    Local::now(),
                    self.identifiers.as_mut(),
                );
            }
            Err(error_text) => {
                tracing::warn!(error = %error_text, "demo send attempt failed");
                self.session.settle_failed(
                    ticket,
                    &error_text,
                    Local::now(),
                    self.identifiers.as_mut(),
                );
            }
        }

        self.current_attempt = None;
        self.worker_task = None;
        self.outcome_task = None;

        self.composer.update(cx, |composer, cx| {
            composer.set_busy(false, cx);
        });
        self.sync_views(cx);
        cx.notify();
    }

    fn sync_views(&mut self, cx: &mut Context<Self>) {
        let entries = self.session.entries().to_vec();
        let logs = self.session.logs().to_vec();

        self.transcript.update(cx, |list, cx| {
            list.set_entries(entries, cx);
        });
        self.network_log.update(cx, |list, cx| {
            list.set_logs(logs, cx);
        });
    }

    fn render_chat_card(&self, cx: &Context<Self>) -> AnyElement {
        let theme = cx.theme();

        v_flex()
            .flex_1()
            .min_w_0()
            .h(PANEL_HEIGHT)
            .rounded_lg()
            .border_1()
            .border_color(theme.border)
            .bg(theme.background)
            .overflow_hidden()
            .child(
                h_flex()
                    .w_full()
                    .p_3()
                    .items_center()
                    .justify_between()
                    .bg(theme.accent)
                    .child(
                        h_flex()
                            .gap_3()
                            .items_center()
                            .child(
                                div()
                                    .size(px(32.))
                                    .rounded_full()
                                    .border_1()
                                    .border_color(theme.border)
                                    .flex()
                                    .items_center()
                                    .justify_center()
                                    .child(
                                        Icon::new(IconName::CircleUser)
                                            .size(px(18.))
                                            .text_color(theme.accent_foreground),
                                    ),
                            )
                            .child(
                                v_flex()
                                    .child(
                                        Label::new("Support Chat")
                                            .text_sm()
                                            .text_color(theme.accent_foreground),
                                    )
                                    .child(
                                        h_flex()
                                            .gap_1()
                                            .items_center()
                                            .child(
                                                div()
                                                    .size(px(8.))
                                                    .rounded_full()
                                                    .bg(rgb(CONNECTED_DOT)),
                                            )
                                            .child(
                                                Label::new("API connected")
                                                    .text_xs()
                                                    .text_color(theme.accent_foreground),
                                            ),
                                    ),
                            ),
                    )
                    .child(
                        div()
                            .px_2()
                            .py_1()
                            .rounded_sm()
                            .bg(theme.background)
                            .child(
                                Label::new("REST mode")
                                    .text_xs()
                                    .text_color(theme.muted_foreground),
                            ),
                    ),
            )
            .child(
                div()
                    .flex_1()
                    .min_h_0()
                    .bg(theme.muted)
                    .child(self.transcript.clone()),
            )
            .child(self.composer.clone())
            .into_any_element()
    }

    fn render_console_card(&self) -> AnyElement {
        v_flex()
            .flex_1()
            .min_w_0()
            .h(PANEL_HEIGHT)
            .rounded_lg()
            .border_1()
            .border_color(rgb(CONSOLE_BORDER))
            .bg(rgb(CONSOLE_BG))
            .overflow_hidden()
            .child(
                h_flex()
                    .w_full()
                    .p_3()
                    .items_center()
                    .justify_between()
                    .bg(rgb(CONSOLE_HEADER_BG))
                    .border_b_1()
                    .border_color(rgb(CONSOLE_BORDER))
                    .child(
                        h_flex()
                            .gap_2()
                            .items_center()
                            .child(div().size(px(8.)).rounded_full().bg(rgb(CONNECTED_DOT)))
                            .child(
                                Label::new("Network Activity Log")
                                    .text_sm()
                                    .text_color(rgb(CONSOLE_TEXT)),
                            ),
                    )
                    .child(
                        Label::new("Local API warning")
                            .text_xs()
                            .text_color(rgb(WARNING_TEXT)),
                    ),
            )
            .child(
                div()
                    .w_full()
                    .px_4()
                    .py_2()
                    .bg(rgb(NOTE_BG))
                    .border_b_1()
                    .border_color(rgb(CONSOLE_BORDER))
                    .child(
                        Label::new(format!(
                            "Note: requests go to {}. They will fail unless a widget backend is \
                             running there with CORS enabled.",
                            self.endpoint
                        ))
                        .text_xs()
                        .text_color(rgb(NOTE_TEXT)),
                    ),
            )
            .child(
                div()
                    .flex_1()
                    .min_h_0()
                    .child(self.network_log.clone()),
            )
            .child(
                h_flex()
                    .w_full()
                    .px_4()
                    .py_2()
                    .items_center()
                    .justify_between()
                    .bg(rgb(CONSOLE_HEADER_BG))
                    .child(
                        Label::new(format!("customer: {}", self.session.customer_id()))
                            .text_xs()
                            .text_color(rgb(CONSOLE_MUTED)),
                    )
                    .child(
                        Label::new(format!("endpoint: {}", self.endpoint))
                            .text_xs()
                            .text_color(rgb(CONSOLE_MUTED)),
                    ),
            )
            .into_any_element()
    }
}

impl Render for DemoPanel {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        h_flex()
            .id("demo-panel")
            .w_full()
            .gap_6()
            .items_start()
            .child(self.render_chat_card(cx))
            .child(self.render_console_card())
    }
}
