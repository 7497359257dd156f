use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::Hasher;
use std::ops::Range;
use std::rc::Rc;

use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::{h_flex, label::Label, v_flex, v_virtual_list};

use crate::demo::follow_scroll::FollowScroll;
use crate::demo::model::{EntryId, LogEntry, LogKind};

const DEFAULT_CONTENT_WIDTH: Pixels = px(440.);
const LIST_HORIZONTAL_PADDING: Pixels = px(16.);
const CONTENT_WIDTH_CHANGE_EPSILON: f32 = 1.0;
const HEADER_ROW_HEIGHT: Pixels = px(18.);
const ADDRESS_ROW_HEIGHT: Pixels = px(16.);
const ROW_GAP: Pixels = px(4.);
const ROW_PADDING_Y: Pixels = px(4.);
const PAYLOAD_PADDING_Y: Pixels = px(8.);
const PAYLOAD_LINE_HEIGHT: Pixels = px(16.);

// Terminal palette for the simulated network console. The log pane is
// intentionally dark in either theme, matching the widget's docs page.
const TIMESTAMP_COLOR: u32 = 0x64748b;
const ADDRESS_COLOR: u32 = 0x94a3b8;
const METHOD_CHIP_BG: u32 = 0x1e293b;
const PAYLOAD_BG: u32 = 0x1e293b;
const PAYLOAD_TEXT: u32 = 0xcbd5e1;
const ERROR_PAYLOAD_BG: u32 = 0x450a0a;
const ERROR_PAYLOAD_TEXT: u32 = 0xfecaca;
const EMPTY_STATE_COLOR: u32 = 0x64748b;

pub fn kind_border_color(kind: LogKind) -> Rgba {
    match kind {
        LogKind::Request => rgb(0x3b82f6),
        LogKind::Response => rgb(0x22c55e),
        LogKind::Error => rgb(0xef4444),
    }
}

pub fn kind_label_color(kind: LogKind) -> Rgba {
    match kind {
        LogKind::Request => rgb(0x60a5fa),
        LogKind::Response => rgb(0x4ade80),
        LogKind::Error => rgb(0xf87171),
    }
}

struct SizeCacheEntry {
    fingerprint: u64,
    height: Pixels,
    measured: bool,
}

/// Simulated network activity pane of the demo panel.
pub struct NetworkLogList {
    logs: Vec<LogEntry>,
    item_sizes: Rc<Vec<Size<Pixels>>>,
    scroll: FollowScroll,
    size_cache: HashMap<EntryId, SizeCacheEntry>,
    content_width: Option<Pixels>,
}

impl NetworkLogList {
    pub fn new(_cx: &mut Context<Self>) -> Self {
        Self {
            logs: Vec::new(),
            item_sizes: Rc::new(Vec::new()),
            scroll: FollowScroll::new(),
            size_cache: HashMap::new(),
            content_width: None,
        }
    }

    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    pub fn set_logs(&mut self, logs: Vec<LogEntry>, cx: &mut Context<Self>) {
        let appended = logs.len() > self.logs.len();
        self.logs = logs;
        self.rebuild_item_sizes();

        if appended {
            self.scroll.request_follow();
        }

        cx.notify();
    }

    fn update_content_width(&mut self, cx: &mut Context<Self>) {
        let list_width = self.scroll.bounds().size.width;
        if list_width <= Pixels::ZERO {
            return;
        }

        let next_content_width = max_pixels(px(1.), list_width - LIST_HORIZONTAL_PADDING * 2);
        let width_changed = self.content_width.is_none_or(|current| {
            (f32::from(current) - f32::from(next_content_width)).abs()
                > CONTENT_WIDTH_CHANGE_EPSILON
        });

        if width_changed {
            self.content_width = Some(next_content_width);

            for entry in self.size_cache.values_mut() {
                entry.measured = false;
            }

            self.rebuild_item_sizes();
            cx.notify();
        }
    }

    fn rebuild_item_sizes(&mut self) {
        let mut active_ids = HashSet::with_capacity(self.logs.len());
        let mut sizes = Vec::with_capacity(self.logs.len());

        for log in &self.logs {
            let next_fingerprint = log_fingerprint(log);
            let estimated_height = estimate_log_height(log);

            let cached = self.size_cache.entry(log.id).or_insert(SizeCacheEntry {
                fingerprint: next_fingerprint,
                height: estimated_height,
                measured: false,
            });

            // Logs are immutable after creation, so a fingerprint change only
            // happens if an id is ever reused; treat it as a fresh row.
            if cached.fingerprint != next_fingerprint {
                cached.fingerprint = next_fingerprint;
                cached.height = estimated_height;
                cached.measured = false;
            } else if !cached.measured {
                cached.height = estimated_height;
            }

            sizes.push(size(px(0.), cached.height));
            active_ids.insert(log.id);
        }

        self.size_cache.retain(|id, _| active_ids.contains(id));
        self.item_sizes = Rc::new(sizes);
    }

    fn measure_visible_items(
        &mut self,
        visible_range: Range<usize>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if self.logs.is_empty() {
            return;
        }

        let content_width = self.content_width.unwrap_or(DEFAULT_CONTENT_WIDTH);
        let available_space = size(
            AvailableSpace::Definite(content_width),
            AvailableSpace::MinContent,
        );
        let mut updated = false;

        for index in visible_range {
            let Some(log) = self.logs.get(index).cloned() else {
                continue;
            };

            let mut row = self.render_log_row(&log, index, cx);
            let measured_height = row.layout_as_root(available_space, window, cx).height;
            let Some(cached) = self.size_cache.get_mut(&log.id) else {
                continue;
            };
            let height_changed =
                !cached.measured || pixels_changed(cached.height, measured_height);
            if height_changed {
                cached.height = measured_height;
                updated = true;
            }
            cached.measured = true;
        }

        if updated {
            self.rebuild_item_sizes();
            cx.notify();
        }
    }

    fn render_log_row(
        &self,
        log: &LogEntry,
        _index: usize,
        _cx: &mut Context<Self>,
    ) -> AnyElement {
        let (payload_bg, payload_text) = if log.kind == LogKind::Error {
            (ERROR_PAYLOAD_BG, ERROR_PAYLOAD_TEXT)
        } else {
            (PAYLOAD_BG, PAYLOAD_TEXT)
        };

        let payload_lines = payload_pretty_lines(log);

        v_flex()
            .w_full()
            .gap(ROW_GAP)
            .py(ROW_PADDING_Y)
            .pl_3()
            .border_l_2()
            .border_color(kind_border_color(log.kind))
            .child(
                h_flex()
                    .gap_2()
                    .items_center()
                    .child(
                        Label::new(format!("[{}]", log.timestamp_label()))
                            .text_xs()
                            .text_color(rgb(TIMESTAMP_COLOR)),
                    )
                    .child(
                        Label::new(log.kind.label())
                            .text_xs()
                            .text_color(kind_label_color(log.kind)),
                    )
                    .when_some(log.method, |row, method| {
                        row.child(
                            div()
                                .px_1()
                                .rounded_sm()
                                .bg(rgb(METHOD_CHIP_BG))
                                .child(
                                    Label::new(method)
                                        .text_xs()
                                        .text_color(rgb(ADDRESS_COLOR)),
                                ),
                        )
                    }),
            )
            .when_some(log.address.clone(), |column, address| {
                column.child(
                    Label::new(address)
                        .text_xs()
                        .text_color(rgb(ADDRESS_COLOR)),
                )
            })
            .child(
                v_flex()
                    .w_full()
                    .px_2()
                    .py(PAYLOAD_PADDING_Y)
                    .rounded_lg()
                    .bg(rgb(payload_bg))
                    .children(payload_lines.into_iter().map(|line| {
                        Label::new(line)
                            .text_xs()
                            .text_color(rgb(payload_text))
                    })),
            )
            .into_any_element()
    }

    fn render_empty_state(&self) -> AnyElement {
        v_flex()
            .size_full()
            .items_center()
            .justify_center()
            .gap_1()
            .child(
                Label::new("Waiting for network activity...")
                    .text_sm()
                    .text_color(rgb(EMPTY_STATE_COLOR)),
            )
            .child(
                Label::new("Send a message to see the request.")
                    .text_sm()
                    .text_color(rgb(EMPTY_STATE_COLOR)),
            )
            .into_any_element()
    }
}

impl Render for NetworkLogList {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        if self.logs.is_empty() {
            return v_flex()
                .size_full()
                .min_h_0()
                .child(self.render_empty_state());
        }

        self.update_content_width(cx);
        self.scroll.update_follow_state();
        self.scroll.apply_pending_scroll();

        v_flex().size_full().min_h_0().child(
            v_virtual_list(
                cx.entity().clone(),
                "demo-network-log",
                self.item_sizes.clone(),
                |this, visible_range, window, cx| {
                    this.update_content_width(cx);
                    this.measure_visible_items(visible_range.clone(), window, cx);
                    visible_range
                        .filter_map(|index| {
                            this.logs
                                .get(index)
                                .cloned()
                                .map(|log| this.render_log_row(&log, index, cx))
                        })
                        .collect::<Vec<_>>()
                },
            )
            .size_full()
            .px_4()
            .py_3()
            .gap_4()
            .track_scroll(self.scroll.handle()),
        )
    }
}

/// Pretty-prints the payload for the console, one label per line.
fn payload_pretty_lines(log: &LogEntry) -> Vec<String> {
    let pretty = serde_json::to_string_pretty(&log.payload)
        .unwrap_or_else(|_| log.payload.to_string());
    pretty.lines().map(str::to_string).collect()
}

fn log_fingerprint(log: &LogEntry) -> u64 {
    let mut hasher = DefaultHasher::new();

    hasher.write(log.id.0.as_bytes());
    hasher.write_u8(match log.kind {
        LogKind::Request => 0,
        LogKind::Response => 1,
        LogKind::Error => 2,
    });
    if let Some(address) = &log.address {
        hasher.write(address.as_bytes());
    }
    hasher.write(log.payload.to_string().as_bytes());
    hasher.finish()
}

fn estimate_log_height(log: &LogEntry) -> Pixels {
    let payload_line_count = payload_pretty_lines(log).len().max(1);
    let mut total_height = ROW_PADDING_Y * 2
        + HEADER_ROW_HEIGHT
        + ROW_GAP
        + PAYLOAD_PADDING_Y * 2
        + PAYLOAD_LINE_HEIGHT * payload_line_count;

    if log.address.is_some() {
        total_height = total_height + ADDRESS_ROW_HEIGHT + ROW_GAP;
    }

    total_height
}

fn max_pixels(a: Pixels, b: Pixels) -> Pixels {
    if f32::from(a) >= f32::from(b) { a } else { b }
}

fn pixels_changed(a: Pixels, b: Pixels) -> bool {
    (f32::from(a) - f32::from(b)).abs() > 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use serde_json::json;
    use uuid::Uuid;

    fn log(raw_id: u128, kind: LogKind, address: Option<&str>) -> LogEntry {
        LogEntry {
            id: EntryId::new(Uuid::from_u128(raw_id)),
            timestamp: Local::now(),
            kind,
            method: address.is_some().then_some("POST"),
            address: address.map(str::to_string),
            payload: json!({"message": "Hi", "customerId": "cust_4242"}),
        }
    }

    #[test]
    fn payload_renders_one_label_per_pretty_line() {
        let lines = payload_pretty_lines(&log(1, LogKind::Request, Some("http://x/messages")));

        assert!(lines.len() >= 4);
        assert_eq!(lines.first().map(String::as_str), Some("{"));
        assert_eq!(lines.last().map(String::as_str), Some("}"));
    }

    #[test]
    fn rows_with_an_address_estimate_taller_than_rows_without() {
        let with_address = log(1, LogKind::Response, Some("http://x/messages"));
        let without_address = log(2, LogKind::Error, None);

        assert!(estimate_log_height(&with_address) > estimate_log_height(&without_address));
    }

    #[test]
    fn kind_colors_are_distinct() {
        let border_colors = [
            kind_border_color(LogKind::Request),
            kind_border_color(LogKind::Response),
            kind_border_color(LogKind::Error),
        ];

        assert_ne!(border_colors[0], border_colors[1]);
        assert_ne!(border_colors[1], border_colors[2]);
    }
}
