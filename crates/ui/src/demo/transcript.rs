use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::Hasher;
use std::ops::Range;
use std::rc::Rc;

use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::{ActiveTheme, Icon, IconName, h_flex, label::Label, v_flex, v_virtual_list};

use crate::demo::follow_scroll::FollowScroll;
use crate::demo::model::{ChatEntry, DeliveryStatus, EntryId, Sender};

const DEFAULT_CONTENT_WIDTH: Pixels = px(440.);
const LIST_HORIZONTAL_PADDING: Pixels = px(16.);
const CONTENT_WIDTH_CHANGE_EPSILON: f32 = 1.0;
const USER_BUBBLE_MAX_WIDTH: Pixels = px(360.);
const BUBBLE_PADDING_X: Pixels = px(14.);
const BUBBLE_PADDING_Y: Pixels = px(10.);
const SPEAKER_LABEL_HEIGHT: Pixels = px(16.);
const SPEAKER_LABEL_GAP: Pixels = px(8.);
const PENDING_ROW_HEIGHT: Pixels = px(20.);
const PENDING_ROW_GAP: Pixels = px(8.);
const ESTIMATED_TEXT_LINE_HEIGHT: Pixels = px(18.);
const ESTIMATED_CHAR_WIDTH: f32 = 7.0;

struct SizeCacheEntry {
    fingerprint: u64,
    height: Pixels,
    measured: bool,
}

/// Conversation transcript pane of the demo panel.
pub struct TranscriptList {
    entries: Vec<ChatEntry>,
    item_sizes: Rc<Vec<Size<Pixels>>>,
    scroll: FollowScroll,
    size_cache: HashMap<EntryId, SizeCacheEntry>,
    content_width: Option<Pixels>,
}

impl TranscriptList {
    pub fn new(_cx: &mut Context<Self>) -> Self {
        Self {
            entries: Vec::new(),
            item_sizes: Rc::new(Vec::new()),
            scroll: FollowScroll::new(),
            size_cache: HashMap::new(),
            content_width: None,
        }
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn set_entries(&mut self, entries: Vec<ChatEntry>, cx: &mut Context<Self>) {
        let appended = entries.len() > self.entries.len();
        self.entries = entries;
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

            // Mark cached measurements dirty so row heights track the new width.
            for entry in self.size_cache.values_mut() {
                entry.measured = false;
            }

            self.rebuild_item_sizes();
            cx.notify();
        }
    }

    fn rebuild_item_sizes(&mut self) {
        let content_width = self.content_width.unwrap_or(DEFAULT_CONTENT_WIDTH);
        let mut active_ids = HashSet::with_capacity(self.entries.len());
        let mut sizes = Vec::with_capacity(self.entries.len());

        for entry in &self.entries {
            let next_fingerprint = entry_fingerprint(entry);
            let estimated_height = estimate_entry_height(entry, content_width);

            let cached = self.size_cache.entry(entry.id).or_insert(SizeCacheEntry {
                fingerprint: next_fingerprint,
                height: estimated_height,
                measured: false,
            });

            // Cache entries stay keyed by entry id and invalidate only on
            // semantic changes (a status transition or new text).
            if cached.fingerprint != next_fingerprint {
                cached.fingerprint = next_fingerprint;
                cached.height = estimated_height;
                cached.measured = false;
            } else if !cached.measured {
                cached.height = estimated_height;
            }

            sizes.push(size(px(0.), cached.height));
            active_ids.insert(entry.id);
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
        if self.entries.is_empty() {
            return;
        }

        let content_width = self.content_width.unwrap_or(DEFAULT_CONTENT_WIDTH);
        let available_space = size(
            AvailableSpace::Definite(content_width),
            AvailableSpace::MinContent,
        );
        let mut updated = false;

        for index in visible_range {
            let Some(entry) = self.entries.get(index).cloned() else {
                continue;
            };

            let mut row = self.render_entry_row(&entry, index, cx);
            let measured_height = row.layout_as_root(available_space, window, cx).height;
            let Some(cached) = self.size_cache.get_mut(&entry.id) else {
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

    fn render_entry_row(
        &self,
        entry: &ChatEntry,
        _index: usize,
        cx: &mut Context<Self>,
    ) -> AnyElement {
        let theme = cx.theme();

        if entry.sender == Sender::User {
            let failed = entry.status == DeliveryStatus::Failed;
            let pending = entry.status == DeliveryStatus::Pending;

            return v_flex()
                .w_full()
                .items_end()
                .gap_1()
                .child(
                    h_flex()
                        .items_center()
                        .gap_2()
                        .child(
                            div()
                                .max_w(USER_BUBBLE_MAX_WIDTH)
                                .px(BUBBLE_PADDING_X)
                                .py(BUBBLE_PADDING_Y)
                                .rounded_lg()
                                .bg(theme.accent)
                                .text_color(theme.accent_foreground)
                                .child(Label::new(entry.text.clone()).text_sm()),
                        )
                        .when(failed, |row| {
                            row.child(
                                Icon::new(IconName::CircleX)
                                    .size(px(16.))
                                    .text_color(theme.danger),
                            )
                        }),
                )
                .when(pending, |column| {
                    column.child(
                        h_flex()
                            .gap_2()
                            .items_center()
                            .child(div().size(px(8.)).rounded_full().bg(theme.primary))
                            .child(
                                Label::new("Sending")
                                    .text_xs()
                                    .text_color(theme.muted_foreground),
                            ),
                    )
                })
                .into_any_element();
        }

        let content = if entry.status == DeliveryStatus::Failed {
            h_flex()
                .gap_2()
                .items_center()
                .child(
                    Icon::new(IconName::CircleX)
                        .size(px(16.))
                        .text_color(theme.danger),
                )
                .child(
                    Label::new(entry.text.clone())
                        .text_sm()
                        .text_color(theme.danger),
                )
                .into_any_element()
        } else {
            Label::new(entry.text.clone()).text_sm().into_any_element()
        };

        v_flex()
            .w_full()
            .items_start()
            .gap_2()
            .child(
                Label::new("Agent")
                    .text_xs()
                    .text_color(theme.foreground.opacity(0.5)),
            )
            .child(
                div()
                    .max_w(USER_BUBBLE_MAX_WIDTH)
                    .px(BUBBLE_PADDING_X)
                    .py(BUBBLE_PADDING_Y)
                    .rounded_lg()
                    .border_1()
                    .border_color(theme.border)
                    .bg(theme.background)
                    .child(content),
            )
            .into_any_element()
    }
}

impl Render for TranscriptList {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        self.update_content_width(cx);
        self.scroll.update_follow_state();
        self.scroll.apply_pending_scroll();

        v_flex().size_full().min_h_0().child(
            v_virtual_list(
                cx.entity().clone(),
                "demo-transcript",
                self.item_sizes.clone(),
                |this, visible_range, window, cx| {
                    this.update_content_width(cx);
                    this.measure_visible_items(visible_range.clone(), window, cx);
                    visible_range
                        .filter_map(|index| {
                            this.entries
                                .get(index)
                                .cloned()
                                .map(|entry| this.render_entry_row(&entry, index, cx))
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

fn entry_fingerprint(entry: &ChatEntry) -> u64 {
    let mut hasher = DefaultHasher::new();

    hasher.write(entry.id.0.as_bytes());
    hasher.write_u8(match entry.sender {
        Sender::User => 0,
        Sender::Agent => 1,
    });
    hasher.write_u8(match entry.status {
        DeliveryStatus::Pending => 0,
        DeliveryStatus::Delivered => 1,
        DeliveryStatus::Failed => 2,
    });
    hasher.write(entry.text.as_bytes());
    hasher.finish()
}

fn estimate_entry_height(entry: &ChatEntry, content_width: Pixels) -> Pixels {
    let bubble_width = min_pixels(content_width, USER_BUBBLE_MAX_WIDTH);
    let text_width = max_pixels(px(1.), bubble_width - BUBBLE_PADDING_X * 2);
    let text_height = estimate_text_height(&entry.text, text_width);
    let bubble_height = text_height + BUBBLE_PADDING_Y * 2;

    match entry.sender {
        Sender::User => {
            if entry.status == DeliveryStatus::Pending {
                bubble_height + PENDING_ROW_GAP + PENDING_ROW_HEIGHT
            } else {
                bubble_height
            }
        }
        Sender::Agent => SPEAKER_LABEL_HEIGHT + SPEAKER_LABEL_GAP + bubble_height,
    }
}

fn estimate_text_height(content: &str, width: Pixels) -> Pixels {
    if content.is_empty() {
        return ESTIMATED_TEXT_LINE_HEIGHT;
    }

    let width_as_f32 = f32::from(width);
    let chars_per_line = (width_as_f32 / ESTIMATED_CHAR_WIDTH).floor().max(1.0) as usize;

    let mut line_count = 0usize;
    for line in content.lines() {
        let char_count = line.chars().count().max(1);
        line_count += char_count.div_ceil(chars_per_line);
    }

    ESTIMATED_TEXT_LINE_HEIGHT * line_count.max(1)
}

fn max_pixels(a: Pixels, b: Pixels) -> Pixels {
    if f32::from(a) >= f32::from(b) { a } else { b }
}

fn min_pixels(a: Pixels, b: Pixels) -> Pixels {
    if f32::from(a) <= f32::from(b) { a } else { b }
}

fn pixels_changed(a: Pixels, b: Pixels) -> bool {
    (f32::from(a) - f32::from(b)).abs() > 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn entry(raw_id: u128, sender: Sender, status: DeliveryStatus, text: &str) -> ChatEntry {
        ChatEntry::new(EntryId::new(Uuid::from_u128(raw_id)), sender, text, status)
    }

    #[test]
    fn status_transition_changes_the_fingerprint() {
        let pending = entry(1, Sender::User, DeliveryStatus::Pending, "Hi");
        let delivered = entry(1, Sender::User, DeliveryStatus::Delivered, "Hi");

        assert_ne!(entry_fingerprint(&pending), entry_fingerprint(&delivered));
        assert_eq!(entry_fingerprint(&pending), entry_fingerprint(&pending));
    }

    #[test]
    fn pending_user_rows_reserve_space_for_the_sending_indicator() {
        let width = px(440.);
        let pending = entry(1, Sender::User, DeliveryStatus::Pending, "Hi");
        let delivered = entry(1, Sender::User, DeliveryStatus::Delivered, "Hi");

        let pending_height = estimate_entry_height(&pending, width);
        let delivered_height = estimate_entry_height(&delivered, width);
        assert!(pending_height > delivered_height);
    }

    #[test]
    fn long_text_estimates_more_lines_than_short_text() {
        let width = px(440.);
        let short = entry(1, Sender::Agent, DeliveryStatus::Delivered, "Hi");
        let long = entry(
            2,
            Sender::Agent,
            DeliveryStatus::Delivered,
            &"lorem ipsum dolor sit amet ".repeat(12),
        );

        assert!(estimate_entry_height(&long, width) > estimate_entry_height(&short, width));
    }
}
