//! Backward pagination through a conversation's messages.
//!
//! `list_messages` returns pages newest-first, strictly older than a `before`
//! timestamp. Messages that share the oldest timestamp of a page may be split
//! across the page boundary, so the next request starts just above that
//! timestamp group and the overlap is dropped by id. A full page holding a
//! single timestamp gives no such restart point; the same position is then
//! requested again with a doubled limit until an older timestamp shows up.

use std::cmp::Ordering;
use std::collections::HashSet;
use flabee_types::{
    Result,
    id::RecordId,
    message::Message,
    timestamp::Timestamp,
};
use crate::ports::BackendPort;

/// Position of a backward walk through one conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct PageCursor {
    page_size: u32,
    /// Limit multiplier while a timestamp group fills whole pages
    widen: u32,
    /// Sent as `before` on the next request
    before: Option<Timestamp>,
    /// Timestamp of the oldest message fetched so far
    watermark: Option<Timestamp>,
    exhausted: bool,
}

impl PageCursor {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            widen: 1,
            before: None,
            watermark: None,
            exhausted: false,
        }
    }

    /// Same position, different page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Row limit of the next request
    pub fn limit(&self) -> u32 {
        self.page_size.saturating_mul(self.widen)
    }

    pub fn before(&self) -> Option<&Timestamp> {
        self.before.as_ref()
    }

    pub fn watermark(&self) -> Option<&Timestamp> {
        self.watermark.as_ref()
    }

    /// True once a short page has shown there is nothing older
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Move past a page returned for the current position (newest first).
    pub fn advance(&mut self, page: &[Message]) {
        if (page.len() as u32) < self.limit() {
            self.exhausted = true;
        }
        let Some(oldest) = page.last() else {
            return;
        };
        let oldest_ts = &oldest.created_at;

        // Oldest timestamp on the page that is newer than the boundary group.
        let above_boundary = page
            .iter()
            .rev()
            .map(|m| &m.created_at)
            .find(|ts| ts.cmp_instant(oldest_ts) == Ordering::Greater);

        match above_boundary {
            Some(ts) => {
                self.before = Some(ts.clone());
                self.widen = 1;
            }
            None if self.exhausted => {}
            None => {
                self.widen = self.widen.saturating_mul(2);
                log::warn!(
                    "Page of {} messages all share timestamp {}; retrying with limit {}",
                    page.len(),
                    oldest_ts,
                    self.limit()
                );
            }
        }
        self.watermark = Some(oldest_ts.clone());
    }
}

/// Result of a backward walk, oldest message first.
#[derive(Debug, Clone)]
pub struct Backfill {
    pub messages: Vec<Message>,
    pub cursor: PageCursor,
    pub pages: usize,
}

impl Backfill {
    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_exhausted()
    }
}

/// Fetch pages backward from `cursor` until a short page or `max_pages`.
///
/// `known` holds ids the caller already has; they are skipped so the result
/// never repeats a message across a page boundary.
pub async fn fetch_backward(
    backend: &dyn BackendPort,
    conversation_id: &RecordId,
    mut cursor: PageCursor,
    max_pages: usize,
    known: &HashSet<RecordId>,
) -> Result<Backfill> {
    let mut seen: HashSet<RecordId> = known.clone();
    let mut newest_first: Vec<Message> = Vec::new();
    let mut pages = 0;

    while !cursor.is_exhausted() && pages < max_pages {
        let page = backend
            .list_messages(conversation_id, cursor.before(), cursor.limit())
            .await?;
        pages += 1;
        log::debug!(
            "list_messages({}, before={:?}, limit={}) -> {} rows",
            conversation_id,
            cursor.before().map(Timestamp::as_str),
            cursor.limit(),
            page.len()
        );

        cursor.advance(&page);
        newest_first.extend(page.into_iter().filter(|m| seen.insert(m.id.clone())));
    }

    newest_first.reverse();
    Ok(Backfill {
        messages: newest_first,
        cursor,
        pages,
    })
}

/// Put `older` in front of `window`, dropping ids the window already holds.
pub fn splice_older(window: &mut Vec<Message>, older: Vec<Message>) {
    let mut merged: Vec<Message> = {
        let present: HashSet<&RecordId> = window.iter().map(|m| &m.id).collect();
        older
            .into_iter()
            .filter(|m| !present.contains(&m.id))
            .collect()
    };
    merged.append(window);
    *window = merged;
}
