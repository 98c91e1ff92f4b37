//! Ordered play queue with a cursor
//!
//! Navigation is circular and never reorders the items: `next` after the last
//! index wraps to 0 and `previous` before index 0 wraps to the last one.

use vibe_core::MediaItem;

use crate::error::{PlaybackError, Result};

/// Items plus the index of the one being played
#[derive(Debug, Clone, Default)]
pub struct Queue {
    items: Vec<MediaItem>,
    cursor: Option<usize>,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the items and point the cursor at `start_index`
    ///
    /// An empty list clears the cursor regardless of `start_index`.
    pub fn replace(&mut self, items: Vec<MediaItem>, start_index: usize) -> Result<()> {
        if items.is_empty() {
            self.clear();
            return Ok(());
        }
        if start_index >= items.len() {
            return Err(PlaybackError::IndexOutOfBounds(start_index));
        }

        self.items = items;
        self.cursor = Some(start_index);
        Ok(())
    }

    /// Remove all items
    pub fn clear(&mut self) {
        self.items.clear();
        self.cursor = None;
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items in order
    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    /// Item at `index`
    pub fn get(&self, index: usize) -> Option<&MediaItem> {
        self.items.get(index)
    }

    /// Current cursor
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Item under the cursor
    pub fn current(&self) -> Option<&MediaItem> {
        self.cursor.and_then(|i| self.items.get(i))
    }

    /// Move the cursor
    pub fn set_cursor(&mut self, index: usize) -> Result<()> {
        if index >= self.items.len() {
            return Err(PlaybackError::IndexOutOfBounds(index));
        }
        self.cursor = Some(index);
        Ok(())
    }

    /// Index after the cursor, wrapping; 0 when no cursor is set
    pub fn next_index(&self) -> Option<usize> {
        let len = self.items.len();
        if len == 0 {
            return None;
        }
        Some(self.cursor.map_or(0, |i| (i + 1) % len))
    }

    /// Index before the cursor, wrapping; the last index when no cursor is set
    pub fn previous_index(&self) -> Option<usize> {
        let len = self.items.len();
        if len == 0 {
            return None;
        }
        Some(self.cursor.map_or(len - 1, |i| (i + len - 1) % len))
    }

    /// Whether an item follows the cursor without wrapping
    pub fn has_next(&self) -> bool {
        self.cursor.is_some_and(|i| i + 1 < self.items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibe_core::Track;

    fn items(n: usize) -> Vec<MediaItem> {
        (0..n)
            .map(|i| {
                MediaItem::from(Track::new(
                    format!("t{i}"),
                    format!("Track {i}"),
                    "Artist",
                    format!("{i}.mp3"),
                ))
            })
            .collect()
    }

    #[test]
    fn empty_queue_has_no_neighbours() {
        let queue = Queue::new();
        assert_eq!(queue.next_index(), None);
        assert_eq!(queue.previous_index(), None);
        assert!(!queue.has_next());
    }

    #[test]
    fn navigation_wraps_both_ends() {
        let mut queue = Queue::new();
        queue.replace(items(3), 2).unwrap();
        assert_eq!(queue.next_index(), Some(0));

        queue.set_cursor(0).unwrap();
        assert_eq!(queue.previous_index(), Some(2));
        assert_eq!(queue.next_index(), Some(1));
    }

    #[test]
    fn replace_rejects_start_past_end() {
        let mut queue = Queue::new();
        assert!(matches!(
            queue.replace(items(2), 2),
            Err(PlaybackError::IndexOutOfBounds(2))
        ));
        assert!(queue.is_empty());
    }

    #[test]
    fn replace_with_empty_clears_cursor() {
        let mut queue = Queue::new();
        queue.replace(items(2), 1).unwrap();
        queue.replace(Vec::new(), 5).unwrap();
        assert_eq!(queue.cursor(), None);
        assert!(queue.current().is_none());
    }

    #[test]
    fn has_next_is_false_on_last_index() {
        let mut queue = Queue::new();
        queue.replace(items(2), 0).unwrap();
        assert!(queue.has_next());
        queue.set_cursor(1).unwrap();
        assert!(!queue.has_next());
    }
}
