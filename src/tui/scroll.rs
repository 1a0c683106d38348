// Scroll state for text panels
//
// Each panel owns one. Dimensions are refreshed every frame from the render
// pass; input only moves the offset. Auto-follow keeps the view pinned to the
// newest line until the operator scrolls up.

#[derive(Debug, Clone)]
pub struct ScrollState {
    /// Line index at the top of the viewport
    offset: usize,
    total: usize,
    viewport: usize,
    /// Scrolling up disables this; reaching the bottom re-enables it
    pub auto_follow: bool,
}

impl ScrollState {
    pub fn new() -> Self {
        Self {
            offset: 0,
            total: 0,
            viewport: 0,
            auto_follow: true,
        }
    }

    /// Call each frame with the current sizes
    pub fn update_dimensions(&mut self, total: usize, viewport: usize) {
        self.total = total;
        self.viewport = viewport;
        if self.auto_follow {
            self.offset = self.max_offset();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }
    }

    pub fn scroll_up(&mut self) {
        if self.offset > 0 {
            self.offset -= 1;
            self.auto_follow = false;
        }
    }

    pub fn scroll_down(&mut self) {
        if self.offset < self.max_offset() {
            self.offset += 1;
        }
        if self.offset >= self.max_offset() {
            self.auto_follow = true;
        }
    }

    pub fn page_up(&mut self) {
        self.offset = self.offset.saturating_sub(self.viewport.max(1));
        self.auto_follow = false;
    }

    pub fn page_down(&mut self) {
        self.offset = (self.offset + self.viewport.max(1)).min(self.max_offset());
        if self.offset >= self.max_offset() {
            self.auto_follow = true;
        }
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
        self.auto_follow = false;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
        self.auto_follow = true;
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// (start, end) line indices currently on screen
    pub fn visible_range(&self) -> (usize, usize) {
        (self.offset, (self.offset + self.viewport).min(self.total))
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn viewport(&self) -> usize {
        self.viewport
    }

    pub fn needs_scrollbar(&self) -> bool {
        self.total > self.viewport
    }

    fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.viewport)
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_follow_on_new_content() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(10, 5);
        assert_eq!(scroll.offset(), 5);

        scroll.update_dimensions(15, 5);
        assert_eq!(scroll.offset(), 10);
    }

    #[test]
    fn test_scroll_up_disables_auto_follow() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(20, 5);

        scroll.scroll_up();
        assert!(!scroll.auto_follow);
        assert_eq!(scroll.offset(), 14);

        // Reloaded content with the same size keeps the position
        scroll.update_dimensions(20, 5);
        assert_eq!(scroll.offset(), 14);
    }

    #[test]
    fn test_page_down_to_bottom_resumes_following() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(20, 5);
        scroll.scroll_to_top();
        assert!(!scroll.auto_follow);

        for _ in 0..4 {
            scroll.page_down();
        }
        assert!(scroll.auto_follow);
        assert_eq!(scroll.offset(), 15);
    }

    #[test]
    fn test_visible_range() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(100, 10);
        assert_eq!(scroll.visible_range(), (90, 100));

        scroll.scroll_to_top();
        assert_eq!(scroll.visible_range(), (0, 10));
    }

    #[test]
    fn test_short_content_never_scrolls() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(3, 10);
        scroll.scroll_down();
        assert_eq!(scroll.offset(), 0);
        assert_eq!(scroll.visible_range(), (0, 3));
    }
}
