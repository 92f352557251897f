//! Keyboard cursors over the results and the picks.

/// The two independent cursors of the picker.
///
/// `selected` indexes the displayed results and wraps around. `highlight`
/// indexes the picks and is clamped to `-1..=pick_count`: `-1` means no pick
/// is highlighted and `pick_count` means the cursor is past the last pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    selected: usize,
    highlight: isize,
}

impl Default for Navigation {
    fn default() -> Self {
        Self {
            selected: 0,
            highlight: -1,
        }
    }
}

impl Navigation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn highlight(&self) -> isize {
        self.highlight
    }

    /// The highlighted pick, if the cursor rests on one.
    pub fn highlighted_pick(&self, pick_count: usize) -> Option<usize> {
        usize::try_from(self.highlight)
            .ok()
            .filter(|&h| h < pick_count)
    }

    /// Moves the result cursor by `delta`, wrapping in both directions.
    /// With no results the cursor goes back to 0.
    pub fn scroll_choices(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let len = len as isize;
        self.selected = (self.selected as isize + delta).rem_euclid(len) as usize;
    }

    /// Moves the pick cursor by `direction`, clamped to `-1..=pick_count`.
    pub fn scroll_highlight(&mut self, direction: isize, pick_count: usize) {
        self.highlight = (self.highlight + direction).clamp(-1, pick_count as isize);
    }

    /// Puts the result cursor on `index` if it is a valid result.
    pub fn scroll_to(&mut self, index: usize, len: usize) -> bool {
        if index < len {
            self.selected = index;
            true
        } else {
            false
        }
    }

    pub fn reset_selected(&mut self) {
        self.selected = 0;
    }

    /// Moves the pick cursor past the last pick.
    pub fn unhighlight(&mut self, pick_count: usize) {
        self.highlight = pick_count as isize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_choices_wraps() {
        let mut nav = Navigation::new();
        nav.scroll_choices(-1, 3);
        assert_eq!(nav.selected(), 2);
        nav.scroll_choices(1, 3);
        assert_eq!(nav.selected(), 0);
        nav.scroll_choices(7, 3);
        assert_eq!(nav.selected(), 1);
        nav.scroll_choices(-8, 3);
        assert_eq!(nav.selected(), 2);
    }

    #[test]
    fn test_scroll_choices_empty_list() {
        let mut nav = Navigation::new();
        nav.scroll_choices(1, 3);
        nav.scroll_choices(1, 0);
        assert_eq!(nav.selected(), 0);
    }

    #[test]
    fn test_selected_stays_in_range() {
        let deltas = [1, -1, 5, -13, 2, 0, -2, 100, -101, 3];
        for len in 1..8 {
            let mut nav = Navigation::new();
            for delta in deltas {
                nav.scroll_choices(delta, len);
                assert!(nav.selected() < len, "len {len} delta {delta}");
            }
        }
    }

    #[test]
    fn test_highlight_clamps() {
        let mut nav = Navigation::new();
        nav.scroll_highlight(-1, 2);
        assert_eq!(nav.highlight(), -1);
        for _ in 0..5 {
            nav.scroll_highlight(1, 2);
        }
        assert_eq!(nav.highlight(), 2);
        nav.scroll_highlight(-1, 2);
        assert_eq!(nav.highlighted_pick(2), Some(1));
    }

    #[test]
    fn test_highlight_stays_in_range() {
        let moves = [1, 1, -1, 1, 1, 1, -1, -1, -1, -1, -1, 1];
        for picks in 0..5 {
            let mut nav = Navigation::new();
            for direction in moves {
                nav.scroll_highlight(direction, picks);
                let h = nav.highlight();
                assert!((-1..=picks as isize).contains(&h), "picks {picks} h {h}");
            }
        }
    }

    #[test]
    fn test_highlighted_pick_none_at_ends() {
        let mut nav = Navigation::new();
        assert_eq!(nav.highlighted_pick(2), None);
        nav.unhighlight(2);
        assert_eq!(nav.highlighted_pick(2), None);
    }

    #[test]
    fn test_scroll_to() {
        let mut nav = Navigation::new();
        assert!(nav.scroll_to(2, 3));
        assert_eq!(nav.selected(), 2);
        assert!(!nav.scroll_to(3, 3));
        assert_eq!(nav.selected(), 2);
    }
}
