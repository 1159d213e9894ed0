//! Current-page state for a paginated chapter

/// A page sequence and a 1-based current page
#[derive(Clone, Debug, PartialEq)]
pub struct PageCursor {
    pages: Vec<String>,
    current: usize,
}

impl PageCursor {
    /// Start on the first page; an empty sequence becomes one empty page
    pub fn new(pages: Vec<String>) -> Self {
        let pages = if pages.is_empty() {
            vec![String::new()]
        } else {
            pages
        };
        Self { pages, current: 1 }
    }

    pub fn current_page(&self) -> usize {
        self.current
    }

    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn current_markup(&self) -> &str {
        &self.pages[self.current - 1]
    }

    /// Jump to `page`, clamped into range; returns the page landed on
    pub fn go_to(&mut self, page: usize) -> usize {
        self.current = page.clamp(1, self.total_pages());
        self.current
    }

    /// Returns whether the page changed
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Returns whether the page changed
    pub fn prev(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current -= 1;
        true
    }

    pub fn is_first(&self) -> bool {
        self.current == 1
    }

    pub fn is_last(&self) -> bool {
        self.current == self.total_pages()
    }

    /// Page indicator text, e.g. `"3 / 7"`
    pub fn label(&self) -> String {
        format!("{} / {}", self.current, self.total_pages())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(n: usize) -> PageCursor {
        PageCursor::new((1..=n).map(|i| format!("<p>{i}</p>")).collect())
    }

    #[test]
    fn test_empty_sequence_has_one_page() {
        let c = PageCursor::new(Vec::new());
        assert_eq!(c.total_pages(), 1);
        assert_eq!(c.current_markup(), "");
        assert!(c.is_first() && c.is_last());
    }

    #[test]
    fn test_navigation() {
        let mut c = cursor(3);
        assert!(!c.prev());
        assert!(c.next());
        assert_eq!(c.current_markup(), "<p>2</p>");
        assert!(c.next());
        assert!(!c.next());
        assert_eq!(c.label(), "3 / 3");
        assert!(c.prev());
        assert_eq!(c.current_page(), 2);
    }

    #[test]
    fn test_go_to_clamps() {
        let mut c = cursor(7);
        assert_eq!(c.go_to(0), 1);
        assert_eq!(c.go_to(99), 7);
        assert_eq!(c.go_to(3), 3);
        assert_eq!(c.label(), "3 / 7");
    }
}
