//! Page window: which page buttons to show around the current page.

/// One slot in the page navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    /// A 0-based page index.
    Page(usize),
    /// A gap of one or more pages.
    Ellipsis,
}

/// Computes the page window for a navigation bar.
///
/// Emits the first and last page, every page within `delta` of `current`,
/// and an ellipsis wherever two emitted pages are more than one apart. The
/// indices are strictly increasing. `current` is clamped into range; zero
/// pages yield an empty window.
///
/// # Example
///
/// ```
/// use leadgrid_lib::grid::{page_window, PageItem::*};
///
/// assert_eq!(
///     page_window(10, 5, 2),
///     vec![Page(0), Ellipsis, Page(3), Page(4), Page(5), Page(6), Page(7), Ellipsis, Page(9)]
/// );
/// assert_eq!(page_window(3, 0, 2), vec![Page(0), Page(1), Page(2)]);
/// ```
pub fn page_window(page_count: usize, current: usize, delta: usize) -> Vec<PageItem> {
    if page_count == 0 {
        return Vec::new();
    }
    let last = page_count - 1;
    let current = current.min(last);
    let low = current.saturating_sub(delta);
    let high = current.saturating_add(delta).min(last);

    let mut pages = Vec::with_capacity(high - low + 3);
    pages.push(0);
    pages.extend(low.max(1)..=high);
    if *pages.last().unwrap_or(&0) != last {
        pages.push(last);
    }

    let mut items = Vec::with_capacity(pages.len() + 2);
    let mut previous: Option<usize> = None;
    for page in pages {
        if let Some(prev) = previous
            && page - prev > 1
        {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page(page));
        previous = Some(page);
    }
    items
}
