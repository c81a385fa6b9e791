use std::sync::OnceLock;

use scraper::{ElementRef, Selector};

// A CSS selector parsed on first use, for selectors known at compile time.
#[derive(Debug)]
pub struct StaticSelector<'a> {
    cell: OnceLock<Selector>,
    selector: &'a str,
}

impl<'a> StaticSelector<'a> {
    pub const fn new(selector: &'a str) -> Self {
        Self {
            cell: OnceLock::new(),
            selector,
        }
    }
}

impl<'a> core::ops::Deref for StaticSelector<'a> {
    type Target = Selector;

    fn deref(&self) -> &Self::Target {
        self.cell
            .get_or_init(|| match Selector::parse(self.selector) {
                Ok(sel) => sel,
                Err(e) => panic!("Error parsing static selector {}: {:?}", self.selector, e),
            })
    }
}

#[macro_export]
macro_rules! static_selector {
    ($x: ident <- $sel: literal) => {
        static $x: $crate::utils::selector::StaticSelector =
            $crate::utils::selector::StaticSelector::new($sel);
    };
}

// Joins every text node below `element`, then collapses runs of whitespace and trims the ends.
// Nodes are joined before collapsing so inline tags like `<b>9</b>.5` stay `9.5`.
pub fn collapsed_text(element: ElementRef<'_>) -> String {
    let text: String = element.text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
