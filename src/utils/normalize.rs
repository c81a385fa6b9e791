use scraper::Html;

use super::error::{Error, Result};

// Repairs raw markup into a tree that is safe to query structurally.
pub trait Normalizer {
    fn normalize(&self, raw: &str) -> Result<Html>;
}

// Repairs markup with the HTML5 tree builder: unclosed cells and rows are
// closed, stray tags are dropped and misnested tables are re-parented the way
// a browser would.
#[derive(Debug, Clone, Copy, Default)]
pub struct Html5Normalizer;

impl Normalizer for Html5Normalizer {
    fn normalize(&self, raw: &str) -> Result<Html> {
        if raw.trim().is_empty() {
            return Err(Error::schema("page body is empty"));
        }
        // The tree builder recovers from every error, it only records them
        let html = Html::parse_document(raw);
        if !html.errors.is_empty() {
            log::debug!("repaired {} markup errors", html.errors.len());
        }
        Ok(html)
    }
}
