//! Board listing rows and parsed articles.

use cupofdata_core::Document;

/// One entry on a board index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRow {
    pub title: String,
    /// Absolute article URL.
    pub url: String,
    /// Month/day as printed on the index, e.g. `" 3/14"` trimmed to `"3/14"`.
    pub date: String,
}

/// A fetched article with its replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub url: String,
    pub title: String,
    pub author: String,
    pub date: String,
    /// Article text, one non-blank line per source line.
    pub body: String,
    pub replies: Vec<String>,
}

impl From<Article> for Document {
    fn from(article: Article) -> Self {
        Document {
            id: article.url,
            title: article.title,
            body: article.body,
            replies: article.replies,
        }
    }
}
