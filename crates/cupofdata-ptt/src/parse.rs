//! HTML parsing for board index pages and articles.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::PttError;
use crate::types::{Article, BoardRow};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid CSS")
}

static PAGING_LINK: LazyLock<Selector> = LazyLock::new(|| selector(".btn-group-paging a"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("div.r-ent"));
static ROW_LINK: LazyLock<Selector> = LazyLock::new(|| selector(".title a"));
static ROW_DATE: LazyLock<Selector> = LazyLock::new(|| selector(".meta .date"));
static MAIN: LazyLock<Selector> = LazyLock::new(|| selector("#main-content"));
static META_VALUE: LazyLock<Selector> = LazyLock::new(|| selector(".article-meta-value"));
static PUSH_CONTENT: LazyLock<Selector> = LazyLock::new(|| selector(".push .push-content"));

static INDEX_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"index(\d+)\.html").expect("valid index regex"));

/// Classes whose text is not part of the article body.
const NON_BODY_CLASSES: &[&str] = &[
    "article-metaline",
    "article-metaline-right",
    "article-meta-tag",
    "article-meta-value",
    "push",
    "f2",
];

/// Line PTT puts between the body and the signature.
const SIGNATURE_SEPARATOR: &str = "--";

/// Index number of the newest page: the "上頁" link's number plus one.
///
/// # Errors
///
/// Returns [`PttError::Parse`] when the page has no usable "上頁" link or
/// its number is already the largest index.
pub fn parse_latest_index(html: &str) -> Result<u32, PttError> {
    let doc = Html::parse_document(html);
    let href = doc
        .select(&PAGING_LINK)
        .find(|a| element_text(a).contains("上頁"))
        .and_then(|a| a.value().attr("href"))
        .ok_or_else(|| PttError::parse("board index", "no previous-page link"))?;

    let previous: u32 = INDEX_NUMBER
        .captures(href)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| PttError::parse("board index", format!("unexpected link {href}")))?;

    previous
        .checked_add(1)
        .ok_or_else(|| PttError::parse("board index", format!("index {previous} out of range")))
}

/// Rows of a board index page. Deleted posts (no link) are skipped.
#[must_use]
pub fn parse_board_rows(html: &str, base_url: &str) -> Vec<BoardRow> {
    let doc = Html::parse_document(html);
    doc.select(&ROW)
        .filter_map(|row| {
            let link = row.select(&ROW_LINK).next()?;
            let href = link.value().attr("href")?;
            let title = element_text(&link).trim().to_string();
            if title.is_empty() {
                return None;
            }
            let date = row
                .select(&ROW_DATE)
                .next()
                .map(|d| element_text(&d).trim().to_string())
                .unwrap_or_default();
            Some(BoardRow {
                title,
                url: absolute_url(base_url, href),
                date,
            })
        })
        .collect()
}

/// Parse one article page.
///
/// # Errors
///
/// Returns [`PttError::Parse`] when the page has no `#main-content` block.
pub fn parse_article(html: &str, url: &str) -> Result<Article, PttError> {
    let doc = Html::parse_document(html);
    let main = doc
        .select(&MAIN)
        .next()
        .ok_or_else(|| PttError::parse(url, "missing #main-content"))?;

    let meta: Vec<String> = main
        .select(&META_VALUE)
        .map(|v| element_text(&v).trim().to_string())
        .collect();
    let meta_at = |i: usize| meta.get(i).cloned().unwrap_or_default();

    let replies = main
        .select(&PUSH_CONTENT)
        .filter_map(|p| {
            let text = element_text(&p);
            let text = text.trim_start();
            let text = text.strip_prefix(':').unwrap_or(text).trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .collect();

    Ok(Article {
        url: url.to_string(),
        author: meta_at(0),
        title: meta_at(2),
        date: meta_at(3),
        body: body_text(main),
        replies,
    })
}

/// Text of `main` outside meta lines, replies and system notes, tidied per line.
fn body_text(main: ElementRef<'_>) -> String {
    let mut raw = String::new();
    for node in main.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let excluded = node
            .ancestors()
            .take_while(|a| a.id() != main.id())
            .filter_map(|a| a.value().as_element())
            .any(|el| el.classes().any(|c| NON_BODY_CLASSES.contains(&c)));
        if !excluded {
            raw.push_str(text);
        }
    }

    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty() && line != SIGNATURE_SEPARATOR)
        .collect::<Vec<_>>()
        .join("\n")
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect()
}

fn absolute_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}/{}", base_url.trim_end_matches('/'), href.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX_HTML: &str = r#"
<div class="btn-group btn-group-paging">
  <a class="btn wide" href="/bbs/Drink/index1.html">最舊</a>
  <a class="btn wide" href="/bbs/Drink/index3120.html">&lsaquo; 上頁</a>
  <a class="btn wide disabled">下頁 &rsaquo;</a>
</div>
<div class="r-list-container action-bar-margin bbs-screen">
  <div class="r-ent">
    <div class="title"><a href="/bbs/Drink/M.1700000000.A.001.html">[心得] 五十嵐 四季春</a></div>
    <div class="meta"><div class="author">alice</div><div class="date"> 3/14</div></div>
  </div>
  <div class="r-ent">
    <div class="title">(本文已被刪除) [bob]</div>
    <div class="meta"><div class="date"> 3/14</div></div>
  </div>
  <div class="r-ent">
    <div class="title"><a href="/bbs/Drink/M.1700000001.A.002.html">[問題] 可不可 推薦</a></div>
    <div class="meta"><div class="date"> 3/15</div></div>
  </div>
</div>
"#;

    const ARTICLE_HTML: &str = r#"
<div id="main-content" class="bbs-screen bbs-content"><div class="article-metaline"><span class="article-meta-tag">作者</span><span class="article-meta-value">alice (愛麗絲)</span></div><div class="article-metaline-right"><span class="article-meta-tag">看板</span><span class="article-meta-value">Drink</span></div><div class="article-metaline"><span class="article-meta-tag">標題</span><span class="article-meta-value">[心得] 五十嵐 四季春</span></div><div class="article-metaline"><span class="article-meta-tag">時間</span><span class="article-meta-value">Thu Mar 14 12:00:00 2024</span></div>
今天喝了五十嵐的四季春    半糖去冰

【可不可】
熟成紅茶   無糖

--
<span class="f2">※ 發信站: 批踢踢實業坊(ptt.cc), 來自: 1.2.3.4
</span><div class="push"><span class="push-tag">推 </span><span class="push-userid">bob</span><span class="push-content">: 四季春真的好喝</span><span class="push-ipdatetime"> 03/14 12:30
</span></div><div class="push"><span class="push-tag">→ </span><span class="push-userid">carol</span><span class="push-content">:    </span><span class="push-ipdatetime"> 03/14 12:31
</span></div></div>
"#;

    #[test]
    fn latest_index_is_previous_plus_one() {
        assert_eq!(parse_latest_index(INDEX_HTML).unwrap(), 3121);
    }

    #[test]
    fn latest_index_at_max_is_parse_error() {
        let html = r#"
<div class="btn-group btn-group-paging">
  <a class="btn wide" href="/bbs/Drink/index4294967295.html">&lsaquo; 上頁</a>
</div>
"#;
        let err = parse_latest_index(html).unwrap_err();
        assert!(matches!(err, PttError::Parse { .. }), "got {err:?}");
    }

    #[test]
    fn latest_index_without_link_is_parse_error() {
        let err = parse_latest_index("<html><body>over18</body></html>").unwrap_err();
        assert!(matches!(err, PttError::Parse { .. }));
    }

    #[test]
    fn board_rows_skip_deleted_posts() {
        let rows = parse_board_rows(INDEX_HTML, "https://www.ptt.cc/");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "[心得] 五十嵐 四季春");
        assert_eq!(
            rows[0].url,
            "https://www.ptt.cc/bbs/Drink/M.1700000000.A.001.html"
        );
        assert_eq!(rows[0].date, "3/14");
        assert_eq!(rows[1].date, "3/15");
    }

    #[test]
    fn article_meta_and_replies() {
        let article = parse_article(ARTICLE_HTML, "https://www.ptt.cc/bbs/Drink/M.1.html").unwrap();
        assert_eq!(article.author, "alice (愛麗絲)");
        assert_eq!(article.title, "[心得] 五十嵐 四季春");
        assert_eq!(article.date, "Thu Mar 14 12:00:00 2024");
        assert_eq!(article.replies, vec!["四季春真的好喝"]);
    }

    #[test]
    fn article_body_drops_meta_pushes_and_notes() {
        let article = parse_article(ARTICLE_HTML, "https://www.ptt.cc/bbs/Drink/M.1.html").unwrap();
        assert_eq!(
            article.body,
            "今天喝了五十嵐的四季春 半糖去冰\n【可不可】\n熟成紅茶 無糖"
        );
    }

    #[test]
    fn article_without_main_content_is_parse_error() {
        let err = parse_article("<html></html>", "https://www.ptt.cc/x").unwrap_err();
        assert!(matches!(err, PttError::Parse { .. }));
    }

    #[test]
    fn absolute_urls_are_kept() {
        assert_eq!(absolute_url("https://a", "https://b/c"), "https://b/c");
        assert_eq!(absolute_url("https://a/", "/c"), "https://a/c");
    }
}
