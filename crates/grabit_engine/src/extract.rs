use dom_smoothie::Readability;
use scraper::{Html, Selector};

/// Readable fragment plus whatever title the page offered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub content_html: String,
    /// Trimmed title; `None` when the page had none worth keeping.
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("no content found")]
    NoContent,
}

/// Extract the main readable content and title from a full HTML document.
///
/// With `use_readability` the dom_smoothie heuristic runs first; if it comes
/// back empty the plain extractor is tried once before giving up. The
/// heuristic rewrites `..`-relative links to `about:blank/`, which is patched
/// back to `../` afterwards.
pub fn extract_readable(html: &str, use_readability: bool) -> Result<Extracted, ExtractError> {
    let mut content_html = String::new();
    let mut title = None;

    if use_readability {
        if let Some((content, heuristic_title)) = readability_extract(html) {
            content_html = content;
            title = heuristic_title;
        }
    }

    if content_html.trim().is_empty() {
        let fallback = plain_extract(html);
        content_html = fallback.0;
        title = title.or(fallback.1);
    }

    if content_html.trim().is_empty() {
        return Err(ExtractError::NoContent);
    }

    // Undo the heuristic's mangling of parent-relative hrefs.
    let content_html = content_html.replace("href=\"about:blank/", "href=\"../");
    let title = title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    Ok(Extracted {
        content_html,
        title,
    })
}

fn readability_extract(html: &str) -> Option<(String, Option<String>)> {
    let mut readability = match Readability::new(html, None::<&str>, None) {
        Ok(readability) => readability,
        Err(err) => {
            log::debug!("readability setup failed: {err}");
            return None;
        }
    };
    match readability.parse() {
        Ok(article) => {
            let title = Some(article.title.clone()).filter(|t| !t.trim().is_empty());
            Some((article.content.to_string(), title))
        }
        Err(err) => {
            log::debug!("readability extraction failed: {err}");
            None
        }
    }
}

/// Plain extraction without the heuristic: `<article>` inner HTML if present,
/// otherwise `<body>`, otherwise the whole document.
fn plain_extract(html: &str) -> (String, Option<String>) {
    let doc = Html::parse_document(html);
    let title_sel = Selector::parse("title").ok();
    let article_sel = Selector::parse("article").ok();
    let body_sel = Selector::parse("body").ok();

    let title = title_sel
        .as_ref()
        .and_then(|sel| doc.select(sel).next())
        .map(|t| t.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());

    let content = article_sel
        .as_ref()
        .and_then(|sel| doc.select(sel).next())
        .map(|node| node.inner_html())
        .or_else(|| {
            body_sel
                .as_ref()
                .and_then(|sel| doc.select(sel).next())
                .map(|node| node.inner_html())
        })
        .unwrap_or_else(|| doc.root_element().html());

    (content, title)
}
