use std::collections::BTreeMap;

use grabit_core::OutputFormat;
use serde_json::Value;
use url::Url;

use crate::fetch::Fetcher;
use crate::grabber::Grabber;
use crate::render::{apply_render_flags, resolve_title};
use crate::types::{GrabError, GrabRequest, GrabResult};

const REDDIT_HOSTS: [&str; 2] = ["www.reddit.com", "old.reddit.com"];
const DELETED_AUTHOR: &str = "[deleted]";
const INDENT: &str = "    ";

/// Grabber for Reddit posts via the site's JSON listing API. Markdown-only:
/// there is no meaningful raw or readable HTML for a post.
#[derive(Debug, Default)]
pub struct RedditGrabber;

impl Grabber for RedditGrabber {
    fn can_handle(&self, url: &str) -> bool {
        Url::parse(url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(str::to_ascii_lowercase))
            .is_some_and(|host| REDDIT_HOSTS.contains(&host.as_str()))
    }

    fn grab(&self, request: &GrabRequest, fetcher: &dyn Fetcher) -> Result<GrabResult, GrabError> {
        let formats = &request.output_formats;
        if formats.should_output_raw_html()
            || formats.should_output_readable_html()
            || !formats.should_output_markdown()
        {
            return Err(GrabError::UnsupportedFormat);
        }

        let json_url = json_listing_url(&request.url)?;
        let page = fetcher
            .fetch_page(&json_url)
            .map_err(|source| GrabError::Download {
                url: json_url.clone(),
                source,
            })?;
        let listing: Value = serde_json::from_slice(&page.bytes)
            .map_err(|err| GrabError::Reddit(format!("invalid JSON listing: {err}")))?;

        let post = post_data(&listing)?;
        let title = post.get("title").and_then(Value::as_str);
        let title = resolve_title(title, &request.fallback_title);

        let markdown = render_post(&listing)?;
        let markdown = apply_render_flags(&markdown, &title, &request.url, request.render_flags);

        let mut outputs = BTreeMap::new();
        if formats.should_output_markdown_file() {
            outputs.insert(OutputFormat::Md, markdown.clone());
        }
        if formats.should_output_markdown_stdout() {
            outputs.insert(OutputFormat::StdoutMd, markdown);
        }

        Ok(GrabResult {
            title,
            outputs,
            images: Vec::new(),
        })
    }
}

/// Derive the JSON API URL: append `.json` to the trailing-slash-stripped
/// path, preserving query and fragment.
pub(crate) fn json_listing_url(url: &str) -> Result<String, GrabError> {
    let mut parsed = Url::parse(url).map_err(|err| GrabError::InvalidUrl {
        url: url.to_string(),
        message: err.to_string(),
    })?;
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&format!("{path}.json"));
    Ok(parsed.into())
}

/// One node of the comment tree, built once from the untyped listing.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Comment {
    author: String,
    score: i64,
    body: String,
    replies: Vec<Comment>,
}

fn post_data(listing: &Value) -> Result<&Value, GrabError> {
    listing
        .get(0)
        .and_then(|post_listing| post_listing.pointer("/data/children/0/data"))
        .ok_or_else(|| GrabError::Reddit("listing has no post data".to_string()))
}

fn render_post(listing: &Value) -> Result<String, GrabError> {
    let post = post_data(listing)?;
    let author = post
        .get("author")
        .and_then(Value::as_str)
        .unwrap_or(DELETED_AUTHOR);
    let score = post.get("score").and_then(Value::as_i64).unwrap_or(0);
    let selftext = post.get("selftext").and_then(Value::as_str).unwrap_or("");
    let post_url = post.get("url").and_then(Value::as_str).unwrap_or("");

    // Link posts have no body text; quote the external URL instead.
    let quoted = if selftext.is_empty() {
        post_url.to_string()
    } else {
        selftext.replace('\n', "\n> ")
    };

    let comment_children = listing
        .get(1)
        .and_then(|comment_listing| comment_listing.pointer("/data/children"))
        .and_then(Value::as_array)
        .ok_or_else(|| GrabError::Reddit("listing has no comments data".to_string()))?;
    let comments = parse_comments(comment_children);

    let mut markdown = format!("**{author}** [{score} score]:\n> {quoted}\n\n## Comments\n\n");
    render_comments(&comments, 0, &mut markdown);
    Ok(markdown)
}

/// Build comment nodes from a `children` array, sorted by descending score at
/// each level. A `replies` value that is not an object (Reddit uses an empty
/// string sentinel) means no replies.
fn parse_comments(children: &[Value]) -> Vec<Comment> {
    let mut comments: Vec<Comment> = children
        .iter()
        .map(|child| {
            let data = child.get("data").cloned().unwrap_or(Value::Null);
            let replies = data
                .get("replies")
                .filter(|replies| replies.is_object())
                .and_then(|replies| replies.pointer("/data/children"))
                .and_then(Value::as_array)
                .map(|nested| parse_comments(nested))
                .unwrap_or_default();
            Comment {
                author: data
                    .get("author")
                    .and_then(Value::as_str)
                    .unwrap_or(DELETED_AUTHOR)
                    .to_string(),
                score: data.get("score").and_then(Value::as_i64).unwrap_or(0),
                body: data
                    .get("body")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                replies,
            }
        })
        .collect();
    comments.sort_by_key(|comment| std::cmp::Reverse(comment.score));
    comments
}

/// Render a comment level as bulleted lines, bodies indented one level deeper
/// than their bullet, children one level deeper still.
fn render_comments(comments: &[Comment], depth: usize, out: &mut String) {
    for comment in comments {
        let indentation = INDENT.repeat(depth);
        let body = comment
            .body
            .replace('\n', &format!("\n{}", INDENT.repeat(depth + 1)));
        out.push_str(&format!(
            "{indentation}- **{author}** [{score} score]:\n{indentation}{INDENT}{body}\n\n",
            author = comment.author,
            score = comment.score,
        ));
        render_comments(&comment.replies, depth + 1, out);
    }
}
