use chrono::Local;
use grabit_core::RenderFlags;

/// Pick the page title, falling back to the caller's template with `{date}`
/// expanded to the current local date (`YYYY-MM-DD`).
pub fn resolve_title(title: Option<&str>, fallback_template: &str) -> String {
    match title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => title.to_string(),
        None => {
            let date = Local::now().format("%Y-%m-%d").to_string();
            fallback_template.replace("{date}", &date)
        }
    }
}

/// Apply the Markdown post-processing steps in their fixed order: source
/// link, then title heading, then YAML front matter. Each step prepends, so
/// the front matter ends up outermost.
pub fn apply_render_flags(
    markdown: &str,
    title: &str,
    url: &str,
    flags: RenderFlags,
) -> String {
    let mut content = markdown.to_string();
    if flags.include_source {
        content = format!("[Source]({url})\n\n{content}");
    }
    if flags.include_title {
        content = format!("# {title}\n\n{content}");
    }
    if flags.yaml_frontmatter {
        let date = Local::now().format("%Y-%m-%d %H:%M").to_string();
        content = format!(
            "---\ntitle: {title}\nsource: {source}\ndate: {date}\n---\n\n{content}",
            title = yaml_scalar(title),
            source = yaml_scalar(url),
        );
    }
    content
}

/// Quote a YAML scalar only when the plain form would be ambiguous.
fn yaml_scalar(value: &str) -> String {
    let needs_quoting = value.is_empty()
        || value.contains(": ")
        || value.ends_with(':')
        || value.contains('#')
        || value.starts_with(['\'', '"', '-', '?', '&', '*', '!', '|', '>', '%', '@', '`', '['])
        || value.trim() != value;
    if needs_quoting {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}
