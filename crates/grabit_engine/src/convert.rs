/// Convert a readable HTML fragment to Markdown in the house style:
/// ATX headings, `-` bullets, and `_underscore_` italics.
///
/// html2md does the heavy lifting; the tidy pass normalizes the dialect
/// details the converter leaves version-dependent (setext headings, `*`
/// bullets) and the whitespace a formatter would clean up.
pub fn convert_to_markdown(html: &str) -> String {
    tidy_markdown(&html2md::parse_html(html))
}

fn tidy_markdown(markdown: &str) -> String {
    let lines: Vec<&str> = markdown.lines().collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut in_code_fence = false;
    let mut skip_next = false;

    for (index, line) in lines.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }
        if line.trim_start().starts_with("```") {
            in_code_fence = !in_code_fence;
            out.push((*line).to_string());
            continue;
        }
        if in_code_fence {
            out.push((*line).to_string());
            continue;
        }

        // Setext heading: promote to ATX and swallow the underline.
        if let Some(next) = lines.get(index + 1) {
            if !line.trim().is_empty() {
                if is_underline(next, '=') {
                    out.push(format!("# {}", line.trim()));
                    skip_next = true;
                    continue;
                }
                if is_underline(next, '-') && !looks_like_list_item(line) {
                    out.push(format!("## {}", line.trim()));
                    skip_next = true;
                    continue;
                }
            }
        }

        let line = restyle_bullet(line);
        let line = underscore_italics(&line);
        out.push(line.trim_end().to_string());
    }

    // Collapse runs of blank lines and end with exactly one newline.
    let mut result = String::new();
    let mut blank_run = 0usize;
    for line in &out {
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        result.push_str(line);
        result.push('\n');
    }
    let trimmed = result.trim_matches('\n');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}\n")
    }
}

fn is_underline(line: &str, marker: char) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 2 && trimmed.chars().all(|c| c == marker)
}

fn looks_like_list_item(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("- ") || trimmed.starts_with("* ") || trimmed.starts_with("+ ")
}

/// `* item` -> `- item`, preserving indentation.
fn restyle_bullet(line: &str) -> String {
    let indent_len = line.len() - line.trim_start().len();
    let (indent, rest) = line.split_at(indent_len);
    if let Some(item) = rest.strip_prefix("* ") {
        format!("{indent}- {item}")
    } else {
        line.to_string()
    }
}

/// Rewrite single-`*` emphasis spans to `_`. Double stars (bold) and escaped
/// asterisks pass through untouched.
fn underscore_italics(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::with_capacity(line.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\\' && i + 1 < chars.len() {
            out.push(c);
            out.push(chars[i + 1]);
            i += 2;
            continue;
        }
        if c == '*' {
            let run = chars[i..].iter().take_while(|&&ch| ch == '*').count();
            if run == 1 {
                out.push('_');
            } else {
                for _ in 0..run {
                    out.push('*');
                }
            }
            i += run;
            continue;
        }
        out.push(c);
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn setext_headings_become_atx() {
        let tidied = tidy_markdown("Title\n=====\n\nSection\n-------\n\nbody\n");
        assert_eq!(tidied, "# Title\n\n## Section\n\nbody\n");
    }

    #[test]
    fn star_bullets_become_dashes() {
        let tidied = tidy_markdown("* one\n* two\n");
        assert_eq!(tidied, "- one\n- two\n");
    }

    #[test]
    fn single_star_emphasis_becomes_underscore() {
        let tidied = tidy_markdown("an *italic* word and a **bold** one\n");
        assert_eq!(tidied, "an _italic_ word and a **bold** one\n");
    }

    #[test]
    fn escaped_asterisks_are_preserved() {
        let tidied = tidy_markdown("a literal \\* star\n");
        assert_eq!(tidied, "a literal \\* star\n");
    }

    #[test]
    fn code_fences_are_left_alone() {
        let input = "```\n* not a bullet\nx *y* z\n```\n";
        assert_eq!(tidy_markdown(input), input);
    }

    #[test]
    fn blank_runs_collapse_and_output_ends_with_one_newline() {
        let tidied = tidy_markdown("a\n\n\n\nb");
        assert_eq!(tidied, "a\n\nb\n");
    }
}
