const MAX_FILENAME_CHARS: usize = 240;

/// Return a version of `name` safe for most filesystems (and Obsidian vaults).
///
/// Strips wiki-link and tag characters, Windows-forbidden characters and
/// control codes, trailing whitespace/periods, and leading periods; prefixes
/// reserved device names with `_`; truncates to 240 characters. Idempotent:
/// sanitizing an already-sanitized name is a no-op.
pub fn sanitize_filename(name: &str) -> String {
    let mut sanitized = sanitize_pass(name);
    // Truncation can re-expose a trailing period or a reserved base name, so
    // re-run the pass until it stabilizes.
    loop {
        let next = sanitize_pass(&sanitized);
        if next == sanitized {
            return sanitized;
        }
        sanitized = next;
    }
}

fn sanitize_pass(name: &str) -> String {
    let mut sanitized: String = name.chars().filter(|c| !is_forbidden(*c)).collect();

    while sanitized.ends_with([' ', '\t', '\n', '\r', '.']) {
        sanitized.pop();
    }
    sanitized = sanitized.trim_start_matches('.').to_string();

    if is_reserved_device_name(&sanitized) {
        sanitized.insert(0, '_');
    }

    sanitized.chars().take(MAX_FILENAME_CHARS).collect()
}

fn is_forbidden(c: char) -> bool {
    matches!(
        c,
        '#' | '|' | '^' | '[' | ']' | '<' | '>' | ':' | '"' | '/' | '\\' | '?' | '*'
            | '\0'..='\u{1F}'
    )
}

/// True for `con`, `prn`, `aux`, `nul`, `com0`-`com9`, `lpt0`-`lpt9`,
/// bare or followed by an extension, case-insensitively.
fn is_reserved_device_name(name: &str) -> bool {
    let base = name.split('.').next().unwrap_or(name).to_ascii_lowercase();
    match base.as_str() {
        "con" | "prn" | "aux" | "nul" => true,
        _ => {
            base.len() == 4
                && (base.starts_with("com") || base.starts_with("lpt"))
                && base.as_bytes()[3].is_ascii_digit()
        }
    }
}
