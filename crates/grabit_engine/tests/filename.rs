use grabit_engine::sanitize_filename;
use pretty_assertions::assert_eq;

#[test]
fn strips_forbidden_characters() {
    assert_eq!(sanitize_filename("invalid|file:name.txt"), "invalidfilename.txt");
    assert_eq!(
        sanitize_filename("another/invalid\\name.txt"),
        "anotherinvalidname.txt"
    );
    assert_eq!(sanitize_filename("tag#and[link]^caret"), "tagandlinkcaret");
}

#[test]
fn strips_leading_periods_and_trailing_dot_space_runs() {
    assert_eq!(sanitize_filename(".NET Core"), "NET Core");
    assert_eq!(sanitize_filename("trailing. . ."), "trailing");
    assert_eq!(sanitize_filename("...hidden"), "hidden");
}

#[test]
fn reserved_device_names_are_prefixed() {
    assert_eq!(sanitize_filename("con"), "_con");
    assert_eq!(sanitize_filename("CON.txt"), "_CON.txt");
    assert_eq!(sanitize_filename("com7"), "_com7");
    assert_eq!(sanitize_filename("lpt0.md"), "_lpt0.md");
    // Near misses pass through.
    assert_eq!(sanitize_filename("console.txt"), "console.txt");
    assert_eq!(sanitize_filename("com10"), "com10");
}

#[test]
fn truncates_to_240_characters() {
    let long = "a".repeat(500);
    assert_eq!(sanitize_filename(&long).chars().count(), 240);
}

#[test]
fn control_characters_are_removed() {
    assert_eq!(sanitize_filename("a\u{0}b\u{1f}c"), "abc");
}

#[test]
fn sanitizer_is_idempotent() {
    let inputs = [
        "invalid|file:name.txt",
        ".NET Core",
        "con.txt",
        ".con.",
        "con ....x",
        "ordinary name",
        "trailing.  ",
        &"x".repeat(300),
        "日本語タイトル: テスト",
    ];
    for input in inputs {
        let once = sanitize_filename(input);
        assert_eq!(sanitize_filename(&once), once, "not idempotent for {input:?}");
    }
}
