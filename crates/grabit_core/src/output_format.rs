use std::fmt;
use std::str::FromStr;

/// One requested output artifact kind.
///
/// Each variant keeps the string token of the original CLI surface; the token
/// doubles as the file extension for file-bound variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutputFormat {
    /// Markdown written to `{title}.md`.
    Md,
    /// Markdown emitted on standard output, never persisted.
    StdoutMd,
    /// Readable HTML fragment written to `{title}.html`.
    ReadableHtml,
    /// The raw downloaded page written to `{title}.raw.html`.
    RawHtml,
}

impl OutputFormat {
    /// All variants, in CLI declaration order.
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Md,
        OutputFormat::StdoutMd,
        OutputFormat::ReadableHtml,
        OutputFormat::RawHtml,
    ];

    pub fn token(self) -> &'static str {
        match self {
            OutputFormat::Md => "md",
            OutputFormat::StdoutMd => "stdout.md",
            OutputFormat::ReadableHtml => "html",
            OutputFormat::RawHtml => "raw.html",
        }
    }

    /// File extension used when this format is written to disk.
    pub fn extension(self) -> &'static str {
        self.token()
    }

    /// Whether this format is persisted as a file (stdout variant is not).
    pub fn is_file_output(self) -> bool {
        !matches!(self, OutputFormat::StdoutMd)
    }

    pub fn is_markdown(self) -> bool {
        matches!(self, OutputFormat::Md | OutputFormat::StdoutMd)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Raised when parsing an output-format token that is not part of the enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown output format {token:?} (expected one of md, stdout.md, html, raw.html)")]
pub struct UnknownFormatToken {
    pub token: String,
}

impl FromStr for OutputFormat {
    type Err = UnknownFormatToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputFormat::ALL
            .into_iter()
            .find(|fmt| fmt.token().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownFormatToken {
                token: s.to_string(),
            })
    }
}

/// Ordered list of requested output formats with derived predicates.
///
/// Duplicates are allowed but inert: the grab result is keyed by format, so a
/// format requested twice still produces a single artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFormatList {
    formats: Vec<OutputFormat>,
}

impl OutputFormatList {
    pub fn new(formats: Vec<OutputFormat>) -> Self {
        Self { formats }
    }

    /// Parses a sequence of string tokens, failing on the first unknown one.
    pub fn parse_tokens<I, S>(tokens: I) -> Result<Self, UnknownFormatToken>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let formats = tokens
            .into_iter()
            .map(|token| token.as_ref().parse())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { formats })
    }

    pub fn contains(&self, format: OutputFormat) -> bool {
        self.formats.contains(&format)
    }

    pub fn iter(&self) -> impl Iterator<Item = OutputFormat> + '_ {
        self.formats.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    pub fn should_output_raw_html(&self) -> bool {
        self.contains(OutputFormat::RawHtml)
    }

    pub fn should_output_readable_html(&self) -> bool {
        self.contains(OutputFormat::ReadableHtml)
    }

    /// True when any Markdown variant (file or stdout) was requested.
    pub fn should_output_markdown(&self) -> bool {
        self.contains(OutputFormat::Md) || self.contains(OutputFormat::StdoutMd)
    }

    pub fn should_output_markdown_file(&self) -> bool {
        self.contains(OutputFormat::Md)
    }

    pub fn should_output_markdown_stdout(&self) -> bool {
        self.contains(OutputFormat::StdoutMd)
    }

    /// True when at least one requested format needs the filesystem.
    pub fn any_file_output(&self) -> bool {
        self.iter().any(OutputFormat::is_file_output)
    }
}

impl Default for OutputFormatList {
    fn default() -> Self {
        Self::new(vec![OutputFormat::Md])
    }
}

impl FromIterator<OutputFormat> for OutputFormatList {
    fn from_iter<T: IntoIterator<Item = OutputFormat>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
