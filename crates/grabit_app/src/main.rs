//! grabit: download a URL, convert it to Markdown/HTML, and save it to disk.

use clap::{Parser, ValueEnum};
use grabit_core::{OutputFlags, OutputFormat, OutputFormatList, RenderFlags};
use grabit_engine::{FetchSettings, GrabRequest};
use log::LevelFilter;

const DEFAULT_FALLBACK_TITLE: &str = "Untitled {date}";

#[derive(Debug, Parser)]
#[command(
    name = "grabit",
    version,
    about = "Download a URL, convert it to Markdown/HTML with specified options, and save it to a file."
)]
struct Cli {
    /// The URL to grab.
    url: String,

    /// The user agent reported when retrieving web pages.
    #[arg(long, default_value_t = default_user_agent())]
    user_agent: String,

    /// Include YAML front matter with metadata. [default: on]
    #[arg(long, overrides_with = "no_yaml_frontmatter")]
    yaml_frontmatter: bool,
    #[arg(long, hide_short_help = true)]
    no_yaml_frontmatter: bool,

    /// Include the page title as an H1 heading. [default: on]
    #[arg(long, overrides_with = "no_include_title")]
    include_title: bool,
    #[arg(long, hide_short_help = true)]
    no_include_title: bool,

    /// Include a link to the page source. [default: off]
    #[arg(long, overrides_with = "no_include_source")]
    include_source: bool,
    #[arg(long, hide_short_help = true)]
    no_include_source: bool,

    /// Fallback title if no title is found. Use {date} for the current date.
    #[arg(long, default_value = DEFAULT_FALLBACK_TITLE)]
    fallback_title: String,

    /// Use the readability heuristic when extracting content. [default: on]
    #[arg(long = "use-readability-js", overrides_with = "no_use_readability_js")]
    use_readability_js: bool,
    #[arg(long = "no-use-readability-js", hide_short_help = true)]
    no_use_readability_js: bool,

    /// Save the resulting file(s) in a subdirectory named after the domain.
    /// [default: on]
    #[arg(long, overrides_with = "no_create_domain_subdir")]
    create_domain_subdir: bool,
    #[arg(long, hide_short_help = true)]
    no_create_domain_subdir: bool,

    /// Download embedded images next to the saved file(s). [default: on]
    #[arg(long, overrides_with = "no_download_images")]
    download_images: bool,
    #[arg(long, hide_short_help = true)]
    no_download_images: bool,

    /// Overwrite existing files if they already exist. [default: off]
    #[arg(long, overrides_with = "no_overwrite")]
    overwrite: bool,
    #[arg(long, hide_short_help = true)]
    no_overwrite: bool,

    /// Which output format(s) to use when saving the content. Can be
    /// specified multiple times, i.e. -f md -f html.
    #[arg(short = 'f', long = "format", value_enum, default_values_t = [FormatArg::Md])]
    formats: Vec<FormatArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Md,
    #[value(name = "stdout.md")]
    StdoutMd,
    Html,
    #[value(name = "raw.html")]
    RawHtml,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Md => OutputFormat::Md,
            FormatArg::StdoutMd => OutputFormat::StdoutMd,
            FormatArg::Html => OutputFormat::ReadableHtml,
            FormatArg::RawHtml => OutputFormat::RawHtml,
        }
    }
}

fn default_user_agent() -> String {
    format!("Grabit/{}", env!("CARGO_PKG_VERSION"))
}

/// Resolve an `--option` / `--no-option` pair against its default.
fn resolve_flag(enabled: bool, disabled: bool, default: bool) -> bool {
    if enabled {
        true
    } else if disabled {
        false
    } else {
        default
    }
}

impl Cli {
    fn grab_request(&self) -> GrabRequest {
        GrabRequest {
            url: self.url.clone(),
            use_readability: resolve_flag(self.use_readability_js, self.no_use_readability_js, true),
            fallback_title: self.fallback_title.clone(),
            render_flags: RenderFlags {
                include_source: resolve_flag(self.include_source, self.no_include_source, false),
                include_title: resolve_flag(self.include_title, self.no_include_title, true),
                yaml_frontmatter: resolve_flag(self.yaml_frontmatter, self.no_yaml_frontmatter, true),
            },
            output_formats: self
                .formats
                .iter()
                .map(|format| OutputFormat::from(*format))
                .collect::<OutputFormatList>(),
            download_images: resolve_flag(self.download_images, self.no_download_images, true),
        }
    }

    fn output_flags(&self) -> OutputFlags {
        OutputFlags {
            create_domain_subdir: resolve_flag(
                self.create_domain_subdir,
                self.no_create_domain_subdir,
                true,
            ),
            overwrite: resolve_flag(self.overwrite, self.no_overwrite, false),
        }
    }

    fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            user_agent: Some(self.user_agent.clone()),
            ..FetchSettings::default()
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    grabit_engine::grab_and_save(&cli.grab_request(), cli.fetch_settings(), cli.output_flags())?;
    Ok(())
}

fn main() {
    grabit_logging::initialize_terminal(LevelFilter::Info);
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
