//! Grabit core: output-format and flag types shared by the engine and the CLI.
mod flags;
mod output_format;

pub use flags::{OutputFlags, RenderFlags};
pub use output_format::{OutputFormat, OutputFormatList, UnknownFormatToken};
