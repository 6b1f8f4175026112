use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use grabit_core::{OutputFlags, OutputFormat};
use url::Url;

use crate::filename::sanitize_filename;
use crate::images::IMAGE_SUBDIR;
use crate::types::{GrabError, ImageFile};

const UNKNOWN_DOMAIN: &str = "unknown_domain";

/// Persists grab results under a base directory (the current directory for
/// the CLI; a temp directory in tests).
pub struct OutputWriter {
    base_dir: PathBuf,
}

impl OutputWriter {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Write every requested artifact: images first, then one file per
    /// file-bound format, emitting stdout-bound formats directly. Existing
    /// files are skipped with a notice unless `overwrite` is set.
    pub fn write(
        &self,
        title: &str,
        outputs: &BTreeMap<OutputFormat, String>,
        url: &str,
        flags: OutputFlags,
        images: &[ImageFile],
    ) -> Result<(), GrabError> {
        let any_file_output = outputs.keys().any(|format| format.is_file_output());

        let mut output_dir = None;
        let mut safe_title = None;
        if any_file_output {
            let dir = self.resolve_output_dir(url, flags)?;
            if !images.is_empty() {
                self.write_images(&dir, images, flags.overwrite)?;
            }
            output_dir = Some(dir);
            safe_title = Some(sanitize_filename(title));
        }

        for (format, content) in outputs {
            if format.is_file_output() {
                // Both are set whenever a file-bound format is present.
                if let (Some(dir), Some(stem)) = (output_dir.as_deref(), safe_title.as_deref()) {
                    write_file(dir, stem, *format, content, flags.overwrite)?;
                }
            } else {
                println!("{content}");
            }
        }
        Ok(())
    }

    fn resolve_output_dir(&self, url: &str, flags: OutputFlags) -> Result<PathBuf, GrabError> {
        let dir = if flags.create_domain_subdir {
            self.base_dir.join(domain_dir_name(url))
        } else {
            self.base_dir.clone()
        };
        fs::create_dir_all(&dir).map_err(|source| GrabError::OutputDir {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }

    /// Image write failures are reported but never abort the run.
    fn write_images(
        &self,
        output_dir: &Path,
        images: &[ImageFile],
        overwrite: bool,
    ) -> Result<(), GrabError> {
        let images_dir = output_dir.join(IMAGE_SUBDIR);
        fs::create_dir_all(&images_dir).map_err(|source| GrabError::OutputDir {
            path: images_dir.clone(),
            source,
        })?;

        for image in images {
            let image_path = images_dir.join(&image.filename);
            if !overwrite && image_path.exists() {
                log::info!(
                    "Image {} already exists. Use --overwrite to replace it.",
                    image_path.display()
                );
                continue;
            }
            match fs::write(&image_path, &image.bytes) {
                Ok(()) => log::info!("Saved image to {}", image_path.display()),
                Err(err) => log::warn!("Failed to save image {}: {err}", image_path.display()),
            }
        }
        Ok(())
    }
}

fn write_file(
    output_dir: &Path,
    safe_title: &str,
    format: OutputFormat,
    content: &str,
    overwrite: bool,
) -> Result<(), GrabError> {
    let path = output_dir.join(format!("{safe_title}.{}", format.extension()));
    if !overwrite && path.exists() {
        log::info!(
            "File {} already exists. Use --overwrite to replace it.",
            path.display()
        );
        return Ok(());
    }
    fs::write(&path, content).map_err(|source| GrabError::FileWrite {
        path: path.clone(),
        source,
    })?;
    log::info!("Saved {} content to {}", format.extension(), path.display());
    Ok(())
}

/// Directory name derived from the URL's host, with a leading `www.`
/// stripped. An unparsable URL or empty host falls back to `unknown_domain`.
fn domain_dir_name(url: &str) -> String {
    let host = Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_default();
    let domain = host.strip_prefix("www.").unwrap_or(&host);
    if domain.is_empty() {
        UNKNOWN_DOMAIN.to_string()
    } else {
        domain.to_string()
    }
}
