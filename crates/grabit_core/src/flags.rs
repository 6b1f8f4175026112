/// Switches applied while post-processing rendered Markdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderFlags {
    pub include_source: bool,
    pub include_title: bool,
    pub yaml_frontmatter: bool,
}

impl Default for RenderFlags {
    fn default() -> Self {
        Self {
            include_source: false,
            include_title: true,
            yaml_frontmatter: true,
        }
    }
}

/// Switches controlling where and whether artifacts land on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputFlags {
    pub create_domain_subdir: bool,
    pub overwrite: bool,
}

impl Default for OutputFlags {
    fn default() -> Self {
        Self {
            create_domain_subdir: true,
            overwrite: false,
        }
    }
}
