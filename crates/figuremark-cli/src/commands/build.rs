//! `figuremark build` command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use figuremark::{AttributeSet, FigureProcessor, process_document};
use figuremark_config::{CliSettings, Config, FigureMarkConfig};
use rayon::prelude::*;

use crate::document::MarkdownFile;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover figuremark.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory for the converted tree (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Convert documents without a front matter flag.
    #[arg(long)]
    enable: bool,

    /// Skip documents without a front matter flag.
    #[arg(long, conflicts_with = "enable")]
    disable: bool,

    /// Enable verbose output (log every converted document).
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or a file cannot be copied.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        // Resolve flags before moving into CliSettings
        let enabled = self.resolve_enabled();
        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            enabled,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.heading("Building FigureMark documents");
        output.info(&format!(
            "Source: {}",
            config.docs_resolved.source_dir.display()
        ));
        output.info(&format!(
            "Output: {}",
            config.docs_resolved.output_dir.display()
        ));

        let summary = SiteBuilder::from_config(&config).build()?;

        output.success(&format!(
            "Converted {} of {} Markdown documents ({} figures), copied {} files",
            summary.converted, summary.markdown, summary.figures, summary.copied
        ));
        Ok(())
    }

    fn resolve_enabled(&self) -> Option<bool> {
        if self.enable {
            Some(true)
        } else if self.disable {
            Some(false)
        } else {
            None
        }
    }
}

/// Counts reported after a build.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct BuildSummary {
    /// Markdown documents seen.
    pub markdown: usize,
    /// Markdown documents with at least one figure rewritten.
    pub converted: usize,
    /// Figure blocks rewritten across all documents.
    pub figures: usize,
    /// Non-Markdown files copied verbatim.
    pub copied: usize,
}

/// What happened to a single source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileOutcome {
    Markdown { figures: usize },
    Copied,
}

/// Converts a source tree into an output tree.
pub(crate) struct SiteBuilder<'a> {
    source_dir: &'a Path,
    output_dir: &'a Path,
    settings: &'a FigureMarkConfig,
    processor: FigureProcessor,
}

impl<'a> SiteBuilder<'a> {
    pub(crate) fn from_config(config: &'a Config) -> Self {
        let processor = config
            .figuremark
            .defaults
            .as_deref()
            .map_or_else(FigureProcessor::new, |defaults| {
                FigureProcessor::new().with_globals(AttributeSet::parse(defaults))
            });

        Self {
            source_dir: &config.docs_resolved.source_dir,
            output_dir: &config.docs_resolved.output_dir,
            settings: &config.figuremark,
            processor,
        }
    }

    /// Walk the source tree and write every file to the output tree.
    ///
    /// Files are processed in parallel.
    pub(crate) fn build(&self) -> Result<BuildSummary, CliError> {
        if !self.source_dir.is_dir() {
            return Err(CliError::Validation(format!(
                "Source directory not found: {}",
                self.source_dir.display()
            )));
        }

        // Compare resolved paths so `./docs/out` and `docs/x/../out` still match
        let skip_dir = fs::canonicalize(self.output_dir).ok();
        let mut files = Vec::new();
        self.collect_files(self.source_dir, skip_dir.as_deref(), &mut files)?;
        tracing::info!(files = files.len(), "Collected source files");

        let outcomes = files
            .par_iter()
            .map(|rel_path| self.build_file(rel_path))
            .collect::<Result<Vec<_>, _>>()?;

        let mut summary = BuildSummary::default();
        for outcome in outcomes {
            match outcome {
                FileOutcome::Markdown { figures } => {
                    summary.markdown += 1;
                    summary.figures += figures;
                    if figures > 0 {
                        summary.converted += 1;
                    }
                }
                FileOutcome::Copied => summary.copied += 1,
            }
        }
        Ok(summary)
    }

    /// Collect file paths relative to the source directory.
    ///
    /// Hidden entries and `skip_dir` (the resolved output directory) are skipped.
    fn collect_files(
        &self,
        dir: &Path,
        skip_dir: Option<&Path>,
        files: &mut Vec<PathBuf>,
    ) -> Result<(), CliError> {
        let entries = fs::read_dir(dir).map_err(|e| CliError::file(dir, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| CliError::file(dir, e))?;
            let path = entry.path();
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }

            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            if is_dir {
                if skip_dir.is_some() && fs::canonicalize(&path).ok().as_deref() == skip_dir {
                    continue;
                }
                self.collect_files(&path, skip_dir, files)?;
            } else if let Ok(rel_path) = path.strip_prefix(self.source_dir) {
                files.push(rel_path.to_path_buf());
            }
        }
        Ok(())
    }

    fn build_file(&self, rel_path: &Path) -> Result<FileOutcome, CliError> {
        let source = self.source_dir.join(rel_path);
        let target = self.output_dir.join(rel_path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| CliError::file(parent, e))?;
        }

        if self.settings.is_markdown(rel_path) {
            match fs::read_to_string(&source) {
                Ok(text) => return self.convert_markdown(rel_path, text, &target),
                Err(e) => {
                    tracing::warn!(path = %source.display(), error = %e, "Copying unreadable Markdown file as is");
                }
            }
        }

        fs::copy(&source, &target).map_err(|e| CliError::file(&source, e))?;
        Ok(FileOutcome::Copied)
    }

    fn convert_markdown(
        &self,
        rel_path: &Path,
        text: String,
        target: &Path,
    ) -> Result<FileOutcome, CliError> {
        let mut doc = MarkdownFile::new(rel_path, text, self.settings.enabled);
        let figures = process_document(&self.processor, &mut doc);
        if figures > 0 {
            tracing::info!(path = %doc.path().display(), figures, "Converted document");
        }

        fs::write(target, doc.into_text()).map_err(|e| CliError::file(target, e))?;
        Ok(FileOutcome::Markdown { figures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FIGURE_DOC: &str = "# Doc\n\n```figure One\na\n```\n\n```figure Two\nb\n```\n";

    fn config_for(root: &Path, enabled: bool) -> Config {
        let path = root.join("figuremark.toml");
        fs::write(&path, format!("[figuremark]\nenabled = {enabled}\n")).unwrap();
        Config::load(Some(&path), None).unwrap()
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn read(root: &Path, rel: &str) -> String {
        fs::read_to_string(root.join(rel)).unwrap()
    }

    #[test]
    fn test_build_enabled_site() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "docs/index.md", FIGURE_DOC);
        write(dir.path(), "docs/guide/setup.markdown", "```figure\nx\n```\n");
        write(dir.path(), "docs/guide/image.png", "png");
        let config = config_for(dir.path(), true);

        let summary = SiteBuilder::from_config(&config).build().unwrap();

        assert_eq!(
            summary,
            BuildSummary {
                markdown: 2,
                converted: 2,
                figures: 3,
                copied: 1,
            }
        );
        assert!(read(dir.path(), "build/index.md").contains(r#"<figure id="figure-2""#));
        assert!(read(dir.path(), "build/guide/setup.markdown").starts_with("<figure "));
        assert_eq!(read(dir.path(), "build/guide/image.png"), "png");
    }

    #[test]
    fn test_build_respects_front_matter() {
        let dir = tempfile::tempdir().unwrap();
        let opted_in = format!("---\nfiguremark: true\n---\n{FIGURE_DOC}");
        let opted_out = format!("---\nfiguremark: false\n---\n{FIGURE_DOC}");
        write(dir.path(), "docs/in.md", &opted_in);
        write(dir.path(), "docs/out.md", &opted_out);
        write(dir.path(), "docs/default.md", FIGURE_DOC);
        let config = config_for(dir.path(), false);

        let summary = SiteBuilder::from_config(&config).build().unwrap();

        assert_eq!(summary.markdown, 3);
        assert_eq!(summary.converted, 1);
        assert_eq!(summary.figures, 2);
        assert!(read(dir.path(), "build/in.md").contains("<figure "));
        assert_eq!(read(dir.path(), "build/out.md"), opted_out);
        assert_eq!(read(dir.path(), "build/default.md"), FIGURE_DOC);
    }

    #[test]
    fn test_build_applies_configured_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "docs/a.md", "```figure T\nx\n```\n");
        let path = dir.path().join("figuremark.toml");
        fs::write(
            &path,
            "[figuremark]\nenabled = true\ndefaults = \".wide :link-caption=none\"\n",
        )
        .unwrap();
        let config = Config::load(Some(&path), None).unwrap();

        SiteBuilder::from_config(&config).build().unwrap();

        let converted = read(dir.path(), "build/a.md");
        assert!(converted.contains(r#"class="figuremark wide""#));
        assert!(!converted.contains("<a href="));
    }

    #[test]
    fn test_build_skips_hidden_and_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "docs/a.md", "text");
        write(dir.path(), "docs/.cache/b.md", "hidden");
        write(dir.path(), "docs/out/stale.md", "old");
        let config_path = dir.path().join("figuremark.toml");
        fs::write(&config_path, "[docs]\noutput_dir = \"docs/out\"\n").unwrap();
        let config = Config::load(Some(&config_path), None).unwrap();

        let summary = SiteBuilder::from_config(&config).build().unwrap();

        assert_eq!(summary.markdown, 1);
        assert_eq!(summary.copied, 0);
        assert!(!dir.path().join("docs/out/.cache").exists());
        assert!(!dir.path().join("docs/out/out").exists());
    }

    #[test]
    fn test_build_skips_output_dir_spelled_differently() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "docs/a.md", "text");
        write(dir.path(), "docs/out/stale.md", "old");
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        let config_path = dir.path().join("figuremark.toml");
        fs::write(
            &config_path,
            "[docs]\nsource_dir = \"sub/../docs\"\noutput_dir = \"docs/out\"\n",
        )
        .unwrap();
        let config = Config::load(Some(&config_path), None).unwrap();

        let summary = SiteBuilder::from_config(&config).build().unwrap();

        assert_eq!(summary.markdown, 1);
        assert!(!dir.path().join("docs/out/out").exists());
        assert_eq!(read(dir.path(), "docs/out/stale.md"), "old");
    }

    #[test]
    fn test_build_missing_source_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path(), true);

        let err = SiteBuilder::from_config(&config).build().unwrap_err();
        assert!(matches!(err, CliError::Validation(_)));
    }

    #[test]
    fn test_resolve_enabled_flags() {
        let args = |enable, disable| BuildArgs {
            config: None,
            source_dir: None,
            output_dir: None,
            enable,
            disable,
            verbose: false,
        };
        assert_eq!(args(true, false).resolve_enabled(), Some(true));
        assert_eq!(args(false, true).resolve_enabled(), Some(false));
        assert_eq!(args(false, false).resolve_enabled(), None);
    }
}
