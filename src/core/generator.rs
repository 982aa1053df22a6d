//! Run coordinator.
//!
//! Owns every piece of run-wide state (entity catalog, resource bundles) and drives
//! the three phases: load bundles, rewrite templates while feeding labels to every
//! bundle, then finalize and save the bundles.

use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use tracing::debug;

use super::{
    bundle::{PendingLabels, ResourceBundle},
    document::{DocumentError, parse, serialize},
    entities::EntityCatalog,
    error::{Error, Result},
    parsers::properties::scan_message_files,
    properties_writer::{encode_latin1, generated_on, render},
    utils::{IgnoreMatcher, encode, read_decoded, walk_tree, write_atomically},
    walker::walk_document,
};

pub const DEFAULT_TEMPLATE_EXTENSION: &str = "xhtml";
pub const DEFAULT_ENCODING: &str = "ISO-8859-1";

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub template_root: PathBuf,
    pub resource_root: PathBuf,
    /// Encoding templates are read and written with.
    pub encoding: &'static Encoding,
    /// The encoding as the user named it; `encoding` may be its WHATWG alias.
    pub encoding_label: String,
    /// Extension (without dot) of the files treated as templates.
    pub template_extension: String,
    pub ignores: IgnoreMatcher,
    /// Skip templates that fail instead of aborting the run.
    pub keep_going: bool,
    /// Process everything but write nothing.
    pub dry_run: bool,
}

impl GenerateOptions {
    pub fn new(template_root: impl Into<PathBuf>, resource_root: impl Into<PathBuf>) -> Self {
        Self {
            template_root: template_root.into(),
            resource_root: resource_root.into(),
            encoding: encoding_rs::WINDOWS_1252,
            encoding_label: DEFAULT_ENCODING.to_string(),
            template_extension: DEFAULT_TEMPLATE_EXTENSION.to_string(),
            ignores: IgnoreMatcher::default(),
            keep_going: false,
            dry_run: false,
        }
    }
}

/// Events emitted while a run progresses, in order.
#[derive(Debug)]
pub enum Progress<'a> {
    Template { path: &'a Path, extracted: usize },
    TemplateFailed { path: &'a Path, error: &'a Error },
    Saving { path: &'a Path },
    /// A bundle rendered under `dry_run`; its file is left as it was.
    Checked { path: &'a Path },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateReport {
    pub path: PathBuf,
    pub extracted: usize,
}

#[derive(Debug)]
pub struct TemplateFailure {
    pub path: PathBuf,
    pub error: Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleReport {
    pub locale: String,
    pub path: PathBuf,
    pub reused: usize,
    pub new: usize,
    pub stale: usize,
    pub conflicts: usize,
}

impl From<&ResourceBundle> for BundleReport {
    fn from(bundle: &ResourceBundle) -> Self {
        Self {
            locale: bundle.locale().to_string(),
            path: bundle.source_path().to_path_buf(),
            reused: bundle.reused_entries().len(),
            new: bundle.new_entries().len(),
            stale: bundle.stale_entries().len(),
            conflicts: bundle.conflicts().len(),
        }
    }
}

#[derive(Debug, Default)]
pub struct GenerateSummary {
    pub templates: Vec<TemplateReport>,
    pub failures: Vec<TemplateFailure>,
    pub bundles: Vec<BundleReport>,
}

impl GenerateSummary {
    pub fn total_extracted(&self) -> usize {
        self.templates.iter().map(|t| t.extracted).sum()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

pub struct Generator {
    options: GenerateOptions,
    catalog: EntityCatalog,
    template_suffix: String,
}

impl Generator {
    pub fn new(options: GenerateOptions) -> Self {
        let template_suffix = format!(".{}", options.template_extension);
        Self {
            options,
            catalog: EntityCatalog::xhtml(),
            template_suffix,
        }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Runs the whole pipeline.
    ///
    /// Fails without touching any file when the resource directory holds no bundle
    /// or a bundle cannot be loaded. Without `keep_going` the first failing template
    /// aborts the run before any bundle is written; templates rewritten until then
    /// stay rewritten.
    pub fn run(&self, mut on_progress: impl FnMut(Progress<'_>)) -> Result<GenerateSummary> {
        let options = &self.options;

        let mut bundles = scan_message_files(&options.resource_root)?;
        if bundles.is_empty() {
            return Err(Error::NoBundles {
                dir: options.resource_root.clone(),
            });
        }
        debug!(count = bundles.len(), "resource bundles loaded");

        let mut summary = GenerateSummary::default();

        walk_tree(
            &options.template_root,
            |path| self.should_visit(path),
            |path| match self.process_template(path) {
                Ok((pending, extracted)) => {
                    pending.commit(bundles.as_mut_slice());
                    on_progress(Progress::Template { path, extracted });
                    summary.templates.push(TemplateReport {
                        path: path.to_path_buf(),
                        extracted,
                    });
                    Ok(())
                }
                Err(error) if options.keep_going && error.is_per_file() => {
                    debug!("skipping {}: {}", path.display(), error);
                    on_progress(Progress::TemplateFailed {
                        path,
                        error: &error,
                    });
                    summary.failures.push(TemplateFailure {
                        path: path.to_path_buf(),
                        error,
                    });
                    Ok(())
                }
                Err(error) => Err(error),
            },
        )?;

        // Every bundle is rendered before the first one is written.
        let stamp = generated_on();
        let rendered: Vec<Vec<u8>> = bundles
            .iter_mut()
            .map(|bundle| {
                bundle.finalize();
                encode_latin1(&render(bundle, &stamp))
            })
            .collect();

        for (bundle, contents) in bundles.iter().zip(rendered) {
            let path = bundle.source_path();
            if options.dry_run {
                on_progress(Progress::Checked { path });
            } else {
                on_progress(Progress::Saving { path });
                write_atomically(path, &contents)?;
            }
            summary.bundles.push(BundleReport::from(bundle));
        }

        Ok(summary)
    }

    fn should_visit(&self, path: &Path) -> bool {
        if self.options.ignores.is_ignored(path) {
            return false;
        }
        path.is_dir() || self.is_template(path)
    }

    fn is_template(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| name.to_string_lossy().ends_with(&self.template_suffix))
            .unwrap_or(false)
    }

    /// Rewrites one template and returns the labels it produced, not yet committed.
    fn process_template(&self, path: &Path) -> Result<(PendingLabels, usize)> {
        let source = read_decoded(path, self.options.encoding)?;

        let mut document = parse(&source, &self.catalog).map_err(|err| match err {
            DocumentError::UnresolvedEntity { name, .. } => Error::UnresolvedEntity {
                path: path.to_path_buf(),
                name,
            },
            syntax @ DocumentError::Syntax { .. } => Error::Parse {
                path: path.to_path_buf(),
                message: syntax.to_string(),
            },
        })?;

        let mut pending = PendingLabels::new();
        let extracted = walk_document(path, &mut document, &mut pending);
        debug!(path = %path.display(), extracted, "template walked");

        if !self.options.dry_run {
            let output = encode(&serialize(&document), self.options.encoding);
            write_atomically(path, &output)?;
        }

        Ok((pending, extracted))
    }
}
