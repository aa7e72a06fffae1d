//! Import orchestration.
//!
//! An [`ImportJob`] runs the stages in order, each inside its own span:
//!
//! 1. **read** - bytes to grid, format detection, layout extraction
//! 2. **map** - suggestions, template, overrides, price column, defaults
//! 3. **validate** - mapping gate, row normalization, row validation
//! 4. **commit** - write the outcomes under a duplicate strategy
//!
//! Stages 1-3 produce an [`ImportPreview`] without touching the catalog;
//! stage 4 turns a preview into an [`ImportResult`].

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use pricelist_ingest::{ParseError, ReadOptions, classify, extract_layout, read_grid, read_grid_from_path};
use pricelist_map::{
    MappingEngine, MappingError, MappingResult, PackColumns, UnresolvedSelector, apply_overrides,
    apply_template, detect_pack_columns, resolve_column, timestamp_now,
};
use pricelist_model::{
    CanonicalField, Catalog, CatalogError, ColumnMapping, ColumnSelector, ImportOptions,
    ImportResult, MappingTemplate, RawGrid, SourceFormat, SourceLayout, ValidationOutcome,
};
use pricelist_validate::{
    MappingIncomplete, ValidationReport, ValidationSummary, Validator, check_mapping_complete,
};
use thiserror::Error;
use tracing::{debug, info, info_span, warn};

use crate::catalog::SharedCatalog;
use crate::commit::{BatchCommitter, CommitError};
use crate::normalize::{NormalizeInput, RowNormalizer};

/// Batch-fatal import errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read price list")]
    Parse(#[from] ParseError),

    #[error("failed to map columns")]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    MappingIncomplete(#[from] MappingIncomplete),

    #[error("failed to commit batch")]
    Commit(#[from] CommitError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Everything known about a file before anything is written.
#[derive(Debug, Clone)]
pub struct ImportPreview {
    pub format: SourceFormat,
    pub headers: Vec<String>,
    /// Engine suggestions, including ranked candidates per field.
    pub suggestions: MappingResult,
    /// Final mapping after template and overrides.
    pub mapping: ColumnMapping,
    pub price_column: Option<usize>,
    pub defaults: BTreeMap<CanonicalField, String>,
    pub pack_columns: PackColumns,
    /// Template selectors that matched no column.
    pub unresolved: Vec<UnresolvedSelector>,
    pub report: ValidationReport,
}

impl ImportPreview {
    pub fn outcomes(&self) -> &[ValidationOutcome] {
        &self.report.outcomes
    }

    pub fn summary(&self) -> ValidationSummary {
        self.report.summary()
    }

    /// The mapping of this preview as a reusable template.
    pub fn to_template(&self, name: impl Into<String>) -> MappingTemplate {
        let mut template = MappingTemplate::new(name, self.format);
        template.column_mapping = self.mapping.to_selectors();
        template.price_field = self
            .price_column
            .map(|index| ColumnSelector::Name(self.headers[index].clone()));
        template.defaults = self.defaults.clone();
        template.saved_at = Some(timestamp_now());
        template
    }
}

/// A configured import: options plus per-run mapping choices.
#[derive(Debug, Clone, Default)]
pub struct ImportJob {
    options: ImportOptions,
    read: ReadOptions,
    template: Option<MappingTemplate>,
    overrides: BTreeMap<CanonicalField, ColumnSelector>,
    price_column: Option<ColumnSelector>,
    defaults: BTreeMap<CanonicalField, String>,
    log_values: bool,
}

impl ImportJob {
    pub fn new(options: ImportOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Delimiter and encoding hints. The size limit comes from the options.
    #[must_use]
    pub fn with_read_options(mut self, read: ReadOptions) -> Self {
        self.read = read;
        self
    }

    #[must_use]
    pub fn with_template(mut self, template: MappingTemplate) -> Self {
        self.template = Some(template);
        self
    }

    #[must_use]
    pub fn with_override(mut self, field: CanonicalField, column: ColumnSelector) -> Self {
        self.overrides.insert(field, column);
        self
    }

    #[must_use]
    pub fn with_overrides(
        mut self,
        overrides: impl IntoIterator<Item = (CanonicalField, ColumnSelector)>,
    ) -> Self {
        self.overrides.extend(overrides);
        self
    }

    #[must_use]
    pub fn with_price_column(mut self, column: ColumnSelector) -> Self {
        self.price_column = Some(column);
        self
    }

    /// Default value for a field; wins over template defaults.
    #[must_use]
    pub fn with_default(mut self, field: CanonicalField, value: impl Into<String>) -> Self {
        self.defaults.insert(field, value.into());
        self
    }

    /// Include cell values in trace events.
    #[must_use]
    pub fn with_row_logging(mut self, enabled: bool) -> Self {
        self.log_values = enabled;
        self
    }

    fn read_options(&self) -> ReadOptions {
        ReadOptions {
            max_bytes: self.options.max_input_bytes,
            ..self.read.clone()
        }
    }

    /// Read, map and validate a file held in memory.
    pub fn preview<C: Catalog + ?Sized>(
        &self,
        bytes: &[u8],
        catalog: &C,
    ) -> Result<ImportPreview, PipelineError> {
        let span = info_span!("import", input_bytes = bytes.len());
        let _guard = span.enter();
        let grid = info_span!("read").in_scope(|| read_grid(bytes, &self.read_options()))?;
        self.preview_grid(&grid, catalog)
    }

    /// Read, map and validate a file on disk.
    pub fn preview_path<C: Catalog + ?Sized>(
        &self,
        path: &Path,
        catalog: &C,
    ) -> Result<ImportPreview, PipelineError> {
        let span = info_span!("import", path = %path.display());
        let _guard = span.enter();
        let grid =
            info_span!("read").in_scope(|| read_grid_from_path(path, &self.read_options()))?;
        self.preview_grid(&grid, catalog)
    }

    /// Detect the layout of an already parsed grid.
    pub fn layout(&self, grid: &RawGrid) -> SourceLayout {
        let start = Instant::now();
        let format = classify(grid, &self.options.markers, self.options.probe_rows);
        let layout = extract_layout(grid, format, &self.options.markers, self.options.probe_rows);
        info!(
            format = %layout.format,
            columns = layout.headers.len(),
            rows = layout.rows.len(),
            duration_ms = start.elapsed().as_millis(),
            "read complete"
        );
        layout
    }

    fn preview_grid<C: Catalog + ?Sized>(
        &self,
        grid: &RawGrid,
        catalog: &C,
    ) -> Result<ImportPreview, PipelineError> {
        let layout = info_span!("read").in_scope(|| self.layout(grid));
        let mapped = info_span!("map").in_scope(|| self.map_layout(&layout))?;
        let report = info_span!("validate").in_scope(|| self.validate(&layout, &mapped, catalog))?;

        Ok(ImportPreview {
            format: layout.format,
            headers: layout.headers,
            suggestions: mapped.suggestions,
            mapping: mapped.mapping,
            price_column: mapped.price_column,
            defaults: mapped.defaults,
            pack_columns: mapped.pack_columns,
            unresolved: mapped.unresolved,
            report,
        })
    }

    fn map_layout(&self, layout: &SourceLayout) -> Result<MappedLayout, MappingError> {
        let start = Instant::now();
        let headers = &layout.headers;
        let engine = MappingEngine::new(self.options.schema.clone(), self.options.threshold);
        let suggestions = engine.suggest(headers);
        let suggested = suggestions.to_mapping();

        let (mut mapping, mut price_column, mut defaults, unresolved) = match &self.template {
            Some(template) => {
                if template.source_format != layout.format {
                    warn!(
                        template = %template.name,
                        expected = %template.source_format,
                        detected = %layout.format,
                        "Template format differs from detected format"
                    );
                }
                let applied = apply_template(template, headers, &suggested);
                (
                    applied.mapping,
                    applied.price_column,
                    applied.defaults,
                    applied.unresolved,
                )
            }
            None => (suggested, None, BTreeMap::new(), Vec::new()),
        };

        apply_overrides(&mut mapping, headers, &self.overrides)?;
        if let Some(selector) = &self.price_column {
            price_column = Some(resolve_column(headers, selector)?);
        }
        defaults.extend(self.defaults.clone());

        let pack_columns = if layout.format == SourceFormat::RowTyped {
            detect_pack_columns(headers)
        } else {
            PackColumns::default()
        };

        info!(
            mapped = mapping.len(),
            unmapped_columns = suggestions.unmapped_columns.len(),
            unresolved = unresolved.len(),
            price_column = price_column.is_some(),
            duration_ms = start.elapsed().as_millis(),
            "map complete"
        );
        Ok(MappedLayout {
            suggestions,
            mapping,
            price_column,
            defaults,
            pack_columns,
            unresolved,
        })
    }

    fn validate<C: Catalog + ?Sized>(
        &self,
        layout: &SourceLayout,
        mapped: &MappedLayout,
        catalog: &C,
    ) -> Result<ValidationReport, MappingIncomplete> {
        let start = Instant::now();
        let schema = &self.options.schema;
        check_mapping_complete(schema, &mapped.mapping, &mapped.defaults, mapped.price_column)?;

        let input = NormalizeInput {
            mapping: &mapped.mapping,
            price_column: mapped.price_column,
            defaults: &mapped.defaults,
            pack_columns: mapped.pack_columns,
        };
        let drafts = RowNormalizer::new(schema, &self.options)
            .with_row_logging(self.log_values)
            .normalize(layout, &input);
        let report = Validator::new(schema, catalog).validate(&drafts);
        let summary = report.summary();
        info!(
            ready = summary.ready,
            duplicates = summary.duplicates,
            errors = summary.errors,
            repeats = summary.repeats,
            duration_ms = start.elapsed().as_millis(),
            "validate complete"
        );
        Ok(report)
    }

    /// Write a preview's outcomes to the catalog.
    pub fn commit<C: Catalog + ?Sized>(
        &self,
        preview: &ImportPreview,
        catalog: &mut C,
        committer: &BatchCommitter,
    ) -> Result<ImportResult, PipelineError> {
        let result = info_span!("commit", strategy = %committer.strategy())
            .in_scope(|| committer.commit(catalog, preview.outcomes()))?;
        Ok(result)
    }

    /// Preview and commit in one call.
    pub fn run<C: Catalog + ?Sized>(
        &self,
        bytes: &[u8],
        catalog: &mut C,
        committer: &BatchCommitter,
    ) -> Result<(ImportPreview, ImportResult), PipelineError> {
        let preview = self.preview(bytes, &*catalog)?;
        let result = self.commit(&preview, catalog, committer)?;
        Ok((preview, result))
    }

    /// Preview under a shared read lock, then commit under the write lock.
    ///
    /// Another import may commit between the two; the commit re-reads each
    /// identifier under the write lock, so the duplicate strategy sees its
    /// writes.
    pub fn run_shared<C: Catalog>(
        &self,
        bytes: &[u8],
        catalog: &SharedCatalog<C>,
        committer: &BatchCommitter,
    ) -> Result<(ImportPreview, ImportResult), PipelineError> {
        let preview = catalog.read(|catalog| self.preview(bytes, catalog))??;
        debug!("Acquiring catalog write lock");
        let result = catalog.write(|catalog| self.commit(&preview, catalog, committer))??;
        Ok((preview, result))
    }
}

struct MappedLayout {
    suggestions: MappingResult,
    mapping: ColumnMapping,
    price_column: Option<usize>,
    defaults: BTreeMap<CanonicalField, String>,
    pack_columns: PackColumns,
    unresolved: Vec<UnresolvedSelector>,
}
