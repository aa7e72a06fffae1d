use std::path::PathBuf;

use pricelist_core::ImportPreview;
use pricelist_model::ImportResult;

#[derive(Debug)]
pub struct ImportReport {
    pub file: PathBuf,
    pub catalog: PathBuf,
    pub preview: ImportPreview,
    /// `None` for a dry run.
    pub result: Option<ImportResult>,
    pub saved_template: Option<String>,
    pub all_rows: bool,
}

impl ImportReport {
    /// Any row rejected by validation or refused by the catalog.
    pub fn has_errors(&self) -> bool {
        match &self.result {
            Some(result) => result.has_errors(),
            None => self.preview.summary().errors > 0,
        }
    }
}
