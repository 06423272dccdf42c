//! Port to the PDF engine.
//!
//! Field extraction, filling and flattening are delegated to an external
//! engine; this crate only decides what goes into each field.

use std::collections::BTreeMap;

use pkt_model::PdfField;

/// Operations the export pipeline needs from a PDF library.
pub trait PdfEngine {
    /// Lists the fillable fields of a form.
    fn extract_fields(&self, pdf: &[u8]) -> anyhow::Result<Vec<PdfField>>;

    /// Returns a copy of `pdf` with the named fields set. Fields missing from
    /// `values` keep their current content.
    fn fill_fields(
        &self,
        pdf: &[u8],
        values: &BTreeMap<String, String>,
    ) -> anyhow::Result<Vec<u8>>;

    /// Returns a copy of `pdf` with form fields burned into page content.
    fn flatten(&self, pdf: &[u8]) -> anyhow::Result<Vec<u8>>;
}
