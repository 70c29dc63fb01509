use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::document::InvoiceDocument;

/// Failures surfaced by the document renderer. The core has no retry policy;
/// the form shell shows these to the user with a try-again hint.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to write invoice files: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not run pandoc (is it installed?): {0}")]
    RendererUnavailable(std::io::Error),
    #[error("pandoc could not produce the PDF: {0}")]
    RendererFailed(String),
}

/// Service for rendering a document description to a downloadable PDF
/// artifact, via a Markdown intermediate handed to pandoc.
pub struct InvoiceGenerator {
    output_dir: PathBuf,
}

impl InvoiceGenerator {
    pub fn new(output_dir: &str) -> Result<Self, GenerateError> {
        // Create the output directory if it doesn't exist
        let path = Path::new(output_dir);
        if !path.exists() {
            fs::create_dir_all(path)?;
        }

        Ok(Self {
            output_dir: path.to_path_buf(),
        })
    }

    /// Render the document to `invoice-<stem>.pdf` and return the artifact
    /// path. On failure no partial artifact is left behind.
    pub fn generate(
        &self,
        document: &InvoiceDocument,
        filename_stem: &str,
    ) -> Result<PathBuf, GenerateError> {
        let markdown = generate_markdown(document);

        let md_path = self.output_dir.join(artifact_name(filename_stem, "md"));
        let pdf_path = self.output_dir.join(artifact_name(filename_stem, "pdf"));

        let mut file = File::create(&md_path)?;
        file.write_all(markdown.as_bytes())?;

        let output = Command::new("pandoc")
            .arg(&md_path)
            .arg("-o")
            .arg(&pdf_path)
            .output();

        match output {
            Ok(output) if output.status.success() => {
                log::info!("generated invoice artifact at {}", pdf_path.display());
                Ok(pdf_path)
            }
            Ok(output) => {
                let error = String::from_utf8_lossy(&output.stderr).trim().to_string();
                log::warn!("pandoc failed: {}", error);
                self.discard_partial(&md_path, &pdf_path);
                Err(GenerateError::RendererFailed(error))
            }
            Err(e) => {
                log::warn!("could not run pandoc: {}", e);
                self.discard_partial(&md_path, &pdf_path);
                Err(GenerateError::RendererUnavailable(e))
            }
        }
    }

    fn discard_partial(&self, md_path: &Path, pdf_path: &Path) {
        fs::remove_file(md_path).ok();
        if pdf_path.exists() {
            fs::remove_file(pdf_path).ok();
        }
    }
}

/// Artifact naming convention: `invoice-<client-name-or-"client">.<ext>`.
fn artifact_name(stem: &str, extension: &str) -> String {
    format!("invoice-{}.{}", stem, extension)
}

/// Lay the document description out as Markdown, block by block, in page
/// order: branding header, title and date, bill-to, services table, totals,
/// license terms, notice.
fn generate_markdown(document: &InvoiceDocument) -> String {
    let mut content = String::new();

    // Branding header
    content.push_str(&format!("# {}\n", document.branding.title));
    content.push_str(&format!("{}\n\n", document.branding.subtitle));
    content.push_str(&format!("*{}*<br>\n", document.branding.presenter));
    content.push_str(&format!("{}<br>\n", document.branding.role));
    content.push_str(&format!("{}<br>\n", document.branding.phone));
    content.push_str(&format!("{}\n\n", document.branding.website));
    content.push_str("<hr>\n\n");

    // Title & date
    content.push_str(&format!("# {}\n", document.title));
    content.push_str(&format!("Date: {}\n\n", document.date));

    // Client block
    content.push_str("**Bill To:**<br>\n");
    for line in &document.bill_to {
        content.push_str(&format!("{}<br>\n", line));
    }
    content.push('\n');

    // Services table
    content.push_str("<table style=\"width: 100%; border-collapse: collapse;\">\n");
    content.push_str("<tr>\n");
    for (i, header) in document.table_header.iter().enumerate() {
        let align = if i == 0 { "left" } else { "right" };
        content.push_str(&format!(
            "<th style=\"text-align: {};\">{}</th>\n",
            align, header
        ));
    }
    content.push_str("</tr>\n");

    for row in &document.rows {
        content.push_str("<tr>\n");
        content.push_str(&format!(
            "<td style=\"text-align: left;\">{}</td>\n",
            row.description
        ));
        content.push_str(&format!(
            "<td style=\"text-align: right;\">{}</td>\n",
            row.hours
        ));
        content.push_str(&format!(
            "<td style=\"text-align: right;\">{}</td>\n",
            row.rate
        ));
        content.push_str(&format!(
            "<td style=\"text-align: right;\">{}</td>\n",
            row.total
        ));
        content.push_str("</tr>\n");
    }
    content.push_str("</table>\n\n");

    // Totals block
    content.push_str(&format!("Subtotal: **{}**<br>\n", document.totals.subtotal));
    content.push_str(&format!(
        "Grand Total: **{}**<br>\n",
        document.totals.grand_total
    ));
    content.push_str(&format!(
        "Payment Method: {}<br>\n",
        document.totals.payment_method
    ));
    content.push_str(&format!(
        "Transaction ID: {}<br>\n",
        document.totals.transaction_id
    ));
    content.push_str(&format!(
        "Payment Type: {}<br>\n",
        document.totals.payment_kind
    ));
    content.push_str(&format!(
        "Remaining Payment: {}\n\n",
        document.totals.remaining
    ));

    // License terms
    content.push_str(&format!("**{}**\n\n", document.license_title));
    content.push_str(document.license_terms);
    content.push_str("\n\n<hr>\n\n");

    // System-generated notice
    content.push_str(&format!("*{}*\n", document.notice));

    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::build_document;
    use crate::models::{ClientField, Invoice, ServiceLineField};
    use chrono::NaiveDate;

    #[test]
    fn artifact_name_follows_convention() {
        assert_eq!(artifact_name("Acme", "pdf"), "invoice-Acme.pdf");
        assert_eq!(artifact_name("client", "md"), "invoice-client.md");
    }

    #[test]
    fn markdown_carries_rows_and_totals_in_order() {
        let mut invoice = Invoice::with_date(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        invoice.set_client_field(ClientField::Name, "Acme");
        invoice
            .set_service_line_field(0, ServiceLineField::Description, "Website build")
            .unwrap();
        invoice
            .set_service_line_field(0, ServiceLineField::Hours, "10")
            .unwrap();
        invoice
            .set_service_line_field(0, ServiceLineField::Rate, "25")
            .unwrap();
        invoice.add_service_line();
        invoice
            .set_service_line_field(1, ServiceLineField::Description, "Hosting")
            .unwrap();

        let markdown = generate_markdown(&build_document(&invoice));

        let build_pos = markdown.find("Website build").unwrap();
        let hosting_pos = markdown.find("Hosting").unwrap();
        assert!(build_pos < hosting_pos);

        assert!(markdown.contains("Subtotal: **250.00**"));
        assert!(markdown.contains("Grand Total: **250.00**"));
        assert!(markdown.contains("Date: 2024-07-01"));
        // Blank payment type and remaining show the placeholder glyph.
        assert!(markdown.contains("Payment Type: —"));
        assert!(markdown.contains("Remaining Payment: —"));
    }
}
