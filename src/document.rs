//! Shapes an invoice snapshot into a static document description.
//!
//! This is a pure projection: nothing here mutates the invoice or re-derives
//! totals beyond reading the aggregate's current values, so the generated
//! document always matches what the form preview showed at the moment of
//! generation.

use crate::models::Invoice;

/// Placeholder glyph for optional fields left blank, so the totals block
/// never shows an ambiguous empty cell.
const PLACEHOLDER: &str = "—";

/// Fixed branding header; static content, not derived from any input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandingBlock {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub presenter: &'static str,
    pub role: &'static str,
    pub phone: &'static str,
    pub website: &'static str,
}

/// One row of the services table, cells carried verbatim from the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRow {
    pub description: String,
    pub hours: String,
    pub rate: String,
    pub total: String,
}

/// Totals block rendered below the services table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsBlock {
    pub subtotal: String,
    pub grand_total: String,
    pub payment_method: String,
    pub transaction_id: String,
    pub payment_kind: String,
    pub remaining: String,
}

/// Complete paginated document description, ready to hand to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDocument {
    pub branding: BrandingBlock,
    pub title: &'static str,
    pub date: String,
    pub bill_to: Vec<String>,
    pub table_header: [&'static str; 4],
    pub rows: Vec<ServiceRow>,
    pub totals: TotalsBlock,
    pub license_title: &'static str,
    pub license_terms: &'static str,
    pub notice: &'static str,
}

const BRANDING: BrandingBlock = BrandingBlock {
    title: "Your Digital Front",
    subtitle: "A Professional Website That Welcomes & Converts Clients",
    presenter: "Presented by Tushar Gupta",
    role: "Software Developer",
    phone: "+91-9455196697",
    website: "tushar-portfolio-webapp.netlify.app",
};

const LICENSE_TITLE: &str = "License Terms (Standard – Non-Exclusive)";

const LICENSE_TERMS: &str = "\
This website is built using a professionally crafted, modular design system \
that enables high-quality, fast, and cost-effective delivery.

When you purchase this service:
- You receive a non-exclusive license to use a fully customized version of \
the website based on a template.
- Your site will be visually unique — with your own branding, content, \
images, and colors — creating a personalized and trustworthy online presence.
- The structural framework and codebase used to build your website are part \
of a reusable system developed to support multiple projects efficiently.
- You may not resell, redistribute, or sublicense the website or its \
underlying code to others. This package does not include source code access, \
as the system is part of a licensed design framework.";

const NOTICE: &str =
    "This is a system-generated invoice and does not require a physical signature.";

/// Build the document description from the current invoice snapshot.
pub fn build_document(invoice: &Invoice) -> InvoiceDocument {
    let client = invoice.client();
    let payment = invoice.payment();

    InvoiceDocument {
        branding: BRANDING,
        title: "INVOICE",
        date: invoice.invoice_date().format("%Y-%m-%d").to_string(),
        bill_to: vec![
            client.name.clone(),
            client.company.clone(),
            client.address.clone(),
            client.email.clone(),
            client.phone.clone(),
        ],
        table_header: ["Service", "Hours", "Rate", "Total"],
        rows: invoice
            .service_lines()
            .iter()
            .map(|line| ServiceRow {
                description: line.description.clone(),
                hours: line.hours.clone(),
                rate: line.rate.clone(),
                total: line.total.clone(),
            })
            .collect(),
        totals: TotalsBlock {
            subtotal: invoice.subtotal(),
            grand_total: invoice.grand_total(),
            payment_method: payment.method.clone(),
            transaction_id: payment.transaction_id.clone(),
            payment_kind: or_placeholder(&payment.kind),
            remaining: or_placeholder(&payment.remaining),
        },
        license_title: LICENSE_TITLE,
        license_terms: LICENSE_TERMS,
        notice: NOTICE,
    }
}

fn or_placeholder(value: &str) -> String {
    if value.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClientField, PaymentField, ServiceLineField};
    use chrono::NaiveDate;

    fn sample_invoice() -> Invoice {
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
        invoice
    }

    #[test]
    fn building_twice_without_mutation_is_deterministic() {
        let invoice = sample_invoice();
        assert_eq!(build_document(&invoice), build_document(&invoice));
    }

    #[test]
    fn rows_carry_line_values_verbatim_in_order() {
        let mut invoice = sample_invoice();
        invoice.add_service_line();
        invoice
            .set_service_line_field(1, ServiceLineField::Description, "Hosting")
            .unwrap();
        invoice
            .set_service_line_field(1, ServiceLineField::Total, "abc")
            .unwrap();

        let document = build_document(&invoice);
        assert_eq!(document.rows.len(), 2);
        assert_eq!(document.rows[0].description, "Website build");
        assert_eq!(document.rows[0].total, "250.00");
        assert_eq!(document.rows[1].description, "Hosting");
        // Unparseable totals are rendered as typed, not corrected.
        assert_eq!(document.rows[1].total, "abc");
    }

    #[test]
    fn totals_match_the_aggregate() {
        let invoice = sample_invoice();
        let document = build_document(&invoice);
        assert_eq!(document.totals.subtotal, invoice.subtotal());
        assert_eq!(document.totals.grand_total, invoice.grand_total());
        assert_eq!(document.date, "2024-07-01");
    }

    #[test]
    fn blank_optional_payment_fields_render_as_placeholder() {
        let mut invoice = sample_invoice();
        let document = build_document(&invoice);
        assert_eq!(document.totals.payment_kind, "—");
        assert_eq!(document.totals.remaining, "—");

        invoice.set_payment_field(PaymentField::Kind, "Advance");
        invoice.set_payment_field(PaymentField::Remaining, "120.00");
        let document = build_document(&invoice);
        assert_eq!(document.totals.payment_kind, "Advance");
        assert_eq!(document.totals.remaining, "120.00");
    }

    #[test]
    fn static_blocks_do_not_depend_on_input() {
        let blank = build_document(&Invoice::with_date(
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        ));
        let filled = build_document(&sample_invoice());
        assert_eq!(blank.branding, filled.branding);
        assert_eq!(blank.license_terms, filled.license_terms);
        assert_eq!(blank.notice, filled.notice);
    }
}
