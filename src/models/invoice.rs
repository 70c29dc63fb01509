use chrono::{Local, NaiveDate};
use thiserror::Error;

use super::client::{Client, ClientField};
use super::payment::{Payment, PaymentField};
use super::service_line::{parse_decimal, ServiceLine, ServiceLineField};

/// Errors raised by invoice operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvoiceError {
    #[error("service line index {index} out of range (have {len} lines)")]
    LineOutOfRange { index: usize, len: usize },
}

/// The complete in-memory invoice for the active editing session: client,
/// ordered service lines, payment details, and the session date snapshot.
///
/// The aggregate is created once with blank fields, mutated in place by the
/// form, and discarded when the session ends. Two invariants are enforced
/// here rather than by callers: the service line list never shrinks below one
/// entry, and the invoice date is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    invoice_date: NaiveDate,
    client: Client,
    service_lines: Vec<ServiceLine>,
    payment: Payment,
}

impl Invoice {
    /// Blank-default aggregate: empty client and payment, one blank service
    /// line, dated today.
    pub fn new() -> Self {
        Self::with_date(Local::now().date_naive())
    }

    /// Same as `new` but with an explicit date snapshot.
    pub fn with_date(invoice_date: NaiveDate) -> Self {
        Self {
            invoice_date,
            client: Client::default(),
            service_lines: vec![ServiceLine::default()],
            payment: Payment::default(),
        }
    }

    pub fn invoice_date(&self) -> NaiveDate {
        self.invoice_date
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn payment(&self) -> &Payment {
        &self.payment
    }

    pub fn service_lines(&self) -> &[ServiceLine] {
        &self.service_lines
    }

    /// Replace one client attribute. Any string (including empty) is accepted.
    pub fn set_client_field(&mut self, field: ClientField, value: &str) {
        self.client.set_field(field, value);
    }

    /// Replace one payment attribute. Any string (including empty) is accepted.
    pub fn set_payment_field(&mut self, field: PaymentField, value: &str) {
        self.payment.set_field(field, value);
    }

    /// Append a blank service line at the end of the sequence.
    pub fn add_service_line(&mut self) {
        self.service_lines.push(ServiceLine::default());
    }

    /// Remove the line at `index`. Removing the last remaining line is a
    /// silent no-op (the list never shrinks below one entry); an out-of-range
    /// index is an error.
    pub fn remove_service_line(&mut self, index: usize) -> Result<(), InvoiceError> {
        let len = self.service_lines.len();
        if index >= len {
            return Err(InvoiceError::LineOutOfRange { index, len });
        }
        if len > 1 {
            self.service_lines.remove(index);
        }
        Ok(())
    }

    /// Replace one attribute of the line at `index`, then recompute that
    /// line's total (the recomputation is skipped internally while hours or
    /// rate fails to parse).
    pub fn set_service_line_field(
        &mut self,
        index: usize,
        field: ServiceLineField,
        value: &str,
    ) -> Result<(), InvoiceError> {
        let len = self.service_lines.len();
        let line = self
            .service_lines
            .get_mut(index)
            .ok_or(InvoiceError::LineOutOfRange { index, len })?;
        line.set_field(field, value);
        line.recompute_total();
        Ok(())
    }

    /// Sum of every line's parsed total, with unparseable or blank totals
    /// counting as zero. Recomputed from current state on every call.
    pub fn subtotal(&self) -> String {
        let sum: f64 = self
            .service_lines
            .iter()
            .map(|line| parse_decimal(&line.total).unwrap_or(0.0))
            .sum();
        format!("{:.2}", sum)
    }

    /// Currently identical to the subtotal; kept as a separate operation so
    /// tax or discount terms can slot in without touching callers.
    pub fn grand_total(&self) -> String {
        self.subtotal()
    }

    /// Filename stem for the generated artifact: the client's name, or the
    /// literal "client" while the name is blank.
    pub fn filename_stem(&self) -> &str {
        if self.client.name.is_empty() {
            "client"
        } else {
            &self.client.name
        }
    }
}

impl Default for Invoice {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_invoice() -> Invoice {
        Invoice::with_date(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap())
    }

    #[test]
    fn blank_default_aggregate_has_one_blank_line() {
        let invoice = test_invoice();
        assert_eq!(invoice.service_lines().len(), 1);
        assert_eq!(invoice.service_lines()[0], ServiceLine::default());
        assert_eq!(invoice.client(), &Client::default());
        assert_eq!(invoice.payment(), &Payment::default());
        assert_eq!(invoice.subtotal(), "0.00");
    }

    #[test]
    fn editing_hours_and_rate_recomputes_total() {
        let mut invoice = test_invoice();
        invoice
            .set_service_line_field(0, ServiceLineField::Hours, "3")
            .unwrap();
        invoice
            .set_service_line_field(0, ServiceLineField::Rate, "50.5")
            .unwrap();
        assert_eq!(invoice.service_lines()[0].total, "151.50");
    }

    #[test]
    fn whitespace_padded_numbers_still_parse() {
        let mut invoice = test_invoice();
        invoice
            .set_service_line_field(0, ServiceLineField::Hours, "  3 ")
            .unwrap();
        invoice
            .set_service_line_field(0, ServiceLineField::Rate, " 50.5")
            .unwrap();
        assert_eq!(invoice.service_lines()[0].total, "151.50");
    }

    #[test]
    fn unparseable_hours_leaves_total_unchanged() {
        let mut invoice = test_invoice();
        invoice
            .set_service_line_field(0, ServiceLineField::Hours, "2")
            .unwrap();
        invoice
            .set_service_line_field(0, ServiceLineField::Rate, "10")
            .unwrap();
        assert_eq!(invoice.service_lines()[0].total, "20.00");

        invoice
            .set_service_line_field(0, ServiceLineField::Hours, "abc")
            .unwrap();
        assert_eq!(invoice.service_lines()[0].total, "20.00");
    }

    #[test]
    fn non_finite_input_counts_as_absent() {
        let mut invoice = test_invoice();
        invoice
            .set_service_line_field(0, ServiceLineField::Total, "75.00")
            .unwrap();
        invoice
            .set_service_line_field(0, ServiceLineField::Hours, "NaN")
            .unwrap();
        invoice
            .set_service_line_field(0, ServiceLineField::Rate, "inf")
            .unwrap();
        assert_eq!(invoice.service_lines()[0].total, "75.00");
    }

    #[test]
    fn manual_total_survives_while_rate_is_blank() {
        let mut invoice = test_invoice();
        invoice
            .set_service_line_field(0, ServiceLineField::Hours, "4")
            .unwrap();
        // Flat-fee line: rate never entered, total typed by hand.
        invoice
            .set_service_line_field(0, ServiceLineField::Total, "500")
            .unwrap();
        assert_eq!(invoice.service_lines()[0].total, "500");
        assert_eq!(invoice.subtotal(), "500.00");
    }

    #[test]
    fn subtotal_treats_unparseable_totals_as_zero() {
        let mut invoice = test_invoice();
        invoice.add_service_line();
        invoice.add_service_line();
        invoice
            .set_service_line_field(0, ServiceLineField::Total, "151.50")
            .unwrap();
        invoice
            .set_service_line_field(1, ServiceLineField::Total, "abc")
            .unwrap();
        invoice
            .set_service_line_field(2, ServiceLineField::Total, "20")
            .unwrap();
        assert_eq!(invoice.subtotal(), "171.50");
    }

    #[test]
    fn grand_total_equals_subtotal() {
        let mut invoice = test_invoice();
        invoice
            .set_service_line_field(0, ServiceLineField::Total, "42.25")
            .unwrap();
        assert_eq!(invoice.grand_total(), invoice.subtotal());
    }

    #[test]
    fn removing_the_last_line_is_a_no_op() {
        let mut invoice = test_invoice();
        invoice
            .set_service_line_field(0, ServiceLineField::Description, "Design")
            .unwrap();
        let before = invoice.service_lines().to_vec();

        invoice.remove_service_line(0).unwrap();
        assert_eq!(invoice.service_lines(), before.as_slice());
    }

    #[test]
    fn out_of_range_remove_fails_loudly() {
        let mut invoice = test_invoice();
        let err = invoice.remove_service_line(5).unwrap_err();
        assert_eq!(err, InvoiceError::LineOutOfRange { index: 5, len: 1 });
    }

    #[test]
    fn out_of_range_edit_fails_loudly() {
        let mut invoice = test_invoice();
        let err = invoice
            .set_service_line_field(1, ServiceLineField::Hours, "2")
            .unwrap_err();
        assert_eq!(err, InvoiceError::LineOutOfRange { index: 1, len: 1 });
    }

    #[test]
    fn add_then_remove_round_trips() {
        let mut invoice = test_invoice();
        invoice
            .set_service_line_field(0, ServiceLineField::Description, "Build")
            .unwrap();
        let before = invoice.clone();

        invoice.add_service_line();
        invoice.remove_service_line(1).unwrap();
        assert_eq!(invoice, before);
    }

    #[test]
    fn filename_stem_falls_back_to_client() {
        let mut invoice = test_invoice();
        assert_eq!(invoice.filename_stem(), "client");

        invoice.set_client_field(ClientField::Name, "Acme");
        assert_eq!(invoice.filename_stem(), "Acme");
    }

    #[test]
    fn end_to_end_edit_scenario() {
        let mut invoice = test_invoice();
        invoice.set_client_field(ClientField::Name, "Acme");
        invoice.add_service_line();
        invoice
            .set_service_line_field(0, ServiceLineField::Hours, "10")
            .unwrap();
        invoice
            .set_service_line_field(0, ServiceLineField::Rate, "25")
            .unwrap();

        assert_eq!(invoice.service_lines().len(), 2);
        assert_eq!(invoice.service_lines()[0].total, "250.00");
        assert_eq!(invoice.subtotal(), "250.00");
        assert_eq!(invoice.grand_total(), "250.00");
        assert_eq!(invoice.filename_stem(), "Acme");
    }
}
