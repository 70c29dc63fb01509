/// Payment details for the invoice.
///
/// `remaining` is manual, unvalidated input; it has no computed relationship
/// to the invoice totals or to any payment history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payment {
    pub method: String,
    pub transaction_id: String,
    pub kind: String,
    pub remaining: String,
}

/// One editable attribute of a `Payment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentField {
    Method,
    TransactionId,
    Kind,
    Remaining,
}

impl Payment {
    pub fn field(&self, field: PaymentField) -> &str {
        match field {
            PaymentField::Method => &self.method,
            PaymentField::TransactionId => &self.transaction_id,
            PaymentField::Kind => &self.kind,
            PaymentField::Remaining => &self.remaining,
        }
    }

    pub(crate) fn set_field(&mut self, field: PaymentField, value: &str) {
        let slot = match field {
            PaymentField::Method => &mut self.method,
            PaymentField::TransactionId => &mut self.transaction_id,
            PaymentField::Kind => &mut self.kind,
            PaymentField::Remaining => &mut self.remaining,
        };
        *slot = value.to_string();
    }
}
