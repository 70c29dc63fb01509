/// One billable row: description, hours, rate, and total.
///
/// Every field is carried as the string the user typed. `total` is a derived
/// field: whenever both `hours` and `rate` parse as numbers it is overwritten
/// with `hours * rate` to two decimal places. While either side fails to
/// parse, `total` keeps whatever was last written, which allows hand-entered
/// flat-fee totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceLine {
    pub description: String,
    pub hours: String,
    pub rate: String,
    pub total: String,
}

/// One editable attribute of a `ServiceLine`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceLineField {
    Description,
    Hours,
    Rate,
    Total,
}

impl ServiceLine {
    pub fn field(&self, field: ServiceLineField) -> &str {
        match field {
            ServiceLineField::Description => &self.description,
            ServiceLineField::Hours => &self.hours,
            ServiceLineField::Rate => &self.rate,
            ServiceLineField::Total => &self.total,
        }
    }

    pub(crate) fn set_field(&mut self, field: ServiceLineField, value: &str) {
        let slot = match field {
            ServiceLineField::Description => &mut self.description,
            ServiceLineField::Hours => &mut self.hours,
            ServiceLineField::Rate => &mut self.rate,
            ServiceLineField::Total => &mut self.total,
        };
        *slot = value.to_string();
    }

    /// Derive-on-write recomputation: runs after every field write. A parse
    /// failure on either side leaves `total` untouched.
    pub(crate) fn recompute_total(&mut self) {
        if let (Some(hours), Some(rate)) = (parse_decimal(&self.hours), parse_decimal(&self.rate)) {
            self.total = format!("{:.2}", hours * rate);
        }
    }
}

/// Decimal parse used for derived fields: surrounding whitespace is accepted,
/// anything non-numeric or non-finite counts as absent rather than an error.
pub(crate) fn parse_decimal(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
