/// Client ("Bill To") details for the invoice being edited.
///
/// All fields are free-text and may be left blank; no validation is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Client {
    pub name: String,
    pub company: String,
    pub address: String,
    pub email: String,
    pub phone: String,
}

/// One editable attribute of a `Client`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientField {
    Name,
    Company,
    Address,
    Email,
    Phone,
}

impl Client {
    pub fn field(&self, field: ClientField) -> &str {
        match field {
            ClientField::Name => &self.name,
            ClientField::Company => &self.company,
            ClientField::Address => &self.address,
            ClientField::Email => &self.email,
            ClientField::Phone => &self.phone,
        }
    }

    pub(crate) fn set_field(&mut self, field: ClientField, value: &str) {
        let slot = match field {
            ClientField::Name => &mut self.name,
            ClientField::Company => &mut self.company,
            ClientField::Address => &mut self.address,
            ClientField::Email => &mut self.email,
            ClientField::Phone => &mut self.phone,
        };
        *slot = value.to_string();
    }
}
