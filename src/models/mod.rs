mod client;
mod invoice;
mod payment;
mod service_line;

pub use client::{Client, ClientField};
pub use invoice::{Invoice, InvoiceError};
pub use payment::{Payment, PaymentField};
pub use service_line::{ServiceLine, ServiceLineField};
