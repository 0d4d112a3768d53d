//! Checkout orchestration for the order-processing backend.
//!
//! [`CheckoutService`] drives a single checkout through validation,
//! pricing, invoice allocation, persistence, the print-notification
//! side channel, and document rendering. Collaborators that live outside
//! the core — mail transport, document rendering, discount-tier
//! configuration — are trait boundaries with production implementations
//! and in-memory test doubles.

pub mod dispatch;
pub mod error;
pub mod mail;
pub mod pdf;
pub mod policy;
pub mod render;
pub mod service;

pub use dispatch::{DeliveryStatus, DispatchOutcome, PrintNotificationDispatcher};
pub use error::CheckoutError;
pub use mail::{InMemoryMailTransport, MailConfig, MailError, MailTransport, SmtpMailTransport};
pub use pdf::PdfRenderer;
pub use policy::{StaticTierPolicy, TierPolicySource};
pub use render::{
    DocumentRenderer, FailingRenderer, InvoiceDocument, RenderError, invoice_filename,
    notification_filename,
};
pub use service::{
    CheckoutOutcome, CheckoutRequest, CheckoutService, DocumentOutcome, NotificationOutcome,
};
