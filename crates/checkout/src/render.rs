//! Document-renderer collaborator boundary.
//!
//! The renderer is a pure transform from a structured document to a
//! byte stream. It is handed plain values only — never a ledger handle —
//! and runs strictly after persistence, so a rendering failure can
//! degrade the response but not the committed sale.

use thiserror::Error;

use common::InvoiceNumber;
use domain::{Customer, LineItem, NotificationId, Order, PricingResult, PrintNotification};

/// Errors from document rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The renderer could not produce a document.
    #[error("document rendering failed: {0}")]
    Failed(String),
}

/// Structured line-item table and totals handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDocument {
    pub title: String,
    /// Date and invoice-number lines under the title.
    pub meta: Vec<String>,
    /// Customer block.
    pub customer: Vec<String>,
    pub table_header: [String; 4],
    pub rows: Vec<[String; 4]>,
    /// Label/value pairs rendered under the table.
    pub totals: Vec<(String, String)>,
    pub footer: Vec<String>,
}

impl InvoiceDocument {
    /// Builds the invoice document for a freshly completed checkout,
    /// with the full line-item table.
    pub fn for_checkout(order: &Order, items: &[LineItem], pricing: &PricingResult) -> Self {
        let rows = items
            .iter()
            .map(|item| {
                let print_cost = if item.requires_print {
                    item.print_total()
                } else {
                    domain::Money::zero()
                };
                [
                    format!("{} x{}", item.name, item.quantity),
                    item.line_total().to_string(),
                    print_cost.to_string(),
                    (item.line_total() + print_cost).to_string(),
                ]
            })
            .collect();

        let mut totals = vec![
            ("Subtotal:".to_string(), pricing.subtotal.to_string()),
            (
                "Total Print Cost:".to_string(),
                pricing.print_cost_subtotal.to_string(),
            ),
        ];
        if !pricing.discount_rate.is_zero() {
            totals.push((
                format!("Discount ({}):", pricing.discount_rate),
                format!("-{}", pricing.discount_amount),
            ));
        }
        totals.push(("Total:".to_string(), pricing.final_total.to_string()));

        Self {
            title: "INVOICE".to_string(),
            meta: vec![
                format!("Date: {}", order.order_date.format("%Y-%m-%d")),
                format!("Invoice #: {}", order.invoice_number),
            ],
            customer: vec![
                format!("Billed to: {}", order.customer_name),
                order.customer_email.clone(),
            ],
            table_header: [
                "Item".to_string(),
                "Price".to_string(),
                "Print Cost".to_string(),
                "Total".to_string(),
            ],
            rows,
            totals,
            footer: vec![
                "Thank you for your business!".to_string(),
                "Agentur Schein Berlin".to_string(),
            ],
        }
    }

    /// Rebuilds an invoice from the ledger record alone.
    ///
    /// The ledger keeps totals but not line items, so a re-requested
    /// invoice carries the summary without the item table.
    pub fn for_order(order: &Order) -> Self {
        Self {
            title: "INVOICE".to_string(),
            meta: vec![
                format!("Date: {}", order.order_date.format("%Y-%m-%d")),
                format!("Invoice #: {}", order.invoice_number),
            ],
            customer: vec![
                format!("Billed to: {}", order.customer_name),
                order.customer_email.clone(),
            ],
            table_header: [
                "Item".to_string(),
                "Price".to_string(),
                "Print Cost".to_string(),
                "Total".to_string(),
            ],
            rows: Vec::new(),
            totals: vec![("Total:".to_string(), order.total_amount.to_string())],
            footer: vec![
                "Thank you for your business!".to_string(),
                "Agentur Schein Berlin".to_string(),
            ],
        }
    }

    /// Builds the production document from a notification's stored cart
    /// snapshot.
    pub fn for_notification(notification: &PrintNotification) -> Self {
        let customer = Customer::new(
            notification.customer_name.clone(),
            notification.customer_email.clone(),
        );
        let rows = notification
            .order_details
            .iter()
            .filter(|item| item.requires_print)
            .map(|item| {
                [
                    item.name.clone(),
                    format!("{}", item.quantity),
                    item.print_unit_cost.to_string(),
                    item.print_total().to_string(),
                ]
            })
            .collect();

        Self {
            title: "PRINT NOTIFICATION".to_string(),
            meta: vec![
                format!("Date: {}", notification.order_date.format("%Y-%m-%d")),
                format!("Order #: {}", notification.invoice_number),
            ],
            customer: vec![format!("Customer: {}", customer.name), customer.email],
            table_header: [
                "Item".to_string(),
                "Quantity".to_string(),
                "Print Cost".to_string(),
                "Total".to_string(),
            ],
            rows,
            totals: vec![(
                "Total Print Cost:".to_string(),
                notification.total_print_cost.to_string(),
            )],
            footer: vec!["Agentur Schein Berlin - production".to_string()],
        }
    }
}

/// Returns the download filename for an invoice document.
pub fn invoice_filename(invoice_number: InvoiceNumber) -> String {
    format!("invoice_{invoice_number}.pdf")
}

/// Returns the download filename for a print-notification document.
pub fn notification_filename(id: NotificationId) -> String {
    format!("print_notification_{id}.pdf")
}

/// Trait for rendering a structured document to a byte stream.
pub trait DocumentRenderer: Send + Sync {
    /// Renders the document. Pure: same input, same bytes.
    fn render(&self, document: &InvoiceDocument) -> Result<Vec<u8>, RenderError>;
}

impl DocumentRenderer for std::sync::Arc<dyn DocumentRenderer> {
    fn render(&self, document: &InvoiceDocument) -> Result<Vec<u8>, RenderError> {
        self.as_ref().render(document)
    }
}

/// Renderer double that always fails; for exercising partial-success
/// paths in tests.
#[derive(Debug, Clone, Default)]
pub struct FailingRenderer;

impl DocumentRenderer for FailingRenderer {
    fn render(&self, _document: &InvoiceDocument) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::Failed("renderer out of order".to_string()))
    }
}
