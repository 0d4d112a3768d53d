use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use common::{InvoiceNumber, Period, SEQUENCE_MAX};
use domain::{LineItem, Money, NotificationId, Order, PrintNotification};

use crate::error::LedgerError;
use crate::store::{NotificationLedger, OrderLedger};
use crate::Result;

/// PostgreSQL-backed ledger implementation.
///
/// Invoice allocation is a single atomic upsert on the per-period
/// sequence row, so concurrent allocations for the same period serialize
/// on that row's lock and unrelated periods proceed independently.
#[derive(Clone)]
pub struct PostgresLedger {
    pool: PgPool,
}

impl PostgresLedger {
    /// Creates a new PostgreSQL ledger.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let invoice_number: InvoiceNumber = row.try_get::<String, _>("invoice_number")?.parse()?;
        Ok(Order {
            invoice_number,
            order_date: row.try_get("order_date")?,
            total_amount: Money::from_cents(row.try_get("total_cents")?),
            customer_name: row.try_get("customer_name")?,
            customer_email: row.try_get("customer_email")?,
        })
    }

    fn row_to_notification(row: PgRow) -> Result<PrintNotification> {
        let invoice_number: InvoiceNumber = row.try_get::<String, _>("invoice_number")?.parse()?;
        let order_details: Vec<LineItem> =
            serde_json::from_value(row.try_get("order_details")?)?;
        Ok(PrintNotification {
            id: NotificationId::from_uuid(row.try_get::<Uuid, _>("id")?),
            invoice_number,
            order_date: row.try_get("order_date")?,
            customer_name: row.try_get("customer_name")?,
            customer_email: row.try_get("customer_email")?,
            total_print_cost: Money::from_cents(row.try_get("total_print_cost_cents")?),
            order_details,
        })
    }
}

#[async_trait]
impl OrderLedger for PostgresLedger {
    #[tracing::instrument(skip(self))]
    async fn next_invoice_number(&self, period: Period) -> Result<InvoiceNumber> {
        // Atomic increment-and-fetch: the upsert takes the row lock for
        // this period only, so the read-increment-write cannot race.
        let last_value: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO invoice_sequences (period, last_value)
            VALUES ($1, 1)
            ON CONFLICT (period)
            DO UPDATE SET last_value = invoice_sequences.last_value + 1
            RETURNING last_value
            "#,
        )
        .bind(period.to_string())
        .fetch_one(&self.pool)
        .await?;

        if last_value > i64::from(SEQUENCE_MAX) {
            return Err(LedgerError::SequenceExhausted { period });
        }
        Ok(InvoiceNumber::new(period, last_value as u32)?)
    }

    #[tracing::instrument(skip(self, order), fields(invoice = %order.invoice_number))]
    async fn record(&self, order: &Order) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO orders (invoice_number, order_date, total_cents, customer_name, customer_email)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(order.invoice_number.to_string())
        .bind(order.order_date)
        .bind(order.total_amount.cents())
        .bind(&order.customer_name)
        .bind(&order.customer_email)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // Primary-key violation means the number was already used.
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some("orders_pkey")
            {
                return LedgerError::DuplicateInvoice(order.invoice_number);
            }
            LedgerError::Database(e)
        })?;

        Ok(())
    }

    async fn get(&self, invoice_number: InvoiceNumber) -> Result<Option<Order>> {
        let row = sqlx::query(
            r#"
            SELECT invoice_number, order_date, total_cents, customer_name, customer_email
            FROM orders
            WHERE invoice_number = $1
            "#,
        )
        .bind(invoice_number.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query(
            r#"
            SELECT invoice_number, order_date, total_cents, customer_name, customer_email
            FROM orders
            ORDER BY order_date DESC, invoice_number DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }
}

#[async_trait]
impl NotificationLedger for PostgresLedger {
    async fn record_notification(&self, notification: &PrintNotification) -> Result<()> {
        let order_details = serde_json::to_value(&notification.order_details)?;

        sqlx::query(
            r#"
            INSERT INTO print_notifications
                (id, invoice_number, order_date, customer_name, customer_email,
                 total_print_cost_cents, order_details)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(notification.id.as_uuid())
        .bind(notification.invoice_number.to_string())
        .bind(notification.order_date)
        .bind(&notification.customer_name)
        .bind(&notification.customer_email)
        .bind(notification.total_print_cost.cents())
        .bind(order_details)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_notification(&self, id: NotificationId) -> Result<Option<PrintNotification>> {
        let row = sqlx::query(
            r#"
            SELECT id, invoice_number, order_date, customer_name, customer_email,
                   total_print_cost_cents, order_details
            FROM print_notifications
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_notification).transpose()
    }

    async fn list_notifications(&self) -> Result<Vec<PrintNotification>> {
        let rows = sqlx::query(
            r#"
            SELECT id, invoice_number, order_date, customer_name, customer_email,
                   total_print_cost_cents, order_details
            FROM print_notifications
            ORDER BY order_date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_notification).collect()
    }
}
