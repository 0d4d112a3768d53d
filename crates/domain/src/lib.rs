//! Pure domain layer for the order-processing backend.
//!
//! Everything in this crate is synchronous and side-effect free: money
//! arithmetic, cart validation, discount-tier resolution, the pricing
//! calculator, and the record types the ledger persists.

pub mod cart;
pub mod discount;
pub mod error;
pub mod money;
pub mod pricing;
pub mod records;

pub use cart::{Cart, Customer, LineItem};
pub use discount::{DiscountRate, DiscountTiers};
pub use error::{CartError, PolicyError};
pub use money::Money;
pub use pricing::PricingResult;
pub use records::{NotificationId, Order, PrintNotification};
