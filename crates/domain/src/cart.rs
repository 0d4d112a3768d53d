//! Cart line items and customer identity as submitted at checkout.

use serde::{Deserialize, Serialize};

use crate::error::CartError;
use crate::money::Money;

/// One cart entry: a catalog item at a quantity, with an optional
/// physical-production cost.
///
/// Line items have no identity beyond the request; they are persisted
/// only inside a print notification's cart snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    #[serde(default)]
    pub print_unit_cost: Money,
    #[serde(default)]
    pub requires_print: bool,
}

impl LineItem {
    /// Creates a plain line item without production cost.
    pub fn new(name: impl Into<String>, unit_price: Money, quantity: u32) -> Self {
        Self {
            name: name.into(),
            unit_price,
            quantity,
            print_unit_cost: Money::zero(),
            requires_print: false,
        }
    }

    /// Creates a line item that requires physical production.
    pub fn with_print(
        name: impl Into<String>,
        unit_price: Money,
        quantity: u32,
        print_unit_cost: Money,
    ) -> Self {
        Self {
            name: name.into(),
            unit_price,
            quantity,
            print_unit_cost,
            requires_print: true,
        }
    }

    /// Returns the catalog price for this line (unit price x quantity).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }

    /// Returns the production cost for this line (print cost x quantity).
    pub fn print_total(&self) -> Money {
        self.print_unit_cost.multiply(self.quantity)
    }
}

/// A submitted cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<LineItem>,
}

impl Cart {
    pub fn new(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    /// Total quantity across all line items; drives tier resolution.
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Returns true if any line item requires physical production.
    pub fn requires_print(&self) -> bool {
        self.items.iter().any(|i| i.requires_print)
    }

    /// Validates the cart before any pricing or allocation happens.
    pub fn validate(&self) -> Result<(), CartError> {
        if self.items.is_empty() {
            return Err(CartError::Empty);
        }
        for item in &self.items {
            if item.name.trim().is_empty() {
                return Err(CartError::BlankItemName);
            }
            if item.quantity == 0 {
                return Err(CartError::InvalidQuantity {
                    item: item.name.clone(),
                    quantity: item.quantity,
                });
            }
            if item.unit_price.is_negative() {
                return Err(CartError::InvalidPrice {
                    item: item.name.clone(),
                    price: item.unit_price.cents(),
                });
            }
            if item.print_unit_cost.is_negative() {
                return Err(CartError::InvalidPrintCost {
                    item: item.name.clone(),
                    cost: item.print_unit_cost.cents(),
                });
            }
        }
        Ok(())
    }
}

/// Customer identity attached to a checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
}

impl Customer {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Validates that a name is present and the email is plausible.
    pub fn validate(&self) -> Result<(), CartError> {
        if self.name.trim().is_empty() {
            return Err(CartError::CustomerNameRequired);
        }
        // Transport-level validation happens in the mail collaborator;
        // this only rejects obviously broken input.
        let plausible = self
            .email
            .split_once('@')
            .is_some_and(|(local, rest)| !local.is_empty() && rest.contains('.'));
        if !plausible {
            return Err(CartError::InvalidCustomerEmail {
                email: self.email.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hat(quantity: u32) -> LineItem {
        LineItem::new("Indiana Jones Hat", Money::from_dollars(100), quantity)
    }

    #[test]
    fn test_line_totals() {
        let item = LineItem::with_print(
            "Lightsaber",
            Money::from_cents(10_000),
            3,
            Money::from_cents(2_000),
        );
        assert_eq!(item.line_total().cents(), 30_000);
        assert_eq!(item.print_total().cents(), 6_000);
    }

    #[test]
    fn test_total_quantity() {
        let cart = Cart::new(vec![hat(2), hat(3)]);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_requires_print() {
        let cart = Cart::new(vec![hat(1)]);
        assert!(!cart.requires_print());

        let cart = Cart::new(vec![
            hat(1),
            LineItem::with_print("Poster", Money::from_cents(500), 1, Money::from_cents(100)),
        ]);
        assert!(cart.requires_print());
    }

    #[test]
    fn test_empty_cart_rejected() {
        assert_eq!(Cart::default().validate(), Err(CartError::Empty));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let cart = Cart::new(vec![hat(0)]);
        assert!(matches!(
            cart.validate(),
            Err(CartError::InvalidQuantity { quantity: 0, .. })
        ));
    }

    #[test]
    fn test_negative_price_rejected() {
        let cart = Cart::new(vec![LineItem::new("Hat", Money::from_cents(-1), 1)]);
        assert!(matches!(
            cart.validate(),
            Err(CartError::InvalidPrice { price: -1, .. })
        ));
    }

    #[test]
    fn test_negative_print_cost_rejected() {
        let mut item = hat(1);
        item.print_unit_cost = Money::from_cents(-50);
        let cart = Cart::new(vec![item]);
        assert!(matches!(
            cart.validate(),
            Err(CartError::InvalidPrintCost { cost: -50, .. })
        ));
    }

    #[test]
    fn test_blank_name_rejected() {
        let cart = Cart::new(vec![LineItem::new("  ", Money::from_cents(100), 1)]);
        assert_eq!(cart.validate(), Err(CartError::BlankItemName));
    }

    #[test]
    fn test_valid_cart() {
        let cart = Cart::new(vec![hat(2)]);
        assert!(cart.validate().is_ok());
    }

    #[test]
    fn test_customer_validation() {
        assert!(Customer::new("Ada", "ada@example.com").validate().is_ok());
        assert_eq!(
            Customer::new("", "ada@example.com").validate(),
            Err(CartError::CustomerNameRequired)
        );
        assert!(matches!(
            Customer::new("Ada", "not-an-email").validate(),
            Err(CartError::InvalidCustomerEmail { .. })
        ));
        assert!(matches!(
            Customer::new("Ada", "@example.com").validate(),
            Err(CartError::InvalidCustomerEmail { .. })
        ));
    }

    #[test]
    fn test_line_item_serialization_defaults() {
        let json = r#"{"name":"Hat","unit_price":10000,"quantity":2}"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.print_unit_cost, Money::zero());
        assert!(!item.requires_print);
    }
}
