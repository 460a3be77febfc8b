//! # Cart Aggregator
//!
//! Owns the ordered collection of priced lines for the in-progress sale.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Cart Operations                               │
//! │                                                                     │
//! │  Operator Action            Cart Operation        Row Change        │
//! │  ───────────────            ──────────────        ──────────        │
//! │  Pick item / price line ──► push(line)       ───► lines.push        │
//! │  Change quantity        ──► set_quantity(i)  ───► clamp ≥ 1         │
//! │  Edit dimensions        ──► set_dimensions(i)───► full reprice      │
//! │  Toggle waste           ──► set_waste(i)     ───► full reprice      │
//! │  Toggle a service       ──► toggle_service(i)───► full reprice      │
//! │  Remove row             ──► remove(i)        ───► lines.remove      │
//! │                                                                     │
//! │  total_amount() is ALWAYS derived from the rows — never stored,     │
//! │  so it can never drift from the row data.                           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Row Identity
//! A cart row is addressed by its position. The same catalog item may appear
//! as several rows with different configurations (two banner cuts of
//! different sizes are different rows), so positions — not catalog ids —
//! identify rows. Order is user-visible (receipt layout) but irrelevant to
//! totals.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{LinePricing, PricedLine};
use crate::types::{Dimensions, Service, TransactionLine};
use crate::validation::validate_dimensions;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

/// The in-progress sale: an ordered sequence of priced lines.
///
/// Purely in-memory; nothing here persists anything.
#[derive(Debug, Clone, Serialize)]
pub struct Cart {
    lines: Vec<PricedLine>,

    /// When the cart was created/last cleared.
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Read access to the rows, in receipt order.
    pub fn lines(&self) -> &[PricedLine] {
        &self.lines
    }

    /// Appends a priced line as a new row.
    ///
    /// Duplicate catalog items stay distinct rows; there is no
    /// merge-by-item-id here.
    pub fn push(&mut self, line: PricedLine) -> CoreResult<()> {
        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }
        self.lines.push(line);
        Ok(())
    }

    /// Removes the row at `index`.
    pub fn remove(&mut self, index: usize) -> CoreResult<PricedLine> {
        if index >= self.lines.len() {
            return Err(CoreError::LineNotFound { index });
        }
        Ok(self.lines.remove(index))
    }

    /// Sets a row's quantity, clamped to a minimum of 1.
    pub fn set_quantity(&mut self, index: usize, quantity: i64) -> CoreResult<()> {
        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }
        let line = self.line_mut(index)?;
        line.quantity = quantity.max(1);
        Ok(())
    }

    /// Increments a row's quantity by one.
    pub fn increment_quantity(&mut self, index: usize) -> CoreResult<()> {
        let current = self.line(index)?.quantity;
        self.set_quantity(index, current + 1)
    }

    /// Decrements a row's quantity by one; never drops below 1.
    pub fn decrement_quantity(&mut self, index: usize) -> CoreResult<()> {
        let current = self.line(index)?.quantity;
        self.set_quantity(index, current - 1)
    }

    /// Replaces the main dimensions of an area-priced row and reprices it.
    ///
    /// This is a full recomputation through the pricing basis, not a field
    /// patch: the row's unit price can never disagree with its dimensions.
    pub fn set_dimensions(&mut self, index: usize, dimensions: Dimensions) -> CoreResult<()> {
        validate_dimensions(&dimensions, "main")?;
        let line = self.line_mut(index)?;
        match &mut line.pricing {
            LinePricing::Area {
                dimensions: current,
                ..
            } => {
                *current = dimensions;
                line.reprice();
                Ok(())
            }
            _ => Err(CoreError::NotAreaPriced { index }),
        }
    }

    /// Enables (`Some`) or disables (`None`) waste on an area-priced row and
    /// reprices it. Enabled waste must have strictly positive sides.
    pub fn set_waste(&mut self, index: usize, waste: Option<Dimensions>) -> CoreResult<()> {
        if let Some(w) = &waste {
            validate_dimensions(w, "wasted")?;
        }
        let line = self.line_mut(index)?;
        match &mut line.pricing {
            LinePricing::Area { waste: current, .. } => {
                *current = waste;
                line.reprice();
                Ok(())
            }
            _ => Err(CoreError::NotAreaPriced { index }),
        }
    }

    /// Toggles a service on a fixed-priced catalog row and reprices it.
    ///
    /// The row keeps by-value copies: toggling on stores a copy of
    /// `service`, toggling off removes the copy with the same id.
    pub fn toggle_service(&mut self, index: usize, service: &Service) -> CoreResult<()> {
        let line = self.line_mut(index)?;
        if !matches!(line.pricing, LinePricing::Fixed { .. }) {
            return Err(CoreError::NotServicePriced { index });
        }

        if let Some(pos) = line.services.iter().position(|s| s.id == service.id) {
            line.services.remove(pos);
        } else {
            line.services.push(service.clone());
        }
        line.reprice();
        Ok(())
    }

    /// Derived grand total: `Σ unit_price × quantity` over all rows.
    pub fn total_amount(&self) -> Money {
        self.lines.iter().map(|l| l.line_total()).sum()
    }

    /// Number of rows.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all rows.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Checks if the cart has no rows.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Clears all rows.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.created_at = Utc::now();
    }

    /// Freezes every row into an immutable transaction line snapshot, in
    /// receipt order.
    pub fn snapshot(&self) -> Vec<TransactionLine> {
        self.lines.iter().map(PricedLine::to_snapshot).collect()
    }

    fn line(&self, index: usize) -> CoreResult<&PricedLine> {
        self.lines.get(index).ok_or(CoreError::LineNotFound { index })
    }

    fn line_mut(&mut self, index: usize) -> CoreResult<&mut PricedLine> {
        self.lines
            .get_mut(index)
            .ok_or(CoreError::LineNotFound { index })
    }
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{price_line, LineConfig};
    use crate::types::{CatalogItem, PricingMethod};
    use rust_decimal_macros::dec;

    fn fixed_item(id: &str, price: rust_decimal::Decimal) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            name: format!("Item {id}"),
            category: "Test".to_string(),
            pricing_method: PricingMethod::Fixed,
            price: Money::new(price),
            services: vec![Service {
                id: "svc-1".to_string(),
                name: "Eyelets".to_string(),
                price: Money::new(dec!(1.5)),
            }],
            is_variable: false,
        }
    }

    fn area_item(id: &str, rate: rust_decimal::Decimal) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            name: format!("Material {id}"),
            category: "Test".to_string(),
            pricing_method: PricingMethod::Area,
            price: Money::new(rate),
            services: Vec::new(),
            is_variable: false,
        }
    }

    fn fixed_line(id: &str, price: rust_decimal::Decimal) -> PricedLine {
        price_line(Some(&fixed_item(id, price)), &LineConfig::plain()).unwrap()
    }

    fn area_line(rate: rust_decimal::Decimal, w: rust_decimal::Decimal, h: rust_decimal::Decimal) -> PricedLine {
        let item = area_item("a1", rate);
        let mut config = LineConfig::plain();
        config.dimensions = Some(Dimensions::new(w, h));
        price_line(Some(&item), &config).unwrap()
    }

    #[test]
    fn test_duplicate_catalog_items_are_distinct_rows() {
        let mut cart = Cart::new();
        cart.push(fixed_line("x", dec!(5))).unwrap();
        cart.push(fixed_line("x", dec!(5))).unwrap();

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_amount(), Money::new(dec!(10)));
    }

    #[test]
    fn test_remove_by_position() {
        let mut cart = Cart::new();
        cart.push(fixed_line("a", dec!(1))).unwrap();
        cart.push(fixed_line("b", dec!(2))).unwrap();

        cart.remove(0).unwrap();
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_amount(), Money::new(dec!(2)));

        assert!(matches!(
            cart.remove(5),
            Err(CoreError::LineNotFound { index: 5 })
        ));
    }

    #[test]
    fn test_quantity_clamps_to_one() {
        let mut cart = Cart::new();
        cart.push(fixed_line("a", dec!(3))).unwrap();

        cart.set_quantity(0, 4).unwrap();
        assert_eq!(cart.total_amount(), Money::new(dec!(12)));

        cart.set_quantity(0, 0).unwrap();
        assert_eq!(cart.lines()[0].quantity, 1);

        cart.set_quantity(0, -7).unwrap();
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_decrement_never_drops_below_one() {
        let mut cart = Cart::new();
        cart.push(fixed_line("a", dec!(3))).unwrap();

        cart.decrement_quantity(0).unwrap();
        assert_eq!(cart.lines()[0].quantity, 1);

        cart.increment_quantity(0).unwrap();
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_set_dimensions_reprices_row() {
        let mut cart = Cart::new();
        cart.push(area_line(dec!(10), dec!(2), dec!(3))).unwrap();
        assert_eq!(cart.total_amount(), Money::new(dec!(60)));

        cart.set_dimensions(0, Dimensions::new(dec!(4), dec!(5))).unwrap();
        assert_eq!(cart.total_amount(), Money::new(dec!(200)));
    }

    #[test]
    fn test_set_dimensions_rejected_on_fixed_row() {
        let mut cart = Cart::new();
        cart.push(fixed_line("a", dec!(3))).unwrap();

        let err = cart
            .set_dimensions(0, Dimensions::new(dec!(1), dec!(1)))
            .unwrap_err();
        assert!(matches!(err, CoreError::NotAreaPriced { index: 0 }));
    }

    #[test]
    fn test_waste_toggle_reprices() {
        let mut cart = Cart::new();
        cart.push(area_line(dec!(10), dec!(2), dec!(3))).unwrap();

        cart.set_waste(0, Some(Dimensions::new(dec!(1), dec!(1)))).unwrap();
        assert_eq!(cart.total_amount(), Money::new(dec!(70)));

        cart.set_waste(0, None).unwrap();
        assert_eq!(cart.total_amount(), Money::new(dec!(60)));

        assert!(cart
            .set_waste(0, Some(Dimensions::new(dec!(0), dec!(1))))
            .is_err());
    }

    #[test]
    fn test_toggle_service_on_and_off() {
        let mut cart = Cart::new();
        cart.push(fixed_line("a", dec!(10))).unwrap();
        let eyelets = Service {
            id: "svc-1".to_string(),
            name: "Eyelets".to_string(),
            price: Money::new(dec!(1.5)),
        };

        cart.toggle_service(0, &eyelets).unwrap();
        assert_eq!(cart.total_amount(), Money::new(dec!(11.5)));

        cart.toggle_service(0, &eyelets).unwrap();
        assert_eq!(cart.total_amount(), Money::new(dec!(10)));
    }

    #[test]
    fn test_toggle_service_rejected_on_area_row() {
        let mut cart = Cart::new();
        cart.push(area_line(dec!(10), dec!(2), dec!(3))).unwrap();
        let svc = Service {
            id: "svc-1".to_string(),
            name: "Eyelets".to_string(),
            price: Money::new(dec!(1.5)),
        };

        assert!(matches!(
            cart.toggle_service(0, &svc),
            Err(CoreError::NotServicePriced { .. })
        ));
    }

    #[test]
    fn test_total_is_derived_per_quantity() {
        let mut cart = Cart::new();
        cart.push(fixed_line("a", dec!(2.5))).unwrap();
        cart.push(area_line(dec!(10), dec!(2), dec!(3))).unwrap();
        cart.set_quantity(0, 3).unwrap();

        // 3 × 2.5 + 60
        assert_eq!(cart.total_amount(), Money::new(dec!(67.5)));
        assert_eq!(cart.total_quantity(), 4);
    }

    #[test]
    fn test_clear_and_empty() {
        let mut cart = Cart::new();
        assert!(cart.is_empty());
        assert!(cart.total_amount().is_zero());

        cart.push(fixed_line("a", dec!(1))).unwrap();
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_snapshot_preserves_order_and_totals() {
        let mut cart = Cart::new();
        cart.push(fixed_line("a", dec!(2))).unwrap();
        cart.push(area_line(dec!(10), dec!(2), dec!(3))).unwrap();
        cart.set_quantity(0, 2).unwrap();

        let snapshot = cart.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].line_total, Money::new(dec!(4)));
        assert_eq!(snapshot[1].line_total, Money::new(dec!(60)));

        let snapshot_total: Money = snapshot.iter().map(|l| &l.line_total).sum();
        assert_eq!(snapshot_total, cart.total_amount());
    }

    #[test]
    fn test_cart_line_cap() {
        let mut cart = Cart::new();
        for _ in 0..MAX_CART_LINES {
            cart.push(fixed_line("a", dec!(1))).unwrap();
        }
        assert!(matches!(
            cart.push(fixed_line("a", dec!(1))),
            Err(CoreError::CartTooLarge { .. })
        ));
    }
}
