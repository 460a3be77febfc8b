//! # Pricing Calculator
//!
//! The pure function at the heart of the engine: a catalog item plus a
//! sale-time configuration becomes a priced cart line.
//!
//! ## Pricing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     price_line(catalog, config)                     │
//! │                                                                     │
//! │  catalog = None, or item.is_variable                                │
//! │  └── AdHoc: operator name + operator price (validated), no services │
//! │                                                                     │
//! │  item.pricing_method = Fixed                                        │
//! │  └── Fixed: catalog price + Σ selected service prices               │
//! │                                                                     │
//! │  item.pricing_method = Area                                         │
//! │  └── Area: (w×h + waste_w×waste_h) × price per area, no services    │
//! │                                                                     │
//! │  unit_price = basis + services   (per UNIT — the cart multiplies    │
//! │  by quantity)                                                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The returned [`PricedLine`] can only change through its own mutators,
//! each of which re-derives `unit_price` from the configuration. The price
//! can never drift from the data it was computed from.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CatalogItem, Dimensions, PricingMethod, Service, TransactionLine};
use crate::validation::{
    validate_dimensions, validate_item_name, validate_operator_price, validate_quantity,
};
use crate::MAX_LINE_QUANTITY;

// =============================================================================
// Line Configuration
// =============================================================================

/// The sale-time input the operator supplies for one line.
#[derive(Debug, Clone, Default)]
pub struct LineConfig {
    /// Requested quantity; `0` means "default to 1".
    pub quantity: i64,

    /// Main dimensions — required for area-priced items.
    pub dimensions: Option<Dimensions>,

    /// Wasted-material dimensions. `None` means waste is disabled, which is
    /// a different condition from waste with a zero side (invalid).
    pub waste: Option<Dimensions>,

    /// Ids of selected services, a subset of the catalog item's services.
    pub service_ids: Vec<String>,

    /// Operator-supplied name, for variable/ad-hoc lines.
    pub operator_name: Option<String>,

    /// Operator-supplied price as raw text, for variable/ad-hoc lines.
    pub operator_price: Option<String>,
}

impl LineConfig {
    /// Configuration for a plain fixed-price line: quantity 1, no extras.
    pub fn plain() -> Self {
        LineConfig {
            quantity: 1,
            ..LineConfig::default()
        }
    }
}

// =============================================================================
// Line Pricing
// =============================================================================

/// The resolved pricing basis of one line, as a tagged variant.
///
/// One tag per shape replaces a struct full of flag-gated optional fields:
/// the calculator and the cart mutators dispatch on the tag and the invalid
/// combinations (services on an area line, dimensions on a fixed line)
/// become unrepresentable paths instead of runtime flag checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinePricing {
    /// Flat catalog unit price.
    Fixed { unit_price: Money },

    /// Area pricing: `(dimensions.area + waste.area) × rate`.
    Area {
        /// Price per unit area, from the catalog.
        rate: Money,
        dimensions: Dimensions,
        waste: Option<Dimensions>,
    },

    /// Operator-priced line (variable catalog item or fully improvised).
    /// Behaves as fixed pricing; area semantics are unavailable.
    AdHoc { unit_price: Money },
}

impl LinePricing {
    /// The per-unit price basis, before services.
    pub fn base_unit_price(&self) -> Money {
        match self {
            LinePricing::Fixed { unit_price } | LinePricing::AdHoc { unit_price } => *unit_price,
            LinePricing::Area {
                rate,
                dimensions,
                waste,
            } => {
                let waste_area = waste.map(|w| w.area()).unwrap_or(Decimal::ZERO);
                *rate * (dimensions.area() + waste_area)
            }
        }
    }
}

// =============================================================================
// Priced Line
// =============================================================================

/// One priced row of the cart: the output of the pricing calculator.
///
/// `unit_price` is private and re-derived by [`PricedLine::reprice`] after
/// every mutation — it is never written directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedLine {
    pub id: String,

    /// Catalog item the row came from; `None` for improvised lines.
    pub catalog_item_id: Option<String>,

    /// Resolved display name.
    pub name: String,

    /// Pricing basis the unit price derives from.
    pub pricing: LinePricing,

    /// By-value copies of the selected services (fixed lines only).
    pub services: Vec<Service>,

    /// Units sold; always ≥ 1.
    pub quantity: i64,

    /// Derived: `pricing.base_unit_price() + Σ services.price`, per unit.
    unit_price: Money,
}

impl PricedLine {
    fn new(
        catalog_item_id: Option<String>,
        name: String,
        pricing: LinePricing,
        services: Vec<Service>,
        quantity: i64,
    ) -> Self {
        let mut line = PricedLine {
            id: Uuid::new_v4().to_string(),
            catalog_item_id,
            name,
            pricing,
            services,
            quantity,
            unit_price: Money::zero(),
        };
        line.reprice();
        line
    }

    /// Per-unit price, services and area included.
    #[inline]
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// `unit_price × quantity`.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }

    /// Re-derives `unit_price` from the pricing basis and service copies.
    pub(crate) fn reprice(&mut self) {
        let services_total: Money = self.services.iter().map(|s| &s.price).sum();
        self.unit_price = self.pricing.base_unit_price() + services_total;
    }

    /// Freezes this row into an immutable transaction line snapshot.
    pub fn to_snapshot(&self) -> TransactionLine {
        let (dimensions, waste) = match &self.pricing {
            LinePricing::Area {
                dimensions, waste, ..
            } => (Some(*dimensions), *waste),
            _ => (None, None),
        };

        TransactionLine {
            id: Uuid::new_v4().to_string(),
            catalog_item_id: self.catalog_item_id.clone(),
            name: self.name.clone(),
            unit_price: self.unit_price,
            quantity: self.quantity,
            line_total: self.line_total(),
            dimensions,
            waste,
            services: self.services.clone(),
        }
    }
}

// =============================================================================
// The Calculator
// =============================================================================

/// Prices one line: catalog item + configuration → [`PricedLine`].
///
/// Pure and deterministic. `catalog = None` prices a fully improvised
/// (ad-hoc) line; a catalog item with `is_variable` set takes the ad-hoc
/// path too, because its name and price come from the operator.
///
/// ```rust
/// use marlin_core::pricing::{price_line, LineConfig};
///
/// let mut config = LineConfig::plain();
/// config.operator_name = Some("Delivery".into());
/// config.operator_price = Some("15".into());
///
/// let line = price_line(None, &config).unwrap();
/// assert_eq!(line.unit_price().to_string(), "15.00");
/// ```
pub fn price_line(catalog: Option<&CatalogItem>, config: &LineConfig) -> CoreResult<PricedLine> {
    let quantity = resolve_quantity(config.quantity)?;

    let is_ad_hoc = catalog.map_or(true, |item| item.is_variable);
    if is_ad_hoc {
        return price_ad_hoc(catalog, config, quantity);
    }

    // Not ad-hoc: a catalog item is present.
    let item = catalog.ok_or(CoreError::Validation(
        crate::error::ValidationError::Required {
            field: "catalog item".to_string(),
        },
    ))?;

    match item.pricing_method {
        PricingMethod::Fixed => price_fixed(item, config, quantity),
        PricingMethod::Area => price_area(item, config, quantity),
    }
}

/// Quantity defaults to 1 and is clamped to a minimum of 1; values over the
/// cap are rejected rather than clamped down.
fn resolve_quantity(requested: i64) -> CoreResult<i64> {
    let quantity = requested.max(1);
    if validate_quantity(quantity).is_err() {
        return Err(CoreError::QuantityTooLarge {
            requested,
            max: MAX_LINE_QUANTITY,
        });
    }
    Ok(quantity)
}

fn price_ad_hoc(
    catalog: Option<&CatalogItem>,
    config: &LineConfig,
    quantity: i64,
) -> CoreResult<PricedLine> {
    let name = validate_item_name(config.operator_name.as_deref().unwrap_or(""))?;
    let unit_price = validate_operator_price(config.operator_price.as_deref().unwrap_or(""))?;

    if !config.service_ids.is_empty() {
        return Err(CoreError::ServicesNotSupported { line: name });
    }

    Ok(PricedLine::new(
        catalog.map(|item| item.id.clone()),
        name,
        LinePricing::AdHoc { unit_price },
        Vec::new(),
        quantity,
    ))
}

fn price_fixed(item: &CatalogItem, config: &LineConfig, quantity: i64) -> CoreResult<PricedLine> {
    let mut services = Vec::with_capacity(config.service_ids.len());
    for id in &config.service_ids {
        let service = item
            .service(id)
            .ok_or_else(|| CoreError::ServiceNotOffered {
                item: item.name.clone(),
                service: id.clone(),
            })?;
        services.push(service.clone());
    }

    Ok(PricedLine::new(
        Some(item.id.clone()),
        item.name.clone(),
        LinePricing::Fixed {
            unit_price: item.price,
        },
        services,
        quantity,
    ))
}

fn price_area(item: &CatalogItem, config: &LineConfig, quantity: i64) -> CoreResult<PricedLine> {
    let dimensions = config.dimensions.ok_or(CoreError::Validation(
        crate::error::ValidationError::Required {
            field: "dimensions".to_string(),
        },
    ))?;
    validate_dimensions(&dimensions, "main")?;

    if let Some(waste) = &config.waste {
        validate_dimensions(waste, "wasted")?;
    }

    if !config.service_ids.is_empty() {
        return Err(CoreError::ServicesNotSupported {
            line: item.name.clone(),
        });
    }

    Ok(PricedLine::new(
        Some(item.id.clone()),
        item.name.clone(),
        LinePricing::Area {
            rate: item.price,
            dimensions,
            waste: config.waste,
        },
        Vec::new(),
        quantity,
    ))
}

// =============================================================================
// Unit Tests
// =============================================================================
