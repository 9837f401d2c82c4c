//! Display math for prices and discounts.
//!
//! The store persists `price` and, when the admin supplied one, an
//! `original_price`. Everything else here is presentation arithmetic: a
//! synthesized strike-through figure is computed per render and must never
//! travel back into a store write.

use crate::domain::entities::ProductRecord;

/// Markup applied when a product has no stored `original_price` and the
/// storefront still wants a strike-through figure next to the offer price.
pub const DISPLAY_MARKUP: f64 = 1.2;

/// Percentage badge for a genuine discount.
///
/// Returns `None` unless `original_price` is present and strictly greater
/// than `price` — a synthesized markup never earns a badge.
pub fn discount_percent(product: &ProductRecord) -> Option<u8> {
    let original = product.original_price?;
    if !(original > product.price) || original <= 0.0 {
        return None;
    }
    let percent = (100.0 - (product.price / original) * 100.0).round();
    Some(percent as u8)
}

/// Strike-through price for display.
///
/// Falls back to `price × 1.2` when no `original_price` was stored. The
/// fallback is transient display data only.
pub fn display_original_price(product: &ProductRecord) -> f64 {
    product
        .original_price
        .unwrap_or(product.price * DISPLAY_MARKUP)
}
