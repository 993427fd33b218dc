//! Pure shipping fee calculator

use sf_shared::config::{RegionKind, SurchargePolicy};

use crate::domain::value_objects::shipping::{ShippingFeeBreakdown, ShippingSettings, ZipcodeTable};

/// Calculate the shipping fee for an order.
///
/// The caller is responsible for rejecting negative amounts and malformed
/// zipcodes. Calling this twice with the same input yields the same output.
///
/// # Arguments
///
/// * `order_amount` - Order total in won
/// * `zipcode` - 5-digit destination zipcode
/// * `settings` - Base fee, free-shipping threshold and surcharge policy
/// * `table` - Remote-area zipcode table
pub fn calculate_shipping_fee(
    order_amount: i64,
    zipcode: &str,
    settings: &ShippingSettings,
    table: &ZipcodeTable,
) -> ShippingFeeBreakdown {
    let region = table.lookup(zipcode);
    let is_jeju = matches!(region, Some(entry) if entry.region == RegionKind::Jeju);
    let is_mountain = matches!(region, Some(entry) if entry.region == RegionKind::Mountain);
    let surcharge = region.map(|entry| entry.additional_fee.max(0)).unwrap_or(0);

    let is_free_shipping = order_amount >= settings.free_shipping_threshold;
    let base_shipping_fee = if is_free_shipping {
        0
    } else {
        settings.base_fee.max(0)
    };

    let surcharge_waived = is_free_shipping
        && surcharge > 0
        && settings.surcharge_policy == SurchargePolicy::WaiveWithFreeShipping;
    let additional_fee = if surcharge_waived { 0 } else { surcharge };

    let message = describe(
        is_free_shipping,
        base_shipping_fee,
        region.map(|entry| entry.region),
        additional_fee,
        surcharge_waived,
    );

    ShippingFeeBreakdown {
        base_shipping_fee,
        additional_fee,
        total_shipping_fee: base_shipping_fee + additional_fee,
        is_free_shipping,
        is_jeju,
        is_mountain,
        message,
    }
}

fn describe(
    is_free_shipping: bool,
    base_shipping_fee: i64,
    region: Option<RegionKind>,
    additional_fee: i64,
    surcharge_waived: bool,
) -> String {
    let mut message = if is_free_shipping {
        String::from("Free shipping applied")
    } else {
        format!("Shipping fee {} won", format_won(base_shipping_fee))
    };

    match region {
        Some(region) if surcharge_waived => {
            message.push_str(&format!("; {} surcharge waived", region_label(region)));
        }
        Some(region) if additional_fee > 0 => {
            message.push_str(&format!(
                "; {} surcharge of {} won applied",
                region_label(region),
                format_won(additional_fee)
            ));
        }
        _ => {}
    }

    message
}

fn region_label(region: RegionKind) -> &'static str {
    match region {
        RegionKind::Jeju => "Jeju island",
        RegionKind::Mountain => "Mountain area",
    }
}

/// Format an amount with thousands separators (e.g. 3,500)
pub fn format_won(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        grouped.insert(0, '-');
    }
    grouped
}
