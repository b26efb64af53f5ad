use super::types::{Assumptions, FunnelResult, Toggles};

// Half-up rounding, matching the reference behaviour of rounding buyer
// estimates to whole people. f64::round ties away from zero instead.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn pct_of(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator * 100.0
    } else {
        f64::NAN
    }
}

pub fn compute(assumptions: &Assumptions, toggles: Toggles) -> FunnelResult {
    let platform_reach = assumptions.audience_size * (assumptions.reach_rate / 100.0);
    let email_reach = assumptions.email_subscribers * (assumptions.email_ctr / 100.0);

    let mut platform_buyer_raw =
        platform_reach * (assumptions.platform_ctr / 100.0) * (assumptions.platform_cvr / 100.0);
    let mut email_buyer_raw = email_reach * (assumptions.email_cvr / 100.0);

    // What-if multipliers apply to the raw fractional estimates, before
    // rounding; order is observable for small buyer counts.
    if toggles.platform_buyers_up10 {
        platform_buyer_raw *= 1.1;
    }
    if toggles.email_buyers_up10 {
        email_buyer_raw *= 1.1;
    }

    // Each channel rounds independently; the total is the sum of the
    // rounded counts, not the rounded sum.
    let platform_buyers = round_half_up(platform_buyer_raw);
    let email_buyers = round_half_up(email_buyer_raw);
    let total_buyers = platform_buyers + email_buyers;

    let adj_bump_take = if toggles.bump_take_rate_up10 {
        assumptions.bump_take_rate * 1.1
    } else {
        assumptions.bump_take_rate
    };
    let adj_upsell_take = if toggles.upsell_take_rate_up10 {
        assumptions.upsell_take_rate * 1.1
    } else {
        assumptions.upsell_take_rate
    };

    // Bump and upsell attach to the combined buyer pool, not per channel.
    let bump_buyers = round_half_up(total_buyers * (adj_bump_take / 100.0));
    let upsell_buyers = round_half_up(total_buyers * (adj_upsell_take / 100.0));

    let fe_revenue = total_buyers * assumptions.fe_price;
    let bump_revenue = bump_buyers * assumptions.bump_price;
    let upsell_revenue = upsell_buyers * assumptions.upsell_price;

    let gross_subtotal = fe_revenue + bump_revenue + upsell_revenue;
    let refunds = gross_subtotal * (assumptions.refund_rate / 100.0);
    let gross_after_refunds = gross_subtotal - refunds;

    let annual_gross = gross_after_refunds * assumptions.launches_per_year;

    let total_reach = platform_reach + email_reach;

    FunnelResult {
        platform_reach,
        email_reach,
        total_reach,
        platform_buyers,
        email_buyers,
        total_buyers,
        platform_buyer_pct_of_reach: pct_of(platform_buyers, platform_reach),
        email_buyer_pct_of_reach: pct_of(email_buyers, email_reach),
        total_buyer_pct_of_reach: pct_of(total_buyers, total_reach),
        fe_revenue,
        bump_revenue,
        upsell_revenue,
        gross_subtotal,
        refunds,
        gross_after_refunds,
        annual_gross,
        bump_buyers,
        upsell_buyers,
    }
}
