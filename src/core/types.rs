use serde::Serialize;

// Rates and percentages are on a 0-100 scale; counts and prices are plain
// numbers. The engine imposes no domain restriction on any field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assumptions {
    pub audience_size: f64,
    pub reach_rate: f64,
    pub platform_ctr: f64,
    pub email_subscribers: f64,
    pub email_ctr: f64,
    pub platform_cvr: f64,
    pub email_cvr: f64,
    pub fe_price: f64,
    pub bump_price: f64,
    pub bump_take_rate: f64,
    pub upsell_price: f64,
    pub upsell_take_rate: f64,
    pub refund_rate: f64,
    pub launches_per_year: f64,
}

// Independent +10% what-if flags; any subset may be active at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Toggles {
    pub email_buyers_up10: bool,
    pub platform_buyers_up10: bool,
    pub bump_take_rate_up10: bool,
    pub upsell_take_rate_up10: bool,
}

// Buyer counts hold whole numbers after per-channel rounding.
// Pct-of-reach fields are NaN when the reach denominator is zero;
// serde_json renders NaN as null and the display layer shows a dash.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelResult {
    pub platform_reach: f64,
    pub email_reach: f64,
    pub total_reach: f64,
    pub platform_buyers: f64,
    pub email_buyers: f64,
    pub total_buyers: f64,
    pub platform_buyer_pct_of_reach: f64,
    pub email_buyer_pct_of_reach: f64,
    pub total_buyer_pct_of_reach: f64,
    pub fe_revenue: f64,
    pub bump_revenue: f64,
    pub upsell_revenue: f64,
    pub gross_subtotal: f64,
    pub refunds: f64,
    pub gross_after_refunds: f64,
    pub annual_gross: f64,
    pub bump_buyers: f64,
    pub upsell_buyers: f64,
}
