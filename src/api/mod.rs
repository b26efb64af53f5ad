use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    Assumptions, FunnelResult, Toggles, compute, format_count, format_currency, format_percent,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliAudienceTier {
    Micro,
    MidTier,
    Macro,
    Mega,
}

impl CliAudienceTier {
    // Presets overwrite only the audience size; every other assumption
    // keeps its current value.
    fn audience_size(self) -> f64 {
        match self {
            CliAudienceTier::Micro => 10_000.0,
            CliAudienceTier::MidTier => 100_000.0,
            CliAudienceTier::Macro => 500_000.0,
            CliAudienceTier::Mega => 1_000_000.0,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiAudienceTier {
    Micro,
    #[serde(alias = "midTier", alias = "mid_tier")]
    MidTier,
    Macro,
    Mega,
}

impl From<ApiAudienceTier> for CliAudienceTier {
    fn from(value: ApiAudienceTier) -> Self {
        match value {
            ApiAudienceTier::Micro => CliAudienceTier::Micro,
            ApiAudienceTier::MidTier => CliAudienceTier::MidTier,
            ApiAudienceTier::Macro => CliAudienceTier::Macro,
            ApiAudienceTier::Mega => CliAudienceTier::Mega,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ComputePayload {
    audience_size: Option<f64>,
    audience_tier: Option<ApiAudienceTier>,
    reach_rate: Option<f64>,
    #[serde(alias = "platformCTR")]
    platform_ctr: Option<f64>,
    email_subscribers: Option<f64>,
    #[serde(alias = "emailCTR")]
    email_ctr: Option<f64>,
    #[serde(alias = "platformCVR")]
    platform_cvr: Option<f64>,
    #[serde(alias = "emailCVR")]
    email_cvr: Option<f64>,
    fe_price: Option<f64>,
    bump_price: Option<f64>,
    bump_take_rate: Option<f64>,
    upsell_price: Option<f64>,
    upsell_take_rate: Option<f64>,
    refund_rate: Option<f64>,
    launches_per_year: Option<f64>,

    email_buyers_up10: Option<bool>,
    platform_buyers_up10: Option<bool>,
    bump_take_rate_up10: Option<bool>,
    upsell_take_rate_up10: Option<bool>,
}

#[derive(Parser, Debug)]
#[command(
    name = "funnel",
    about = "Digital-product launch revenue calculator (front-end offer + order bump + upsell across platform and email channels)"
)]
struct Cli {
    #[arg(long, help = "Total platform audience; overrides --audience-tier")]
    audience_size: Option<f64>,
    #[arg(
        long,
        value_enum,
        help = "Audience size preset: micro (10k), mid-tier (100k), macro (500k), mega (1m)"
    )]
    audience_tier: Option<CliAudienceTier>,
    #[arg(
        long,
        default_value_t = 10.0,
        help = "Percent of the audience reached per promotion"
    )]
    reach_rate: f64,
    #[arg(
        long,
        default_value_t = 4.0,
        help = "Percent of platform reach that clicks through to the sales page"
    )]
    platform_ctr: f64,
    #[arg(long, default_value_t = 2500.0, help = "Email list size")]
    email_subscribers: f64,
    #[arg(
        long,
        default_value_t = 5.0,
        help = "Percent of subscribers that click the promo email"
    )]
    email_ctr: f64,
    #[arg(
        long,
        default_value_t = 2.5,
        help = "Percent of platform clickers that purchase"
    )]
    platform_cvr: f64,
    #[arg(
        long,
        default_value_t = 1.0,
        help = "Percent of email clickers that purchase"
    )]
    email_cvr: f64,
    #[arg(long, default_value_t = 37.0, help = "Front-end offer price")]
    fe_price: f64,
    #[arg(long, default_value_t = 22.0, help = "Order bump price")]
    bump_price: f64,
    #[arg(
        long,
        default_value_t = 30.0,
        help = "Percent of all buyers adding the order bump"
    )]
    bump_take_rate: f64,
    #[arg(long, default_value_t = 68.0, help = "Upsell offer price")]
    upsell_price: f64,
    #[arg(
        long,
        default_value_t = 20.0,
        help = "Percent of all buyers taking the upsell"
    )]
    upsell_take_rate: f64,
    #[arg(
        long,
        default_value_t = 2.0,
        help = "Percent of the gross subtotal refunded"
    )]
    refund_rate: f64,
    #[arg(long, default_value_t = 4.0, help = "Promotional launches per year")]
    launches_per_year: f64,

    #[arg(long, help = "What-if: increase email buyers by 10%")]
    email_buyers_up10: bool,
    #[arg(long, help = "What-if: increase platform buyers by 10%")]
    platform_buyers_up10: bool,
    #[arg(long, help = "What-if: increase order bump take rate by 10%")]
    bump_take_rate_up10: bool,
    #[arg(long, help = "What-if: increase upsell take rate by 10%")]
    upsell_take_rate_up10: bool,
}

#[derive(Debug)]
struct ComputeRequest {
    assumptions: Assumptions,
    toggles: Toggles,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FunnelDisplay {
    platform_buyers: String,
    email_buyers: String,
    total_buyers: String,
    platform_buyer_pct_of_reach: String,
    email_buyer_pct_of_reach: String,
    total_buyer_pct_of_reach: String,
    fe_revenue: String,
    bump_revenue: String,
    upsell_revenue: String,
    gross_subtotal: String,
    refunds: String,
    gross_after_refunds: String,
    annual_gross: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComputeResponse {
    result: FunnelResult,
    display: FunnelDisplay,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

// Mid-tier default snapshot. The engine has no opinion about defaults;
// this layer owns them, exactly like the preset tiers.
fn default_cli() -> Cli {
    Cli {
        audience_size: None,
        audience_tier: None,
        reach_rate: 10.0,
        platform_ctr: 4.0,
        email_subscribers: 2_500.0,
        email_ctr: 5.0,
        platform_cvr: 2.5,
        email_cvr: 1.0,
        fe_price: 37.0,
        bump_price: 22.0,
        bump_take_rate: 30.0,
        upsell_price: 68.0,
        upsell_take_rate: 20.0,
        refund_rate: 2.0,
        launches_per_year: 4.0,
        email_buyers_up10: false,
        platform_buyers_up10: false,
        bump_take_rate_up10: false,
        upsell_take_rate_up10: false,
    }
}

const DEFAULT_AUDIENCE_SIZE: f64 = 100_000.0;

fn build_request(cli: &Cli) -> ComputeRequest {
    // Explicit size wins over a tier preset; the preset wins over the
    // mid-tier default.
    let audience_size = cli
        .audience_size
        .or(cli.audience_tier.map(CliAudienceTier::audience_size))
        .unwrap_or(DEFAULT_AUDIENCE_SIZE);

    ComputeRequest {
        assumptions: Assumptions {
            audience_size,
            reach_rate: cli.reach_rate,
            platform_ctr: cli.platform_ctr,
            email_subscribers: cli.email_subscribers,
            email_ctr: cli.email_ctr,
            platform_cvr: cli.platform_cvr,
            email_cvr: cli.email_cvr,
            fe_price: cli.fe_price,
            bump_price: cli.bump_price,
            bump_take_rate: cli.bump_take_rate,
            upsell_price: cli.upsell_price,
            upsell_take_rate: cli.upsell_take_rate,
            refund_rate: cli.refund_rate,
            launches_per_year: cli.launches_per_year,
        },
        toggles: Toggles {
            email_buyers_up10: cli.email_buyers_up10,
            platform_buyers_up10: cli.platform_buyers_up10,
            bump_take_rate_up10: cli.bump_take_rate_up10,
            upsell_take_rate_up10: cli.upsell_take_rate_up10,
        },
    }
}

fn request_from_payload(payload: ComputePayload) -> ComputeRequest {
    let mut cli = default_cli();

    if let Some(v) = payload.audience_tier {
        cli.audience_tier = Some(v.into());
    }
    if let Some(v) = payload.audience_size {
        cli.audience_size = Some(v);
    }
    if let Some(v) = payload.reach_rate {
        cli.reach_rate = v;
    }
    if let Some(v) = payload.platform_ctr {
        cli.platform_ctr = v;
    }
    if let Some(v) = payload.email_subscribers {
        cli.email_subscribers = v;
    }
    if let Some(v) = payload.email_ctr {
        cli.email_ctr = v;
    }
    if let Some(v) = payload.platform_cvr {
        cli.platform_cvr = v;
    }
    if let Some(v) = payload.email_cvr {
        cli.email_cvr = v;
    }
    if let Some(v) = payload.fe_price {
        cli.fe_price = v;
    }
    if let Some(v) = payload.bump_price {
        cli.bump_price = v;
    }
    if let Some(v) = payload.bump_take_rate {
        cli.bump_take_rate = v;
    }
    if let Some(v) = payload.upsell_price {
        cli.upsell_price = v;
    }
    if let Some(v) = payload.upsell_take_rate {
        cli.upsell_take_rate = v;
    }
    if let Some(v) = payload.refund_rate {
        cli.refund_rate = v;
    }
    if let Some(v) = payload.launches_per_year {
        cli.launches_per_year = v;
    }

    if let Some(v) = payload.email_buyers_up10 {
        cli.email_buyers_up10 = v;
    }
    if let Some(v) = payload.platform_buyers_up10 {
        cli.platform_buyers_up10 = v;
    }
    if let Some(v) = payload.bump_take_rate_up10 {
        cli.bump_take_rate_up10 = v;
    }
    if let Some(v) = payload.upsell_take_rate_up10 {
        cli.upsell_take_rate_up10 = v;
    }

    build_request(&cli)
}

fn build_compute_response(result: FunnelResult) -> ComputeResponse {
    let display = FunnelDisplay {
        platform_buyers: format_count(result.platform_buyers),
        email_buyers: format_count(result.email_buyers),
        total_buyers: format_count(result.total_buyers),
        platform_buyer_pct_of_reach: format_percent(result.platform_buyer_pct_of_reach),
        email_buyer_pct_of_reach: format_percent(result.email_buyer_pct_of_reach),
        total_buyer_pct_of_reach: format_percent(result.total_buyer_pct_of_reach),
        fe_revenue: format_currency(result.fe_revenue),
        bump_revenue: format_currency(result.bump_revenue),
        upsell_revenue: format_currency(result.upsell_revenue),
        gross_subtotal: format_currency(result.gross_subtotal),
        refunds: format_currency(result.refunds),
        gross_after_refunds: format_currency(result.gross_after_refunds),
        annual_gross: format_currency(result.annual_gross),
    };
    ComputeResponse { result, display }
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/compute",
            get(compute_get_handler).post(compute_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("Funnel calculator listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

pub fn run_cli() {
    let cli = Cli::parse();
    let request = build_request(&cli);
    let result = compute(&request.assumptions, request.toggles);
    print_report(&request.assumptions, &result);
}

fn print_report(assumptions: &Assumptions, result: &FunnelResult) {
    println!("Audience: {}", format_count(assumptions.audience_size));
    println!(
        "Platform buyers: {} ({} of platform reach)",
        format_count(result.platform_buyers),
        format_percent(result.platform_buyer_pct_of_reach)
    );
    println!(
        "Email buyers: {} ({} of email reach)",
        format_count(result.email_buyers),
        format_percent(result.email_buyer_pct_of_reach)
    );
    println!(
        "Total buyers: {} ({} of total reach)",
        format_count(result.total_buyers),
        format_percent(result.total_buyer_pct_of_reach)
    );
    println!();
    println!("Per launch:");
    println!(
        "  Front-end offer sales   {}",
        format_currency(result.fe_revenue)
    );
    println!(
        "  Order bump sales        {}",
        format_currency(result.bump_revenue)
    );
    println!(
        "  Upsell offer sales      {}",
        format_currency(result.upsell_revenue)
    );
    println!(
        "  Gross sales subtotal    {}",
        format_currency(result.gross_subtotal)
    );
    println!(
        "  Refunds                -{}",
        format_currency(result.refunds)
    );
    println!(
        "  Gross after refunds     {}",
        format_currency(result.gross_after_refunds)
    );
    println!();
    println!(
        "Annualized ({} launches): {}",
        format_count(assumptions.launches_per_year),
        format_currency(result.annual_gross)
    );
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn compute_get_handler(Query(payload): Query<ComputePayload>) -> Response {
    compute_handler_impl(payload)
}

async fn compute_post_handler(Json(payload): Json<ComputePayload>) -> Response {
    compute_handler_impl(payload)
}

fn compute_handler_impl(payload: ComputePayload) -> Response {
    let request = request_from_payload(payload);
    let result = compute(&request.assumptions, request.toggles);
    json_response(StatusCode::OK, build_compute_response(result))
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn request_from_json(json: &str) -> Result<ComputeRequest, String> {
    let payload = serde_json::from_str::<ComputePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    Ok(request_from_payload(payload))
}
