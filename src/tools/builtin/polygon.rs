//! Market-data tools backed by the Polygon.io REST API.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::ToolwrightConfig;
use crate::error::ToolwrightError;
use crate::provider::http::shared_client;
use crate::tools::arguments::ToolArguments;
use crate::tools::tool::{AgentTool, Tool, ToolExecutionContext};
use crate::tools::types::{ArgumentKind, ArgumentSpec, ToolSchema};

pub const DEFAULT_BASE_URL: &str = "https://api.polygon.io";

const TICKER_PATTERN: &str = "^[A-Z]{1,5}$";
const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";
const MAX_DIVIDEND_LIMIT: i64 = 1000;

/// Thin GET client: one request per tool call, API key as `apiKey` query
/// parameter.
#[derive(Debug, Clone)]
pub struct PolygonClient {
    api_key: String,
    base_url: String,
}

impl PolygonClient {
    pub fn new(api_key: impl Into<String>, base_url: Option<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        }
    }

    /// Client from the `polygon` key and optional base URL override.
    pub fn from_config(config: &ToolwrightConfig) -> Option<Self> {
        let key = config.get_api_key("polygon")?;
        Some(Self::new(key, config.get_base_url("polygon")))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` with `query`.
    ///
    /// A 2xx body is returned as JSON when it parses, otherwise as a string.
    /// Any other status is returned as an `{error, details}` value; only
    /// transport failures are errors.
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ToolwrightError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "polygon request");

        let response = shared_client()
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), "polygon response");

        if !status.is_success() {
            return Ok(json!({
                "error": format!("API request failed with status code {}", status.as_u16()),
                "details": body,
            }));
        }
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }
}

/// The four market-data tools sharing one client.
pub fn market_data_tools(client: Arc<PolygonClient>) -> Vec<Arc<dyn Tool>> {
    vec![
        ticker_news_tool(client.clone()),
        market_status_tool(client.clone()),
        dividends_tool(client.clone()),
        ticker_reference_tool(client),
    ]
}

fn ticker_arg(description: &str) -> ArgumentSpec {
    ArgumentSpec::new("ticker", ArgumentKind::String, description).with_pattern(TICKER_PATTERN)
}

fn date_arg(name: &str, description: &str) -> ArgumentSpec {
    ArgumentSpec::new(name, ArgumentKind::String, description).with_pattern(DATE_PATTERN)
}

fn transport_error(tool: &str) -> impl Fn(ToolwrightError) -> ToolwrightError + '_ {
    move |e| ToolwrightError::tool(tool, e.to_string())
}

/// `ticker_news`: `GET /vX/reference/tickers/{ticker}/events`.
pub fn ticker_news_tool(client: Arc<PolygonClient>) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        "ticker_news",
        "Provides news for a multiple tickers",
        ToolSchema::object()
            .argument(ticker_arg("The stock ticker symbol to get news for").required())
            .build(),
        move |args: ToolArguments, _ctx: ToolExecutionContext| {
            let client = client.clone();
            async move {
                let ticker = args.get_str("ticker")?;
                info!(tool = "ticker_news", ticker, "fetching ticker events");
                client
                    .get(&format!("/vX/reference/tickers/{ticker}/events"), &[])
                    .await
                    .map_err(transport_error("ticker_news"))
            }
        },
    ))
}

/// `market_status`: `GET /v1/marketstatus/now`.
pub fn market_status_tool(client: Arc<PolygonClient>) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        "market_status",
        "Get the current trading status of the exchanges and overall financial markets.",
        ToolSchema::empty(),
        move |_args: ToolArguments, _ctx: ToolExecutionContext| {
            let client = client.clone();
            async move {
                info!(tool = "market_status", "fetching market status");
                client
                    .get("/v1/marketstatus/now", &[])
                    .await
                    .map_err(transport_error("market_status"))
            }
        },
    ))
}

fn dividends_schema() -> ToolSchema {
    ToolSchema::object()
        .argument(ticker_arg(
            "The stock ticker symbol to get dividends for (e.g., AAPL)",
        ))
        .argument(date_arg(
            "ex_dividend_date",
            "Query by ex-dividend date with the format YYYY-MM-DD",
        ))
        .argument(date_arg(
            "record_date",
            "Query by record date with the format YYYY-MM-DD",
        ))
        .argument(date_arg(
            "declaration_date",
            "Query by declaration date with the format YYYY-MM-DD",
        ))
        .argument(date_arg(
            "pay_date",
            "Query by pay date with the format YYYY-MM-DD",
        ))
        .integer(
            "frequency",
            "Query by the number of times per year the dividend is paid out. Possible values are 0 (one-time), 1 (annually), 2 (bi-annually), 4 (quarterly), and 12 (monthly)",
            false,
        )
        .number("cash_amount", "Query by the cash amount of the dividend", false)
        .string(
            "dividend_type",
            "Query by the type of dividend. CD for consistent dividends, SC for special cash dividends, LT for long-term capital gain, ST for short-term capital gain",
            false,
        )
        .argument(
            ArgumentSpec::new(
                "limit",
                ArgumentKind::Integer,
                "Limit the number of results returned, default is 10 and max is 1000",
            )
            .with_default(10),
        )
        .string(
            "sort",
            "Sort field used for ordering. Options: ex_dividend_date, pay_date, declaration_date, record_date, cash_amount, ticker",
            false,
        )
        .string(
            "order",
            "Order results based on the sort field. Options: asc, desc",
            false,
        )
        .build()
}

/// Query parameters for the dividends endpoint; absent filters are omitted.
fn dividends_query(args: &ToolArguments) -> Result<Vec<(&'static str, String)>, ToolwrightError> {
    let limit = args.get_i64_opt("limit").unwrap_or(10);
    if !(1..=MAX_DIVIDEND_LIMIT).contains(&limit) {
        return Err(ToolwrightError::tool(
            "dividends_v3",
            format!("limit must be between 1 and {MAX_DIVIDEND_LIMIT}, got {limit}"),
        ));
    }

    let mut query = vec![("limit", limit.to_string())];
    for key in [
        "ticker",
        "ex_dividend_date",
        "record_date",
        "declaration_date",
        "pay_date",
        "dividend_type",
        "sort",
        "order",
    ] {
        if let Some(value) = args.get_str_opt(key).filter(|v| !v.is_empty()) {
            query.push((key, value.to_string()));
        }
    }
    if let Some(frequency) = args.get_i64_opt("frequency") {
        query.push(("frequency", frequency.to_string()));
    }
    if let Some(amount) = args.get_f64_opt("cash_amount") {
        query.push(("cash_amount", amount.to_string()));
    }
    Ok(query)
}

/// `dividends_v3`: `GET /v3/reference/dividends`.
pub fn dividends_tool(client: Arc<PolygonClient>) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        "dividends_v3",
        "Get a list of historical cash dividends, including the ticker symbol, declaration date, ex-dividend date, record date, pay date, frequency, and amount",
        dividends_schema(),
        move |args: ToolArguments, _ctx: ToolExecutionContext| {
            let client = client.clone();
            async move {
                let query = dividends_query(&args)?;
                info!(tool = "dividends_v3", filters = query.len(), "fetching dividends");
                client
                    .get("/v3/reference/dividends", &query)
                    .await
                    .map_err(transport_error("dividends_v3"))
            }
        },
    ))
}

/// `ticker_reference`: `GET /v3/reference/tickers/{ticker}`.
pub fn ticker_reference_tool(client: Arc<PolygonClient>) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        "ticker_reference",
        "Provides reference data for a specific ticker symbol",
        ToolSchema::object()
            .argument(ticker_arg("The stock ticker symbol to get reference data for").required())
            .argument(date_arg(
                "date",
                "The date for which to retrieve data in YYYY-MM-DD format",
            ))
            .build(),
        move |args: ToolArguments, _ctx: ToolExecutionContext| {
            let client = client.clone();
            async move {
                let ticker = args.get_str("ticker")?;
                let query: Vec<(&str, String)> = args
                    .get_str_opt("date")
                    .map(|date| vec![("date", date.to_string())])
                    .unwrap_or_default();
                info!(tool = "ticker_reference", ticker, "fetching ticker reference");
                client
                    .get(&format!("/v3/reference/tickers/{ticker}"), &query)
                    .await
                    .map_err(transport_error("ticker_reference"))
            }
        },
    ))
}
