//! Built-in tools.
//!
//! `multiply` and `current_time` are pure computations. The market-data tools
//! (`ticker_news`, `market_status`, `dividends_v3`, `ticker_reference`) proxy
//! one Polygon.io REST endpoint each and need a `polygon` API key.

pub mod math;
pub mod polygon;
pub mod time;

use std::sync::Arc;

use crate::config::ToolwrightConfig;
use crate::tools::tool::Tool;

/// Every built-in tool available under `config`, in registration order.
pub fn all_tools(config: &ToolwrightConfig) -> Vec<Arc<dyn Tool>> {
    let mut tools = vec![math::multiply_tool(), time::current_time_tool()];
    match polygon::PolygonClient::from_config(config) {
        Some(client) => tools.extend(polygon::market_data_tools(Arc::new(client))),
        None => tracing::debug!("no polygon API key configured; market-data tools disabled"),
    }
    tools
}
