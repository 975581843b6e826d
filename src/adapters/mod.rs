//! Concrete adapter implementations for ports.

pub mod ninjatrader_csv_adapter;
pub mod perf_json_adapter;
pub mod fallback_source;
pub mod file_config_adapter;
pub mod markdown_report_adapter;
pub mod chart_svg;
