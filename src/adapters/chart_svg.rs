//! Standalone SVG charts: equity curve and P&L by hour of day.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::error::TradePerfError;
use crate::domain::metrics::{BucketStats, EquityPoint, MetricsReport};
use crate::domain::trade::TradeSet;
use crate::ports::report_port::ReportPort;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 280.0;
const PADDING: f64 = 40.0;

fn svg_open(out: &mut String, title: &str) {
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">"#,
        w = WIDTH,
        h = HEIGHT
    );
    let _ = write!(
        out,
        r#"<rect width="100%" height="100%" fill="white"/><text x="{x:.0}" y="20" font-family="sans-serif" font-size="14" text-anchor="middle">{title}</text>"#,
        x = WIDTH / 2.0
    );
    // axes
    let _ = write!(
        out,
        r##"<line x1="{p:.0}" y1="{p:.0}" x2="{p:.0}" y2="{b:.0}" stroke="#888"/><line x1="{p:.0}" y1="{b:.0}" x2="{r:.0}" y2="{b:.0}" stroke="#888"/>"##,
        p = PADDING,
        b = HEIGHT - PADDING,
        r = WIDTH - PADDING
    );
}

/// Titled chart frame with a centred "No trades" label.
fn empty_chart(title: &str) -> String {
    let mut out = String::new();
    svg_open(&mut out, title);
    let _ = write!(
        out,
        r##"<text x="{x:.0}" y="{y:.0}" font-family="sans-serif" font-size="12" fill="#888" text-anchor="middle">No trades</text>"##,
        x = WIDTH / 2.0,
        y = HEIGHT / 2.0
    );
    out.push_str("</svg>");
    out
}

/// Line chart of equity over trades.
pub fn generate_equity_svg(equity_curve: &[EquityPoint]) -> String {
    if equity_curve.is_empty() {
        return empty_chart("Equity Curve");
    }

    let min_equity = equity_curve
        .iter()
        .map(|p| p.equity)
        .fold(f64::INFINITY, f64::min);
    let max_equity = equity_curve
        .iter()
        .map(|p| p.equity)
        .fold(f64::NEG_INFINITY, f64::max);

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;

    let range = max_equity - min_equity;
    let scale_y = if range > 0.0 {
        plot_height / range
    } else {
        1.0
    };
    let scale_x = if equity_curve.len() > 1 {
        plot_width / (equity_curve.len() - 1) as f64
    } else {
        0.0
    };

    let points: Vec<String> = equity_curve
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let x = PADDING + i as f64 * scale_x;
            let y = HEIGHT - PADDING - (point.equity - min_equity) * scale_y;
            format!("{:.1},{:.1}", x, y)
        })
        .collect();

    let mut out = String::new();
    svg_open(&mut out, "Equity Curve");
    let _ = write!(
        out,
        r##"<text x="4" y="{top:.0}" font-family="sans-serif" font-size="10">{max:.0}</text><text x="4" y="{bottom:.0}" font-family="sans-serif" font-size="10">{min:.0}</text>"##,
        top = PADDING + 4.0,
        bottom = HEIGHT - PADDING,
        max = max_equity,
        min = min_equity
    );
    let _ = write!(
        out,
        r##"<polyline fill="none" stroke="#3b82f6" stroke-width="1.5" points="{}"/>"##,
        points.join(" ")
    );
    out.push_str("</svg>");
    out
}

/// Bar chart of summed profit per exit hour, green above the zero line and
/// red below.
pub fn generate_hourly_pnl_svg(by_hour: &BTreeMap<u32, BucketStats>) -> String {
    if by_hour.is_empty() {
        return empty_chart("P&amp;L by Hour");
    }

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;
    let max_abs = by_hour
        .values()
        .map(|b| b.profit.abs())
        .fold(0.0_f64, f64::max);
    let half = plot_height / 2.0;
    let scale = if max_abs > 0.0 { half / max_abs } else { 0.0 };
    let zero_y = PADDING + half;
    let slot = plot_width / 24.0;
    let bar_width = slot * 0.7;

    let mut out = String::new();
    svg_open(&mut out, "P&amp;L by Hour");
    let _ = write!(
        out,
        r##"<line x1="{p:.0}" y1="{z:.1}" x2="{r:.0}" y2="{z:.1}" stroke="#ccc"/>"##,
        p = PADDING,
        z = zero_y,
        r = WIDTH - PADDING
    );

    for (&hour, bucket) in by_hour {
        let height = bucket.profit.abs() * scale;
        let x = PADDING + hour as f64 * slot + (slot - bar_width) / 2.0;
        let (y, color) = if bucket.profit >= 0.0 {
            (zero_y - height, "#16a34a")
        } else {
            (zero_y, "#dc2626")
        };
        let _ = write!(
            out,
            r#"<rect x="{x:.1}" y="{y:.1}" width="{bar_width:.1}" height="{height:.1}" fill="{color}"><title>{hour:02}:00 {profit:.2} ({count} trades)</title></rect>"#,
            profit = bucket.profit,
            count = bucket.count
        );
        let _ = write!(
            out,
            r#"<text x="{tx:.1}" y="{ty:.0}" font-family="sans-serif" font-size="9" text-anchor="middle">{hour}</text>"#,
            tx = x + bar_width / 2.0,
            ty = HEIGHT - PADDING + 12.0
        );
    }

    out.push_str("</svg>");
    out
}

/// `report.svg` -> `report-hourly.svg`, alongside the equity chart.
pub fn hourly_chart_path(output_path: &Path) -> PathBuf {
    let stem = output_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    output_path.with_file_name(format!("{stem}-hourly.svg"))
}

/// Writes the equity chart to the output path and the hourly P&L chart next
/// to it.
#[derive(Debug, Default)]
pub struct SvgChartReportAdapter;

impl SvgChartReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportPort for SvgChartReportAdapter {
    fn write(
        &self,
        report: &MetricsReport,
        _trades: &TradeSet,
        output_path: &str,
    ) -> Result<(), TradePerfError> {
        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, generate_equity_svg(&report.equity_curve))?;

        let hourly = hourly_chart_path(path);
        fs::write(&hourly, generate_hourly_pnl_svg(&report.by_hour))?;
        log::debug!("wrote charts {} and {}", path.display(), hourly.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::compute_metrics;
    use crate::domain::trade::{Direction, Trade};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn point(day: u32, equity: f64) -> EquityPoint {
        EquityPoint {
            time: NaiveDate::from_ymd_opt(2025, 5, day)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            cumulative_pnl: equity - 1000.0,
            equity,
        }
    }

    #[test]
    fn equity_empty_is_labelled_document() {
        let svg = generate_equity_svg(&[]);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("No trades"));
        assert!(!svg.contains("<polyline"));
    }

    #[test]
    fn equity_single_point() {
        let svg = generate_equity_svg(&[point(1, 1000.0)]);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Equity Curve"));
        assert!(svg.contains(r#"points="40.0,240.0""#));
    }

    #[test]
    fn equity_scales_between_bounds() {
        let svg = generate_equity_svg(&[point(1, 1000.0), point(2, 1100.0), point(3, 800.0)]);
        // first point at x=40, last at x=600; max equity at top padding, min at bottom
        assert!(svg.contains("40.0,"));
        assert!(svg.contains("320.0,40.0"));
        assert!(svg.contains("600.0,240.0"));
    }

    #[test]
    fn hourly_empty_is_labelled_document() {
        let svg = generate_hourly_pnl_svg(&BTreeMap::new());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("No trades"));
        assert_eq!(svg.matches("<rect x=").count(), 0);
    }

    #[test]
    fn hourly_bars_colored_by_sign() {
        let mut by_hour = BTreeMap::new();
        by_hour.insert(
            9,
            BucketStats {
                count: 3,
                wins: 2,
                profit: 120.0,
            },
        );
        by_hour.insert(
            14,
            BucketStats {
                count: 1,
                wins: 0,
                profit: -60.0,
            },
        );
        let svg = generate_hourly_pnl_svg(&by_hour);
        assert!(svg.contains("P&amp;L by Hour"));
        assert_eq!(svg.matches("<rect x=").count(), 2);
        assert!(svg.contains("#16a34a"));
        assert!(svg.contains("#dc2626"));
        assert!(svg.contains("09:00 120.00 (3 trades)"));
        assert!(svg.contains("14:00 -60.00 (1 trades)"));
    }

    #[test]
    fn hourly_path_sits_next_to_output() {
        assert_eq!(
            hourly_chart_path(Path::new("out/equity.svg")),
            PathBuf::from("out/equity-hourly.svg")
        );
    }

    #[test]
    fn adapter_writes_both_charts() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("charts").join("perf.svg");
        let t = |h| {
            NaiveDate::from_ymd_opt(2025, 5, 13)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap()
        };
        let trades = TradeSet::new(vec![
            Trade::new("MNQ", Direction::Long, 1, t(9), t(10), 100.0, 101.0, 40.0).unwrap(),
            Trade::new("MNQ", Direction::Short, 1, t(13), t(14), 100.0, 101.0, -25.0).unwrap(),
        ])
        .unwrap();
        let report = compute_metrics(&trades, 1_000.0);

        SvgChartReportAdapter::new()
            .write(&report, &trades, out.to_str().unwrap())
            .unwrap();

        let equity = fs::read_to_string(&out).unwrap();
        assert!(equity.contains("Equity Curve"));
        let hourly = fs::read_to_string(dir.path().join("charts").join("perf-hourly.svg")).unwrap();
        assert!(hourly.contains("10:00 40.00 (1 trades)"));
        assert!(hourly.contains("14:00 -25.00 (1 trades)"));
    }

    #[test]
    fn adapter_writes_valid_documents_without_trades() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("empty.svg");
        let trades = TradeSet::empty();
        let report = compute_metrics(&trades, 1_000.0);

        SvgChartReportAdapter::new()
            .write(&report, &trades, out.to_str().unwrap())
            .unwrap();

        for path in [out.clone(), dir.path().join("empty-hourly.svg")] {
            let svg = fs::read_to_string(&path).unwrap();
            assert!(svg.starts_with("<svg") && svg.ends_with("</svg>"), "{}", path.display());
            assert!(svg.contains("No trades"));
        }
    }
}
