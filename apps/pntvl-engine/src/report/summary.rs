//! Plain-text metric block and record preview.

use crate::backtest::{DailyRecord, PerformanceSummary, format_decimal, format_pct, format_ratio};

const RULE: &str = "───────────────────────────────────────────────";

/// Render the metric block printed after a backtest.
///
/// CAGR, annual return, max drawdown and win rate are percentages; Sharpe
/// and Calmar have two decimals. Undefined values print as `N/A`.
#[must_use]
pub fn render_summary(summary: &PerformanceSummary) -> String {
    let lines = [
        RULE.to_string(),
        "Backtest Results".to_string(),
        RULE.to_string(),
        format!("CAGR:              {}", format_pct(summary.cagr)),
        format!("Annual Return:     {}", format_pct(summary.annual_return)),
        format!("Max Drawdown:      {}", format_pct(summary.max_drawdown)),
        format!("Sharpe Ratio:      {}", format_ratio(summary.sharpe)),
        format!("Calmar Ratio:      {}", format_ratio(summary.calmar)),
        format!("Win Rate:          {}", format_pct(summary.win_rate)),
        format!("Total Trades:      {}", summary.total_trades),
        RULE.to_string(),
        format!("Total Return:      {}", format_pct(summary.total_return)),
        format!("Final Equity:      {}", format_decimal(summary.final_equity)),
        format!(
            "Days (W/L/total):  {}/{}/{}",
            summary.winning_days, summary.losing_days, summary.trading_days
        ),
        format!("Total Cost:        {}", format_pct(Some(summary.total_cost))),
        RULE.to_string(),
    ];
    lines.join("\n")
}

/// Render the first and last `rows` records as a fixed-width table.
///
/// A series of at most `2 * rows` records is shown once in full.
#[must_use]
pub fn render_preview(records: &[DailyRecord], rows: usize) -> String {
    let mut lines = vec![format!(
        "{:<10} {:>16} {:>10} {:>12} {:>10} {:>4} {:>4} {:>10} {:>10}",
        "date", "tvl_usd", "eth_price", "pntvl", "divergence", "sig", "pos", "return", "equity"
    )];

    if records.len() <= rows.saturating_mul(2) {
        lines.extend(records.iter().map(preview_row));
    } else {
        lines.extend(records[..rows].iter().map(preview_row));
        lines.push(format!("... {} rows omitted ...", records.len() - 2 * rows));
        lines.extend(records[records.len() - rows..].iter().map(preview_row));
    }

    lines.join("\n")
}

fn preview_row(record: &DailyRecord) -> String {
    format!(
        "{:<10} {:>16.2} {:>10.2} {:>12} {:>10} {:>4} {:>4} {:>10.6} {:>10.4}",
        record.date,
        record.tvl_usd,
        record.eth_price,
        record.price_neutral_tvl_rounded,
        optional(record.divergence_strength),
        record.signal.as_i8(),
        record.position.as_i8(),
        record.strategy_return,
        record.equity_curve,
    )
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.6}"))
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};

    use super::*;
    use crate::backtest::Signal;

    fn record(offset: u64) -> DailyRecord {
        let Some(date) = NaiveDate::from_ymd_opt(2024, 1, 1).and_then(|d| d.checked_add_days(Days::new(offset)))
        else {
            panic!("invalid test date");
        };
        DailyRecord {
            date,
            tvl_usd: 1_000_000.0,
            eth_price: 2000.0,
            price_neutral_tvl: 500.0,
            price_neutral_tvl_rounded: 500.0,
            eth_return: None,
            pntvl_change: None,
            divergence_strength: None,
            divergence_z: None,
            signal: Signal::Flat,
            position: Signal::Flat,
            strategy_return: 0.0,
            trade_flag: false,
            trade_cost: 0.0,
            equity_curve: 1.0,
        }
    }

    #[test]
    fn test_render_summary_formats_metrics() {
        let summary = PerformanceSummary {
            cagr: Some(0.1523),
            annual_return: Some(0.2),
            max_drawdown: Some(-0.081),
            sharpe: Some(1.234),
            calmar: None,
            win_rate: Some(0.55),
            total_trades: 12,
            ..PerformanceSummary::default()
        };
        let text = render_summary(&summary);

        assert!(text.contains("CAGR:              15.23%"));
        assert!(text.contains("Max Drawdown:      -8.10%"));
        assert!(text.contains("Sharpe Ratio:      1.23"));
        assert!(text.contains("Calmar Ratio:      N/A"));
        assert!(text.contains("Win Rate:          55.00%"));
        assert!(text.contains("Total Trades:      12"));
    }

    #[test]
    fn test_preview_short_series_shows_all_rows() {
        let records: Vec<DailyRecord> = (0..4).map(record).collect();
        let text = render_preview(&records, 5);
        assert_eq!(text.lines().count(), 5);
        assert!(!text.contains("omitted"));
    }

    #[test]
    fn test_preview_long_series_shows_head_and_tail() {
        let records: Vec<DailyRecord> = (0..20).map(record).collect();
        let text = render_preview(&records, 3);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 1 + 3 + 1 + 3);
        assert!(lines[1].starts_with("2024-01-01"));
        assert!(lines[4].contains("14 rows omitted"));
        assert!(lines[7].starts_with("2024-01-20"));
    }
}
