//! Performance calculator for backtest results.

use tracing::warn;

use super::constants::DAYS_PER_YEAR;
use super::math::{checked_ratio, mean, std_dev};
use super::types::{DrawdownPoint, PerformanceSummary};
use crate::backtest::engine::INITIAL_EQUITY;
use crate::backtest::record::DailyRecord;

/// Performance calculator for backtest results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceCalculator {
    annualization: f64,
}

impl Default for PerformanceCalculator {
    fn default() -> Self {
        Self::new(DAYS_PER_YEAR)
    }
}

impl PerformanceCalculator {
    /// Create a calculator with the given periods-per-year constant.
    #[must_use]
    pub const fn new(annualization: f64) -> Self {
        Self { annualization }
    }

    /// Periods per year.
    #[must_use]
    pub const fn annualization(&self) -> f64 {
        self.annualization
    }

    /// Calculate all performance metrics.
    #[must_use]
    pub fn calculate(&self, records: &[DailyRecord]) -> PerformanceSummary {
        let Some(last) = records.last() else {
            return PerformanceSummary {
                final_equity: INITIAL_EQUITY,
                ..PerformanceSummary::default()
            };
        };

        let returns: Vec<f64> = records.iter().map(|r| r.strategy_return).collect();
        let final_equity = last.equity_curve;

        let cagr = self.cagr(final_equity, records.len());
        let max_drawdown = Self::max_drawdown(records);
        let calmar = match (cagr, max_drawdown) {
            (Some(cagr), Some(mdd)) => checked_ratio(cagr, mdd.abs()),
            _ => None,
        };

        let winning_days = returns.iter().filter(|r| **r > 0.0).count();
        let losing_days = returns.iter().filter(|r| **r < 0.0).count();

        let sharpe = self.sharpe_ratio(&returns);
        if sharpe.is_none() {
            warn!(
                days = records.len(),
                "Sharpe ratio undefined: strategy returns have no variance"
            );
        }

        PerformanceSummary {
            cagr,
            annual_return: self.annual_return(&returns),
            max_drawdown,
            sharpe,
            calmar,
            win_rate: checked_ratio(winning_days as f64, (winning_days + losing_days) as f64),
            total_trades: records.iter().filter(|r| r.trade_flag).count(),
            total_return: finite(final_equity / INITIAL_EQUITY - 1.0),
            final_equity,
            trading_days: records.len(),
            winning_days,
            losing_days,
            total_cost: records.iter().map(|r| r.trade_cost).sum(),
        }
    }

    /// `final_equity^(1 / years) - 1` with `years = days / annualization`.
    #[must_use]
    pub fn cagr(&self, final_equity: f64, days: usize) -> Option<f64> {
        let years = checked_ratio(days as f64, self.annualization)?;
        if years <= 0.0 {
            return None;
        }
        finite(final_equity.powf(1.0 / years) - 1.0)
    }

    /// Mean return times the annualization constant.
    #[must_use]
    pub fn annual_return(&self, returns: &[f64]) -> Option<f64> {
        finite(mean(returns)? * self.annualization)
    }

    /// Annualized Sharpe ratio: `mean / std * sqrt(annualization)`.
    ///
    /// `None` with fewer than two returns or zero deviation.
    #[must_use]
    pub fn sharpe_ratio(&self, returns: &[f64]) -> Option<f64> {
        let avg = mean(returns)?;
        let std = std_dev(returns)?;
        finite(checked_ratio(avg, std)? * self.annualization.sqrt())
    }

    /// Drawdown of every record against the running equity peak.
    #[must_use]
    pub fn drawdown_series(records: &[DailyRecord]) -> Vec<DrawdownPoint> {
        let mut peak = f64::NEG_INFINITY;
        records
            .iter()
            .map(|r| {
                peak = peak.max(r.equity_curve);
                DrawdownPoint {
                    date: r.date,
                    equity: r.equity_curve,
                    peak,
                    drawdown: r.equity_curve / peak - 1.0,
                }
            })
            .collect()
    }

    /// Worst drawdown; `None` for an empty series or a non-positive peak.
    #[must_use]
    pub fn max_drawdown(records: &[DailyRecord]) -> Option<f64> {
        let points = Self::drawdown_series(records);
        if points.iter().any(|p| p.peak <= 0.0) {
            return None;
        }
        points
            .iter()
            .map(|p| p.drawdown)
            .reduce(f64::min)
            .and_then(finite)
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::backtest::record::Signal;

    fn records(returns: &[f64], trades: &[bool]) -> Vec<DailyRecord> {
        let mut equity = INITIAL_EQUITY;
        returns
            .iter()
            .zip(trades)
            .enumerate()
            .map(|(i, (r, flag))| {
                let Some(date) = NaiveDate::from_ymd_opt(2024, 1, 1)
                    .and_then(|d| d.checked_add_days(chrono::Days::new(i as u64)))
                else {
                    panic!("invalid test date");
                };
                equity *= 1.0 + r;
                DailyRecord {
                    date,
                    tvl_usd: 1.0,
                    eth_price: 1.0,
                    price_neutral_tvl: 1.0,
                    price_neutral_tvl_rounded: 1.0,
                    eth_return: Some(*r),
                    pntvl_change: Some(0.0),
                    divergence_strength: None,
                    divergence_z: None,
                    signal: Signal::Flat,
                    position: Signal::Flat,
                    strategy_return: *r,
                    trade_flag: *flag,
                    trade_cost: if *flag { 0.0055 } else { 0.0 },
                    equity_curve: equity,
                }
            })
            .collect()
    }

    #[test]
    fn test_empty_records() {
        let summary = PerformanceCalculator::default().calculate(&[]);
        assert_eq!(summary.total_trades, 0);
        assert_eq!(summary.sharpe, None);
        assert_eq!(summary.cagr, None);
        assert!((summary.final_equity - INITIAL_EQUITY).abs() < f64::EPSILON);
    }

    #[test]
    fn test_drawdown_calculation() {
        // Equity: 1.10, 1.045, 1.0868, 0.9564...
        let data = records(&[0.10, -0.05, 0.04, -0.12], &[false; 4]);
        let Some(mdd) = PerformanceCalculator::max_drawdown(&data) else {
            panic!("drawdown should be defined");
        };
        let expected = data[3].equity_curve / 1.10 - 1.0;
        assert!((mdd - expected).abs() < 1e-12);
        assert!(mdd < 0.0);
    }

    #[test]
    fn test_rising_equity_has_zero_drawdown_and_no_calmar() {
        let data = records(&[0.01, 0.02, 0.03], &[false; 3]);
        let summary = PerformanceCalculator::default().calculate(&data);
        assert_eq!(summary.max_drawdown, Some(0.0));
        assert_eq!(summary.calmar, None);
    }

    #[test]
    fn test_win_rate_ignores_zero_days() {
        let data = records(&[0.01, 0.0, -0.02, 0.03, 0.0], &[false; 5]);
        let summary = PerformanceCalculator::default().calculate(&data);
        let Some(win_rate) = summary.win_rate else {
            panic!("win rate should be defined");
        };
        assert!((win_rate - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(summary.winning_days, 2);
        assert_eq!(summary.losing_days, 1);
    }

    #[test]
    fn test_all_zero_returns_are_undefined() {
        let data = records(&[0.0; 5], &[false; 5]);
        let summary = PerformanceCalculator::default().calculate(&data);
        assert_eq!(summary.sharpe, None);
        assert_eq!(summary.win_rate, None);
        assert_eq!(summary.calmar, None);
        assert_eq!(summary.cagr, Some(0.0));
    }

    #[test]
    fn test_sharpe_ratio() {
        let returns = [0.01, -0.005, 0.02, 0.0];
        let calc = PerformanceCalculator::new(365.0);
        let Some(sharpe) = calc.sharpe_ratio(&returns) else {
            panic!("sharpe should be defined");
        };
        let avg = 0.025 / 4.0;
        let var = returns.iter().map(|r| (r - avg).powi(2)).sum::<f64>() / 3.0;
        assert!((sharpe - avg / var.sqrt() * 365f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_cagr_over_one_year() {
        let calc = PerformanceCalculator::new(365.0);
        let Some(cagr) = calc.cagr(1.21, 730) else {
            panic!("cagr should be defined");
        };
        assert!((cagr - 0.10).abs() < 1e-12);
        assert_eq!(calc.cagr(1.0, 0), None);
    }

    #[test]
    fn test_trade_count_and_cost() {
        let data = records(&[0.01, 0.02, -0.01], &[true, false, true]);
        let summary = PerformanceCalculator::default().calculate(&data);
        assert_eq!(summary.total_trades, 2);
        assert!((summary.total_cost - 0.011).abs() < 1e-12);
    }
}
