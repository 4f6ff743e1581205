//! Simulation engine for backtesting.
//!
//! Days are processed strictly in order. The signal decided at day `i`'s
//! close only becomes the position held over day `i + 1`, so no record ever
//! trades on its own signal.

use tracing::debug;

use super::config::CostConfig;
use super::divergence::DivergencePoint;
use super::record::{BaseRecord, DailyRecord, Signal};

/// Equity before the first record.
pub const INITIAL_EQUITY: f64 = 1.0;

/// Stateful T+1 simulator over one configuration.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    /// Per-trade cost rates.
    costs: CostConfig,
    /// Signal from the previous day, which becomes today's position.
    pending_signal: Signal,
    /// Position held over the previous day.
    last_position: Signal,
    /// Current compounded equity.
    equity: f64,
    /// Number of position changes so far.
    trade_count: usize,
    /// Total cost charged so far.
    total_cost: f64,
    /// Days processed.
    days: usize,
}

impl SimulationEngine {
    /// Create a new simulation engine.
    #[must_use]
    pub const fn new(costs: CostConfig) -> Self {
        Self {
            costs,
            pending_signal: Signal::Flat,
            last_position: Signal::Flat,
            equity: INITIAL_EQUITY,
            trade_count: 0,
            total_cost: 0.0,
            days: 0,
        }
    }

    /// Current equity.
    #[must_use]
    pub const fn equity(&self) -> f64 {
        self.equity
    }

    /// Position changes so far.
    #[must_use]
    pub const fn trade_count(&self) -> usize {
        self.trade_count
    }

    /// Cost charged so far.
    #[must_use]
    pub const fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Days processed.
    #[must_use]
    pub const fn days(&self) -> usize {
        self.days
    }

    /// Process one day and return its completed record.
    ///
    /// `signal` is the signal decided at this day's close; it does not affect
    /// this day's return.
    pub fn process_day(
        &mut self,
        base: &BaseRecord,
        divergence: &DivergencePoint,
        signal: Signal,
    ) -> DailyRecord {
        let position = self.pending_signal;
        let trade_flag = position != self.last_position;
        let trade_cost = if trade_flag { self.costs.per_trade() } else { 0.0 };
        let strategy_return = position.exposure() * base.eth_return.unwrap_or(0.0) - trade_cost;

        self.equity *= 1.0 + strategy_return;
        if trade_flag {
            self.trade_count += 1;
            self.total_cost += trade_cost;
        }
        self.last_position = position;
        self.pending_signal = signal;
        self.days += 1;

        DailyRecord {
            date: base.date,
            tvl_usd: base.tvl_usd,
            eth_price: base.eth_price,
            price_neutral_tvl: base.price_neutral_tvl,
            price_neutral_tvl_rounded: base.price_neutral_tvl_rounded,
            eth_return: base.eth_return,
            pntvl_change: base.pntvl_change,
            divergence_strength: divergence.strength,
            divergence_z: divergence.z,
            signal,
            position,
            strategy_return,
            trade_flag,
            trade_cost,
            equity_curve: self.equity,
        }
    }
}

/// Run the simulator over index-aligned base records, divergence points and
/// signals.
#[must_use]
pub fn simulate_records(
    records: &[BaseRecord],
    points: &[DivergencePoint],
    signals: &[Signal],
    costs: CostConfig,
) -> Vec<DailyRecord> {
    let mut engine = SimulationEngine::new(costs);
    let daily: Vec<DailyRecord> = records
        .iter()
        .zip(points)
        .zip(signals)
        .map(|((base, point), signal)| engine.process_day(base, point, *signal))
        .collect();

    debug!(
        days = engine.days(),
        trades = engine.trade_count(),
        total_cost = engine.total_cost(),
        final_equity = engine.equity(),
        "Simulation complete"
    );

    daily
}
