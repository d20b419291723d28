mod market;
mod metric;
mod table;

pub use market::{
    ChartPoint, CoinOption, CoinTrendResponse, DateRange, DateRangeParams, MarketData,
    OverviewResponse, QueryRunResponse, SavedQueryInfo, COIN_OPTIONS,
};
pub use metric::{Metric, MetricOp, MetricValue};
pub use table::{ColumnKind, Table, Value};
