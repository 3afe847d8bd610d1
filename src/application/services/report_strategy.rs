//! # Report Strategies
//!
//! One aggregation per [`ReportKind`], all consuming the same transaction
//! records and each producing its own table shape.
//!
//! | kind                      | key       | measures                         |
//! |---------------------------|-----------|----------------------------------|
//! | `hourly_orders`           | user      | 24 hour buckets, `Total`         |
//! | `average_fare`            | user      | mean of `abs(amount)`            |
//! | `total_fare`              | user      | sum of `abs(amount)`             |
//! | `number_of_orders`        | user      | record count                     |
//! | `amount_ranges`           | user      | 8 fare buckets                   |
//! | `pickup_counts_per_area`  | area      | 24 hour buckets, `Total`         |
//!
//! Keys are listed in lexicographic order. A malformed timestamp or amount
//! disqualifies the record from the measure that needs it, never the job.
//!
//! # Examples
//!
//! ```
//! use delivery_reports::application::services::report_strategy::strategy_for;
//! use delivery_reports::domain::entities::TransactionRecord;
//! use delivery_reports::domain::services::area_alias::AreaAliasMap;
//! use delivery_reports::domain::value_objects::ReportKind;
//! use serde_json::json;
//!
//! let records = vec![
//!     TransactionRecord::new("A", "2025-01-01 09:15:00", json!("1.10")),
//!     TransactionRecord::new("B", "2025-01-01 23:50:00", json!("2.90")),
//! ];
//! let table = strategy_for(ReportKind::NumberOfOrders, AreaAliasMap::default())
//!     .aggregate(&records);
//! assert_eq!(table.keys(), vec!["A", "B"]);
//! ```

use crate::domain::entities::report::TOTAL_COLUMN;
use crate::domain::entities::{CellValue, ReportColumn, ReportTable, TransactionRecord};
use crate::domain::services::area_alias::AreaAliasMap;
use crate::domain::value_objects::amount::round_fare;
use crate::domain::value_objects::timestamp::{HOURS_PER_DAY, hour_bucket_labels};
use crate::domain::value_objects::{AmountRange, ReportKind};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

const USER_HEADER: &str = "User Name";
const AREA_HEADER: &str = "Area";

const KEY_WIDTH: f64 = 25.0;
const HOUR_WIDTH: f64 = 13.0;
const TOTAL_WIDTH: f64 = 10.0;
const FARE_WIDTH: f64 = 15.0;
const COUNT_WIDTH: f64 = 18.0;
const RANGE_WIDTH: f64 = 12.0;

type HourCounts = [u64; HOURS_PER_DAY];

/// An aggregation producing one report table.
pub trait ReportStrategy: Send + Sync + fmt::Debug {
    /// Aggregates `records` into a table.
    fn aggregate(&self, records: &[TransactionRecord]) -> ReportTable;

    /// The report kind this strategy produces.
    fn kind(&self) -> ReportKind;
}

/// Returns the strategy for `kind`.
///
/// `aliases` is only consulted by the pickup-area report.
#[must_use]
pub fn strategy_for(kind: ReportKind, aliases: AreaAliasMap) -> Box<dyn ReportStrategy> {
    match kind {
        ReportKind::HourlyOrders => Box::new(HourlyOrdersStrategy),
        ReportKind::AverageFare => Box::new(AverageFareStrategy),
        ReportKind::TotalFare => Box::new(TotalFareStrategy),
        ReportKind::NumberOfOrders => Box::new(NumberOfOrdersStrategy),
        ReportKind::AmountRanges => Box::new(AmountRangesStrategy),
        ReportKind::PickupCountsPerArea => Box::new(PickupCountsPerAreaStrategy::new(aliases)),
    }
}

/// Order counts per user per hour of day.
#[derive(Debug, Clone, Copy, Default)]
pub struct HourlyOrdersStrategy;

impl ReportStrategy for HourlyOrdersStrategy {
    fn aggregate(&self, records: &[TransactionRecord]) -> ReportTable {
        let counts = count_by_hour(records, |r| r.user_name().to_string());
        hour_matrix(self.kind(), USER_HEADER, counts)
    }

    fn kind(&self) -> ReportKind {
        ReportKind::HourlyOrders
    }
}

/// Mean absolute fare per user.
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageFareStrategy;

impl ReportStrategy for AverageFareStrategy {
    fn aggregate(&self, records: &[TransactionRecord]) -> ReportTable {
        fare_table(self.kind(), records, |sum, count| {
            if count == 0 {
                Decimal::ZERO
            } else {
                sum.checked_div(Decimal::from(count))
                    .map(round_fare)
                    .unwrap_or_default()
            }
        })
    }

    fn kind(&self) -> ReportKind {
        ReportKind::AverageFare
    }
}

/// Summed absolute fare per user.
#[derive(Debug, Clone, Copy, Default)]
pub struct TotalFareStrategy;

impl ReportStrategy for TotalFareStrategy {
    fn aggregate(&self, records: &[TransactionRecord]) -> ReportTable {
        fare_table(self.kind(), records, |sum, _| round_fare(sum))
    }

    fn kind(&self) -> ReportKind {
        ReportKind::TotalFare
    }
}

/// Number of orders per user.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberOfOrdersStrategy;

impl ReportStrategy for NumberOfOrdersStrategy {
    fn aggregate(&self, records: &[TransactionRecord]) -> ReportTable {
        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
        for record in records {
            *counts.entry(record.user_name()).or_default() += 1;
        }

        let mut table = ReportTable::new(
            self.kind().title(),
            vec![
                ReportColumn::new(USER_HEADER, KEY_WIDTH),
                ReportColumn::new(self.kind().title(), COUNT_WIDTH),
            ],
        );
        for (user, count) in counts {
            table.push_row(vec![CellValue::text(user), CellValue::Integer(count)]);
        }
        table
    }

    fn kind(&self) -> ReportKind {
        ReportKind::NumberOfOrders
    }
}

/// Order counts per user per fare bucket.
///
/// Amounts outside `[1.00, 3.00)` count toward no bucket; their users are
/// still listed.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmountRangesStrategy;

impl ReportStrategy for AmountRangesStrategy {
    fn aggregate(&self, records: &[TransactionRecord]) -> ReportTable {
        let mut counts: BTreeMap<&str, [u64; AmountRange::COUNT]> = BTreeMap::new();
        for record in records {
            let buckets = counts.entry(record.user_name()).or_default();
            match record.amount() {
                Ok(amount) => {
                    if let Some(range) = AmountRange::containing(amount.abs()) {
                        if let Some(slot) = buckets.get_mut(range.index()) {
                            *slot += 1;
                        }
                    }
                }
                Err(e) => warn!(user = %record.user_name(), error = %e, "skipping amount"),
            }
        }

        let mut columns = vec![ReportColumn::new(USER_HEADER, KEY_WIDTH)];
        columns.extend(
            AmountRange::all()
                .iter()
                .map(|range| ReportColumn::new(range.label(), RANGE_WIDTH)),
        );

        let mut table = ReportTable::new(self.kind().title(), columns);
        for (user, buckets) in counts {
            let mut row = vec![CellValue::text(user)];
            row.extend(buckets.iter().map(|&n| CellValue::Integer(n)));
            table.push_row(row);
        }
        table
    }

    fn kind(&self) -> ReportKind {
        ReportKind::AmountRanges
    }
}

/// Pickup counts per canonical area per hour of day.
#[derive(Debug, Clone, Default)]
pub struct PickupCountsPerAreaStrategy {
    aliases: AreaAliasMap,
}

impl PickupCountsPerAreaStrategy {
    /// Creates the strategy resolving pickup addresses through `aliases`.
    #[must_use]
    pub fn new(aliases: AreaAliasMap) -> Self {
        Self { aliases }
    }
}

impl ReportStrategy for PickupCountsPerAreaStrategy {
    fn aggregate(&self, records: &[TransactionRecord]) -> ReportTable {
        let counts = count_by_hour(records, |r| {
            self.aliases.resolve(r.pickup_address()).to_string()
        });
        debug!(areas = counts.len(), aliases = self.aliases.len(), "resolved pickup areas");
        hour_matrix(self.kind(), AREA_HEADER, counts)
    }

    fn kind(&self) -> ReportKind {
        ReportKind::PickupCountsPerArea
    }
}

/// Counts records per key and hour. Keys whose records all carry a bad
/// timestamp are kept with zero counts.
fn count_by_hour<F>(records: &[TransactionRecord], key: F) -> BTreeMap<String, HourCounts>
where
    F: Fn(&TransactionRecord) -> String,
{
    let mut counts: BTreeMap<String, HourCounts> = BTreeMap::new();
    for record in records {
        let buckets = counts.entry(key(record)).or_insert([0; HOURS_PER_DAY]);
        match record.order_time() {
            Ok(time) => {
                if let Some(slot) = buckets.get_mut(time.hour() as usize) {
                    *slot += 1;
                }
            }
            Err(e) => warn!(user = %record.user_name(), error = %e, "skipping timestamp"),
        }
    }
    counts
}

fn hour_matrix(
    kind: ReportKind,
    key_header: &str,
    counts: BTreeMap<String, HourCounts>,
) -> ReportTable {
    let mut columns = vec![ReportColumn::new(key_header, KEY_WIDTH)];
    columns.extend(
        hour_bucket_labels()
            .into_iter()
            .map(|label| ReportColumn::new(label, HOUR_WIDTH)),
    );
    columns.push(ReportColumn::new(TOTAL_COLUMN, TOTAL_WIDTH));

    let mut table = ReportTable::new(kind.title(), columns);
    for (key, buckets) in counts {
        let total: u64 = buckets.iter().sum();
        let mut row = Vec::with_capacity(HOURS_PER_DAY + 2);
        row.push(CellValue::Text(key));
        row.extend(buckets.iter().map(|&n| CellValue::Integer(n)));
        row.push(CellValue::Integer(total));
        table.push_row(row);
    }
    table
}

/// Groups absolute amounts per user and reduces `(sum, parsed count)` to
/// one decimal measure.
fn fare_table<F>(kind: ReportKind, records: &[TransactionRecord], measure: F) -> ReportTable
where
    F: Fn(Decimal, u64) -> Decimal,
{
    let mut sums: BTreeMap<&str, (Decimal, u64)> = BTreeMap::new();
    for record in records {
        let entry = sums.entry(record.user_name()).or_insert((Decimal::ZERO, 0));
        match record.amount() {
            Ok(amount) => {
                entry.0 += amount.abs();
                entry.1 += 1;
            }
            Err(e) => warn!(user = %record.user_name(), error = %e, "skipping amount"),
        }
    }

    let mut table = ReportTable::new(
        kind.title(),
        vec![
            ReportColumn::new(USER_HEADER, KEY_WIDTH),
            ReportColumn::new(kind.title(), FARE_WIDTH),
        ],
    );
    for (user, (sum, count)) in sums {
        table.push_row(vec![
            CellValue::text(user),
            CellValue::Decimal(measure(sum, count)),
        ]);
    }
    table
}
