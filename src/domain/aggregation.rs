// Consumption aggregation - date filtering, grouping and top-N ranking
use super::error::{DashboardError, Result};
use super::record::{parse_date, Record, UNKNOWN};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;

/// Business axis records are grouped on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    CloudProvider,
    Region,
    Account,
    Service,
    FinancialDomain,
    /// Any unrecognised name; every record lands in one `"Unknown"` group
    Unrecognized,
}

impl Dimension {
    pub fn from_param(name: &str) -> Self {
        match name {
            "CloudProvider" => Dimension::CloudProvider,
            "Region" => Dimension::Region,
            "Account" => Dimension::Account,
            "Service" => Dimension::Service,
            "FinancialDomain" => Dimension::FinancialDomain,
            _ => Dimension::Unrecognized,
        }
    }

    pub fn key(&self, record: &Record) -> String {
        match self {
            Dimension::CloudProvider => record.label("providerName"),
            Dimension::Region => Self::composite(record, "region"),
            Dimension::Account => Self::composite(record, "accountId"),
            Dimension::Service => Self::composite(record, "serviceName"),
            Dimension::FinancialDomain => record.label("domain"),
            Dimension::Unrecognized => UNKNOWN.to_string(),
        }
    }

    fn composite(record: &Record, field: &str) -> String {
        format!("{}-{}", record.label("providerName"), record.label(field))
    }
}

/// Calendar granularity used inside a dimension group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeGrouping {
    Month,
    Quarter,
    Year,
    /// Fallback for any other name: one bucket per raw date string
    Day,
}

impl TimeGrouping {
    pub fn from_param(name: &str) -> Self {
        match name {
            "month" => TimeGrouping::Month,
            "quarter" => TimeGrouping::Quarter,
            "year" => TimeGrouping::Year,
            _ => TimeGrouping::Day,
        }
    }

    /// Bucket label for a record dated `date`, whose stored text is `raw`
    pub fn bucket(&self, date: NaiveDate, raw: &str) -> String {
        match self {
            TimeGrouping::Month => format!("{}-{:02}", date.year(), date.month()),
            TimeGrouping::Quarter => format!("{}-Q{}", date.year(), (date.month() - 1) / 3 + 1),
            TimeGrouping::Year => date.year().to_string(),
            TimeGrouping::Day => raw.to_string(),
        }
    }
}

/// How many groups to keep after ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxDisplay {
    All,
    Top(usize),
}

impl FromStr for MaxDisplay {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(MaxDisplay::All);
        }
        s.parse::<usize>()
            .map(MaxDisplay::Top)
            .map_err(|e| DashboardError::Parse(format!("invalid maxDisplay '{}': {}", s, e)))
    }
}

/// Validated aggregation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationQuery {
    pub dimension: Dimension,
    pub time_grouping: TimeGrouping,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub max_display: MaxDisplay,
}

impl AggregationQuery {
    pub fn parse(
        dimension: &str,
        group_by: &str,
        from: &str,
        to: &str,
        max_display: &str,
    ) -> Result<Self> {
        Ok(Self {
            dimension: Dimension::from_param(dimension),
            time_grouping: TimeGrouping::from_param(group_by),
            from: parse_date(from)?,
            to: parse_date(to)?,
            max_display: max_display.parse()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedValue {
    pub time_period: String,
    pub total_consumption: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationGroup {
    pub key: String,
    /// Only set for `FinancialDomain`; `null` when the first record has none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<Value>,
    pub aggregated_values: Vec<AggregatedValue>,
}

struct GroupAccumulator {
    key: String,
    budget: Option<Value>,
    values: Vec<AggregatedValue>,
    index: HashMap<String, usize>,
}

impl GroupAccumulator {
    fn new(key: String, budget: Option<Value>) -> Self {
        Self {
            key,
            budget,
            values: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn add(&mut self, period: String, amount: f64) {
        match self.index.get(&period) {
            Some(&i) => self.values[i].total_consumption += amount,
            None => {
                self.index.insert(period.clone(), self.values.len());
                self.values.push(AggregatedValue {
                    time_period: period,
                    total_consumption: amount,
                });
            }
        }
    }

    fn total(&self) -> f64 {
        self.values.iter().map(|v| v.total_consumption).sum()
    }

    fn finish(self) -> AggregationGroup {
        AggregationGroup {
            key: self.key,
            budget: self.budget,
            aggregated_values: self.values,
        }
    }
}

/// Filter `records` to the query's inclusive date range, group them by
/// dimension and time bucket and sum consumption per bucket.
///
/// Groups and buckets come out in first-appearance order. Every record
/// date is validated, including those outside the range, so one bad
/// record fails the whole call.
pub fn filter_and_aggregate(
    records: &[Record],
    query: &AggregationQuery,
) -> Result<Vec<AggregationGroup>> {
    let mut groups: Vec<GroupAccumulator> = Vec::new();
    let mut group_index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let date = record.date()?;
        if date < query.from || date > query.to {
            continue;
        }

        let key = query.dimension.key(record);
        let slot = match group_index.get(&key) {
            Some(&i) => i,
            None => {
                // First record of the group supplies the budget
                let budget = (query.dimension == Dimension::FinancialDomain)
                    .then(|| record.budget());
                group_index.insert(key.clone(), groups.len());
                groups.push(GroupAccumulator::new(key, budget));
                groups.len() - 1
            }
        };

        let period = query.time_grouping.bucket(date, record.date_text()?);
        groups[slot].add(period, record.consumption());
    }

    if let MaxDisplay::Top(limit) = query.max_display {
        let mut ranked: Vec<(f64, GroupAccumulator)> =
            groups.into_iter().map(|g| (g.total(), g)).collect();
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
        ranked.truncate(limit);
        groups = ranked.into_iter().map(|(_, g)| g).collect();
    }

    Ok(groups.into_iter().map(GroupAccumulator::finish).collect())
}
