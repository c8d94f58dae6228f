//! Reporting utilities: grouped sales series and formatted terminal output.

pub mod format;

pub use format::*;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rand::Rng;

use crate::domain::FeatureTable;
use crate::domain::columns::DATE;
use crate::error::FeatureError;

/// Total of one value column per date for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySeries {
    pub category: String,
    /// `(date, total)` pairs, dates ascending.
    pub points: Vec<(NaiveDate, f64)>,
}

impl CategorySeries {
    pub fn total(&self) -> f64 {
        self.points.iter().map(|(_, v)| v).sum()
    }
}

/// Sum `value` per `(date, category)`, one series per distinct `category`
/// value in order of first appearance.
///
/// With `adjust`, each row's value is divided by that row's `adjust` value
/// before summing. Rows whose (adjusted) value is not finite are skipped.
pub fn group_sales(
    table: &FeatureTable,
    category: &str,
    value: &str,
    adjust: Option<&str>,
) -> Result<Vec<CategorySeries>, FeatureError> {
    table.require(&[DATE, category, value])?;
    let dates = table.dates(DATE)?;
    let categories = table.texts(category)?;
    let mut values = table.numbers(value)?;
    if let Some(adjust) = adjust {
        for (v, a) in values.iter_mut().zip(table.numbers(adjust)?) {
            *v /= a;
        }
    }

    let mut order: Vec<&str> = Vec::new();
    let mut sums: Vec<BTreeMap<NaiveDate, f64>> = Vec::new();

    for ((date, cat), v) in dates.iter().zip(categories).zip(values) {
        let idx = match order.iter().position(|c| *c == cat.as_str()) {
            Some(idx) => idx,
            None => {
                order.push(cat.as_str());
                sums.push(BTreeMap::new());
                order.len() - 1
            }
        };
        if v.is_finite() {
            *sums[idx].entry(*date).or_insert(0.0) += v;
        }
    }

    Ok(order
        .into_iter()
        .zip(sums)
        .map(|(category, points)| CategorySeries {
            category: category.to_string(),
            points: points.into_iter().collect(),
        })
        .collect())
}

/// Divide every point by its series total (each series then sums to 1).
pub fn share_of_total(series: &[CategorySeries]) -> Vec<CategorySeries> {
    series
        .iter()
        .map(|s| {
            let total = s.total();
            let scale = if total.abs() > 0.0 { 1.0 / total } else { 0.0 };
            CategorySeries {
                category: s.category.clone(),
                points: s.points.iter().map(|&(d, v)| (d, v * scale)).collect(),
            }
        })
        .collect()
}

/// One histogram bar covering `[lo, hi)`; the last bar also holds `hi`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

/// Equal-width histogram of the finite `values`.
///
/// Empty when there is nothing finite to count or `bins` is zero. When all
/// values are equal they land in the first bar of a unit-wide range.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if hi <= lo {
        hi = lo + 1.0;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in finite {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lo: lo + width * i as f64,
            hi: lo + width * (i + 1) as f64,
            count,
        })
        .collect()
}

/// Every point value of every series, in series order.
pub fn point_values(series: &[CategorySeries]) -> Vec<f64> {
    series.iter().flat_map(|s| s.points.iter().map(|&(_, v)| v)).collect()
}

/// Up to `n` distinct row indices out of `len`, ascending.
pub fn sample_rows<R: Rng + ?Sized>(len: usize, n: usize, rng: &mut R) -> Vec<usize> {
    let mut rows = rand::seq::index::sample(rng, len, n.min(len)).into_vec();
    rows.sort_unstable();
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Column;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 1, day).unwrap()
    }

    fn table() -> FeatureTable {
        let mut t = FeatureTable::new();
        t.insert(DATE, Column::Date(vec![d(2), d(1), d(1), d(1)])).unwrap();
        t.insert(
            "country",
            Column::Text(vec!["Spain".into(), "Spain".into(), "Japan".into(), "Spain".into()]),
        )
        .unwrap();
        t.insert("num_sold", Column::Int(vec![5, 2, 7, 3])).unwrap();
        t
    }

    #[test]
    fn group_sales_sums_per_date_and_keeps_first_seen_order() {
        let series = group_sales(&table(), "country", "num_sold", None).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].category, "Spain");
        assert_eq!(series[0].points, vec![(d(1), 5.0), (d(2), 5.0)]);
        assert_eq!(series[1].category, "Japan");
        assert_eq!(series[1].points, vec![(d(1), 7.0)]);
    }

    #[test]
    fn share_of_total_normalizes_each_series() {
        let series = group_sales(&table(), "country", "num_sold", None).unwrap();
        let shares = share_of_total(&series);
        assert!((shares[0].total() - 1.0).abs() < 1e-12);
        assert!((shares[0].points[0].1 - 0.5).abs() < 1e-12);
        assert!((shares[1].total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn group_sales_requires_the_category_column() {
        let err = group_sales(&table(), "store", "num_sold", None).unwrap_err();
        assert_eq!(err, FeatureError::MissingColumn("store".to_string()));
    }

    #[test]
    fn adjustment_divides_each_row_before_summing() {
        let mut t = table();
        t.insert("gdp", Column::Float(vec![2.5, 2.0, 0.0, 1.0])).unwrap();

        let series = group_sales(&t, "country", "num_sold", Some("gdp")).unwrap();
        // Spain on the 1st: 2 / 2 + 3 / 1.
        assert_eq!(series[0].points, vec![(d(1), 4.0), (d(2), 2.0)]);
        // Japan's only row divides by zero and is dropped.
        assert_eq!(series[1].category, "Japan");
        assert!(series[1].points.is_empty());
    }

    #[test]
    fn adjustment_column_must_exist() {
        let err = group_sales(&table(), "country", "num_sold", Some("gdp")).unwrap_err();
        assert_eq!(err, FeatureError::MissingColumn("gdp".to_string()));
    }

    #[test]
    fn histogram_counts_every_finite_value_once() {
        let bins = histogram(&[0.0, 0.1, 0.5, 0.9, 1.0, f64::NAN], 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins.iter().map(|b| b.count).collect::<Vec<_>>(), vec![2, 0, 1, 2]);
        assert_eq!(bins[0].lo, 0.0);
        assert_eq!(bins[3].hi, 1.0);
    }

    #[test]
    fn histogram_of_constant_or_empty_input() {
        let bins = histogram(&[3.0, 3.0], 5);
        assert_eq!(bins[0].count, 2);
        assert!((bins[4].hi - 4.0).abs() < 1e-12);
        assert!(histogram(&[], 5).is_empty());
        assert!(histogram(&[f64::INFINITY], 5).is_empty());
        assert!(histogram(&[1.0], 0).is_empty());
    }

    #[test]
    fn histogram_of_normalized_points() {
        let series = group_sales(&table(), "country", "num_sold", None).unwrap();
        let values = point_values(&share_of_total(&series));
        assert_eq!(values.len(), 3);
        assert!((values[0] - 0.5).abs() < 1e-12 && (values[2] - 1.0).abs() < 1e-12);
        let bins = histogram(&values, 2);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[1].count, 1);
    }

    #[test]
    fn sample_rows_are_distinct_sorted_and_bounded() {
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let mut rng = StdRng::seed_from_u64(7);
        let rows = sample_rows(100, 5, &mut rng);
        assert_eq!(rows.len(), 5);
        assert!(rows.windows(2).all(|w| w[0] < w[1]));
        assert!(rows.iter().all(|&r| r < 100));

        assert_eq!(sample_rows(3, 5, &mut rng), vec![0, 1, 2]);
        assert!(sample_rows(0, 5, &mut rng).is_empty());
    }
}
