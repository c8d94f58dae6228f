//! Holiday curation.
//!
//! The holiday source over-reports relative to what shows up as a sales bump
//! in the data. Curation drops those entries, plus the New Year and Christmas
//! days that get their own indicator columns instead of the generic kernel.
//!
//! The exclusions are data, not control flow: each [`ExclusionRule`] pairs a
//! set of countries with a date predicate, and a record is dropped when any
//! rule matches it. Rules only remove, so their order is irrelevant.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::domain::{Country, HolidayRecord, HolidayTable};

use Country::{Argentina, Canada, Estonia, Japan, Spain};

/// Date side of an exclusion rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePredicate {
    /// Any date falling in one of these months.
    Months(&'static [u32]),
    /// This month/day in every configured year.
    EveryYear { month: u32, day: u32 },
    /// Exactly these `(year, month, day)` dates.
    Dates(&'static [(i32, u32, u32)]),
}

impl DatePredicate {
    pub fn matches(&self, date: NaiveDate, years: &[i32]) -> bool {
        match *self {
            DatePredicate::Months(months) => months.contains(&date.month()),
            DatePredicate::EveryYear { month, day } => {
                date.month() == month && date.day() == day && years.contains(&date.year())
            }
            DatePredicate::Dates(dates) => dates
                .iter()
                .any(|&(y, m, d)| date.year() == y && date.month() == m && date.day() == d),
        }
    }
}

/// Drop a holiday when its country is listed and its date matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExclusionRule {
    pub countries: &'static [Country],
    pub date: DatePredicate,
    pub reason: &'static str,
}

impl ExclusionRule {
    pub fn matches(&self, record: &HolidayRecord, years: &[i32]) -> bool {
        self.countries.contains(&record.country) && self.date.matches(record.date, years)
    }
}

pub const EXCLUSION_RULES: &[ExclusionRule] = &[
    ExclusionRule {
        countries: &[Canada],
        date: DatePredicate::Months(&[2, 4, 5, 8, 10]),
        reason: "no holiday upturn in these months",
    },
    ExclusionRule {
        countries: &[Argentina, Canada, Estonia, Spain],
        date: DatePredicate::EveryYear { month: 1, day: 1 },
        reason: "new year has its own indicator columns",
    },
    ExclusionRule {
        countries: &[Spain],
        date: DatePredicate::Dates(&[(2017, 1, 2)]),
        reason: "no observed effect",
    },
    ExclusionRule {
        countries: &[Argentina, Canada, Estonia, Spain],
        date: DatePredicate::EveryYear { month: 12, day: 25 },
        reason: "christmas has its own indicator columns",
    },
    ExclusionRule {
        countries: &[Spain],
        date: DatePredicate::Dates(&[(2022, 12, 26)]),
        reason: "no observed effect",
    },
    ExclusionRule {
        countries: &[Canada, Estonia],
        date: DatePredicate::EveryYear { month: 12, day: 26 },
        reason: "second christmas day is a custom decay column",
    },
    ExclusionRule {
        countries: &[Canada],
        date: DatePredicate::Dates(&[(2020, 12, 28), (2021, 12, 27), (2021, 12, 28), (2022, 12, 27)]),
        reason: "trailing observed days with no effect",
    },
    ExclusionRule {
        countries: &[Japan],
        date: DatePredicate::Dates(&[(2018, 12, 24)]),
        reason: "not celebrated in the data",
    },
];

/// First rule that excludes `record`, if any.
pub fn excluded_by(record: &HolidayRecord, years: &[i32]) -> Option<&'static ExclusionRule> {
    EXCLUSION_RULES.iter().find(|rule| rule.matches(record, years))
}

/// Filter raw holidays down to the ones modelled by the generic kernel.
///
/// `raw` is the enumeration for `years` × `countries`. Duplicates are kept:
/// coincident holidays compound when merged.
pub fn curate(raw: &[HolidayRecord], years: &[i32], countries: &[Country]) -> HolidayTable {
    let kept: Vec<HolidayRecord> = raw
        .iter()
        .filter(|record| match excluded_by(record, years) {
            Some(rule) => {
                debug!(date = %record.date, country = %record.country, reason = rule.reason, "holiday excluded");
                false
            }
            None => true,
        })
        .copied()
        .collect();

    let table = HolidayTable::new(kept);
    for &country in countries {
        let before = raw.iter().filter(|r| r.country == country).count();
        debug!(%country, raw = before, kept = table.count_for(country), "curated holidays");
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn every_day(years: &[i32]) -> Vec<HolidayRecord> {
        let mut out = Vec::new();
        for &year in years {
            let mut date = d(year, 1, 1);
            while date.year() == year {
                for country in Country::ALL {
                    out.push(HolidayRecord::new(date, country));
                }
                date = date.succ_opt().unwrap();
            }
        }
        out
    }

    #[test]
    fn curated_output_matches_no_exclusion_rule() {
        let years = [2017, 2018, 2019, 2020, 2021, 2022];
        let raw = every_day(&years);
        let table = curate(&raw, &years, &Country::ALL);

        assert!(table.len() < raw.len());
        for record in table.iter() {
            for rule in EXCLUSION_RULES {
                assert!(
                    !rule.matches(record, &years),
                    "{} {} survived rule `{}`",
                    record.date,
                    record.country,
                    rule.reason
                );
            }
        }
    }

    #[test]
    fn each_rule_drops_its_dates_and_keeps_neighbours() {
        use Country::*;

        // (year, month, day, country, kept)
        let cases: &[(i32, u32, u32, Country, bool)] = &[
            // Canada, quiet months
            (2019, 2, 18, Canada, false),
            (2019, 4, 19, Canada, false),
            (2019, 5, 20, Canada, false),
            (2019, 8, 5, Canada, false),
            (2019, 10, 14, Canada, false),
            (2019, 3, 15, Canada, true),
            (2019, 6, 24, Canada, true),
            (2019, 7, 1, Canada, true),
            (2019, 9, 2, Canada, true),
            (2019, 11, 11, Canada, true),
            (2019, 12, 1, Canada, true),
            (2019, 10, 12, Spain, true),
            // January 1
            (2020, 1, 1, Argentina, false),
            (2020, 1, 1, Canada, false),
            (2020, 1, 1, Estonia, false),
            (2020, 1, 1, Spain, false),
            (2020, 1, 1, Japan, true),
            // Spain 2017-01-02
            (2017, 1, 2, Spain, false),
            (2018, 1, 2, Spain, true),
            (2017, 1, 2, Argentina, true),
            // December 25
            (2019, 12, 25, Argentina, false),
            (2019, 12, 25, Canada, false),
            (2019, 12, 25, Estonia, false),
            (2019, 12, 25, Spain, false),
            (2019, 12, 25, Japan, true),
            // Spain 2022-12-26
            (2022, 12, 26, Spain, false),
            (2021, 12, 26, Spain, true),
            // December 26, Canada and Estonia
            (2018, 12, 26, Canada, false),
            (2018, 12, 26, Estonia, false),
            (2018, 12, 26, Argentina, true),
            // Canada observed days
            (2020, 12, 28, Canada, false),
            (2021, 12, 27, Canada, false),
            (2021, 12, 28, Canada, false),
            (2022, 12, 27, Canada, false),
            (2020, 12, 27, Canada, true),
            (2022, 12, 28, Canada, true),
            (2021, 12, 27, Estonia, true),
            // Japan 2018-12-24
            (2018, 12, 24, Japan, false),
            (2019, 12, 24, Japan, true),
            (2018, 12, 24, Estonia, true),
        ];

        let years = [2017, 2018, 2019, 2020, 2021, 2022];
        let raw: Vec<HolidayRecord> = cases
            .iter()
            .map(|&(y, m, day, c, _)| HolidayRecord::new(d(y, m, day), c))
            .collect();
        let expected: Vec<HolidayRecord> = cases
            .iter()
            .filter(|case| case.4)
            .map(|&(y, m, day, c, _)| HolidayRecord::new(d(y, m, day), c))
            .collect();

        let table = curate(&raw, &years, &Country::ALL);
        assert_eq!(table.records(), expected.as_slice());
    }

    #[test]
    fn canada_new_year_dropped_march_kept() {
        let raw = vec![
            HolidayRecord::new(d(2023, 1, 1), Country::Canada),
            HolidayRecord::new(d(2023, 3, 15), Country::Canada),
        ];
        let table = curate(&raw, &[2023], &[Country::Canada]);
        assert_eq!(table.records(), &[HolidayRecord::new(d(2023, 3, 15), Country::Canada)]);
    }

    #[test]
    fn annual_rules_only_apply_to_configured_years() {
        let raw = vec![HolidayRecord::new(d(2016, 12, 25), Country::Spain)];
        let table = curate(&raw, &[2017], &[Country::Spain]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn japan_keeps_new_year_and_christmas_eve_outside_2018() {
        let years = [2018, 2019];
        let raw = vec![
            HolidayRecord::new(d(2019, 1, 1), Country::Japan),
            HolidayRecord::new(d(2018, 12, 24), Country::Japan),
            HolidayRecord::new(d(2019, 12, 24), Country::Japan),
        ];
        let table = curate(&raw, &years, &[Country::Japan]);
        assert_eq!(
            table.records(),
            &[
                HolidayRecord::new(d(2019, 1, 1), Country::Japan),
                HolidayRecord::new(d(2019, 12, 24), Country::Japan),
            ]
        );
    }

    #[test]
    fn duplicates_survive_curation() {
        let rec = HolidayRecord::new(d(2020, 3, 20), Country::Japan);
        let table = curate(&[rec, rec], &[2020], &[Country::Japan]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn empty_input_gives_empty_table() {
        assert!(curate(&[], &[2020], &Country::ALL).is_empty());
    }

    #[test]
    fn boxing_day_is_dropped_for_canada_and_estonia_only() {
        let years = [2021];
        let raw: Vec<HolidayRecord> = Country::ALL
            .into_iter()
            .map(|c| HolidayRecord::new(d(2021, 12, 26), c))
            .collect();
        let table = curate(&raw, &years, &Country::ALL);
        let kept: Vec<Country> = table.iter().map(|r| r.country).collect();
        assert_eq!(kept, vec![Country::Argentina, Country::Japan, Country::Spain]);
    }
}
