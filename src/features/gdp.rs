//! GDP per capita column.

use std::collections::HashMap;

use tracing::warn;

use crate::domain::columns::{COUNTRY, GDP, YEAR};
use crate::domain::{Column, Country, FeatureTable};
use crate::error::FeatureError;

/// GDP per capita (current US$) keyed by country and year.
pub type GdpLookup = HashMap<(Country, i32), f64>;

/// Add a `gdp` column from `lookup`. Rows without a value get NaN.
pub fn attach_gdp(target: &mut FeatureTable, lookup: &GdpLookup) -> Result<(), FeatureError> {
    target.require(&[COUNTRY, YEAR])?;

    let values = {
        let countries = target.texts(COUNTRY)?;
        let years = target.ints(YEAR)?;
        let mut missing = 0usize;
        let values: Vec<f64> = countries
            .iter()
            .zip(years)
            .map(|(name, &year)| {
                let value = Country::from_name(name)
                    .zip(i32::try_from(year).ok())
                    .and_then(|key| lookup.get(&key).copied());
                value.unwrap_or_else(|| {
                    missing += 1;
                    f64::NAN
                })
            })
            .collect();
        if missing > 0 {
            warn!(rows = missing, "no GDP value for some rows");
        }
        values
    };

    target.insert(GDP, Column::Float(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_by_country_and_year() {
        let mut t = FeatureTable::new();
        t.insert(COUNTRY, Column::Text(vec!["Spain".into(), "Japan".into(), "Spain".into()]))
            .unwrap();
        t.insert(YEAR, Column::Int(vec![2019, 2019, 2020])).unwrap();

        let lookup: GdpLookup = [((Country::Spain, 2019), 29_600.0), ((Country::Japan, 2019), 40_400.0)]
            .into_iter()
            .collect();
        attach_gdp(&mut t, &lookup).unwrap();

        let gdp = t.floats(GDP).unwrap();
        assert_eq!(gdp[0], 29_600.0);
        assert_eq!(gdp[1], 40_400.0);
        assert!(gdp[2].is_nan());
    }

    #[test]
    fn out_of_range_year_is_missing_not_truncated() {
        let mut t = FeatureTable::new();
        t.insert(COUNTRY, Column::Text(vec!["Spain".into(), "spain".into()])).unwrap();
        // 2019 + 2^32 truncates to 2019 with `as i32`.
        t.insert(YEAR, Column::Int(vec![2019 + (1_i64 << 32), 2019])).unwrap();

        let lookup: GdpLookup = [((Country::Spain, 2019), 29_600.0)].into_iter().collect();
        attach_gdp(&mut t, &lookup).unwrap();

        let gdp = t.floats(GDP).unwrap();
        assert!(gdp[0].is_nan());
        assert!(gdp[1].is_nan());
    }
}
