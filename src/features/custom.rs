//! Custom post-Christmas decay column.
//!
//! Uses the influence kernel shape, but anchored on fixed calendar positions
//! (December 26 onwards) for selected countries instead of on holiday dates.

use crate::domain::columns::{COUNTRY, DAY, MONTH};
use crate::domain::{Column, Country, FeatureTable};
use crate::error::FeatureError;
use crate::features::kernel::InfluenceKernel;

const ANCHOR_DAY: i64 = 26;
const JANUARY_SHIFT: i64 = 5;

/// Write `column` into `target`: `kernel[k]` on December `26 + k` and on
/// January `k - 5` for rows of `countries`, 0 elsewhere.
///
/// Offsets whose January day is not positive match nothing. Values are
/// assigned, not accumulated.
pub fn custom_holiday_feature(
    target: &mut FeatureTable,
    countries: &[Country],
    column: &str,
    kernel: &InfluenceKernel,
) -> Result<(), FeatureError> {
    target.require(&[COUNTRY, MONTH, DAY])?;

    let values = {
        let months = target.ints(MONTH)?;
        let days = target.ints(DAY)?;
        let selected: Vec<bool> = target
            .texts(COUNTRY)?
            .iter()
            .map(|c| Country::from_name(c).is_some_and(|c| countries.contains(&c)))
            .collect();

        let mut values = vec![0.0; target.len()];
        for (offset, weight) in kernel.iter() {
            let k = offset as i64;
            for row in 0..values.len() {
                if !selected[row] {
                    continue;
                }
                let december = months[row] == 12 && days[row] == ANCHOR_DAY + k;
                let january = months[row] == 1 && days[row] == k - JANUARY_SHIFT;
                if december || january {
                    values[row] = weight;
                }
            }
        }
        values
    };

    target.insert(column, Column::Float(values))
}
