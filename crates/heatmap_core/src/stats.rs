//! Summary statistics over the attribute table.
//!
//! [`GlobalStats`] covers every (feature, year) value and anchors the radius
//! scale. [`SelectionStats`] covers one year over the rendered features and
//! drives the legend; its `mean` is the midpoint of min and max, not the
//! arithmetic mean, which keeps legend values identical to the web map's.

use serde::Serialize;

use crate::domain::{AttributeKey, Dataset, Feature};
use crate::error::{HeatmapError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GlobalStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelectionStats {
    pub min: f64,
    pub max: f64,
    /// `(min + max) / 2`.
    pub mean: f64,
}

/// Min, max and arithmetic mean over every present value of every key.
pub fn compute_global_stats<'a, I>(features: I, keys: &[AttributeKey]) -> Result<GlobalStats>
where
    I: IntoIterator<Item = &'a Feature>,
{
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    let mut count = 0_u32;

    for feature in features {
        for value in keys.iter().filter_map(|key| feature.value(key)) {
            min = min.min(value);
            max = max.max(value);
            sum += value;
            count += 1;
        }
    }

    if count == 0 {
        return Err(HeatmapError::EmptyDataset);
    }

    // Clamp so rounding in the sum cannot push the mean outside the extrema.
    let mean = (sum / f64::from(count)).clamp(min, max);
    Ok(GlobalStats { min, max, mean })
}

/// Min, max and midpoint for one key. Features without the key are skipped.
pub fn compute_selection_stats<'a, I>(features: I, key: &AttributeKey) -> Result<SelectionStats>
where
    I: IntoIterator<Item = &'a Feature>,
{
    let (min, max) = features
        .into_iter()
        .filter_map(|feature| feature.value(key))
        .fold(None, |acc: Option<(f64, f64)>, value| {
            Some(acc.map_or((value, value), |(min, max)| {
                (min.min(value), max.max(value))
            }))
        })
        .ok_or_else(|| HeatmapError::NoDataForYear {
            year: key.label().to_string(),
        })?;

    Ok(SelectionStats {
        min,
        max,
        mean: (min + max) / 2.0,
    })
}

/// Selection stats for one key, or the reason there are none.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSummary {
    pub attribute: String,
    pub year: String,
    pub stats: Option<SelectionStats>,
}

/// Per-year summaries over the rendered features, in key order.
pub fn year_summaries(dataset: &Dataset) -> Vec<YearSummary> {
    dataset
        .keys()
        .iter()
        .map(|key| YearSummary {
            attribute: key.name().to_string(),
            year: key.label().to_string(),
            stats: compute_selection_stats(dataset.rendered_features(), key).ok(),
        })
        .collect()
}

/// Legend rows from top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LegendRow {
    Max,
    Mean,
    Min,
}

impl LegendRow {
    pub const ALL: [Self; 3] = [Self::Max, Self::Mean, Self::Min];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Max => "max",
            Self::Mean => "mean",
            Self::Min => "min",
        }
    }

    /// Fixed vertical centre of the row in legend units.
    pub const fn cy(self) -> f64 {
        match self {
            Self::Max => 30.0,
            Self::Mean => 70.0,
            Self::Min => 110.0,
        }
    }

    pub const fn value(self, stats: &SelectionStats) -> f64 {
        match self {
            Self::Max => stats.max,
            Self::Mean => stats.mean,
            Self::Min => stats.min,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeatureId, Position};
    use proptest::prelude::*;

    const ORIGIN: Option<Position> = Some(Position { lon: 0.0, lat: 0.0 });

    fn keys() -> (AttributeKey, AttributeKey) {
        (
            AttributeKey::new("Temp_2018", "Temp_"),
            AttributeKey::new("Temp_2019", "Temp_"),
        )
    }

    fn two_cities() -> Result<Vec<Feature>> {
        let (y2018, y2019) = keys();
        Ok(vec![
            Feature::new(FeatureId(0), "A", ORIGIN)
                .with_value(&y2018, 10.0)?
                .with_value(&y2019, 20.0)?,
            Feature::new(FeatureId(1), "B", ORIGIN)
                .with_value(&y2018, 30.0)?
                .with_value(&y2019, 40.0)?,
        ])
    }

    #[test]
    fn global_stats_over_every_value() -> Result<()> {
        let (y2018, y2019) = keys();
        let features = two_cities()?;
        let stats = compute_global_stats(&features, &[y2018, y2019])?;

        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 40.0);
        assert_eq!(stats.mean, 25.0);
        Ok(())
    }

    #[test]
    fn global_stats_ordering_holds_for_uneven_values() -> Result<()> {
        let key = AttributeKey::new("Temp_2018", "Temp_");
        let values = [0.1, 0.2, 0.3, 1e-9, 7.77, 99.5, 99.5, 3.0];
        let features = values
            .iter()
            .enumerate()
            .map(|(index, value)| Feature::new(FeatureId(index), "x", ORIGIN).with_value(&key, *value))
            .collect::<Result<Vec<_>>>()?;

        let stats = compute_global_stats(&features, std::slice::from_ref(&key))?;
        assert_eq!(stats.min, 1e-9);
        assert_eq!(stats.max, 99.5);
        assert!(stats.min <= stats.mean && stats.mean <= stats.max);
        Ok(())
    }

    #[test]
    fn global_stats_fail_without_values() {
        let (y2018, _) = keys();
        let features = vec![Feature::new(FeatureId(0), "A", ORIGIN)];
        assert_eq!(
            compute_global_stats(&features, &[y2018]),
            Err(HeatmapError::EmptyDataset)
        );
    }

    #[test]
    fn selection_mean_is_midpoint() -> Result<()> {
        let (y2018, _) = keys();
        let mut features = two_cities()?;
        features.push(Feature::new(FeatureId(2), "C", ORIGIN).with_value(&y2018, 11.0)?);

        let stats = compute_selection_stats(&features, &y2018)?;
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 30.0);
        assert_eq!(stats.mean, 20.0);
        Ok(())
    }

    #[test]
    fn selection_skips_features_without_the_key() -> Result<()> {
        let (y2018, y2019) = keys();
        let features = vec![
            Feature::new(FeatureId(0), "A", ORIGIN)
                .with_value(&y2018, 10.0)?
                .with_value(&y2019, 20.0)?,
            Feature::new(FeatureId(1), "B", ORIGIN).with_value(&y2018, 5.0)?,
        ];

        let stats = compute_selection_stats(&features, &y2019)?;
        assert_eq!((stats.min, stats.max), (20.0, 20.0));
        Ok(())
    }

    #[test]
    fn selection_without_data_reports_the_year() -> Result<()> {
        let (y2018, y2019) = keys();
        let features = vec![Feature::new(FeatureId(0), "A", ORIGIN).with_value(&y2018, 10.0)?];

        assert_eq!(
            compute_selection_stats(&features, &y2019),
            Err(HeatmapError::NoDataForYear {
                year: "2019".to_string()
            })
        );
        Ok(())
    }

    #[test]
    fn legend_rows_pick_their_values() {
        let stats = SelectionStats {
            min: 1.0,
            max: 9.0,
            mean: 5.0,
        };
        let values = LegendRow::ALL.map(|row| row.value(&stats));
        assert_eq!(values, [9.0, 5.0, 1.0]);
        assert!(LegendRow::Max.cy() < LegendRow::Mean.cy());
        assert!(LegendRow::Mean.cy() < LegendRow::Min.cy());
    }

    /// Value sets of varying size and magnitude, each value repeated
    /// `copies` times so duplicates are common.
    fn value_sets() -> impl Strategy<Value = Vec<f64>> {
        (
            prop::collection::vec(
                prop_oneof![-50.0..0.0f64, 1e-9..1e-3f64, 0.0..150.0f64, 1e3..1e9f64],
                1..48,
            ),
            1..4usize,
        )
            .prop_map(|(values, copies)| {
                values
                    .iter()
                    .flat_map(|value| std::iter::repeat(*value).take(copies))
                    .collect()
            })
    }

    fn spread_over_two_years(values: &[f64]) -> Result<Vec<Feature>> {
        let (y2018, y2019) = keys();
        values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let key = if index % 2 == 0 { &y2018 } else { &y2019 };
                Feature::new(FeatureId(index), "x", ORIGIN).with_value(key, *value)
            })
            .collect()
    }

    proptest! {
        #[test]
        fn global_stats_bracket_the_mean(values in value_sets()) {
            let (y2018, y2019) = keys();
            let features = spread_over_two_years(&values)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            let stats = compute_global_stats(&features, &[y2018, y2019])
                .map_err(|e| TestCaseError::fail(e.to_string()))?;

            let true_min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let true_max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert_eq!(stats.min, true_min);
            prop_assert_eq!(stats.max, true_max);
            prop_assert!(stats.min <= stats.mean && stats.mean <= stats.max, "{:?}", stats);
        }

        #[test]
        fn selection_stats_bracket_the_midpoint(values in value_sets()) {
            let (y2018, _) = keys();
            let features = spread_over_two_years(&values)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            let stats = compute_selection_stats(&features, &y2018)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;

            prop_assert!(stats.min <= stats.mean && stats.mean <= stats.max, "{:?}", stats);
        }
    }
}
