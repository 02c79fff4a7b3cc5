use super::model::Dataset;

// ---------------------------------------------------------------------------
// Series – one region's values of one dataset over the year axis
// ---------------------------------------------------------------------------

/// x/y series for plotting; `None` marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub points: Vec<(i32, Option<f64>)>,
}

impl Series {
    /// Reshape the first row for `region` into points over `years`.
    ///
    /// `None` when the region has no row in this dataset.
    pub fn for_region(dataset: &Dataset, region: &str, years: &[i32]) -> Option<Series> {
        let row = dataset.find_region(region)?;
        let points = years
            .iter()
            .map(|&year| {
                if dataset.year_column_index(year).is_none() {
                    log::debug!(
                        "{} has no column for {year}",
                        dataset.source.display()
                    );
                }
                (year, dataset.value(row, year))
            })
            .collect();
        Some(Series { points })
    }

    /// Runs of consecutive defined points, so a line breaks at gaps.
    pub fn segments(&self) -> Vec<Vec<[f64; 2]>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for &(year, value) in &self.points {
            match value {
                Some(v) => current.push([year as f64, v]),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    /// Defined points only.
    pub fn defined(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.points.iter().filter_map(|&(y, v)| Some((y, v?)))
    }

    pub fn summary(&self) -> TopicSummary {
        let defined: Vec<(i32, f64)> = self.defined().collect();
        let values = defined.iter().map(|&(_, v)| v);

        let mean = if defined.is_empty() {
            None
        } else {
            Some(values.clone().sum::<f64>() / defined.len() as f64)
        };

        TopicSummary {
            latest: defined.last().copied(),
            previous: defined.len().checked_sub(2).map(|i| defined[i]),
            min: values.clone().reduce(f64::min),
            max: values.reduce(f64::max),
            mean,
        }
    }
}

/// Headline numbers of one topic over the selected years.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TopicSummary {
    /// Last defined `(year, value)`.
    pub latest: Option<(i32, f64)>,
    /// Defined point preceding `latest`.
    pub previous: Option<(i32, f64)>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

impl TopicSummary {
    /// Change of `latest` against `previous`.
    pub fn delta(&self) -> Option<f64> {
        Some(self.latest?.1 - self.previous?.1)
    }

    /// Relative change in percent; `None` when the previous value is zero.
    pub fn delta_percent(&self) -> Option<f64> {
        let (_, prev) = self.previous?;
        if prev == 0.0 {
            return None;
        }
        Some(self.delta()? / prev.abs() * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Row};
    use encoding_rs::UTF_8;
    use std::path::Path;

    fn dataset() -> Dataset {
        Dataset::new(
            Path::new("housing.csv"),
            UTF_8,
            vec!["Name".into(), "2019".into(), "2020".into(), "2021".into()],
            vec![
                Row {
                    cells: vec![
                        CellValue::Text("Moscow".into()),
                        CellValue::Integer(10),
                        CellValue::Null,
                        CellValue::Integer(30),
                    ],
                },
                Row {
                    cells: vec![
                        CellValue::Text("Kazan".into()),
                        CellValue::Float(1.5),
                        CellValue::Float(2.5),
                        CellValue::Text("?".into()),
                    ],
                },
            ],
        )
    }

    #[test]
    fn series_for_known_region() {
        let ds = dataset();
        let s = Series::for_region(&ds, "Moscow", &[2019, 2020, 2021]).unwrap();
        assert_eq!(s.points, vec![(2019, Some(10.0)), (2020, None), (2021, Some(30.0))]);
        assert!(Series::for_region(&ds, "Omsk", &[2019]).is_none());
    }

    #[test]
    fn missing_year_column_yields_null_point() {
        let ds = dataset();
        let s = Series::for_region(&ds, "Kazan", &[2020, 2021, 2022]).unwrap();
        assert_eq!(s.points, vec![(2020, Some(2.5)), (2021, None), (2022, None)]);
    }

    #[test]
    fn segments_break_at_gaps() {
        let ds = dataset();
        let s = Series::for_region(&ds, "Moscow", &[2019, 2020, 2021]).unwrap();
        assert_eq!(
            s.segments(),
            vec![vec![[2019.0, 10.0]], vec![[2021.0, 30.0]]]
        );
    }

    #[test]
    fn summary_skips_missing_values() {
        let ds = dataset();
        let s = Series::for_region(&ds, "Moscow", &[2019, 2020, 2021]).unwrap();
        let summary = s.summary();

        assert_eq!(summary.latest, Some((2021, 30.0)));
        assert_eq!(summary.previous, Some((2019, 10.0)));
        assert_eq!(summary.delta(), Some(20.0));
        assert_eq!(summary.delta_percent(), Some(200.0));
        assert_eq!(summary.min, Some(10.0));
        assert_eq!(summary.max, Some(30.0));
        assert_eq!(summary.mean, Some(20.0));
    }

    #[test]
    fn summary_of_empty_series() {
        let summary = Series { points: vec![(2019, None)] }.summary();
        assert_eq!(summary, TopicSummary::default());
        assert_eq!(summary.delta(), None);
    }
}
