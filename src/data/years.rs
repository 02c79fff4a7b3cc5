use std::collections::BTreeSet;

use super::error::SelectionError;
use super::model::Dataset;

/// Years present as columns in every one of `datasets`.
///
/// No datasets yields the empty set.
pub fn common_years<'a, I>(datasets: I) -> BTreeSet<i32>
where
    I: IntoIterator<Item = &'a Dataset>,
{
    let mut iter = datasets.into_iter();
    let Some(first) = iter.next() else {
        return BTreeSet::new();
    };
    iter.fold(first.year_columns(), |acc, dataset| {
        let years = dataset.year_columns();
        acc.intersection(&years).copied().collect()
    })
}

/// Every integer in `lo..=hi`, after checking both ends against the bounds of
/// `years`.
///
/// Years missing from `years` inside the range are still enumerated; callers
/// see them as absent columns.
pub fn filter_range(years: &BTreeSet<i32>, lo: i32, hi: i32) -> Result<Vec<i32>, SelectionError> {
    let (Some(&min), Some(&max)) = (years.first(), years.last()) else {
        return Err(SelectionError::EmptyIntersection);
    };
    if lo > hi {
        return Err(SelectionError::InvertedRange { lo, hi });
    }
    if lo < min || hi > max {
        return Err(SelectionError::OutOfBounds { lo, hi, min, max });
    }
    Ok((lo..=hi).collect())
}

/// The ordered years of one dashboard request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearAxis {
    years: Vec<i32>,
}

impl YearAxis {
    /// `(min, max)` of the years shared by `datasets`, for range widgets.
    pub fn bounds(datasets: &[&Dataset]) -> Result<(i32, i32), SelectionError> {
        if datasets.is_empty() {
            return Err(SelectionError::EmptySelection);
        }
        let common = common_years(datasets.iter().copied());
        match (common.first(), common.last()) {
            (Some(&min), Some(&max)) => Ok((min, max)),
            _ => Err(SelectionError::EmptyIntersection),
        }
    }

    /// Intersect the datasets' years, then narrow to `[lo, hi]`.
    pub fn resolve(datasets: &[&Dataset], lo: i32, hi: i32) -> Result<Self, SelectionError> {
        if datasets.is_empty() {
            return Err(SelectionError::EmptySelection);
        }
        let common = common_years(datasets.iter().copied());
        let years = filter_range(&common, lo, hi)?;
        let gaps: Vec<i32> = years
            .iter()
            .copied()
            .filter(|y| !common.contains(y))
            .collect();
        if !gaps.is_empty() {
            log::debug!("Year range {lo}-{hi} includes years without data: {gaps:?}");
        }
        Ok(YearAxis { years })
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }
}
