use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::data::cache::DatasetCache;
use crate::data::error::SelectionError;
use crate::data::model::{Dataset, TableSlice};
use crate::data::series::{Series, TopicSummary};
use crate::data::years::YearAxis;
use crate::topic::Topic;

// ---------------------------------------------------------------------------
// User selection (persisted between runs)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selection {
    pub region: Option<String>,
    /// Selected topics in the order they were picked.
    pub topics: Vec<Topic>,
    /// Inclusive `(lo, hi)`; `None` means the full shared range.
    pub year_range: Option<(i32, i32)>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            region: None,
            topics: vec![Topic::Budget],
            year_range: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Loaded data
// ---------------------------------------------------------------------------

/// All topic datasets of one data directory.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub data_dir: PathBuf,
    pub datasets: BTreeMap<Topic, Arc<Dataset>>,
    /// Regions offered in the selector, from the budget dataset.
    pub regions: Vec<String>,
}

impl LoadedData {
    /// Datasets of `topics`, in the same order.
    pub fn selected(&self, topics: &[Topic]) -> Vec<&Dataset> {
        topics
            .iter()
            .filter_map(|t| self.datasets.get(t))
            .map(Arc::as_ref)
            .collect()
    }
}

/// Load every topic's file from `data_dir`. Any failure aborts the whole set.
pub fn load_all(cache: &mut DatasetCache, data_dir: &Path) -> Result<LoadedData> {
    let mut datasets = BTreeMap::new();
    for topic in Topic::ALL {
        let path = data_dir.join(topic.file_name());
        let dataset = cache
            .load(&path)
            .with_context(|| format!("loading topic '{}'", topic.label()))?;
        datasets.insert(topic, dataset);
    }

    let regions = datasets
        .get(&Topic::Budget)
        .map(|ds| ds.regions().into_iter().map(str::to_string).collect())
        .unwrap_or_default();

    Ok(LoadedData {
        data_dir: data_dir.to_path_buf(),
        datasets,
        regions,
    })
}

// ---------------------------------------------------------------------------
// Derived view
// ---------------------------------------------------------------------------

/// Everything one topic contributes to the dashboard.
#[derive(Debug, Clone)]
pub struct TopicView {
    pub topic: Topic,
    /// `None` when the region is absent from the topic's dataset.
    pub series: Option<Series>,
    pub summary: Option<TopicSummary>,
    pub table: TableSlice,
}

/// The rendered state for one selection.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub region: String,
    pub years: Vec<i32>,
    pub topics: Vec<TopicView>,
}

/// Compute the view for `selection`, normalising its region and year range
/// against what the data offers.
pub fn derive_view(
    data: &LoadedData,
    selection: &mut Selection,
) -> Result<DashboardView, SelectionError> {
    let region = match &selection.region {
        Some(r) if data.regions.contains(r) => r.clone(),
        _ => data.regions.first().cloned().unwrap_or_default(),
    };
    selection.region = Some(region.clone());

    let selected: Vec<(Topic, &Dataset)> = selection
        .topics
        .iter()
        .filter_map(|&t| Some((t, data.datasets.get(&t)?.as_ref())))
        .collect();
    let datasets: Vec<&Dataset> = selected.iter().map(|&(_, ds)| ds).collect();
    let (min, max) = YearAxis::bounds(&datasets)?;

    let (lo, hi) = match selection.year_range {
        Some((lo, hi)) if lo >= min && hi <= max => (lo, hi),
        previous => {
            if previous.is_some() {
                log::debug!("Year range {previous:?} outside {min}-{max}, reset");
            }
            (min, max)
        }
    };
    selection.year_range = Some((lo, hi));

    let axis = YearAxis::resolve(&datasets, lo, hi)?;

    let topics = selected
        .iter()
        .map(|&(topic, dataset)| {
            let series = Series::for_region(dataset, &region, axis.years());
            let summary = series.as_ref().map(Series::summary);
            TopicView {
                topic,
                series,
                summary,
                table: dataset.table_slice(&region, axis.years()),
            }
        })
        .collect();

    Ok(DashboardView {
        region,
        years: axis.years().to_vec(),
        topics,
    })
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Datasets loaded so far, per path.
    cache: DatasetCache,

    /// `None` until a data directory loaded completely.
    pub data: Option<LoadedData>,

    pub selection: Selection,

    /// Shared year bounds of the selected topics, for the range widgets.
    pub year_bounds: Option<(i32, i32)>,

    /// Latest successfully derived view.
    pub view: Option<DashboardView>,

    /// Why the current selection cannot be rendered.
    pub selection_error: Option<SelectionError>,

    /// Fatal load failure; the dashboard shows nothing else.
    pub load_error: Option<String>,
}

impl AppState {
    /// Load the configured data directory and derive the first view.
    pub fn bootstrap(config: AppConfig, selection: Selection) -> Self {
        let mut state = Self {
            config,
            cache: DatasetCache::new(),
            data: None,
            selection,
            year_bounds: None,
            view: None,
            selection_error: None,
            load_error: None,
        };
        state.load();
        state
    }

    /// Switch to another data directory.
    pub fn reload(&mut self, data_dir: PathBuf) {
        self.config.data_dir = data_dir;
        self.load();
    }

    fn load(&mut self) {
        match load_all(&mut self.cache, &self.config.data_dir) {
            Ok(data) => {
                log::info!(
                    "Loaded {} topics from {} ({} regions)",
                    data.datasets.len(),
                    data.data_dir.display(),
                    data.regions.len()
                );
                self.data = Some(data);
                self.load_error = None;
                self.recompute();
            }
            Err(e) => {
                log::error!("Failed to load data: {e:#}");
                self.data = None;
                self.view = None;
                self.year_bounds = None;
                self.load_error = Some(format!("Ошибка загрузки данных: {e:#}"));
            }
        }
    }

    /// Number of files held in the dataset cache.
    pub fn cached_datasets(&self) -> usize {
        self.cache.len()
    }

    pub fn set_region(&mut self, region: String) {
        self.selection.region = Some(region);
        self.recompute();
    }

    /// Add or remove a topic, keeping pick order.
    pub fn toggle_topic(&mut self, topic: Topic) {
        if let Some(pos) = self.selection.topics.iter().position(|&t| t == topic) {
            self.selection.topics.remove(pos);
        } else {
            self.selection.topics.push(topic);
        }
        self.recompute();
    }

    pub fn set_year_range(&mut self, lo: i32, hi: i32) {
        self.selection.year_range = Some((lo, hi));
        self.recompute();
    }

    /// Re-derive the view after any selection change.
    pub fn recompute(&mut self) {
        let Some(data) = &self.data else {
            self.view = None;
            return;
        };

        // Like a slider whose limits moved: new bounds start from the full range.
        let bounds = YearAxis::bounds(&data.selected(&self.selection.topics)).ok();
        if let (Some(old), Some(new)) = (self.year_bounds, bounds) {
            if old != new {
                self.selection.year_range = None;
            }
        }
        self.year_bounds = bounds;

        match derive_view(data, &mut self.selection) {
            Ok(view) => {
                log::debug!(
                    "View for {} over {:?}: {} topics",
                    view.region,
                    self.selection.year_range,
                    view.topics.len()
                );
                self.view = Some(view);
                self.selection_error = None;
            }
            Err(e) => {
                log::debug!("Selection not renderable: {e}");
                self.view = None;
                self.selection_error = Some(e);
            }
        }
    }
}
