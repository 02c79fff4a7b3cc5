use std::path::PathBuf;

use thiserror::Error;

use super::model::KEY_COLUMN;

/// Fatal failure while loading a dataset file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Every candidate encoding rejected the file content.
    #[error("could not decode {} (tried {})", .path.display(), .tried.join(", "))]
    Decode {
        path: PathBuf,
        tried: Vec<&'static str>,
    },

    #[error("malformed delimited data in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Non-fatal schema problem; the dataset is still returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("В файле {} отсутствует столбец '{}'", .path.display(), KEY_COLUMN)]
    MissingKeyColumn { path: PathBuf },
}

/// Why the current region/topic/year selection cannot be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Выберите хотя бы одну тему!")]
    EmptySelection,

    #[error("У выбранных тем нет общих лет")]
    EmptyIntersection,

    #[error("Начало диапазона ({lo}) позже конца ({hi})")]
    InvertedRange { lo: i32, hi: i32 },

    #[error("Диапазон {lo}–{hi} выходит за пределы {min}–{max}")]
    OutOfBounds { lo: i32, hi: i32, min: i32, max: i32 },
}
