use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use csv::{ReaderBuilder, Trim};
use itertools::Itertools;
use log::info;

use crate::distance::Coordinate;
use crate::error::LoadError;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Reads comma separated points, one per row, one coordinate per field, no header.
///
/// A byte order mark in front of the first field is dropped. Every row must have as
/// many fields as the first one and every field must parse as a finite number.
pub fn read_points<T, R>(reader: R) -> Result<Vec<Vec<T>>, LoadError>
where
    T: Coordinate + FromStr,
    R: Read,
{
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut points: Vec<Vec<T>> = Vec::new();
    let mut width = None;

    for (record_idx, record) in rdr.records().enumerate() {
        let record = record?;
        let point = record
            .iter()
            .enumerate()
            .map(|(field_idx, value)| {
                let value = if record_idx == 0 && field_idx == 0 {
                    value.trim_start_matches(BYTE_ORDER_MARK).trim()
                } else {
                    value
                };
                parse_coordinate(value).ok_or_else(|| LoadError::Parse {
                    record: record_idx,
                    field: field_idx,
                    value: value.to_string(),
                })
            })
            .collect::<Result<Vec<T>, LoadError>>()?;

        match width {
            Some(expected) if expected != point.len() => {
                return Err(LoadError::RaggedRecord {
                    record: record_idx,
                    expected,
                    found: point.len(),
                });
            }
            Some(_) => {}
            None => width = Some(point.len()),
        }
        points.push(point);
    }

    if points.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(points)
}

fn parse_coordinate<T: Coordinate + FromStr>(value: &str) -> Option<T> {
    value.parse::<T>().ok().filter(|v| v.is_finite())
}

pub fn load_points<T, P>(path: P) -> Result<Vec<Vec<T>>, LoadError>
where
    T: Coordinate + FromStr,
    P: AsRef<Path>,
{
    let points = read_points(File::open(path.as_ref())?)?;
    info!("Loaded {} points from {}", points.len(), path.as_ref().display());
    Ok(points)
}

/// Point table assembled from one or more CSV files, concatenated in the order given.
#[derive(Debug, Clone)]
pub struct PointLoader<T> {
    pub filenames: Vec<PathBuf>,
    pub dims: usize,
    pub points: Vec<Vec<T>>,
}

impl<T: Coordinate + FromStr> PointLoader<T> {
    pub fn new<P: AsRef<Path>>(paths: &[P]) -> Result<Self, LoadError> {
        let filenames = paths.iter().map(|p| p.as_ref().to_path_buf()).collect_vec();

        let mut points: Vec<Vec<T>> = vec![];
        let mut dims = None;
        for (index, filepath) in filenames.iter().enumerate() {
            let batch = load_points::<T, _>(filepath)?;
            let batch_dims = batch[0].len();
            match dims {
                Some(expected) if expected != batch_dims => {
                    return Err(LoadError::DimensionMismatch {
                        source_name: filepath.display().to_string(),
                        expected,
                        found: batch_dims,
                    });
                }
                _ => dims = Some(batch_dims),
            }
            points.extend(batch);
            info!("Loaded data batch #{}", index + 1);
        }

        let dims = dims.ok_or(LoadError::Empty)?;
        Ok(Self { filenames, dims, points })
    }
}
