//! Color field selection and per-field summary statistics.

use std::fmt;

use polars::prelude::{DataType, PolarsResult};

use crate::{config::FieldOptions, dataset::Dataset, error::SelectionError};

/// A validated, numeric attribute name that can drive the color scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelection {
    name: String,
}

impl FieldSelection {
    #[inline] pub fn name(&self) -> &str { &self.name }
}

impl fmt::Display for FieldSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.name) }
}

#[inline]
fn is_numeric(dtype: &DataType) -> bool {
    matches!(dtype,
        DataType::Int32 | DataType::Int64 |
        DataType::UInt32 | DataType::UInt64 |
        DataType::Float32 | DataType::Float64
    )
}

impl Dataset {
    /// Numeric columns, in column order, minus the excluded names.
    pub fn selectable_fields(&self, options: &FieldOptions) -> Vec<String> {
        self.data().get_columns().iter()
            .filter(|column| is_numeric(column.dtype()))
            .map(|column| column.name().to_string())
            .filter(|name| !options.excluded.contains(name))
            .collect()
    }

    /// Validate a requested color field.
    pub fn select_field(&self, name: &str, options: &FieldOptions) -> Result<FieldSelection, SelectionError> {
        if options.excluded.iter().any(|excluded| excluded == name) {
            return Err(SelectionError::Excluded { field: name.to_string() });
        }

        self.require_numeric(name)?;
        Ok(FieldSelection { name: name.to_string() })
    }

    /// The column exists in this dataset and holds numbers.
    pub(crate) fn require_numeric(&self, name: &str) -> Result<(), SelectionError> {
        let column = self.data().column(name)
            .map_err(|_| SelectionError::UnknownField { field: name.to_string() })?;

        if !is_numeric(column.dtype()) {
            return Err(SelectionError::NotNumeric { field: name.to_string(), dtype: column.dtype().to_string() });
        }
        Ok(())
    }

    /// The configured default field if selectable, otherwise the first selectable one.
    pub fn default_field(&self, options: &FieldOptions) -> Result<FieldSelection, SelectionError> {
        let fields = self.selectable_fields(options);
        let name = fields.iter()
            .find(|name| **name == options.default_field)
            .or(fields.first())
            .ok_or(SelectionError::NoNumericFields)?;
        Ok(FieldSelection { name: name.clone() })
    }

    /// Values of the selected field as floats. Nulls and NaN become `None`.
    pub fn field_values(&self, selection: &FieldSelection) -> PolarsResult<Vec<Option<f64>>> {
        let column = self.data().column(selection.name())?.cast(&DataType::Float64)?;
        Ok(column.f64()?.into_iter()
            .map(|value| value.filter(|v| v.is_finite()))
            .collect())
    }

    /// Summary statistics of the selected field over its non-null values.
    pub fn describe(&self, selection: &FieldSelection) -> PolarsResult<Summary> {
        Ok(Summary::from_values(&self.field_values(selection)?))
    }
}

/// Descriptive statistics in the shape of a dataframe `describe()`.
/// Every statistic is `None` when there are no values to describe.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub nulls: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation; needs at least two values.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

impl Summary {
    pub(crate) fn from_values(values: &[Option<f64>]) -> Self {
        let mut sorted = values.iter().flatten().copied().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = (count > 0).then(|| sorted.iter().sum::<f64>() / count as f64);
        let std = mean.filter(|_| count > 1).map(|mean| {
            let ss = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
            (ss / (count - 1) as f64).sqrt()
        });

        Self {
            count,
            nulls: values.len() - count,
            mean,
            std,
            min: sorted.first().copied(),
            p25: quantile(&sorted, 0.25),
            p50: quantile(&sorted, 0.50),
            p75: quantile(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }
}

/// Linear-interpolation quantile over sorted values.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() { return None }
    let pos = q * (sorted.len() - 1) as f64;
    let (lo, hi) = (pos.floor() as usize, pos.ceil() as usize);
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "count  {}", self.count)?;
        if self.nulls > 0 { writeln!(f, "nulls  {}", self.nulls)? }
        let rows = [
            ("mean", self.mean), ("std", self.std), ("min", self.min),
            ("25%", self.p25), ("50%", self.p50), ("75%", self.p75), ("max", self.max),
        ];
        for (label, value) in rows {
            match value {
                Some(v) => writeln!(f, "{label:<6} {v:.6}")?,
                None => writeln!(f, "{label:<6} NaN")?,
            }
        }
        Ok(())
    }
}
