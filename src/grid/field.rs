use serde::Serialize;
use crate::grid::{DecodeError, Result};

/// One decoded 2-D grid: `ny` rows of `nx` values, row 0 first as read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// 0 = initial/analysis, 1 = first forecast, ...
    pub time_index: usize,
    nx: usize,
    ny: usize,
    rows: Vec<Vec<f32>>,
}

impl Field {
    /// Builds a field from explicit rows, all of the same non-zero width.
    pub fn new(time_index: usize, rows: Vec<Vec<f32>>) -> Result<Self> {
        let nx = rows.first().map(|row| row.len()).unwrap_or(0);
        if nx == 0 {
            return Err(DecodeError::ValidationError(String::from("field has no values")));
        }
        if let Some(row) = rows.iter().position(|row| row.len() != nx) {
            return Err(DecodeError::ValidationError(format!("row {} has {} values, expected {}", row, rows[row].len(), nx)));
        }

        Ok(Self {
            time_index,
            nx,
            ny: rows.len(),
            rows,
        })
    }

    /// `values` holds exactly `nx * ny` values in row-major order.
    pub(crate) fn from_flat(time_index: usize, nx: usize, values: Vec<f32>) -> Self {
        let rows: Vec<Vec<f32>> = values.chunks_exact(nx).map(|row| row.to_vec()).collect();

        Self {
            time_index,
            nx,
            ny: rows.len(),
            rows,
        }
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn rows(&self) -> &[Vec<f32>] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> Option<&[f32]> {
        self.rows.get(row).map(|row| row.as_slice())
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        self.rows.get(row)?.get(col).copied()
    }

    /// Row-major copy of all values.
    pub fn values(&self) -> Vec<f32> {
        self.rows.concat()
    }

    /// Smallest and largest value, NaN ignored.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        self.rows.iter()
            .flatten()
            .filter(|value| !value.is_nan())
            .fold(None, |acc, &value| match acc {
                None => Some((value, value)),
                Some((min, max)) => Some((min.min(value), max.max(value))),
            })
    }

    pub(crate) fn flip_rows(&mut self) {
        self.rows.reverse();
    }

    /// Same field with the row order reversed.
    pub fn flipped(&self) -> Self {
        let mut field = self.clone();
        field.flip_rows();
        field
    }
}

/// Decoded fields in time order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridStack {
    fields: Vec<Field>,
}

impl GridStack {
    /// Fields get their time index from their position.
    pub fn new(fields: Vec<Field>) -> Result<Self> {
        let first = fields.first().ok_or_else(|| DecodeError::ValidationError(String::from("stack has no fields")))?;
        let (nx, ny) = (first.nx, first.ny);
        if let Some(field) = fields.iter().position(|field| (field.nx, field.ny) != (nx, ny)) {
            return Err(DecodeError::ValidationError(format!(
                "field {} is {}x{}, expected {}x{}", field, fields[field].nx, fields[field].ny, nx, ny
            )));
        }

        Ok(Self {
            fields: fields.into_iter()
                .enumerate()
                .map(|(time_index, field)| Field { time_index, ..field })
                .collect(),
        })
    }

    pub(crate) fn from_fields(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, time_index: usize) -> Option<&Field> {
        self.fields.get(time_index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }
}

impl<'a> IntoIterator for &'a GridStack {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_flat_is_row_major() {
        let field = Field::from_flat(1, 3, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!((field.nx(), field.ny()), (3, 2));
        assert_eq!(field.row(0), Some(&[0.0, 1.0, 2.0][..]));
        assert_eq!(field.row(1), Some(&[3.0, 4.0, 5.0][..]));
        assert_eq!(field.get(1, 0), Some(3.0));
        assert_eq!(field.get(2, 0), None);
        assert_eq!(field.values(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn flipped_reverses_rows_only() {
        let field = Field::from_flat(0, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let flipped = field.flipped();

        assert_eq!(flipped.rows(), &[vec![5.0, 6.0], vec![3.0, 4.0], vec![1.0, 2.0]]);
        assert_eq!(flipped.flipped(), field);
    }

    #[test]
    fn min_max_skips_nan() {
        let field = Field::new(0, vec![vec![5480.0, f32::NAN], vec![5120.0, 5800.0]]).unwrap();
        assert_eq!(field.min_max(), Some((5120.0, 5800.0)));

        let field = Field::new(0, vec![vec![f32::NAN]]).unwrap();
        assert_eq!(field.min_max(), None);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(matches!(Field::new(0, vec![vec![1.0, 2.0], vec![3.0]]), Err(DecodeError::ValidationError(_))));
        assert!(matches!(Field::new(0, vec![]), Err(DecodeError::ValidationError(_))));
    }

    #[test]
    fn stack_assigns_time_index_by_position() {
        let a = Field::new(7, vec![vec![1.0]]).unwrap();
        let b = Field::new(7, vec![vec![2.0]]).unwrap();
        let stack = GridStack::new(vec![a, b]).unwrap();

        let indices: Vec<usize> = stack.iter().map(|field| field.time_index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.get(1).and_then(|field| field.get(0, 0)), Some(2.0));
    }

    #[test]
    fn stack_rejects_mixed_shapes() {
        let a = Field::new(0, vec![vec![1.0, 2.0]]).unwrap();
        let b = Field::new(1, vec![vec![1.0], vec![2.0]]).unwrap();

        assert!(GridStack::new(vec![a, b]).is_err());
        assert!(GridStack::new(vec![]).is_err());
    }
}
