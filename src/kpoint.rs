use crate::utils::round_to;

/// A column of a k-point table. Replaces the integer column lists of
/// loosely-typed array slicing with an explicit selector for sorting and
/// duplicate matching.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// The sample point id.
    Id,
    /// The first fractional coordinate.
    I,
    /// The second fractional coordinate.
    J,
    /// The third fractional coordinate.
    K,
    /// The scalar carried by the point, normally an energy.
    Value,
    /// A trailing column such as a klist denominator or weight.
    Extra(usize),
}

/// The three coordinate columns in axis order.
pub const COORD_COLUMNS: [Column; 3] = [Column::I, Column::J, Column::K];

/// A single sample point in the periodic zone: an id that survives every
/// re-projection, three fractional coordinates, the sampled scalar and any
/// trailing columns passed through untouched.
#[derive(Clone, PartialEq, Debug)]
pub struct KPoint {
    pub id: i64,
    pub coords: [f64; 3],
    pub value: f64,
    pub extra: Vec<f64>,
}

impl KPoint {
    pub fn new(id: i64, coords: [f64; 3], value: f64) -> Self {
        Self {
            id,
            coords,
            value,
            extra: Vec::with_capacity(0),
        }
    }

    /// As [new](Self::new) but carrying trailing columns.
    pub fn with_extra(id: i64, coords: [f64; 3], value: f64, extra: Vec<f64>) -> Self {
        Self {
            id,
            coords,
            value,
            extra,
        }
    }

    /// Read a single column as a float. Missing extra columns read as 0 so
    /// that ragged tables still have a total sort order.
    pub fn get(&self, column: Column) -> f64 {
        match column {
            Column::Id => self.id as f64,
            Column::I => self.coords[0],
            Column::J => self.coords[1],
            Column::K => self.coords[2],
            Column::Value => self.value,
            Column::Extra(i) => self.extra.get(i).copied().unwrap_or(0f64),
        }
    }

    /// The column rounded to a number of decimal places, used only for
    /// bucketing near-identical points.
    pub fn get_rounded(&self, column: Column, decimals: Option<i32>) -> f64 {
        match decimals {
            Some(d) => round_to(self.get(column), d),
            None => self.get(column),
        }
    }
}

/// Compare two rows lexicographically over the supplied columns, optionally
/// after rounding. NaN compares greater than everything so that sorting is
/// still total on damaged data.
pub fn compare_columns(
    a: &KPoint,
    b: &KPoint,
    columns: &[Column],
    decimals: Option<i32>,
) -> std::cmp::Ordering {
    for column in columns {
        let ordering = a
            .get_rounded(*column, decimals)
            .total_cmp(&b.get_rounded(*column, decimals));
        if ordering != std::cmp::Ordering::Equal {
            return ordering;
        }
    }
    std::cmp::Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kpoint_get() {
        let k = KPoint::with_extra(3, [0.1, 0.2, 0.3], -1.5, vec![8., 2.]);
        assert_eq!(k.get(Column::Id), 3.);
        assert_eq!(k.get(Column::J), 0.2);
        assert_eq!(k.get(Column::Value), -1.5);
        assert_eq!(k.get(Column::Extra(0)), 8.);
        assert_eq!(k.get(Column::Extra(5)), 0.);
    }

    #[test]
    fn kpoint_get_rounded() {
        let k = KPoint::new(1, [0.12345, 0., 0.], 0.);
        assert_eq!(k.get_rounded(Column::I, Some(3)), 0.123);
        assert_eq!(k.get_rounded(Column::I, None), 0.12345);
    }

    #[test]
    fn kpoint_compare_columns() {
        let a = KPoint::new(1, [0.0, 1.0, 0.0], 0.);
        let b = KPoint::new(2, [0.0, 2.0, 0.0], 0.);
        let order = compare_columns(&a, &b, &[Column::I, Column::J], None);
        assert_eq!(order, std::cmp::Ordering::Less);
        let order = compare_columns(&a, &b, &[Column::I, Column::K], None);
        assert_eq!(order, std::cmp::Ordering::Equal);
    }
}
