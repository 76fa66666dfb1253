use crate::errors::ShapeError;
use crate::kpoint::KPoint;
use rustc_hash::FxHashMap;

/// One energy band: a labelled collection of sampled k-points carrying the
/// band energy as their value.
#[derive(Clone)]
pub struct Band {
    pub id: usize,
    /// Orbital character label carried through from the input file, may be
    /// empty.
    pub character: String,
    pub data: Vec<KPoint>,
}

impl Band {
    pub fn new(id: usize, character: String, data: Vec<KPoint>) -> Self {
        Self {
            id,
            character,
            data,
        }
    }

    pub fn k_point_ids(&self) -> Vec<i64> {
        self.data.iter().map(|row| row.id).collect()
    }

    pub fn i_vals(&self) -> Vec<f64> {
        self.data.iter().map(|row| row.coords[0]).collect()
    }

    pub fn j_vals(&self) -> Vec<f64> {
        self.data.iter().map(|row| row.coords[1]).collect()
    }

    pub fn k_vals(&self) -> Vec<f64> {
        self.data.iter().map(|row| row.coords[2]).collect()
    }

    pub fn energies(&self) -> Vec<f64> {
        self.data.iter().map(|row| row.value).collect()
    }

    /// Swaps the band onto a new coordinate system, matching rows by k-point
    /// id. Each new row takes its coordinates from `new_coords` and its
    /// energy from the old row with the same id. Ids in `new_coords` with no
    /// energy on this band are an error, not a silent drop.
    pub fn map_coords(&mut self, new_coords: &[KPoint]) -> Result<(), ShapeError> {
        let energy_lookup: FxHashMap<i64, f64> =
            self.data.iter().map(|row| (row.id, row.value)).collect();
        let mut remapped = Vec::with_capacity(new_coords.len());
        for row in new_coords {
            match energy_lookup.get(&row.id) {
                Some(energy) => remapped.push(KPoint::new(row.id, row.coords, *energy)),
                None => {
                    return Err(ShapeError::new(format!(
                        "k-point id {} has no energy on band {}",
                        row.id, self.id
                    )))
                }
            }
        }
        self.data = remapped;
        Ok(())
    }
}
