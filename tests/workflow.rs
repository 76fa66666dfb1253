#[cfg(test)]
mod tests {
    use fermisurf::io::energy::read_bands;
    use fermisurf::io::klist::read_klist;
    use fermisurf::isosurface::{extract, Interpolation};
    use fermisurf::kmesh::Kmesh;
    use fermisurf::kpoint::KPoint;
    use fermisurf::progress::Bar;
    use fermisurf::symmetry::SymmetryOperation;
    use fermisurf::zone::{expand_ibz, ExpandOptions};

    fn bar() -> Bar {
        Bar::new(1, 1, String::new())
    }

    #[test]
    fn workflow_energy_to_surface() {
        // read the bands, remap onto the k-point list and cut the first band
        let mut bands = read_bands("tests/data/case.energy").unwrap();
        let entries = read_klist("tests/data/case.klist").unwrap();
        let coords: Vec<KPoint> =
            entries.iter().map(|entry| entry.to_kpoint()).collect();
        for band in bands.iter_mut() {
            band.map_coords(&coords).unwrap();
        }
        let mesh = Kmesh::build(&bands[0].data).unwrap();
        assert_eq!([mesh.size.x, mesh.size.y, mesh.size.z], [2, 2, 2]);
        // the first band rises by 0.3 per occupied neighbour; cutting at 0.15
        // crosses the three edges leaving the origin halfway along
        let points = extract(&mesh, 0.15, &Interpolation::Linear, 1, &bar()).unwrap();
        assert_eq!(points.len(), 3);
        assert!(points.contains(&[0.25, 0., 0.]));
        assert!(points.contains(&[0., 0.25, 0.]));
        assert!(points.contains(&[0., 0., 0.25]));
        // the second band sits entirely above the cut
        let mesh = Kmesh::build(&bands[1].data).unwrap();
        let points = extract(&mesh, 0.15, &Interpolation::Linear, 1, &bar()).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn workflow_expand_then_mesh() {
        // an irreducible wedge of a 4x4 zone layer under x mirror symmetry
        let mut rows = vec![];
        let mut id = 0;
        for x in [-0.5, 0.0, 0.25] {
            for y in [-0.5, -0.25, 0.0, 0.25] {
                id += 1;
                rows.push(KPoint::new(id, [x, y, 0.0], x * x + y * y));
            }
        }
        let mirror = SymmetryOperation::new(
            [[-1., 0., 0.], [0., 1., 0.], [0., 0., 1.]],
            [0f64; 3],
            None,
        );
        let ops = vec![SymmetryOperation::identity(), mirror];
        let options = ExpandOptions {
            zone_bounds: Some([1., 1., 1.]),
            zone_centre: Some([0., 0., 0.]),
            wrap: true,
            sort_by: None,
        };
        let full = expand_ibz(&rows, &ops, &options).unwrap();
        assert_eq!(full.len(), 16);
        let mesh = Kmesh::build(&full).unwrap();
        assert_eq!([mesh.size.x, mesh.size.y, mesh.size.z], [4, 4, 1]);
        assert_eq!(mesh.axes[0].offset, -0.5);
        assert_eq!(mesh.axes[0].spacing, 0.25);
        // every grid cell is present after expansion
        assert_eq!(mesh.stats().present, 16);
        let points = extract(&mesh, 0.1, &Interpolation::Linear, 2, &bar()).unwrap();
        assert!(!points.is_empty());
        for point in &points {
            assert!(point[0] >= -0.5 && point[0] <= 0.25);
            assert!(point[1] >= -0.5 && point[1] <= 0.25);
            assert_eq!(point[2], 0.0);
        }
    }

    #[test]
    fn workflow_shift_then_slice() {
        // roll the zone so its centre moves to the origin cell, then slice
        // out the low half and check the axes follow
        let mut rows = vec![];
        let mut id = 0;
        for i in 0..4 {
            for j in 0..4 {
                id += 1;
                rows.push(KPoint::new(
                    id,
                    [i as f64 * 0.25, j as f64 * 0.25, 0.0],
                    id as f64,
                ));
            }
        }
        let mut mesh = Kmesh::build(&rows).unwrap();
        mesh.shift_centre([0.5, 0.0, 0.0], false).unwrap();
        let sliced = mesh
            .slice([
                fermisurf::kmesh::SliceRange::new(0, 2, 1),
                fermisurf::kmesh::SliceRange::full(4),
                fermisurf::kmesh::SliceRange::full(1),
            ])
            .unwrap();
        assert_eq!([sliced.size.x, sliced.size.y, sliced.size.z], [2, 4, 1]);
        assert_eq!(sliced.stats().present, 8);
        assert_eq!(sliced.axes[1].spacing, 0.25);
    }
}
