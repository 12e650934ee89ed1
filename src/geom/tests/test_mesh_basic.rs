use crate::geom::{
    GeomMesh, GridLayout, MeshTopology, MobiusSurface, ParameterGrid, StripError,
    StripParameters, Tolerance, mesh_strip, triangulate_twisted_grid,
};

fn strip_mesh(n_u: usize, n_v: usize) -> (GeomMesh, MeshTopology) {
    let params = StripParameters::new(1.0, 0.15, n_u, n_v).expect("valid parameters");
    let surface = MobiusSurface::from_params(&params);
    mesh_strip(&surface, &ParameterGrid::new(&params)).expect("strip mesh")
}

#[test]
fn twisted_grid_has_expected_triangle_count() {
    let indices = triangulate_twisted_grid(16, 5).expect("indices fit u32");
    assert_eq!(indices.len(), 16 * 4 * 6);
    assert!(indices.iter().all(|&i| (i as usize) < 16 * 5));
}

#[test]
fn oversized_grid_is_rejected_instead_of_wrapping_indices() {
    // 2^17 x 2^16 vertices overflow u32 indices; nothing is allocated.
    let err = triangulate_twisted_grid(1 << 17, 1 << 16).expect_err("too many vertices");
    assert!(matches!(err, StripError::Mesh(_)), "{err}");

    let err = triangulate_twisted_grid(usize::MAX, 2).expect_err("too many vertices");
    assert!(matches!(err, StripError::Mesh(_)), "{err}");
}

#[test]
fn seam_joins_reversed_rows() {
    let (n_u, n_v) = (6, 4);
    let indices = triangulate_twisted_grid(n_u, n_v).expect("indices fit u32");
    // First triangle of the seam quad on row 0: last column meets column 0
    // on the opposite edge row.
    let seam = &indices[(n_u - 1) * 6..n_u * 6];
    let last_col_row0 = (n_u - 1) as u32;
    let first_col_last_row = ((n_v - 1) * n_u) as u32;
    assert_eq!(seam[0], last_col_row0);
    assert_eq!(seam[1], first_col_last_row);
}

#[test]
fn strip_mesh_has_one_boundary_loop() {
    let (n_u, n_v) = (24, 6);
    let (mesh, topology) = strip_mesh(n_u, n_v);

    mesh.validate().expect("valid mesh");
    assert_eq!(mesh.vertex_count(), n_u * n_v);
    assert_eq!(mesh.triangle_count(), 2 * n_u * (n_v - 1));
    assert_eq!(topology.open_edge_count, 2 * n_u);
    assert_eq!(topology.non_manifold_edge_count, 0);
    assert_eq!(topology.boundary_loop_count, 1);
}

#[test]
fn topology_of_the_untwisted_band_differs() {
    // An ordinary band (seam joined row-to-row) has two boundary circles.
    let (n_u, n_v) = (12, 3);
    let index = |i: usize, j: usize| (j * n_u + i % n_u) as u32;
    let mut indices = Vec::new();
    for j in 0..n_v - 1 {
        for i in 0..n_u {
            let (i0, i1) = (index(i, j), index(i + 1, j));
            let (i2, i3) = (index(i, j + 1), index(i + 1, j + 1));
            indices.extend_from_slice(&[i0, i1, i2, i2, i1, i3]);
        }
    }
    let band = GeomMesh::new(vec![[0.0; 3]; n_u * n_v], indices);
    let topology = band.topology();
    assert_eq!(topology.open_edge_count, 2 * n_u);
    assert_eq!(topology.boundary_loop_count, 2);
}

#[test]
fn mesh_area_approaches_the_integral() {
    let (mesh, _) = strip_mesh(200, 21);
    let area = mesh.surface_area();
    assert!(Tolerance::new(1e-3).approx_eq_relative(area, 1.886_733), "mesh area = {area}");
    assert!(area < 1.886_733);
}

#[test]
fn normals_and_flat_buffers_match_vertices() {
    let (mesh, _) = strip_mesh(10, 3);
    assert_eq!(mesh.positions_flat().len(), mesh.vertex_count() * 3);
    let normals = mesh.normals_flat().expect("normals");
    assert_eq!(normals.len(), mesh.vertex_count() * 3);
    for n in normals.chunks_exact(3) {
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        assert!(Tolerance::new(1e-9).approx_eq_f64(len, 1.0));
    }
}

#[test]
fn obj_export_lists_vertices_normals_and_faces() {
    let (mesh, _) = strip_mesh(8, 3);
    let mut out = Vec::new();
    mesh.write_obj(&mut out, "strip").expect("write obj");
    let text = String::from_utf8(out).expect("utf8");

    assert!(text.starts_with("# mobius-engine\no strip\n"));
    assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 24);
    assert_eq!(text.lines().filter(|l| l.starts_with("vn ")).count(), 24);
    assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 32);
    assert!(text.contains("f 1//1 2//2 9//9"));
}

#[test]
fn validate_reports_broken_buffers() {
    let mut mesh = GeomMesh::new(vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], vec![0, 1, 2]);
    assert!(mesh.validate().is_ok());

    mesh.indices.push(0);
    assert!(mesh.validate().is_err());
    mesh.indices.truncate(3);

    mesh.indices[2] = 7;
    assert!(!mesh.has_valid_indices());
    assert!(mesh.validate().is_err());
    mesh.indices[2] = 2;

    mesh.positions[1][0] = f64::NAN;
    assert!(mesh.has_invalid_vertices());
    assert!(mesh.validate().is_err());
}

#[test]
fn meshing_requires_the_periodic_grid() {
    let params = StripParameters::default();
    let surface = MobiusSurface::from_params(&params);
    let grid = ParameterGrid::with_layout(&params, GridLayout::CellCenters);
    let err = mesh_strip(&surface, &grid).expect_err("cell centers cannot be meshed");
    assert!(matches!(err, StripError::Mesh(_)));
    assert!(!err.is_invalid_configuration());
}
