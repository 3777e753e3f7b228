use glam::{Vec3, Vec4Swizzles};
use hero_cube::camera::Camera;
use hero_cube::cube::{model_matrix, tilt, CubeFace, CubeGeometry, CUBE_EDGE};

#[test]
fn faces_sit_on_the_cube_surface() {
    let cube = CubeGeometry::default();
    let half = CUBE_EDGE / 2.0;
    assert_eq!(cube.half_extent(), half);

    for (face, transform) in cube.faces() {
        let centre = transform.transform_point3(Vec3::ZERO);
        assert!((centre - face.normal() * half).length() < 1e-5, "{face:?}");

        // the quad's +Z normal ends up pointing outwards
        let normal = transform.transform_vector3(Vec3::Z).normalize();
        assert!(normal.dot(face.normal()) > 0.999, "{face:?} faces inwards");

        // unit quad corner lands on a cube corner
        let corner = transform.transform_point3(Vec3::new(0.5, 0.5, 0.0));
        for axis in corner.to_array() {
            assert!((axis.abs() - half).abs() < 1e-5, "{face:?} corner {corner}");
        }
    }
}

#[test]
fn every_face_is_distinct() {
    let cube = CubeGeometry::new(2.0);
    for a in CubeFace::ALL {
        for b in CubeFace::ALL {
            if a != b {
                assert_ne!(cube.face_transform(a), cube.face_transform(b));
            }
        }
    }
}

#[test]
fn tilt_points_a_corner_at_the_viewer() {
    let cube = CubeGeometry::default();
    let half = cube.half_extent();
    let model = tilt();

    let nearest_corner = [-1.0f32, 1.0]
        .iter()
        .flat_map(|x| [-1.0f32, 1.0].map(|y| (*x, y)))
        .flat_map(|(x, y)| [-1.0f32, 1.0].map(|z| Vec3::new(x, y, z) * half))
        .map(|corner| model.transform_point3(corner).z)
        .fold(f32::MIN, f32::max);
    let nearest_face_centre = CubeFace::ALL
        .iter()
        .map(|face| model.transform_point3(face.normal() * half).z)
        .fold(f32::MIN, f32::max);
    assert!(nearest_corner > nearest_face_centre);
}

#[test]
fn spin_is_about_the_cube_axis() {
    let start = model_matrix(0.0);
    let turned = model_matrix(std::f32::consts::TAU);
    assert!(start.abs_diff_eq(turned, 1e-5));
    assert!(!start.abs_diff_eq(model_matrix(1.0), 1e-3));
}

#[test]
fn camera_sees_the_cube_centred() {
    let camera = Camera::default();
    assert_eq!(camera.get_pos(), Vec3::new(0.0, 0.0, 5.0));

    let clip = camera.view_projection() * Vec3::ZERO.extend(1.0);
    let ndc = clip.xyz() / clip.w;
    assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
    assert!((0.0..=1.0).contains(&ndc.z));

    // the whole spinning cube fits in view
    let reach = CUBE_EDGE * 3f32.sqrt() / 2.0;
    for point in [Vec3::X, Vec3::Y, Vec3::NEG_X, Vec3::NEG_Y] {
        let clip = camera.view_projection() * (point * reach).extend(1.0);
        let ndc = clip.xyz() / clip.w;
        assert!(ndc.x.abs() < 1.0 && ndc.y.abs() < 1.0, "{point} clipped");
    }
}

#[test]
fn face_lookup_matches_the_face_table() {
    let cube = CubeGeometry::default();
    for (i, (face, transform)) in cube.faces().iter().enumerate() {
        assert_eq!(face.index(), i);
        assert_eq!(CubeFace::ALL[i], *face);
        assert_eq!(cube.face_transform(*face), *transform);
    }
}
