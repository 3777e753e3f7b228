use hero_cube::texture_bake::{bake_face, bake_placeholder, to_straight_rgba, LogoImage};
use tiny_skia::{Color, Pixmap};

fn red_logo() -> LogoImage {
    let mut pixmap = Pixmap::new(4, 4).unwrap();
    pixmap.fill(Color::from_rgba8(255, 0, 0, 255));
    LogoImage::from_pixmap(pixmap)
}

fn pixel(pixmap: &Pixmap, x: u32, y: u32) -> [u8; 4] {
    let c = pixmap.pixel(x, y).unwrap().demultiply();
    [c.red(), c.green(), c.blue(), c.alpha()]
}

#[test]
fn bakes_are_deterministic() {
    for res in [128, 256] {
        assert_eq!(
            bake_placeholder(res).unwrap().data(),
            bake_placeholder(res).unwrap().data()
        );
        let logo = red_logo();
        assert_eq!(
            bake_face(res, &logo).unwrap().data(),
            bake_face(res, &logo).unwrap().data()
        );
    }
}

#[test]
fn bakes_are_square_at_the_requested_resolution() {
    let placeholder = bake_placeholder(128).unwrap();
    assert_eq!((placeholder.width(), placeholder.height()), (128, 128));
    let face = bake_face(256, &red_logo()).unwrap();
    assert_eq!((face.width(), face.height()), (256, 256));
}

#[test]
fn placeholder_is_a_bordered_blue_gradient() {
    let pixmap = bake_placeholder(128).unwrap();
    let [r, _, b, _] = pixel(&pixmap, 64, 64);
    assert!(b > r, "centre should be blue");
    // the border sits on top of the gradient everywhere along the edge
    for (x, y) in [(0, 0), (127, 0), (0, 127), (127, 127), (64, 1)] {
        assert!(pixel(&pixmap, x, y)[3] >= 225, "edge pixel ({x},{y}) too faint");
    }
}

#[test]
fn logo_is_centred_and_sized_to_its_box() {
    let face = bake_face(200, &red_logo()).unwrap();
    // 40% box: 80px wide, from 60 to 140
    let [r, g, b, _] = pixel(&face, 100, 100);
    assert!(r > g && r > b, "centre should show the logo");
    let [r, _, b, _] = pixel(&face, 50, 100);
    assert!(b > r, "outside the logo box should be gradient");
}

#[test]
fn logo_face_differs_from_placeholder() {
    assert_ne!(
        bake_placeholder(128).unwrap().data(),
        bake_face(128, &red_logo()).unwrap().data()
    );
}

#[test]
fn zero_resolution_is_an_error() {
    assert!(bake_placeholder(0).is_err());
}

#[test]
fn bundled_svg_decodes() {
    let logo = LogoImage::decode(include_bytes!("../assets/logo.svg")).unwrap();
    assert_eq!((logo.width(), logo.height()), (512, 512));
}

#[test]
fn straight_rgba_undoes_premultiplication() {
    let mut pixmap = Pixmap::new(1, 1).unwrap();
    pixmap.fill(Color::from_rgba8(200, 100, 50, 128));
    let rgba = to_straight_rgba(&pixmap);
    assert_eq!(rgba.len(), 4);
    assert_eq!(rgba[3], 128);
    assert!(rgba[0].abs_diff(200) <= 2);
    assert!(rgba[1].abs_diff(100) <= 2);
}
