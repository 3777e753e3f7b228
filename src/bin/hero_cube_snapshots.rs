use std::fs;
use std::path::Path;

use anyhow::Context;
use hero_cube::texture_bake::{bake_face, bake_placeholder, to_straight_rgba, LogoImage};
use hero_cube::tier::RenderTierConfig;
use image::ImageReader;
use tiny_skia::Pixmap;

const LOGO_PATH: &str = "assets/logo.svg";
const TOLERANCE: u8 = 3;

fn compare_with_tolerance(a_path: &Path, b_path: &Path, tolerance: u8) -> anyhow::Result<bool> {
    let a = ImageReader::open(a_path)?.decode()?.to_rgba8();
    let b = ImageReader::open(b_path)?.decode()?.to_rgba8();

    if a.dimensions() != b.dimensions() {
        return Ok(false);
    }
    Ok(a.pixels().zip(b.pixels()).all(|(pa, pb)| {
        let da = pa.0;
        let db = pb.0;
        (0..4).all(|i| da[i].abs_diff(db[i]) <= tolerance)
    }))
}

fn save_pixmap_png(pixmap: &Pixmap, path: &Path) -> anyhow::Result<()> {
    let img = image::RgbaImage::from_raw(pixmap.width(), pixmap.height(), to_straight_rgba(pixmap))
        .context("pixmap size does not match its data")?;
    img.save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Writes `snapshots/actual/<name>.png` and checks it against the golden copy,
/// creating the golden on first run.
fn snapshot(name: &str, pixmap: &Pixmap) -> anyhow::Result<bool> {
    fs::create_dir_all("snapshots/actual")?;
    fs::create_dir_all("snapshots/golden")?;
    let file = format!("{name}.png");
    let out_actual = Path::new("snapshots/actual").join(&file);
    let out_golden = Path::new("snapshots/golden").join(&file);
    save_pixmap_png(pixmap, &out_actual)?;

    if !out_golden.exists() {
        fs::copy(&out_actual, &out_golden)?;
        println!("golden created at {}", out_golden.display());
        return Ok(true);
    }

    let ok = compare_with_tolerance(&out_actual, &out_golden, TOLERANCE)?;
    println!("{name} snapshot {}", if ok { "OK" } else { "MISMATCH" });
    Ok(ok)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let logo_bytes = fs::read(LOGO_PATH).with_context(|| format!("reading {LOGO_PATH}"))?;
    let logo = LogoImage::decode(&logo_bytes)?;

    let mut all_ok = true;
    for tier in [RenderTierConfig::MOBILE, RenderTierConfig::DESKTOP] {
        let res = tier.texture_resolution_px;
        all_ok &= snapshot(&format!("placeholder_{res}"), &bake_placeholder(res)?)?;
        all_ok &= snapshot(&format!("logo_face_{res}"), &bake_face(res, &logo)?)?;
    }

    if !all_ok {
        anyhow::bail!("face textures differ from their golden images");
    }
    Ok(())
}
