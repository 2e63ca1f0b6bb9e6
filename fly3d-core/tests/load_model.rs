use std::fs;
use std::path::PathBuf;

use fly3d_core::obj::{self, IndexBase, ObjOptions};
use fly3d_core::{LoadError, ParseError};

const PYRAMID: &str = "\
# square pyramid, apex up
v -1 0 -1
v  1 0 -1
v  1 0  1
v -1 0  1
v  0 1  0
vt 0 0
vt 1 0
vt 0.5 1
f 2/1 1/2 5/3
f 3/1 2/2 5/3
f 4/1 3/2 5/3
f 1/1 4/2 5/3
";

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("fly3d-{}-{name}", std::process::id()));
    fs::write(&path, contents).expect("write temp model");
    path
}

#[test]
fn loads_model_from_disk() {
    let path = write_temp("pyramid.obj", PYRAMID);
    let mesh = obj::load(&path).expect("pyramid loads");
    fs::remove_file(&path).ok();

    assert_eq!(mesh.triangle_count(), 4);
    assert_eq!(mesh.vertices().len(), 12);

    // faces wind counter-clockwise seen from outside, so every normal leans away from the centre
    for triangle in mesh.triangles() {
        let normal = triangle.calculate_normal();
        let centroid = triangle
            .vertices
            .iter()
            .map(|v| v.position().coords)
            .sum::<nalgebra::Vector3<f32>>()
            / 3.0;
        assert!(normal.dot(&(centroid - nalgebra::Vector3::new(0.0, 0.3, 0.0))) > 0.0);
        for v in &triangle.vertices {
            assert_eq!(v.normal(), normal);
        }
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let path = std::env::temp_dir().join("fly3d-does-not-exist.obj");
    match obj::load(&path) {
        Err(LoadError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

#[test]
fn parse_errors_surface_through_load() {
    let path = write_temp("broken.obj", "v 0 0 0\nvt 0 0\nf 1/1 1/1 9/1\n");
    let result = obj::load_with(
        &path,
        &ObjOptions {
            index_base: IndexBase::One,
        },
    );
    fs::remove_file(&path).ok();

    match result {
        Err(LoadError::Parse(ParseError::IndexOutOfRange { line, index, .. })) => {
            assert_eq!(line, 3);
            assert_eq!(index, 9);
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}
