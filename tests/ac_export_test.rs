use cgmath::{Deg, Matrix3, Vector2, Vector3};
use scone::{
    Material, Object, ObjectKind, Placement, SceneBuilder,
    error::ExportError,
    export::{AC_HEADER, copy_textures, format_float, to_ac_string},
    resources::{self, ConvertOptions},
    write_ac_file,
};
use serde_json::json;

mod common;

use common::test_utils::{quad_fixture, temp_dir};

fn triangle_scene() -> SceneBuilder {
    let mut scene = SceneBuilder::new();
    scene.add_material(Material::new("red", Vector3::new(1.0, 0.0, 0.0)));
    let world = scene.add_world("w");
    let poly = world
        .add_child(Object::poly("tri"))
        .as_poly_mut()
        .expect("poly object");
    poly.add_vertex(Vector3::new(0.0, 0.0, 0.0));
    poly.add_vertex(Vector3::new(1.0, 0.0, 0.0));
    poly.add_vertex(Vector3::new(0.0, 1.0, 0.5));
    let surface = poly.add_default_surface();
    surface.material = Some(0);
    surface.add_ref(2, 0.0, 1.0);
    surface.add_ref(1, 1.0, 0.0);
    surface.add_ref(0, 0.0, 0.0);
    scene
}

#[test]
fn floats_are_written_compactly() {
    assert_eq!(format_float(1.0), "1");
    assert_eq!(format_float(0.3333333), "0.333333");
    assert_eq!(format_float(-0.0), "0");
    assert_eq!(format_float(-0.0000001), "0");
    assert_eq!(format_float(-2.5), "-2.5");
    assert_eq!(format_float(120.0), "120");
    assert_eq!(format_float(0.2), "0.2");
}

#[test]
fn scene_is_written_in_tree_order() {
    let expected = "\
AC3Db
MATERIAL \"red\" rgb 1 0 0  amb 0.2 0.2 0.2  emis 0 0 0  spec 0.5 0.5 0.5  shi 10  trans 0
OBJECT world
name \"w\"
kids 1
OBJECT poly
name \"tri\"
numvert 3
0 0 0
1 0 0
0 1 0.5
numsurf 1
SURF 0x20
mat 0
refs 3
2 0 1
1 1 0
0 0 0
kids 0
";
    assert_eq!(to_ac_string(&triangle_scene()).expect("writes"), expected);
}

#[test]
fn placement_and_texture_lines_are_optional() {
    let mut scene = SceneBuilder::new();
    let group = scene.add_object(Object::new(
        "",
        ObjectKind::Group(Placement {
            rotation: Some(Matrix3::from_angle_z(Deg(90.0))),
            location: Some(Vector3::new(1.0, 2.0, 3.0)),
        }),
    ));
    group.url = Some("https://example.org/hut".into());
    let plain = group.add_child(Object::new(
        "plain",
        ObjectKind::Group(Placement {
            rotation: Some(Matrix3::from_scale(1.0)),
            location: Some(Vector3::new(0.0, 0.0, 0.0)),
        }),
    ));
    let poly = plain
        .add_child(Object::poly("textured"))
        .as_poly_mut()
        .expect("poly object");
    poly.texture = Some("hut.png".into());
    poly.texrep = Some(Vector2::new(2.0, 2.0));
    let untiled = plain
        .add_child(Object::poly("untiled"))
        .as_poly_mut()
        .expect("poly object");
    untiled.texrep = Some(Vector2::new(1.0, 1.0));

    let text = to_ac_string(&scene).expect("writes");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[..6],
        [
            AC_HEADER,
            "OBJECT group",
            "url \"https://example.org/hut\"",
            "rot 0 -1 0  1 0 0  0 0 1",
            "loc 1 2 3",
            "kids 1",
        ]
    );
    assert_eq!(lines[6..9], ["OBJECT group", "name \"plain\"", "kids 2"]);
    assert_eq!(
        lines[9..16],
        [
            "OBJECT poly",
            "name \"textured\"",
            "texture \"hut.png\"",
            "texrep 2 2",
            "numvert 0",
            "numsurf 0",
            "kids 0",
        ]
    );
    assert!(!text.contains("texrep 1 1"));
}

#[test]
fn write_ac_file_rejects_invalid_scenes() {
    let dir = temp_dir("export-invalid");
    let mut scene = triangle_scene();
    scene.materials.clear();
    let path = dir.join("broken.ac");

    let result = write_ac_file(&scene, &path);
    assert!(matches!(result, Err(ExportError::InvalidScene(_))));
    assert!(!path.exists());
}

#[test]
fn textures_are_copied_next_to_the_model() {
    let dir = temp_dir("export-textures");
    let source = dir.join("source");
    let out = dir.join("out");
    std::fs::create_dir_all(&source).expect("create dir");
    std::fs::create_dir_all(&out).expect("create dir");
    std::fs::write(source.join("wall.png"), b"new wall").expect("write texture");
    std::fs::write(source.join("roof.png"), b"new roof").expect("write texture");
    std::fs::write(out.join("roof.png"), b"old roof").expect("write texture");

    let mut scene = triangle_scene();
    scene.add_texture(source.join("wall.png"));
    scene.add_texture(source.join("roof.png"));
    write_ac_file(&scene, out.join("model.ac")).expect("writes");

    let written = std::fs::read_to_string(out.join("model.ac")).expect("read model");
    assert!(written.starts_with("AC3Db\n"));
    assert_eq!(std::fs::read(out.join("wall.png")).expect("copied"), b"new wall");
    assert_eq!(std::fs::read(out.join("roof.png")).expect("kept"), b"old roof");

    // everything is in place now
    assert_eq!(copy_textures(&scene, &out).expect("copies"), 0);
}

#[test]
fn glb_converts_to_textured_model() {
    let dir = temp_dir("convert-end-to-end");
    let textures = dir.join("textures");
    let out = dir.join("out");
    std::fs::create_dir_all(&textures).expect("create dir");
    std::fs::create_dir_all(&out).expect("create dir");
    std::fs::write(textures.join("Planks.png"), b"planks").expect("write texture");

    let mut fixture = quad_fixture(None);
    let texture = fixture.add_texture("images/planks.png");
    let material = fixture.add_material(json!({
        "name": "wood",
        "pbrMetallicRoughness": {
            "baseColorFactor": [0.5, 0.25, 0.0, 1.0],
            "baseColorTexture": { "index": texture },
        },
    }));
    fixture.meshes[0]["primitives"][0]["material"] = json!(material);
    let input = dir.join("hut.glb");
    std::fs::write(&input, fixture.to_glb()).expect("write GLB");

    let options = ConvertOptions {
        texture_root: Some(textures.clone()),
        transform: None,
        recursive: false,
    };
    let scene = resources::convert_all(&[input.clone(), input], &options).expect("converts");
    // one world per input; the material table is appended per input
    assert_eq!(scene.objects.len(), 2);
    assert_eq!(scene.materials.len(), 2);
    assert_eq!(scene.objects[1].children[0].as_poly().expect("poly").surfaces[0].material, Some(1));

    let model = out.join("hut.ac");
    write_ac_file(&scene, &model).expect("writes");
    let text = std::fs::read_to_string(&model).expect("read model");
    assert!(text.contains("MATERIAL \"wood\" rgb 0.5 0.25 0  amb 0.2 0.2 0.2"));
    assert!(text.contains("OBJECT world\nname \"hut\"\nkids 1\n"));
    assert!(text.contains("texture \"Planks.png\""));
    assert_eq!(text.matches("numsurf 2").count(), 2);
    assert!(out.join("Planks.png").exists());
}
