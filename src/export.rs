//! AC3D export.
//!
//! Writes a [`SceneBuilder`] in the line-oriented AC3D text format and places
//! the texture files it references next to the model.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use cgmath::{Matrix3, SquareMatrix, Vector2, Vector3};

use crate::{
    data_structures::{
        builder::SceneBuilder,
        material::Material,
        scene_graph::{Object, ObjectKind, Placement, Poly, Surface},
    },
    error::ExportError,
};

/// First line of every AC3D file.
pub const AC_HEADER: &str = "AC3Db";

/// Format a float with at most six decimals, without trailing zeros or a
/// trailing decimal point. Negative zero is written as `0`.
pub fn format_float(value: f32) -> String {
    let mut s = format!("{value:.6}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" { "0".to_string() } else { s }
}

fn format_vec3(v: &Vector3<f32>) -> String {
    format!("{} {} {}", format_float(v.x), format_float(v.y), format_float(v.z))
}

fn format_vec2(v: &Vector2<f32>) -> String {
    format!("{} {}", format_float(v.x), format_float(v.y))
}

/// Rows of `m`, two spaces between rows.
fn format_rotation(m: &Matrix3<f32>) -> String {
    // cgmath stores columns; AC3D wants rows
    (0..3)
        .map(|row| format!("{} {} {}", format_float(m.x[row]), format_float(m.y[row]), format_float(m.z[row])))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Writes AC3D text to any [`Write`] sink.
pub struct AcWriter<W: Write> {
    out: W,
}

impl<W: Write> AcWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write the header, all materials and the object tree.
    pub fn write_scene(&mut self, scene: &SceneBuilder) -> std::io::Result<()> {
        writeln!(self.out, "{AC_HEADER}")?;
        for material in &scene.materials {
            self.write_material(material)?;
        }
        for object in &scene.objects {
            self.write_object(object)?;
        }
        self.out.flush()
    }

    fn write_material(&mut self, m: &Material) -> std::io::Result<()> {
        writeln!(
            self.out,
            "MATERIAL \"{}\" rgb {}  amb {}  emis {}  spec {}  shi {}  trans {}",
            m.name,
            format_vec3(&m.rgb),
            format_vec3(&m.ambient),
            format_vec3(&m.emissive),
            format_vec3(&m.specular),
            m.shininess,
            format_float(m.transparency)
        )
    }

    fn write_object(&mut self, object: &Object) -> std::io::Result<()> {
        writeln!(self.out, "OBJECT {}", object.kind.tag())?;
        if !object.name.is_empty() {
            writeln!(self.out, "name \"{}\"", object.name)?;
        }
        if let Some(url) = &object.url {
            writeln!(self.out, "url \"{url}\"")?;
        }
        match &object.kind {
            ObjectKind::World => {}
            ObjectKind::Group(placement) => self.write_placement(placement)?,
            ObjectKind::Poly(poly) => self.write_poly(poly)?,
        }
        writeln!(self.out, "kids {}", object.children.len())?;
        for child in &object.children {
            self.write_object(child)?;
        }
        Ok(())
    }

    fn write_placement(&mut self, placement: &Placement) -> std::io::Result<()> {
        if let Some(rotation) = placement.rotation.filter(|r| !r.is_identity()) {
            writeln!(self.out, "rot {}", format_rotation(&rotation))?;
        }
        if let Some(location) = placement.location.filter(|l| *l != Vector3::new(0.0, 0.0, 0.0)) {
            writeln!(self.out, "loc {}", format_vec3(&location))?;
        }
        Ok(())
    }

    fn write_poly(&mut self, poly: &Poly) -> std::io::Result<()> {
        self.write_placement(&poly.placement)?;
        if let Some(texture) = &poly.texture {
            writeln!(self.out, "texture \"{texture}\"")?;
        }
        if let Some(texrep) = poly.texrep.filter(|t| *t != Vector2::new(1.0, 1.0)) {
            writeln!(self.out, "texrep {}", format_vec2(&texrep))?;
        }
        writeln!(self.out, "numvert {}", poly.vertices.len())?;
        for vertex in &poly.vertices {
            writeln!(self.out, "{}", format_vec3(vertex))?;
        }
        writeln!(self.out, "numsurf {}", poly.surfaces.len())?;
        for surface in &poly.surfaces {
            self.write_surface(surface)?;
        }
        Ok(())
    }

    fn write_surface(&mut self, surface: &Surface) -> std::io::Result<()> {
        writeln!(self.out, "SURF {:#x}", surface.flags)?;
        if let Some(material) = surface.material {
            writeln!(self.out, "mat {material}")?;
        }
        writeln!(self.out, "refs {}", surface.refs.len())?;
        for r in &surface.refs {
            writeln!(self.out, "{} {}", r.vertex, format_vec2(&r.uv))?;
        }
        Ok(())
    }
}

/// Render `scene` to an AC3D string.
pub fn to_ac_string(scene: &SceneBuilder) -> std::io::Result<String> {
    let mut writer = AcWriter::new(Vec::new());
    writer.write_scene(scene)?;
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

/**
 * Writes `scene` to `path` and copies its textures into the same directory.
 *
 * The scene is validated first; a scene with dangling material or vertex
 * indices is rejected before anything is written.
 */
pub fn write_ac_file(scene: &SceneBuilder, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    scene.validate()?;
    {
        let file = File::create(path)?;
        let mut writer = AcWriter::new(BufWriter::new(file));
        writer.write_scene(scene)?;
    }
    log::info!(
        "wrote {} ({} materials, {} objects)",
        path.display(),
        scene.materials.len(),
        scene.object_count()
    );

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    copy_textures(scene, dir)?;
    Ok(())
}

/// Copy every texture of `scene` into `dir` under its file name, leaving
/// files that already exist there untouched. Returns the number of files copied.
pub fn copy_textures(scene: &SceneBuilder, dir: &Path) -> Result<usize, ExportError> {
    let mut options = fs_extra::file::CopyOptions::new();
    options.skip_exist = true;
    let mut copied = 0;
    for texture in &scene.textures {
        let Some(file_name) = texture.file_name() else {
            continue;
        };
        let target = dir.join(file_name);
        if target.exists() {
            log::debug!("texture {} already present", target.display());
            continue;
        }
        fs_extra::file::copy(texture, &target, &options).map_err(|source| ExportError::TextureCopy {
            path: texture.clone(),
            source,
        })?;
        copied += 1;
    }
    log::debug!("copied {copied} textures into {}", dir.display());
    Ok(copied)
}
