/// Parser for a triangle-only subset of the Wavefront OBJ text format
///
/// Three directives are understood, one per line:
///
/// ```text
/// v  <x> <y> <z> [w]
/// vt <u> <v> [w]
/// f  <p>/<t>[/<n>] <p>/<t>[/<n>] <p>/<t>[/<n>]
/// ```
///
/// Every other line is skipped, and text after `#` is a comment. Faces must be
/// triangles. Each face expands into three unshared vertices carrying the face's flat
/// normal, so the result is an unindexed [`Mesh`].
use std::fs;
use std::path::Path;

use nalgebra::{Point3, Vector2};
use nom::{
    character::complete::{char, i64 as integer, space0, space1},
    combinator::{all_consuming, opt, verify},
    multi::many1,
    number::complete::float,
    sequence::{preceded, terminated},
    IResult,
};

use crate::error::{LoadError, ParseError};
use crate::geometry::{face_normal, Mesh, Vertex};

/// How face lines number the position and texture coordinate pools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexBase {
    /// `1` names the first entry, as OBJ exporters write it
    #[default]
    One,
    /// `0` names the first entry
    Zero,
}

/// Parser configuration
#[derive(Debug, Clone, Default)]
pub struct ObjOptions {
    pub index_base: IndexBase,
}

/// One face corner: position index, texture coordinate index
type Corner = (i64, i64);

/// Parse model text with the default (1-based) index convention
pub fn parse_obj(text: &str) -> Result<Mesh, ParseError> {
    parse_obj_with(text, &ObjOptions::default())
}

pub fn parse_obj_with(text: &str, options: &ObjOptions) -> Result<Mesh, ParseError> {
    // Editors may prefix the first line with a byte-order mark
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    // Size the pools up front so a huge model fails cleanly instead of aborting
    let mut counts = [0usize; 3];
    for line in text.lines() {
        match keyword(line) {
            Some(("v", _)) => counts[0] += 1,
            Some(("vt", _)) => counts[1] += 1,
            Some(("f", _)) => counts[2] += 1,
            _ => {}
        }
    }

    let mut positions: Vec<Point3<f32>> = Vec::new();
    let mut tex_coords: Vec<Vector2<f32>> = Vec::new();
    let mut vertices: Vec<Vertex> = Vec::new();
    positions.try_reserve_exact(counts[0])?;
    tex_coords.try_reserve_exact(counts[1])?;
    vertices.try_reserve_exact(counts[2].saturating_mul(3))?;

    let mut skipped = 0usize;
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let Some((directive, operands)) = keyword(raw) else {
            continue;
        };

        match directive {
            "v" => positions.push(run(line, "v", operands, position)?),
            "vt" => tex_coords.push(run(line, "vt", operands, tex_coord)?),
            "f" => {
                let corners = run(line, "f", operands, face)?;
                if corners.len() != 3 {
                    return Err(ParseError::NotTriangle {
                        line,
                        corners: corners.len(),
                    });
                }

                let mut resolved = [(Point3::origin(), Vector2::zeros()); 3];
                for (slot, &(p, t)) in resolved.iter_mut().zip(&corners) {
                    let p = resolve(line, "position", p, positions.len(), options.index_base)?;
                    let t = resolve(
                        line,
                        "texture coordinate",
                        t,
                        tex_coords.len(),
                        options.index_base,
                    )?;
                    *slot = (positions[p], tex_coords[t]);
                }

                let [(p0, _), (p1, _), (p2, _)] = resolved;
                let normal = face_normal(&p0, &p1, &p2);
                vertices.extend(
                    resolved
                        .iter()
                        .map(|&(position, tex_coord)| Vertex::new(position, normal, tex_coord)),
                );
            }
            other => {
                log::trace!("line {line}: skipping `{other}` directive");
                skipped += 1;
            }
        }
    }

    log::debug!(
        "parsed model: {} positions, {} texture coordinates, {} triangles, {} lines skipped",
        positions.len(),
        tex_coords.len(),
        vertices.len() / 3,
        skipped
    );
    Ok(Mesh::from_corners(vertices))
}

/// Read a model file completely, then parse it
pub fn load(path: impl AsRef<Path>) -> Result<Mesh, LoadError> {
    load_with(path, &ObjOptions::default())
}

pub fn load_with(path: impl AsRef<Path>, options: &ObjOptions) -> Result<Mesh, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("read {} bytes from {}", text.len(), path.display());
    Ok(parse_obj_with(&text, options)?)
}

/// Split a line into its leading token and the rest, dropping comments
fn keyword(line: &str) -> Option<(&str, &str)> {
    let line = match line.find('#') {
        Some(start) => &line[..start],
        None => line,
    };
    let line = line.trim();
    let directive = line.split_whitespace().next()?;
    Some((directive, &line[directive.len()..]))
}

/// Run an operand parser over the whole remainder of a line
fn run<'a, T>(
    line: usize,
    keyword: &'static str,
    operands: &'a str,
    parser: impl FnMut(&'a str) -> IResult<&'a str, T>,
) -> Result<T, ParseError> {
    all_consuming(terminated(parser, space0))(operands)
        .map(|(_, value)| value)
        .map_err(|_| ParseError::Malformed {
            line,
            keyword,
            text: operands.trim().to_string(),
        })
}

fn resolve(
    line: usize,
    pool: &'static str,
    index: i64,
    len: usize,
    base: IndexBase,
) -> Result<usize, ParseError> {
    let offset = match base {
        IndexBase::One => 1,
        IndexBase::Zero => 0,
    };
    index
        .checked_sub(offset)
        .and_then(|i| usize::try_from(i).ok())
        .filter(|&i| i < len)
        .ok_or(ParseError::IndexOutOfRange {
            line,
            pool,
            index,
            len,
        })
}

/// A finite float; `nan` and `inf` are rejected
fn number(input: &str) -> IResult<&str, f32> {
    preceded(space1, verify(float, |value: &f32| value.is_finite()))(input)
}

fn position(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, x) = number(input)?;
    let (input, y) = number(input)?;
    let (input, z) = number(input)?;
    // Homogeneous weight, unused
    let (input, _) = opt(number)(input)?;
    Ok((input, Point3::new(x, y, z)))
}

fn tex_coord(input: &str) -> IResult<&str, Vector2<f32>> {
    let (input, u) = number(input)?;
    let (input, v) = number(input)?;
    let (input, _) = opt(number)(input)?;
    Ok((input, Vector2::new(u, v)))
}

fn corner(input: &str) -> IResult<&str, Corner> {
    let (input, p) = integer(input)?;
    let (input, t) = preceded(char('/'), integer)(input)?;
    // Normal references are accepted but normals are always derived from the face
    let (input, _) = opt(preceded(char('/'), integer))(input)?;
    Ok((input, (p, t)))
}

fn face(input: &str) -> IResult<&str, Vec<Corner>> {
    many1(preceded(space1, corner))(input)
}
