// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! TopoJSON decoding.
//!
//! A topology stores shared borders once as *arcs*; geometries reference arcs by index, with a
//! negative index `!i` meaning arc `i` traversed backwards. Quantized topologies delta-encode arc
//! positions and carry a `transform` that maps them back to coordinates.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use serde::Deserialize;

use crate::error::ExtractError;
use crate::raw::NumberOrString;

/// A TopoJSON topology.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Topology {
    /// Quantization transform, when the arcs are delta-encoded.
    #[serde(default)]
    pub transform: Option<TopoTransform>,
    /// Arc positions (each position is `[x, y, ...]`).
    #[serde(default)]
    pub arcs: Vec<Vec<Vec<f64>>>,
    /// Named top-level objects.
    #[serde(default)]
    pub objects: BTreeMap<String, Geometry>,
}

/// Maps quantized positions back to coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct TopoTransform {
    /// Per-axis scale.
    pub scale: [f64; 2],
    /// Per-axis translation.
    pub translate: [f64; 2],
}

/// A TopoJSON geometry object.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A group of geometries.
    GeometryCollection {
        /// Members.
        #[serde(default)]
        geometries: Vec<Geometry>,
    },
    /// A polygon: rings of arc indices, exterior first.
    Polygon {
        /// Rings.
        arcs: Vec<Vec<i64>>,
        /// Feature id.
        #[serde(default)]
        id: Option<NumberOrString>,
    },
    /// Several polygons.
    MultiPolygon {
        /// Polygons.
        arcs: Vec<Vec<Vec<i64>>>,
        /// Feature id.
        #[serde(default)]
        id: Option<NumberOrString>,
    },
    /// A line of arc indices.
    LineString {
        /// Arcs.
        arcs: Vec<i64>,
        /// Feature id.
        #[serde(default)]
        id: Option<NumberOrString>,
    },
    /// Several lines.
    MultiLineString {
        /// Lines.
        arcs: Vec<Vec<i64>>,
        /// Feature id.
        #[serde(default)]
        id: Option<NumberOrString>,
    },
    /// Points and anything else that does not reference arcs.
    #[serde(other)]
    Other,
}

impl Geometry {
    fn id(&self) -> Option<&NumberOrString> {
        match self {
            Self::Polygon { id, .. }
            | Self::MultiPolygon { id, .. }
            | Self::LineString { id, .. }
            | Self::MultiLineString { id, .. } => id.as_ref(),
            Self::GeometryCollection { .. } | Self::Other => None,
        }
    }

    /// Arc index lists, one per ring or line.
    fn arc_lists(&self) -> Vec<&[i64]> {
        match self {
            Self::Polygon { arcs, .. } | Self::MultiLineString { arcs, .. } => {
                arcs.iter().map(Vec::as_slice).collect()
            }
            Self::MultiPolygon { arcs, .. } => arcs.iter().flatten().map(Vec::as_slice).collect(),
            Self::LineString { arcs, .. } => alloc::vec![arcs.as_slice()],
            Self::GeometryCollection { .. } | Self::Other => Vec::new(),
        }
    }

    /// Leaf geometries in document order.
    fn leaves<'a>(&'a self, out: &mut Vec<&'a Self>) {
        match self {
            Self::GeometryCollection { geometries } => {
                for g in geometries {
                    g.leaves(out);
                }
            }
            Self::Other => {}
            _ => out.push(self),
        }
    }
}

/// A decoded area feature.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    /// The geometry's id, if any.
    pub id: Option<NumberOrString>,
    /// Closed rings of all polygons.
    pub rings: Vec<Vec<Point>>,
}

impl Feature {
    /// Bounding box of all rings, or `None` when there are no points.
    pub fn bounds(&self) -> Option<Rect> {
        bounds_of(self.rings.iter().flatten())
    }
}

/// Which arcs [`Topology::mesh`] keeps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MeshFilter {
    /// Every arc.
    #[default]
    All,
    /// Arcs shared by two different geometries.
    Interior,
    /// Arcs used by a single geometry.
    Exterior,
}

impl MeshFilter {
    fn keep(self, a: usize, b: usize) -> bool {
        match self {
            Self::All => true,
            Self::Interior => a != b,
            Self::Exterior => a == b,
        }
    }
}

impl Topology {
    /// Arcs decoded to absolute coordinates.
    pub fn decoded_arcs(&self) -> Vec<Vec<Point>> {
        self.arcs
            .iter()
            .map(|arc| {
                let mut x = 0.0;
                let mut y = 0.0;
                arc.iter()
                    .filter(|p| p.len() >= 2)
                    .map(|p| match self.transform {
                        Some(t) => {
                            x += p[0];
                            y += p[1];
                            Point::new(
                                x * t.scale[0] + t.translate[0],
                                y * t.scale[1] + t.translate[1],
                            )
                        }
                        None => Point::new(p[0], p[1]),
                    })
                    .collect()
            })
            .collect()
    }

    fn object(&self, name: &str) -> Result<&Geometry, ExtractError> {
        self.objects
            .get(name)
            .ok_or_else(|| ExtractError::MissingObject(name.to_string()))
    }

    /// Area features of the named object, in document order.
    ///
    /// Line and point geometries are skipped.
    pub fn features(&self, object: &str) -> Result<Vec<Feature>, ExtractError> {
        let arcs = self.decoded_arcs();
        let mut leaves = Vec::new();
        self.object(object)?.leaves(&mut leaves);
        leaves
            .into_iter()
            .filter(|g| matches!(g, Geometry::Polygon { .. } | Geometry::MultiPolygon { .. }))
            .map(|g| {
                let rings = g
                    .arc_lists()
                    .into_iter()
                    .map(|indices| stitch(&arcs, indices))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Feature {
                    id: g.id().cloned(),
                    rings,
                })
            })
            .collect()
    }

    /// Borders of the named object, one polyline per selected arc.
    ///
    /// For each arc the filter sees the first and last geometry that reference it.
    pub fn mesh(&self, object: &str, filter: MeshFilter) -> Result<Vec<Vec<Point>>, ExtractError> {
        let arcs = self.decoded_arcs();
        let mut leaves = Vec::new();
        self.object(object)?.leaves(&mut leaves);
        let mut users: Vec<Option<(usize, usize)>> = alloc::vec![None; arcs.len()];
        for (geom, g) in leaves.iter().enumerate() {
            for &i in g.arc_lists().iter().copied().flatten() {
                let slot = users
                    .get_mut(arc_index(i))
                    .ok_or(ExtractError::InvalidArc(i))?;
                *slot = Some(match *slot {
                    Some((first, _)) => (first, geom),
                    None => (geom, geom),
                });
            }
        }
        Ok(users
            .iter()
            .zip(arcs)
            .filter_map(|(u, arc)| {
                let (a, b) = (*u)?;
                filter.keep(a, b).then_some(arc)
            })
            .collect())
    }
}

fn arc_index(i: i64) -> usize {
    let j = if i < 0 { !i } else { i };
    usize::try_from(j).unwrap_or(usize::MAX)
}

/// Joins arcs into one line, dropping the duplicated first point of each subsequent arc.
fn stitch(arcs: &[Vec<Point>], indices: &[i64]) -> Result<Vec<Point>, ExtractError> {
    let mut out: Vec<Point> = Vec::new();
    for &i in indices {
        let arc = arcs.get(arc_index(i)).ok_or(ExtractError::InvalidArc(i))?;
        if !out.is_empty() {
            out.pop();
        }
        if i < 0 {
            out.extend(arc.iter().rev());
        } else {
            out.extend(arc.iter());
        }
    }
    Ok(out)
}

/// Bounding box of a point set.
pub fn bounds_of<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Rect> {
    let mut points = points.into_iter();
    let first = *points.next()?;
    Some(points.fold(Rect::from_points(first, first), |r, p| r.union_pt(*p)))
}
