//! Annotation data model.

use serde::{Deserialize, Deserializer, Serialize};

use super::point::NormalizedPoint;

/// Minimum number of distinct vertices for a committed polygon.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Polygon vertices in normalized space, stored as flat `x1 y1 x2 y2 ...` scalars.
///
/// Rows read by the line importer are kept verbatim, including an odd number of
/// scalars or fewer than three vertices, so they export exactly as they came in.
/// Polygons committed by the drawing tool are always well formed.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct NormalizedPolygon {
    coords: Vec<f64>,
}

impl NormalizedPolygon {
    /// Wrap flat scalars as-is.
    pub fn from_flat(coords: Vec<f64>) -> Self {
        Self { coords }
    }

    pub fn from_points(points: impl IntoIterator<Item = NormalizedPoint>) -> Self {
        Self {
            coords: points.into_iter().flat_map(|p| [p.x, p.y]).collect(),
        }
    }

    /// Flat scalars in emission order.
    pub fn as_flat(&self) -> &[f64] {
        &self.coords
    }

    /// Complete vertices. A dangling trailing x is skipped.
    pub fn vertices(&self) -> impl Iterator<Item = NormalizedPoint> + '_ {
        self.coords
            .chunks_exact(2)
            .map(|pair| NormalizedPoint::new(pair[0], pair[1]))
    }

    /// Number of points, counting a closing repeat (`scalars / 2`).
    pub fn vertex_count(&self) -> usize {
        self.coords.len() / 2
    }

    pub fn scalar_count(&self) -> usize {
        self.coords.len()
    }

    pub fn has_dangling_coordinate(&self) -> bool {
        self.coords.len() % 2 != 0
    }

    pub fn has_non_finite(&self) -> bool {
        self.coords.iter().any(|c| !c.is_finite())
    }

    /// Whether the last vertex repeats the first.
    pub fn is_closed_ring(&self) -> bool {
        let n = self.vertex_count();
        n >= 2 && {
            let first = &self.coords[0..2];
            let last = &self.coords[(n - 1) * 2..n * 2];
            first == last
        }
    }

    /// Distinct vertices, not counting a closing repeat.
    pub fn distinct_vertex_count(&self) -> usize {
        let n = self.vertex_count();
        if self.is_closed_ring() { n - 1 } else { n }
    }

    /// Even length, finite, and at least [`MIN_POLYGON_VERTICES`] distinct vertices.
    pub fn is_well_formed(&self) -> bool {
        !self.has_dangling_coordinate()
            && !self.has_non_finite()
            && self.distinct_vertex_count() >= MIN_POLYGON_VERTICES
    }
}

// JSON has no NaN: serde_json writes it as `null`, so read `null` back as NaN.
impl<'de> Deserialize<'de> for NormalizedPolygon {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Vec<Option<f64>> = Vec::deserialize(deserializer)?;
        Ok(Self::from_flat(
            raw.into_iter().map(|c| c.unwrap_or(f64::NAN)).collect(),
        ))
    }
}

/// One labeled polygon region on the current image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Class name; resolves against the class table, or `"unknown"` after import.
    #[serde(rename = "class")]
    pub class_name: String,
    /// Vertices in normalized space.
    pub points: NormalizedPolygon,
}

impl Annotation {
    pub fn new(class_name: impl Into<String>, points: NormalizedPolygon) -> Self {
        Self {
            class_name: class_name.into(),
            points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_ring() -> NormalizedPolygon {
        NormalizedPolygon::from_flat(vec![0.1, 0.1, 0.5, 0.1, 0.3, 0.4, 0.1, 0.1])
    }

    #[test]
    fn test_closed_ring_counts() {
        let ring = triangle_ring();
        assert!(ring.is_closed_ring());
        assert_eq!(ring.vertex_count(), 4);
        assert_eq!(ring.distinct_vertex_count(), 3);
        assert!(ring.is_well_formed());
    }

    #[test]
    fn test_dangling_coordinate_is_kept() {
        let poly = NormalizedPolygon::from_flat(vec![0.1, 0.2, 0.3]);
        assert!(poly.has_dangling_coordinate());
        assert_eq!(poly.as_flat(), &[0.1, 0.2, 0.3]);
        assert_eq!(poly.vertices().count(), 1);
        assert!(!poly.is_well_formed());
    }

    #[test]
    fn test_from_points_flattens_in_order() {
        let poly = NormalizedPolygon::from_points([
            NormalizedPoint::new(0.1, 0.2),
            NormalizedPoint::new(0.3, 0.4),
        ]);
        assert_eq!(poly.as_flat(), &[0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_json_shape_matches_host_list() {
        let ann = Annotation::new("пора", NormalizedPolygon::from_flat(vec![0.5, 0.25]));
        let json = serde_json::to_string(&ann).unwrap();
        assert_eq!(json, r#"{"class":"пора","points":[0.5,0.25]}"#);
    }

    #[test]
    fn test_json_null_reads_as_nan() {
        let ann: Annotation =
            serde_json::from_str(r#"{"class":"unknown","points":[0.5,null]}"#).unwrap();
        assert!(ann.points.as_flat()[1].is_nan());
        assert!(ann.points.has_non_finite());
    }
}
