use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Axis-aligned extents of one detector sub-volume (e.g. a single TPC).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    /// Create a box after checking that extents are finite and ordered per axis.
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Result<Self> {
        if !min.iter().chain(max.iter()).all(|c| c.is_finite()) {
            return Err(Error::InvalidParam(
                "bounding box extents must be finite".into(),
            ));
        }
        for k in 0..3 {
            if min[k] > max[k] {
                return Err(Error::InvalidParam(format!(
                    "bounding box min > max on axis {k} ({} > {})",
                    min[k], max[k]
                )));
            }
        }
        Ok(Self { min, max })
    }
}

/// Source of detector sub-volumes.
pub trait GeometrySource {
    /// Every sub-volume whose extents make up the sensitive detector.
    fn sub_volumes(&self) -> Vec<BoundingBox>;
}

impl GeometrySource for [BoundingBox] {
    fn sub_volumes(&self) -> Vec<BoundingBox> {
        self.to_vec()
    }
}

impl GeometrySource for Vec<BoundingBox> {
    fn sub_volumes(&self) -> Vec<BoundingBox> {
        self.clone()
    }
}

/// Outer envelope of all detector sub-volumes; immutable once built.
///
/// Serialised as a single `BoundingBox`; deserialising goes through the validated
/// constructor, so an inverted or non-finite document is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoundingBox", into = "BoundingBox")]
pub struct FiducialVolume {
    min: [f64; 3],
    max: [f64; 3],
}

impl FiducialVolume {
    /// Envelope (min of mins, max of maxes per axis) of the given sub-volumes.
    ///
    /// Errors:
    /// - `Error::EmptyGeometry` if no sub-volume is supplied.
    /// - `Error::InvalidParam` if a sub-volume has non-finite or inverted extents.
    pub fn from_sub_volumes<I>(volumes: I) -> Result<Self>
    where
        I: IntoIterator<Item = BoundingBox>,
    {
        let mut iter = volumes.into_iter();
        let first = iter.next().ok_or(Error::EmptyGeometry)?;
        let first = BoundingBox::new(first.min, first.max)?;
        let (mut min, mut max) = (first.min, first.max);
        for b in iter {
            let b = BoundingBox::new(b.min, b.max)?;
            for k in 0..3 {
                min[k] = min[k].min(b.min[k]);
                max[k] = max[k].max(b.max[k]);
            }
        }
        Ok(Self { min, max })
    }

    /// Envelope of every sub-volume reported by `geometry`.
    pub fn from_geometry<G: GeometrySource + ?Sized>(geometry: &G) -> Result<Self> {
        Self::from_sub_volumes(geometry.sub_volumes())
    }

    /// Closed-box containment: boundary points are inside, NaN coordinates are not.
    #[inline]
    pub fn contains(&self, x: f64, y: f64, z: f64) -> bool {
        (self.min[0]..=self.max[0]).contains(&x)
            && (self.min[1]..=self.max[1]).contains(&y)
            && (self.min[2]..=self.max[2]).contains(&z)
    }

    /// Lower corner (x, y, z).
    #[inline]
    pub fn min(&self) -> [f64; 3] {
        self.min
    }

    /// Upper corner (x, y, z).
    #[inline]
    pub fn max(&self) -> [f64; 3] {
        self.max
    }
}

impl TryFrom<BoundingBox> for FiducialVolume {
    type Error = Error;

    fn try_from(b: BoundingBox) -> Result<Self> {
        Self::from_sub_volumes([b])
    }
}

impl From<FiducialVolume> for BoundingBox {
    fn from(fv: FiducialVolume) -> Self {
        BoundingBox {
            min: fv.min,
            max: fv.max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(lo: f64, hi: f64) -> BoundingBox {
        BoundingBox {
            min: [lo; 3],
            max: [hi; 3],
        }
    }

    #[test]
    fn closed_box_containment() -> Result<()> {
        let fv = FiducialVolume::from_sub_volumes([cube(0.0, 10.0)])?;
        assert!(fv.contains(5.0, 5.0, 5.0));
        assert!(fv.contains(10.0, 5.0, 5.0));
        assert!(fv.contains(0.0, 0.0, 0.0));
        assert!(!fv.contains(10.0001, 5.0, 5.0));
        assert!(!fv.contains(5.0, -0.0001, 5.0));
        assert!(!fv.contains(5.0, 5.0, 11.0));
        Ok(())
    }

    #[test]
    fn envelope_spans_all_sub_volumes() -> Result<()> {
        let tpcs = vec![
            BoundingBox {
                min: [-200.0, -100.0, 0.0],
                max: [0.0, 100.0, 500.0],
            },
            BoundingBox {
                min: [0.0, -120.0, 10.0],
                max: [200.0, 90.0, 520.0],
            },
        ];
        let fv = FiducialVolume::from_geometry(&tpcs)?;
        assert_eq!(fv.min(), [-200.0, -120.0, 0.0]);
        assert_eq!(fv.max(), [200.0, 100.0, 520.0]);
        // Gap-free envelope: a point between sub-volumes is still inside.
        assert!(fv.contains(0.0, 95.0, 5.0));
        Ok(())
    }

    #[test]
    fn empty_geometry_rejected() {
        let err = FiducialVolume::from_sub_volumes(Vec::<BoundingBox>::new()).unwrap_err();
        assert!(matches!(err, Error::EmptyGeometry));
    }

    #[test]
    fn inverted_extents_rejected() {
        let bad = BoundingBox {
            min: [0.0, 5.0, 0.0],
            max: [1.0, 4.0, 1.0],
        };
        let err = FiducialVolume::from_sub_volumes([cube(0.0, 1.0), bad]).unwrap_err();
        assert!(err.to_string().contains("axis 1"));
    }

    #[test]
    fn nan_coordinates_are_outside() -> Result<()> {
        let fv = FiducialVolume::from_sub_volumes([cube(0.0, 10.0)])?;
        assert!(!fv.contains(f64::NAN, 5.0, 5.0));
        assert!(!fv.contains(5.0, f64::NAN, 5.0));
        assert!(!fv.contains(5.0, 5.0, f64::NAN));
        assert!(!fv.contains(f64::INFINITY, 5.0, 5.0));
        Ok(())
    }

    #[test]
    fn inverted_document_rejected() {
        let doc = "min = [10.0, 10.0, 10.0]\nmax = [0.0, 0.0, 0.0]\n";
        assert!(toml::from_str::<FiducialVolume>(doc).is_err());
    }

    #[test]
    fn toml_round_trip() -> Result<()> {
        let fv = FiducialVolume::from_sub_volumes([BoundingBox {
            min: [-1.5, 0.0, 2.0],
            max: [1.5, 4.0, 8.0],
        }])?;
        let text = toml::to_string(&fv).map_err(|e| Error::InvalidParam(e.to_string()))?;
        let back: FiducialVolume = toml::from_str(&text)?;
        assert_eq!(back, fv);
        Ok(())
    }

    #[test]
    fn nan_extents_rejected() {
        assert!(BoundingBox::new([f64::NAN, 0.0, 0.0], [1.0; 3]).is_err());
    }
}
