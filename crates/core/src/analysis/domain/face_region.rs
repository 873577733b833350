use serde::{Deserialize, Serialize};

use super::analysis_error::ConfigError;

/// Anatomical area a region samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegionKind {
    LeftEye,
    RightEye,
    Forehead,
    LeftCheek,
    RightCheek,
}

impl std::fmt::Display for RegionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionKind::LeftEye => write!(f, "left eye"),
            RegionKind::RightEye => write!(f, "right eye"),
            RegionKind::Forehead => write!(f, "forehead"),
            RegionKind::LeftCheek => write!(f, "left cheek"),
            RegionKind::RightCheek => write!(f, "right cheek"),
        }
    }
}

/// Gradient-magnitude thresholds for the edge operator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPair {
    pub low: f32,
    pub high: f32,
}

impl ThresholdPair {
    pub const fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }
}

/// Region geometry relative to the crop center, with its own thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionTemplate {
    pub kind: RegionKind,
    /// Offset of the region center from the crop center.
    pub offset: (i32, i32),
    pub half_extent: (i32, i32),
    pub thresholds: ThresholdPair,
}

impl RegionTemplate {
    pub const fn new(
        kind: RegionKind,
        offset: (i32, i32),
        half_extent: (i32, i32),
        thresholds: ThresholdPair,
    ) -> Self {
        Self {
            kind,
            offset,
            half_extent,
            thresholds,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (w, h) = self.half_extent;
        if w < 0 || h < 0 {
            return Err(ConfigError::NegativeHalfExtent {
                region: self.kind.to_string(),
                w,
                h,
            });
        }
        let ThresholdPair { low, high } = self.thresholds;
        if !low.is_finite() || !high.is_finite() || low < 0.0 {
            return Err(ConfigError::InvalidThreshold {
                region: self.kind.to_string(),
            });
        }
        if low > high {
            return Err(ConfigError::InvertedThresholds {
                region: self.kind.to_string(),
                low,
                high,
            });
        }
        Ok(())
    }
}

/// Layout tuned on 250x250 crops. Flatter skin (forehead, cheeks) gets a
/// lower low-threshold than the eyes.
pub const DEFAULT_REGION_TEMPLATES: [RegionTemplate; 5] = [
    RegionTemplate::new(RegionKind::LeftEye, (-50, -7), (50, 15), ThresholdPair::new(10.0, 155.0)),
    RegionTemplate::new(RegionKind::RightEye, (45, -7), (50, 15), ThresholdPair::new(10.0, 160.0)),
    RegionTemplate::new(RegionKind::Forehead, (0, -90), (120, 55), ThresholdPair::new(8.0, 170.0)),
    RegionTemplate::new(RegionKind::LeftCheek, (-60, 25), (35, 15), ThresholdPair::new(6.0, 180.0)),
    RegionTemplate::new(RegionKind::RightCheek, (70, 25), (35, 15), ThresholdPair::new(6.0, 190.0)),
];

/// A region placed on a concrete crop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceRegion {
    pub kind: RegionKind,
    pub center: (i32, i32),
    pub half_extent: (i32, i32),
    pub thresholds: ThresholdPair,
}

/// Places region templates on a crop of a given size.
#[derive(Debug, Clone)]
pub struct RegionLocator {
    templates: Vec<RegionTemplate>,
}

impl Default for RegionLocator {
    fn default() -> Self {
        Self::new(DEFAULT_REGION_TEMPLATES.to_vec())
    }
}

impl RegionLocator {
    pub fn new(templates: Vec<RegionTemplate>) -> Self {
        Self { templates }
    }

    /// Regions for a `width` × `height` crop, in template order.
    pub fn locate(&self, width: u32, height: u32) -> Vec<FaceRegion> {
        let cx = (width / 2) as i32;
        let cy = (height / 2) as i32;
        self.templates
            .iter()
            .map(|t| FaceRegion {
                kind: t.kind,
                center: (cx + t.offset.0, cy + t.offset.1),
                half_extent: t.half_extent,
                thresholds: t.thresholds,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_layout_on_canonical_crop() {
        let regions = RegionLocator::default().locate(250, 250);
        let centers: Vec<(i32, i32)> = regions.iter().map(|r| r.center).collect();
        assert_eq!(
            centers,
            vec![(75, 118), (170, 118), (125, 35), (65, 150), (195, 150)]
        );
        assert_eq!(regions[2].half_extent, (120, 55));
        assert_eq!(regions[4].thresholds, ThresholdPair::new(6.0, 190.0));
    }

    #[test]
    fn test_each_region_keeps_its_own_thresholds() {
        let regions = RegionLocator::default().locate(250, 250);
        let kinds: Vec<RegionKind> = regions.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RegionKind::LeftEye,
                RegionKind::RightEye,
                RegionKind::Forehead,
                RegionKind::LeftCheek,
                RegionKind::RightCheek,
            ]
        );
        let highs: Vec<f32> = regions.iter().map(|r| r.thresholds.high).collect();
        assert_eq!(highs, vec![155.0, 160.0, 170.0, 180.0, 190.0]);
    }

    #[rstest]
    #[case(200, 200)]
    #[case(250, 250)]
    #[case(251, 640)]
    #[case(1024, 333)]
    fn test_locate_is_deterministic_with_five_regions(#[case] w: u32, #[case] h: u32) {
        let locator = RegionLocator::default();
        let first = locator.locate(w, h);
        let second = locator.locate(w, h);
        assert_eq!(first.len(), 5);
        assert_eq!(first, second);
    }

    #[test]
    fn test_odd_dimensions_use_integer_center() {
        let regions = RegionLocator::default().locate(251, 251);
        assert_eq!(regions[2].center, (125, 35));
    }

    #[test]
    fn test_default_templates_validate() {
        for t in DEFAULT_REGION_TEMPLATES.iter() {
            assert!(t.validate().is_ok());
        }
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let t = RegionTemplate::new(
            RegionKind::Forehead,
            (0, 0),
            (10, 10),
            ThresholdPair::new(50.0, 20.0),
        );
        assert!(matches!(
            t.validate(),
            Err(ConfigError::InvertedThresholds { .. })
        ));
    }

    #[test]
    fn test_negative_half_extent_rejected() {
        let t = RegionTemplate::new(
            RegionKind::LeftEye,
            (0, 0),
            (-1, 10),
            ThresholdPair::new(1.0, 2.0),
        );
        assert!(matches!(
            t.validate(),
            Err(ConfigError::NegativeHalfExtent { .. })
        ));
    }
}
