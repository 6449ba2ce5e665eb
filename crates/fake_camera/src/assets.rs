//! Point clouds bundled into the binary

use contracts::{ContractError, PointCloud};

use crate::pcd::read_pcd;

static SMALL_PCD: &[u8] = include_bytes!("../pcds/small.pcd");
static LARGE_PCD: &[u8] = include_bytes!("../pcds/large.pcd");

/// Point count of the small payload
pub const SMALL_POINT_COUNT: usize = 125;

/// Point count of the large payload
pub const LARGE_POINT_COUNT: usize = 8000;

/// Bundled point cloud payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointCloudAsset {
    /// 5x5x5 colored grid, ascii
    Small,
    /// 20x20x20 grid, binary
    Large,
}

impl PointCloudAsset {
    /// Payload selected by the `big` flag
    pub fn for_size(big: bool) -> Self {
        if big {
            Self::Large
        } else {
            Self::Small
        }
    }

    /// Raw PCD bytes
    pub fn bytes(self) -> &'static [u8] {
        match self {
            Self::Small => SMALL_PCD,
            Self::Large => LARGE_PCD,
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Small => "small.pcd",
            Self::Large => "large.pcd",
        }
    }

    /// Decode the payload
    pub fn decode(self) -> Result<PointCloud, ContractError> {
        read_pcd(self.bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_fixture() {
        let cloud = PointCloudAsset::Small.decode().unwrap();
        assert_eq!(cloud.len(), SMALL_POINT_COUNT);
        assert!(cloud.points.iter().all(|p| p.color.is_some()));
        // Last grid point is the brightest corner
        assert_eq!(cloud.points[SMALL_POINT_COUNT - 1].color, Some([240, 240, 240]));
    }

    #[test]
    fn test_large_fixture() {
        let cloud = PointCloudAsset::Large.decode().unwrap();
        assert_eq!(cloud.len(), LARGE_POINT_COUNT);
        assert!(cloud.points.iter().all(|p| p.color.is_none()));
    }

    #[test]
    fn test_selection_by_flag() {
        assert_eq!(PointCloudAsset::for_size(true), PointCloudAsset::Large);
        assert_eq!(PointCloudAsset::for_size(false), PointCloudAsset::Small);
        assert!(PointCloudAsset::Large.bytes().len() > PointCloudAsset::Small.bytes().len());
    }
}
