//! Camera trait - capability surface exposed to the host

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    ContractError, EncodedImage, MediaStream, NamedImage, PointCloud, ResponseMetadata,
};

/// Free-form command payload passed through `do_command`
pub type CommandMap = Map<String, Value>;

/// Static camera capabilities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Properties {
    /// Camera can return point clouds
    pub supports_pcd: bool,
}

/// Pinhole projector intrinsics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projector {
    pub width_px: u32,
    pub height_px: u32,
    pub fx: f64,
    pub fy: f64,
    pub ppx: f64,
    pub ppy: f64,
}

/// Camera capability surface
///
/// All camera models implement this trait. The host drives every call; an
/// implementation does no background work.
#[trait_variant::make(Camera: Send)]
pub trait LocalCamera {
    /// Stream handle returned by [`stream`](LocalCamera::stream)
    type Stream: MediaStream;

    /// Capture a single image
    async fn image(&self) -> Result<(EncodedImage, ResponseMetadata), ContractError>;

    /// Capture a batch of named images
    async fn images(&self) -> Result<(Vec<NamedImage>, ResponseMetadata), ContractError>;

    /// Fetch the next point cloud
    async fn next_point_cloud(&self) -> Result<PointCloud, ContractError>;

    /// Fetch the projector model
    async fn projector(&self) -> Result<Projector, ContractError>;

    /// Static capabilities
    fn properties(&self) -> Properties;

    /// Open an image stream
    async fn stream(&self) -> Result<Self::Stream, ContractError>;

    /// Generic command passthrough
    async fn do_command(&self, command: CommandMap) -> Result<CommandMap, ContractError>;
}
