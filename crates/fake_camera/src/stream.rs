//! Clock frame stream

use std::sync::Arc;

use contracts::{ContractError, EncodedImage, MediaStream, ResourceName};
use tokio::sync::Mutex;
use tracing::debug;

use crate::camera::{timestamp, CameraState};

/// Stream of freshly rendered clock frames
///
/// Shares the camera lock, so a frame is never rendered concurrently with a
/// direct capture call on the same camera.
pub struct ClockStream {
    camera: ResourceName,
    state: Arc<Mutex<CameraState>>,
}

impl ClockStream {
    pub(crate) fn new(camera: ResourceName, state: Arc<Mutex<CameraState>>) -> Self {
        Self { camera, state }
    }
}

impl MediaStream for ClockStream {
    async fn next(&mut self) -> Result<EncodedImage, ContractError> {
        let mut state = self.state.lock().await;
        let (_, now) = timestamp();
        let frame = state.render(&format!("image time: {now}"))?;
        debug!(camera = %self.camera, bytes = frame.data.len(), "stream frame");
        Ok(frame)
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        debug!(camera = %self.camera, "stream closed");
        Ok(())
    }
}
