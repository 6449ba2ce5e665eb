//! MediaStream trait - lazily produced image stream
//!
//! A stream handle renders on demand; it holds no frame buffer of its own.

use crate::{ContractError, EncodedImage};

/// Image stream
///
/// Returned by [`Camera::stream`](crate::Camera::stream). Each `next` call
/// produces one fresh frame.
///
/// # Example
///
/// ```ignore
/// let mut stream = camera.stream().await?;
/// let frame = stream.next().await?;
/// println!("{} bytes", frame.data.len());
/// stream.close().await?;
/// ```
#[trait_variant::make(MediaStream: Send)]
pub trait LocalMediaStream {
    /// Produce the next frame
    async fn next(&mut self) -> Result<EncodedImage, ContractError>;

    /// Release the stream
    ///
    /// Calling `next` after `close` is not supported.
    async fn close(&mut self) -> Result<(), ContractError>;
}
