use serde::{Deserialize, Serialize};

/// A bitmap pasted or uploaded into the scene.
///
/// `bytes` holds the encoded image as received; `width`/`height` are its
/// natural pixel dimensions. Display size comes from the element's scale.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

// Custom Debug implementation so snapshots don't dump every byte
impl std::fmt::Debug for ImageData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageData")
            .field("data_len", &self.bytes.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl ImageData {
    pub fn new(bytes: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            bytes,
            width,
            height,
        }
    }

    /// Read the natural dimensions from encoded bytes without a full decode.
    pub fn from_encoded(bytes: Vec<u8>) -> Result<Self, image::ImageError> {
        let (width, height) = image::ImageReader::new(std::io::Cursor::new(&bytes))
            .with_guessed_format()?
            .into_dimensions()?;
        Ok(Self::new(bytes, width, height))
    }
}
