use super::error::DecodeError;
use super::items::FeatureCollection;
use std::sync::OnceLock;

/// A row-format dataset compiled into the binary, usually through
/// `include_bytes!`, decoded on first use and cached for the life of
/// the process.
pub struct EmbeddedDataset {
    bytes: &'static [u8],
    cache: OnceLock<FeatureCollection>,
}

impl EmbeddedDataset {
    pub const fn new(bytes: &'static [u8]) -> Self {
        EmbeddedDataset {
            bytes,
            cache: OnceLock::new(),
        }
    }

    /// The raw rows, for callers that stream instead of load.
    pub fn bytes(&self) -> &'static [u8] {
        self.bytes
    }

    /// Decode the dataset once and hand out the cached collection on
    /// every later call. A dataset that fails to decode is never
    /// cached; the error is reported on each attempt.
    pub fn load(&self) -> Result<&FeatureCollection, DecodeError> {
        if let Some(collection) = self.cache.get() {
            return Ok(collection);
        }
        let collection = super::decode(self.bytes)?;
        Ok(self.cache.get_or_init(|| collection))
    }
}
