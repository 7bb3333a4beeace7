//! Result extraction from completed job payloads.
//!
//! Providers (and different versions of the same provider) nest the
//! result URL under different fields. Each known location is a
//! [`ResultPath`]; the extractor tries them in order and the first one
//! holding a non-empty string wins.

use serde_json::Value;

/// A known location of the result locator in a completed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultPath {
    /// `images[0].url`
    FirstImage,
    /// `data.images[0].url`
    DataFirstImage,
    /// `image.url`
    SingleImage,
    /// `output.images[0].url`
    OutputFirstImage,
    /// `image_url`
    ImageUrl,
    /// `imageUrl`
    ImageUrlCamel,
    /// `url`
    Url,
}

impl ResultPath {
    /// JSON pointer (RFC 6901) for this location.
    pub fn pointer(self) -> &'static str {
        match self {
            Self::FirstImage => "/images/0/url",
            Self::DataFirstImage => "/data/images/0/url",
            Self::SingleImage => "/image/url",
            Self::OutputFirstImage => "/output/images/0/url",
            Self::ImageUrl => "/image_url",
            Self::ImageUrlCamel => "/imageUrl",
            Self::Url => "/url",
        }
    }

    fn lookup(self, payload: &Value) -> Option<&str> {
        payload
            .pointer(self.pointer())
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Default search order, most specific first.
pub const DEFAULT_RESULT_PATHS: &[ResultPath] = &[
    ResultPath::FirstImage,
    ResultPath::DataFirstImage,
    ResultPath::SingleImage,
    ResultPath::OutputFirstImage,
    ResultPath::ImageUrl,
    ResultPath::ImageUrlCamel,
    ResultPath::Url,
];

/// The completed payload had no locator at any known path.
#[derive(Debug, thiserror::Error)]
#[error("completed payload has no result locator (tried {tried})")]
pub struct ExtractError {
    /// Comma-separated pointers that were tried.
    pub tried: String,
}

/// A located result and the path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub locator: String,
    pub path: ResultPath,
}

#[derive(Debug, Clone)]
pub struct ResultExtractor {
    paths: Vec<ResultPath>,
}

impl ResultExtractor {
    pub fn new(paths: Vec<ResultPath>) -> Self {
        Self { paths }
    }

    pub fn extract(&self, payload: &Value) -> Result<Extracted, ExtractError> {
        self.paths
            .iter()
            .find_map(|&path| {
                path.lookup(payload).map(|locator| Extracted {
                    locator: locator.to_string(),
                    path,
                })
            })
            .ok_or_else(|| ExtractError {
                tried: self
                    .paths
                    .iter()
                    .map(|p| p.pointer())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl Default for ResultExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_RESULT_PATHS.to_vec())
    }
}
