pub mod conversion_api;
pub mod converter;

pub use conversion_api::{
    convert_one, decode_image, encode_webp, ConvertOptions, DEFAULT_QUALITY, MAX_METHOD,
    WEBP_EXTENSION,
};
pub use converter::{Converter, ReportMode, RunOutcome, DEFAULT_ROOT};

pub use shared_utils::img_errors::{ConvertError, ScanError};
