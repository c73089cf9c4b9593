pub mod database;
pub mod metrics;
pub mod upload;

pub use database::{parse_fashion_id, FashionStore, MongoFashionStore, StoreError};
pub use metrics::{get_metrics, init_metrics};
pub use upload::{Attachment, DecodeError, DecodedUpload, UploadDecoder, ATTACHMENT_FIELD};
