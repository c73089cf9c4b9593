use crate::models::FashionItem;
use serde::{Deserialize, Serialize};

/// JSON shape returned to clients. `_id` is the hex form of the ObjectId and
/// is left out for records echoed back before the store assigned one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FashionResponse {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub style: Option<String>,
    pub fashion_subject: Option<String>,
    pub fashion_detail: Option<String>,
    pub fashion_image: Option<String>,
}

impl From<FashionItem> for FashionResponse {
    fn from(item: FashionItem) -> Self {
        Self {
            id: item.id.map(|oid| oid.to_hex()),
            style: item.style,
            fashion_subject: item.fashion_subject,
            fashion_detail: item.fashion_detail,
            fashion_image: item.fashion_image,
        }
    }
}
