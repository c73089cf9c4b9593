use base64::{engine::general_purpose::STANDARD, Engine as _};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A catalog entry as stored in the `Fashion` collection.
///
/// Text fields and the image are always written, as `null` when absent, so
/// every document has the same shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FashionItem {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub style: Option<String>,
    pub fashion_subject: Option<String>,
    pub fashion_detail: Option<String>,
    /// Standard base64 of the uploaded bytes.
    pub fashion_image: Option<String>,
}

impl FashionItem {
    pub fn new(
        style: Option<String>,
        fashion_subject: Option<String>,
        fashion_detail: Option<String>,
        image: Option<&[u8]>,
    ) -> Self {
        Self {
            id: None,
            style,
            fashion_subject,
            fashion_detail,
            fashion_image: image.map(|bytes| STANDARD.encode(bytes)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, Bson};

    #[test]
    fn missing_image_is_null_not_empty() {
        let item = FashionItem::new(Some("casual".into()), None, None, None);
        assert_eq!(item.fashion_image, None);

        let doc = bson::to_document(&item).unwrap();
        assert_eq!(doc.get("fashion_image"), Some(&Bson::Null));
        assert_eq!(doc.get("fashion_subject"), Some(&Bson::Null));
        assert!(!doc.contains_key("_id"));
    }

    #[test]
    fn empty_upload_is_distinct_from_no_upload() {
        let item = FashionItem::new(None, None, None, Some(&[]));
        assert_eq!(item.fashion_image.as_deref(), Some(""));
    }

    #[test]
    fn image_is_standard_padded_base64() {
        let bytes = [0xffu8, 0xd8, 0xff, 0xe0, 0x00];
        let item = FashionItem::new(None, None, None, Some(&bytes));

        let encoded = item.fashion_image.unwrap();
        assert_eq!(encoded, "/9j/4AA=");
        assert_eq!(STANDARD.decode(encoded).unwrap(), bytes);
    }

    #[test]
    fn documents_missing_keys_still_deserialize() {
        let oid = ObjectId::new();
        let doc = bson::doc! { "_id": oid, "style": "street" };

        let item: FashionItem = bson::from_document(doc).unwrap();
        assert_eq!(item.id, Some(oid));
        assert_eq!(item.style.as_deref(), Some("street"));
        assert_eq!(item.fashion_image, None);
    }
}
