use crate::models::FashionItem;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Document},
    Client as MongoClient, Collection,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store unavailable: {0}")]
    Unavailable(#[source] mongodb::error::Error),

    #[error("invalid fashion id: {0:?}")]
    InvalidIdentifier(String),

    #[error("document store operation failed: {0}")]
    OperationFailed(#[from] mongodb::error::Error),

    #[error("store returned a non-ObjectId identifier")]
    MissingIdentifier,
}

/// Persistence contract for fashion items.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait FashionStore: Send + Sync {
    /// Persists `item` as a new document and returns the id the store assigned.
    async fn insert(&self, item: &FashionItem) -> Result<ObjectId, StoreError>;

    /// Every item, in the store's natural order. Empty when nothing is stored.
    async fn find_all(&self) -> Result<Vec<FashionItem>, StoreError>;

    /// Looks up an item by the external (hex) form of its id.
    async fn find_by_id(&self, id: &str) -> Result<Option<FashionItem>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Decodes one raw listing row. Rows that don't fit the `FashionItem` shape
/// are logged and dropped so a single stray document can't break the listing.
fn decode_row(raw: Document) -> Option<FashionItem> {
    let id = raw.get("_id").cloned();
    match bson::from_document::<FashionItem>(raw) {
        Ok(item) => Some(item),
        Err(e) => {
            tracing::warn!(id = ?id, error = %e, "Skipping undecodable fashion document");
            None
        }
    }
}

/// Parses the external string form of an id into an `ObjectId`.
pub fn parse_fashion_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidIdentifier(id.to_string()))
}

#[derive(Clone)]
pub struct MongoFashionStore {
    client: MongoClient,
    fashions: Collection<FashionItem>,
}

impl MongoFashionStore {
    /// Opens the client and pings the server once. There is no retry: a store
    /// that is unreachable here means the process can't serve.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, StoreError> {
        tracing::info!(database = %database, collection = %collection, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to create MongoDB client for {}: {}", uri, e);
            StoreError::Unavailable(e)
        })?;

        let store = Self {
            fashions: client.database(database).collection(collection),
            client,
        };

        store.ping().await.map_err(StoreError::Unavailable)?;
        tracing::info!(database = %database, "Successfully connected to MongoDB database");

        Ok(store)
    }

    async fn ping(&self) -> Result<(), mongodb::error::Error> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map(|_| ())
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}

#[async_trait]
impl FashionStore for MongoFashionStore {
    async fn insert(&self, item: &FashionItem) -> Result<ObjectId, StoreError> {
        let result = self.fashions.insert_one(item, None).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or(StoreError::MissingIdentifier)
    }

    async fn find_all(&self) -> Result<Vec<FashionItem>, StoreError> {
        let mut cursor = self
            .fashions
            .clone_with_type::<Document>()
            .find(doc! {}, None)
            .await?;

        let mut items = Vec::new();
        while let Some(raw) = cursor.try_next().await? {
            items.extend(decode_row(raw));
        }
        Ok(items)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<FashionItem>, StoreError> {
        let oid = parse_fashion_id(id)?;
        Ok(self.fashions.find_one(doc! { "_id": oid }, None).await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.ping().await.map_err(|e| {
            tracing::error!("MongoDB health check failed: {}", e);
            StoreError::OperationFailed(e)
        })
    }
}
