#![allow(dead_code)]

use async_trait::async_trait;
use fashion_service::config::FashionConfig;
use fashion_service::models::FashionItem;
use fashion_service::services::{parse_fashion_id, FashionStore, StoreError};
use fashion_service::startup::Application;
use mongodb::bson::oid::ObjectId;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_ORIGIN: &str = "http://localhost:4200";

/// In-process stand-in for MongoDB that counts inserts and can be told to fail.
#[derive(Default)]
pub struct InMemoryStore {
    items: Mutex<Vec<FashionItem>>,
    insert_calls: AtomicUsize,
    failing: AtomicBool,
}

impl InMemoryStore {
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::OperationFailed(mongodb::error::Error::from(
                std::io::Error::new(std::io::ErrorKind::ConnectionReset, "simulated store outage"),
            )))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl FashionStore for InMemoryStore {
    async fn insert(&self, item: &FashionItem) -> Result<ObjectId, StoreError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let id = ObjectId::new();
        let mut stored = item.clone();
        stored.id = Some(id);
        self.items.lock().unwrap().push(stored);
        Ok(id)
    }

    async fn find_all(&self) -> Result<Vec<FashionItem>, StoreError> {
        self.check()?;
        Ok(self.items.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<FashionItem>, StoreError> {
        let oid = parse_fashion_id(id)?;
        self.check()?;
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .find(|item| item.id == Some(oid))
            .cloned())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.check()
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<InMemoryStore>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    pub async fn spawn_with(customize: impl FnOnce(&mut FashionConfig)) -> Self {
        let mut config = FashionConfig::load().expect("Failed to load configuration");
        config.common.port = 0; // Random port for testing
        config.cors.allowed_origin = TEST_ORIGIN.to_string();
        customize(&mut config);

        let store = Arc::new(InMemoryStore::default());
        let app = Application::build_with_store(config, store.clone())
            .await
            .expect("Failed to build test application");

        let port = app.port();
        tokio::spawn(app.run_until_stopped());

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            port,
            store,
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn create(&self, form: reqwest::multipart::Form) -> reqwest::Response {
        self.client
            .post(self.url("/fashions"))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

pub fn text_form(style: &str, subject: &str, detail: &str) -> reqwest::multipart::Form {
    reqwest::multipart::Form::new()
        .text("style", style.to_string())
        .text("fashion_subject", subject.to_string())
        .text("fashion_detail", detail.to_string())
}

pub fn image_part(bytes: Vec<u8>) -> reqwest::multipart::Part {
    reqwest::multipart::Part::bytes(bytes)
        .file_name("look.png")
        .mime_str("image/png")
        .unwrap()
}
