//! REST client for the hosted platform.
//!
//! One client covers all four boundaries: document collections, identity,
//! and blob storage. Documents live under
//! `/v1/projects/{project}/collections/{collection}/documents`; listing
//! always orders by creation time, newest first, which is the order every
//! store displays.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::sync::watch;
use tracing::instrument;

use async_trait::async_trait;

use sable_core::{Category, Email, MessageId, OrderId, OrderStatus, Price, ProductId, UserId};

use crate::config::BackendConfig;
use crate::models::{
    ContactMessage, NewMessage, NewProduct, Order, OrderDraft, OrderItem, Product, UserProfile,
    user::split_display_name,
};

use super::{
    AuthApi, AuthenticatedUser, BackendError, CatalogApi, MessagesApi, NewAccount, OrdersApi,
    SessionHandle, StorageApi, UsersApi,
};

/// Header carrying the platform API key.
const API_KEY_HEADER: &str = "X-Sable-Api-Key";

const PRODUCTS: &str = "products";
const ORDERS: &str = "orders";
const USERS: &str = "users";
const MESSAGES: &str = "contact_messages";

/// Client for the hosted platform API.
///
/// Cheaply cloneable; clones share the HTTP connection pool and the
/// session channel.
#[derive(Clone)]
pub struct RestBackend {
    inner: Arc<RestBackendInner>,
}

struct RestBackendInner {
    client: reqwest::Client,
    base: String,
    project_id: String,
    session: watch::Sender<Option<SessionHandle>>,
}

impl RestBackend {
    /// Create a new platform client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(config.api_key.expose_secret())
                .map_err(|e| BackendError::Parse(format!("invalid API key format: {e}")))?,
        );
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        let (session, _) = watch::channel(None);

        Ok(Self {
            inner: Arc::new(RestBackendInner {
                client,
                base: config.base_url.as_str().trim_end_matches('/').to_owned(),
                project_id: config.project_id.clone(),
                session,
            }),
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/v1/projects/{}/collections/{collection}/documents",
            self.inner.base, self.inner.project_id
        )
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/{}",
            self.collection_url(collection),
            urlencoding::encode(id)
        )
    }

    fn auth_url(&self, path: &str) -> String {
        format!(
            "{}/v1/projects/{}/auth/{path}",
            self.inner.base, self.inner.project_id
        )
    }

    fn storage_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/storage/objects",
            self.inner.base, self.inner.project_id
        )
    }

    fn publish_session(&self, session: Option<SessionHandle>) {
        // send_replace never fails; a receiver-less channel just drops it.
        let _ = self.inner.session.send_replace(session);
    }

    /// Parse a response body, mapping non-success statuses to `Api` errors.
    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }

    /// Check a response for success, discarding the body.
    async fn expect_success(response: reqwest::Response) -> Result<(), BackendError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    async fn fetch_documents<T: DeserializeOwned>(
        &self,
        collection: &str,
    ) -> Result<Vec<Document<T>>, BackendError> {
        let url = format!(
            "{}?orderBy=createdAt&direction=desc",
            self.collection_url(collection)
        );
        let response = self.inner.client.get(&url).send().await?;
        let list: DocumentList<T> = Self::parse(response).await?;
        Ok(list.documents)
    }

    async fn fetch_document<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document<T>>, BackendError> {
        let url = self.document_url(collection, id);
        let response = self.inner.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Ok(Some(Self::parse(response).await?))
    }

    async fn insert_document<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        collection: &str,
        body: &B,
    ) -> Result<Document<T>, BackendError> {
        let url = self.collection_url(collection);
        let response = self.inner.client.post(&url).json(body).send().await?;
        Self::parse(response).await
    }

    async fn patch_document<B: Serialize + Sync>(
        &self,
        collection: &str,
        id: &str,
        body: &B,
    ) -> Result<(), BackendError> {
        let url = self.document_url(collection, id);
        let response = self.inner.client.patch(&url).json(body).send().await?;
        Self::expect_success(response).await
    }

    async fn put_document<B: Serialize + Sync>(
        &self,
        collection: &str,
        id: &str,
        body: &B,
    ) -> Result<(), BackendError> {
        let url = self.document_url(collection, id);
        let response = self.inner.client.put(&url).json(body).send().await?;
        Self::expect_success(response).await
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), BackendError> {
        let url = self.document_url(collection, id);
        let response = self.inner.client.delete(&url).send().await?;
        Self::expect_success(response).await
    }

    /// Resolve the profile for a fresh session, creating the document when
    /// the account predates profile storage.
    async fn profile_or_backfill(
        &self,
        session: &SessionResponse,
    ) -> Result<UserProfile, BackendError> {
        let user_id = UserId::new(session.user_id.clone());
        if let Some(doc) = self.fetch_document::<UserProfile>(USERS, user_id.as_str()).await? {
            return Ok(doc.fields);
        }

        // Existing auth account without a profile document: create one now.
        let email = Email::parse(&session.email)
            .map_err(|e| BackendError::Parse(format!("invalid email in session: {e}")))?;
        let (first_name, last_name) = split_display_name(session.display_name.as_deref());
        let profile = UserProfile::for_new_account(email, first_name, last_name, None, Utc::now());
        self.put_document(USERS, user_id.as_str(), &profile).await?;

        tracing::debug!(user = %user_id, "backfilled missing profile document");
        Ok(profile)
    }
}

#[async_trait]
impl AuthApi for RestBackend {
    #[instrument(skip(self, account), fields(email = %account.email))]
    async fn sign_up(&self, account: NewAccount) -> Result<AuthenticatedUser, BackendError> {
        let response = self
            .inner
            .client
            .post(self.auth_url("accounts"))
            .json(&CredentialsBody {
                email: account.email.as_str(),
                password: &account.password,
            })
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            return Err(BackendError::AlreadyExists);
        }

        let session: SessionResponse = Self::parse(response).await?;
        let user_id = UserId::new(session.user_id.clone());

        let profile = UserProfile::for_new_account(
            account.email.clone(),
            account.first_name,
            account.last_name,
            account.phone_number,
            Utc::now(),
        );
        self.put_document(USERS, user_id.as_str(), &profile).await?;

        self.publish_session(Some(SessionHandle {
            user_id: user_id.clone(),
            email: account.email,
        }));

        Ok(AuthenticatedUser {
            id: user_id,
            profile,
        })
    }

    #[instrument(skip(self, password))]
    async fn sign_in(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<AuthenticatedUser, BackendError> {
        let response = self
            .inner
            .client
            .post(self.auth_url("sessions"))
            .json(&CredentialsBody {
                email: email.as_str(),
                password,
            })
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(BackendError::InvalidCredentials);
        }

        let session: SessionResponse = Self::parse(response).await?;
        let profile = self.profile_or_backfill(&session).await?;
        let user_id = UserId::new(session.user_id);

        self.publish_session(Some(SessionHandle {
            user_id: user_id.clone(),
            email: profile.email.clone(),
        }));

        Ok(AuthenticatedUser {
            id: user_id,
            profile,
        })
    }

    #[instrument(skip(self))]
    async fn sign_in_with_provider(&self) -> Result<AuthenticatedUser, BackendError> {
        let response = self
            .inner
            .client
            .post(self.auth_url("sessions/provider"))
            .send()
            .await?;

        let session: SessionResponse = Self::parse(response).await?;
        let profile = self.profile_or_backfill(&session).await?;
        let user_id = UserId::new(session.user_id);

        self.publish_session(Some(SessionHandle {
            user_id: user_id.clone(),
            email: profile.email.clone(),
        }));

        Ok(AuthenticatedUser {
            id: user_id,
            profile,
        })
    }

    #[instrument(skip(self))]
    async fn sign_out(&self) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .delete(self.auth_url("sessions"))
            .send()
            .await?;
        Self::expect_success(response).await?;

        self.publish_session(None);
        Ok(())
    }

    fn session_changes(&self) -> watch::Receiver<Option<SessionHandle>> {
        self.inner.session.subscribe()
    }
}

#[async_trait]
impl CatalogApi for RestBackend {
    async fn list_products(&self) -> Result<Vec<Product>, BackendError> {
        let docs = self.fetch_documents::<ProductFields>(PRODUCTS).await?;
        Ok(docs.into_iter().map(product_from_doc).collect())
    }

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, BackendError> {
        let doc = self
            .fetch_document::<ProductFields>(PRODUCTS, id.as_str())
            .await?;
        Ok(doc.map(product_from_doc))
    }

    #[instrument(skip(self, draft), fields(title = %draft.title))]
    async fn insert_product(&self, draft: NewProduct) -> Result<Product, BackendError> {
        let doc = self
            .insert_document::<_, ProductFields>(PRODUCTS, &draft)
            .await?;
        Ok(product_from_doc(doc))
    }

    async fn update_product(&self, id: &ProductId, draft: NewProduct) -> Result<(), BackendError> {
        self.patch_document(PRODUCTS, id.as_str(), &draft).await
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), BackendError> {
        self.delete_document(PRODUCTS, id.as_str()).await
    }
}

#[async_trait]
impl OrdersApi for RestBackend {
    async fn list_orders(&self) -> Result<Vec<Order>, BackendError> {
        let docs = self.fetch_documents::<OrderFields>(ORDERS).await?;
        Ok(docs.into_iter().map(order_from_doc).collect())
    }

    #[instrument(skip(self, draft), fields(lines = draft.items.len()))]
    async fn insert_order(&self, draft: OrderDraft) -> Result<Order, BackendError> {
        let doc = self.insert_document::<_, OrderFields>(ORDERS, &draft).await?;
        Ok(order_from_doc(doc))
    }

    async fn set_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), BackendError> {
        self.patch_document(ORDERS, id.as_str(), &StatusPatch { status })
            .await
    }

    async fn cancel_order(&self, id: &OrderId) -> Result<(), BackendError> {
        self.set_order_status(id, OrderStatus::Cancelled).await
    }
}

#[async_trait]
impl UsersApi for RestBackend {
    async fn get_profile(&self, id: &UserId) -> Result<Option<UserProfile>, BackendError> {
        let doc = self.fetch_document::<UserProfile>(USERS, id.as_str()).await?;
        Ok(doc.map(|d| d.fields))
    }

    async fn put_profile(&self, id: &UserId, profile: &UserProfile) -> Result<(), BackendError> {
        self.put_document(USERS, id.as_str(), profile).await
    }
}

#[async_trait]
impl MessagesApi for RestBackend {
    async fn list_messages(&self) -> Result<Vec<ContactMessage>, BackendError> {
        let docs = self.fetch_documents::<MessageFields>(MESSAGES).await?;
        Ok(docs.into_iter().map(message_from_doc).collect())
    }

    #[instrument(skip(self, draft), fields(subject = %draft.subject))]
    async fn insert_message(&self, draft: NewMessage) -> Result<ContactMessage, BackendError> {
        let doc = self
            .insert_document::<_, MessageFields>(MESSAGES, &draft)
            .await?;
        Ok(message_from_doc(doc))
    }

    async fn delete_message(&self, id: &MessageId) -> Result<(), BackendError> {
        self.delete_document(MESSAGES, id.as_str()).await
    }
}

#[async_trait]
impl StorageApi for RestBackend {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String, BackendError> {
        let url = format!("{}?path={}", self.storage_url(), urlencoding::encode(path));
        let response = self.inner.client.post(&url).body(bytes).send().await?;
        let uploaded: UploadResponse = Self::parse(response).await?;
        Ok(uploaded.url)
    }

    async fn delete(&self, url: &str) -> Result<(), BackendError> {
        let endpoint = format!("{}?url={}", self.storage_url(), urlencoding::encode(url));
        let response = self.inner.client.delete(&endpoint).send().await?;
        Self::expect_success(response).await
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    user_id: String,
    email: String,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Serialize)]
struct StatusPatch {
    status: OrderStatus,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// Wrapper for a document list response.
#[derive(Debug, Deserialize)]
struct DocumentList<T> {
    documents: Vec<Document<T>>,
}

/// A stored document: the backend-assigned id plus the collection fields.
#[derive(Debug, Deserialize)]
struct Document<T> {
    id: String,
    #[serde(flatten)]
    fields: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductFields {
    title: String,
    category: Category,
    price: Price,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    images: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderFields {
    #[serde(default)]
    user_id: Option<UserId>,
    #[serde(default)]
    is_guest: bool,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    #[serde(default)]
    customer_address: Option<String>,
    items: Vec<OrderItem>,
    total_amount: Price,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageFields {
    name: String,
    email: String,
    #[serde(default)]
    phone: Option<String>,
    subject: String,
    message: String,
    #[serde(default)]
    is_read: bool,
    created_at: DateTime<Utc>,
}

fn product_from_doc(doc: Document<ProductFields>) -> Product {
    Product {
        id: ProductId::new(doc.id),
        title: doc.fields.title,
        category: doc.fields.category,
        price: doc.fields.price,
        description: doc.fields.description,
        images: doc.fields.images,
        created_at: doc.fields.created_at,
        updated_at: doc.fields.updated_at,
    }
}

fn order_from_doc(doc: Document<OrderFields>) -> Order {
    Order {
        id: OrderId::new(doc.id),
        user_id: doc.fields.user_id,
        is_guest: doc.fields.is_guest,
        customer_name: doc.fields.customer_name,
        customer_email: doc.fields.customer_email,
        customer_phone: doc.fields.customer_phone,
        customer_address: doc.fields.customer_address,
        items: doc.fields.items,
        total_amount: doc.fields.total_amount,
        status: doc.fields.status,
        created_at: doc.fields.created_at,
        updated_at: doc.fields.updated_at,
    }
}

fn message_from_doc(doc: Document<MessageFields>) -> ContactMessage {
    ContactMessage {
        id: MessageId::new(doc.id),
        name: doc.fields.name,
        email: doc.fields.email,
        phone: doc.fields.phone,
        subject: doc.fields.subject,
        message: doc.fields.message,
        is_read: doc.fields.is_read,
        created_at: doc.fields.created_at,
    }
}
