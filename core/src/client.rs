//! Resource client for the `/objects` collection.
//!
//! # Design
//! Each operation is a one-to-one mapping onto a verb and a fixed path
//! template, returning the server's JSON body untouched. No schema checks,
//! no retries, no pagination: `list_objects` returns whatever a single
//! request yields.

use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::transport::{ApiClient, Transport, UreqTransport};

const COLLECTION: &str = "objects";

/// CRUD client for the objects endpoint.
#[derive(Debug, Clone)]
pub struct ObjectsApi<T = UreqTransport> {
    client: ApiClient<T>,
}

impl<T: Transport> ObjectsApi<T> {
    pub fn new(client: ApiClient<T>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    /// `GET objects`
    pub fn list_objects(&self) -> Result<Value, ApiError> {
        self.client.get(COLLECTION)?.json()
    }

    /// `GET objects/{id}`
    pub fn get_object(&self, id: &str) -> Result<Value, ApiError> {
        self.client.get(&item_path(id))?.json()
    }

    /// `POST objects` with the full record. The response carries the
    /// server-assigned `id`.
    pub fn create_object(&self, data: &Value) -> Result<Value, ApiError> {
        self.client.post(COLLECTION, Some(data))?.json()
    }

    /// `PUT objects/{id}`: full replacement.
    pub fn update_object(&self, id: &str, data: &Value) -> Result<Value, ApiError> {
        self.client.put(&item_path(id), Some(data))?.json()
    }

    /// `PATCH objects/{id}`: only the fields present in `data` change.
    pub fn patch_object(&self, id: &str, data: &Value) -> Result<Value, ApiError> {
        self.client.patch(&item_path(id), Some(data))?.json()
    }

    /// `DELETE objects/{id}`.
    ///
    /// Returns `true` only for HTTP 200. Other non-error statuses, 204
    /// included, yield `false`; statuses of 400 and above are errors.
    pub fn delete_object(&self, id: &str) -> Result<bool, ApiError> {
        let response = self.client.delete(&item_path(id))?;
        Ok(response.status == 200)
    }

    /// `OPTIONS objects`: the response headers (lower-cased names), merged
    /// with the top-level keys of a JSON object body if there is one.
    pub fn options(&self) -> Result<Map<String, Value>, ApiError> {
        let response = self.client.options(COLLECTION)?;
        let mut options = response.headers_map();
        if let Value::Object(body) = response.json()? {
            options.extend(body);
        }
        Ok(options)
    }
}

fn item_path(id: &str) -> String {
    format!("{COLLECTION}/{id}")
}
