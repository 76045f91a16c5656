//! Page-object facade over [`ObjectsApi`] that speaks [`ObjectModel`]
//! instead of raw JSON.

use serde_json::{Map, Value};

use crate::client::ObjectsApi;
use crate::error::ApiError;
use crate::transport::{Transport, UreqTransport};
use crate::types::{ObjectModel, ObjectPatch};

#[derive(Debug, Clone)]
pub struct ObjectsPage<T = UreqTransport> {
    api: ObjectsApi<T>,
}

impl<T: Transport> ObjectsPage<T> {
    pub fn new(api: ObjectsApi<T>) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ObjectsApi<T> {
        &self.api
    }

    pub fn list_objects(&self) -> Result<Vec<ObjectModel>, ApiError> {
        let raw = self.api.list_objects()?;
        serde_json::from_value(raw).map_err(ApiError::Decoding)
    }

    pub fn get_object(&self, id: &str) -> Result<ObjectModel, ApiError> {
        to_model(self.api.get_object(id)?)
    }

    pub fn create_object(&self, object: &ObjectModel) -> Result<ObjectModel, ApiError> {
        to_model(self.api.create_object(&object.to_dict())?)
    }

    pub fn update_object(&self, id: &str, object: &ObjectModel) -> Result<ObjectModel, ApiError> {
        to_model(self.api.update_object(id, &object.to_dict())?)
    }

    pub fn patch_object(&self, id: &str, patch: &ObjectPatch) -> Result<ObjectModel, ApiError> {
        let body = serde_json::to_value(patch).map_err(ApiError::Serialization)?;
        to_model(self.api.patch_object(id, &body)?)
    }

    pub fn delete_object(&self, id: &str) -> Result<bool, ApiError> {
        self.api.delete_object(id)
    }

    /// Raw options map; an options response has no resource shape.
    pub fn get_options(&self) -> Result<Map<String, Value>, ApiError> {
        self.api.options()
    }
}

fn to_model(raw: Value) -> Result<ObjectModel, ApiError> {
    ObjectModel::from_dict(raw).map_err(ApiError::Decoding)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::Config;
    use crate::http::{HttpMethod, HttpResponse};
    use crate::testutil::{ok, status, RecordingTransport};
    use crate::transport::ApiClient;

    fn page(transport: &RecordingTransport) -> ObjectsPage<&RecordingTransport> {
        let config = Config::default().with_base_url("http://localhost:3000");
        ObjectsPage::new(ObjectsApi::new(ApiClient::new(&config, transport)))
    }

    #[test]
    fn list_converts_every_record() {
        let transport = RecordingTransport::new();
        transport.push(ok(
            r#"[{"id":"1","name":"a","data":{"n":1}},{"id":"2","name":"b","data":null,"extra":true}]"#,
        ));

        let objects = page(&transport).list_objects().unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].data.as_ref().unwrap()["n"], 1);
        assert_eq!(objects[1].id, "2");
        assert!(objects[1].data.is_none());
    }

    #[test]
    fn list_rejects_a_non_array_body() {
        let transport = RecordingTransport::new();
        transport.push(ok(r#"{"id":"1"}"#));

        let err = page(&transport).list_objects().unwrap_err();
        assert!(matches!(err, ApiError::Decoding(_)));
    }

    #[test]
    fn create_sends_model_without_id_and_returns_server_id() {
        let transport = RecordingTransport::new();
        transport.push(ok(
            r#"{"id":"srv-1","name":"Apple MacBook Pro 16","data":{"year":2019,"price":1849.99},"createdAt":"2024-01-01T00:00:00Z"}"#,
        ));
        let data = json!({"year": 2019, "price": 1849.99});
        let object = ObjectModel::new("Apple MacBook Pro 16", data.as_object().cloned());

        let created = page(&transport).create_object(&object).unwrap();

        let body: Value =
            serde_json::from_str(transport.last_request().body.as_deref().unwrap()).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(created.id, "srv-1");
        assert_eq!(created.name, object.name);
        assert_eq!(created.data, object.data);
    }

    #[test]
    fn update_sends_full_record() {
        let transport = RecordingTransport::new();
        transport.push(ok(r#"{"id":"7","name":"Updated Test Object"}"#));
        let object = ObjectModel::new("Updated Test Object", None);

        let updated = page(&transport).update_object("7", &object).unwrap();

        let req = transport.last_request();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.body.as_deref(), Some(r#"{"name":"Updated Test Object"}"#));
        assert_eq!(updated.id, "7");
        assert!(updated.data.is_none());
    }

    #[test]
    fn patch_sends_only_present_fields() {
        let transport = RecordingTransport::new();
        transport.push(ok(r#"{"id":"7","name":"Renamed","data":{"k":"v"}}"#));

        let patched = page(&transport)
            .patch_object("7", &ObjectPatch::default().name("Renamed"))
            .unwrap();

        let req = transport.last_request();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.body.as_deref(), Some(r#"{"name":"Renamed"}"#));
        assert_eq!(patched.data.unwrap()["k"], "v");
    }

    #[test]
    fn delete_forwards_the_boolean() {
        let transport = RecordingTransport::new();
        transport.push(ok("{}"));
        transport.push(status(204, ""));
        let page = page(&transport);

        assert!(page.delete_object("7").unwrap());
        assert!(!page.delete_object("7").unwrap());
    }

    #[test]
    fn get_options_is_not_converted() {
        let transport = RecordingTransport::new();
        transport.push(Ok(HttpResponse {
            status: 200,
            headers: vec![("Allow".to_string(), "GET, POST".to_string())],
            body: String::new(),
        }));

        let options = page(&transport).get_options().unwrap();
        assert_eq!(options.get("allow"), Some(&json!("GET, POST")));
    }

    #[test]
    fn get_propagates_not_found() {
        let transport = RecordingTransport::new();
        transport.push(status(404, ""));

        let err = page(&transport).get_object("gone").unwrap_err();
        assert!(err.is_not_found());
    }
}
