//! Types for the `imran.dev.io/v1alpha1` API group.
//!
//! [`Microservice`] is generated from [`MicroserviceSpec`] by the
//! [`CustomResource`] derive, which also implements
//! [`CustomResourceExt`](kube::CustomResourceExt) for producing the CRD
//! manifest and the dynamic api information of the kind.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ListMeta;
use kube::{core::TypeMeta, CustomResource};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::scheme::Scheme;

/// The API group of every kind in this crate.
pub const GROUP: &str = "imran.dev.io";

/// The served version of the [`GROUP`] API group.
pub const VERSION: &str = "v1alpha1";

/// Desired state of a [`Microservice`].
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[kube(
    group = "imran.dev.io",
    version = "v1alpha1",
    kind = "Microservice",
    namespaced,
    status = "MicroserviceStatus",
    derive = "Default",
    derive = "PartialEq"
)]
pub struct MicroserviceSpec {
    /// An example field with no semantics attached yet.
    ///
    /// Omitted from serialized output while empty; a missing key reads back
    /// as the empty string.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub foo: String,
}

/// Observed state of a [`Microservice`].
///
/// Nothing has been promoted into the status yet, so it serializes as an
/// empty object regardless of input.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct MicroserviceStatus {}

/// A collection of [`Microservice`] objects, as returned by list calls.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct MicroserviceList {
    /// The type fields, not always present
    #[serde(flatten, default)]
    pub types: Option<TypeMeta>,

    /// ListMeta - mostly used for its `resourceVersion` and continue token
    #[serde(default)]
    pub metadata: ListMeta,

    /// The member objects, in the order the api returned them
    pub items: Vec<Microservice>,
}

impl MicroserviceList {
    /// Wrap a set of objects in a list, stamping the list type fields.
    #[must_use]
    pub fn new(items: Vec<Microservice>) -> Self {
        Self {
            types: Some(TypeMeta {
                api_version: format!("{GROUP}/{VERSION}"),
                kind: "MicroserviceList".into(),
            }),
            metadata: ListMeta::default(),
            items,
        }
    }

    /// Returns an iterator over the members of this list
    pub fn iter(&self) -> impl Iterator<Item = &Microservice> {
        self.items.iter()
    }

    /// Returns an iterator of mutable references to the members of this list
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Microservice> {
        self.items.iter_mut()
    }
}

impl IntoIterator for MicroserviceList {
    type IntoIter = std::vec::IntoIter<Self::Item>;
    type Item = Microservice;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a MicroserviceList {
    type IntoIter = std::slice::Iter<'a, Microservice>;
    type Item = &'a Microservice;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Register this group's kinds with a [`Scheme`].
///
/// This is the single initialization call expected from the composition
/// root, before the scheme is used for decoding. Registering into a scheme
/// that already knows these kinds is a startup error, surfaced as
/// [`Error::AlreadyRegistered`](crate::Error::AlreadyRegistered).
pub fn add_to_scheme(scheme: &mut Scheme) -> crate::Result<()> {
    scheme.register::<Microservice>()?;
    scheme.register_list::<Microservice, MicroserviceList>()
}

#[cfg(test)]
mod test {
    use super::{Microservice, MicroserviceList, MicroserviceSpec, MicroserviceStatus};
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    #[test]
    fn serialized_object_has_type_fields() {
        let ms = Microservice::new("svc-a", MicroserviceSpec { foo: "bar".into() });
        assert_json_eq!(
            serde_json::to_value(&ms).unwrap(),
            json!({
                "apiVersion": "imran.dev.io/v1alpha1",
                "kind": "Microservice",
                "metadata": { "name": "svc-a" },
                "spec": { "foo": "bar" }
            })
        );
    }

    #[test]
    fn foo_roundtrips() {
        let ms = Microservice::new("svc-a", MicroserviceSpec { foo: "bar".into() });
        let data = serde_json::to_string(&ms).unwrap();
        let back: Microservice = serde_json::from_str(&data).unwrap();
        assert_eq!(back.spec.foo, "bar");
        assert_eq!(back, ms);
    }

    #[test]
    fn empty_foo_is_omitted() {
        let ms = Microservice::new("svc-a", MicroserviceSpec::default());
        let value = serde_json::to_value(&ms).unwrap();
        assert_eq!(value["spec"], json!({}));
        // a missing key reads back as the empty string
        let back: Microservice = serde_json::from_value(value).unwrap();
        assert_eq!(back.spec.foo, "");
    }

    #[test]
    fn status_is_an_empty_object() {
        let status = serde_json::to_value(MicroserviceStatus::default()).unwrap();
        assert_eq!(status, json!({}));

        let mut ms = Microservice::new("svc-a", MicroserviceSpec::default());
        ms.status = Some(MicroserviceStatus::default());
        assert_eq!(serde_json::to_value(&ms).unwrap()["status"], json!({}));
    }

    #[test]
    fn sample_manifest_deserializes() {
        let manifest = r#"
apiVersion: imran.dev.io/v1alpha1
kind: Microservice
metadata:
  name: microservice-sample
  namespace: default
spec:
  foo: bar
"#;
        let ms: Microservice = serde_yaml::from_str(manifest).unwrap();
        assert_eq!(ms.metadata.name.as_deref(), Some("microservice-sample"));
        assert_eq!(ms.spec.foo, "bar");
        assert!(ms.status.is_none());
    }

    #[test]
    fn list_preserves_items_and_order() {
        let items = (0..3)
            .map(|i| Microservice::new(&format!("svc-{i}"), MicroserviceSpec::default()))
            .collect();
        let list = MicroserviceList::new(items);

        let value = serde_json::to_value(&list).unwrap();
        assert_eq!(value["apiVersion"], json!("imran.dev.io/v1alpha1"));
        assert_eq!(value["kind"], json!("MicroserviceList"));
        assert_eq!(value["items"].as_array().unwrap().len(), 3);

        let back: MicroserviceList = serde_json::from_value(value).unwrap();
        let names = back
            .iter()
            .map(|ms| ms.metadata.name.clone().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(names, ["svc-0", "svc-1", "svc-2"]);
    }
}
