//! A runtime registry mapping type identifiers to concrete data shapes.
//!
//! Generic API machinery (clients, storage layers, validators) addresses
//! objects by their serialized `apiVersion` and `kind` fields. A [`Scheme`]
//! records, per [`GroupVersionKind`], the [`ApiResource`] routing
//! information and a deserializer for the concrete Rust type, so documents
//! can be decoded by what they declare themselves to be.
//!
//! A scheme is deliberately not process-global: it is a plain value meant
//! to be owned by the composition root and populated exactly once during
//! startup, then shared immutably.

use std::{
    any::{type_name, Any},
    collections::{hash_map::Entry, HashMap},
};

use kube::core::{gvk::ParseGroupVersionError, ApiResource, GroupVersion, GroupVersionKind, Resource, TypeMeta};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;

/// Possible errors when registering or decoding through a [`Scheme`]
#[derive(Error, Debug)]
pub enum Error {
    /// The kind has already been registered with this scheme
    ///
    /// Registration is expected to happen exactly once per kind during
    /// process startup; hitting this is a programming error, not a runtime
    /// condition to recover from.
    #[error("{} {} is already registered", .0.api_version(), .0.kind)]
    AlreadyRegistered(GroupVersionKind),

    /// The document declares a kind this scheme does not know about
    #[error("no registered type for {} {}", .0.api_version(), .0.kind)]
    UnrecognizedKind(GroupVersionKind),

    /// The document routed to a different registered type than requested
    #[error("{} {} is registered as {registered}, not {requested}", .gvk.api_version(), .gvk.kind)]
    TypeMismatch {
        /// The type identifier found in the document
        gvk: GroupVersionKind,
        /// The Rust type registered for that identifier
        registered: &'static str,
        /// The Rust type the caller asked for
        requested: &'static str,
    },

    /// The document's `apiVersion` could not be parsed
    #[error("failed to parse group version: {0}")]
    ParseGroupVersion(#[from] ParseGroupVersionError),

    /// Failed to deserialize the document
    #[error("failed to deserialize: {0}")]
    SerdeError(#[from] serde_json::Error),
}

type FromValue = fn(serde_json::Value) -> Result<Box<dyn Any>, serde_json::Error>;

fn erased<T: DeserializeOwned + 'static>(value: serde_json::Value) -> Result<Box<dyn Any>, serde_json::Error> {
    serde_json::from_value::<T>(value).map(|obj| Box::new(obj) as Box<dyn Any>)
}

#[derive(Debug)]
struct Registration {
    resource: ApiResource,
    type_name: &'static str,
    from_value: FromValue,
}

/// A registry mapping [`GroupVersionKind`]s to concrete Rust shapes
///
/// ```
/// use kube::core::GroupVersionKind;
/// use microservice_api::{v1alpha1, Scheme};
///
/// let mut scheme = Scheme::new();
/// v1alpha1::add_to_scheme(&mut scheme)?;
///
/// let gvk = GroupVersionKind::gvk("imran.dev.io", "v1alpha1", "Microservice");
/// assert_eq!(scheme.resolve(&gvk).unwrap().plural, "microservices");
///
/// let ms: v1alpha1::Microservice = scheme.decode(r#"{
///     "apiVersion": "imran.dev.io/v1alpha1",
///     "kind": "Microservice",
///     "metadata": {"name": "svc-a"},
///     "spec": {"foo": "bar"}
/// }"#)?;
/// assert_eq!(ms.spec.foo, "bar");
/// # Ok::<(), microservice_api::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct Scheme {
    types: HashMap<GroupVersionKind, Registration>,
}

impl Scheme {
    /// Create an empty scheme
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource kind under its compile-time type information
    ///
    /// Fails with [`Error::AlreadyRegistered`] if the kind is present.
    pub fn register<K>(&mut self) -> Result<(), Error>
    where
        K: Resource<DynamicType = ()> + DeserializeOwned + 'static,
    {
        let resource = ApiResource::erase::<K>(&());
        let gvk = GroupVersionKind::gvk(&resource.group, &resource.version, &resource.kind);
        self.insert(gvk, Registration {
            resource,
            type_name: type_name::<K>(),
            from_value: erased::<K>,
        })
    }

    /// Register the list form of a kind `K`, decoded as `L`
    ///
    /// The list kind is named by suffixing `List`, following api
    /// conventions, and shares the routing information of `K`.
    pub fn register_list<K, L>(&mut self) -> Result<(), Error>
    where
        K: Resource<DynamicType = ()>,
        L: DeserializeOwned + 'static,
    {
        let resource = ApiResource::erase::<K>(&());
        let kind = format!("{}List", resource.kind);
        let gvk = GroupVersionKind::gvk(&resource.group, &resource.version, &kind);
        self.insert(gvk, Registration {
            resource,
            type_name: type_name::<L>(),
            from_value: erased::<L>,
        })
    }

    fn insert(&mut self, gvk: GroupVersionKind, registration: Registration) -> Result<(), Error> {
        match self.types.entry(gvk) {
            Entry::Occupied(entry) => Err(Error::AlreadyRegistered(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(registration);
                Ok(())
            }
        }
    }

    /// Whether the kind has been registered with this scheme
    #[must_use]
    pub fn recognizes(&self, gvk: &GroupVersionKind) -> bool {
        self.types.contains_key(gvk)
    }

    /// Resolve the api routing information of a registered kind
    #[must_use]
    pub fn resolve(&self, gvk: &GroupVersionKind) -> Option<&ApiResource> {
        self.types.get(gvk).map(|registration| &registration.resource)
    }

    /// Iterate over the registered kinds and their routing information
    pub fn iter(&self) -> impl Iterator<Item = (&GroupVersionKind, &ApiResource)> {
        self.types.iter().map(|(gvk, registration)| (gvk, &registration.resource))
    }

    /// Decode a JSON document into its registered type
    ///
    /// The document is routed by its `apiVersion` and `kind` fields; `T`
    /// must be the type registered for that pair.
    pub fn decode<T: Any>(&self, data: &str) -> Result<T, Error> {
        self.decode_value(serde_json::from_str(data)?)
    }

    /// Decode an in-memory JSON value into its registered type
    pub fn decode_value<T: Any>(&self, value: serde_json::Value) -> Result<T, Error> {
        let types = TypeMeta::deserialize(&value)?;
        let gv: GroupVersion = types.api_version.parse()?;
        let gvk = GroupVersionKind::gvk(&gv.group, &gv.version, &types.kind);
        let registration = self
            .types
            .get(&gvk)
            .ok_or_else(|| Error::UnrecognizedKind(gvk.clone()))?;
        let obj = (registration.from_value)(value)?;
        obj.downcast::<T>().map(|boxed| *boxed).map_err(|_| Error::TypeMismatch {
            gvk,
            registered: registration.type_name,
            requested: type_name::<T>(),
        })
    }
}
