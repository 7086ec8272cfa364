//! Placeholders over `namespace:name` entity ids.
//!
//! All of them support `id`, `namespace` and `name`. The thing placeholder
//! is strict and rejects sources that are not valid thing ids; the others
//! resolve nothing for such sources.

use super::Placeholder;
use crate::error::Result;
use twinlink_core::{NamespacedId, ThingId};

const ID_NAMES: &[&str] = &["id", "namespace", "name"];

fn resolve_id(id: &NamespacedId, name: &str) -> Option<String> {
    match name {
        "id" => Some(id.to_string()),
        "namespace" => Some(id.namespace().to_string()),
        "name" => Some(id.name().to_string()),
        _ => None,
    }
}

/// `thing:` placeholder, resolved against a thing id.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThingPlaceholder;

pub static THING_PLACEHOLDER: ThingPlaceholder = ThingPlaceholder;

impl Placeholder for ThingPlaceholder {
    type Source = str;

    fn prefix(&self) -> &'static str {
        "thing"
    }

    fn supported_names(&self) -> &'static [&'static str] {
        ID_NAMES
    }

    fn resolve(&self, source: &str, name: &str) -> Result<Option<String>> {
        let thing_id = ThingId::parse(source)?;
        Ok(resolve_id(thing_id.as_namespaced(), name))
    }
}

macro_rules! lenient_id_placeholder {
    ($(#[$meta:meta])* $ty:ident, $instance:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $ty;

        pub static $instance: $ty = $ty;

        impl Placeholder for $ty {
            type Source = str;

            fn prefix(&self) -> &'static str {
                $prefix
            }

            fn supported_names(&self) -> &'static [&'static str] {
                ID_NAMES
            }

            fn resolve(&self, source: &str, name: &str) -> Result<Option<String>> {
                Ok(NamespacedId::parse_lenient(source).and_then(|id| resolve_id(&id, name)))
            }
        }
    };
}

lenient_id_placeholder!(
    /// `entity:` placeholder, resolved against the id of any entity.
    EntityPlaceholder,
    ENTITY_PLACEHOLDER,
    "entity"
);

lenient_id_placeholder!(
    /// `feature:` placeholder.
    FeaturePlaceholder,
    FEATURE_PLACEHOLDER,
    "feature"
);

lenient_id_placeholder!(
    /// `connection:` placeholder, resolved against a connection id.
    ConnectionPlaceholder,
    CONNECTION_PLACEHOLDER,
    "connection"
);

lenient_id_placeholder!(
    /// `policy:` placeholder, resolved against a policy id.
    PolicyPlaceholder,
    POLICY_PLACEHOLDER,
    "policy"
);
