//! Core value types for the dashboard model.
//!
//! Every type here uses a smart constructor, so once a value exists it is
//! valid and never needs to be checked again ("parse, don't validate").

use nutype::nutype;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a metadata object (insight, attribute, label, widget, ...).
///
/// Guaranteed to be non-empty after trimming and at most 255 characters.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 255),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        AsRef,
        Deref,
        Display,
        Serialize,
        Deserialize
    )
)]
pub struct Identifier(String);

/// URI of a metadata object.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 255),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        AsRef,
        Deref,
        Display,
        Serialize,
        Deserialize
    )
)]
pub struct Uri(String);

/// Kind of metadata object an identifier points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectType {
    /// A saved visualization.
    Insight,
    /// A dashboard widget.
    Widget,
    /// A measure (metric).
    Measure,
    /// An attribute.
    Attribute,
    /// An attribute label.
    DisplayForm,
    /// A user-defined attribute hierarchy.
    AttributeHierarchy,
    /// A date hierarchy template.
    DateHierarchyTemplate,
    /// A dataset.
    DataSet,
}

/// Reference to a metadata object, either by identifier or by URI.
///
/// Two references are equal only if they use the same addressing scheme
/// and point at the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObjRef {
    /// Reference by identifier and object type.
    Identifier {
        /// The object identifier.
        identifier: Identifier,
        /// The object type.
        #[serde(rename = "type")]
        object_type: ObjectType,
    },
    /// Reference by URI.
    Uri {
        /// The object URI.
        uri: Uri,
    },
}

impl ObjRef {
    /// Creates a reference by identifier.
    pub const fn identifier(identifier: Identifier, object_type: ObjectType) -> Self {
        Self::Identifier {
            identifier,
            object_type,
        }
    }

    /// Creates a reference by URI.
    pub const fn uri(uri: Uri) -> Self {
        Self::Uri { uri }
    }

    /// Parses a raw identifier into a reference.
    pub fn try_identifier(
        identifier: impl Into<String>,
        object_type: ObjectType,
    ) -> Result<Self, IdentifierError> {
        Ok(Self::identifier(
            Identifier::try_new(identifier.into())?,
            object_type,
        ))
    }

    /// Parses a raw URI into a reference.
    pub fn try_uri(uri: impl Into<String>) -> Result<Self, UriError> {
        Ok(Self::uri(Uri::try_new(uri.into())?))
    }

    /// The identifier or URI this reference carries.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Identifier { identifier, .. } => identifier.as_ref(),
            Self::Uri { uri } => uri.as_ref(),
        }
    }
}

impl fmt::Display for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pairs a command with the events produced while processing it.
///
/// Correlation IDs are opaque strings supplied by callers; they must be
/// non-empty and at most 255 characters.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 255),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        AsRef,
        Deref,
        Display,
        Serialize,
        Deserialize
    )
)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generates a fresh, time-ordered correlation ID.
    pub fn generate() -> Self {
        // A hyphenated UUID is never empty and always 36 characters long
        Self::try_new(Uuid::now_v7().to_string())
            .expect("a hyphenated UUID is always a valid correlation ID")
    }
}

/// Header of a dashboard widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetHeader {
    /// Title shown above the widget.
    pub title: String,
}

impl WidgetHeader {
    /// Creates a header with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn identifier_accepts_valid_strings(s in "[a-zA-Z0-9_.-]{1,255}") {
            let identifier = Identifier::try_new(s.clone());
            prop_assert!(identifier.is_ok());
            let identifier = identifier.unwrap();
            prop_assert_eq!(identifier.as_ref(), &s);
        }

        #[test]
        fn identifier_trims_whitespace(s in " {0,10}[a-zA-Z0-9_.-]{1,200} {0,10}") {
            let identifier = Identifier::try_new(s.clone()).unwrap();
            prop_assert_eq!(identifier.as_ref(), s.trim());
        }

        #[test]
        fn identifier_rejects_blank_strings(s in " {0,50}") {
            prop_assert!(Identifier::try_new(s).is_err());
        }

        #[test]
        fn identifier_rejects_strings_over_255_chars(s in "[a-z0-9]{256,400}") {
            prop_assert!(Identifier::try_new(s).is_err());
        }

        #[test]
        fn obj_ref_display_is_the_raw_identifier(s in "[a-zA-Z0-9_.-]{1,64}") {
            let obj_ref = ObjRef::try_identifier(s.clone(), ObjectType::Widget).unwrap();
            prop_assert_eq!(obj_ref.to_string(), s);
        }
    }

    #[test]
    fn identifier_and_uri_refs_with_same_text_differ() {
        let by_id = ObjRef::try_identifier("label.region", ObjectType::DisplayForm).unwrap();
        let by_uri = ObjRef::try_uri("label.region").unwrap();

        assert_ne!(by_id, by_uri);
        assert_eq!(by_id.to_string(), by_uri.to_string());
    }

    #[test]
    fn identifier_refs_with_different_types_differ() {
        let widget = ObjRef::try_identifier("w1", ObjectType::Widget).unwrap();
        let insight = ObjRef::try_identifier("w1", ObjectType::Insight).unwrap();

        assert_ne!(widget, insight);
    }

    #[test]
    fn obj_ref_serializes_like_the_backend_shape() {
        let by_id = ObjRef::try_identifier("w1", ObjectType::Widget).unwrap();
        let by_uri = ObjRef::try_uri("/gdc/md/project/obj/12").unwrap();

        assert_eq!(
            serde_json::to_value(&by_id).unwrap(),
            serde_json::json!({ "identifier": "w1", "type": "widget" })
        );
        assert_eq!(
            serde_json::to_value(&by_uri).unwrap(),
            serde_json::json!({ "uri": "/gdc/md/project/obj/12" })
        );
    }

    #[test]
    fn obj_ref_deserializes_both_shapes() {
        let by_id: ObjRef =
            serde_json::from_value(serde_json::json!({ "identifier": "a1", "type": "attribute" }))
                .unwrap();
        let by_uri: ObjRef =
            serde_json::from_value(serde_json::json!({ "uri": "/obj/7" })).unwrap();

        assert_eq!(
            by_id,
            ObjRef::try_identifier("a1", ObjectType::Attribute).unwrap()
        );
        assert_eq!(by_uri, ObjRef::try_uri("/obj/7").unwrap());
    }

    #[test]
    fn obj_ref_rejects_blank_identifier_on_deserialize() {
        let result: Result<ObjRef, _> =
            serde_json::from_value(serde_json::json!({ "identifier": "  ", "type": "widget" }));
        assert!(result.is_err());
    }

    #[test]
    fn generated_correlation_ids_are_unique() {
        let first = CorrelationId::generate();
        let second = CorrelationId::generate();
        assert_ne!(first, second);
    }

    #[test]
    fn correlation_id_rejects_empty_string() {
        assert!(CorrelationId::try_new("").is_err());
    }
}
