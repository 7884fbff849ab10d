//! Extension traits for foreign types.

use serde::de::DeserializeOwned;

/// Deserialize an XML document into a typed value.
pub trait XmlExt {
    fn parse_xml<T>(self) -> Result<T, quick_xml::DeError>
    where
        T: DeserializeOwned;
}

impl XmlExt for &str {
    fn parse_xml<T>(self) -> Result<T, quick_xml::DeError>
    where
        T: DeserializeOwned,
    {
        quick_xml::de::from_str(self)
    }
}
