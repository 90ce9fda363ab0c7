#![cfg(feature = "serde")]

use serde::{Deserialize, Deserializer, Serializer};

/// Serialize data for Serde using the [standard](crate::STANDARD) alphabet.
pub fn serialize<S>(data: impl AsRef<[u8]>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer
{
    let string = crate::encode(data);
    serializer.serialize_str(&string)
}

/// Deserialize data from Serde using the [standard](crate::STANDARD) alphabet.
pub fn deserialize<'a, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: From<Vec<u8>>,
    D: Deserializer<'a>,
{
    use serde::de::Error;

    let decode = |string: String| crate::decode(string)
        .map_err(D::Error::custom);

    String::deserialize(deserializer)
        .and_then(decode)
        .map(T::from)
}
