//! serde support for [`Opt`].
//!
//! A present value serializes as the bare inner value. An absent value
//! serializes as `null`, or is left out entirely when the field carries
//! `#[serde(skip_serializing_if = "Opt::is_absent")]`.
//!
//! On input, `null` and a missing field (with `#[serde(default)]`) both give
//! `Absent`; any other value gives `Present`.
//!
//! ```
//! use mox::Opt;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct User {
//!     #[serde(default, skip_serializing_if = "Opt::is_absent")]
//!     nickname: Opt<String>,
//!     #[serde(default)]
//!     age: Opt<u8>,
//! }
//!
//! let u = User { nickname: Opt::Absent, age: Opt::some(30) };
//! assert_eq!(serde_json::to_string(&u).unwrap(), r#"{"age":30}"#);
//!
//! let u: User = serde_json::from_str(r#"{"nickname":null}"#).unwrap();
//! assert!(u.nickname.is_absent() && u.age.is_absent());
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::opt::Opt;

impl<T: Serialize> Serialize for Opt<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Opt::Present(v) => v.serialize(serializer),
            Opt::Absent => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Opt<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Opt::from)
    }
}
