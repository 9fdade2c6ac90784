//! Lenient serde helpers for loosely-typed admin payloads.
//!
//! Structured fields arrive as JSON strings inside multipart forms, and the
//! admin frontend is not strict about numeric types: `"12"` and `12` both
//! mean twelve. These helpers accept either representation so a sloppy
//! payload degrades to the intended value instead of a 400.

use serde::{Deserialize, Deserializer, Serializer};

/// Internal helper: accepts a JSON number or a numeric string.
struct LenientF64(f64);

impl<'de> Deserialize<'de> for LenientF64 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct LenientVisitor;

        impl<'de> Visitor<'de> for LenientVisitor {
            type Value = LenientF64;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a number or a numeric string")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(LenientF64(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(LenientF64(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(LenientF64(v as f64))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.trim()
                    .parse::<f64>()
                    .map(LenientF64)
                    .map_err(|_| de::Error::custom(format!("invalid number: {v:?}")))
            }
        }

        deserializer.deserialize_any(LenientVisitor)
    }
}

/// f64 that tolerates numeric strings.
pub mod f64_lenient {
    use super::*;

    pub fn serialize<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(*v)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        LenientF64::deserialize(d).map(|v| v.0)
    }
}

/// Option<f64> that tolerates numeric strings and null.
pub mod opt_f64_lenient {
    use super::*;

    pub fn serialize<S: Serializer>(v: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(v) => s.serialize_some(v),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Option::<LenientF64>::deserialize(d).map(|opt| opt.map(|v| v.0))
    }
}

/// i64 that tolerates numeric strings and float representations.
pub mod i64_lenient {
    use super::*;

    pub fn serialize<S: Serializer>(v: &i64, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(*v)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        LenientF64::deserialize(d).map(|v| v.0 as i64)
    }
}

/// Option<i64> that tolerates numeric strings and null.
pub mod opt_i64_lenient {
    use super::*;

    pub fn serialize<S: Serializer>(v: &Option<i64>, s: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(v) => s.serialize_some(v),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        Option::<LenientF64>::deserialize(d).map(|opt| opt.map(|v| v.0 as i64))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(with = "super::f64_lenient")]
        price: f64,
        #[serde(default, with = "super::opt_i64_lenient")]
        stock: Option<i64>,
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        let p: Probe = serde_json::from_str(r#"{"price": 99.5, "stock": "12"}"#).unwrap();
        assert_eq!(p.price, 99.5);
        assert_eq!(p.stock, Some(12));

        let p: Probe = serde_json::from_str(r#"{"price": "80", "stock": 3}"#).unwrap();
        assert_eq!(p.price, 80.0);
        assert_eq!(p.stock, Some(3));
    }

    #[test]
    fn missing_and_null_optionals_are_none() {
        let p: Probe = serde_json::from_str(r#"{"price": 1}"#).unwrap();
        assert_eq!(p.stock, None);
        let p: Probe = serde_json::from_str(r#"{"price": 1, "stock": null}"#).unwrap();
        assert_eq!(p.stock, None);
    }

    #[test]
    fn garbage_strings_are_rejected() {
        assert!(serde_json::from_str::<Probe>(r#"{"price": "free"}"#).is_err());
    }
}
