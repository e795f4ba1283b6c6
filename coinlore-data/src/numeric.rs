use serde::{
    de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::fmt;

/// Numeric market field, parsed once at ingest.
///
/// Coinlore delivers numbers as JSON strings (`"50000.12"`), JSON numbers, `null`, or omits the
/// field entirely. Every shape decodes successfully: anything that is not a finite number becomes
/// the invalid value, so consumers never see `NaN` and never have to re-parse strings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Numeric(Option<f64>);

impl Numeric {
    /// Missing or malformed value.
    pub const INVALID: Self = Self(None);

    /// Construct from an `f64`, rejecting `NaN` and infinities.
    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Self(Some(value))
        } else {
            Self::INVALID
        }
    }

    /// Parse a textual value, eg/ `" 3000.5 "`.
    pub fn parse(raw: &str) -> Self {
        raw.trim()
            .parse::<f64>()
            .map(Self::new)
            .unwrap_or(Self::INVALID)
    }

    pub fn value(&self) -> Option<f64> {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    /// Value, or `0.0` if invalid.
    pub fn or_zero(&self) -> f64 {
        self.0.unwrap_or(0.0)
    }

    /// Value if valid and strictly positive.
    pub fn positive(&self) -> Option<f64> {
        self.0.filter(|value| *value > 0.0)
    }

    /// Value if valid and not zero.
    pub fn non_zero(&self) -> Option<f64> {
        self.0.filter(|value| *value != 0.0)
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Option<f64>> for Numeric {
    fn from(value: Option<f64>) -> Self {
        value.map(Self::new).unwrap_or(Self::INVALID)
    }
}

impl Serialize for Numeric {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0 {
            Some(value) => serializer.serialize_f64(value),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Numeric {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NumericVisitor)
    }
}

struct NumericVisitor;

impl<'de> Visitor<'de> for NumericVisitor {
    type Value = Numeric;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number, a numeric string, or null")
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Ok(Numeric::new(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(Numeric::new(value as f64))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(Numeric::new(value as f64))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(Numeric::parse(value))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(Numeric::INVALID)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Numeric::INVALID)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Numeric::INVALID)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Numeric::INVALID)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Numeric::INVALID)
    }
}
