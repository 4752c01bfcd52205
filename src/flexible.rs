//! Deserializers for numeric request fields that clients may send either as
//! JSON numbers or as strings, e.g. `12.5` or `"12.5"`.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer, de};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString<T> {
    Number(T),
    Text(String),
}

fn into_number<T, E>(value: NumberOrString<T>) -> Result<T, E>
where
    T: FromStr,
    T::Err: Display,
    E: de::Error,
{
    match value {
        NumberOrString::Number(number) => Ok(number),
        NumberOrString::Text(text) => text
            .trim()
            .parse()
            .map_err(|error| E::custom(format!("invalid number \"{text}\": {error}"))),
    }
}

/// An optional finite float. `null` and a missing field are both `None`.
/// Text such as `"inf"` or `"NaN"` is rejected.
///
/// Use with `#[serde(default, deserialize_with = "flexible::option_f64")]`.
pub fn option_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Option::<NumberOrString<f64>>::deserialize(deserializer)?
        .map(into_number::<f64, D::Error>)
        .transpose()?;

    match number {
        Some(number) if !number.is_finite() => Err(de::Error::custom(format!(
            "invalid number {number}: must be finite"
        ))),
        number => Ok(number),
    }
}

/// An optional integer. `null` and a missing field are both `None`.
///
/// Use with `#[serde(default, deserialize_with = "flexible::option_i64")]`.
pub fn option_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NumberOrString<i64>>::deserialize(deserializer)?
        .map(into_number)
        .transpose()
}
