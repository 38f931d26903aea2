//! Named output series handed to the modelling service.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A transformed column, same length as its input.
///
/// Non-finite values (`NaN` placeholders from shifts and windows, or
/// `-inf` from `log(0)`) are written as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformedSeries {
    pub name: String,
    #[serde(serialize_with = "serialize_values", deserialize_with = "deserialize_values")]
    pub values: Vec<f64>,
}

impl TransformedSeries {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Count of finite values.
    pub fn finite_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_finite()).count()
    }
}

fn serialize_values<S>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(values.iter().map(|v| v.is_finite().then_some(*v)))
}

fn deserialize_values<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<Option<f64>> = Vec::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}
