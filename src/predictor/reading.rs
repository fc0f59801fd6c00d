//! Validation of predictor responses

use serde_json::Value;

/// One validated poll result
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionReading {
    /// Classifier label, e.g. "Normal" or "Abnormal"
    pub prediction: String,
    /// Measured values, positionally aligned with the parameter table.
    /// Numbers and numeric strings are accepted; anything else is kept as
    /// `None` so positions never shift.
    pub values: Vec<Option<f64>>,
}

/// Why a response was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformed {
    /// `prediction` absent, null, empty, false or zero
    MissingPrediction,
    /// `latest_values` absent or not an array
    ValuesNotSequence,
}

impl Malformed {
    pub fn as_str(self) -> &'static str {
        match self {
            Malformed::MissingPrediction => "missing prediction",
            Malformed::ValuesNotSequence => "latest_values is not an array",
        }
    }
}

impl std::fmt::Display for Malformed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PredictionReading {
    /// Validate a decoded response body
    pub fn from_json(body: &Value) -> Result<Self, Malformed> {
        let prediction = match body.get("prediction") {
            None => return Err(Malformed::MissingPrediction),
            Some(v) if is_falsy(v) => return Err(Malformed::MissingPrediction),
            Some(Value::String(s)) => s.clone(),
            // Truthy non-string labels are kept as their JSON text; they can
            // never equal "Abnormal" but still overwrite the latch.
            Some(other) => other.to_string(),
        };

        let values = match body.get("latest_values") {
            Some(Value::Array(items)) => items.iter().map(measured_value).collect(),
            _ => return Err(Malformed::ValuesNotSequence),
        };

        Ok(Self { prediction, values })
    }
}

fn measured_value(item: &Value) -> Option<f64> {
    match item {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64().map_or(false, |f| f == 0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}
