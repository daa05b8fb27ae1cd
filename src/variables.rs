//! Typed process variables and the variable endpoints of scoped resources.
use crate::{
    date,
    params::{segment, UrlParameter},
    Client, Result,
};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// Variables keyed by name. Names are sent exactly as given.
pub type Variables = HashMap<String, VariableValue>;

/// The value type of a variable as known to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableType {
    /// a `java.lang.Boolean`
    Boolean,
    /// a byte array
    Bytes,
    /// a `java.lang.Short`
    Short,
    /// a `java.lang.Integer`
    Integer,
    /// a `java.lang.Long`
    Long,
    /// a `java.lang.Double`
    Double,
    /// any number
    Number,
    /// a `java.util.Date`
    Date,
    /// a `java.lang.String`
    String,
    /// null
    Null,
    /// a file with name, mime type and content
    File,
    /// a serialized java object
    Object,
    /// a JSON document
    Json,
    /// an XML document
    Xml,
    /// any other type, e.g. one contributed by an engine plugin
    #[serde(other)]
    Other,
}

/// A typed variable value as sent to and returned by the engine.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableValue {
    /// The value, in its serialized form for `Object`, `Json` and `Xml` types.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value: Value,
    /// The value type; the engine guesses it when absent.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub variable_type: Option<VariableType>,
    /// Additional type information, e.g. `objectTypeName` for objects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_info: Option<Map<String, Value>>,
}

impl VariableValue {
    fn typed<T: Into<Value>>(variable_type: VariableType, value: T) -> Self {
        VariableValue {
            value: value.into(),
            variable_type: Some(variable_type),
            value_info: None,
        }
    }

    /// A `String` variable.
    pub fn string<T: Into<String>>(value: T) -> Self {
        VariableValue::typed(VariableType::String, value.into())
    }

    /// A `Boolean` variable.
    pub fn boolean(value: bool) -> Self {
        VariableValue::typed(VariableType::Boolean, value)
    }

    /// A `Short` variable.
    pub fn short(value: i16) -> Self {
        VariableValue::typed(VariableType::Short, value)
    }

    /// An `Integer` variable.
    pub fn integer(value: i32) -> Self {
        VariableValue::typed(VariableType::Integer, value)
    }

    /// A `Long` variable.
    pub fn long(value: i64) -> Self {
        VariableValue::typed(VariableType::Long, value)
    }

    /// A `Double` variable.
    pub fn double(value: f64) -> Self {
        VariableValue::typed(VariableType::Double, value)
    }

    /// A `Date` variable.
    pub fn date(value: DateTime<Utc>) -> Self {
        VariableValue::typed(VariableType::Date, date::format(&value))
    }

    /// A `Null` variable.
    pub fn null() -> Self {
        VariableValue {
            value: Value::Null,
            variable_type: Some(VariableType::Null),
            value_info: None,
        }
    }

    /// A `Json` variable holding the serialized form of `value`.
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(VariableValue::typed(
            VariableType::Json,
            serde_json::to_string(value)?,
        ))
    }

    /// An `Object` variable serialized as JSON, deserialized on the engine side
    /// into the java class `object_type_name`.
    pub fn object<T: Serialize, N: Into<String>>(value: &T, object_type_name: N) -> Result<Self> {
        let mut value_info = Map::new();
        value_info.insert("objectTypeName".to_owned(), object_type_name.into().into());
        value_info.insert(
            "serializationDataFormat".to_owned(),
            "application/json".into(),
        );

        Ok(VariableValue {
            value: serde_json::to_string(value)?.into(),
            variable_type: Some(VariableType::Object),
            value_info: Some(value_info),
        })
    }

    /// Interpret the value as `T`.
    ///
    /// Serialized `Json` and `Object` values are parsed first, dates use the
    /// engine date format.
    pub fn value_as<T: DeserializeOwned>(&self) -> Result<T> {
        match (&self.variable_type, &self.value) {
            (Some(VariableType::Json | VariableType::Object), Value::String(serialized)) => {
                Ok(serde_json::from_str(serialized)?)
            }
            _ => Ok(serde_json::from_value(self.value.clone())?),
        }
    }

    /// Interpret the value as a date.
    pub fn date_value(&self) -> Option<DateTime<Utc>> {
        self.value.as_str().and_then(|value| date::parse(value).ok())
    }
}

impl From<bool> for VariableValue {
    fn from(value: bool) -> Self {
        VariableValue::boolean(value)
    }
}

impl From<i32> for VariableValue {
    fn from(value: i32) -> Self {
        VariableValue::integer(value)
    }
}

impl From<i64> for VariableValue {
    fn from(value: i64) -> Self {
        VariableValue::long(value)
    }
}

impl From<f64> for VariableValue {
    fn from(value: f64) -> Self {
        VariableValue::double(value)
    }
}

impl From<&str> for VariableValue {
    fn from(value: &str) -> Self {
        VariableValue::string(value)
    }
}

impl From<String> for VariableValue {
    fn from(value: String) -> Self {
        VariableValue::string(value)
    }
}

impl From<DateTime<Utc>> for VariableValue {
    fn from(value: DateTime<Utc>) -> Self {
        VariableValue::date(value)
    }
}

/// Update and delete several variables at once.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchVariables {
    /// Variables to create or overwrite.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub modifications: Variables,
    /// Names of variables to delete.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deletions: Vec<String>,
}

impl PatchVariables {
    /// Create or overwrite a variable.
    pub fn with_modification<N: Into<String>, V: Into<VariableValue>>(
        mut self,
        name: N,
        value: V,
    ) -> Self {
        self.modifications.insert(name.into(), value.into());
        self
    }

    /// Delete a variable.
    pub fn with_deletion<N: Into<String>>(mut self, name: N) -> Self {
        self.deletions.push(name.into());
        self
    }
}

/// Comparison operator of a variable filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionOperator {
    /// equal to
    Eq,
    /// not equal to
    Neq,
    /// greater than
    Gt,
    /// greater than or equal to
    Gteq,
    /// lower than
    Lt,
    /// lower than or equal to
    Lteq,
    /// SQL like, `%` is the wildcard
    Like,
}

impl ConditionOperator {
    /// The name of the operator as used by the engine.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionOperator::Eq => "eq",
            ConditionOperator::Neq => "neq",
            ConditionOperator::Gt => "gt",
            ConditionOperator::Gteq => "gteq",
            ConditionOperator::Lt => "lt",
            ConditionOperator::Lteq => "lteq",
            ConditionOperator::Like => "like",
        }
    }
}

/// Filter results by the value of a variable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableQueryParameter {
    /// The variable name.
    pub name: String,
    /// How to compare.
    pub operator: ConditionOperator,
    /// The value to compare with.
    pub value: Value,
}

impl VariableQueryParameter {
    /// A filter on variable `name`.
    pub fn new<N: Into<String>, V: Into<Value>>(
        name: N,
        operator: ConditionOperator,
        value: V,
    ) -> Self {
        VariableQueryParameter {
            name: name.into(),
            operator,
            value: value.into(),
        }
    }
}

/// Rendered as `name_operator_value`, the form list endpoints expect in their
/// `variables` URL parameter.
impl UrlParameter for VariableQueryParameter {
    fn to_url_parameter(&self) -> String {
        let value = match &self.value {
            Value::String(value) => value.clone(),
            value => value.to_string(),
        };
        format!("{}_{}_{}", self.name, self.operator.as_str(), value)
    }
}

/// The variables of one scope, e.g. `/process-instance/{id}/variables` or
/// `/task/{id}/localVariables`.
#[derive(Clone, Debug)]
pub struct VariableResource {
    client: Client,
    path: String,
}

impl VariableResource {
    pub(crate) fn new(client: Client, path: String) -> Self {
        VariableResource { client, path }
    }

    /// All variables of the scope. With `deserialize_values` off, object
    /// values are returned in their serialized form.
    #[tracing::instrument(skip(self), fields(path = %self.path), err)]
    pub async fn get_all(&self, deserialize_values: bool) -> Result<Variables> {
        self.client
            .get(self.path.as_str())
            .param("deserializeValues", deserialize_values)
            .send()
            .await
    }

    /// A single variable.
    #[tracing::instrument(skip(self), fields(path = %self.path), err)]
    pub async fn get(&self, name: &str) -> Result<VariableValue> {
        self.client
            .get(format!("{}/{}", self.path, segment(name)))
            .send()
            .await
    }

    /// The raw content of a `Bytes` or `File` variable.
    #[tracing::instrument(skip(self), fields(path = %self.path), err)]
    pub async fn get_binary(&self, name: &str) -> Result<Vec<u8>> {
        self.client
            .get(format!("{}/{}/data", self.path, segment(name)))
            .send_bytes()
            .await
    }

    /// Create or overwrite a single variable.
    #[tracing::instrument(skip(self, value), fields(path = %self.path), err)]
    pub async fn set(&self, name: &str, value: &VariableValue) -> Result<()> {
        debug!(?value, "setting variable");
        self.client
            .put(format!("{}/{}", self.path, segment(name)))
            .json(value)?
            .send_empty()
            .await
    }

    /// Delete a single variable.
    #[tracing::instrument(skip(self), fields(path = %self.path), err)]
    pub async fn delete(&self, name: &str) -> Result<()> {
        self.client
            .delete(format!("{}/{}", self.path, segment(name)))
            .send_empty()
            .await
    }

    /// Apply updates and deletions in one call.
    #[tracing::instrument(skip(self, patch), fields(path = %self.path), err)]
    pub async fn modify(&self, patch: &PatchVariables) -> Result<()> {
        debug!(?patch, "modifying variables");
        self.client
            .post(self.path.as_str())
            .json(patch)?
            .send_empty()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn variable_names_are_kept_verbatim() {
        let patch = PatchVariables::default()
            .with_modification("Invoice_Amount", 30.5)
            .with_modification("approverID", "mary")
            .with_deletion("OLD_flag");

        let json = serde_json::to_value(&patch).unwrap();

        assert_eq!(
            json,
            json!({
                "modifications": {
                    "Invoice_Amount": { "value": 30.5, "type": "Double" },
                    "approverID": { "value": "mary", "type": "String" }
                },
                "deletions": ["OLD_flag"]
            })
        );
    }

    #[test]
    fn types_are_strings() {
        assert_eq!(
            serde_json::to_value(VariableValue::integer(7)).unwrap(),
            json!({ "value": 7, "type": "Integer" })
        );
        assert_eq!(
            serde_json::to_value(VariableValue::null()).unwrap(),
            json!({ "type": "Null" })
        );
    }

    #[test]
    fn dates_use_engine_format() {
        let value = VariableValue::date(Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap());
        assert_eq!(value.value, json!("2021-03-04T05:06:07.000+0000"));
        assert_eq!(
            value.date_value(),
            Some(Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap())
        );
    }

    #[test]
    fn json_values_round_trip_through_value_as() {
        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        struct Order {
            id: u32,
            items: Vec<String>,
        }

        let order = Order {
            id: 3,
            items: vec!["book".into()],
        };
        let value = VariableValue::json(&order).unwrap();

        assert_eq!(value.variable_type, Some(VariableType::Json));
        assert!(value.value.is_string());
        assert_eq!(value.value_as::<Order>().unwrap(), order);
    }

    #[test]
    fn object_values_carry_type_info() {
        let value = VariableValue::object(&json!({ "a": 1 }), "com.example.Order").unwrap();
        let json = serde_json::to_value(&value).unwrap();

        assert_eq!(json["type"], "Object");
        assert_eq!(json["value"], r#"{"a":1}"#);
        assert_eq!(json["valueInfo"]["objectTypeName"], "com.example.Order");
        assert_eq!(
            json["valueInfo"]["serializationDataFormat"],
            "application/json"
        );
    }

    #[test]
    fn parses_engine_response() {
        let value: VariableValue = serde_json::from_value(json!({
            "value": 42,
            "type": "Long",
            "valueInfo": {}
        }))
        .unwrap();

        assert_eq!(value.variable_type, Some(VariableType::Long));
        assert_eq!(value.value_as::<i64>().unwrap(), 42);
    }

    #[test]
    fn unknown_types_are_accepted() {
        let value: VariableValue =
            serde_json::from_value(json!({"value": "<x/>", "type": "Spin"})).unwrap();

        assert_eq!(value.variable_type, Some(VariableType::Other));
        assert_eq!(value.value, json!("<x/>"));
    }

    #[test]
    fn variable_filters_have_url_form() {
        assert_eq!(
            VariableQueryParameter::new("amount", ConditionOperator::Gteq, 100)
                .to_url_parameter(),
            "amount_gteq_100"
        );
        assert_eq!(
            VariableQueryParameter::new("creditor", ConditionOperator::Like, "Great%")
                .to_url_parameter(),
            "creditor_like_Great%"
        );
        assert_eq!(
            VariableQueryParameter::new("approved", ConditionOperator::Eq, true)
                .to_url_parameter(),
            "approved_eq_true"
        );
    }

    #[test]
    fn operators_are_lowercase() {
        let filter = VariableQueryParameter::new("amount", ConditionOperator::Gteq, 100);
        assert_eq!(
            serde_json::to_value(filter).unwrap(),
            json!({ "name": "amount", "operator": "gteq", "value": 100 })
        );
    }
}
