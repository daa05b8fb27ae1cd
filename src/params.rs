//! Rendering of values into URL path segments and query strings.
use crate::{date, Error, Result};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// A value which can be placed into a URL path segment or query parameter.
pub trait UrlParameter {
    /// The textual form of the value, before percent-encoding.
    fn to_url_parameter(&self) -> String;
}

impl UrlParameter for bool {
    fn to_url_parameter(&self) -> String {
        if *self { "true" } else { "false" }.to_owned()
    }
}

impl UrlParameter for str {
    fn to_url_parameter(&self) -> String {
        self.to_owned()
    }
}

impl UrlParameter for String {
    fn to_url_parameter(&self) -> String {
        self.clone()
    }
}

impl UrlParameter for DateTime<Utc> {
    fn to_url_parameter(&self) -> String {
        date::format(self)
    }
}

macro_rules! display_parameter {
    ($($ty:ty),*) => {
        $(
            impl UrlParameter for $ty {
                fn to_url_parameter(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

display_parameter!(i32, i64, u32, u64, usize);

impl<T: UrlParameter + ?Sized> UrlParameter for &T {
    fn to_url_parameter(&self) -> String {
        (**self).to_url_parameter()
    }
}

/// Percent-encode a value for use as a single path segment.
pub(crate) fn segment<T: UrlParameter + ?Sized>(value: &T) -> String {
    urlencoding::encode(&value.to_url_parameter()).into_owned()
}

/// Serialize a list of URL parameters as one comma-separated string, e.g.
/// variable filters of GET queries.
pub(crate) fn comma_separated<T, S>(
    values: &[T],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    T: UrlParameter,
    S: Serializer,
{
    let joined = values
        .iter()
        .map(UrlParameter::to_url_parameter)
        .collect::<Vec<_>>()
        .join(",");
    serializer.serialize_str(&joined)
}

/// Flatten a serializable query struct into query pairs.
///
/// Property names come from the serde attributes of the struct. `None` values
/// are skipped, lists are joined by commas.
pub(crate) fn query_pairs<T: Serialize + ?Sized>(query: &T) -> Result<Vec<(String, String)>> {
    let fields = match serde_json::to_value(query)? {
        Value::Object(fields) => fields,
        Value::Null => return Ok(Vec::new()),
        _ => {
            return Err(Error::InvalidParameters(
                "query parameters must serialize to an object",
            ))
        }
    };

    let mut pairs = Vec::with_capacity(fields.len());
    for (name, value) in fields {
        let value = match value {
            Value::Null => continue,
            Value::Array(items) => {
                if items.is_empty() {
                    continue;
                }
                items
                    .iter()
                    .map(scalar)
                    .collect::<Result<Vec<_>>>()?
                    .join(",")
            }
            value => scalar(&value)?,
        };
        pairs.push((name, value));
    }
    Ok(pairs)
}

fn scalar(value: &Value) -> Result<String> {
    match value {
        Value::Bool(value) => Ok(value.to_url_parameter()),
        Value::Number(value) => Ok(value.to_string()),
        Value::String(value) => Ok(value.clone()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(Error::InvalidParameters(
            "nested values cannot be used as query parameters",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SortOrder;
    use crate::variables::{ConditionOperator, VariableQueryParameter};
    use chrono::TimeZone;

    #[derive(Serialize, Default)]
    #[serde(rename_all = "camelCase")]
    struct SampleQuery {
        #[serde(skip_serializing_if = "Option::is_none")]
        process_definition_key: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        latest_version: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        suspended: Option<bool>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        tenant_id_in: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        version: Option<i32>,
        #[serde(
            default,
            with = "crate::date::option",
            skip_serializing_if = "Option::is_none"
        )]
        started_after: Option<DateTime<Utc>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        sort_order: Option<SortOrder>,
    }

    #[test]
    fn booleans_are_lowercase() {
        assert_eq!(true.to_url_parameter(), "true");
        assert_eq!(false.to_url_parameter(), "false");
        assert_eq!(segment(&true), "true");
    }

    #[test]
    fn segments_are_percent_encoded() {
        assert_eq!(segment("invoice:1:a/b c"), "invoice%3A1%3Aa%2Fb%20c");
        assert_eq!(segment(&42i64), "42");
    }

    #[test]
    fn query_flattens_struct() {
        let query = SampleQuery {
            process_definition_key: Some("invoice".into()),
            latest_version: Some(true),
            suspended: Some(false),
            tenant_id_in: vec!["a".into(), "b".into()],
            version: Some(3),
            started_after: Some(Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap()),
            sort_order: Some(SortOrder::Desc),
        };

        let mut pairs = query_pairs(&query).unwrap();
        pairs.sort();

        assert_eq!(
            pairs,
            vec![
                ("latestVersion".to_owned(), "true".to_owned()),
                ("processDefinitionKey".to_owned(), "invoice".to_owned()),
                ("sortOrder".to_owned(), "desc".to_owned()),
                (
                    "startedAfter".to_owned(),
                    "2020-01-02T03:04:05.000+0000".to_owned()
                ),
                ("suspended".to_owned(), "false".to_owned()),
                ("tenantIdIn".to_owned(), "a,b".to_owned()),
                ("version".to_owned(), "3".to_owned()),
            ]
        );
    }

    #[test]
    fn empty_query_has_no_pairs() {
        assert!(query_pairs(&SampleQuery::default()).unwrap().is_empty());
        assert!(query_pairs(&()).unwrap().is_empty());
    }

    #[derive(Serialize, Default)]
    struct FilteredQuery {
        #[serde(
            serialize_with = "comma_separated",
            skip_serializing_if = "Vec::is_empty"
        )]
        variables: Vec<VariableQueryParameter>,
    }

    #[test]
    fn variable_filters_are_joined() {
        let query = FilteredQuery {
            variables: vec![
                VariableQueryParameter::new("amount", ConditionOperator::Gteq, 100),
                VariableQueryParameter::new("creditor", ConditionOperator::Eq, "Great Pizza"),
            ],
        };

        assert_eq!(
            query_pairs(&query).unwrap(),
            vec![(
                "variables".to_owned(),
                "amount_gteq_100,creditor_eq_Great Pizza".to_owned()
            )]
        );
        assert!(query_pairs(&FilteredQuery::default()).unwrap().is_empty());
    }

    #[test]
    fn nested_values_are_rejected() {
        let query = serde_json::json!({ "variables": [{ "name": "a" }] });
        assert!(matches!(
            query_pairs(&query),
            Err(Error::InvalidParameters(_))
        ));
    }
}
