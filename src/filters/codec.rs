//! URL-safe filter tokens
//!
//! A token is unpadded URL-safe base64 over a compact JSON payload tagged
//! with a schema version. Condition and group ids are not carried; decoding
//! assigns fresh ones.

use crate::filters::error::CodecError;
use crate::filters::model::{
    FilterCondition, FilterConfig, FilterGroup, FilterValue, LogicalOperator,
};
use crate::filters::operators::FilterOperator;
use base64ct::{Base64UrlUnpadded, Encoding};
use serde::{Deserialize, Serialize};

/// Payload schema version written into every token
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Payload {
    v: u32,
    g: Vec<GroupPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    n: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    p: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GroupPayload {
    c: Vec<ConditionPayload>,
    #[serde(default)]
    l: LogicalOperator,
}

#[derive(Debug, Serialize, Deserialize)]
struct ConditionPayload {
    f: String,
    o: FilterOperator,
    #[serde(default, skip_serializing_if = "FilterValue::is_none")]
    v: FilterValue,
    #[serde(default)]
    l: LogicalOperator,
}

#[derive(Deserialize)]
struct VersionProbe {
    v: u32,
}

impl Payload {
    fn from_config(config: &FilterConfig) -> Self {
        let g = config
            .groups
            .iter()
            .map(|group| GroupPayload {
                c: group
                    .conditions
                    .iter()
                    .filter_map(|c| {
                        let o = c.operator.filter(|_| c.is_complete())?;
                        Some(ConditionPayload {
                            f: c.field.clone(),
                            o,
                            v: c.value.clone(),
                            l: c.logical_operator,
                        })
                    })
                    .collect(),
                l: group.logical_operator,
            })
            .filter(|group| !group.c.is_empty())
            .collect();

        Self {
            v: SCHEMA_VERSION,
            g,
            n: config.name.clone(),
            p: config.is_public,
        }
    }

    fn into_config(self) -> Result<FilterConfig, CodecError> {
        let mut groups = Vec::with_capacity(self.g.len());

        for (g, group) in self.g.into_iter().enumerate() {
            if group.c.is_empty() {
                return Err(CodecError::MalformedPayload(format!(
                    "group {} has no conditions",
                    g + 1
                )));
            }

            let mut conditions = Vec::with_capacity(group.c.len());
            for (c, condition) in group.c.into_iter().enumerate() {
                if condition.f.trim().is_empty() {
                    return Err(CodecError::MalformedPayload(format!(
                        "group {}, condition {} has no field",
                        g + 1,
                        c + 1
                    )));
                }
                conditions.push(
                    FilterCondition::on(condition.f, condition.o, condition.v)
                        .with_connector(condition.l),
                );
            }

            groups.push(FilterGroup::with_conditions(conditions).with_connector(group.l));
        }

        Ok(FilterConfig {
            groups,
            name: self.n,
            is_public: self.p,
        })
    }
}

/// Encode a configuration to a URL-safe token.
///
/// Incomplete conditions and groups left empty are not written.
pub fn encode(config: &FilterConfig) -> String {
    let bytes = serde_json::to_vec(&Payload::from_config(config)).unwrap_or_default();
    Base64UrlUnpadded::encode_string(&bytes)
}

/// Decode a token, reporting why it was rejected
pub fn decode_strict(token: &str) -> Result<FilterConfig, CodecError> {
    let bytes = Base64UrlUnpadded::decode_vec(token.trim())
        .map_err(|e| CodecError::InvalidEncoding(e.to_string()))?;

    let probe: VersionProbe = serde_json::from_slice(&bytes)
        .map_err(|e| CodecError::MalformedPayload(e.to_string()))?;
    if probe.v != SCHEMA_VERSION {
        return Err(CodecError::UnsupportedVersion {
            found: probe.v,
            expected: SCHEMA_VERSION,
        });
    }

    let payload: Payload = serde_json::from_slice(&bytes)
        .map_err(|e| CodecError::MalformedPayload(e.to_string()))?;
    payload.into_config()
}

/// Decode a token, falling back to a fresh default configuration
pub fn decode(token: &str) -> FilterConfig {
    decode_strict(token).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "Discarding undecodable filter token");
        FilterConfig::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::model::Scalar;
    use crate::filters::operators::ValueArity;
    use chrono::NaiveDate;

    fn sample() -> FilterConfig {
        FilterConfig::with_groups(vec![
            FilterGroup::with_conditions(vec![
                FilterCondition::on("status", FilterOperator::Equals, FilterValue::single("ACTIVE"))
                    .with_connector(LogicalOperator::Or),
                FilterCondition::on(
                    "employee_count",
                    FilterOperator::Between,
                    FilterValue::pair(10.0, 500.0),
                ),
            ])
            .with_connector(LogicalOperator::Or),
            FilterGroup::with_conditions(vec![FilterCondition::on(
                "created_at",
                FilterOperator::After,
                FilterValue::single(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            )]),
        ])
        .named("Active mid-size")
    }

    #[test]
    fn test_token_survives_a_round_trip() {
        let config = sample();
        let token = encode(&config);

        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));

        let decoded = decode_strict(&token).unwrap();
        assert!(decoded.structurally_eq(&config));
        assert_ne!(decoded.groups[0].id, config.groups[0].id);
    }

    #[test]
    fn test_text_date_stays_text() {
        let config = FilterConfig::from_conditions(vec![FilterCondition::on(
            "name",
            FilterOperator::Equals,
            FilterValue::single("2024-01-01"),
        )]);
        let decoded = decode_strict(&encode(&config)).unwrap();
        assert_eq!(
            decoded.groups[0].conditions[0].value,
            FilterValue::Single(Scalar::Text("2024-01-01".to_string()))
        );
    }

    #[test]
    fn test_incomplete_entries_are_not_encoded() {
        let mut config = sample();
        config.groups[0].conditions.push(FilterCondition::new());
        config.groups.push(FilterGroup::new());

        let decoded = decode_strict(&encode(&config)).unwrap();
        assert!(decoded.structurally_eq(&sample()));
    }

    #[test]
    fn test_garbage_token_falls_back_to_default() {
        assert!(matches!(
            decode_strict("%%% not a token"),
            Err(CodecError::InvalidEncoding(_))
        ));

        let config = decode("%%% not a token");
        assert_eq!(config.groups.len(), 1);
        assert_eq!(config.groups[0].conditions.len(), 1);
        assert!(!config.groups[0].conditions[0].is_complete());
    }

    #[test]
    fn test_valid_base64_with_bad_json_is_malformed() {
        let token = Base64UrlUnpadded::encode_string(b"{\"v\":1,\"g\":");
        assert!(matches!(
            decode_strict(&token),
            Err(CodecError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_other_schema_version_is_rejected() {
        let token = Base64UrlUnpadded::encode_string(br#"{"v":2,"g":[]}"#);
        assert_eq!(
            decode_strict(&token),
            Err(CodecError::UnsupportedVersion {
                found: 2,
                expected: SCHEMA_VERSION
            })
        );
    }

    #[test]
    fn test_empty_group_in_token_is_rejected() {
        let token = Base64UrlUnpadded::encode_string(br#"{"v":1,"g":[{"c":[],"l":"AND"}]}"#);
        assert!(matches!(
            decode_strict(&token),
            Err(CodecError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_infinite_numbers_survive_a_round_trip() {
        let config = FilterConfig::from_conditions(vec![
            FilterCondition::on(
                "annual_revenue",
                FilterOperator::GreaterThan,
                FilterValue::single(f64::INFINITY),
            ),
            FilterCondition::on(
                "annual_revenue",
                FilterOperator::Between,
                FilterValue::pair(f64::NEG_INFINITY, 1.5),
            ),
        ]);

        let decoded = decode_strict(&encode(&config)).unwrap();
        assert!(decoded.structurally_eq(&config));
    }

    #[test]
    fn test_field_is_kept_as_written() {
        let config = FilterConfig::from_conditions(vec![FilterCondition::on(
            " name",
            FilterOperator::Equals,
            FilterValue::single("Acme"),
        )]);

        let decoded = decode_strict(&encode(&config)).unwrap();
        assert_eq!(decoded.groups[0].conditions[0].field, " name");
        assert!(decoded.structurally_eq(&config));
    }

    #[test]
    fn test_every_operator_and_arity_round_trips() {
        use strum::IntoEnumIterator;

        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let later = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();

        for operator in FilterOperator::iter() {
            let values = match operator.arity() {
                ValueArity::None => vec![FilterValue::None],
                ValueArity::Single => vec![
                    FilterValue::single("Acme"),
                    FilterValue::single(42.5),
                    FilterValue::single(day),
                    FilterValue::single(true),
                ],
                ValueArity::Double => vec![
                    FilterValue::pair(1.0, 10.0),
                    FilterValue::pair(day, later),
                    FilterValue::pair("a", "m"),
                ],
            };

            for value in values {
                let config = FilterConfig::from_conditions(vec![
                    FilterCondition::on("field", operator, value.clone())
                        .with_connector(LogicalOperator::Or),
                    FilterCondition::on("other", FilterOperator::IsFalse, FilterValue::None),
                ])
                .named("every operator");

                let decoded = decode_strict(&encode(&config)).unwrap();
                assert!(decoded.structurally_eq(&config), "{operator} {value:?}");
            }
        }
    }
}
