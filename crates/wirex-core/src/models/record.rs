//! Wire advice record model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;
use crate::wire::patterns::{Coercion, ContextField, GeneralField};

/// Structured data extracted from one wire-transfer advice.
///
/// General fields are always serialized (as `null` when absent). Originator
/// and beneficiary fields only appear once something populated them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireRecord {
    pub environment: Option<String>,
    pub aba: Option<String>,
    pub mode: Option<String>,
    pub service_unit: Option<String>,
    pub cycle_date: Option<String>,
    #[serde(rename = "system_date/time")]
    pub system_date_time: Option<String>,
    pub status: Option<String>,
    pub message_type: Option<String>,
    pub create_time: Option<String>,
    #[serde(rename = "test/prod")]
    pub test_prod: Option<String>,
    pub imad: Option<String>,
    pub omad: Option<String>,
    pub sender_aba: Option<String>,
    pub sender_name: Option<String>,
    pub receiver_aba: Option<String>,
    pub receiver_name: Option<String>,
    /// Transfer amount.
    pub amount: Option<f64>,
    #[serde(rename = "type/subtype_code")]
    pub type_subtype_code: Option<String>,
    pub business_function: Option<String>,
    pub sender_reference: Option<String>,
    pub reference_for_beneficiary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub originator_id_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub originator_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub originator_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub originator_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub originator_to_beneficiary_information_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beneficiary_id_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beneficiary_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beneficiary_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beneficiary_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beneficiary_information_text: Option<String>,
}

/// A single record value as seen by output formatters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Parse a captured amount. Only finite decimal numbers are accepted.
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}

impl WireRecord {
    /// Create an empty record (all general fields null).
    pub fn new() -> Self {
        Self::default()
    }

    fn general_slot(&mut self, field: GeneralField) -> Option<&mut Option<String>> {
        use GeneralField::*;
        let slot = match field {
            Environment => &mut self.environment,
            Aba => &mut self.aba,
            Mode => &mut self.mode,
            ServiceUnit => &mut self.service_unit,
            CycleDate => &mut self.cycle_date,
            SystemDateTime => &mut self.system_date_time,
            Status => &mut self.status,
            MessageType => &mut self.message_type,
            CreateTime => &mut self.create_time,
            TestProd => &mut self.test_prod,
            Imad => &mut self.imad,
            Omad => &mut self.omad,
            SenderAba => &mut self.sender_aba,
            SenderName => &mut self.sender_name,
            ReceiverAba => &mut self.receiver_aba,
            ReceiverName => &mut self.receiver_name,
            Amount => return None,
            TypeSubtypeCode => &mut self.type_subtype_code,
            BusinessFunction => &mut self.business_function,
            SenderReference => &mut self.sender_reference,
            ReferenceForBeneficiary => &mut self.reference_for_beneficiary,
        };
        Some(slot)
    }

    fn context_slot(&mut self, field: ContextField) -> &mut Option<String> {
        use ContextField::*;
        match field {
            OriginatorIdCode => &mut self.originator_id_code,
            OriginatorIdentifier => &mut self.originator_identifier,
            OriginatorName => &mut self.originator_name,
            OriginatorAddress => &mut self.originator_address,
            OriginatorToBeneficiaryInformationText => {
                &mut self.originator_to_beneficiary_information_text
            }
            BeneficiaryIdCode => &mut self.beneficiary_id_code,
            BeneficiaryIdentifier => &mut self.beneficiary_identifier,
            BeneficiaryName => &mut self.beneficiary_name,
            BeneficiaryAddress => &mut self.beneficiary_address,
            BeneficiaryInformationText => &mut self.beneficiary_information_text,
        }
    }

    /// Store a captured general value, overwriting any earlier one.
    ///
    /// Numeric fields are coerced here; a capture that is not a number fails
    /// with [`ExtractionError::Parse`] rather than being dropped.
    pub fn set_general(&mut self, field: GeneralField, raw: &str) -> Result<(), ExtractionError> {
        match field.coercion() {
            Coercion::Float => {
                let value = parse_amount(raw).ok_or_else(|| ExtractionError::Parse {
                    field: field.name().to_string(),
                    value: raw.to_string(),
                })?;
                self.amount = Some(value);
            }
            Coercion::Text => {
                if let Some(slot) = self.general_slot(field) {
                    *slot = Some(raw.to_string());
                }
            }
        }
        Ok(())
    }

    /// Store a captured originator/beneficiary value.
    pub fn set_context(&mut self, field: ContextField, raw: &str) {
        *self.context_slot(field) = Some(raw.to_string());
    }

    /// Value of a general field, if present.
    pub fn general(&self, field: GeneralField) -> Option<FieldValue> {
        use GeneralField::*;
        let text = match field {
            Amount => return self.amount.map(FieldValue::Number),
            Environment => &self.environment,
            Aba => &self.aba,
            Mode => &self.mode,
            ServiceUnit => &self.service_unit,
            CycleDate => &self.cycle_date,
            SystemDateTime => &self.system_date_time,
            Status => &self.status,
            MessageType => &self.message_type,
            CreateTime => &self.create_time,
            TestProd => &self.test_prod,
            Imad => &self.imad,
            Omad => &self.omad,
            SenderAba => &self.sender_aba,
            SenderName => &self.sender_name,
            ReceiverAba => &self.receiver_aba,
            ReceiverName => &self.receiver_name,
            TypeSubtypeCode => &self.type_subtype_code,
            BusinessFunction => &self.business_function,
            SenderReference => &self.sender_reference,
            ReferenceForBeneficiary => &self.reference_for_beneficiary,
        };
        text.clone().map(FieldValue::Text)
    }

    /// Value of a contextual field, if it was ever matched.
    pub fn context(&self, field: ContextField) -> Option<&str> {
        use ContextField::*;
        let slot = match field {
            OriginatorIdCode => &self.originator_id_code,
            OriginatorIdentifier => &self.originator_identifier,
            OriginatorName => &self.originator_name,
            OriginatorAddress => &self.originator_address,
            OriginatorToBeneficiaryInformationText => {
                &self.originator_to_beneficiary_information_text
            }
            BeneficiaryIdCode => &self.beneficiary_id_code,
            BeneficiaryIdentifier => &self.beneficiary_identifier,
            BeneficiaryName => &self.beneficiary_name,
            BeneficiaryAddress => &self.beneficiary_address,
            BeneficiaryInformationText => &self.beneficiary_information_text,
        };
        slot.as_deref()
    }

    /// Look a value up by its output key (e.g. `"test/prod"`).
    pub fn get(&self, key: &str) -> Option<FieldValue> {
        if let Some(field) = GeneralField::ALL.iter().find(|f| f.name() == key) {
            return self.general(*field);
        }
        ContextField::ALL
            .iter()
            .find(|f| f.name() == key)
            .and_then(|f| self.context(*f))
            .map(|s| FieldValue::Text(s.to_string()))
    }

    /// Output keys of general fields that are null.
    pub fn missing_general_fields(&self) -> Vec<&'static str> {
        GeneralField::ALL
            .iter()
            .filter(|f| self.general(**f).is_none())
            .map(|f| f.name())
            .collect()
    }

    /// Contextual fields that were populated, in declaration order.
    pub fn context_fields(&self) -> Vec<(&'static str, &str)> {
        ContextField::ALL
            .iter()
            .filter_map(|f| self.context(*f).map(|v| (f.name(), v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_record_serializes_all_general_keys() {
        let json = serde_json::to_value(WireRecord::new()).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), 21);
        for field in GeneralField::ALL {
            assert_eq!(obj.get(field.name()), Some(&serde_json::Value::Null));
        }
        for field in ContextField::ALL {
            assert!(!obj.contains_key(field.name()));
        }
    }

    #[test]
    fn test_context_key_appears_once_set() {
        let mut record = WireRecord::new();
        record.set_context(ContextField::BeneficiaryName, "JANE ROE");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["beneficiary_name"], "JANE ROE");
        assert!(json.get("originator_name").is_none());
    }

    #[test]
    fn test_set_general_overwrites() {
        let mut record = WireRecord::new();
        record.set_general(GeneralField::Status, "PENDING").unwrap();
        record.set_general(GeneralField::Status, "COMPLETE").unwrap();
        assert_eq!(record.status.as_deref(), Some("COMPLETE"));
    }

    #[test]
    fn test_amount_coercion() {
        let mut record = WireRecord::new();
        record.set_general(GeneralField::Amount, "1500.00").unwrap();
        assert_eq!(record.amount, Some(1500.0));
        assert_eq!(record.get("amount"), Some(FieldValue::Number(1500.0)));

        let err = record.set_general(GeneralField::Amount, "ABC").unwrap_err();
        assert_eq!(
            err,
            ExtractionError::Parse {
                field: "amount".to_string(),
                value: "ABC".to_string(),
            }
        );
        // failed coercion leaves the previous value untouched
        assert_eq!(record.amount, Some(1500.0));
    }

    #[test]
    fn test_parse_amount_rejects_non_finite() {
        assert_eq!(parse_amount("250.50"), Some(250.5));
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("1,500.00"), None);
        assert_eq!(parse_amount("1.2.3"), None);
    }

    #[test]
    fn test_get_by_slashed_key() {
        let mut record = WireRecord::new();
        record.set_general(GeneralField::TestProd, "PROD").unwrap();
        assert_eq!(record.get("test/prod"), Some(FieldValue::Text("PROD".to_string())));
        assert_eq!(record.get("no_such_field"), None);
    }

    #[test]
    fn test_missing_general_fields() {
        let mut record = WireRecord::new();
        assert_eq!(record.missing_general_fields().len(), 21);

        record.set_general(GeneralField::Imad, "20240115QMGFT001").unwrap();
        record.set_general(GeneralField::Amount, "1.00").unwrap();
        let missing = record.missing_general_fields();
        assert_eq!(missing.len(), 19);
        assert!(!missing.contains(&"imad"));
        assert!(!missing.contains(&"amount"));
    }

    #[test]
    fn test_field_value_display() {
        assert_eq!(FieldValue::Number(250.5).to_string(), "250.5");
        assert_eq!(FieldValue::Number(1234.567).to_string(), "1234.567");
        assert_eq!(FieldValue::Number(100.0).to_string(), "100");
        assert_eq!(FieldValue::Text("PROD".to_string()).to_string(), "PROD");
    }
}
