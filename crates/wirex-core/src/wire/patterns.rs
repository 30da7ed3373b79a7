//! Field pattern catalog for wire-transfer advices.
//!
//! Every rule is anchored on the literal label printed on the advice, so an
//! incidental substring elsewhere on a line cannot populate a field.

use lazy_static::lazy_static;
use regex::Regex;

/// Section-independent fields, in catalog declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneralField {
    Environment,
    Aba,
    Mode,
    ServiceUnit,
    CycleDate,
    SystemDateTime,
    Status,
    MessageType,
    CreateTime,
    TestProd,
    Imad,
    Omad,
    SenderAba,
    SenderName,
    ReceiverAba,
    ReceiverName,
    Amount,
    TypeSubtypeCode,
    BusinessFunction,
    SenderReference,
    ReferenceForBeneficiary,
}

impl GeneralField {
    /// All general fields, in declaration order.
    pub const ALL: [GeneralField; 21] = [
        GeneralField::Environment,
        GeneralField::Aba,
        GeneralField::Mode,
        GeneralField::ServiceUnit,
        GeneralField::CycleDate,
        GeneralField::SystemDateTime,
        GeneralField::Status,
        GeneralField::MessageType,
        GeneralField::CreateTime,
        GeneralField::TestProd,
        GeneralField::Imad,
        GeneralField::Omad,
        GeneralField::SenderAba,
        GeneralField::SenderName,
        GeneralField::ReceiverAba,
        GeneralField::ReceiverName,
        GeneralField::Amount,
        GeneralField::TypeSubtypeCode,
        GeneralField::BusinessFunction,
        GeneralField::SenderReference,
        GeneralField::ReferenceForBeneficiary,
    ];

    /// Output key of the field.
    pub fn name(self) -> &'static str {
        match self {
            Self::Environment => "environment",
            Self::Aba => "aba",
            Self::Mode => "mode",
            Self::ServiceUnit => "service_unit",
            Self::CycleDate => "cycle_date",
            Self::SystemDateTime => "system_date/time",
            Self::Status => "status",
            Self::MessageType => "message_type",
            Self::CreateTime => "create_time",
            Self::TestProd => "test/prod",
            Self::Imad => "imad",
            Self::Omad => "omad",
            Self::SenderAba => "sender_aba",
            Self::SenderName => "sender_name",
            Self::ReceiverAba => "receiver_aba",
            Self::ReceiverName => "receiver_name",
            Self::Amount => "amount",
            Self::TypeSubtypeCode => "type/subtype_code",
            Self::BusinessFunction => "business_function",
            Self::SenderReference => "sender_reference",
            Self::ReferenceForBeneficiary => "reference_for_beneficiary",
        }
    }

    /// How a captured value is stored in the record.
    pub fn coercion(self) -> Coercion {
        match self {
            Self::Amount => Coercion::Float,
            _ => Coercion::Text,
        }
    }
}

/// Fields whose label is shared between the originator and beneficiary blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextField {
    OriginatorIdCode,
    OriginatorIdentifier,
    OriginatorName,
    OriginatorAddress,
    OriginatorToBeneficiaryInformationText,
    BeneficiaryIdCode,
    BeneficiaryIdentifier,
    BeneficiaryName,
    BeneficiaryAddress,
    BeneficiaryInformationText,
}

impl ContextField {
    pub const ALL: [ContextField; 10] = [
        ContextField::OriginatorIdCode,
        ContextField::OriginatorIdentifier,
        ContextField::OriginatorName,
        ContextField::OriginatorAddress,
        ContextField::OriginatorToBeneficiaryInformationText,
        ContextField::BeneficiaryIdCode,
        ContextField::BeneficiaryIdentifier,
        ContextField::BeneficiaryName,
        ContextField::BeneficiaryAddress,
        ContextField::BeneficiaryInformationText,
    ];

    /// Output key of the field.
    pub fn name(self) -> &'static str {
        match self {
            Self::OriginatorIdCode => "originator_id_code",
            Self::OriginatorIdentifier => "originator_identifier",
            Self::OriginatorName => "originator_name",
            Self::OriginatorAddress => "originator_address",
            Self::OriginatorToBeneficiaryInformationText => {
                "originator_to_beneficiary_information_text"
            }
            Self::BeneficiaryIdCode => "beneficiary_id_code",
            Self::BeneficiaryIdentifier => "beneficiary_identifier",
            Self::BeneficiaryName => "beneficiary_name",
            Self::BeneficiaryAddress => "beneficiary_address",
            Self::BeneficiaryInformationText => "beneficiary_information_text",
        }
    }
}

/// Type conversion applied to a capture when it is merged into the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    Text,
    Float,
}

/// A single field declaration: which field, how to find it on a line.
#[derive(Debug, Clone)]
pub struct FieldRule<F> {
    /// Field populated by this rule.
    pub field: F,
    /// Label-anchored pattern.
    pub pattern: Regex,
    /// Capture group holding the value.
    pub group: usize,
}

impl<F: Copy> FieldRule<F> {
    fn new(field: F, pattern: &str) -> Self {
        Self::with_group(field, pattern, 1)
    }

    fn with_group(field: F, pattern: &str, group: usize) -> Self {
        Self {
            field,
            pattern: Regex::new(pattern).unwrap(),
            group,
        }
    }
}

/// Apply a rule to one line.
///
/// Returns the captured value with surrounding whitespace removed, or `None`
/// when the rule does not match. A whitespace-only capture is still a match
/// and yields an empty value.
pub fn match_field<'a, F>(rule: &FieldRule<F>, line: &'a str) -> Option<&'a str> {
    rule.pattern
        .captures(line)
        .and_then(|caps| caps.get(rule.group))
        .map(|m| m.as_str().trim())
}

/// The three fixed field tables.
#[derive(Debug)]
pub struct PatternCatalog {
    /// Fields tried on every line.
    pub general: Vec<FieldRule<GeneralField>>,
    /// Fields tried while inside an originator block.
    pub originator: Vec<FieldRule<ContextField>>,
    /// Fields tried while inside a beneficiary block.
    pub beneficiary: Vec<FieldRule<ContextField>>,
}

lazy_static! {
    static ref STANDARD_CATALOG: PatternCatalog = PatternCatalog::build();
}

impl PatternCatalog {
    /// The compiled-in catalog, built once per process.
    pub fn standard() -> &'static PatternCatalog {
        &STANDARD_CATALOG
    }

    fn build() -> Self {
        use ContextField::*;
        use GeneralField::*;

        let general = vec![
            FieldRule::new(Environment, r"Environment:\s+([\w\-]+)"),
            FieldRule::new(Aba, r"ABA:\s+(\d+)"),
            FieldRule::new(Mode, r"Mode:\s+([\w\-]+)"),
            FieldRule::new(ServiceUnit, r"Service Unit:\s+(\d+)"),
            FieldRule::new(CycleDate, r"Cycle Date:\s+([\d/]+)"),
            FieldRule::new(SystemDateTime, r"System Date/Time:\s+([\d/: ]+)"),
            FieldRule::new(Status, r"Status:\s+([\w\-]+)"),
            FieldRule::new(MessageType, r"Message Type:\s+([\w\-]+)"),
            FieldRule::new(CreateTime, r"Create Time:\s+([\d/: ]+)"),
            FieldRule::new(TestProd, r"Test/Prod:\s+([\w\-]+)"),
            FieldRule::new(Imad, r"IMAD:\s+([\w ]+)"),
            FieldRule::new(Omad, r"OMAD:\s+([\w ]+)"),
            FieldRule::new(SenderAba, r"Sender ABA \{\d+\}:\s+(\d+)"),
            FieldRule::with_group(SenderName, r"Sender ABA \{\d+\}:\s+(\d+)\s+([\w &]+)", 2),
            FieldRule::new(ReceiverAba, r"Receiver ABA \{\d+\}:\s+(\d+)"),
            FieldRule::with_group(ReceiverName, r"Receiver ABA \{\d+\}:\s+(\d+)\s+([\w &]+)", 2),
            // whole token, so malformed amounts fail coercion instead of truncating
            FieldRule::new(Amount, r"Amount \{\d+\}:\s+(\S+)"),
            FieldRule::new(TypeSubtypeCode, r"Type/Subtype Code \{\d+\}:\s+([\w \-]+)"),
            FieldRule::new(BusinessFunction, r"Business Function \{\d+\}:\s+([\w \-]+)"),
            FieldRule::new(SenderReference, r"Sender Reference \{\d+\}:\s+([\w+()]+)"),
            FieldRule::new(
                ReferenceForBeneficiary,
                r"Reference for Beneficiary \{\d+\}:\s+([\w+()]+)",
            ),
        ];

        let originator = context_table([
            OriginatorIdCode,
            OriginatorIdentifier,
            OriginatorName,
            OriginatorAddress,
            OriginatorToBeneficiaryInformationText,
        ]);

        let beneficiary = context_table([
            BeneficiaryIdCode,
            BeneficiaryIdentifier,
            BeneficiaryName,
            BeneficiaryAddress,
            BeneficiaryInformationText,
        ]);

        Self {
            general,
            originator,
            beneficiary,
        }
    }
}

/// Both contextual tables share labels; only the target fields differ.
fn context_table(fields: [ContextField; 5]) -> Vec<FieldRule<ContextField>> {
    const LABELS: [&str; 5] = [
        r"ID Code[:\s]+([\w \-]+)",
        r"Identifier[:\s]+(\w+)",
        r"Name[:\s]+([\w ]+)",
        r"Address[:\s]+(.+)",
        r"Text[:\s]+([\w ]+)",
    ];

    fields
        .into_iter()
        .zip(LABELS)
        .map(|(field, pattern)| FieldRule::new(field, pattern))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn general_rule(field: GeneralField) -> &'static FieldRule<GeneralField> {
        PatternCatalog::standard()
            .general
            .iter()
            .find(|rule| rule.field == field)
            .unwrap()
    }

    #[test]
    fn test_catalog_sizes() {
        let catalog = PatternCatalog::standard();
        assert_eq!(catalog.general.len(), 21);
        assert_eq!(catalog.originator.len(), 5);
        assert_eq!(catalog.beneficiary.len(), 5);
    }

    #[test]
    fn test_general_table_follows_declaration_order() {
        let fields: Vec<_> = PatternCatalog::standard()
            .general
            .iter()
            .map(|rule| rule.field)
            .collect();
        assert_eq!(fields, GeneralField::ALL.to_vec());
    }

    #[test]
    fn test_context_tables_share_labels() {
        let catalog = PatternCatalog::standard();
        for (orig, bene) in catalog.originator.iter().zip(&catalog.beneficiary) {
            assert_eq!(orig.pattern.as_str(), bene.pattern.as_str());
            assert_ne!(orig.field.name(), bene.field.name());
        }
    }

    #[test]
    fn test_match_field_label_anchored() {
        let rule = general_rule(GeneralField::Aba);
        assert_eq!(match_field(rule, "ABA: 021000021"), Some("021000021"));
        assert_eq!(match_field(rule, "Sender ABA {3100}: 021000021"), None);
        assert_eq!(match_field(rule, "021000021"), None);
    }

    #[test]
    fn test_match_field_sender_name_group() {
        let rule = general_rule(GeneralField::SenderName);
        assert_eq!(
            match_field(rule, "Sender ABA {3100}: 021000021 JPMORGAN CHASE & CO"),
            Some("JPMORGAN CHASE & CO")
        );
        let aba = general_rule(GeneralField::SenderAba);
        assert_eq!(
            match_field(aba, "Sender ABA {3100}: 021000021 JPMORGAN CHASE & CO"),
            Some("021000021")
        );
    }

    #[test]
    fn test_match_field_trims_capture() {
        let rule = general_rule(GeneralField::CreateTime);
        assert_eq!(
            match_field(rule, "Create Time: 01/15/2024 10:32:05 EST"),
            Some("01/15/2024 10:32:05")
        );
    }

    #[test]
    fn test_match_field_whitespace_capture_is_empty_match() {
        let rule = &PatternCatalog::standard().originator[2];
        assert_eq!(rule.field, ContextField::OriginatorName);
        assert_eq!(match_field(rule, "Name: ,Text: X"), Some(""));
    }

    #[test]
    fn test_amount_captures_whole_token() {
        let rule = general_rule(GeneralField::Amount);
        assert_eq!(match_field(rule, "Amount {2000}: 1500.00"), Some("1500.00"));
        assert_eq!(match_field(rule, "Amount {2000}: ABC"), Some("ABC"));
        assert_eq!(GeneralField::Amount.coercion(), Coercion::Float);
        assert_eq!(GeneralField::Status.coercion(), Coercion::Text);
    }

    #[test]
    fn test_references_allow_plus_and_parens() {
        let rule = general_rule(GeneralField::SenderReference);
        assert_eq!(
            match_field(rule, "Sender Reference {3320}: REF+(2024)01"),
            Some("REF+(2024)01")
        );
    }

    #[test]
    fn test_field_names_unique() {
        let mut names: Vec<&str> = GeneralField::ALL.iter().map(|f| f.name()).collect();
        names.extend(ContextField::ALL.iter().map(|f| f.name()));
        let count = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), count);
    }
}
