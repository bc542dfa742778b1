use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::models::clock::iso_datetime;
use crate::models::config::Config;
use crate::models::errors::{ConversionError, ConversionResult};
use crate::models::iso20022::{
    account_id, ActiveCurrencyAndAmount, BranchAndFinancialInstitutionIdentification6, CashAccount38,
    CategoryPurpose1Choice, ClearingSystemIdentification3Choice, LocalInstrument2Choice, PartyIdentification135,
    PostalAddress24, SettlementInstruction7,
};

// ActiveCurrencyAndAmount facets
const AMOUNT_TOTAL_DIGITS: usize = 18;
const AMOUNT_FRACTION_DIGITS: u32 = 5;

/// Written in place of an end-to-end id the caller left empty.
pub const END_TO_END_PLACEHOLDER: &str = "NOTPROVIDED";

pub fn end_to_end_or_placeholder(end_to_end_id: &str) -> String {
    if end_to_end_id.trim().is_empty() {
        END_TO_END_PLACEHOLDER.to_string()
    } else {
        end_to_end_id.to_string()
    }
}

/// Optional text that is present and non-blank.
pub(crate) fn present(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub business_message_id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message_id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction_id: Option<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub end_to_end_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uetr: Option<String>,

    #[serde(default, with = "iso_datetime::option", skip_serializing_if = "Option::is_none")]
    pub creation_date_time: Option<OffsetDateTime>,
}

impl Identifier {
    /// Identifier placed in the business application header.
    pub fn header_id(&self) -> &str {
        if self.business_message_id.trim().is_empty() {
            &self.message_id
        } else {
            &self.business_message_id
        }
    }
}

/// Decimal amount and currency. The amount accepts JSON numbers or strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    #[serde(default, deserialize_with = "decimal_text")]
    pub amount: String,

    #[serde(default)]
    pub currency: String,
}

impl Amount {
    pub fn new<A: Into<String>, C: Into<String>>(amount: A, currency: C) -> Self {
        Self {
            amount: amount.into(),
            currency: currency.into(),
        }
    }

    /// Amount text rendered with exactly two fraction digits.
    pub fn rendered(&self) -> Result<String, String> {
        let text = self.amount.trim();
        if text.is_empty() {
            return Err("amount is empty".to_string());
        }
        let parsed = Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .map_err(|e| e.to_string())?;
        if parsed.normalize().scale() > AMOUNT_FRACTION_DIGITS {
            return Err(format!("more than {} fraction digits", AMOUNT_FRACTION_DIGITS));
        }

        let mut value = parsed.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        value.rescale(2);
        let digits = value.mantissa().unsigned_abs().to_string().len();
        if value.scale() != 2 || digits > AMOUNT_TOTAL_DIGITS {
            return Err(format!("more than {} total digits", AMOUNT_TOTAL_DIGITS));
        }
        Ok(value.to_string())
    }

    pub(crate) fn to_document(&self, rendered: String, config: &Config) -> ActiveCurrencyAndAmount {
        let ccy = if self.currency.trim().is_empty() {
            config.currency.clone()
        } else {
            self.currency.clone()
        };
        ActiveCurrencyAndAmount { ccy, value: rendered }
    }

    pub(crate) fn from_document(amount: &ActiveCurrencyAndAmount) -> Self {
        Self::new(amount.value.trim(), amount.ccy.clone())
    }
}

fn decimal_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    struct DecimalText;

    impl<'de> Visitor<'de> for DecimalText {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a decimal amount as a number or string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(DecimalText)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepositoryInstitution {
    #[serde(rename = "senderABANumber", default, skip_serializing_if = "String::is_empty")]
    pub sender_aba_number: String,

    #[serde(rename = "receiverABANumber", default, skip_serializing_if = "String::is_empty")]
    pub receiver_aba_number: String,

    #[serde(rename = "senderShortName", default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
}

impl DepositoryInstitution {
    pub fn sender<S: Into<String>>(routing_id: S) -> Self {
        Self {
            sender_aba_number: routing_id.into(),
            ..Self::default()
        }
    }

    pub fn receiver<S: Into<String>>(routing_id: S) -> Self {
        Self {
            receiver_aba_number: routing_id.into(),
            ..Self::default()
        }
    }

    pub fn with_short_name(mut self, name: Option<String>) -> Self {
        self.short_name = name;
        self
    }

    /// Routing id regardless of which side the record was filled for.
    pub fn routing_id(&self) -> &str {
        if self.sender_aba_number.is_empty() {
            &self.receiver_aba_number
        } else {
            &self.sender_aba_number
        }
    }

    pub(crate) fn sender_agent(&self, config: &Config, named: bool) -> BranchAndFinancialInstitutionIdentification6 {
        BranchAndFinancialInstitutionIdentification6::member(
            &self.sender_aba_number,
            &config.clearing_system_id,
            if named { present(&self.short_name) } else { None },
        )
    }

    pub(crate) fn receiver_agent(&self, config: &Config, named: bool) -> BranchAndFinancialInstitutionIdentification6 {
        BranchAndFinancialInstitutionIdentification6::member(
            &self.receiver_aba_number,
            &config.clearing_system_id,
            if named { present(&self.short_name) } else { None },
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostalAddress {
    #[serde(rename = "StreetName", default, skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,

    #[serde(rename = "BuildingNumber", default, skip_serializing_if = "Option::is_none")]
    pub building_number: Option<String>,

    #[serde(rename = "PostBox", alias = "PostalBox", default, skip_serializing_if = "Option::is_none")]
    pub post_box: Option<String>,

    #[serde(rename = "TownName", default, skip_serializing_if = "Option::is_none")]
    pub town_name: Option<String>,

    #[serde(rename = "CountrySubDivision", default, skip_serializing_if = "Option::is_none")]
    pub country_subdivision: Option<String>,

    #[serde(rename = "PostalCode", default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    #[serde(rename = "Country", default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl PostalAddress {
    /// Names of required fields that are absent or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("StreetName", &self.street_name),
            ("TownName", &self.town_name),
            ("CountrySubDivision", &self.country_subdivision),
            ("PostalCode", &self.postal_code),
            ("Country", &self.country),
        ]
        .into_iter()
        .filter(|(_, value)| present(value).is_none())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn to_document(&self) -> PostalAddress24 {
        PostalAddress24 {
            strt_nm: present(&self.street_name),
            bldg_nb: present(&self.building_number),
            pst_bx: present(&self.post_box),
            pst_cd: present(&self.postal_code),
            twn_nm: present(&self.town_name),
            ctry_sub_dvsn: present(&self.country_subdivision),
            ctry: present(&self.country),
        }
    }

    pub(crate) fn from_document(address: &PostalAddress24) -> Self {
        Self {
            street_name: address.strt_nm.clone(),
            building_number: address.bldg_nb.clone(),
            post_box: address.pst_bx.clone(),
            town_name: address.twn_nm.clone(),
            country_subdivision: address.ctry_sub_dvsn.clone(),
            postal_code: address.pst_cd.clone(),
            country: address.ctry.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Personal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub postal_address: PostalAddress,

    /// Account identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub identifier: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Party {
    #[serde(default)]
    pub personal: Personal,
}

impl Party {
    pub(crate) fn to_document(&self) -> PartyIdentification135 {
        let address = &self.personal.postal_address;
        PartyIdentification135 {
            nm: present(&self.personal.name),
            pstl_adr: (!address.is_empty()).then(|| address.to_document()),
        }
    }

    pub(crate) fn account(&self) -> Option<CashAccount38> {
        CashAccount38::other(&self.personal.identifier)
    }

    pub(crate) fn from_document(party: &PartyIdentification135, account: &Option<CashAccount38>) -> Self {
        Self {
            personal: Personal {
                name: party.nm.clone(),
                postal_address: party.pstl_adr.as_ref().map(PostalAddress::from_document).unwrap_or_default(),
                identifier: account_id(account),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_purpose: Option<String>,
}

pub(crate) fn settlement_instruction(config: &Config) -> SettlementInstruction7 {
    SettlementInstruction7 {
        sttlm_mtd: config.settlement_method.clone(),
        clr_sys: (!config.clearing_system.is_empty()).then(|| ClearingSystemIdentification3Choice {
            cd: Some(config.clearing_system.clone()),
        }),
    }
}

pub(crate) fn local_instrument(config: &Config) -> Option<LocalInstrument2Choice> {
    let cd = present(&config.local_instrument.code);
    let prtry = present(&config.local_instrument.proprietary);
    (cd.is_some() || prtry.is_some()).then_some(LocalInstrument2Choice { cd, prtry })
}

pub(crate) fn category_purpose(purpose: &Option<String>) -> Option<CategoryPurpose1Choice> {
    present(purpose).map(|prtry| CategoryPurpose1Choice { cd: None, prtry: Some(prtry) })
}

/// Collects every rule a message breaks before failing the build.
#[derive(Debug, Default)]
pub(crate) struct Violations(Vec<String>);

impl Violations {
    pub fn address(&mut self, party: &str, address: &PostalAddress) {
        for field in address.missing_fields() {
            self.0.push(format!("{} address missing {}", party, field));
        }
    }

    /// Returns the two-digit rendering, or an empty string after recording the failure.
    pub fn amount(&mut self, label: &str, amount: &Amount) -> String {
        match amount.rendered() {
            Ok(text) => text,
            Err(reason) => {
                self.0.push(format!("{} '{}' is not a valid decimal: {}", label, amount.amount, reason));
                String::new()
            }
        }
    }

    pub fn uetr(&mut self, label: &str, uetr: &Option<String>) {
        if let Some(value) = present(uetr) {
            if Uuid::parse_str(value.trim()).is_err() {
                self.0.push(format!("{} '{}' is not a UUID", label, value));
            }
        }
    }

    pub fn require(&mut self, satisfied: bool, message: &str) {
        if !satisfied {
            self.0.push(message.to_string());
        }
    }

    pub fn finish(self) -> ConversionResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            debug!(count = self.0.len(), "Message failed validation");
            Err(ConversionError::validation(self.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_render_with_two_fraction_digits() {
        assert_eq!(Amount::new("1000", "USD").rendered().unwrap(), "1000.00");
        assert_eq!(Amount::new("12.5", "USD").rendered().unwrap(), "12.50");
        assert_eq!(Amount::new("0.125", "USD").rendered().unwrap(), "0.13");
        assert!(Amount::new("ten", "USD").rendered().is_err());
        assert!(Amount::new("", "USD").rendered().is_err());
        assert_eq!(Amount::new("9999999999999999.99", "USD").rendered().unwrap(), "9999999999999999.99");
    }

    #[test]
    fn amounts_beyond_iso_digit_limits_are_rejected() {
        let too_long = Amount::new("12345678901234567890123456789", "USD").rendered().unwrap_err();
        assert!(too_long.contains("18 total digits"), "{}", too_long);
        assert!(Amount::new("10000000000000000", "USD").rendered().is_err());
        let too_fine = Amount::new("1.123456", "USD").rendered().unwrap_err();
        assert!(too_fine.contains("5 fraction digits"), "{}", too_fine);
        assert_eq!(Amount::new("1.12000000", "USD").rendered().unwrap(), "1.12");
    }

    #[test]
    fn oversized_amount_lands_in_combined_violations() {
        let mut violations = Violations::default();
        violations.amount("amount", &Amount::new("12345678901234567890123456789", "USD"));
        violations.address("originator", &PostalAddress::default());
        let err = violations.finish().unwrap_err();
        assert!(err.violations()[0].starts_with("amount '12345678901234567890123456789' is not a valid decimal"));
        assert_eq!(err.violations().len(), 6);
    }

    #[test]
    fn amounts_accept_numbers_and_strings() {
        let number: Amount = serde_json::from_str(r#"{"amount": 250.5, "currency": "USD"}"#).unwrap();
        let text: Amount = serde_json::from_str(r#"{"amount": "250.50", "currency": "USD"}"#).unwrap();
        assert_eq!(number.rendered().unwrap(), text.rendered().unwrap());
    }

    #[test]
    fn blank_address_fields_count_as_missing() {
        let address = PostalAddress {
            street_name: Some("Main St".into()),
            town_name: Some(" ".into()),
            country_subdivision: Some("NY".into()),
            ..PostalAddress::default()
        };
        assert_eq!(address.missing_fields(), vec!["TownName", "PostalCode", "Country"]);
    }

    #[test]
    fn missing_field_names_match_json_keys() {
        let json = serde_json::to_value(PostalAddress {
            street_name: Some("Main St".into()),
            town_name: Some("Albany".into()),
            country_subdivision: Some("NY".into()),
            postal_code: Some("12207".into()),
            country: Some("US".into()),
            ..PostalAddress::default()
        })
        .unwrap();
        for field in PostalAddress::default().missing_fields() {
            assert!(json.get(field).is_some(), "{} is not a JSON key", field);
        }
    }
}
