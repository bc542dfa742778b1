use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::common::{
    category_purpose, end_to_end_or_placeholder, local_instrument, present, Amount, DepositoryInstitution, Identifier,
    Party, PaymentType, PostalAddress, Violations,
};
use super::{Iso20022Message, Message};
use crate::models::clock::{iso_datetime, reference_now};
use crate::models::config::Config;
use crate::models::errors::{ConversionError, ConversionResult};
use crate::models::iso20022::head::BusinessApplicationHeaderV02;
use crate::models::iso20022::pain013::{
    AmountType4Choice, CreditTransferTransaction35, CreditorPaymentActivationRequestV07, Document, GroupHeader78,
    PaymentIdentification6, PaymentInstruction31,
};
use crate::models::iso20022::{
    document_namespace, DateAndDateTime2Choice, PartyIdentification135, PaymentTypeInformation28,
};

const CREDIT_TRANSFER_METHOD: &str = "TRF";

/// Request for payment sent by the originator's institution to the payer's.
///
/// The originator is the creditor and the beneficiary is the debtor asked to
/// pay, so the sending institution appears as the creditor agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    #[serde(default, with = "iso_datetime::option", skip_serializing_if = "Option::is_none")]
    pub creation_date_time: Option<OffsetDateTime>,

    #[serde(default)]
    pub identifier: Identifier,

    #[serde(default)]
    pub payment_type: PaymentType,

    #[serde(default)]
    pub execution_info: ExecutionInfo,

    #[serde(default)]
    pub amount: Amount,

    #[serde(rename = "senderDepositoryInstitution", default)]
    pub sender: DepositoryInstitution,

    #[serde(rename = "receiverDepositoryInstitution", default)]
    pub receiver: DepositoryInstitution,

    #[serde(default)]
    pub originator: Party,

    #[serde(default)]
    pub beneficiary: Party,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiating_party: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiating_party_address: Option<PostalAddress>,

    #[serde(default, with = "iso_datetime::option", skip_serializing_if = "Option::is_none")]
    pub execution_date: Option<OffsetDateTime>,

    #[serde(default, with = "iso_datetime::option", skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<OffsetDateTime>,
}

impl Iso20022Message for PaymentRequest {
    const KIND: &'static str = "pain.013.001.07";
    type Document = Document;

    fn business_message_id(&self) -> &str {
        self.identifier.header_id()
    }

    fn set_creation_date_time(&mut self, at: OffsetDateTime) {
        self.creation_date_time = Some(at);
    }

    fn build(&self, config: &Config) -> ConversionResult<Document> {
        let execution = &self.execution_info;

        let mut violations = Violations::default();
        violations.address("originator", &self.originator.personal.postal_address);
        violations.address("beneficiary", &self.beneficiary.personal.postal_address);
        let amount = violations.amount("amount", &self.amount);
        violations.require(execution.execution_date.is_some(), "executionInfo.executionDate is required");
        violations.uetr("uetr", &self.identifier.uetr);
        violations.finish()?;

        let lcl_instrm = local_instrument(config);
        let ctgy_purp = category_purpose(&self.payment_type.category_purpose);
        let pmt_tp_inf =
            (lcl_instrm.is_some() || ctgy_purp.is_some()).then_some(PaymentTypeInformation28 { lcl_instrm, ctgy_purp });

        let transaction = CreditTransferTransaction35 {
            pmt_id: PaymentIdentification6 {
                instr_id: present(&self.identifier.instruction_id),
                end_to_end_id: end_to_end_or_placeholder(&self.identifier.end_to_end_id),
                uetr: present(&self.identifier.uetr),
            },
            pmt_tp_inf,
            amt: AmountType4Choice {
                instd_amt: Some(self.amount.to_document(amount, config)),
            },
            chrg_br: (!config.charge_bearer.is_empty()).then(|| config.charge_bearer.clone()),
            cdtr_agt: self.sender.sender_agent(config, true),
            cdtr: self.originator.to_document(),
            cdtr_acct: self.originator.account(),
        };

        let instruction = PaymentInstruction31 {
            pmt_inf_id: present(&self.identifier.transaction_id),
            pmt_mtd: CREDIT_TRANSFER_METHOD.to_string(),
            reqd_exctn_dt: DateAndDateTime2Choice {
                dt: None,
                dt_tm: execution.execution_date,
            },
            xpry_dt: execution.expiry_date.map(|at| DateAndDateTime2Choice { dt: None, dt_tm: Some(at) }),
            dbtr: self.beneficiary.to_document(),
            dbtr_acct: self.beneficiary.account(),
            dbtr_agt: self.receiver.receiver_agent(config, true),
            cdt_trf_tx: vec![transaction],
        };

        Ok(Document {
            xmlns: document_namespace(Self::KIND),
            cdtr_pmt_actvtn_req: CreditorPaymentActivationRequestV07 {
                grp_hdr: GroupHeader78 {
                    msg_id: self.identifier.message_id.clone(),
                    cre_dt_tm: self.creation_date_time.unwrap_or_else(reference_now),
                    nb_of_txs: "1".to_string(),
                    initg_pty: PartyIdentification135 {
                        nm: present(&execution.initiating_party),
                        pstl_adr: execution
                            .initiating_party_address
                            .as_ref()
                            .filter(|address| !address.is_empty())
                            .map(PostalAddress::to_document),
                    },
                },
                pmt_inf: vec![instruction],
            },
        })
    }

    fn parse(header: &BusinessApplicationHeaderV02, document: Document) -> ConversionResult<Self> {
        let body = document.cdtr_pmt_actvtn_req;
        let instruction = body
            .pmt_inf
            .into_iter()
            .next()
            .ok_or_else(|| ConversionError::Parse("payment request carries no payment instruction".to_string()))?;
        let tx = instruction
            .cdt_trf_tx
            .into_iter()
            .next()
            .ok_or_else(|| ConversionError::Parse("payment request carries no credit transfer".to_string()))?;

        let initiating = body.grp_hdr.initg_pty;

        Ok(Self {
            creation_date_time: Some(body.grp_hdr.cre_dt_tm),
            identifier: Identifier {
                business_message_id: header.biz_msg_idr.clone(),
                message_id: body.grp_hdr.msg_id,
                message_type: header.msg_def_idr.clone(),
                instruction_id: tx.pmt_id.instr_id,
                end_to_end_id: tx.pmt_id.end_to_end_id,
                transaction_id: instruction.pmt_inf_id,
                uetr: tx.pmt_id.uetr,
                creation_date_time: Some(header.cre_dt),
            },
            payment_type: PaymentType {
                category_purpose: tx.pmt_tp_inf.as_ref().and_then(|p| p.category_purpose()),
            },
            execution_info: ExecutionInfo {
                initiating_party: initiating.nm,
                initiating_party_address: initiating.pstl_adr.as_ref().map(PostalAddress::from_document),
                execution_date: instruction.reqd_exctn_dt.dt_tm,
                expiry_date: instruction.xpry_dt.and_then(|expiry| expiry.dt_tm),
            },
            amount: tx.amt.instd_amt.as_ref().map(Amount::from_document).unwrap_or_default(),
            sender: DepositoryInstitution::sender(tx.cdtr_agt.member_id()).with_short_name(tx.cdtr_agt.name()),
            receiver: DepositoryInstitution::receiver(instruction.dbtr_agt.member_id())
                .with_short_name(instruction.dbtr_agt.name()),
            originator: Party::from_document(&tx.cdtr, &tx.cdtr_acct),
            beneficiary: Party::from_document(&instruction.dbtr, &instruction.dbtr_acct),
        })
    }

    fn into_message(self) -> Message {
        Message::PaymentRequest(self)
    }

    fn from_message(message: Message) -> Result<Self, Message> {
        match message {
            Message::PaymentRequest(m) => Ok(m),
            other => Err(other),
        }
    }
}
