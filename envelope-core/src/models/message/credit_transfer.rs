use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::common::{
    category_purpose, end_to_end_or_placeholder, local_instrument, present, settlement_instruction, Amount,
    DepositoryInstitution, Identifier, Party, PaymentType, Violations,
};
use super::{Iso20022Message, Message};
use crate::models::clock::{iso_datetime, reference_now};
use crate::models::config::Config;
use crate::models::errors::{ConversionError, ConversionResult};
use crate::models::iso20022::head::BusinessApplicationHeaderV02;
use crate::models::iso20022::pacs008::{
    CreditTransferTransaction39, Document, FIToFICustomerCreditTransferV08, GroupHeader93, PaymentIdentification7,
};
use crate::models::iso20022::{document_namespace, PaymentTypeInformation28};

/// Customer credit transfer between two depository institutions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditTransfer {
    #[serde(default, with = "iso_datetime::option", skip_serializing_if = "Option::is_none")]
    pub creation_date_time: Option<OffsetDateTime>,

    #[serde(default)]
    pub identifier: Identifier,

    #[serde(default)]
    pub payment_type: PaymentType,

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

impl Iso20022Message for CreditTransfer {
    const KIND: &'static str = "pacs.008.001.08";
    type Document = Document;

    fn business_message_id(&self) -> &str {
        self.identifier.header_id()
    }

    fn set_creation_date_time(&mut self, at: OffsetDateTime) {
        self.creation_date_time = Some(at);
    }

    fn build(&self, config: &Config) -> ConversionResult<Document> {
        let mut violations = Violations::default();
        violations.address("originator", &self.originator.personal.postal_address);
        violations.address("beneficiary", &self.beneficiary.personal.postal_address);
        let amount = violations.amount("amount", &self.amount);
        violations.uetr("uetr", &self.identifier.uetr);
        violations.finish()?;

        let created = self.creation_date_time.unwrap_or_else(reference_now);
        let lcl_instrm = local_instrument(config);
        let ctgy_purp = category_purpose(&self.payment_type.category_purpose);
        let pmt_tp_inf =
            (lcl_instrm.is_some() || ctgy_purp.is_some()).then_some(PaymentTypeInformation28 { lcl_instrm, ctgy_purp });

        let transaction = CreditTransferTransaction39 {
            pmt_id: PaymentIdentification7 {
                instr_id: present(&self.identifier.instruction_id),
                end_to_end_id: end_to_end_or_placeholder(&self.identifier.end_to_end_id),
                tx_id: present(&self.identifier.transaction_id),
                uetr: present(&self.identifier.uetr),
            },
            pmt_tp_inf,
            intr_bk_sttlm_amt: self.amount.to_document(amount, config),
            intr_bk_sttlm_dt: Some(created.date()),
            chrg_br: config.charge_bearer.clone(),
            instg_agt: Some(self.sender.sender_agent(config, false)),
            instd_agt: Some(self.receiver.receiver_agent(config, false)),
            dbtr: self.originator.to_document(),
            dbtr_acct: self.originator.account(),
            dbtr_agt: self.sender.sender_agent(config, true),
            cdtr_agt: self.receiver.receiver_agent(config, true),
            cdtr: self.beneficiary.to_document(),
            cdtr_acct: self.beneficiary.account(),
        };

        Ok(Document {
            xmlns: document_namespace(Self::KIND),
            fi_to_fi_cstmr_cdt_trf: FIToFICustomerCreditTransferV08 {
                grp_hdr: GroupHeader93 {
                    msg_id: self.identifier.message_id.clone(),
                    cre_dt_tm: created,
                    nb_of_txs: "1".to_string(),
                    sttlm_inf: settlement_instruction(config),
                },
                cdt_trf_tx_inf: vec![transaction],
            },
        })
    }

    fn parse(header: &BusinessApplicationHeaderV02, document: Document) -> ConversionResult<Self> {
        let body = document.fi_to_fi_cstmr_cdt_trf;
        let tx = body
            .cdt_trf_tx_inf
            .into_iter()
            .next()
            .ok_or_else(|| ConversionError::Parse("credit transfer carries no transaction".to_string()))?;

        let sender_id = tx.instg_agt.as_ref().map(|a| a.member_id()).unwrap_or_else(|| tx.dbtr_agt.member_id());
        let receiver_id = tx.instd_agt.as_ref().map(|a| a.member_id()).unwrap_or_else(|| tx.cdtr_agt.member_id());

        Ok(Self {
            creation_date_time: Some(body.grp_hdr.cre_dt_tm),
            identifier: Identifier {
                business_message_id: header.biz_msg_idr.clone(),
                message_id: body.grp_hdr.msg_id,
                message_type: header.msg_def_idr.clone(),
                instruction_id: tx.pmt_id.instr_id,
                end_to_end_id: tx.pmt_id.end_to_end_id,
                transaction_id: tx.pmt_id.tx_id,
                uetr: tx.pmt_id.uetr,
                creation_date_time: Some(header.cre_dt),
            },
            payment_type: PaymentType {
                category_purpose: tx.pmt_tp_inf.as_ref().and_then(|p| p.category_purpose()),
            },
            amount: Amount::from_document(&tx.intr_bk_sttlm_amt),
            sender: DepositoryInstitution::sender(sender_id).with_short_name(tx.dbtr_agt.name()),
            receiver: DepositoryInstitution::receiver(receiver_id).with_short_name(tx.cdtr_agt.name()),
            originator: Party::from_document(&tx.dbtr, &tx.dbtr_acct),
            beneficiary: Party::from_document(&tx.cdtr, &tx.cdtr_acct),
        })
    }

    fn into_message(self) -> Message {
        Message::CreditTransfer(self)
    }

    fn from_message(message: Message) -> Result<Self, Message> {
        match message {
            Message::CreditTransfer(m) => Ok(m),
            other => Err(other),
        }
    }
}
