use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::common::{
    end_to_end_or_placeholder, local_instrument, present, settlement_instruction, Amount, DepositoryInstitution,
    Identifier, Party, Violations,
};
use super::{Iso20022Message, Message};
use crate::models::clock::{iso_datetime, reference_now};
use crate::models::config::Config;
use crate::models::errors::{ConversionError, ConversionResult};
use crate::models::iso20022::head::BusinessApplicationHeaderV02;
use crate::models::iso20022::pacs004::{
    Document, GroupHeader90, OriginalTransactionReference32, PaymentReturnReason6, PaymentReturnV10,
    PaymentTransaction118, PaymentTypeInformation27, ReturnReason5Choice, TransactionParties8,
};
use crate::models::iso20022::{
    agent_member_id, document_namespace, OriginalGroupInformation29, Party40Choice, PartyIdentification135,
};

/// Return of funds from a settled credit transfer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReturn {
    #[serde(default, with = "iso_datetime::option", skip_serializing_if = "Option::is_none")]
    pub creation_date_time: Option<OffsetDateTime>,

    #[serde(default)]
    pub identifier: Identifier,

    #[serde(default)]
    pub original_identifier: Identifier,

    /// Amount of the original transfer.
    #[serde(default)]
    pub amount: Amount,

    #[serde(default)]
    pub payment_return: ReturnDetails,

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
pub struct ReturnDetails {
    #[serde(default)]
    pub return_reason: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_information: Option<String>,

    #[serde(default)]
    pub returned_amount: Amount,
}

impl Iso20022Message for PaymentReturn {
    const KIND: &'static str = "pacs.004.001.10";
    type Document = Document;

    fn business_message_id(&self) -> &str {
        self.identifier.header_id()
    }

    fn set_creation_date_time(&mut self, at: OffsetDateTime) {
        self.creation_date_time = Some(at);
    }

    fn build(&self, config: &Config) -> ConversionResult<Document> {
        let details = &self.payment_return;

        let mut violations = Violations::default();
        violations.address("originator", &self.originator.personal.postal_address);
        violations.address("beneficiary", &self.beneficiary.personal.postal_address);
        let original_amount = violations.amount("amount", &self.amount);
        let returned_amount = violations.amount("paymentReturn.returnedAmount", &details.returned_amount);
        violations.require(!details.return_reason.trim().is_empty(), "paymentReturn.returnReason is required");
        violations.uetr("originalIdentifier.uetr", &self.original_identifier.uetr);
        violations.finish()?;

        let created = self.creation_date_time.unwrap_or_else(reference_now);
        let original = &self.original_identifier;

        let transaction = PaymentTransaction118 {
            rtr_id: present(&self.identifier.transaction_id),
            orgnl_grp_inf: Some(OriginalGroupInformation29 {
                orgnl_msg_id: original.message_id.clone(),
                orgnl_msg_nm_id: original.message_type.clone(),
                orgnl_cre_dt_tm: original.creation_date_time,
            }),
            orgnl_instr_id: present(&original.instruction_id),
            orgnl_end_to_end_id: Some(end_to_end_or_placeholder(&original.end_to_end_id)),
            orgnl_tx_id: present(&original.transaction_id),
            orgnl_uetr: present(&original.uetr),
            orgnl_intr_bk_sttlm_amt: Some(self.amount.to_document(original_amount, config)),
            orgnl_intr_bk_sttlm_dt: original.creation_date_time.map(|at| at.date()),
            rtrd_intr_bk_sttlm_amt: details.returned_amount.to_document(returned_amount, config),
            intr_bk_sttlm_dt: Some(created.date()),
            chrg_br: (!config.charge_bearer.is_empty()).then(|| config.charge_bearer.clone()),
            instg_agt: Some(self.sender.sender_agent(config, false)),
            instd_agt: Some(self.receiver.receiver_agent(config, false)),
            rtr_chain: Some(TransactionParties8 {
                dbtr: Party40Choice::party(self.originator.to_document()),
                dbtr_acct: self.originator.account(),
                dbtr_agt: Some(self.sender.sender_agent(config, true)),
                cdtr_agt: Some(self.receiver.receiver_agent(config, true)),
                cdtr: Party40Choice::party(self.beneficiary.to_document()),
                cdtr_acct: self.beneficiary.account(),
            }),
            rtr_rsn_inf: vec![PaymentReturnReason6 {
                rsn: Some(ReturnReason5Choice {
                    cd: Some(details.return_reason.trim().to_string()),
                    prtry: None,
                }),
                addtl_inf: present(&details.additional_information).into_iter().collect(),
            }],
            orgnl_tx_ref: local_instrument(config).map(|instrument| OriginalTransactionReference32 {
                pmt_tp_inf: Some(PaymentTypeInformation27 {
                    lcl_instrm: Some(instrument),
                }),
            }),
        };

        Ok(Document {
            xmlns: document_namespace(Self::KIND),
            pmt_rtr: PaymentReturnV10 {
                grp_hdr: GroupHeader90 {
                    msg_id: self.identifier.message_id.clone(),
                    cre_dt_tm: created,
                    nb_of_txs: "1".to_string(),
                    sttlm_inf: settlement_instruction(config),
                },
                tx_inf: vec![transaction],
            },
        })
    }

    fn parse(header: &BusinessApplicationHeaderV02, document: Document) -> ConversionResult<Self> {
        let body = document.pmt_rtr;
        let tx = body
            .tx_inf
            .into_iter()
            .next()
            .ok_or_else(|| ConversionError::Parse("payment return carries no transaction".to_string()))?;

        let chain = tx.rtr_chain.unwrap_or_default();
        let original_group = tx.orgnl_grp_inf.unwrap_or_default();
        let reason = tx.rtr_rsn_inf.into_iter().next().unwrap_or_default();

        let mut sender_id = agent_member_id(&tx.instg_agt);
        if sender_id.is_empty() {
            sender_id = agent_member_id(&chain.dbtr_agt);
        }
        let mut receiver_id = agent_member_id(&tx.instd_agt);
        if receiver_id.is_empty() {
            receiver_id = agent_member_id(&chain.cdtr_agt);
        }

        Ok(Self {
            creation_date_time: Some(body.grp_hdr.cre_dt_tm),
            identifier: Identifier {
                business_message_id: header.biz_msg_idr.clone(),
                message_id: body.grp_hdr.msg_id,
                message_type: header.msg_def_idr.clone(),
                transaction_id: tx.rtr_id,
                creation_date_time: Some(header.cre_dt),
                ..Identifier::default()
            },
            original_identifier: Identifier {
                message_id: original_group.orgnl_msg_id,
                message_type: original_group.orgnl_msg_nm_id,
                instruction_id: tx.orgnl_instr_id,
                end_to_end_id: tx.orgnl_end_to_end_id.unwrap_or_default(),
                transaction_id: tx.orgnl_tx_id,
                uetr: tx.orgnl_uetr,
                creation_date_time: original_group.orgnl_cre_dt_tm,
                ..Identifier::default()
            },
            amount: tx.orgnl_intr_bk_sttlm_amt.as_ref().map(Amount::from_document).unwrap_or_default(),
            payment_return: ReturnDetails {
                return_reason: reason.rsn.and_then(|r| r.cd.or(r.prtry)).unwrap_or_default(),
                additional_information: reason.addtl_inf.into_iter().next(),
                returned_amount: Amount::from_document(&tx.rtrd_intr_bk_sttlm_amt),
            },
            sender: DepositoryInstitution::sender(sender_id)
                .with_short_name(chain.dbtr_agt.as_ref().and_then(|a| a.name())),
            receiver: DepositoryInstitution::receiver(receiver_id)
                .with_short_name(chain.cdtr_agt.as_ref().and_then(|a| a.name())),
            originator: Party::from_document(&chain_party(&chain.dbtr), &chain.dbtr_acct),
            beneficiary: Party::from_document(&chain_party(&chain.cdtr), &chain.cdtr_acct),
        })
    }

    fn into_message(self) -> Message {
        Message::PaymentReturn(self)
    }

    fn from_message(message: Message) -> Result<Self, Message> {
        match message {
            Message::PaymentReturn(m) => Ok(m),
            other => Err(other),
        }
    }
}

fn chain_party(choice: &Party40Choice) -> PartyIdentification135 {
    choice.pty.clone().unwrap_or_default()
}
