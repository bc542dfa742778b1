use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{error, warn};

use crate::models::errors::{ConversionError, ConversionResult};
use crate::models::schema::EnvelopeDescriptor;

/// Header and body fragments produced by a handler for one message.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMessage {
    pub header: String,
    pub body: String,
    /// Overrides the descriptor's wrapper for this document only.
    pub preferred_wrapper: Option<String>,
}

/// Nests the fragments as root > message > wrapper > (header, body).
/// A preferred wrapper must be one the schema declares for the kind.
pub fn assemble(descriptor: &EnvelopeDescriptor, rendered: &RenderedMessage) -> ConversionResult<String> {
    let wrapper = match rendered.preferred_wrapper.as_deref() {
        Some(preferred) if !descriptor.accepts_wrapper(preferred) => {
            error!(
                preferred = %preferred,
                alternatives = ?descriptor.alternatives,
                "Preferred wrapper is not declared for this kind"
            );
            return Err(ConversionError::validation(vec![format!(
                "preferredWrapper '{}' is not one of [{}]",
                preferred,
                descriptor.alternatives.join(", ")
            )]));
        }
        Some(preferred) if preferred != descriptor.wrapper_element => {
            warn!(
                resolved = %descriptor.wrapper_element,
                preferred = %preferred,
                "Overriding resolved wrapper element"
            );
            preferred
        }
        _ => descriptor.wrapper_element.as_str(),
    };

    let root_open = if descriptor.root_namespace.is_empty() {
        format!("<{}>", descriptor.root_element)
    } else {
        format!("<{} xmlns=\"{}\">", descriptor.root_element, descriptor.root_namespace)
    };

    let mut out = String::with_capacity(rendered.header.len() + rendered.body.len() + 256);
    out.push_str(&root_open);
    out.push_str(&format!("\n    <{}>", descriptor.message_element));
    out.push_str(&format!("\n        <{}>\n", wrapper));
    out.push_str(rendered.header.trim_end());
    out.push('\n');
    out.push_str(rendered.body.trim_end());
    out.push_str(&format!("\n        </{}>", wrapper));
    out.push_str(&format!("\n    </{}>", descriptor.message_element));
    out.push_str(&format!("\n</{}>", descriptor.root_element));
    Ok(out)
}

/// Text of the first element named `local` (namespace prefix ignored), tags included.
pub fn locate_element<'a>(xml: &'a str, local: &str) -> ConversionResult<Option<&'a str>> {
    let mut reader = Reader::from_str(xml);
    loop {
        let before = reader.buffer_position();
        let event = reader.read_event().map_err(|e| parse_error(&reader, e))?;
        match event {
            Event::Start(start) if start.local_name().as_ref() == local.as_bytes() => {
                let end = start.to_end().into_owned();
                reader.read_to_end(end.name()).map_err(|e| parse_error(&reader, e))?;
                return Ok(Some(fragment(xml, before, reader.buffer_position())));
            }
            Event::Empty(start) if start.local_name().as_ref() == local.as_bytes() => {
                return Ok(Some(fragment(xml, before, reader.buffer_position())));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

fn fragment(xml: &str, start: usize, end: usize) -> &str {
    let slice = &xml[start..end];
    match slice.find('<') {
        Some(offset) => &slice[offset..],
        None => slice,
    }
}

fn parse_error(reader: &Reader<&[u8]>, err: quick_xml::Error) -> ConversionError {
    ConversionError::Parse(format!("{} at position {}", err, reader.buffer_position()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(namespace: &str) -> EnvelopeDescriptor {
        EnvelopeDescriptor {
            root_element: "FedNowOutgoing".to_string(),
            message_element: "FedNowOutgoingMessage".to_string(),
            wrapper_element: "FedNowCustomerCreditTransfer".to_string(),
            root_namespace: namespace.to_string(),
            alternatives: vec![
                "FedNowCustomerCreditTransfer".to_string(),
                "FedNowReturnRequestResponse".to_string(),
            ],
        }
    }

    fn rendered(preferred: Option<&str>) -> RenderedMessage {
        RenderedMessage {
            header: "<AppHdr/>".to_string(),
            body: "<Document/>\n".to_string(),
            preferred_wrapper: preferred.map(str::to_string),
        }
    }

    #[test]
    fn nests_fragments_in_order() {
        let xml = assemble(&descriptor("urn:fednow"), &rendered(None)).unwrap();
        assert_eq!(
            xml,
            "<FedNowOutgoing xmlns=\"urn:fednow\">\n    <FedNowOutgoingMessage>\n        <FedNowCustomerCreditTransfer>\n<AppHdr/>\n<Document/>\n        </FedNowCustomerCreditTransfer>\n    </FedNowOutgoingMessage>\n</FedNowOutgoing>"
        );
    }

    #[test]
    fn omits_empty_namespace_and_honours_preferred_wrapper() {
        let xml = assemble(&descriptor(""), &rendered(Some("FedNowReturnRequestResponse"))).unwrap();
        assert!(xml.starts_with("<FedNowOutgoing>\n"));
        assert!(xml.contains("<FedNowReturnRequestResponse>"));
        assert!(!xml.contains("FedNowCustomerCreditTransfer"));
    }

    #[test]
    fn rejects_wrapper_the_schema_does_not_declare() {
        let err = assemble(&descriptor(""), &rendered(Some("NotInSchema foo=\"bar\"><Injected/"))).unwrap_err();
        let violations = err.violations();
        assert_eq!(violations.len(), 1);
        assert!(violations[0].starts_with("preferredWrapper 'NotInSchema"), "{}", violations[0]);
        assert!(violations[0].contains("FedNowReturnRequestResponse"));
    }

    #[test]
    fn locates_nested_and_empty_elements() {
        let xml = "<Root><Wrap>\n  <head:AppHdr xmlns:head=\"h\"><Fr>1</Fr></head:AppHdr>\n  <Document/></Wrap></Root>";
        assert_eq!(
            locate_element(xml, "AppHdr").unwrap(),
            Some("<head:AppHdr xmlns:head=\"h\"><Fr>1</Fr></head:AppHdr>")
        );
        assert_eq!(locate_element(xml, "Document").unwrap(), Some("<Document/>"));
        assert_eq!(locate_element(xml, "Missing").unwrap(), None);
    }
}
