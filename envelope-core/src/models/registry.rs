use std::collections::HashMap;
use std::marker::PhantomData;
use std::time::Instant;

use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, error, info, instrument};

use crate::models::clock::{reference_now, Clock};
use crate::models::config::Config;
use crate::models::envelope::{assemble, locate_element, RenderedMessage};
use crate::models::errors::{ConversionError, ConversionResult};
use crate::models::iso20022::head::BusinessApplicationHeaderV02;
use crate::models::message::{
    CancellationRequest, CancellationResponse, CreditTransfer, Iso20022Message, Message, MessageReject,
    PaymentRequest, PaymentReturn, ReceiptAcknowledgement, StatusReport,
};
use crate::models::schema::{ResolutionCache, SchemaResource};

const HEADER_ELEMENT: &str = "AppHdr";
const DOCUMENT_ELEMENT: &str = "Document";
const XML_INDENT: usize = 4;

/// Converter bound to one message kind.
pub trait MessageHandler: Send + Sync {
    fn kind(&self) -> &'static str;

    /// Builds the header and body fragments, stamping `now` as the creation time.
    fn render(&self, message: Message, config: &Config, now: OffsetDateTime) -> ConversionResult<RenderedMessage>;

    fn parse(&self, header: &BusinessApplicationHeaderV02, document_xml: &str) -> ConversionResult<Message>;

    fn decode_json(&self, json: &[u8]) -> ConversionResult<Message>;
}

pub struct KindHandler<T>(PhantomData<fn() -> T>);

impl<T> KindHandler<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for KindHandler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Iso20022Message> MessageHandler for KindHandler<T> {
    fn kind(&self) -> &'static str {
        T::KIND
    }

    fn render(&self, message: Message, config: &Config, now: OffsetDateTime) -> ConversionResult<RenderedMessage> {
        let mut message = T::from_message(message).map_err(|other| {
            error!(expected = T::KIND, found = other.kind(), "Message variant does not match handler");
            ConversionError::TypeMismatch {
                expected: T::KIND.to_string(),
                found: other.kind().to_string(),
            }
        })?;

        message.set_creation_date_time(now);
        let document = message.build(config)?;
        let header = BusinessApplicationHeaderV02::new(message.business_message_id(), T::KIND, config, now);

        Ok(RenderedMessage {
            header: to_xml(&header, HEADER_ELEMENT)?,
            body: to_xml(&document, DOCUMENT_ELEMENT)?,
            preferred_wrapper: message.preferred_wrapper().map(str::to_string),
        })
    }

    fn parse(&self, header: &BusinessApplicationHeaderV02, document_xml: &str) -> ConversionResult<Message> {
        let document: T::Document = quick_xml::de::from_str(document_xml)?;
        Ok(T::parse(header, document)?.into_message())
    }

    fn decode_json(&self, json: &[u8]) -> ConversionResult<Message> {
        Message::from_json::<T>(json)
    }
}

fn to_xml<S: Serialize>(value: &S, root: &str) -> ConversionResult<String> {
    let mut buffer = String::new();
    let mut serializer = quick_xml::se::Serializer::with_root(&mut buffer, Some(root))
        .map_err(|e| ConversionError::Serialization(e.to_string()))?;
    serializer.indent(' ', XML_INDENT);
    value
        .serialize(serializer)
        .map_err(|e| ConversionError::Serialization(e.to_string()))?;
    Ok(buffer)
}

/// Handlers keyed by message kind, sharing one envelope cache.
pub struct MessageRegistry {
    handlers: HashMap<String, Box<dyn MessageHandler>>,
    cache: ResolutionCache,
    clock: Clock,
}

impl Default for MessageRegistry {
    fn default() -> Self {
        Self::with_default_kinds()
    }
}

impl MessageRegistry {
    /// Registry with no handlers.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            cache: ResolutionCache::new(),
            clock: reference_now,
        }
    }

    /// Registry with every supported FedNow message kind.
    pub fn with_default_kinds() -> Self {
        Self::new()
            .register::<CreditTransfer>()
            .register::<StatusReport>()
            .register::<PaymentReturn>()
            .register::<CancellationRequest>()
            .register::<CancellationResponse>()
            .register::<ReceiptAcknowledgement>()
            .register::<PaymentRequest>()
            .register::<MessageReject>()
    }

    pub fn register<T: Iso20022Message + 'static>(mut self) -> Self {
        self.handlers.insert(T::KIND.to_string(), Box::new(KindHandler::<T>::new()));
        self
    }

    /// Replaces the clock that stamps outbound creation times.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    fn handler(&self, kind: &str) -> ConversionResult<&dyn MessageHandler> {
        self.handlers
            .get(kind)
            .map(|h| &**h)
            .ok_or_else(|| ConversionError::UnsupportedMessageKind(kind.to_string()))
    }

    /// Exact match first, then the longest registered kind contained in the identifier.
    fn handler_for_definition(&self, definition: &str) -> Option<&dyn MessageHandler> {
        let definition = definition.trim();
        self.handlers
            .get(definition)
            .or_else(|| {
                self.handlers
                    .iter()
                    .filter(|(kind, _)| definition.contains(kind.as_str()))
                    .max_by_key(|(kind, _)| kind.len())
                    .map(|(_, handler)| handler)
            })
            .map(|h| &**h)
    }

    /// Decodes a `{"fedNowMessage": ...}` document for `kind`.
    pub fn decode(&self, kind: &str, json: &[u8]) -> ConversionResult<Message> {
        self.handler(kind)?.decode_json(json)
    }

    /// Renders `message` as a complete enveloped XML document.
    #[instrument(skip(self, schema, config, message), fields(kind = %kind, schema = %schema.locator()))]
    pub fn generate(
        &self,
        schema: &SchemaResource,
        kind: &str,
        config: &Config,
        message: Message,
    ) -> ConversionResult<Vec<u8>> {
        let start = Instant::now();

        let handler = self.handler(kind).map_err(|e| {
            error!(error = %e, "No handler registered");
            e
        })?;
        let descriptor = self.cache.get_or_compute(kind, schema)?;
        debug!(
            root = %descriptor.root_element,
            message = %descriptor.message_element,
            wrapper = %descriptor.wrapper_element,
            "Envelope descriptor ready"
        );

        let rendered = handler.render(message, config, (self.clock)())?;
        let document = assemble(&descriptor, &rendered)?;

        info!(
            size = document.len(),
            duration_ms = start.elapsed().as_millis(),
            "Generated message"
        );
        Ok(document.into_bytes())
    }

    /// Reads an enveloped XML document back into a message, dispatching on its header.
    #[instrument(skip(self, xml), fields(size = xml.len()))]
    pub fn parse(&self, xml: &[u8]) -> ConversionResult<Message> {
        let start = Instant::now();

        let text = std::str::from_utf8(xml)
            .map_err(|e| ConversionError::Parse(format!("document is not valid UTF-8: {}", e)))?;

        let header_xml = locate_element(text, HEADER_ELEMENT)?
            .ok_or_else(|| ConversionError::Parse("business application header not found".to_string()))?;
        let header: BusinessApplicationHeaderV02 = quick_xml::de::from_str(header_xml)?;

        let handler = self.handler_for_definition(&header.msg_def_idr).ok_or_else(|| {
            error!(definition = %header.msg_def_idr, "Unknown message definition");
            ConversionError::Parse(format!("no handler for message definition '{}'", header.msg_def_idr))
        })?;

        let document_xml = locate_element(text, DOCUMENT_ELEMENT)?
            .ok_or_else(|| ConversionError::Parse("document element not found".to_string()))?;
        let message = handler.parse(&header, document_xml)?;

        info!(
            kind = handler.kind(),
            duration_ms = start.elapsed().as_millis(),
            "Parsed message"
        );
        Ok(message)
    }
}
