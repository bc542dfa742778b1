use std::collections::HashMap;
use std::io::BufRead;
use std::time::Instant;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, error, info, instrument};

use super::resource::SchemaResource;
use crate::models::errors::{SchemaError, WalkPass};

/// Element names and namespace that frame every document of one message kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnvelopeDescriptor {
    pub root_element: String,
    pub message_element: String,
    pub wrapper_element: String,
    pub root_namespace: String,
    /// Every wrapper able to carry the kind, in document order. The first is `wrapper_element`.
    pub alternatives: Vec<String>,
}

impl EnvelopeDescriptor {
    /// Whether `wrapper` is one of the schema's wrappers for this kind.
    pub fn accepts_wrapper(&self, wrapper: &str) -> bool {
        self.alternatives.iter().any(|w| w == wrapper)
    }
}

/// Two-pass walk over a schema description that finds the envelope of a kind.
pub struct SchemaWalker;

impl SchemaWalker {
    #[instrument(skip(resource), fields(schema = %resource.locator()))]
    pub fn resolve(resource: &SchemaResource, kind: &str) -> Result<EnvelopeDescriptor, SchemaError> {
        let start = Instant::now();

        let structure = Structure::scan(resource.open()?)?;
        debug!(
            root = ?structure.root,
            message = ?structure.message,
            candidates = structure.candidates.len(),
            "Structure pass complete"
        );

        let alternatives = if structure.candidates.is_empty() {
            Vec::new()
        } else {
            structure.find_wrappers(resource.open()?, kind)?
        };
        let wrapper = alternatives.first().cloned();

        match (structure.root, structure.message, wrapper) {
            (Some(root_element), Some(message_element), Some(wrapper_element)) => {
                info!(
                    root = %root_element,
                    message = %message_element,
                    wrapper = %wrapper_element,
                    alternatives = alternatives.len(),
                    duration_ms = start.elapsed().as_millis(),
                    "Resolved envelope"
                );
                Ok(EnvelopeDescriptor {
                    root_element,
                    message_element,
                    wrapper_element,
                    root_namespace: structure.target_namespace,
                    alternatives,
                })
            }
            (root, message, wrapper) => {
                let missing: Vec<&str> = [("root", &root), ("message", &message), ("wrapper", &wrapper)]
                    .iter()
                    .filter(|(_, found)| found.is_none())
                    .map(|(label, _)| *label)
                    .collect();
                error!(missing = %missing.join(", "), "Envelope resolution failed");
                Err(SchemaError::ElementNotFound {
                    element: missing.join(", "),
                    root: root.unwrap_or_default(),
                    message: message.unwrap_or_default(),
                    wrapper: wrapper.unwrap_or_default(),
                })
            }
        }
    }
}

/// Results of the first pass.
#[derive(Debug, Default)]
struct Structure {
    root: Option<String>,
    message: Option<String>,
    candidates: Vec<String>,
    namespaces: HashMap<String, String>,
    target_namespace: String,
}

impl Structure {
    fn scan<R: BufRead>(source: R) -> Result<Self, SchemaError> {
        let mut stream = ElementStream::new(source, WalkPass::Structure);
        let mut stack: Vec<Frame> = Vec::new();
        let mut structure = Structure::default();

        while let Some(node) = stream.next_node()? {
            let (frame, opens) = match node {
                Node::Close => {
                    stack.pop();
                    continue;
                }
                Node::Open(frame) => (frame, true),
                Node::Leaf(frame) => (frame, false),
            };

            if stack.is_empty() && frame.is("schema") {
                structure.capture_namespaces(&frame);
            } else if frame.is("element") {
                structure.visit_element(&stack, &frame);
            }

            if opens {
                stack.push(frame);
            }
        }

        Ok(structure)
    }

    fn capture_namespaces(&mut self, schema: &Frame) {
        for (key, value) in &schema.attributes {
            if key == "xmlns" {
                self.namespaces.insert(String::new(), value.clone());
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                self.namespaces.insert(prefix.to_string(), value.clone());
            } else if key == "targetNamespace" {
                self.target_namespace = value.clone();
            }
        }
    }

    fn visit_element(&mut self, stack: &[Frame], element: &Frame) {
        let parent = ancestor(stack, 1);

        if self.root.is_none() && parent.is_some_and(|p| p.is("schema")) {
            self.root = element.attr("name").map(str::to_string);
        }

        let Some(reference) = element.attr("ref") else {
            return;
        };

        if self.message.is_none() && element.attr("minOccurs") != Some("0") && self.inside_root_sequence(stack) {
            self.message = Some(local_part(reference).to_string());
        }

        if parent.is_some_and(|p| p.is("choice")) {
            let name = local_part(reference);
            if !self.candidates.iter().any(|c| c == name) {
                self.candidates.push(name.to_string());
            }
        }
    }

    /// element[name=root] > complexType > sequence > (here)
    fn inside_root_sequence(&self, stack: &[Frame]) -> bool {
        let Some(root) = self.root.as_deref() else {
            return false;
        };
        matches!(
            (ancestor(stack, 1), ancestor(stack, 2), ancestor(stack, 3)),
            (Some(sequence), Some(complex), Some(element))
                if sequence.is("sequence")
                    && complex.is("complexType")
                    && element.is("element")
                    && element.attr("name") == Some(root)
        )
    }

    /// Wrapper declarations whose window references the kind, in document order.
    fn find_wrappers<R: BufRead>(&self, source: R, kind: &str) -> Result<Vec<String>, SchemaError> {
        let mut stream = ElementStream::new(source, WalkPass::Wrapper);
        let mut stack: Vec<Frame> = Vec::new();
        // (depth of the wrapper declaration, its name)
        let mut window: Option<(usize, String)> = None;
        let mut found: Vec<String> = Vec::new();

        while let Some(node) = stream.next_node()? {
            let (frame, opens) = match node {
                Node::Close => {
                    stack.pop();
                    if window.as_ref().is_some_and(|(depth, _)| stack.len() == *depth) {
                        window = None;
                    }
                    continue;
                }
                Node::Open(frame) => (frame, true),
                Node::Leaf(frame) => (frame, false),
            };

            if frame.is("element") {
                if let Some((_, wrapper)) = &window {
                    if frame.attr("ref").is_some_and(|reference| self.reference_matches(reference, kind))
                        && !found.contains(wrapper)
                    {
                        debug!(wrapper = %wrapper, "Wrapper carries kind");
                        found.push(wrapper.clone());
                    }
                } else if opens && self.is_candidate_declaration(&stack, &frame) {
                    let name = frame.attr("name").unwrap_or_default().to_string();
                    debug!(wrapper = %name, "Scanning wrapper declaration");
                    window = Some((stack.len(), name));
                }
            }

            if opens {
                stack.push(frame);
            }
        }

        Ok(found)
    }

    fn is_candidate_declaration(&self, stack: &[Frame], element: &Frame) -> bool {
        ancestor(stack, 1).is_some_and(|p| p.is("schema"))
            && element.attr("name").is_some_and(|name| self.candidates.iter().any(|c| c == name))
    }

    fn reference_matches(&self, reference: &str, kind: &str) -> bool {
        let prefix = reference.split_once(':').map(|(prefix, _)| prefix).unwrap_or("");
        self.namespaces.get(prefix).is_some_and(|uri| uri.contains(kind))
    }
}

fn ancestor(stack: &[Frame], generation: usize) -> Option<&Frame> {
    stack.len().checked_sub(generation).and_then(|index| stack.get(index))
}

fn local_part(qualified: &str) -> &str {
    qualified.rsplit(':').next().unwrap_or(qualified)
}

/// One element on the ancestor stack: local name plus raw attributes.
#[derive(Debug)]
struct Frame {
    local: String,
    attributes: Vec<(String, String)>,
}

impl Frame {
    fn from_start(start: &BytesStart<'_>, pass: WalkPass) -> Result<Self, SchemaError> {
        let local = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| SchemaError::Malformed {
                pass,
                message: format!("bad attribute on <{}>: {}", local, e),
            })?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(|e| SchemaError::Malformed {
                    pass,
                    message: format!("bad value for {} on <{}>: {}", key, local, e),
                })?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self { local, attributes })
    }

    fn is(&self, local: &str) -> bool {
        self.local == local
    }

    fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

enum Node {
    Open(Frame),
    Leaf(Frame),
    Close,
}

struct ElementStream<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    pass: WalkPass,
}

impl<R: BufRead> ElementStream<R> {
    fn new(source: R, pass: WalkPass) -> Self {
        let mut reader = Reader::from_reader(source);
        reader.trim_text(true);
        Self { reader, buf: Vec::new(), pass }
    }

    fn next_node(&mut self) -> Result<Option<Node>, SchemaError> {
        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(e) => {
                    return Err(SchemaError::Malformed {
                        pass: self.pass,
                        message: format!("{} at position {}", e, self.reader.buffer_position()),
                    })
                }
            };
            match event {
                Event::Start(start) => return Frame::from_start(&start, self.pass).map(|f| Some(Node::Open(f))),
                Event::Empty(start) => return Frame::from_start(&start, self.pass).map(|f| Some(Node::Leaf(f))),
                Event::End(_) => return Ok(Some(Node::Close)),
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"<?xml version="1.0"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
           xmlns:head="urn:iso:std:iso:20022:tech:xsd:head.001.001.02"
           xmlns:a="urn:iso:std:iso:20022:tech:xsd:pacs.008.001.08"
           xmlns:b="urn:iso:std:iso:20022:tech:xsd:pacs.002.001.10"
           targetNamespace="urn:test:envelope">
    <xs:element name="Outer">
        <xs:complexType>
            <xs:sequence>
                <xs:element ref="Optional" minOccurs="0"/>
                <xs:element ref="Carrier"/>
                <xs:element ref="Trailer"/>
            </xs:sequence>
        </xs:complexType>
    </xs:element>
    <xs:element name="Carrier">
        <xs:complexType>
            <xs:choice>
                <xs:element ref="Credit"/>
                <xs:element ref="Status"/>
                <xs:element ref="Bare"/>
            </xs:choice>
        </xs:complexType>
    </xs:element>
    <xs:element name="Bare" type="xs:string"/>
    <xs:element name="Credit">
        <xs:complexType>
            <xs:sequence>
                <xs:element ref="head:AppHdr"/>
                <xs:element ref="a:Document"/>
            </xs:sequence>
        </xs:complexType>
    </xs:element>
    <xs:element name="Unlisted">
        <xs:complexType>
            <xs:sequence>
                <xs:element ref="b:Document"/>
            </xs:sequence>
        </xs:complexType>
    </xs:element>
</xs:schema>"#;

    #[test]
    fn resolves_root_message_and_wrapper() {
        let descriptor = SchemaWalker::resolve(&SchemaResource::inline(SCHEMA), "pacs.008.001.08").unwrap();
        assert_eq!(descriptor.root_element, "Outer");
        assert_eq!(descriptor.message_element, "Carrier");
        assert_eq!(descriptor.wrapper_element, "Credit");
        assert_eq!(descriptor.root_namespace, "urn:test:envelope");
    }

    #[test]
    fn collects_every_wrapper_for_a_kind() {
        let schema = SCHEMA.replace(
            "<xs:element name=\"Unlisted\">",
            "<xs:element name=\"Status\"><xs:complexType><xs:sequence><xs:element ref=\"a:Document\"/></xs:sequence></xs:complexType></xs:element>\n    <xs:element name=\"Unlisted\">",
        );
        let descriptor = SchemaWalker::resolve(&SchemaResource::inline(schema), "pacs.008.001.08").unwrap();
        assert_eq!(descriptor.wrapper_element, "Credit");
        assert_eq!(descriptor.alternatives, vec!["Credit".to_string(), "Status".to_string()]);
        assert!(descriptor.accepts_wrapper("Status"));
        assert!(!descriptor.accepts_wrapper("Unlisted"));
    }

    #[test]
    fn references_outside_a_wrapper_window_are_ignored() {
        // b:Document only appears under a declaration that no choice lists
        let err = SchemaWalker::resolve(&SchemaResource::inline(SCHEMA), "pacs.002.001.10").unwrap_err();
        match err {
            SchemaError::ElementNotFound { element, root, message, .. } => {
                assert_eq!(element, "wrapper");
                assert_eq!(root, "Outer");
                assert_eq!(message, "Carrier");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_schema_is_reported_with_its_pass() {
        let broken = SchemaResource::inline("<xs:schema><xs:element name=\"A\"></xs:schema>");
        assert!(matches!(
            SchemaWalker::resolve(&broken, "pacs.008.001.08"),
            Err(SchemaError::Malformed { pass: WalkPass::Structure, .. })
        ));
    }
}
