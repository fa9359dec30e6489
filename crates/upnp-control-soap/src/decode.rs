//! SOAP response decoding into nested maps.

use roxmltree::{Document, Node};
use serde_json::{Map, Value};
use upnp_control_protocol::{TransportError, to_wire_name};

/// Decode a SOAP response envelope into the contents of its `Body`.
///
/// Element names become wire-convention keys (`GetMediaInfoResponse` ->
/// `get_media_info_response`). Leaf elements decode to their text, empty
/// elements to `null`, and repeated siblings to arrays. A `Fault` in the body
/// is returned as [`TransportError::Fault`].
pub fn decode_response(xml: &str) -> Result<Value, TransportError> {
    let doc = Document::parse(xml).map_err(|err| TransportError::Decode(err.to_string()))?;
    let envelope = doc.root_element();
    if envelope.tag_name().name() != "Envelope" {
        return Err(TransportError::Decode(format!(
            "expected Envelope root element, found {}",
            envelope.tag_name().name()
        )));
    }
    let body = child_element(envelope, "Body")
        .ok_or_else(|| TransportError::Decode("envelope has no Body".to_string()))?;

    if let Some(fault) = child_element(body, "Fault") {
        return Err(fault_error(fault));
    }
    Ok(element_value(body))
}

fn element_value(node: Node) -> Value {
    let children = node.children().filter(Node::is_element).collect::<Vec<_>>();
    if children.is_empty() {
        let text = node
            .children()
            .filter_map(|child| child.text())
            .collect::<String>();
        let text = text.trim();
        if text.is_empty() {
            return Value::Null;
        }
        return Value::String(text.to_string());
    }

    let mut map = Map::new();
    for child in children {
        let key = to_wire_name(child.tag_name().name());
        let value = element_value(child);
        match map.get_mut(&key) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(key, value);
            }
        }
    }
    Value::Object(map)
}

fn fault_error(fault: Node) -> TransportError {
    let upnp_error = fault
        .descendants()
        .find(|node| node.is_element() && node.tag_name().name() == "UPnPError");
    TransportError::Fault {
        code: descendant_text(fault, "faultcode").unwrap_or_default(),
        message: descendant_text(fault, "faultstring").unwrap_or_default(),
        upnp_error_code: upnp_error
            .and_then(|node| descendant_text(node, "errorCode"))
            .and_then(|code| code.parse().ok()),
        upnp_error_description: upnp_error
            .and_then(|node| descendant_text(node, "errorDescription")),
    }
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == name)
}

fn descendant_text(node: Node, name: &str) -> Option<String> {
    node.descendants()
        .find(|child| child.is_element() && child.tag_name().name() == name)
        .and_then(|child| child.text())
        .map(|text| text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const BROWSE_RESPONSE: &str = r#"<?xml version="1.0"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">
  <s:Body>
    <u:BrowseResponse xmlns:u="urn:schemas-upnp-org:service:ContentDirectory:1">
      <Result>&lt;DIDL-Lite/&gt;</Result>
      <NumberReturned>5</NumberReturned>
      <TotalMatches>12</TotalMatches>
      <UpdateID>3</UpdateID>
    </u:BrowseResponse>
  </s:Body>
</s:Envelope>"#;

    #[test]
    fn body_decodes_to_wire_named_map() {
        let body = decode_response(BROWSE_RESPONSE).expect("body");
        assert_eq!(
            body,
            json!({
                "browse_response": {
                    "result": "<DIDL-Lite/>",
                    "number_returned": "5",
                    "total_matches": "12",
                    "update_id": "3"
                }
            })
        );
    }

    #[test]
    fn indented_leaf_text_is_trimmed() {
        let xml = "<Envelope><Body><GetCountResponse>\n  <Count>\n    5\n  </Count>\n  \
                   <Label>  Living Room </Label>\n</GetCountResponse></Body></Envelope>";
        assert_eq!(
            decode_response(xml).expect("body"),
            json!({ "get_count_response": { "count": "5", "label": "Living Room" } })
        );
    }

    #[test]
    fn empty_response_element_decodes_to_null() {
        let xml = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body>
            <u:PlayResponse xmlns:u="urn:schemas-upnp-org:service:AVTransport:1"/>
            </s:Body></s:Envelope>"#;
        assert_eq!(
            decode_response(xml).expect("body"),
            json!({ "play_response": null })
        );
    }

    #[test]
    fn repeated_elements_become_arrays() {
        let xml = r#"<Envelope><Body><ListResponse>
            <Item>a</Item><Item>b</Item><Item>c</Item>
            </ListResponse></Body></Envelope>"#;
        assert_eq!(
            decode_response(xml).expect("body"),
            json!({ "list_response": { "item": ["a", "b", "c"] } })
        );
    }

    #[test]
    fn fault_is_reported_with_upnp_detail() {
        let xml = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body>
            <s:Fault>
              <faultcode>s:Client</faultcode>
              <faultstring>UPnPError</faultstring>
              <detail>
                <UPnPError xmlns="urn:schemas-upnp-org:control-1-0">
                  <errorCode>402</errorCode>
                  <errorDescription>Invalid Args</errorDescription>
                </UPnPError>
              </detail>
            </s:Fault>
            </s:Body></s:Envelope>"#;
        match decode_response(xml).unwrap_err() {
            TransportError::Fault {
                code,
                message,
                upnp_error_code,
                upnp_error_description,
            } => {
                assert_eq!(code, "s:Client");
                assert_eq!(message, "UPnPError");
                assert_eq!(upnp_error_code, Some(402));
                assert_eq!(upnp_error_description.as_deref(), Some("Invalid Args"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_envelope_documents_are_rejected() {
        let err = decode_response("<html><body/></html>").unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
        let err = decode_response("not xml").unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }
}
