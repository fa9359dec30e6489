//! SOAP request envelope encoding.

use serde_json::Value;
use upnp_control_protocol::{SERVICE_NAMESPACE_ATTRIBUTE, SoapRequest};

const ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const ENCODING_STYLE: &str = "http://schemas.xmlsoap.org/soap/encoding/";

/// Render `request` as a SOAP 1.1 envelope.
///
/// Argument keys are written verbatim as element names. Booleans use the UPnP
/// `1`/`0` form, arrays repeat the element, and objects nest.
///
/// The action element is written as `u:<Action>` only while the request
/// attributes bind `xmlns:u`; otherwise it is left unprefixed.
pub fn build_envelope(request: &SoapRequest) -> String {
    let mut body = String::new();
    for (key, value) in &request.message {
        write_value(&mut body, key, value);
    }

    let attributes = request
        .attributes
        .attributes
        .iter()
        .map(|(name, value)| format!(" {name}=\"{}\"", escape(value)))
        .collect::<String>();
    let element = if request
        .attributes
        .attributes
        .contains_key(SERVICE_NAMESPACE_ATTRIBUTE)
    {
        format!("u:{}", request.action)
    } else {
        request.action.clone()
    };

    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
         <s:Envelope xmlns:s=\"{ENVELOPE_NS}\" s:encodingStyle=\"{ENCODING_STYLE}\">\
         <s:Body><{element}{attributes}>{body}</{element}></s:Body></s:Envelope>"
    )
}

fn write_value(out: &mut String, key: &str, value: &Value) {
    match value {
        Value::Array(items) => {
            for item in items {
                write_value(out, key, item);
            }
        }
        Value::Object(map) => {
            out.push_str(&format!("<{key}>"));
            for (child, value) in map {
                write_value(out, child, value);
            }
            out.push_str(&format!("</{key}>"));
        }
        Value::Null => out.push_str(&format!("<{key}></{key}>")),
        Value::Bool(flag) => {
            let flag = if *flag { "1" } else { "0" };
            out.push_str(&format!("<{key}>{flag}</{key}>"));
        }
        Value::Number(number) => out.push_str(&format!("<{key}>{number}</{key}>")),
        Value::String(text) => out.push_str(&format!("<{key}>{}</{key}>", escape(text))),
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::BTreeMap;
    use upnp_control_protocol::{RequestAttributes, RequestOptions};

    fn request(action: &str, message: Value) -> SoapRequest {
        let Value::Object(message) = message else {
            panic!("message must be an object");
        };
        SoapRequest {
            action: action.to_string(),
            attributes: RequestAttributes::for_action("urn:schemas-upnp-org:service:AVTransport:1", action),
            message,
        }
    }

    #[test]
    fn envelope_wraps_action_with_namespace() {
        let xml = build_envelope(&request("Play", json!({ "InstanceID": 0, "Speed": "1" })));
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?><s:Envelope"));
        assert!(xml.contains(
            "<s:Body><u:Play xmlns:u=\"urn:schemas-upnp-org:service:AVTransport:1\">\
             <InstanceID>0</InstanceID><Speed>1</Speed></u:Play></s:Body>"
        ));
    }

    #[test]
    fn values_are_encoded_per_type() {
        let xml = build_envelope(&request(
            "SetMute",
            json!({
                "DesiredMute": true,
                "Channel": null,
                "Tags": ["a", "b"],
                "Nested": { "Inner": 1 }
            }),
        ));
        assert!(xml.contains("<DesiredMute>1</DesiredMute>"));
        assert!(xml.contains("<Channel></Channel>"));
        assert!(xml.contains("<Tags>a</Tags><Tags>b</Tags>"));
        assert!(xml.contains("<Nested><Inner>1</Inner></Nested>"));
    }

    #[test]
    fn text_is_escaped() {
        let xml = build_envelope(&request(
            "SetAVTransportURI",
            json!({ "CurrentURIMetaData": "<DIDL-Lite a=\"b\">&</DIDL-Lite>" }),
        ));
        assert!(xml.contains(
            "<CurrentURIMetaData>&lt;DIDL-Lite a=&quot;b&quot;&gt;&amp;&lt;/DIDL-Lite&gt;</CurrentURIMetaData>"
        ));
    }

    #[test]
    fn empty_message_renders_empty_action_element() {
        let xml = build_envelope(&request("GetCurrentTransportActions", json!({})));
        assert!(xml.contains("></u:GetCurrentTransportActions>"));
    }

    #[test]
    fn replaced_attributes_leave_action_unprefixed() {
        let mut req = request("Play", json!({ "InstanceID": 0 }));
        req.attributes.apply_options(&RequestOptions {
            attributes: Some(BTreeMap::new()),
            ..RequestOptions::default()
        });
        let xml = build_envelope(&req);
        assert!(xml.contains("<s:Body><Play><InstanceID>0</InstanceID></Play></s:Body>"));
        roxmltree::Document::parse(&xml).expect("well-formed");
    }

    #[test]
    fn custom_namespace_binding_keeps_prefix() {
        let mut req = request("Play", json!({}));
        req.attributes.apply_options(&RequestOptions {
            attributes: Some(BTreeMap::from([(
                "xmlns:u".to_string(),
                "urn:vendor:service:Player:2".to_string(),
            )])),
            ..RequestOptions::default()
        });
        let xml = build_envelope(&req);
        assert!(xml.contains("<u:Play xmlns:u=\"urn:vendor:service:Player:2\"></u:Play>"));
        roxmltree::Document::parse(&xml).expect("well-formed");
    }

    #[test]
    fn envelope_parses_as_xml() {
        let xml = build_envelope(&request("Stop", json!({ "InstanceID": 0 })));
        let doc = roxmltree::Document::parse(&xml).expect("well-formed");
        assert_eq!(doc.root_element().tag_name().name(), "Envelope");
    }
}
