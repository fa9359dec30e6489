//! Action schema parsing.
//!
//! Turns a service description (SCPD) document into an ordered list of
//! [`ActionSignature`]s. Elements are matched on their local names, so both
//! namespace-stripped and default-namespaced documents are accepted.

use crate::ControlPointError;
use log::{debug, info};
use roxmltree::{Document, Node};
use serde::Serialize;

/// Discovered shape of one remotely invocable action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionSignature {
    /// Action name, unique within a service.
    pub name: String,
    /// Input argument names in declaration order.
    pub input_args: Vec<String>,
    /// Output argument names in declaration order.
    pub output_args: Vec<String>,
}

impl ActionSignature {
    /// Whether `arg` is a declared input argument.
    pub fn accepts(&self, arg: &str) -> bool {
        self.input_args.iter().any(|name| name == arg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    In,
    Out,
}

#[derive(Debug)]
struct RawArgument {
    name: String,
    direction: Direction,
}

/// Parse every `actionList/action` element of `document`, in document order.
pub fn parse_action_list(document: &str) -> Result<Vec<ActionSignature>, ControlPointError> {
    let doc = Document::parse(document)
        .map_err(|err| ControlPointError::MalformedSchema(format!("invalid XML: {err}")))?;

    let mut signatures = Vec::new();
    for action in doc.descendants().filter(is_listed_action) {
        let signature = parse_action(&doc, action)?;
        debug!(
            "discovered action (name={}, inputs={}, outputs={})",
            signature.name,
            signature.input_args.len(),
            signature.output_args.len()
        );
        signatures.push(signature);
    }

    info!("parsed action list (actions={})", signatures.len());
    Ok(signatures)
}

fn is_listed_action(node: &Node) -> bool {
    is_element_named(node, "action")
        && node
            .parent_element()
            .is_some_and(|parent| is_element_named(&parent, "actionList"))
}

fn parse_action(doc: &Document, action: Node) -> Result<ActionSignature, ControlPointError> {
    let name = child_text(action, "name")
        .ok_or_else(|| malformed(doc, action, "action is missing <name>"))?;

    let arguments = argument_nodes(action)
        .into_iter()
        .map(|node| parse_argument(doc, &name, node))
        .collect::<Result<Vec<_>, _>>()?;

    let input_args = names_with_direction(&arguments, Direction::In);
    let output_args = names_with_direction(&arguments, Direction::Out);
    ensure_unique(&name, &input_args, "input")?;
    ensure_unique(&name, &output_args, "output")?;

    Ok(ActionSignature {
        name,
        input_args,
        output_args,
    })
}

/// Collect `argumentList/argument` children as a sequence. A lone argument is a
/// one-element sequence and a missing `argumentList` is an empty one.
fn argument_nodes<'a, 'input>(action: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
    action
        .children()
        .filter(|node| is_element_named(node, "argumentList"))
        .flat_map(|list| list.children())
        .filter(|node| is_element_named(node, "argument"))
        .collect()
}

fn parse_argument(
    doc: &Document,
    action: &str,
    node: Node,
) -> Result<RawArgument, ControlPointError> {
    let name = child_text(node, "name").ok_or_else(|| {
        malformed(doc, node, &format!("argument of {action} is missing <name>"))
    })?;
    let direction = child_text(node, "direction").ok_or_else(|| {
        malformed(
            doc,
            node,
            &format!("argument {name} of {action} is missing <direction>"),
        )
    })?;
    let direction = match direction.as_str() {
        "in" => Direction::In,
        "out" => Direction::Out,
        other => {
            return Err(malformed(
                doc,
                node,
                &format!("argument {name} of {action} has invalid direction {other:?}"),
            ));
        }
    };
    Ok(RawArgument { name, direction })
}

fn names_with_direction(arguments: &[RawArgument], direction: Direction) -> Vec<String> {
    arguments
        .iter()
        .filter(|arg| arg.direction == direction)
        .map(|arg| arg.name.clone())
        .collect()
}

fn ensure_unique(action: &str, names: &[String], kind: &str) -> Result<(), ControlPointError> {
    for (idx, name) in names.iter().enumerate() {
        if names[..idx].contains(name) {
            return Err(ControlPointError::MalformedSchema(format!(
                "action {action} declares {kind} argument {name} more than once"
            )));
        }
    }
    Ok(())
}

/// Trimmed text of the first child element named `name`; empty text is absent.
fn child_text(node: Node, name: &str) -> Option<String> {
    node.children()
        .find(|child| is_element_named(child, name))
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn is_element_named(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

fn malformed(doc: &Document, node: Node, message: &str) -> ControlPointError {
    let pos = doc.text_pos_at(node.range().start);
    ControlPointError::MalformedSchema(format!("{message} (line {}, column {})", pos.row, pos.col))
}
