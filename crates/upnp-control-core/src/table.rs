//! Immutable lookup table of discovered actions.

use crate::{ActionSignature, ControlPointError};
use std::collections::HashMap;

/// Action signatures indexed by name, preserving declaration order.
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    signatures: Vec<ActionSignature>,
    index: HashMap<String, usize>,
}

impl ActionTable {
    /// Build a table, rejecting duplicate action names.
    pub fn build(signatures: Vec<ActionSignature>) -> Result<Self, ControlPointError> {
        let mut index = HashMap::with_capacity(signatures.len());
        for (position, signature) in signatures.iter().enumerate() {
            if index.insert(signature.name.clone(), position).is_some() {
                return Err(ControlPointError::MalformedSchema(format!(
                    "action {} is declared more than once",
                    signature.name
                )));
            }
        }
        Ok(Self { signatures, index })
    }

    /// Fetch a signature by action name.
    pub fn get(&self, name: &str) -> Option<&ActionSignature> {
        self.index
            .get(name)
            .map(|position| &self.signatures[*position])
    }

    /// Action names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.signatures
            .iter()
            .map(|signature| signature.name.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionSignature> {
        self.signatures.iter()
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::ActionTable;
    use crate::{ActionSignature, ControlPointError};
    use pretty_assertions::assert_eq;

    fn signature(name: &str) -> ActionSignature {
        ActionSignature {
            name: name.to_string(),
            input_args: vec!["InstanceID".to_string()],
            output_args: Vec::new(),
        }
    }

    #[test]
    fn table_tracks_actions_in_order() {
        let table = ActionTable::build(vec![signature("Stop"), signature("Play")]).expect("table");
        assert_eq!(table.names(), vec!["Stop", "Play"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("Play"), Some(&signature("Play")));
        assert_eq!(table.get("Pause"), None);
    }

    #[test]
    fn duplicate_action_names_are_rejected() {
        let err = ActionTable::build(vec![signature("Play"), signature("Play")]).unwrap_err();
        assert!(matches!(err, ControlPointError::MalformedSchema(_)));
        assert!(format!("{err}").contains("Play"));
    }

    #[test]
    fn empty_table() {
        let table = ActionTable::build(Vec::new()).expect("table");
        assert!(table.is_empty());
        assert!(table.names().is_empty());
    }
}
