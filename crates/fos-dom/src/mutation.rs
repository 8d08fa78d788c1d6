//! Mutation records
//!
//! Every structural, attribute and character-data change made through
//! `Document` leaves a record here, in the shape MutationObserver reports.

use crate::NodeId;

/// Mutation type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    Attributes,
    CharacterData,
    ChildList,
}

/// Mutation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub mutation_type: MutationType,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub attribute_name: Option<String>,
    pub old_value: Option<String>,
}

impl MutationRecord {
    pub fn attributes(target: NodeId, name: &str, old_value: Option<String>) -> Self {
        Self {
            mutation_type: MutationType::Attributes,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            attribute_name: Some(name.to_string()),
            old_value,
        }
    }

    pub fn character_data(target: NodeId, old_value: String) -> Self {
        Self {
            mutation_type: MutationType::CharacterData,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            attribute_name: None,
            old_value: Some(old_value),
        }
    }

    pub fn child_list(target: NodeId, added_nodes: Vec<NodeId>, removed_nodes: Vec<NodeId>) -> Self {
        Self {
            mutation_type: MutationType::ChildList,
            target,
            added_nodes,
            removed_nodes,
            attribute_name: None,
            old_value: None,
        }
    }
}

/// Pending records, drained by `Document::take_mutation_records`
#[derive(Debug, Default)]
pub(crate) struct MutationLog {
    records: Vec<MutationRecord>,
}

impl MutationLog {
    pub fn push(&mut self, record: MutationRecord) {
        // An empty child list change is not worth reporting
        if record.mutation_type == MutationType::ChildList
            && record.added_nodes.is_empty()
            && record.removed_nodes.is_empty()
        {
            return;
        }
        self.records.push(record);
    }

    pub fn take(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
