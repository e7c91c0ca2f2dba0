// Copyright (c) 2026 Gantry Contributors
// SPDX-License-Identifier: MIT

//! Append-only pipeline graph builder.
//!
//! Nodes are addressed through opaque [`NodeRef`] handles that only the
//! builder issues, so a flow can only target a node that already exists
//! in the graph. That structurally forbids cycles without a separate
//! cycle check.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::errors::GraphError;
use crate::graph::node::{ArgumentBinding, Group, LiteralGroup, ProcessorSpec};
use crate::graph::pipeline::Pipeline;
use crate::graph::DEFAULT_GROUP;
use crate::resolver::FunctionReference;

/// Opaque handle to a node inside one [`GraphBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRef {
    index: usize,
}

/// Builds a pipeline graph through strictly append-only operations, each
/// validated eagerly at the call that would violate an invariant.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    /// Insertion-ordered (name, spec) pairs.
    nodes: Vec<(String, ProcessorSpec)>,
    literals: Vec<LiteralGroup>,
    /// Occurrence counter per group name, so nodes reusing the same group
    /// name get distinct generated collection names.
    ordinals: HashMap<String, u32>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the first node of the graph, staging its literal inputs.
    ///
    /// Every named group and the optional default literal-data payload
    /// get a generated collection name `{group}_{ordinal}` and an
    /// argument binding on the node.
    pub fn start_with(
        &mut self,
        name: &str,
        groups: Vec<Group>,
        function: FunctionReference,
        config: Option<Value>,
        data: Option<Value>,
    ) -> Result<NodeRef, GraphError> {
        self.check_name(name)?;

        let mut staged: Vec<LiteralGroup> = Vec::with_capacity(groups.len() + 1);
        for group in groups {
            let collection_name = self.next_collection_name(&group.name);
            staged.push(LiteralGroup {
                node: name.to_string(),
                group: group.name,
                collection_name,
                data: group.data,
            });
        }
        if let Some(data) = data {
            let collection_name = self.next_collection_name(DEFAULT_GROUP);
            staged.push(LiteralGroup {
                node: name.to_string(),
                group: DEFAULT_GROUP.to_string(),
                collection_name,
                data,
            });
        }

        let arguments: BTreeMap<String, ArgumentBinding> = staged
            .iter()
            .map(|literal| {
                (
                    literal.group.clone(),
                    ArgumentBinding::Collection {
                        collection_name: literal.collection_name.clone(),
                    },
                )
            })
            .collect();
        self.literals.extend(staged);

        Ok(self.push(name, function, config, arguments))
    }

    /// Appends a node with no bindings yet.
    pub fn add(
        &mut self,
        name: &str,
        function: FunctionReference,
        config: Option<Value>,
    ) -> Result<NodeRef, GraphError> {
        self.check_name(name)?;
        Ok(self.push(name, function, config, BTreeMap::new()))
    }

    /// Binds node `from`'s output into node `into`'s argument `argument`.
    pub fn add_flow(
        &mut self,
        from: NodeRef,
        argument: &str,
        into: NodeRef,
    ) -> Result<(), GraphError> {
        let from_name = self.nodes[from.index].0.clone();
        let (into_name, into_spec) = &mut self.nodes[into.index];

        if into_spec.arguments.contains_key(argument) {
            return Err(GraphError::DuplicateBinding {
                node: into_name.clone(),
                argument: argument.to_string(),
            });
        }
        into_spec
            .arguments
            .insert(argument.to_string(), ArgumentBinding::Upstream { id: from_name });
        Ok(())
    }

    /// Freezes the graph into an immutable, content-addressed pipeline.
    pub fn build(self) -> Pipeline {
        Pipeline::freeze(self.nodes, self.literals)
    }

    fn check_name(&self, name: &str) -> Result<(), GraphError> {
        if self.nodes.iter().any(|(existing, _)| existing == name) {
            return Err(GraphError::DuplicateNode {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn next_collection_name(&mut self, group: &str) -> String {
        let ordinal = self.ordinals.entry(group.to_string()).or_insert(0);
        *ordinal += 1;
        format!("{group}_{ordinal}")
    }

    fn push(
        &mut self,
        name: &str,
        function: FunctionReference,
        config: Option<Value>,
        arguments: BTreeMap<String, ArgumentBinding>,
    ) -> NodeRef {
        let cfg = serde_json::to_string(&config.unwrap_or_else(|| Value::Object(Default::default())))
            .expect("node config serializes");
        let spec = ProcessorSpec {
            processor_id: function.processor_id.clone(),
            image: function,
            cfg,
            arguments,
        };
        self.nodes.push((name.to_string(), spec));
        NodeRef {
            index: self.nodes.len() - 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::parse;
    use serde_json::json;

    fn image(name: &str) -> FunctionReference {
        parse(&format!("{name}::org/img:v1")).unwrap()
    }

    #[test]
    fn test_start_with_generates_collection_names() {
        let mut builder = GraphBuilder::new();
        builder
            .start_with(
                "first",
                vec![Group::new("data", json!({"x": 1}))],
                image("proc"),
                None,
                Some(json!({"y": 2})),
            )
            .unwrap();

        let pipeline = builder.build();
        let literals = pipeline.literals();
        assert_eq!(literals.len(), 2);
        assert_eq!(literals[0].collection_name, "data_1");
        assert_eq!(literals[1].collection_name, "__input___1");

        let node = pipeline.node("first").unwrap();
        assert_eq!(
            node.arguments.get("data"),
            Some(&ArgumentBinding::Collection {
                collection_name: "data_1".to_string()
            })
        );
    }

    #[test]
    fn test_group_names_unique_across_nodes() {
        let mut builder = GraphBuilder::new();
        builder
            .start_with(
                "a",
                vec![Group::new("data", json!({"x": 1}))],
                image("proc"),
                None,
                None,
            )
            .unwrap();
        builder
            .start_with(
                "b",
                vec![Group::new("data", json!({"x": 2}))],
                image("proc"),
                None,
                None,
            )
            .unwrap();

        let pipeline = builder.build();
        let names: Vec<_> = pipeline
            .literals()
            .iter()
            .map(|l| l.collection_name.as_str())
            .collect();
        assert_eq!(names, vec!["data_1", "data_2"]);
    }

    #[test]
    fn test_duplicate_node_name_fails() {
        let mut builder = GraphBuilder::new();
        builder.add("dup", image("proc"), None).unwrap();
        let err = builder.add("dup", image("proc"), None).unwrap_err();
        assert_eq!(
            err,
            GraphError::DuplicateNode {
                name: "dup".to_string()
            }
        );
    }

    #[test]
    fn test_add_flow_binds_upstream() {
        let mut builder = GraphBuilder::new();
        let a = builder.add("a", image("proc"), None).unwrap();
        let b = builder.add("b", image("proc"), None).unwrap();
        builder.add_flow(a, "input", b).unwrap();

        let pipeline = builder.build();
        assert_eq!(
            pipeline.node("b").unwrap().arguments.get("input"),
            Some(&ArgumentBinding::Upstream {
                id: "a".to_string()
            })
        );
    }

    #[test]
    fn test_add_flow_twice_fails() {
        let mut builder = GraphBuilder::new();
        let a = builder.add("a", image("proc"), None).unwrap();
        let b = builder.add("b", image("proc"), None).unwrap();
        builder.add_flow(a, "input", b).unwrap();

        let err = builder.add_flow(a, "input", b).unwrap_err();
        assert_eq!(
            err,
            GraphError::DuplicateBinding {
                node: "b".to_string(),
                argument: "input".to_string()
            }
        );
    }

    #[test]
    fn test_add_flow_conflicts_with_literal_binding() {
        let mut builder = GraphBuilder::new();
        let a = builder
            .start_with(
                "a",
                vec![Group::new("data", json!({"x": 1}))],
                image("proc"),
                None,
                None,
            )
            .unwrap();
        let b = builder.add("b", image("proc"), None).unwrap();

        // "a" already has a literal binding for "data".
        let err = builder.add_flow(b, "data", a).unwrap_err();
        assert_eq!(
            err,
            GraphError::DuplicateBinding {
                node: "a".to_string(),
                argument: "data".to_string()
            }
        );
    }
}
