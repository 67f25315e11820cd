//! CST to AST lowering.

use crate::parser::cst::{
    AttributeNode, Document, EntityNode, EnumNode, FieldNode, ItemNode, NamespaceNode, ParamNode,
};

use super::{Attribute, AttributeName, Diagnostic, Entity, EnumDef, Field, Namespace};

pub(super) fn lower_document(doc: &Document, diagnostics: &mut Vec<Diagnostic>) -> Vec<Namespace> {
    doc.namespaces
        .iter()
        .map(|ns| lower_namespace(ns, diagnostics))
        .collect()
}

fn lower_namespace(node: &NamespaceNode, diagnostics: &mut Vec<Diagnostic>) -> Namespace {
    let mut entities = Vec::new();
    let mut enums = Vec::new();
    for item in &node.items {
        match item {
            ItemNode::Entity(entity) => entities.push(lower_entity(entity, diagnostics)),
            ItemNode::Enum(en) => enums.push(lower_enum(en)),
        }
    }
    Namespace {
        name: node.name.text.clone(),
        entities,
        enums,
        span: node.span,
    }
}

fn lower_entity(node: &EntityNode, diagnostics: &mut Vec<Diagnostic>) -> Entity {
    Entity {
        name: node.name.text.clone(),
        fields: node
            .fields
            .iter()
            .map(|f| lower_field(f, diagnostics))
            .collect(),
        span: node.span,
    }
}

fn lower_enum(node: &EnumNode) -> EnumDef {
    EnumDef {
        name: node.name.text.clone(),
        values: node.values.iter().map(|v| v.text.clone()).collect(),
        span: node.span,
    }
}

fn lower_field(node: &FieldNode, diagnostics: &mut Vec<Diagnostic>) -> Field {
    let mut attributes: Vec<Attribute> = node
        .attrs
        .iter()
        .map(|a| lower_attribute(a, diagnostics))
        .collect();
    // Stable sort: pk, unique, default, fk, then the rest in encounter order.
    attributes.sort_by_key(|a| a.name.priority());
    Field {
        name: node.name.text.clone(),
        ty: node.ty.text.clone(),
        attributes,
        span: node.span,
    }
}

fn lower_attribute(node: &AttributeNode, diagnostics: &mut Vec<Diagnostic>) -> Attribute {
    let name = AttributeName::from_source(&node.name.text);
    if let AttributeName::Other(other) = &name {
        diagnostics.push(Diagnostic::warning(
            format!("unrecognized attribute '@{other}'"),
            node.span,
        ));
    }
    // `@pk` and `@pk()` both lower to no parameters.
    let params = node
        .params
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(render_param)
        .collect();
    Attribute {
        name,
        params,
        span: node.span,
    }
}

/// Renders a parameter to its canonical string form, the representation the
/// generator layer consumes.
fn render_param(param: &ParamNode) -> String {
    match param {
        ParamNode::Str { value, .. } => value.clone(),
        ParamNode::Bool { value, .. } => value.to_string(),
        ParamNode::EntityRef { entity, column, .. } => {
            format!("> {}.{}", entity.text, column.text)
        }
        ParamNode::Call { name, args, .. } => {
            let rendered: Vec<String> = args.iter().map(render_param).collect();
            format!("{}({})", name.text, rendered.join(", "))
        }
        ParamNode::Url {
            scheme, host, tld, ..
        } => tld.as_ref().map_or_else(
            || format!("{}://{}", scheme.text, host.text),
            |tld| format!("{}://{}.{}", scheme.text, host.text, tld.text),
        ),
        ParamNode::Ident(ident) => ident.text.clone(),
    }
}
