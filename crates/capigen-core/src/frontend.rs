//! Lowering of a preprocessed header into the raw declaration tree.
//!
//! Parsing is delegated to tree-sitter's C grammar. The lowering walks the
//! file-scope declarations and rebuilds each declarator in type-derivation
//! order: tree-sitter nests `double (*x)[3]` as an array declarator around a
//! pointer declarator, which becomes a [`Declarator::Pointer`] to a
//! [`Declarator::Array`] here.

use tree_sitter::{Node as TsNode, Parser};
use tracing::debug;

use crate::ast::{
    ArraySize, Coord, Declarator, EnumDecl, EnumeratorDecl, FuncDecl, Header, Node, Param,
    Signature,
};
use crate::error::FrontendError;
use crate::preprocess::{LineMap, Preprocessed};

/// Parse preprocessed text and lower it.
pub fn parse(pre: &Preprocessed) -> Result<Header, FrontendError> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_c::LANGUAGE.into())?;

    let tree = parser
        .parse(&pre.source, None)
        .ok_or(FrontendError::NoTree)?;
    let root = tree.root_node();

    if root.has_error() {
        let row = first_error(root).map_or(0, |node| node.start_position().row);
        return Err(FrontendError::Syntax(pre.lines.coord(row)));
    }

    let lowering = Lowering {
        source: pre.source.as_bytes(),
        lines: &pre.lines,
    };

    let mut nodes = Vec::new();
    lowering.scope(root, &mut nodes)?;

    debug!(nodes = nodes.len(), "lowered header");
    Ok(Header { nodes })
}

fn first_error(node: TsNode<'_>) -> Option<TsNode<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

struct Lowering<'a> {
    source: &'a [u8],
    lines: &'a LineMap,
}

impl Lowering<'_> {
    fn text(&self, node: TsNode<'_>) -> String {
        node.utf8_text(self.source).unwrap_or_default().to_string()
    }

    fn coord(&self, node: TsNode<'_>) -> Coord {
        self.lines.coord(node.start_position().row)
    }

    /// File scope, or the body of an `extern "C" { ... }` block.
    fn scope(&self, node: TsNode<'_>, out: &mut Vec<Node>) -> Result<(), FrontendError> {
        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        for child in children {
            self.item(child, out)?;
        }
        Ok(())
    }

    fn item(&self, node: TsNode<'_>, out: &mut Vec<Node>) -> Result<(), FrontendError> {
        match node.kind() {
            "declaration" | "type_definition" | "function_definition" => {
                self.declaration(node, out)
            }
            // `enum tag { ... };` without declarators
            "enum_specifier" | "struct_specifier" | "union_specifier" => {
                self.enums_in(node, out);
                Ok(())
            }
            "linkage_specification" => match node.child_by_field_name("body") {
                Some(body) if body.kind() == "declaration_list" => self.scope(body, out),
                Some(body) => self.item(body, out),
                None => Ok(()),
            },
            "declaration_list" => self.scope(node, out),
            _ => Ok(()),
        }
    }

    fn declaration(&self, decl: TsNode<'_>, out: &mut Vec<Node>) -> Result<(), FrontendError> {
        let Some(type_node) = decl.child_by_field_name("type") else {
            return Ok(());
        };

        self.enums_in(type_node, out);
        let base = self.base_type(decl, type_node);

        let mut cursor = decl.walk();
        let declarators: Vec<_> = decl
            .children_by_field_name("declarator", &mut cursor)
            .collect();

        for declarator in declarators {
            let (name, ty) = self.derive(declarator, base.clone())?;
            let (Some(name), Some(signature)) = (name, function_signature(ty)) else {
                continue;
            };
            out.push(Node::Function(FuncDecl {
                name,
                coord: self.coord(declarator),
                signature,
            }));
        }

        Ok(())
    }

    /// Enum bodies anywhere inside a type specifier, including struct fields.
    fn enums_in(&self, node: TsNode<'_>, out: &mut Vec<Node>) {
        if node.kind() == "enum_specifier" {
            if let Some(body) = node.child_by_field_name("body") {
                out.push(Node::Enum(self.enum_decl(node, body)));
            }
        }

        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        for child in children {
            self.enums_in(child, out);
        }
    }

    fn enum_decl(&self, node: TsNode<'_>, body: TsNode<'_>) -> EnumDecl {
        let mut cursor = body.walk();
        let enumerators = body
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "enumerator")
            .filter_map(|child| {
                let name = child.child_by_field_name("name")?;
                Some(EnumeratorDecl {
                    name: self.text(name),
                    value: child.child_by_field_name("value").map(|v| self.text(v)),
                })
            })
            .collect();

        EnumDecl {
            tag: node.child_by_field_name("name").map(|n| self.text(n)),
            coord: self.coord(node),
            enumerators,
        }
    }

    /// Base type of a declaration or parameter. `owner` holds the qualifiers.
    fn base_type(&self, owner: TsNode<'_>, type_node: TsNode<'_>) -> Declarator {
        let names = match type_node.kind() {
            "struct_specifier" | "union_specifier" | "enum_specifier" => {
                let keyword = type_node.kind().trim_end_matches("_specifier").to_string();
                let mut names = vec![keyword];
                if let Some(tag) = type_node.child_by_field_name("name") {
                    names.push(self.text(tag));
                }
                names
            }
            _ => self
                .text(type_node)
                .split_whitespace()
                .map(str::to_string)
                .collect(),
        };

        Declarator::Type {
            names,
            is_const: has_const(owner, self.source),
        }
    }

    /// Apply the derivations of `node` to `ty`, returning the declared name.
    fn derive(
        &self,
        node: TsNode<'_>,
        ty: Declarator,
    ) -> Result<(Option<String>, Declarator), FrontendError> {
        match node.kind() {
            "identifier" | "type_identifier" | "field_identifier" | "primitive_type" => {
                Ok((Some(self.text(node)), ty))
            }
            "pointer_declarator" | "abstract_pointer_declarator" => {
                let ty = Declarator::Pointer {
                    is_const: has_const(node, self.source),
                    inner: Box::new(ty),
                };
                self.derive_inner(node, ty)
            }
            "array_declarator" | "abstract_array_declarator" => {
                let size = match node.child_by_field_name("size") {
                    Some(size) => self.array_size(size),
                    None => ArraySize::Unspecified,
                };
                self.derive_inner(node, Declarator::array_of(size, ty))
            }
            "function_declarator" | "abstract_function_declarator" => {
                let (params, variadic) = match node.child_by_field_name("parameters") {
                    Some(list) => self.parameters(list)?,
                    None => (Vec::new(), false),
                };
                let ty = Declarator::Function(Box::new(Signature {
                    ret: ty,
                    params,
                    variadic,
                }));
                self.derive_inner(node, ty)
            }
            "parenthesized_declarator"
            | "abstract_parenthesized_declarator"
            | "attributed_declarator" => {
                let mut cursor = node.walk();
                let inner = node.named_children(&mut cursor).find(|child| {
                    let kind = child.kind();
                    kind.ends_with("declarator") || kind.ends_with("identifier")
                });
                match inner {
                    Some(inner) => self.derive(inner, ty),
                    None => Ok((None, ty)),
                }
            }
            _ => Ok((None, ty)),
        }
    }

    fn derive_inner(
        &self,
        node: TsNode<'_>,
        ty: Declarator,
    ) -> Result<(Option<String>, Declarator), FrontendError> {
        match node.child_by_field_name("declarator") {
            Some(inner) => self.derive(inner, ty),
            None => Ok((None, ty)),
        }
    }

    fn parameters(&self, list: TsNode<'_>) -> Result<(Vec<Param>, bool), FrontendError> {
        let mut params = Vec::new();
        let mut variadic = false;

        let mut cursor = list.walk();
        let children: Vec<_> = list.named_children(&mut cursor).collect();
        for child in children {
            match child.kind() {
                "parameter_declaration" => {
                    let type_node = child
                        .child_by_field_name("type")
                        .ok_or_else(|| FrontendError::Syntax(self.coord(child)))?;
                    let base = self.base_type(child, type_node);
                    let (name, ty) = match child.child_by_field_name("declarator") {
                        Some(declarator) => self.derive(declarator, base)?,
                        None => (None, base),
                    };
                    params.push(Param { name, ty });
                }
                "variadic_parameter" => variadic = true,
                _ => {}
            }
        }

        Ok((params, variadic))
    }

    fn array_size(&self, size: TsNode<'_>) -> ArraySize {
        let text = self.text(size);
        if size.kind() == "number_literal" {
            if let Some(value) = parse_integer(&text) {
                return ArraySize::Literal(value);
            }
        }
        ArraySize::Expression(text)
    }
}

/// Whether `node` has a direct `const` qualifier child.
fn has_const(node: TsNode<'_>, source: &[u8]) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| child.kind() == "type_qualifier" && child.utf8_text(source) == Ok("const"));
    found
}

/// The signature of a function, or of the function behind pointers.
fn function_signature(ty: Declarator) -> Option<Signature> {
    match ty {
        Declarator::Function(signature) => Some(*signature),
        Declarator::Pointer { inner, .. } => function_signature(*inner),
        Declarator::Type { .. } | Declarator::Array { .. } => None,
    }
}

/// Parse a C integer literal, ignoring `u`/`l` suffixes.
fn parse_integer(text: &str) -> Option<u64> {
    let digits = text.trim_end_matches(['u', 'U', 'l', 'L']);

    if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = digits.strip_prefix("0b").or_else(|| digits.strip_prefix("0B")) {
        u64::from_str_radix(bin, 2).ok()
    } else if digits.len() > 1 && digits.starts_with('0') {
        u64::from_str_radix(&digits[1..], 8).ok()
    } else {
        digits.parse().ok()
    }
}
