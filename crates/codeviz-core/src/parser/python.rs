//! Python adapter using tree-sitter.

use tracing::debug;
use tree_sitter::Node;

use super::error::{ExtractionError, ParseError};
use super::language::Language;
use super::traits::{record_bindings, BindTargets, BoundName, FlowStep, LanguageAdapter};
use super::treesitter::{normalize_source, NativeTree, TreeSitterBase};
use crate::graph::{
    BindingKind, ClassInfo, FunctionInfo, ImportFlags, ImportInfo, Metadata, NodeKind, Supertype,
    VariableInfo,
};

/// Python adapter using tree-sitter.
pub struct PythonAdapter {
    base: TreeSitterBase,
}

impl PythonAdapter {
    pub fn new() -> Self {
        Self {
            base: TreeSitterBase::new(tree_sitter_python::LANGUAGE.into(), "Python", &["py", "pyi"]),
        }
    }

    fn function_info(&self, node: &Node, tree: &NativeTree) -> Result<FunctionInfo, ExtractionError> {
        let name = self.declared_name(node, tree)?.to_string();
        let parameters = self
            .parameters(node, tree)
            .into_iter()
            .map(str::to_string)
            .collect();
        let return_type = node
            .child_by_field_name("return_type")
            .and_then(|n| tree.text(&n).ok())
            .map(str::to_string);

        Ok(FunctionInfo {
            name,
            line: tree.line(node),
            parameters,
            return_type,
            modifiers: self.modifiers(node, tree),
        })
    }

    /// Decorators of the enclosing `decorated_definition`, plus `async`.
    fn modifiers(&self, node: &Node, tree: &NativeTree) -> Vec<String> {
        let mut modifiers = Vec::new();
        if let Some(parent) = node.parent().filter(|p| p.kind() == "decorated_definition") {
            let mut cursor = parent.walk();
            for decorator in parent.children(&mut cursor).filter(|c| c.kind() == "decorator") {
                if let Ok(text) = tree.text(&decorator) {
                    modifiers.push(text.trim().to_string());
                }
            }
        }
        if TreeSitterBase::child_of_kind(node, "async").is_some() {
            modifiers.push("async".to_string());
        }
        modifiers
    }

    fn class_info(&self, node: &Node, tree: &NativeTree) -> Result<ClassInfo, ExtractionError> {
        let name = self.declared_name(node, tree)?.to_string();

        // Base classes; keyword arguments such as `metaclass=` are skipped.
        let supertypes = node
            .child_by_field_name("superclasses")
            .map(|args| {
                TreeSitterBase::named_children(&args)
                    .iter()
                    .filter(|c| c.kind() == "identifier" || c.kind() == "attribute")
                    .filter_map(|c| tree.text(c).ok())
                    .map(Supertype::extends)
                    .collect()
            })
            .unwrap_or_default();

        Ok(ClassInfo {
            name,
            line: tree.line(node),
            supertypes,
        })
    }

    fn import_infos(&self, node: &Node, tree: &NativeTree) -> Result<Vec<ImportInfo>, ExtractionError> {
        let line = tree.line(node);
        let mut imports = Vec::new();

        match node.kind() {
            "import_statement" => {
                let mut cursor = node.walk();
                for name in node.children_by_field_name("name", &mut cursor) {
                    let (path, alias) = import_name(&name, tree)?;
                    imports.push(ImportInfo {
                        path: path.to_string(),
                        alias: alias.map(str::to_string),
                        line,
                        flags: ImportFlags::default(),
                    });
                }
            }
            "import_from_statement" => {
                let module = tree.field_text(node, "module_name")?;
                let flags = ImportFlags {
                    is_from: true,
                    ..ImportFlags::default()
                };
                if TreeSitterBase::child_of_kind(node, "wildcard_import").is_some() {
                    imports.push(ImportInfo {
                        path: join_module(module, "*"),
                        alias: None,
                        line,
                        flags: ImportFlags {
                            is_wildcard: true,
                            ..flags
                        },
                    });
                }
                let mut cursor = node.walk();
                for name in node.children_by_field_name("name", &mut cursor) {
                    let (path, alias) = import_name(&name, tree)?;
                    imports.push(ImportInfo {
                        path: join_module(module, path),
                        alias: alias.map(str::to_string),
                        line,
                        flags,
                    });
                }
            }
            _ => {}
        }

        Ok(imports)
    }
}

impl Default for PythonAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageAdapter for PythonAdapter {
    fn language(&self) -> Language {
        Language::Python
    }

    fn supported_extensions(&self) -> &[&'static str] {
        self.base.extensions()
    }

    fn parse(&self, source: &str) -> Result<NativeTree, ParseError> {
        let source = normalize_source(source);
        let err = match self.base.parse_strict(&source) {
            Ok(tree) => return Ok(NativeTree::new(tree, source, Language::Python)),
            Err(err) => err,
        };

        // Relaxed retry: snippets pasted with a uniform indent.
        let dedented = dedent(&source);
        if dedented == source {
            return Err(err);
        }
        match self.base.parse_strict(&dedented) {
            Ok(tree) => {
                debug!("parsed Python after removing common indentation");
                Ok(NativeTree::new(tree, dedented, Language::Python))
            }
            Err(_) => Err(err),
        }
    }

    fn classify(&self, grammar_kind: &str) -> NodeKind {
        match grammar_kind {
            "module" => NodeKind::Module,
            "function_definition" => NodeKind::Function,
            "class_definition" => NodeKind::Class,
            "call" => NodeKind::Call,
            "identifier" => NodeKind::Identifier,
            "import_statement" | "import_from_statement" | "future_import_statement" => NodeKind::Import,
            "assignment" | "augmented_assignment" => NodeKind::Assignment,
            "string" | "concatenated_string" | "integer" | "float" | "true" | "false" | "none" => {
                NodeKind::Literal
            }
            "return_statement" => NodeKind::Return,
            "if_statement" | "elif_clause" | "else_clause" | "conditional_expression" | "match_statement"
            | "try_statement" | "except_clause" => NodeKind::Branch,
            "for_statement" | "while_statement" => NodeKind::Loop,
            "block" => NodeKind::Block,
            _ => NodeKind::Other,
        }
    }

    fn callee_name<'t>(&self, node: &Node<'t>, tree: &'t NativeTree) -> Option<&'t str> {
        let function = node.child_by_field_name("function")?;
        match function.kind() {
            "identifier" => tree.text(&function).ok(),
            // Method call: obj.method()
            "attribute" => tree.field_text(&function, "attribute").ok(),
            _ => None,
        }
    }

    fn parameters<'t>(&self, node: &Node<'t>, tree: &'t NativeTree) -> Vec<&'t str> {
        let Some(params) = node.child_by_field_name("parameters") else {
            return Vec::new();
        };
        TreeSitterBase::named_children(&params)
            .iter()
            .filter_map(|p| parameter_name(p, tree))
            .filter(|name| *name != "self" && *name != "cls")
            .collect()
    }

    fn collect_metadata(&self, node: &Node, tree: &NativeTree, metadata: &mut Metadata) -> Result<(), ExtractionError> {
        match node.kind() {
            "function_definition" => {
                let info = self.function_info(node, tree)?;
                metadata
                    .variables
                    .extend(info.parameters.iter().map(|name| VariableInfo {
                        name: name.clone(),
                        line: info.line,
                        binding: BindingKind::Parameter,
                    }));
                metadata.functions.push(info);
            }
            "class_definition" => metadata.classes.push(self.class_info(node, tree)?),
            "import_statement" | "import_from_statement" => {
                metadata.imports.extend(self.import_infos(node, tree)?)
            }
            _ => record_bindings(self, node, tree, metadata),
        }
        Ok(())
    }

    fn flow_step<'t>(&self, node: &Node<'t>, tree: &'t NativeTree) -> FlowStep<'t> {
        let field = |name: &'static str| node.child_by_field_name(name);

        match node.kind() {
            "function_definition" => match self.declared_name(node, tree) {
                Ok(name) => FlowStep::Function {
                    name,
                    parameters: self.parameters(node, tree),
                    body: field("body").into_iter().collect(),
                },
                Err(_) => FlowStep::Skip,
            },
            "class_definition" => FlowStep::Walk(field("superclasses").into_iter().chain(field("body")).collect()),
            "assignment" => FlowStep::Bind {
                values: field("right").into_iter().collect(),
                targets: field("left").into_iter().collect(),
                binding: BindingKind::Local,
                then: Vec::new(),
            },
            // `x += 1` reads x before rebinding it.
            "augmented_assignment" => FlowStep::Bind {
                values: field("left").into_iter().chain(field("right")).collect(),
                targets: field("left").into_iter().collect(),
                binding: BindingKind::Local,
                then: Vec::new(),
            },
            "for_statement" => FlowStep::Bind {
                values: field("right").into_iter().collect(),
                targets: field("left").into_iter().collect(),
                binding: BindingKind::LoopTarget,
                then: field("body").into_iter().chain(field("alternative")).collect(),
            },
            // Clauses bind their targets before the body reads them.
            "list_comprehension" | "set_comprehension" | "dictionary_comprehension" | "generator_expression" => {
                let body = field("body");
                let mut steps: Vec<Node<'t>> = TreeSitterBase::named_children(node)
                    .into_iter()
                    .filter(|c| Some(*c) != body)
                    .collect();
                steps.extend(body);
                FlowStep::Walk(steps)
            }
            "for_in_clause" => {
                let mut cursor = node.walk();
                let values: Vec<Node<'t>> = node.children_by_field_name("right", &mut cursor).collect();
                FlowStep::Bind {
                    values,
                    targets: field("left").into_iter().collect(),
                    binding: BindingKind::LoopTarget,
                    then: Vec::new(),
                }
            }
            // `with open(p) as fh`, `except E as e`, `case X() as x`.
            "as_pattern" => FlowStep::Bind {
                values: node.named_child(0).into_iter().collect(),
                targets: field("alias").into_iter().collect(),
                binding: BindingKind::Local,
                then: Vec::new(),
            },
            "except_clause" => except_step(node),
            "named_expression" => FlowStep::Bind {
                values: field("value").into_iter().collect(),
                targets: field("name").into_iter().collect(),
                binding: BindingKind::Local,
                then: Vec::new(),
            },
            "identifier" => tree.text(node).map(FlowStep::Reference).unwrap_or(FlowStep::Skip),
            "attribute" if is_self_attribute(node, tree) => {
                tree.text(node).map(FlowStep::Reference).unwrap_or(FlowStep::Skip)
            }
            "attribute" => FlowStep::Walk(field("object").into_iter().collect()),
            "keyword_argument" => FlowStep::Walk(field("value").into_iter().collect()),
            "lambda" => FlowStep::Walk(field("body").into_iter().collect()),
            "import_statement" | "import_from_statement" | "future_import_statement" | "global_statement"
            | "nonlocal_statement" => FlowStep::Skip,
            _ => FlowStep::Walk(TreeSitterBase::named_children(node)),
        }
    }

    fn bind_targets<'t>(&self, target: &Node<'t>, tree: &'t NativeTree, binding: BindingKind) -> BindTargets<'t> {
        let mut out = BindTargets::default();
        let mut stack = vec![*target];

        while let Some(node) = stack.pop() {
            match node.kind() {
                "identifier" => {
                    if let Ok(name) = tree.text(&node) {
                        out.names.push(BoundName {
                            name,
                            line: tree.line(&node),
                            binding,
                        });
                    }
                }
                "attribute" if is_self_attribute(&node, tree) => {
                    if let Ok(name) = tree.text(&node) {
                        out.names.push(BoundName {
                            name,
                            line: tree.line(&node),
                            binding: BindingKind::Field,
                        });
                    }
                }
                "pattern_list" | "tuple_pattern" | "list_pattern" | "tuple" | "list" | "expression_list"
                | "list_splat_pattern" | "parenthesized_expression" | "as_pattern_target" => {
                    stack.extend(TreeSitterBase::named_children(&node).into_iter().rev());
                }
                // Subscripts and foreign attributes read rather than bind.
                _ => out.reads.push(node),
            }
        }

        out
    }
}

/// `except E as e:` in grammars that keep the alias outside an `as_pattern`.
fn except_step<'t>(node: &Node<'t>) -> FlowStep<'t> {
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
    let Some(split) = children.iter().position(|c| c.kind() == "as") else {
        return FlowStep::Walk(TreeSitterBase::named_children(node));
    };
    let named = |nodes: &[Node<'t>]| nodes.iter().filter(|c| c.is_named()).copied().collect::<Vec<_>>();
    let after = named(&children[split + 1..]);
    FlowStep::Bind {
        values: named(&children[..split]),
        targets: after.first().copied().into_iter().collect(),
        binding: BindingKind::Local,
        then: after.into_iter().skip(1).collect(),
    }
}

fn parameter_name<'t>(param: &Node<'t>, tree: &'t NativeTree) -> Option<&'t str> {
    match param.kind() {
        "identifier" => tree.text(param).ok(),
        "default_parameter" | "typed_default_parameter" => tree.field_text(param, "name").ok(),
        "typed_parameter" | "list_splat_pattern" | "dictionary_splat_pattern" => param
            .named_child(0)
            .and_then(|inner| parameter_name(&inner, tree)),
        _ => None,
    }
}

fn import_name<'t>(name: &Node<'t>, tree: &'t NativeTree) -> Result<(&'t str, Option<&'t str>), ExtractionError> {
    if name.kind() == "aliased_import" {
        Ok((tree.field_text(name, "name")?, tree.field_text(name, "alias").ok()))
    } else {
        Ok((tree.text(name)?, None))
    }
}

fn join_module(module: &str, name: &str) -> String {
    if module.ends_with('.') {
        format!("{}{}", module, name)
    } else {
        format!("{}.{}", module, name)
    }
}

fn is_self_attribute(node: &Node, tree: &NativeTree) -> bool {
    node.child_by_field_name("object")
        .filter(|o| o.kind() == "identifier")
        .and_then(|o| tree.text(&o).ok())
        == Some("self")
}

/// Remove the indentation shared by every non-blank line.
fn dedent(source: &str) -> String {
    let indent = source
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);
    if indent == 0 {
        return source.to_string();
    }

    source
        .split('\n')
        .map(|l| if l.trim().is_empty() { "" } else { &l[indent..] })
        .collect::<Vec<_>>()
        .join("\n")
}
