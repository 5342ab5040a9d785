//! Java adapter using tree-sitter.

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

/// Wrapper for member-level snippets (bare methods and fields).
const SNIPPET_PREFIX: &str = "class __Snippet__ {\n";
const SNIPPET_SUFFIX: &str = "\n}\n";

/// Java adapter using tree-sitter.
pub struct JavaAdapter {
    base: TreeSitterBase,
}

impl JavaAdapter {
    pub fn new() -> Self {
        Self {
            base: TreeSitterBase::new(tree_sitter_java::LANGUAGE.into(), "Java", &["java"]),
        }
    }

    fn method_info(&self, node: &Node, tree: &NativeTree) -> Result<FunctionInfo, ExtractionError> {
        let name = self.declared_name(node, tree)?.to_string();
        let parameters = self
            .parameters(node, tree)
            .into_iter()
            .map(str::to_string)
            .collect();
        // Constructors have no return type.
        let return_type = node
            .child_by_field_name("type")
            .and_then(|n| tree.text(&n).ok())
            .map(str::to_string);

        Ok(FunctionInfo {
            name,
            line: tree.line(node),
            parameters,
            return_type,
            modifiers: modifiers(node, tree),
        })
    }

    fn class_info(&self, node: &Node, tree: &NativeTree) -> Result<ClassInfo, ExtractionError> {
        let name = self.declared_name(node, tree)?.to_string();
        let mut supertypes = Vec::new();

        if let Some(superclass) = node.child_by_field_name("superclass") {
            if let Some(ty) = superclass.named_child(0) {
                supertypes.push(Supertype::extends(tree.text(&ty)?));
            }
        }
        if let Some(interfaces) = node.child_by_field_name("interfaces") {
            supertypes.extend(type_list_names(&interfaces, tree).into_iter().map(Supertype::implements));
        }
        // interface Foo extends Bar, Baz
        if let Some(extends) = TreeSitterBase::child_of_kind(node, "extends_interfaces") {
            supertypes.extend(type_list_names(&extends, tree).into_iter().map(Supertype::extends));
        }

        Ok(ClassInfo {
            name,
            line: tree.line(node),
            supertypes,
        })
    }

    fn import_info(&self, node: &Node, tree: &NativeTree) -> Result<ImportInfo, ExtractionError> {
        let is_static = TreeSitterBase::child_of_kind(node, "static").is_some();
        let is_wildcard = TreeSitterBase::child_of_kind(node, "asterisk").is_some();

        let path_node = TreeSitterBase::named_children(node)
            .into_iter()
            .find(|c| c.kind() == "scoped_identifier" || c.kind() == "identifier")
            .ok_or(ExtractionError::MissingField {
                kind: node.kind(),
                field: "name",
            })?;
        let path = tree.text(&path_node)?;

        Ok(ImportInfo {
            path: if is_wildcard {
                format!("{}.*", path)
            } else {
                path.to_string()
            },
            alias: None,
            line: tree.line(node),
            flags: ImportFlags {
                is_static,
                is_wildcard,
                is_from: false,
            },
        })
    }
}

impl Default for JavaAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageAdapter for JavaAdapter {
    fn language(&self) -> Language {
        Language::Java
    }

    fn supported_extensions(&self) -> &[&'static str] {
        self.base.extensions()
    }

    fn parse(&self, source: &str) -> Result<NativeTree, ParseError> {
        let source = normalize_source(source);
        let err = match self.base.parse_strict(&source) {
            Ok(tree) => return Ok(NativeTree::new(tree, source, Language::Java)),
            Err(err) => err,
        };

        // Relaxed retry: members without an enclosing class.
        let wrapped = format!("{}{}{}", SNIPPET_PREFIX, source, SNIPPET_SUFFIX);
        match self.base.parse_strict(&wrapped) {
            Ok(tree) => {
                debug!("parsed Java snippet inside a synthetic class");
                Ok(NativeTree::wrapped(tree, wrapped, Language::Java, 1))
            }
            Err(_) => Err(err),
        }
    }

    fn classify(&self, grammar_kind: &str) -> NodeKind {
        match grammar_kind {
            "program" => NodeKind::Module,
            "class_declaration" | "record_declaration" => NodeKind::Class,
            "interface_declaration" | "annotation_type_declaration" => NodeKind::Interface,
            "enum_declaration" => NodeKind::Enum,
            "method_declaration" | "constructor_declaration" | "compact_constructor_declaration" => {
                NodeKind::Function
            }
            "method_invocation" | "object_creation_expression" => NodeKind::Call,
            "identifier" => NodeKind::Identifier,
            "import_declaration" => NodeKind::Import,
            "variable_declarator" => NodeKind::Variable,
            "formal_parameter" | "catch_formal_parameter" => NodeKind::Parameter,
            "assignment_expression" => NodeKind::Assignment,
            "decimal_integer_literal"
            | "hex_integer_literal"
            | "octal_integer_literal"
            | "binary_integer_literal"
            | "decimal_floating_point_literal"
            | "hex_floating_point_literal"
            | "string_literal"
            | "text_block"
            | "character_literal"
            | "true"
            | "false"
            | "null_literal" => NodeKind::Literal,
            "return_statement" => NodeKind::Return,
            "if_statement" | "switch_expression" | "ternary_expression" | "try_statement" | "catch_clause" => {
                NodeKind::Branch
            }
            "for_statement" | "enhanced_for_statement" | "while_statement" | "do_statement" => NodeKind::Loop,
            "block" | "class_body" | "interface_body" | "enum_body" | "constructor_body" => NodeKind::Block,
            _ => NodeKind::Other,
        }
    }

    fn callee_name<'t>(&self, node: &Node<'t>, tree: &'t NativeTree) -> Option<&'t str> {
        match node.kind() {
            "method_invocation" => tree.field_text(node, "name").ok(),
            // new Foo<>(...) calls Foo's constructor
            "object_creation_expression" => tree.field_text(node, "type").ok().map(simple_type_name),
            _ => None,
        }
    }

    fn parameters<'t>(&self, node: &Node<'t>, tree: &'t NativeTree) -> Vec<&'t str> {
        let Some(params) = node.child_by_field_name("parameters") else {
            return Vec::new();
        };
        TreeSitterBase::named_children(&params)
            .iter()
            .filter_map(|p| match p.kind() {
                "formal_parameter" => tree.field_text(p, "name").ok(),
                // String... args
                "spread_parameter" => TreeSitterBase::child_of_kind(p, "variable_declarator")
                    .and_then(|d| tree.field_text(&d, "name").ok()),
                _ => None,
            })
            .collect()
    }

    fn collect_metadata(&self, node: &Node, tree: &NativeTree, metadata: &mut Metadata) -> Result<(), ExtractionError> {
        match node.kind() {
            "method_declaration" | "constructor_declaration" | "compact_constructor_declaration" => {
                let info = self.method_info(node, tree)?;
                metadata
                    .variables
                    .extend(info.parameters.iter().map(|name| VariableInfo {
                        name: name.clone(),
                        line: info.line,
                        binding: BindingKind::Parameter,
                    }));
                metadata.functions.push(info);
            }
            "class_declaration" | "interface_declaration" | "enum_declaration" | "record_declaration" => {
                metadata.classes.push(self.class_info(node, tree)?)
            }
            "import_declaration" => metadata.imports.push(self.import_info(node, tree)?),
            _ => record_bindings(self, node, tree, metadata),
        }
        Ok(())
    }

    fn flow_step<'t>(&self, node: &Node<'t>, tree: &'t NativeTree) -> FlowStep<'t> {
        let field = |name: &'static str| node.child_by_field_name(name);

        match node.kind() {
            "method_declaration" | "constructor_declaration" | "compact_constructor_declaration" => {
                match self.declared_name(node, tree) {
                    Ok(name) => FlowStep::Function {
                        name,
                        parameters: self.parameters(node, tree),
                        body: field("body").into_iter().collect(),
                    },
                    Err(_) => FlowStep::Skip,
                }
            }
            "class_declaration" | "interface_declaration" | "enum_declaration" | "record_declaration" => {
                FlowStep::Walk(field("body").into_iter().collect())
            }
            "variable_declarator" => {
                let in_field = node
                    .parent()
                    .is_some_and(|p| p.kind() == "field_declaration");
                FlowStep::Bind {
                    values: field("value").into_iter().collect(),
                    targets: field("name").into_iter().collect(),
                    binding: if in_field {
                        BindingKind::Field
                    } else {
                        BindingKind::Local
                    },
                    then: Vec::new(),
                }
            }
            "assignment_expression" => {
                // x += y reads x before rebinding it.
                let compound = field("operator")
                    .and_then(|op| tree.text(&op).ok())
                    .is_some_and(|op| op != "=");
                let values = if compound {
                    field("left").into_iter().chain(field("right")).collect()
                } else {
                    field("right").into_iter().collect()
                };
                FlowStep::Bind {
                    values,
                    targets: field("left").into_iter().collect(),
                    binding: BindingKind::Local,
                    then: Vec::new(),
                }
            }
            "enhanced_for_statement" => FlowStep::Bind {
                values: field("value").into_iter().collect(),
                targets: field("name").into_iter().collect(),
                binding: BindingKind::LoopTarget,
                then: field("body").into_iter().collect(),
            },
            "catch_formal_parameter" => FlowStep::Bind {
                values: Vec::new(),
                targets: field("name").into_iter().collect(),
                binding: BindingKind::Local,
                then: Vec::new(),
            },
            "identifier" => tree.text(node).map(FlowStep::Reference).unwrap_or(FlowStep::Skip),
            "field_access" if is_this_access(node) => tree
                .field_text(node, "field")
                .map(FlowStep::Reference)
                .unwrap_or(FlowStep::Skip),
            "field_access" => FlowStep::Walk(field("object").into_iter().collect()),
            // The method name itself is not a value.
            "method_invocation" => FlowStep::Walk(field("object").into_iter().chain(field("arguments")).collect()),
            "lambda_expression" => FlowStep::Walk(field("body").into_iter().collect()),
            "import_declaration" | "package_declaration" => FlowStep::Skip,
            _ => FlowStep::Walk(TreeSitterBase::named_children(node)),
        }
    }

    fn bind_targets<'t>(&self, target: &Node<'t>, tree: &'t NativeTree, binding: BindingKind) -> BindTargets<'t> {
        let mut out = BindTargets::default();
        match target.kind() {
            "identifier" => {
                if let Ok(name) = tree.text(target) {
                    out.names.push(BoundName {
                        name,
                        line: tree.line(target),
                        binding,
                    });
                }
            }
            "field_access" if is_this_access(target) => {
                if let Ok(name) = tree.field_text(target, "field") {
                    out.names.push(BoundName {
                        name,
                        line: tree.line(target),
                        binding: BindingKind::Field,
                    });
                }
            }
            // a[i] = ..., other.x = ...
            _ => out.reads.push(*target),
        }
        out
    }
}

fn modifiers(node: &Node, tree: &NativeTree) -> Vec<String> {
    let Some(modifiers) = TreeSitterBase::child_of_kind(node, "modifiers") else {
        return Vec::new();
    };
    let mut cursor = modifiers.walk();
    let out = modifiers
        .children(&mut cursor)
        .filter_map(|m| tree.text(&m).ok())
        .map(|m| m.trim().to_string())
        .collect();
    out
}

fn type_list_names<'t>(node: &Node<'t>, tree: &'t NativeTree) -> Vec<&'t str> {
    TreeSitterBase::child_of_kind(node, "type_list")
        .map(|list| {
            TreeSitterBase::named_children(&list)
                .iter()
                .filter_map(|t| tree.text(t).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// `java.util.ArrayList<String>` -> `ArrayList`
fn simple_type_name(text: &str) -> &str {
    let base = text.split('<').next().unwrap_or(text).trim();
    base.rsplit('.').next().unwrap_or(base)
}

fn is_this_access(node: &Node) -> bool {
    node.child_by_field_name("object")
        .is_some_and(|o| o.kind() == "this")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(src: &str) -> Metadata {
        let adapter = JavaAdapter::new();
        let tree = adapter.parse(src).unwrap();
        let mut metadata = Metadata::default();
        let mut stack = vec![tree.root()];
        while let Some(node) = stack.pop() {
            adapter.collect_metadata(&node, &tree, &mut metadata).unwrap();
            stack.extend(TreeSitterBase::named_children(&node).into_iter().rev());
        }
        metadata
    }

    #[test]
    fn test_parse_compilation_unit() {
        let tree = JavaAdapter::new()
            .parse("public class A { void run() {} }")
            .unwrap();
        assert_eq!(tree.root().kind(), "program");
    }

    #[test]
    fn test_bare_constructor_parses_inside_wrapper() {
        let tree = JavaAdapter::new()
            .parse("Point(int x) {\n    this.x = x;\n}")
            .unwrap();
        assert_eq!(tree.root().kind(), "class_body");
        let ctor = tree.root().named_child(0).unwrap();
        assert_eq!(ctor.kind(), "constructor_declaration");
        assert_eq!(tree.line(&ctor), 1);
    }

    #[test]
    fn test_unbalanced_braces_fail() {
        assert!(JavaAdapter::new().parse("class A { void f( }").is_err());
    }

    #[test]
    fn test_method_metadata() {
        let meta = metadata(
            "public class Calc {\n    public static int add(int a, int b) { return a + b; }\n    Calc(String... names) {}\n}",
        );
        assert_eq!(meta.functions.len(), 2);
        let add = &meta.functions[0];
        assert_eq!(add.name, "add");
        assert_eq!(add.line, 2);
        assert_eq!(add.parameters, vec!["a", "b"]);
        assert_eq!(add.return_type.as_deref(), Some("int"));
        assert_eq!(add.modifiers, vec!["public", "static"]);

        let ctor = &meta.functions[1];
        assert_eq!(ctor.name, "Calc");
        assert_eq!(ctor.return_type, None);
        assert_eq!(ctor.parameters, vec!["names"]);
    }

    #[test]
    fn test_supertypes() {
        let meta = metadata(
            "class Dog extends Animal implements Pet, Comparable<Dog> {}\ninterface Pet extends Named {}",
        );
        let dog = &meta.classes[0];
        assert_eq!(dog.supertypes[0], Supertype::extends("Animal"));
        assert_eq!(dog.supertypes[1], Supertype::implements("Pet"));
        assert_eq!(dog.supertypes[2], Supertype::implements("Comparable<Dog>"));
        assert_eq!(meta.classes[1].supertypes, vec![Supertype::extends("Named")]);
    }

    #[test]
    fn test_import_metadata() {
        let meta = metadata("import java.util.List;\nimport static java.lang.Math.*;\nclass A {}");
        assert_eq!(meta.imports.len(), 2);
        assert_eq!(meta.imports[0].path, "java.util.List");
        assert!(!meta.imports[0].flags.is_static);
        assert_eq!(meta.imports[1].path, "java.lang.Math.*");
        assert!(meta.imports[1].flags.is_static);
        assert!(meta.imports[1].flags.is_wildcard);
    }

    #[test]
    fn test_field_and_local_bindings() {
        let meta = metadata("class A {\n    int count = 0;\n    void f() { int x = 1; this.count = x; }\n}");
        let bound: Vec<(&str, BindingKind)> = meta.variables.iter().map(|v| (v.name.as_str(), v.binding)).collect();
        assert_eq!(
            bound,
            vec![
                ("count", BindingKind::Field),
                ("x", BindingKind::Local),
                ("count", BindingKind::Field),
            ]
        );
    }

    #[test]
    fn test_simple_type_name() {
        assert_eq!(simple_type_name("java.util.ArrayList<String>"), "ArrayList");
        assert_eq!(simple_type_name("Foo"), "Foo");
    }
}
