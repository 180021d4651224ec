//! Go source emission.

use convgen_core::{TypeId, TypeKind, TypeName, Universe};

use super::GoConfig;
use super::imports::ImportTracker;
use super::naming::{private_function_name, public_function_name};
use crate::driver::GeneratedFile;
use crate::emit::{Block, Callee, Expr, IN, OUT, Stmt};
use crate::options::ExtraParam;
use crate::synth::Conversion;

const UNSAFE: &str = "unsafe";

/// Render a generated file into a complete Go source file.
pub fn render_file(universe: &Universe, file: &GeneratedFile, config: &GoConfig) -> String {
    let mut renderer = GoRenderer::new(universe, config, &file.namespace);
    for conversion in &file.conversions {
        renderer.render_conversion(conversion, &file.extra_params);
    }
    renderer.finish(&file.package, &file.extra_imports)
}

/// Renders functions into a buffer while tracking the imports they need.
pub struct GoRenderer<'a> {
    universe: &'a Universe,
    config: &'a GoConfig,
    imports: ImportTracker,
    output: String,
}

impl<'a> GoRenderer<'a> {
    pub fn new(universe: &'a Universe, config: &'a GoConfig, namespace: &str) -> Self {
        Self {
            universe,
            config,
            imports: ImportTracker::new(namespace),
            output: String::new(),
        }
    }

    /// The private function and, when eligible, its public wrapper.
    pub fn render_conversion(&mut self, conversion: &Conversion, extra_params: &[ExtraParam]) {
        let pair = conversion.pair();
        let private = private_function_name(self.universe, pair);
        let public = public_function_name(self.universe, pair);
        let signature = self.signature(pair.source, pair.target, extra_params);

        self.line(0, &format!("func {private}{signature} {{"));
        self.render_block(&conversion.function.body, 1);
        self.line(1, "return nil");
        self.line(0, "}");
        self.output.push('\n');

        if !conversion.emits_public() {
            return;
        }
        let mut args = vec![IN.to_string(), OUT.to_string()];
        args.extend(extra_params.iter().map(|param| param.name.clone()));
        self.line(0, &format!("// {public} is an autogenerated conversion function."));
        self.line(0, &format!("func {public}{signature} {{"));
        self.line(1, &format!("return {private}({})", args.join(", ")));
        self.line(0, "}");
        self.output.push('\n');
    }

    /// Rendered statements only, for inspecting a single body.
    pub fn render_body(mut self, block: &Block) -> String {
        self.render_block(block, 0);
        self.output
    }

    /// Assemble the file: header, build constraint, package clause, imports,
    /// then every rendered function.
    pub fn finish(self, package: &str, extra_imports: &[String]) -> String {
        let mut file = String::new();
        if let Some(header) = &self.config.header {
            file.push_str(header.trim_end());
            file.push_str("\n\n");
        }
        if !self.config.build_tag.is_empty() {
            file.push_str(&format!("// +build !{}\n\n", self.config.build_tag));
        }
        file.push_str("// Code generated by convgen. DO NOT EDIT.\n\n");
        file.push_str(&format!("package {package}\n\n"));

        let mut specs = self.imports.lines();
        for extra in extra_imports {
            let spec = if extra.contains('"') {
                extra.clone()
            } else {
                format!("{extra:?}")
            };
            if !specs.contains(&spec) {
                specs.push(spec);
            }
        }
        if !specs.is_empty() {
            file.push_str("import (\n");
            for spec in specs {
                file.push_str(&self.config.indent);
                file.push_str(&spec);
                file.push('\n');
            }
            file.push_str(")\n\n");
        }

        file.push_str(self.output.trim_end());
        file.push('\n');
        file
    }

    fn signature(&mut self, source: TypeId, target: TypeId, extra_params: &[ExtraParam]) -> String {
        let mut params = vec![
            format!("{IN} *{}", self.type_ref(source)),
            format!("{OUT} *{}", self.type_ref(target)),
        ];
        for param in extra_params {
            params.push(format!("{} {}", param.name, self.type_ref(param.ty)));
        }
        format!("({}) error", params.join(", "))
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn line(&mut self, depth: usize, text: &str) {
        if !text.is_empty() {
            for _ in 0..depth {
                self.output.push_str(&self.config.indent);
            }
            self.output.push_str(text);
        }
        self.output.push('\n');
    }

    fn render_block(&mut self, block: &Block, depth: usize) {
        for stmt in block {
            self.render_stmt(stmt, depth);
        }
    }

    fn render_stmt(&mut self, stmt: &Stmt, depth: usize) {
        match stmt {
            Stmt::Comment(text) => self.line(depth, &format!("// {text}")),
            Stmt::Verbatim(text) => {
                for line in text.trim_end_matches('\n').split('\n') {
                    self.line(depth, line);
                }
            }
            Stmt::Assign { target, value } => {
                let text = format!("{} = {}", self.expr(target), self.expr(value));
                self.line(depth, &text);
            }
            Stmt::Make { target, ty, len_of } => {
                let text = format!(
                    "{} = make({}, len({}))",
                    self.expr(target),
                    self.type_ref(*ty),
                    self.expr(len_of)
                );
                self.line(depth, &text);
            }
            Stmt::Allocate { target, elem } => {
                let text = format!("{} = new({})", self.expr(target), self.type_ref(*elem));
                self.line(depth, &text);
            }
            Stmt::Declare { name, elem } => {
                let text = format!("{name} := new({})", self.type_ref(*elem));
                self.line(depth, &text);
            }
            Stmt::BulkCopy { target, source } => {
                let text = format!("copy({}, {})", self.expr(target), self.expr(source));
                self.line(depth, &text);
            }
            Stmt::Call { callee, args } => {
                let callee = self.callee(callee);
                let args: Vec<String> = args.iter().map(|arg| self.expr(arg)).collect();
                self.line(depth, &format!("if err := {callee}({}); err != nil {{", args.join(", ")));
                self.line(depth + 1, "return err");
                self.line(depth, "}");
            }
            Stmt::NilGuard {
                source,
                target,
                body,
            } => {
                let (source, target) = (self.expr(source), self.expr(target));
                self.line(depth, &format!("if {source} != nil {{"));
                self.line(depth + 1, &format!("{IN}, {OUT} := &{source}, &{target}"));
                self.render_block(body, depth + 1);
                self.line(depth, "} else {");
                self.line(depth + 1, &format!("{target} = nil"));
                self.line(depth, "}");
            }
            Stmt::ForEachIndex {
                index,
                source,
                body,
            } => {
                let source = self.expr(source);
                self.line(depth, &format!("for {index} := range {source} {{"));
                self.render_block(body, depth + 1);
                self.line(depth, "}");
            }
            Stmt::ForEachEntry {
                key,
                value,
                source,
                body,
            } => {
                let source = self.expr(source);
                self.line(depth, &format!("for {key}, {value} := range {source} {{"));
                self.render_block(body, depth + 1);
                self.line(depth, "}");
            }
            Stmt::UnsupportedKeys { source, key } => {
                let (source, key) = (self.expr(source), self.type_ref(*key));
                self.line(depth, &format!("for range {source} {{"));
                self.line(
                    depth + 1,
                    &format!("// FIXME: Converting unassignable keys unsupported {key}"),
                );
                self.line(depth, "}");
            }
            Stmt::Discard(expr) => {
                let text = format!("_ = {}", self.expr(expr));
                self.line(depth, &text);
            }
        }
    }

    fn callee(&mut self, callee: &Callee) -> String {
        match callee {
            Callee::Manual(function) => self.qualified(function),
            Callee::Generated(pair) => public_function_name(self.universe, *pair),
        }
    }

    // ========================================================================
    // Expressions and types
    // ========================================================================

    fn expr(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Var(name) => name.clone(),
            Expr::Field(base, name) => format!("{}.{name}", self.operand(base)),
            Expr::Index(base, index) => format!("{}[{}]", self.operand(base), self.expr(index)),
            Expr::Deref(inner) => format!("*{}", self.expr(inner)),
            Expr::AddrOf(inner) => format!("&{}", self.expr(inner)),
            Expr::Convert(ty, inner) => {
                let ty = self.type_ref(*ty);
                let ty = if ty.starts_with('*') { format!("({ty})") } else { ty };
                format!("{ty}({})", self.expr(inner))
            }
            Expr::Reinterpret { ty, expr, by_value } => {
                let pointer = self.imports.add(UNSAFE).unwrap_or_else(|| UNSAFE.to_string());
                let (ty, inner) = (self.type_ref(*ty), self.expr(expr));
                if *by_value {
                    format!("*(*{ty})({pointer}.Pointer({inner}))")
                } else {
                    format!("({ty})({pointer}.Pointer({inner}))")
                }
            }
        }
    }

    /// Prefix operators bind looser than selectors and indexing.
    fn operand(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Deref(_) | Expr::AddrOf(_) | Expr::Reinterpret { by_value: true, .. } => {
                format!("({})", self.expr(expr))
            }
            _ => self.expr(expr),
        }
    }

    /// Go spelling of a type, qualified and imported when it lives in
    /// another namespace.
    fn type_ref(&mut self, id: TypeId) -> String {
        let universe = self.universe;
        let name = universe.name(id);
        if !name.is_anonymous() {
            return self.qualified(name);
        }
        match universe.kind(id) {
            TypeKind::Sequence { elem } => format!("[]{}", self.type_ref(*elem)),
            TypeKind::Associative { key, elem } => {
                format!("map[{}]{}", self.type_ref(*key), self.type_ref(*elem))
            }
            TypeKind::Pointer { elem } => format!("*{}", self.type_ref(*elem)),
            _ => name.name.clone(),
        }
    }

    fn qualified(&mut self, name: &TypeName) -> String {
        match self.imports.add(&name.namespace) {
            Some(local) => format!("{local}.{}", name.name),
            None => name.name.clone(),
        }
    }
}
