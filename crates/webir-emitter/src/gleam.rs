//! Gleam Binding Emitter.
//!
//! Emission is a pure function of the IR document: it returns every file
//! as an [`EmittedFile`] and never touches the filesystem. Output layout,
//! relative to the output directory:
//!
//! - `src/<interface>.gleam`: one module per IR interface with its opaque
//!   handle type and one function per merged member;
//! - `src/upcast.gleam`: identity externals from each interface handle to
//!   each ancestor handle;
//! - `src/<package>.gleam`: the aggregator re-exporting every type and
//!   function above, first occurrence of a name winning.

use indexmap::{IndexMap, IndexSet};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, debug_span, trace};

use webir_common::{IrDocument, MemberEntry, MethodEntry, PropertyEntry, event_name, to_pascal, to_snake};

use crate::inheritance::InheritanceResolver;
use crate::output::{EmitError, EmittedFile};
use crate::printer::SourcePrinter;
use crate::types::TargetType;

pub const DEFAULT_PACKAGE_NAME: &str = "twig";
pub const UPCAST_MODULE: &str = "upcast";

const JS_REF_MODULE: &str = "webir/js_ref";
const EVENT_MODULE: &str = "webir/event";
const HANDLE_PARAM: &str = "el";
const CALLBACK_PARAM: &str = "cb";

const GLEAM_RESERVED: &[&str] = &[
    "as", "assert", "auto", "case", "const", "delegate", "derive", "echo", "else", "fn", "if",
    "implement", "import", "let", "macro", "opaque", "panic", "pub", "test", "todo", "type", "use",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Name of the aggregator module, `src/<package_name>.gleam`.
    pub package_name: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        EmitOptions {
            package_name: DEFAULT_PACKAGE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GleamEmitter {
    options: EmitOptions,
}

/// Naming decided once per interface before any module is rendered.
#[derive(Debug, Clone)]
struct ModulePlan {
    interface: String,
    module: String,
    type_name: String,
}

/// A rendered module and the public names it defines.
struct RenderedModule {
    module: String,
    types: Vec<String>,
    functions: Vec<String>,
    contents: String,
}

impl RenderedModule {
    fn into_file(self) -> EmittedFile {
        EmittedFile::new(module_path(&self.module), self.contents)
    }
}

impl GleamEmitter {
    pub fn new(options: EmitOptions) -> Self {
        GleamEmitter { options }
    }

    pub fn options(&self) -> &EmitOptions {
        &self.options
    }

    pub fn emit(&self, document: &IrDocument) -> Result<Vec<EmittedFile>, EmitError> {
        let package = &self.options.package_name;
        if !is_module_name(package) {
            return Err(EmitError::InvalidPackageName {
                name: package.clone(),
            });
        }

        let plans = plan_modules(document, package)?;
        let resolver = InheritanceResolver::new(&document.extends);

        let mut rendered = Vec::with_capacity(plans.len() + 1);
        for plan in &plans {
            let _span = debug_span!("emit_interface", interface = %plan.interface).entered();
            let entries = resolver.merged_entries(&plan.interface, &document.ir);
            debug!(module = %plan.module, members = entries.len(), "rendering interface module");
            rendered.push(render_interface(plan, &entries));
        }
        rendered.push(render_upcasts(&plans, &resolver));

        let aggregator = render_aggregator(package, &rendered);
        let mut files: Vec<EmittedFile> = rendered.into_iter().map(RenderedModule::into_file).collect();
        files.push(aggregator);
        Ok(files)
    }
}

fn plan_modules(document: &IrDocument, package: &str) -> Result<Vec<ModulePlan>, EmitError> {
    let mut owners: IndexMap<String, String> = IndexMap::new();
    owners.insert(UPCAST_MODULE.to_string(), UPCAST_MODULE.to_string());
    owners.insert(package.to_string(), package.to_string());

    let mut plans = Vec::with_capacity(document.ir.len());
    for interface in document.ir.names() {
        let module = value_name(interface);
        if let Some(first) = owners.get(&module) {
            return Err(EmitError::ModuleClash {
                module,
                first: first.clone(),
                second: interface.to_string(),
            });
        }
        owners.insert(module.clone(), interface.to_string());
        plans.push(ModulePlan {
            interface: interface.to_string(),
            module,
            type_name: type_name(interface),
        });
    }
    Ok(plans)
}

fn render_interface(plan: &ModulePlan, entries: &[&MemberEntry]) -> RenderedModule {
    let mut body = SourcePrinter::new();
    let mut functions: IndexSet<String> = IndexSet::new();
    let mut uses_unknown = false;
    let mut uses_event = false;

    for entry in entries {
        let fn_name = value_name(entry.name());
        if functions.contains(&fn_name) {
            trace!(member = entry.name(), function = %fn_name, "function name taken, skipped");
            continue;
        }
        body.blank_line();
        if let Some(doc) = entry.doc() {
            body.doc_comment(doc);
        }
        match entry {
            MemberEntry::Method(method) => {
                uses_unknown |= render_method(&mut body, plan, method, &fn_name);
            }
            MemberEntry::Property(property) => {
                uses_unknown |= render_property(&mut body, plan, property, &fn_name);
            }
            MemberEntry::Event(event) => {
                render_event(&mut body, plan, event, &fn_name);
                uses_unknown = true;
                uses_event = true;
            }
        }
        functions.insert(fn_name);
    }

    let mut printer = SourcePrinter::new();
    printer.line(&format!("// Generated from DOM interface: {}", plan.interface));
    printer.blank_line();
    if uses_event {
        printer.line(&format!("import {EVENT_MODULE}"));
    }
    if uses_unknown {
        printer.line(&format!("import {JS_REF_MODULE}.{{type JsRef, type JsUnknown}}"));
    } else {
        printer.line(&format!("import {JS_REF_MODULE}.{{type JsRef}}"));
    }
    printer.blank_line();
    printer.line(&format!("pub type {}", plan.type_name));
    let body = body.finish();
    if !body.is_empty() {
        printer.blank_line();
        printer.write(&body);
    }

    RenderedModule {
        module: plan.module.clone(),
        types: vec![plan.type_name.clone()],
        functions: functions.into_iter().collect(),
        contents: printer.finish(),
    }
}

/// Returns whether the signature mentions `JsUnknown`.
fn render_method(
    printer: &mut SourcePrinter,
    plan: &ModulePlan,
    method: &MethodEntry,
    fn_name: &str,
) -> bool {
    let mut taken: IndexSet<String> = IndexSet::new();
    taken.insert(HANDLE_PARAM.to_string());

    let mut signature = format!("{HANDLE_PARAM}: JsRef({})", plan.type_name);
    let mut uses_unknown = false;
    for parameter in &method.parameters {
        let mut name = value_name(&parameter.name);
        while taken.contains(&name) {
            name.push('_');
        }
        let ty = TargetType::from_type_text(&parameter.type_text);
        uses_unknown |= ty == TargetType::Opaque;
        signature.push_str(&format!(", {name}: {ty}"));
        taken.insert(name);
    }
    let ret = TargetType::from_type_text(&method.return_type);
    uses_unknown |= ret == TargetType::Opaque;

    printer.line(&external(&plan.interface, &method.name, fn_name));
    printer.line(&format!("pub fn {fn_name}({signature}) -> {ret}"));
    uses_unknown
}

fn render_property(
    printer: &mut SourcePrinter,
    plan: &ModulePlan,
    property: &PropertyEntry,
    fn_name: &str,
) -> bool {
    let ty = TargetType::from_type_text(&property.type_text);
    printer.line(&external(&plan.interface, &property.name, fn_name));
    printer.line(&format!(
        "pub fn {fn_name}({HANDLE_PARAM}: JsRef({})) -> {ty}",
        plan.type_name
    ));
    ty == TargetType::Opaque
}

fn render_event(printer: &mut SourcePrinter, plan: &ModulePlan, event: &PropertyEntry, fn_name: &str) {
    let dom_event = event_name(&event.name);
    printer.line(&format!("/// Registers a '{dom_event}' event listener."));
    printer.line(&format!(
        "pub fn {fn_name}({HANDLE_PARAM}: JsRef({}), {CALLBACK_PARAM}: JsUnknown) -> Nil {{",
        plan.type_name
    ));
    printer.increase_indent();
    printer.line(&format!(
        "event.add_event_listener({HANDLE_PARAM}, \"{dom_event}\", {CALLBACK_PARAM})"
    ));
    printer.decrease_indent();
    printer.line("}");
}

fn external(interface: &str, member: &str, fn_name: &str) -> String {
    format!("@external(javascript, \"{interface}.{member}\", \"{fn_name}\")")
}

fn render_upcasts(plans: &[ModulePlan], resolver: &InheritanceResolver<'_>) -> RenderedModule {
    let by_interface: IndexMap<&str, &ModulePlan> =
        plans.iter().map(|plan| (plan.interface.as_str(), plan)).collect();

    let mut imports: BTreeMap<&str, &str> = BTreeMap::new();
    let mut opaque: IndexSet<String> = IndexSet::new();
    let mut body = SourcePrinter::new();
    let mut functions: IndexSet<String> = IndexSet::new();

    for plan in plans {
        let ancestors = resolver.ancestors(&plan.interface);
        if ancestors.is_empty() {
            continue;
        }
        imports.insert(&plan.module, &plan.type_name);
        for ancestor in &ancestors {
            let target = by_interface.get(ancestor.as_str());
            let ancestor_module = target.map_or_else(|| value_name(ancestor), |t| t.module.clone());
            let fn_name = format!("{}_as_{}", plan.module, ancestor_module);
            if functions.contains(&fn_name) {
                trace!(ancestor = %ancestor, function = %fn_name, "upcast name taken, skipped");
                continue;
            }
            let ancestor_type = match target {
                Some(target) => {
                    imports.insert(&target.module, &target.type_name);
                    target.type_name.clone()
                }
                None => {
                    let ty = type_name(ancestor);
                    opaque.insert(ty.clone());
                    ty
                }
            };
            body.blank_line();
            body.line(&format!("@external(javascript, \"{JS_REF_MODULE}\", \"identity\")"));
            body.line(&format!(
                "pub fn {fn_name}({HANDLE_PARAM}: JsRef({})) -> JsRef({ancestor_type})",
                plan.type_name
            ));
            functions.insert(fn_name);
        }
    }
    debug!(upcasts = functions.len(), opaque = opaque.len(), "rendering upcast module");

    let mut printer = SourcePrinter::new();
    printer.line("// Generated upcasts from each DOM interface to its ancestors.");
    if !functions.is_empty() {
        printer.blank_line();
        for (module, ty) in &imports {
            printer.line(&format!("import {module}.{{type {ty}}}"));
        }
        printer.line(&format!("import {JS_REF_MODULE}.{{type JsRef}}"));
        if !opaque.is_empty() {
            printer.blank_line();
            for ty in &opaque {
                printer.line(&format!("pub type {ty}"));
            }
        }
        printer.blank_line();
        printer.write(&body.finish());
    }

    RenderedModule {
        module: UPCAST_MODULE.to_string(),
        types: opaque.into_iter().collect(),
        functions: functions.into_iter().collect(),
        contents: printer.finish(),
    }
}

fn render_aggregator(package: &str, modules: &[RenderedModule]) -> EmittedFile {
    let mut types: IndexMap<&str, &str> = IndexMap::new();
    let mut functions: IndexMap<&str, &str> = IndexMap::new();
    for module in modules {
        for ty in &module.types {
            types.entry(ty).or_insert(&module.module);
        }
        for function in &module.functions {
            functions.entry(function).or_insert(&module.module);
        }
    }

    let mut printer = SourcePrinter::new();
    printer.line(&format!("// Generated entry point re-exporting every {package} binding."));
    printer.blank_line();
    let mut imported: Vec<&str> = modules.iter().map(|m| m.module.as_str()).collect();
    imported.sort_unstable();
    for module in imported {
        printer.line(&format!("import {module}"));
    }
    if !types.is_empty() {
        printer.blank_line();
        for (ty, module) in &types {
            printer.line(&format!("pub type {ty} = {module}.{ty}"));
        }
    }
    if !functions.is_empty() {
        printer.blank_line();
        for (function, module) in &functions {
            printer.line(&format!("pub const {function} = {module}.{function}"));
        }
    }
    debug!(
        types = types.len(),
        functions = functions.len(),
        "rendering aggregator module"
    );
    EmittedFile::new(module_path(package), printer.finish())
}

fn module_path(module: &str) -> PathBuf {
    PathBuf::from("src").join(format!("{module}.gleam"))
}

/// Gleam value or module name for a member, parameter or interface name.
pub fn value_name(name: &str) -> String {
    let snake: String = to_snake(name)
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = snake.trim_start_matches('_');
    let mut ident = if trimmed.starts_with(|c: char| c.is_ascii_lowercase()) {
        trimmed.to_string()
    } else {
        format!("n{trimmed}")
    };
    if GLEAM_RESERVED.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}

/// Gleam type name for an interface: `HTMLElement` -> `HtmlElement`.
pub fn type_name(interface: &str) -> String {
    let pascal: String = to_pascal(interface)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    if pascal.starts_with(|c: char| c.is_ascii_uppercase()) {
        pascal
    } else {
        format!("T{pascal}")
    }
}

fn is_module_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_lowercase())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && !GLEAM_RESERVED.contains(&name)
}
