//! Stage compilation and interface reflection over naga IR.

use naga::{AddressSpace, Binding, Expression, Handle, Module, ResourceBinding, ScalarKind, TypeInner};

use super::{ShaderError, ShaderStage};

/// A located entry point input or output.
#[derive(Debug, Clone)]
pub(crate) struct IoVar {
    pub name: Option<String>,
    pub location: u32,
    pub inner: TypeInner,
    pub label: String,
}

#[derive(Debug, Clone)]
pub(crate) struct BlockMember {
    pub name: Option<String>,
    pub offset: u32,
    /// Byte size of the member type.
    pub size: u32,
    pub inner: TypeInner,
    pub label: String,
    /// Read by at least one function in the stage.
    pub used: bool,
}

/// The `var<uniform>` at `@group(0) @binding(0)`.
#[derive(Debug, Clone)]
pub(crate) struct BlockReflection {
    pub span: u32,
    pub members: Vec<BlockMember>,
}

/// Everything linking needs to know about one compiled stage.
#[derive(Debug, Clone)]
pub struct StageInterface {
    pub stage: ShaderStage,
    pub entry_point: String,
    pub(crate) inputs: Vec<IoVar>,
    pub(crate) outputs: Vec<IoVar>,
    pub(crate) block: Option<BlockReflection>,
    /// Resource declarations the binding model cannot serve.
    pub(crate) resource_problems: Vec<String>,
}

const BLOCK_BINDING: ResourceBinding = ResourceBinding {
    group: 0,
    binding: 0,
};

/// Parse and validate one WGSL stage and reflect its interface.
///
/// The source must contain exactly one entry point for `stage`; entry
/// points of other stages are ignored.
pub fn compile_stage(
    stage: ShaderStage,
    label: &str,
    source: &str,
) -> Result<StageInterface, ShaderError> {
    let compile_error = |diagnostic: String| ShaderError::Compile {
        stage,
        label: label.to_string(),
        diagnostic,
    };

    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| compile_error(e.emit_to_string(source)))?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::default(),
    )
    .validate(&module)
    .map_err(|e| compile_error(e.emit_to_string(source)))?;

    let mut entry_points = module
        .entry_points
        .iter()
        .filter(|ep| ep.stage == stage.to_naga());
    let entry = match (entry_points.next(), entry_points.next()) {
        (Some(ep), None) => ep,
        (None, _) => {
            return Err(compile_error(format!("no @{stage} entry point found")));
        }
        (Some(_), Some(_)) => {
            return Err(compile_error(format!(
                "more than one @{stage} entry point found"
            )));
        }
    };

    let mut inputs = Vec::new();
    for arg in &entry.function.arguments {
        collect_io(&module, arg.ty, arg.binding.as_ref(), arg.name.as_deref(), &mut inputs);
    }
    let mut outputs = Vec::new();
    if let Some(result) = &entry.function.result {
        collect_io(&module, result.ty, result.binding.as_ref(), None, &mut outputs);
    }

    let (block, resource_problems) = reflect_resources(&module);

    Ok(StageInterface {
        stage,
        entry_point: entry.name.clone(),
        inputs,
        outputs,
        block,
        resource_problems,
    })
}

fn collect_io(
    module: &Module,
    ty: Handle<naga::Type>,
    binding: Option<&Binding>,
    name: Option<&str>,
    out: &mut Vec<IoVar>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => out.push(IoVar {
            name: name.map(str::to_string),
            location: *location,
            inner: module.types[ty].inner.clone(),
            label: type_label(module, ty),
        }),
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_io(
                        module,
                        member.ty,
                        member.binding.as_ref(),
                        member.name.as_deref(),
                        out,
                    );
                }
            }
        }
    }
}

fn reflect_resources(module: &Module) -> (Option<BlockReflection>, Vec<String>) {
    let mut block = None;
    let mut problems = Vec::new();

    for (handle, var) in module.global_variables.iter() {
        let name = var.name.as_deref().unwrap_or("<unnamed>");
        match var.space {
            AddressSpace::Uniform if var.binding.as_ref() == Some(&BLOCK_BINDING) => {
                match &module.types[var.ty].inner {
                    TypeInner::Struct { members, span } => {
                        let used = member_usage(module, handle, members.len());
                        block = Some(BlockReflection {
                            span: *span,
                            members: members
                                .iter()
                                .zip(used)
                                .map(|(m, used)| BlockMember {
                                    name: m.name.clone(),
                                    offset: m.offset,
                                    size: module.types[m.ty].inner.size(module.to_ctx()),
                                    inner: module.types[m.ty].inner.clone(),
                                    label: type_label(module, m.ty),
                                    used,
                                })
                                .collect(),
                        });
                    }
                    _ => problems.push(format!("uniform `{name}` must be a struct")),
                }
            }
            AddressSpace::Uniform => problems.push(format!(
                "uniform `{name}` must be bound at @group(0) @binding(0)"
            )),
            AddressSpace::Handle | AddressSpace::Storage { .. } | AddressSpace::PushConstant => {
                problems.push(format!("unsupported resource `{name}`"))
            }
            _ => {}
        }
    }

    (block, problems)
}

/// Which members of the struct behind `global` any function reads.
fn member_usage(
    module: &Module,
    global: Handle<naga::GlobalVariable>,
    member_count: usize,
) -> Vec<bool> {
    let mut used = vec![false; member_count];
    let functions = module
        .functions
        .iter()
        .map(|(_, f)| f)
        .chain(module.entry_points.iter().map(|ep| &ep.function));

    for function in functions {
        let is_block = |h: Handle<Expression>| {
            matches!(function.expressions[h], Expression::GlobalVariable(g) if g == global)
        };
        for (_, expr) in function.expressions.iter() {
            match *expr {
                Expression::AccessIndex { base, index } if is_block(base) => {
                    if let Some(slot) = used.get_mut(index as usize) {
                        *slot = true;
                    }
                }
                // A whole-struct load reads every member.
                Expression::Load { pointer } if is_block(pointer) => used.fill(true),
                _ => {}
            }
        }
    }
    used
}

/// WGSL-style spelling of a type, for comparison across modules and for
/// diagnostics.
pub(crate) fn type_label(module: &Module, ty: Handle<naga::Type>) -> String {
    fn scalar(s: naga::Scalar) -> String {
        match s.kind {
            ScalarKind::Float => format!("f{}", s.width as u32 * 8),
            ScalarKind::Sint => format!("i{}", s.width as u32 * 8),
            ScalarKind::Uint => format!("u{}", s.width as u32 * 8),
            ScalarKind::Bool => "bool".to_string(),
            other => format!("{other:?}"),
        }
    }

    let ty_ref = &module.types[ty];
    match &ty_ref.inner {
        TypeInner::Scalar(s) => scalar(*s),
        TypeInner::Vector { size, scalar: s } => format!("vec{}<{}>", *size as u8, scalar(*s)),
        TypeInner::Matrix {
            columns,
            rows,
            scalar: s,
        } => format!("mat{}x{}<{}>", *columns as u8, *rows as u8, scalar(*s)),
        TypeInner::Array { base, size, .. } => {
            format!("array<{}, {size:?}>", type_label(module, *base))
        }
        TypeInner::Struct { span, .. } => match &ty_ref.name {
            Some(name) => format!("{name} ({span} bytes)"),
            None => format!("struct ({span} bytes)"),
        },
        other => format!("{other:?}"),
    }
}
