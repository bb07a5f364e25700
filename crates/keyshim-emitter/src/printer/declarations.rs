use keyshim_parser::{Field, GenDecl, GenKind, Ident, Spec, TypeExpr, TypeSpec, ValueSpec};

use super::{EmitError, EmitResult, Printer};

impl Printer {
    // =========================================================================
    // Declarations
    // =========================================================================

    pub(super) fn print_gen_decl(&mut self, decl: &GenDecl) -> EmitResult<()> {
        if decl.kind == GenKind::Import {
            return Err(EmitError::UnsupportedDecl {
                keyword: decl.kind.keyword(),
                span: decl.span,
            });
        }

        self.write(decl.kind.keyword());
        self.write_blank();

        if !decl.grouped && decl.specs.len() == 1 {
            return self.print_spec(&decl.specs[0], 1);
        }

        self.write("(");
        let n = decl.specs.len();
        if n > 0 {
            self.increase_indent();
            self.write_formfeed();
            let keep_type = if n > 1 && matches!(decl.kind, GenKind::Var | GenKind::Const) {
                Some(keep_type_column(&decl.specs))
            } else {
                None
            };
            let mut line = self.line;
            for (i, spec) in decl.specs.iter().enumerate() {
                if i > 0 {
                    self.linebreak(self.line > line);
                }
                line = self.line;
                match (&keep_type, spec) {
                    (Some(keep_type), Spec::Value(value)) => {
                        self.print_value_spec_column(value, keep_type[i])?;
                    }
                    _ => self.print_spec(spec, n)?,
                }
            }
            self.decrease_indent();
            self.write_formfeed();
        }
        self.write(")");
        Ok(())
    }

    /// A spec on its own, or in a group of `n` specs without value columns.
    fn print_spec(&mut self, spec: &Spec, n: usize) -> EmitResult<()> {
        match spec {
            Spec::Value(value) => self.print_value_spec(value),
            Spec::Type(type_spec) => self.print_type_spec(type_spec, n),
            Spec::Import(import) => Err(EmitError::UnsupportedDecl {
                keyword: GenKind::Import.keyword(),
                span: import.span,
            }),
        }
    }

    /// `a, b T = x, y` separated by blanks.
    fn print_value_spec(&mut self, spec: &ValueSpec) -> EmitResult<()> {
        self.print_ident_list(&spec.names);
        if let Some(ty) = &spec.ty {
            self.write_blank();
            self.print_type(ty)?;
        }
        if !spec.values.is_empty() {
            self.write(" = ");
            self.write_comma_separated(&spec.values, |p, value| p.print_expr(value))?;
        }
        Ok(())
    }

    /// A value spec in a `var`/`const` group, with names, type and values
    /// in aligned columns.
    fn print_value_spec_column(&mut self, spec: &ValueSpec, keep_type: bool) -> EmitResult<()> {
        self.print_ident_list(&spec.names);
        if spec.ty.is_some() || keep_type {
            self.write_vtab();
        }
        if let Some(ty) = &spec.ty {
            self.print_type(ty)?;
        }
        if !spec.values.is_empty() {
            self.write_vtab();
            self.write("= ");
            self.write_comma_separated(&spec.values, |p, value| p.print_expr(value))?;
        }
        Ok(())
    }

    fn print_type_spec(&mut self, spec: &TypeSpec, n: usize) -> EmitResult<()> {
        self.write(&spec.name.name);
        if !spec.type_params.is_empty() {
            self.print_type_params(&spec.type_params, true)?;
        }
        if n == 1 {
            self.write_blank();
        } else {
            self.write_vtab();
        }
        if spec.alias {
            self.write("= ");
        }
        self.print_type(&spec.ty)
    }

    pub(super) fn print_ident_list(&mut self, names: &[Ident]) {
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(&name.name);
        }
    }

    /// `[K comparable, V any]`. A lone parameter of a type declaration whose
    /// constraint would read as an expression together with its name gets a
    /// trailing comma: `[P *C,]`.
    pub(super) fn print_type_params(
        &mut self,
        params: &[Field],
        in_type_spec: bool,
    ) -> EmitResult<()> {
        self.write("[");
        self.write_comma_separated(params, |p, field| {
            p.print_ident_list(&field.names);
            if !field.names.is_empty() {
                p.write_blank();
            }
            p.print_type(strip_parens(&field.ty))
        })?;
        let name_count: usize = params.iter().map(|f| f.names.len().max(1)).sum();
        if in_type_spec && name_count == 1 && combines_with_name(strip_parens(&params[0].ty)) {
            self.write(",");
        }
        self.write("]");
        Ok(())
    }
}

/// For each spec of a `var`/`const` group, whether it keeps an (empty) type
/// column so that the `=` column of its run of initialized specs lines up.
pub(crate) fn keep_type_column(specs: &[Spec]) -> Vec<bool> {
    let mut keep = vec![false; specs.len()];
    let mut run_start: Option<usize> = None;
    let mut keep_type = false;

    for (i, spec) in specs.iter().enumerate() {
        let Spec::Value(value) = spec else {
            continue;
        };
        if !value.values.is_empty() {
            if run_start.is_none() {
                run_start = Some(i);
                keep_type = false;
            }
        } else if let Some(start) = run_start.take() {
            if keep_type {
                keep[start..i].fill(true);
            }
        }
        if value.ty.is_some() {
            keep_type = true;
        }
    }
    if let Some(start) = run_start {
        if keep_type {
            keep[start..].fill(true);
        }
    }
    keep
}

pub(super) fn strip_parens(ty: &TypeExpr) -> &TypeExpr {
    let mut ty = ty;
    while let TypeExpr::Paren { elem, .. } = ty {
        ty = elem;
    }
    ty
}

/// `name *T` and `name *T | U` also parse as multiplications.
fn combines_with_name(ty: &TypeExpr) -> bool {
    match ty {
        TypeExpr::Pointer { elem, .. } => !is_type_elem(elem),
        TypeExpr::Union { terms, .. } => match terms.split_first() {
            Some((first, rest)) => {
                combines_with_name(first) && rest.iter().all(|term| !is_type_elem(term))
            }
            None => false,
        },
        _ => false,
    }
}

/// Types that can only appear as types, never as expressions.
fn is_type_elem(ty: &TypeExpr) -> bool {
    match ty {
        TypeExpr::Array { .. }
        | TypeExpr::Slice { .. }
        | TypeExpr::Struct { .. }
        | TypeExpr::Func(_)
        | TypeExpr::Interface { .. }
        | TypeExpr::Map { .. }
        | TypeExpr::Chan { .. }
        | TypeExpr::Tilde { .. } => true,
        TypeExpr::Union { terms, .. } => terms.iter().any(is_type_elem),
        TypeExpr::Paren { elem, .. } => is_type_elem(elem),
        _ => false,
    }
}
