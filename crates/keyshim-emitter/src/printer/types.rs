use keyshim_parser::{ChanDir, Field, InterfaceElem, Signature, TypeExpr};

use super::declarations::strip_parens;
use super::expressions::single_line_size;
use super::{EmitError, EmitResult, Printer};

/// A struct or interface written on one line stays on one line when its
/// single element is at most this wide (one more for a name).
const ONE_LINE_ELEM_SIZE: usize = 30;

/// The only field of a struct that keeps its one-line form.
fn one_line_field(fields: &[Field], one_line: bool) -> Option<&Field> {
    match fields {
        [field] if one_line && field.tag.is_none() => {
            let size = single_line_size(|p| p.print_type(&field.ty))?;
            let names = usize::from(!field.names.is_empty());
            (names + size <= ONE_LINE_ELEM_SIZE).then_some(field)
        }
        _ => None,
    }
}

/// The only element of an interface that keeps its one-line form.
fn one_line_elem(elems: &[InterfaceElem], one_line: bool) -> Option<&InterfaceElem> {
    let [elem] = elems else {
        return None;
    };
    if !one_line {
        return None;
    }
    let size = match elem {
        InterfaceElem::Method { signature, .. } => {
            1 + single_line_size(|p| {
                p.write("func");
                p.print_signature(signature)
            })?
        }
        InterfaceElem::Embedded(ty) => single_line_size(|p| p.print_type(ty))?,
    };
    (size <= ONE_LINE_ELEM_SIZE).then_some(elem)
}

impl Printer {
    // =========================================================================
    // Types
    // =========================================================================

    pub(super) fn print_type(&mut self, ty: &TypeExpr) -> EmitResult<()> {
        match ty {
            TypeExpr::Name(ident) => self.write(&ident.name),
            TypeExpr::Qualified { package, name } => {
                self.write(&package.name);
                self.write(".");
                self.write(&name.name);
            }
            TypeExpr::Generic { base, args, .. } => {
                self.print_type(base)?;
                self.write("[");
                self.write_comma_separated(args, |p, arg| p.print_type(arg))?;
                self.write("]");
            }
            TypeExpr::Pointer { elem, .. } => {
                self.write("*");
                self.print_type(elem)?;
            }
            TypeExpr::Slice { elem, .. } => {
                self.write("[]");
                self.print_type(elem)?;
            }
            TypeExpr::Array { len, elem, .. } => {
                self.write("[");
                match len {
                    Some(len) => self.print_expr(len)?,
                    None => self.write("..."),
                }
                self.write("]");
                self.print_type(elem)?;
            }
            TypeExpr::Map { key, value, .. } => {
                self.write("map[");
                self.print_type(key)?;
                self.write("]");
                self.print_type(value)?;
            }
            TypeExpr::Chan { dir, elem, .. } => {
                self.write(match dir {
                    ChanDir::Both => "chan",
                    ChanDir::Send => "chan<-",
                    ChanDir::Recv => "<-chan",
                });
                self.write_blank();
                self.print_type(elem)?;
            }
            TypeExpr::Func(signature) => {
                self.write("func");
                self.print_signature(signature)?;
            }
            TypeExpr::Struct {
                fields, one_line, ..
            } => self.print_struct_body(fields, *one_line)?,
            TypeExpr::Interface {
                elems, one_line, ..
            } => self.print_interface_body(elems, *one_line)?,
            TypeExpr::Union { terms, .. } => {
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        self.write(" | ");
                    }
                    self.print_type(term)?;
                }
            }
            TypeExpr::Tilde { elem, .. } => {
                self.write("~");
                self.print_type(elem)?;
            }
            TypeExpr::Paren { elem, .. } => {
                self.write("(");
                self.print_type(elem)?;
                self.write(")");
            }
            TypeExpr::Ellipsis { span, .. } => {
                return Err(EmitError::MisplacedEllipsis { span: *span });
            }
        }
        Ok(())
    }

    /// Parameters and results, without the `func` keyword.
    pub(super) fn print_signature(&mut self, signature: &Signature) -> EmitResult<()> {
        self.print_params(&signature.params)?;
        match signature.results.as_slice() {
            [] => {}
            [result] if result.names.is_empty() => {
                self.write_blank();
                self.print_type(strip_parens(&result.ty))?;
            }
            results => {
                self.write_blank();
                self.print_params(results)?;
            }
        }
        Ok(())
    }

    fn print_params(&mut self, params: &[Field]) -> EmitResult<()> {
        self.write("(");
        self.write_comma_separated(params, |p, param| {
            p.print_ident_list(&param.names);
            if !param.names.is_empty() {
                p.write_blank();
            }
            match strip_parens(&param.ty) {
                TypeExpr::Ellipsis { elem, .. } => {
                    p.write("...");
                    p.print_type(elem)
                }
                ty => p.print_type(ty),
            }
        })?;
        self.write(")");
        Ok(())
    }

    /// `struct{}` when empty, `struct{ a T }` for a small field written on
    /// one line, otherwise one field per line with names, types and tags in
    /// aligned columns.
    fn print_struct_body(&mut self, fields: &[Field], one_line: bool) -> EmitResult<()> {
        if fields.is_empty() {
            self.write("struct{}");
            return Ok(());
        }
        if let Some(field) = one_line_field(fields, one_line) {
            self.write("struct{ ");
            if !field.names.is_empty() {
                self.print_ident_list(&field.names);
                self.write_blank();
            }
            self.print_type(&field.ty)?;
            self.write(" }");
            return Ok(());
        }
        self.write("struct {");
        self.increase_indent();
        self.write_formfeed();

        let column = fields.len() > 1;
        let mut line = self.line;
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                self.linebreak(self.line > line);
            }
            line = self.line;
            if field.names.is_empty() {
                self.print_type(&field.ty)?;
            } else {
                self.print_ident_list(&field.names);
                self.write_separator(column);
                self.print_type(&field.ty)?;
            }
            if let Some(tag) = &field.tag {
                // An embedded field skips the type column.
                if field.names.is_empty() && column {
                    self.write_separator(column);
                }
                self.write_separator(column);
                self.write_escaped(&tag.text);
            }
        }

        self.decrease_indent();
        self.write_formfeed();
        self.write("}");
        Ok(())
    }

    fn print_interface_body(&mut self, elems: &[InterfaceElem], one_line: bool) -> EmitResult<()> {
        if elems.is_empty() {
            self.write("interface{}");
            return Ok(());
        }
        if let Some(elem) = one_line_elem(elems, one_line) {
            self.write("interface{ ");
            self.print_interface_elem(elem)?;
            self.write(" }");
            return Ok(());
        }
        self.write("interface {");
        self.increase_indent();
        self.write_formfeed();

        let mut line = self.line;
        for (i, elem) in elems.iter().enumerate() {
            if i > 0 {
                self.linebreak(self.line > line);
            }
            line = self.line;
            self.print_interface_elem(elem)?;
        }

        self.decrease_indent();
        self.write_formfeed();
        self.write("}");
        Ok(())
    }

    fn print_interface_elem(&mut self, elem: &InterfaceElem) -> EmitResult<()> {
        match elem {
            InterfaceElem::Method { name, signature } => {
                self.write(&name.name);
                self.print_signature(signature)
            }
            InterfaceElem::Embedded(ty) => self.print_type(ty),
        }
    }

    fn write_separator(&mut self, column: bool) {
        if column {
            self.write_vtab();
        } else {
            self.write_blank();
        }
    }
}
