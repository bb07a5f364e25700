//! Syntax tree of a Go source file.
//!
//! Nodes own their children (`Box`/`Vec`), so a rewritten tree can be built
//! from a borrowed one without touching the original. Every node records the
//! byte span it was parsed from; nodes synthesized by a rewrite reuse the span
//! of the node they replace.

use keyshim_common::Span;
use keyshim_scanner::SyntaxKind;
use smallvec::SmallVec;

/// Identifier lists are almost always a single name.
pub type IdentList = SmallVec<[Ident; 1]>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Ident {
            name: name.into(),
            span,
        }
    }
}

/// The parsed representation of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub file_name: String,
    pub package: Ident,
    pub decls: Vec<Decl>,
}

// =============================================================================
// Declarations
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Gen(GenDecl),
    Func(FuncDecl),
}

impl Decl {
    pub fn span(&self) -> Span {
        match self {
            Decl::Gen(decl) => decl.span,
            Decl::Func(decl) => decl.span,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GenKind {
    Import,
    Type,
    Var,
    Const,
}

impl GenKind {
    pub fn keyword(self) -> &'static str {
        match self {
            GenKind::Import => "import",
            GenKind::Type => "type",
            GenKind::Var => "var",
            GenKind::Const => "const",
        }
    }

    pub fn from_token(kind: SyntaxKind) -> Option<GenKind> {
        match kind {
            SyntaxKind::ImportKeyword => Some(GenKind::Import),
            SyntaxKind::TypeKeyword => Some(GenKind::Type),
            SyntaxKind::VarKeyword => Some(GenKind::Var),
            SyntaxKind::ConstKeyword => Some(GenKind::Const),
            _ => None,
        }
    }
}

/// A `import`, `type`, `var` or `const` declaration, grouped or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenDecl {
    pub kind: GenKind,
    /// Written with parentheses in the source (`var ( ... )`).
    pub grouped: bool,
    pub specs: Vec<Spec>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Spec {
    Import(ImportSpec),
    Type(TypeSpec),
    Value(ValueSpec),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub name: Option<Ident>,
    pub path: BasicLit,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub name: Ident,
    pub type_params: Vec<Field>,
    /// `type A = B`
    pub alias: bool,
    pub ty: TypeExpr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSpec {
    pub names: IdentList,
    pub ty: Option<TypeExpr>,
    pub values: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub recv: Option<Vec<Field>>,
    pub name: Ident,
    pub type_params: Vec<Field>,
    pub signature: Signature,
    pub body: Option<FuncBody>,
    pub span: Span,
}

/// The body of a function declaration or literal.
///
/// Bodies are printed from `text`, the source of the block with its braces.
/// A rewrite inside the body updates `block` and splices the same change
/// into `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncBody {
    pub block: Block,
    pub text: String,
}

impl FuncBody {
    pub fn span(&self) -> Span {
        self.block.span
    }
}

// =============================================================================
// Fields and signatures
// =============================================================================

/// A struct field, parameter, result or type parameter.
///
/// `names` is empty for embedded fields and unnamed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub names: IdentList,
    pub ty: TypeExpr,
    pub tag: Option<BasicLit>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<Field>,
    pub results: Vec<Field>,
    pub span: Span,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceElem {
    Method { name: Ident, signature: Signature },
    /// Embedded interface, or a type-set term such as `~int | string`.
    Embedded(TypeExpr),
}

// =============================================================================
// Type expressions
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Name(Ident),
    /// `pkg.Name`
    Qualified { package: Ident, name: Ident },
    /// `List[int]`, `pkg.Map[K, V]`
    Generic {
        base: Box<TypeExpr>,
        args: Vec<TypeExpr>,
        span: Span,
    },
    Pointer {
        elem: Box<TypeExpr>,
        span: Span,
    },
    Slice {
        elem: Box<TypeExpr>,
        span: Span,
    },
    /// `[N]T`, or `[...]T` when `len` is `None`.
    Array {
        len: Option<Box<Expr>>,
        elem: Box<TypeExpr>,
        span: Span,
    },
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
        span: Span,
    },
    Chan {
        dir: ChanDir,
        elem: Box<TypeExpr>,
        span: Span,
    },
    Func(Signature),
    Struct {
        fields: Vec<Field>,
        /// `{` and `}` are on the same source line.
        one_line: bool,
        span: Span,
    },
    Interface {
        elems: Vec<InterfaceElem>,
        one_line: bool,
        span: Span,
    },
    Union {
        terms: Vec<TypeExpr>,
        span: Span,
    },
    /// `~T`
    Tilde {
        elem: Box<TypeExpr>,
        span: Span,
    },
    Paren {
        elem: Box<TypeExpr>,
        span: Span,
    },
    /// Variadic parameter type `...T`.
    Ellipsis {
        elem: Box<TypeExpr>,
        span: Span,
    },
}

impl TypeExpr {
    pub fn span(&self) -> Span {
        match self {
            TypeExpr::Name(ident) => ident.span,
            TypeExpr::Qualified { package, name } => package.span.to(name.span),
            TypeExpr::Func(signature) => signature.span,
            TypeExpr::Generic { span, .. }
            | TypeExpr::Pointer { span, .. }
            | TypeExpr::Slice { span, .. }
            | TypeExpr::Array { span, .. }
            | TypeExpr::Map { span, .. }
            | TypeExpr::Chan { span, .. }
            | TypeExpr::Struct { span, .. }
            | TypeExpr::Interface { span, .. }
            | TypeExpr::Union { span, .. }
            | TypeExpr::Tilde { span, .. }
            | TypeExpr::Paren { span, .. }
            | TypeExpr::Ellipsis { span, .. } => *span,
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self, TypeExpr::Map { .. })
    }
}

// =============================================================================
// Expressions
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    Imaginary,
    Rune,
    String,
    RawString,
}

impl LitKind {
    pub fn from_token(kind: SyntaxKind) -> Option<LitKind> {
        match kind {
            SyntaxKind::IntLiteral => Some(LitKind::Int),
            SyntaxKind::FloatLiteral => Some(LitKind::Float),
            SyntaxKind::ImaginaryLiteral => Some(LitKind::Imaginary),
            SyntaxKind::RuneLiteral => Some(LitKind::Rune),
            SyntaxKind::StringLiteral => Some(LitKind::String),
            SyntaxKind::RawStringLiteral => Some(LitKind::RawString),
            _ => None,
        }
    }
}

/// A literal, kept exactly as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicLit {
    pub kind: LitKind,
    pub text: String,
    pub span: Span,
}

/// One element of a composite literal: `value` or `key: value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub key: Option<Expr>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Ident(Ident),
    BasicLit(BasicLit),
    /// `T{...}`; `ty` is `None` for elided element types.
    Composite {
        ty: Option<Box<Expr>>,
        elements: Vec<Element>,
        /// Elements started on a new line after `{` in the source.
        multiline: bool,
        span: Span,
    },
    FuncLit {
        signature: Signature,
        body: FuncBody,
        span: Span,
    },
    Paren {
        expr: Box<Expr>,
        span: Span,
    },
    Selector {
        expr: Box<Expr>,
        sel: Ident,
        span: Span,
    },
    /// `x[i]`, or `F[A, B]` for generic instantiation.
    Index {
        expr: Box<Expr>,
        indices: Vec<Expr>,
        span: Span,
    },
    Slice {
        expr: Box<Expr>,
        low: Option<Box<Expr>>,
        high: Option<Box<Expr>>,
        max: Option<Box<Expr>>,
        span: Span,
    },
    /// `x.(T)`; `ty` is `None` for the type switch guard `x.(type)`.
    TypeAssert {
        expr: Box<Expr>,
        ty: Option<Box<TypeExpr>>,
        span: Span,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        /// `f(xs...)`
        ellipsis: bool,
        span: Span,
    },
    /// Prefix operator, including `*` (dereference / pointer type) and `<-`.
    Unary {
        op: SyntaxKind,
        expr: Box<Expr>,
        span: Span,
    },
    Binary {
        op: SyntaxKind,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    /// A type in expression position: `map[K]V{}`, `[]byte(s)`, `make(chan int)`.
    Type(Box<TypeExpr>),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Ident(ident) => ident.span,
            Expr::BasicLit(lit) => lit.span,
            Expr::Type(ty) => ty.span(),
            Expr::Composite { span, .. }
            | Expr::FuncLit { span, .. }
            | Expr::Paren { span, .. }
            | Expr::Selector { span, .. }
            | Expr::Index { span, .. }
            | Expr::Slice { span, .. }
            | Expr::TypeAssert { span, .. }
            | Expr::Call { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Binary { span, .. } => *span,
        }
    }
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `var`, `const` or `type` inside a body.
    Decl(GenDecl),
    Labeled {
        label: Ident,
        stmt: Box<Stmt>,
        span: Span,
    },
    Expr(Expr),
    /// `ch <- v`
    Send {
        chan: Expr,
        value: Expr,
        span: Span,
    },
    /// `x++`, `x--`
    IncDec {
        expr: Expr,
        op: SyntaxKind,
        span: Span,
    },
    /// `=`, `:=` and the compound assignments such as `+=`.
    Assign {
        lhs: Vec<Expr>,
        op: SyntaxKind,
        rhs: Vec<Expr>,
        span: Span,
    },
    Go {
        call: Expr,
        span: Span,
    },
    Defer {
        call: Expr,
        span: Span,
    },
    Return {
        results: Vec<Expr>,
        span: Span,
    },
    /// `break`, `continue`, `goto` and `fallthrough`.
    Branch {
        keyword: SyntaxKind,
        label: Option<Ident>,
        span: Span,
    },
    Block(Block),
    If {
        init: Option<Box<Stmt>>,
        cond: Expr,
        then: Block,
        /// An `If` or a `Block`.
        otherwise: Option<Box<Stmt>>,
        span: Span,
    },
    Switch {
        init: Option<Box<Stmt>>,
        tag: Option<Expr>,
        clauses: Vec<CaseClause>,
        span: Span,
    },
    /// `switch v := x.(type)`; `guard` is that assignment or a bare
    /// `x.(type)` expression statement.
    TypeSwitch {
        init: Option<Box<Stmt>>,
        guard: Box<Stmt>,
        clauses: Vec<TypeCaseClause>,
        span: Span,
    },
    Select {
        clauses: Vec<CommClause>,
        span: Span,
    },
    For {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        post: Option<Box<Stmt>>,
        body: Block,
        span: Span,
    },
    /// `for k, v := range x`; `define` is set for `:=`.
    Range {
        key: Option<Expr>,
        value: Option<Expr>,
        define: bool,
        expr: Expr,
        body: Block,
        span: Span,
    },
    Empty(Span),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Decl(decl) => decl.span,
            Stmt::Expr(expr) => expr.span(),
            Stmt::Block(block) => block.span,
            Stmt::Empty(span)
            | Stmt::Labeled { span, .. }
            | Stmt::Send { span, .. }
            | Stmt::IncDec { span, .. }
            | Stmt::Assign { span, .. }
            | Stmt::Go { span, .. }
            | Stmt::Defer { span, .. }
            | Stmt::Return { span, .. }
            | Stmt::Branch { span, .. }
            | Stmt::If { span, .. }
            | Stmt::Switch { span, .. }
            | Stmt::TypeSwitch { span, .. }
            | Stmt::Select { span, .. }
            | Stmt::For { span, .. }
            | Stmt::Range { span, .. } => *span,
        }
    }
}

/// `case a, b:` or `default:` (empty `exprs`) of an expression switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseClause {
    pub exprs: Vec<Expr>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// `case int, nil:` or `default:` (empty `types`) of a type switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCaseClause {
    pub types: Vec<TypeExpr>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// `case v := <-ch:` of a select; `comm` is `None` for `default:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommClause {
    pub comm: Option<Box<Stmt>>,
    pub body: Vec<Stmt>,
    pub span: Span,
}
