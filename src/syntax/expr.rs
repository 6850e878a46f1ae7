use smol_str::SmolStr;

/// An expression.
///
/// Only the shapes the resolver cares about are distinguished; everything
/// else folds into the structural variants so traversal still reaches the
/// calls and name references inside.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A bare name reference.
    Name(SmolStr),

    /// Attribute access, `value.attr`.
    Attribute { value: Box<Expr>, attr: SmolStr },

    /// A call, `func(args...)`.
    Call { func: Box<Expr>, args: Vec<Expr> },

    Literal(Literal),

    List(Vec<Expr>),

    /// Dict display as (key, value) pairs.
    Dict(Vec<(Expr, Expr)>),

    Set(Vec<Expr>),

    Tuple(Vec<Expr>),

    Binary { left: Box<Expr>, right: Box<Expr> },

    Unary(Box<Expr>),

    Subscript { value: Box<Expr>, index: Box<Expr> },
}

impl Expr {
    pub fn name(text: impl Into<SmolStr>) -> Self {
        Expr::Name(text.into())
    }

    /// Build `value.attr`.
    pub fn attr(value: Expr, attr: impl Into<SmolStr>) -> Self {
        Expr::Attribute {
            value: Box::new(value),
            attr: attr.into(),
        }
    }

    /// Build a call of `func`.
    pub fn call(func: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            func: Box::new(func),
            args,
        }
    }

    /// Build a pure attribute chain from dotted parts, e.g.
    /// `["a", "b", "c"]` → `a.b.c`.
    pub fn dotted(parts: &[&str]) -> Self {
        debug_assert!(!parts.is_empty());
        let mut expr = Expr::name(parts[0]);
        for part in &parts[1..] {
            expr = Expr::attr(expr, *part);
        }
        expr
    }

    /// Flatten a pure attribute chain (`a.b.c`) into its name parts.
    ///
    /// Returns `None` for any other shape: a call, subscript, or literal
    /// anywhere in the chain means there is no simple dotted name to
    /// resolve, and the traversal descends structurally instead.
    pub fn dotted_parts(&self) -> Option<Vec<SmolStr>> {
        match self {
            Expr::Name(name) => Some(vec![name.clone()]),
            Expr::Attribute { value, attr } => {
                let mut parts = value.dotted_parts()?;
                parts.push(attr.clone());
                Some(parts)
            }
            _ => None,
        }
    }

    /// Render a compact source-like form for report state slots.
    pub fn render(&self) -> String {
        match self {
            Expr::Name(name) => name.to_string(),
            Expr::Attribute { value, attr } => format!("{}.{}", value.render(), attr),
            Expr::Call { func, .. } => format!("{}(...)", func.render()),
            Expr::Literal(lit) => lit.render(),
            Expr::List(_) => "[...]".to_string(),
            Expr::Dict(_) => "{...}".to_string(),
            Expr::Set(_) => "{...}".to_string(),
            Expr::Tuple(_) => "(...)".to_string(),
            Expr::Binary { .. } | Expr::Unary(_) => "<expr>".to_string(),
            Expr::Subscript { value, .. } => format!("{}[...]", value.render()),
        }
    }
}

/// A literal constant.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    None,
}

impl Literal {
    pub fn render(&self) -> String {
        match self {
            Literal::Str(s) => format!("{:?}", s),
            Literal::Int(i) => i.to_string(),
            Literal::Float(f) => f.to_string(),
            Literal::Bool(b) => b.to_string(),
            Literal::None => "None".to_string(),
        }
    }
}
