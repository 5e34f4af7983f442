use std::fmt::Display;
use std::str::FromStr;

use syn::{punctuated::Punctuated, token::Comma, Attribute, Expr, ExprAssign, Lit, Meta, UnOp};

/// Key-value assignments of one `emi(...)` attribute, e.g. `addr = 0x0010, ty = "u16"`.
pub struct AttrArgs {
    name: String,
    args: Punctuated<ExprAssign, Comma>,
}

impl AttrArgs {
    pub fn parse(attr: &Attribute, name: &str) -> Self {
        let args = match &attr.meta {
            Meta::List(meta_list) => meta_list
                .parse_args_with(Punctuated::<ExprAssign, Comma>::parse_terminated)
                .unwrap_or_else(|_| panic!("`emi` attribute for `{name}` is not a comma separated sequence of assignment expressions.")),
            _ => panic!("The `emi` attribute for `{name}` is not a list, use `#[emi(key = value, ...)]`."),
        };
        Self {
            name: name.to_string(),
            args,
        }
    }

    fn value(&self, key: &str) -> Option<&Expr> {
        self.args
            .iter()
            .find(|expr_assign| match expr_assign.left.as_ref() {
                Expr::Path(left) => left.path.is_ident(key),
                not_expr_path => panic!(
                    "In the `emi` attribute for `{}`, the key `{:?}` is not a path expression.",
                    self.name, not_expr_path
                ),
            })
            .map(|expr_assign| expr_assign.right.as_ref())
    }

    pub fn int<N>(&self, key: &str) -> Option<N>
    where
        N: FromStr,
        N::Err: Display,
    {
        self.value(key).map(|expr| match expr {
            Expr::Lit(right) => match &right.lit {
                Lit::Int(lit_int) => lit_int.base10_parse::<N>().unwrap_or_else(|err| {
                    panic!("In `emi` attribute for `{}`, the key `{key}` is invalid: {err}.", self.name)
                }),
                _ => self.panic_not_literal(key, "integer"),
            },
            _ => self.panic_not_literal(key, "integer"),
        })
    }

    /// Integer that may carry a leading minus sign.
    pub fn signed_int(&self, key: &str) -> Option<i64> {
        self.value(key).map(|expr| match expr {
            Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => match unary.expr.as_ref() {
                Expr::Lit(right) => match &right.lit {
                    Lit::Int(lit_int) => -lit_int.base10_parse::<i64>().unwrap_or_else(|_| {
                        self.panic_not_literal(key, "integer")
                    }),
                    _ => self.panic_not_literal(key, "integer"),
                },
                _ => self.panic_not_literal(key, "integer"),
            },
            Expr::Lit(right) => match &right.lit {
                Lit::Int(lit_int) => lit_int
                    .base10_parse::<i64>()
                    .unwrap_or_else(|_| self.panic_not_literal(key, "integer")),
                _ => self.panic_not_literal(key, "integer"),
            },
            _ => self.panic_not_literal(key, "integer"),
        })
    }

    pub fn string(&self, key: &str) -> Option<String> {
        self.value(key).map(|expr| match expr {
            Expr::Lit(right) => match &right.lit {
                Lit::Str(lit_str) => lit_str.value(),
                _ => self.panic_not_literal(key, "string"),
            },
            _ => self.panic_not_literal(key, "string"),
        })
    }

    pub fn panic_not_literal(&self, key: &str, lit_ty: &str) -> ! {
        panic!(
            "In `emi` attribute for `{}`, the key `{}` is not set to a {} literal.",
            self.name, key, lit_ty
        )
    }

    pub fn panic_no_key(&self, key: &str) -> ! {
        panic!("In `emi` attribute for `{}`, no key `{}`", self.name, key)
    }
}
