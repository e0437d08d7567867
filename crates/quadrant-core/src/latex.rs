//! LaTeX printing.

use dashu::integer::UBig;

use crate::arena::ExprArena;
use crate::display::{Factor, PREC_MUL, PREC_POW};
use crate::expr::{Constant, ExprNode, Func};
use crate::handle::ExprHandle;
use crate::number::Number;

fn latex_number(n: &Number) -> String {
    if n.is_integer() {
        return n.numer().to_string();
    }
    let sign = if n.is_negative() { "- " } else { "" };
    let (p, q) = n.magnitude_parts();
    format!("{sign}\\frac{{{p}}}{{{q}}}")
}

fn latex_constant(c: Constant) -> &'static str {
    match c {
        Constant::Pi => "\\pi",
        Constant::E => "e",
        Constant::Infinity => "\\infty",
        Constant::Undefined => "\\text{NaN}",
    }
}

fn latex_func_name(func: Func) -> &'static str {
    match func {
        Func::Sin => "\\sin",
        Func::Cos => "\\cos",
        Func::Tan => "\\tan",
        Func::Cot => "\\cot",
        Func::Sec => "\\sec",
        Func::Csc => "\\csc",
        Func::Asin => "\\operatorname{asin}",
        Func::Acos => "\\operatorname{acos}",
        Func::Atan => "\\operatorname{atan}",
        Func::Sinh => "\\sinh",
        Func::Cosh => "\\cosh",
        Func::Tanh => "\\tanh",
        Func::Exp => "\\exp",
        Func::Log => "\\log",
        Func::Abs => "",
    }
}

impl ExprArena {
    /// Formats `h` as LaTeX.
    #[must_use]
    pub fn to_latex(&self, h: ExprHandle) -> String {
        match self.get(h) {
            ExprNode::Number(n) => latex_number(n),
            ExprNode::Symbol(id) => self.symbol_name(*id).to_owned(),
            ExprNode::Constant(c) => latex_constant(*c).to_owned(),
            ExprNode::Add(args) => {
                let mut out = String::new();
                for (i, t) in self.display_order(args).into_iter().enumerate() {
                    let s = self.to_latex(t);
                    if i == 0 {
                        out.push_str(&s);
                    } else if let Some(rest) = s.strip_prefix('-') {
                        out.push_str(" - ");
                        out.push_str(rest.trim_start());
                    } else {
                        out.push_str(" + ");
                        out.push_str(&s);
                    }
                }
                out
            }
            ExprNode::Mul(args) => self.latex_mul(args),
            ExprNode::Pow { base, exp } => match self.as_number(*exp) {
                Some(e) if e.is_negative() => {
                    let positive = -e;
                    let denom = if positive.is_one() {
                        self.to_latex(*base)
                    } else {
                        self.latex_pow_number(*base, &positive)
                    };
                    format!("\\frac{{1}}{{{denom}}}")
                }
                Some(e) => self.latex_pow_number(*base, &e),
                None => {
                    let b = self.latex_paren(*base, PREC_POW + 1);
                    format!("{b}^{{{}}}", self.to_latex(*exp))
                }
            },
            ExprNode::Function { func, arg } => self.latex_function(*func, *arg, None),
            ExprNode::Integral {
                integrand,
                var,
                lower,
                upper,
            } => format!(
                "\\int\\limits_{{{}}}^{{{}}} {}\\, d{}",
                self.to_latex(*lower),
                self.to_latex(*upper),
                self.latex_paren(*integrand, PREC_MUL),
                self.to_latex(*var)
            ),
        }
    }

    fn latex_function(&self, func: Func, arg: ExprHandle, power: Option<&Number>) -> String {
        let inner = self.to_latex(arg);
        match func {
            Func::Exp => {
                let base = format!("e^{{{inner}}}");
                match power {
                    Some(p) => format!("\\left({base}\\right)^{{{}}}", latex_number(p)),
                    None => base,
                }
            }
            Func::Abs => {
                let base = format!("\\left|{{{inner}}}\\right|");
                match power {
                    Some(p) => format!("{base}^{{{}}}", latex_number(p)),
                    None => base,
                }
            }
            _ => {
                let name = latex_func_name(func);
                match power {
                    Some(p) => format!(
                        "{name}^{{{}}}{{\\left({inner} \\right)}}",
                        latex_number(p)
                    ),
                    None => format!("{name}{{\\left({inner} \\right)}}"),
                }
            }
        }
    }

    fn latex_pow_number(&self, base: ExprHandle, e: &Number) -> String {
        if *e == Number::half() {
            return format!("\\sqrt{{{}}}", self.to_latex(base));
        }
        if e.magnitude_parts().0 == UBig::ONE && e.is_positive() {
            return format!("\\sqrt[{}]{{{}}}", e.denom(), self.to_latex(base));
        }
        if let ExprNode::Function { func, arg } = self.get(base) {
            if e.is_integer() {
                return self.latex_function(*func, *arg, Some(e));
            }
        }
        let b = self.latex_paren(base, PREC_POW + 1);
        format!("{b}^{{{}}}", latex_number(e))
    }

    fn latex_factor(&self, factor: &Factor) -> String {
        match factor {
            Factor::Integer(n) => n.to_string(),
            Factor::Power(base, e) => self.latex_pow_number(*base, e),
            Factor::Expr(h) => self.latex_paren(*h, PREC_MUL),
        }
    }

    fn latex_mul(&self, args: &[ExprHandle]) -> String {
        let parts = self.mul_parts(args);
        let join = |factors: &[Factor]| -> String {
            if let [Factor::Expr(h)] = factors {
                return self.to_latex(*h);
            }
            let mut out = String::new();
            let mut previous_numeric = false;
            for (i, f) in factors.iter().enumerate() {
                let numeric = matches!(f, Factor::Integer(_));
                if i > 0 {
                    out.push_str(if numeric && previous_numeric {
                        " \\cdot "
                    } else {
                        " "
                    });
                }
                out.push_str(&self.latex_factor(f));
                previous_numeric = numeric;
            }
            out
        };
        let numer = if parts.numer.is_empty() {
            "1".to_owned()
        } else {
            join(&parts.numer)
        };
        let body = if parts.denom.is_empty() {
            numer
        } else {
            format!("\\frac{{{numer}}}{{{}}}", join(&parts.denom))
        };
        if parts.negative {
            format!("- {body}")
        } else {
            body
        }
    }

    fn latex_paren(&self, h: ExprHandle, level: u8) -> String {
        let s = self.to_latex(h);
        if self.precedence(h) < level {
            format!("\\left({s}\\right)")
        } else {
            s
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{ExprArena, Func, Number};

    #[test]
    fn test_fractions() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let x3 = arena.powi(x, 3);
        let three = arena.integer(3);
        let f = arena.div(x3, three);
        assert_eq!(arena.to_latex(f), "\\frac{x^{3}}{3}");

        let q = arena.rational(8, 3);
        assert_eq!(arena.to_latex(q), "\\frac{8}{3}");

        let pi = arena.pi();
        let pi3 = arena.div(pi, three);
        assert_eq!(arena.to_latex(pi3), "\\frac{\\pi}{3}");
    }

    #[test]
    fn test_functions() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let sin = arena.sin(x);
        assert_eq!(arena.to_latex(sin), "\\sin{\\left(x \\right)}");

        let sin2 = arena.powi(sin, 2);
        assert_eq!(arena.to_latex(sin2), "\\sin^{2}{\\left(x \\right)}");

        let ex = arena.exp(x);
        assert_eq!(arena.to_latex(ex), "e^{x}");

        let root = arena.sqrt(x);
        assert_eq!(arena.to_latex(root), "\\sqrt{x}");

        let abs = arena.func(Func::Abs, x);
        assert_eq!(arena.to_latex(abs), "\\left|{x}\\right|");
    }

    #[test]
    fn test_signs() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let cos = arena.cos(x);
        let f = arena.neg(cos);
        assert_eq!(arena.to_latex(f), "- \\cos{\\left(x \\right)}");

        let one = arena.one();
        let e = arena.exp(one);
        let g = arena.sub(e, one);
        assert_eq!(arena.to_latex(g), "e - 1");

        let two = arena.integer(2);
        let two_x = arena.mul(&[two, x]);
        let x2 = arena.powi(x, 2);
        let h = arena.sub(x2, two_x);
        assert_eq!(arena.to_latex(h), "x^{2} - 2 x");
    }

    #[test]
    fn test_integral() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let zero = arena.zero();
        let one = arena.one();
        let inv = arena.recip(x);
        let i = arena.integral(inv, x, zero, one);
        assert_eq!(arena.to_latex(i), "\\int\\limits_{0}^{1} \\frac{1}{x}\\, dx");
        let half = arena.number(Number::half());
        assert_eq!(arena.to_latex(half), "\\frac{1}{2}");
    }
}
