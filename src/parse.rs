use crate::error::{Error, Result};
use crate::expression::Expression;

use once_cell::sync::Lazy;
use pest::iterators::Pair;
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "grammar.pest"] // relative to project `src`
struct ExpressionParser;

pub type ParseError = pest::error::Error<Rule>;

impl Expression {
    /// Parse the expression from `input`.
    ///
    /// Accepts exactly what the [`Display`](std::fmt::Display) impl prints:
    /// decimal literals, `e`, `inf`, `NaN`, the variables `x, y, z`, prefix
    /// `-`, infix `*` and right-associative `^`, and parentheses. Unary minus binds looser
    /// than `^` and tighter than `*`, so `-x^2` is `-(x^2)`.
    pub fn parse(input: &str) -> Result<Self> {
        let pairs = ExpressionParser::parse(Rule::calculation, input).map_err(Box::new)?;
        build(pairs.filter(|pair| pair.as_rule() != Rule::EOI))
    }
}

static PRATT_PARSER: Lazy<PrattParser<Rule>> = Lazy::new(|| {
    use Assoc::*;
    use Rule::*;

    // Lowest precedence first.
    PrattParser::new()
        .op(Op::infix(multiply, Left))
        .op(Op::prefix(neg))
        .op(Op::infix(power, Right))
});

fn build<'i>(pairs: impl Iterator<Item = Pair<'i, Rule>>) -> Result<Expression> {
    PRATT_PARSER
        .map_primary(|pair| match pair.as_rule() {
            Rule::real_expr => build(pair.into_inner()),
            Rule::real_literal => {
                let literal_str = pair.as_str();
                if let Ok(value) = literal_str.parse::<f64>() {
                    return Ok(Expression::Literal(value));
                }
                panic!("Unexpected literal: {}", literal_str)
            }
            Rule::identifier => match pair.as_str() {
                "e" => Ok(Expression::euler()),
                "inf" => Ok(Expression::Literal(f64::INFINITY)),
                "NaN" => Ok(Expression::Literal(f64::NAN)),
                name => Expression::var(name),
            },
            x => panic!("Unexpected primary rule {x:?}"),
        })
        .map_prefix(|op, only| match op.as_rule() {
            Rule::neg => Ok(Expression::Neg(Box::new(only?))),
            x => panic!("Unexpected unary operator: {x:?}"),
        })
        .map_infix(|lhs, op, rhs| match op.as_rule() {
            Rule::multiply => Ok(Expression::Mul(Box::new(lhs?), Box::new(rhs?))),
            Rule::power => Ok(Expression::Pow(Box::new(lhs?), Box::new(rhs?))),
            x => panic!("Unexpected operator {x:?}"),
        })
        .parse(pairs)
}

impl std::str::FromStr for Expression {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        Self::parse(input)
    }
}
