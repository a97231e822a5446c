use super::ast::{Expr, GateExpr, ParsedStatement, QubitArg};
use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while},
    character::complete::{alpha1, alphanumeric1, char, digit1, multispace0, space0, space1},
    combinator::{map, map_res, opt, recognize, value},
    multi::{fold_many0, many0, separated_list0, separated_list1},
    number::complete::recognize_float,
    sequence::{delimited, pair, preceded, separated_pair, tuple},
    IResult,
};

// --- Helpers ---

fn identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0(alt((alphanumeric1, tag("_")))),
        )),
        |s: &str| s.to_string(),
    )(input)
}

fn usize_parser(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |s: &str| s.parse::<usize>())(input)
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Float literal in the form `{:?}` prints an `f64`, including `inf`,
/// `-inf`, `NaN` and exponent notation.
pub fn float_literal(input: &str) -> IResult<&str, f64> {
    map_res(
        alt((
            recognize(pair(
                opt(alt((char('-'), char('+')))),
                alt((
                    tag_no_case("infinity"),
                    tag_no_case("inf"),
                    tag_no_case("nan"),
                )),
            )),
            recognize_float,
        )),
        |s: &str| s.parse::<f64>(),
    )(input)
}

pub fn comment(input: &str) -> IResult<&str, ()> {
    value((), pair(tag("//"), take_while(|c| c != '\n')))(input)
}

// --- Phase expressions ---

fn factor(input: &str) -> IResult<&str, Expr> {
    alt((
        map(preceded(ws(char('-')), factor), |e| Expr::Neg(Box::new(e))),
        delimited(ws(char('(')), expr, ws(char(')'))),
        map(
            ws(map_res(recognize_float, |s: &str| s.parse::<f64>())),
            Expr::Float,
        ),
    ))(input)
}

fn term(input: &str) -> IResult<&str, Expr> {
    let (input, init) = factor(input)?;
    fold_many0(
        pair(ws(alt((char('*'), char('/')))), factor),
        move || init.clone(),
        |acc, (op, rhs)| match op {
            '*' => Expr::Mul(Box::new(acc), Box::new(rhs)),
            _ => Expr::Div(Box::new(acc), Box::new(rhs)),
        },
    )(input)
}

pub fn expr(input: &str) -> IResult<&str, Expr> {
    let (input, init) = term(input)?;
    fold_many0(
        pair(ws(alt((char('+'), char('-')))), term),
        move || init.clone(),
        |acc, (op, rhs)| match op {
            '+' => Expr::Add(Box::new(acc), Box::new(rhs)),
            _ => Expr::Sub(Box::new(acc), Box::new(rhs)),
        },
    )(input)
}

// --- Program statements ---

pub fn qreg(input: &str) -> IResult<&str, ParsedStatement> {
    map(
        tuple((
            tag("qreg"),
            space1,
            identifier,
            delimited(char('['), usize_parser, char(']')),
            space0,
            tag(";"),
        )),
        |(_, _, name, size, _, _)| ParsedStatement::QReg(name, size),
    )(input)
}

fn qubit_arg(input: &str) -> IResult<&str, QubitArg> {
    pair(
        identifier,
        opt(delimited(char('['), usize_parser, char(']'))),
    )(input)
}

fn qubit_list(input: &str) -> IResult<&str, Vec<QubitArg>> {
    separated_list1(tuple((space0, char(','), space0)), qubit_arg)(input)
}

pub fn barrier(input: &str) -> IResult<&str, ParsedStatement> {
    map(
        tuple((tag("barrier"), space1, qubit_list, space0, tag(";"))),
        |(_, _, qubits, _, _)| ParsedStatement::Barrier(qubits),
    )(input)
}

pub fn gate_call(input: &str) -> IResult<&str, ParsedStatement> {
    let (input, name) = identifier(input)?;
    let (input, params) = opt(delimited(
        char('('),
        separated_list0(char(','), expr),
        char(')'),
    ))(input)?;
    let (input, _) = space1(input)?;
    let (input, qubits) = qubit_list(input)?;
    let (input, _) = pair(space0, tag(";"))(input)?;

    Ok((
        input,
        ParsedStatement::Gate(name, params.unwrap_or_default(), qubits),
    ))
}

// --- Construction expressions ---

fn named_phase(input: &str) -> IResult<&str, (String, f64)> {
    separated_pair(ws(identifier), char('='), ws(float_literal))(input)
}

pub fn construction(input: &str) -> IResult<&str, GateExpr> {
    map(
        tuple((
            ws(identifier),
            char('('),
            separated_list0(char(','), named_phase),
            char(')'),
            multispace0,
        )),
        |(name, _, params, _, _)| GateExpr { name, params },
    )(input)
}
