// Copyright 2025 The Pigweed Authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License. You may obtain a copy of
// the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the
// License for the specific language governing permissions and limitations under
// the License.

//! Parser for `core::fmt` style format strings supplied at runtime.
//!
//! # Unsupported core::fmt features
//! * The `-` flag.
//! * Argument widths or precisions: `{:0$}`, `{:.*}` or `{:varname$}`

use std::collections::HashSet;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till1, take_while},
    character::complete::{alpha1, alphanumeric1, anychar, char, digit1},
    combinator::{map, map_res, opt, recognize, value},
    multi::{many0, many0_count},
    sequence::{pair, preceded},
    IResult,
};

use crate::{Alignment, Argument, Conversion, Flag, Fragment, Specifier};

/// The `name` in a `{name}` format string.  Matches a Rust identifier.
fn named_argument(input: &str) -> IResult<&str, Argument> {
    let (input, ident) = recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))(input)?;

    Ok((input, Argument::Named(ident.to_string())))
}

/// The decimal value in a `{0}` format string.
fn positional_argument(input: &str) -> IResult<&str, Argument> {
    map(map_res(digit1, |val: &str| val.parse::<usize>()), Argument::Positional)(input)
}

/// No argument, i.e. the next implicit one.  Does not consume any data.
fn next_argument(input: &str) -> IResult<&str, Argument> {
    Ok((input, Argument::Next))
}

fn argument(input: &str) -> IResult<&str, Argument> {
    alt((named_argument, positional_argument, next_argument))(input)
}

/// An explicit formatting type, i.e. the `x` in `{:x}`.
fn explicit_type(input: &str) -> IResult<&str, Specifier> {
    alt((
        value(Specifier::Debug, alt((tag("x?"), tag("X?"), tag("?")))),
        value(Specifier::Octal, tag("o")),
        value(Specifier::Hex, tag("x")),
        value(Specifier::UpperHex, tag("X")),
        value(Specifier::Pointer, tag("p")),
        value(Specifier::Binary, tag("b")),
        value(Specifier::Exponential, tag("e")),
        value(Specifier::UpperExponential, tag("E")),
    ))(input)
}

fn ty(input: &str) -> IResult<&str, Specifier> {
    map(opt(explicit_type), |spec| spec.unwrap_or(Specifier::Display))(input)
}

/// A formatting flag.  One of `+`, `#`, or `0`.
fn map_flag(value: char) -> Result<Flag, String> {
    match value {
        '+' => Ok(Flag::ForceSign),
        '#' => Ok(Flag::AlternateSyntax),
        '0' => Ok(Flag::LeadingZeros),
        _ => Err(format!("Unsupported flag '{}'", value)),
    }
}

/// The flags, in the order `core::fmt` accepts them: `+`, then `#`, then `0`.
fn flags(input: &str) -> IResult<&str, HashSet<Flag>> {
    let (input, sign) = opt(map_res(char('+'), map_flag))(input)?;
    let (input, alternate) = opt(map_res(char('#'), map_flag))(input)?;
    let (input, zeros) = opt(map_res(char('0'), map_flag))(input)?;

    Ok((input, [sign, alternate, zeros].into_iter().flatten().collect()))
}

fn map_alignment(value: char) -> Result<Alignment, String> {
    match value {
        '<' => Ok(Alignment::Left),
        '^' => Ok(Alignment::Center),
        '>' => Ok(Alignment::Right),
        _ => Err(format!("Unsupported alignment '{}'", value)),
    }
}

fn bare_alignment(input: &str) -> IResult<&str, Alignment> {
    map_res(anychar, map_alignment)(input)
}

fn fill_and_alignment(input: &str) -> IResult<&str, (char, Alignment)> {
    let (input, fill) = anychar(input)?;
    let (input, alignment) = bare_alignment(input)?;

    Ok((input, (fill, alignment)))
}

/// An optional fill character plus alignment flag.
fn alignment(input: &str) -> IResult<&str, (char, Alignment)> {
    // The fill character may itself be an alignment character (`{:<>5}`) so
    // the two character form is tried first.
    if let Ok((input, (fill, alignment))) = fill_and_alignment(input) {
        return Ok((input, (fill, alignment)));
    }

    if let Ok((input, alignment)) = bare_alignment(input) {
        return Ok((input, (' ', alignment)));
    }

    Ok((input, (' ', Alignment::None)))
}

fn count(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |val: &str| val.parse::<usize>())(input)
}

fn width(input: &str) -> IResult<&str, Option<usize>> {
    opt(count)(input)
}

fn precision(input: &str) -> IResult<&str, Option<usize>> {
    opt(preceded(tag("."), count))(input)
}

/// The part of a conversion following the `:`.
fn format_spec(input: &str) -> IResult<&str, Conversion> {
    let (input, _) = tag(":")(input)?;
    let (input, (fill, alignment)) = alignment(input)?;
    let (input, flags) = flags(input)?;
    let (input, width) = width(input)?;
    let (input, precision) = precision(input)?;
    let (input, specifier) = ty(input)?;

    Ok((
        input,
        Conversion {
            argument: Argument::Next, // Filled in by `conversion()`.
            fill,
            alignment,
            flags,
            width,
            precision,
            specifier,
        },
    ))
}

/// A complete `{...}` expression.
fn conversion(input: &str) -> IResult<&str, Conversion> {
    let (input, _) = tag("{")(input)?;
    let (input, argument) = argument(input)?;
    let (input, spec) = opt(format_spec)(input)?;
    let (input, _) = take_while(|c: char| c.is_whitespace())(input)?;
    let (input, _) = tag("}")(input)?;

    let mut conversion = spec.unwrap_or_default();
    conversion.argument = argument;

    Ok((input, conversion))
}

fn literal_fragment(input: &str) -> IResult<&str, Fragment> {
    map(take_till1(|c| c == '{' || c == '}'), |s: &str| {
        Fragment::Literal(s.to_string())
    })(input)
}

/// An escaped `{` or `}`.
fn escape_fragment(input: &str) -> IResult<&str, Fragment> {
    alt((
        map(tag("{{"), |_| Fragment::Literal("{".to_string())),
        map(tag("}}"), |_| Fragment::Literal("}".to_string())),
    ))(input)
}

fn conversion_fragment(input: &str) -> IResult<&str, Fragment> {
    map(conversion, Fragment::Conversion)(input)
}

fn fragment(input: &str) -> IResult<&str, Fragment> {
    alt((escape_fragment, conversion_fragment, literal_fragment))(input)
}

/// Parses as many fragments as possible.  Callers treat unconsumed input as a
/// syntax error.
pub(crate) fn format_string(input: &str) -> IResult<&str, Vec<Fragment>> {
    many0(fragment)(input)
}
