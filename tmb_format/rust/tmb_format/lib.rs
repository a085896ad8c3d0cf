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

//! The `tmb_format` crate renders `core::fmt` style format strings that are
//! only known at runtime.
//!
//! `format!()` checks its format string at compile time, which is what the
//! `tmb_log` macros use.  Format strings that come from configuration or from
//! another language can't be checked that way, so `tmb_format` parses them
//! into a [`FormatString`] and renders it against a slice of [`Display`]
//! arguments.  Mismatches are reported as an [`Error`] instead of a panic.
//!
//! # Example
//!
//! ```
//! use tmb_format::{format, Error};
//!
//! assert_eq!(format("{} jobs in {:.2}s", &[&3, &0.5]).unwrap(), "3 jobs in 0.50s");
//! assert_eq!(format("[{:>5}]", &[&"ab"]).unwrap(), "[   ab]");
//! assert_eq!(
//!     format("{} and {}", &[&1]),
//!     Err(Error::MissingArgument { index: 1, supplied: 1 })
//! );
//! ```
//!
//! Only [`Display`] is available through `&dyn Display`, so conversions with an
//! explicit type (`{:x}`, `{:?}`, ...) parse but fail to render with
//! [`Error::UnsupportedSpecifier`].  Extra arguments are ignored.
#![deny(missing_docs)]

use std::collections::HashSet;
use std::fmt::{self, Display, Write};

use thiserror::Error;

mod core_fmt;

/// Errors produced while parsing or rendering a format string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The format string is malformed starting at byte `offset`.
    #[error("invalid format string at byte {offset}")]
    Syntax {
        /// Byte offset of the first unparsable character.
        offset: usize,
    },

    /// A conversion referenced an argument that was not supplied.
    #[error("argument {index} requested but only {supplied} supplied")]
    MissingArgument {
        /// Zero based index of the requested argument.
        index: usize,
        /// Number of arguments supplied.
        supplied: usize,
    },

    /// A `{name}` conversion was used.
    #[error("named argument `{0}` is not supported")]
    NamedArgument(String),

    /// A conversion asked for something other than `Display`.
    #[error("`{{:{0}}}` conversions are not supported")]
    UnsupportedSpecifier(Specifier),

    /// An argument's `Display` implementation returned an error.
    #[error("a formatting trait implementation returned an error")]
    Fmt,
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Error::Fmt
    }
}

/// `tmb_format` result type.
pub type Result<T> = core::result::Result<T, Error>;

/// Which argument a conversion consumes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Argument {
    /// `{}`: the next implicit argument.
    #[default]
    Next,
    /// `{2}`
    Positional(usize),
    /// `{name}`
    Named(String),
}

/// Alignment of a padded conversion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    /// No alignment given; the argument's `Display` implementation picks the
    /// side, e.g. numbers pad on the left and strings on the right.
    #[default]
    None,
    /// `<`
    Left,
    /// `^`
    Center,
    /// `>`
    Right,
}

/// A formatting flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flag {
    /// `+`
    ForceSign,

    /// `#`
    AlternateSyntax,

    /// `0`
    LeadingZeros,
}

/// The trait a conversion is formatted with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Specifier {
    /// `{}`
    #[default]
    Display,
    /// `{:?}`, `{:x?}` or `{:X?}`
    Debug,
    /// `{:o}`
    Octal,
    /// `{:x}`
    Hex,
    /// `{:X}`
    UpperHex,
    /// `{:p}`
    Pointer,
    /// `{:b}`
    Binary,
    /// `{:e}`
    Exponential,
    /// `{:E}`
    UpperExponential,
}

impl Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spec = match self {
            Specifier::Display => "",
            Specifier::Debug => "?",
            Specifier::Octal => "o",
            Specifier::Hex => "x",
            Specifier::UpperHex => "X",
            Specifier::Pointer => "p",
            Specifier::Binary => "b",
            Specifier::Exponential => "e",
            Specifier::UpperExponential => "E",
        };
        f.write_str(spec)
    }
}

/// A single `{...}` conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conversion {
    /// Argument rendered by this conversion.
    pub argument: Argument,
    /// Padding character.
    pub fill: char,
    /// Where the value sits inside the padding.
    pub alignment: Alignment,
    /// Flags given between the alignment and the width.
    pub flags: HashSet<Flag>,
    /// Minimum width in characters.
    pub width: Option<usize>,
    /// Precision passed through to the argument's `Display` implementation.
    pub precision: Option<usize>,
    /// Formatting trait.
    pub specifier: Specifier,
}

impl Default for Conversion {
    fn default() -> Self {
        Self {
            argument: Argument::Next,
            fill: ' ',
            alignment: Alignment::None,
            flags: HashSet::new(),
            width: None,
            precision: None,
            specifier: Specifier::Display,
        }
    }
}

/// A piece of a parsed format string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment {
    /// Text copied to the output.  Escaped braces are already unescaped.
    Literal(String),
    /// A `{...}` conversion.
    Conversion(Conversion),
}

/// A parsed format string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatString {
    /// Fragments in order.  Adjacent literals are merged.
    pub fragments: Vec<Fragment>,
}

impl FormatString {
    /// Parses a format string.
    ///
    /// ```
    /// use tmb_format::{Argument, Conversion, FormatString, Fragment};
    ///
    /// let format_string = FormatString::parse("{{{0}}}").unwrap();
    /// assert_eq!(format_string.fragments, vec![
    ///     Fragment::Literal("{".to_string()),
    ///     Fragment::Conversion(Conversion {
    ///         argument: Argument::Positional(0),
    ///         ..Default::default()
    ///     }),
    ///     Fragment::Literal("}".to_string()),
    /// ]);
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let (rest, fragments) =
            core_fmt::format_string(input).map_err(|_| Error::Syntax { offset: 0 })?;
        if !rest.is_empty() {
            return Err(Error::Syntax {
                offset: input.len() - rest.len(),
            });
        }
        Ok(Self::from_fragments(fragments))
    }

    fn from_fragments(fragments: Vec<Fragment>) -> Self {
        let mut merged: Vec<Fragment> = Vec::with_capacity(fragments.len());
        for fragment in fragments {
            if let (Some(Fragment::Literal(last)), Fragment::Literal(next)) =
                (merged.last_mut(), &fragment)
            {
                last.push_str(next);
                continue;
            }
            merged.push(fragment);
        }
        Self { fragments: merged }
    }

    /// Number of arguments the string consumes, i.e. one past the highest
    /// argument index referenced.
    pub fn argument_count(&self) -> usize {
        let mut next = 0;
        let mut count = 0;
        for fragment in &self.fragments {
            if let Fragment::Conversion(conversion) = fragment {
                let index = match conversion.argument {
                    Argument::Next => {
                        next += 1;
                        next - 1
                    }
                    Argument::Positional(index) => index,
                    Argument::Named(_) => continue,
                };
                count = count.max(index + 1);
            }
        }
        count
    }

    /// Renders into `out`.
    pub fn render_to<W: Write>(&self, out: &mut W, args: &[&dyn Display]) -> Result<()> {
        let mut next = 0;
        for fragment in &self.fragments {
            let conversion = match fragment {
                Fragment::Literal(text) => {
                    out.write_str(text)?;
                    continue;
                }
                Fragment::Conversion(conversion) => conversion,
            };

            let index = match &conversion.argument {
                Argument::Next => {
                    next += 1;
                    next - 1
                }
                Argument::Positional(index) => *index,
                Argument::Named(name) => return Err(Error::NamedArgument(name.clone())),
            };
            if conversion.specifier != Specifier::Display {
                return Err(Error::UnsupportedSpecifier(conversion.specifier));
            }
            let arg = args.get(index).ok_or(Error::MissingArgument {
                index,
                supplied: args.len(),
            })?;
            write_conversion(out, conversion, *arg)?;
        }
        Ok(())
    }

    /// Renders to a new `String`.
    pub fn render(&self, args: &[&dyn Display]) -> Result<String> {
        let mut out = String::new();
        self.render_to(&mut out, args)?;
        Ok(out)
    }
}

// Format specs must be literals, so every combination of alignment, flags,
// and precision is spelled out.  Width is always given; a width of 0 pads
// nothing, the same as no width.
macro_rules! write_spec {
    ($out:expr, $arg:expr, $width:expr, $precision:expr, $($spec:literal),*) => {
        match $precision {
            Some(precision) => write!(
                $out,
                concat!("{:", $($spec,)* "width$.precision$}"),
                $arg,
                width = $width,
                precision = precision
            ),
            None => write!($out, concat!("{:", $($spec,)* "width$}"), $arg, width = $width),
        }
    };
}

macro_rules! write_flagged {
    ($out:expr, $arg:expr, $width:expr, $precision:expr, $flags:expr, $align:literal) => {
        match $flags {
            (false, false, false) => write_spec!($out, $arg, $width, $precision, $align),
            (false, false, true) => write_spec!($out, $arg, $width, $precision, $align, "0"),
            (false, true, false) => write_spec!($out, $arg, $width, $precision, $align, "#"),
            (false, true, true) => write_spec!($out, $arg, $width, $precision, $align, "#0"),
            (true, false, false) => write_spec!($out, $arg, $width, $precision, $align, "+"),
            (true, false, true) => write_spec!($out, $arg, $width, $precision, $align, "+0"),
            (true, true, false) => write_spec!($out, $arg, $width, $precision, $align, "+#"),
            (true, true, true) => write_spec!($out, $arg, $width, $precision, $align, "+#0"),
        }
    };
}

/// Writes `arg` through `core::fmt` with everything in `conversion` except a
/// custom fill character.
fn write_std<W: Write>(
    out: &mut W,
    conversion: &Conversion,
    width: usize,
    arg: &dyn Display,
) -> fmt::Result {
    let flags = (
        conversion.flags.contains(&Flag::ForceSign),
        conversion.flags.contains(&Flag::AlternateSyntax),
        conversion.flags.contains(&Flag::LeadingZeros),
    );
    let precision = conversion.precision;
    match conversion.alignment {
        Alignment::None => write_flagged!(out, arg, width, precision, flags, ""),
        Alignment::Left => write_flagged!(out, arg, width, precision, flags, "<"),
        Alignment::Center => write_flagged!(out, arg, width, precision, flags, "^"),
        Alignment::Right => write_flagged!(out, arg, width, precision, flags, ">"),
    }
}

fn write_conversion<W: Write>(
    out: &mut W,
    conversion: &Conversion,
    arg: &dyn Display,
) -> Result<()> {
    let width = conversion.width.unwrap_or(0);
    if conversion.fill == ' ' {
        write_std(out, conversion, width, arg)?;
        return Ok(());
    }

    // The fill character can't be passed at runtime.  Render padded with
    // spaces and unpadded, and swap the fill in only if the padding is exactly
    // what `Formatter::pad` would have produced.  Zero padded numbers and
    // implementations that ignore the width are kept as rendered.
    let mut padded = String::new();
    write_std(&mut padded, conversion, width, arg)?;
    let mut bare = String::new();
    write_std(&mut bare, conversion, 0, arg)?;

    let padding = padded.chars().count().saturating_sub(bare.chars().count());
    let (before, after) = match conversion.alignment {
        Alignment::None | Alignment::Left => (0, padding),
        Alignment::Right => (padding, 0),
        Alignment::Center => (padding / 2, padding - padding / 2),
    };
    let is_spaces = |s: Option<&str>| s.is_some_and(|s| s.bytes().all(|b| b == b' '));
    let spaces_around = padded.len() == bare.len() + padding
        && is_spaces(padded.get(..before))
        && padded.get(before..before + bare.len()) == Some(bare.as_str())
        && is_spaces(padded.get(before + bare.len()..));
    if !spaces_around {
        out.write_str(&padded)?;
        return Ok(());
    }

    for _ in 0..before {
        out.write_char(conversion.fill)?;
    }
    out.write_str(&bare)?;
    for _ in 0..after {
        out.write_char(conversion.fill)?;
    }
    Ok(())
}

/// Parses `format` and renders it against `args`.
pub fn format(format: &str, args: &[&dyn Display]) -> Result<String> {
    FormatString::parse(format)?.render(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_literals_are_merged() {
        let format_string = FormatString::parse("a {{b}} c").unwrap();
        assert_eq!(
            format_string.fragments,
            vec![Fragment::Literal("a {b} c".to_string())]
        );
    }

    #[test]
    fn syntax_errors_report_offset() {
        assert_eq!(
            FormatString::parse("count={"),
            Err(Error::Syntax { offset: 6 })
        );
        assert_eq!(FormatString::parse("}"), Err(Error::Syntax { offset: 0 }));
        assert_eq!(
            FormatString::parse("{:-}"),
            Err(Error::Syntax { offset: 0 })
        );
    }

    #[test]
    fn argument_count_tracks_highest_index() {
        assert_eq!(FormatString::parse("none").unwrap().argument_count(), 0);
        assert_eq!(FormatString::parse("{} {}").unwrap().argument_count(), 2);
        assert_eq!(FormatString::parse("{3} {}").unwrap().argument_count(), 4);
        assert_eq!(FormatString::parse("{} {0}").unwrap().argument_count(), 1);
    }

    #[test]
    fn implicit_and_positional_arguments_mix() {
        assert_eq!(format("{} {0} {}", &[&"a", &"b"]).unwrap(), "a a b");
    }

    #[test]
    fn padding_and_precision_apply() {
        assert_eq!(format("[{:<4}]", &[&7]).unwrap(), "[7   ]");
        assert_eq!(format("[{:*^7}]", &[&"mid"]).unwrap(), "[**mid**]");
        assert_eq!(format("[{:6.2}]", &[&1.23456]).unwrap(), "[  1.23]");
        assert_eq!(format("[{:5}]", &[&7]).unwrap(), "[    7]");
        assert_eq!(format("[{:5}]", &[&"ab"]).unwrap(), "[ab   ]");
        assert_eq!(format("[{:.3}]", &[&"truncate"]).unwrap(), "[tru]");
        assert_eq!(format("[{:2}]", &[&"longer"]).unwrap(), "[longer]");
    }

    #[test]
    fn flags_apply() {
        assert_eq!(format("[{:05}]", &[&7]).unwrap(), "[00007]");
        assert_eq!(format("[{:05}]", &[&-7]).unwrap(), "[-0007]");
        assert_eq!(format("[{:+}]", &[&7]).unwrap(), "[+7]");
        assert_eq!(format("[{:+.1}]", &[&2.0]).unwrap(), "[+2.0]");
        assert_eq!(format("[{:#}]", &[&"alt"]).unwrap(), "[alt]");
        assert_eq!(format("[{:<05}]", &[&7]).unwrap(), "[00007]");
    }

    #[test]
    fn custom_fill_only_replaces_padding() {
        assert_eq!(format("[{:_>5}]", &[&"a b"]).unwrap(), "[__a b]");
        assert_eq!(format("[{:_<5}]", &[&42]).unwrap(), "[42___]");
        assert_eq!(format("[{:_^6}]", &[&"ab"]).unwrap(), "[__ab__]");
        // Zero padding takes precedence over the fill, as in `format!`.
        assert_eq!(format("[{:_>05}]", &[&7]).unwrap(), "[00007]");
    }

    #[test]
    fn unsupported_conversions_fail_to_render() {
        assert_eq!(
            format("{:x}", &[&255]),
            Err(Error::UnsupportedSpecifier(Specifier::Hex))
        );
        assert_eq!(
            format("{name}", &[&1]),
            Err(Error::NamedArgument("name".to_string()))
        );
    }

    #[test]
    fn failing_display_is_reported() {
        struct Broken;
        impl Display for Broken {
            fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
                Err(fmt::Error)
            }
        }
        assert_eq!(format("{}", &[&Broken]), Err(Error::Fmt));
    }

    #[test]
    fn errors_describe_the_problem() {
        assert_eq!(
            Error::UnsupportedSpecifier(Specifier::Debug).to_string(),
            "`{:?}` conversions are not supported"
        );
        assert_eq!(
            Error::MissingArgument {
                index: 1,
                supplied: 1
            }
            .to_string(),
            "argument 1 requested but only 1 supplied"
        );
    }
}
