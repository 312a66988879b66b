//! printf-style message substitution.
//!
//! Log calls carry a template and a slice of [`Arg`] values that are
//! substituted at runtime. Substitution either produces the final text or a
//! [`FormatError`] naming the template and what went wrong; the dispatch
//! path decides what to do with each outcome.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error as ThisError;

/// A value substituted into a log template.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Text, accepted by `%s`, `%r` and single-character `%c`.
    Str(String),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Floating point number.
    Float(f64),
    /// Boolean, usable as 0/1 by the integer conversions.
    Bool(bool),
    /// Single character.
    Char(char),
}

impl Arg {
    /// Capture any displayable value as text.
    pub fn display(value: impl fmt::Display) -> Self {
        Arg::Str(value.to_string())
    }

    /// Short type name used in mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Arg::Str(_) => "str",
            Arg::Int(_) | Arg::UInt(_) => "int",
            Arg::Float(_) => "float",
            Arg::Bool(_) => "bool",
            Arg::Char(_) => "char",
        }
    }

    fn repr(&self) -> String {
        match self {
            Arg::Str(s) => format!("{s:?}"),
            Arg::Char(c) => format!("{c:?}"),
            other => other.to_string(),
        }
    }

    fn as_integer(&self) -> Option<i128> {
        match *self {
            Arg::Int(v) => Some(v as i128),
            Arg::UInt(v) => Some(v as i128),
            Arg::Bool(b) => Some(b as i128),
            Arg::Float(f) if f.is_finite() => Some(f.trunc() as i128),
            _ => None,
        }
    }

    fn as_exact_integer(&self) -> Option<i128> {
        match self {
            Arg::Float(_) => None,
            other => other.as_integer(),
        }
    }

    fn as_float(&self) -> Option<f64> {
        match *self {
            Arg::Int(v) => Some(v as f64),
            Arg::UInt(v) => Some(v as f64),
            Arg::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
            Arg::Float(f) => Some(f),
            _ => None,
        }
    }

    fn as_char(&self) -> Option<char> {
        match self {
            Arg::Char(c) => Some(*c),
            Arg::Int(_) | Arg::UInt(_) => self
                .as_integer()
                .and_then(|n| u32::try_from(n).ok())
                .and_then(char::from_u32),
            Arg::Str(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Str(s) => f.write_str(s),
            Arg::Int(v) => write!(f, "{v}"),
            Arg::UInt(v) => write!(f, "{v}"),
            Arg::Float(v) => write!(f, "{v:?}"),
            Arg::Bool(v) => write!(f, "{v}"),
            Arg::Char(c) => write!(f, "{c}"),
        }
    }
}

macro_rules! impl_from_for_arg {
    ($variant:ident as $target:ty: $($ty:ty),*) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Arg::$variant(value as $target)
                }
            }
        )*
    };
}

impl_from_for_arg!(Int as i64: i8, i16, i32, i64, isize);
impl_from_for_arg!(UInt as u64: u8, u16, u32, u64, usize);
impl_from_for_arg!(Float as f64: f32, f64);

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl From<char> for Arg {
    fn from(value: char) -> Self {
        Arg::Char(value)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Str(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Str(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Arg::Str(value.clone())
    }
}

impl From<&std::path::Path> for Arg {
    fn from(value: &std::path::Path) -> Self {
        Arg::Str(value.display().to_string())
    }
}

/// What went wrong while substituting arguments.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum FormatErrorKind {
    #[error("not enough arguments for format string")]
    NotEnoughArguments,
    #[error("not all arguments converted during string formatting")]
    TooManyArguments,
    #[error("%{conversion} format: a {expected} is required, not {found}")]
    TypeMismatch {
        conversion: char,
        expected: &'static str,
        found: &'static str,
    },
    #[error("unsupported format character {0:?}")]
    UnsupportedConversion(char),
    #[error("incomplete format")]
    IncompleteSpecifier,
    #[error("width too big")]
    WidthTooBig,
    #[error("precision too big")]
    PrecisionTooBig,
}

/// A template that could not be rendered with the given arguments.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct FormatError {
    /// The template exactly as the caller passed it.
    pub template: String,
    /// The cause.
    pub kind: FormatErrorKind,
}

/// Substitute `args` into `template`.
///
/// The template is always processed, so a literal percent sign must be
/// written as `%%` even when no arguments are given.
pub fn render(template: &str, args: &[Arg]) -> Result<String, FormatError> {
    render_inner(template, args).map_err(|kind| FormatError {
        template: template.to_string(),
        kind,
    })
}

fn render_inner(template: &str, args: &[Arg]) -> Result<String, FormatErrorKind> {
    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut remaining = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let spec = Spec::parse(&mut chars)?;
        if spec.conversion == '%' {
            out.push('%');
            continue;
        }
        if !"srdiufFeExXoc".contains(spec.conversion) {
            return Err(FormatErrorKind::UnsupportedConversion(spec.conversion));
        }

        let arg = remaining
            .next()
            .ok_or(FormatErrorKind::NotEnoughArguments)?;
        spec.write(&mut out, arg)?;
    }

    if remaining.next().is_some() {
        return Err(FormatErrorKind::TooManyArguments);
    }
    Ok(out)
}

/// Largest width or precision a directive may ask for.
const MAX_FIELD: usize = u16::MAX as usize;

/// One parsed `%[flags][width][.precision]conversion` directive.
#[derive(Debug, Default)]
struct Spec {
    left: bool,
    zero: bool,
    plus: bool,
    space: bool,
    alternate: bool,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: char,
}

impl Spec {
    fn parse(chars: &mut Peekable<Chars<'_>>) -> Result<Self, FormatErrorKind> {
        let mut spec = Spec::default();
        while let Some(&c) = chars.peek() {
            match c {
                '-' => spec.left = true,
                '0' => spec.zero = true,
                '+' => spec.plus = true,
                ' ' => spec.space = true,
                '#' => spec.alternate = true,
                _ => break,
            }
            chars.next();
        }

        spec.width = take_number(chars);
        if spec.width.is_some_and(|w| w > MAX_FIELD) {
            return Err(FormatErrorKind::WidthTooBig);
        }
        if chars.peek() == Some(&'.') {
            chars.next();
            let precision = take_number(chars).unwrap_or(0);
            if precision > MAX_FIELD {
                return Err(FormatErrorKind::PrecisionTooBig);
            }
            spec.precision = Some(precision);
        }

        spec.conversion = chars
            .next()
            .ok_or(FormatErrorKind::IncompleteSpecifier)?;
        Ok(spec)
    }

    fn mismatch(&self, expected: &'static str, arg: &Arg) -> FormatErrorKind {
        FormatErrorKind::TypeMismatch {
            conversion: self.conversion,
            expected,
            found: arg.type_name(),
        }
    }

    fn sign(&self, negative: bool) -> &'static str {
        if negative {
            "-"
        } else if self.plus {
            "+"
        } else if self.space {
            " "
        } else {
            ""
        }
    }

    fn write(&self, out: &mut String, arg: &Arg) -> Result<(), FormatErrorKind> {
        match self.conversion {
            's' | 'r' => {
                let text = if self.conversion == 's' {
                    arg.to_string()
                } else {
                    arg.repr()
                };
                let text = match self.precision {
                    Some(p) => text.chars().take(p).collect(),
                    None => text,
                };
                self.pad(out, "", &text, false);
            }
            'd' | 'i' | 'u' => {
                let n = arg
                    .as_integer()
                    .ok_or_else(|| self.mismatch("number", arg))?;
                self.pad(out, self.sign(n < 0), &n.unsigned_abs().to_string(), true);
            }
            'x' | 'X' | 'o' => {
                let n = arg
                    .as_exact_integer()
                    .ok_or_else(|| self.mismatch("integer", arg))?;
                let magnitude = n.unsigned_abs();
                let (body, prefix) = match self.conversion {
                    'x' => (format!("{magnitude:x}"), "0x"),
                    'X' => (format!("{magnitude:X}"), "0X"),
                    _ => (format!("{magnitude:o}"), "0o"),
                };
                let mut lead = self.sign(n < 0).to_string();
                if self.alternate {
                    lead.push_str(prefix);
                }
                self.pad(out, &lead, &body, true);
            }
            'f' | 'F' | 'e' | 'E' => {
                let v = arg
                    .as_float()
                    .ok_or_else(|| self.mismatch("real number", arg))?;
                let precision = self.precision.unwrap_or(6);
                let body = if v.is_nan() {
                    "nan".to_string()
                } else if v.is_infinite() {
                    "inf".to_string()
                } else if matches!(self.conversion, 'f' | 'F') {
                    format!("{:.*}", precision, v.abs())
                } else {
                    exponent_notation(v.abs(), precision)
                };
                let body = if self.conversion.is_ascii_uppercase() {
                    body.to_ascii_uppercase()
                } else {
                    body
                };
                let negative = v.is_sign_negative() && !v.is_nan();
                self.pad(out, self.sign(negative), &body, v.is_finite());
            }
            'c' => {
                let c = arg.as_char().ok_or_else(|| self.mismatch("char", arg))?;
                self.pad(out, "", c.encode_utf8(&mut [0; 4]), false);
            }
            other => return Err(FormatErrorKind::UnsupportedConversion(other)),
        }
        Ok(())
    }

    fn pad(&self, out: &mut String, lead: &str, body: &str, numeric: bool) {
        let len = lead.chars().count() + body.chars().count();
        let fill = self.width.unwrap_or(0).saturating_sub(len);
        if self.left {
            out.push_str(lead);
            out.push_str(body);
            out.extend(std::iter::repeat_n(' ', fill));
        } else if self.zero && numeric {
            out.push_str(lead);
            out.extend(std::iter::repeat_n('0', fill));
            out.push_str(body);
        } else {
            out.extend(std::iter::repeat_n(' ', fill));
            out.push_str(lead);
            out.push_str(body);
        }
    }
}

fn take_number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        value = Some(
            value
                .unwrap_or(0)
                .saturating_mul(10)
                .saturating_add(digit as usize),
        );
    }
    value
}

/// C-style exponent: `1.500000e+02` rather than Rust's `1.5e2`.
fn exponent_notation(v: f64, precision: usize) -> String {
    let raw = format!("{:.*e}", precision, v);
    let (mantissa, exponent) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: Vec<Arg>) -> Vec<Arg> {
        values
    }

    #[test]
    fn test_render_plain_text() {
        assert_eq!(render("hello world", &[]).unwrap(), "hello world");
        assert_eq!(render("100%% done", &[]).unwrap(), "100% done");
    }

    #[test]
    fn test_render_basic_substitution() {
        let out = render(
            "user %s logged in %d times",
            &args(vec!["alice".into(), Arg::Int(3)]),
        )
        .unwrap();
        assert_eq!(out, "user alice logged in 3 times");
    }

    #[test]
    fn test_render_numbers() {
        assert_eq!(render("%d", &[Arg::Float(3.9)]).unwrap(), "3");
        assert_eq!(render("%d", &[Arg::Bool(true)]).unwrap(), "1");
        assert_eq!(render("%.2f", &[Arg::Float(3.14159)]).unwrap(), "3.14");
        assert_eq!(render("%f", &[Arg::Int(2)]).unwrap(), "2.000000");
        assert_eq!(render("%e", &[Arg::Float(150.0)]).unwrap(), "1.500000e+02");
        assert_eq!(render("%.1E", &[Arg::Float(0.00123)]).unwrap(), "1.2E-03");
        assert_eq!(render("%x", &[Arg::Int(255)]).unwrap(), "ff");
        assert_eq!(render("%#X", &[Arg::Int(255)]).unwrap(), "0XFF");
        assert_eq!(render("%o", &[Arg::UInt(8)]).unwrap(), "10");
        assert_eq!(render("%+d", &[Arg::Int(5)]).unwrap(), "+5");
    }

    #[test]
    fn test_render_width_and_flags() {
        assert_eq!(render("[%5d]", &[Arg::Int(42)]).unwrap(), "[   42]");
        assert_eq!(render("[%-5d]", &[Arg::Int(42)]).unwrap(), "[42   ]");
        assert_eq!(render("[%05d]", &[Arg::Int(-42)]).unwrap(), "[-0042]");
        assert_eq!(render("[%8.3f]", &[Arg::Float(1.5)]).unwrap(), "[   1.500]");
        assert_eq!(render("[%.3s]", &["abcdef".into()]).unwrap(), "[abc]");
        assert_eq!(render("[%05s]", &["ab".into()]).unwrap(), "[   ab]");
    }

    #[test]
    fn test_render_repr_and_char() {
        assert_eq!(render("%r", &["a\"b".into()]).unwrap(), "\"a\\\"b\"");
        assert_eq!(render("%c", &['z'.into()]).unwrap(), "z");
        assert_eq!(render("%c", &[Arg::Int(65)]).unwrap(), "A");
        assert_eq!(render("%c", &["q".into()]).unwrap(), "q");
    }

    #[test]
    fn test_render_display_of_floats_and_bools() {
        assert_eq!(render("%s", &[Arg::Float(2.0)]).unwrap(), "2.0");
        assert_eq!(render("%s", &[false.into()]).unwrap(), "false");
        let addr = Arg::display(std::net::Ipv4Addr::LOCALHOST);
        assert_eq!(render("%s", &[addr]).unwrap(), "127.0.0.1");
    }

    #[test]
    fn test_render_not_enough_arguments() {
        let err = render("%s and %s", &[]).unwrap_err();
        assert_eq!(err.kind, FormatErrorKind::NotEnoughArguments);
        assert_eq!(err.template, "%s and %s");
    }

    #[test]
    fn test_render_too_many_arguments() {
        let err = render("no placeholders", &["extra".into()]).unwrap_err();
        assert_eq!(err.kind, FormatErrorKind::TooManyArguments);
    }

    #[test]
    fn test_render_type_mismatch() {
        let err = render("%d", &["ten".into()]).unwrap_err();
        assert_eq!(
            err.kind,
            FormatErrorKind::TypeMismatch {
                conversion: 'd',
                expected: "number",
                found: "str",
            }
        );
        assert_eq!(err.to_string(), "%d format: a number is required, not str");
        assert!(render("%x", &[Arg::Float(1.0)]).is_err());
        assert!(render("%c", &["two".into()]).is_err());
    }

    #[test]
    fn test_render_oversized_fields() {
        assert_eq!(
            render("%99999999999999999999999d", &[Arg::Int(1)]).unwrap_err().kind,
            FormatErrorKind::WidthTooBig
        );
        assert_eq!(
            render("%.70000f", &[Arg::Float(1.5)]).unwrap_err().kind,
            FormatErrorKind::PrecisionTooBig
        );
        assert_eq!(
            render("%.70000f", &[Arg::Float(1.5)]).unwrap_err().to_string(),
            "precision too big"
        );

        let wide = render("%65535d", &[Arg::Int(7)]).unwrap();
        assert_eq!(wide.len(), 65535);
        assert!(wide.ends_with(" 7"));
    }

    #[test]
    fn test_render_bad_specifiers() {
        // "% o" parses as a space-flagged octal conversion
        assert_eq!(
            render("50% off", &[]).unwrap_err().kind,
            FormatErrorKind::NotEnoughArguments
        );
        assert_eq!(
            render("trailing %", &[]).unwrap_err().kind,
            FormatErrorKind::IncompleteSpecifier
        );
        assert_eq!(
            render("%y", &[Arg::Int(1)]).unwrap_err().kind,
            FormatErrorKind::UnsupportedConversion('y')
        );
    }
}
