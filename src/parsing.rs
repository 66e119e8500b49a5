//! Text form of [`Magnitude`]: plain decimals, `e`-prefixed towers
//! (`ee10` is `10^10^10`) and hyperoperator shorthands (`10^^3`).
use num_traits::{ConstOne, ConstZero};
#[cfg(not(feature = "std"))]
use num_traits::Float;

use crate::Magnitude;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
/// An error that can occur when parsing a [`Magnitude`].
pub enum FromStrError {
    /// Tried to parse with a radix that isn't base 10. Holds the base that was attempted to be parsed in.
    IncorrectRadix(u32),
    /// Encountered malformed input. Holds the index of where the parsing failed.
    MalformedInput(usize),
}

#[derive(Copy, Clone)]
pub struct ParseHead<'s> {
    input: &'s str,
    index: usize,
}

impl<'s> ParseHead<'s> {
    pub fn new(input: &'s str) -> Result<Self, FromStrError> {
        Ok(Self { input, index: 0 })
    }

    fn take(&mut self, pattern: impl FnOnce(&char) -> bool) -> Result<char, FromStrError> {
        let Some(chr) = self.input.chars().next() else {
            return Err(FromStrError::MalformedInput(self.index));
        };
        if !pattern(&chr) {
            return Err(FromStrError::MalformedInput(self.index));
        }
        let len = chr.len_utf8();
        self.input = &self.input[len..];
        self.index += len;
        Ok(chr)
    }

    fn chomp(&mut self, pattern: &str) -> Result<(), FromStrError> {
        if !self.input.starts_with(pattern) {
            return Err(FromStrError::MalformedInput(self.index));
        }
        let len = pattern.len();
        self.input = &self.input[len..];
        self.index += len;
        Ok(())
    }

    fn assert(&self, f: impl FnOnce(&str) -> bool) -> Result<(), FromStrError> {
        f(self.input)
            .then_some(())
            .ok_or(FromStrError::MalformedInput(self.index))
    }
}

impl<'s> core::ops::Deref for ParseHead<'s> {
    type Target = &'s str;

    fn deref(&self) -> &Self::Target {
        &self.input
    }
}

// Parsing rules:
// <root> ::= "NaN" | <sign>? <num>
// <sign> ::= "+" | "-"
// <num> ::= "Infinity" | "10" <opr> <float> | "e"* <float>
// <opr> ::= "^" | "^^" | "^^^" | "{" <int> "}"
// <float> ::= <dec> <exp>?
// <dec> ::= <int> ("." DIGIT+)?
// <exp> ::= ("e" | "E") <sign>? <int>
// <int> ::= "0" | (NONZERO DIGIT*)

pub fn parse_magnitude(input: &mut ParseHead<'_>) -> Result<Magnitude, FromStrError> {
    if input.chomp("NaN").is_ok() {
        input.assert(str::is_empty)?;
        return Ok(Magnitude::NAN);
    }

    let is_negative = parse_sign(input)?;

    // <num>
    let res = if input.chomp("Infinity").is_ok() {
        Magnitude::INFINITY
    } else {
        'b: {
            let save = *input;
            if let Ok(num) = parse_hyperoperation(input) {
                break 'b num;
            }
            *input = save;
            parse_tower(input)?
        }
    };

    input.assert(str::is_empty)?;
    Ok(if is_negative { -res } else { res })
}

fn parse_sign(input: &mut ParseHead<'_>) -> Result<bool, FromStrError> {
    if input.chomp("-").is_ok() {
        return Ok(true);
    }
    let _ = input.chomp("+");
    Ok(false)
}

fn parse_tower(input: &mut ParseHead<'_>) -> Result<Magnitude, FromStrError> {
    let mut layers = 0;
    while input.chomp("e").is_ok() {
        layers += 1;
    }
    let top = parse_float(input)?;
    if layers == 0 {
        return Ok(top);
    }
    if top.layer() != 0 {
        return Ok((0..layers).fold(top, |acc, _| acc.pow10()));
    }
    Ok(Magnitude::from_components(1, layers, top.mag()))
}

fn parse_float(input: &mut ParseHead<'_>) -> Result<Magnitude, FromStrError> {
    let start = **input;
    let idx = input.index;
    parse_int(input)?;
    if input.chomp(".").is_ok() {
        parse_digits(input)?;
    }
    let mantissa_len = input.index - idx;
    if input.chomp("e").is_err() && input.chomp("E").is_err() {
        return parse_f64(&start[..mantissa_len], input.index).map(Magnitude::from);
    }
    let exponent_negative = parse_sign(input)?;
    let exponent = parse_int(input)? as f64;
    let exponent = if exponent_negative { -exponent } else { exponent };
    if exponent.abs() <= 300.0 {
        return parse_f64(&start[..input.index - idx], input.index).map(Magnitude::from);
    }
    // Out of f64 range: place the decimal exponent on layer 1 directly
    let mantissa = parse_f64(&start[..mantissa_len], input.index)?;
    if mantissa == 0.0 {
        return Ok(Magnitude::ZERO);
    }
    Ok(Magnitude::from_components(1, 1, exponent + mantissa.log10()))
}

fn parse_f64(text: &str, index: usize) -> Result<f64, FromStrError> {
    text.parse().map_err(|_| FromStrError::MalformedInput(index))
}

fn parse_hyperoperation(input: &mut ParseHead<'_>) -> Result<Magnitude, FromStrError> {
    input.chomp("10")?;
    let operator_index = input.index;
    let arrow_count = parse_operator(input)?;
    let operand = parse_float(input)?;
    match arrow_count {
        1 => Ok(operand.pow10()),
        2 => Ok(Magnitude::TEN.tetrate(operand.to_f64(), Magnitude::ONE)),
        3 => Ok(Magnitude::TEN.pentate(operand.to_f64(), Magnitude::ONE)),
        _ => Err(FromStrError::MalformedInput(operator_index)),
    }
}

fn parse_operator(input: &mut ParseHead<'_>) -> Result<usize, FromStrError> {
    if input.chomp("^").is_ok() {
        let mut count = 1;
        while input.starts_with('^') {
            input.chomp("^")?;
            count += 1;
        }
        Ok(count)
    } else {
        input.chomp("{")?;
        let count = parse_int(input)?;
        input.chomp("}")?;
        Ok(count)
    }
}

fn parse_int(input: &mut ParseHead<'_>) -> Result<usize, FromStrError> {
    if input.chomp("0").is_ok() {
        return Ok(0);
    }
    let mut count: usize = input
        .take(char::is_ascii_digit)?
        .to_digit(10)
        .ok_or(FromStrError::MalformedInput(input.index))? as usize;
    while let Some(c) = input
        .take(char::is_ascii_digit)
        .ok()
        .and_then(|c| c.to_digit(10))
    {
        count = count.saturating_mul(10).saturating_add(c as usize);
    }
    Ok(count)
}

fn parse_digits(input: &mut ParseHead<'_>) -> Result<(), FromStrError> {
    input.take(char::is_ascii_digit)?;
    while input.take(char::is_ascii_digit).is_ok() {}
    Ok(())
}
