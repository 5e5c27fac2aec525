//! Exact molar amounts.
//!
//! Text-mined compositions carry amounts like `"1"`, `"3/2"`, `"0.5"` or `"1-x"` (variable
//! stoichiometry), so amounts are kept as polynomials over named variables with exact rational
//! coefficients. Two amounts compare equal when their normalized forms are identical, so
//! `"0.5" == "1/2"` and `"1-x+x" == "1"`.
//!
//! # Examples
//! ```
//! use SynthRecipe::Synthesis::amount::Amount;
//! let a = Amount::parse("1-x").unwrap();
//! let b = Amount::parse("x").unwrap();
//! assert_eq!(a.checked_add(&b).unwrap(), Amount::parse("1").unwrap());
//! ```
//!
//! Coefficients are `i128` fractions. Every operation is checked: a result that does not
//! fit (e.g. `"10^64"`) is an [`AmountError::Overflow`], never a panic or a wrapped value.
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Neg;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AmountError {
    #[error("unexpected character '{0}' in amount expression")]
    UnexpectedChar(char),
    #[error("unexpected end of amount expression")]
    UnexpectedEnd,
    #[error("unexpected token '{0}' in amount expression")]
    UnexpectedToken(String),
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("division by a non-constant or zero expression")]
    InvalidDivision,
    #[error("exponent must be a non-negative integer constant")]
    InvalidExponent,
    #[error("empty amount expression")]
    Empty,
    #[error("amount expression overflows exact arithmetic")]
    Overflow,
}

/// Exact fraction, always normalized: positive denominator, gcd(num, den) == 1.
/// `num` is never `i128::MIN`, so negation cannot overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rational {
    num: i128,
    den: i128,
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl Rational {
    pub const ZERO: Rational = Rational { num: 0, den: 1 };
    pub const ONE: Rational = Rational { num: 1, den: 1 };

    /// Normalized fraction; `None` when `den` is zero or the result is not representable
    pub fn checked_new(num: i128, den: i128) -> Option<Self> {
        if den == 0 {
            return None;
        }
        let g = gcd(num.unsigned_abs(), den.unsigned_abs());
        let negative = (num < 0) != (den < 0);
        let magnitude = i128::try_from(num.unsigned_abs() / g).ok()?;
        let den = i128::try_from(den.unsigned_abs() / g).ok()?;
        let num = if negative { -magnitude } else { magnitude };
        Some(Rational { num, den })
    }

    pub fn from_integer(n: i64) -> Self {
        Rational {
            num: i128::from(n),
            den: 1,
        }
    }

    pub fn numer(&self) -> i128 {
        self.num
    }

    pub fn denom(&self) -> i128 {
        self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Parses plain decimal notation: "3", "0.25", ".5", "12."
    fn parse_decimal(text: &str) -> Result<Self, AmountError> {
        let invalid = || AmountError::InvalidNumber(text.to_string());
        let (int_part, frac_part) = match text.split_once('.') {
            Some((i, f)) => (i, f),
            None => (text, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        let digits = format!("{}{}", int_part, frac_part);
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let num: i128 = digits.parse().map_err(|_| AmountError::Overflow)?;
        let den = u32::try_from(frac_part.len())
            .ok()
            .and_then(|n| 10i128.checked_pow(n))
            .ok_or(AmountError::Overflow)?;
        Rational::checked_new(num, den).ok_or(AmountError::Overflow)
    }

    pub fn checked_add(self, rhs: Rational) -> Option<Rational> {
        let num = self
            .num
            .checked_mul(rhs.den)?
            .checked_add(rhs.num.checked_mul(self.den)?)?;
        Rational::checked_new(num, self.den.checked_mul(rhs.den)?)
    }

    pub fn checked_mul(self, rhs: Rational) -> Option<Rational> {
        Rational::checked_new(
            self.num.checked_mul(rhs.num)?,
            self.den.checked_mul(rhs.den)?,
        )
    }

    /// `None` for zero or when the reciprocal is not representable
    pub fn checked_recip(self) -> Option<Rational> {
        Rational::checked_new(self.den, self.num)
    }
}

impl Neg for Rational {
    type Output = Rational;
    fn neg(self) -> Rational {
        Rational {
            num: -self.num,
            den: self.den,
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

const MAX_EXPONENT: i128 = 64;

/// Product of variables with their powers; the empty monomial is the constant term.
type Monomial = BTreeMap<String, u32>;

/// Polynomial with exact rational coefficients. Zero coefficients are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Amount {
    terms: BTreeMap<Monomial, Rational>,
}

impl Amount {
    pub fn zero() -> Self {
        Amount::default()
    }

    pub fn constant(value: Rational) -> Self {
        let mut terms = BTreeMap::new();
        if !value.is_zero() {
            terms.insert(Monomial::new(), value);
        }
        Amount { terms }
    }

    pub fn integer(n: i64) -> Self {
        Amount::constant(Rational::from_integer(n))
    }

    pub fn variable(name: &str) -> Self {
        let mut monomial = Monomial::new();
        monomial.insert(name.to_string(), 1);
        let mut terms = BTreeMap::new();
        terms.insert(monomial, Rational::ONE);
        Amount { terms }
    }

    /// Parses an amount expression such as `"2"`, `"3/2"`, `"0.5"`, `"1-x"` or `"2*(1-x)"`.
    pub fn parse(text: &str) -> Result<Self, AmountError> {
        let tokens = tokenize(text)?;
        if tokens.is_empty() {
            return Err(AmountError::Empty);
        }
        let mut parser = Parser { tokens, pos: 0 };
        let amount = parser.expression()?;
        match parser.peek() {
            None => Ok(amount),
            Some(token) => Err(AmountError::UnexpectedToken(token.to_string())),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Value of the amount when it does not depend on any variable.
    pub fn as_constant(&self) -> Option<Rational> {
        match self.terms.len() {
            0 => Some(Rational::ZERO),
            1 => self.terms.get(&Monomial::new()).copied(),
            _ => None,
        }
    }

    /// Names of the variables the amount depends on.
    pub fn variables(&self) -> Vec<String> {
        let mut vars: Vec<String> = self
            .terms
            .keys()
            .flat_map(|m| m.keys().cloned())
            .collect();
        vars.sort();
        vars.dedup();
        vars
    }

    fn add_term(&mut self, monomial: Monomial, coeff: Rational) -> Result<(), AmountError> {
        let sum = self
            .terms
            .get(&monomial)
            .copied()
            .unwrap_or(Rational::ZERO)
            .checked_add(coeff)
            .ok_or(AmountError::Overflow)?;
        if sum.is_zero() {
            self.terms.remove(&monomial);
        } else {
            self.terms.insert(monomial, sum);
        }
        Ok(())
    }

    pub fn checked_add(&self, rhs: &Amount) -> Result<Amount, AmountError> {
        let mut result = self.clone();
        for (monomial, coeff) in &rhs.terms {
            result.add_term(monomial.clone(), *coeff)?;
        }
        Ok(result)
    }

    pub fn checked_sub(&self, rhs: &Amount) -> Result<Amount, AmountError> {
        self.checked_add(&-rhs.clone())
    }

    pub fn checked_mul(&self, rhs: &Amount) -> Result<Amount, AmountError> {
        let mut result = Amount::zero();
        for (m1, c1) in &self.terms {
            for (m2, c2) in &rhs.terms {
                let mut monomial = m1.clone();
                for (var, power) in m2 {
                    let entry = monomial.entry(var.clone()).or_insert(0);
                    *entry = entry.checked_add(*power).ok_or(AmountError::Overflow)?;
                }
                let coeff = c1.checked_mul(*c2).ok_or(AmountError::Overflow)?;
                result.add_term(monomial, coeff)?;
            }
        }
        Ok(result)
    }

    fn pow(&self, exponent: u32) -> Result<Amount, AmountError> {
        let mut result = Amount::integer(1);
        for _ in 0..exponent {
            result = result.checked_mul(self)?;
        }
        Ok(result)
    }

    fn div_constant(&self, divisor: Rational) -> Result<Amount, AmountError> {
        let inverse = divisor.checked_recip().ok_or(AmountError::InvalidDivision)?;
        self.checked_mul(&Amount::constant(inverse))
    }
}

impl Neg for Amount {
    type Output = Amount;
    fn neg(self) -> Amount {
        Amount {
            terms: self.terms.into_iter().map(|(m, c)| (m, -c)).collect(),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (i, (monomial, coeff)) in self.terms.iter().enumerate() {
            let negative = coeff.numer() < 0;
            let magnitude = if negative { -*coeff } else { *coeff };
            match (i, negative) {
                (0, true) => write!(f, "-")?,
                (0, false) => {}
                (_, true) => write!(f, " - ")?,
                (_, false) => write!(f, " + ")?,
            }
            let vars: Vec<String> = monomial
                .iter()
                .map(|(v, p)| if *p == 1 { v.clone() } else { format!("{}^{}", v, p) })
                .collect();
            if vars.is_empty() {
                write!(f, "{}", magnitude)?;
            } else if magnitude == Rational::ONE {
                write!(f, "{}", vars.join("*"))?;
            } else {
                write!(f, "{}*{}", magnitude, vars.join("*"))?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(Rational),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(r) => write!(f, "{}", r),
            Token::Ident(s) => write!(f, "{}", s),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Caret => write!(f, "^"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>, AmountError> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                tokens.push(Token::Number(Rational::parse_decimal(&literal)?));
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                // "**" is an alias of "^"
                if chars.get(i + 1) == Some(&'*') {
                    tokens.push(Token::Caret);
                    i += 2;
                } else {
                    tokens.push(Token::Star);
                    i += 1;
                }
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '^' => {
                tokens.push(Token::Caret);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            other => return Err(AmountError::UnexpectedChar(other)),
        }
    }
    Ok(tokens)
}

/// Recursive descent over `expr := term (('+'|'-') term)*`,
/// `term := unary (('*'|'/') unary)*`, `unary := ('+'|'-') unary | power`,
/// `power := atom ('^' unary)?`, `atom := number | ident | '(' expr ')'`.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expression(&mut self) -> Result<Amount, AmountError> {
        let mut acc = self.term()?;
        while let Some(token) = self.peek() {
            match token {
                Token::Plus => {
                    self.pos += 1;
                    acc = acc.checked_add(&self.term()?)?;
                }
                Token::Minus => {
                    self.pos += 1;
                    acc = acc.checked_sub(&self.term()?)?;
                }
                _ => break,
            }
        }
        Ok(acc)
    }

    fn term(&mut self) -> Result<Amount, AmountError> {
        let mut acc = self.unary()?;
        while let Some(token) = self.peek() {
            match token {
                Token::Star => {
                    self.pos += 1;
                    acc = acc.checked_mul(&self.unary()?)?;
                }
                Token::Slash => {
                    self.pos += 1;
                    let divisor = self.unary()?;
                    match divisor.as_constant() {
                        Some(value) if !value.is_zero() => acc = acc.div_constant(value)?,
                        _ => return Err(AmountError::InvalidDivision),
                    }
                }
                _ => break,
            }
        }
        Ok(acc)
    }

    fn unary(&mut self) -> Result<Amount, AmountError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Amount, AmountError> {
        let base = self.atom()?;
        if let Some(Token::Caret) = self.peek() {
            self.pos += 1;
            let exponent = self.unary()?;
            let exponent = match exponent.as_constant() {
                Some(e) if e.denom() == 1 && (0..=MAX_EXPONENT).contains(&e.numer()) => {
                    e.numer() as u32
                }
                _ => return Err(AmountError::InvalidExponent),
            };
            return base.pow(exponent);
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Amount, AmountError> {
        match self.next() {
            Some(Token::Number(value)) => Ok(Amount::constant(value)),
            Some(Token::Ident(name)) => Ok(Amount::variable(&name)),
            Some(Token::LParen) => {
                let inner = self.expression()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    Some(other) => Err(AmountError::UnexpectedToken(other.to_string())),
                    None => Err(AmountError::UnexpectedEnd),
                }
            }
            Some(other) => Err(AmountError::UnexpectedToken(other.to_string())),
            None => Err(AmountError::UnexpectedEnd),
        }
    }
}
