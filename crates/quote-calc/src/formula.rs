//! 公式計算
//!
//! 只支援 `+ - * /`、括號、一元正負號與十進位數值的算術公式。
//! 變數以識別字為單位綁定（`width` 不會比對到 `widthTolerance`），
//! 不使用任何通用直譯器。

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;

/// 公式變數綁定
pub type Variables = HashMap<String, Decimal>;

/// 括號巢狀上限
const MAX_DEPTH: usize = 64;

/// 公式錯誤
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormulaError {
    #[error("無法辨識的字元 '{0}'（位置 {1}）")]
    UnexpectedChar(char, usize),

    #[error("無效的數值: {0}")]
    InvalidNumber(String),

    #[error("未綁定的變數: {0}")]
    UnboundVariable(String),

    #[error("公式不完整")]
    UnexpectedEnd,

    #[error("多餘的符號（位置 {0}）")]
    TrailingInput(usize),

    #[error("缺少右括號")]
    UnclosedParen,

    #[error("除以零")]
    DivisionByZero,

    #[error("數值溢位")]
    Overflow,

    #[error("括號巢狀過深")]
    TooDeep,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(Decimal),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

/// 建立標準變數綁定：寬、高、數量
pub fn bindings(width: Decimal, height: Decimal, quantity: Decimal) -> Variables {
    HashMap::from([
        ("width".to_string(), width),
        ("height".to_string(), height),
        ("quantity".to_string(), quantity),
    ])
}

/// 計算公式，任何失敗都回傳 0，結果不小於 0
pub fn evaluate(formula: Option<&str>, variables: &Variables) -> Decimal {
    match try_evaluate(formula, variables) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!("公式計算失敗，以 0 計: {:?} ({})", formula, err);
            Decimal::ZERO
        }
    }
}

/// 計算公式並回傳錯誤原因（供呼叫端標記問題行）
///
/// 空白公式回傳 0；結果不小於 0。
pub fn try_evaluate(formula: Option<&str>, variables: &Variables) -> Result<Decimal, FormulaError> {
    let formula = match formula.map(str::trim) {
        Some(f) if !f.is_empty() => f,
        _ => return Ok(Decimal::ZERO),
    };

    let tokens = substitute(tokenize(formula)?, variables)?;
    if tokens.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let value = Parser::new(&tokens).parse()?;
    Ok(value.max(Decimal::ZERO))
}

/// 公式是否引用指定變數（以識別字比對）
pub fn references_variable(formula: &str, name: &str) -> bool {
    tokenize(formula)
        .map(|tokens| {
            tokens
                .iter()
                .any(|t| matches!(t, Token::Ident(ident) if ident == name))
        })
        .unwrap_or(false)
}

fn tokenize(input: &str) -> Result<Vec<Token>, FormulaError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
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
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                tokens.push(Token::Number(parse_number(&text)?));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            other => return Err(FormulaError::UnexpectedChar(other, i)),
        }
    }

    Ok(tokens)
}

fn parse_number(text: &str) -> Result<Decimal, FormulaError> {
    if text.matches('.').count() > 1 || text == "." {
        return Err(FormulaError::InvalidNumber(text.to_string()));
    }
    let normalized = match (text.starts_with('.'), text.ends_with('.')) {
        (true, _) => format!("0{}", text),
        (_, true) => text.trim_end_matches('.').to_string(),
        _ => text.to_string(),
    };
    Decimal::from_str(&normalized).map_err(|_| FormulaError::InvalidNumber(text.to_string()))
}

/// 以綁定值取代識別字
fn substitute(tokens: Vec<Token>, variables: &Variables) -> Result<Vec<Token>, FormulaError> {
    tokens
        .into_iter()
        .map(|token| match token {
            Token::Ident(name) => variables
                .get(&name)
                .copied()
                .map(Token::Number)
                .ok_or(FormulaError::UnboundVariable(name)),
            other => Ok(other),
        })
        .collect()
}

/// 遞迴下降解析器
///
/// expr   := term (('+' | '-') term)*
/// term   := factor (('*' | '/') factor)*
/// factor := ('+' | '-') factor | '(' expr ')' | number
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn parse(mut self) -> Result<Decimal, FormulaError> {
        let value = self.expr()?;
        if self.pos < self.tokens.len() {
            return Err(FormulaError::TrailingInput(self.pos));
        }
        Ok(value)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn expr(&mut self) -> Result<Decimal, FormulaError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    let rhs = self.term()?;
                    value = value.checked_add(rhs).ok_or(FormulaError::Overflow)?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    let rhs = self.term()?;
                    value = value.checked_sub(rhs).ok_or(FormulaError::Overflow)?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<Decimal, FormulaError> {
        let mut value = self.factor()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    let rhs = self.factor()?;
                    value = value.checked_mul(rhs).ok_or(FormulaError::Overflow)?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let rhs = self.factor()?;
                    if rhs.is_zero() {
                        return Err(FormulaError::DivisionByZero);
                    }
                    value = value.checked_div(rhs).ok_or(FormulaError::Overflow)?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn factor(&mut self) -> Result<Decimal, FormulaError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(FormulaError::TooDeep);
        }

        let result = match self.next().cloned() {
            Some(Token::Number(value)) => Ok(value),
            Some(Token::Minus) => self.factor().map(|v| -v),
            Some(Token::Plus) => self.factor(),
            Some(Token::LParen) => {
                let value = self.expr()?;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(FormulaError::UnclosedParen),
                }
            }
            Some(_) => Err(FormulaError::TrailingInput(self.pos - 1)),
            None => Err(FormulaError::UnexpectedEnd),
        };

        self.depth -= 1;
        result
    }
}
