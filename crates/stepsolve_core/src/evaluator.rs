use std::cell::RefCell;
use std::collections::HashMap;

use thiserror::Error;

/// Errors produced while parsing or evaluating an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("syntax error: {0}")]
    Syntax(String),
    #[error("unknown symbol '{0}'")]
    UnknownSymbol(String),
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("expression did not produce a finite value")]
    NonFinite,
}

/// OpCodes for the stack-based evaluator.
/// The machine operates on a stack of `f64` values.
#[derive(Debug, Clone, Copy)]
enum OpCode {
    /// Pushes a constant value onto the stack.
    LoadConst(f64),
    /// Pushes the value of a variable (by index into the binding slice).
    LoadVar(usize),
    /// Pops top two values (b, a), pushes (a + b).
    Add,
    /// Pops top two values (b, a), pushes (a - b).
    Sub,
    /// Pops top two values (b, a), pushes (a * b).
    Mul,
    /// Pops top two values (b, a), pushes (a / b). Fails on a non-finite quotient.
    Div,
    /// Pops top two values (b, a), pushes (a ^ b).
    Pow,
    Sin,
    Cos,
    Tan,
    /// Base-10 logarithm.
    Log,
    /// Natural logarithm.
    Ln,
    Sqrt,
    Exp,
    Neg,
}

/// A compiled sequence of operations for one expression.
#[derive(Debug, Clone)]
struct Bytecode {
    ops: Vec<OpCode>,
}

/// An expression compiled against a fixed, ordered variable list.
///
/// Compilation happens once; evaluation binds the variables positionally
/// and can run millions of times without re-parsing. The scratch stack is
/// reused across evaluations, which makes the type `!Sync`; solving is
/// single-threaded by design.
#[derive(Debug)]
pub struct CompiledExpr {
    code: Bytecode,
    source: String,
    arity: usize,
    stack: RefCell<Vec<f64>>,
}

impl CompiledExpr {
    /// Compiles `source` so that `variables[i]` resolves to binding slot `i`.
    pub fn compile(source: &str, variables: &[char]) -> Result<Self, EvalError> {
        let expr = parse(source)?;
        let mut var_map = HashMap::new();
        for (i, &name) in variables.iter().enumerate() {
            var_map.insert(name, i);
        }
        let mut ops = Vec::new();
        compile_node(&expr, &var_map, &mut ops)?;
        Ok(Self {
            code: Bytecode { ops },
            source: source.to_string(),
            arity: variables.len(),
            stack: RefCell::new(Vec::with_capacity(16)),
        })
    }

    /// The expression text this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluates the expression with `values[i]` bound to the i-th variable.
    pub fn eval(&self, values: &[f64]) -> Result<f64, EvalError> {
        debug_assert_eq!(values.len(), self.arity);
        let mut stack = self.stack.borrow_mut();
        stack.clear();

        for op in &self.code.ops {
            match op {
                OpCode::LoadConst(val) => stack.push(*val),
                OpCode::LoadVar(idx) => stack.push(values[*idx]),
                OpCode::Add => {
                    let b = stack.pop().unwrap();
                    let a = stack.pop().unwrap();
                    stack.push(a + b);
                }
                OpCode::Sub => {
                    let b = stack.pop().unwrap();
                    let a = stack.pop().unwrap();
                    stack.push(a - b);
                }
                OpCode::Mul => {
                    let b = stack.pop().unwrap();
                    let a = stack.pop().unwrap();
                    stack.push(a * b);
                }
                OpCode::Div => {
                    let b = stack.pop().unwrap();
                    let a = stack.pop().unwrap();
                    let q = a / b;
                    if !q.is_finite() {
                        return Err(EvalError::NonFinite);
                    }
                    stack.push(q);
                }
                OpCode::Pow => {
                    let b = stack.pop().unwrap();
                    let a = stack.pop().unwrap();
                    stack.push(a.powf(b));
                }
                OpCode::Sin => {
                    let a = stack.pop().unwrap();
                    stack.push(a.sin());
                }
                OpCode::Cos => {
                    let a = stack.pop().unwrap();
                    stack.push(a.cos());
                }
                OpCode::Tan => {
                    let a = stack.pop().unwrap();
                    stack.push(a.tan());
                }
                OpCode::Log => {
                    let a = stack.pop().unwrap();
                    stack.push(a.log10());
                }
                OpCode::Ln => {
                    let a = stack.pop().unwrap();
                    stack.push(a.ln());
                }
                OpCode::Sqrt => {
                    let a = stack.pop().unwrap();
                    stack.push(a.sqrt());
                }
                OpCode::Exp => {
                    let a = stack.pop().unwrap();
                    stack.push(a.exp());
                }
                OpCode::Neg => {
                    let a = stack.pop().unwrap();
                    stack.push(-a);
                }
            }
        }

        let result = stack.pop().unwrap_or(0.0);
        if result.is_finite() {
            Ok(result)
        } else {
            Err(EvalError::NonFinite)
        }
    }
}

/// One-shot convenience: compile and evaluate with named bindings.
pub fn evaluate(expression: &str, bindings: &HashMap<char, f64>) -> Result<f64, EvalError> {
    let vars: Vec<char> = bindings.keys().copied().collect();
    let compiled = CompiledExpr::compile(expression, &vars)?;
    let values: Vec<f64> = vars.iter().map(|v| bindings[v]).collect();
    compiled.eval(&values)
}

// --- AST & compiler ---

#[derive(Debug)]
enum Expr {
    Number(f64),
    Variable(String),
    Binary(Box<Expr>, char, Box<Expr>),
    Unary(Box<Expr>),
    Call(String, Box<Expr>),
}

fn compile_node(
    expr: &Expr,
    var_map: &HashMap<char, usize>,
    ops: &mut Vec<OpCode>,
) -> Result<(), EvalError> {
    match expr {
        Expr::Number(n) => ops.push(OpCode::LoadConst(*n)),
        Expr::Variable(name) => {
            let mut chars = name.chars();
            let idx = match (chars.next(), chars.next()) {
                (Some(c), None) => var_map.get(&c),
                _ => None,
            };
            match idx {
                Some(&i) => ops.push(OpCode::LoadVar(i)),
                None => return Err(EvalError::UnknownSymbol(name.clone())),
            }
        }
        Expr::Binary(left, op, right) => {
            compile_node(left, var_map, ops)?;
            compile_node(right, var_map, ops)?;
            ops.push(match op {
                '+' => OpCode::Add,
                '-' => OpCode::Sub,
                '*' => OpCode::Mul,
                '/' => OpCode::Div,
                _ => OpCode::Pow,
            });
        }
        Expr::Unary(operand) => {
            compile_node(operand, var_map, ops)?;
            ops.push(OpCode::Neg);
        }
        Expr::Call(func, arg) => {
            compile_node(arg, var_map, ops)?;
            ops.push(match func.as_str() {
                "sin" => OpCode::Sin,
                "cos" => OpCode::Cos,
                "tan" => OpCode::Tan,
                "log" => OpCode::Log,
                "ln" => OpCode::Ln,
                "sqrt" => OpCode::Sqrt,
                "exp" => OpCode::Exp,
                _ => return Err(EvalError::UnknownFunction(func.clone())),
            });
        }
    }
    Ok(())
}

// --- Tokenizer & parser ---

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Identifier(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c.is_ascii_digit() || c == '.' {
            let mut num_str = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_ascii_digit() || d == '.' {
                    num_str.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            // Scientific notation: 'e'/'E' directly after the mantissa,
            // followed by an optionally signed integer exponent.
            if let Some(&e) = chars.peek() {
                if e == 'e' || e == 'E' {
                    let mut lookahead = chars.clone();
                    lookahead.next();
                    let mut exp = String::new();
                    if let Some(&sign) = lookahead.peek() {
                        if sign == '+' || sign == '-' {
                            exp.push(sign);
                            lookahead.next();
                        }
                    }
                    let mut has_digits = false;
                    while let Some(&d) = lookahead.peek() {
                        if d.is_ascii_digit() {
                            exp.push(d);
                            lookahead.next();
                            has_digits = true;
                        } else {
                            break;
                        }
                    }
                    if has_digits {
                        num_str.push('e');
                        num_str.push_str(&exp);
                        chars = lookahead;
                    }
                }
            }
            let value = num_str
                .parse()
                .map_err(|_| EvalError::Syntax(format!("invalid number '{num_str}'")))?;
            tokens.push(Token::Number(value));
        } else if c.is_alphabetic() {
            let mut ident = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_alphanumeric() || d == '_' {
                    ident.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::Identifier(ident));
        } else {
            match c {
                '+' => tokens.push(Token::Plus),
                '-' => tokens.push(Token::Minus),
                '*' => tokens.push(Token::Star),
                '/' => tokens.push(Token::Slash),
                '^' => tokens.push(Token::Caret),
                '(' => tokens.push(Token::LParen),
                ')' => tokens.push(Token::RParen),
                _ => return Err(EvalError::Syntax(format!("unexpected character '{c}'"))),
            }
            chars.next();
        }
    }
    Ok(tokens)
}

fn parse(input: &str) -> Result<Expr, EvalError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(EvalError::Syntax("empty expression".to_string()));
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expression()?;
    if parser.pos < parser.tokens.len() {
        return Err(EvalError::Syntax(format!(
            "unexpected trailing input in '{input}'"
        )));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).cloned()
    }

    fn consume(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn parse_expression(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.parse_term()?;

        while let Some(token) = self.peek() {
            match token {
                Token::Plus => {
                    self.consume();
                    let right = self.parse_term()?;
                    left = Expr::Binary(Box::new(left), '+', Box::new(right));
                }
                Token::Minus => {
                    self.consume();
                    let right = self.parse_term()?;
                    left = Expr::Binary(Box::new(left), '-', Box::new(right));
                }
                _ => break,
            }
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.parse_power()?;

        while let Some(token) = self.peek() {
            match token {
                Token::Star => {
                    self.consume();
                    let right = self.parse_power()?;
                    left = Expr::Binary(Box::new(left), '*', Box::new(right));
                }
                Token::Slash => {
                    self.consume();
                    let right = self.parse_power()?;
                    left = Expr::Binary(Box::new(left), '/', Box::new(right));
                }
                _ => break,
            }
        }
        Ok(left)
    }

    fn parse_power(&mut self) -> Result<Expr, EvalError> {
        let left = self.parse_unary()?;

        // Right-associative: 2^3^2 is 2^(3^2).
        if let Some(Token::Caret) = self.peek() {
            self.consume();
            let right = self.parse_power()?;
            return Ok(Expr::Binary(Box::new(left), '^', Box::new(right)));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, EvalError> {
        if let Some(Token::Minus) = self.peek() {
            self.consume();
            let expr = self.parse_unary()?;
            return Ok(Expr::Unary(Box::new(expr)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, EvalError> {
        match self.consume() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Identifier(name)) => {
                if let Some(Token::LParen) = self.peek() {
                    self.consume();
                    let arg = self.parse_expression()?;
                    match self.consume() {
                        Some(Token::RParen) => Ok(Expr::Call(name, Box::new(arg))),
                        _ => Err(EvalError::Syntax(format!(
                            "expected ')' after argument of '{name}'"
                        ))),
                    }
                } else {
                    Ok(Expr::Variable(name))
                }
            }
            Some(Token::LParen) => {
                let expr = self.parse_expression()?;
                match self.consume() {
                    Some(Token::RParen) => Ok(expr),
                    _ => Err(EvalError::Syntax("expected ')'".to_string())),
                }
            }
            other => Err(EvalError::Syntax(format!(
                "unexpected token {other:?}"
            ))),
        }
    }
}
