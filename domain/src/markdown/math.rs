//! LaTeX subset typesetter.
//!
//! Converts the math notation found in physics explanations into Unicode
//! display text (`E = mc^2` → `E = mc²`, `\frac{1}{\sqrt{2}}` → `1/(√2)`).
//! Anything outside the supported subset is reported as a
//! [`MalformedMathExpression`]; callers fall back to showing the raw source.

use thiserror::Error;

/// Why an expression could not be typeset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedMathExpression {
    #[error("unbalanced braces")]
    UnbalancedBraces,

    #[error("unknown command \\{0}")]
    UnknownCommand(String),

    #[error("missing argument for \\{0}")]
    MissingArgument(String),

    #[error("'{0}' has nothing to attach to")]
    DanglingScript(char),

    #[error("trailing backslash")]
    TrailingBackslash,

    #[error("\\left and \\right do not match")]
    UnmatchedDelimiter,

    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),
}

/// Deepest group/argument nesting accepted before giving up.
pub const MAX_NESTING: usize = 256;

type Result<T> = std::result::Result<T, MalformedMathExpression>;

/// Typeset a LaTeX expression into Unicode text.
pub fn typeset(expression: &str) -> Result<String> {
    let mut typesetter = Typesetter {
        chars: expression.chars().collect(),
        pos: 0,
        delimiter_depth: 0,
        nesting: 0,
    };
    let output = typesetter.sequence(false)?;
    if typesetter.delimiter_depth != 0 {
        return Err(MalformedMathExpression::UnmatchedDelimiter);
    }
    Ok(output)
}

struct Typesetter {
    chars: Vec<char>,
    pos: usize,
    delimiter_depth: usize,
    nesting: usize,
}

impl Typesetter {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Parse items until end of input, or until the closing brace of a group.
    fn sequence(&mut self, in_group: bool) -> Result<String> {
        let mut out = String::new();
        loop {
            match self.peek() {
                None if in_group => return Err(MalformedMathExpression::UnbalancedBraces),
                None => return Ok(out),
                Some('}') if in_group => {
                    self.pos += 1;
                    return Ok(out);
                }
                Some('}') => return Err(MalformedMathExpression::UnbalancedBraces),
                Some(_) => out.push_str(&self.item()?),
            }
        }
    }

    fn item(&mut self) -> Result<String> {
        if self.nesting >= MAX_NESTING {
            return Err(MalformedMathExpression::TooDeep(MAX_NESTING));
        }
        self.nesting += 1;
        let result = self.item_inner();
        self.nesting -= 1;
        result
    }

    fn item_inner(&mut self) -> Result<String> {
        let Some(c) = self.bump() else {
            return Ok(String::new());
        };
        match c {
            '{' => self.sequence(true),
            '\\' => self.command(),
            '^' => {
                let arg = self.script_argument('^')?;
                Ok(superscript(&arg))
            }
            '_' => {
                let arg = self.script_argument('_')?;
                Ok(subscript(&arg))
            }
            '&' | '~' => Ok(" ".to_string()),
            other => Ok(other.to_string()),
        }
    }

    fn script_argument(&mut self, marker: char) -> Result<String> {
        self.skip_whitespace();
        match self.peek() {
            None | Some('}') | Some('^') | Some('_') => {
                Err(MalformedMathExpression::DanglingScript(marker))
            }
            Some(_) => self.item(),
        }
    }

    /// A required argument: a braced group or a single token.
    fn argument(&mut self, command: &str) -> Result<String> {
        self.skip_whitespace();
        match self.peek() {
            None | Some('}') => Err(MalformedMathExpression::MissingArgument(command.to_string())),
            Some(_) => self.item(),
        }
    }

    /// An optional `[...]` argument, returned raw.
    fn optional_argument(&mut self) -> Option<String> {
        if self.peek() != Some('[') {
            return None;
        }
        let close = self.chars[self.pos..].iter().position(|&c| c == ']')?;
        let raw: String = self.chars[self.pos + 1..self.pos + close].iter().collect();
        self.pos += close + 1;
        Some(raw)
    }

    fn command_name(&mut self) -> Result<String> {
        let Some(first) = self.bump() else {
            return Err(MalformedMathExpression::TrailingBackslash);
        };
        if !first.is_ascii_alphabetic() {
            return Ok(first.to_string());
        }
        let mut name = first.to_string();
        while let Some(c) = self.peek().filter(char::is_ascii_alphabetic) {
            name.push(c);
            self.pos += 1;
        }
        Ok(name)
    }

    fn command(&mut self) -> Result<String> {
        let name = self.command_name()?;

        if let Some(symbol) = symbol(&name) {
            return Ok(symbol.to_string());
        }

        match name.as_str() {
            "frac" | "dfrac" | "tfrac" => {
                let numerator = self.argument(&name)?;
                let denominator = self.argument(&name)?;
                Ok(format!("{}/{}", wrap(&numerator), wrap(&denominator)))
            }
            "sqrt" => {
                let index = self.optional_argument();
                let radicand = self.argument(&name)?;
                let root = match index.as_deref().map(str::trim) {
                    None | Some("2") => "√".to_string(),
                    Some("3") => "∛".to_string(),
                    Some("4") => "∜".to_string(),
                    Some(n) => format!("{}√", superscript(n)),
                };
                Ok(format!("{}{}", root, wrap(&radicand)))
            }
            "vec" | "hat" | "bar" | "overline" | "dot" | "ddot" | "tilde" => {
                let base = self.argument(&name)?;
                Ok(format!("{}{}", base, combining_mark(&name)))
            }
            "text" | "mathrm" | "mathbf" | "mathit" | "mathcal" | "textbf" | "boldsymbol"
            | "operatorname" => self.argument(&name),
            "left" => {
                self.delimiter_depth += 1;
                self.delimiter()
            }
            "right" => {
                if self.delimiter_depth == 0 {
                    return Err(MalformedMathExpression::UnmatchedDelimiter);
                }
                self.delimiter_depth -= 1;
                self.delimiter()
            }
            _ => Err(MalformedMathExpression::UnknownCommand(name)),
        }
    }

    /// The delimiter following `\left` or `\right`.
    fn delimiter(&mut self) -> Result<String> {
        self.skip_whitespace();
        match self.bump() {
            None => Err(MalformedMathExpression::UnmatchedDelimiter),
            Some('.') => Ok(String::new()),
            Some('\\') => self.command(),
            Some(c) => Ok(c.to_string()),
        }
    }
}

fn symbol(name: &str) -> Option<&'static str> {
    let symbol = match name {
        "alpha" => "α",
        "beta" => "β",
        "gamma" => "γ",
        "delta" => "δ",
        "epsilon" => "ϵ",
        "varepsilon" => "ε",
        "zeta" => "ζ",
        "eta" => "η",
        "theta" => "θ",
        "vartheta" => "ϑ",
        "iota" => "ι",
        "kappa" => "κ",
        "lambda" => "λ",
        "mu" => "μ",
        "nu" => "ν",
        "xi" => "ξ",
        "pi" => "π",
        "rho" => "ρ",
        "sigma" => "σ",
        "tau" => "τ",
        "upsilon" => "υ",
        "phi" => "ϕ",
        "varphi" => "φ",
        "chi" => "χ",
        "psi" => "ψ",
        "omega" => "ω",
        "Gamma" => "Γ",
        "Delta" => "Δ",
        "Theta" => "Θ",
        "Lambda" => "Λ",
        "Xi" => "Ξ",
        "Pi" => "Π",
        "Sigma" => "Σ",
        "Phi" => "Φ",
        "Psi" => "Ψ",
        "Omega" => "Ω",
        "cdot" => "·",
        "times" => "×",
        "div" => "÷",
        "pm" => "±",
        "mp" => "∓",
        "leq" | "le" => "≤",
        "geq" | "ge" => "≥",
        "neq" | "ne" => "≠",
        "approx" => "≈",
        "equiv" => "≡",
        "sim" => "∼",
        "propto" => "∝",
        "ll" => "≪",
        "gg" => "≫",
        "infty" => "∞",
        "partial" => "∂",
        "nabla" => "∇",
        "hbar" => "ℏ",
        "int" => "∫",
        "iint" => "∬",
        "oint" => "∮",
        "sum" => "∑",
        "prod" => "∏",
        "to" | "rightarrow" => "→",
        "leftarrow" => "←",
        "Rightarrow" => "⇒",
        "leftrightarrow" => "↔",
        "langle" => "⟨",
        "rangle" => "⟩",
        "cdots" => "⋯",
        "ldots" | "dots" => "…",
        "circ" => "∘",
        "prime" => "′",
        "perp" => "⊥",
        "parallel" => "∥",
        "in" => "∈",
        "sin" => "sin",
        "cos" => "cos",
        "tan" => "tan",
        "log" => "log",
        "ln" => "ln",
        "exp" => "exp",
        "lim" => "lim",
        "max" => "max",
        "min" => "min",
        "det" => "det",
        "quad" => "  ",
        "qquad" => "    ",
        "," | ";" | ":" | " " => " ",
        "!" => "",
        "\\" => " ",
        "{" => "{",
        "}" => "}",
        "|" => "‖",
        "%" => "%",
        "$" => "$",
        "#" => "#",
        "_" => "_",
        "&" => "&",
        _ => return None,
    };
    Some(symbol)
}

fn combining_mark(accent: &str) -> char {
    match accent {
        "vec" => '\u{20D7}',
        "hat" => '\u{0302}',
        "dot" => '\u{0307}',
        "ddot" => '\u{0308}',
        "tilde" => '\u{0303}',
        _ => '\u{0305}',
    }
}

/// Parenthesize anything longer than a single character.
fn wrap(s: &str) -> String {
    if s.chars().count() <= 1 {
        s.to_string()
    } else {
        format!("({})", s)
    }
}

fn superscript(s: &str) -> String {
    if s == "∘" {
        return "°".to_string();
    }
    scripted(s, '^', |c| {
        Some(match c {
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4' => '⁴',
            '5' => '⁵',
            '6' => '⁶',
            '7' => '⁷',
            '8' => '⁸',
            '9' => '⁹',
            '+' => '⁺',
            '-' => '⁻',
            '=' => '⁼',
            '(' => '⁽',
            ')' => '⁾',
            'n' => 'ⁿ',
            'i' => 'ⁱ',
            '′' => '′',
            _ => return None,
        })
    })
}

fn subscript(s: &str) -> String {
    scripted(s, '_', |c| {
        Some(match c {
            '0' => '₀',
            '1' => '₁',
            '2' => '₂',
            '3' => '₃',
            '4' => '₄',
            '5' => '₅',
            '6' => '₆',
            '7' => '₇',
            '8' => '₈',
            '9' => '₉',
            '+' => '₊',
            '-' => '₋',
            '=' => '₌',
            '(' => '₍',
            ')' => '₎',
            'a' => 'ₐ',
            'e' => 'ₑ',
            'o' => 'ₒ',
            'x' => 'ₓ',
            'h' => 'ₕ',
            'k' => 'ₖ',
            'l' => 'ₗ',
            'm' => 'ₘ',
            'n' => 'ₙ',
            'p' => 'ₚ',
            's' => 'ₛ',
            't' => 'ₜ',
            'i' => 'ᵢ',
            'j' => 'ⱼ',
            'r' => 'ᵣ',
            'u' => 'ᵤ',
            'v' => 'ᵥ',
            _ => return None,
        })
    })
}

/// Map every character with `table`, or fall back to `marker(s)` notation.
fn scripted(s: &str, marker: char, table: impl Fn(char) -> Option<char>) -> String {
    match s.chars().map(&table).collect::<Option<String>>() {
        Some(mapped) => mapped,
        None if s.chars().count() == 1 => format!("{}{}", marker, s),
        None => format!("{}({})", marker, s),
    }
}
