//! Command vocabulary shared by every component.
//!
//! [`CommandInvocation`] is one external process to run.  [`Modifier`],
//! [`ModifierSet`] and [`Keybinding`] describe the `riverctl map` grammar
//! (`<mode> <modifier-set> <key> <action> [args...]`), which is owned by
//! river and treated here as a fixed wire format.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// Error from turning a command string into an argument vector.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The string contained no arguments at all.
    #[error("empty command")]
    Empty,
    /// A `"` was opened and never closed.
    #[error("unterminated quote in {0:?}")]
    UnterminatedQuote(String),
    /// A `${` was opened and never closed.
    #[error("unterminated variable in {0:?}")]
    UnterminatedVariable(String),
}

/// One external command: the program followed by its arguments.
///
/// The vector is never empty; both constructors enforce that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    argv: Vec<String>,
}

impl CommandInvocation {
    /// Build an invocation from an already split argument vector.
    pub fn new<I, S>(argv: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        if argv.is_empty() {
            return Err(ParseError::Empty);
        }
        Ok(Self { argv })
    }

    /// Split `command` into an argument vector, expanding variables from the
    /// process environment.
    ///
    /// See [`parse_with`](Self::parse_with) for the accepted syntax.
    pub fn parse(command: &str) -> Result<Self, ParseError> {
        Self::parse_with(command, |name| std::env::var(name).ok())
    }

    /// Split `command` on whitespace.
    ///
    /// Text between double quotes stays a single argument and the quotes are
    /// dropped.  `$NAME` and `${NAME}` are replaced by `lookup(NAME)`, or by
    /// nothing if the lookup fails.  A lone `$` is kept literally.  A
    /// backslash before `"`, `\` or `$` makes that character literal; any
    /// other backslash is kept as is.
    pub fn parse_with<F>(command: &str, lookup: F) -> Result<Self, ParseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut argv = Vec::new();
        let mut current = String::new();
        let mut in_arg = false;
        let mut quoted = false;
        let mut chars = command.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '\\' if matches!(chars.peek(), Some(&('"' | '\\' | '$'))) => {
                    if let Some(escaped) = chars.next() {
                        current.push(escaped);
                    }
                    in_arg = true;
                }
                '"' => {
                    quoted = !quoted;
                    in_arg = true;
                }
                '$' => {
                    in_arg = true;
                    let mut name = String::new();
                    if chars.peek() == Some(&'{') {
                        chars.next();
                        loop {
                            match chars.next() {
                                Some('}') => break,
                                Some(ch) => name.push(ch),
                                None => {
                                    return Err(ParseError::UnterminatedVariable(
                                        command.to_string(),
                                    ))
                                }
                            }
                        }
                    } else {
                        while let Some(&ch) = chars.peek() {
                            if ch.is_ascii_alphanumeric() || ch == '_' {
                                name.push(ch);
                                chars.next();
                            } else {
                                break;
                            }
                        }
                        if name.is_empty() {
                            current.push('$');
                            continue;
                        }
                    }
                    if let Some(value) = lookup(&name) {
                        current.push_str(&value);
                    }
                }
                c if c.is_whitespace() && !quoted => {
                    if in_arg {
                        argv.push(std::mem::take(&mut current));
                        in_arg = false;
                    }
                }
                c => {
                    current.push(c);
                    in_arg = true;
                }
            }
        }

        if quoted {
            return Err(ParseError::UnterminatedQuote(command.to_string()));
        }
        if in_arg {
            argv.push(current);
        }
        Self::new(argv)
    }

    /// The executable name.
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    /// Everything after the program name.
    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    /// The full argument vector.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }
}

/// Characters [`CommandInvocation::parse_with`] would interpret.
fn is_special(c: char) -> bool {
    matches!(c, '"' | '\\' | '$')
}

/// Renders the argv so that [`CommandInvocation::parse_with`] reads the same
/// argv back.
impl fmt::Display for CommandInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.argv.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            if arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || is_special(c)) {
                write!(f, "\"")?;
                for c in arg.chars() {
                    if is_special(c) {
                        write!(f, "\\")?;
                    }
                    write!(f, "{}", c)?;
                }
                write!(f, "\"")?;
            } else {
                write!(f, "{}", arg)?;
            }
        }
        Ok(())
    }
}

/// A keyboard modifier as `riverctl` names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Super,
    Control,
    Shift,
    Alt,
    Mod3,
    Mod5,
    None,
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Modifier::Super => "Super",
            Modifier::Control => "Control",
            Modifier::Shift => "Shift",
            Modifier::Alt => "Alt",
            Modifier::Mod3 => "Mod3",
            Modifier::Mod5 => "Mod5",
            Modifier::None => "None",
        };
        write!(f, "{}", name)
    }
}

/// Error from parsing a modifier or modifier set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid modifier set {0:?}")]
pub struct ModifierError(String);

impl FromStr for Modifier {
    type Err = ModifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Super" => Ok(Modifier::Super),
            "Control" => Ok(Modifier::Control),
            "Shift" => Ok(Modifier::Shift),
            "Alt" => Ok(Modifier::Alt),
            "Mod3" => Ok(Modifier::Mod3),
            "Mod5" => Ok(Modifier::Mod5),
            "None" => Ok(Modifier::None),
            other => Err(ModifierError(other.to_string())),
        }
    }
}

/// An ordered, `+`-joined combination of modifiers (e.g. `Super+Control`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifierSet(Vec<Modifier>);

impl ModifierSet {
    pub fn new(modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        Self(modifiers.into_iter().collect())
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.0
    }
}

impl fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, m) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "+")?;
            }
            write!(f, "{}", m)?;
        }
        Ok(())
    }
}

impl FromStr for ModifierSet {
    type Err = ModifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ModifierError(s.to_string()));
        }
        s.split('+')
            .map(|part| part.parse::<Modifier>().map_err(|_| ModifierError(s.to_string())))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl<'de> Deserialize<'de> for ModifierSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(DeError::custom)
    }
}

fn default_mode() -> String {
    "normal".into()
}

/// A `riverctl map` registration.
///
/// `action` is the already split action with its arguments, so an argument
/// containing spaces (`send-layout-cmd rivertile "main-ratio -0.05"`) reaches
/// `riverctl` as one argv entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Keybinding {
    #[serde(default = "default_mode")]
    pub mode: String,
    pub modifiers: ModifierSet,
    pub key: String,
    pub action: Vec<String>,
}

impl Keybinding {
    /// A binding in the `normal` mode.
    pub fn normal<I, S>(modifiers: &[Modifier], key: impl Into<String>, action: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: default_mode(),
            modifiers: ModifierSet::new(modifiers.iter().copied()),
            key: key.into(),
            action: action.into_iter().map(Into::into).collect(),
        }
    }

    /// Render as `<control> map <mode> <modifiers> <key> <action...>`.
    pub fn to_invocation(&self, control: &str) -> Result<CommandInvocation, ParseError> {
        if self.action.is_empty() || self.key.is_empty() {
            return Err(ParseError::Empty);
        }
        let mut argv = vec![
            control.to_string(),
            "map".into(),
            self.mode.clone(),
            self.modifiers.to_string(),
            self.key.clone(),
        ];
        argv.extend(self.action.iter().cloned());
        CommandInvocation::new(argv)
    }
}
