// ── Attribute value validation ──
//
// Every pattern accepts either a literal value of its own shape or a single
// context variable reference such as `${qpid.work_dir}`, which the broker
// resolves at runtime.

use strum::{Display, EnumIter, EnumString};

/// Shapes a form attribute may be constrained to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum FieldPattern {
    /// Unsigned decimal digits.
    Numeric,
    /// Optionally negative decimal digits.
    Signed,
    /// Word characters only.
    Name,
    /// `jdbc:<driver>:<rest>`.
    JdbcUrl,
    /// `host:port`, with IPv6-style `::` allowed in the host.
    NodeAddress,
}

impl FieldPattern {
    pub fn matches(self, input: &str) -> bool {
        is_context_var(input)
            || match self {
                Self::Numeric => is_digits(input),
                Self::Signed => is_digits(input.strip_prefix('-').unwrap_or(input)),
                Self::Name => !input.is_empty() && input.chars().all(is_word_char),
                Self::JdbcUrl => input
                    .strip_prefix("jdbc:")
                    .is_some_and(|rest| rest.contains(':')),
                Self::NodeAddress => is_node_address(input),
            }
    }
}

/// A single `${name}` reference; name characters are word characters plus `+ . - :`.
pub fn is_context_var(input: &str) -> bool {
    input
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
        .is_some_and(|name| {
            !name.is_empty()
                && name
                    .chars()
                    .all(|c| is_word_char(c) || matches!(c, '+' | '.' | '-' | ':'))
        })
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_digits(input: &str) -> bool {
    !input.is_empty() && input.chars().all(|c| c.is_ascii_digit())
}

fn is_node_address(input: &str) -> bool {
    let Some((host, port)) = input.rsplit_once(':') else {
        return false;
    };
    if !is_digits(port) || port.len() > 5 || host.is_empty() {
        return false;
    }

    let mut rest = host;
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("::") {
            rest = after;
            continue;
        }
        let mut chars = rest.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => {
                rest = chars.as_str();
            }
            _ => return false,
        }
    }
    true
}
