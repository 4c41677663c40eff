use crate::dom::page::ElementNode;
use crate::error::GroundingError;

/// Confidence tier of the selector list that matched an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    High,
    Medium,
    Low,
}

/// A comma-separated list of compound selectors.
///
/// Supported: `tag` or `*`, `.class`, `[attr]`, `[attr=v]`, `[attr*=v]`,
/// `[attr^=v]`, `[attr$=v]` and `:not(<compound>)`. Combinators are not.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList {
    compounds: Vec<Compound>,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Compound {
    tag: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrFilter>,
    negations: Vec<Compound>,
}

#[derive(Debug, Clone, PartialEq)]
struct AttrFilter {
    name: String,
    op: AttrOp,
}

#[derive(Debug, Clone, PartialEq)]
enum AttrOp {
    Exists,
    Equals(String),
    Contains(String),
    Prefix(String),
    Suffix(String),
}

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self, GroundingError> {
        let compounds = split_top_level(input)
            .into_iter()
            .map(|part| parse_compound(part.trim(), input))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SelectorList { compounds })
    }

    pub fn matches(&self, el: &ElementNode) -> bool {
        self.compounds.iter().any(|c| c.matches(el))
    }
}

impl Compound {
    fn matches(&self, el: &ElementNode) -> bool {
        if let Some(tag) = &self.tag {
            if !el.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| el.class_list().any(|k| k == c)) {
            return false;
        }
        if !self.attrs.iter().all(|a| a.matches(el)) {
            return false;
        }
        !self.negations.iter().any(|n| n.matches(el))
    }
}

impl AttrFilter {
    fn matches(&self, el: &ElementNode) -> bool {
        let Some(value) = el.attribute(&self.name) else {
            return false;
        };
        match &self.op {
            AttrOp::Exists => true,
            AttrOp::Equals(v) => value == v,
            AttrOp::Contains(v) => !v.is_empty() && value.contains(v.as_str()),
            AttrOp::Prefix(v) => !v.is_empty() && value.starts_with(v.as_str()),
            AttrOp::Suffix(v) => !v.is_empty() && value.ends_with(v.as_str()),
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

fn invalid(selector: &str, reason: impl Into<String>) -> GroundingError {
    GroundingError::Selector {
        selector: selector.to_string(),
        reason: reason.into(),
    }
}

/// Split on commas that are not inside brackets, parentheses or quotes.
fn split_top_level(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '[' | '(') => depth += 1,
            (None, ']' | ')') => depth -= 1,
            (None, ',') if depth == 0 => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn parse_compound(text: &str, full: &str) -> Result<Compound, GroundingError> {
    if text.is_empty() {
        return Err(invalid(full, "empty selector"));
    }

    let chars: Vec<char> = text.chars().collect();
    let mut pos = 0;
    let mut compound = Compound::default();

    let read_ident = |pos: &mut usize| -> String {
        let start = *pos;
        while *pos < chars.len() && is_ident_char(chars[*pos]) {
            *pos += 1;
        }
        chars[start..*pos].iter().collect()
    };

    if chars[0] == '*' {
        pos = 1;
    } else if is_ident_char(chars[0]) {
        compound.tag = Some(read_ident(&mut pos).to_ascii_lowercase());
    }

    while pos < chars.len() {
        match chars[pos] {
            '.' => {
                pos += 1;
                let class = read_ident(&mut pos);
                if class.is_empty() {
                    return Err(invalid(full, "missing class name after '.'"));
                }
                compound.classes.push(class);
            }
            '[' => {
                let end = find_closing(&chars, pos, '[', ']')
                    .ok_or_else(|| invalid(full, "unterminated attribute selector"))?;
                let body: String = chars[pos + 1..end].iter().collect();
                compound.attrs.push(parse_attr(&body, full)?);
                pos = end + 1;
            }
            ':' => {
                let rest: String = chars[pos..].iter().collect();
                if !rest.starts_with(":not(") {
                    return Err(invalid(full, format!("unsupported pseudo-class at '{}'", rest)));
                }
                let open = pos + 4;
                let end = find_closing(&chars, open, '(', ')')
                    .ok_or_else(|| invalid(full, "unterminated :not("))?;
                let inner: String = chars[open + 1..end].iter().collect();
                compound.negations.push(parse_compound(inner.trim(), full)?);
                pos = end + 1;
            }
            c if c.is_whitespace() || c == '>' || c == '+' || c == '~' => {
                return Err(invalid(full, "combinators are not supported"));
            }
            c => return Err(invalid(full, format!("unexpected character '{}'", c))),
        }
    }

    Ok(compound)
}

fn find_closing(chars: &[char], open_pos: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0;
    let mut quote: Option<char> = None;
    for (i, &c) in chars.iter().enumerate().skip(open_pos) {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, c) if c == open => depth += 1,
            (None, c) if c == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_attr(body: &str, full: &str) -> Result<AttrFilter, GroundingError> {
    let body = body.trim();
    let Some(eq) = body.find('=') else {
        if body.is_empty() || !body.chars().all(is_ident_char) {
            return Err(invalid(full, format!("bad attribute name '{}'", body)));
        }
        return Ok(AttrFilter {
            name: body.to_ascii_lowercase(),
            op: AttrOp::Exists,
        });
    };

    let (name_part, modifier) = match body[..eq].chars().last() {
        Some(m @ ('*' | '^' | '$')) => (&body[..eq - 1], Some(m)),
        _ => (&body[..eq], None),
    };
    let name = name_part.trim();
    if name.is_empty() || !name.chars().all(is_ident_char) {
        return Err(invalid(full, format!("bad attribute name '{}'", name)));
    }

    let raw = body[eq + 1..].trim();
    let value = match raw.chars().next() {
        Some(q @ ('\'' | '"')) => {
            if raw.len() < 2 || !raw.ends_with(q) {
                return Err(invalid(full, "unterminated attribute value"));
            }
            raw[1..raw.len() - 1].to_string()
        }
        _ => raw.to_string(),
    };

    let op = match modifier {
        Some('*') => AttrOp::Contains(value),
        Some('^') => AttrOp::Prefix(value),
        Some('$') => AttrOp::Suffix(value),
        _ => AttrOp::Equals(value),
    };

    Ok(AttrFilter {
        name: name.to_ascii_lowercase(),
        op,
    })
}
