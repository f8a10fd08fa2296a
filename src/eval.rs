//! The define table and the text helpers behind the built-in
//! substitutions (`$(target_name)`, `$(target_ext)`, `$(dep[N])`).

/// User-defined name->value pairs, kept in insertion order.
///
/// Lookup is linear and returns the first match, so a redefinition does
/// not shadow the original. Values are stored as written (minus quoting);
/// they are expanded at use site by splicing them back into the source
/// buffer, never at definition time.
#[derive(Default)]
pub struct Defines(Vec<(String, String)>);

impl Defines {
    pub fn insert(&mut self, name: String, value: String) {
        self.0.push((name, value));
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Portion of a target name before the first `.`.
pub fn basename(name: &str) -> &str {
    name.split_once('.').map_or(name, |(base, _)| base)
}

/// Portion of a target name after the first `.`, empty when there is none.
pub fn extension(name: &str) -> &str {
    name.split_once('.').map_or("", |(_, ext)| ext)
}

/// Parses the index out of a `$(dep[N])` word. The brackets must be
/// present and N must be an integer; the base is autodetected the way
/// `strtol(…, 0)` does it: `0x` prefix is hex, a leading `0` is octal,
/// anything else decimal.
pub fn parse_dep_index(word: &str) -> Result<usize, String> {
    let inner = word
        .strip_prefix("$(dep[")
        .and_then(|rest| rest.strip_suffix("])"))
        .ok_or_else(|| format!("malformed dependency reference {:?}", word))?;
    parse_auto_base(inner).ok_or_else(|| format!("invalid dependency index {:?}", inner))
}

fn parse_auto_base(s: &str) -> Option<usize> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        usize::from_str_radix(hex, 16).ok()
    } else if s.len() > 1 && s.starts_with('0') {
        usize::from_str_radix(&s[1..], 8).ok()
    } else {
        s.parse().ok()
    }
}
